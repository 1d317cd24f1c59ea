// db/messagedb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::messagemodel::Message;

#[async_trait]
pub trait MessageExt {
    async fn send_message(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        job_id: Option<Uuid>,
        body: String,
    ) -> Result<Message, Error>;

    async fn get_inbox(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, Error>;

    async fn get_conversation(
        &self,
        user_id: Uuid,
        other_user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, Error>;

    /// Marks a message read. Only the recipient can flip the flag; returns
    /// None when the message does not belong to them.
    async fn mark_message_read(
        &self,
        message_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<Option<Message>, Error>;

    async fn get_unread_message_count(&self, user_id: Uuid) -> Result<i64, Error>;
}

#[async_trait]
impl MessageExt for DBClient {
    async fn send_message(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        job_id: Option<Uuid>,
        body: String,
    ) -> Result<Message, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (sender_id, recipient_id, job_id, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sender_id, recipient_id, job_id, body,
                      is_read, read_at, created_at
            "#,
        )
        .bind(sender_id)
        .bind(recipient_id)
        .bind(job_id)
        .bind(body)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_inbox(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, recipient_id, job_id, body,
                   is_read, read_at, created_at
            FROM messages
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_conversation(
        &self,
        user_id: Uuid,
        other_user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, recipient_id, job_id, body,
                   is_read, read_at, created_at
            FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(other_user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_message_read(
        &self,
        message_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<Option<Message>, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            UPDATE messages
            SET is_read = true, read_at = NOW()
            WHERE id = $1 AND recipient_id = $2
            RETURNING id, sender_id, recipient_id, job_id, body,
                      is_read, read_at, created_at
            "#,
        )
        .bind(message_id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_unread_message_count(&self, user_id: Uuid) -> Result<i64, Error> {
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM messages
            WHERE recipient_id = $1
              AND is_read = false
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }
}
