// db/userdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;

use crate::models::usermodel::{User, UserRole};

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
        token: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn get_users(&self, page: u32, limit: usize) -> Result<Vec<User>, sqlx::Error>;

    async fn get_user_count(&self) -> Result<i64, sqlx::Error>;

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        email: T,
        password: T,
        phone: Option<String>,
        role: UserRole,
    ) -> Result<User, sqlx::Error>;

    async fn get_pending_users(&self, page: u32, limit: usize) -> Result<Vec<User>, sqlx::Error>;

    async fn approve_user(&self, user_id: Uuid) -> Result<User, sqlx::Error>;

    async fn get_users_by_role(&self, role: UserRole) -> Result<Vec<User>, sqlx::Error>;

    async fn update_user_name<T: Into<String> + Send>(
        &self,
        user_id: Uuid,
        name: T,
    ) -> Result<User, sqlx::Error>;

    async fn update_user_role(
        &self,
        target_id: Uuid,
        role: UserRole,
    ) -> Result<User, sqlx::Error>;

    async fn update_user_password(
        &self,
        user_id: Uuid,
        password: String,
    ) -> Result<User, sqlx::Error>;

    async fn add_verifed_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>;

    async fn verifed_token(&self, token: &str) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
        token: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, name, email, password, phone, role, approved,
                    verification_token, token_expires_at,
                    created_at, updated_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, name, email, password, phone, role, approved,
                    verification_token, token_expires_at,
                    created_at, updated_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(token) = token {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, name, email, password, phone, role, approved,
                    verification_token, token_expires_at,
                    created_at, updated_at
                FROM users
                WHERE verification_token = $1
                "#,
            )
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_users(&self, page: u32, limit: usize) -> Result<Vec<User>, sqlx::Error> {
        let offset = (page - 1) * limit as u32;

        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, name, email, password, phone, role, approved,
                verification_token, token_expires_at,
                created_at, updated_at
            FROM users
            ORDER BY created_at DESC LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_user_count(&self) -> Result<i64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM users"#)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        email: T,
        password: T,
        phone: Option<String>,
        role: UserRole,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, phone, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, name, email, password, phone, role, approved,
                verification_token, token_expires_at,
                created_at, updated_at
            "#,
        )
        .bind(name.into())
        .bind(email.into())
        .bind(password.into())
        .bind(phone)
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_pending_users(&self, page: u32, limit: usize) -> Result<Vec<User>, sqlx::Error> {
        let offset = (page - 1) * limit as u32;

        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, name, email, password, phone, role, approved,
                verification_token, token_expires_at,
                created_at, updated_at
            FROM users
            WHERE approved = false
            ORDER BY created_at ASC LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
    }

    async fn approve_user(&self, user_id: Uuid) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET approved = true, updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, name, email, password, phone, role, approved,
                verification_token, token_expires_at,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_users_by_role(&self, role: UserRole) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, name, email, password, phone, role, approved,
                verification_token, token_expires_at,
                created_at, updated_at
            FROM users
            WHERE role = $1 AND approved = true
            ORDER BY created_at ASC
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_user_name<T: Into<String> + Send>(
        &self,
        user_id: Uuid,
        new_name: T,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING
                id, name, email, password, phone, role, approved,
                verification_token, token_expires_at,
                created_at, updated_at
            "#,
        )
        .bind(new_name.into())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_role(
        &self,
        target_id: Uuid,
        new_role: UserRole,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING
                id, name, email, password, phone, role, approved,
                verification_token, token_expires_at,
                created_at, updated_at
            "#,
        )
        .bind(new_role)
        .bind(target_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_password(
        &self,
        user_id: Uuid,
        new_password: String,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING
                id, name, email, password, phone, role, approved,
                verification_token, token_expires_at,
                created_at, updated_at
            "#,
        )
        .bind(new_password)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn add_verifed_token(
        &self,
        user_id: Uuid,
        token: &str,
        token_expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET verification_token = $1, token_expires_at = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(token)
        .bind(token_expires_at)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn verifed_token(&self, token: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET updated_at = NOW(),
                verification_token = NULL,
                token_expires_at = NULL
            WHERE verification_token = $1
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
