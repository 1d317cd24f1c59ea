pub mod assignments;
pub mod auth;
pub mod jobs;
pub mod messages;
pub mod notifications;
pub mod reports;
pub mod templates;
pub mod users;
