pub mod error;
pub mod notification_service;
pub mod pdf_service;
pub mod reference;
pub mod template_service;
pub mod workflow_service;
