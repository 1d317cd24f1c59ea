pub mod assignmentmodel;
pub mod jobmodel;
pub mod messagemodel;
pub mod notificationmodel;
pub mod reportmodel;
pub mod usermodel;
