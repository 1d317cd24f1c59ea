pub mod assignmentdb;
pub mod db;
pub mod jobdb;
pub mod messagedb;
pub mod reportdb;
pub mod userdb;

pub use assignmentdb::AssignmentExt;
pub use jobdb::JobExt;
pub use messagedb::MessageExt;
pub use reportdb::ReportExt;
pub use userdb::UserExt;
