pub mod assignmentdtos;
pub mod jobdtos;
pub mod reportdtos;
pub mod userdtos;

pub use assignmentdtos::*;
pub use jobdtos::*;
pub use reportdtos::*;
pub use userdtos::*;
