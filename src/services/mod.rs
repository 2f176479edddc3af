pub mod auth_service;
pub mod plan_service;
pub mod schedule_service;
pub mod statistics_service;
pub mod student_service;

pub use auth_service::*;
pub use plan_service::*;
pub use schedule_service::*;
pub use statistics_service::*;
pub use student_service::*;
