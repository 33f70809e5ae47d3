// Domain layer - Dashboard data, session state machine and business rules
pub mod dashboard;
pub mod error;
pub mod offer;
pub mod session;
pub mod upload;
pub mod user;
