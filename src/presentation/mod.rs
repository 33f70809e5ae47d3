// Presentation layer - HTTP surface over the dashboard session
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod router;
pub mod view;
