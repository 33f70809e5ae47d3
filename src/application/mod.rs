// Application layer - Use cases and the ports they depend on
pub mod auth_service;
pub mod credential_store;
pub mod dashboard_service;
pub mod sales_analyzer;
