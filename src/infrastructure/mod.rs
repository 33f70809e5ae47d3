// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod credential_store;
pub mod gemini_client;
pub mod response_schema;
