// Storage trait for the locally persisted user record
use crate::domain::user::StoredUser;
use async_trait::async_trait;

/// Fixed application-wide key of the single credential slot.
pub const USER_KEY: &str = "supermarketUser";

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the record stored under `key`, if any
    async fn load(&self, key: &str) -> anyhow::Result<Option<StoredUser>>;

    /// Store `user` under `key`, replacing whatever was there
    async fn save(&self, key: &str, user: &StoredUser) -> anyhow::Result<()>;
}
