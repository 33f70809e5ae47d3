// Credential store implementations: JSON file on disk and in-memory
use crate::application::credential_store::CredentialStore;
use crate::domain::user::StoredUser;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

/// Key-value map persisted as one JSON document. Unencrypted.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_all(&self) -> Result<HashMap<String, StoredUser>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }

    async fn write_all(&self, entries: &HashMap<String, StoredUser>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self, key: &str) -> Result<Option<StoredUser>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn save(&self, key: &str, user: &StoredUser) -> Result<()> {
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), user.clone());
        self.write_all(&entries).await?;
        tracing::debug!(path = %self.path.display(), key, "credential record saved");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, StoredUser>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self, key: &str) -> Result<Option<StoredUser>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow::anyhow!("credential map lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    async fn save(&self, key: &str, user: &StoredUser) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("credential map lock poisoned"))?;
        entries.insert(key.to_string(), user.clone());
        Ok(())
    }
}
