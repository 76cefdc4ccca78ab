mod file;
mod local;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::profile::{ProfileDraft, ProfileRecord, ProfileSummary};

pub use self::file::{FileStore, MAX_ID_ATTEMPTS};
pub use self::local::{LocalStore, SAVED_PROFILES_KEY};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No free profile id after {attempts} attempts")]
    IdExhausted { attempts: u32 },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence for published profiles.
///
/// A deployment uses exactly one implementation; the rest of the app only
/// sees this trait.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Assign an id to the draft and persist it once.
    async fn save(&self, draft: ProfileDraft) -> StorageResult<ProfileRecord>;

    /// Absent or unreadable records are `NotFound`.
    async fn get(&self, id: &str) -> StorageResult<ProfileRecord>;

    async fn delete(&self, id: &str) -> StorageResult<()>;

    /// Summaries, newest first.
    async fn list(&self) -> StorageResult<Vec<ProfileSummary>>;
}

/// Open the backend selected in config.
pub fn open_store(config: &Config) -> Arc<dyn ProfileStore> {
    match config.storage.backend {
        StorageBackend::File => {
            let path = config.profiles_path();
            tracing::info!("Using file profile store at {}", path.display());
            Arc::new(FileStore::new(path))
        }
        StorageBackend::Local => {
            tracing::info!("Using in-process local profile store");
            Arc::new(LocalStore::new())
        }
    }
}

/// Newest first, as the archive shows them.
fn sort_newest_first(summaries: &mut [ProfileSummary]) {
    summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
