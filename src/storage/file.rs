use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{sort_newest_first, ProfileStore, StorageError, StorageResult};
use crate::profile::{
    generate_profile_id, is_valid_profile_id, ProfileDraft, ProfileRecord, ProfileSummary,
};

/// How many fresh ids `save` tries before giving up.
pub const MAX_ID_ATTEMPTS: u32 = 10;

type IdGenerator = Box<dyn Fn() -> String + Send + Sync>;

/// One pretty-printed `<id>.json` per profile inside a directory.
///
/// There is no locking between the existence check and the write; two
/// concurrent publishes drawing the same id would overwrite each other.
pub struct FileStore {
    dir: PathBuf,
    generate_id: IdGenerator,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_id_generator(dir, generate_profile_id)
    }

    pub fn with_id_generator(
        dir: impl Into<PathBuf>,
        generate_id: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            dir: dir.into(),
            generate_id: Box::new(generate_id),
        }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    async fn free_id(&self) -> StorageResult<String> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = (self.generate_id)();
            if !tokio::fs::try_exists(self.path_for(&id)).await? {
                return Ok(id);
            }
            tracing::warn!(
                "Profile id {} already taken (attempt {}/{})",
                id,
                attempt,
                MAX_ID_ATTEMPTS
            );
        }
        Err(StorageError::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }
}

#[async_trait]
impl ProfileStore for FileStore {
    async fn save(&self, draft: ProfileDraft) -> StorageResult<ProfileRecord> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let id = self.free_id().await?;
        let record = ProfileRecord::publish(id, draft, Utc::now());
        let json = serde_json::to_string_pretty(&record)?;
        tokio::fs::write(self.path_for(&record.id), json).await?;

        tracing::info!("Saved profile {}", record.id);
        Ok(record)
    }

    async fn get(&self, id: &str) -> StorageResult<ProfileRecord> {
        if !is_valid_profile_id(id) {
            return Err(StorageError::NotFound(id.to_string()));
        }

        let json = match tokio::fs::read_to_string(self.path_for(id)).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&json).map_err(|e| {
            tracing::warn!("Profile {} is unreadable: {}", id, e);
            StorageError::NotFound(id.to_string())
        })
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        if !is_valid_profile_id(id) {
            return Err(StorageError::NotFound(id.to_string()));
        }

        // A missing file is a failure here, not a no-op.
        tokio::fs::remove_file(self.path_for(id)).await?;
        tracing::info!("Deleted profile {}", id);
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<ProfileSummary>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let parsed = match tokio::fs::read_to_string(&path).await {
                Ok(json) => serde_json::from_str::<ProfileRecord>(&json).map_err(StorageError::from),
                Err(e) => Err(StorageError::from(e)),
            };

            match parsed {
                Ok(record) => summaries.push(record.summary()),
                Err(e) => {
                    tracing::warn!("Skipping unreadable profile file {}: {}", path.display(), e);
                }
            }
        }

        sort_newest_first(&mut summaries);
        Ok(summaries)
    }
}
