use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{sort_newest_first, ProfileStore, StorageError, StorageResult};
use crate::profile::{generate_profile_id, ProfileDraft, ProfileRecord, ProfileSummary};

const PROFILE_KEY_PREFIX: &str = "profile_";

/// Key holding the JSON array of summaries.
pub const SAVED_PROFILES_KEY: &str = "saved_profiles";

/// String key-value store laid out like browser local storage:
/// `profile_<id>` holds the record JSON and `saved_profiles` the summary list.
///
/// Lives only as long as the process. Ids are not checked for collisions.
#[derive(Default)]
pub struct LocalStore {
    entries: Mutex<HashMap<String, String>>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value under `key`, as a browser devtools panel would show it.
    #[cfg(test)]
    async fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    #[cfg(test)]
    async fn set_raw(&self, key: &str, value: impl Into<String>) {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.into());
    }
}

fn profile_key(id: &str) -> String {
    format!("{}{}", PROFILE_KEY_PREFIX, id)
}

fn read_summaries(entries: &HashMap<String, String>) -> Vec<ProfileSummary> {
    let Some(json) = entries.get(SAVED_PROFILES_KEY) else {
        return Vec::new();
    };
    serde_json::from_str(json).unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable {} list: {}", SAVED_PROFILES_KEY, e);
        Vec::new()
    })
}

fn write_summaries(
    entries: &mut HashMap<String, String>,
    summaries: &[ProfileSummary],
) -> StorageResult<()> {
    entries.insert(
        SAVED_PROFILES_KEY.to_string(),
        serde_json::to_string(summaries)?,
    );
    Ok(())
}

#[async_trait]
impl ProfileStore for LocalStore {
    async fn save(&self, draft: ProfileDraft) -> StorageResult<ProfileRecord> {
        let record = ProfileRecord::publish(generate_profile_id(), draft, Utc::now());
        let json = serde_json::to_string(&record)?;

        let mut entries = self.entries.lock().await;
        let mut summaries = read_summaries(&entries);
        summaries.push(record.summary());
        write_summaries(&mut entries, &summaries)?;
        entries.insert(profile_key(&record.id), json);

        tracing::info!("Saved profile {}", record.id);
        Ok(record)
    }

    async fn get(&self, id: &str) -> StorageResult<ProfileRecord> {
        let entries = self.entries.lock().await;
        let json = entries
            .get(&profile_key(id))
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        serde_json::from_str(json).map_err(|e| {
            tracing::warn!("Profile {} is unreadable: {}", id, e);
            StorageError::NotFound(id.to_string())
        })
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().await;
        entries.remove(&profile_key(id));

        let mut summaries = read_summaries(&entries);
        summaries.retain(|summary| summary.id != id);
        write_summaries(&mut entries, &summaries)?;

        tracing::info!("Deleted profile {}", id);
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<ProfileSummary>> {
        let mut summaries = read_summaries(&*self.entries.lock().await);
        sort_newest_first(&mut summaries);
        Ok(summaries)
    }
}
