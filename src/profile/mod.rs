pub mod draft;
pub mod id;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use self::draft::{EditorAction, EditorStep, TopicField};
pub use self::id::{generate_profile_id, is_valid_profile_id, PROFILE_ID_LEN};

/// Upper bound on topics per profile.
pub const MAX_TOPICS: usize = 5;

/// Topic count the editor never goes below.
pub const MIN_TOPICS: usize = 1;

/// One question/answer pair. `id` only distinguishes topics inside a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl Topic {
    pub fn blank() -> Self {
        Self {
            id: uuid::Uuid::now_v7().simple().to_string(),
            question: String::new(),
            answer: String::new(),
        }
    }

    /// Only complete topics appear on a published page.
    pub fn is_complete(&self) -> bool {
        !self.question.is_empty() && !self.answer.is_empty()
    }
}

/// The editable part of a profile, as submitted by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    /// Empty, or a `data:image/...;base64,` URL.
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_romaji: String,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

/// A published profile as persisted by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub id: String,
    #[serde(flatten)]
    pub draft: ProfileDraft,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing entry for the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub name_romaji: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name is required")]
    MissingName,

    #[error("Romanized name is required")]
    MissingNameRomaji,

    #[error("At most {max} topics are allowed")]
    TooManyTopics { max: usize },

    #[error("Profile image must be an embedded image")]
    InvalidImage,

    #[error("Profile image is larger than {max} bytes once embedded")]
    ImageTooLarge { max: usize },
}

impl ProfileDraft {
    /// Check the fields required to publish.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.name_romaji.trim().is_empty() {
            return Err(ValidationError::MissingNameRomaji);
        }
        if self.topics.len() > MAX_TOPICS {
            return Err(ValidationError::TooManyTopics { max: MAX_TOPICS });
        }
        if !self.profile_image.is_empty() && !self.profile_image.starts_with("data:image/") {
            return Err(ValidationError::InvalidImage);
        }
        Ok(())
    }

    pub fn visible_topics(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter().filter(|topic| topic.is_complete())
    }
}

impl ProfileRecord {
    /// Stamp a draft with its id and creation time.
    pub fn publish(id: String, draft: ProfileDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            draft,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            id: self.id.clone(),
            name: self.draft.name.clone(),
            name_romaji: self.draft.name_romaji.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(question: &str, answer: &str) -> Topic {
        Topic {
            id: format!("{}-{}", question, answer),
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    fn valid_draft() -> ProfileDraft {
        ProfileDraft {
            profile_image: String::new(),
            name: "山田太郎".to_string(),
            name_romaji: "Taro Yamada".to_string(),
            topics: vec![topic("好きなお味噌汁の具", "豆腐")],
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(valid_draft().validate(), Ok(()));
    }

    #[test]
    fn blank_name_is_rejected() {
        let draft = ProfileDraft {
            name: "   ".to_string(),
            ..valid_draft()
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingName));
    }

    #[test]
    fn missing_romaji_is_rejected() {
        let draft = ProfileDraft {
            name_romaji: String::new(),
            ..valid_draft()
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingNameRomaji));
    }

    #[test]
    fn six_topics_are_rejected() {
        let draft = ProfileDraft {
            topics: (0..6).map(|i| topic(&i.to_string(), "a")).collect(),
            ..valid_draft()
        };
        assert_eq!(
            draft.validate(),
            Err(ValidationError::TooManyTopics { max: 5 })
        );
    }

    #[test]
    fn zero_topics_still_validate() {
        let draft = ProfileDraft {
            topics: Vec::new(),
            ..valid_draft()
        };
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn non_data_url_image_is_rejected() {
        let draft = ProfileDraft {
            profile_image: "javascript:alert(1)".to_string(),
            ..valid_draft()
        };
        assert_eq!(draft.validate(), Err(ValidationError::InvalidImage));

        let draft = ProfileDraft {
            profile_image: "data:image/png;base64,AAAA".to_string(),
            ..valid_draft()
        };
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn partially_filled_topics_are_hidden() {
        let draft = ProfileDraft {
            topics: vec![
                topic("q1", "a1"),
                topic("q2", ""),
                topic("", "a3"),
                topic("q4", "a4"),
            ],
            ..valid_draft()
        };
        let visible: Vec<&str> = draft.visible_topics().map(|t| t.question.as_str()).collect();
        assert_eq!(visible, vec!["q1", "q4"]);
        assert_eq!(draft.topics.len(), 4);
    }

    #[test]
    fn record_serializes_with_camel_case_fields() {
        let record = ProfileRecord::publish("aB3dE6gH".to_string(), valid_draft(), Utc::now());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "aB3dE6gH");
        assert_eq!(json["nameRomaji"], "Taro Yamada");
        assert_eq!(json["profileImage"], "");
        assert!(json["createdAt"].is_string());
        assert!(json["updatedAt"].is_string());
        assert_eq!(json["topics"][0]["answer"], "豆腐");

        let back: ProfileRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn draft_accepts_missing_fields() {
        let draft: ProfileDraft = serde_json::from_str(r#"{"name":"a"}"#).unwrap();
        assert_eq!(draft.name, "a");
        assert!(draft.topics.is_empty());
        assert!(draft.profile_image.is_empty());
    }

    #[test]
    fn summary_copies_identity_fields() {
        let record = ProfileRecord::publish("aB3dE6gH".to_string(), valid_draft(), Utc::now());
        let summary = record.summary();
        assert_eq!(summary.id, record.id);
        assert_eq!(summary.name, "山田太郎");
        assert_eq!(summary.name_romaji, "Taro Yamada");
        assert_eq!(summary.created_at, record.created_at);
    }
}
