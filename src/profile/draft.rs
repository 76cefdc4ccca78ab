//! Editor operations on a [`ProfileDraft`].
//!
//! The editor has a single editing state. Every submitted action either
//! edits the draft and stays there, asks for a preview, or asks to publish,
//! which is only allowed once the draft validates.

use base64::{engine::general_purpose, Engine};
use std::str::FromStr;

use super::{ProfileDraft, Topic, ValidationError, MAX_TOPICS, MIN_TOPICS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicField {
    Question,
    Answer,
}

/// An action submitted from the editor form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Re-render with the submitted fields (also used after an image upload).
    Refresh,
    AddTopic,
    RemoveTopic(String),
    RemoveImage,
    Preview,
    Publish,
}

/// Where the editor goes after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorStep {
    Editing,
    Previewing,
    ReadyToPublish,
}

impl FromStr for EditorAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "refresh" => Ok(Self::Refresh),
            "add_topic" => Ok(Self::AddTopic),
            "remove_image" => Ok(Self::RemoveImage),
            "preview" => Ok(Self::Preview),
            "publish" => Ok(Self::Publish),
            other => match other.strip_prefix("remove_topic:") {
                Some(id) if !id.is_empty() => Ok(Self::RemoveTopic(id.to_string())),
                _ => Err(format!("Unknown editor action: {}", other)),
            },
        }
    }
}

impl ProfileDraft {
    /// A fresh draft with one empty topic.
    pub fn new() -> Self {
        Self {
            topics: vec![Topic::blank()],
            ..Self::default()
        }
    }

    /// Embed an uploaded image as a data URL of at most `max_len` bytes.
    ///
    /// The data URL is resubmitted with every later editor action, so the
    /// limit applies to the encoded form, not the upload.
    pub fn set_image(
        &mut self,
        mime: &str,
        bytes: &[u8],
        max_len: usize,
    ) -> Result<(), ValidationError> {
        if !mime.starts_with("image/") {
            return Err(ValidationError::InvalidImage);
        }
        let header = format!("data:{};base64,", mime);
        let encoded_len = bytes.len().div_ceil(3) * 4;
        if header.len() + encoded_len > max_len {
            return Err(ValidationError::ImageTooLarge { max: max_len });
        }
        self.profile_image = header + &general_purpose::STANDARD.encode(bytes);
        Ok(())
    }

    pub fn clear_image(&mut self) {
        self.profile_image.clear();
    }

    /// Append an empty topic. Returns false when already at the limit.
    pub fn add_topic(&mut self) -> bool {
        if self.topics.len() >= MAX_TOPICS {
            return false;
        }
        self.topics.push(Topic::blank());
        true
    }

    /// Remove a topic by id. The last remaining topic is kept.
    pub fn remove_topic(&mut self, id: &str) -> bool {
        if self.topics.len() <= MIN_TOPICS {
            return false;
        }
        let before = self.topics.len();
        self.topics.retain(|topic| topic.id != id);
        self.topics.len() != before
    }

    pub fn update_topic(&mut self, id: &str, field: TopicField, value: &str) -> bool {
        match self.topics.iter_mut().find(|topic| topic.id == id) {
            Some(topic) => {
                match field {
                    TopicField::Question => topic.question = value.to_string(),
                    TopicField::Answer => topic.answer = value.to_string(),
                }
                true
            }
            None => false,
        }
    }

    /// Whether the publish button should be enabled.
    pub fn can_publish(&self) -> bool {
        !self.name.trim().is_empty() && !self.name_romaji.trim().is_empty()
    }

    pub fn apply(&mut self, action: EditorAction) -> Result<EditorStep, ValidationError> {
        match action {
            EditorAction::Refresh => {}
            EditorAction::AddTopic => {
                self.add_topic();
            }
            EditorAction::RemoveTopic(id) => {
                self.remove_topic(&id);
            }
            EditorAction::RemoveImage => self.clear_image(),
            EditorAction::Preview => return Ok(EditorStep::Previewing),
            EditorAction::Publish => {
                self.validate()?;
                return Ok(EditorStep::ReadyToPublish);
            }
        }
        Ok(EditorStep::Editing)
    }
}
