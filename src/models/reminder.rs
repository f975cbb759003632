use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::store::Entity;
use super::validation::{length_between, non_negative_id, non_negative_ids, ValidationError, ValidationResult};

/// A reminder created by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Reminder {
    pub id: i64,
    pub active: bool,
    pub channel_id: i64,
    pub content: String,
    pub expiration: DateTime<Utc>,
    #[serde(rename = "author")]
    pub author_id: i64,
    pub jump_url: String,
    pub mentions: Vec<i64>,
    pub failures: i32,
}

/// Validated input for a new reminder. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
    pub author_id: i64,
    pub mentions: Vec<i64>,
    pub content: String,
    pub expiration: DateTime<Utc>,
    pub channel_id: i64,
    pub jump_url: String,
}

impl NewReminder {
    pub fn new(
        author_id: i64,
        mentions: Vec<i64>,
        content: String,
        expiration: DateTime<Utc>,
        channel_id: i64,
        jump_url: String,
    ) -> ValidationResult<Self> {
        Ok(Self {
            author_id: non_negative_id("Author", author_id)?,
            mentions: non_negative_ids("Mention", mentions)?,
            content: validate_content(content)?,
            expiration,
            channel_id: non_negative_id("Channel", channel_id)?,
            jump_url: length_between("Jump URL", jump_url, 1, 88)?,
        })
    }
}

/// Fields a client may change on an existing reminder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderPatch {
    pub mentions: Option<Vec<i64>>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "super::datetime::deserialize_option")]
    pub expiration: Option<DateTime<Utc>>,
    pub failures: Option<i32>,
}

impl ReminderPatch {
    pub fn is_empty(&self) -> bool {
        self.mentions.is_none()
            && self.content.is_none()
            && self.expiration.is_none()
            && self.failures.is_none()
    }
}

impl Reminder {
    /// Apply a patch, running the same field rules as creation. On error the
    /// reminder is left untouched.
    pub fn apply(&mut self, patch: ReminderPatch) -> ValidationResult<()> {
        let mut updated = self.clone();
        if let Some(mentions) = patch.mentions {
            updated.mentions = non_negative_ids("Mention", mentions)?;
        }
        if let Some(content) = patch.content {
            updated.content = validate_content(content)?;
        }
        if let Some(expiration) = patch.expiration {
            updated.expiration = expiration;
        }
        if let Some(failures) = patch.failures {
            if failures < 0 {
                return Err(ValidationError::new("Failures cannot be negative."));
            }
            updated.failures = failures;
        }
        *self = updated;
        Ok(())
    }
}

fn validate_content(content: String) -> ValidationResult<String> {
    length_between("Reminder content", content, 1, 1500)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderFilter {
    pub author_id: Option<i64>,
    pub active: Option<bool>,
}

impl ReminderFilter {
    pub fn is_empty(&self) -> bool {
        self.author_id.is_none() && self.active.is_none()
    }
}

impl Entity for Reminder {
    type Key = i64;
    type Filter = ReminderFilter;
    type Draft = NewReminder;

    const NAME: &'static str = "reminder";

    fn key(&self) -> i64 {
        self.id
    }

    fn matches(&self, filter: &ReminderFilter) -> bool {
        filter.author_id.map_or(true, |author| self.author_id == author)
            && filter.active.map_or(true, |active| self.active == active)
    }

    fn from_draft(draft: NewReminder, generated_id: i64) -> Self {
        Self {
            id: generated_id,
            active: true,
            channel_id: draft.channel_id,
            content: draft.content,
            expiration: draft.expiration,
            author_id: draft.author_id,
            jump_url: draft.jump_url,
            mentions: draft.mentions,
            failures: 0,
        }
    }
}
