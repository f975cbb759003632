use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::store::Entity;
use super::validation::{ValidationError, ValidationResult};

pub const MAX_NAME_LENGTH: usize = 96;

/// Characters Discord renders differently or forbids in channel names, mapped to
/// look-alikes the bot substitutes.
const SPECIAL_CHARACTERS: &[char] = &['-', '’', '\'', 'ǃ', '？', '<', '>', '⧹', '⧸'];

/// Mathematical sans-serif capitals, used for upper case letters.
const SANS_SERIF_CAPITALS: std::ops::RangeInclusive<char> = '\u{1D5A0}'..='\u{1D5B9}';

/// A name the bot rotates through for the off-topic channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OffTopicChannelName {
    pub name: String,
    pub used: bool,
}

impl OffTopicChannelName {
    pub fn new(name: impl Into<String>) -> ValidationResult<Self> {
        Ok(Self {
            name: validate_name(name.into())?,
            used: false,
        })
    }
}

pub fn validate_name(name: String) -> ValidationResult<String> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LENGTH || !name.chars().all(is_allowed) {
        return Err(ValidationError::new(format!(
            "{name} is not a valid Off Topic channel name!"
        )));
    }
    Ok(name)
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_lowercase()
        || c.is_ascii_digit()
        || SPECIAL_CHARACTERS.contains(&c)
        || SANS_SERIF_CAPITALS.contains(&c)
}

impl Entity for OffTopicChannelName {
    type Key = String;
    type Filter = ();
    type Draft = OffTopicChannelName;

    const NAME: &'static str = "off topic channel name";

    fn key(&self) -> String {
        self.name.clone()
    }

    fn matches(&self, _filter: &()) -> bool {
        true
    }

    fn from_draft(draft: OffTopicChannelName, _generated_id: i64) -> Self {
        draft
    }
}
