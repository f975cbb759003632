use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{non_negative_id, ValidationError, ValidationResult};

/// A message that tripped a filter and is scheduled for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffensiveMessage {
    pub id: i64,
    pub channel_id: i64,
    pub delete_date: DateTime<Utc>,
}

impl OffensiveMessage {
    pub fn new(id: i64, channel_id: i64, delete_date: DateTime<Utc>) -> ValidationResult<Self> {
        if delete_date <= Utc::now() {
            return Err(ValidationError::new("Date must be a future date"));
        }
        Ok(Self {
            id: non_negative_id("Message", id)?,
            channel_id: non_negative_id("Channel", channel_id)?,
            delete_date,
        })
    }
}
