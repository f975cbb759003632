use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{non_negative_id, one_of, ValidationError, ValidationResult};

pub const INFRACTION_TYPES: &[&str] = &[
    "note",
    "warning",
    "watch",
    "mute",
    "kick",
    "ban",
    "superstar",
    "voice_ban",
    "voice_mute",
];

/// An infraction applied to a Discord user by a moderator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Infraction {
    pub id: i64,
    pub inserted_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub reason: Option<String>,
    pub hidden: bool,
    #[serde(rename = "actor")]
    pub actor_id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
}

/// Input for a new infraction. `inserted_at` defaults to now.
#[derive(Debug, Clone)]
pub struct NewInfraction {
    pub inserted_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub kind: String,
    pub reason: Option<String>,
    pub hidden: bool,
    pub actor_id: i64,
    pub user_id: i64,
}

impl Infraction {
    pub fn new(id: i64, draft: NewInfraction) -> ValidationResult<Self> {
        let inserted_at = draft.inserted_at.unwrap_or_else(Utc::now);
        if let Some(expires_at) = draft.expires_at {
            if expires_at <= inserted_at {
                return Err(ValidationError::new(
                    "An infraction cannot expire before it was inserted.",
                ));
            }
        }
        Ok(Self {
            id,
            inserted_at,
            expires_at: draft.expires_at,
            active: draft.active,
            kind: one_of("Infraction type", draft.kind, INFRACTION_TYPES)?,
            reason: draft.reason,
            hidden: draft.hidden,
            actor_id: non_negative_id("Actor", draft.actor_id)?,
            user_id: non_negative_id("User", draft.user_id)?,
        })
    }
}
