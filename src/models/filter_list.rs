use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{length_between, one_of, ValidationResult};

pub const FILTER_LIST_TYPES: &[&str] = &[
    "GUILD_INVITE",
    "FILE_FORMAT",
    "DOMAIN_NAME",
    "FILTER_TOKEN",
    "REDIRECT",
];

/// An item on an allow or deny list used by the bot's filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterList {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    pub allowed: bool,
    pub content: String,
    pub comment: Option<String>,
}

impl FilterList {
    pub fn new(
        id: i64,
        kind: impl Into<String>,
        allowed: bool,
        content: impl Into<String>,
        comment: Option<String>,
    ) -> ValidationResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id,
            created_at: now,
            updated_at: now,
            kind: one_of("filter list type", kind.into(), FILTER_LIST_TYPES)?,
            allowed,
            content: length_between("Filter content", content.into(), 1, usize::MAX)?,
            comment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_types() {
        let item = FilterList::new(1, "FILE_FORMAT", true, ".py", None).unwrap();
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn rejects_unknown_type_and_empty_content() {
        assert_eq!(
            FilterList::new(1, "file_format", true, ".py", None).unwrap_err().message,
            "file_format is not a valid filter list type!"
        );
        assert!(FilterList::new(1, "REDIRECT", false, "", None).is_err());
    }
}
