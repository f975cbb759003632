use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::store::Entity;
use super::validation::{length_between, non_negative_id, non_negative_ids, ValidationError, ValidationResult};

/// A Discord user known to the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub discriminator: i16,
    pub in_guild: bool,
    pub roles: Vec<i64>,
}

impl User {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        discriminator: i16,
        in_guild: bool,
        roles: Vec<i64>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            id: non_negative_id("User", id)?,
            name: length_between("User name", name.into(), 1, 32)?,
            discriminator: validate_discriminator(discriminator)?,
            in_guild,
            // Only the sign is checked. Whether each role exists is left to the caller.
            roles: non_negative_ids("Role", roles)?,
        })
    }
}

fn validate_discriminator(discriminator: i16) -> ValidationResult<i16> {
    if !(0..=9999).contains(&discriminator) {
        return Err(ValidationError::new(
            "Discriminators must be between 0 and 9999.",
        ));
    }
    Ok(discriminator)
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub in_guild: Option<bool>,
}

impl Entity for User {
    type Key = i64;
    type Filter = UserFilter;
    type Draft = User;

    const NAME: &'static str = "user";

    fn key(&self) -> i64 {
        self.id
    }

    fn matches(&self, filter: &UserFilter) -> bool {
        filter.in_guild.map_or(true, |in_guild| self.in_guild == in_guild)
    }

    fn from_draft(draft: User, _generated_id: i64) -> Self {
        draft
    }
}
