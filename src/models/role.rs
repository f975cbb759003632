use serde::{Deserialize, Serialize};

use super::validation::{length_between, non_negative_id, ValidationError, ValidationResult};

/// A role on the Discord server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub colour: i32,
    pub permissions: i64,
    pub position: i32,
}

impl Role {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        colour: i32,
        permissions: i64,
        position: i32,
    ) -> ValidationResult<Self> {
        Ok(Self {
            id: non_negative_id("Role", id)?,
            name: length_between("Role name", name.into(), 1, 100)?,
            colour: non_negative("Colour", colour.into())? as i32,
            permissions: non_negative("Permissions", permissions)?,
            position: non_negative("Position", position.into())? as i32,
        })
    }
}

fn non_negative(field: &str, value: i64) -> ValidationResult<i64> {
    if value < 0 {
        return Err(ValidationError::new(format!("{field} cannot be negative.")));
    }
    Ok(value)
}
