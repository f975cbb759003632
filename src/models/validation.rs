use thiserror::Error;

/// A field rule was violated. The message is shown to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Discord snowflakes and other identifiers are never negative.
pub fn non_negative_id(kind: &str, id: i64) -> ValidationResult<i64> {
    if id < 0 {
        return Err(ValidationError::new(format!("{kind} IDs cannot be negative.")));
    }
    Ok(id)
}

/// Applies `non_negative_id` to every element, e.g. role or mention lists.
pub fn non_negative_ids(kind: &str, ids: Vec<i64>) -> ValidationResult<Vec<i64>> {
    for id in &ids {
        non_negative_id(kind, *id)?;
    }
    Ok(ids)
}

/// Character-counted length bounds, inclusive on both ends.
pub fn length_between(field: &str, value: String, min: usize, max: usize) -> ValidationResult<String> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::new(if min == 1 {
            format!("{field} must not be empty.")
        } else {
            format!("{field} must be at least {min} characters long.")
        }));
    }
    if len > max {
        return Err(ValidationError::new(format!(
            "{field} must be at most {max} characters long."
        )));
    }
    Ok(value)
}

pub fn one_of(field: &str, value: String, choices: &[&str]) -> ValidationResult<String> {
    if choices.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(ValidationError::new(format!("{value} is not a valid {field}!")))
    }
}
