use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::validation::{length_between, non_negative_id, ValidationError, ValidationResult};

const EMBED_KEYS: &[&str] = &[
    "title",
    "type",
    "description",
    "url",
    "timestamp",
    "color",
    "footer",
    "image",
    "thumbnail",
    "video",
    "provider",
    "author",
    "fields",
];

/// An embed must carry at least one of these, and each present one must be non-empty.
const EMBED_CONTENT_KEYS: &[&str] = &["description", "fields", "image", "title", "video"];

const FIELD_KEYS: &[&str] = &["name", "value", "inline"];
const FOOTER_KEYS: &[&str] = &["text", "icon_url", "proxy_icon_url"];
const AUTHOR_KEYS: &[&str] = &["name", "url", "icon_url", "proxy_icon_url"];

/// A message sent somewhere on the Discord server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub channel_id: i64,
    #[serde(rename = "author")]
    pub author_id: i64,
    pub content: String,
    pub embeds: Vec<Value>,
    pub attachments: Vec<String>,
}

impl Message {
    pub fn new(
        id: i64,
        channel_id: i64,
        author_id: i64,
        content: impl Into<String>,
        embeds: Vec<Value>,
        attachments: Vec<String>,
    ) -> ValidationResult<Self> {
        for embed in &embeds {
            validate_embed(embed)?;
        }
        for attachment in &attachments {
            if attachment.chars().count() > 512 {
                return Err(ValidationError::new(
                    "Attachment URL must be at most 512 characters long.",
                ));
            }
        }
        Ok(Self {
            id: non_negative_id("Message", id)?,
            channel_id: non_negative_id("Channel", channel_id)?,
            author_id: non_negative_id("Author", author_id)?,
            content: length_between("Message content", content.into(), 0, 4000)?,
            embeds,
            attachments,
        })
    }
}

/// Checks a JSON embed against the limits the Discord API enforces, so anything
/// stored here can be sent back to Discord unchanged.
pub fn validate_embed(embed: &Value) -> ValidationResult<()> {
    let embed = embed
        .as_object()
        .ok_or_else(|| ValidationError::new("Embed must be a mapping."))?;
    if embed.is_empty() {
        return Err(ValidationError::new("Embed must not be empty."));
    }

    if let Some(key) = embed.keys().find(|key| !EMBED_KEYS.contains(&key.as_str())) {
        return Err(ValidationError::new(format!("Unknown field name: '{key}'")));
    }
    if !EMBED_CONTENT_KEYS.iter().any(|key| embed.contains_key(*key)) {
        return Err(ValidationError::new(format!(
            "Embed must contain one of the fields {}.",
            EMBED_CONTENT_KEYS.join(", ")
        )));
    }
    for key in EMBED_CONTENT_KEYS {
        if embed.get(*key).is_some_and(is_empty_value) {
            return Err(ValidationError::new(format!("Key '{key}' must not be empty.")));
        }
    }

    if let Some(title) = embed.get("title") {
        let len = text_len(title, "Embed title")?;
        if len > 256 {
            return Err(ValidationError::new("Reached max length of embed title"));
        }
    }
    if let Some(description) = embed.get("description") {
        if text_len(description, "Embed description")? > 4096 {
            return Err(ValidationError::new("Reached max length of embed description"));
        }
    }
    if let Some(fields) = embed.get("fields") {
        let fields = fields
            .as_array()
            .ok_or_else(|| ValidationError::new("Embed fields must be a list."))?;
        for field in fields {
            validate_field(field)?;
        }
    }
    if let Some(footer) = embed.get("footer") {
        validate_footer(footer)?;
    }
    if let Some(author) = embed.get("author") {
        validate_author(author)?;
    }
    Ok(())
}

fn validate_field(field: &Value) -> ValidationResult<()> {
    let field = mapping(field, "Embed fields must be a mapping.")?;
    unknown_keys(field, FIELD_KEYS, "embed field")?;
    let (Some(name), Some(value)) = (field.get("name"), field.get("value")) else {
        return Err(ValidationError::new(
            "Embed fields must contain the following fields: name, value.",
        ));
    };
    if text_len(name, "Embed field-name")? > 256 {
        return Err(ValidationError::new("Embed field-name length reached max limit."));
    }
    if text_len(value, "Embed field-value")? > 1024 {
        return Err(ValidationError::new("Embed field-value length reached max limit."));
    }
    if let Some(inline) = field.get("inline") {
        if !inline.is_boolean() {
            return Err(ValidationError::new("Embed field 'inline' must be a boolean."));
        }
    }
    Ok(())
}

fn validate_footer(footer: &Value) -> ValidationResult<()> {
    let footer = mapping(footer, "Embed footer must be a mapping.")?;
    unknown_keys(footer, FOOTER_KEYS, "embed footer")?;
    let text = footer.get("text").map_or(Ok(0), |text| text_len(text, "Footer text"))?;
    match text {
        0 => Err(ValidationError::new("Footer text must not be empty.")),
        len if len > 2048 => Err(ValidationError::new("Footer text length reached the max limit.")),
        _ => Ok(()),
    }
}

fn validate_author(author: &Value) -> ValidationResult<()> {
    let author = mapping(author, "Embed author must be a mapping.")?;
    unknown_keys(author, AUTHOR_KEYS, "embed author")?;
    let name = author.get("name").map_or(Ok(0), |name| text_len(name, "Embed author name"))?;
    match name {
        0 => Err(ValidationError::new("Embed author name must not be empty.")),
        len if len > 256 => Err(ValidationError::new(
            "Embed author name length reached the max limit.",
        )),
        _ => Ok(()),
    }
}

fn mapping<'a>(value: &'a Value, message: &str) -> ValidationResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| ValidationError::new(message))
}

fn unknown_keys(map: &Map<String, Value>, allowed: &[&str], what: &str) -> ValidationResult<()> {
    match map.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(ValidationError::new(format!("Unknown {what} field: '{key}'."))),
        None => Ok(()),
    }
}

fn text_len(value: &Value, field: &str) -> ValidationResult<usize> {
    value
        .as_str()
        .map(|text| text.chars().count())
        .ok_or_else(|| ValidationError::new(format!("{field} must be a string.")))
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
