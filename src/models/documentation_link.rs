use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, ValidationResult};

/// A documentation inventory used by the bot's `!docs` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationLink {
    pub package: String,
    pub base_url: String,
    pub inventory_url: String,
}

impl DocumentationLink {
    pub fn new(
        package: impl Into<String>,
        base_url: impl Into<String>,
        inventory_url: impl Into<String>,
    ) -> ValidationResult<Self> {
        let package = package.into();
        if package.is_empty()
            || !package
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(ValidationError::new(
                "Package names can only consist of lowercase a-z letters, digits, and underscores.",
            ));
        }

        // An empty base URL means the inventory holds absolute links.
        let base_url = base_url.into();
        if !base_url.is_empty() {
            http_url("Base URL", &base_url)?;
            if !base_url.ends_with('/') {
                return Err(ValidationError::new("The entered URL must end with a slash."));
            }
        }

        let inventory_url = inventory_url.into();
        http_url("Inventory URL", &inventory_url)?;

        Ok(Self {
            package,
            base_url,
            inventory_url,
        })
    }
}

fn http_url(field: &str, value: &str) -> ValidationResult<()> {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => Ok(()),
        _ => Err(ValidationError::new(format!("{field} must be a valid http(s) URL."))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVENTORY: &str = "https://docs.python.org/3/objects.inv";

    #[test]
    fn accepts_a_valid_link() {
        assert!(DocumentationLink::new("python", "https://docs.python.org/3/", INVENTORY).is_ok());
        assert!(DocumentationLink::new("no_base_2", "", INVENTORY).is_ok());
    }

    #[test]
    fn base_url_needs_trailing_slash() {
        let err = DocumentationLink::new("python", "https://docs.python.org/3", INVENTORY).unwrap_err();
        assert_eq!(err.message, "The entered URL must end with a slash.");
    }

    #[test]
    fn rejects_bad_package_names_and_urls() {
        assert!(DocumentationLink::new("Python", "", INVENTORY).is_err());
        assert!(DocumentationLink::new("py-thon", "", INVENTORY).is_err());
        assert!(DocumentationLink::new("python", "", "ftp://example.com/objects.inv").is_err());
    }
}
