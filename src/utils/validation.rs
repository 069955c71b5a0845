// file: src/utils/validation.rs
// description: input validation helpers shared by the composer and launcher
// reference: input validation patterns

use crate::error::{QueryError, Result};
use url::Url;

pub struct Validator;

impl Validator {
    /// Trimmed text, or `InvalidInput` when nothing is left.
    pub fn require_text(text: &str, what: &str) -> Result<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(QueryError::InvalidInput(format!("{} is empty", what)));
        }
        Ok(trimmed.to_string())
    }

    /// Parses `value` as an absolute http or https URL.
    pub fn parse_web_url(value: &str) -> Option<Url> {
        let value = value.trim();
        if value.contains(char::is_whitespace) {
            return None;
        }

        let url = Url::parse(value).ok()?;
        match url.scheme() {
            "http" | "https" if url.host_str().is_some() => Some(url),
            _ => None,
        }
    }
}
