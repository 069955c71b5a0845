// file: src/models/request.rs
// description: validated user submission handed to the composer
// reference: internal data structures

use crate::error::Result;
use crate::utils::Validator;
use chrono::{DateTime, Local};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub id: Uuid,
    /// User input with surrounding whitespace removed, never empty.
    pub raw_text: String,
    pub submitted_at: DateTime<Local>,
}

impl QueryRequest {
    pub fn new(raw_text: &str) -> Result<Self> {
        let raw_text = Validator::require_text(raw_text, "search text")?;

        Ok(Self {
            id: Uuid::new_v4(),
            raw_text,
            submitted_at: Local::now(),
        })
    }
}
