// file: src/models/query.rs
// description: structured model output and the refined query it yields
// reference: https://platform.openai.com/docs/guides/structured-outputs

use crate::error::{QueryError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Schema the model must answer with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SearchQuery {
    /// The search query to be executed.
    pub search_query: String,
}

impl SearchQuery {
    /// Decodes the message content of a completion into the schema.
    pub fn from_content(content: &str) -> Result<Self> {
        serde_json::from_str(content.trim()).map_err(|e| {
            QueryError::Parse(format!("response does not match search_query schema: {}", e))
        })
    }

    /// JSON schema sent along with the completion request.
    pub fn json_schema() -> serde_json::Value {
        let mut schema = serde_json::to_value(schemars::schema_for!(SearchQuery))
            .unwrap_or_else(|_| serde_json::json!({}));

        // strict structured outputs reject the meta keys schemars adds
        if let Some(map) = schema.as_object_mut() {
            map.remove("$schema");
            map.remove("title");
            map.insert("additionalProperties".to_string(), serde_json::json!(false));
        }
        schema
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub request_id: Uuid,
    /// Never empty.
    pub refined_query: String,
}

impl QueryResult {
    pub fn new(request_id: Uuid, search_query: SearchQuery) -> Result<Self> {
        let refined_query = search_query.search_query.trim().to_string();
        if refined_query.is_empty() {
            return Err(QueryError::Parse(
                "model returned an empty search query".to_string(),
            ));
        }

        Ok(Self {
            request_id,
            refined_query,
        })
    }
}
