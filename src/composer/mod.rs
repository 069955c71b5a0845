// file: src/composer/mod.rs
// description: turns free text into a refined search query through the language model
// reference: internal module structure

pub mod client;
pub mod prompt;

pub use client::{CompletionClient, OpenAiClient};
pub use prompt::{PromptTemplate, RenderedPrompt};

use crate::error::Result;
use crate::models::{QueryRequest, QueryResult};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct QueryComposer {
    client: Arc<dyn CompletionClient>,
    template: PromptTemplate,
}

impl QueryComposer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            template: PromptTemplate::new(),
        }
    }

    /// Validates `raw_text` before any network traffic, then asks the model.
    pub async fn compose(&self, raw_text: &str) -> Result<QueryResult> {
        let request = QueryRequest::new(raw_text)?;
        self.compose_request(&request).await
    }

    pub async fn compose_request(&self, request: &QueryRequest) -> Result<QueryResult> {
        let prompt = self.template.render(&request.raw_text);

        debug!(request_id = %request.id, "Composing query for {} chars", request.raw_text.len());

        let search_query = self.client.complete(&prompt).await?;
        let result = QueryResult::new(request.id, search_query)?;

        info!(request_id = %request.id, query = %result.refined_query, "Query composed");
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::QueryError;
    use crate::models::SearchQuery;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Canned completion client that records every prompt it receives.
    pub struct FakeCompletion {
        reply: std::result::Result<String, fn() -> QueryError>,
        delay: Duration,
        pub prompts: Mutex<Vec<RenderedPrompt>>,
    }

    impl FakeCompletion {
        pub fn replying(query: &str) -> Self {
            Self {
                reply: Ok(query.to_string()),
                delay: Duration::ZERO,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(make_error: fn() -> QueryError) -> Self {
            Self {
                reply: Err(make_error),
                delay: Duration::ZERO,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionClient for FakeCompletion {
        async fn complete(&self, prompt: &RenderedPrompt) -> Result<SearchQuery> {
            self.prompts.lock().unwrap().push(prompt.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.reply {
                Ok(query) => Ok(SearchQuery {
                    search_query: query.clone(),
                }),
                Err(make_error) => Err(make_error()),
            }
        }
    }
}
