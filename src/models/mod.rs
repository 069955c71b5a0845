// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod query;
pub mod request;

pub use query::{QueryResult, SearchQuery};
pub use request::QueryRequest;
