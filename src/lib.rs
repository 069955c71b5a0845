// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod composer;
pub mod config;
pub mod error;
pub mod launcher;
pub mod models;
pub mod session;
pub mod shell;
pub mod utils;

pub use composer::{CompletionClient, OpenAiClient, PromptTemplate, QueryComposer};
pub use config::{Config, LauncherConfig, ModelConfig};
pub use error::{QueryError, Result};
pub use launcher::{BrowserOpener, LaunchTarget, Launcher, SearchUrlBuilder, SystemBrowser};
pub use models::{QueryRequest, QueryResult, SearchQuery};
pub use session::{Outcome, SearchSession, SessionEvent};
pub use shell::Shell;
pub use utils::Validator;
