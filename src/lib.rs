pub mod bench;
pub mod cache;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod db;
pub mod error;
pub mod heuristic;
pub mod logging;
pub mod provider;
pub mod resolve;
pub mod search;
pub mod title;
pub mod wikitext;

pub use config::Config;
pub use error::{Result, WikiracerError};
pub use heuristic::{Heuristic, HeuristicContext, HeuristicKind};
pub use provider::{ContentProvider, Links};
pub use resolve::NameResolver;
pub use search::{SearchEngine, SearchMode, SearchOutcome};
