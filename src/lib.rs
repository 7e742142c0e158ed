//! Real-estate listing gateway.
//!
//! Fetches an XML listing feed, converts it to a JSON tree and answers
//! filtered, sorted, paginated listing queries over it.

pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod query;
pub mod server;

pub use config::Config;
pub use error::{FeedError, QueryError};
pub use models::{ErrorEnvelope, FieldSet, PagedResult, QueryResponse, QuerySpec};
pub use query::{query, query_at};
