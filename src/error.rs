use thiserror::Error;

/// Failures fetching or decoding the upstream feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to reach feed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Feed returned status {0}")]
    Status(u16),

    #[error("Failed to read feed body: {0}")]
    Body(String),

    #[error("Malformed feed XML: {0}")]
    Xml(String),
}

impl FeedError {
    /// Upstream HTTP status, when the feed answered at all
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            FeedError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for FeedError {
    fn from(e: quick_xml::Error) -> Self {
        FeedError::Xml(e.to_string())
    }
}

/// Pipeline-fatal failures; turned into an error envelope at the query
/// boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Listing payload must be a record or a sequence of records, got a {0}")]
    MalformedPayload(&'static str),
}
