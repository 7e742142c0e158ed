//! Listing query pipeline: extraction, filtering, ranking and pagination.
//!
//! Everything here is a pure function of the listing payload, the raw
//! parameters and the clock. No I/O, no shared state.

pub mod coerce;
pub mod extract;
pub mod normalize;
pub mod predicates;
pub mod ranking;
pub mod spec;

use crate::error::QueryError;
use crate::models::{ErrorEnvelope, PagedResult, QueryResponse, QuerySpec};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

pub use extract::extract;
pub use normalize::normalize;
pub use predicates::matches;
pub use spec::DEFAULT_PAGE_SIZE;

/// Runs a query against the listing payload at the current time
pub fn query(payload: &Value, params: &HashMap<String, String>) -> QueryResponse {
    query_at(payload, params, Utc::now())
}

/// Runs a query with an explicit clock for the recency filter.
///
/// `payload` is a sequence of listing records or a lone record (treated as
/// a one-element sequence). Never fails: a payload the pipeline cannot
/// work with yields an [`ErrorEnvelope`].
pub fn query_at(
    payload: &Value,
    params: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> QueryResponse {
    let spec = QuerySpec::from_params(params);

    match run(payload, &spec, now) {
        Ok(page) => QueryResponse::Page(page),
        Err(e) => {
            warn!("Query pipeline failed: {}", e);
            QueryResponse::Error(ErrorEnvelope::new(e.to_string(), DEFAULT_PAGE_SIZE))
        }
    }
}

fn run(payload: &Value, spec: &QuerySpec, now: DateTime<Utc>) -> Result<PagedResult, QueryError> {
    let records = listing_records(payload)?;
    let received = records.len();

    let mut matched: Vec<_> = records
        .into_iter()
        .map(|record| (extract(record), record))
        .filter(|(fields, _)| matches(fields, spec, now))
        .collect();
    debug!("{} of {} listings matched", matched.len(), received);

    ranking::rank(&mut matched, spec.sort, spec.order);

    let total = matched.len();
    let items = ranking::paginate(matched, spec.page, spec.page_size)
        .into_iter()
        .map(|(_, record)| record.clone())
        .collect();

    Ok(PagedResult {
        total,
        page: spec.page,
        page_size: spec.page_size,
        total_pages: ranking::total_pages(total, spec.page_size),
        items,
    })
}

fn listing_records(payload: &Value) -> Result<Vec<&Value>, QueryError> {
    match payload {
        Value::Null | Value::Array(_) | Value::Object(_) => Ok(extract::as_sequence(payload)),
        Value::Bool(_) => Err(QueryError::MalformedPayload("boolean")),
        Value::Number(_) => Err(QueryError::MalformedPayload("number")),
        Value::String(_) => Err(QueryError::MalformedPayload("string")),
    }
}
