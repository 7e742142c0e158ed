use chrono::{DateTime, Utc};
use serde::Serialize;

/// Typed, normalized view of one listing record.
///
/// Built once per listing per request by the extractor; text fields are
/// already normalized and nothing mutates it afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    pub title: String,
    pub city: String,
    pub neighborhood: String,
    pub price: f64,
    pub property_type: String,
    pub typology: String,
    pub description: String,
    pub transaction_type: String,
    pub bedrooms: i64,
    pub suites: i64,
    pub bathrooms: i64,
    pub garage_spaces: i64,
    pub living_area: f64,
    /// Normalized, in feed order, without repeats
    pub features: Vec<String>,
    pub list_date: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl FieldSet {
    /// Space-joined feature list, as matched by the characteristics filter
    pub fn features_text(&self) -> String {
        self.features.join(" ")
    }
}

/// How the price predicate is applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceFilter {
    /// No price parameter was usable
    Any,
    /// `min <= price <= max`
    Range { min: f64, max: f64 },
    /// `|price - target| <= tolerance`
    Target { target: f64, tolerance: f64 },
}

/// Transaction families a purpose token can select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Any,
    Sale,
    Rental,
}

/// Geo-radius filter center and radius in kilometers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFilter {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Price,
    LivingArea,
    Bedrooms,
    ListDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Validated, defaulted form of the caller's query parameters
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub title: String,
    pub city: String,
    pub neighborhood: String,
    pub price: PriceFilter,
    pub property_type: String,
    pub purpose: Purpose,
    pub min_bedrooms: i64,
    pub min_suites: i64,
    pub min_bathrooms: i64,
    pub min_garage_spaces: i64,
    pub min_area: f64,
    pub max_area: f64,
    pub features: Vec<String>,
    pub keywords: Vec<String>,
    pub max_age_days: i64,
    pub geo: Option<GeoFilter>,
    pub sort: Option<SortKey>,
    pub order: SortOrder,
    pub page: usize,
    pub page_size: usize,
}

/// One page of matching listings, returned as the raw feed records
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PagedResult {
    pub total: usize,
    #[serde(rename = "pagina")]
    pub page: usize,
    #[serde(rename = "itens_por_pagina")]
    pub page_size: usize,
    #[serde(rename = "total_paginas")]
    pub total_pages: usize,
    #[serde(rename = "Listings")]
    pub items: Vec<serde_json::Value>,
}

/// Well-formed empty result annotated with what went wrong
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorEnvelope {
    pub error: String,
    pub total: usize,
    #[serde(rename = "pagina")]
    pub page: usize,
    #[serde(rename = "itens_por_pagina")]
    pub page_size: usize,
    #[serde(rename = "total_paginas")]
    pub total_pages: usize,
    #[serde(rename = "Listings")]
    pub items: Vec<serde_json::Value>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>, page_size: usize) -> Self {
        Self {
            error: error.into(),
            total: 0,
            page: 1,
            page_size,
            total_pages: 0,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum QueryResponse {
    Page(PagedResult),
    Error(ErrorEnvelope),
}

impl QueryResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, QueryResponse::Error(_))
    }
}
