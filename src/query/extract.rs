use crate::models::FieldSet;
use crate::query::coerce::{float_value, int_value, parse_float, value_text};
use crate::query::normalize::normalize_value;
use crate::query::spec::PRICE_FLOOR;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

static NULL: Value = Value::Null;

// Raw listing layout (VivaReal-style feed):
//
// Listing
//  ├── Title
//  ├── TransactionType
//  ├── ListDate
//  ├── Details
//  │    ├── PropertyType / Typology
//  │    ├── Description
//  │    ├── ListPrice | RentalPrice   (scalar or {"@currency", "#text"})
//  │    ├── LivingArea                (scalar or {"@unit", "#text"})
//  │    ├── Bedrooms / Suites / Bathrooms / Garage
//  │    └── Features
//  │         └── Feature              (one value or a sequence)
//  └── Location
//       ├── City / Neighborhood
//       └── Latitude / Longitude

/// Projects a raw listing record onto a [`FieldSet`].
///
/// Never fails: absent sections read as empty, and every field falls back
/// to its default. A non-object record yields an all-default field set.
pub fn extract(listing: &Value) -> FieldSet {
    let details = child(listing, "Details");
    let location = child(listing, "Location");

    let price_source = match child(details, "ListPrice") {
        Value::Null => child(details, "RentalPrice"),
        list_price => list_price,
    };

    FieldSet {
        title: normalize_value(child(listing, "Title")),
        city: normalize_value(child(location, "City")),
        neighborhood: normalize_value(child(location, "Neighborhood")),
        price: float_value(Some(price_source), PRICE_FLOOR, Some(PRICE_FLOOR)),
        property_type: normalize_value(child(details, "PropertyType")),
        typology: normalize_value(child(details, "Typology")),
        description: normalize_value(child(details, "Description")),
        transaction_type: normalize_value(child(listing, "TransactionType")),
        bedrooms: int_value(Some(child(details, "Bedrooms")), 0, Some(0)),
        suites: int_value(Some(child(details, "Suites")), 0, Some(0)),
        bathrooms: int_value(Some(child(details, "Bathrooms")), 0, Some(0)),
        garage_spaces: int_value(Some(child(details, "Garage")), 0, Some(0)),
        living_area: float_value(Some(child(details, "LivingArea")), 0.0, Some(0.0)),
        features: features(child(details, "Features")),
        list_date: value_text(child(listing, "ListDate")).and_then(|s| parse_list_date(&s)),
        latitude: coordinate(child(location, "Latitude")),
        longitude: coordinate(child(location, "Longitude")),
    }
}

/// Parses a feed timestamp; naive timestamps are taken as UTC
pub fn parse_list_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Treats a lone value as a one-element sequence and `null` as empty
pub fn as_sequence(value: &Value) -> Vec<&Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    }
}

fn child<'a>(value: &'a Value, key: &str) -> &'a Value {
    value
        .as_object()
        .and_then(|map| map.get(key))
        .unwrap_or(&NULL)
}

fn features(section: &Value) -> Vec<String> {
    // <Features><Feature>..</Feature></Features>, or the list inline
    let list = match section {
        Value::Object(map) if map.contains_key("Feature") => child(section, "Feature"),
        other => other,
    };
    let mut features: Vec<String> = Vec::new();
    for feature in as_sequence(list).into_iter().map(normalize_value) {
        if !feature.is_empty() && !features.contains(&feature) {
            features.push(feature);
        }
    }
    features
}

fn coordinate(value: &Value) -> Option<f64> {
    value_text(value).and_then(|s| parse_float(&s))
}
