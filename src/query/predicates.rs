use crate::models::{FieldSet, GeoFilter, PriceFilter, Purpose, QuerySpec};
use crate::query::spec::KM_PER_DEGREE;
use chrono::{DateTime, Duration, Utc};

const SALE_TRANSACTIONS: &[&str] = &["sale", "purchase", "venda", "compra"];
const RENTAL_TRANSACTIONS: &[&str] = &["rent", "rental", "aluguel", "locacao"];

type Predicate = fn(&FieldSet, &QuerySpec, DateTime<Utc>) -> bool;

/// Evaluation order. Predicates are independent, so the order only decides
/// how early a rejected listing stops being examined.
const PIPELINE: &[Predicate] = &[
    title,
    city,
    neighborhood,
    price,
    property_type,
    purpose,
    minimums,
    living_area,
    features,
    keywords,
    recency,
    geo_radius,
];

/// True when the listing passes every active predicate
pub fn matches(fields: &FieldSet, spec: &QuerySpec, now: DateTime<Utc>) -> bool {
    PIPELINE.iter().all(|predicate| predicate(fields, spec, now))
}

/// Substring containment where an empty filter matches everything
fn contains(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.contains(needle)
}

fn title(f: &FieldSet, q: &QuerySpec, _: DateTime<Utc>) -> bool {
    contains(&f.title, &q.title)
}

fn city(f: &FieldSet, q: &QuerySpec, _: DateTime<Utc>) -> bool {
    contains(&f.city, &q.city)
}

fn neighborhood(f: &FieldSet, q: &QuerySpec, _: DateTime<Utc>) -> bool {
    contains(&f.neighborhood, &q.neighborhood)
}

fn price(f: &FieldSet, q: &QuerySpec, _: DateTime<Utc>) -> bool {
    match q.price {
        PriceFilter::Any => true,
        PriceFilter::Range { min, max } => min <= f.price && f.price <= max,
        PriceFilter::Target { target, tolerance } => (f.price - target).abs() <= tolerance,
    }
}

fn property_type(f: &FieldSet, q: &QuerySpec, _: DateTime<Utc>) -> bool {
    q.property_type.is_empty()
        || f.typology.contains(&q.property_type)
        || f.property_type.contains(&q.property_type)
}

fn purpose(f: &FieldSet, q: &QuerySpec, _: DateTime<Utc>) -> bool {
    let accepted = match q.purpose {
        Purpose::Any => return true,
        Purpose::Sale => SALE_TRANSACTIONS,
        Purpose::Rental => RENTAL_TRANSACTIONS,
    };
    accepted.iter().any(|t| f.transaction_type.contains(t))
}

fn minimums(f: &FieldSet, q: &QuerySpec, _: DateTime<Utc>) -> bool {
    [
        (f.bedrooms, q.min_bedrooms),
        (f.suites, q.min_suites),
        (f.bathrooms, q.min_bathrooms),
        (f.garage_spaces, q.min_garage_spaces),
    ]
    .iter()
    .all(|&(value, minimum)| minimum == 0 || value >= minimum)
}

fn living_area(f: &FieldSet, q: &QuerySpec, _: DateTime<Utc>) -> bool {
    q.min_area <= f.living_area && f.living_area <= q.max_area
}

fn features(f: &FieldSet, q: &QuerySpec, _: DateTime<Utc>) -> bool {
    if q.features.is_empty() {
        return true;
    }
    let joined = f.features_text();
    q.features
        .iter()
        .any(|token| joined.contains(token.as_str()) || f.description.contains(token.as_str()))
}

fn keywords(f: &FieldSet, q: &QuerySpec, _: DateTime<Utc>) -> bool {
    q.keywords.is_empty()
        || q.keywords
            .iter()
            .any(|token| f.description.contains(token.as_str()) || f.title.contains(token.as_str()))
}

fn recency(f: &FieldSet, q: &QuerySpec, now: DateTime<Utc>) -> bool {
    if q.max_age_days == 0 {
        return true;
    }
    let Some(listed) = f.list_date else {
        return true;
    };
    match Duration::try_days(q.max_age_days).and_then(|d| now.checked_sub_signed(d)) {
        Some(cutoff) => listed >= cutoff,
        None => true,
    }
}

fn geo_radius(f: &FieldSet, q: &QuerySpec, _: DateTime<Utc>) -> bool {
    let (Some(geo), Some(lat), Some(lng)) = (q.geo, f.latitude, f.longitude) else {
        return true;
    };
    match planar_distance_km(&geo, lat, lng) {
        Some(distance) => distance <= geo.radius_km,
        None => true,
    }
}

/// Euclidean distance in degrees scaled to kilometers; `None` when the
/// inputs do not produce a finite distance
fn planar_distance_km(geo: &GeoFilter, lat: f64, lng: f64) -> Option<f64> {
    let d_lat = lat - geo.latitude;
    let d_lng = lng - geo.longitude;
    let distance = (d_lat * d_lat + d_lng * d_lng).sqrt() * KM_PER_DEGREE;
    distance.is_finite().then_some(distance)
}
