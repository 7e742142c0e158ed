use crate::models::{GeoFilter, PriceFilter, Purpose, QuerySpec, SortKey, SortOrder};
use crate::query::coerce::{parse_float, to_float, to_int};
use crate::query::normalize::normalize;
use std::collections::HashMap;
use tracing::debug;

/// Half-width of the band around a single target price
pub const PRICE_TOLERANCE: f64 = 100.0;
pub const DEFAULT_RADIUS_KM: f64 = 5.0;
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Lowest price a listing is ever reported at
pub const PRICE_FLOOR: f64 = 1000.0;
pub const KM_PER_DEGREE: f64 = 111.0;

const SALE_TOKENS: &[&str] = &["venda", "vender", "compra", "comprar", "sale", "buy", "purchase"];
const RENTAL_TOKENS: &[&str] = &[
    "aluguel", "alugar", "locacao", "rent", "rental", "lease",
];

impl QuerySpec {
    /// Builds a spec from raw query parameters. Never fails: anything
    /// malformed falls back to the parameter's default.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let text = |key: &str| params.get(key).map(|v| normalize(v)).unwrap_or_default();
        let raw = |key: &str| params.get(key).map(String::as_str);

        let spec = QuerySpec {
            title: text("nome_imovel"),
            city: text("cidade"),
            neighborhood: text("bairro"),
            price: price_filter(raw("preco"), raw("preco_min"), raw("preco_max")),
            property_type: text("tipo_imovel"),
            purpose: purpose(&text("finalidade")),
            min_bedrooms: to_int(raw("quartos_min"), 0, Some(0)),
            min_suites: to_int(raw("suites_min"), 0, Some(0)),
            min_bathrooms: to_int(raw("banheiros_min"), 0, Some(0)),
            min_garage_spaces: to_int(raw("vagas_min"), 0, Some(0)),
            min_area: to_float(raw("area_min"), 0.0, Some(0.0)),
            max_area: to_float(raw("area_max"), f64::INFINITY, None),
            features: feature_tokens(&text("caracteristicas")),
            keywords: text("palavras_chave")
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            max_age_days: to_int(raw("dias_atras"), 0, Some(0)),
            geo: geo_filter(raw("lat"), raw("lng"), raw("raio")),
            sort: sort_key(&text("ordenar_por")),
            order: sort_order(&text("ordem")),
            page: to_int(raw("pagina"), 1, Some(1)) as usize,
            page_size: to_int(raw("itens_por_pagina"), DEFAULT_PAGE_SIZE as i64, Some(1)) as usize,
        };

        debug!(?spec, "Built query spec");
        spec
    }
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self::from_params(&HashMap::new())
    }
}

/// `preco` selects the tolerance band; otherwise `preco_min`/`preco_max`
/// select a closed range when either one parses.
fn price_filter(target: Option<&str>, min: Option<&str>, max: Option<&str>) -> PriceFilter {
    if let Some(target) = target.and_then(parse_float) {
        return PriceFilter::Target {
            target,
            tolerance: PRICE_TOLERANCE,
        };
    }

    let min = min.and_then(parse_float);
    let max = max.and_then(parse_float);
    if min.is_none() && max.is_none() {
        return PriceFilter::Any;
    }
    PriceFilter::Range {
        min: min.unwrap_or(0.0),
        max: max.unwrap_or(f64::INFINITY),
    }
}

fn purpose(token: &str) -> Purpose {
    if SALE_TOKENS.contains(&token) {
        Purpose::Sale
    } else if RENTAL_TOKENS.contains(&token) {
        Purpose::Rental
    } else {
        // "moradia", "residencial" and anything unknown: no filtering
        Purpose::Any
    }
}

/// Comma-separated tokens, or whitespace-separated when commas yield at
/// most one token
fn feature_tokens(value: &str) -> Vec<String> {
    let split = |tokens: Vec<&str>| -> Vec<String> {
        tokens
            .into_iter()
            .map(|t| t.trim_matches(|c: char| c == ',' || c.is_whitespace()))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    };

    let by_comma = split(value.split(',').collect());
    if by_comma.len() > 1 {
        by_comma
    } else {
        split(value.split_whitespace().collect())
    }
}

fn geo_filter(lat: Option<&str>, lng: Option<&str>, radius: Option<&str>) -> Option<GeoFilter> {
    let latitude = lat.and_then(parse_float)?;
    let longitude = lng.and_then(parse_float)?;
    Some(GeoFilter {
        latitude,
        longitude,
        radius_km: to_float(radius, DEFAULT_RADIUS_KM, Some(0.0)),
    })
}

fn sort_key(value: &str) -> Option<SortKey> {
    match value {
        "preco" | "price" => Some(SortKey::Price),
        "area" | "area_util" => Some(SortKey::LivingArea),
        "quartos" | "bedrooms" => Some(SortKey::Bedrooms),
        "data" | "data_publicacao" | "date" => Some(SortKey::ListDate),
        _ => None,
    }
}

fn sort_order(value: &str) -> SortOrder {
    match value {
        "desc" | "decrescente" => SortOrder::Descending,
        _ => SortOrder::Ascending,
    }
}
