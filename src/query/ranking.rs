use crate::models::{FieldSet, SortKey, SortOrder};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Stable sort by `key`; `None` keeps the incoming order.
///
/// Equal keys keep their relative order in both directions: descending
/// flips the comparison, not the sequence.
pub fn rank<T>(items: &mut [(FieldSet, T)], key: Option<SortKey>, order: SortOrder) {
    let Some(key) = key else {
        return;
    };
    items.sort_by(|(a, _), (b, _)| {
        let ordering = compare(a, b, key);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

fn compare(a: &FieldSet, b: &FieldSet, key: SortKey) -> Ordering {
    match key {
        SortKey::Price => a.price.total_cmp(&b.price),
        SortKey::LivingArea => a.living_area.total_cmp(&b.living_area),
        SortKey::Bedrooms => a.bedrooms.cmp(&b.bedrooms),
        SortKey::ListDate => date_key(a).cmp(&date_key(b)),
    }
}

fn date_key(fields: &FieldSet) -> DateTime<Utc> {
    fields.list_date.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Slice of the 1-based `page`; empty past the end
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    items.into_iter().skip(start).take(page_size).collect()
}

/// `ceil(total / page_size)`, zero when there is nothing to page
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if total == 0 || page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}
