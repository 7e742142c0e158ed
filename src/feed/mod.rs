//! Upstream listing feed: download, XML conversion and listing lookup.

pub mod http;
pub mod traits;
pub mod xml;

pub use http::HttpFeed;
pub use traits::FeedSource;

use serde_json::Value;

static NULL: Value = Value::Null;

/// Locates the listing payload in a converted feed tree.
///
/// Follows `ListingDataFeed → Listings → Listing`, tolerating a tree that
/// starts below the document root. The result is a sequence, a lone
/// record, or `null` when the feed carries no listings. A tree that is
/// already a sequence is returned as-is.
pub fn listings_payload(tree: &Value) -> &Value {
    if tree.is_array() {
        return tree;
    }
    let feed = tree.get("ListingDataFeed").unwrap_or(tree);
    let listings = feed.get("Listings").unwrap_or(feed);
    listings.get("Listing").unwrap_or(&NULL)
}
