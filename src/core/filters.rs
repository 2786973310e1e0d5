use crate::models::Listing;
use std::collections::HashSet;

/// Check whether a listing may be recommended at all
///
/// Listings the user already saved are never recommended, and a listing
/// without an id cannot be saved, linked or deduplicated.
#[inline]
pub fn is_recommendable(listing: &Listing, saved: &HashSet<String>) -> bool {
    if listing.id.trim().is_empty() {
        return false;
    }

    !saved.contains(&listing.id)
}

/// Check a listing against a catalog status filter
///
/// Rows without a status are assumed to already satisfy the catalog query.
#[inline]
pub fn matches_status(listing: &Listing, status: &str) -> bool {
    listing
        .status
        .as_deref()
        .map_or(true, |s| s.eq_ignore_ascii_case(status))
}
