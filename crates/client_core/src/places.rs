//! List-row view of bookmarked stores and the local edits applied to it.

use serde::{Deserialize, Serialize};
use shared::{
    domain::{GroupId, StoreId},
    protocol::{BookmarkGroupDetailDto, BookmarkedStoreDto, DeleteBookmarkResponse},
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkedPlace {
    /// Store id rendered as text; rows are keyed by it.
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub category: String,
    pub rating: f64,
    pub images: Vec<String>,
}

impl From<&BookmarkedStoreDto> for BookmarkedPlace {
    fn from(store: &BookmarkedStoreDto) -> Self {
        Self {
            id: store.store_id.to_string(),
            name: store.store_name.clone(),
            address: store.road_address.clone(),
            lat: store.lat,
            lng: store.lng,
            category: store.category.clone(),
            rating: store.rating.unwrap_or_default(),
            images: store.thumbnail_url.iter().cloned().collect(),
        }
    }
}

/// Rows for one group, or an empty list when the group is unknown.
pub fn places_for_group(
    groups: &[BookmarkGroupDetailDto],
    group_id: GroupId,
) -> Vec<BookmarkedPlace> {
    groups
        .iter()
        .find(|group| group.group_id == group_id)
        .map(|group| group.stores.iter().map(BookmarkedPlace::from).collect())
        .unwrap_or_default()
}

/// Removes every row for `store_id` and returns how many were removed.
pub fn remove_place(places: &mut Vec<BookmarkedPlace>, store_id: StoreId) -> usize {
    let key = store_id.to_string();
    let before = places.len();
    places.retain(|place| place.id != key);
    before - places.len()
}

/// Applies a confirmed bookmark deletion; unconfirmed responses leave the list untouched.
pub fn apply_bookmark_deletion(
    places: &mut Vec<BookmarkedPlace>,
    response: &DeleteBookmarkResponse,
) -> usize {
    if !response.deleted {
        debug!(store_id = response.store_id.0, "places: deletion not confirmed");
        return 0;
    }
    remove_place(places, response.store_id)
}

#[cfg(test)]
#[path = "tests/places_tests.rs"]
mod tests;
