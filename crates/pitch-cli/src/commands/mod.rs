pub mod analytics;
pub mod auth;
pub mod dispatch;
pub mod events;
pub mod matches;
pub mod profile;

/// Apply the global `--limit` to a listing.
pub(crate) fn apply_limit<T>(mut items: Vec<T>, limit: Option<u32>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }
    items
}
