use chrono::{DateTime, Utc};

use crate::model::change::Change;

/// Status shown when an item has no `Status` field value
pub const NO_STATUS: &str = "No Status";

/// A board item that changed inside the report window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactedItem {
    pub repo: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    /// Issue lifecycle state (`OPEN` / `CLOSED`)
    pub state: String,
    /// Board column, e.g. `In Progress`
    pub status: String,
    /// In detection order; never empty
    pub changes: Vec<Change>,
    /// Sort key for the report
    pub board_updated: DateTime<Utc>,
}
