//! Stop descriptor types.

use serde::Serialize;

/// Upstream coordinate pair, in the order the API sends it.
pub type Coordinates = [f64; 2];

/// The stop a departure board was queried for.
///
/// Replaced wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopInfo {
    pub stop_id: String,
    pub city: String,
    pub name: String,
    /// Currently the same upstream field as `name`; the API has no
    /// separate long name at the position we read.
    pub full_name: String,
    pub coordinates: Option<Coordinates>,
}

impl StopInfo {
    /// Name to show in a board header: the full name when present, else the short name.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }
}
