//! User-selected gather filters, carried between phases as connection data.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Time window for the personalization endpoints.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimeRange {
    /// Last 4 weeks approximately.
    #[default]
    ShortTerm,
    /// Last 6 months approximately.
    MediumTerm,
    /// Several years of data.
    LongTerm,
}

/// Filters applied to the data gather.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Filters {
    /// Time window for top artists/tracks.
    #[serde(default)]
    pub time_range: TimeRange,
    /// Optional market (ISO 3166-1 alpha-2) for library endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
}
