pub mod date;
pub mod date_axis;
pub mod error;
pub mod ids;
pub mod lamp;
pub mod stats;
pub mod timeline;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_support;

pub use date::IsoDate;
pub use date_axis::DateAxis;
pub use error::DomainError;
pub use ids::LampId;
pub use lamp::{feature_collection, FilteredView, Lamp, LampData};
pub use stats::{LeaderboardEntry, Stats};
pub use timeline::{PlaybackStart, PlaybackState, TickOutcome, Timeline};
pub use viewport::{MapHash, Viewport};

/// Date of the OSM snapshot the baseline extraction targets.
///
/// Lamps mapped after this date carry a `date_added` property; lamps without
/// one are treated as part of the baseline day.
pub const BASELINE_DATE: &str = "2026-02-01";
