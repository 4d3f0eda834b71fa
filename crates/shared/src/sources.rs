//! Names of the map sources and layers the engine manages.

/// Baseline lamps. Published once after load, never touched again.
pub const SOURCE_BASELINE: &str = "baseline-lamps";

/// Date-filtered new lamps. Replaced on every cursor change.
pub const SOURCE_NEW: &str = "new-lamps";

/// Baseline plus the filtered new subset. Replaced on every cursor change.
pub const SOURCE_ALL: &str = "all-lamps";

/// Layer names clients may toggle.
pub const LAYER_BASELINE: &str = "baseline-layer";
pub const LAYER_NEW: &str = "new-layer";
