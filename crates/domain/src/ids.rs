//! Typed identifiers.

use serde::{Deserialize, Serialize};

/// OSM node id of a street lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LampId(i64);

impl LampId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for LampId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Matches the `id` field of the pipeline's GeoJSON features.
        write!(f, "node/{}", self.0)
    }
}
