//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Ports exist for:
//! - The map surface (sources and layers render client-side)
//! - The UI sink (counters and labels render client-side)
//! - Data loading (could swap flat files -> object storage)

use async_trait::async_trait;
use geojson::FeatureCollection;

use lampioni_domain::{IsoDate, LampData};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid feature in {file}: {reason}")]
    Feature { file: String, reason: String },
}

// =============================================================================
// Presentation Ports
// =============================================================================

/// The rendering side of the map: named GeoJSON sources plus toggleable
/// layers. The engine never renders anything; it replaces the contents of a
/// named source wholesale and lets the surface restyle itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MapSurfacePort: Send + Sync {
    async fn set_data(&self, source: &str, data: FeatureCollection);
    async fn set_visibility(&self, layer: &str, visible: bool);
}

/// Display surface for derived numbers and labels.
///
/// Formatting (digit grouping, localized date strings) happens on the other
/// side of this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UiSinkPort: Send + Sync {
    async fn show_counters(&self, total: u64, new_count: u64, date: &IsoDate);
    async fn show_timeline(&self, cursor: usize, axis_len: usize, date: &IsoDate, playing: bool);
    async fn show_share_hash(&self, hash: &str);
    async fn show_error(&self, message: &str);
}

// =============================================================================
// Storage Port
// =============================================================================

/// Source of the session caches. Loaded once at startup, never re-fetched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LampStorePort: Send + Sync {
    async fn load(&self) -> Result<LampData, StoreError>;
}
