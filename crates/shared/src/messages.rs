//! WebSocket message types for Engine-Viewer communication
//!
//! This module contains all message types exchanged over the WebSocket
//! connection. The engine sends `ServerMessage` and receives
//! `ClientMessage`; viewers do the reverse.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Removing variants requires major version bump
//! - Renaming variants is a breaking change

use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use lampioni_domain::Stats;

// =============================================================================
// Client Messages (Viewer → Engine)
// =============================================================================

/// Messages from client (Viewer) to server (Engine)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Connection keep-alive
    Heartbeat,
    /// Move the date cursor to an axis index. The slider clamps to the axis
    /// range before sending; an out-of-range index is answered with an
    /// `Error` and no state change.
    SetCursor { index: usize },
    /// Start time-travel playback
    StartPlayback,
    /// Stop time-travel playback
    StopPlayback,
    /// Jump back to the most recent date (the unfiltered view)
    ResetTimeline,
    /// Report a viewport change so the share hash tracks it
    SetViewport { zoom: f64, lat: f64, lng: f64 },
    /// Toggle a named map layer
    SetLayerVisibility { layer: String, visible: bool },
    /// Apply a deep link's `#map=` fragment (on load and on navigation)
    ApplyHash { hash: String },
}

// =============================================================================
// Server Messages (Engine → Viewer)
// =============================================================================

/// Current timeline position, sent with every recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStateData {
    pub cursor: usize,
    pub axis_len: usize,
    /// ISO date under the cursor. Display formatting is the viewer's
    /// localization concern.
    pub date: String,
    pub playing: bool,
}

/// Messages from server (Engine) to client (Viewer)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Heartbeat response
    Pong,
    /// Replace a named map source wholesale
    SourceData {
        source: String,
        data: FeatureCollection,
    },
    /// A layer was toggled
    LayerVisibility { layer: String, visible: bool },
    /// Derived counters for the UI: grand total, filtered new count, and the
    /// cursor date they were computed for
    Counters {
        total: u64,
        new_count: u64,
        date: String,
    },
    /// Timeline position and playback state
    TimelineState { state: TimelineStateData },
    /// Summary statistics (sent once per connection)
    StatsSnapshot { stats: Stats },
    /// Canonical `#map=` fragment for the current viewport and cursor;
    /// viewers mirror it into the location bar
    ShareHash { hash: String },
    /// Something went wrong
    Error { code: String, message: String },
}
