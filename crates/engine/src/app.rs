//! Application state and composition.

use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{MapSurfacePort, UiSinkPort};
use crate::use_cases::{SetLayerVisibility, TimelineService};

/// Main application state.
///
/// Holds the use cases behind their presentation ports. Passed to HTTP and
/// WebSocket handlers via Axum state.
pub struct App {
    pub timeline: Arc<TimelineService>,
    pub layers: SetLayerVisibility,
}

impl App {
    pub fn new(
        map: Arc<dyn MapSurfacePort>,
        ui: Arc<dyn UiSinkPort>,
        playback_interval: Duration,
    ) -> Self {
        Self {
            timeline: Arc::new(TimelineService::with_tick_interval(
                map.clone(),
                ui,
                playback_interval,
            )),
            layers: SetLayerVisibility::new(map),
        }
    }
}
