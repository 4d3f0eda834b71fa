//! Layer visibility use case.

use std::sync::Arc;

use crate::infrastructure::ports::MapSurfacePort;

/// Forward a layer toggle to the map surface.
///
/// Deliberately outside the temporal filter: visibility is orthogonal to the
/// cursor and touches no cached data.
pub struct SetLayerVisibility {
    map: Arc<dyn MapSurfacePort>,
}

impl SetLayerVisibility {
    pub fn new(map: Arc<dyn MapSurfacePort>) -> Self {
        Self { map }
    }

    pub async fn execute(&self, layer: &str, visible: bool) {
        tracing::debug!(layer, visible, "Layer visibility changed");
        self.map.set_visibility(layer, visible).await;
    }
}
