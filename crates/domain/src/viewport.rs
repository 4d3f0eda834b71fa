//! The shareable URL fragment: viewport plus optional cursor date.

use serde::{Deserialize, Serialize};

use crate::IsoDate;

/// Map viewport: zoom level plus center coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub lat: f64,
    pub lng: f64,
}

/// Decoded `#map=` URL fragment.
///
/// The fragment is the sole persisted and shareable state of a session.
/// Grammar: `#map=<zoom>/<lat>/<lng>[/<date>]` with zoom at one decimal and
/// coordinates at five.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapHash {
    pub viewport: Option<Viewport>,
    pub date: Option<IsoDate>,
}

impl MapHash {
    /// Encode a fragment. Pass `date: None` when the cursor sits at the end
    /// of the axis: "today" is the implicit default, which keeps links short
    /// for the common case.
    pub fn encode(viewport: &Viewport, date: Option<&IsoDate>) -> String {
        let mut hash = format!(
            "#map={:.1}/{:.5}/{:.5}",
            viewport.zoom, viewport.lat, viewport.lng
        );
        if let Some(date) = date {
            hash.push('/');
            hash.push_str(date.as_str());
        }
        hash
    }

    /// Parse a fragment, dropping whatever does not match the grammar.
    ///
    /// Lenient on purpose: a garbled date segment still lets the viewport
    /// apply and vice versa. Never an error. Whether the date is a member of
    /// the axis is the caller's check.
    pub fn decode(hash: &str) -> MapHash {
        let Some(rest) = hash.trim_start_matches('#').strip_prefix("map=") else {
            return MapHash::default();
        };

        let mut parts = rest.split('/');
        let zoom = parts.next().map(str::parse::<f64>);
        let lat = parts.next().map(str::parse::<f64>);
        let lng = parts.next().map(str::parse::<f64>);

        let viewport = match (zoom, lat, lng) {
            (Some(Ok(zoom)), Some(Ok(lat)), Some(Ok(lng))) => Some(Viewport { zoom, lat, lng }),
            _ => None,
        };

        let date = parts
            .next()
            .filter(|segment| !segment.is_empty())
            .map(IsoDate::from);

        MapHash { viewport, date }
    }
}
