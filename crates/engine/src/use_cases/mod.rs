//! Use cases - User story orchestration.
//!
//! `timeline` is the temporal filter: every piece of state a viewer sees is
//! derived from its cursor. `layers` is the one operation orthogonal to it.

pub mod layers;
pub mod timeline;

pub use layers::SetLayerVisibility;
pub use timeline::{PlaybackHandle, TimelineError, TimelineService};
