pub mod messages;
pub mod sources;

pub use messages::{ClientMessage, ServerMessage, TimelineStateData};
pub use sources::{LAYER_BASELINE, LAYER_NEW, SOURCE_ALL, SOURCE_BASELINE, SOURCE_NEW};
