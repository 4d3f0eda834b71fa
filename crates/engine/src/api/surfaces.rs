//! WebSocket-backed implementations of the presentation ports.
//!
//! The engine's "map surface" and "UI sink" are whatever is connected on the
//! other end of the socket. These adapters turn port calls into protocol
//! broadcasts; every viewer applies them to its local map and DOM.

use std::sync::Arc;

use async_trait::async_trait;
use geojson::FeatureCollection;

use lampioni_domain::IsoDate;
use lampioni_shared::{ServerMessage, TimelineStateData};

use super::connections::ConnectionManager;
use crate::infrastructure::ports::{MapSurfacePort, UiSinkPort};

pub struct WsMapSurface {
    connections: Arc<ConnectionManager>,
}

impl WsMapSurface {
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl MapSurfacePort for WsMapSurface {
    async fn set_data(&self, source: &str, data: FeatureCollection) {
        self.connections.broadcast(ServerMessage::SourceData {
            source: source.to_string(),
            data,
        });
    }

    async fn set_visibility(&self, layer: &str, visible: bool) {
        self.connections.broadcast(ServerMessage::LayerVisibility {
            layer: layer.to_string(),
            visible,
        });
    }
}

pub struct WsUiSink {
    connections: Arc<ConnectionManager>,
}

impl WsUiSink {
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl UiSinkPort for WsUiSink {
    async fn show_counters(&self, total: u64, new_count: u64, date: &IsoDate) {
        self.connections.broadcast(ServerMessage::Counters {
            total,
            new_count,
            date: date.to_string(),
        });
    }

    async fn show_timeline(&self, cursor: usize, axis_len: usize, date: &IsoDate, playing: bool) {
        self.connections.broadcast(ServerMessage::TimelineState {
            state: TimelineStateData {
                cursor,
                axis_len,
                date: date.to_string(),
                playing,
            },
        });
    }

    async fn show_share_hash(&self, hash: &str) {
        self.connections.broadcast(ServerMessage::ShareHash {
            hash: hash.to_string(),
        });
    }

    async fn show_error(&self, message: &str) {
        self.connections.broadcast(ServerMessage::Error {
            code: "DATA_LOAD_FAILED".to_string(),
            message: message.to_string(),
        });
    }
}
