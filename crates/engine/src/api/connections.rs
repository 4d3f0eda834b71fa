//! Connection management for WebSocket clients.
//!
//! Tracks connected viewers and their outbound channels. Unlike the
//! viewers' map state, this registry is touched from many tasks at once, so
//! it lives in a concurrent map instead of behind the timeline's locks.

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use lampioni_shared::ServerMessage;

/// Manages all active WebSocket connections.
pub struct ConnectionManager {
    connections: DashMap<Uuid, mpsc::Sender<ServerMessage>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a new connection.
    pub fn register(&self, connection_id: Uuid, sender: mpsc::Sender<ServerMessage>) {
        self.connections.insert(connection_id, sender);
        tracing::debug!(connection_id = %connection_id, "Connection registered");
    }

    /// Unregister a connection.
    pub fn unregister(&self, connection_id: Uuid) {
        if self.connections.remove(&connection_id).is_some() {
            tracing::debug!(connection_id = %connection_id, "Connection unregistered");
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Broadcast a message to every connected viewer.
    ///
    /// A full or closed channel drops the message for that viewer only; the
    /// socket task cleans the entry up when the connection dies.
    pub fn broadcast(&self, message: ServerMessage) {
        for entry in self.connections.iter() {
            if let Err(e) = entry.value().try_send(message.clone()) {
                tracing::warn!(
                    connection_id = %entry.key(),
                    error = %e,
                    "Failed to broadcast message"
                );
            }
        }
    }

    /// Send a message to one viewer.
    pub fn send_to(&self, connection_id: Uuid, message: ServerMessage) {
        if let Some(sender) = self.connections.get(&connection_id) {
            if let Err(e) = sender.try_send(message) {
                tracing::warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to send message"
                );
            }
        }
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
