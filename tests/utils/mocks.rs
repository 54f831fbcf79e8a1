use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use quizroom::websockets::{ConnectionManager, MessageType, WebSocketMessage};

// ============================================================================
// Mock Infrastructure
// ============================================================================

#[derive(Clone, Default)]
pub struct MockConnectionManager {
    sent_messages: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn raw_messages_for(&self, connection_id: &str) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(connection_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Frames sent to a connection, parsed back into the protocol envelope.
    pub async fn messages_for(&self, connection_id: &str) -> Vec<WebSocketMessage> {
        self.raw_messages_for(connection_id)
            .await
            .iter()
            .map(|raw| serde_json::from_str(raw).expect("frame should be valid protocol JSON"))
            .collect()
    }

    pub async fn messages_of_type(
        &self,
        connection_id: &str,
        message_type: MessageType,
    ) -> Vec<WebSocketMessage> {
        self.messages_for(connection_id)
            .await
            .into_iter()
            .filter(|m| m.message_type == message_type)
            .collect()
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(&self, _connection_id: String, _sender: mpsc::UnboundedSender<String>) {}

    async fn remove_connection(&self, _connection_id: &str) {}

    async fn send_to_connection(&self, connection_id: &str, message: &str) {
        self.sent_messages
            .write()
            .await
            .entry(connection_id.to_string())
            .or_default()
            .push(message.to_string());
    }

    async fn send_to_connections(&self, connection_ids: &[String], message: &str) {
        for connection_id in connection_ids {
            self.send_to_connection(connection_id, message).await;
        }
    }
}
