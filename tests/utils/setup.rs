use std::sync::Arc;

use quizroom::dispatcher::{ClientEvent, Dispatcher};
use quizroom::quiz::{builtin_questions, SubmittedAnswer};
use quizroom::registry::RoomStore;

use super::mocks::MockConnectionManager;

/// Test harness driving the dispatcher directly, event by event, the way
/// the dispatcher task would.
pub struct TestSetup {
    pub dispatcher: Dispatcher,
    pub connections: Arc<MockConnectionManager>,
}

impl TestSetup {
    pub fn new() -> Self {
        let connections = Arc::new(MockConnectionManager::new());
        let store = RoomStore::new(builtin_questions());
        let dispatcher = Dispatcher::new(store, connections.clone());
        Self {
            dispatcher,
            connections,
        }
    }

    pub async fn create_room(&mut self, connection_id: &str, code: Option<&str>) {
        self.dispatcher
            .handle_event(ClientEvent::CreateRoom {
                connection_id: connection_id.to_string(),
                code: code.map(|c| c.to_string()),
            })
            .await;
    }

    pub async fn join_room(&mut self, connection_id: &str, code: &str) {
        self.dispatcher
            .handle_event(ClientEvent::JoinRoom {
                connection_id: connection_id.to_string(),
                code: code.to_string(),
            })
            .await;
    }

    pub async fn start_game(&mut self, connection_id: &str, code: &str) {
        self.dispatcher
            .handle_event(ClientEvent::StartGame {
                connection_id: connection_id.to_string(),
                code: code.to_string(),
            })
            .await;
    }

    pub async fn answer(&mut self, connection_id: &str, code: &str, answer: SubmittedAnswer) {
        self.dispatcher
            .handle_event(ClientEvent::Answer {
                connection_id: connection_id.to_string(),
                code: code.to_string(),
                answer,
            })
            .await;
    }

    pub async fn disconnect(&mut self, connection_id: &str) {
        self.dispatcher
            .handle_event(ClientEvent::Disconnected {
                connection_id: connection_id.to_string(),
            })
            .await;
    }
}

impl Default for TestSetup {
    fn default() -> Self {
        Self::new()
    }
}
