use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::events::ClientEvent;
use crate::quiz::SubmittedAnswer;
use crate::registry::{AnswerOutcome, CreateOutcome, JoinOutcome, RoomStore, StartOutcome};
use crate::websockets::{ConnectionManager, WebSocketMessage};

/// Cloneable handle for sending events to the dispatcher task.
#[derive(Clone)]
pub struct DispatcherHandle {
    sender: mpsc::UnboundedSender<ClientEvent>,
}

impl DispatcherHandle {
    /// Queue an event for the dispatcher. Dropped silently if the
    /// dispatcher task has exited.
    pub fn dispatch(&self, event: ClientEvent) {
        if let Err(e) = self.sender.send(event) {
            warn!(event_type = %e.0.event_type(), "Dispatcher is gone, event dropped");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Owns the room registry and applies client events to it one at a time.
pub struct Dispatcher {
    store: RoomStore,
    connections: Arc<dyn ConnectionManager>,
}

impl Dispatcher {
    pub fn new(store: RoomStore, connections: Arc<dyn ConnectionManager>) -> Self {
        Self { store, connections }
    }

    /// Spawn the dispatcher task and return a handle for feeding it events.
    pub fn spawn(self) -> DispatcherHandle {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(self.run(receiver));
        DispatcherHandle { sender }
    }

    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<ClientEvent>) {
        info!("Dispatcher started");
        while let Some(event) = receiver.recv().await {
            self.handle_event(event).await;
        }
        info!("Dispatcher stopped, all handles dropped");
    }

    /// Apply one event to the registry and broadcast the resulting state.
    ///
    /// Never returns an error: every recoverable condition is a targeted
    /// error frame or a logged no-op, so one connection's bad input cannot
    /// disturb other rooms.
    pub async fn handle_event(&mut self, event: ClientEvent) {
        debug!(
            event_type = %event.event_type(),
            connection_id = %event.connection_id(),
            "Handling client event"
        );

        match event {
            ClientEvent::CreateRoom {
                connection_id,
                code,
            } => self.handle_create_room(&connection_id, code).await,
            ClientEvent::JoinRoom {
                connection_id,
                code,
            } => self.handle_join_room(&connection_id, &code).await,
            ClientEvent::StartGame {
                connection_id,
                code,
            } => self.handle_start_game(&connection_id, &code).await,
            ClientEvent::Answer {
                connection_id,
                code,
                answer,
            } => self.handle_answer(&connection_id, &code, answer).await,
            ClientEvent::Disconnected { connection_id } => {
                self.handle_disconnected(&connection_id).await
            }
        }
    }

    async fn handle_create_room(&mut self, connection_id: &str, code: Option<String>) {
        let outcome = self.store.create_room(connection_id, code);
        let update = match outcome {
            CreateOutcome::Created(update) | CreateOutcome::JoinedExisting(update) => update,
            CreateOutcome::AlreadyInRoom => return,
        };

        self.send_to(
            connection_id,
            &WebSocketMessage::room_created(update.code.clone()),
        )
        .await;
        self.broadcast(
            &update.code,
            &WebSocketMessage::room_update(update.code.clone(), update.player_count),
        )
        .await;
    }

    async fn handle_join_room(&mut self, connection_id: &str, code: &str) {
        match self.store.join_room(connection_id, code) {
            JoinOutcome::Joined(update) => {
                self.broadcast(
                    &update.code,
                    &WebSocketMessage::room_update(update.code.clone(), update.player_count),
                )
                .await;
            }
            JoinOutcome::RoomNotFound => {
                self.send_to(
                    connection_id,
                    &WebSocketMessage::error("Room not found".to_string()),
                )
                .await;
            }
            JoinOutcome::AlreadyInRoom => {}
        }
    }

    async fn handle_start_game(&mut self, connection_id: &str, code: &str) {
        match self.store.start_game(connection_id, code) {
            StartOutcome::Started { question, index } => {
                self.broadcast(code, &WebSocketMessage::new_question(&question, index))
                    .await;
            }
            StartOutcome::Ignored => {}
        }
    }

    async fn handle_answer(&mut self, connection_id: &str, code: &str, answer: SubmittedAnswer) {
        match self.store.record_answer(connection_id, code, &answer) {
            AnswerOutcome::Advanced {
                scores,
                question,
                index,
                ..
            } => {
                self.broadcast(code, &WebSocketMessage::scores(scores)).await;
                self.broadcast(code, &WebSocketMessage::new_question(&question, index))
                    .await;
            }
            AnswerOutcome::GameOver { scores, .. } => {
                self.broadcast(code, &WebSocketMessage::game_over(scores))
                    .await;
            }
            AnswerOutcome::NoActiveQuestion | AnswerOutcome::Ignored => {}
        }
    }

    async fn handle_disconnected(&mut self, connection_id: &str) {
        if let Some(update) = self.store.remove_connection(connection_id) {
            if update.player_count > 0 {
                self.broadcast(
                    &update.code,
                    &WebSocketMessage::room_update(update.code.clone(), update.player_count),
                )
                .await;
            }
        }
    }

    /// Send a frame to every player in a room.
    async fn broadcast(&self, code: &str, message: &WebSocketMessage) {
        let members = self.store.members(code);
        match serde_json::to_string(message) {
            Ok(json) => self.connections.send_to_connections(&members, &json).await,
            Err(e) => warn!(room_code = %code, error = %e, "Failed to serialize frame"),
        }
    }

    /// Send a frame to one connection.
    async fn send_to(&self, connection_id: &str, message: &WebSocketMessage) {
        match serde_json::to_string(message) {
            Ok(json) => self.connections.send_to_connection(connection_id, &json).await,
            Err(e) => {
                warn!(connection_id = %connection_id, error = %e, "Failed to serialize frame")
            }
        }
    }
}
