use crate::quiz::SubmittedAnswer;

/// Inbound events from client connections.
///
/// Every event carries the originating connection id; the dispatcher uses
/// it both as the player identity and as the target for any error frame.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Allocate or register a room and join the caller
    CreateRoom {
        connection_id: String,
        code: Option<String>,
    },

    /// Add the caller to an existing room
    JoinRoom {
        connection_id: String,
        code: String,
    },

    /// Transition a waiting room into a running round
    StartGame {
        connection_id: String,
        code: String,
    },

    /// Submit an answer to the room's current question
    Answer {
        connection_id: String,
        code: String,
        answer: SubmittedAnswer,
    },

    /// Transport-level disconnect; tears down membership
    Disconnected { connection_id: String },
}

impl ClientEvent {
    pub fn connection_id(&self) -> &str {
        match self {
            ClientEvent::CreateRoom { connection_id, .. } => connection_id,
            ClientEvent::JoinRoom { connection_id, .. } => connection_id,
            ClientEvent::StartGame { connection_id, .. } => connection_id,
            ClientEvent::Answer { connection_id, .. } => connection_id,
            ClientEvent::Disconnected { connection_id } => connection_id,
        }
    }

    /// Human-readable event name for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            ClientEvent::CreateRoom { .. } => "create_room",
            ClientEvent::JoinRoom { .. } => "join_room",
            ClientEvent::StartGame { .. } => "start_game",
            ClientEvent::Answer { .. } => "answer",
            ClientEvent::Disconnected { .. } => "disconnected",
        }
    }
}
