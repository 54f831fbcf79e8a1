use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::{Question, SubmittedAnswer};
use crate::registry::PlayerScore;

/// Message types for WebSocket communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    // Client -> Server
    CreateRoom,
    JoinRoom,
    StartGame,
    Answer,

    // Server -> Client
    RoomCreated,
    RoomUpdate,
    NewQuestion,
    Scores,
    GameOver,
    Error,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
    pub connection_id: Option<String>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomPayload {
    /// Caller-supplied room code; the server generates one when absent
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartGamePayload {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub code: String,
    /// Option index or option text; normalized server-side
    pub answer: SubmittedAnswer,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreatedPayload {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomUpdatePayload {
    pub code: String,
    pub player_count: usize,
}

/// The active question as shown to clients. The correct index is never
/// serialized out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestionPayload {
    pub text: String,
    pub options: Vec<String>,
    /// Zero-based question number within the round
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoresPayload {
    pub scores: Vec<PlayerScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOverPayload {
    pub scores: Vec<PlayerScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
                connection_id: None,
            }),
        }
    }

    /// Create a ROOM_CREATED message
    pub fn room_created(code: String) -> Self {
        let payload = RoomCreatedPayload { code };
        Self::new(
            MessageType::RoomCreated,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a ROOM_UPDATE message
    pub fn room_update(code: String, player_count: usize) -> Self {
        let payload = RoomUpdatePayload { code, player_count };
        Self::new(
            MessageType::RoomUpdate,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a NEW_QUESTION message
    pub fn new_question(question: &Question, index: usize) -> Self {
        let payload = NewQuestionPayload {
            text: question.text.clone(),
            options: question.options.clone(),
            index,
        };
        Self::new(
            MessageType::NewQuestion,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a SCORES message
    pub fn scores(scores: Vec<PlayerScore>) -> Self {
        let payload = ScoresPayload { scores };
        Self::new(MessageType::Scores, serde_json::to_value(payload).unwrap())
    }

    /// Create a GAME_OVER message
    pub fn game_over(scores: Vec<PlayerScore>) -> Self {
        let payload = GameOverPayload { scores };
        Self::new(
            MessageType::GameOver,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create an ERROR message
    pub fn error(message: String) -> Self {
        let payload = ErrorPayload { message };
        Self::new(MessageType::Error, serde_json::to_value(payload).unwrap())
    }
}
