// Library crate for the quizroom trivia game server
// This file exposes the public API for integration tests

pub mod dispatcher;
pub mod quiz;
pub mod registry;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use dispatcher::{ClientEvent, Dispatcher, DispatcherHandle};
pub use quiz::{builtin_questions, Question, SubmittedAnswer};
pub use registry::{GamePhase, PlayerScore, Room, RoomStore};
pub use shared::AppError;
pub use websockets::{
    ConnectionManager, InMemoryConnectionManager, MessageHandler, MessageType, WebSocketMessage,
    WebsocketReceiveHandler,
};
