// Public API
pub use models::{GamePhase, Player, PlayerScore, Room, RoomUpdate};
pub use store::{AnswerOutcome, CreateOutcome, JoinOutcome, RoomStore, StartOutcome};

// Internal modules
mod models;
mod store;
