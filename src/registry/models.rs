use serde::{Deserialize, Serialize};

/// Lifecycle of a single room. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Waiting,
    InProgress,
    Finished,
}

/// One connected player inside a room.
///
/// Owned exclusively by its [`Room`]; created on join with a zero score,
/// removed on disconnect or room teardown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub connection_id: String,
    pub score: u32,
}

impl Player {
    pub fn new(connection_id: String) -> Self {
        Self {
            connection_id,
            score: 0,
        }
    }
}

/// A score line as broadcast to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerScore {
    pub connection_id: String,
    pub score: u32,
}

/// An isolated game session keyed by its short code.
#[derive(Debug, Clone)]
pub struct Room {
    pub code: String,
    pub players: Vec<Player>,
    pub current_index: usize,
    pub phase: GamePhase,
}

impl Room {
    pub fn new(code: String) -> Self {
        Self {
            code,
            players: Vec::new(),
            current_index: 0,
            phase: GamePhase::Waiting,
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn has_player(&self, connection_id: &str) -> bool {
        self.players.iter().any(|p| p.connection_id == connection_id)
    }

    /// Add a player to the room. Idempotent for an already present player.
    pub fn add_player(&mut self, connection_id: String) {
        if !self.has_player(&connection_id) {
            self.players.push(Player::new(connection_id));
        }
    }

    pub fn remove_player(&mut self, connection_id: &str) {
        self.players.retain(|p| p.connection_id != connection_id);
    }

    /// Current score tally in join order.
    pub fn scores(&self) -> Vec<PlayerScore> {
        self.players
            .iter()
            .map(|p| PlayerScore {
                connection_id: p.connection_id.clone(),
                score: p.score,
            })
            .collect()
    }
}

/// Membership snapshot returned by registry mutations so the dispatcher
/// can broadcast the new state.
#[derive(Debug, Clone)]
pub struct RoomUpdate {
    pub code: String,
    pub player_count: usize,
}
