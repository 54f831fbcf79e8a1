use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::models::{GamePhase, PlayerScore, Room, RoomUpdate};
use crate::quiz::{Question, SubmittedAnswer};

const CODE_LENGTH: usize = 6;
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Result of attempting to create a room
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    /// A fresh room was allocated and the caller joined it
    Created(RoomUpdate),
    /// The requested code already existed; the caller joined that room
    JoinedExisting(RoomUpdate),
    /// The caller is already a member of a different room
    AlreadyInRoom,
}

/// Result of attempting to join a room by code
#[derive(Debug, Clone)]
pub enum JoinOutcome {
    /// Joined (or was already a member of) the room
    Joined(RoomUpdate),
    /// The code has no registry entry; nothing was mutated
    RoomNotFound,
    /// The caller is already a member of a different room
    AlreadyInRoom,
}

/// Result of attempting to start a round
#[derive(Debug, Clone)]
pub enum StartOutcome {
    /// The round started; carries the first question and its number
    Started { question: Question, index: usize },
    /// Unknown room, non-member caller, or the round already started
    Ignored,
}

/// Result of recording a submitted answer
#[derive(Debug, Clone)]
pub enum AnswerOutcome {
    /// Progress advanced; carries the updated tally and the next question
    Advanced {
        correct: bool,
        scores: Vec<PlayerScore>,
        question: Question,
        index: usize,
    },
    /// The question list is exhausted; the room is now finished
    GameOver {
        correct: bool,
        scores: Vec<PlayerScore>,
    },
    /// No question is in flight for this room
    NoActiveQuestion,
    /// Unknown room or non-member connection; nothing was mutated
    Ignored,
}

/// In-memory room registry.
///
/// Owned by the dispatcher task, which is the only code that ever touches
/// it, so no locking is needed: every mutation runs to completion before
/// the next event is handled. Besides the code-keyed room map it maintains
/// a connection-to-room reverse index so disconnect cleanup is a single
/// lookup rather than a scan over every room.
pub struct RoomStore {
    rooms: HashMap<String, Room>,
    /// connection_id -> room code
    membership: HashMap<String, String>,
    questions: Vec<Question>,
}

impl RoomStore {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            rooms: HashMap::new(),
            membership: HashMap::new(),
            questions,
        }
    }

    /// Create a room and join the caller as its first player.
    ///
    /// A caller-supplied code is honored idempotently: if the code is
    /// already registered the caller simply joins that room. With no code
    /// supplied a fresh 6-character code is generated, retrying until it
    /// is unused.
    pub fn create_room(&mut self, connection_id: &str, requested_code: Option<String>) -> CreateOutcome {
        if self.is_in_other_room(connection_id, requested_code.as_deref()) {
            debug!(connection_id = %connection_id, "Create ignored, connection already in a room");
            return CreateOutcome::AlreadyInRoom;
        }

        let (code, existed) = match requested_code {
            Some(code) if self.rooms.contains_key(&code) => (code, true),
            Some(code) => (code, false),
            None => (self.generate_code(), false),
        };

        let room = self
            .rooms
            .entry(code.clone())
            .or_insert_with(|| Room::new(code.clone()));
        room.add_player(connection_id.to_string());
        let player_count = room.player_count();
        self.membership
            .insert(connection_id.to_string(), code.clone());

        let update = RoomUpdate {
            code: code.clone(),
            player_count,
        };

        if existed {
            info!(room_code = %code, connection_id = %connection_id, "Joined existing room via create");
            CreateOutcome::JoinedExisting(update)
        } else {
            info!(room_code = %code, connection_id = %connection_id, "Room created");
            CreateOutcome::Created(update)
        }
    }

    /// Join an existing room, appending a zero-score player.
    pub fn join_room(&mut self, connection_id: &str, code: &str) -> JoinOutcome {
        if self.is_in_other_room(connection_id, Some(code)) {
            debug!(connection_id = %connection_id, "Join ignored, connection already in a room");
            return JoinOutcome::AlreadyInRoom;
        }

        let room = match self.rooms.get_mut(code) {
            Some(room) => room,
            None => {
                debug!(room_code = %code, connection_id = %connection_id, "Room not found");
                return JoinOutcome::RoomNotFound;
            }
        };

        room.add_player(connection_id.to_string());
        self.membership
            .insert(connection_id.to_string(), code.to_string());

        info!(
            room_code = %code,
            connection_id = %connection_id,
            player_count = room.player_count(),
            "Player joined room"
        );

        JoinOutcome::Joined(RoomUpdate {
            code: code.to_string(),
            player_count: room.player_count(),
        })
    }

    /// Start a round: Waiting -> InProgress, issuing question 0.
    pub fn start_game(&mut self, connection_id: &str, code: &str) -> StartOutcome {
        let room = match self.rooms.get_mut(code) {
            Some(room) => room,
            None => {
                debug!(room_code = %code, "Start ignored, room not found");
                return StartOutcome::Ignored;
            }
        };

        if !room.has_player(connection_id) {
            debug!(room_code = %code, connection_id = %connection_id, "Start ignored, not a member");
            return StartOutcome::Ignored;
        }

        if room.phase != GamePhase::Waiting {
            debug!(room_code = %code, phase = ?room.phase, "Start ignored, round already started");
            return StartOutcome::Ignored;
        }

        room.phase = GamePhase::InProgress;
        room.current_index = 0;

        match self.questions.first() {
            Some(question) => {
                info!(room_code = %code, "Round started");
                StartOutcome::Started {
                    question: question.clone(),
                    index: 0,
                }
            }
            None => {
                // Empty question list: the round finishes before it begins
                warn!(room_code = %code, "Round started with no questions configured");
                room.phase = GamePhase::Finished;
                StartOutcome::Ignored
            }
        }
    }

    /// Record a submitted answer against the room's current question.
    ///
    /// Scores the answering player on a match and advances progress either
    /// way; any answer event moves the whole room to the next question.
    pub fn record_answer(
        &mut self,
        connection_id: &str,
        code: &str,
        submitted: &SubmittedAnswer,
    ) -> AnswerOutcome {
        let room = match self.rooms.get_mut(code) {
            Some(room) => room,
            None => {
                debug!(room_code = %code, "Answer ignored, room not found");
                return AnswerOutcome::Ignored;
            }
        };

        if !room.has_player(connection_id) {
            debug!(room_code = %code, connection_id = %connection_id, "Answer ignored, not a member");
            return AnswerOutcome::Ignored;
        }

        if room.phase != GamePhase::InProgress {
            warn!(room_code = %code, phase = ?room.phase, "Answer with no question in flight");
            return AnswerOutcome::NoActiveQuestion;
        }

        let question = match self.questions.get(room.current_index) {
            Some(question) => question,
            None => {
                warn!(room_code = %code, index = room.current_index, "Answer with no question in flight");
                return AnswerOutcome::NoActiveQuestion;
            }
        };

        let correct = question.is_correct(submitted);
        if correct {
            if let Some(player) = room
                .players
                .iter_mut()
                .find(|p| p.connection_id == connection_id)
            {
                player.score += 1;
            }
        }
        room.current_index += 1;

        debug!(
            room_code = %code,
            connection_id = %connection_id,
            correct = correct,
            next_index = room.current_index,
            "Answer recorded"
        );

        match self.questions.get(room.current_index) {
            Some(next) => AnswerOutcome::Advanced {
                correct,
                scores: room.scores(),
                question: next.clone(),
                index: room.current_index,
            },
            None => {
                room.phase = GamePhase::Finished;
                info!(room_code = %code, "Round finished, questions exhausted");
                AnswerOutcome::GameOver {
                    correct,
                    scores: room.scores(),
                }
            }
        }
    }

    /// Remove a connection from its room, deleting the room when its
    /// player set becomes empty. Returns the membership change, if any.
    pub fn remove_connection(&mut self, connection_id: &str) -> Option<RoomUpdate> {
        let code = self.membership.remove(connection_id)?;
        let room = self.rooms.get_mut(&code)?;

        room.remove_player(connection_id);
        let player_count = room.player_count();

        if player_count == 0 {
            info!(room_code = %code, "Room is now empty, deleting");
            self.rooms.remove(&code);
        } else {
            info!(
                room_code = %code,
                connection_id = %connection_id,
                player_count = player_count,
                "Player removed from room"
            );
        }

        Some(RoomUpdate { code, player_count })
    }

    pub fn get_room(&self, code: &str) -> Option<&Room> {
        self.rooms.get(code)
    }

    /// Connection ids of every player in a room, in join order.
    pub fn members(&self, code: &str) -> Vec<String> {
        self.rooms
            .get(code)
            .map(|room| room.players.iter().map(|p| p.connection_id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn is_in_other_room(&self, connection_id: &str, code: Option<&str>) -> bool {
        match self.membership.get(connection_id) {
            Some(current) => Some(current.as_str()) != code,
            None => false,
        }
    }

    /// Generate an unused 6-character uppercase alphanumeric code.
    fn generate_code(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let code: String = (0..CODE_LENGTH)
                .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
                .collect();
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new(crate::quiz::builtin_questions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::builtin_questions;

    fn store() -> RoomStore {
        RoomStore::new(builtin_questions())
    }

    #[test]
    fn test_create_room_with_requested_code() {
        let mut store = store();
        let outcome = store.create_room("conn-1", Some("ABC123".to_string()));

        match outcome {
            CreateOutcome::Created(update) => {
                assert_eq!(update.code, "ABC123");
                assert_eq!(update.player_count, 1);
            }
            other => panic!("expected Created, got {:?}", other),
        }
        assert!(store.get_room("ABC123").is_some());
    }

    #[test]
    fn test_create_room_generates_unused_code() {
        let mut store = store();
        let code = match store.create_room("conn-1", None) {
            CreateOutcome::Created(update) => update.code,
            other => panic!("expected Created, got {:?}", other),
        };

        assert_eq!(code.len(), 6);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert!(store.get_room(&code).is_some());
    }

    #[test]
    fn test_create_with_existing_code_joins_that_room() {
        let mut store = store();
        store.create_room("conn-1", Some("ABC123".to_string()));
        let outcome = store.create_room("conn-2", Some("ABC123".to_string()));

        match outcome {
            CreateOutcome::JoinedExisting(update) => {
                assert_eq!(update.code, "ABC123");
                assert_eq!(update.player_count, 2);
            }
            other => panic!("expected JoinedExisting, got {:?}", other),
        }
        assert_eq!(store.room_count(), 1);
    }

    #[test]
    fn test_join_unknown_code_mutates_nothing() {
        let mut store = store();
        let outcome = store.join_room("conn-1", "ZZZZZZ");

        assert!(matches!(outcome, JoinOutcome::RoomNotFound));
        assert_eq!(store.room_count(), 0);
        assert!(store.remove_connection("conn-1").is_none());
    }

    #[test]
    fn test_join_appends_zero_score_player() {
        let mut store = store();
        store.create_room("host", Some("ABC123".to_string()));

        let outcome = store.join_room("conn-2", "ABC123");
        match outcome {
            JoinOutcome::Joined(update) => assert_eq!(update.player_count, 2),
            other => panic!("expected Joined, got {:?}", other),
        }

        let room = store.get_room("ABC123").unwrap();
        assert!(room.scores().iter().all(|s| s.score == 0));
    }

    #[test]
    fn test_join_while_in_another_room_is_ignored() {
        let mut store = store();
        store.create_room("host-a", Some("AAAAAA".to_string()));
        store.create_room("host-b", Some("BBBBBB".to_string()));
        store.join_room("conn-1", "AAAAAA");

        let outcome = store.join_room("conn-1", "BBBBBB");
        assert!(matches!(outcome, JoinOutcome::AlreadyInRoom));
        assert_eq!(store.get_room("BBBBBB").unwrap().player_count(), 1);
    }

    #[test]
    fn test_start_game_issues_first_question() {
        let mut store = store();
        store.create_room("host", Some("ABC123".to_string()));

        match store.start_game("host", "ABC123") {
            StartOutcome::Started { question, index } => {
                assert_eq!(index, 0);
                assert_eq!(question, builtin_questions()[0]);
            }
            other => panic!("expected Started, got {:?}", other),
        }
        assert_eq!(store.get_room("ABC123").unwrap().phase, GamePhase::InProgress);
    }

    #[test]
    fn test_start_game_twice_is_ignored() {
        let mut store = store();
        store.create_room("host", Some("ABC123".to_string()));
        store.start_game("host", "ABC123");

        assert!(matches!(
            store.start_game("host", "ABC123"),
            StartOutcome::Ignored
        ));
    }

    #[test]
    fn test_correct_answer_scores_and_advances() {
        let mut store = store();
        store.create_room("x", Some("ABC123".to_string()));
        store.join_room("y", "ABC123");
        store.start_game("x", "ABC123");

        let outcome = store.record_answer("x", "ABC123", &SubmittedAnswer::Index(0));
        match outcome {
            AnswerOutcome::Advanced {
                correct,
                scores,
                index,
                ..
            } => {
                assert!(correct);
                assert_eq!(index, 1);
                assert_eq!(scores[0].score, 1); // x
                assert_eq!(scores[1].score, 0); // y
            }
            other => panic!("expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_answer_advances_without_scoring() {
        let mut store = store();
        store.create_room("x", Some("ABC123".to_string()));
        store.start_game("x", "ABC123");

        let outcome = store.record_answer("x", "ABC123", &SubmittedAnswer::Index(1));
        match outcome {
            AnswerOutcome::Advanced { correct, scores, .. } => {
                assert!(!correct);
                assert_eq!(scores[0].score, 0);
            }
            other => panic!("expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_question_exhaustion_finishes_the_round() {
        let mut store = store();
        store.create_room("x", Some("ABC123".to_string()));
        store.start_game("x", "ABC123");

        let answers = [
            SubmittedAnswer::Index(0),
            SubmittedAnswer::Index(1),
            SubmittedAnswer::Index(0),
        ];
        let mut last = AnswerOutcome::Ignored;
        for answer in &answers {
            last = store.record_answer("x", "ABC123", answer);
        }

        match last {
            AnswerOutcome::GameOver { scores, .. } => {
                assert_eq!(scores[0].score, 3);
            }
            other => panic!("expected GameOver, got {:?}", other),
        }
        assert_eq!(store.get_room("ABC123").unwrap().phase, GamePhase::Finished);

        // Further answers find no active question
        assert!(matches!(
            store.record_answer("x", "ABC123", &SubmittedAnswer::Index(0)),
            AnswerOutcome::NoActiveQuestion
        ));
    }

    #[test]
    fn test_answer_before_start_is_no_active_question() {
        let mut store = store();
        store.create_room("x", Some("ABC123".to_string()));

        assert!(matches!(
            store.record_answer("x", "ABC123", &SubmittedAnswer::Index(0)),
            AnswerOutcome::NoActiveQuestion
        ));
    }

    #[test]
    fn test_answer_from_stranger_is_ignored() {
        let mut store = store();
        store.create_room("x", Some("ABC123".to_string()));
        store.start_game("x", "ABC123");

        assert!(matches!(
            store.record_answer("stranger", "ABC123", &SubmittedAnswer::Index(0)),
            AnswerOutcome::Ignored
        ));
        assert_eq!(store.get_room("ABC123").unwrap().current_index, 0);
    }

    #[test]
    fn test_remove_connection_deletes_empty_room() {
        let mut store = store();
        store.create_room("x", Some("ABC123".to_string()));
        store.join_room("y", "ABC123");

        let update = store.remove_connection("x").unwrap();
        assert_eq!(update.player_count, 1);
        assert!(store.get_room("ABC123").is_some());

        let update = store.remove_connection("y").unwrap();
        assert_eq!(update.player_count, 0);
        assert!(store.get_room("ABC123").is_none());
        assert_eq!(store.room_count(), 0);
    }

    #[test]
    fn test_remove_unknown_connection_is_none() {
        let mut store = store();
        assert!(store.remove_connection("ghost").is_none());
    }
}
