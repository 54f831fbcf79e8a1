use serde::{Deserialize, Serialize};

/// A single trivia question.
///
/// The correct answer is always stored as an index into `options`; clients
/// may submit either the index or the option text, and both are normalized
/// through [`Question::resolve_answer`] before comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

/// An answer as submitted by a client: either an option index or the
/// option text itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SubmittedAnswer {
    Index(usize),
    Text(String),
}

impl Question {
    pub fn new(text: &str, options: &[&str], correct_index: usize) -> Self {
        Self {
            text: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_index,
        }
    }

    /// Normalize a submitted answer to an option index.
    ///
    /// Returns `None` when the index is out of range or the text matches
    /// no option.
    pub fn resolve_answer(&self, submitted: &SubmittedAnswer) -> Option<usize> {
        match submitted {
            SubmittedAnswer::Index(index) if *index < self.options.len() => Some(*index),
            SubmittedAnswer::Index(_) => None,
            SubmittedAnswer::Text(text) => self.options.iter().position(|o| o == text),
        }
    }

    /// Whether a submitted answer names this question's correct option.
    pub fn is_correct(&self, submitted: &SubmittedAnswer) -> bool {
        self.resolve_answer(submitted) == Some(self.correct_index)
    }
}

/// The built-in question list. Rounds iterate it in order; a round ends
/// when the list is exhausted.
pub fn builtin_questions() -> Vec<Question> {
    vec![
        Question::new(
            "Capital of France?",
            &["Paris", "Rome", "Madrid", "Berlin"],
            0,
        ),
        Question::new("2 + 2 = ?", &["3", "4", "5", "22"], 1),
        Question::new("Color of the sky?", &["Blue", "Green", "Red", "Purple"], 0),
    ]
}
