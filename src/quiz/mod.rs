// Public API
pub use questions::{builtin_questions, Question, SubmittedAnswer};

// Internal modules
mod questions;
