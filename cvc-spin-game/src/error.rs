//! Error types surfaced by the game core.
//!
//! Construction of domain values (words, rimes, questions, states) reports
//! malformed input through [`ValidationError`]. Persistence backends report
//! through [`StorageError`]. Ordinary player actions that are not legal in the
//! current state never produce errors; they are ignored by the transition.

use thiserror::Error;

use crate::question::Difficulty;

/// Malformed input rejected at a construction boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("word `{text}` is not a consonant-vowel-consonant word")]
    NotCvc { text: String },
    #[error("word `{text}` requires a non-empty emoji")]
    EmptyEmoji { text: String },
    #[error("rime pattern `{pattern}` must be lowercase letters with an optional `-` prefix")]
    InvalidPattern { pattern: String },
    #[error("rime `{pattern}` requires {min} to {max} words (got {count})")]
    WordCount {
        pattern: String,
        count: usize,
        min: usize,
        max: usize,
    },
    #[error("rime `{pattern}` contains `{text}` more than once")]
    DuplicateWord { pattern: String, text: String },
    #[error("angle start {value} must be within [0, 360)")]
    AngleStart { value: f64 },
    #[error("angle end {end} must be greater than start {start} and at most 360")]
    AngleEnd { start: f64, end: f64 },
    #[error("rime pattern `{pattern}` is configured more than once")]
    DuplicatePattern { pattern: String },
    #[error("rime set must contain at least one rime")]
    EmptyRimeSet,
    #[error("rime configuration could not be parsed: {reason}")]
    MalformedConfig { reason: String },
    #[error("rime `{pattern}` has only {count} words; a question needs at least {needed}")]
    DegenerateRime {
        pattern: String,
        count: usize,
        needed: usize,
    },
    #[error("question requires exactly {expected} choices (got {count})")]
    ChoiceCount { count: usize, expected: usize },
    #[error("question requires exactly one choice matching `{text}` (found {matches})")]
    CorrectChoice { text: String, matches: usize },
    #[error("choice `{text}` appears more than once")]
    DuplicateChoice { text: String },
    #[error("choice `{text}` belongs to `{rime}`, not allowed in {difficulty} questions")]
    CrossFamilyChoice {
        text: String,
        rime: String,
        difficulty: Difficulty,
    },
    #[error("correctAnswers ({correct}) must be less than or equal to spinCount ({spins})")]
    CorrectExceedsSpins { correct: u32, spins: u32 },
    #[error("saved game state could not be decoded: {reason}")]
    MalformedState { reason: String },
}

/// Failure reported by a key-value persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend is unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded writing {bytes} bytes to `{key}`")]
    QuotaExceeded { key: String, bytes: usize },
    #[error("failed to encode value for storage")]
    Encode(#[from] serde_json::Error),
}
