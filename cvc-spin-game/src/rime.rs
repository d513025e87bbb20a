//! Rime families: a shared ending plus the words that use it and the slice
//! of the wheel the family occupies.

use once_cell::sync::Lazy;
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::word::{Word, WordEntry};

/// Fewest words a rime may hold; a question needs one answer and two distractors.
pub const MIN_RIME_WORDS: usize = 3;
/// Most words a rime may hold.
pub const MAX_RIME_WORDS: usize = 8;
/// Full turn of the wheel in degrees.
pub const FULL_TURN_DEGREES: f64 = 360.0;

static RIME_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^-?[a-z]+$").ok());

/// Whether `pattern` is an acceptable rime label such as `-at`.
#[must_use]
pub fn is_rime_pattern(pattern: &str) -> bool {
    RIME_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(pattern))
}

/// Raw rime record as loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RimeEntry {
    pub pattern: String,
    pub words: Vec<WordEntry>,
}

impl RimeEntry {
    #[must_use]
    pub fn new(pattern: impl Into<String>, words: Vec<WordEntry>) -> Self {
        Self {
            pattern: pattern.into(),
            words,
        }
    }
}

/// A validated word family occupying `[angle_start, angle_end)` on the wheel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rime {
    pattern: String,
    words: Vec<Word>,
    angle_start: f64,
    angle_end: f64,
}

impl Rime {
    /// Build a rime from raw word entries and its wheel slice.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the pattern is malformed, the word
    /// count falls outside `3..=8`, a word fails validation or repeats, or the
    /// angles do not describe a slice within `[0, 360]`.
    pub fn new(
        pattern: &str,
        words: &[WordEntry],
        angle_start: f64,
        angle_end: f64,
    ) -> Result<Self, ValidationError> {
        if !is_rime_pattern(pattern) {
            return Err(ValidationError::InvalidPattern {
                pattern: pattern.to_string(),
            });
        }
        if !(MIN_RIME_WORDS..=MAX_RIME_WORDS).contains(&words.len()) {
            return Err(ValidationError::WordCount {
                pattern: pattern.to_string(),
                count: words.len(),
                min: MIN_RIME_WORDS,
                max: MAX_RIME_WORDS,
            });
        }
        if !(0.0..FULL_TURN_DEGREES).contains(&angle_start) {
            return Err(ValidationError::AngleStart { value: angle_start });
        }
        if !(angle_end > angle_start && angle_end <= FULL_TURN_DEGREES) {
            return Err(ValidationError::AngleEnd {
                start: angle_start,
                end: angle_end,
            });
        }

        let mut validated: Vec<Word> = Vec::with_capacity(words.len());
        for entry in words {
            let word = Word::new(entry, pattern)?;
            if validated.iter().any(|seen| seen.text() == word.text()) {
                return Err(ValidationError::DuplicateWord {
                    pattern: pattern.to_string(),
                    text: word.text().to_string(),
                });
            }
            validated.push(word);
        }

        Ok(Self {
            pattern: pattern.to_string(),
            words: validated,
            angle_start,
            angle_end,
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    #[must_use]
    pub const fn angle_start(&self) -> f64 {
        self.angle_start
    }

    #[must_use]
    pub const fn angle_end(&self) -> f64 {
        self.angle_end
    }

    /// Midpoint of the slice, where the pointer lands for this family.
    #[must_use]
    pub fn center_angle(&self) -> f64 {
        f64::midpoint(self.angle_start, self.angle_end)
    }

    /// Find a word in this family by its spelling.
    #[must_use]
    pub fn word(&self, text: &str) -> Option<&Word> {
        let needle = text.to_lowercase();
        self.words.iter().find(|word| word.text() == needle)
    }

    /// Uniformly pick one of this family's words.
    pub fn pick_random_word<R: Rng + ?Sized>(&self, rng: &mut R) -> &Word {
        let index = rng.gen_range(0..self.words.len());
        &self.words[index]
    }

    /// Return the family's words in a uniformly shuffled order.
    pub fn shuffle_words<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Word> {
        let mut words = self.words.clone();
        words.shuffle(rng);
        words
    }

    /// Convert back to the configuration shape.
    #[must_use]
    pub fn to_entry(&self) -> RimeEntry {
        RimeEntry::new(
            self.pattern.clone(),
            self.words.iter().map(Word::to_entry).collect(),
        )
    }
}
