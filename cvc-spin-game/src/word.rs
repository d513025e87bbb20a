//! Vocabulary entries shown on the wheel and offered as answer choices.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Consonant cluster, one vowel, consonant cluster. Single-letter clusters give
/// the classic CVC shape; longer clusters admit words such as `chip` or `frog`.
static CVC_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)^[bcdfghjklmnpqrstvwxyz]+[aeiou][bcdfghjklmnpqrstvwxyz]+$").ok()
});

/// Raw word record as it appears in rime configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub text: String,
    pub emoji: String,
}

impl WordEntry {
    #[must_use]
    pub fn new(text: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emoji: emoji.into(),
        }
    }
}

/// A validated word belonging to exactly one rime family.
///
/// Words are only minted by [`crate::Rime`], which stamps its own pattern
/// on each entry, so a `Word` always agrees with the family that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    text: String,
    emoji: String,
    rime: String,
}

impl Word {
    /// Validate and normalize a word for the given rime pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotCvc`] when the text is not CVC-shaped and
    /// [`ValidationError::EmptyEmoji`] when no emoji is provided.
    pub(crate) fn new(entry: &WordEntry, rime: &str) -> Result<Self, ValidationError> {
        let text = entry.text.trim();
        if !is_cvc(text) {
            return Err(ValidationError::NotCvc {
                text: entry.text.clone(),
            });
        }
        let emoji = entry.emoji.trim();
        if emoji.is_empty() {
            return Err(ValidationError::EmptyEmoji {
                text: entry.text.clone(),
            });
        }
        Ok(Self {
            text: text.to_lowercase(),
            emoji: emoji.to_string(),
            rime: rime.to_string(),
        })
    }

    /// Lowercase spelling of the word.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Picture clue for the word.
    #[must_use]
    pub fn emoji(&self) -> &str {
        &self.emoji
    }

    /// Pattern of the owning rime, e.g. `-at`.
    #[must_use]
    pub fn rime(&self) -> &str {
        &self.rime
    }

    /// Convert back to the configuration shape.
    #[must_use]
    pub fn to_entry(&self) -> WordEntry {
        WordEntry::new(self.text.clone(), self.emoji.clone())
    }
}

/// Whether `text` has the consonant-vowel-consonant shape accepted by the game.
#[must_use]
pub fn is_cvc(text: &str) -> bool {
    CVC_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}
