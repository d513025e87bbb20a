//! Multiple-choice questions and the difficulty levels that shape them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::word::Word;

/// Number of choices offered per question.
pub const CHOICE_COUNT: usize = 3;

/// Question difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Leading letters revealed by a hint.
    #[must_use]
    pub const fn hint_letters(self) -> usize {
        match self {
            Self::Easy => 2,
            Self::Medium => 1,
            Self::Hard => 0,
        }
    }

    /// Whether distractors may come from other rime families.
    #[must_use]
    pub const fn allows_cross_family(self) -> bool {
        matches!(self, Self::Hard)
    }

    /// Presentation settings for this difficulty.
    #[must_use]
    pub const fn config(self) -> DifficultyConfig {
        match self {
            Self::Easy => DifficultyConfig {
                name: "Easy",
                description: "First two letters shown as a hint",
                hint_letters: 2,
                show_emoji: true,
                time_limit_secs: None,
            },
            Self::Medium => DifficultyConfig {
                name: "Medium",
                description: "First letter shown as a hint",
                hint_letters: 1,
                show_emoji: true,
                time_limit_secs: None,
            },
            Self::Hard => DifficultyConfig {
                name: "Hard",
                description: "No hints, no pictures, 10 second timer",
                hint_letters: 0,
                show_emoji: false,
                time_limit_secs: Some(10),
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(()),
        }
    }
}

/// Static presentation hints for a difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyConfig {
    pub name: &'static str,
    pub description: &'static str,
    pub hint_letters: usize,
    pub show_emoji: bool,
    pub time_limit_secs: Option<u32>,
}

/// One round: a target word and three choices, exactly one of them correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    rime: String,
    correct_word: Word,
    choices: Vec<Word>,
    question_text: String,
    difficulty: Difficulty,
}

impl Question {
    /// Assemble and validate a question.
    ///
    /// `question_text` defaults to `"What is this? <emoji>"`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when there are not exactly three choices,
    /// when the correct word does not appear exactly once, when two choices
    /// share a spelling, or when an easy or medium question carries a word
    /// from another family.
    pub fn new(
        rime: &str,
        correct_word: Word,
        choices: Vec<Word>,
        question_text: Option<String>,
        difficulty: Difficulty,
    ) -> Result<Self, ValidationError> {
        if choices.len() != CHOICE_COUNT {
            return Err(ValidationError::ChoiceCount {
                count: choices.len(),
                expected: CHOICE_COUNT,
            });
        }
        let matches = choices
            .iter()
            .filter(|choice| choice.text() == correct_word.text())
            .count();
        if matches != 1 {
            return Err(ValidationError::CorrectChoice {
                text: correct_word.text().to_string(),
                matches,
            });
        }
        for (index, choice) in choices.iter().enumerate() {
            if choices[..index]
                .iter()
                .any(|earlier| earlier.text() == choice.text())
            {
                return Err(ValidationError::DuplicateChoice {
                    text: choice.text().to_string(),
                });
            }
            if !difficulty.allows_cross_family() && choice.rime() != rime {
                return Err(ValidationError::CrossFamilyChoice {
                    text: choice.text().to_string(),
                    rime: choice.rime().to_string(),
                    difficulty,
                });
            }
        }

        let question_text =
            question_text.unwrap_or_else(|| format!("What is this? {}", correct_word.emoji()));
        Ok(Self {
            rime: rime.to_string(),
            correct_word,
            choices,
            question_text,
            difficulty,
        })
    }

    #[must_use]
    pub fn rime(&self) -> &str {
        &self.rime
    }

    #[must_use]
    pub const fn correct_word(&self) -> &Word {
        &self.correct_word
    }

    #[must_use]
    pub fn choices(&self) -> &[Word] {
        &self.choices
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Case-insensitive comparison against the correct spelling.
    #[must_use]
    pub fn is_correct_answer(&self, text: &str) -> bool {
        text.to_lowercase() == self.correct_word.text()
    }

    /// Reveal the leading letters for this difficulty and mask the rest with
    /// underscores. Hard questions return an empty hint.
    #[must_use]
    pub fn hint(&self) -> String {
        let letters = self.difficulty.hint_letters();
        if letters == 0 {
            return String::new();
        }
        self.correct_word
            .text()
            .chars()
            .enumerate()
            .map(|(index, ch)| if index < letters { ch } else { '_' })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rime::Rime;
    use crate::word::WordEntry;

    fn rime(pattern: &str, words: &[(&str, &str)]) -> Rime {
        let entries: Vec<WordEntry> = words
            .iter()
            .map(|(text, emoji)| WordEntry::new(*text, *emoji))
            .collect();
        Rime::new(pattern, &entries, 0.0, 180.0).expect("valid rime")
    }

    fn at_rime() -> Rime {
        rime("-at", &[("cat", "🐱"), ("bat", "🦇"), ("hat", "🎩"), ("rat", "🐀")])
    }

    fn question(difficulty: Difficulty) -> Question {
        let words = at_rime().words().to_vec();
        Question::new("-at", words[0].clone(), words[..3].to_vec(), None, difficulty)
            .expect("valid question")
    }

    #[test]
    fn default_prompt_includes_emoji() {
        assert_eq!(question(Difficulty::Medium).question_text(), "What is this? 🐱");
        let custom = Question::new(
            "-at",
            at_rime().words()[0].clone(),
            at_rime().words()[..3].to_vec(),
            Some("Find the cat".to_string()),
            Difficulty::Easy,
        )
        .expect("valid question");
        assert_eq!(custom.question_text(), "Find the cat");
    }

    #[test]
    fn answers_compare_case_insensitively() {
        let q = question(Difficulty::Medium);
        assert!(q.is_correct_answer("cat"));
        assert!(q.is_correct_answer("CAT"));
        assert!(!q.is_correct_answer("bat"));
    }

    #[test]
    fn hints_follow_difficulty() {
        assert_eq!(question(Difficulty::Easy).hint(), "ca_");
        assert_eq!(question(Difficulty::Medium).hint(), "c__");
        assert_eq!(question(Difficulty::Hard).hint(), "");
    }

    #[test]
    fn requires_exactly_three_choices() {
        let words = at_rime().words().to_vec();
        let err = Question::new("-at", words[0].clone(), words.clone(), None, Difficulty::Easy)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::ChoiceCount {
                count: 4,
                expected: 3
            }
        );
    }

    #[test]
    fn correct_word_must_be_present_once() {
        let words = at_rime().words().to_vec();
        let missing = Question::new(
            "-at",
            words[3].clone(),
            words[..3].to_vec(),
            None,
            Difficulty::Easy,
        );
        assert!(matches!(
            missing,
            Err(ValidationError::CorrectChoice { matches: 0, .. })
        ));

        let doubled = Question::new(
            "-at",
            words[0].clone(),
            vec![words[0].clone(), words[0].clone(), words[1].clone()],
            None,
            Difficulty::Easy,
        );
        assert!(matches!(
            doubled,
            Err(ValidationError::CorrectChoice { matches: 2, .. })
        ));
    }

    #[test]
    fn duplicate_distractors_are_rejected() {
        let words = at_rime().words().to_vec();
        let err = Question::new(
            "-at",
            words[0].clone(),
            vec![words[0].clone(), words[1].clone(), words[1].clone()],
            None,
            Difficulty::Medium,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateChoice { .. }));
    }

    #[test]
    fn cross_family_choices_only_allowed_when_hard() {
        let at = at_rime();
        let og = rime("-og", &[("dog", "🐶"), ("log", "🪵"), ("fog", "🌫️")]);
        let choices = vec![
            at.words()[0].clone(),
            at.words()[1].clone(),
            og.words()[0].clone(),
        ];
        let err = Question::new(
            "-at",
            at.words()[0].clone(),
            choices.clone(),
            None,
            Difficulty::Medium,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::CrossFamilyChoice { .. }));
        assert!(
            Question::new("-at", at.words()[0].clone(), choices, None, Difficulty::Hard).is_ok()
        );
    }

    #[test]
    fn difficulty_parses_and_displays() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Medium);
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert_eq!(Difficulty::Hard.config().time_limit_secs, Some(10));
        assert!(!Difficulty::Hard.config().show_emoji);
    }
}
