//! Builds questions for a landed rime.
//!
//! The correct word is drawn uniformly from the family. Distractors are the
//! family's other words in list order, capped at two. Hard questions then
//! have a 30% chance of trading the last distractor for a word from a
//! different, uniformly chosen family, so every question keeps exactly three
//! choices. Choices are shuffled unless the caller asks for a fixed order.

use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use crate::error::ValidationError;
use crate::question::{CHOICE_COUNT, Difficulty, Question};
use crate::rime::Rime;
use crate::rimes::RimeSet;
use crate::word::Word;

/// Probability that a hard question swaps in a word from another family.
pub const CROSS_FAMILY_CHANCE: f64 = 0.3;

/// Knobs for question generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionOptions {
    pub difficulty: Difficulty,
    pub randomize_choices: bool,
}

impl Default for QuestionOptions {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            randomize_choices: true,
        }
    }
}

impl QuestionOptions {
    #[must_use]
    pub const fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            randomize_choices: true,
        }
    }
}

/// Build a question for `rime`, drawing cross-family words from `rimes`.
///
/// # Errors
///
/// Returns [`ValidationError::DegenerateRime`] if the family cannot supply an
/// answer and two distractors, or any error raised while assembling the
/// [`Question`].
pub fn create_question<R: Rng + ?Sized>(
    rime: &Rime,
    rimes: &RimeSet,
    options: QuestionOptions,
    rng: &mut R,
) -> Result<Question, ValidationError> {
    if rime.words().len() < CHOICE_COUNT {
        return Err(ValidationError::DegenerateRime {
            pattern: rime.pattern().to_string(),
            count: rime.words().len(),
            needed: CHOICE_COUNT,
        });
    }

    let correct = rime.pick_random_word(rng).clone();
    let mut distractors: SmallVec<[Word; 2]> = rime
        .words()
        .iter()
        .filter(|word| word.text() != correct.text())
        .take(CHOICE_COUNT - 1)
        .cloned()
        .collect();

    if options.difficulty.allows_cross_family() && rng.gen_bool(CROSS_FAMILY_CHANCE) {
        if let Some(intruder) = pick_cross_family_word(rime, rimes, &correct, &distractors, rng) {
            log::debug!(
                "hard question for {} swaps in `{}` from {}",
                rime.pattern(),
                intruder.text(),
                intruder.rime()
            );
            if let Some(last) = distractors.last_mut() {
                *last = intruder;
            }
        }
    }

    let mut choices: Vec<Word> = Vec::with_capacity(CHOICE_COUNT);
    choices.push(correct.clone());
    choices.extend(distractors);
    if options.randomize_choices {
        choices.shuffle(rng);
    }

    Question::new(rime.pattern(), correct, choices, None, options.difficulty)
}

/// Pick a random family from `rimes` and build a question for it.
///
/// # Errors
///
/// Same as [`create_question`].
pub fn create_random_question<R: Rng + ?Sized>(
    rimes: &RimeSet,
    options: QuestionOptions,
    rng: &mut R,
) -> Result<Question, ValidationError> {
    let rime = rimes.pick_random(rng);
    create_question(rime, rimes, options, rng)
}

fn pick_cross_family_word<R: Rng + ?Sized>(
    rime: &Rime,
    rimes: &RimeSet,
    correct: &Word,
    distractors: &[Word],
    rng: &mut R,
) -> Option<Word> {
    let other = rimes.pick_other(rime.pattern(), rng)?;
    let word = other.pick_random_word(rng);
    let clashes = word.text() == correct.text()
        || distractors
            .iter()
            .any(|distractor| distractor.text() == word.text());
    (!clashes).then(|| word.clone())
}
