//! The persistent game state and its core spin/answer transitions.
//!
//! [`GameState`] is an immutable value: every `with_*` method returns a new
//! state and leaves the receiver untouched. Input from outside the crate
//! (deserialized saves, hand-built snapshots) is validated once in
//! [`GameState::new`]; transitions operate on already-trusted values.
//!
//! Transitions that stamp a time come in two flavours: `with_x()` reads the
//! system clock and `with_x_at(now)` takes the instant explicitly.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::daily::DailyChallenge;
use crate::error::ValidationError;
use crate::multiplayer::{PlayerSlot, Players};
use crate::numbers::ratio;
use crate::powerups::{PowerUpKind, PowerUps};

/// Experience needed per level.
pub const XP_PER_LEVEL: u32 = 100;
/// Experience for any correct answer.
pub const BASE_ANSWER_XP: u32 = 10;
/// Extra experience once the streak reaches 5.
pub const STREAK_FIVE_BONUS_XP: u32 = 5;
/// Extra experience once the streak reaches 10, on top of the 5-streak bonus.
pub const STREAK_TEN_BONUS_XP: u32 = 10;
/// Tokens paid for a correct answer.
pub const TOKENS_PER_CORRECT: u32 = 1;
/// Spins required before a success celebration is considered.
pub const MIN_SPINS_FOR_SUCCESS: u32 = 8;
/// Success rate that triggers a celebration.
pub const SUCCESS_RATE_TARGET: f64 = 0.7;

/// Experience earned by a correct answer that brings the streak to `new_streak`.
#[must_use]
pub const fn answer_xp(new_streak: u32) -> u32 {
    let mut xp = BASE_ANSWER_XP;
    if new_streak >= 5 {
        xp += STREAK_FIVE_BONUS_XP;
    }
    if new_streak >= 10 {
        xp += STREAK_TEN_BONUS_XP;
    }
    xp
}

/// Level reached with `total_xp` experience.
#[must_use]
pub const fn level_for_xp(total_xp: u32) -> u32 {
    total_xp / XP_PER_LEVEL + 1
}

/// Raw, unvalidated game data in its camelCase wire shape.
///
/// Every field falls back to its default when absent, so older saves merge
/// over the current defaults.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    #[serde(default)]
    pub tokens: u32,
    #[serde(default)]
    pub current_rime: Option<String>,
    #[serde(default)]
    pub current_answer: Option<String>,
    #[serde(default)]
    pub is_spinning: bool,
    #[serde(default)]
    pub spin_count: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub last_played: Option<DateTime<Utc>>,
    #[serde(default)]
    pub experience_points: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub daily_challenge: DailyChallenge,
    #[serde(default)]
    pub daily_streak: u32,
    #[serde(default)]
    pub last_daily_date: Option<NaiveDate>,
    #[serde(default)]
    pub consecutive_days: u32,
    #[serde(default)]
    pub power_ups: PowerUps,
    #[serde(default)]
    pub active_power_up: Option<PowerUpKind>,
    #[serde(default)]
    pub purchased_skins: Vec<String>,
    #[serde(default)]
    pub tutorial_completed: bool,
    #[serde(default)]
    pub tutorial_step: u32,
    #[serde(default)]
    pub multiplayer_mode: bool,
    #[serde(default)]
    pub current_player: PlayerSlot,
    #[serde(default)]
    pub players: Players,
    #[serde(default)]
    pub pronunciation_enabled: bool,
    #[serde(default = "default_pronunciation_rate")]
    pub pronunciation_rate: f32,
    #[serde(default = "default_pronunciation_pitch")]
    pub pronunciation_pitch: f32,
    #[serde(default)]
    pub selected_voice: Option<String>,
}

const fn default_level() -> u32 {
    1
}

const fn default_pronunciation_rate() -> f32 {
    0.8
}

const fn default_pronunciation_pitch() -> f32 {
    1.2
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            tokens: 0,
            current_rime: None,
            current_answer: None,
            is_spinning: false,
            spin_count: 0,
            correct_answers: 0,
            current_streak: 0,
            best_streak: 0,
            last_played: None,
            experience_points: 0,
            level: default_level(),
            daily_challenge: DailyChallenge::default(),
            daily_streak: 0,
            last_daily_date: None,
            consecutive_days: 0,
            power_ups: PowerUps::default(),
            active_power_up: None,
            purchased_skins: Vec::new(),
            tutorial_completed: false,
            tutorial_step: 0,
            multiplayer_mode: false,
            current_player: PlayerSlot::One,
            players: Players::default(),
            pronunciation_enabled: false,
            pronunciation_rate: default_pronunciation_rate(),
            pronunciation_pitch: default_pronunciation_pitch(),
            selected_voice: None,
        }
    }
}

impl GameSnapshot {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.correct_answers > self.spin_count {
            return Err(ValidationError::CorrectExceedsSpins {
                correct: self.correct_answers,
                spins: self.spin_count,
            });
        }
        Ok(())
    }

    /// Bring derived fields back in line after a partial or older save was
    /// merged over the defaults.
    fn repaired(mut self) -> Self {
        self.best_streak = self.best_streak.max(self.current_streak);
        self.level = self.level.max(default_level());
        if !is_valid_speech_value(self.pronunciation_rate) {
            self.pronunciation_rate = default_pronunciation_rate();
        }
        if !is_valid_speech_value(self.pronunciation_pitch) {
            self.pronunciation_pitch = default_pronunciation_pitch();
        }
        self
    }
}

fn is_valid_speech_value(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// Position within the current level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub level: u32,
    pub current_xp: u32,
    pub xp_needed: u32,
    pub progress: f64,
    pub total_xp: u32,
}

/// Validated, immutable game state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "GameSnapshot", into = "GameSnapshot")]
pub struct GameState {
    snapshot: GameSnapshot,
}

impl TryFrom<GameSnapshot> for GameState {
    type Error = ValidationError;

    fn try_from(snapshot: GameSnapshot) -> Result<Self, Self::Error> {
        Self::new(snapshot)
    }
}

impl From<GameState> for GameSnapshot {
    fn from(state: GameState) -> Self {
        state.snapshot
    }
}

impl GameState {
    /// Validate a snapshot into a state. Derived fields that disagree with
    /// the rest of the snapshot (a best streak below the current one, level
    /// 0, an unusable speech rate or pitch) are repaired rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CorrectExceedsSpins`] when
    /// `correctAnswers > spinCount`.
    pub fn new(snapshot: GameSnapshot) -> Result<Self, ValidationError> {
        let snapshot = snapshot.repaired();
        snapshot.validate()?;
        Ok(Self { snapshot })
    }

    /// Decode a JSON save.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedState`] when the text is not a JSON
    /// object of the expected shape, or any invariant violation.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let snapshot: GameSnapshot =
            serde_json::from_str(json).map_err(|err| ValidationError::MalformedState {
                reason: err.to_string(),
            })?;
        Self::new(snapshot)
    }

    /// Encode for storage.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot)
    }

    /// Restore a saved state, falling back to a fresh one when the save is
    /// missing or unreadable.
    #[must_use]
    pub fn from_storage(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        Self::from_json(raw).unwrap_or_else(|err| {
            log::warn!("discarding unreadable saved game: {err}");
            Self::default()
        })
    }

    #[must_use]
    pub const fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn into_snapshot(self) -> GameSnapshot {
        self.snapshot
    }

    /// Apply `change` to a copy of this state. The result is trusted: callers
    /// inside the crate keep the invariants checked by [`GameState::new`].
    pub(crate) fn transition(&self, change: impl FnOnce(&mut GameSnapshot)) -> Self {
        let mut snapshot = self.snapshot.clone();
        change(&mut snapshot);
        debug_assert!(snapshot.validate().is_ok(), "transition broke an invariant");
        Self { snapshot }
    }

    #[must_use]
    pub const fn tokens(&self) -> u32 {
        self.snapshot.tokens
    }

    #[must_use]
    pub fn current_rime(&self) -> Option<&str> {
        self.snapshot.current_rime.as_deref()
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<&str> {
        self.snapshot.current_answer.as_deref()
    }

    #[must_use]
    pub const fn is_spinning(&self) -> bool {
        self.snapshot.is_spinning
    }

    #[must_use]
    pub const fn spin_count(&self) -> u32 {
        self.snapshot.spin_count
    }

    #[must_use]
    pub const fn correct_answers(&self) -> u32 {
        self.snapshot.correct_answers
    }

    #[must_use]
    pub const fn current_streak(&self) -> u32 {
        self.snapshot.current_streak
    }

    #[must_use]
    pub const fn best_streak(&self) -> u32 {
        self.snapshot.best_streak
    }

    #[must_use]
    pub const fn last_played(&self) -> Option<DateTime<Utc>> {
        self.snapshot.last_played
    }

    #[must_use]
    pub const fn experience_points(&self) -> u32 {
        self.snapshot.experience_points
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.snapshot.level
    }

    #[must_use]
    pub const fn daily_challenge(&self) -> &DailyChallenge {
        &self.snapshot.daily_challenge
    }

    #[must_use]
    pub const fn daily_streak(&self) -> u32 {
        self.snapshot.daily_streak
    }

    #[must_use]
    pub const fn last_daily_date(&self) -> Option<NaiveDate> {
        self.snapshot.last_daily_date
    }

    #[must_use]
    pub const fn consecutive_days(&self) -> u32 {
        self.snapshot.consecutive_days
    }

    #[must_use]
    pub const fn power_ups(&self) -> &PowerUps {
        &self.snapshot.power_ups
    }

    #[must_use]
    pub const fn active_power_up(&self) -> Option<PowerUpKind> {
        self.snapshot.active_power_up
    }

    #[must_use]
    pub fn purchased_skins(&self) -> &[String] {
        &self.snapshot.purchased_skins
    }

    #[must_use]
    pub const fn tutorial_completed(&self) -> bool {
        self.snapshot.tutorial_completed
    }

    #[must_use]
    pub const fn tutorial_step(&self) -> u32 {
        self.snapshot.tutorial_step
    }

    #[must_use]
    pub const fn is_multiplayer(&self) -> bool {
        self.snapshot.multiplayer_mode
    }

    #[must_use]
    pub const fn current_player(&self) -> PlayerSlot {
        self.snapshot.current_player
    }

    #[must_use]
    pub const fn pronunciation_enabled(&self) -> bool {
        self.snapshot.pronunciation_enabled
    }

    #[must_use]
    pub const fn pronunciation_rate(&self) -> f32 {
        self.snapshot.pronunciation_rate
    }

    #[must_use]
    pub const fn pronunciation_pitch(&self) -> f32 {
        self.snapshot.pronunciation_pitch
    }

    #[must_use]
    pub fn selected_voice(&self) -> Option<&str> {
        self.snapshot.selected_voice.as_deref()
    }

    /// Fraction of spins answered correctly, `0.0` before the first spin.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        ratio(self.snapshot.correct_answers, self.snapshot.spin_count)
    }

    #[must_use]
    pub fn should_celebrate_success(&self) -> bool {
        self.snapshot.spin_count >= MIN_SPINS_FOR_SUCCESS
            && self.success_rate() >= SUCCESS_RATE_TARGET
    }

    #[must_use]
    pub fn level_info(&self) -> LevelInfo {
        let total_xp = self.snapshot.experience_points;
        let current_xp = total_xp % XP_PER_LEVEL;
        LevelInfo {
            level: self.snapshot.level,
            current_xp,
            xp_needed: XP_PER_LEVEL - current_xp,
            progress: ratio(current_xp, XP_PER_LEVEL),
            total_xp,
        }
    }

    /// The wheel started turning toward `pattern`.
    #[must_use]
    pub fn with_spin_start(&self, pattern: &str) -> Self {
        self.transition(|s| {
            s.is_spinning = true;
            s.current_rime = Some(pattern.to_string());
            s.current_answer = None;
        })
    }

    /// The wheel stopped and `answer` is the word to find.
    #[must_use]
    pub fn with_spin_result(&self, answer: &str) -> Self {
        self.with_spin_result_at(answer, Utc::now())
    }

    #[must_use]
    pub fn with_spin_result_at(&self, answer: &str, now: DateTime<Utc>) -> Self {
        self.transition(|s| {
            s.is_spinning = false;
            s.current_answer = Some(answer.to_string());
            s.spin_count = s.spin_count.saturating_add(1);
            s.last_played = Some(now);
        })
    }

    /// Stop a spin that produced no question.
    #[must_use]
    pub fn with_spin_aborted(&self) -> Self {
        self.transition(|s| s.is_spinning = false)
    }

    /// Pay out a correct answer: a token, streak, experience and level.
    #[must_use]
    pub fn with_correct_answer(&self) -> Self {
        self.with_correct_answer_at(Utc::now())
    }

    #[must_use]
    pub fn with_correct_answer_at(&self, now: DateTime<Utc>) -> Self {
        self.transition(|s| {
            let streak = s.current_streak.saturating_add(1);
            s.tokens = s.tokens.saturating_add(TOKENS_PER_CORRECT);
            s.correct_answers = s.correct_answers.saturating_add(1);
            // An answer with no recorded spin still counts as one.
            s.spin_count = s.spin_count.max(s.correct_answers);
            s.current_streak = streak;
            s.best_streak = s.best_streak.max(streak);
            s.experience_points = s.experience_points.saturating_add(answer_xp(streak));
            s.level = level_for_xp(s.experience_points);
            s.last_played = Some(now);
        })
    }

    /// Break the streak. Tokens and experience are untouched.
    #[must_use]
    pub fn with_incorrect_answer(&self) -> Self {
        self.with_incorrect_answer_at(Utc::now())
    }

    #[must_use]
    pub fn with_incorrect_answer_at(&self, now: DateTime<Utc>) -> Self {
        self.transition(|s| {
            s.current_streak = 0;
            s.last_played = Some(now);
        })
    }

    #[must_use]
    pub fn with_pronunciation_enabled(&self, enabled: bool) -> Self {
        self.transition(|s| s.pronunciation_enabled = enabled)
    }

    /// Speech rate; negative or non-finite values are ignored.
    #[must_use]
    pub fn with_pronunciation_rate(&self, rate: f32) -> Self {
        if !is_valid_speech_value(rate) {
            return self.clone();
        }
        self.transition(|s| s.pronunciation_rate = rate)
    }

    /// Speech pitch; negative or non-finite values are ignored.
    #[must_use]
    pub fn with_pronunciation_pitch(&self, pitch: f32) -> Self {
        if !is_valid_speech_value(pitch) {
            return self.clone();
        }
        self.transition(|s| s.pronunciation_pitch = pitch)
    }

    #[must_use]
    pub fn with_selected_voice(&self, voice: Option<&str>) -> Self {
        self.transition(|s| s.selected_voice = voice.map(str::to_string))
    }

    /// Discard all progress.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self::default()
    }
}
