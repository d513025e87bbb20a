//! Two-player pass-and-play scoring.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state::GameState;

/// Score a player needs to win a multiplayer match.
pub const WINNING_SCORE: u32 = 10;

/// One of the two seats in a multiplayer match. Serialized as `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerSlot {
    #[default]
    One,
    Two,
}

impl PlayerSlot {
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl TryFrom<u8> for PlayerSlot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(format!("player must be 1 or 2 (got {other})")),
        }
    }
}

impl From<PlayerSlot> for u8 {
    fn from(slot: PlayerSlot) -> Self {
        slot.number()
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Per-player tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub streak: u32,
}

/// Both players' tallies, keyed `"1"` and `"2"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Players {
    #[serde(rename = "1", default)]
    pub one: PlayerStats,
    #[serde(rename = "2", default)]
    pub two: PlayerStats,
}

impl Players {
    #[must_use]
    pub const fn get(&self, slot: PlayerSlot) -> PlayerStats {
        match slot {
            PlayerSlot::One => self.one,
            PlayerSlot::Two => self.two,
        }
    }

    fn get_mut(&mut self, slot: PlayerSlot) -> &mut PlayerStats {
        match slot {
            PlayerSlot::One => &mut self.one,
            PlayerSlot::Two => &mut self.two,
        }
    }
}

/// Standing of a multiplayer match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStanding {
    Tie,
    Leader(PlayerSlot),
}

impl GameState {
    /// Enter multiplayer with fresh scores and player one to move.
    #[must_use]
    pub fn with_multiplayer_enabled(&self) -> Self {
        self.transition(|s| {
            s.multiplayer_mode = true;
            s.current_player = PlayerSlot::One;
            s.players = Players::default();
        })
    }

    /// Back to single player; the turn returns to player one.
    #[must_use]
    pub fn with_multiplayer_disabled(&self) -> Self {
        self.transition(|s| {
            s.multiplayer_mode = false;
            s.current_player = PlayerSlot::One;
        })
    }

    #[must_use]
    pub fn with_player_correct_answer(&self, slot: PlayerSlot) -> Self {
        self.transition(|s| {
            let stats = s.players.get_mut(slot);
            stats.score = stats.score.saturating_add(1);
            stats.correct_answers = stats.correct_answers.saturating_add(1);
            stats.streak = stats.streak.saturating_add(1);
        })
    }

    /// Break `slot`'s streak; score is untouched.
    #[must_use]
    pub fn with_player_incorrect_answer(&self, slot: PlayerSlot) -> Self {
        self.transition(|s| s.players.get_mut(slot).streak = 0)
    }

    #[must_use]
    pub fn with_next_player(&self) -> Self {
        self.transition(|s| s.current_player = s.current_player.other())
    }

    #[must_use]
    pub fn player_stats(&self, slot: PlayerSlot) -> PlayerStats {
        self.snapshot().players.get(slot)
    }

    #[must_use]
    pub fn player_score(&self, slot: PlayerSlot) -> u32 {
        self.player_stats(slot).score
    }

    /// Who is ahead, or `None` outside multiplayer.
    #[must_use]
    pub fn winner(&self) -> Option<MatchStanding> {
        if !self.is_multiplayer() {
            return None;
        }
        let one = self.player_score(PlayerSlot::One);
        let two = self.player_score(PlayerSlot::Two);
        Some(match one.cmp(&two) {
            std::cmp::Ordering::Equal => MatchStanding::Tie,
            std::cmp::Ordering::Greater => MatchStanding::Leader(PlayerSlot::One),
            std::cmp::Ordering::Less => MatchStanding::Leader(PlayerSlot::Two),
        })
    }

    /// Whether `slot` has reached [`WINNING_SCORE`].
    #[must_use]
    pub fn has_won(&self, slot: PlayerSlot) -> bool {
        self.is_multiplayer() && self.player_score(slot) >= WINNING_SCORE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_taking_updates_only_the_answering_player() {
        let state = GameState::default()
            .with_multiplayer_enabled()
            .with_player_correct_answer(PlayerSlot::One)
            .with_next_player();
        assert_eq!(state.current_player(), PlayerSlot::Two);
        assert_eq!(state.player_stats(PlayerSlot::One).score, 1);
        assert_eq!(state.player_stats(PlayerSlot::Two).score, 0);
    }

    #[test]
    fn incorrect_answer_resets_streak_but_keeps_score() {
        let state = GameState::default()
            .with_multiplayer_enabled()
            .with_player_correct_answer(PlayerSlot::Two)
            .with_player_correct_answer(PlayerSlot::Two)
            .with_player_incorrect_answer(PlayerSlot::Two);
        let stats = state.player_stats(PlayerSlot::Two);
        assert_eq!(stats.score, 2);
        assert_eq!(stats.correct_answers, 2);
        assert_eq!(stats.streak, 0);
    }

    #[test]
    fn enabling_resets_the_scoreboard() {
        let played = GameState::default()
            .with_multiplayer_enabled()
            .with_player_correct_answer(PlayerSlot::One)
            .with_next_player();
        let fresh = played.with_multiplayer_enabled();
        assert_eq!(fresh.current_player(), PlayerSlot::One);
        assert_eq!(fresh.player_stats(PlayerSlot::One), PlayerStats::default());
    }

    #[test]
    fn winner_reports_tie_leader_or_nothing() {
        let single = GameState::default();
        assert_eq!(single.winner(), None);

        let tied = single.with_multiplayer_enabled();
        assert_eq!(tied.winner(), Some(MatchStanding::Tie));

        let ahead = tied.with_player_correct_answer(PlayerSlot::Two);
        assert_eq!(ahead.winner(), Some(MatchStanding::Leader(PlayerSlot::Two)));
        assert_eq!(ahead.with_multiplayer_disabled().winner(), None);
    }

    #[test]
    fn leaving_multiplayer_hands_the_turn_back_to_player_one() {
        let state = GameState::default()
            .with_multiplayer_enabled()
            .with_player_correct_answer(PlayerSlot::One)
            .with_next_player();
        assert_eq!(state.current_player(), PlayerSlot::Two);
        let single = state.with_multiplayer_disabled();
        assert!(!single.is_multiplayer());
        assert_eq!(single.current_player(), PlayerSlot::One);
    }

    #[test]
    fn reaching_winning_score_wins() {
        let mut state = GameState::default().with_multiplayer_enabled();
        for _ in 0..WINNING_SCORE {
            assert!(!state.has_won(PlayerSlot::One));
            state = state.with_player_correct_answer(PlayerSlot::One);
        }
        assert!(state.has_won(PlayerSlot::One));
        assert!(!state.has_won(PlayerSlot::Two));
    }

    #[test]
    fn slots_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&PlayerSlot::Two).expect("serializes"), "2");
        assert!(serde_json::from_str::<PlayerSlot>("3").is_err());
        let players = serde_json::to_value(Players::default()).expect("serializes");
        assert!(players.get("1").is_some());
        assert!(players.get("2").is_some());
    }
}
