//! Power-up inventory and activation.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::state::GameState;

/// Kinds of consumable power-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    HintShield,
    DoubleToken,
    StreakFreeze,
}

impl PowerUpKind {
    pub const ALL: [Self; 3] = [Self::HintShield, Self::DoubleToken, Self::StreakFreeze];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HintShield => "hintShield",
            Self::DoubleToken => "doubleToken",
            Self::StreakFreeze => "streakFreeze",
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerUpKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or(())
    }
}

/// Owned power-up counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUps {
    #[serde(default)]
    pub hint_shield: u32,
    #[serde(default)]
    pub double_token: u32,
    #[serde(default)]
    pub streak_freeze: u32,
}

impl Default for PowerUps {
    fn default() -> Self {
        Self {
            hint_shield: 1,
            double_token: 1,
            streak_freeze: 0,
        }
    }
}

impl PowerUps {
    #[must_use]
    pub const fn count(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::HintShield => self.hint_shield,
            PowerUpKind::DoubleToken => self.double_token,
            PowerUpKind::StreakFreeze => self.streak_freeze,
        }
    }

    fn count_mut(&mut self, kind: PowerUpKind) -> &mut u32 {
        match kind {
            PowerUpKind::HintShield => &mut self.hint_shield,
            PowerUpKind::DoubleToken => &mut self.double_token,
            PowerUpKind::StreakFreeze => &mut self.streak_freeze,
        }
    }

    pub(crate) fn grant(&mut self, kind: PowerUpKind, amount: u32) {
        let slot = self.count_mut(kind);
        *slot = slot.saturating_add(amount);
    }

    fn consume(&mut self, kind: PowerUpKind) {
        let slot = self.count_mut(kind);
        *slot = slot.saturating_sub(1);
    }
}

impl GameState {
    #[must_use]
    pub fn has_power_up(&self, kind: PowerUpKind) -> bool {
        self.power_ups().count(kind) > 0
    }

    /// Spend one `kind` and make it active. Returns an unchanged copy when
    /// none are owned.
    #[must_use]
    pub fn activate_power_up(&self, kind: PowerUpKind) -> Self {
        self.use_power_up(kind).unwrap_or_else(|| self.clone())
    }

    /// Like [`GameState::activate_power_up`] but returns `None` when none are owned.
    #[must_use]
    pub fn use_power_up(&self, kind: PowerUpKind) -> Option<Self> {
        if !self.has_power_up(kind) {
            log::debug!("no {kind} available to activate");
            return None;
        }
        Some(self.transition(|s| {
            s.power_ups.consume(kind);
            s.active_power_up = Some(kind);
        }))
    }

    #[must_use]
    pub fn deactivate_power_up(&self) -> Self {
        self.transition(|s| s.active_power_up = None)
    }

    /// Grant `amount` of `kind`.
    #[must_use]
    pub fn with_power_up_bonus(&self, kind: PowerUpKind, amount: u32) -> Self {
        self.transition(|s| s.power_ups.grant(kind, amount))
    }

    /// Rewards for reaching `level`: a streak freeze every 5 levels, a hint
    /// shield every 3 and a double token every 2. Grants stack.
    #[must_use]
    pub fn with_level_up_power_ups(&self, level: u32) -> Self {
        self.transition(|s| {
            if level % 5 == 0 {
                s.power_ups.grant(PowerUpKind::StreakFreeze, 1);
            }
            if level % 3 == 0 {
                s.power_ups.grant(PowerUpKind::HintShield, 1);
            }
            if level % 2 == 0 {
                s.power_ups.grant(PowerUpKind::DoubleToken, 1);
            }
        })
    }
}
