//! Daily challenge bookkeeping and the consecutive-day bonus ladder.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::state::GameState;

/// Correct answers required on the first day of a streak.
pub const BASE_DAILY_TARGET: u32 = 5;
/// Every this many consecutive days adds one to the daily target.
pub const DAYS_PER_TARGET_STEP: u32 = 3;
/// Flat tokens granted when a completed challenge is claimed.
pub const DAILY_REWARD_TOKENS: u32 = 10;

/// Today's challenge: answer `target` questions correctly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyChallenge {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default = "default_target")]
    pub target: u32,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub reward_claimed: bool,
}

impl Default for DailyChallenge {
    fn default() -> Self {
        Self {
            date: None,
            target: BASE_DAILY_TARGET,
            progress: 0,
            completed: false,
            reward_claimed: false,
        }
    }
}

const fn default_target() -> u32 {
    BASE_DAILY_TARGET
}

impl DailyChallenge {
    /// Whether a completed challenge still has an unclaimed reward.
    #[must_use]
    pub const fn can_claim(&self) -> bool {
        self.completed && !self.reward_claimed
    }
}

/// Target for a challenge started after `consecutive_days` days in a row.
#[must_use]
pub const fn daily_target(consecutive_days: u32) -> u32 {
    BASE_DAILY_TARGET + consecutive_days / DAYS_PER_TARGET_STEP
}

/// Tenure bonus for a run of consecutive days.
#[must_use]
pub const fn daily_bonus_for(consecutive_days: u32) -> u32 {
    match consecutive_days {
        0 => 0,
        1 => 5,
        2 => 10,
        3 => 15,
        4 => 20,
        5 | 6 => 30,
        _ => 50,
    }
}

impl GameState {
    /// Whether the stored challenge belongs to a day other than today.
    #[must_use]
    pub fn needs_daily_reset(&self) -> bool {
        self.needs_daily_reset_on(Utc::now().date_naive())
    }

    #[must_use]
    pub fn needs_daily_reset_on(&self, today: NaiveDate) -> bool {
        self.daily_challenge().date != Some(today)
    }

    /// Start today's challenge, extending the consecutive-day run when the
    /// previous challenge was yesterday.
    #[must_use]
    pub fn with_daily_reset(&self) -> Self {
        self.with_daily_reset_on(Utc::now().date_naive())
    }

    #[must_use]
    pub fn with_daily_reset_on(&self, today: NaiveDate) -> Self {
        let yesterday = today.pred_opt();
        let consecutive = if yesterday.is_some() && self.last_daily_date() == yesterday {
            self.consecutive_days().saturating_add(1)
        } else {
            1
        };
        self.transition(|s| {
            s.consecutive_days = consecutive;
            s.daily_streak = consecutive;
            s.last_daily_date = Some(today);
            s.daily_challenge = DailyChallenge {
                date: Some(today),
                target: daily_target(consecutive),
                progress: 0,
                completed: false,
                reward_claimed: false,
            };
        })
    }

    /// Count one correct answer toward today's challenge. No-op once completed.
    #[must_use]
    pub fn with_daily_progress(&self) -> Self {
        if self.daily_challenge().completed {
            return self.clone();
        }
        self.transition(|s| {
            let challenge = &mut s.daily_challenge;
            challenge.progress = challenge.progress.saturating_add(1);
            challenge.completed = challenge.progress >= challenge.target;
        })
    }

    /// Mark the reward claimed and grant [`DAILY_REWARD_TOKENS`].
    ///
    /// Unconditional: callers check [`DailyChallenge::can_claim`] first.
    #[must_use]
    pub fn with_claimed_daily_reward(&self) -> Self {
        self.transition(|s| {
            s.daily_challenge.reward_claimed = true;
            s.tokens = s.tokens.saturating_add(DAILY_REWARD_TOKENS);
        })
    }

    /// Tenure-scaled bonus for the current consecutive-day run.
    #[must_use]
    pub fn daily_bonus(&self) -> u32 {
        daily_bonus_for(self.consecutive_days())
    }
}
