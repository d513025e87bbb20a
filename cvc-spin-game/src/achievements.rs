//! Achievement catalog and the tracker that unlocks entries from it.
//!
//! Some achievements read the [`GameState`], others read counters that only
//! the tracker keeps (recent answer times, per-family tallies). Both kinds are
//! declared as a [`Condition`] and judged against a single
//! [`EvaluationContext`], so every check sees the same inputs.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::numbers::{ratio, round_percentage, usize_to_u32};
use crate::state::GameState;

/// Families with a dedicated mastery achievement.
pub const MASTERY_FAMILIES: [&str; 15] = [
    "-at", "-og", "-ip", "-et", "-ub", "-an", "-ig", "-op", "-en", "-ug", "-ut", "-ot", "-un",
    "-am", "-ed",
];
/// Correct answers inside one family needed for its mastery achievement.
pub const MASTERY_THRESHOLD: u32 = 3;
/// Trailing window for the speed achievement.
pub const SPEED_WINDOW_SECS: i64 = 30;
/// Correct answers needed inside the speed window.
pub const SPEED_ANSWERS: usize = 5;

/// Everything a [`Condition`] may look at.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub state: Option<&'a GameState>,
    pub level: Option<u32>,
    pub recent_correct: &'a VecDeque<DateTime<Utc>>,
    pub family_counts: &'a BTreeMap<String, u32>,
    pub families_touched: &'a BTreeSet<String>,
    pub total_families: usize,
}

/// Declarative unlock rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Condition {
    SpinCount { at_least: u32 },
    CorrectAnswers { at_least: u32 },
    Streak { at_least: u32 },
    PerfectRound { min_spins: u32 },
    Tokens { at_least: u32 },
    RecentCorrect { at_least: usize },
    FamilyMastery { family: &'static str },
    FamiliesTouched { at_least: usize },
    AllFamiliesTouched,
    Level { at_least: u32 },
}

impl Condition {
    #[must_use]
    pub fn is_met(&self, ctx: &EvaluationContext<'_>) -> bool {
        match *self {
            Self::SpinCount { at_least } => ctx.state.is_some_and(|s| s.spin_count() >= at_least),
            Self::CorrectAnswers { at_least } => {
                ctx.state.is_some_and(|s| s.correct_answers() >= at_least)
            }
            Self::Streak { at_least } => {
                ctx.state.is_some_and(|s| s.current_streak() >= at_least)
            }
            Self::PerfectRound { min_spins } => ctx.state.is_some_and(|s| {
                s.spin_count() >= min_spins && s.correct_answers() == s.spin_count()
            }),
            Self::Tokens { at_least } => ctx.state.is_some_and(|s| s.tokens() >= at_least),
            Self::RecentCorrect { at_least } => ctx.recent_correct.len() >= at_least,
            Self::FamilyMastery { family } => ctx
                .family_counts
                .get(family)
                .is_some_and(|count| *count >= MASTERY_THRESHOLD),
            Self::FamiliesTouched { at_least } => ctx.families_touched.len() >= at_least,
            Self::AllFamiliesTouched => {
                ctx.total_families > 0 && ctx.families_touched.len() >= ctx.total_families
            }
            Self::Level { at_least } => ctx.level.is_some_and(|level| level >= at_least),
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub condition: Condition,
}

const fn mastery(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    family: &'static str,
) -> Achievement {
    Achievement {
        id,
        name,
        description,
        icon: "🎓",
        condition: Condition::FamilyMastery { family },
    }
}

/// Every achievement, in display order.
pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first-spin",
        name: "First Spin!",
        description: "Spin the wheel for the first time",
        icon: "🎡",
        condition: Condition::SpinCount { at_least: 1 },
    },
    Achievement {
        id: "first-correct",
        name: "Getting Started",
        description: "Answer correctly for the first time",
        icon: "🌟",
        condition: Condition::CorrectAnswers { at_least: 1 },
    },
    Achievement {
        id: "streak-3",
        name: "Hot Streak!",
        description: "Get 3 correct answers in a row",
        icon: "🔥",
        condition: Condition::Streak { at_least: 3 },
    },
    Achievement {
        id: "streak-5",
        name: "On Fire!",
        description: "Get 5 correct answers in a row",
        icon: "💥",
        condition: Condition::Streak { at_least: 5 },
    },
    Achievement {
        id: "streak-10",
        name: "Unstoppable!",
        description: "Get 10 correct answers in a row",
        icon: "⚡",
        condition: Condition::Streak { at_least: 10 },
    },
    Achievement {
        id: "perfect-round",
        name: "Perfect Round",
        description: "Complete a round with 100% accuracy (min 5 spins)",
        icon: "💯",
        condition: Condition::PerfectRound { min_spins: 5 },
    },
    Achievement {
        id: "tokens-5",
        name: "Token Collector",
        description: "Earn 5 tokens",
        icon: "🪙",
        condition: Condition::Tokens { at_least: 5 },
    },
    Achievement {
        id: "tokens-10",
        name: "Treasure Hunter",
        description: "Earn 10 tokens",
        icon: "💎",
        condition: Condition::Tokens { at_least: 10 },
    },
    Achievement {
        id: "tokens-20",
        name: "Dragon Hoard",
        description: "Earn 20 tokens",
        icon: "🐉",
        condition: Condition::Tokens { at_least: 20 },
    },
    Achievement {
        id: "spinner-10",
        name: "Dedicated Spinner",
        description: "Spin the wheel 10 times",
        icon: "🎯",
        condition: Condition::SpinCount { at_least: 10 },
    },
    Achievement {
        id: "spinner-50",
        name: "Wheel Master",
        description: "Spin the wheel 50 times",
        icon: "🏆",
        condition: Condition::SpinCount { at_least: 50 },
    },
    Achievement {
        id: "speed-demon",
        name: "Speed Demon",
        description: "Get 5 correct answers within 30 seconds",
        icon: "⏱️",
        condition: Condition::RecentCorrect {
            at_least: SPEED_ANSWERS,
        },
    },
    Achievement {
        id: "word-family-master",
        name: "Word Family Master",
        description: "Answer correctly in every word family",
        icon: "📚",
        condition: Condition::AllFamiliesTouched,
    },
    mastery("mastery-at", "-at Family Expert", "Get 3 correct answers in the -at family", "-at"),
    mastery("mastery-og", "-og Family Expert", "Get 3 correct answers in the -og family", "-og"),
    mastery("mastery-ip", "-ip Family Expert", "Get 3 correct answers in the -ip family", "-ip"),
    mastery("mastery-et", "-et Family Expert", "Get 3 correct answers in the -et family", "-et"),
    mastery("mastery-ub", "-ub Family Expert", "Get 3 correct answers in the -ub family", "-ub"),
    mastery("mastery-an", "-an Family Expert", "Get 3 correct answers in the -an family", "-an"),
    mastery("mastery-ig", "-ig Family Expert", "Get 3 correct answers in the -ig family", "-ig"),
    mastery("mastery-op", "-op Family Expert", "Get 3 correct answers in the -op family", "-op"),
    mastery("mastery-en", "-en Family Expert", "Get 3 correct answers in the -en family", "-en"),
    mastery("mastery-ug", "-ug Family Expert", "Get 3 correct answers in the -ug family", "-ug"),
    mastery("mastery-ut", "-ut Family Expert", "Get 3 correct answers in the -ut family", "-ut"),
    mastery("mastery-ot", "-ot Family Expert", "Get 3 correct answers in the -ot family", "-ot"),
    mastery("mastery-un", "-un Family Expert", "Get 3 correct answers in the -un family", "-un"),
    mastery("mastery-am", "-am Family Expert", "Get 3 correct answers in the -am family", "-am"),
    mastery("mastery-ed", "-ed Family Expert", "Get 3 correct answers in the -ed family", "-ed"),
    Achievement {
        id: "halfway-master",
        name: "Half Way Hero",
        description: "Answer correctly in 8 word families",
        icon: "🏅",
        condition: Condition::FamiliesTouched { at_least: 8 },
    },
    Achievement {
        id: "level-5",
        name: "Rising Star",
        description: "Reach level 5",
        icon: "⭐",
        condition: Condition::Level { at_least: 5 },
    },
    Achievement {
        id: "level-10",
        name: "Word Wizard",
        description: "Reach level 10",
        icon: "🌟",
        condition: Condition::Level { at_least: 10 },
    },
];

/// Look up a catalog entry by id.
#[must_use]
pub fn find_achievement(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|achievement| achievement.id == id)
}

/// Unlocked versus total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementProgress {
    pub unlocked: u32,
    pub total: u32,
    pub percentage: u32,
}

/// Remembers unlocked achievements and the counters that live outside
/// [`GameState`]. Each achievement unlocks at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementTracker {
    unlocked: BTreeSet<&'static str>,
    recent_correct: VecDeque<DateTime<Utc>>,
    family_counts: BTreeMap<String, u32>,
    families_touched: BTreeSet<String>,
    total_families: usize,
}

impl Default for AchievementTracker {
    fn default() -> Self {
        Self::new(MASTERY_FAMILIES.len())
    }
}

impl AchievementTracker {
    /// `total_families` is how many distinct families count as "every family".
    #[must_use]
    pub fn new(total_families: usize) -> Self {
        Self {
            unlocked: BTreeSet::new(),
            recent_correct: VecDeque::new(),
            family_counts: BTreeMap::new(),
            families_touched: BTreeSet::new(),
            total_families,
        }
    }

    /// Unlock anything the current state now satisfies.
    pub fn check_achievements(&mut self, state: &GameState) -> Vec<&'static Achievement> {
        self.evaluate(Some(state), None)
    }

    /// Record one correct answer and unlock counter-based achievements.
    /// Call exactly once per correct answer.
    pub fn track_correct_answer(&mut self, word: &str, family: &str) -> Vec<&'static Achievement> {
        self.track_correct_answer_at(word, family, Utc::now())
    }

    pub fn track_correct_answer_at(
        &mut self,
        word: &str,
        family: &str,
        now: DateTime<Utc>,
    ) -> Vec<&'static Achievement> {
        log::trace!("tracking correct answer `{word}` in {family}");
        let window_start = now - TimeDelta::seconds(SPEED_WINDOW_SECS);
        self.recent_correct.push_back(now);
        while self
            .recent_correct
            .front()
            .is_some_and(|seen| *seen <= window_start)
        {
            self.recent_correct.pop_front();
        }
        self.families_touched.insert(family.to_string());
        let count = self.family_counts.entry(family.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        self.evaluate(None, None)
    }

    /// Unlock level milestones reached at `level`.
    pub fn check_level_achievements(&mut self, level: u32) -> Vec<&'static Achievement> {
        self.evaluate(None, Some(level))
    }

    #[must_use]
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Unlocked catalog entries in display order.
    pub fn unlocked(&self) -> impl Iterator<Item = &'static Achievement> + '_ {
        ACHIEVEMENTS
            .iter()
            .filter(|achievement| self.unlocked.contains(achievement.id))
    }

    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    #[must_use]
    pub const fn total_count(&self) -> usize {
        ACHIEVEMENTS.len()
    }

    #[must_use]
    pub fn progress(&self) -> AchievementProgress {
        let unlocked = usize_to_u32(self.unlocked_count());
        let total = usize_to_u32(self.total_count());
        AchievementProgress {
            unlocked,
            total,
            percentage: round_percentage(ratio(unlocked, total)),
        }
    }

    /// How many families count as "every family".
    #[must_use]
    pub const fn total_families(&self) -> usize {
        self.total_families
    }

    /// Follow a reconfigured wheel and unlock anything the new family count
    /// now allows.
    pub fn set_total_families(&mut self, total: usize) -> Vec<&'static Achievement> {
        self.total_families = total;
        self.evaluate(None, None)
    }

    /// Correct answers recorded for `family`.
    #[must_use]
    pub fn family_correct_count(&self, family: &str) -> u32 {
        self.family_counts.get(family).copied().unwrap_or(0)
    }

    /// Forget every unlock and counter.
    pub fn reset(&mut self) {
        self.unlocked.clear();
        self.recent_correct.clear();
        self.family_counts.clear();
        self.families_touched.clear();
    }

    fn evaluate(
        &mut self,
        state: Option<&GameState>,
        level: Option<u32>,
    ) -> Vec<&'static Achievement> {
        let ctx = EvaluationContext {
            state,
            level,
            recent_correct: &self.recent_correct,
            family_counts: &self.family_counts,
            families_touched: &self.families_touched,
            total_families: self.total_families,
        };
        let newly: Vec<&'static Achievement> = ACHIEVEMENTS
            .iter()
            .filter(|achievement| {
                !self.unlocked.contains(achievement.id) && achievement.condition.is_met(&ctx)
            })
            .collect();
        for achievement in &newly {
            log::info!("achievement unlocked: {} ({})", achievement.name, achievement.id);
            self.unlocked.insert(achievement.id);
        }
        newly
    }
}
