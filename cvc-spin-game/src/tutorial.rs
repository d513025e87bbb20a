//! First-run walkthrough.
use serde::Serialize;

use crate::numbers::usize_to_u32;
use crate::state::GameState;

/// One page of the walkthrough. `highlight` names the control it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TutorialStep {
    pub id: &'static str,
    pub title: &'static str,
    pub text: &'static str,
    pub icon: &'static str,
    pub highlight: Option<&'static str>,
}

pub const TUTORIAL_STEPS: &[TutorialStep] = &[
    TutorialStep {
        id: "welcome",
        title: "Welcome to CVC Spin!",
        text: "Learn to read word families by spinning the wheel and matching words!",
        icon: "🎡",
        highlight: None,
    },
    TutorialStep {
        id: "spin",
        title: "Spin the Wheel",
        text: "Press SPIN to land on a word family pattern.",
        icon: "🎯",
        highlight: Some("spin-button"),
    },
    TutorialStep {
        id: "question",
        title: "Answer the Question",
        text: "After spinning you'll see a picture. Choose the word that matches it!",
        icon: "❓",
        highlight: Some("choices"),
    },
    TutorialStep {
        id: "tokens",
        title: "Earn Tokens",
        text: "Correct answers earn tokens. Spend them on power-ups and cosmetics in the shop.",
        icon: "🪙",
        highlight: Some("token-display"),
    },
    TutorialStep {
        id: "level",
        title: "Level Up",
        text: "Earn XP with each correct answer. Level up to unlock achievements and earn power-ups!",
        icon: "⭐",
        highlight: Some("level-display"),
    },
    TutorialStep {
        id: "powerups",
        title: "Use Power-Ups",
        text: "Hint Shield reveals a letter, 2x Token doubles rewards, and Streak Save protects your streak!",
        icon: "⚡",
        highlight: Some("power-ups"),
    },
    TutorialStep {
        id: "shop",
        title: "Visit the Shop",
        text: "Spend tokens on power-ups and wheel skins!",
        icon: "🛒",
        highlight: Some("shop-button"),
    },
    TutorialStep {
        id: "daily",
        title: "Daily Challenges",
        text: "Complete daily challenges to earn bonus tokens. Build streaks for bigger rewards!",
        icon: "🎁",
        highlight: Some("daily-challenge"),
    },
    TutorialStep {
        id: "ready",
        title: "Ready to Play!",
        text: "You're all set! Spin the wheel and start learning. Good luck!",
        icon: "🚀",
        highlight: None,
    },
];

impl GameState {
    #[must_use]
    pub fn with_tutorial_step(&self, step: u32) -> Self {
        self.transition(|s| s.tutorial_step = step)
    }

    /// Mark the walkthrough finished and rewind the step counter.
    #[must_use]
    pub fn with_tutorial_completed(&self) -> Self {
        self.transition(|s| {
            s.tutorial_completed = true;
            s.tutorial_step = 0;
        })
    }

    /// Move to the next step, completing the walkthrough after the last one.
    #[must_use]
    pub fn with_tutorial_advanced(&self) -> Self {
        let next = self.tutorial_step().saturating_add(1);
        if next >= usize_to_u32(TUTORIAL_STEPS.len()) {
            self.with_tutorial_completed()
        } else {
            self.with_tutorial_step(next)
        }
    }

    /// The step the player is currently on, if the walkthrough is still running.
    #[must_use]
    pub fn current_tutorial_step(&self) -> Option<&'static TutorialStep> {
        if self.tutorial_completed() {
            return None;
        }
        usize::try_from(self.tutorial_step())
            .ok()
            .and_then(|index| TUTORIAL_STEPS.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walkthrough_has_nine_steps() {
        let ids: Vec<&str> = TUTORIAL_STEPS.iter().map(|step| step.id).collect();
        assert_eq!(
            ids,
            vec![
                "welcome", "spin", "question", "tokens", "level", "powerups", "shop", "daily",
                "ready"
            ]
        );
    }

    #[test]
    fn advancing_past_last_step_completes() {
        let mut state = GameState::default();
        assert_eq!(state.current_tutorial_step().map(|step| step.id), Some("welcome"));
        for _ in 0..TUTORIAL_STEPS.len() - 1 {
            state = state.with_tutorial_advanced();
        }
        assert_eq!(state.current_tutorial_step().map(|step| step.id), Some("ready"));
        state = state.with_tutorial_advanced();
        assert!(state.tutorial_completed());
        assert_eq!(state.tutorial_step(), 0);
        assert!(state.current_tutorial_step().is_none());
    }

    #[test]
    fn explicit_step_is_recorded() {
        let state = GameState::default().with_tutorial_step(4);
        assert_eq!(state.tutorial_step(), 4);
        assert!(!state.tutorial_completed());
    }
}
