//! CVC Spin Game Engine
//!
//! Platform-agnostic core logic for CVC Spin, a phonics game where a wheel of
//! rime families (`-at`, `-og`, ...) picks a family and the player matches a
//! picture to the right consonant-vowel-consonant word.
//! This crate provides all game rules without UI or platform-specific dependencies.

pub mod achievements;
pub mod clock;
pub mod daily;
pub mod error;
pub mod multiplayer;
pub mod numbers;
pub mod powerups;
pub mod question;
pub mod question_factory;
pub mod rime;
pub mod rimes;
pub mod rng;
pub mod session;
pub mod settings;
pub mod shop;
pub mod state;
pub mod storage;
pub mod tutorial;
pub mod word;

// Re-export commonly used types
pub use achievements::{
    ACHIEVEMENTS, Achievement, AchievementProgress, AchievementTracker, Condition,
    EvaluationContext, find_achievement,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use daily::{DAILY_REWARD_TOKENS, DailyChallenge, daily_bonus_for, daily_target};
pub use error::{StorageError, ValidationError};
pub use multiplayer::{MatchStanding, PlayerSlot, PlayerStats, Players, WINNING_SCORE};
pub use powerups::{PowerUpKind, PowerUps};
pub use question::{CHOICE_COUNT, Difficulty, DifficultyConfig, Question};
pub use question_factory::{QuestionOptions, create_question, create_random_question};
pub use rime::{Rime, RimeEntry};
pub use rimes::{RimeSet, default_entries};
pub use rng::{CountingRng, RngBundle};
pub use session::{AnswerOutcome, GameSession, SpinTicket};
pub use settings::{FamilyProgress, GameSettings, GameSpeed, SoundTheme};
pub use shop::{PurchaseRejection, SHOP_ITEMS, ShopItem, ShopItemKind, find_item};
pub use state::{GameSnapshot, GameState, LevelInfo};
pub use storage::{GameStateStore, KeyValueStorage, MemoryStorage};
pub use tutorial::{TUTORIAL_STEPS, TutorialStep};
pub use word::{Word, WordEntry, is_cvc};
