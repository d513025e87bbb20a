//! Player preferences and per-family accuracy, persisted apart from the save.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::StorageError;
use crate::numbers::{clamp_finite_f32, ratio};
use crate::question::Difficulty;
use crate::storage::KeyValueStorage;

/// Key the settings are saved under.
pub const SETTINGS_KEY: &str = "cvc-spin-game-settings-v1";

const DEFAULT_SOUND_VOLUME: f32 = 0.5;

/// Sound effect set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SoundTheme {
    #[default]
    Modern,
    Retro,
    Fun,
}

impl SoundTheme {
    pub const ALL: [Self; 3] = [Self::Modern, Self::Retro, Self::Fun];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Retro => "retro",
            Self::Fun => "fun",
        }
    }
}

impl fmt::Display for SoundTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundTheme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modern" => Ok(Self::Modern),
            "retro" => Ok(Self::Retro),
            "fun" => Ok(Self::Fun),
            _ => Err(()),
        }
    }
}

/// Wheel animation pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl GameSpeed {
    pub const ALL: [Self; 3] = [Self::Slow, Self::Normal, Self::Fast];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
        }
    }

    /// Factor applied to animation durations.
    #[must_use]
    pub const fn speed_multiplier(self) -> f64 {
        match self {
            Self::Slow => 1.5,
            Self::Normal => 1.0,
            Self::Fast => 0.7,
        }
    }
}

impl fmt::Display for GameSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameSpeed {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(Self::Slow),
            "normal" => Ok(Self::Normal),
            "fast" => Ok(Self::Fast),
            _ => Err(()),
        }
    }
}

/// Answers recorded for one rime family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FamilyProgress {
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub total: u32,
}

impl FamilyProgress {
    /// Fraction answered correctly, `0.0` before any attempt.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.total)
    }
}

const fn default_sound_enabled() -> bool {
    true
}

const fn default_sound_volume() -> f32 {
    DEFAULT_SOUND_VOLUME
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    #[serde(default = "default_sound_volume")]
    sound_volume: f32,
    #[serde(default)]
    pub sound_theme: SoundTheme,
    #[serde(default)]
    pub game_speed: GameSpeed,
    #[serde(default)]
    pub high_contrast_mode: bool,
    #[serde(default)]
    word_family_progress: BTreeMap<String, FamilyProgress>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            sound_enabled: default_sound_enabled(),
            sound_volume: default_sound_volume(),
            sound_theme: SoundTheme::default(),
            game_speed: GameSpeed::default(),
            high_contrast_mode: false,
            word_family_progress: BTreeMap::new(),
        }
    }
}

impl GameSettings {
    /// Read settings from `storage`, filling anything missing with defaults.
    /// Unreadable or malformed data yields the defaults.
    #[must_use]
    pub fn load_from(storage: &impl KeyValueStorage) -> Self {
        let raw = match storage.get_item(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(err) => {
                log::warn!("failed to read settings, using defaults: {err}");
                return Self::default();
            }
        };
        match serde_json::from_str::<Self>(&raw) {
            Ok(mut settings) => {
                settings.sound_volume =
                    clamp_finite_f32(settings.sound_volume, 0.0, 1.0, DEFAULT_SOUND_VOLUME);
                settings
            }
            Err(err) => {
                log::warn!("discarding malformed settings: {err}");
                Self::default()
            }
        }
    }

    /// # Errors
    ///
    /// Returns a [`StorageError`] when encoding or writing fails.
    pub fn save_to(&self, storage: &impl KeyValueStorage) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        storage.set_item(SETTINGS_KEY, &json)
    }

    #[must_use]
    pub const fn sound_volume(&self) -> f32 {
        self.sound_volume
    }

    /// Set the volume, clamped to `[0, 1]`. Non-finite values are ignored.
    pub fn set_sound_volume(&mut self, volume: f32) {
        self.sound_volume = clamp_finite_f32(volume, 0.0, 1.0, self.sound_volume);
    }

    /// Parse and apply a difficulty name; unknown names leave it unchanged.
    pub fn set_difficulty_named(&mut self, name: &str) -> bool {
        name.parse().map(|difficulty| self.difficulty = difficulty).is_ok()
    }

    /// Parse and apply a sound theme name; unknown names leave it unchanged.
    pub fn set_sound_theme_named(&mut self, name: &str) -> bool {
        name.parse().map(|theme| self.sound_theme = theme).is_ok()
    }

    /// Parse and apply a speed name; unknown names leave it unchanged.
    pub fn set_game_speed_named(&mut self, name: &str) -> bool {
        name.parse().map(|speed| self.game_speed = speed).is_ok()
    }

    #[must_use]
    pub const fn speed_multiplier(&self) -> f64 {
        self.game_speed.speed_multiplier()
    }

    /// Record one answer for `rime`.
    pub fn update_word_family_progress(&mut self, rime: &str, correct: bool) {
        let entry = self
            .word_family_progress
            .entry(rime.to_string())
            .or_default();
        entry.total = entry.total.saturating_add(1);
        if correct {
            entry.correct = entry.correct.saturating_add(1);
        }
    }

    #[must_use]
    pub fn family_progress(&self, rime: &str) -> FamilyProgress {
        self.word_family_progress
            .get(rime)
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn word_family_progress(&self) -> &BTreeMap<String, FamilyProgress> {
        &self.word_family_progress
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn defaults_match_first_launch() {
        let settings = GameSettings::default();
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert!(settings.sound_enabled);
        assert!((settings.sound_volume() - 0.5).abs() < f32::EPSILON);
        assert_eq!(settings.sound_theme, SoundTheme::Modern);
        assert_eq!(settings.game_speed, GameSpeed::Normal);
        assert!(!settings.high_contrast_mode);
        assert!(settings.word_family_progress().is_empty());
    }

    #[test]
    fn volume_is_clamped() {
        let mut settings = GameSettings::default();
        settings.set_sound_volume(3.0);
        assert!((settings.sound_volume() - 1.0).abs() < f32::EPSILON);
        settings.set_sound_volume(-1.0);
        assert!(settings.sound_volume().abs() < f32::EPSILON);
        settings.set_sound_volume(0.25);
        settings.set_sound_volume(f32::NAN);
        assert!((settings.sound_volume() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn named_setters_ignore_unknown_values() {
        let mut settings = GameSettings::default();
        assert!(settings.set_difficulty_named("HARD"));
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert!(!settings.set_difficulty_named("impossible"));
        assert_eq!(settings.difficulty, Difficulty::Hard);

        assert!(settings.set_sound_theme_named("retro"));
        assert!(!settings.set_sound_theme_named("jazz"));
        assert_eq!(settings.sound_theme, SoundTheme::Retro);

        assert!(settings.set_game_speed_named("fast"));
        assert!(!settings.set_game_speed_named("ludicrous"));
        assert!((settings.speed_multiplier() - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn family_progress_accumulates() {
        let mut settings = GameSettings::default();
        settings.update_word_family_progress("-at", true);
        settings.update_word_family_progress("-at", false);
        settings.update_word_family_progress("-at", true);
        let progress = settings.family_progress("-at");
        assert_eq!(progress, FamilyProgress { correct: 2, total: 3 });
        assert!((progress.accuracy() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(settings.family_progress("-og"), FamilyProgress::default());
    }

    #[test]
    fn persistence_merges_over_defaults() {
        let storage = MemoryStorage::new();
        assert_eq!(GameSettings::load_from(&storage), GameSettings::default());

        storage
            .set_item(SETTINGS_KEY, r#"{"difficulty":"easy","soundVolume":7}"#)
            .expect("write");
        let loaded = GameSettings::load_from(&storage);
        assert_eq!(loaded.difficulty, Difficulty::Easy);
        assert!((loaded.sound_volume() - 1.0).abs() < f32::EPSILON);
        assert!(loaded.sound_enabled);

        let mut changed = loaded;
        changed.high_contrast_mode = true;
        changed.update_word_family_progress("-ig", true);
        changed.save_to(&storage).expect("saved");
        assert_eq!(GameSettings::load_from(&storage), changed);
    }

    #[test]
    fn malformed_settings_fall_back() {
        let storage = MemoryStorage::new();
        storage
            .set_item(SETTINGS_KEY, r#"{"difficulty":"impossible"}"#)
            .expect("write");
        assert_eq!(GameSettings::load_from(&storage), GameSettings::default());
        storage.set_offline(true);
        assert_eq!(GameSettings::load_from(&storage), GameSettings::default());
        assert!(GameSettings::default().save_to(&storage).is_err());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut settings = GameSettings::default();
        settings.set_game_speed_named("slow");
        settings.update_word_family_progress("-un", false);
        settings.reset();
        assert_eq!(settings, GameSettings::default());
    }
}
