//! The active set of rime families and the wheel layout derived from it.
use once_cell::sync::Lazy;
use rand::Rng;

use crate::error::ValidationError;
use crate::numbers::usize_to_f64;
use crate::rime::{FULL_TURN_DEGREES, Rime, RimeEntry};

const DEFAULT_RIME_DATA: &str = include_str!("../assets/rimes.json");

static DEFAULT_ENTRIES: Lazy<Vec<RimeEntry>> =
    Lazy::new(|| serde_json::from_str(DEFAULT_RIME_DATA).unwrap_or_default());

/// Built-in word families in wheel order.
#[must_use]
pub fn default_entries() -> Vec<RimeEntry> {
    DEFAULT_ENTRIES.clone()
}

/// Ordered, non-empty collection of rimes laid out as equal wheel slices.
#[derive(Debug, Clone, PartialEq)]
pub struct RimeSet {
    entries: Vec<RimeEntry>,
    rimes: Vec<Rime>,
}

impl RimeSet {
    /// Build a set from raw entries, giving each family an equal slice of the
    /// wheel in list order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyRimeSet`] for an empty list,
    /// [`ValidationError::DuplicatePattern`] when two families share a pattern,
    /// or the first validation failure from an individual rime.
    pub fn from_entries(entries: Vec<RimeEntry>) -> Result<Self, ValidationError> {
        let rimes = build_rimes(&entries)?;
        Ok(Self { entries, rimes })
    }

    /// The built-in families.
    ///
    /// # Errors
    ///
    /// Fails only if the bundled data has been edited into an invalid shape.
    pub fn builtin() -> Result<Self, ValidationError> {
        Self::from_entries(default_entries())
    }

    /// Parse a JSON list of `{pattern, words: [{text, emoji}]}` records.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedConfig`] when the JSON does not
    /// decode, otherwise the same errors as [`RimeSet::from_entries`].
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let entries: Vec<RimeEntry> =
            serde_json::from_str(json).map_err(|err| ValidationError::MalformedConfig {
                reason: err.to_string(),
            })?;
        Self::from_entries(entries)
    }

    /// Replace the active families wholesale. On error the set is unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`RimeSet::from_entries`].
    pub fn configure(&mut self, entries: Vec<RimeEntry>) -> Result<(), ValidationError> {
        let rimes = build_rimes(&entries)?;
        log::debug!("configured {} rime families", rimes.len());
        self.entries = entries;
        self.rimes = rimes;
        Ok(())
    }

    /// Restore the built-in families.
    ///
    /// # Errors
    ///
    /// Same as [`RimeSet::builtin`].
    pub fn reset(&mut self) -> Result<(), ValidationError> {
        self.configure(default_entries())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rimes.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rimes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rime> {
        self.rimes.iter()
    }

    #[must_use]
    pub fn rimes(&self) -> &[Rime] {
        &self.rimes
    }

    /// The raw entries the set was built from.
    #[must_use]
    pub fn entries(&self) -> &[RimeEntry] {
        &self.entries
    }

    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        self.rimes.iter().map(Rime::pattern).collect()
    }

    #[must_use]
    pub fn by_pattern(&self, pattern: &str) -> Option<&Rime> {
        self.rimes.iter().find(|rime| rime.pattern() == pattern)
    }

    /// Family whose slice contains `angle` (degrees, wrapped into `[0, 360)`).
    #[must_use]
    pub fn at_angle(&self, angle: f64) -> Option<&Rime> {
        if !angle.is_finite() {
            return None;
        }
        let wrapped = angle.rem_euclid(FULL_TURN_DEGREES);
        self.rimes
            .iter()
            .find(|rime| wrapped >= rime.angle_start() && wrapped < rime.angle_end())
    }

    /// Uniformly pick one family.
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> &Rime {
        let index = rng.gen_range(0..self.rimes.len());
        &self.rimes[index]
    }

    /// Uniformly pick a family other than `exclude`, if one exists.
    pub fn pick_other<R: Rng + ?Sized>(&self, exclude: &str, rng: &mut R) -> Option<&Rime> {
        let others: Vec<&Rime> = self
            .rimes
            .iter()
            .filter(|rime| rime.pattern() != exclude)
            .collect();
        if others.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..others.len());
        Some(others[index])
    }
}

impl<'a> IntoIterator for &'a RimeSet {
    type Item = &'a Rime;
    type IntoIter = std::slice::Iter<'a, Rime>;

    fn into_iter(self) -> Self::IntoIter {
        self.rimes.iter()
    }
}

fn build_rimes(entries: &[RimeEntry]) -> Result<Vec<Rime>, ValidationError> {
    if entries.is_empty() {
        return Err(ValidationError::EmptyRimeSet);
    }
    let count = entries.len();
    let width = FULL_TURN_DEGREES / usize_to_f64(count);
    let mut rimes: Vec<Rime> = Vec::with_capacity(count);
    for (index, entry) in entries.iter().enumerate() {
        if rimes.iter().any(|rime| rime.pattern() == entry.pattern) {
            return Err(ValidationError::DuplicatePattern {
                pattern: entry.pattern.clone(),
            });
        }
        let start = width * usize_to_f64(index);
        // Pin the last slice so accumulated rounding never pushes it past a full turn.
        let end = if index + 1 == count {
            FULL_TURN_DEGREES
        } else {
            width * usize_to_f64(index + 1)
        };
        rimes.push(Rime::new(&entry.pattern, &entry.words, start, end)?);
    }
    Ok(rimes)
}
