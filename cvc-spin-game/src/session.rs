//! Session driver tying the wheel, questions, state and persistence together.
//!
//! A round is two-phase: [`GameSession::begin_spin`] picks where the wheel
//! will land and hands back a [`SpinTicket`]; once the presentation layer has
//! finished animating, [`GameSession::complete_spin`] turns the ticket into a
//! [`Question`]. Each question accepts exactly one [`GameSession::answer`].

use serde::Serialize;

use crate::achievements::{Achievement, AchievementTracker};
use crate::clock::Clock;
use crate::daily::DAILY_REWARD_TOKENS;
use crate::error::ValidationError;
use crate::multiplayer::PlayerSlot;
use crate::powerups::PowerUpKind;
use crate::question::{Difficulty, Question};
use crate::question_factory::{QuestionOptions, create_question};
use crate::rime::Rime;
use crate::rimes::RimeSet;
use crate::rng::RngBundle;
use crate::settings::GameSettings;
use crate::shop::PurchaseRejection;
use crate::state::GameState;
use crate::storage::{GameStateStore, KeyValueStorage};

/// Where a started spin will land. Only the session that issued a ticket can
/// complete it, and only once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinTicket {
    id: u64,
    pattern: String,
    angle_start: f64,
    angle_end: f64,
    target_angle: f64,
}

impl SpinTicket {
    fn new(id: u64, rime: &Rime) -> Self {
        Self {
            id,
            pattern: rime.pattern().to_string(),
            angle_start: rime.angle_start(),
            angle_end: rime.angle_end(),
            target_angle: rime.center_angle(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub const fn angle_start(&self) -> f64 {
        self.angle_start
    }

    #[must_use]
    pub const fn angle_end(&self) -> f64 {
        self.angle_end
    }

    /// Angle the wheel should come to rest on.
    #[must_use]
    pub const fn target_angle(&self) -> f64 {
        self.target_angle
    }
}

/// What happened when a question was answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_word: String,
    /// New level, when the answer crossed a level boundary.
    pub leveled_up: Option<u32>,
    /// Set on the answer that completed today's challenge.
    pub daily_completed: bool,
    /// Multiplayer: the player whose answer reached the winning score.
    pub winner: Option<PlayerSlot>,
}

/// One player's game: owns the state and everything that acts on it.
#[derive(Debug)]
pub struct GameSession<S, C> {
    rimes: RimeSet,
    state: GameState,
    settings: GameSettings,
    achievements: AchievementTracker,
    rng: RngBundle,
    store: GameStateStore<S>,
    clock: C,
    question: Option<Question>,
    pending_spin: Option<u64>,
    next_ticket: u64,
    announcements: Vec<&'static Achievement>,
}

impl<S: KeyValueStorage, C: Clock> GameSession<S, C> {
    /// Load the saved game and settings, roll the daily challenge over if the
    /// day changed, and persist the result.
    pub fn new(store: GameStateStore<S>, rimes: RimeSet, clock: C, seed: u64) -> Self {
        let mut state = store.load();
        if state.is_spinning() {
            log::debug!("discarding spin left unfinished by the previous session");
            state = state.with_spin_aborted();
        }
        let today = clock.today();
        if state.needs_daily_reset_on(today) {
            state = state.with_daily_reset_on(today);
        }
        let settings = GameSettings::load_from(store.storage());
        let mut achievements = AchievementTracker::new(rimes.len());
        // Restore state-based unlocks silently.
        let mut restored = achievements.check_achievements(&state);
        restored.extend(achievements.check_level_achievements(state.level()));
        log::debug!("restored {} achievements from saved progress", restored.len());

        let mut session = Self {
            rimes,
            state,
            settings,
            achievements,
            rng: RngBundle::from_user_seed(seed),
            store,
            clock,
            question: None,
            pending_spin: None,
            next_ticket: 1,
            announcements: Vec::new(),
        };
        session.persist();
        session
    }

    /// Start turning the wheel. Returns `None` while a spin is in flight.
    pub fn begin_spin(&mut self) -> Option<SpinTicket> {
        if self.state.is_spinning() || self.pending_spin.is_some() {
            log::debug!("spin ignored, wheel already turning");
            return None;
        }
        self.roll_daily_if_needed();

        let rime = self.rimes.pick_random(self.rng.wheel());
        let ticket = SpinTicket::new(self.next_ticket, rime);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.pending_spin = Some(ticket.id);
        self.question = None;
        self.state = self.state.with_spin_start(ticket.pattern());
        log::debug!("spin {} heading for {}", ticket.id, ticket.pattern());
        self.persist();
        Some(ticket)
    }

    /// Land the wheel and build the question. Returns `None` for a ticket
    /// that is stale or already completed, or when the family cannot produce
    /// a question (the spin is then abandoned).
    pub fn complete_spin(&mut self, ticket: &SpinTicket) -> Option<&Question> {
        if self.pending_spin != Some(ticket.id) {
            log::debug!("ignoring stale spin ticket {}", ticket.id);
            return None;
        }
        self.pending_spin = None;

        match self.build_question(ticket.pattern()) {
            Ok(question) => {
                self.state = self
                    .state
                    .with_spin_result_at(question.correct_word().text(), self.clock.now());
                log::debug!(
                    "spin {} landed on {}, answer `{}`",
                    ticket.id,
                    question.rime(),
                    question.correct_word().text()
                );
                self.persist();
                let unlocked = self.achievements.check_achievements(&self.state);
                self.announcements.extend(unlocked);
                self.question = Some(question);
                self.question.as_ref()
            }
            Err(err) => {
                log::warn!("abandoning spin on {}: {err}", ticket.pattern());
                self.state = self.state.with_spin_aborted();
                self.persist();
                None
            }
        }
    }

    /// Answer the open question. Returns `None` when there is nothing to
    /// answer, including a second answer to the same question.
    pub fn answer(&mut self, choice: &str) -> Option<AnswerOutcome> {
        let question = self.question.take()?;
        let correct = question.is_correct_answer(choice);
        let family = question.rime().to_string();
        let now = self.clock.now();

        self.settings.update_word_family_progress(&family, correct);
        self.persist_settings();

        let mut outcome = AnswerOutcome {
            correct,
            correct_word: question.correct_word().text().to_string(),
            leveled_up: None,
            daily_completed: false,
            winner: None,
        };

        if self.state.is_multiplayer() {
            let slot = self.state.current_player();
            self.state = if correct {
                self.state.with_player_correct_answer(slot)
            } else {
                self.state.with_player_incorrect_answer(slot)
            };
            if self.state.has_won(slot) {
                log::info!("{slot} wins the match");
                outcome.winner = Some(slot);
            }
            self.state = self.state.with_next_player();
        } else if correct {
            let previous_level = self.state.level();
            self.state = self.state.with_correct_answer_at(now);
            let level = self.state.level();
            if level > previous_level {
                log::info!("level up: {previous_level} -> {level}");
                self.state = self.state.with_level_up_power_ups(level);
                let unlocked = self.achievements.check_level_achievements(level);
                self.announcements.extend(unlocked);
                outcome.leveled_up = Some(level);
            }
            let unlocked =
                self.achievements
                    .track_correct_answer_at(&outcome.correct_word, &family, now);
            self.announcements.extend(unlocked);

            let was_completed = self.state.daily_challenge().completed;
            self.state = self.state.with_daily_progress();
            outcome.daily_completed = !was_completed && self.state.daily_challenge().completed;
        } else {
            self.state = self.state.with_incorrect_answer_at(now);
        }

        let unlocked = self.achievements.check_achievements(&self.state);
        self.announcements.extend(unlocked);
        log::debug!(
            "answered `{choice}` for {family}: {}",
            if correct { "correct" } else { "incorrect" }
        );
        self.persist();
        Some(outcome)
    }

    /// Claim today's reward. Returns the tokens granted, or `None` when the
    /// challenge is unfinished or already claimed.
    pub fn claim_daily_reward(&mut self) -> Option<u32> {
        if !self.state.daily_challenge().can_claim() {
            return None;
        }
        self.state = self.state.with_claimed_daily_reward();
        self.persist();
        Some(DAILY_REWARD_TOKENS)
    }

    /// Spend and activate one power-up. Returns `false` when none are owned.
    pub fn activate_power_up(&mut self, kind: PowerUpKind) -> bool {
        let Some(next) = self.state.use_power_up(kind) else {
            return false;
        };
        self.state = next;
        self.persist();
        true
    }

    /// Buy a shop item.
    ///
    /// # Errors
    ///
    /// Returns the [`PurchaseRejection`] when the purchase is refused; the
    /// state is then unchanged.
    pub fn purchase(&mut self, item_id: &str) -> Result<(), PurchaseRejection> {
        self.state = self.state.purchase_item(item_id)?;
        self.persist();
        let unlocked = self.achievements.check_achievements(&self.state);
        self.announcements.extend(unlocked);
        Ok(())
    }

    pub fn set_multiplayer(&mut self, enabled: bool) {
        self.state = if enabled {
            self.state.with_multiplayer_enabled()
        } else {
            self.state.with_multiplayer_disabled()
        };
        self.persist();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.settings.difficulty = difficulty;
        self.persist_settings();
    }

    /// Apply `change` to the settings and persist them.
    pub fn update_settings(&mut self, change: impl FnOnce(&mut GameSettings)) {
        change(&mut self.settings);
        self.persist_settings();
    }

    pub fn advance_tutorial(&mut self) {
        self.state = self.state.with_tutorial_advanced();
        self.persist();
    }

    pub fn skip_tutorial(&mut self) {
        self.state = self.state.with_tutorial_completed();
        self.persist();
    }

    /// Throw away all progress and unlocks. Settings are kept.
    pub fn reset_progress(&mut self) {
        log::info!("resetting all progress");
        self.store.clear();
        self.state = self.state.reset().with_daily_reset_on(self.clock.today());
        self.achievements.reset();
        self.announcements.clear();
        self.question = None;
        self.pending_spin = None;
        self.persist();
    }

    /// Replace the rime families on the wheel, dropping any open round. The
    /// "every family" achievement follows the new family count.
    pub fn configure_rimes(&mut self, rimes: RimeSet) {
        if self.pending_spin.is_some() || self.question.is_some() {
            log::debug!("rime families replaced mid-round, dropping the open round");
            self.pending_spin = None;
            self.question = None;
            self.state = self.state.with_spin_aborted();
            self.persist();
        }
        let unlocked = self.achievements.set_total_families(rimes.len());
        self.announcements.extend(unlocked);
        self.rimes = rimes;
    }

    /// Restart the random streams from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = RngBundle::from_user_seed(seed);
    }

    /// Achievements unlocked since the last call.
    pub fn take_unlocked(&mut self) -> Vec<&'static Achievement> {
        std::mem::take(&mut self.announcements)
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub const fn rimes(&self) -> &RimeSet {
        &self.rimes
    }

    #[must_use]
    pub const fn achievements(&self) -> &AchievementTracker {
        &self.achievements
    }

    /// The question waiting for an answer.
    #[must_use]
    pub const fn current_question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    #[must_use]
    pub const fn rng(&self) -> &RngBundle {
        &self.rng
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// `false` while saves are failing and progress lives only in memory.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.store.is_persisted()
    }

    /// Consume the session, returning the final state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    fn build_question(&mut self, pattern: &str) -> Result<Question, ValidationError> {
        let rime = self
            .rimes
            .by_pattern(pattern)
            .ok_or_else(|| ValidationError::InvalidPattern {
                pattern: pattern.to_string(),
            })?;
        let options = QuestionOptions::with_difficulty(self.settings.difficulty);
        create_question(rime, &self.rimes, options, self.rng.question())
    }

    fn roll_daily_if_needed(&mut self) {
        let today = self.clock.today();
        if self.state.needs_daily_reset_on(today) {
            log::debug!("new day {today}, starting a fresh daily challenge");
            self.state = self.state.with_daily_reset_on(today);
        }
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.state) {
            log::debug!("game not saved: {err}");
        }
    }

    fn persist_settings(&self) {
        if let Err(err) = self.settings.save_to(self.store.storage()) {
            log::debug!("settings not saved: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::rime::RimeEntry;
    use crate::storage::MemoryStorage;
    use crate::word::WordEntry;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    type TestSession = GameSession<MemoryStorage, ManualClock>;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 3, 8, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn session_with(storage: &MemoryStorage, clock: &ManualClock, seed: u64) -> TestSession {
        let rimes = RimeSet::builtin().expect("builtin rimes");
        GameSession::new(
            GameStateStore::new(storage.clone()),
            rimes,
            clock.clone(),
            seed,
        )
    }

    fn fresh(seed: u64) -> (TestSession, MemoryStorage, ManualClock) {
        let storage = MemoryStorage::new();
        let clock = ManualClock::new(start());
        let session = session_with(&storage, &clock, seed);
        (session, storage, clock)
    }

    fn play_round(session: &mut TestSession, answer_correctly: bool) -> AnswerOutcome {
        let ticket = session.begin_spin().expect("wheel idle");
        let question = session.complete_spin(&ticket).expect("question built");
        let choice = if answer_correctly {
            question.correct_word().text().to_string()
        } else {
            question
                .choices()
                .iter()
                .find(|word| word.text() != question.correct_word().text())
                .map(|word| word.text().to_string())
                .expect("a distractor")
        };
        session.answer(&choice).expect("question open")
    }

    #[test]
    fn new_session_starts_todays_challenge() {
        let (session, storage, _clock) = fresh(1);
        let challenge = session.state().daily_challenge();
        assert_eq!(challenge.date, Some(start().date_naive()));
        assert_eq!(challenge.target, 5);
        assert_eq!(session.state().consecutive_days(), 1);
        assert!(!storage.is_empty());
        assert!(session.is_persisted());
    }

    #[test]
    fn spin_is_two_phase_and_single_flight() {
        let (mut session, _storage, _clock) = fresh(2);
        let ticket = session.begin_spin().expect("wheel idle");
        assert!(session.state().is_spinning());
        assert_eq!(session.state().current_rime(), Some(ticket.pattern()));
        assert!(session.begin_spin().is_none());

        let rime = session.rimes().by_pattern(ticket.pattern()).expect("listed");
        assert!(ticket.target_angle() >= rime.angle_start());
        assert!(ticket.target_angle() < rime.angle_end());

        let question = session.complete_spin(&ticket).expect("question");
        assert_eq!(question.rime(), ticket.pattern());
        assert!(!session.state().is_spinning());
        assert_eq!(session.state().spin_count(), 1);
        assert!(session.complete_spin(&ticket).is_none());
    }

    #[test]
    fn correct_answer_pays_out_once() {
        let (mut session, _storage, _clock) = fresh(3);
        let ticket = session.begin_spin().expect("wheel idle");
        let answer = session
            .complete_spin(&ticket)
            .expect("question")
            .correct_word()
            .text()
            .to_string();
        let outcome = session.answer(&answer).expect("open question");
        assert!(outcome.correct);
        assert_eq!(outcome.correct_word, answer);
        assert_eq!(session.state().tokens(), 1);
        assert_eq!(session.state().current_streak(), 1);
        assert!(session.answer(&answer).is_none());
        assert_eq!(session.state().tokens(), 1);

        let unlocked: Vec<&str> = session.take_unlocked().iter().map(|a| a.id).collect();
        assert!(unlocked.contains(&"first-spin"));
        assert!(unlocked.contains(&"first-correct"));
        assert!(session.take_unlocked().is_empty());
    }

    #[test]
    fn incorrect_answer_breaks_streak() {
        let (mut session, _storage, _clock) = fresh(4);
        play_round(&mut session, true);
        play_round(&mut session, true);
        let outcome = play_round(&mut session, false);
        assert!(!outcome.correct);
        assert_eq!(session.state().current_streak(), 0);
        assert_eq!(session.state().best_streak(), 2);
        assert_eq!(session.state().spin_count(), 3);
        assert_eq!(session.state().correct_answers(), 2);
    }

    #[test]
    fn family_progress_follows_answers() {
        let (mut session, _storage, _clock) = fresh(5);
        let ticket = session.begin_spin().expect("wheel idle");
        let family = ticket.pattern().to_string();
        let answer = session
            .complete_spin(&ticket)
            .expect("question")
            .correct_word()
            .text()
            .to_string();
        session.answer(&answer).expect("open question");
        let progress = session.settings().family_progress(&family);
        assert_eq!((progress.correct, progress.total), (1, 1));
        assert_eq!(session.achievements().family_correct_count(&family), 1);
    }

    #[test]
    fn daily_challenge_completes_and_claims() {
        let (mut session, _storage, _clock) = fresh(6);
        assert!(session.claim_daily_reward().is_none());
        let completed: Vec<bool> = (0..5)
            .map(|_| play_round(&mut session, true).daily_completed)
            .collect();
        assert_eq!(completed, vec![false, false, false, false, true]);
        let before = session.state().tokens();
        assert_eq!(session.claim_daily_reward(), Some(DAILY_REWARD_TOKENS));
        assert_eq!(session.state().tokens(), before + DAILY_REWARD_TOKENS);
        assert!(session.claim_daily_reward().is_none());
    }

    #[test]
    fn next_day_rolls_challenge_and_extends_run() {
        let (mut session, _storage, clock) = fresh(7);
        play_round(&mut session, true);
        clock.advance(TimeDelta::days(1));
        session.begin_spin().expect("wheel idle");
        let challenge = session.state().daily_challenge();
        assert_eq!(challenge.date, Some(clock.today()));
        assert_eq!(challenge.progress, 0);
        assert_eq!(session.state().consecutive_days(), 2);
    }

    #[test]
    fn ten_correct_answers_level_up() {
        let (mut session, _storage, _clock) = fresh(8);
        let levels: Vec<Option<u32>> = (0..10)
            .map(|_| play_round(&mut session, true).leveled_up)
            .collect();
        assert_eq!(levels.iter().flatten().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(session.state().level(), 2);
        // Level 2 grants a double token on top of the starting one.
        assert_eq!(session.state().power_ups().double_token, 2);
    }

    #[test]
    fn multiplayer_first_to_ten_wins() {
        let (mut session, _storage, _clock) = fresh(9);
        session.set_multiplayer(true);
        let mut winner = None;
        for _ in 0..19 {
            winner = play_round(&mut session, true).winner;
            if winner.is_some() {
                break;
            }
        }
        assert_eq!(winner, Some(PlayerSlot::One));
        assert_eq!(session.state().player_score(PlayerSlot::One), 10);
        assert_eq!(session.state().player_score(PlayerSlot::Two), 9);
        assert_eq!(session.state().tokens(), 0);
        assert_eq!(session.state().current_player(), PlayerSlot::Two);
    }

    #[test]
    fn progress_survives_a_restart() {
        let (mut session, storage, clock) = fresh(10);
        play_round(&mut session, true);
        play_round(&mut session, false);
        let saved = session.state().clone();
        drop(session);

        let reloaded = session_with(&storage, &clock, 10);
        assert_eq!(reloaded.state(), &saved);
        assert!(reloaded.achievements().is_unlocked("first-correct"));
    }

    #[test]
    fn unfinished_spin_is_dropped_on_restart() {
        let (mut session, storage, clock) = fresh(11);
        session.begin_spin().expect("wheel idle");
        drop(session);
        let mut reloaded = session_with(&storage, &clock, 11);
        assert!(!reloaded.state().is_spinning());
        assert!(reloaded.begin_spin().is_some());
    }

    #[test]
    fn failed_saves_keep_playing_in_memory() {
        let (mut session, storage, _clock) = fresh(12);
        storage.set_offline(true);
        play_round(&mut session, true);
        assert!(!session.is_persisted());
        assert_eq!(session.state().tokens(), 1);
        storage.set_offline(false);
        play_round(&mut session, true);
        assert!(session.is_persisted());
    }

    #[test]
    fn purchases_and_power_ups_go_through_state() {
        let (mut session, _storage, _clock) = fresh(13);
        assert!(session.activate_power_up(PowerUpKind::HintShield));
        assert!(!session.activate_power_up(PowerUpKind::HintShield));
        assert_eq!(
            session.state().active_power_up(),
            Some(PowerUpKind::HintShield)
        );
        assert_eq!(
            session.purchase("hintShield"),
            Err(PurchaseRejection::InsufficientTokens {
                price: 10,
                tokens: 0
            })
        );
        for _ in 0..10 {
            play_round(&mut session, true);
        }
        session.purchase("hintShield").expect("affordable");
        assert_eq!(session.state().tokens(), 0);
        assert_eq!(session.state().power_ups().hint_shield, 1);
    }

    #[test]
    fn reset_clears_progress_but_keeps_settings() {
        let (mut session, _storage, _clock) = fresh(14);
        session.set_difficulty(Difficulty::Hard);
        play_round(&mut session, true);
        session.reset_progress();
        assert_eq!(session.state().tokens(), 0);
        assert_eq!(session.state().spin_count(), 0);
        assert_eq!(session.achievements().unlocked_count(), 0);
        assert!(session.current_question().is_none());
        assert_eq!(session.settings().difficulty, Difficulty::Hard);
        assert!(!session.state().needs_daily_reset_on(start().date_naive()));
    }

    #[test]
    fn tutorial_walks_forward() {
        let (mut session, _storage, _clock) = fresh(15);
        session.advance_tutorial();
        assert_eq!(session.state().tutorial_step(), 1);
        session.skip_tutorial();
        assert!(session.state().tutorial_completed());
    }

    #[test]
    fn same_seed_same_wheel() {
        let (mut a, _sa, _ca) = fresh(99);
        let (mut b, _sb, _cb) = fresh(99);
        for _ in 0..5 {
            let ta = a.begin_spin().expect("idle");
            let tb = b.begin_spin().expect("idle");
            assert_eq!(ta.pattern(), tb.pattern());
            let qa = a.complete_spin(&ta).expect("question").clone();
            let qb = b.complete_spin(&tb).expect("question").clone();
            assert_eq!(qa, qb);
            a.answer(qa.correct_word().text()).expect("open");
            b.answer(qb.correct_word().text()).expect("open");
        }
    }

    #[test]
    fn configured_rimes_drive_the_wheel() {
        let (mut session, _storage, _clock) = fresh(16);
        let entries = vec![RimeEntry::new(
            "-ix",
            vec![
                WordEntry::new("fix", "🔧"),
                WordEntry::new("mix", "🥣"),
                WordEntry::new("six", "6️⃣"),
            ],
        )];
        let single = RimeSet::from_entries(entries).expect("valid rimes");
        session.configure_rimes(single);
        let ticket = session.begin_spin().expect("idle");
        assert_eq!(ticket.pattern(), "-ix");
        assert!((ticket.target_angle() - 180.0).abs() < 1e-9);
        let question = session.complete_spin(&ticket).expect("question");
        assert_eq!(question.choices().len(), 3);
        assert_eq!(session.achievements().total_families(), 1);
    }

    #[test]
    fn reconfigured_wheel_counts_its_own_families() {
        let (mut session, _storage, _clock) = fresh(17);
        assert_eq!(session.achievements().total_families(), 22);
        let ticket = session.begin_spin().expect("idle");
        let family = ticket.pattern().to_string();
        let answer = session
            .complete_spin(&ticket)
            .expect("question")
            .correct_word()
            .text()
            .to_string();
        session.answer(&answer).expect("open question");
        assert!(!session.achievements().is_unlocked("word-family-master"));

        let entry = session
            .rimes()
            .by_pattern(&family)
            .expect("listed")
            .to_entry();
        session.configure_rimes(RimeSet::from_entries(vec![entry]).expect("valid rimes"));
        assert!(session.achievements().is_unlocked("word-family-master"));
        let unlocked: Vec<&str> = session.take_unlocked().iter().map(|a| a.id).collect();
        assert!(unlocked.contains(&"word-family-master"));
    }
}
