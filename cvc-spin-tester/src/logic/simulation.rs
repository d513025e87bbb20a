use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use cvc_spin_game::state::level_for_xp;
use cvc_spin_game::{
    Difficulty, GameSession, GameState, GameStateStore, ManualClock, MemoryStorage, PlayerSlot,
    PurchaseRejection, Question, RimeSet, find_item,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

/// Simulated seconds between the start of a spin and the wheel settling.
const SPIN_SECONDS: i64 = 4;
/// Simulated seconds a player takes to pick an answer.
const THINK_SECONDS: i64 = 2;
/// Mixed into the run seed so the player's choices never share a stream with the game.
const PLAYER_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;
/// Purchases attempted after every round, in order.
const SHOPPING_LIST: [&str; 2] = ["wheelSkinSpace", "streakFreeze"];

pub type SimSession = GameSession<MemoryStorage, ManualClock>;

/// Check run against a finished simulation; the error explains what was off.
pub type Expectation = fn(&SimulationSummary) -> Result<()>;

#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub rounds: usize,
    /// Calendar days the rounds are spread across.
    pub days: usize,
    /// Probability that the simulated player picks the right word.
    pub accuracy: f64,
    pub difficulty: Difficulty,
    pub multiplayer: bool,
    pub shop: bool,
    pub expectations: Vec<Expectation>,
}

impl Default for SimulationPlan {
    fn default() -> Self {
        Self {
            rounds: 30,
            days: 1,
            accuracy: 0.8,
            difficulty: Difficulty::Medium,
            multiplayer: false,
            shop: true,
            expectations: Vec::new(),
        }
    }
}

impl SimulationPlan {
    #[must_use]
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub rounds_played: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub cross_family_questions: usize,
    pub levels_gained: usize,
    pub daily_rewards: u32,
    pub purchases: Vec<String>,
    pub unlocked: Vec<&'static str>,
    pub winner: Option<PlayerSlot>,
    pub violations: Vec<String>,
    pub final_state: GameState,
}

impl SimulationSummary {
    fn new(seed: u64) -> Self {
        Self {
            seed,
            rounds_played: 0,
            correct: 0,
            incorrect: 0,
            cross_family_questions: 0,
            levels_gained: 0,
            daily_rewards: 0,
            purchases: Vec::new(),
            unlocked: Vec::new(),
            winner: None,
            violations: Vec::new(),
            final_state: GameState::default(),
        }
    }

    #[must_use]
    pub fn has_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(&id)
    }
}

fn start_instant() -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
        .single()
        .context("simulation start instant is ambiguous")
}

fn open_session(storage: &MemoryStorage, clock: &ManualClock, seed: u64) -> Result<SimSession> {
    let rimes = RimeSet::builtin().context("loading bundled rime families")?;
    Ok(GameSession::new(
        GameStateStore::new(storage.clone()),
        rimes,
        clock.clone(),
        seed,
    ))
}

/// Play `plan` against a fresh in-memory save, recording every broken invariant.
///
/// # Errors
///
/// Returns an error when the session cannot be set up at all.
pub fn run_simulation(plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
    let storage = MemoryStorage::new();
    let clock = ManualClock::new(start_instant()?);
    let mut session = open_session(&storage, &clock, seed)?;
    session.set_difficulty(plan.difficulty);
    if plan.multiplayer {
        session.set_multiplayer(true);
    }

    let mut player = ChaCha20Rng::seed_from_u64(seed ^ PLAYER_STREAM_SALT);
    let mut summary = SimulationSummary::new(seed);
    let rounds_per_day = plan.rounds.div_ceil(plan.days.max(1)).max(1);

    for round in 0..plan.rounds {
        if round > 0 && round % rounds_per_day == 0 {
            clock.advance(TimeDelta::days(1));
        }
        if !play_round(&mut session, &clock, &mut player, plan, round, &mut summary) {
            break;
        }
        if let Some(tokens) = session.claim_daily_reward() {
            summary.daily_rewards += tokens;
        }
        if plan.shop && !plan.multiplayer {
            go_shopping(&mut session, &mut summary);
        }
        if summary.winner.is_some() {
            break;
        }
    }

    summary.unlocked = session.achievements().unlocked().map(|a| a.id).collect();
    summary.final_state = session.state().clone();

    let reloaded = open_session(&storage, &clock, seed)?;
    if reloaded.state() != session.state() {
        summary
            .violations
            .push("saved game differs from the live state after reload".to_string());
    }
    Ok(summary)
}

/// Returns `false` when the round could not be played and the run should stop.
fn play_round(
    session: &mut SimSession,
    clock: &ManualClock,
    player: &mut ChaCha20Rng,
    plan: &SimulationPlan,
    round: usize,
    summary: &mut SimulationSummary,
) -> bool {
    let spins_before = session.state().spin_count();
    let Some(ticket) = session.begin_spin() else {
        summary
            .violations
            .push(format!("round {round}: wheel refused to spin"));
        return false;
    };
    if session.begin_spin().is_some() {
        summary
            .violations
            .push(format!("round {round}: second spin accepted mid-turn"));
    }

    clock.advance(TimeDelta::seconds(SPIN_SECONDS));
    let Some(question) = session.complete_spin(&ticket).cloned() else {
        summary
            .violations
            .push(format!("round {round}: {} produced no question", ticket.pattern()));
        return false;
    };
    check_question(&question, plan.difficulty, round, summary);

    clock.advance(TimeDelta::seconds(THINK_SECONDS));
    let answer_correctly = player.gen_bool(plan.accuracy);
    let choice = pick_choice(&question, answer_correctly);
    let Some(outcome) = session.answer(&choice) else {
        summary
            .violations
            .push(format!("round {round}: open question rejected the answer"));
        return false;
    };
    if session.answer(&choice).is_some() {
        summary
            .violations
            .push(format!("round {round}: question accepted a second answer"));
    }
    if outcome.correct != answer_correctly {
        summary.violations.push(format!(
            "round {round}: `{choice}` judged {} for `{}`",
            outcome.correct,
            question.correct_word().text()
        ));
    }

    summary.rounds_played += 1;
    if outcome.correct {
        summary.correct += 1;
    } else {
        summary.incorrect += 1;
    }
    if outcome.leveled_up.is_some() {
        summary.levels_gained += 1;
    }
    summary.winner = outcome.winner;
    check_state(session.state(), spins_before, round, &mut summary.violations);
    true
}

fn pick_choice(question: &Question, correct: bool) -> String {
    question
        .choices()
        .iter()
        .find(|word| question.is_correct_answer(word.text()) == correct)
        .map_or_else(
            || question.correct_word().text().to_string(),
            |word| word.text().to_string(),
        )
}

fn check_question(
    question: &Question,
    difficulty: Difficulty,
    round: usize,
    summary: &mut SimulationSummary,
) {
    let choices = question.choices();
    if choices.len() != 3 {
        summary.violations.push(format!(
            "round {round}: {} choices offered",
            choices.len()
        ));
    }
    let matches = choices
        .iter()
        .filter(|word| question.is_correct_answer(word.text()))
        .count();
    if matches != 1 {
        summary
            .violations
            .push(format!("round {round}: {matches} choices match the answer"));
    }
    let crossed = choices.iter().any(|word| word.rime() != question.rime());
    if crossed {
        if difficulty.allows_cross_family() {
            summary.cross_family_questions += 1;
        } else {
            summary.violations.push(format!(
                "round {round}: {difficulty} question mixed in another family"
            ));
        }
    }
}

fn check_state(state: &GameState, spins_before: u32, round: usize, violations: &mut Vec<String>) {
    if state.correct_answers() > state.spin_count() {
        violations.push(format!(
            "round {round}: {} correct answers from {} spins",
            state.correct_answers(),
            state.spin_count()
        ));
    }
    if state.best_streak() < state.current_streak() {
        violations.push(format!(
            "round {round}: best streak {} below current {}",
            state.best_streak(),
            state.current_streak()
        ));
    }
    if state.spin_count() != spins_before + 1 {
        violations.push(format!(
            "round {round}: spin count moved from {spins_before} to {}",
            state.spin_count()
        ));
    }
    if state.level() != level_for_xp(state.experience_points()) {
        violations.push(format!(
            "round {round}: level {} does not match {} xp",
            state.level(),
            state.experience_points()
        ));
    }
    if state.is_spinning() {
        violations.push(format!("round {round}: wheel still spinning after answer"));
    }
}

fn go_shopping(session: &mut SimSession, summary: &mut SimulationSummary) {
    for item in SHOPPING_LIST {
        let Some(listing) = find_item(item) else {
            continue;
        };
        if session.state().tokens() < listing.price {
            continue;
        }
        match session.purchase(item) {
            Ok(()) => summary.purchases.push(item.to_string()),
            Err(PurchaseRejection::AlreadyOwned) => {}
            Err(rejection) => summary
                .violations
                .push(format!("affordable {item} refused: {rejection}")),
        }
    }
}
