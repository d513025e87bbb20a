use anyhow::{Result, bail, ensure};
use cvc_spin_game::Difficulty;

use crate::logic::simulation::{SimulationPlan, SimulationSummary};

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub description: &'static str,
    pub plan: SimulationPlan,
}

const SCENARIOS: [(&str, &str); 6] = [
    ("smoke", "Thirty rounds at medium difficulty with a decent reader"),
    (
        "perfect-player",
        "Every answer right: streak, perfect round and speed achievements unlock",
    ),
    (
        "struggling-player",
        "Mostly wrong answers never break the state invariants",
    ),
    (
        "hard-mode",
        "Hard questions mix in words from other families",
    ),
    (
        "multiplayer-match",
        "Two players alternate until one reaches ten points",
    ),
    (
        "week-of-play",
        "Seven days of play with every daily challenge claimed",
    ),
];

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.to_vec()
}

pub fn all_scenario_names() -> Vec<String> {
    SCENARIOS.iter().map(|(name, _)| (*name).to_string()).collect()
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let (key, description) = SCENARIOS.iter().find(|(key, _)| *key == name)?;
    let plan = match *key {
        "smoke" => SimulationPlan::default().with_expectation(expect_first_steps),
        "perfect-player" => SimulationPlan {
            rounds: 20,
            accuracy: 1.0,
            shop: false,
            ..SimulationPlan::default()
        }
        .with_expectation(expect_flawless),
        "struggling-player" => SimulationPlan {
            rounds: 40,
            accuracy: 0.3,
            ..SimulationPlan::default()
        }
        .with_expectation(expect_streaks_broken),
        "hard-mode" => SimulationPlan {
            rounds: 60,
            difficulty: Difficulty::Hard,
            ..SimulationPlan::default()
        }
        .with_expectation(expect_cross_family_mix),
        "multiplayer-match" => SimulationPlan {
            rounds: 60,
            accuracy: 0.9,
            multiplayer: true,
            ..SimulationPlan::default()
        }
        .with_expectation(expect_winner),
        "week-of-play" => SimulationPlan {
            rounds: 70,
            days: 7,
            accuracy: 1.0,
            shop: false,
            ..SimulationPlan::default()
        }
        .with_expectation(expect_full_week),
        _ => return None,
    };
    Some(TestScenario {
        name: (*key).to_string(),
        description,
        plan,
    })
}

fn expect_first_steps(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.has_unlocked("first-spin"),
        "first spin achievement missing"
    );
    ensure!(
        summary.final_state.spin_count() == 30,
        "expected 30 spins, saw {}",
        summary.final_state.spin_count()
    );
    Ok(())
}

fn expect_flawless(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.incorrect == 0, "{} misses", summary.incorrect);
    for id in ["perfect-round", "streak-10", "speed-demon", "first-correct"] {
        ensure!(summary.has_unlocked(id), "{id} not unlocked");
    }
    ensure!(
        summary.final_state.best_streak() == 20,
        "best streak {}",
        summary.final_state.best_streak()
    );
    Ok(())
}

fn expect_streaks_broken(summary: &SimulationSummary) -> Result<()> {
    if summary.incorrect == 0 {
        bail!("a 30% reader answered everything right");
    }
    ensure!(
        !summary.final_state.should_celebrate_success(),
        "celebrated a {:.0}% success rate",
        summary.final_state.success_rate() * 100.0
    );
    Ok(())
}

fn expect_cross_family_mix(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.cross_family_questions > 0,
        "no hard question mixed families in {} rounds",
        summary.rounds_played
    );
    ensure!(
        summary.cross_family_questions < summary.rounds_played,
        "every hard question mixed families"
    );
    Ok(())
}

fn expect_winner(summary: &SimulationSummary) -> Result<()> {
    let Some(winner) = summary.winner else {
        bail!("no winner after {} rounds", summary.rounds_played);
    };
    ensure!(
        summary.final_state.has_won(winner),
        "{winner} reported as winner without ten points"
    );
    ensure!(
        summary.final_state.tokens() == 0,
        "multiplayer rounds paid out tokens"
    );
    Ok(())
}

fn expect_full_week(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.final_state.consecutive_days() == 7,
        "consecutive days {}",
        summary.final_state.consecutive_days()
    );
    ensure!(
        summary.daily_rewards == 70,
        "claimed {} reward tokens over the week",
        summary.daily_rewards
    );
    ensure!(
        summary.has_unlocked("spinner-50"),
        "spinner-50 not unlocked"
    );
    Ok(())
}
