use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenarios::TestScenario;
use crate::logic::simulation::{SimulationPlan, SimulationSummary, run_simulation};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    pub average_accuracy: f64,
    pub achievements_unlocked: usize,
}

pub struct LogicTester {
    verbose: bool,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (difficulty: {} seed: {})",
                        scenario.name.bright_white(),
                        scenario.plan.difficulty,
                        seed
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut durations = Vec::with_capacity(iterations);
        let mut accuracy_total = 0.0;
        let mut achievements = 0;

        for i in 0..iterations {
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let start_time = Instant::now();
            let summary = match run_simulation(&scenario.plan, iteration_seed) {
                Ok(summary) => summary,
                Err(err) => {
                    failures.push(format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1));
                    continue;
                }
            };
            let duration = start_time.elapsed();
            durations.push(duration);
            accuracy_total += observed_accuracy(&summary);
            achievements = achievements.max(summary.unlocked.len());

            match evaluate_expectations(&scenario.plan, &summary) {
                Some(err) => {
                    if self.verbose {
                        println!("  ❌ Iteration {}/{} failed: {}", i + 1, iterations, err.red());
                    }
                    failures.push(format!(
                        "Iteration {} (seed {}, rounds {}, correct {}, level {}): {}",
                        i + 1,
                        summary.seed,
                        summary.rounds_played,
                        summary.correct,
                        summary.final_state.level(),
                        err
                    ));
                }
                None => {
                    successes += 1;
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) rounds:{} tokens:{} achievements:{}",
                            i + 1,
                            iterations,
                            summary.rounds_played,
                            summary.final_state.tokens(),
                            summary.unlocked.len()
                        );
                    }
                }
            }
        }

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration: average(&durations),
            average_accuracy: if durations.is_empty() {
                0.0
            } else {
                accuracy_total / f64::from(u32::try_from(durations.len()).unwrap_or(u32::MAX))
            },
            achievements_unlocked: achievements,
        }
    }
}

fn average(durations: &[Duration]) -> Duration {
    if durations.is_empty() {
        return Duration::ZERO;
    }
    durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(1)
}

fn observed_accuracy(summary: &SimulationSummary) -> f64 {
    let played = u32::try_from(summary.rounds_played).unwrap_or(u32::MAX);
    if played == 0 {
        return 0.0;
    }
    f64::from(u32::try_from(summary.correct).unwrap_or(u32::MAX)) / f64::from(played)
}

/// Broken invariants fail every scenario; plan expectations run after.
fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    if let Some(first) = summary.violations.first() {
        return Some(format!(
            "{first} ({} violations total)",
            summary.violations.len()
        ));
    }
    plan.expectations
        .iter()
        .find_map(|expectation| expectation(summary).err().map(|err| err.to_string()))
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}
