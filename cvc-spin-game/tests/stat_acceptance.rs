use cvc_spin_game::question::Difficulty;
use cvc_spin_game::question_factory::{QuestionOptions, create_question};
use cvc_spin_game::rimes::RimeSet;
use cvc_spin_game::rng::RngBundle;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::HashMap;
use std::convert::TryFrom;

const SAMPLE_SIZE: usize = 6600;
const TOLERANCE: f64 = 0.03;

fn rate(count: usize, total: usize) -> f64 {
    f64::from(u32::try_from(count).expect("count fits"))
        / f64::from(u32::try_from(total).expect("total fits"))
}

#[test]
fn wheel_lands_on_every_family_uniformly() {
    let rimes = RimeSet::builtin().expect("bundled rimes");
    let mut bundle = RngBundle::from_user_seed(0x5EED);
    let mut seen: HashMap<String, usize> = HashMap::new();
    for _ in 0..SAMPLE_SIZE {
        let rime = rimes.pick_random(bundle.wheel());
        *seen.entry(rime.pattern().to_string()).or_insert(0) += 1;
    }
    assert_eq!(seen.len(), rimes.len());
    let expected = 1.0 / f64::from(u32::try_from(rimes.len()).expect("count fits"));
    for (pattern, count) in &seen {
        let observed = rate(*count, SAMPLE_SIZE);
        assert!(
            (observed - expected).abs() <= TOLERANCE,
            "{pattern} drifted: observed {observed:.4}, expected {expected:.4}"
        );
    }
    assert!(bundle.wheel().draws() >= u64::try_from(SAMPLE_SIZE).expect("fits"));
}

#[test]
fn wheel_angles_cover_the_full_turn() {
    let rimes = RimeSet::builtin().expect("bundled rimes");
    let mut previous_end = 0.0;
    for rime in &rimes {
        assert!((rime.angle_start() - previous_end).abs() < 1e-9);
        assert!(rime.angle_end() > rime.angle_start());
        let landed = rimes.at_angle(rime.center_angle()).expect("slice exists");
        assert_eq!(landed.pattern(), rime.pattern());
        previous_end = rime.angle_end();
    }
    assert!((previous_end - 360.0).abs() < 1e-9);
}

#[test]
fn hard_questions_mix_families_about_thirty_percent_of_the_time() {
    let rimes = RimeSet::builtin().expect("bundled rimes");
    let rime = rimes.by_pattern("-at").expect("listed");
    let mut rng = SmallRng::seed_from_u64(0xACED);
    let options = QuestionOptions::with_difficulty(Difficulty::Hard);
    let mut crossed = 0usize;
    for _ in 0..SAMPLE_SIZE {
        let question = create_question(rime, &rimes, options, &mut rng).expect("question");
        assert_eq!(question.choices().len(), 3);
        if question.choices().iter().any(|word| word.rime() != "-at") {
            crossed += 1;
        }
    }
    let observed = rate(crossed, SAMPLE_SIZE);
    assert!(
        (observed - 0.3).abs() <= TOLERANCE,
        "cross-family rate drifted: observed {observed:.4}"
    );
}

#[test]
fn correct_answer_position_is_uniform() {
    let rimes = RimeSet::builtin().expect("bundled rimes");
    let rime = rimes.by_pattern("-og").expect("listed");
    let mut rng = SmallRng::seed_from_u64(0xBEEF);
    let mut positions = [0usize; 3];
    for _ in 0..SAMPLE_SIZE {
        let question =
            create_question(rime, &rimes, QuestionOptions::default(), &mut rng).expect("question");
        let index = question
            .choices()
            .iter()
            .position(|word| word.text() == question.correct_word().text())
            .expect("correct word offered");
        positions[index] += 1;
    }
    for count in positions {
        let observed = rate(count, SAMPLE_SIZE);
        assert!((observed - 1.0 / 3.0).abs() <= TOLERANCE);
    }
}
