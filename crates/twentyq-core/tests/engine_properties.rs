use std::sync::Arc;

use twentyq_core::game::config::EngineConfig;
use twentyq_core::game::engine::{Engine, Phase};
use twentyq_core::model::answer::Answer;
use twentyq_core::model::candidate::CandidateProfile;
use twentyq_core::model::catalog::Catalog;
use twentyq_core::model::question::Question;

fn scores(engine: &Engine) -> Vec<i32> {
    engine.candidates().iter().map(|c| c.score()).collect()
}

/// Deterministic answer pattern covering both branches.
fn pattern(step: usize) -> Answer {
    Answer::from_bool((step * 7 + 3) % 5 < 2)
}

fn flat_catalog(questions: usize, pool: usize) -> Arc<Catalog> {
    let candidates = (0..pool)
        .map(|i| CandidateProfile::new(format!("c{i}"), "flat"))
        .collect();
    let questions = (0..questions)
        .map(|q| {
            let yes = (0..pool).map(|i| ((q + i) % 3) as i32 - 1).collect();
            Question::symmetric(format!("q{q}"), yes)
        })
        .collect();
    Arc::new(Catalog::new(candidates, questions).unwrap())
}

#[test]
fn each_answer_adds_exactly_the_question_weights() {
    // A threshold no score can reach keeps the engine asking.
    let config = EngineConfig::default().with_confirm_threshold(i32::MAX);
    let mut engine = Engine::new(Arc::new(Catalog::standard()), config);
    let catalog = Arc::clone(engine.catalog());

    for step in 0..catalog.question_count() {
        let answer = pattern(step);
        let before = scores(&engine);
        let weights = catalog.bank().weights(step, answer).unwrap().to_vec();
        engine.answer(answer).unwrap();
        let after = scores(&engine);
        for i in 0..before.len() {
            assert_eq!(after[i] - before[i], weights[i], "candidate {i} at step {step}");
        }
    }
    assert_eq!(engine.phase(), Phase::Finished);
}

#[test]
fn eliminated_scores_stay_frozen() {
    let mut engine = Engine::standard();
    for _ in 0..3 {
        engine.answer(Answer::Yes).unwrap();
    }
    let rejected = engine.candidate_in_confirmation().expect("guess proposed");
    let frozen = engine.score(rejected).unwrap();
    engine.confirm_reject().unwrap();

    let mut step = 0;
    while engine.phase() != Phase::Finished {
        match engine.phase() {
            Phase::Asking => {
                engine.answer(pattern(step)).unwrap();
                step += 1;
            }
            Phase::ConfirmingGuess { .. } => {
                engine.confirm_reject().unwrap();
            }
            other => panic!("unexpected phase {other:?}"),
        }
        assert_eq!(engine.score(rejected).unwrap(), frozen);
    }
}

#[test]
fn confirmation_matches_threshold_rule_after_every_answer() {
    for (threshold, min_questions) in [(6, 3), (4, 1), (9, 5), (2, 0)] {
        let config = EngineConfig::new(threshold, min_questions);
        let mut engine = Engine::new(Arc::new(Catalog::standard()), config);
        let mut step = 0;

        while engine.phase() == Phase::Asking {
            engine.answer(Answer::from_bool(step % 3 != 1)).unwrap();
            step += 1;

            let best = engine
                .candidates()
                .iter()
                .filter(|c| !c.is_eliminated())
                .map(|c| c.score())
                .max();
            let expected = engine.question_index() >= min_questions
                && best.is_some_and(|score| score >= threshold);
            assert_eq!(
                matches!(engine.phase(), Phase::ConfirmingGuess { .. }),
                expected,
                "threshold {threshold}, min {min_questions}, step {step}"
            );

            if let Phase::ConfirmingGuess { candidate } = engine.phase() {
                assert_eq!(Some(engine.score(candidate).unwrap()), best);
                assert_eq!(engine.best_candidate(), Some(candidate));
                engine.confirm_reject().unwrap();
            }
        }
    }
}

#[test]
fn exhaustion_follows_rejections_across_the_whole_pool() {
    // Every answer pushes every candidate over the threshold.
    let candidates = (0..3)
        .map(|i| CandidateProfile::new(format!("c{i}"), "hot"))
        .collect();
    let questions = (0..10)
        .map(|q| Question::symmetric(format!("q{q}"), vec![5, 5, 5]))
        .collect();
    let catalog = Arc::new(Catalog::new(candidates, questions).unwrap());
    let mut engine = Engine::new(catalog, EngineConfig::new(5, 1));

    for expected in 0..3 {
        assert!(!engine.is_exhausted());
        let phase = engine.answer(Answer::Yes).unwrap();
        assert_eq!(phase, Phase::ConfirmingGuess { candidate: expected });
        engine.confirm_reject().unwrap();
    }
    assert!(engine.is_exhausted());

    // Nothing left to propose: answering simply runs out the bank.
    while engine.phase() == Phase::Asking {
        engine.answer(Answer::Yes).unwrap();
    }
    assert_eq!(engine.phase(), Phase::Finished);
    assert!(engine.is_exhausted());
    assert_eq!(engine.best_candidate(), None);
}

#[test]
fn reset_twice_matches_reset_once() {
    let mut engine = Engine::standard();
    for _ in 0..3 {
        engine.answer(Answer::Yes).unwrap();
    }
    engine.confirm_reject().unwrap();

    engine.reset();
    let once = (scores(&engine), engine.phase(), engine.question_index());
    engine.reset();
    let twice = (scores(&engine), engine.phase(), engine.question_index());

    assert_eq!(once, twice);
    assert_eq!(once.1, Phase::Asking);
    assert_eq!(once.2, 0);
    assert!(once.0.iter().all(|s| *s == 0));
    assert!(engine.candidates().iter().all(|c| !c.is_eliminated()));
    assert!(engine.is_running());
}

#[test]
fn budget_runs_out_after_question_count_answers() {
    let catalog = flat_catalog(7, 4);
    let config = EngineConfig::default().with_confirm_threshold(100);
    let mut engine = Engine::new(catalog, config);

    for step in 0..7 {
        assert_eq!(engine.phase(), Phase::Asking, "step {step}");
        engine.answer(pattern(step)).unwrap();
    }
    assert_eq!(engine.phase(), Phase::Finished);
    assert_eq!(engine.question_index(), 7);
}

#[test]
fn win_restart_resets_the_session() {
    let mut engine = Engine::standard();
    for _ in 0..3 {
        engine.answer(Answer::Yes).unwrap();
    }
    assert_eq!(engine.confirm_accept().unwrap(), Phase::Won { candidate: 0 });
    assert!(engine.answer(Answer::Yes).is_err());

    engine.acknowledge_win_and_restart().unwrap();
    assert_eq!(engine.phase(), Phase::Asking);
    assert_eq!(
        engine.current_question().unwrap().prompt(),
        "Is it electronic?"
    );
}
