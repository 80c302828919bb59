use twentyq_bot::{NoisyResponder, OracleResponder, SessionResult, play_session};
use twentyq_core::error::EngineError;
use twentyq_core::game::engine::{Engine, Phase};

#[test]
fn oracle_guesses_flipper_after_three_questions() {
    let mut engine = Engine::standard();
    let mut oracle = OracleResponder::new();

    let outcome = play_session(&mut engine, &mut oracle, 0).expect("session completes");

    assert_eq!(outcome.result, SessionResult::Won);
    assert_eq!(outcome.guessed, Some(0));
    assert_eq!(outcome.questions_asked, 3);
    assert_eq!(outcome.rejected_guesses, 0);
    assert_eq!(engine.phase(), Phase::Won { candidate: 0 });
}

#[test]
fn smartphone_is_found_after_one_wrong_guess() {
    let mut engine = Engine::standard();
    let mut oracle = OracleResponder::new();

    let outcome = play_session(&mut engine, &mut oracle, 4).expect("session completes");

    // Flipper Zero is proposed first and rejected; the rejection skips the
    // RF question, and the buttons question then puts the smartphone ahead.
    // Four questions are answered while the engine's index reaches five.
    assert_eq!(outcome.result, SessionResult::Won);
    assert_eq!(outcome.guessed, Some(4));
    assert_eq!(outcome.rejected_guesses, 1);
    assert_eq!(outcome.questions_asked, 4);
    assert_eq!(engine.question_index(), 5);
}

#[test]
fn every_secret_terminates_consistently() {
    let mut engine = Engine::standard();
    let mut oracle = OracleResponder::new();

    for secret in 0..engine.candidates().len() {
        let outcome = play_session(&mut engine, &mut oracle, secret).expect("session completes");
        assert!(outcome.questions_asked <= engine.question_count());
        assert_eq!(
            outcome.questions_asked + outcome.rejected_guesses,
            engine.question_index()
        );
        match outcome.result {
            SessionResult::Won => assert_eq!(outcome.guessed, Some(secret)),
            SessionResult::OutOfQuestions => {
                assert_eq!(outcome.guessed, None);
                assert_eq!(engine.phase(), Phase::Finished);
            }
        }
    }
}

#[test]
fn noisy_sessions_are_reproducible() {
    let mut engine = Engine::standard();
    let run = |engine: &mut Engine| {
        let mut noisy = NoisyResponder::new(0.25, 4242);
        (0..6)
            .map(|secret| play_session(engine, &mut noisy, secret).expect("session completes"))
            .collect::<Vec<_>>()
    };

    let first = run(&mut engine);
    let second = run(&mut engine);
    assert_eq!(first, second);
}

#[test]
fn unknown_secret_is_rejected() {
    let mut engine = Engine::standard();
    let mut oracle = OracleResponder::new();
    assert_eq!(
        play_session(&mut engine, &mut oracle, 6),
        Err(EngineError::OutOfRange { index: 6, len: 6 })
    );
}
