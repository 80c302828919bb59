use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use twentyq_core::error::EngineError;
use twentyq_core::game::engine::{Engine, Phase};
use twentyq_core::model::answer::Answer;
use twentyq_core::model::catalog::CatalogError;

use crate::config::AppConfig;
use crate::screen::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Left,
    Right,
    Ok,
    Back,
}

impl InputKey {
    pub fn from_command(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "r" | "right" => Some(InputKey::Right),
            "n" | "no" | "l" | "left" => Some(InputKey::Left),
            "o" | "ok" | "?" => Some(InputKey::Ok),
            "b" | "back" | "q" | "quit" => Some(InputKey::Back),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Short,
    Long,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: InputKey,
    pub kind: InputType,
}

impl InputEvent {
    pub const fn short(key: InputKey) -> Self {
        Self {
            key,
            kind: InputType::Short,
        }
    }
}

/// What a call to [`GameController::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    WinAcknowledged,
    ExhaustedRestart,
}

/// Maps key presses onto engine operations and owns the timing the engine
/// leaves to its host: the win screen's duration and the restart after every
/// candidate has been ruled out.
pub struct GameController {
    engine: Engine,
    win_display: Duration,
    win_started: Option<Instant>,
}

impl GameController {
    pub fn new(engine: Engine, win_display: Duration) -> Self {
        Self {
            engine,
            win_display,
            win_started: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let catalog = config.load_catalog()?;
        let engine = Engine::new(catalog, config.engine);
        Ok(Self::new(engine, config.win_display))
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn is_showing_win(&self) -> bool {
        matches!(self.engine.phase(), Phase::Won { .. })
    }

    /// Applies one input event. Returns `true` when the engine state changed.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> bool {
        if event.kind != InputType::Short {
            return false;
        }

        let result = match (self.engine.phase(), event.key) {
            (Phase::Won { .. }, _) => return false,
            (Phase::ConfirmingGuess { .. }, InputKey::Right) => {
                self.win_started = Some(now);
                self.engine.confirm_accept().map(|_| ())
            }
            (Phase::ConfirmingGuess { .. }, InputKey::Left) => {
                self.engine.confirm_reject().map(|_| ())
            }
            (Phase::ConfirmingGuess { .. }, _) => return false,
            (Phase::Finished, InputKey::Back) => {
                info!(target: "twentyq_app::controller", "restart requested");
                self.engine.reset();
                Ok(())
            }
            (Phase::Finished, _) => return false,
            (Phase::Asking, InputKey::Left) => self.engine.answer(Answer::No).map(|_| ()),
            (Phase::Asking, InputKey::Right) => self.engine.answer(Answer::Yes).map(|_| ()),
            (Phase::Asking, InputKey::Back) => self.engine.abort(),
            (Phase::Asking, InputKey::Ok) => return false,
        };

        self.report(result, event.key)
    }

    /// Advances host-owned timers. Call this from the polling loop.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.is_showing_win() {
            let started = *self.win_started.get_or_insert(now);
            if now.saturating_duration_since(started) < self.win_display {
                return TickOutcome::Idle;
            }
            self.win_started = None;
            return match self.engine.acknowledge_win_and_restart() {
                Ok(()) => {
                    debug!(target: "twentyq_app::controller", "win display elapsed");
                    TickOutcome::WinAcknowledged
                }
                Err(err) => {
                    warn!(target: "twentyq_app::controller", %err, "win acknowledgement rejected");
                    TickOutcome::Idle
                }
            };
        }

        if self.engine.phase() == Phase::Finished && self.engine.is_exhausted() {
            info!(target: "twentyq_app::controller", "every candidate ruled out, restarting");
            self.engine.reset();
            return TickOutcome::ExhaustedRestart;
        }

        TickOutcome::Idle
    }

    pub fn screen(&self) -> Screen {
        match self.engine.phase() {
            Phase::Won { .. } => Screen::Win,
            Phase::ConfirmingGuess { candidate } => {
                let name = self.engine.candidate_name(candidate).unwrap_or("?");
                Screen::confirm_guess(name)
            }
            Phase::Finished => Screen::OutOfGuesses,
            Phase::Asking => {
                let prompt = self
                    .engine
                    .current_question()
                    .map(|q| q.prompt())
                    .unwrap_or_default();
                Screen::question(self.engine.question_index() + 1, prompt)
            }
        }
    }

    fn report(&self, result: Result<(), EngineError>, key: InputKey) -> bool {
        match result {
            Ok(()) => {
                debug!(
                    target: "twentyq_app::controller",
                    ?key,
                    phase = self.engine.phase().as_str(),
                    "input applied"
                );
                true
            }
            Err(err) => {
                warn!(target: "twentyq_app::controller", ?key, %err, "input rejected by engine");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GameController, InputEvent, InputKey, InputType, TickOutcome};
    use crate::screen::Screen;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use twentyq_core::game::config::EngineConfig;
    use twentyq_core::game::engine::{Engine, Phase};
    use twentyq_core::model::candidate::CandidateProfile;
    use twentyq_core::model::catalog::Catalog;
    use twentyq_core::model::question::Question;

    fn press(controller: &mut GameController, key: InputKey, now: Instant) -> bool {
        controller.handle_input(InputEvent::short(key), now)
    }

    fn standard() -> GameController {
        GameController::new(Engine::standard(), Duration::from_millis(1500))
    }

    #[test]
    fn right_then_right_reaches_the_win_screen() {
        let mut controller = standard();
        let now = Instant::now();
        for _ in 0..3 {
            assert!(press(&mut controller, InputKey::Right, now));
        }
        assert_eq!(controller.screen(), Screen::confirm_guess("Flipper Zero"));

        assert!(press(&mut controller, InputKey::Right, now));
        assert_eq!(controller.screen(), Screen::Win);
        assert!(!press(&mut controller, InputKey::Left, now));
        assert!(controller.is_showing_win());
    }

    #[test]
    fn win_screen_restarts_after_display_time() {
        let mut controller = standard();
        let start = Instant::now();
        for _ in 0..4 {
            press(&mut controller, InputKey::Right, start);
        }

        assert_eq!(
            controller.tick(start + Duration::from_millis(1499)),
            TickOutcome::Idle
        );
        assert!(controller.is_showing_win());
        assert_eq!(
            controller.tick(start + Duration::from_millis(1500)),
            TickOutcome::WinAcknowledged
        );
        assert_eq!(controller.engine().phase(), Phase::Asking);
        assert_eq!(controller.screen(), Screen::question(1, "Is it electronic?"));
    }

    #[test]
    fn long_presses_and_ok_are_ignored() {
        let mut controller = standard();
        let now = Instant::now();
        let long = InputEvent {
            key: InputKey::Right,
            kind: InputType::Long,
        };
        assert!(!controller.handle_input(long, now));
        assert!(!press(&mut controller, InputKey::Ok, now));
        assert_eq!(controller.engine().question_index(), 0);
    }

    #[test]
    fn back_while_asking_stops_the_session() {
        let mut controller = standard();
        assert!(press(&mut controller, InputKey::Back, Instant::now()));
        assert!(!controller.is_running());
    }

    #[test]
    fn back_restarts_a_finished_session() {
        let mut controller = standard();
        let now = Instant::now();
        for _ in 0..20 {
            press(&mut controller, InputKey::Left, now);
        }
        assert_eq!(controller.screen(), Screen::OutOfGuesses);
        assert!(!press(&mut controller, InputKey::Right, now));
        assert_eq!(controller.tick(now), TickOutcome::Idle);

        assert!(press(&mut controller, InputKey::Back, now));
        assert_eq!(controller.engine().phase(), Phase::Asking);
        assert!(controller.is_running());
    }

    #[test]
    fn exhausted_finish_restarts_on_tick() {
        let candidates = vec![CandidateProfile::new("only", "test")];
        let questions = vec![Question::symmetric("Is it the only one?", vec![9])];
        let catalog = Arc::new(Catalog::new(candidates, questions).unwrap());
        let engine = Engine::new(catalog, EngineConfig::new(6, 1));
        let mut controller = GameController::new(engine, Duration::ZERO);
        let now = Instant::now();

        press(&mut controller, InputKey::Right, now);
        assert_eq!(controller.screen(), Screen::confirm_guess("only"));
        press(&mut controller, InputKey::Left, now);
        assert_eq!(controller.engine().phase(), Phase::Finished);
        assert!(controller.engine().is_exhausted());

        assert_eq!(controller.tick(now), TickOutcome::ExhaustedRestart);
        assert_eq!(controller.engine().phase(), Phase::Asking);
        assert!(!controller.engine().is_exhausted());
    }

    #[test]
    fn commands_map_to_keys() {
        assert_eq!(InputKey::from_command("YES"), Some(InputKey::Right));
        assert_eq!(InputKey::from_command("l"), Some(InputKey::Left));
        assert_eq!(InputKey::from_command("quit"), Some(InputKey::Back));
        assert_eq!(InputKey::from_command("?"), Some(InputKey::Ok));
        assert_eq!(InputKey::from_command("jump"), None);
    }
}
