//! Line-oriented host: one command per input line, one screen per change.

use std::io::{BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::debug;

use crate::controller::{GameController, InputEvent, InputKey, TickOutcome};
use crate::screen::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct Console {
    controller: GameController,
    format: OutputFormat,
    poll_interval: Duration,
}

/// Counters reported when the console loop ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsoleSummary {
    pub inputs: usize,
    pub wins: usize,
    pub restarts: usize,
}

impl Console {
    pub fn new(controller: GameController, format: OutputFormat, poll_interval: Duration) -> Self {
        Self {
            controller,
            format,
            poll_interval,
        }
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    /// Runs until the player aborts or the input ends.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<ConsoleSummary> {
        let mut summary = ConsoleSummary::default();
        self.render(&mut output)?;

        for line in input.lines() {
            let line = line?;
            let command = line.trim();
            if command.is_empty() {
                continue;
            }

            let Some(key) = InputKey::from_command(command) else {
                writeln!(output, "Unknown command '{command}' (use y, n, b or ok)")?;
                continue;
            };

            summary.inputs += 1;
            if !self.controller.handle_input(InputEvent::short(key), Instant::now()) {
                continue;
            }
            if !self.controller.is_running() {
                debug!(target: "twentyq_app::console", "player aborted");
                break;
            }

            self.render(&mut output)?;
            if self.controller.is_showing_win() {
                summary.wins += 1;
                self.wait_for_win_display();
                self.render(&mut output)?;
            }
            if self.controller.tick(Instant::now()) == TickOutcome::ExhaustedRestart {
                summary.restarts += 1;
                self.render(&mut output)?;
            }
        }

        output.flush()?;
        Ok(summary)
    }

    fn wait_for_win_display(&mut self) {
        while self.controller.tick(Instant::now()) != TickOutcome::WinAcknowledged {
            thread::sleep(self.poll_interval);
        }
    }

    fn render<W: Write>(&self, output: &mut W) -> Result<()> {
        let screen: Screen = self.controller.screen();
        match self.format {
            OutputFormat::Text => {
                for line in screen.lines() {
                    writeln!(output, "{line}")?;
                }
                writeln!(output)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut *output, &screen)?;
                writeln!(output)?;
            }
        }
        Ok(())
    }
}
