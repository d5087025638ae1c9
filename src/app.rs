use std::{thread::sleep, time::{Duration, Instant}};

use crate::game::{SnakeGame, TickOutcome};
use crate::highscore::HighScoreStore;
use crate::input::Command;
use crate::log;
use crate::rain::MatrixRain;
use crate::render::{Renderer, TermRenderer};
use crate::scheduler::{IntervalTimer, TickScheduler};

/// How long the loop sleeps between input polls.
const POLL_INTERVAL_MS: u64 = 5;

/// Single-threaded event loop: input, due ticks and the rain all run here,
/// one after another, so the game state needs no locking.
pub struct App<H: HighScoreStore> {
    game: SnakeGame<IntervalTimer, H>,
    renderer: TermRenderer,
    rain: Option<MatrixRain>,
}

impl<H: HighScoreStore> App<H> {
    pub fn new(game: SnakeGame<IntervalTimer, H>, renderer: TermRenderer, rain: Option<MatrixRain>) -> Self {
        App { game, renderer, rain }
    }

    pub fn run(&mut self) -> Result<(), String> {
        self.renderer.render(&self.game.view())?;

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));
            let mut dirty = false;

            if self.renderer.term_mut().refresh_size().map_err(term_err)? {
                self.resize_rain();
                dirty = true;
            }

            for key_ev in self.renderer.term_mut().read_key_events_queue().map_err(term_err)? {
                match Command::from_key_event(&key_ev) {
                    Some(Command::Quit) => {
                        log!("Quit with score {}, high score {}", self.game.score(), self.game.high_score());
                        return Ok(());
                    }
                    Some(command) => dirty |= self.apply(command),
                    None => {}
                }
            }

            let now = Instant::now();
            if let Some(handle) = self.game.scheduler_mut().poll(now) {
                let outcome = self.game.on_timer(handle);
                log_game_end(&outcome);
                dirty |= outcome != TickOutcome::Ignored;
            }

            if dirty {
                self.renderer.render(&self.game.view())?;
            }

            if let Some(rain) = self.rain.as_mut() {
                if rain.advance_to(now) {
                    self.renderer.render_rain(rain)?;
                }
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Returns true if the screen needs a redraw.
    fn apply(&mut self, command: Command) -> bool {
        let before = self.game.phase();

        match command {
            // Turns show up on the next tick
            Command::Turn(dir) => {
                self.game.set_intent(dir);
                return false;
            }
            Command::Start => self.game.start(),
            Command::Pause => self.game.pause(),
            Command::TogglePause => self.game.toggle_pause(),
            Command::Restart => self.game.init(),
            Command::Quit => {}
        }

        log!("{:?}: {:?} -> {:?}", command, before, self.game.phase());
        true
    }

    fn resize_rain(&mut self) {
        let size = self.renderer.terminal_size();
        let region = self.renderer.layout().rain_region(size);
        if let Some(rain) = self.rain.as_mut() {
            rain.resize(region);
        }
    }
}

fn log_game_end(outcome: &TickOutcome) {
    match outcome {
        TickOutcome::GameOver { reason, score, new_record } => {
            log!("Game over ({:?}), score {}, new record: {}", reason, score, new_record);
        }
        TickOutcome::Won { score, new_record } => {
            log!("Board filled, score {}, new record: {}", score, new_record);
        }
        _ => {}
    }
}

pub fn term_err<E: std::fmt::Display>(e: E) -> String {
    format!("Terminal error: {}", e)
}
