//! Fixed-rate simulation driven from a variable-rate frame loop.
//!
//! The host calls `frame` once per rendered frame with the real time that has
//! passed. Time accumulates until it exceeds the tick interval, then exactly
//! one tick runs and the accumulator starts from zero again. Surplus time is
//! dropped rather than replayed as catch-up ticks.

use log::{debug, info};
use rand::Rng;
use std::time::Duration;

use crate::board::{Board, Direction, Size};
use crate::config::Config;
use crate::engine::{advance_tick, EndCause, Rules, Session, Step};
use crate::latch::InputLatch;

const START_DIRECTION: Direction = Direction::East;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Terminal(EndCause),
}

/// Read-only view handed to the renderer each frame.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub board: &'a Board,
    pub score: u32,
    pub length: u32,
    pub is_game_over: bool,
    pub is_win: bool,
    pub phase: Phase,
}

pub struct GameLoop<R: Rng> {
    phase: Phase,
    session: Session,
    latch: InputLatch,
    accumulated: Duration,
    tick_interval: Duration,
    board_size: Size,
    start_length: u32,
    rules: Rules,
    rng: R,
}

impl<R: Rng> GameLoop<R> {
    pub fn new(config: &Config, mut rng: R) -> Self {
        let session = Session::new(config.board, config.start_length, &mut rng);
        GameLoop {
            phase: Phase::Idle,
            session,
            latch: InputLatch::new(START_DIRECTION),
            accumulated: Duration::ZERO,
            tick_interval: config.tick_interval,
            board_size: config.board,
            start_length: config.start_length,
            rules: config.rules,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        info!(
            "Starting game on {}x{} board",
            self.board_size.width, self.board_size.height
        );
        self.enter_running();
    }

    /// Throw the current game away and begin a new one.
    pub fn restart(&mut self) {
        info!("Restarting game (previous score {})", self.session.score());
        self.session = Session::new(self.board_size, self.start_length, &mut self.rng);
        self.latch = InputLatch::new(START_DIRECTION);
        self.enter_running();
    }

    fn enter_running(&mut self) {
        self.accumulated = Duration::ZERO;
        self.phase = match self.session.end_cause() {
            Some(cause) => Phase::Terminal(cause),
            None => Phase::Running,
        };
    }

    pub fn on_direction(&mut self, direction: Direction) {
        if self.phase == Phase::Running && !self.latch.record_direction(direction) {
            debug!(
                "Ignoring reversal to {:?} while heading {:?}",
                direction,
                self.latch.committed()
            );
        }
    }

    /// Account for `elapsed` real time; returns the step if a tick ran.
    pub fn frame(&mut self, elapsed: Duration) -> Option<Step> {
        if self.phase != Phase::Running {
            return None;
        }

        self.accumulated += elapsed;
        if self.accumulated <= self.tick_interval {
            return None;
        }
        self.accumulated = Duration::ZERO;

        let direction = self.latch.consume_latched();
        let (next, step) = advance_tick(&self.session, direction, &self.rules, &mut self.rng);
        self.session = next;

        match step {
            Step::Fed { gained } => {
                debug!(
                    "Fed for {} points, length {}, food now at {:?}",
                    gained,
                    self.session.length(),
                    self.session.board().food()
                );
            }
            Step::Ended(cause) => {
                info!(
                    "Game over ({:?}), score {}, length {}",
                    cause,
                    self.session.score(),
                    self.session.length()
                );
                self.phase = Phase::Terminal(cause);
            }
            Step::Moved | Step::Stalled => {}
        }
        Some(step)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            board: self.session.board(),
            score: self.session.score(),
            length: self.session.length(),
            is_game_over: self.session.is_game_over(),
            is_win: self.session.is_win(),
            phase: self.phase,
        }
    }
}
