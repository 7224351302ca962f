#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick driver that turns elapsed wall-clock time into `Tick` commands.
//!
//! The scheduler never reads the world. Drivers hand it the events the world
//! broadcast together with the time that elapsed, then poll it with the
//! world's current tick interval until it stops yielding commands. Because the
//! interval may change on every tick, it must be re-read before each poll.

use std::time::Duration;

use snake_floors_core::{Command, Event, RunId};
use tracing::debug;

const DEFAULT_MAX_CATCH_UP: u32 = 5;

/// Configuration parameters required to construct the tick scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    max_catch_up: u32,
}

impl Config {
    /// Creates a configuration that issues at most `max_catch_up` ticks per frame.
    #[must_use]
    pub const fn new(max_catch_up: u32) -> Self {
        Self { max_catch_up }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CATCH_UP)
    }
}

/// Pure system that paces `Tick` commands for the live run.
#[derive(Debug)]
pub struct TickScheduler {
    max_catch_up: u32,
    run: Option<RunId>,
    accumulator: Duration,
    issued_this_frame: u32,
}

impl TickScheduler {
    /// Creates a new scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            max_catch_up: config.max_catch_up,
            run: None,
            accumulator: Duration::ZERO,
            issued_this_frame: 0,
        }
    }

    /// Run the scheduler currently issues ticks for, if any.
    #[must_use]
    pub fn live_run(&self) -> Option<RunId> {
        self.run
    }

    /// Observes world events and banks `elapsed` time for the live run.
    ///
    /// A call carrying non-zero `elapsed` starts a new frame for the catch-up
    /// limit; pass [`Duration::ZERO`] to report events produced mid-frame.
    pub fn handle(&mut self, events: &[Event], elapsed: Duration) {
        for event in events {
            match event {
                Event::RunStarted { run } => {
                    self.run = Some(*run);
                    self.accumulator = Duration::ZERO;
                }
                Event::GameOver { .. } | Event::SessionHalted { .. } => {
                    self.run = None;
                    self.accumulator = Duration::ZERO;
                }
                _ => {}
            }
        }

        if self.run.is_none() || elapsed.is_zero() {
            return;
        }
        self.accumulator = self.accumulator.saturating_add(elapsed);
        self.issued_this_frame = 0;
    }

    /// Yields the next due tick for an interval of `interval`, if one is due.
    pub fn poll(&mut self, interval: Duration) -> Option<Command> {
        let run = self.run?;
        if interval.is_zero() || self.accumulator < interval {
            return None;
        }
        if self.issued_this_frame >= self.max_catch_up {
            debug!(backlog = ?self.accumulator, "dropping tick backlog");
            self.accumulator = Duration::ZERO;
            return None;
        }

        self.accumulator -= interval;
        self.issued_this_frame += 1;
        Some(Command::Tick { run, dt: interval })
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
