//! Tunable gameplay rules.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest grid that still fits the spawn body.
pub const MIN_GRID_SIZE: u32 = 4;

/// Number of segments the snake starts (and respawns) with.
pub const SPAWN_LENGTH: usize = 3;

/// Every tunable number the world consults while simulating a run.
///
/// Deserialisation fills missing fields from [`Rules::default`], so a rules
/// file only needs to name the values it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    /// Cells along each edge of the square grid.
    pub grid_size: u32,
    /// Tick interval at the start of a run, in milliseconds.
    pub initial_tick_interval_ms: u64,
    /// Floor advances never push the base interval below this, in milliseconds.
    pub min_tick_interval_ms: u64,
    /// Base interval reduction applied on every floor advance, in milliseconds.
    pub floor_speedup_ms: u64,
    /// Lives at the start of a run.
    pub starting_lives: u32,
    /// Lives can never exceed this.
    pub max_lives: u32,
    /// Score needed per floor; the threshold is `floor * floor_score_step`.
    pub floor_score_step: u64,
    /// Random cells tried before a placement gives up.
    pub placement_attempts: u32,
    /// Obstacles added per floor number.
    pub obstacles_per_floor: u32,
    /// Upper bound on obstacles per floor.
    pub max_obstacles: u32,
    /// Floors that are a multiple of this get a portal pair.
    pub portal_floor_interval: u32,
    /// Enemies appear only on floors above this one.
    pub enemy_min_floor: u32,
    /// Enemy count is `floor / enemy_floor_divisor`.
    pub enemy_floor_divisor: u32,
    /// Upper bound on enemies per floor.
    pub max_enemies: u32,
    /// Enemies move once every this many ticks.
    pub enemy_step_period: u32,
    /// Enemy bodies are truncated to this length.
    pub enemy_max_length: usize,
    /// Fewest coins placed per floor.
    pub min_coins: u32,
    /// Most coins placed per floor.
    pub max_coins: u32,
    /// Coin value is `floor * coin_value_per_floor`.
    pub coin_value_per_floor: u32,
    /// Abilities offered after a floor advance.
    pub upgrade_choices: usize,
    /// Reach of the ordinary magnet, in cells per axis.
    pub magnet_range: u32,
    /// Reach of the board-wide magnet, in cells per axis.
    pub board_magnet_range: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_tick_interval_ms: 80,
            min_tick_interval_ms: 30,
            floor_speedup_ms: 10,
            starting_lives: 3,
            max_lives: 5,
            floor_score_step: 50,
            placement_attempts: 100,
            obstacles_per_floor: 2,
            max_obstacles: 15,
            portal_floor_interval: 3,
            enemy_min_floor: 5,
            enemy_floor_divisor: 5,
            max_enemies: 3,
            enemy_step_period: 3,
            enemy_max_length: 3,
            min_coins: 2,
            max_coins: 4,
            coin_value_per_floor: 10,
            upgrade_choices: 5,
            magnet_range: 5,
            board_magnet_range: 20,
        }
    }
}

impl Rules {
    /// Tick interval at the start of a run.
    #[must_use]
    pub const fn initial_tick_interval(&self) -> Duration {
        Duration::from_millis(self.initial_tick_interval_ms)
    }

    /// Lower bound applied by floor advances.
    #[must_use]
    pub const fn min_tick_interval(&self) -> Duration {
        Duration::from_millis(self.min_tick_interval_ms)
    }

    /// Base interval reduction per floor advance.
    #[must_use]
    pub const fn floor_speedup(&self) -> Duration {
        Duration::from_millis(self.floor_speedup_ms)
    }

    /// Score that completes `floor`.
    #[must_use]
    pub const fn floor_threshold(&self, floor: u32) -> u64 {
        (floor as u64).saturating_mul(self.floor_score_step)
    }

    /// Checks that the rules describe a playable game.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(RulesError::GridTooSmall {
                grid_size: self.grid_size,
            });
        }
        if self.min_tick_interval_ms == 0 || self.initial_tick_interval_ms == 0 {
            return Err(RulesError::ZeroTickInterval);
        }
        if self.starting_lives == 0 || self.starting_lives > self.max_lives {
            return Err(RulesError::InvalidLives {
                starting: self.starting_lives,
                max: self.max_lives,
            });
        }
        if self.min_coins > self.max_coins {
            return Err(RulesError::InvalidCoinRange {
                min: self.min_coins,
                max: self.max_coins,
            });
        }
        if self.floor_score_step == 0 {
            return Err(RulesError::ZeroValue {
                field: "floor_score_step",
            });
        }
        if self.portal_floor_interval == 0 {
            return Err(RulesError::ZeroValue {
                field: "portal_floor_interval",
            });
        }
        if self.enemy_floor_divisor == 0 {
            return Err(RulesError::ZeroValue {
                field: "enemy_floor_divisor",
            });
        }
        if self.enemy_step_period == 0 {
            return Err(RulesError::ZeroValue {
                field: "enemy_step_period",
            });
        }
        if self.enemy_max_length == 0 {
            return Err(RulesError::ZeroValue {
                field: "enemy_max_length",
            });
        }
        Ok(())
    }
}

/// Reasons a set of rules cannot be used.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RulesError {
    /// The grid cannot hold the spawn body.
    #[error("grid size {grid_size} is smaller than the minimum of {}", MIN_GRID_SIZE)]
    GridTooSmall {
        /// Requested grid size.
        grid_size: u32,
    },
    /// A tick interval of zero would spin forever.
    #[error("tick intervals must be positive")]
    ZeroTickInterval,
    /// Starting lives must be positive and within the cap.
    #[error("starting lives {starting} must be between 1 and max lives {max}")]
    InvalidLives {
        /// Requested starting lives.
        starting: u32,
        /// Requested life cap.
        max: u32,
    },
    /// The coin range is inverted.
    #[error("min coins {min} exceeds max coins {max}")]
    InvalidCoinRange {
        /// Requested lower bound.
        min: u32,
        /// Requested upper bound.
        max: u32,
    },
    /// A divisor or period was zero.
    #[error("{field} must be positive")]
    ZeroValue {
        /// Name of the offending field.
        field: &'static str,
    },
}
