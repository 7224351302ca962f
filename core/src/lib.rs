#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Floors engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing player intents and lifecycle requests, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing everything that happened. Systems consume event streams, read
//! immutable [`SessionSnapshot`] values, and respond exclusively with new
//! command batches.

mod abilities;
mod rules;
mod snapshot;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use abilities::{AbilityEffect, AbilityId, MagnetReach, Rarity, SpeedFactor};
pub use rules::{Rules, RulesError, MIN_GRID_SIZE, SPAWN_LENGTH};
pub use snapshot::{
    AbilitySnapshot, EnemySnapshot, Hud, PortalSnapshot, SessionSnapshot, VisualFlags,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Snake Floors.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Begins a new run from scratch when no run is in progress.
    Start,
    /// Reinitializes every piece of session state and begins a new run.
    Restart,
    /// Advances the simulation by a single engine tick.
    Tick {
        /// Run the tick was scheduled for; ticks from older runs are ignored.
        run: RunId,
        /// Simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Buffers the direction the snake should take on the next tick.
    Steer {
        /// Requested heading.
        direction: Direction,
    },
    /// Activates the first held cooldown ability that is ready.
    ActivateSpecial,
    /// Picks one of the abilities offered after a floor advance.
    SelectUpgrade {
        /// Ability chosen by the player.
        ability: AbilityId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a fresh run began.
    RunStarted {
        /// Generation assigned to the run.
        run: RunId,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the snake head moved to a new cell.
    SnakeAdvanced {
        /// Cell the head occupied before the move.
        from: Position,
        /// Cell the head occupies after the move.
        to: Position,
    },
    /// Reports that an out-of-bounds move spent a phase shift charge.
    PhaseShiftConsumed {
        /// Charges left after this move.
        remaining: u32,
    },
    /// Reports that the head travelled through a portal.
    PortalTraversed {
        /// Portal the head entered.
        entered: PortalId,
        /// Portal the head left through.
        exited: PortalId,
    },
    /// Reports a collision that did not cost a life.
    CollisionAbsorbed {
        /// What the head ran into.
        cause: CollisionCause,
        /// What prevented the death.
        absorber: Absorber,
    },
    /// Reports a fatal collision.
    SnakeDied {
        /// What the head ran into.
        cause: CollisionCause,
        /// Lives left after the death was recorded.
        lives_remaining: u32,
    },
    /// Announces that the last life was lost.
    GameOver {
        /// Final statistics of the run.
        summary: RunSummary,
    },
    /// Confirms that a coin was collected.
    CoinCollected {
        /// Cell that held the coin.
        position: Position,
        /// Points added to the score.
        awarded: u64,
    },
    /// Confirms that the food was eaten.
    FoodEaten {
        /// Category of the eaten food.
        kind: FoodKind,
        /// Points added to the score.
        awarded: u64,
    },
    /// Reports that a life was restored.
    LifeGained {
        /// Lives held after the gain.
        lives: u32,
    },
    /// Reports that a POWER food triggered a transient power-up.
    PowerUpTriggered {
        /// Power-up that was rolled.
        power_up: PowerUp,
    },
    /// Reports that a timed effect ran out.
    EffectExpired {
        /// Effect that ended.
        effect: TimedEffect,
    },
    /// Announces that the session moved to the next floor.
    FloorAdvanced {
        /// Floor that is now active.
        floor: u32,
        /// Lives held after the floor bonus.
        lives: u32,
    },
    /// Presents the abilities the player may choose from.
    UpgradeOffered {
        /// Candidate abilities in presentation order.
        choices: Vec<AbilityId>,
    },
    /// Reports that an upgrade selection was rejected.
    UpgradeRejected {
        /// Ability named in the request.
        ability: AbilityId,
        /// Specific reason the selection failed.
        reason: UpgradeError,
    },
    /// Confirms that an ability joined the held set.
    AbilityAcquired {
        /// Ability that was acquired.
        ability: AbilityId,
    },
    /// Confirms that a cooldown ability was triggered by the player.
    AbilityActivated {
        /// Ability that fired.
        ability: AbilityId,
        /// Time until the ability may fire again.
        cooldown: Duration,
    },
    /// Reports that the engine hit an unrecoverable fault and stopped the run.
    SessionHalted {
        /// Fault reported by the engine.
        fault: TickFault,
    },
}

/// Phases of the session state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No run has been started yet.
    NotStarted,
    /// Ticks move the snake.
    Running,
    /// Movement is suspended until the player picks an upgrade.
    AwaitingUpgrade,
    /// The last life was lost.
    GameOver,
    /// The engine faulted and the run was stopped.
    Halted,
}

impl SessionPhase {
    /// Reports whether a run is live, paused or not.
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::Running | Self::AwaitingUpgrade)
    }
}

/// Cardinal movement directions. Rows grow downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices, `(0, -1)`.
    North,
    /// Movement toward increasing column indices, `(1, 0)`.
    East,
    /// Movement toward increasing row indices, `(0, 1)`.
    South,
    /// Movement toward decreasing column indices, `(-1, 0)`.
    West,
}

impl Direction {
    /// Every direction in the order enemies evaluate them.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Unit vector of the direction as `(dx, dy)`.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Location of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Cell one step away in `direction`, before any boundary handling.
    #[must_use]
    pub const fn step(self, direction: Direction) -> RawCell {
        let (dx, dy) = direction.delta();
        RawCell {
            x: self.x as i64 + dx,
            y: self.y as i64 + dy,
        }
    }
}

/// Cell coordinate that may lie outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawCell {
    /// Signed column index.
    pub x: i64,
    /// Signed row index.
    pub y: i64,
}

/// Square toroidal playfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    size: u32,
}

impl Grid {
    /// Creates a grid with `size` cells along each edge.
    #[must_use]
    pub const fn new(size: u32) -> Self {
        Self { size }
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.size) * u64::from(self.size);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether the raw cell lies on the grid.
    #[must_use]
    pub fn contains(&self, cell: RawCell) -> bool {
        let size = i64::from(self.size);
        (0..size).contains(&cell.x) && (0..size).contains(&cell.y)
    }

    /// Converts an on-grid raw cell into a position.
    #[must_use]
    pub fn bounded(&self, cell: RawCell) -> Option<Position> {
        if !self.contains(cell) {
            return None;
        }
        let x = u32::try_from(cell.x).ok()?;
        let y = u32::try_from(cell.y).ok()?;
        Some(Position::new(x, y))
    }

    /// Folds a raw cell back onto the grid; leaving one edge enters the opposite one.
    ///
    /// A zero-sized grid maps every cell to the origin.
    #[must_use]
    pub fn wrap(&self, cell: RawCell) -> Position {
        if self.size == 0 {
            return Position::new(0, 0);
        }
        let size = i64::from(self.size);
        let x = cell.x.rem_euclid(size);
        let y = cell.y.rem_euclid(size);
        Position::new(
            u32::try_from(x).unwrap_or_default(),
            u32::try_from(y).unwrap_or_default(),
        )
    }

    /// Shortest distance between two cells when travel may wrap around edges.
    #[must_use]
    pub fn toroidal_distance(&self, from: Position, to: Position) -> u32 {
        let axis = |a: u32, b: u32| {
            let direct = a.abs_diff(b);
            direct.min(self.size.saturating_sub(direct))
        };
        axis(from.x(), to.x()) + axis(from.y(), to.y())
    }
}

/// Food categories and their scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    /// Ordinary food.
    Normal,
    /// High-value food.
    Golden,
    /// Food that triggers a random transient power-up.
    Power,
    /// Food that restores a life.
    Life,
    /// Food that trims the tail.
    Shrink,
}

impl FoodKind {
    /// Every category in spawn-table order.
    pub const ALL: [FoodKind; 5] = [
        Self::Normal,
        Self::Golden,
        Self::Power,
        Self::Life,
        Self::Shrink,
    ];

    /// Points awarded before the score multiplier is applied.
    #[must_use]
    pub const fn points(self) -> u64 {
        match self {
            Self::Normal => 20,
            Self::Golden => 100,
            Self::Power => 60,
            Self::Life => 40,
            Self::Shrink => 30,
        }
    }

    /// Share of spawns out of 100.
    #[must_use]
    pub const fn spawn_weight(self) -> u32 {
        match self {
            Self::Normal => 70,
            Self::Golden | Self::Power => 10,
            Self::Life | Self::Shrink => 5,
        }
    }
}

/// The single active food item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Food {
    /// Cell holding the food.
    pub position: Position,
    /// Category of the food.
    pub kind: FoodKind,
}

/// A collectible coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coin {
    /// Cell holding the coin.
    pub position: Position,
    /// Points awarded before the score multiplier is applied.
    pub value: u32,
}

/// Transient power-ups rolled when POWER food is eaten.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUp {
    /// Halves the tick interval for eight seconds.
    Haste,
    /// Doubles the tick interval for eight seconds.
    Slow,
    /// Grants invincibility for ten seconds.
    Invincibility,
    /// Multiplies scoring by five for fifteen seconds.
    ScoreFrenzy,
    /// Appends ten segments at once.
    MegaGrow,
}

impl PowerUp {
    /// Every power-up; rolls are uniform over this table.
    pub const ALL: [PowerUp; 5] = [
        Self::Haste,
        Self::Slow,
        Self::Invincibility,
        Self::ScoreFrenzy,
        Self::MegaGrow,
    ];

    /// Segments appended by [`PowerUp::MegaGrow`].
    pub const MEGA_GROW_SEGMENTS: usize = 10;

    /// Timed effect installed by the power-up and how long it lasts.
    #[must_use]
    pub const fn timed_effect(self) -> Option<(TimedEffect, Duration)> {
        match self {
            Self::Haste => Some((TimedEffect::Haste, Duration::from_secs(8))),
            Self::Slow => Some((TimedEffect::Slow, Duration::from_secs(8))),
            Self::Invincibility => Some((TimedEffect::Invincibility, Duration::from_secs(10))),
            Self::ScoreFrenzy => Some((TimedEffect::ScoreFrenzy, Duration::from_secs(15))),
            Self::MegaGrow => None,
        }
    }
}

/// Effects that expire after a fixed span of simulated time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimedEffect {
    /// Tick interval halved.
    Haste,
    /// Tick interval doubled.
    Slow,
    /// Collisions do not kill.
    Invincibility,
    /// Score multiplier times five.
    ScoreFrenzy,
    /// Enemy snakes do not move.
    Freeze,
}

/// What the snake head ran into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollisionCause {
    /// One of the snake's own segments.
    OwnBody,
    /// A static obstacle.
    Obstacle,
    /// A segment of an enemy snake.
    Enemy {
        /// Enemy that was hit.
        enemy: EnemyId,
    },
}

/// Protection that turned a collision into a non-event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Absorber {
    /// The shield was spent.
    Shield,
    /// Invincibility was active.
    Invincibility,
}

/// Final statistics presented when a run ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunSummary {
    /// Floor reached.
    pub floor: u32,
    /// Final score.
    pub score: u64,
    /// Number of abilities held.
    pub abilities_collected: usize,
}

/// Generation counter distinguishing successive runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(u32);

impl RunId {
    /// Creates a new run identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier of the run that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Unique identifier assigned to a portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortalId(u32);

impl PortalId {
    /// Creates a new portal identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Reasons an upgrade selection may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No floor advance is waiting for a pick.
    #[error("no upgrade selection is pending")]
    NotAwaitingUpgrade,
    /// The named ability is not part of the current offer.
    #[error("ability was not part of the current offer")]
    NotOffered,
}

/// Unrecoverable faults detected while running a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum TickFault {
    /// The snake had no segments left to move.
    #[error("snake body is empty")]
    EmptySnake,
    /// A portal referenced a partner that does not exist.
    #[error("portal {} references missing partner {}", .portal.get(), .partner.get())]
    MissingPortalPartner {
        /// Portal holding the dangling link.
        portal: PortalId,
        /// Partner named by the link.
        partner: PortalId,
    },
}
