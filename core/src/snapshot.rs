//! Read-only views handed to renderers, UIs and systems.

use std::time::Duration;

use crate::{AbilityId, Coin, Direction, EnemyId, Food, PortalId, Position, RunId, SessionPhase};

/// Plain values a heads-up display shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Hud {
    /// Current score.
    pub score: u64,
    /// Current floor.
    pub floor: u32,
    /// Number of snake segments.
    pub length: usize,
    /// Lives left.
    pub lives: u32,
}

/// Transient flags a renderer may visualise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VisualFlags {
    /// A shield is raised.
    pub shield: bool,
    /// Collisions are currently harmless.
    pub invincible: bool,
    /// Magnet attraction is on.
    pub magnet: bool,
    /// Enemy snakes are frozen.
    pub enemies_frozen: bool,
    /// Vampire ability is held.
    pub vampire: bool,
    /// Multi-shot ability is held.
    pub multi_shot: bool,
}

/// Immutable representation of an enemy snake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Body segments, head first.
    pub body: Vec<Position>,
    /// Heading chosen on the enemy's last move.
    pub direction: Direction,
}

/// Immutable representation of a portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortalSnapshot {
    /// Identifier of the portal.
    pub id: PortalId,
    /// Cell holding the portal.
    pub position: Position,
    /// Portal the head exits through.
    pub partner: PortalId,
}

/// Immutable representation of a held ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbilitySnapshot {
    /// Catalog identity.
    pub id: AbilityId,
    /// Charges left, for uses-limited abilities.
    pub uses_remaining: Option<u32>,
    /// Time until the ability can fire again, for cooldown abilities.
    pub cooldown_remaining: Option<Duration>,
}

impl AbilitySnapshot {
    /// Reports whether a cooldown ability can be activated right now.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining == Some(Duration::ZERO)
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Generation of the current run.
    pub run: RunId,
    /// Phase of the session state machine.
    pub phase: SessionPhase,
    /// Cells along each edge of the grid.
    pub grid_size: u32,
    /// Player snake, head first.
    pub snake: Vec<Position>,
    /// Heading of the player snake.
    pub direction: Direction,
    /// Enemy snakes ordered by identifier.
    pub enemies: Vec<EnemySnapshot>,
    /// Static obstacles.
    pub obstacles: Vec<Position>,
    /// Portals ordered by identifier.
    pub portals: Vec<PortalSnapshot>,
    /// Coins on the board.
    pub coins: Vec<Coin>,
    /// The active food, absent before the first run starts.
    pub food: Option<Food>,
    /// Transient visual flags.
    pub flags: VisualFlags,
    /// Heads-up display values.
    pub hud: Hud,
    /// Abilities held, in acquisition order.
    pub abilities: Vec<AbilitySnapshot>,
    /// Abilities offered for selection; empty unless awaiting an upgrade.
    pub upgrade_offer: Vec<AbilityId>,
    /// Current effective tick interval.
    pub tick_interval: Duration,
}

impl SessionSnapshot {
    /// Head of the player snake.
    #[must_use]
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}
