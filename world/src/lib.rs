#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Snake Floors.
//!
//! The [`World`] owns every entity of a run. Adapters and systems mutate it
//! exclusively through [`apply`] and observe it through the [`query`] module.

mod abilities;
mod effects;
mod enemies;
mod engine;
mod food;
mod level;
mod occupancy;
mod session;

#[cfg(any(test, feature = "scenario_scaffolding"))]
pub mod scaffold;

use std::{collections::VecDeque, time::Duration};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_floors_core::{
    AbilityId, Coin, Command, Direction, Event, Food, Grid, PortalId, Position, Rules, RulesError,
    RunId, SessionPhase, WELCOME_BANNER,
};

use self::{
    abilities::{AbilityLedger, Status},
    effects::EffectLedger,
    enemies::EnemySnake,
};

/// Represents the authoritative Snake Floors session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    rules: Rules,
    grid: Grid,
    rng: ChaCha8Rng,
    run: RunId,
    phase: SessionPhase,
    clock: Duration,
    snake: VecDeque<Position>,
    direction: Direction,
    next_direction: Direction,
    food: Option<Food>,
    coins: Vec<Coin>,
    obstacles: Vec<Position>,
    portals: Vec<Portal>,
    next_portal_id: u32,
    enemies: Vec<EnemySnake>,
    next_enemy_id: u32,
    score: u64,
    floor: u32,
    lives: u32,
    base_tick_interval: Duration,
    base_multiplier: u64,
    abilities: AbilityLedger,
    status: Status,
    effects: EffectLedger,
    upgrade_offer: Vec<AbilityId>,
}

impl World {
    /// Creates a world that plays by `rules`, drawing randomness from `seed`.
    pub fn new(rules: Rules, seed: u64) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self::build(rules, seed))
    }

    /// Creates a world that plays by the default rules.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::build(Rules::default(), seed)
    }

    fn build(rules: Rules, seed: u64) -> Self {
        let grid = Grid::new(rules.grid_size);
        let base_tick_interval = rules.initial_tick_interval();
        let lives = rules.starting_lives;
        Self {
            banner: WELCOME_BANNER,
            grid,
            rng: ChaCha8Rng::seed_from_u64(seed),
            run: RunId::new(0),
            phase: SessionPhase::NotStarted,
            clock: Duration::ZERO,
            snake: VecDeque::new(),
            direction: Direction::East,
            next_direction: Direction::East,
            food: None,
            coins: Vec::new(),
            obstacles: Vec::new(),
            portals: Vec::new(),
            next_portal_id: 0,
            enemies: Vec::new(),
            next_enemy_id: 0,
            score: 0,
            floor: 1,
            lives,
            base_tick_interval,
            base_multiplier: 1,
            abilities: AbilityLedger::default(),
            status: Status::default(),
            effects: EffectLedger::default(),
            upgrade_offer: Vec::new(),
            rules,
        }
    }

    fn score_multiplier(&self) -> u64 {
        self.effects.scale_multiplier(self.base_multiplier)
    }

    fn tick_interval(&self) -> Duration {
        self.effects
            .scale_interval(self.base_tick_interval)
            .max(MIN_EFFECTIVE_INTERVAL)
    }
}

const MIN_EFFECTIVE_INTERVAL: Duration = Duration::from_millis(1);

/// One end of a linked portal pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Portal {
    id: PortalId,
    position: Position,
    partner: PortalId,
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start => {
            if !world.phase.is_in_progress() {
                world.start_run(out_events);
            }
        }
        Command::Restart => world.start_run(out_events),
        Command::Tick { run, dt } => world.run_tick(run, dt, out_events),
        Command::Steer { direction } => world.steer(direction),
        Command::ActivateSpecial => world.activate_special(out_events),
        Command::SelectUpgrade { ability } => world.select_upgrade(ability, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use snake_floors_core::{
        AbilityId, EnemySnapshot, Hud, PortalSnapshot, Position, RunId, RunSummary, SessionPhase,
        SessionSnapshot, TimedEffect, VisualFlags,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current phase of the session state machine.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world.phase
    }

    /// Generation of the current run; `Tick` commands must carry it.
    #[must_use]
    pub fn run(world: &World) -> RunId {
        world.run
    }

    /// Effective interval until the next tick is due.
    ///
    /// Drivers must read this after every tick, since ticks change it.
    #[must_use]
    pub fn tick_interval(world: &World) -> Duration {
        world.tick_interval()
    }

    /// Effective score multiplier.
    #[must_use]
    pub fn score_multiplier(world: &World) -> u64 {
        world.score_multiplier()
    }

    /// Snake segments, head first.
    #[must_use]
    pub fn snake(world: &World) -> Vec<Position> {
        world.snake.iter().copied().collect()
    }

    /// Heads-up display values.
    #[must_use]
    pub fn hud(world: &World) -> Hud {
        Hud {
            score: world.score,
            floor: world.floor,
            length: world.snake.len(),
            lives: world.lives,
        }
    }

    /// Abilities currently offered for selection.
    #[must_use]
    pub fn upgrade_offer(world: &World) -> &[AbilityId] {
        &world.upgrade_offer
    }

    /// Abilities held, in acquisition order.
    #[must_use]
    pub fn held_abilities(world: &World) -> Vec<AbilityId> {
        world.abilities.ids().collect()
    }

    /// Phase shift charges left.
    #[must_use]
    pub fn phase_shift_uses(world: &World) -> u32 {
        world.status.phase_shift_uses
    }

    /// Simulated time elapsed in the current run.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Reports whether the cell holds a snake segment, obstacle, portal, coin or the food.
    #[must_use]
    pub fn is_occupied(world: &World, position: Position) -> bool {
        world.is_occupied(position)
    }

    /// Statistics of the run so far.
    #[must_use]
    pub fn summary(world: &World) -> RunSummary {
        RunSummary {
            floor: world.floor,
            score: world.score,
            abilities_collected: world.abilities.len(),
        }
    }

    /// Captures everything a renderer needs to draw the current state.
    #[must_use]
    pub fn snapshot(world: &World) -> SessionSnapshot {
        let mut enemies: Vec<EnemySnapshot> =
            world.enemies.iter().map(|enemy| enemy.snapshot()).collect();
        enemies.sort_by_key(|enemy| enemy.id);

        let mut portals: Vec<PortalSnapshot> = world
            .portals
            .iter()
            .map(|portal| PortalSnapshot {
                id: portal.id,
                position: portal.position,
                partner: portal.partner,
            })
            .collect();
        portals.sort_by_key(|portal| portal.id);

        SessionSnapshot {
            run: world.run,
            phase: world.phase,
            grid_size: world.grid.size(),
            snake: snake(world),
            direction: world.direction,
            enemies,
            obstacles: world.obstacles.clone(),
            portals,
            coins: world.coins.clone(),
            food: world.food,
            flags: VisualFlags {
                shield: world.status.shield,
                invincible: world.effects.is_active(TimedEffect::Invincibility),
                magnet: world.status.magnet.is_some(),
                enemies_frozen: world.effects.is_active(TimedEffect::Freeze),
                vampire: world.status.vampire,
                multi_shot: world.status.multi_shot,
            },
            hud: hud(world),
            abilities: world.ability_snapshots(),
            upgrade_offer: world.upgrade_offer.clone(),
            tick_interval: world.tick_interval(),
        }
    }
}
