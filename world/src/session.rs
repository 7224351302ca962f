//! Run lifecycle: starting, dying, floor transitions and upgrade selection.

use std::time::Duration;

use rand::seq::SliceRandom;
use snake_floors_core::{
    AbilityId, CollisionCause, Direction, Event, Position, SessionPhase, UpgradeError, SPAWN_LENGTH,
};
use tracing::{debug, info};

use crate::{abilities::Status, query, World};

impl World {
    /// Reinitialises every piece of session state and begins a new run.
    pub(crate) fn start_run(&mut self, out_events: &mut Vec<Event>) {
        self.run = self.run.next();
        self.phase = SessionPhase::Running;
        self.clock = Duration::ZERO;
        self.score = 0;
        self.floor = 1;
        self.lives = self.rules.starting_lives;
        self.base_tick_interval = self.rules.initial_tick_interval();
        self.base_multiplier = 1;
        self.abilities.clear();
        self.status = Status::default();
        self.effects.clear();
        self.upgrade_offer.clear();
        self.food = None;

        self.reset_snake();
        self.generate_level();
        self.spawn_food();

        info!(run = self.run.get(), "run started");
        out_events.push(Event::RunStarted { run: self.run });
    }

    /// Places the spawn body in the middle of the grid, facing east.
    pub(crate) fn reset_snake(&mut self) {
        let centre = self.grid.size() / 2;
        self.snake.clear();
        for offset in 0..SPAWN_LENGTH as u32 {
            self.snake
                .push_back(Position::new(centre.saturating_sub(offset), centre));
        }
        self.direction = Direction::East;
        self.next_direction = Direction::East;
    }

    /// Records a fatal collision, ending the run on the last life.
    pub(crate) fn handle_death(&mut self, cause: CollisionCause, out_events: &mut Vec<Event>) {
        self.lives = self.lives.saturating_sub(1);
        debug!(?cause, lives = self.lives, "snake died");
        out_events.push(Event::SnakeDied {
            cause,
            lives_remaining: self.lives,
        });

        if self.lives == 0 {
            self.phase = SessionPhase::GameOver;
            let summary = query::summary(self);
            info!(
                floor = summary.floor,
                score = summary.score,
                abilities = summary.abilities_collected,
                "game over"
            );
            out_events.push(Event::GameOver { summary });
        } else {
            self.reset_snake();
        }
    }

    /// Moves to the next floor and offers upgrades when any remain.
    pub(crate) fn advance_floor(&mut self, out_events: &mut Vec<Event>) {
        self.floor = self.floor.saturating_add(1);
        self.base_tick_interval = self.rules.min_tick_interval().max(
            self.base_tick_interval
                .saturating_sub(self.rules.floor_speedup()),
        );
        self.lives = self.lives.saturating_add(1).min(self.rules.max_lives);
        self.generate_level();

        info!(floor = self.floor, lives = self.lives, "floor advanced");
        out_events.push(Event::FloorAdvanced {
            floor: self.floor,
            lives: self.lives,
        });

        self.offer_upgrades(out_events);
    }

    fn offer_upgrades(&mut self, out_events: &mut Vec<Event>) {
        let mut candidates: Vec<AbilityId> = AbilityId::ALL
            .into_iter()
            .filter(|ability| !self.abilities.holds(*ability))
            .collect();
        let count = self.rules.upgrade_choices.min(candidates.len());
        if count == 0 {
            return;
        }

        let (choices, _) = candidates.partial_shuffle(&mut self.rng, count);
        self.upgrade_offer = choices.to_vec();
        self.phase = SessionPhase::AwaitingUpgrade;
        out_events.push(Event::UpgradeOffered {
            choices: self.upgrade_offer.clone(),
        });
    }

    /// Resolves a pending upgrade offer with the player's pick.
    pub(crate) fn select_upgrade(&mut self, ability: AbilityId, out_events: &mut Vec<Event>) {
        let rejection = if self.phase != SessionPhase::AwaitingUpgrade {
            Some(UpgradeError::NotAwaitingUpgrade)
        } else if !self.upgrade_offer.contains(&ability) {
            Some(UpgradeError::NotOffered)
        } else {
            None
        };
        if let Some(reason) = rejection {
            debug!(?ability, %reason, "upgrade rejected");
            out_events.push(Event::UpgradeRejected { ability, reason });
            return;
        }

        self.upgrade_offer.clear();
        self.phase = SessionPhase::Running;
        self.acquire_ability(ability, out_events);
    }

    /// Buffers a heading for the next tick; reversals are ignored.
    pub(crate) fn steer(&mut self, direction: Direction) {
        if self.phase != SessionPhase::Running || direction == self.direction.opposite() {
            return;
        }
        self.next_direction = direction;
    }
}
