//! Per-tick update engine.

use std::time::Duration;

use rand::seq::SliceRandom;
use snake_floors_core::{
    Absorber, CollisionCause, Event, Food, FoodKind, MagnetReach, PortalId, Position, PowerUp,
    RunId, SessionPhase, TickFault, TimedEffect, SPAWN_LENGTH,
};
use tracing::{debug, warn};

use crate::World;

const SHRINK_SEGMENTS: usize = 2;

struct PortalHop {
    entered: PortalId,
    exited: PortalId,
    destination: Position,
}

impl World {
    /// Processes one `Tick` command.
    pub(crate) fn run_tick(&mut self, run: RunId, dt: Duration, out_events: &mut Vec<Event>) {
        if run != self.run {
            debug!(stale = run.get(), current = self.run.get(), "ignoring stale tick");
            return;
        }
        if !self.phase.is_in_progress() {
            return;
        }

        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });
        for effect in self.effects.expire(self.clock) {
            debug!(?effect, "effect expired");
            out_events.push(Event::EffectExpired { effect });
        }

        if self.phase != SessionPhase::Running {
            return;
        }

        if let Err(fault) = self.advance_snake(out_events) {
            self.halt(fault, out_events);
        }
    }

    fn advance_snake(&mut self, out_events: &mut Vec<Event>) -> Result<(), TickFault> {
        self.direction = self.next_direction;
        let head = self.snake.front().copied().ok_or(TickFault::EmptySnake)?;
        let length_before = self.snake.len();

        let raw = head.step(self.direction);
        let mut next = match self.grid.bounded(raw) {
            Some(cell) => cell,
            None => {
                if self.status.phase_shift_uses > 0 {
                    self.status.phase_shift_uses -= 1;
                    out_events.push(Event::PhaseShiftConsumed {
                        remaining: self.status.phase_shift_uses,
                    });
                }
                self.grid.wrap(raw)
            }
        };

        if let Some(hop) = self.portal_hop(next)? {
            out_events.push(Event::PortalTraversed {
                entered: hop.entered,
                exited: hop.exited,
            });
            next = hop.destination;
        }

        if let Some(cause) = self.collision_at(next) {
            if self.status.shield {
                self.status.shield = false;
                out_events.push(Event::CollisionAbsorbed {
                    cause,
                    absorber: Absorber::Shield,
                });
            } else if self.effects.is_active(TimedEffect::Invincibility) {
                out_events.push(Event::CollisionAbsorbed {
                    cause,
                    absorber: Absorber::Invincibility,
                });
            } else {
                self.handle_death(cause, out_events);
                return Ok(());
            }
        }

        self.snake.push_front(next);
        out_events.push(Event::SnakeAdvanced {
            from: head,
            to: next,
        });

        self.collect_coin(next, out_events);

        match self.food {
            Some(food) if food.position == next => {
                self.eat_food(food.kind, length_before, out_events);
            }
            _ => {
                let _ = self.snake.pop_back();
            }
        }

        self.pull_pickups();
        self.step_enemies();
        Ok(())
    }

    fn portal_hop(&self, cell: Position) -> Result<Option<PortalHop>, TickFault> {
        let Some(entrance) = self.portals.iter().find(|portal| portal.position == cell) else {
            return Ok(None);
        };
        let exit = self
            .portals
            .iter()
            .find(|portal| portal.id == entrance.partner)
            .ok_or(TickFault::MissingPortalPartner {
                portal: entrance.id,
                partner: entrance.partner,
            })?;
        Ok(Some(PortalHop {
            entered: entrance.id,
            exited: exit.id,
            destination: self.grid.wrap(exit.position.step(self.direction)),
        }))
    }

    /// What the head would hit on `cell`; the current head segment is excluded.
    fn collision_at(&self, cell: Position) -> Option<CollisionCause> {
        if self.snake.iter().skip(1).any(|segment| *segment == cell) {
            return Some(CollisionCause::OwnBody);
        }
        if self.obstacles.contains(&cell) {
            return Some(CollisionCause::Obstacle);
        }
        self.enemies
            .iter()
            .find(|enemy| enemy.occupies(cell))
            .map(|enemy| CollisionCause::Enemy { enemy: enemy.id() })
    }

    fn collect_coin(&mut self, cell: Position, out_events: &mut Vec<Event>) {
        let Some(index) = self.coins.iter().position(|coin| coin.position == cell) else {
            return;
        };
        let coin = self.coins.remove(index);
        let awarded = u64::from(coin.value).saturating_mul(self.score_multiplier());
        self.score = self.score.saturating_add(awarded);
        debug!(awarded, score = self.score, "coin collected");
        out_events.push(Event::CoinCollected {
            position: coin.position,
            awarded,
        });
    }

    fn eat_food(&mut self, kind: FoodKind, length_before: usize, out_events: &mut Vec<Event>) {
        let awarded = kind.points().saturating_mul(self.score_multiplier());
        self.score = self.score.saturating_add(awarded);
        debug!(?kind, awarded, score = self.score, "food eaten");
        out_events.push(Event::FoodEaten { kind, awarded });

        match kind {
            FoodKind::Life => {
                if self.lives < self.rules.max_lives {
                    self.lives += 1;
                    out_events.push(Event::LifeGained { lives: self.lives });
                }
            }
            FoodKind::Shrink => {
                if length_before > SPAWN_LENGTH {
                    for _ in 0..SHRINK_SEGMENTS {
                        let _ = self.snake.pop_back();
                    }
                }
            }
            FoodKind::Power => self.trigger_power_up(out_events),
            FoodKind::Normal | FoodKind::Golden => {}
        }

        let extra_growth = self.status.extra_growth as usize;
        self.grow_tail(extra_growth);
        self.spawn_food();

        if self.score >= self.rules.floor_threshold(self.floor) {
            self.advance_floor(out_events);
        }
    }

    fn trigger_power_up(&mut self, out_events: &mut Vec<Event>) {
        let Some(&power_up) = PowerUp::ALL.choose(&mut self.rng) else {
            return;
        };
        debug!(?power_up, "power-up triggered");
        out_events.push(Event::PowerUpTriggered { power_up });
        match power_up.timed_effect() {
            Some((effect, duration)) => self.effects.schedule(effect, self.clock, duration),
            None => self.grow_tail(PowerUp::MEGA_GROW_SEGMENTS),
        }
    }

    /// Appends `segments` copies of the tail.
    fn grow_tail(&mut self, segments: usize) {
        let Some(tail) = self.snake.back().copied() else {
            return;
        };
        self.snake.extend(std::iter::repeat(tail).take(segments));
    }

    /// Moves the food, and with the board-wide magnet every coin, one step toward the head.
    fn pull_pickups(&mut self) {
        let Some(reach) = self.status.magnet else {
            return;
        };
        let Some(head) = self.snake.front().copied() else {
            return;
        };
        let range = match reach {
            MagnetReach::Near => self.rules.magnet_range,
            MagnetReach::Board => self.rules.board_magnet_range,
        };

        if let Some(food) = self.food {
            if let Some(target) = pull_toward(food.position, head, range) {
                if !self.is_occupied(target) {
                    self.food = Some(Food {
                        position: target,
                        kind: food.kind,
                    });
                }
            }
        }

        if reach == MagnetReach::Board {
            for index in 0..self.coins.len() {
                let coin = self.coins[index];
                if let Some(target) = pull_toward(coin.position, head, range) {
                    if !self.is_occupied(target) {
                        self.coins[index].position = target;
                    }
                }
            }
        }
    }

    fn halt(&mut self, fault: TickFault, out_events: &mut Vec<Event>) {
        warn!(%fault, run = self.run.get(), "halting session");
        self.phase = SessionPhase::Halted;
        out_events.push(Event::SessionHalted { fault });
    }
}

/// Cell one step from `item` toward `head` along the axis with the greater gap.
///
/// Ties move along the y axis. Returns `None` when out of range or already there.
fn pull_toward(item: Position, head: Position, range: u32) -> Option<Position> {
    let dx = i64::from(head.x()) - i64::from(item.x());
    let dy = i64::from(head.y()) - i64::from(item.y());
    let range = i64::from(range);
    if (dx == 0 && dy == 0) || dx.abs() > range || dy.abs() > range {
        return None;
    }
    let (x, y) = if dx.abs() > dy.abs() {
        (i64::from(item.x()) + dx.signum(), i64::from(item.y()))
    } else {
        (i64::from(item.x()), i64::from(item.y()) + dy.signum())
    };
    Some(Position::new(u32::try_from(x).ok()?, u32::try_from(y).ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{apply, query, scaffold};
    use snake_floors_core::{AbilityId, Command, Direction, RunSummary};

    const STEP: Duration = Duration::from_millis(80);

    fn running(seed: u64) -> World {
        let mut world = World::seeded(seed);
        let mut events = Vec::new();
        apply(&mut world, Command::Start, &mut events);
        scaffold::clear_board(&mut world);
        world
    }

    fn tick(world: &mut World) -> Vec<Event> {
        let mut events = Vec::new();
        let run = query::run(world);
        apply(world, Command::Tick { run, dt: STEP }, &mut events);
        events
    }

    fn steer(world: &mut World, direction: Direction) {
        apply(world, Command::Steer { direction }, &mut Vec::new());
    }

    #[test]
    fn snake_moves_one_cell_per_tick_without_growing() {
        let mut world = running(61);
        let events = tick(&mut world);
        assert_eq!(
            query::snake(&world),
            vec![
                Position::new(11, 10),
                Position::new(10, 10),
                Position::new(9, 10)
            ]
        );
        assert!(events.contains(&Event::SnakeAdvanced {
            from: Position::new(10, 10),
            to: Position::new(11, 10),
        }));
    }

    #[test]
    fn head_wraps_across_every_edge() {
        let mut world = running(62);
        scaffold::set_snake(&mut world, &[Position::new(19, 4)], Direction::East);
        let _ = tick(&mut world);
        assert_eq!(query::snake(&world)[0], Position::new(0, 4));

        scaffold::set_snake(&mut world, &[Position::new(0, 4)], Direction::West);
        let _ = tick(&mut world);
        assert_eq!(query::snake(&world)[0], Position::new(19, 4));

        scaffold::set_snake(&mut world, &[Position::new(6, 0)], Direction::North);
        let _ = tick(&mut world);
        assert_eq!(query::snake(&world)[0], Position::new(6, 19));

        scaffold::set_snake(&mut world, &[Position::new(6, 19)], Direction::South);
        let _ = tick(&mut world);
        assert_eq!(query::snake(&world)[0], Position::new(6, 0));
    }

    #[test]
    fn reversal_requests_leave_the_buffer_unchanged() {
        let mut world = running(63);
        steer(&mut world, Direction::West);
        let _ = tick(&mut world);
        assert_eq!(query::snake(&world)[0], Position::new(11, 10));

        steer(&mut world, Direction::North);
        steer(&mut world, Direction::West);
        let _ = tick(&mut world);
        assert_eq!(query::snake(&world)[0], Position::new(11, 9));
    }

    #[test]
    fn portals_exit_one_step_past_the_partner() {
        let mut world = running(64);
        let (entrance, exit) =
            scaffold::place_portal_pair(&mut world, Position::new(11, 10), Position::new(3, 3));
        let events = tick(&mut world);
        assert_eq!(query::snake(&world)[0], Position::new(4, 3));
        assert!(events.contains(&Event::PortalTraversed {
            entered: entrance,
            exited: exit,
        }));
    }

    #[test]
    fn portal_exit_wraps_onto_the_grid() {
        let mut world = running(65);
        let _ = scaffold::place_portal_pair(&mut world, Position::new(11, 10), Position::new(19, 7));
        let _ = tick(&mut world);
        assert_eq!(query::snake(&world)[0], Position::new(0, 7));
    }

    #[test]
    fn normal_food_scores_its_points_times_the_multiplier() {
        let mut world = running(66);
        scaffold::place_food(&mut world, Position::new(11, 10), FoodKind::Normal);
        let events = tick(&mut world);
        assert_eq!(query::hud(&world).score, 20);
        assert_eq!(query::hud(&world).length, 4);
        assert!(events.contains(&Event::FoodEaten {
            kind: FoodKind::Normal,
            awarded: 20,
        }));

        let mut tripled = running(67);
        scaffold::grant_ability(&mut tripled, AbilityId::DoublePoints);
        scaffold::place_food(&mut tripled, Position::new(11, 10), FoodKind::Normal);
        let _ = tick(&mut tripled);
        assert_eq!(query::hud(&tripled).score, 60);
    }

    #[test]
    fn score_frenzy_stacks_on_the_permanent_multiplier() {
        let mut world = running(95);
        scaffold::grant_ability(&mut world, AbilityId::DoublePoints);
        world
            .effects
            .schedule(TimedEffect::ScoreFrenzy, world.clock, Duration::from_secs(15));
        scaffold::place_food(&mut world, Position::new(11, 10), FoodKind::Normal);

        let events = tick(&mut world);
        assert!(events.contains(&Event::FoodEaten {
            kind: FoodKind::Normal,
            awarded: 300,
        }));
        assert_eq!(query::hud(&world).score, 300);
    }

    #[test]
    fn floor_advances_on_the_tick_that_crosses_the_threshold() {
        let mut world = running(68);
        scaffold::place_food(&mut world, Position::new(11, 10), FoodKind::Normal);
        let _ = tick(&mut world);
        assert_eq!(query::hud(&world).score, 20);
        assert_eq!(query::hud(&world).floor, 1);
        assert_eq!(query::phase(&world), SessionPhase::Running);

        scaffold::place_food(&mut world, Position::new(12, 10), FoodKind::Golden);
        let events = tick(&mut world);
        assert_eq!(query::hud(&world).score, 120);
        assert_eq!(query::hud(&world).floor, 2);
        assert_eq!(query::phase(&world), SessionPhase::AwaitingUpgrade);
        assert!(events.contains(&Event::FloorAdvanced { floor: 2, lives: 4 }));
        assert_eq!(query::upgrade_offer(&world).len(), 5);
    }

    #[test]
    fn score_below_the_threshold_does_not_advance() {
        let mut world = running(69);
        scaffold::set_score(&mut world, 29);
        scaffold::place_food(&mut world, Position::new(11, 10), FoodKind::Normal);
        let _ = tick(&mut world);
        assert_eq!(query::hud(&world).score, 49);
        assert_eq!(query::hud(&world).floor, 1);

        scaffold::place_food(&mut world, Position::new(12, 10), FoodKind::Normal);
        let _ = tick(&mut world);
        assert_eq!(query::hud(&world).floor, 2);
    }

    #[test]
    fn coins_are_collected_before_food() {
        let mut world = running(70);
        scaffold::place_coin(&mut world, Position::new(11, 10), 10);
        scaffold::place_food(&mut world, Position::new(11, 10), FoodKind::Normal);
        let events = tick(&mut world);
        let coin = events
            .iter()
            .position(|event| matches!(event, Event::CoinCollected { .. }));
        let food = events
            .iter()
            .position(|event| matches!(event, Event::FoodEaten { .. }));
        assert!(coin < food);
        assert_eq!(query::hud(&world).score, 30);
        assert!(query::snapshot(&world).coins.is_empty());
    }

    #[test]
    fn obstacle_collision_costs_one_life_and_respawns() {
        let mut world = running(71);
        scaffold::set_score(&mut world, 40);
        scaffold::place_obstacle(&mut world, Position::new(11, 10));
        let events = tick(&mut world);

        assert!(events.contains(&Event::SnakeDied {
            cause: CollisionCause::Obstacle,
            lives_remaining: 2,
        }));
        let hud = query::hud(&world);
        assert_eq!(hud.lives, 2);
        assert_eq!(hud.score, 40);
        assert_eq!(hud.floor, 1);
        let snapshot = query::snapshot(&world);
        assert_eq!(
            snapshot.snake,
            vec![
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10)
            ]
        );
        assert_eq!(snapshot.direction, Direction::East);
    }

    #[test]
    fn running_into_the_own_body_is_fatal() {
        let mut world = running(72);
        scaffold::set_snake(
            &mut world,
            &[
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(6, 6),
                Position::new(6, 5),
                Position::new(7, 5),
            ],
            Direction::North,
        );
        steer(&mut world, Direction::East);
        let events = tick(&mut world);
        assert!(events.contains(&Event::SnakeDied {
            cause: CollisionCause::OwnBody,
            lives_remaining: 2,
        }));
    }

    #[test]
    fn losing_the_last_life_freezes_the_run() {
        let mut world = running(73);
        scaffold::set_lives(&mut world, 1);
        scaffold::set_score(&mut world, 35);
        scaffold::place_obstacle(&mut world, Position::new(11, 10));
        let events = tick(&mut world);
        assert_eq!(query::phase(&world), SessionPhase::GameOver);
        assert!(events.contains(&Event::GameOver {
            summary: RunSummary {
                floor: 1,
                score: 35,
                abilities_collected: 0,
            }
        }));

        let frozen = query::snapshot(&world);
        for _ in 0..5 {
            assert!(tick(&mut world).is_empty());
        }
        steer(&mut world, Direction::South);
        assert_eq!(query::snapshot(&world), frozen);
    }

    #[test]
    fn shield_absorbs_a_single_collision() {
        let mut world = running(74);
        scaffold::grant_ability(&mut world, AbilityId::Shield);
        scaffold::place_obstacle(&mut world, Position::new(11, 10));
        scaffold::place_obstacle(&mut world, Position::new(12, 10));
        let events = tick(&mut world);
        assert!(events.contains(&Event::CollisionAbsorbed {
            cause: CollisionCause::Obstacle,
            absorber: Absorber::Shield,
        }));
        assert_eq!(query::hud(&world).lives, 3);
        assert_eq!(query::snake(&world)[0], Position::new(11, 10));

        let events = tick(&mut world);
        assert!(events.iter().any(|event| matches!(event, Event::SnakeDied { .. })));
    }

    #[test]
    fn invincibility_absorbs_collisions_until_it_expires() {
        let mut world = running(75);
        world
            .effects
            .schedule(TimedEffect::Invincibility, world.clock, STEP * 2);
        scaffold::place_obstacle(&mut world, Position::new(11, 10));
        scaffold::place_obstacle(&mut world, Position::new(13, 10));
        let events = tick(&mut world);
        assert!(events.contains(&Event::CollisionAbsorbed {
            cause: CollisionCause::Obstacle,
            absorber: Absorber::Invincibility,
        }));
        let events = tick(&mut world);
        assert!(events.contains(&Event::EffectExpired {
            effect: TimedEffect::Invincibility
        }));
        let events = tick(&mut world);
        assert!(events.iter().any(|event| matches!(event, Event::SnakeDied { .. })));
    }

    #[test]
    fn enemy_segments_are_lethal() {
        let mut world = running(76);
        let enemy = scaffold::place_enemy(&mut world, Position::new(11, 10));
        let events = tick(&mut world);
        assert!(events.contains(&Event::SnakeDied {
            cause: CollisionCause::Enemy { enemy },
            lives_remaining: 2,
        }));
    }

    #[test]
    fn shrink_is_ignored_at_spawn_length() {
        let mut world = running(77);
        scaffold::place_food(&mut world, Position::new(11, 10), FoodKind::Shrink);
        let _ = tick(&mut world);
        assert_eq!(query::hud(&world).length, 4);
        assert_eq!(query::hud(&world).score, 30);
    }

    #[test]
    fn shrink_trims_two_segments_from_longer_snakes() {
        let mut world = running(78);
        scaffold::set_snake(
            &mut world,
            &[
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10),
                Position::new(7, 10),
                Position::new(6, 10),
            ],
            Direction::East,
        );
        scaffold::place_food(&mut world, Position::new(11, 10), FoodKind::Shrink);
        let _ = tick(&mut world);
        assert_eq!(query::hud(&world).length, 4);
    }

    #[test]
    fn life_food_is_capped() {
        let mut world = running(79);
        scaffold::place_food(&mut world, Position::new(11, 10), FoodKind::Life);
        let events = tick(&mut world);
        assert!(events.contains(&Event::LifeGained { lives: 4 }));

        scaffold::set_lives(&mut world, 5);
        scaffold::place_food(&mut world, Position::new(12, 10), FoodKind::Life);
        let events = tick(&mut world);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::LifeGained { .. })));
        assert_eq!(query::hud(&world).lives, 5);
    }

    #[test]
    fn power_food_triggers_exactly_one_power_up() {
        let mut world = running(80);
        scaffold::place_food(&mut world, Position::new(11, 10), FoodKind::Power);
        let events = tick(&mut world);
        let triggered: Vec<PowerUp> = events
            .iter()
            .filter_map(|event| match event {
                Event::PowerUpTriggered { power_up } => Some(*power_up),
                _ => None,
            })
            .collect();
        assert_eq!(triggered.len(), 1);
        let expected_length = match triggered[0] {
            PowerUp::MegaGrow => 4 + PowerUp::MEGA_GROW_SEGMENTS,
            _ => 4,
        };
        assert_eq!(query::hud(&world).length, expected_length);
    }

    #[test]
    fn extra_growth_appends_copies_of_the_tail() {
        let mut world = running(81);
        scaffold::grant_ability(&mut world, AbilityId::ExplosiveGrowth);
        scaffold::place_food(&mut world, Position::new(11, 10), FoodKind::Normal);
        let _ = tick(&mut world);
        let snake = query::snake(&world);
        assert_eq!(snake.len(), 4 + 5);
        assert!(snake[3..].iter().all(|segment| *segment == Position::new(8, 10)));
    }

    #[test]
    fn phase_shift_uses_run_out_then_plain_wrapping_continues() {
        let mut world = running(82);
        scaffold::grant_ability(&mut world, AbilityId::PhaseShift);
        let mut remaining = Vec::new();
        for _ in 0..4 {
            scaffold::set_snake(&mut world, &[Position::new(19, 2)], Direction::East);
            let events = tick(&mut world);
            assert_eq!(query::snake(&world)[0], Position::new(0, 2));
            remaining.extend(events.iter().filter_map(|event| match event {
                Event::PhaseShiftConsumed { remaining } => Some(*remaining),
                _ => None,
            }));
        }
        assert_eq!(remaining, vec![2, 1, 0]);
        assert_eq!(query::phase_shift_uses(&world), 0);
        assert_eq!(query::phase(&world), SessionPhase::Running);
    }

    #[test]
    fn magnet_pulls_food_along_the_wider_gap() {
        let mut world = running(83);
        scaffold::grant_ability(&mut world, AbilityId::Magnet);
        scaffold::place_food(&mut world, Position::new(15, 12), FoodKind::Normal);
        let _ = tick(&mut world);
        assert_eq!(
            query::snapshot(&world).food.map(|food| food.position),
            Some(Position::new(14, 12))
        );
    }

    #[test]
    fn magnet_reach_ends_at_five_cells() {
        let mut world = running(96);
        scaffold::grant_ability(&mut world, AbilityId::Magnet);
        scaffold::place_food(&mut world, Position::new(16, 10), FoodKind::Normal);
        let _ = tick(&mut world);
        assert_eq!(
            query::snapshot(&world).food.map(|food| food.position),
            Some(Position::new(15, 10))
        );

        let mut world = running(97);
        scaffold::grant_ability(&mut world, AbilityId::Magnet);
        scaffold::place_food(&mut world, Position::new(17, 10), FoodKind::Normal);
        let _ = tick(&mut world);
        assert_eq!(
            query::snapshot(&world).food.map(|food| food.position),
            Some(Position::new(17, 10))
        );

        let head = Position::new(5, 5);
        assert_eq!(
            pull_toward(Position::new(10, 5), head, 5),
            Some(Position::new(9, 5))
        );
        assert_eq!(pull_toward(Position::new(11, 5), head, 5), None);
    }

    #[test]
    fn pull_toward_breaks_ties_on_the_y_axis() {
        let head = Position::new(5, 5);
        assert_eq!(
            pull_toward(Position::new(7, 7), head, 5),
            Some(Position::new(7, 6))
        );
        assert_eq!(pull_toward(Position::new(5, 5), head, 5), None);
        assert_eq!(pull_toward(Position::new(12, 5), head, 5), None);
    }

    #[test]
    fn board_magnet_pulls_coins_too() {
        let mut world = running(84);
        scaffold::grant_ability(&mut world, AbilityId::MegaMagnet);
        assert_eq!(world.status.magnet, Some(MagnetReach::Board));
        scaffold::place_coin(&mut world, Position::new(11, 18), 10);
        let _ = tick(&mut world);
        assert_eq!(
            query::snapshot(&world).coins[0].position,
            Position::new(11, 17)
        );
    }

    #[test]
    fn effects_keep_expiring_while_awaiting_an_upgrade() {
        let mut world = running(85);
        world
            .effects
            .schedule(TimedEffect::Haste, world.clock, STEP * 2);
        world.phase = SessionPhase::AwaitingUpgrade;
        let head = query::snake(&world)[0];
        let _ = tick(&mut world);
        let events = tick(&mut world);
        assert!(events.contains(&Event::EffectExpired {
            effect: TimedEffect::Haste
        }));
        assert_eq!(query::snake(&world)[0], head);
        assert_eq!(query::clock(&world), STEP * 2);
    }

    #[test]
    fn haste_halves_the_effective_interval() {
        let mut world = running(86);
        world
            .effects
            .schedule(TimedEffect::Haste, world.clock, Duration::from_secs(8));
        assert_eq!(query::tick_interval(&world), Duration::from_millis(40));
    }

    #[test]
    fn dangling_portal_links_halt_the_session() {
        let mut world = running(87);
        let (_, exit) =
            scaffold::place_portal_pair(&mut world, Position::new(11, 10), Position::new(3, 3));
        scaffold::unlink_portal(&mut world, exit);
        let events = tick(&mut world);
        assert_eq!(query::phase(&world), SessionPhase::Halted);
        assert!(events.iter().any(|event| matches!(
            event,
            Event::SessionHalted {
                fault: TickFault::MissingPortalPartner { .. }
            }
        )));
        assert!(tick(&mut world).is_empty());
    }

    #[test]
    fn empty_body_halts_the_session() {
        let mut world = running(88);
        scaffold::set_snake(&mut world, &[], Direction::East);
        let events = tick(&mut world);
        assert!(events.contains(&Event::SessionHalted {
            fault: TickFault::EmptySnake
        }));

        let mut events = Vec::new();
        apply(&mut world, Command::Start, &mut events);
        assert_eq!(query::phase(&world), SessionPhase::Running);
    }

    #[test]
    fn length_changes_by_at_most_one_on_plain_ticks() {
        let mut world = World::seeded(89);
        apply(&mut world, Command::Start, &mut Vec::new());
        let mut previous = query::hud(&world).length;
        for step in 0..400 {
            let direction = Direction::ALL[(step / 7) % 4];
            steer(&mut world, direction);
            let events = tick(&mut world);
            if query::phase(&world) != SessionPhase::Running {
                break;
            }
            let length = query::hud(&world).length;
            let special = events.iter().any(|event| {
                matches!(
                    event,
                    Event::SnakeDied { .. }
                        | Event::FoodEaten {
                            kind: FoodKind::Shrink | FoodKind::Power,
                            ..
                        }
                )
            });
            if !special {
                assert!(length.abs_diff(previous) <= 1, "step {step}");
            }
            previous = length;
        }
    }
}
