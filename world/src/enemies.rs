//! Autonomous enemy snakes.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use snake_floors_core::{Direction, EnemyId, EnemySnapshot, Position, TimedEffect};

use crate::World;

/// Enemy snake roaming the board at a slower cadence than the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnemySnake {
    id: EnemyId,
    body: VecDeque<Position>,
    direction: Direction,
    step_counter: u32,
}

impl EnemySnake {
    fn new(id: EnemyId, position: Position) -> Self {
        Self {
            id,
            body: VecDeque::from([position]),
            direction: Direction::East,
            step_counter: 0,
        }
    }

    pub(crate) fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            body: self.body.iter().copied().collect(),
            direction: self.direction,
        }
    }
}

impl World {
    /// Adds a single-segment enemy on a random free cell.
    pub(crate) fn spawn_enemy(&mut self) -> bool {
        let Some(position) = self.random_free_cell() else {
            return false;
        };
        let _ = self.spawn_enemy_at(position);
        true
    }

    /// Adds a single-segment enemy on `position`.
    pub(crate) fn spawn_enemy_at(&mut self, position: Position) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        self.enemies.push(EnemySnake::new(id, position));
        id
    }

    /// Advances every enemy's cadence counter and moves those whose turn it is.
    pub(crate) fn step_enemies(&mut self) {
        if self.effects.is_active(TimedEffect::Freeze) {
            return;
        }

        let Self {
            enemies,
            rng,
            grid,
            obstacles,
            rules,
            ..
        } = self;

        for enemy in enemies.iter_mut() {
            enemy.step_counter = enemy.step_counter.saturating_add(1);
            if enemy.step_counter < rules.enemy_step_period {
                continue;
            }
            enemy.step_counter = 0;

            let Some(head) = enemy.body.front().copied() else {
                continue;
            };
            let options: Vec<(Direction, Position)> = Direction::ALL
                .into_iter()
                .filter_map(|direction| {
                    grid.bounded(head.step(direction))
                        .filter(|cell| !obstacles.contains(cell))
                        .map(|cell| (direction, cell))
                })
                .collect();
            let Some(&(direction, next)) = options.choose(&mut *rng) else {
                continue;
            };

            enemy.direction = direction;
            enemy.body.push_front(next);
            enemy.body.truncate(rules.enemy_max_length);
        }
    }
}
