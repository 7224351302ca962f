//! Cell occupancy queries used when placing new entities.

use rand::Rng;
use snake_floors_core::Position;

use crate::World;

impl World {
    /// Reports whether any snake segment, obstacle, portal, coin or the food sits on the cell.
    pub(crate) fn is_occupied(&self, position: Position) -> bool {
        self.snake.contains(&position)
            || self.obstacles.contains(&position)
            || self.portals.iter().any(|portal| portal.position == position)
            || self.coins.iter().any(|coin| coin.position == position)
            || self.food.is_some_and(|food| food.position == position)
    }

    /// Draws random cells until a free one turns up or the attempt budget runs out.
    pub(crate) fn random_free_cell(&mut self) -> Option<Position> {
        self.random_free_cell_except(&[])
    }

    /// Like [`World::random_free_cell`], additionally treating `reserved` cells as taken.
    pub(crate) fn random_free_cell_except(&mut self, reserved: &[Position]) -> Option<Position> {
        let size = self.grid.size();
        if size == 0 {
            return None;
        }
        for _ in 0..self.rules.placement_attempts {
            let candidate = Position::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size));
            if !reserved.contains(&candidate) && !self.is_occupied(candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::World;
    use snake_floors_core::{Coin, Food, FoodKind, Position};

    #[test]
    fn every_entity_set_counts_as_occupied() {
        let mut world = World::seeded(11);
        world.snake.push_back(Position::new(1, 1));
        world.obstacles.push(Position::new(2, 2));
        world.coins.push(Coin {
            position: Position::new(3, 3),
            value: 10,
        });
        world.food = Some(Food {
            position: Position::new(4, 4),
            kind: FoodKind::Normal,
        });
        let _ = world.place_portal_pair_at(Position::new(5, 5), Position::new(6, 6));

        for cell in 1..=6 {
            assert!(world.is_occupied(Position::new(cell, cell)), "cell {cell}");
        }
        assert!(!world.is_occupied(Position::new(7, 7)));
    }

    #[test]
    fn random_free_cell_avoids_occupied_cells() {
        let mut world = World::seeded(12);
        for x in 0..world.grid.size() {
            for y in 0..world.grid.size() {
                if (x, y) != (7, 9) {
                    world.obstacles.push(Position::new(x, y));
                }
            }
        }
        world.rules.placement_attempts = 10_000;
        assert_eq!(world.random_free_cell(), Some(Position::new(7, 9)));
    }

    #[test]
    fn full_board_exhausts_the_attempt_budget() {
        let mut world = World::seeded(13);
        for x in 0..world.grid.size() {
            for y in 0..world.grid.size() {
                world.obstacles.push(Position::new(x, y));
            }
        }
        assert_eq!(world.random_free_cell(), None);
    }
}
