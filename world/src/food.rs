//! Weighted food spawning.

use rand::Rng;
use snake_floors_core::{Food, FoodKind, Position};
use tracing::warn;

use crate::World;

const ROLL_RANGE: u32 = 100;

impl World {
    /// Replaces the active food with a freshly rolled one on a free cell.
    pub(crate) fn spawn_food(&mut self) {
        self.food = None;
        let kind = food_kind_for_roll(self.rng.gen_range(0..ROLL_RANGE));
        let position = match self.random_free_cell() {
            Some(position) => position,
            None => {
                let fallback = self.fallback_food_cell();
                warn!(?fallback, "no free cell left for food, forcing placement");
                fallback
            }
        };
        self.food = Some(Food { position, kind });
    }

    fn fallback_food_cell(&self) -> Position {
        let corner = self.grid.size().saturating_mul(3) / 4;
        Position::new(corner, corner)
    }
}

/// Maps a roll in `0..100` onto the cumulative spawn table.
fn food_kind_for_roll(roll: u32) -> FoodKind {
    let mut threshold = 0;
    for kind in FoodKind::ALL {
        threshold += kind.spawn_weight();
        if roll < threshold {
            return kind;
        }
    }
    FoodKind::Normal
}
