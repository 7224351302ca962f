//! Procedural floor layout: obstacles, portals, enemies and coins.

use rand::Rng;
use snake_floors_core::{Coin, PortalId, Position};
use tracing::{debug, warn};

use crate::{Portal, World};

impl World {
    /// Clears and repopulates every per-floor entity set. The food stays where it is.
    pub(crate) fn generate_level(&mut self) {
        self.obstacles.clear();
        self.portals.clear();
        self.enemies.clear();
        self.coins.clear();

        let floor = self.floor;
        let obstacle_count = floor
            .saturating_mul(self.rules.obstacles_per_floor)
            .min(self.rules.max_obstacles);
        for _ in 0..obstacle_count {
            match self.random_free_cell() {
                Some(cell) => self.obstacles.push(cell),
                None => warn!(floor, "no free cell left for an obstacle"),
            }
        }

        if floor % self.rules.portal_floor_interval == 0 || self.status.portal_master {
            let _ = self.place_portal_pair();
        }

        if floor > self.rules.enemy_min_floor {
            let enemy_count = (floor / self.rules.enemy_floor_divisor).min(self.rules.max_enemies);
            for _ in 0..enemy_count {
                if !self.spawn_enemy() {
                    warn!(floor, "no free cell left for an enemy");
                }
            }
        }

        let coin_count = self
            .rng
            .gen_range(self.rules.min_coins..=self.rules.max_coins);
        let value = floor.saturating_mul(self.rules.coin_value_per_floor);
        for _ in 0..coin_count {
            match self.random_free_cell() {
                Some(position) => self.coins.push(Coin { position, value }),
                None => warn!(floor, "no free cell left for a coin"),
            }
        }

        debug!(
            floor,
            obstacles = self.obstacles.len(),
            portals = self.portals.len(),
            enemies = self.enemies.len(),
            coins = self.coins.len(),
            "generated level"
        );
    }

    /// Places a linked portal pair on two random free cells.
    ///
    /// Returns `false` and leaves the board untouched when either cell cannot be found.
    pub(crate) fn place_portal_pair(&mut self) -> bool {
        let Some(entrance) = self.random_free_cell() else {
            debug!("abandoned portal pair placement");
            return false;
        };
        let Some(exit) = self.random_free_cell_except(&[entrance]) else {
            debug!("abandoned portal pair placement");
            return false;
        };
        let _ = self.place_portal_pair_at(entrance, exit);
        true
    }

    /// Links two portals on the provided cells, returning their identifiers.
    pub(crate) fn place_portal_pair_at(
        &mut self,
        entrance: Position,
        exit: Position,
    ) -> (PortalId, PortalId) {
        let first = PortalId::new(self.next_portal_id);
        let second = PortalId::new(self.next_portal_id.wrapping_add(1));
        self.next_portal_id = self.next_portal_id.wrapping_add(2);
        self.portals.push(Portal {
            id: first,
            position: entrance,
            partner: second,
        });
        self.portals.push(Portal {
            id: second,
            position: exit,
            partner: first,
        });
        (first, second)
    }
}
