//! Helpers for arranging exact board situations in tests.
//!
//! None of these functions emit events; they rewrite state directly so a
//! scenario can start from a known board.

use snake_floors_core::{AbilityId, Coin, Direction, EnemyId, Food, FoodKind, PortalId, Position};

use crate::World;

/// Removes food, coins, obstacles, portals and enemies.
pub fn clear_board(world: &mut World) {
    world.food = None;
    world.coins.clear();
    world.obstacles.clear();
    world.portals.clear();
    world.enemies.clear();
}

/// Replaces the snake body (head first) and its heading.
pub fn set_snake(world: &mut World, body: &[Position], direction: Direction) {
    world.snake = body.iter().copied().collect();
    world.direction = direction;
    world.next_direction = direction;
}

/// Replaces the active food.
pub fn place_food(world: &mut World, position: Position, kind: FoodKind) {
    world.food = Some(Food { position, kind });
}

/// Adds an obstacle.
pub fn place_obstacle(world: &mut World, position: Position) {
    world.obstacles.push(position);
}

/// Adds a coin worth `value` points.
pub fn place_coin(world: &mut World, position: Position, value: u32) {
    world.coins.push(Coin { position, value });
}

/// Links a portal pair on the provided cells.
pub fn place_portal_pair(
    world: &mut World,
    entrance: Position,
    exit: Position,
) -> (PortalId, PortalId) {
    world.place_portal_pair_at(entrance, exit)
}

/// Removes a portal while leaving its partner's link dangling.
pub fn unlink_portal(world: &mut World, portal: PortalId) {
    world.portals.retain(|candidate| candidate.id != portal);
}

/// Adds a single-segment enemy.
pub fn place_enemy(world: &mut World, position: Position) -> EnemyId {
    world.spawn_enemy_at(position)
}

/// Acquires an ability as if it had been picked from an offer.
pub fn grant_ability(world: &mut World, ability: AbilityId) {
    world.acquire_ability(ability, &mut Vec::new());
}

/// Overrides the score.
pub fn set_score(world: &mut World, score: u64) {
    world.score = score;
}

/// Overrides the life count.
pub fn set_lives(world: &mut World, lives: u32) {
    world.lives = lives;
}
