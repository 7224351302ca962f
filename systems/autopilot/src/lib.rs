#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure steering system that plays Snake Floors from snapshots.
//!
//! The autopilot chases the food along the shortest toroidal route while
//! refusing moves that run straight into a body, obstacle or enemy. It also
//! resolves upgrade offers and fires cooldown abilities when an enemy closes in.

use snake_floors_core::{
    AbilityId, Command, Direction, Grid, Position, SessionPhase, SessionSnapshot,
};

const DANGER_RADIUS: u32 = 3;

/// Stateless system that turns snapshots into player intents.
#[derive(Clone, Copy, Debug, Default)]
pub struct Autopilot;

impl Autopilot {
    /// Reads the snapshot and emits the commands a player would issue.
    pub fn handle(&self, snapshot: &SessionSnapshot, out: &mut Vec<Command>) {
        match snapshot.phase {
            SessionPhase::AwaitingUpgrade => {
                if let Some(ability) = preferred_upgrade(&snapshot.upgrade_offer) {
                    out.push(Command::SelectUpgrade { ability });
                }
            }
            SessionPhase::Running => {
                if let Some(direction) = choose_direction(snapshot) {
                    if direction != snapshot.direction {
                        out.push(Command::Steer { direction });
                    }
                }
                if enemy_nearby(snapshot) && snapshot.abilities.iter().any(|a| a.is_ready()) {
                    out.push(Command::ActivateSpecial);
                }
            }
            SessionPhase::NotStarted | SessionPhase::GameOver | SessionPhase::Halted => {}
        }
    }
}

/// Highest rarity wins; earlier catalog entries break ties.
fn preferred_upgrade(offer: &[AbilityId]) -> Option<AbilityId> {
    offer
        .iter()
        .copied()
        .max_by(|left, right| {
            left.rarity()
                .cmp(&right.rarity())
                .then_with(|| right.cmp(left))
        })
}

fn choose_direction(snapshot: &SessionSnapshot) -> Option<Direction> {
    let head = snapshot.head()?;
    let grid = Grid::new(snapshot.grid_size);
    let target = snapshot.food.map(|food| food.position);

    Direction::ALL
        .into_iter()
        .filter(|direction| *direction != snapshot.direction.opposite())
        .map(|direction| (direction, grid.wrap(head.step(direction))))
        .filter(|(_, cell)| !is_blocked(snapshot, *cell))
        .min_by_key(|(_, cell)| target.map_or(0, |food| grid.toroidal_distance(*cell, food)))
        .map(|(direction, _)| direction)
}

fn is_blocked(snapshot: &SessionSnapshot, cell: Position) -> bool {
    snapshot.snake.iter().skip(1).any(|segment| *segment == cell)
        || snapshot.obstacles.contains(&cell)
        || snapshot
            .enemies
            .iter()
            .any(|enemy| enemy.body.contains(&cell))
}

fn enemy_nearby(snapshot: &SessionSnapshot) -> bool {
    let Some(head) = snapshot.head() else {
        return false;
    };
    let grid = Grid::new(snapshot.grid_size);
    snapshot
        .enemies
        .iter()
        .filter_map(|enemy| enemy.body.first())
        .any(|enemy_head| grid.toroidal_distance(head, *enemy_head) <= DANGER_RADIUS)
}
