#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snake Floors adapters.

use std::{fmt::Write as _, io::Write};

use anyhow::{Context, Result as AnyResult};
use snake_floors_core::{
    AbilityId, AbilitySnapshot, FoodKind, Grid, Hud, Position, SessionPhase, SessionSnapshot,
    VisualFlags,
};
use thiserror::Error;

/// Visual content of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// Nothing occupies the cell.
    Empty,
    /// Head of the player snake.
    SnakeHead,
    /// Any other player snake segment.
    SnakeBody,
    /// Segment of an enemy snake.
    Enemy,
    /// Static obstacle.
    Obstacle,
    /// One end of a portal pair.
    Portal,
    /// Collectible coin.
    Coin,
    /// The active food.
    Food(FoodKind),
}

impl Glyph {
    /// Character used by text backends.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::SnakeHead => '@',
            Self::SnakeBody => 'o',
            Self::Enemy => 'x',
            Self::Obstacle => '#',
            Self::Portal => 'O',
            Self::Coin => '$',
            Self::Food(FoodKind::Normal) => '*',
            Self::Food(FoodKind::Golden) => 'G',
            Self::Food(FoodKind::Power) => 'P',
            Self::Food(FoodKind::Life) => '+',
            Self::Food(FoodKind::Shrink) => '-',
        }
    }
}

/// Scene description combining the board glyphs with the heads-up display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    size: u32,
    cells: Vec<Glyph>,
    /// Score, floor, length and lives.
    pub hud: Hud,
    /// Phase of the session state machine.
    pub phase: SessionPhase,
    /// Transient visual flags.
    pub flags: VisualFlags,
    /// Abilities held, in acquisition order.
    pub abilities: Vec<AbilitySnapshot>,
    /// Abilities offered for selection.
    pub upgrade_offer: Vec<AbilityId>,
}

impl Scene {
    /// Lays out every entity of the snapshot on a glyph board.
    ///
    /// Later layers cover earlier ones: obstacles, portals, coins, food,
    /// enemies, the snake body and finally the snake head.
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Result<Self, RenderingError> {
        let size = snapshot.grid_size;
        if size == 0 {
            return Err(RenderingError::EmptyGrid);
        }
        let mut scene = Self {
            size,
            cells: vec![Glyph::Empty; Grid::new(size).cell_count()],
            hud: snapshot.hud,
            phase: snapshot.phase,
            flags: snapshot.flags,
            abilities: snapshot.abilities.clone(),
            upgrade_offer: snapshot.upgrade_offer.clone(),
        };

        for obstacle in &snapshot.obstacles {
            scene.paint(*obstacle, Glyph::Obstacle)?;
        }
        for portal in &snapshot.portals {
            scene.paint(portal.position, Glyph::Portal)?;
        }
        for coin in &snapshot.coins {
            scene.paint(coin.position, Glyph::Coin)?;
        }
        if let Some(food) = snapshot.food {
            scene.paint(food.position, Glyph::Food(food.kind))?;
        }
        for enemy in &snapshot.enemies {
            for segment in &enemy.body {
                scene.paint(*segment, Glyph::Enemy)?;
            }
        }
        for segment in snapshot.snake.iter().skip(1) {
            scene.paint(*segment, Glyph::SnakeBody)?;
        }
        if let Some(head) = snapshot.head() {
            scene.paint(head, Glyph::SnakeHead)?;
        }
        Ok(scene)
    }

    /// Cells along each edge of the board.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Glyph drawn on the cell, or `None` outside the board.
    #[must_use]
    pub fn glyph(&self, position: Position) -> Option<Glyph> {
        self.index(position).map(|index| self.cells[index])
    }

    /// Board rows rendered as text, top row first.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        let width = self.size as usize;
        self.cells
            .chunks(width)
            .map(|row| row.iter().map(|glyph| glyph.symbol()).collect())
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.x() >= self.size || position.y() >= self.size {
            return None;
        }
        usize::try_from(u64::from(position.y()) * u64::from(self.size) + u64::from(position.x()))
            .ok()
    }

    fn paint(&mut self, position: Position, glyph: Glyph) -> Result<(), RenderingError> {
        let index = self
            .index(position)
            .ok_or(RenderingError::OutOfBounds { position })?;
        self.cells[index] = glyph;
        Ok(())
    }
}

/// Rendering backend capable of presenting Snake Floors scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Backend that writes scenes as plain text.
#[derive(Debug)]
pub struct TextBackend<W> {
    writer: W,
    frames: u64,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend that writes frames to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer, frames: 0 }
    }

    /// Number of frames presented so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        let border = "-".repeat(scene.size() as usize);
        let mut frame = String::new();
        writeln!(frame, "+{border}+")?;
        for row in scene.rows() {
            writeln!(frame, "|{row}|")?;
        }
        writeln!(frame, "+{border}+")?;
        writeln!(
            frame,
            "score {} | floor {} | length {} | lives {} | {:?}",
            scene.hud.score, scene.hud.floor, scene.hud.length, scene.hud.lives, scene.phase
        )?;

        let flags = active_flags(&scene.flags);
        if !flags.is_empty() {
            writeln!(frame, "active: {}", flags.join(", "))?;
        }
        if !scene.abilities.is_empty() {
            let held: Vec<&str> = scene
                .abilities
                .iter()
                .map(|ability| ability.id.name())
                .collect();
            writeln!(frame, "abilities: {}", held.join(", "))?;
        }
        for (slot, ability) in scene.upgrade_offer.iter().enumerate() {
            writeln!(
                frame,
                "  [{}] {} ({:?}): {}",
                slot + 1,
                ability.name(),
                ability.rarity(),
                ability.description()
            )?;
        }

        self.writer
            .write_all(frame.as_bytes())
            .context("failed to write frame")?;
        self.writer.flush().context("failed to flush frame")?;
        self.frames += 1;
        Ok(())
    }
}

fn active_flags(flags: &VisualFlags) -> Vec<&'static str> {
    [
        (flags.shield, "shield"),
        (flags.invincible, "invincible"),
        (flags.magnet, "magnet"),
        (flags.enemies_frozen, "frozen enemies"),
        (flags.vampire, "vampire"),
        (flags.multi_shot, "multi shot"),
    ]
    .into_iter()
    .filter_map(|(active, label)| active.then_some(label))
    .collect()
}

/// Errors that can occur when building a scene.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// The snapshot describes a board without cells.
    #[error("cannot render an empty grid")]
    EmptyGrid,
    /// An entity sits outside the board.
    #[error("entity at ({}, {}) lies outside the grid", .position.x(), .position.y())]
    OutOfBounds {
        /// Offending position.
        position: Position,
    },
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use snake_floors_core::{Direction, Food, RunId};

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            run: RunId::new(1),
            phase: SessionPhase::Running,
            grid_size: 4,
            snake: vec![Position::new(2, 1), Position::new(1, 1)],
            direction: Direction::East,
            enemies: Vec::new(),
            obstacles: vec![Position::new(0, 3)],
            portals: Vec::new(),
            coins: Vec::new(),
            food: Some(Food {
                position: Position::new(3, 3),
                kind: FoodKind::Golden,
            }),
            flags: VisualFlags::default(),
            hud: Hud {
                score: 120,
                floor: 2,
                length: 2,
                lives: 4,
            },
            abilities: Vec::new(),
            upgrade_offer: Vec::new(),
            tick_interval: Duration::from_millis(70),
        }
    }

    #[test]
    fn scene_layers_entities() {
        let scene = Scene::from_snapshot(&snapshot()).expect("valid snapshot");
        let rows: Vec<String> = scene.rows().collect();
        assert_eq!(rows, vec!["....", ".o@.", "....", "#..G"]);
        assert_eq!(scene.glyph(Position::new(2, 1)), Some(Glyph::SnakeHead));
        assert_eq!(scene.glyph(Position::new(4, 0)), None);
    }

    #[test]
    fn head_covers_the_food_it_sits_on() {
        let mut snapshot = snapshot();
        snapshot.food = Some(Food {
            position: Position::new(2, 1),
            kind: FoodKind::Normal,
        });
        let scene = Scene::from_snapshot(&snapshot).expect("valid snapshot");
        assert_eq!(scene.glyph(Position::new(2, 1)), Some(Glyph::SnakeHead));
    }

    #[test]
    fn empty_grids_are_rejected() {
        let mut snapshot = snapshot();
        snapshot.grid_size = 0;
        assert_eq!(
            Scene::from_snapshot(&snapshot),
            Err(RenderingError::EmptyGrid)
        );
    }

    #[test]
    fn off_board_entities_are_rejected() {
        let mut snapshot = snapshot();
        snapshot.obstacles.push(Position::new(9, 0));
        assert_eq!(
            Scene::from_snapshot(&snapshot),
            Err(RenderingError::OutOfBounds {
                position: Position::new(9, 0)
            })
        );
    }

    #[test]
    fn text_backend_writes_board_and_hud() {
        let mut snapshot = snapshot();
        snapshot.flags.shield = true;
        snapshot.upgrade_offer = vec![AbilityId::Magnet];
        let scene = Scene::from_snapshot(&snapshot).expect("valid snapshot");

        let mut backend = TextBackend::new(Vec::new());
        backend.present(&scene).expect("write to memory");
        assert_eq!(backend.frames(), 1);

        let output = String::from_utf8(backend.into_inner()).expect("utf-8 output");
        assert!(output.starts_with("+----+\n|....|\n|.o@.|\n"));
        assert!(output.contains("score 120 | floor 2 | length 2 | lives 4 | Running"));
        assert!(output.contains("active: shield"));
        assert!(output.contains("[1] Magnet (Epic): Pull nearby food toward you"));
    }
}
