//! World state: the shape registry plus the bouncing squares
//!
//! Nothing here touches rendering or input; the frontend reads it after each
//! update and feeds `FrameInput` in.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::shape::{BodyKey, Rect, Shape, ShapeId, Tags};
use super::space::Space;
use crate::cells_to_world;
use crate::error::ConfigError;
use crate::settings::WorldConfig;

/// Macro state of the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldPhase {
    /// Registry and square list are empty
    Uninitialized,
    /// Populated and stepping
    Active,
}

/// A bouncing square. Its position lives on its shape in the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Square {
    pub id: BodyKey,
    pub shape: ShapeId,
    pub vel: Vec2,
    /// Visual bounce intensity (0-1, decays every frame, 1 on impact)
    pub bounce: f32,
}

impl Square {
    fn new(id: BodyKey, shape: ShapeId) -> Self {
        Self {
            id,
            shape,
            vel: Vec2::ZERO,
            bounce: 0.0,
        }
    }
}

/// The simulated arena
pub struct BounceWorld {
    pub(crate) config: WorldConfig,
    seed: u64,
    rng: Pcg32,
    pub(crate) space: Space,
    /// In creation order; this is the update order
    pub(crate) squares: Vec<Square>,
    /// Whether squares currently take part in collisions
    squares_solid: bool,
    phase: WorldPhase,
    pub(crate) frame: u64,
    next_id: BodyKey,
}

impl BounceWorld {
    /// Validate the config and build an empty world. Call [`create`](Self::create) to populate it.
    pub fn new(config: WorldConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            space: Space::new(),
            squares: Vec::new(),
            squares_solid: false,
            phase: WorldPhase::Uninitialized,
            frame: 0,
            next_id: 1,
        })
    }

    /// Populate walls, random obstacles and the first square from the world's seeded RNG
    pub fn create(&mut self) {
        let mut rng = self.rng.clone();
        self.create_with_rng(&mut rng);
        self.rng = rng;
    }

    /// Populate using a caller-provided random source
    pub fn create_with_rng<R: Rng>(&mut self, rng: &mut R) {
        if self.phase == WorldPhase::Active {
            self.destroy();
        }

        let cell = self.config.cell;
        let arena = self.config.arena_size();

        // Walls
        self.space.add(Shape::new(Rect::new(0.0, 0.0, arena.x, cell)));
        self.space.add(Shape::new(Rect::new(0.0, cell, cell, arena.y - cell)));
        self.space
            .add(Shape::new(Rect::new(arena.x - cell, cell, cell, arena.y - cell)));
        self.space.add(Shape::new(Rect::new(
            cell,
            arena.y - cell,
            arena.x - cell * 2.0,
            cell,
        )));

        // Obstacles snap to the grid inside the walls and may overlap anything
        let free_w = self.config.arena_width_cells - 2;
        let free_h = self.config.arena_height_cells - 2;
        let max_side = self.config.obstacle_max_cells;
        for _ in 0..self.config.obstacle_count {
            let x = rng.random_range(0..free_w);
            let y = rng.random_range(0..free_h);
            let w = 1 + rng.random_range(0..max_side);
            let h = 1 + rng.random_range(0..max_side);
            self.space.add(Shape::new(Rect {
                pos: Vec2::splat(cell) + cells_to_world(Vec2::new(x as f32, y as f32), cell),
                size: cells_to_world(Vec2::new(w as f32, h as f32), cell),
            }));
        }

        self.phase = WorldPhase::Active;
        self.frame = 0;
        self.spawn_square();

        // Everything starts solid, the first square included
        self.space.add_tags_all(Tags::SOLID);
        self.squares_solid = true;

        log::info!(
            "World created: seed={}, {} shapes ({} obstacles), {} squares",
            self.seed,
            self.space.len(),
            self.config.obstacle_count,
            self.squares.len()
        );
    }

    /// Drop every shape and square
    pub fn destroy(&mut self) {
        self.squares.clear();
        self.space.clear();
        self.phase = WorldPhase::Uninitialized;
        self.frame = 0;
    }

    /// Rebuild with a fresh layout from `seed`
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.destroy();
        self.create();
        log::info!("World reset with seed {}", seed);
    }

    /// Allocate a new body id
    fn next_body_id(&mut self) -> BodyKey {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a resting square at the spawn point. It joins with the current solidity.
    pub fn spawn_square(&mut self) -> BodyKey {
        let id = self.next_body_id();
        let rect = Rect {
            pos: self.config.spawn_pos,
            size: self.config.body_size(),
        };
        let mut tags = Tags::SQUARE;
        if self.squares_solid {
            tags |= Tags::SOLID;
        }
        let shape = self
            .space
            .add(Shape::new(rect).with_tags(tags).with_owner(id));
        self.squares.push(Square::new(id, shape));
        id
    }

    /// Remove the first square in registry order, shape and all
    pub fn remove_square(&mut self) -> Option<BodyKey> {
        let first = self.space.filter_by_tags(Tags::SQUARE).first()?;
        self.space.remove(first);
        let idx = self.squares.iter().position(|s| s.shape == first)?;
        Some(self.squares.remove(idx).id)
    }

    /// Flip solidity of every square, opposite to the first square's current state
    pub fn toggle_solid(&mut self) {
        let Some(reference) = self.squares.first() else {
            return;
        };
        let was_solid = self.space.has_tags(reference.shape, Tags::SOLID);
        let squares = self.space.filter_by_tags(Tags::SQUARE);
        if was_solid {
            self.space.remove_tags(&squares, Tags::SOLID);
        } else {
            self.space.add_tags(&squares, Tags::SOLID);
        }
        self.squares_solid = !was_solid;
    }

    /// Move a square's shape to `pos`. Returns false if the square is unknown.
    pub fn place_square(&mut self, key: BodyKey, pos: Vec2) -> bool {
        let Some(shape) = self.square_by_key(key).map(|s| s.shape) else {
            return false;
        };
        match self.space.rect_mut(shape) {
            Some(rect) => {
                rect.pos = pos;
                true
            }
            None => false,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> WorldPhase {
        self.phase
    }

    /// Updates since the last create
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn space(&self) -> &Space {
        &self.space
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn square_by_key(&self, key: BodyKey) -> Option<&Square> {
        self.squares.iter().find(|s| s.id == key)
    }

    pub fn square_mut(&mut self, key: BodyKey) -> Option<&mut Square> {
        self.squares.iter_mut().find(|s| s.id == key)
    }

    /// Top-left corner of a square
    pub fn square_pos(&self, square: &Square) -> Option<Vec2> {
        self.space.get(square.shape).map(|s| s.rect.pos)
    }

    pub fn is_solid(&self, square: &Square) -> bool {
        self.space.has_tags(square.shape, Tags::SOLID)
    }
}
