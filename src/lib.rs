//! Bounce Arena - a bounce stress test for a tagged collision space
//!
//! Core modules:
//! - `sim`: Deterministic simulation (shape registry, per-axis resolution, world update)
//! - `render`: Draw-list extraction for whatever frontend paints the arena
//! - `settings`: World configuration constants
//! - `error`: Configuration errors

pub mod error;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::WorldConfig;
pub use sim::{BounceWorld, FrameInput};

use glam::Vec2;

/// Reference layout constants
pub mod consts {
    /// World grid unit (pixels). Also the maximum per-frame speed.
    pub const CELL: f32 = 4.0;

    /// Arena dimensions in grid cells (640x480 at the default cell size)
    pub const ARENA_WIDTH_CELLS: u32 = 160;
    pub const ARENA_HEIGHT_CELLS: u32 = 120;

    /// Randomized static obstacles
    pub const OBSTACLE_COUNT: usize = 20;
    /// Largest obstacle side, in cells
    pub const OBSTACLE_MAX_CELLS: u32 = 16;

    /// Added to vertical velocity every frame
    pub const GRAVITY: f32 = 0.25;
    /// Bounce intensity multiplier per frame
    pub const BOUNCE_DECAY: f32 = 0.9;
    /// Weakest upward speed after a floor bounce
    pub const MIN_REBOUND: f32 = 5.0;

    /// Where new squares appear (top-left corner, pixels)
    pub const SPAWN_X: f32 = 40.0;
    pub const SPAWN_Y: f32 = 40.0;
    /// Square side, in cells
    pub const BODY_CELLS: u32 = 4;
}

/// Convert a grid coordinate to world units
#[inline]
pub fn cells_to_world(cells: Vec2, cell: f32) -> Vec2 {
    cells * cell
}

/// Clamp both components of a velocity into `[-max, max]`
#[inline]
pub fn clamp_velocity(vel: Vec2, max: f32) -> Vec2 {
    vel.clamp(Vec2::splat(-max), Vec2::splat(max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_velocity() {
        let v = clamp_velocity(Vec2::new(10.0, -7.5), 4.0);
        assert_eq!(v, Vec2::new(4.0, -4.0));

        let v = clamp_velocity(Vec2::new(1.5, -0.5), 4.0);
        assert_eq!(v, Vec2::new(1.5, -0.5));
    }

    #[test]
    fn test_cells_to_world() {
        assert_eq!(cells_to_world(Vec2::new(3.0, 2.0), 4.0), Vec2::new(12.0, 8.0));
    }
}
