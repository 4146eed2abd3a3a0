//! World configuration
//!
//! Fixed at world creation; the simulation never re-reads it mid-run.
//! Stored as JSON so a frontend can keep a tweaked layout around.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Grid unit size in pixels. Also the per-axis speed cap.
    pub cell: f32,
    /// Arena width in cells (walls included)
    pub arena_width_cells: u32,
    /// Arena height in cells (walls included)
    pub arena_height_cells: u32,

    // === Layout ===
    /// Number of randomized static obstacles
    pub obstacle_count: usize,
    /// Largest obstacle side, in cells
    pub obstacle_max_cells: u32,

    // === Motion ===
    /// Vertical velocity added every frame
    pub gravity: f32,
    /// Bounce intensity multiplier per frame (0 < decay < 1)
    pub bounce_decay: f32,
    /// Weakest upward speed after a vertical bounce
    pub min_rebound: f32,

    // === Squares ===
    /// Spawn point (top-left corner, pixels)
    pub spawn_pos: Vec2,
    /// Square side, in cells
    pub body_cells: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cell: CELL,
            arena_width_cells: ARENA_WIDTH_CELLS,
            arena_height_cells: ARENA_HEIGHT_CELLS,

            obstacle_count: OBSTACLE_COUNT,
            obstacle_max_cells: OBSTACLE_MAX_CELLS,

            gravity: GRAVITY,
            bounce_decay: BOUNCE_DECAY,
            min_rebound: MIN_REBOUND,

            spawn_pos: Vec2::new(SPAWN_X, SPAWN_Y),
            body_cells: BODY_CELLS,
        }
    }
}

impl WorldConfig {
    /// Maximum speed along either axis
    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.cell
    }

    /// Arena size in pixels
    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(
            self.arena_width_cells as f32,
            self.arena_height_cells as f32,
        ) * self.cell
    }

    /// Square size in pixels
    pub fn body_size(&self) -> Vec2 {
        Vec2::splat(self.body_cells as f32 * self.cell)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("cell", self.cell),
            ("gravity", self.gravity),
            ("bounce_decay", self.bounce_decay),
            ("min_rebound", self.min_rebound),
            ("spawn_pos.x", self.spawn_pos.x),
            ("spawn_pos.y", self.spawn_pos.y),
        ];
        if let Some((field, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite { field: *field });
        }

        if self.cell <= 0.0 {
            return Err(ConfigError::InvalidCell { cell: self.cell });
        }
        if self.arena_width_cells < 3 || self.arena_height_cells < 3 {
            return Err(ConfigError::ArenaTooSmall {
                width: self.arena_width_cells,
                height: self.arena_height_cells,
            });
        }
        if self.bounce_decay <= 0.0 || self.bounce_decay >= 1.0 {
            return Err(ConfigError::InvalidDecay {
                decay: self.bounce_decay,
            });
        }
        if self.min_rebound < 0.0 {
            return Err(ConfigError::NegativeRebound {
                min_rebound: self.min_rebound,
            });
        }
        if self.obstacle_max_cells == 0 {
            return Err(ConfigError::EmptyObstacleSize);
        }
        if self.body_cells == 0 {
            return Err(ConfigError::EmptyBody);
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file, falling back to defaults if it is missing or bad
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(config) => {
                log::info!("Loaded world config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default world config ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("World config saved to {}", path.as_ref().display());
        Ok(())
    }
}
