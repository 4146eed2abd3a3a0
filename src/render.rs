//! Draw-list extraction
//!
//! Turns world state into plain coloured outlines and help text. Painting them
//! is up to the frontend.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{BounceWorld, Tags};

/// Outline colour for walls and obstacles
pub const STATIC_COLOR: [u8; 4] = [200, 200, 200, 255];
/// Square brightness at rest
const DIM: u8 = 60;

/// One rectangle outline to draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawRect {
    pub pos: Vec2,
    pub size: Vec2,
    /// RGBA
    pub color: [u8; 4],
}

/// Square colour: brightens with bounce intensity, blue-tinted when solid
pub fn square_color(bounce: f32, solid: bool) -> [u8; 4] {
    let t = bounce.clamp(0.0, 1.0);
    let g = DIM + ((255 - DIM) as f32 * t) as u8;
    if solid { [DIM, g, 255, 255] } else { [g, g, g, 255] }
}

/// Everything in the registry, in draw (insertion) order
pub fn draw_list(world: &BounceWorld) -> Vec<DrawRect> {
    world
        .space()
        .iter()
        .map(|(_, shape)| {
            let square = shape
                .has_tags(Tags::SQUARE)
                .then_some(shape.owner)
                .flatten()
                .and_then(|key| world.square_by_key(key));
            let color = match square {
                Some(sq) => square_color(sq.bounce, shape.has_tags(Tags::SOLID)),
                None => STATIC_COLOR,
            };
            DrawRect {
                pos: shape.rect.pos,
                size: shape.rect.size,
                color,
            }
        })
        .collect()
}

/// On-screen help
pub fn help_lines(world: &BounceWorld) -> Vec<String> {
    vec![
        "-Bounce stress test-".to_string(),
        "Press Up to spawn squares.".to_string(),
        "Press Down to remove squares.".to_string(),
        "Press 'S' to toggle solidity between the squares.".to_string(),
        "Press 'R' to restart with a new layout.".to_string(),
        format!("{} squares in the world", world.squares().len()),
    ]
}
