//! Per-frame world update
//!
//! Numeric pass over every square first, population changes second. The two
//! never interleave, so a square spawned or removed this frame is never half
//! stepped.

use serde::{Deserialize, Serialize};

use super::resolve::{AxisResolution, resolve};
use super::shape::{Axis, Tags};
use super::space::{ShapeView, Space};
use super::state::{BounceWorld, Square, WorldPhase};
use crate::clamp_velocity;

/// Input signals for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Add a square (level-triggered: fires every frame while held)
    pub spawn: bool,
    /// Remove the oldest square (level-triggered)
    pub remove: bool,
    /// Flip square solidity (edge-triggered: the frontend sends it once per press)
    pub toggle_solid: bool,
}

/// Motion constants copied out of the config for one frame
#[derive(Clone, Copy)]
struct Motion {
    gravity: f32,
    decay: f32,
    max_speed: f32,
    min_rebound: f32,
}

/// Advance the world by one frame
pub fn tick(world: &mut BounceWorld, input: &FrameInput) {
    if world.phase() != WorldPhase::Active {
        return;
    }
    world.frame += 1;

    let motion = Motion {
        gravity: world.config.gravity,
        decay: world.config.bounce_decay,
        max_speed: world.config.max_speed(),
        min_rebound: world.config.min_rebound,
    };

    // Membership is fixed for the frame; positions are read live, so a square
    // sees the ones before it at their new positions and the ones after it at
    // their old ones.
    let solids = world.space.filter_by_tags(Tags::SOLID);
    let BounceWorld { space, squares, .. } = &mut *world;
    for square in squares.iter_mut() {
        step_square(space, square, &solids, motion);
    }

    apply_population(world, input);
}

impl BounceWorld {
    /// Advance by one frame (see [`tick`])
    pub fn update(&mut self, input: &FrameInput) {
        tick(self, input);
    }
}

fn step_square(space: &mut Space, square: &mut Square, solids: &ShapeView, motion: Motion) {
    square.vel.y += motion.gravity;
    square.bounce *= motion.decay;
    square.vel = clamp_velocity(square.vel, motion.max_speed);

    step_axis(space, square, Axis::Horizontal, solids);

    let res = step_axis(space, square, Axis::Vertical, solids);
    // Guarantee a visible hop even after a soft landing
    if res.is_contact() && square.vel.y < 0.0 && square.vel.y > -motion.min_rebound {
        square.vel.y = -motion.min_rebound;
    }
}

/// Move along one axis: snap and bounce on a trusted contact, otherwise move the full step
fn step_axis(space: &mut Space, square: &mut Square, axis: Axis, solids: &ShapeView) -> AxisResolution {
    let speed = axis.of(square.vel);
    let res = resolve(space, square.shape, speed, axis, solids);

    let Some(rect) = space.rect_mut(square.shape) else {
        return res;
    };
    if res.is_contact() {
        rect.pos += axis.vec(res.delta);
        axis.set(&mut square.vel, -speed);
        square.bounce = 1.0;
    } else {
        if res.teleporting {
            log::debug!(
                "Square {} teleport guard on {:?} axis (step {}, contact {})",
                square.id,
                axis,
                speed,
                res.delta
            );
        }
        rect.pos += axis.vec(speed);
    }
    res
}

fn apply_population(world: &mut BounceWorld, input: &FrameInput) {
    if input.spawn {
        world.spawn_square();
        log::info!("{} squares in the world now", world.squares().len());
    }

    if input.remove && world.remove_square().is_some() {
        log::info!("{} squares in the world now", world.squares().len());
    }

    if input.toggle_solid {
        world.toggle_solid();
        if let Some(first) = world.squares().first() {
            log::info!("Squares are now {}", if world.is_solid(first) { "solid" } else { "ghosts" });
        }
    }
}
