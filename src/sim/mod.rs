//! Deterministic simulation module
//!
//! All world logic lives here. This module must stay pure and deterministic:
//! - One fixed step per `update` call
//! - Seeded RNG only (or an injected one)
//! - Stable iteration order (square creation order, registry insertion order)
//! - No rendering or platform dependencies

pub mod resolve;
pub mod shape;
pub mod space;
pub mod state;
pub mod tick;

pub use resolve::{AxisResolution, resolve, resolve_rect};
pub use shape::{Axis, BodyKey, Rect, Shape, ShapeId, Tags};
pub use space::{ShapeView, Space};
pub use state::{BounceWorld, Square, WorldPhase};
pub use tick::{FrameInput, tick};
