//! Per-axis collision resolution
//!
//! Movement is resolved one axis at a time (horizontal, then vertical), so a
//! body hitting a corner bounces on whichever axis actually blocks it and the
//! caller can special-case gravity on the vertical axis only.

use super::shape::{Axis, Rect, ShapeId};
use super::space::{ShapeView, Space};

/// Result of resolving one axis of movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisResolution {
    /// Displacement that brings the shape flush with the nearest obstacle
    /// (the requested displacement when nothing is in the way). Always has the
    /// sign of the displacement or is zero: a shape already inside an obstacle
    /// it is moving into gets 0.
    pub delta: f32,
    /// An obstacle lies in the swept path
    pub colliding: bool,
    /// The contact can't be trusted because the step is longer than the
    /// shape itself. Callers should move by the full displacement and skip
    /// any bounce.
    pub teleporting: bool,
    /// The obstacle that produced `delta`
    pub obstacle: Option<ShapeId>,
}

impl AxisResolution {
    /// Nothing in the way
    pub fn clear(displacement: f32) -> Self {
        Self {
            delta: displacement,
            colliding: false,
            teleporting: false,
            obstacle: None,
        }
    }

    /// Colliding and safe to snap to
    #[inline]
    pub fn is_contact(&self) -> bool {
        self.colliding && !self.teleporting
    }
}

/// Resolve `moving` travelling `displacement` along `axis` against `obstacles`.
///
/// The moving shape is skipped if it appears in `obstacles`, as are ids that
/// have since been removed from the space.
pub fn resolve(
    space: &Space,
    moving: ShapeId,
    displacement: f32,
    axis: Axis,
    obstacles: &ShapeView,
) -> AxisResolution {
    let Some(shape) = space.get(moving) else {
        return AxisResolution::clear(displacement);
    };
    let others = obstacles
        .shapes(space)
        .filter(|(id, _)| *id != moving)
        .map(|(id, s)| (id, &s.rect));
    resolve_rect(&shape.rect, displacement, axis, others)
}

/// Geometry-only core of [`resolve`]
pub fn resolve_rect<'a>(
    rect: &Rect,
    displacement: f32,
    axis: Axis,
    obstacles: impl IntoIterator<Item = (ShapeId, &'a Rect)>,
) -> AxisResolution {
    if displacement == 0.0 {
        return AxisResolution::clear(displacement);
    }

    let swept = rect.swept(axis, displacement);
    let forward = displacement > 0.0;
    let lead = if forward { axis.of(rect.max()) } else { axis.of(rect.min()) };

    // Nearest contact: the smallest forward distance to an obstacle's near face
    let mut best: Option<(ShapeId, f32)> = None;
    for (id, other) in obstacles {
        if !swept.overlaps(other) {
            continue;
        }
        // Obstacles whose far face is already behind the leading edge are being
        // left, not entered
        let clip = if forward {
            if axis.of(other.max()) <= lead {
                continue;
            }
            (axis.of(other.min()) - lead).max(0.0)
        } else {
            if axis.of(other.min()) >= lead {
                continue;
            }
            (axis.of(other.max()) - lead).min(0.0)
        };
        match best {
            Some((_, b)) if clip.abs() >= b.abs() => {}
            _ => best = Some((id, clip)),
        }
    }

    let Some((obstacle, delta)) = best else {
        return AxisResolution::clear(displacement);
    };

    AxisResolution {
        delta,
        colliding: true,
        teleporting: displacement.abs() > rect.extent(axis),
        obstacle: Some(obstacle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::{Shape, Tags};
    use proptest::prelude::*;

    fn body() -> Rect {
        Rect::new(100.0, 100.0, 16.0, 16.0)
    }

    fn space_with(rects: &[Rect]) -> (Space, Vec<ShapeId>) {
        let mut space = Space::new();
        let ids = rects
            .iter()
            .map(|r| space.add(Shape::new(*r).with_tags(Tags::SOLID)))
            .collect();
        (space, ids)
    }

    #[test]
    fn test_empty_obstacles_never_collide() {
        for d in [-500.0, -4.0, 0.0, 3.5, 1000.0] {
            let res = resolve_rect(&body(), d, Axis::Vertical, std::iter::empty());
            assert!(!res.colliding);
            assert!(!res.teleporting);
            assert_eq!(res.delta, d);
        }
    }

    #[test]
    fn test_floor_contact_snaps_to_surface() {
        // Floor top at y=120, body bottom at y=116
        let floor = Rect::new(0.0, 120.0, 640.0, 4.0);
        let (space, ids) = space_with(&[floor]);
        let view = space.filter_by_tags(Tags::SOLID);

        let res = resolve_rect(&body(), 6.0, Axis::Vertical, view.shapes(&space).map(|(id, s)| (id, &s.rect)));
        assert!(res.is_contact());
        assert_eq!(res.delta, 4.0);
        assert_eq!(res.obstacle, Some(ids[0]));
    }

    #[test]
    fn test_clear_when_step_stops_short() {
        let floor = Rect::new(0.0, 130.0, 640.0, 4.0);
        let res = resolve_rect(&body(), 6.0, Axis::Vertical, [(dummy_id(), &floor)]);
        assert!(!res.colliding);
        assert_eq!(res.delta, 6.0);
    }

    #[test]
    fn test_touching_and_moving_away_is_clear() {
        let wall = Rect::new(116.0, 0.0, 4.0, 480.0);
        let res = resolve_rect(&body(), -3.0, Axis::Horizontal, [(dummy_id(), &wall)]);
        assert!(!res.colliding);

        // Moving into it from flush contact gives a zero delta
        let res = resolve_rect(&body(), 3.0, Axis::Horizontal, [(dummy_id(), &wall)]);
        assert!(res.is_contact());
        assert_eq!(res.delta, 0.0);
    }

    #[test]
    fn test_picks_nearest_obstacle() {
        let far = Rect::new(118.0, 90.0, 4.0, 40.0);
        let near = Rect::new(117.0, 110.0, 4.0, 4.0);
        let (space, ids) = space_with(&[far, near]);

        let view = space.filter_by_tags(Tags::SOLID);
        let res = resolve_rect(&body(), 4.0, Axis::Horizontal, view.shapes(&space).map(|(id, s)| (id, &s.rect)));
        assert!(res.is_contact());
        assert_eq!(res.delta, 1.0);
        assert_eq!(res.obstacle, Some(ids[1]));
    }

    #[test]
    fn test_leftward_and_upward_contacts() {
        let left_wall = Rect::new(90.0, 0.0, 8.0, 480.0);
        let res = resolve_rect(&body(), -4.0, Axis::Horizontal, [(dummy_id(), &left_wall)]);
        assert!(res.is_contact());
        assert_eq!(res.delta, -2.0);

        let ceiling = Rect::new(0.0, 95.0, 640.0, 4.0);
        let res = resolve_rect(&body(), -3.0, Axis::Vertical, [(dummy_id(), &ceiling)]);
        assert!(res.is_contact());
        assert_eq!(res.delta, -1.0);
    }

    #[test]
    fn test_step_larger_than_shape_is_teleporting() {
        let floor = Rect::new(0.0, 130.0, 640.0, 4.0);
        let res = resolve_rect(&body(), 20.0, Axis::Vertical, [(dummy_id(), &floor)]);
        assert!(res.colliding);
        assert!(res.teleporting);
        assert!(!res.is_contact());
        // Nominal delta still reported
        assert_eq!(res.delta, 14.0);
    }

    #[test]
    fn test_embedded_shape_stays_put() {
        // Obstacle covers most of the body already
        let block = Rect::new(104.0, 96.0, 40.0, 40.0);
        let res = resolve_rect(&body(), 4.0, Axis::Horizontal, [(dummy_id(), &block)]);
        assert!(res.is_contact());
        assert_eq!(res.delta, 0.0);

        // Shallow overlap behaves the same
        let block = Rect::new(115.0, 96.0, 40.0, 40.0);
        let res = resolve_rect(&body(), 1.0, Axis::Horizontal, [(dummy_id(), &block)]);
        assert!(res.is_contact());
        assert_eq!(res.delta, 0.0);
    }

    #[test]
    fn test_overlapped_block_never_hides_wall_ahead() {
        let wall = Rect::new(118.0, 0.0, 4.0, 480.0);

        // Body is inside a block that reaches past the wall
        let deep = Rect::new(104.0, 96.0, 40.0, 40.0);
        let (space, ids) = space_with(&[deep, wall]);
        let view = space.filter_by_tags(Tags::SOLID);
        let res = resolve_rect(&body(), 4.0, Axis::Horizontal, view.shapes(&space).map(|(id, s)| (id, &s.rect)));
        assert!(res.is_contact());
        assert_eq!(res.delta, 0.0);
        assert_eq!(res.obstacle, Some(ids[0]));

        // Block only overlaps the trailing side: the wall is the contact
        let behind = Rect::new(90.0, 96.0, 20.0, 40.0);
        let (space, ids) = space_with(&[behind, wall]);
        let view = space.filter_by_tags(Tags::SOLID);
        let res = resolve_rect(&body(), 4.0, Axis::Horizontal, view.shapes(&space).map(|(id, s)| (id, &s.rect)));
        assert!(res.is_contact());
        assert_eq!(res.delta, 2.0);
        assert_eq!(res.obstacle, Some(ids[1]));
    }

    #[test]
    fn test_leaving_an_obstacle_is_clear() {
        let block = Rect::new(104.0, 96.0, 40.0, 40.0);
        let res = resolve_rect(&body(), -4.0, Axis::Horizontal, [(dummy_id(), &block)]);
        assert!(!res.colliding);
        assert_eq!(res.delta, -4.0);
    }

    #[test]
    fn test_step_equal_to_extent_is_trusted() {
        let floor = Rect::new(0.0, 130.0, 640.0, 4.0);
        let res = resolve_rect(&body(), 16.0, Axis::Vertical, [(dummy_id(), &floor)]);
        assert!(res.is_contact());
        assert_eq!(res.delta, 14.0);
    }

    #[test]
    fn test_resolve_skips_moving_shape() {
        let (mut space, _) = space_with(&[]);
        let me = space.add(Shape::new(body()).with_tags(Tags::SOLID | Tags::SQUARE));
        let view = space.filter_by_tags(Tags::SOLID);
        assert!(view.contains(me));

        let res = resolve(&space, me, 4.0, Axis::Horizontal, &view);
        assert!(!res.colliding);
        assert_eq!(res.delta, 4.0);
    }

    #[test]
    fn test_resolve_against_registry() {
        let (mut space, ids) = space_with(&[Rect::new(0.0, 120.0, 640.0, 4.0)]);
        let me = space.add(Shape::new(body()).with_tags(Tags::SQUARE));
        let view = space.filter_by_tags(Tags::SOLID);

        let res = resolve(&space, me, 6.0, Axis::Vertical, &view);
        assert!(res.is_contact());
        assert_eq!(res.delta, 4.0);
        assert_eq!(res.obstacle, Some(ids[0]));

        // Removed obstacles no longer block, even through an old view
        space.remove(ids[0]);
        let res = resolve(&space, me, 6.0, Axis::Vertical, &view);
        assert!(!res.colliding);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_no_solids_no_collision(
            rects in prop::collection::vec((0.0f32..600.0, 0.0f32..440.0, 1.0f32..64.0, 1.0f32..64.0), 0..12),
            d in -40.0f32..40.0,
            vertical in any::<bool>(),
        ) {
            let mut space = Space::new();
            for (x, y, w, h) in rects {
                space.add(Shape::new(Rect::new(x, y, w, h)).with_tags(Tags::SQUARE));
            }
            let me = space.add(Shape::new(body()).with_tags(Tags::SQUARE));
            let axis = if vertical { Axis::Vertical } else { Axis::Horizontal };

            let res = resolve(&space, me, d, axis, &space.filter_by_tags(Tags::SOLID));
            prop_assert!(!res.colliding);
            prop_assert!(!res.teleporting);
            prop_assert_eq!(res.delta, d);
        }
    }

    fn dummy_id() -> ShapeId {
        ShapeId {
            index: 0,
            generation: 0,
        }
    }
}
