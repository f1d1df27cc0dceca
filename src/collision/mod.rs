//! Axis-aligned collision resolution.
//!
//! Everything that moves or swings probes the world through these helpers:
//! a candidate rectangle against a collection of rectangles, short-circuiting
//! on the first hit. Two policies sit on top:
//!
//! - blocking collision (movement): probe vs. resource-node inset boxes and
//!   solid buildings. Door and SlowTrap are non-solid and are *skipped* —
//!   entries placed after them are still tested.
//! - hit collision (harvesting): probe vs. resource nodes only, with the
//!   shake-trigger side effect applied by the caller on the first hit.

use bevy::math::bounding::{Aabb2d, IntersectsVolume};
use bevy::prelude::*;

/// Square probe centered at `center`.
pub fn probe(center: Vec2, size: f32) -> Aabb2d {
    Aabb2d::new(center, Vec2::splat(size * 0.5))
}

/// Rectangular probe centered at `center`.
pub fn probe_rect(center: Vec2, size: Vec2) -> Aabb2d {
    Aabb2d::new(center, size * 0.5)
}

/// Intersects-any test, short-circuiting on the first overlap.
pub fn blocked_by_any(candidate: Aabb2d, boxes: impl IntoIterator<Item = Aabb2d>) -> bool {
    boxes.into_iter().any(|b| candidate.intersects(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes_intersect() {
        let a = probe(Vec2::ZERO, 50.0);
        let b = probe(Vec2::new(40.0, 0.0), 50.0);
        assert!(blocked_by_any(a, [b]));
    }

    #[test]
    fn separated_boxes_do_not_intersect() {
        let a = probe(Vec2::ZERO, 50.0);
        let b = probe(Vec2::new(60.0, 0.0), 50.0);
        assert!(!blocked_by_any(a, [b]));
    }

    #[test]
    fn touching_edges_count_as_overlap() {
        // Aabb2d intersection is closed: shared edges collide.
        let a = probe(Vec2::ZERO, 50.0);
        let b = probe(Vec2::new(50.0, 0.0), 50.0);
        assert!(blocked_by_any(a, [b]));
    }

    #[test]
    fn empty_collection_never_blocks() {
        let a = probe(Vec2::ZERO, 50.0);
        assert!(!blocked_by_any(a, std::iter::empty()));
    }

    #[test]
    fn scan_continues_past_non_hits() {
        let a = probe(Vec2::ZERO, 50.0);
        let far = probe(Vec2::new(500.0, 500.0), 50.0);
        let near = probe(Vec2::new(30.0, 0.0), 50.0);
        assert!(blocked_by_any(a, [far, far, near]));
    }
}
