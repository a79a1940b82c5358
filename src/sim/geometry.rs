//! Sweep arcs and small vector helpers
//!
//! The sword sweep is an angular range around the player centre:
//! - start: where the swing began (radians)
//! - end: how far the swing front has advanced this tick
//!
//! Both ends are stored normalized to [0, 2π), so an arc crossing the +x axis
//! has `start > end`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{angle_of, normalize_angle};

/// Below this distance a direction is treated as undefined
pub const DIRECTION_EPSILON: f32 = f32::EPSILON;

/// An angular range swept by the sword
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepArc {
    /// Start angle (radians, normalized to [0, 2π))
    pub start: f32,
    /// End angle (radians, normalized to [0, 2π))
    pub end: f32,
}

impl SweepArc {
    pub fn new(start: f32, end: f32) -> Self {
        Self {
            start: normalize_angle(start),
            end: normalize_angle(end),
        }
    }

    /// Arc covered by a swing that began at `start` and has advanced
    /// `progress` (clamped to [0, 1]) through a total sweep of `sweep` radians
    pub fn partial(start: f32, sweep: f32, progress: f32) -> Self {
        Self::new(start, start + progress.clamp(0.0, 1.0) * sweep)
    }

    /// True when the arc crosses the 0/2π seam
    #[inline]
    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    /// Check if an angle is within the arc's angular extent
    pub fn contains_angle(&self, theta: f32) -> bool {
        let theta = normalize_angle(theta);
        if self.wraps() {
            theta >= self.start || theta <= self.end
        } else {
            theta >= self.start && theta <= self.end
        }
    }

    /// Check if a point lies inside the arc and inside the ring
    /// `inner < distance <= outer` around `center`
    pub fn contains_point(&self, center: Vec2, point: Vec2, inner: f32, outer: f32) -> bool {
        let offset = point - center;
        let dist = offset.length();
        dist > inner && dist <= outer && self.contains_angle(angle_of(offset))
    }
}

/// Unit vector and distance from `from` to `to`, or `None` when the two
/// points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<(Vec2, f32)> {
    let delta = to - from;
    let dist = delta.length();
    if dist <= DIRECTION_EPSILON {
        None
    } else {
        Some((delta / dist, dist))
    }
}

/// True when two circles overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Clamp a box's top-left corner so the whole box stays inside the arena
///
/// An arena smaller than the box pins the box to the origin.
pub fn clamp_box_to_arena(pos: Vec2, size: Vec2, arena: Vec2) -> Vec2 {
    let max = (arena - size).max(Vec2::ZERO);
    pos.clamp(Vec2::ZERO, max)
}
