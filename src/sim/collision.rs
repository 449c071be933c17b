//! Collision categories and blade queries
//!
//! Bodies are identified by a [`BodyTag`] rather than by name, and the blade is
//! a line segment tested against convex hulls.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::mesh::ConvexMesh;

/// Collision category of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyTag {
    /// The player's sword
    Weapon,
    /// Anything the blade can cut
    Sliceable,
    /// Cut pieces; collide but are never cut again
    Debris,
}

/// The blade as a segment between its two tracked points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Blade {
    pub start: Vec3,
    pub end: Vec3,
}

impl Blade {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Vector from the start point to the end point
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.end - self.start
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.start.lerp(self.end, t)
    }
}

/// A body offered to a blade query
#[derive(Debug, Clone, Copy)]
pub struct Collider<'a, K> {
    /// Caller's handle for the body
    pub key: K,
    pub tag: BodyTag,
    /// World-space hull
    pub hull: &'a ConvexMesh,
}

/// Result of a linecast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinecastHit<K> {
    pub key: K,
    /// First contact point on the blade
    pub point: Vec3,
    /// Fraction along the blade where contact begins
    pub fraction: f32,
}

/// Does the blade segment touch the hull at all
pub fn blade_overlaps(blade: &Blade, hull: &ConvexMesh) -> bool {
    hull.clip_segment(blade.start, blade.end).is_some()
}

/// Cast the blade from start to end against every collider carrying `layer`,
/// returning the nearest hit.
pub fn linecast<'a, K, I>(blade: &Blade, layer: BodyTag, colliders: I) -> Option<LinecastHit<K>>
where
    I: IntoIterator<Item = Collider<'a, K>>,
{
    let mut best: Option<LinecastHit<K>> = None;
    for collider in colliders {
        if collider.tag != layer {
            continue;
        }
        let Some((t_enter, _)) = collider.hull.clip_segment(blade.start, blade.end) else {
            continue;
        };
        if best.as_ref().is_none_or(|b| t_enter < b.fraction) {
            best = Some(LinecastHit {
                key: collider.key,
                point: blade.point_at(t_enter),
                fraction: t_enter,
            });
        }
    }
    best
}
