//! Blade slicing
//!
//! The cut plane contains the blade and its direction of travel:
//! `normal = normalize(blade_direction × blade_velocity)`. Each sliced body
//! becomes two debris hulls pushed apart by an explosion impulse and removed
//! after a fixed lifetime.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::{Blade, BodyTag};
use super::mesh::{ConvexMesh, HullSide, Plane};
use crate::consts::{DEBRIS_MASS, EPSILON, GRAVITY, PHYSICS_STEP};
use crate::settings::SlicerSettings;

/// Why a slice produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SliceError {
    /// Blade direction and velocity are zero or parallel
    #[error("cut plane is undefined (blade not moving across its length)")]
    DegenerateCutPlane,
    /// The plane does not pass through the target
    #[error("cut plane misses the target")]
    PlaneMissesMesh,
}

/// Cut plane normal for a blade moving with `velocity`
pub fn cut_plane_normal(blade: &Blade, velocity: Vec3) -> Option<Vec3> {
    let normal = blade.direction().cross(velocity);
    if normal.length_squared() < EPSILON * EPSILON {
        return None;
    }
    Some(normal.normalize())
}

/// Both halves of a cut and the plane that made them
#[derive(Debug, Clone)]
pub struct SlicedHull {
    pub upper: ConvexMesh,
    pub lower: ConvexMesh,
    pub plane: Plane,
}

/// Split a world-space hull with the blade. The plane passes through the blade's end point.
pub fn slice_hull(hull: &ConvexMesh, blade: &Blade, velocity: Vec3) -> Result<SlicedHull, SliceError> {
    let normal = cut_plane_normal(blade, velocity).ok_or(SliceError::DegenerateCutPlane)?;
    let plane = Plane::new(blade.end, normal).ok_or(SliceError::DegenerateCutPlane)?;
    let (upper, lower) = hull.split(&plane).ok_or(SliceError::PlaneMissesMesh)?;
    Ok(SlicedHull { upper, lower, plane })
}

/// Impulse on a body from an explosion at `center`.
///
/// Falls off linearly to zero at `radius`. `fallback` is used as the push
/// direction when the body sits exactly on the center.
pub fn explosion_impulse(force: f32, center: Vec3, radius: f32, body: Vec3, fallback: Vec3) -> Vec3 {
    let offset = body - center;
    let distance = offset.length();
    if distance >= radius {
        return Vec3::ZERO;
    }
    let direction = if distance > EPSILON {
        offset / distance
    } else {
        fallback.normalize_or_zero()
    };
    direction * force * (1.0 - distance / radius)
}

/// Averages the blade tip velocity over the last few ticks
#[derive(Debug, Clone)]
pub struct VelocityEstimator {
    samples: VecDeque<Vec3>,
    window: usize,
    last_position: Option<Vec3>,
}

impl VelocityEstimator {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
            last_position: None,
        }
    }

    /// Record the tracked point's position after `dt` seconds
    pub fn sample(&mut self, position: Vec3, dt: f32) {
        if let Some(last) = self.last_position.replace(position) {
            if dt > 0.0 {
                if self.samples.len() == self.window {
                    self.samples.pop_front();
                }
                self.samples.push_back((position - last) / dt);
            }
        }
    }

    /// Mean velocity of the window (zero until two positions are known)
    pub fn estimate(&self) -> Vec3 {
        if self.samples.is_empty() {
            return Vec3::ZERO;
        }
        self.samples.iter().copied().sum::<Vec3>() / self.samples.len() as f32
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.last_position = None;
    }
}

/// A cut piece
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debris {
    pub id: u32,
    pub side: HullSide,
    /// Body origin (the sliced body's position at the cut)
    pub position: Vec3,
    pub velocity: Vec3,
    /// Convex collider, relative to `position`
    pub hull: ConvexMesh,
}

impl Debris {
    pub const fn tag(&self) -> BodyTag {
        BodyTag::Debris
    }

    pub fn world_hull(&self) -> ConvexMesh {
        self.hull.translated(self.position)
    }

    /// Apply an impulse (N·s) to a unit-mass body
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse / DEBRIS_MASS;
    }

    /// Ballistic drift
    pub fn integrate(&mut self, dt: f32) {
        self.velocity += GRAVITY * dt;
        self.position += self.velocity * dt;
    }
}

/// Output of a successful cut
#[derive(Debug, Clone)]
pub struct SliceOutcome {
    pub upper: Debris,
    pub lower: Debris,
}

/// Blade tracker and cutter
#[derive(Debug, Clone)]
pub struct Slicer {
    pub estimator: VelocityEstimator,
    /// Successful cuts
    pub slices: u32,
    /// Hits that produced no hull
    pub failed: u32,
}

impl Slicer {
    pub fn new(settings: &SlicerSettings) -> Self {
        Self {
            estimator: VelocityEstimator::new(settings.velocity_average_frames),
            slices: 0,
            failed: 0,
        }
    }

    /// Feed this tick's blade pose into the velocity estimate
    pub fn track(&mut self, blade: &Blade, dt: f32) {
        self.estimator.sample(blade.end, dt);
    }

    /// Cut a world-space hull whose body origin is `origin`.
    ///
    /// `next_id` allocates debris ids. On error nothing is produced and the
    /// caller leaves the target untouched.
    pub fn slice(
        &mut self,
        hull: &ConvexMesh,
        origin: Vec3,
        blade: &Blade,
        settings: &SlicerSettings,
        mut next_id: impl FnMut() -> u32,
    ) -> Result<SliceOutcome, SliceError> {
        let velocity = self.estimator.estimate();
        let sliced = match slice_hull(hull, blade, velocity) {
            Ok(sliced) => sliced,
            Err(e) => {
                self.failed += 1;
                return Err(e);
            }
        };
        let normal = sliced.plane.normal;

        let mut make = |side: HullSide, world: ConvexMesh| {
            let mut debris = Debris {
                id: next_id(),
                side,
                position: origin,
                velocity: Vec3::ZERO,
                hull: world.translated(-origin),
            };
            let fallback = match side {
                HullSide::Upper => normal,
                HullSide::Lower => -normal,
            };
            let force = explosion_impulse(
                settings.explosion_force,
                debris.position,
                settings.explosion_radius,
                world.centroid(),
                fallback,
            );
            debris.apply_impulse(force * PHYSICS_STEP);
            debris
        };

        let upper = make(HullSide::Upper, sliced.upper);
        let lower = make(HullSide::Lower, sliced.lower);
        self.slices += 1;
        Ok(SliceOutcome { upper, lower })
    }
}
