//! Convex mesh geometry and plane splitting
//!
//! A hull is stored as a list of planar polygon faces wound counter-clockwise
//! when seen from outside. Splitting clips every face against the cut plane
//! and closes each half with a cap polygon built from the crossing points.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::EPSILON;
use crate::plane_distance;

/// A cutting plane through `origin` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Vec3,
    pub normal: Vec3,
}

impl Plane {
    /// Build a plane, returning `None` for a zero-length normal
    pub fn new(origin: Vec3, normal: Vec3) -> Option<Self> {
        let normal = normal.try_normalize()?;
        Some(Self { origin, normal })
    }

    #[inline]
    pub fn distance(&self, point: Vec3) -> f32 {
        plane_distance(point, self.origin, self.normal)
    }
}

/// Which side of a cut plane a hull lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HullSide {
    /// Same side as the plane normal
    Upper,
    Lower,
}

/// Closed convex polyhedron
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvexMesh {
    pub faces: Vec<Vec<Vec3>>,
}

impl ConvexMesh {
    /// Axis-aligned box centered on the origin
    pub fn cuboid(half_extents: Vec3) -> Self {
        let h = half_extents;
        let v = |x: f32, y: f32, z: f32| Vec3::new(x * h.x, y * h.y, z * h.z);
        Self {
            faces: vec![
                // +X
                vec![v(1., -1., -1.), v(1., 1., -1.), v(1., 1., 1.), v(1., -1., 1.)],
                // -X
                vec![v(-1., -1., -1.), v(-1., -1., 1.), v(-1., 1., 1.), v(-1., 1., -1.)],
                // +Y
                vec![v(-1., 1., -1.), v(-1., 1., 1.), v(1., 1., 1.), v(1., 1., -1.)],
                // -Y
                vec![v(-1., -1., -1.), v(1., -1., -1.), v(1., -1., 1.), v(-1., -1., 1.)],
                // +Z
                vec![v(-1., -1., 1.), v(1., -1., 1.), v(1., 1., 1.), v(-1., 1., 1.)],
                // -Z
                vec![v(-1., -1., -1.), v(-1., 1., -1.), v(1., 1., -1.), v(1., -1., -1.)],
            ],
        }
    }

    /// Rotate then translate every vertex
    pub fn transformed(&self, rotation: Quat, translation: Vec3) -> Self {
        Self {
            faces: self
                .faces
                .iter()
                .map(|face| face.iter().map(|&p| rotation * p + translation).collect())
                .collect(),
        }
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        self.transformed(Quat::IDENTITY, offset)
    }

    /// Unique vertices (within tolerance)
    pub fn vertices(&self) -> Vec<Vec3> {
        let mut out: Vec<Vec3> = Vec::new();
        for &p in self.faces.iter().flatten() {
            push_unique(&mut out, p);
        }
        out
    }

    /// Average of the unique vertices
    pub fn centroid(&self) -> Vec3 {
        let verts = self.vertices();
        if verts.is_empty() {
            return Vec3::ZERO;
        }
        verts.iter().copied().sum::<Vec3>() / verts.len() as f32
    }

    /// Outward unit normal of a face (Newell's method)
    pub fn face_normal(face: &[Vec3]) -> Vec3 {
        let mut n = Vec3::ZERO;
        for (i, a) in face.iter().enumerate() {
            let b = face[(i + 1) % face.len()];
            n.x += (a.y - b.y) * (a.z + b.z);
            n.y += (a.z - b.z) * (a.x + b.x);
            n.z += (a.x - b.x) * (a.y + b.y);
        }
        n.normalize_or_zero()
    }

    /// Enclosed volume (divergence theorem over fan-triangulated faces)
    pub fn volume(&self) -> f32 {
        let mut six_v = 0.0;
        for face in &self.faces {
            if face.len() < 3 {
                continue;
            }
            let a = face[0];
            for w in face[1..].windows(2) {
                six_v += a.dot(w[0].cross(w[1]));
            }
        }
        six_v / 6.0
    }

    /// Point is inside or on the surface
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.faces.iter().all(|face| {
            let n = Self::face_normal(face);
            n == Vec3::ZERO || plane_distance(point, face[0], n) <= EPSILON
        })
    }

    /// Clip the segment `start..end` against the hull.
    ///
    /// Returns the entry and exit fractions along the segment, or `None` if the
    /// segment stays outside.
    pub fn clip_segment(&self, start: Vec3, end: Vec3) -> Option<(f32, f32)> {
        let dir = end - start;
        let mut t_enter = 0.0_f32;
        let mut t_exit = 1.0_f32;

        for face in &self.faces {
            let n = Self::face_normal(face);
            if n == Vec3::ZERO {
                continue;
            }
            let dist = plane_distance(start, face[0], n);
            let denom = dir.dot(n);
            if denom.abs() < EPSILON {
                // Parallel to this face: must already be behind it
                if dist > EPSILON {
                    return None;
                }
                continue;
            }
            let t = -dist / denom;
            if denom < 0.0 {
                t_enter = t_enter.max(t);
            } else {
                t_exit = t_exit.min(t);
            }
            if t_enter > t_exit + EPSILON {
                return None;
            }
        }

        Some((t_enter, t_exit))
    }

    /// Split the hull along `plane` into (upper, lower).
    ///
    /// Returns `None` when the plane does not pass through the hull, i.e. every
    /// vertex is on one side (or on the plane itself).
    pub fn split(&self, plane: &Plane) -> Option<(ConvexMesh, ConvexMesh)> {
        let verts = self.vertices();
        let above = verts.iter().any(|&p| plane.distance(p) > EPSILON);
        let below = verts.iter().any(|&p| plane.distance(p) < -EPSILON);
        if !above || !below {
            return None;
        }

        let mut upper = Vec::new();
        let mut lower = Vec::new();
        let mut section: Vec<Vec3> = Vec::new();

        for face in &self.faces {
            let (up, down) = clip_polygon(face, plane, &mut section);
            if up.len() >= 3 {
                upper.push(up);
            }
            if down.len() >= 3 {
                lower.push(down);
            }
        }

        let cap = order_around(&section, plane.normal);
        if cap.len() < 3 {
            return None;
        }
        // Upper cap faces against the normal, lower cap along it
        let mut upper_cap = cap.clone();
        upper_cap.reverse();
        upper.push(upper_cap);
        lower.push(cap);

        Some((ConvexMesh { faces: upper }, ConvexMesh { faces: lower }))
    }
}

fn push_unique(points: &mut Vec<Vec3>, p: Vec3) {
    if !points.iter().any(|q| q.distance_squared(p) < EPSILON * EPSILON) {
        points.push(p);
    }
}

/// Sutherland-Hodgman clip of one polygon into both half-spaces.
/// Points lying on the plane are collected into `section`.
fn clip_polygon(face: &[Vec3], plane: &Plane, section: &mut Vec<Vec3>) -> (Vec<Vec3>, Vec<Vec3>) {
    let mut up = Vec::with_capacity(face.len() + 1);
    let mut down = Vec::with_capacity(face.len() + 1);

    for (i, &a) in face.iter().enumerate() {
        let b = face[(i + 1) % face.len()];
        let da = plane.distance(a);
        let db = plane.distance(b);

        if da >= -EPSILON {
            up.push(a);
        }
        if da <= EPSILON {
            down.push(a);
        }
        if da.abs() <= EPSILON {
            push_unique(section, a);
        }

        let crosses = (da > EPSILON && db < -EPSILON) || (da < -EPSILON && db > EPSILON);
        if crosses {
            let t = da / (da - db);
            let p = a.lerp(b, t);
            up.push(p);
            down.push(p);
            push_unique(section, p);
        }
    }

    (up, down)
}

/// Sort coplanar points counter-clockwise around `normal`
fn order_around(points: &[Vec3], normal: Vec3) -> Vec<Vec3> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let center = points.iter().copied().sum::<Vec3>() / points.len() as f32;
    let u = normal.any_orthonormal_vector();
    let v = normal.cross(u);

    let mut ordered = points.to_vec();
    ordered.sort_by(|a, b| {
        let pa = *a - center;
        let pb = *b - center;
        let ta = pa.dot(v).atan2(pa.dot(u));
        let tb = pb.dot(v).atan2(pb.dot(u));
        ta.total_cmp(&tb)
    });
    ordered
}
