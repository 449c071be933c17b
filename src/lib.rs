//! Blade Rush - a block slicing arcade round
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pool, spawner, blocks, slicer, session)
//! - `hud`: One-way text/panel surface written by the simulation
//! - `settings`: Data-driven game balance

pub mod hud;
pub mod settings;
pub mod sim;

pub use hud::{Hud, Panel, TextHud};
pub use settings::{Settings, SettingsError};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless driver (90 Hz, a common headset refresh)
    pub const SIM_DT: f32 = 1.0 / 90.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Physics step the explosion force is integrated over (force -> velocity change)
    pub const PHYSICS_STEP: f32 = 0.02;
    /// Mass of a freshly cut hull
    pub const DEBRIS_MASS: f32 = 1.0;
    /// Gravity applied to debris (m/s²)
    pub const GRAVITY: glam::Vec3 = glam::Vec3::new(0.0, -9.81, 0.0);

    /// Geometric tolerance for plane classification and degenerate checks
    pub const EPSILON: f32 = 1e-5;
}

/// Remaining seconds as shown on the timer display (ceiling-rounded)
#[inline]
pub fn display_seconds(remaining: f32) -> i32 {
    remaining.ceil() as i32
}

/// Signed distance of `point` from the plane through `origin` with unit `normal`
#[inline]
pub fn plane_distance(point: Vec3, origin: Vec3, normal: Vec3) -> f32 {
    (point - origin).dot(normal)
}
