//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Delta time is injected by the caller, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (by pool slot, then debris id)
//! - No rendering or platform dependencies

pub mod block;
pub mod collision;
pub mod mesh;
pub mod pool;
pub mod schedule;
pub mod session;
pub mod slicer;
pub mod spawner;
pub mod state;
pub mod tick;

pub use block::{Block, BlockOutcome, block_speed};
pub use collision::{Blade, BodyTag, Collider, LinecastHit, blade_overlaps, linecast};
pub use mesh::{ConvexMesh, HullSide, Plane};
pub use pool::{Pool, Poolable};
pub use schedule::Scheduler;
pub use session::{DifficultyClock, Session, SessionPhase};
pub use slicer::{
    Debris, SliceError, SliceOutcome, SlicedHull, Slicer, VelocityEstimator, cut_plane_normal,
    explosion_impulse, slice_hull,
};
pub use spawner::{SpawnCadence, Spawner};
pub use state::{Deferred, GameEvent, GameState};
pub use tick::{TickInput, tick};
