//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`].

use serde::{Deserialize, Serialize};

use super::block::Block;
use super::mesh::HullSide;
use super::pool::Pool;
use super::schedule::Scheduler;
use super::session::{Session, SessionPhase};
use super::slicer::{Debris, SliceError, Slicer};
use super::spawner::Spawner;
use crate::settings::{Settings, SettingsError};

/// Continuations resumed by the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Start delay has elapsed
    BeginRound,
    /// Debris lifetime is over
    RemoveDebris { id: u32 },
}

/// Things that happened during a tick, for audio/haptics/animation hooks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    StartScheduled,
    RoundStarted,
    RoundEnded { score: i64 },
    BlockSpawned { slot: usize },
    SpawnSkipped,
    BlockHit { slot: usize, reward: i64 },
    BlockMissed { slot: usize, penalty: i64 },
    BlockSliced { slot: usize, upper: u32, lower: u32 },
    SliceFailed { slot: usize, error: SliceError },
    DebrisRemoved { id: u32, side: HullSide },
    ExitRequested,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub session: Session,
    pub blocks: Pool<Block>,
    pub spawner: Spawner,
    pub slicer: Slicer,
    /// Live cut pieces (sorted by id)
    pub debris: Vec<Debris>,
    pub scheduler: Scheduler<Deferred>,
    /// Seconds since the state was created, independent of the round
    pub world_time: f64,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    /// Exit was requested
    pub quit: bool,
    pub(super) next_id: u32,
}

impl GameState {
    /// Create a new game state from validated settings
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let blocks = Pool::new(settings.spawner.pool_size, |slot| Block::new(slot, &settings.block));
        Ok(Self {
            session: Session::new(&settings.session),
            spawner: Spawner::new(&settings.spawner),
            slicer: Slicer::new(&settings.slicer),
            blocks,
            debris: Vec::new(),
            scheduler: Scheduler::new(),
            world_time: 0.0,
            events: Vec::new(),
            quit: false,
            next_id: 1,
            settings,
        })
    }

    /// Allocate a new debris ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase
    }

    pub fn score(&self) -> i64 {
        self.session.score
    }

    pub fn active_blocks(&self) -> usize {
        self.blocks.active_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(Settings::default()).unwrap();
        assert_eq!(state.phase(), SessionPhase::Intro);
        assert_eq!(state.blocks.capacity(), 10);
        assert_eq!(state.active_blocks(), 0);
        assert!(state.scheduler.is_empty());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = Settings::default();
        settings.spawner.spawn_points.clear();
        assert!(GameState::new(settings).is_err());
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut state = GameState::new(Settings::default()).unwrap();
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }
}
