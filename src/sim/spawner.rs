//! Block spawner with a shrinking spawn period
//!
//! Two clocks run while the round is live: the cadence countdown that fires
//! spawns, and the ramp accumulator that shortens the period every
//! `spawn_rate_increase_interval` seconds down to a floor. Nothing new spawns
//! once the round is past `spawn_cutoff`.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::block::Block;
use super::pool::Pool;
use crate::settings::{BlockSettings, SpawnerSettings};

/// Spawn period ramp
#[derive(Debug, Clone)]
pub struct SpawnCadence {
    initial: f32,
    period: f32,
    step: f32,
    floor: f32,
    interval: f32,
    /// Active time since the last ramp step
    since_step: f32,
}

impl SpawnCadence {
    pub fn new(settings: &SpawnerSettings) -> Self {
        Self {
            initial: settings.initial_spawn_rate,
            period: settings.initial_spawn_rate,
            step: settings.spawn_rate_decrease,
            floor: settings.min_spawn_rate,
            interval: settings.spawn_rate_increase_interval,
            since_step: 0.0,
        }
    }

    /// Current seconds between spawns
    #[inline]
    pub fn period(&self) -> f32 {
        self.period
    }

    /// Accumulate active time; returns `true` when the period stepped down
    pub fn advance(&mut self, dt: f32) -> bool {
        self.since_step += dt;
        if self.since_step < self.interval {
            return false;
        }
        self.since_step = 0.0;
        self.period = (self.period - self.step).max(self.floor);
        log::info!("Spawn rate increased! New spawn rate: {} seconds per block.", self.period);
        true
    }

    pub fn reset(&mut self) {
        self.period = self.initial;
        self.since_step = 0.0;
    }
}

/// Pulls blocks from the pool and launches them from random spawn points
#[derive(Debug, Clone)]
pub struct Spawner {
    pub cadence: SpawnCadence,
    /// Seconds until the next spawn attempt
    until_next: f32,
    rng: Pcg32,
    /// Spawn attempts skipped because the pool was exhausted
    pub skipped: u32,
    pub spawned: u32,
}

impl Spawner {
    pub fn new(settings: &SpawnerSettings) -> Self {
        Self {
            cadence: SpawnCadence::new(settings),
            until_next: 0.0,
            rng: Pcg32::seed_from_u64(settings.seed),
            skipped: 0,
            spawned: 0,
        }
    }

    /// Fresh round: first spawn goes out on the first live tick
    pub fn reset(&mut self) {
        self.cadence.reset();
        self.until_next = 0.0;
    }

    /// Advance one tick of live play. Returns the slot spawned, if any.
    pub fn update(
        &mut self,
        elapsed: f32,
        dt: f32,
        pool: &mut Pool<Block>,
        settings: &SpawnerSettings,
        block_settings: &BlockSettings,
    ) -> Option<usize> {
        if elapsed > settings.spawn_cutoff {
            return None;
        }

        self.until_next -= dt;
        let mut spawned = None;
        if self.until_next <= 0.0 {
            spawned = self.spawn(pool, settings, block_settings);
            self.until_next = self.cadence.period();
        }
        self.cadence.advance(dt);
        spawned
    }

    fn spawn(
        &mut self,
        pool: &mut Pool<Block>,
        settings: &SpawnerSettings,
        block_settings: &BlockSettings,
    ) -> Option<usize> {
        let Some(slot) = pool.acquire() else {
            self.skipped += 1;
            log::warn!("No available blocks in the pool");
            return None;
        };
        if settings.spawn_points.is_empty() {
            return None;
        }
        let point = settings.spawn_points[self.rng.random_range(0..settings.spawn_points.len())];
        let block = pool.get_mut(slot)?;
        block.activate(&point, block_settings);
        self.spawned += 1;
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pool(settings: &SpawnerSettings, blocks: &BlockSettings) -> Pool<Block> {
        Pool::new(settings.pool_size, |i| Block::new(i, blocks))
    }

    #[test]
    fn test_cadence_after_eight_intervals() {
        let settings = SpawnerSettings::default();
        let mut cadence = SpawnCadence::new(&settings);
        let mut steps = 0;
        // 120 s in 0.5 s ticks
        for _ in 0..240 {
            if cadence.advance(0.5) {
                steps += 1;
            }
        }
        assert_eq!(steps, 8);
        assert!((cadence.period() - 0.76).abs() < 1e-5);
    }

    #[test]
    fn test_cadence_respects_floor() {
        let settings = SpawnerSettings {
            spawn_rate_decrease: 0.5,
            ..Default::default()
        };
        let mut cadence = SpawnCadence::new(&settings);
        for _ in 0..10 {
            cadence.advance(settings.spawn_rate_increase_interval);
        }
        assert_eq!(cadence.period(), settings.min_spawn_rate);
        cadence.reset();
        assert_eq!(cadence.period(), settings.initial_spawn_rate);
    }

    #[test]
    fn test_first_tick_spawns_then_waits_a_period() {
        let settings = SpawnerSettings::default();
        let blocks = BlockSettings::default();
        let mut pool = pool(&settings, &blocks);
        let mut spawner = Spawner::new(&settings);

        assert!(spawner.update(0.0, 0.1, &mut pool, &settings, &blocks).is_some());
        let mut elapsed = 0.1;
        // Nothing for the next 0.9 s
        for _ in 0..8 {
            assert!(spawner.update(elapsed, 0.1, &mut pool, &settings, &blocks).is_none());
            elapsed += 0.1;
        }
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn test_spawned_block_sits_on_a_spawn_point() {
        let settings = SpawnerSettings::default();
        let blocks = BlockSettings::default();
        let mut pool = pool(&settings, &blocks);
        let mut spawner = Spawner::new(&settings);

        let slot = spawner.update(0.0, 0.1, &mut pool, &settings, &blocks).unwrap();
        let block = pool.get(slot).unwrap();
        assert!(block.active);
        assert!(settings.spawn_points.iter().any(|p| p.position == block.position));
        assert_eq!(block.speed, blocks.base_speed);
    }

    #[test]
    fn test_exhausted_pool_skips_spawn() {
        let settings = SpawnerSettings {
            pool_size: 2,
            ..Default::default()
        };
        let blocks = BlockSettings::default();
        let mut pool = pool(&settings, &blocks);
        let mut spawner = Spawner::new(&settings);

        let mut elapsed = 0.0;
        for _ in 0..4 {
            spawner.update(elapsed, 1.0, &mut pool, &settings, &blocks);
            elapsed += 1.0;
        }
        assert_eq!(pool.active_count(), 2);
        assert_eq!(spawner.spawned, 2);
        assert_eq!(spawner.skipped, 2);
    }

    #[test]
    fn test_no_spawns_after_cutoff() {
        let settings = SpawnerSettings::default();
        let blocks = BlockSettings::default();
        let mut pool = pool(&settings, &blocks);
        let mut spawner = Spawner::new(&settings);

        assert!(spawner.update(118.5, 0.1, &mut pool, &settings, &blocks).is_none());
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_same_seed_same_spawn_points() {
        let settings = SpawnerSettings::default();
        let blocks = BlockSettings::default();
        let run = || {
            let mut pool = pool(&settings, &blocks);
            let mut spawner = Spawner::new(&settings);
            let mut positions = Vec::new();
            let mut elapsed = 0.0;
            for _ in 0..8 {
                if let Some(slot) = spawner.update(elapsed, 1.0, &mut pool, &settings, &blocks) {
                    positions.push(pool.get(slot).unwrap().position);
                }
                elapsed += 1.0;
            }
            positions
        };
        assert_eq!(run(), run());
    }

    proptest! {
        #[test]
        fn prop_cadence_non_increasing_and_floored(ticks in proptest::collection::vec(0.0f32..5.0, 1..300)) {
            let settings = SpawnerSettings::default();
            let mut cadence = SpawnCadence::new(&settings);
            let mut last = cadence.period();
            for dt in ticks {
                cadence.advance(dt);
                prop_assert!(cadence.period() <= last);
                prop_assert!(cadence.period() >= settings.min_spawn_rate);
                last = cadence.period();
            }
        }
    }
}
