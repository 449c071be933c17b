//! Pooled blocks flying at the player

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::BodyTag;
use super::mesh::ConvexMesh;
use super::pool::Poolable;
use crate::settings::{BlockSettings, SpawnPoint};

/// What happened to a block this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// Still flying
    InFlight,
    /// Crossed the player's depth plane and went back to the pool
    Missed { penalty: i64 },
}

/// Speed shared by every active block at a given point in the round
#[inline]
pub fn block_speed(base_speed: f32, speed_divisor: f32, elapsed: f32) -> f32 {
    base_speed + elapsed / speed_divisor
}

/// A block entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Pool slot
    pub slot: usize,
    pub active: bool,
    pub position: Vec3,
    pub rotation: Quat,
    pub speed: f32,
    /// Blade was overlapping last tick (contact fires on enter only)
    pub touching_weapon: bool,
    /// Local-space collision hull
    pub hull: ConvexMesh,
}

impl Block {
    pub fn new(slot: usize, settings: &BlockSettings) -> Self {
        Self {
            slot,
            active: false,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            speed: settings.base_speed,
            touching_weapon: false,
            hull: ConvexMesh::cuboid(settings.half_extents),
        }
    }

    pub const fn tag(&self) -> BodyTag {
        BodyTag::Sliceable
    }

    /// Place at a spawn point and put into play
    pub fn activate(&mut self, spawn: &SpawnPoint, settings: &BlockSettings) {
        self.position = spawn.position;
        self.rotation = spawn.rotation;
        self.speed = settings.base_speed;
        self.touching_weapon = false;
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.touching_weapon = false;
    }

    /// Hull in world space
    pub fn world_hull(&self) -> ConvexMesh {
        self.hull.transformed(self.rotation, self.position)
    }

    /// Move toward the player. Only call while the block and round are active.
    pub fn advance(
        &mut self,
        elapsed: f32,
        player: Vec3,
        dt: f32,
        settings: &BlockSettings,
    ) -> BlockOutcome {
        self.speed = block_speed(settings.base_speed, settings.speed_divisor, elapsed);

        let direction = (player - self.position).normalize_or_zero();
        self.position += direction * self.speed * dt;

        if self.position.z <= player.z {
            self.deactivate();
            return BlockOutcome::Missed {
                penalty: settings.miss_penalty,
            };
        }
        BlockOutcome::InFlight
    }

    /// Report whether a body is touching this block this tick.
    ///
    /// Returns the reward when the weapon starts touching. The block stays in
    /// play; it only leaves the pool when it is sliced or missed.
    pub fn contact(&mut self, other: BodyTag, touching: bool, settings: &BlockSettings) -> Option<i64> {
        if other != BodyTag::Weapon {
            return None;
        }
        let entered = touching && !self.touching_weapon;
        self.touching_weapon = touching;
        entered.then_some(settings.hit_reward)
    }
}

impl Poolable for Block {
    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn spawned(z: f32) -> (Block, BlockSettings) {
        let settings = BlockSettings::default();
        let mut block = Block::new(0, &settings);
        block.activate(&SpawnPoint::new(Vec3::new(0.0, 1.0, z)), &settings);
        (block, settings)
    }

    #[test]
    fn test_speed_at_forty_seconds() {
        let (mut block, settings) = spawned(20.0);
        block.advance(40.0, Vec3::new(0.0, 1.0, 0.0), 0.01, &settings);
        assert_eq!(block.speed, settings.base_speed + 2.0);
    }

    #[test]
    fn test_moves_toward_player() {
        let (mut block, settings) = spawned(20.0);
        let outcome = block.advance(0.0, Vec3::new(0.0, 1.0, 0.0), 1.0, &settings);
        assert_eq!(outcome, BlockOutcome::InFlight);
        assert!((block.position.z - 15.0).abs() < 1e-5);
        assert!(block.active);
    }

    #[test]
    fn test_miss_penalizes_and_deactivates() {
        let (mut block, settings) = spawned(0.5);
        let outcome = block.advance(0.0, Vec3::new(0.0, 1.0, 0.0), 1.0, &settings);
        assert_eq!(outcome, BlockOutcome::Missed { penalty: -5 });
        assert!(!block.active);
    }

    #[test]
    fn test_activation_resets_speed() {
        let (mut block, settings) = spawned(20.0);
        block.advance(100.0, Vec3::ZERO, 0.01, &settings);
        assert!(block.speed > settings.base_speed);
        block.activate(&SpawnPoint::new(Vec3::new(0.0, 0.0, 20.0)), &settings);
        assert_eq!(block.speed, settings.base_speed);
    }

    #[test]
    fn test_weapon_contact_scores_on_enter_only() {
        let (mut block, settings) = spawned(20.0);
        assert_eq!(block.contact(BodyTag::Weapon, true, &settings), Some(10));
        assert_eq!(block.contact(BodyTag::Weapon, true, &settings), None);
        assert_eq!(block.contact(BodyTag::Weapon, false, &settings), None);
        assert_eq!(block.contact(BodyTag::Weapon, true, &settings), Some(10));
        // Weapon hit does not end the block
        assert!(block.active);
    }

    #[test]
    fn test_non_weapon_contact_ignored() {
        let (mut block, settings) = spawned(20.0);
        assert_eq!(block.contact(BodyTag::Debris, true, &settings), None);
        assert_eq!(block.contact(BodyTag::Sliceable, true, &settings), None);
    }

    #[test]
    fn test_world_hull_follows_position() {
        let (block, _) = spawned(20.0);
        let center = block.world_hull().centroid();
        assert!(center.distance(Vec3::new(0.0, 1.0, 20.0)) < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_speed_is_shared_formula(elapsed in 0.0f32..200.0, z1 in 5.0f32..30.0, z2 in 5.0f32..30.0) {
            let settings = BlockSettings::default();
            let mut a = Block::new(0, &settings);
            let mut b = Block::new(1, &settings);
            a.activate(&SpawnPoint::new(Vec3::new(-1.0, 1.0, z1)), &settings);
            b.activate(&SpawnPoint::new(Vec3::new(1.0, 1.0, z2)), &settings);
            a.advance(elapsed, Vec3::ZERO, 0.001, &settings);
            b.advance(elapsed, Vec3::ZERO, 0.001, &settings);
            prop_assert_eq!(a.speed, b.speed);
            prop_assert_eq!(a.speed, settings.base_speed + elapsed / 20.0);
        }
    }
}
