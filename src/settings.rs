//! Game settings and balance tunables
//!
//! Loaded from a JSON file next to the binary; every field falls back to the
//! shipped default when missing.

use std::fs;
use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File could not be read or written.
    #[error("Failed to access settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing or encoding failed.
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is outside the range the simulation accepts.
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// A fixed location blocks are launched from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub rotation: Quat,
}

impl SpawnPoint {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Round timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Length of a round (seconds)
    pub game_duration: f32,
    /// Delay between a start request and the round going live (seconds)
    pub start_delay: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            game_duration: 120.0,
            start_delay: 10.0,
        }
    }
}

/// Spawner cadence and pool sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerSettings {
    /// Starting spawn period (seconds between blocks)
    pub initial_spawn_rate: f32,
    /// Active play time between cadence steps (seconds)
    pub spawn_rate_increase_interval: f32,
    /// How much the period shrinks at each step (seconds)
    pub spawn_rate_decrease: f32,
    /// Shortest allowed period (seconds)
    pub min_spawn_rate: f32,
    /// Elapsed round time after which nothing new spawns
    pub spawn_cutoff: f32,
    /// Number of pooled blocks
    pub pool_size: usize,
    /// Where blocks appear
    pub spawn_points: Vec<SpawnPoint>,
    /// Spawn RNG seed
    pub seed: u64,
}

impl Default for SpawnerSettings {
    fn default() -> Self {
        Self {
            initial_spawn_rate: 1.0,
            spawn_rate_increase_interval: 15.0,
            spawn_rate_decrease: 0.03,
            min_spawn_rate: 0.3,
            spawn_cutoff: 118.0,
            pool_size: 10,
            spawn_points: vec![
                SpawnPoint::new(Vec3::new(-0.6, 1.0, 20.0)),
                SpawnPoint::new(Vec3::new(0.6, 1.0, 20.0)),
                SpawnPoint::new(Vec3::new(-0.6, 1.6, 20.0)),
                SpawnPoint::new(Vec3::new(0.6, 1.6, 20.0)),
            ],
            seed: 0x5EED,
        }
    }
}

/// Block motion and scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockSettings {
    /// Speed at the start of a round (m/s)
    pub base_speed: f32,
    /// Elapsed seconds per extra m/s of speed
    pub speed_divisor: f32,
    /// Score applied when a block gets past the player
    pub miss_penalty: i64,
    /// Score applied when the weapon strikes a block
    pub hit_reward: i64,
    /// Half size of the block cuboid (m)
    pub half_extents: Vec3,
}

impl Default for BlockSettings {
    fn default() -> Self {
        Self {
            base_speed: 5.0,
            speed_divisor: 20.0,
            miss_penalty: -5,
            hit_reward: 10,
            half_extents: Vec3::splat(0.2),
        }
    }
}

/// Slicing and debris
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicerSettings {
    /// Explosion force applied to each hull
    pub explosion_force: f32,
    /// Explosion falloff radius (m)
    pub explosion_radius: f32,
    /// Seconds before a hull is removed
    pub debris_lifetime: f32,
    /// Frames averaged by the blade velocity estimator
    pub velocity_average_frames: usize,
}

impl Default for SlicerSettings {
    fn default() -> Self {
        Self {
            explosion_force: 200.0,
            explosion_radius: 1.0,
            debris_lifetime: 2.5,
            velocity_average_frames: 5,
        }
    }
}

/// All game tunables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub session: SessionSettings,
    pub spawner: SpawnerSettings,
    pub block: BlockSettings,
    pub slicer: SlicerSettings,
}

impl Settings {
    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e} - using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Check the values the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), SettingsError> {
            Err(SettingsError::Invalid { field, reason })
        }

        if self.session.game_duration <= 0.0 {
            return invalid("session.game_duration", "must be positive");
        }
        if self.session.start_delay < 0.0 {
            return invalid("session.start_delay", "must not be negative");
        }

        let spawner = &self.spawner;
        if spawner.pool_size == 0 {
            return invalid("spawner.pool_size", "must be at least 1");
        }
        if spawner.spawn_points.is_empty() {
            return invalid("spawner.spawn_points", "needs at least one point");
        }
        if spawner.min_spawn_rate <= 0.0 {
            return invalid("spawner.min_spawn_rate", "must be positive");
        }
        if spawner.initial_spawn_rate < spawner.min_spawn_rate {
            return invalid("spawner.initial_spawn_rate", "must not be below min_spawn_rate");
        }
        if spawner.spawn_rate_increase_interval <= 0.0 {
            return invalid("spawner.spawn_rate_increase_interval", "must be positive");
        }
        if spawner.spawn_rate_decrease < 0.0 {
            return invalid("spawner.spawn_rate_decrease", "must not be negative");
        }

        if self.block.speed_divisor <= 0.0 {
            return invalid("block.speed_divisor", "must be positive");
        }
        if self.block.half_extents.min_element() <= 0.0 {
            return invalid("block.half_extents", "must be positive on every axis");
        }

        if self.slicer.explosion_radius <= 0.0 {
            return invalid("slicer.explosion_radius", "must be positive");
        }
        if self.slicer.velocity_average_frames == 0 {
            return invalid("slicer.velocity_average_frames", "must be at least 1");
        }
        if self.slicer.debris_lifetime < 0.0 {
            return invalid("slicer.debris_lifetime", "must not be negative");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.spawner.pool_size, 10);
        assert_eq!(settings.spawner.spawn_points.len(), 4);
        assert_eq!(settings.slicer.debris_lifetime, 2.5);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "spawner": { "pool_size": 3 } }"#).unwrap();
        assert_eq!(settings.spawner.pool_size, 3);
        assert_eq!(settings.spawner.initial_spawn_rate, 1.0);
        assert_eq!(settings.session.game_duration, 120.0);
    }

    #[test]
    fn test_rejects_empty_pool() {
        let err = Settings::from_json(r#"{ "spawner": { "pool_size": 0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "spawner.pool_size",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_floor_above_initial_rate() {
        let mut settings = Settings::default();
        settings.spawner.min_spawn_rate = 2.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("blade_rush_settings_{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.session.start_delay = 3.0;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.session.start_delay, 3.0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/definitely/not/here.json");
        assert_eq!(settings.session.game_duration, 120.0);
    }
}
