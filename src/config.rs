//! Session configuration loaded from JSON.
//!
//! Every section defaults to the standard game tuning, so a config file
//! only needs to name the values it changes:
//!
//! ```
//! use komodo_guard::config::{SessionConfig, TargetingMode};
//! let config = SessionConfig::from_json_str(r#"{ "coordinator": { "hunter_timeout": 12.0 } }"#)
//!     .expect("config should parse");
//! assert_eq!(config.coordinator.hunter_timeout, 12.0);
//! assert_eq!(config.coordinator.targeting, TargetingMode::DirectHunting);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CATCH_DISTANCE, DETECTION_RADIUS, FALL_DESTROY_SECONDS, FALL_IMPULSE, HUNTER_TIMEOUT_SECONDS,
    HUNTING_SPEED, INITIAL_SPAWN_DELAY_SECONDS, PATROL_RADIUS, PATROL_SPEED, PATROL_WAIT_SECONDS,
    PREY_COUNT, RESPAWN_DELAY_SECONDS, SPAWN_POLL_SECONDS, TARGET_REFRESH_SECONDS, TICK_SECONDS,
    WALK_SPEED,
};

/// Failure to obtain a usable [`SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON for [`SessionConfig`].
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value parsed but cannot drive the simulation.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// How a freshly spawned hunter chooses what to pursue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingMode {
    /// Face the nearest prey and start hunting.
    #[default]
    DirectHunting,
    /// Walk to the nearest configured target point.
    FixedPoints,
}

/// Where hunters appear.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnArea {
    /// A uniform point on one of the play field edges.
    #[default]
    Edges,
    /// One of a fixed set of points.
    Points {
        /// Candidate spawn points.
        points: Vec<Vec3>,
    },
    /// A uniform point inside a horizontal disk.
    Ring {
        /// Disk centre.
        center: Vec3,
        /// Disk radius.
        radius: f32,
    },
}

/// Per-hunter tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HunterSettings {
    /// Units per second towards a fixed point.
    pub walk_speed: f32,
    /// Units per second while chasing prey.
    pub hunting_speed: f32,
    /// Inclusive prey acquisition range.
    pub detection_radius: f32,
    /// Distance that counts as a catch.
    pub catch_distance: f32,
    /// Seconds between live re-reads of the hunted prey's position.
    pub target_refresh: f32,
    /// Radius of the random walk chosen when no prey is in range.
    pub wander_radius: f32,
    /// Seconds between the start of a fall and removal.
    pub fall_destroy_delay: f32,
    /// Downward impulse at the start of a fall.
    pub fall_impulse: f32,
}

impl Default for HunterSettings {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            hunting_speed: HUNTING_SPEED,
            detection_radius: DETECTION_RADIUS,
            catch_distance: CATCH_DISTANCE,
            target_refresh: TARGET_REFRESH_SECONDS,
            wander_radius: DETECTION_RADIUS,
            fall_destroy_delay: FALL_DESTROY_SECONDS,
            fall_impulse: FALL_IMPULSE,
        }
    }
}

/// Spawn loop, watchdog and cooldown tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorSettings {
    /// Seconds before the first spawn poll.
    pub initial_spawn_delay: f32,
    /// Seconds between spawn polls.
    pub spawn_poll_interval: f32,
    /// Seconds an unresolved hunter may stay before it costs a prey.
    pub hunter_timeout: f32,
    /// Cooldown seconds after a hunter is resolved.
    pub respawn_delay: f32,
    /// How new hunters pick their first goal.
    pub targeting: TargetingMode,
    /// Where new hunters appear.
    pub spawn_area: SpawnArea,
    /// Destinations used by [`TargetingMode::FixedPoints`].
    pub target_points: Vec<Vec3>,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            initial_spawn_delay: INITIAL_SPAWN_DELAY_SECONDS,
            spawn_poll_interval: SPAWN_POLL_SECONDS,
            hunter_timeout: HUNTER_TIMEOUT_SECONDS,
            respawn_delay: RESPAWN_DELAY_SECONDS,
            targeting: TargetingMode::default(),
            spawn_area: SpawnArea::default(),
            target_points: Vec::new(),
        }
    }
}

/// Initial prey population and roaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreySettings {
    /// Prey placed when the session starts.
    pub initial_count: usize,
    /// Centres around which prey are scattered. Empty means the default
    /// square around the origin.
    pub spawn_areas: Vec<Vec3>,
    /// How far from home a prey roams.
    pub patrol_radius: f32,
    /// Seconds a prey rests between legs.
    pub patrol_wait: f32,
    /// Zero keeps prey standing where they spawned.
    pub patrol_speed: f32,
}

impl Default for PreySettings {
    fn default() -> Self {
        Self {
            initial_count: PREY_COUNT,
            spawn_areas: Vec::new(),
            patrol_radius: PATROL_RADIUS,
            patrol_wait: PATROL_WAIT_SECONDS,
            patrol_speed: PATROL_SPEED,
        }
    }
}

/// Complete configuration of one simulation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Hunter tuning.
    pub hunter: HunterSettings,
    /// Spawn loop tuning.
    pub coordinator: CoordinatorSettings,
    /// Prey population.
    pub prey: PreySettings,
    /// Simulated seconds per plugin frame.
    pub tick_seconds: f32,
    /// Seeds every random choice in the session.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hunter: HunterSettings::default(),
            coordinator: CoordinatorSettings::default(),
            prey: PreySettings::default(),
            tick_seconds: TICK_SECONDS,
            seed: 0,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a positive finite number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a non-negative finite number, got {value}"),
        })
    }
}

impl SessionConfig {
    /// Parses a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] when the document is not valid JSON or
    /// does not match the schema.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file, then validates it.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise any
    /// error from [`Self::from_json_str`] or [`Self::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable by the simulation.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hunter = &self.hunter;
        positive("hunter.walk_speed", hunter.walk_speed)?;
        positive("hunter.hunting_speed", hunter.hunting_speed)?;
        positive("hunter.detection_radius", hunter.detection_radius)?;
        positive("hunter.catch_distance", hunter.catch_distance)?;
        positive("hunter.target_refresh", hunter.target_refresh)?;
        non_negative("hunter.wander_radius", hunter.wander_radius)?;
        non_negative("hunter.fall_destroy_delay", hunter.fall_destroy_delay)?;
        non_negative("hunter.fall_impulse", hunter.fall_impulse)?;
        if hunter.catch_distance >= hunter.detection_radius {
            return Err(ConfigError::Invalid {
                field: "hunter.catch_distance",
                reason: "must be smaller than hunter.detection_radius".into(),
            });
        }

        let coordinator = &self.coordinator;
        non_negative(
            "coordinator.initial_spawn_delay",
            coordinator.initial_spawn_delay,
        )?;
        positive(
            "coordinator.spawn_poll_interval",
            coordinator.spawn_poll_interval,
        )?;
        positive("coordinator.hunter_timeout", coordinator.hunter_timeout)?;
        non_negative("coordinator.respawn_delay", coordinator.respawn_delay)?;
        if let SpawnArea::Ring { radius, .. } = coordinator.spawn_area {
            non_negative("coordinator.spawn_area.radius", radius)?;
        }

        non_negative("prey.patrol_radius", self.prey.patrol_radius)?;
        non_negative("prey.patrol_wait", self.prey.patrol_wait)?;
        non_negative("prey.patrol_speed", self.prey.patrol_speed)?;
        positive("tick_seconds", self.tick_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn defaults_follow_standard_pacing() {
        let config = SessionConfig::default();
        assert!((config.coordinator.respawn_delay - 5.0).abs() < f32::EPSILON);
        assert!((config.coordinator.hunter_timeout - 30.0).abs() < f32::EPSILON);
        assert!((config.hunter.walk_speed - 2.0).abs() < f32::EPSILON);
        assert_eq!(config.prey.initial_count, 5);
    }

    #[test]
    fn parses_tagged_spawn_area() {
        let json = r#"{
            "coordinator": {
                "targeting": "fixed_points",
                "target_points": [[1.0, 0.0, 2.0]],
                "spawn_area": { "kind": "ring", "center": [0.0, 0.0, 0.0], "radius": 15.0 }
            }
        }"#;
        let config = SessionConfig::from_json_str(json).expect("config should parse");
        assert_eq!(config.coordinator.targeting, TargetingMode::FixedPoints);
        assert_eq!(
            config.coordinator.target_points,
            vec![Vec3::new(1.0, 0.0, 2.0)]
        );
        assert_eq!(
            config.coordinator.spawn_area,
            SpawnArea::Ring {
                center: Vec3::ZERO,
                radius: 15.0
            }
        );
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = SessionConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = SessionConfig::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[rstest]
    #[case::catch_exceeds_detection(
        r#"{ "hunter": { "catch_distance": 40.0 } }"#,
        "hunter.catch_distance"
    )]
    #[case::zero_poll(
        r#"{ "coordinator": { "spawn_poll_interval": 0.0 } }"#,
        "coordinator.spawn_poll_interval"
    )]
    #[case::negative_respawn(
        r#"{ "coordinator": { "respawn_delay": -1.0 } }"#,
        "coordinator.respawn_delay"
    )]
    #[case::zero_tick(r#"{ "tick_seconds": 0.0 }"#, "tick_seconds")]
    fn validation_names_offending_field(#[case] json: &str, #[case] expected: &str) {
        let config = SessionConfig::from_json_str(json).expect("config should parse");
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected invalid {expected}, got {other:?}"),
        }
    }
}
