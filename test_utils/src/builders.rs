//! Deterministic session fixtures.

use glam::Vec3;
use komodo_guard::config::{PreySettings, SessionConfig, SpawnArea, TargetingMode};
use komodo_guard::prey::{Prey, PreyRegistry};
use komodo_guard::Habitat;

/// Prey settings for `count` prey that never move.
pub fn still_prey(count: usize) -> PreySettings {
    PreySettings {
        initial_count: count,
        patrol_speed: 0.0,
        ..PreySettings::default()
    }
}

/// Habitat holding stationary prey at exactly `positions`, named
/// `Komodo_1..` in order.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use komodo_guard::PopulationTracker;
/// use test_utils::habitat_with;
/// let habitat = habitat_with(&[Vec3::X, Vec3::Z]);
/// assert_eq!(habitat.current_count(), 2);
/// ```
pub fn habitat_with(positions: &[Vec3]) -> Habitat {
    let mut registry = PreyRegistry::new();
    for (n, position) in positions.iter().enumerate() {
        registry.insert(Prey::new(format!("Komodo_{}", n + 1), *position));
    }
    Habitat::with_registry(registry, still_prey(positions.len()), 7)
}

/// Fluent builder over [`SessionConfig`] with a deterministic spawn point.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: SessionConfig,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Defaults, except hunters always spawn at the origin and prey stand
    /// still.
    pub fn new() -> Self {
        let mut config = SessionConfig::default();
        config.coordinator.spawn_area = SpawnArea::Points {
            points: vec![Vec3::ZERO],
        };
        config.prey = still_prey(config.prey.initial_count);
        Self { config }
    }

    pub fn spawn_at(mut self, point: Vec3) -> Self {
        self.config.coordinator.spawn_area = SpawnArea::Points {
            points: vec![point],
        };
        self
    }

    pub fn initial_delay(mut self, seconds: f32) -> Self {
        self.config.coordinator.initial_spawn_delay = seconds;
        self
    }

    pub fn poll_interval(mut self, seconds: f32) -> Self {
        self.config.coordinator.spawn_poll_interval = seconds;
        self
    }

    pub fn hunter_timeout(mut self, seconds: f32) -> Self {
        self.config.coordinator.hunter_timeout = seconds;
        self
    }

    pub fn respawn_delay(mut self, seconds: f32) -> Self {
        self.config.coordinator.respawn_delay = seconds;
        self
    }

    /// Legacy targeting towards `points`.
    pub fn fixed_points(mut self, points: Vec<Vec3>) -> Self {
        self.config.coordinator.targeting = TargetingMode::FixedPoints;
        self.config.coordinator.target_points = points;
        self
    }

    pub fn detection_radius(mut self, radius: f32) -> Self {
        self.config.hunter.detection_radius = radius;
        self.config.hunter.wander_radius = radius;
        self
    }

    pub fn catch_distance(mut self, distance: f32) -> Self {
        self.config.hunter.catch_distance = distance;
        self
    }

    pub fn prey_count(mut self, count: usize) -> Self {
        self.config.prey.initial_count = count;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn build(self) -> SessionConfig {
        self.config
    }
}
