//! Straight-line patrol roaming for prey.
//!
//! A prey picks a random point within the patrol radius of its home, walks
//! there, waits, and repeats. How prey move is not part of the hunter
//! contract; hunters only ever read prey positions.

use std::time::Duration;

use glam::Vec3;
use rand::Rng;

use crate::config::PreySettings;
use crate::constants::PATROL_STOPPING_DISTANCE;
use crate::numeric::duration_from_seconds;
use crate::vector_math::{move_towards, random_point_in_disk};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Leg {
    Moving { destination: Vec3 },
    Waiting { remaining: Duration },
}

/// Patrol progress of a single prey.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patrol {
    home: Vec3,
    leg: Leg,
}

impl Patrol {
    /// A patrol centred on `home` that picks its first destination on the
    /// next update.
    #[must_use]
    pub const fn new(home: Vec3) -> Self {
        Self {
            home,
            leg: Leg::Waiting {
                remaining: Duration::ZERO,
            },
        }
    }

    /// Centre of the patrol area.
    #[must_use]
    pub const fn home(&self) -> Vec3 {
        self.home
    }

    /// Destination of the current leg, if the prey is walking.
    #[must_use]
    pub const fn destination(&self) -> Option<Vec3> {
        match self.leg {
            Leg::Moving { destination } => Some(destination),
            Leg::Waiting { .. } => None,
        }
    }

    /// Advances the patrol by `dt` and returns the new position.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        position: Vec3,
        dt: Duration,
        settings: &PreySettings,
        rng: &mut R,
    ) -> Vec3 {
        if settings.patrol_speed <= 0.0 || settings.patrol_radius <= 0.0 {
            return position;
        }
        match self.leg {
            Leg::Waiting { remaining } => {
                let left = remaining.saturating_sub(dt);
                self.leg = if left.is_zero() {
                    Leg::Moving {
                        destination: random_point_in_disk(self.home, settings.patrol_radius, rng),
                    }
                } else {
                    Leg::Waiting { remaining: left }
                };
                position
            }
            Leg::Moving { destination } => {
                let next = move_towards(
                    position,
                    destination,
                    settings.patrol_speed * dt.as_secs_f32(),
                );
                if next.distance(destination) <= PATROL_STOPPING_DISTANCE {
                    self.leg = Leg::Waiting {
                        remaining: duration_from_seconds(settings.patrol_wait),
                    };
                }
                next
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings(speed: f32) -> PreySettings {
        PreySettings {
            patrol_radius: 4.0,
            patrol_wait: 1.0,
            patrol_speed: speed,
            ..PreySettings::default()
        }
    }

    #[test]
    fn stationary_when_speed_is_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut patrol = Patrol::new(Vec3::ZERO);
        let pos = patrol.step(Vec3::ZERO, Duration::from_secs(1), &settings(0.0), &mut rng);
        assert_eq!(pos, Vec3::ZERO);
        assert!(patrol.destination().is_none());
    }

    #[test]
    fn stays_within_patrol_radius() {
        let mut rng = StdRng::seed_from_u64(3);
        let settings = settings(2.0);
        let mut patrol = Patrol::new(Vec3::ZERO);
        let mut position = Vec3::ZERO;
        let mut moved = false;
        for _ in 0..400 {
            let next = patrol.step(position, Duration::from_millis(100), &settings, &mut rng);
            moved |= next != position;
            position = next;
            assert!(position.distance(patrol.home()) <= 4.0 + 1e-3);
        }
        assert!(moved, "prey should have left its home at least once");
    }

    #[test]
    fn waits_after_arriving() {
        let mut rng = StdRng::seed_from_u64(5);
        let settings = settings(100.0);
        let mut patrol = Patrol::new(Vec3::ZERO);
        let start = patrol.step(Vec3::ZERO, Duration::from_millis(100), &settings, &mut rng);
        assert!(patrol.destination().is_some());
        let arrived = patrol.step(start, Duration::from_millis(100), &settings, &mut rng);
        assert!(patrol.destination().is_none());
        let still = patrol.step(arrived, Duration::from_millis(100), &settings, &mut rng);
        assert_eq!(still, arrived);
    }
}
