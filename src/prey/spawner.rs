//! Initial prey placement.

use glam::Vec3;
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::PreySettings;
use crate::constants::{PREY_DEFAULT_HALF_EXTENT, PREY_SPAWN_JITTER};

use super::{Prey, PreyRegistry};

fn spawn_position<R: Rng + ?Sized>(areas: &[Vec3], rng: &mut R) -> Vec3 {
    match areas.choose(rng) {
        Some(base) => {
            *base
                + Vec3::new(
                    rng.gen_range(-PREY_SPAWN_JITTER..=PREY_SPAWN_JITTER),
                    0.0,
                    rng.gen_range(-PREY_SPAWN_JITTER..=PREY_SPAWN_JITTER),
                )
        }
        None => Vec3::new(
            rng.gen_range(-PREY_DEFAULT_HALF_EXTENT..=PREY_DEFAULT_HALF_EXTENT),
            0.0,
            rng.gen_range(-PREY_DEFAULT_HALF_EXTENT..=PREY_DEFAULT_HALF_EXTENT),
        ),
    }
}

/// Places `settings.initial_count` prey named `Komodo_1..` into `registry`.
///
/// Returns the number of prey placed.
pub fn spawn_initial_prey<R: Rng + ?Sized>(
    registry: &mut PreyRegistry,
    settings: &PreySettings,
    rng: &mut R,
) -> usize {
    if settings.initial_count == 0 {
        warn!("no prey configured; the population starts extinct");
        return 0;
    }
    for n in 1..=settings.initial_count {
        let position = spawn_position(&settings.spawn_areas, rng);
        let prey = Prey::new(format!("Komodo_{n}"), position);
        info!("spawned {} at {position}", prey.name);
        registry.insert(prey);
    }
    info!("{} prey spawned", settings.initial_count);
    settings.initial_count
}
