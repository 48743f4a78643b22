//! Prey population bookkeeping.
//!
//! The coordinator is the only caller of [`PopulationTracker`]. Hunters
//! report catches to the coordinator and never touch the count themselves.

use std::time::Duration;

use glam::Vec3;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PreySettings;
use crate::prey::{spawn_initial_prey, PreyId, PreyLocator, PreyRegistry};

/// Live prey count with capture bookkeeping.
#[cfg_attr(test, mockall::automock)]
pub trait PopulationTracker {
    /// Removes one prey from the population, if any remain.
    fn decrement(&mut self);

    /// Number of prey still alive.
    fn current_count(&self) -> usize;

    /// Removes the specific prey a hunter caught.
    ///
    /// Implementations without per-prey identity fall back to
    /// [`Self::decrement`].
    fn capture(&mut self, _prey: PreyId) {
        self.decrement();
    }

    /// Whether the population has reached zero.
    fn is_extinct(&self) -> bool {
        self.current_count() == 0
    }
}

/// The prey registry plus everything needed to shrink it.
///
/// `Habitat` is both the [`PreyLocator`] hunters search and the
/// [`PopulationTracker`] the coordinator decrements.
#[derive(Debug, Clone)]
pub struct Habitat {
    registry: PreyRegistry,
    settings: PreySettings,
    rng: StdRng,
    extinction_reported: bool,
    extinction_pending: bool,
}

impl Habitat {
    /// Builds a habitat populated according to `settings`.
    #[must_use]
    pub fn populate(settings: PreySettings, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut registry = PreyRegistry::new();
        spawn_initial_prey(&mut registry, &settings, &mut rng);
        Self::from_registry(registry, settings, rng)
    }

    /// Wraps an existing registry, for hand-placed prey.
    #[must_use]
    pub fn with_registry(registry: PreyRegistry, settings: PreySettings, seed: u64) -> Self {
        Self::from_registry(registry, settings, StdRng::seed_from_u64(seed))
    }

    fn from_registry(registry: PreyRegistry, settings: PreySettings, rng: StdRng) -> Self {
        let mut habitat = Self {
            registry,
            settings,
            rng,
            extinction_reported: false,
            extinction_pending: false,
        };
        habitat.recount();
        habitat
    }

    /// Living prey.
    #[must_use]
    pub const fn registry(&self) -> &PreyRegistry {
        &self.registry
    }

    /// Mutable access to the living prey.
    pub const fn registry_mut(&mut self) -> &mut PreyRegistry {
        &mut self.registry
    }

    /// Prey tuning in effect.
    #[must_use]
    pub const fn settings(&self) -> &PreySettings {
        &self.settings
    }

    /// Moves a prey, e.g. on behalf of an external navigation system.
    ///
    /// Returns `false` if the prey is gone.
    pub fn relocate(&mut self, id: PreyId, position: Vec3) -> bool {
        let Some(prey) = self.registry.get_mut(id) else {
            return false;
        };
        prey.position = position;
        true
    }

    /// Advances every prey's patrol by `dt`.
    pub fn update(&mut self, dt: Duration) {
        let Self {
            registry,
            settings,
            rng,
            ..
        } = self;
        for (_, prey) in registry.iter_mut() {
            prey.position = prey.patrol.step(prey.position, dt, settings, rng);
        }
    }

    /// Returns `true` exactly once after the population first hits zero.
    pub fn take_extinction(&mut self) -> bool {
        std::mem::take(&mut self.extinction_pending)
    }

    fn recount(&mut self) {
        let count = self.registry.len();
        info!("komodo population: {count}");
        if count == 0 && !self.extinction_reported {
            self.extinction_reported = true;
            self.extinction_pending = true;
            warn!("game over: the komodo population is extinct");
        }
    }
}

impl PreyLocator for Habitat {
    fn living(&self) -> Box<dyn Iterator<Item = (PreyId, Vec3)> + '_> {
        self.registry.living()
    }

    fn position_of(&self, id: PreyId) -> Option<Vec3> {
        self.registry.position_of(id)
    }
}

impl PopulationTracker for Habitat {
    fn decrement(&mut self) {
        let count = self.registry.len();
        if count == 0 {
            warn!("population decrement requested with no prey left");
            return;
        }
        let victim = self.rng.gen_range(0..count);
        if let Some(id) = self.registry.nth_id(victim) {
            if let Some(prey) = self.registry.remove(id) {
                info!("{} was taken by a hunter", prey.name);
            }
        }
        self.recount();
    }

    fn current_count(&self) -> usize {
        self.registry.len()
    }

    fn capture(&mut self, prey: PreyId) {
        match self.registry.remove(prey) {
            Some(caught) => {
                info!("{} was caught", caught.name);
                self.recount();
            }
            None => self.decrement(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prey::Prey;
    use rstest::{fixture, rstest};

    #[fixture]
    fn habitat() -> Habitat {
        let mut registry = PreyRegistry::new();
        for n in 0..3_u8 {
            registry.insert(Prey::new(format!("Komodo_{n}"), Vec3::splat(f32::from(n))));
        }
        Habitat::with_registry(registry, PreySettings::default(), 42)
    }

    #[rstest]
    fn decrement_removes_exactly_one(mut habitat: Habitat) {
        habitat.decrement();
        assert_eq!(habitat.current_count(), 2);
    }

    #[rstest]
    fn capture_removes_the_caught_prey(mut habitat: Habitat) {
        let id = habitat.registry().nth_id(1).expect("three prey exist");
        habitat.capture(id);
        assert_eq!(habitat.current_count(), 2);
        assert!(habitat.position_of(id).is_none());
    }

    #[rstest]
    fn capture_of_vanished_prey_still_decrements(mut habitat: Habitat) {
        let id = habitat.registry().nth_id(0).expect("three prey exist");
        habitat.registry_mut().remove(id);
        habitat.capture(id);
        assert_eq!(habitat.current_count(), 1);
    }

    #[rstest]
    fn extinction_is_signalled_once(mut habitat: Habitat) {
        for _ in 0..3 {
            assert!(!habitat.take_extinction());
            habitat.decrement();
        }
        assert!(habitat.is_extinct());
        assert!(habitat.take_extinction());
        habitat.decrement();
        assert!(!habitat.take_extinction());
        assert_eq!(habitat.current_count(), 0);
    }

    #[rstest]
    fn relocate_moves_living_prey_only(mut habitat: Habitat) {
        let id = habitat.registry().nth_id(2).expect("three prey exist");
        assert!(habitat.relocate(id, Vec3::new(4.0, 0.0, 4.0)));
        assert_eq!(habitat.position_of(id), Some(Vec3::new(4.0, 0.0, 4.0)));
        habitat.registry_mut().remove(id);
        assert!(!habitat.relocate(id, Vec3::ZERO));
    }

    struct Headcount(usize);

    impl PopulationTracker for Headcount {
        fn decrement(&mut self) {
            self.0 = self.0.saturating_sub(1);
        }

        fn current_count(&self) -> usize {
            self.0
        }
    }

    #[rstest]
    fn anonymous_trackers_count_a_capture_as_a_decrement(habitat: Habitat) {
        let caught = habitat.registry().nth_id(0).expect("three prey exist");
        let mut tracker = Headcount(2);
        tracker.capture(caught);
        assert_eq!(tracker.current_count(), 1);
        tracker.capture(caught);
        assert!(tracker.is_extinct());
    }

    #[rstest]
    fn populate_spawns_configured_count() {
        let habitat = Habitat::populate(PreySettings::default(), 5);
        assert_eq!(habitat.current_count(), PreySettings::default().initial_count);
    }
}
