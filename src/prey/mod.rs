//! Prey entities roaming the field.
//!
//! Hunters never hold a prey directly. They keep a [`PreyId`] and resolve it
//! through a [`PreyLocator`] each time they need a position, so a prey that
//! was removed is detected structurally as "absent".

mod patrol;
mod registry;
mod spawner;

use glam::Vec3;

pub use patrol::Patrol;
pub use registry::{Prey, PreyRegistry};
pub use spawner::spawn_initial_prey;

use crate::hunter::targeting::{nearest_candidate, Candidate};

/// Generational handle into a [`PreyRegistry`].
///
/// A handle whose prey was removed never resolves again, even after its slot
/// is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreyId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Read-only view over living prey used by targeting.
///
/// The default nearest-prey search is an O(n) scan over [`Self::living`].
/// Implementations backed by a spatial index may override
/// [`Self::nearest_within`] as long as they keep its contract: the closest
/// prey within `radius` wins, ties keep the first in enumeration order.
pub trait PreyLocator {
    /// Living prey and their positions in enumeration order.
    fn living(&self) -> Box<dyn Iterator<Item = (PreyId, Vec3)> + '_>;

    /// Current position of `id`, or `None` if the prey is gone.
    fn position_of(&self, id: PreyId) -> Option<Vec3>;

    /// Closest living prey within `radius` of `origin`.
    fn nearest_within(&self, origin: Vec3, radius: f32) -> Option<Candidate<PreyId>> {
        nearest_candidate(self.living(), origin, Some(radius))
    }

    /// Closest living prey at any distance.
    fn nearest(&self, origin: Vec3) -> Option<Candidate<PreyId>> {
        nearest_candidate(self.living(), origin, None)
    }
}
