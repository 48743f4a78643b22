//! Slot storage for prey with generational handles.

use glam::Vec3;
use log::debug;

use super::{Patrol, PreyId, PreyLocator};

/// A single prey animal.
#[derive(Debug, Clone, PartialEq)]
pub struct Prey {
    /// Display name, `Komodo_<n>`.
    pub name: String,
    /// World position.
    pub position: Vec3,
    /// Roaming progress.
    pub patrol: Patrol,
}

impl Prey {
    /// Creates a prey that patrols around the point it was placed at.
    #[must_use]
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            patrol: Patrol::new(position),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    prey: Option<Prey>,
}

/// Registry of living prey. Enumeration follows slot order.
#[derive(Debug, Clone, Default)]
pub struct PreyRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    living: usize,
}

impl PreyRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a prey, reusing a vacated slot when one exists.
    pub fn insert(&mut self, prey: Prey) -> PreyId {
        self.living += 1;
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.generation = slot.generation.wrapping_add(1);
                slot.prey = Some(prey);
                return PreyId {
                    index,
                    generation: slot.generation,
                };
            }
        }
        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            prey: Some(prey),
        });
        PreyId {
            index,
            generation: 0,
        }
    }

    /// Removes a prey. Stale handles return `None`.
    pub fn remove(&mut self, id: PreyId) -> Option<Prey> {
        let slot = self.slot_mut(id)?;
        let prey = slot.prey.take()?;
        self.free.push(id.index);
        self.living -= 1;
        debug!("removed prey {}", prey.name);
        Some(prey)
    }

    /// Looks up a living prey.
    #[must_use]
    pub fn get(&self, id: PreyId) -> Option<&Prey> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.prey.as_ref())
    }

    /// Mutable lookup of a living prey.
    pub fn get_mut(&mut self, id: PreyId) -> Option<&mut Prey> {
        self.slot_mut(id).and_then(|slot| slot.prey.as_mut())
    }

    fn slot_mut(&mut self, id: PreyId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
    }

    /// Number of living prey.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.living
    }

    /// Whether no prey is alive.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.living == 0
    }

    /// Living prey in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (PreyId, &Prey)> {
        self.slots.iter().zip(0_u32..).filter_map(|(slot, index)| {
            slot.prey.as_ref().map(|prey| {
                (
                    PreyId {
                        index,
                        generation: slot.generation,
                    },
                    prey,
                )
            })
        })
    }

    /// Mutable iteration in enumeration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PreyId, &mut Prey)> {
        self.slots.iter_mut().zip(0_u32..).filter_map(|(slot, index)| {
            let generation = slot.generation;
            slot.prey
                .as_mut()
                .map(|prey| (PreyId { index, generation }, prey))
        })
    }

    /// Handle of the `n`-th living prey in enumeration order.
    #[must_use]
    pub fn nth_id(&self, n: usize) -> Option<PreyId> {
        self.iter().nth(n).map(|(id, _)| id)
    }
}

impl PreyLocator for PreyRegistry {
    fn living(&self) -> Box<dyn Iterator<Item = (PreyId, Vec3)> + '_> {
        Box::new(self.iter().map(|(id, prey)| (id, prey.position)))
    }

    fn position_of(&self, id: PreyId) -> Option<Vec3> {
        self.get(id).map(|prey| prey.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn registry_with(positions: &[Vec3]) -> (PreyRegistry, Vec<PreyId>) {
        let mut registry = PreyRegistry::new();
        let ids = positions
            .iter()
            .enumerate()
            .map(|(n, pos)| registry.insert(Prey::new(format!("Komodo_{}", n + 1), *pos)))
            .collect();
        (registry, ids)
    }

    #[rstest]
    fn removed_handle_stays_absent_after_slot_reuse() {
        let (mut registry, ids) = registry_with(&[Vec3::ZERO, Vec3::X]);
        let [first, _] = ids.as_slice() else {
            panic!("expected two prey");
        };
        assert!(registry.remove(*first).is_some());
        let replacement = registry.insert(Prey::new("Komodo_3", Vec3::Z));
        assert_ne!(replacement, *first);
        assert!(registry.position_of(*first).is_none());
        assert_eq!(registry.position_of(replacement), Some(Vec3::Z));
        assert_eq!(registry.len(), 2);
    }

    #[rstest]
    fn double_remove_is_noop() {
        let (mut registry, ids) = registry_with(&[Vec3::ZERO]);
        let [only] = ids.as_slice() else {
            panic!("expected one prey");
        };
        assert!(registry.remove(*only).is_some());
        assert!(registry.remove(*only).is_none());
        assert!(registry.is_empty());
    }

    #[rstest]
    fn enumeration_follows_slot_order() {
        let (registry, ids) = registry_with(&[Vec3::X, Vec3::Y, Vec3::Z]);
        let seen: Vec<_> = registry.living().map(|(id, _)| id).collect();
        assert_eq!(seen, ids);
        assert_eq!(registry.nth_id(1), ids.get(1).copied());
    }

    #[rstest]
    fn nearest_scan_picks_closest_in_radius() {
        let (registry, ids) = registry_with(&[
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(8.0, 0.0, 0.0),
        ]);
        let found = registry
            .nearest_within(Vec3::ZERO, 10.0)
            .expect("a prey is in range");
        assert_eq!(Some(found.key), ids.get(1).copied());
        assert!(registry.nearest_within(Vec3::ZERO, 1.0).is_none());
    }
}
