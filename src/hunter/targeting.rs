//! Target selection and spawn placement helpers.

use glam::Vec3;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::SpawnArea;
use crate::constants::SPAWN_EDGES;
use crate::vector_math::random_point_in_disk;

/// A selected target with its distance from the search origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<K> {
    /// Identifies the candidate in its source collection.
    pub key: K,
    /// Where the candidate is.
    pub position: Vec3,
    /// Distance from the search origin.
    pub distance: f32,
}

/// Scans `candidates` for the one closest to `origin`.
///
/// Only candidates at most `radius` away qualify when a radius is given.
/// Comparison is strict, so among equally distant candidates the first in
/// scan order wins.
pub fn nearest_candidate<K, I>(candidates: I, origin: Vec3, radius: Option<f32>) -> Option<Candidate<K>>
where
    I: IntoIterator<Item = (K, Vec3)>,
{
    let mut best: Option<Candidate<K>> = None;
    for (key, position) in candidates {
        let distance = origin.distance(position);
        if radius.is_some_and(|limit| distance > limit) {
            continue;
        }
        if best.as_ref().is_none_or(|current| distance < current.distance) {
            best = Some(Candidate {
                key,
                position,
                distance,
            });
        }
    }
    best
}

/// Index and position of the point in `points` nearest to `origin`.
#[must_use]
pub fn nearest_point(origin: Vec3, points: &[Vec3]) -> Option<Candidate<usize>> {
    nearest_candidate(points.iter().copied().enumerate(), origin, None)
}

/// Picks a hunter spawn position from `area`.
///
/// Returns `None` when the area has no points to choose from.
pub fn spawn_position<R: Rng + ?Sized>(area: &SpawnArea, rng: &mut R) -> Option<Vec3> {
    match area {
        SpawnArea::Edges => {
            let (start, end) = SPAWN_EDGES.choose(rng)?;
            Some(start.lerp(*end, rng.gen::<f32>()))
        }
        SpawnArea::Points { points } => points.choose(rng).copied(),
        SpawnArea::Ring { center, radius } => Some(random_point_in_disk(*center, *radius, rng)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    #[rstest]
    fn ties_keep_first_in_scan_order() {
        let points = [Vec3::X, Vec3::NEG_X, Vec3::Z];
        let found = nearest_point(Vec3::ZERO, &points).expect("points are non-empty");
        assert_eq!(found.key, 0);
    }

    #[rstest]
    fn picks_strictly_closer_later_candidate() {
        let points = [
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(8.0, 0.0, 0.0),
        ];
        let found = nearest_point(Vec3::ZERO, &points).expect("points are non-empty");
        assert_eq!(found.key, 1);
        assert!((found.distance - 2.0).abs() < f32::EPSILON);
    }

    #[rstest]
    #[case(Some(1.9), None)]
    #[case(Some(2.0), Some('b'))]
    #[case(None, Some('b'))]
    fn radius_is_inclusive(#[case] radius: Option<f32>, #[case] expected: Option<char>) {
        let candidates = [('a', Vec3::new(3.0, 0.0, 0.0)), ('b', Vec3::new(0.0, 0.0, 2.0))];
        let found = nearest_candidate(candidates, Vec3::ZERO, radius).map(|c| c.key);
        assert_eq!(found, expected);
    }

    #[rstest]
    fn empty_point_set_has_no_spawn() {
        let mut rng = StdRng::seed_from_u64(1);
        let area = SpawnArea::Points { points: Vec::new() };
        assert!(spawn_position(&area, &mut rng).is_none());
        assert!(nearest_point(Vec3::ZERO, &[]).is_none());
    }

    #[rstest]
    fn edge_spawns_lie_on_an_edge() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let pos = spawn_position(&SpawnArea::Edges, &mut rng).expect("edges always yield");
            let on_edge = SPAWN_EDGES.iter().any(|(start, end)| {
                let min = start.min(*end) - Vec3::splat(1e-3);
                let max = start.max(*end) + Vec3::splat(1e-3);
                pos.cmpge(min).all() && pos.cmple(max).all()
            });
            assert!(on_edge, "{pos} is not on a spawn edge");
        }
    }
}
