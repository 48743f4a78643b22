//! Basic vector math helpers for steering hunters and prey.
use glam::{Quat, Vec3};
use rand::Rng;

/// Moves `current` towards `target` by at most `max_delta` without
/// overshooting.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use komodo_guard::vector_math::move_towards;
/// let next = move_towards(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 4.0);
/// assert!((next.x - 4.0).abs() < f32::EPSILON);
/// let arrived = move_towards(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 4.0);
/// assert_eq!(arrived, Vec3::new(1.0, 0.0, 0.0));
/// ```
#[must_use]
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let offset = target - current;
    let distance = offset.length();
    if !distance.is_finite() || distance <= max_delta || distance == 0.0 {
        return target;
    }
    current + offset / distance * max_delta.max(0.0)
}

/// Returns the yaw rotation that turns the local `+Z` axis to face
/// `direction` on the ground plane.
///
/// The vertical component is ignored. Returns `None` when the planar
/// direction is zero or not finite, leaving the caller's orientation as is.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use komodo_guard::vector_math::facing;
/// let rotation = facing(Vec3::X).unwrap();
/// assert!((rotation * Vec3::Z - Vec3::X).length() < 1e-5);
/// assert!(facing(Vec3::Y).is_none());
/// ```
#[must_use]
pub fn facing(direction: Vec3) -> Option<Quat> {
    let planar = Vec3::new(direction.x, 0.0, direction.z).try_normalize()?;
    Some(Quat::from_rotation_y(planar.x.atan2(planar.z)))
}

/// Uniform random point inside the horizontal disk of `radius` around
/// `center`. The height of `center` is kept.
pub fn random_point_in_disk<R: Rng + ?Sized>(center: Vec3, radius: f32, rng: &mut R) -> Vec3 {
    if radius <= 0.0 || !radius.is_finite() {
        return center;
    }
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let distance = radius * rng.gen::<f32>().sqrt();
    center + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}
