//! Physics and presentation seams used by hunters.
//!
//! The hunter core never simulates physics or plays animations itself. It
//! drives a [`MotionBody`] and sends abstract [`AnimationSignal`]s to an
//! [`Animator`]. The defaults here are enough for headless runs and tests.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use glam::Vec3;

use crate::constants::GRAVITY;
use crate::vector_math::move_towards;

/// Movement authority for a hunter.
pub trait MotionBody: Send + Sync {
    /// Moves `from` towards `to` by at most `max_step`.
    fn move_towards(&mut self, from: Vec3, to: Vec3, max_step: f32) -> Vec3 {
        move_towards(from, to, max_step)
    }

    /// Hands position authority to gravity (`true`) or back to the agent.
    ///
    /// Either way the body's velocity is reset.
    fn set_free_fall(&mut self, enabled: bool);

    /// Whether gravity currently owns the position.
    fn is_free_falling(&self) -> bool;

    /// Adds `impulse` to the velocity. Ignored unless free-falling.
    fn apply_impulse(&mut self, impulse: Vec3);

    /// Integrates one step while free-falling and returns the new position.
    fn integrate(&mut self, position: Vec3, dt: Duration) -> Vec3;
}

/// Abstract state signal sent to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationSignal {
    /// Walk cycle on or off.
    Walking(bool),
    /// Fall pose on or off.
    Falling(bool),
}

/// Receiver of animation signals.
pub trait Animator: Send + Sync {
    /// Applies one signal.
    fn signal(&mut self, signal: AnimationSignal);
}

/// Builds a hunter's motion body at spawn.
pub type BodyFactory = Arc<dyn Fn() -> Box<dyn MotionBody> + Send + Sync>;
/// Builds a hunter's animator at spawn.
pub type AnimatorFactory = Arc<dyn Fn() -> Box<dyn Animator> + Send + Sync>;

/// Unit-mass body with constant gravity.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    velocity: Vec3,
    free_fall: bool,
    gravity: f32,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            free_fall: false,
            gravity: GRAVITY,
        }
    }
}

impl KinematicBody {
    /// Current velocity; zero unless free-falling.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }
}

impl MotionBody for KinematicBody {
    fn set_free_fall(&mut self, enabled: bool) {
        self.free_fall = enabled;
        self.velocity = Vec3::ZERO;
    }

    fn is_free_falling(&self) -> bool {
        self.free_fall
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        if self.free_fall {
            self.velocity += impulse;
        }
    }

    fn integrate(&mut self, position: Vec3, dt: Duration) -> Vec3 {
        if !self.free_fall {
            return position;
        }
        let seconds = dt.as_secs_f32();
        self.velocity.y += self.gravity * seconds;
        position + self.velocity * seconds
    }
}

/// Animator that records every signal it receives.
///
/// Clones share the same history, so a test can keep one clone and hand
/// another to a hunter.
#[derive(Clone, Default)]
pub struct SignalRecorder {
    history: Arc<Mutex<Vec<AnimationSignal>>>,
}

impl SignalRecorder {
    /// A recorder with an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals received so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<AnimationSignal> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Factory handing out clones of this recorder.
    #[must_use]
    pub fn factory(&self) -> AnimatorFactory {
        let recorder = self.clone();
        Arc::new(move || Box::new(recorder.clone()) as Box<dyn Animator>)
    }
}

impl fmt::Debug for SignalRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalRecorder")
            .field("signals", &self.history().len())
            .finish()
    }
}

impl Animator for SignalRecorder {
    fn signal(&mut self, signal: AnimationSignal) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(signal);
    }
}

/// Factory for the default [`KinematicBody`].
#[must_use]
pub fn kinematic_body_factory() -> BodyFactory {
    Arc::new(|| Box::new(KinematicBody::default()) as Box<dyn MotionBody>)
}

/// Factory for a fresh, unshared [`SignalRecorder`].
#[must_use]
pub fn signal_recorder_factory() -> AnimatorFactory {
    Arc::new(|| Box::new(SignalRecorder::new()) as Box<dyn Animator>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kinematic_body_ignores_gravity_until_released() {
        let mut body = KinematicBody::default();
        let pos = body.integrate(Vec3::ONE, Duration::from_secs(1));
        assert_eq!(pos, Vec3::ONE);
        body.apply_impulse(Vec3::NEG_Y);
        assert_eq!(body.velocity(), Vec3::ZERO);
    }

    #[test]
    fn free_fall_accelerates_downwards() {
        let mut body = KinematicBody::default();
        body.set_free_fall(true);
        body.apply_impulse(Vec3::NEG_Y * 2.0);
        let pos = body.integrate(Vec3::ZERO, Duration::from_millis(500));
        assert!(pos.y < 0.0);
        assert_relative_eq!(body.velocity().y, -2.0 + GRAVITY * 0.5, epsilon = 1e-5);
    }

    #[test]
    fn recorder_clones_share_history() {
        let recorder = SignalRecorder::new();
        let mut boxed = (recorder.factory())();
        boxed.signal(AnimationSignal::Walking(true));
        assert_eq!(recorder.history(), vec![AnimationSignal::Walking(true)]);
    }
}
