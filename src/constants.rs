//! Default tunables for hunters, prey and the spawn loop.
//!
//! These values reproduce the pacing of the shipped game. Every one of them
//! can be overridden through [`crate::config::SessionConfig`].
use glam::Vec3;

/// Hunter speed while walking to a fixed point, in units per second.
pub const WALK_SPEED: f32 = 2.0;
/// Hunter speed while chasing a live prey.
pub const HUNTING_SPEED: f32 = 3.5;
/// Maximum distance at which a hunter may acquire a prey.
pub const DETECTION_RADIUS: f32 = 30.0;
/// Proximity that counts as a catch.
pub const CATCH_DISTANCE: f32 = 1.5;
/// Seconds between re-reads of a hunted prey's live position.
pub const TARGET_REFRESH_SECONDS: f32 = 0.5;
/// Live prey distance, as a multiple of the detection radius, beyond which a
/// hunter drops its prey and re-acquires the nearest one.
pub const PURSUIT_ABANDON_FACTOR: f32 = 2.0;
/// Seconds a falling hunter lingers before it is removed.
pub const FALL_DESTROY_SECONDS: f32 = 2.0;
/// Magnitude of the downward impulse applied when a hunter starts falling.
pub const FALL_IMPULSE: f32 = 2.0;
/// Gravity used by the default kinematic body.
pub const GRAVITY: f32 = -9.81;

/// Delay before the first spawn poll of a session.
pub const INITIAL_SPAWN_DELAY_SECONDS: f32 = 1.0;
/// Interval between spawn polls.
pub const SPAWN_POLL_SECONDS: f32 = 2.0;
/// Lifetime of an unresolved hunter before it costs a prey.
pub const HUNTER_TIMEOUT_SECONDS: f32 = 30.0;
/// Cooldown after a hunter is resolved.
pub const RESPAWN_DELAY_SECONDS: f32 = 5.0;
/// Simulated seconds advanced by one frame of the Bevy plugin.
pub const TICK_SECONDS: f32 = 0.1;

/// Prey placed at session start.
pub const PREY_COUNT: usize = 5;
/// Half extent of the jitter applied around configured prey spawn areas.
pub const PREY_SPAWN_JITTER: f32 = 10.0;
/// Half extent of the square used when no prey spawn areas are configured.
pub const PREY_DEFAULT_HALF_EXTENT: f32 = 20.0;
/// How far from home a prey roams.
pub const PATROL_RADIUS: f32 = 10.0;
/// Rest between patrol legs.
pub const PATROL_WAIT_SECONDS: f32 = 3.0;
/// Prey walking speed.
pub const PATROL_SPEED: f32 = 1.5;
/// Distance at which a patrolling prey considers its destination reached.
pub const PATROL_STOPPING_DISTANCE: f32 = 0.05;

/// Name given to the first hunter of a session.
pub const FIRST_HUNTER_NAME: &str = "FirstHunter";

/// Edges of the play field where hunters appear, as `(start, end)` segments.
///
/// A spawn picks one edge uniformly and then a uniform point along it.
pub const SPAWN_EDGES: [(Vec3, Vec3); 4] = [
    (Vec3::new(-74.0, 0.0, -24.0), Vec3::new(-27.0, 0.0, -24.0)),
    (Vec3::new(-74.0, 0.0, -24.0), Vec3::new(-74.0, 0.0, 74.0)),
    (Vec3::new(-74.0, 0.0, 74.0), Vec3::new(24.0, 0.0, 74.0)),
    (Vec3::new(24.0, 0.0, 29.0), Vec3::new(24.0, 0.0, 74.0)),
];
