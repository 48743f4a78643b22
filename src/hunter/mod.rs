//! Hunters and the coordinator that spawns, times out and retires them.
//!
//! [`HunterAgent`] is the per-hunter state machine
//! (`Idle -> Walking/Hunting -> Falling -> Destroyed`). [`HunterCoordinator`]
//! keeps at most one hunter active, arms its timeout watchdog, and gates
//! respawns behind a cooldown. All waiting is expressed as [`HunterTask`]s
//! parked in the session's [`Scheduler`](crate::scheduler::Scheduler).

mod agent;
mod coordinator;
pub mod targeting;

use std::fmt;
use std::time::Duration;

use glam::Vec3;

pub use agent::{Behaviour, HunterAgent, HunterParts, HunterState};
pub use coordinator::{
    CoordinatorState, HunterCoordinator, HunterTemplate, HuntingGround, ReportOutcome, SkipReason,
    SpawnOutcome,
};

use crate::config::HunterSettings;
use crate::numeric::duration_from_seconds;
use crate::prey::PreyId;
use crate::scheduler::Scheduler;

/// Scheduler queue type used by hunters and the coordinator.
pub type HunterScheduler = Scheduler<HunterTask>;

/// Session-unique hunter identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HunterId(pub u64);

impl fmt::Display for HunterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Movement and timing parameters copied into each hunter at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HunterParams {
    /// Speed towards a fixed point.
    pub walk_speed: f32,
    /// Speed while chasing prey.
    pub hunting_speed: f32,
    /// Inclusive range for acquiring prey.
    pub detection_radius: f32,
    /// Distance at which a chase ends in a capture.
    pub catch_distance: f32,
    /// Interval between target refreshes.
    pub target_refresh: Duration,
    /// Radius of the disk wander points are drawn from.
    pub wander_radius: f32,
    /// Delay between falling and removal.
    pub fall_destroy_delay: Duration,
    /// Downward impulse applied when falling starts.
    pub fall_impulse: f32,
}

impl From<&HunterSettings> for HunterParams {
    fn from(settings: &HunterSettings) -> Self {
        Self {
            walk_speed: settings.walk_speed,
            hunting_speed: settings.hunting_speed,
            detection_radius: settings.detection_radius,
            catch_distance: settings.catch_distance,
            target_refresh: duration_from_seconds(settings.target_refresh),
            wander_radius: settings.wander_radius,
            fall_destroy_delay: duration_from_seconds(settings.fall_destroy_delay),
            fall_impulse: settings.fall_impulse,
        }
    }
}

impl Default for HunterParams {
    fn default() -> Self {
        Self::from(&HunterSettings::default())
    }
}

/// First command a freshly spawned hunter receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArmCommand {
    /// Acquire the nearest prey, or wander if none is in range.
    StartHunting,
    /// Walk to the given fixed point.
    StartWalking(Vec3),
}

/// Work parked in the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HunterTask {
    /// Periodic spawn check.
    SpawnPoll,
    /// Deferred first command, issued after the spawn tick completes.
    Arm {
        /// Hunter to arm.
        hunter: HunterId,
        /// Command to issue.
        command: ArmCommand,
    },
    /// Timeout watchdog for the active hunter.
    Timeout {
        /// Hunter being watched.
        hunter: HunterId,
    },
    /// End of the post-resolution cooldown.
    CooldownElapsed,
    /// Periodic re-read of a hunted prey's live position, or a fresh look
    /// around for a wandering hunter.
    RefreshTarget {
        /// Hunter to refresh.
        hunter: HunterId,
    },
    /// Re-sends the walking signal of a session's first hunter.
    RefreshAnimation {
        /// The session's first hunter.
        hunter: HunterId,
    },
    /// Removal of a hunter that finished falling.
    Destroy {
        /// Hunter to remove.
        hunter: HunterId,
    },
}

/// A hunter reached its prey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    /// The catching hunter.
    pub hunter: HunterId,
    /// The caught prey.
    pub prey: PreyId,
}

/// Lifecycle notifications emitted by the coordinator.
///
/// Mirrored one to one by [`crate::session::SessionEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum HunterEvent {
    /// A hunter was placed in the world.
    Spawned {
        /// New hunter.
        hunter: HunterId,
        /// Its display name.
        name: String,
        /// Where it appeared.
        position: Vec3,
    },
    /// The deferred first command ran.
    Armed {
        /// Armed hunter.
        hunter: HunterId,
        /// State after arming.
        state: HunterState,
    },
    /// A hunter caught its prey.
    Captured {
        /// Catching hunter.
        hunter: HunterId,
        /// Caught prey.
        prey: PreyId,
    },
    /// The player reported a hunter.
    Reported {
        /// Reported hunter.
        hunter: HunterId,
    },
    /// A hunter hit its timeout.
    TimedOut {
        /// Expired hunter.
        hunter: HunterId,
    },
    /// A hunter left the world.
    Destroyed {
        /// Removed hunter.
        hunter: HunterId,
    },
    /// Cooldown started.
    CooldownStarted,
    /// Cooldown ended.
    SpawnAllowed,
}
