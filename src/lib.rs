#![cfg_attr(docsrs, feature(doc_cfg))]
//! Hunter pursuit-and-capture simulation.
//!
//! Hunters spawn one at a time, chase the nearest komodo, and are resolved
//! by a catch, a player report or a timeout. A cooldown gates every respawn.
//! All waiting runs on a cooperative [`scheduler::Scheduler`] driven by
//! [`Session::advance`]; [`KomodoGuardPlugin`] hosts a session inside Bevy.
pub mod collaborators;
pub mod config;
pub mod constants;
pub mod hunter;
pub mod logging;
pub mod numeric;
pub mod plugin;
pub mod population;
pub mod prey;
pub mod scheduler;
pub mod session;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use collaborators::{AnimationSignal, Animator, KinematicBody, MotionBody, SignalRecorder};
pub use config::{ConfigError, SessionConfig, SpawnArea, TargetingMode};
pub use hunter::{
    CoordinatorState, HunterAgent, HunterCoordinator, HunterId, HunterState, HunterTemplate,
    ReportOutcome, SpawnOutcome,
};
pub use logging::init as init_logging;
pub use plugin::{
    KomodoGuardPlugin, PopulationExhausted, ReportHunter, SessionLog, Simulation,
};
pub use population::{Habitat, PopulationTracker};
pub use prey::{PreyId, PreyLocator, PreyRegistry};
pub use scheduler::{Scheduler, TimerHandle};
pub use session::{Session, SessionEvent};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use komodo_guard::prelude::*;
    //! let mut session = Session::new(SessionConfig::default());
    //! session.step();
    //! ```

    pub use crate::config::SessionConfig;
    pub use crate::hunter::{HunterState, ReportOutcome};
    pub use crate::population::PopulationTracker;
    pub use crate::session::{Session, SessionEvent};
    pub use crate::KomodoGuardPlugin;
}
