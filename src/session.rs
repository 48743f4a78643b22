//! A single simulation session.
//!
//! [`Session`] owns the timer queue, the prey [`Habitat`] and the
//! [`HunterCoordinator`], and advances them together. One call to
//! [`Session::advance`] is one tick:
//!
//! 1. the scheduler clock moves forward,
//! 2. hunters move and any capture is resolved at once,
//! 3. prey patrol,
//! 4. every timer due in this tick runs in `(due time, arming order)`.

use std::time::Duration;

use glam::Vec3;
use log::{debug, info};

use crate::config::{ConfigError, SessionConfig};
use crate::hunter::{
    HunterCoordinator, HunterEvent, HunterId, HunterScheduler, HunterState, HunterTemplate,
    ReportOutcome,
};
use crate::numeric::duration_from_seconds;
use crate::population::{Habitat, PopulationTracker};
use crate::prey::PreyId;

/// Observable outcome of a tick, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A hunter entered the world, not yet armed.
    HunterSpawned {
        /// Hunter the event concerns.
        hunter: HunterId,
        /// Display name.
        name: String,
        /// Spawn position.
        position: Vec3,
    },
    /// The hunter received its first command and is now in `state`.
    HunterArmed {
        /// Hunter the event concerns.
        hunter: HunterId,
        /// State the first command put the hunter in.
        state: HunterState,
    },
    /// The hunter caught `prey`, which has left the population.
    HunterCaptured {
        /// Hunter the event concerns.
        hunter: HunterId,
        /// The caught prey.
        prey: PreyId,
    },
    /// The player reported the hunter; it falls without costing prey.
    HunterReported {
        /// Hunter the event concerns.
        hunter: HunterId,
    },
    /// The hunter outstayed its timeout and took one prey with it.
    HunterTimedOut {
        /// Hunter the event concerns.
        hunter: HunterId,
    },
    /// The hunter was removed from the world.
    HunterDestroyed {
        /// Hunter the event concerns.
        hunter: HunterId,
    },
    /// The respawn cooldown began.
    CooldownStarted,
    /// The cooldown ended; the next poll may spawn.
    SpawnAllowed,
    /// The last prey is gone. Emitted once per session.
    PopulationExtinct,
}

impl From<HunterEvent> for SessionEvent {
    fn from(event: HunterEvent) -> Self {
        match event {
            HunterEvent::Spawned {
                hunter,
                name,
                position,
            } => Self::HunterSpawned {
                hunter,
                name,
                position,
            },
            HunterEvent::Armed { hunter, state } => Self::HunterArmed { hunter, state },
            HunterEvent::Captured { hunter, prey } => Self::HunterCaptured { hunter, prey },
            HunterEvent::Reported { hunter } => Self::HunterReported { hunter },
            HunterEvent::TimedOut { hunter } => Self::HunterTimedOut { hunter },
            HunterEvent::Destroyed { hunter } => Self::HunterDestroyed { hunter },
            HunterEvent::CooldownStarted => Self::CooldownStarted,
            HunterEvent::SpawnAllowed => Self::SpawnAllowed,
        }
    }
}

/// One run of the simulation from the first spawn poll to whenever the
/// caller stops advancing it.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    scheduler: HunterScheduler,
    habitat: Habitat,
    coordinator: HunterCoordinator,
    paused: bool,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Builds a session with a freshly populated habitat and the default
    /// hunter template. The configuration is used as given.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let habitat = Habitat::populate(config.prey.clone(), config.seed);
        let template = HunterTemplate::from_settings(&config.hunter);
        Self::from_parts(config, habitat, Some(template))
    }

    /// Validates `config`, then builds the session like [`Self::new`].
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for unusable values.
    pub fn try_new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Builds a session around an existing habitat and template.
    #[must_use]
    pub fn from_parts(
        config: SessionConfig,
        habitat: Habitat,
        template: Option<HunterTemplate>,
    ) -> Self {
        let mut scheduler = HunterScheduler::new();
        let mut coordinator = HunterCoordinator::new(
            config.coordinator.clone(),
            template,
            config.seed.wrapping_add(1),
        );
        coordinator.start(&mut scheduler);
        info!(
            "session started with {} prey (seed {})",
            habitat.current_count(),
            config.seed
        );
        Self {
            config,
            scheduler,
            habitat,
            coordinator,
            paused: false,
            events: Vec::new(),
        }
    }

    /// Configuration the session was built with.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The prey population.
    #[must_use]
    pub const fn habitat(&self) -> &Habitat {
        &self.habitat
    }

    /// Mutable access to the prey, for callers that move them by hand.
    pub const fn habitat_mut(&mut self) -> &mut Habitat {
        &mut self.habitat
    }

    /// The hunter coordinator.
    #[must_use]
    pub const fn coordinator(&self) -> &HunterCoordinator {
        &self.coordinator
    }

    /// Mutable access to the coordinator, e.g. to swap its template.
    pub const fn coordinator_mut(&mut self) -> &mut HunterCoordinator {
        &mut self.coordinator
    }

    /// Pending timers.
    #[must_use]
    pub const fn scheduler(&self) -> &HunterScheduler {
        &self.scheduler
    }

    /// Simulated time since the session started.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Configured length of one tick.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        duration_from_seconds(self.config.tick_seconds)
    }

    /// Whether the last prey is gone.
    #[must_use]
    pub fn is_extinct(&self) -> bool {
        self.habitat.is_extinct()
    }

    /// Whether [`Self::advance`] is currently ignored.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freezes the session. Timers and hunters resume where they stopped.
    pub fn pause(&mut self) {
        if !self.paused {
            info!("session paused at {:.1}s", self.now().as_secs_f32());
        }
        self.paused = true;
    }

    /// Undoes [`Self::pause`].
    pub fn resume(&mut self) {
        if self.paused {
            info!("session resumed at {:.1}s", self.now().as_secs_f32());
        }
        self.paused = false;
    }

    /// Runs one tick of length `dt`. Paused sessions ignore the call.
    pub fn advance(&mut self, dt: Duration) {
        if self.paused {
            debug!("advance ignored while paused");
            return;
        }
        self.scheduler.begin_tick(dt);
        self.coordinator
            .update(dt, &mut self.habitat, &mut self.scheduler);
        self.habitat.update(dt);
        while let Some((handle, task)) = self.scheduler.pop_due() {
            self.coordinator
                .handle_task(handle, task, &mut self.habitat, &mut self.scheduler);
        }
        self.collect_events();
    }

    /// Runs one tick of the configured length.
    pub fn step(&mut self) {
        self.advance(self.tick_duration());
    }

    /// Player report against the active hunter.
    pub fn report_hunter(&mut self) -> ReportOutcome {
        let outcome = self.coordinator.report_hunter(&mut self.scheduler);
        self.collect_events();
        outcome
    }

    /// Takes the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn collect_events(&mut self) {
        self.events.extend(
            self.coordinator
                .drain_events()
                .into_iter()
                .map(SessionEvent::from),
        );
        if self.habitat.take_extinction() {
            self.events.push(SessionEvent::PopulationExtinct);
        }
    }
}
