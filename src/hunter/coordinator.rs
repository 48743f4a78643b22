//! Spawn, timeout and cooldown orchestration for hunters.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use glam::Quat;
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collaborators::{
    kinematic_body_factory, signal_recorder_factory, AnimatorFactory, BodyFactory, KinematicBody,
    SignalRecorder,
};
use crate::config::{CoordinatorSettings, HunterSettings, TargetingMode};
use crate::constants::FIRST_HUNTER_NAME;
use crate::numeric::duration_from_seconds;
use crate::population::PopulationTracker;
use crate::prey::PreyLocator;
use crate::scheduler::TimerHandle;
use crate::vector_math::facing;

use super::agent::{HunterAgent, HunterParts};
use super::targeting::{nearest_point, spawn_position};
use super::{ArmCommand, Capture, HunterEvent, HunterId, HunterParams, HunterScheduler, HunterTask};

/// World the coordinator hunts in: searchable prey plus the population
/// count it decrements.
pub trait HuntingGround: PreyLocator + PopulationTracker {}

impl<T: PreyLocator + PopulationTracker + ?Sized> HuntingGround for T {}

/// Coordinator session state.
///
/// Spawning requires `Empty`: no active hunter and no cooldown running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// No hunter and no cooldown.
    Empty,
    /// A hunter is running with its watchdog armed.
    Active {
        /// The active hunter.
        hunter: HunterId,
        /// Its timeout watchdog.
        timeout: TimerHandle,
        /// Simulated time of the spawn.
        spawned_at: Duration,
    },
    /// Waiting out the respawn delay.
    Cooldown {
        /// Timer that ends the cooldown.
        until: TimerHandle,
    },
}

/// Why a spawn poll did not produce a hunter although the slot was free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No hunter template is set.
    NoTemplate,
    /// The spawn area is an empty point set.
    NoSpawnPoint,
    /// Fixed-point targeting has no points to walk to.
    NoTargetPoints,
}

/// Result of one spawn attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// A hunter was created.
    Spawned(HunterId),
    /// A hunter is active or the cooldown is running.
    Blocked,
    /// The slot was free but the configuration is incomplete.
    Skipped(SkipReason),
}

/// Result of a player report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The hunter now falls and the cooldown runs.
    Reported(HunterId),
    /// Nothing was active; nothing changed.
    NoActiveHunter,
}

/// Recipe for new hunters.
#[derive(Clone)]
pub struct HunterTemplate {
    /// Tuning copied into each hunter.
    pub params: HunterParams,
    /// Builds each hunter's physics body.
    pub body: Option<BodyFactory>,
    /// Builds each hunter's animator.
    pub animator: Option<AnimatorFactory>,
}

impl fmt::Debug for HunterTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HunterTemplate")
            .field("params", &self.params)
            .field("body", &self.body.is_some())
            .field("animator", &self.animator.is_some())
            .finish()
    }
}

impl HunterTemplate {
    /// Template with the default kinematic body and a recording animator.
    #[must_use]
    pub fn new(params: HunterParams) -> Self {
        Self {
            params,
            body: Some(kinematic_body_factory()),
            animator: Some(signal_recorder_factory()),
        }
    }

    /// [`Self::new`] with parameters read from configuration.
    #[must_use]
    pub fn from_settings(settings: &HunterSettings) -> Self {
        Self::new(HunterParams::from(settings))
    }

    /// Replaces the body factory.
    #[must_use]
    pub fn with_body(mut self, factory: BodyFactory) -> Self {
        self.body = Some(factory);
        self
    }

    /// Replaces the animator factory.
    #[must_use]
    pub fn with_animator(mut self, factory: AnimatorFactory) -> Self {
        self.animator = Some(factory);
        self
    }

    fn build_parts(&self, name: &str) -> HunterParts {
        let body = match &self.body {
            Some(factory) => factory(),
            None => {
                error!("hunter template has no motion body for {name}; using a kinematic body");
                Box::new(KinematicBody::default())
            }
        };
        let animator = match &self.animator {
            Some(factory) => factory(),
            None => {
                error!("hunter template has no animator for {name}; using a signal recorder");
                Box::new(SignalRecorder::new())
            }
        };
        HunterParts { body, animator }
    }
}

/// Keeps at most one hunter active and drives the spawn loop, the timeout
/// watchdog and the respawn cooldown.
///
/// Resolving a hunter by report or capture always cancels the watchdog
/// before the active slot is released.
#[derive(Debug)]
pub struct HunterCoordinator {
    settings: CoordinatorSettings,
    template: Option<HunterTemplate>,
    state: CoordinatorState,
    agents: BTreeMap<HunterId, HunterAgent>,
    next_id: u64,
    spawned_any: bool,
    poll_timer: Option<TimerHandle>,
    rng: StdRng,
    events: Vec<HunterEvent>,
}

impl HunterCoordinator {
    /// Builds an idle coordinator. Nothing spawns until [`Self::start`].
    #[must_use]
    pub fn new(settings: CoordinatorSettings, template: Option<HunterTemplate>, seed: u64) -> Self {
        Self {
            settings,
            template,
            state: CoordinatorState::Empty,
            agents: BTreeMap::new(),
            next_id: 1,
            spawned_any: false,
            poll_timer: None,
            rng: StdRng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Arms the first spawn poll after the initial delay. Calling again
    /// while a poll is pending has no effect.
    pub fn start(&mut self, scheduler: &mut HunterScheduler) {
        if self.poll_timer.is_some() {
            return;
        }
        let delay = duration_from_seconds(self.settings.initial_spawn_delay);
        self.poll_timer = Some(scheduler.schedule_after(delay, HunterTask::SpawnPoll));
        info!("hunter spawning starts in {:.1}s", delay.as_secs_f32());
    }

    /// Cancels the spawn loop. Active hunters keep running.
    pub fn stop(&mut self, scheduler: &mut HunterScheduler) {
        if let Some(handle) = self.poll_timer.take() {
            scheduler.cancel(handle);
            info!("hunter spawning stopped");
        }
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> CoordinatorState {
        self.state
    }

    /// Spawn loop settings.
    #[must_use]
    pub const fn settings(&self) -> &CoordinatorSettings {
        &self.settings
    }

    /// Template used for the next spawn.
    #[must_use]
    pub const fn template(&self) -> Option<&HunterTemplate> {
        self.template.as_ref()
    }

    /// Replaces the hunter template. The next poll picks it up.
    pub fn set_template(&mut self, template: Option<HunterTemplate>) {
        self.template = template;
    }

    /// Identity of the active hunter.
    #[must_use]
    pub const fn active_id(&self) -> Option<HunterId> {
        match self.state {
            CoordinatorState::Active { hunter, .. } => Some(hunter),
            CoordinatorState::Empty | CoordinatorState::Cooldown { .. } => None,
        }
    }

    /// The active hunter.
    #[must_use]
    pub fn active_hunter(&self) -> Option<&HunterAgent> {
        self.active_id().and_then(|id| self.agents.get(&id))
    }

    /// Simulated time at which the active hunter spawned.
    #[must_use]
    pub const fn active_since(&self) -> Option<Duration> {
        match self.state {
            CoordinatorState::Active { spawned_at, .. } => Some(spawned_at),
            CoordinatorState::Empty | CoordinatorState::Cooldown { .. } => None,
        }
    }

    /// Any hunter still in the world, active or falling.
    #[must_use]
    pub fn agent(&self, id: HunterId) -> Option<&HunterAgent> {
        self.agents.get(&id)
    }

    /// Every hunter still in the world, including falling ones.
    pub fn agents(&self) -> impl Iterator<Item = &HunterAgent> {
        self.agents.values()
    }

    /// Number of hunters still in the world.
    #[must_use]
    pub fn hunter_count(&self) -> usize {
        self.agents.len()
    }

    /// Takes the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<HunterEvent> {
        std::mem::take(&mut self.events)
    }

    /// Runs a fired scheduler task.
    pub fn handle_task<W>(
        &mut self,
        handle: TimerHandle,
        task: HunterTask,
        ground: &mut W,
        scheduler: &mut HunterScheduler,
    ) where
        W: HuntingGround + ?Sized,
    {
        match task {
            HunterTask::SpawnPoll => {
                if self.poll_timer == Some(handle) {
                    self.poll_timer = None;
                }
                self.try_spawn(&*ground, scheduler);
                self.poll_timer = Some(scheduler.schedule_after(
                    duration_from_seconds(self.settings.spawn_poll_interval),
                    HunterTask::SpawnPoll,
                ));
            }
            HunterTask::Arm { hunter, command } => self.arm(hunter, command, &*ground, scheduler),
            HunterTask::Timeout { hunter } => self.on_timeout(handle, hunter, ground, scheduler),
            HunterTask::CooldownElapsed => self.on_cooldown_elapsed(handle),
            HunterTask::RefreshTarget { hunter } => {
                if let Some(agent) = self.agents.get_mut(&hunter) {
                    agent.refresh_target(handle, &*ground, &mut self.rng, scheduler);
                }
            }
            HunterTask::RefreshAnimation { hunter } => {
                if let Some(agent) = self.agents.get_mut(&hunter) {
                    agent.refresh_animation();
                }
            }
            HunterTask::Destroy { hunter } => self.destroy(hunter, scheduler),
        }
    }

    /// Spawns a hunter if the slot is free and the configuration allows it.
    ///
    /// The hunter's first command is deferred by one tick and its timeout
    /// watchdog is armed immediately.
    pub fn try_spawn<L>(&mut self, prey: &L, scheduler: &mut HunterScheduler) -> SpawnOutcome
    where
        L: PreyLocator + ?Sized,
    {
        if self.state != CoordinatorState::Empty {
            debug!("spawn poll blocked: {:?}", self.state);
            return SpawnOutcome::Blocked;
        }
        let Some(template) = self.template.clone() else {
            warn!("no hunter template configured; skipping spawn");
            return SpawnOutcome::Skipped(SkipReason::NoTemplate);
        };
        let Some(position) = spawn_position(&self.settings.spawn_area, &mut self.rng) else {
            warn!("spawn area has no points; skipping spawn");
            return SpawnOutcome::Skipped(SkipReason::NoSpawnPoint);
        };
        let (command, look_at) = match self.settings.targeting {
            TargetingMode::DirectHunting => (
                ArmCommand::StartHunting,
                prey.nearest(position).map(|found| found.position),
            ),
            TargetingMode::FixedPoints => {
                let Some(point) = nearest_point(position, &self.settings.target_points) else {
                    warn!("fixed-point targeting has no target points; skipping spawn");
                    return SpawnOutcome::Skipped(SkipReason::NoTargetPoints);
                };
                (ArmCommand::StartWalking(point.position), Some(point.position))
            }
        };
        let orientation = look_at
            .and_then(|target| facing(target - position))
            .unwrap_or(Quat::IDENTITY);

        let id = HunterId(self.next_id);
        self.next_id += 1;
        let first = !self.spawned_any;
        self.spawned_any = true;
        let name = if first {
            FIRST_HUNTER_NAME.to_owned()
        } else {
            format!("Hunter_{:.0}", scheduler.now().as_secs_f32())
        };

        let parts = template.build_parts(&name);
        let agent = HunterAgent::new(
            id,
            name.clone(),
            position,
            orientation,
            template.params,
            parts,
            first,
        );
        self.agents.insert(id, agent);
        scheduler.defer_ticks(1, HunterTask::Arm { hunter: id, command });
        let timeout = scheduler.schedule_after(
            duration_from_seconds(self.settings.hunter_timeout),
            HunterTask::Timeout { hunter: id },
        );
        self.state = CoordinatorState::Active {
            hunter: id,
            timeout,
            spawned_at: scheduler.now(),
        };
        info!(
            "spawned {name} ({id}) at {position} heading for {}",
            look_at.map_or_else(|| "open ground".to_owned(), |t| t.to_string())
        );
        self.events.push(HunterEvent::Spawned {
            hunter: id,
            name,
            position,
        });
        SpawnOutcome::Spawned(id)
    }

    fn arm<L>(&mut self, id: HunterId, command: ArmCommand, prey: &L, scheduler: &mut HunterScheduler)
    where
        L: PreyLocator + ?Sized,
    {
        let Some(agent) = self.agents.get_mut(&id) else {
            debug!("hunter {id} left before it was armed");
            return;
        };
        let armed = match command {
            ArmCommand::StartHunting => agent.start_hunting(prey, &mut self.rng, scheduler),
            ArmCommand::StartWalking(point) => agent.start_walking(point, scheduler),
        };
        if !armed {
            return;
        }
        if agent.is_first_of_session() {
            scheduler.defer_ticks(2, HunterTask::RefreshAnimation { hunter: id });
        }
        info!("{} armed: {:?}", agent.name(), agent.state());
        self.events.push(HunterEvent::Armed {
            hunter: id,
            state: agent.state(),
        });
    }

    /// Advances every hunter by `dt` and resolves captures at once.
    pub fn update<W>(&mut self, dt: Duration, ground: &mut W, scheduler: &mut HunterScheduler)
    where
        W: HuntingGround + ?Sized,
    {
        let mut captures = Vec::new();
        for agent in self.agents.values_mut() {
            if let Some(capture) = agent.update(dt, &*ground, scheduler) {
                captures.push(capture);
            }
        }
        for capture in captures {
            self.resolve_capture(capture, ground, scheduler);
        }
    }

    /// Records a catch: cancels the watchdog, removes the prey and starts
    /// the cooldown.
    pub fn resolve_capture<T>(&mut self, capture: Capture, tracker: &mut T, scheduler: &mut HunterScheduler)
    where
        T: PopulationTracker + ?Sized,
    {
        match self.state {
            CoordinatorState::Active { hunter, timeout, .. } if hunter == capture.hunter => {
                scheduler.cancel(timeout);
            }
            _ => {
                warn!("ignoring capture by inactive hunter {}", capture.hunter);
                return;
            }
        }
        tracker.capture(capture.prey);
        info!("hunter {} caught its prey", capture.hunter);
        self.events.push(HunterEvent::Captured {
            hunter: capture.hunter,
            prey: capture.prey,
        });
        self.begin_cooldown(scheduler);
    }

    /// Player report: the active hunter falls and the cooldown starts.
    ///
    /// Without an active hunter this only logs a warning.
    pub fn report_hunter(&mut self, scheduler: &mut HunterScheduler) -> ReportOutcome {
        let CoordinatorState::Active { hunter, timeout, .. } = self.state else {
            warn!("hunter report ignored: no active hunter");
            return ReportOutcome::NoActiveHunter;
        };
        scheduler.cancel(timeout);
        if let Some(agent) = self.agents.get_mut(&hunter) {
            agent.start_falling(scheduler);
        }
        info!("hunter {hunter} reported");
        self.events.push(HunterEvent::Reported { hunter });
        self.begin_cooldown(scheduler);
        ReportOutcome::Reported(hunter)
    }

    fn on_timeout<T>(&mut self, handle: TimerHandle, id: HunterId, tracker: &mut T, scheduler: &mut HunterScheduler)
    where
        T: PopulationTracker + ?Sized,
    {
        match self.state {
            CoordinatorState::Active { hunter, timeout, .. } if hunter == id && timeout == handle => {}
            _ => {
                debug!("stale timeout for hunter {id}");
                return;
            }
        }
        warn!("hunter {id} timed out; a prey is lost");
        tracker.decrement();
        if let Some(mut agent) = self.agents.remove(&id) {
            agent.mark_destroyed(scheduler);
        }
        self.events.push(HunterEvent::TimedOut { hunter: id });
        self.events.push(HunterEvent::Destroyed { hunter: id });
        self.begin_cooldown(scheduler);
    }

    fn begin_cooldown(&mut self, scheduler: &mut HunterScheduler) {
        let delay = duration_from_seconds(self.settings.respawn_delay);
        let until = scheduler.schedule_after(delay, HunterTask::CooldownElapsed);
        self.state = CoordinatorState::Cooldown { until };
        info!("cooldown started; next hunter in {:.1}s", delay.as_secs_f32());
        self.events.push(HunterEvent::CooldownStarted);
    }

    fn on_cooldown_elapsed(&mut self, handle: TimerHandle) {
        if self.state != (CoordinatorState::Cooldown { until: handle }) {
            debug!("stale cooldown timer");
            return;
        }
        self.state = CoordinatorState::Empty;
        info!("cooldown over; spawning allowed");
        self.events.push(HunterEvent::SpawnAllowed);
    }

    fn destroy(&mut self, id: HunterId, scheduler: &mut HunterScheduler) {
        let Some(mut agent) = self.agents.remove(&id) else {
            return;
        };
        agent.mark_destroyed(scheduler);
        if let CoordinatorState::Active { hunter, timeout, .. } = self.state {
            if hunter == id {
                scheduler.cancel(timeout);
                self.begin_cooldown(scheduler);
            }
        }
        info!("{} removed", agent.name());
        self.events.push(HunterEvent::Destroyed { hunter: id });
    }
}
