//! Per-hunter behaviour state machine.
//!
//! A hunter starts `Idle`, is armed into `Walking` (fixed destination) or
//! `Hunting` (live prey), and ends in `Falling` followed by `Destroyed`.
//! Falling hands position authority to the hunter's [`MotionBody`]; the
//! destroy timer armed by the first [`HunterAgent::start_falling`] call is
//! the only one ever armed.

use std::fmt;
use std::time::Duration;

use glam::{Quat, Vec3};
use log::{debug, info, warn};
use rand::Rng;

use crate::collaborators::{AnimationSignal, Animator, MotionBody};
use crate::constants::PURSUIT_ABANDON_FACTOR;
use crate::prey::{PreyId, PreyLocator};
use crate::scheduler::TimerHandle;
use crate::vector_math::{facing, random_point_in_disk};

use super::{Capture, HunterId, HunterParams, HunterScheduler, HunterTask};

/// Coarse lifecycle state of a hunter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HunterState {
    /// Spawned but not yet armed.
    Idle,
    /// Heading for a fixed point.
    Walking,
    /// Chasing a live prey.
    Hunting,
    /// Under gravity, awaiting removal.
    Falling,
    /// Removed from the world.
    Destroyed,
}

/// Lifecycle state together with the data each state owns.
///
/// `Hunting` cannot exist without a prey handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behaviour {
    /// Waiting for the first command.
    Idle,
    /// Walking to `destination`.
    ///
    /// A `searching` hunter found no prey when it last looked and keeps
    /// looking on every target refresh.
    Walking {
        /// Point the hunter walks to.
        destination: Vec3,
        /// Whether the walk is a fallback from an empty prey search.
        searching: bool,
    },
    /// Chasing `prey`, steering at the position read at the last refresh.
    Hunting {
        /// Bound prey.
        prey: PreyId,
        /// Prey position as of the last refresh.
        last_seen: Vec3,
    },
    /// Falling under gravity.
    Falling,
    /// Gone.
    Destroyed,
}

impl Behaviour {
    /// Coarse state without the per-state data.
    #[must_use]
    pub const fn state(&self) -> HunterState {
        match self {
            Self::Idle => HunterState::Idle,
            Self::Walking { .. } => HunterState::Walking,
            Self::Hunting { .. } => HunterState::Hunting,
            Self::Falling => HunterState::Falling,
            Self::Destroyed => HunterState::Destroyed,
        }
    }
}

/// Collaborators a hunter is built with.
pub struct HunterParts {
    /// Physics collaborator that owns the hunter while it falls.
    pub body: Box<dyn MotionBody>,
    /// Receives walking and falling signals.
    pub animator: Box<dyn Animator>,
}

/// A single hunter.
pub struct HunterAgent {
    id: HunterId,
    name: String,
    position: Vec3,
    orientation: Quat,
    params: HunterParams,
    behaviour: Behaviour,
    refresh_timer: Option<TimerHandle>,
    destroy_timer: Option<TimerHandle>,
    first_of_session: bool,
    body: Box<dyn MotionBody>,
    animator: Box<dyn Animator>,
}

impl fmt::Debug for HunterAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HunterAgent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("position", &self.position)
            .field("behaviour", &self.behaviour)
            .field("refresh_timer", &self.refresh_timer)
            .field("destroy_timer", &self.destroy_timer)
            .field("first_of_session", &self.first_of_session)
            .finish_non_exhaustive()
    }
}

impl HunterAgent {
    /// Builds an idle hunter with its body under kinematic control and all
    /// animation signals off.
    #[must_use]
    pub fn new(
        id: HunterId,
        name: impl Into<String>,
        position: Vec3,
        orientation: Quat,
        params: HunterParams,
        parts: HunterParts,
        first_of_session: bool,
    ) -> Self {
        let HunterParts {
            mut body,
            mut animator,
        } = parts;
        body.set_free_fall(false);
        animator.signal(AnimationSignal::Walking(false));
        animator.signal(AnimationSignal::Falling(false));
        let label = name.into();
        debug!("hunter {label} ({id}) created at {position}");
        Self {
            id,
            name: label,
            position,
            orientation,
            params,
            behaviour: Behaviour::Idle,
            refresh_timer: None,
            destroy_timer: None,
            first_of_session,
            body,
            animator,
        }
    }

    /// Numeric identity assigned by the coordinator.
    #[must_use]
    pub const fn id(&self) -> HunterId {
        self.id
    }

    /// Display name, `FirstHunter` or `Hunter_<seconds>`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current coarse state.
    #[must_use]
    pub const fn state(&self) -> HunterState {
        self.behaviour.state()
    }

    /// Current state with its data.
    #[must_use]
    pub const fn behaviour(&self) -> Behaviour {
        self.behaviour
    }

    /// World position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Yaw rotation; the hunter looks along its local +Z.
    #[must_use]
    pub const fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Tuning the hunter was built with.
    #[must_use]
    pub const fn params(&self) -> &HunterParams {
        &self.params
    }

    /// Whether this is the session's first hunter.
    #[must_use]
    pub const fn is_first_of_session(&self) -> bool {
        self.first_of_session
    }

    /// Point the hunter is currently steering towards.
    #[must_use]
    pub const fn target_point(&self) -> Option<Vec3> {
        match self.behaviour {
            Behaviour::Walking { destination, .. } => Some(destination),
            Behaviour::Hunting { last_seen, .. } => Some(last_seen),
            Behaviour::Idle | Behaviour::Falling | Behaviour::Destroyed => None,
        }
    }

    /// Prey the hunter is bound to, if hunting.
    #[must_use]
    pub const fn hunted_prey(&self) -> Option<PreyId> {
        match self.behaviour {
            Behaviour::Hunting { prey, .. } => Some(prey),
            _ => None,
        }
    }

    /// Pending target refresh, if any.
    #[must_use]
    pub const fn refresh_timer(&self) -> Option<TimerHandle> {
        self.refresh_timer
    }

    /// Pending removal, armed once the hunter falls.
    #[must_use]
    pub const fn destroy_timer(&self) -> Option<TimerHandle> {
        self.destroy_timer
    }

    /// The hunter's physics collaborator.
    #[must_use]
    pub fn body(&self) -> &dyn MotionBody {
        self.body.as_ref()
    }

    /// Whether the hunter is falling or gone and ignores movement commands.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.behaviour, Behaviour::Falling | Behaviour::Destroyed)
    }

    fn face(&mut self, towards: Vec3) {
        if let Some(rotation) = facing(towards - self.position) {
            self.orientation = rotation;
        }
    }

    fn cancel_refresh(&mut self, scheduler: &mut HunterScheduler) {
        if let Some(handle) = self.refresh_timer.take() {
            scheduler.cancel(handle);
        }
    }

    fn arm_refresh(&mut self, scheduler: &mut HunterScheduler) {
        self.refresh_timer = Some(scheduler.schedule_after(
            self.params.target_refresh,
            HunterTask::RefreshTarget { hunter: self.id },
        ));
    }

    fn signal_moving(&mut self) {
        self.body.set_free_fall(false);
        self.animator.signal(AnimationSignal::Walking(true));
        self.animator.signal(AnimationSignal::Falling(false));
    }

    /// Walks to a fixed point, dropping any prey.
    ///
    /// Returns `false` and changes nothing if the hunter is falling or gone.
    pub fn start_walking(&mut self, destination: Vec3, scheduler: &mut HunterScheduler) -> bool {
        self.walk_to(destination, false, scheduler)
    }

    fn walk_to(&mut self, destination: Vec3, searching: bool, scheduler: &mut HunterScheduler) -> bool {
        if self.is_terminal() {
            warn!(
                "{} cannot start walking while {:?}",
                self.name,
                self.state()
            );
            return false;
        }
        self.cancel_refresh(scheduler);
        self.behaviour = Behaviour::Walking {
            destination,
            searching,
        };
        self.face(destination);
        self.signal_moving();
        if searching {
            self.arm_refresh(scheduler);
        }
        debug!("{} walking to {destination}", self.name);
        true
    }

    /// Binds the nearest prey within the detection radius and starts the
    /// periodic target refresh.
    ///
    /// With no prey in range the hunter walks to a random point within its
    /// wander radius instead and looks again on every refresh. Returns
    /// `false` if the hunter is falling or gone.
    pub fn start_hunting<L, R>(
        &mut self,
        prey: &L,
        rng: &mut R,
        scheduler: &mut HunterScheduler,
    ) -> bool
    where
        L: PreyLocator + ?Sized,
        R: Rng + ?Sized,
    {
        if self.is_terminal() {
            warn!(
                "{} cannot start hunting while {:?}",
                self.name,
                self.state()
            );
            return false;
        }
        self.cancel_refresh(scheduler);
        let Some(found) = prey.nearest_within(self.position, self.params.detection_radius) else {
            let point = random_point_in_disk(self.position, self.params.wander_radius, rng);
            info!(
                "{} found no prey within {}; wandering to {point}",
                self.name, self.params.detection_radius
            );
            return self.walk_to(point, true, scheduler);
        };
        self.behaviour = Behaviour::Hunting {
            prey: found.key,
            last_seen: found.position,
        };
        self.face(found.position);
        self.signal_moving();
        self.arm_refresh(scheduler);
        info!(
            "{} hunting prey {:?} at distance {:.1}",
            self.name, found.key, found.distance
        );
        true
    }

    /// Handles a fired [`HunterTask::RefreshTarget`].
    ///
    /// Copies the prey's live position into the pursuit target, or
    /// re-acquires when the prey is gone or beyond
    /// [`PURSUIT_ABANDON_FACTOR`] times the detection radius. A searching
    /// walker hunts as soon as prey is in range and picks a fresh wander
    /// point once it has arrived.
    pub fn refresh_target<L, R>(
        &mut self,
        handle: TimerHandle,
        prey: &L,
        rng: &mut R,
        scheduler: &mut HunterScheduler,
    ) where
        L: PreyLocator + ?Sized,
        R: Rng + ?Sized,
    {
        if self.refresh_timer != Some(handle) {
            debug!("{} ignoring stale target refresh", self.name);
            return;
        }
        self.refresh_timer = None;
        let id = match self.behaviour {
            Behaviour::Hunting { prey: bound, .. } => bound,
            Behaviour::Walking {
                destination,
                searching: true,
            } => {
                let arrived = self.position == destination;
                if arrived
                    || prey
                        .nearest_within(self.position, self.params.detection_radius)
                        .is_some()
                {
                    self.start_hunting(prey, rng, scheduler);
                } else {
                    self.arm_refresh(scheduler);
                }
                return;
            }
            Behaviour::Idle
            | Behaviour::Walking { .. }
            | Behaviour::Falling
            | Behaviour::Destroyed => return,
        };
        let abandon_at = PURSUIT_ABANDON_FACTOR * self.params.detection_radius;
        match prey.position_of(id) {
            None => {
                info!("{} lost its prey; re-acquiring", self.name);
                self.start_hunting(prey, rng, scheduler);
            }
            Some(live) if self.position.distance(live) > abandon_at => {
                info!(
                    "{} prey moved beyond {abandon_at:.1}; re-acquiring",
                    self.name
                );
                self.start_hunting(prey, rng, scheduler);
            }
            Some(live) => {
                self.behaviour = Behaviour::Hunting {
                    prey: id,
                    last_seen: live,
                };
                self.arm_refresh(scheduler);
            }
        }
    }

    fn advance_towards(&mut self, target: Vec3, speed: f32, dt: Duration) {
        self.position = self
            .body
            .move_towards(self.position, target, speed * dt.as_secs_f32());
        self.face(target);
    }

    /// Per-tick movement.
    ///
    /// Walking and hunting hunters step towards their target; a hunter whose
    /// live prey is within the catch distance starts falling and reports the
    /// capture. Falling hunters follow their body.
    pub fn update<L>(
        &mut self,
        dt: Duration,
        prey: &L,
        scheduler: &mut HunterScheduler,
    ) -> Option<Capture>
    where
        L: PreyLocator + ?Sized,
    {
        match self.behaviour {
            Behaviour::Walking { destination, .. } => {
                self.advance_towards(destination, self.params.walk_speed, dt);
                None
            }
            Behaviour::Hunting {
                prey: id,
                last_seen,
            } => {
                self.advance_towards(last_seen, self.params.hunting_speed, dt);
                let live = prey.position_of(id)?;
                if self.position.distance(live) > self.params.catch_distance {
                    return None;
                }
                info!("{} caught prey {id:?}", self.name);
                self.start_falling(scheduler);
                Some(Capture {
                    hunter: self.id,
                    prey: id,
                })
            }
            Behaviour::Falling => {
                self.position = self.body.integrate(self.position, dt);
                None
            }
            Behaviour::Idle | Behaviour::Destroyed => None,
        }
    }

    /// Releases the hunter to gravity and schedules its removal.
    ///
    /// Only the first call has any effect; it returns `true`.
    pub fn start_falling(&mut self, scheduler: &mut HunterScheduler) -> bool {
        match self.behaviour {
            Behaviour::Falling => {
                debug!("{} is already falling", self.name);
                return false;
            }
            Behaviour::Destroyed => {
                warn!("{} cannot fall after destruction", self.name);
                return false;
            }
            Behaviour::Idle | Behaviour::Walking { .. } | Behaviour::Hunting { .. } => {}
        }
        self.cancel_refresh(scheduler);
        self.behaviour = Behaviour::Falling;
        self.body.set_free_fall(true);
        self.body
            .apply_impulse(Vec3::NEG_Y * self.params.fall_impulse);
        self.animator.signal(AnimationSignal::Walking(false));
        self.animator.signal(AnimationSignal::Falling(true));
        self.destroy_timer = Some(scheduler.schedule_after(
            self.params.fall_destroy_delay,
            HunterTask::Destroy { hunter: self.id },
        ));
        info!("{} is falling", self.name);
        true
    }

    /// Marks the hunter destroyed and cancels any timers it still owns.
    pub fn mark_destroyed(&mut self, scheduler: &mut HunterScheduler) {
        self.cancel_refresh(scheduler);
        if let Some(handle) = self.destroy_timer.take() {
            scheduler.cancel(handle);
        }
        self.behaviour = Behaviour::Destroyed;
        debug!("{} destroyed", self.name);
    }

    /// Re-sends the walking signal so a freshly initialised animator picks
    /// it up.
    pub fn refresh_animation(&mut self) {
        if matches!(
            self.behaviour,
            Behaviour::Walking { .. } | Behaviour::Hunting { .. }
        ) {
            self.animator.signal(AnimationSignal::Walking(false));
            self.animator.signal(AnimationSignal::Walking(true));
            debug!("{} refreshed walking animation", self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{KinematicBody, SignalRecorder};
    use crate::prey::{Prey, PreyRegistry};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::{fixture, rstest};

    struct Rig {
        agent: HunterAgent,
        recorder: SignalRecorder,
        scheduler: HunterScheduler,
        prey: PreyRegistry,
        rng: StdRng,
    }

    fn params() -> HunterParams {
        HunterParams {
            walk_speed: 2.0,
            hunting_speed: 4.0,
            detection_radius: 10.0,
            catch_distance: 1.0,
            target_refresh: Duration::from_millis(500),
            wander_radius: 6.0,
            fall_destroy_delay: Duration::from_secs(2),
            fall_impulse: 2.0,
        }
    }

    #[fixture]
    fn rig() -> Rig {
        let recorder = SignalRecorder::new();
        let agent = HunterAgent::new(
            HunterId(1),
            "FirstHunter",
            Vec3::ZERO,
            Quat::IDENTITY,
            params(),
            HunterParts {
                body: Box::new(KinematicBody::default()),
                animator: Box::new(recorder.clone()),
            },
            true,
        );
        Rig {
            agent,
            recorder,
            scheduler: HunterScheduler::new(),
            prey: PreyRegistry::new(),
            rng: StdRng::seed_from_u64(99),
        }
    }

    impl Rig {
        fn add_prey(&mut self, x: f32) -> PreyId {
            self.prey.insert(Prey::new("prey", Vec3::new(x, 0.0, 0.0)))
        }

        fn hunt(&mut self) -> bool {
            self.agent
                .start_hunting(&self.prey, &mut self.rng, &mut self.scheduler)
        }

        fn fire_refresh(&mut self) {
            self.scheduler.begin_tick(self.agent.params().target_refresh);
            let Some((handle, HunterTask::RefreshTarget { .. })) = self.scheduler.pop_due() else {
                panic!("expected a due target refresh");
            };
            self.agent
                .refresh_target(handle, &self.prey, &mut self.rng, &mut self.scheduler);
        }
    }

    #[rstest]
    fn hunting_binds_the_nearest_prey(mut rig: Rig) {
        rig.add_prey(5.0);
        let nearest = rig.add_prey(2.0);
        rig.add_prey(8.0);
        assert!(rig.hunt());
        assert_eq!(rig.agent.state(), HunterState::Hunting);
        assert_eq!(rig.agent.hunted_prey(), Some(nearest));
        assert!(rig.agent.refresh_timer().is_some());
    }

    #[rstest]
    fn no_prey_in_range_falls_back_to_walking(mut rig: Rig) {
        rig.add_prey(50.0);
        assert!(rig.hunt());
        assert_eq!(rig.agent.state(), HunterState::Walking);
        assert!(rig.agent.hunted_prey().is_none());
        let target = rig.agent.target_point().expect("walking has a destination");
        assert!(target.distance(Vec3::ZERO) <= 6.0 + 1e-4);
        assert!(rig.agent.refresh_timer().is_some());
        assert_eq!(rig.scheduler.len(), 1);
    }

    #[rstest]
    fn wandering_hunter_binds_prey_that_comes_into_range(mut rig: Rig) {
        let id = rig.add_prey(50.0);
        rig.hunt();
        assert_eq!(rig.agent.state(), HunterState::Walking);
        if let Some(prey) = rig.prey.get_mut(id) {
            prey.position = Vec3::new(4.0, 0.0, 0.0);
        }
        rig.fire_refresh();
        assert_eq!(rig.agent.hunted_prey(), Some(id));
    }

    #[rstest]
    fn wandering_hunter_keeps_walking_while_nothing_is_near(mut rig: Rig) {
        rig.add_prey(50.0);
        rig.hunt();
        let destination = rig.agent.target_point();
        rig.fire_refresh();
        assert_eq!(rig.agent.state(), HunterState::Walking);
        assert_eq!(rig.agent.target_point(), destination);
        assert!(rig.agent.refresh_timer().is_some());
    }

    #[rstest]
    fn wandering_hunter_picks_a_new_point_on_arrival(mut rig: Rig) {
        rig.add_prey(50.0);
        rig.hunt();
        let first = rig.agent.target_point().expect("walking has a destination");
        for _ in 0..10 {
            rig.agent
                .update(Duration::from_secs(1), &rig.prey, &mut rig.scheduler);
        }
        assert_eq!(rig.agent.position(), first);
        rig.fire_refresh();
        assert_eq!(rig.agent.state(), HunterState::Walking);
        assert_ne!(rig.agent.target_point(), Some(first));
        assert!(rig.agent.refresh_timer().is_some());
    }

    #[rstest]
    fn fixed_point_walk_is_not_a_search(mut rig: Rig) {
        rig.add_prey(3.0);
        rig.agent.start_walking(Vec3::new(0.0, 0.0, 9.0), &mut rig.scheduler);
        assert!(rig.agent.refresh_timer().is_none());
        assert!(rig.scheduler.is_empty());
    }

    #[rstest]
    fn refresh_follows_prey_in_range(mut rig: Rig) {
        let id = rig.add_prey(5.0);
        rig.hunt();
        if let Some(prey) = rig.prey.get_mut(id) {
            prey.position = Vec3::new(6.0, 0.0, 3.0);
        }
        rig.fire_refresh();
        assert_eq!(
            rig.agent.behaviour(),
            Behaviour::Hunting {
                prey: id,
                last_seen: Vec3::new(6.0, 0.0, 3.0)
            }
        );
        assert_eq!(rig.scheduler.len(), 1);
    }

    #[rstest]
    fn refresh_reacquires_when_prey_runs_too_far(mut rig: Rig) {
        let runaway = rig.add_prey(5.0);
        rig.hunt();
        if let Some(prey) = rig.prey.get_mut(runaway) {
            prey.position = Vec3::new(25.0, 0.0, 0.0);
        }
        rig.fire_refresh();
        assert_ne!(rig.agent.hunted_prey(), Some(runaway));
        assert_eq!(rig.agent.state(), HunterState::Walking);
    }

    #[rstest]
    fn refresh_switches_to_next_nearest_prey(mut rig: Rig) {
        let runaway = rig.add_prey(5.0);
        let other = rig.add_prey(-7.0);
        rig.hunt();
        assert_eq!(rig.agent.hunted_prey(), Some(runaway));
        rig.prey.remove(runaway);
        rig.fire_refresh();
        assert_eq!(rig.agent.hunted_prey(), Some(other));
        assert_eq!(rig.scheduler.len(), 1, "only one refresh loop may be live");
    }

    #[rstest]
    fn stale_refresh_handle_is_ignored(mut rig: Rig) {
        let id = rig.add_prey(5.0);
        rig.hunt();
        let current = rig.agent.refresh_timer();
        rig.scheduler.begin_tick(Duration::ZERO);
        rig.agent.refresh_target(
            TimerHandle(u64::MAX),
            &rig.prey,
            &mut rig.rng,
            &mut rig.scheduler,
        );
        assert_eq!(rig.agent.refresh_timer(), current);
        assert_eq!(rig.agent.hunted_prey(), Some(id));
    }

    #[rstest]
    fn walking_steps_without_overshoot(mut rig: Rig) {
        let destination = Vec3::new(0.0, 0.0, 3.0);
        rig.agent.start_walking(destination, &mut rig.scheduler);
        rig.agent
            .update(Duration::from_secs(1), &rig.prey, &mut rig.scheduler);
        assert_relative_eq!(rig.agent.position().z, 2.0);
        rig.agent
            .update(Duration::from_secs(1), &rig.prey, &mut rig.scheduler);
        assert_eq!(rig.agent.position(), destination);
        let forward = rig.agent.orientation() * Vec3::Z;
        assert_relative_eq!(forward.z, 1.0, epsilon = 1e-5);
    }

    #[rstest]
    fn catching_prey_reports_capture_and_falls(mut rig: Rig) {
        let id = rig.add_prey(2.5);
        rig.hunt();
        let capture = rig
            .agent
            .update(Duration::from_millis(500), &rig.prey, &mut rig.scheduler);
        assert_eq!(
            capture,
            Some(Capture {
                hunter: HunterId(1),
                prey: id
            })
        );
        assert_eq!(rig.agent.state(), HunterState::Falling);
        assert!(rig.agent.refresh_timer().is_none());
        assert!(rig.agent.destroy_timer().is_some());
    }

    #[rstest]
    fn falling_twice_arms_one_destroy_timer(mut rig: Rig) {
        rig.add_prey(5.0);
        rig.hunt();
        assert!(rig.agent.start_falling(&mut rig.scheduler));
        let first = rig.agent.destroy_timer();
        assert!(!rig.agent.start_falling(&mut rig.scheduler));
        assert_eq!(rig.agent.destroy_timer(), first);
        assert_eq!(rig.scheduler.len(), 1);
        assert!(rig.agent.body().is_free_falling());
    }

    #[rstest]
    fn falling_hunters_ignore_movement_commands(mut rig: Rig) {
        rig.agent.start_falling(&mut rig.scheduler);
        assert!(!rig.agent.start_walking(Vec3::ONE, &mut rig.scheduler));
        assert!(!rig.hunt());
        assert_eq!(rig.agent.state(), HunterState::Falling);
        let before = rig.agent.position();
        rig.agent
            .update(Duration::from_millis(100), &rig.prey, &mut rig.scheduler);
        assert!(rig.agent.position().y < before.y);
    }

    #[rstest]
    fn destruction_cancels_owned_timers(mut rig: Rig) {
        rig.add_prey(5.0);
        rig.hunt();
        rig.agent.mark_destroyed(&mut rig.scheduler);
        assert_eq!(rig.agent.state(), HunterState::Destroyed);
        assert!(rig.scheduler.is_empty());
    }

    #[rstest]
    fn animation_signals_follow_lifecycle(mut rig: Rig) {
        rig.agent.start_walking(Vec3::X, &mut rig.scheduler);
        rig.agent.refresh_animation();
        rig.agent.start_falling(&mut rig.scheduler);
        assert_eq!(
            rig.recorder.history(),
            vec![
                AnimationSignal::Walking(false),
                AnimationSignal::Falling(false),
                AnimationSignal::Walking(true),
                AnimationSignal::Falling(false),
                AnimationSignal::Walking(false),
                AnimationSignal::Walking(true),
                AnimationSignal::Walking(false),
                AnimationSignal::Falling(true),
            ]
        );
    }
}
