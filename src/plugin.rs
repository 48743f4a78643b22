//! Bevy plugin running a [`Session`] inside an `App`.
//!
//! Each `Update` advances the session by one configured tick, then mirrors
//! hunters and prey into the ECS as [`HunterMarker`] and [`PreyMarker`]
//! entities carrying a `Transform` and a `Name`. Player reports arrive as
//! [`ReportHunter`] events; the end of the prey population is announced with
//! [`PopulationExhausted`].

use std::time::Duration;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use hashbrown::HashMap;
use log::{error, info};
use thiserror::Error;

use crate::config::SessionConfig;
use crate::hunter::{HunterId, HunterState, ReportOutcome};
use crate::prey::PreyId;
use crate::session::{Session, SessionEvent};

/// The running session.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct Simulation(pub Session);

/// Every [`SessionEvent`] emitted so far, oldest first.
#[derive(Resource, Debug, Default)]
pub struct SessionLog {
    /// Recorded events.
    pub events: Vec<SessionEvent>,
}

impl SessionLog {
    /// Removes and returns the recorded events.
    pub fn take(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

/// ECS entities standing in for simulation objects.
#[derive(Resource, Debug, Default)]
pub struct MirroredEntities {
    hunters: HashMap<HunterId, Entity>,
    prey: HashMap<PreyId, Entity>,
}

impl MirroredEntities {
    /// Entity mirroring hunter `id`.
    #[must_use]
    pub fn hunter(&self, id: HunterId) -> Option<Entity> {
        self.hunters.get(&id).copied()
    }

    /// Entity mirroring prey `id`.
    #[must_use]
    pub fn prey(&self, id: PreyId) -> Option<Entity> {
        self.prey.get(&id).copied()
    }
}

/// Tags the entity standing in for a hunter.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunterMarker {
    /// Mirrored hunter.
    pub id: HunterId,
    /// Its state as of the last frame.
    pub state: HunterState,
}

/// Tags the entity standing in for a prey.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreyMarker {
    /// Mirrored prey.
    pub id: PreyId,
}

/// Player action resolving the active hunter.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ReportHunter;

/// Raised once when the last prey is gone.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationExhausted {
    /// Simulated time of extinction.
    pub at: Duration,
}

/// Raised when the plugin refuses an invalid configuration.
#[derive(Event, Debug, Clone, Error)]
#[error("invalid session configuration: {detail}")]
pub struct SimulationConfigError {
    /// Rendered [`crate::config::ConfigError`].
    pub detail: String,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_config_error(event: On<SimulationConfigError>) {
    error!("{}", event.event());
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn handle_report_hunter(_event: On<ReportHunter>, mut simulation: ResMut<Simulation>) {
    match simulation.report_hunter() {
        ReportOutcome::Reported(hunter) => info!("player reported hunter {hunter}"),
        ReportOutcome::NoActiveHunter => info!("player report found no hunter"),
    }
}

/// Advances the session by one tick and records its events.
pub fn advance_simulation_system(
    mut commands: Commands,
    mut simulation: ResMut<Simulation>,
    mut log: ResMut<SessionLog>,
) {
    let dt = simulation.tick_duration();
    simulation.advance(dt);
    for event in simulation.drain_events() {
        if event == SessionEvent::PopulationExtinct {
            commands.trigger(PopulationExhausted {
                at: simulation.now(),
            });
        }
        log.events.push(event);
    }
}

/// Spawns, moves and despawns marker entities to match the session.
pub fn mirror_entities_system(
    mut commands: Commands,
    simulation: Res<Simulation>,
    mut mirrored: ResMut<MirroredEntities>,
    mut hunters: Query<(&mut Transform, &mut HunterMarker), Without<PreyMarker>>,
    mut prey: Query<&mut Transform, (With<PreyMarker>, Without<HunterMarker>)>,
) {
    let session = &simulation.0;
    let MirroredEntities {
        hunters: hunter_entities,
        prey: prey_entities,
    } = &mut *mirrored;

    for agent in session.coordinator().agents() {
        let transform =
            Transform::from_translation(agent.position()).with_rotation(agent.orientation());
        let marker = HunterMarker {
            id: agent.id(),
            state: agent.state(),
        };
        if let Some(&entity) = hunter_entities.get(&agent.id()) {
            if let Ok((mut current, mut current_marker)) = hunters.get_mut(entity) {
                *current = transform;
                *current_marker = marker;
            }
            continue;
        }
        let entity = commands
            .spawn((marker, Name::new(agent.name().to_owned()), transform))
            .id();
        hunter_entities.insert(agent.id(), entity);
    }
    hunter_entities.retain(|id, entity| {
        let alive = session.coordinator().agent(*id).is_some();
        if !alive {
            commands.entity(*entity).despawn();
        }
        alive
    });

    let registry = session.habitat().registry();
    for (id, animal) in registry.iter() {
        let transform = Transform::from_translation(animal.position);
        if let Some(&entity) = prey_entities.get(&id) {
            if let Ok(mut current) = prey.get_mut(entity) {
                *current = transform;
            }
            continue;
        }
        let entity = commands
            .spawn((PreyMarker { id }, Name::new(animal.name.clone()), transform))
            .id();
        prey_entities.insert(id, entity);
    }
    prey_entities.retain(|id, entity| {
        let alive = registry.get(*id).is_some();
        if !alive {
            commands.entity(*entity).despawn();
        }
        alive
    });
}

/// Installs the simulation, its systems and its observers.
#[derive(Debug, Clone, Default)]
pub struct KomodoGuardPlugin {
    /// Configuration for the hosted session.
    pub config: SessionConfig,
}

impl KomodoGuardPlugin {
    /// Plugin hosting a session built from `config`.
    #[must_use]
    pub const fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl Plugin for KomodoGuardPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_config_error);

        let session = match Session::try_new(self.config.clone()) {
            Ok(session) => session,
            Err(e) => {
                app.world_mut().trigger(SimulationConfigError {
                    detail: e.to_string(),
                });
                return;
            }
        };

        app.insert_resource(Simulation(session))
            .init_resource::<SessionLog>()
            .init_resource::<MirroredEntities>()
            .add_observer(handle_report_hunter)
            .add_systems(
                Update,
                (advance_simulation_system, mirror_entities_system).chain(),
            );
    }
}
