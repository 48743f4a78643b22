//! Runs the simulation inside a headless Bevy app.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use komodo_guard::plugin::{HunterMarker, MirroredEntities, PreyMarker, SimulationConfigError};
use komodo_guard::{
    PopulationExhausted, ReportHunter, SessionConfig, SessionEvent, SessionLog, Simulation,
};
use rstest::rstest;
use static_assertions::assert_impl_all;
use test_utils::{plugin_app, ConfigBuilder};

assert_impl_all!(Simulation: Send, Sync);

/// Further from the prey spawn square than any detection radius.
const OUT_OF_REACH: Vec3 = Vec3::new(0.0, 0.0, 60.0);

#[derive(Resource, Default, Debug)]
struct Captured {
    exhausted: usize,
    config_errors: Vec<String>,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_exhausted(_event: On<PopulationExhausted>, mut captured: ResMut<Captured>) {
    captured.exhausted += 1;
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_config_error(event: On<SimulationConfigError>, mut captured: ResMut<Captured>) {
    captured.config_errors.push(event.event().detail.clone());
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn hunter_names(app: &mut App) -> Vec<String> {
    let mut query = app
        .world_mut()
        .query_filtered::<&Name, With<HunterMarker>>();
    query
        .iter(app.world())
        .map(|name| name.as_str().to_owned())
        .collect()
}

#[rstest]
fn prey_and_hunters_are_mirrored_as_entities() {
    let config = ConfigBuilder::new()
        .prey_count(4)
        .spawn_at(OUT_OF_REACH)
        .build();
    let mut app = plugin_app(config);
    run_frames(&mut app, 12);

    let prey = app
        .world_mut()
        .query::<(&PreyMarker, &Transform)>()
        .iter(app.world())
        .count();
    assert_eq!(prey, 4);
    assert_eq!(hunter_names(&mut app), vec!["FirstHunter".to_owned()]);

    let simulation = app.world().resource::<Simulation>();
    let hunter = simulation
        .coordinator()
        .active_hunter()
        .unwrap_or_else(|| panic!("hunter should be active"));
    let entity = app
        .world()
        .resource::<MirroredEntities>()
        .hunter(hunter.id())
        .unwrap_or_else(|| panic!("hunter should be mirrored"));
    let transform = app
        .world()
        .get::<Transform>(entity)
        .unwrap_or_else(|| panic!("hunter entity has a transform"));
    assert_eq!(transform.translation, hunter.position());
}

#[rstest]
fn report_event_resolves_the_active_hunter() {
    let mut app = plugin_app(ConfigBuilder::new().spawn_at(OUT_OF_REACH).build());
    run_frames(&mut app, 12);
    app.world_mut().trigger(ReportHunter);
    run_frames(&mut app, 1);

    let log = app.world().resource::<SessionLog>();
    assert!(log
        .events
        .iter()
        .any(|e| matches!(e, SessionEvent::HunterReported { .. })));

    run_frames(&mut app, 25);
    assert!(hunter_names(&mut app).is_empty());
}

#[rstest]
fn extinction_is_announced_once() {
    let config = ConfigBuilder::new()
        .prey_count(1)
        .hunter_timeout(2.0)
        .respawn_delay(0.5)
        .build();
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .init_resource::<Captured>()
        .add_observer(record_exhausted)
        .add_plugins(komodo_guard::KomodoGuardPlugin::new(config));
    run_frames(&mut app, 100);

    assert_eq!(app.world().resource::<Captured>().exhausted, 1);
    let prey = app
        .world_mut()
        .query::<&PreyMarker>()
        .iter(app.world())
        .count();
    assert_eq!(prey, 0);
}

#[rstest]
fn invalid_configuration_is_reported_not_installed() {
    let config = SessionConfig {
        tick_seconds: -1.0,
        ..SessionConfig::default()
    };
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .init_resource::<Captured>()
        .add_observer(record_config_error)
        .add_plugins(komodo_guard::KomodoGuardPlugin::new(config));
    app.update();

    assert!(app.world().get_resource::<Simulation>().is_none());
    let errors = &app.world().resource::<Captured>().config_errors;
    assert_eq!(errors.len(), 1);
    assert!(errors.iter().all(|detail| detail.contains("tick_seconds")));
}
