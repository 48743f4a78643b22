//! Headless runner for the komodo guard simulation.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bevy::ecs::prelude::On;
use bevy::prelude::*;
use clap::Parser;
use komodo_guard::numeric::{duration_from_seconds, frames_to_cover};
use komodo_guard::{
    init_logging, KomodoGuardPlugin, PopulationExhausted, PopulationTracker, ReportHunter,
    SessionConfig, SessionEvent, SessionLog, Simulation,
};
use log::info;

/// Headless hunter pursuit simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON session configuration; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(short, long, default_value_t = 120.0)]
    seconds: f32,

    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Report each hunter once it has been active for this many seconds
    #[arg(long)]
    report_after: Option<f32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Resource, Default)]
struct Exhausted(bool);

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn mark_exhausted(event: On<PopulationExhausted>, mut exhausted: ResMut<Exhausted>) {
    info!(
        "prey population exhausted at {:.1}s",
        event.event().at.as_secs_f32()
    );
    exhausted.0 = true;
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config
        .validate()
        .context("invalid session configuration")?;
    Ok(config)
}

fn hunter_overdue(app: &App, threshold: Duration) -> bool {
    app.world()
        .get_resource::<Simulation>()
        .is_some_and(|simulation| {
            simulation
                .coordinator()
                .active_since()
                .is_some_and(|since| simulation.now().saturating_sub(since) >= threshold)
        })
}

fn summarise(app: &App) {
    let world = app.world();
    let Some(simulation) = world.get_resource::<Simulation>() else {
        return;
    };
    let events = world
        .get_resource::<SessionLog>()
        .map_or(&[][..], |log| log.events.as_slice());
    let count = |wanted: fn(&SessionEvent) -> bool| events.iter().filter(|e| wanted(e)).count();
    info!(
        "after {:.1}s: {} hunters spawned, {} captures, {} reported, {} timed out, {} prey left",
        simulation.now().as_secs_f32(),
        count(|e| matches!(e, SessionEvent::HunterSpawned { .. })),
        count(|e| matches!(e, SessionEvent::HunterCaptured { .. })),
        count(|e| matches!(e, SessionEvent::HunterReported { .. })),
        count(|e| matches!(e, SessionEvent::HunterTimedOut { .. })),
        simulation.habitat().current_count(),
    );
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let frames = frames_to_cover(args.seconds, duration_from_seconds(config.tick_seconds));
    let report_after = args.report_after.map(duration_from_seconds);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .init_resource::<Exhausted>()
        .add_observer(mark_exhausted)
        .add_plugins(KomodoGuardPlugin::new(config));

    for _ in 0..frames {
        app.update();
        if app
            .world()
            .get_resource::<Exhausted>()
            .is_some_and(|exhausted| exhausted.0)
        {
            break;
        }
        if report_after.is_some_and(|threshold| hunter_overdue(&app, threshold)) {
            app.world_mut().trigger(ReportHunter);
        }
    }

    summarise(&app);
    Ok(())
}
