//! Helpers that drive sessions and apps forward.

use std::time::Duration;

use bevy::prelude::*;
use komodo_guard::{KomodoGuardPlugin, Session, SessionConfig, SessionEvent};

/// Steps `session` for `seconds` of simulated time and returns the events
/// emitted on the way.
pub fn run_for(session: &mut Session, seconds: f32) -> Vec<SessionEvent> {
    let end = session.now() + Duration::from_secs_f32(seconds);
    let mut events = Vec::new();
    while session.now() < end {
        session.step();
        events.extend(session.drain_events());
    }
    events
}

/// Steps `session` until an event matching `wanted` is emitted, giving up
/// after `limit_seconds`.
///
/// Returns the simulated time at the end of the matching tick and the event.
pub fn run_until_event<F>(
    session: &mut Session,
    limit_seconds: f32,
    wanted: F,
) -> Option<(Duration, SessionEvent)>
where
    F: Fn(&SessionEvent) -> bool,
{
    let end = session.now() + Duration::from_secs_f32(limit_seconds);
    while session.now() < end {
        session.step();
        if let Some(event) = session.drain_events().into_iter().find(|e| wanted(e)) {
            return Some((session.now(), event));
        }
    }
    None
}

/// Number of events matching `wanted`.
pub fn count_events<F>(events: &[SessionEvent], wanted: F) -> usize
where
    F: Fn(&SessionEvent) -> bool,
{
    events.iter().filter(|e| wanted(e)).count()
}

/// Headless app running [`KomodoGuardPlugin`] with `config`.
pub fn plugin_app(config: SessionConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(KomodoGuardPlugin::new(config));
    app
}
