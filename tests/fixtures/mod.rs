//! Test fixtures and mock implementations for integration testing

use scrim_room::error::Result;
use scrim_room::events::EventSink;
use scrim_room::types::CoreEvent;
use std::sync::{Arc, Mutex};

/// Event sink that captures published events for assertions
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    published_events: Arc<Mutex<Vec<CoreEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self {
            published_events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get all published events (for testing)
    pub fn published_events(&self) -> Vec<CoreEvent> {
        self.published_events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Count events of a specific type
    pub fn count_events_of_type(&self, event_type: &str) -> usize {
        self.published_events()
            .iter()
            .filter(|event| match event {
                CoreEvent::PlayerJoinedRoom(_) => event_type == "PlayerJoinedRoom",
                CoreEvent::PlayerLeftRoom(_) => event_type == "PlayerLeftRoom",
                CoreEvent::TeamsAssigned(_) => event_type == "TeamsAssigned",
                CoreEvent::MatchCreated(_) => event_type == "MatchCreated",
                CoreEvent::MatchFinished(_) => event_type == "MatchFinished",
            })
            .count()
    }
}

impl EventSink for RecordingEventSink {
    fn publish(&self, event: CoreEvent) -> Result<()> {
        if let Ok(mut events) = self.published_events.lock() {
            events.push(event);
        }
        Ok(())
    }
}

/// Install a test subscriber so tracing output is visible with
/// `cargo test -- --nocapture`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
