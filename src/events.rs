//! Event sink for outbound coordination events
//!
//! The core never owns a transport; it hands every event to a caller-provided
//! sink. Publishing is synchronous because the core itself never suspends.

use crate::error::Result;
use crate::types::CoreEvent;
use tracing::debug;

/// Trait for publishing coordination events
pub trait EventSink: Send + Sync {
    /// Publish a core event to whatever the caller wired up
    fn publish(&self, event: CoreEvent) -> Result<()>;
}

/// Sink that drops every event, for callers without an event consumer
#[derive(Debug, Clone, Default)]
pub struct NullEventSink;

impl NullEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for NullEventSink {
    fn publish(&self, event: CoreEvent) -> Result<()> {
        debug!(?event, "event dropped by null sink");
        Ok(())
    }
}
