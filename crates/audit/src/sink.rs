// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Destinations for committed audit events.

use crate::AuditEvent;
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// A destination that committed audit events are emitted to.
///
/// Sinks observe events after they are committed; they never decide whether
/// a transition happens.
pub trait AuditSink: Send + Sync {
    /// Records a committed event.
    fn record(&self, event: &AuditEvent);
}

/// Emits audit events as structured `tracing` records under the `audit`
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        let jurisdiction: String = event
            .jurisdiction
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<String>>()
            .join(",");
        info!(
            target: "audit",
            event_id = ?event.event_id,
            actor_id = %event.actor.id,
            actor_type = %event.actor.actor_type,
            cause_id = %event.cause.id,
            action = %event.action.name,
            details = event.action.details.as_deref().unwrap_or(""),
            jurisdiction = %jurisdiction,
            before = %event.before.data,
            after = %event.after.data,
            "Audit event"
        );
    }
}

/// Keeps audit events in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &AuditEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

impl<S: AuditSink + ?Sized> AuditSink for std::sync::Arc<S> {
    fn record(&self, event: &AuditEvent) {
        (**self).record(event);
    }
}
