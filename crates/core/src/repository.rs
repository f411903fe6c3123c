// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage boundary for governance state and its audit log.

use crate::state::{GovernanceState, TransitionResult};
use thiserror::Error;
use tracing::debug;
use vigov_audit::AuditEvent;

/// Errors raised by a governance repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The transition was computed against a state that is no longer current.
    #[error("stale revision: transition based on {expected}, repository is at {actual}")]
    StaleRevision {
        /// The revision the transition was computed against.
        expected: u64,
        /// The current revision.
        actual: u64,
    },
    /// No audit event has the given id.
    #[error("audit event {0} not found")]
    EventNotFound(u64),
}

/// A revision-stamped view of the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revisioned {
    /// The revision the state was read at.
    pub revision: u64,
    /// The state.
    pub state: GovernanceState,
}

/// Stores governance state and the audit events that produced it.
///
/// A transition is validated against the state read at some revision and
/// may only be committed at that same revision. Validation and the write
/// therefore behave as one atomic step.
pub trait GovernanceRepository {
    /// Reads the current state with its revision.
    fn load(&self) -> Revisioned;

    /// Commits a transition computed against `base_revision`.
    ///
    /// Returns the audit event stamped with its event id.
    ///
    /// # Errors
    ///
    /// Returns `StaleRevision` if the repository has moved past
    /// `base_revision`.
    fn commit(
        &mut self,
        base_revision: u64,
        result: TransitionResult,
    ) -> Result<AuditEvent, RepositoryError>;

    /// Returns all committed audit events, oldest first.
    fn audit_log(&self) -> Vec<AuditEvent>;

    /// Returns one committed audit event.
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` if no event has the id.
    fn audit_event(&self, event_id: u64) -> Result<AuditEvent, RepositoryError> {
        self.audit_log()
            .into_iter()
            .find(|event| event.event_id == Some(event_id))
            .ok_or(RepositoryError::EventNotFound(event_id))
    }
}

/// Keeps governance state and the audit log in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    revision: u64,
    state: GovernanceState,
    events: Vec<AuditEvent>,
}

impl InMemoryRepository {
    /// Creates a repository holding `state` at revision 0.
    #[must_use]
    pub const fn new(state: GovernanceState) -> Self {
        Self {
            revision: 0,
            state,
            events: Vec::new(),
        }
    }

    /// The current revision.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &GovernanceState {
        &self.state
    }
}

impl GovernanceRepository for InMemoryRepository {
    fn load(&self) -> Revisioned {
        Revisioned {
            revision: self.revision,
            state: self.state.clone(),
        }
    }

    fn commit(
        &mut self,
        base_revision: u64,
        result: TransitionResult,
    ) -> Result<AuditEvent, RepositoryError> {
        if base_revision != self.revision {
            return Err(RepositoryError::StaleRevision {
                expected: base_revision,
                actual: self.revision,
            });
        }

        // One event per commit, so the next revision doubles as the event id.
        let event_id: u64 = self.revision + 1;
        let event: AuditEvent = result.audit_event.with_event_id(event_id);
        self.state = result.new_state;
        self.revision += 1;
        self.events.push(event.clone());

        debug!(
            event_id,
            revision = self.revision,
            action = %event.action.name,
            "Committed transition"
        );

        Ok(event)
    }

    fn audit_log(&self) -> Vec<AuditEvent> {
        self.events.clone()
    }
}
