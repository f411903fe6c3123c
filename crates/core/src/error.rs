// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use vigov_domain::{AssignmentStatus, DenyReason, DomainError};

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The acting user's role or scope does not permit the change.
    Denied(DenyReason),
    /// No role assignment has the given id.
    AssignmentNotFound(u64),
    /// Two role assignments share an id.
    DuplicateAssignment(u64),
    /// The assignment is not in a status the command applies to.
    InvalidAssignmentState {
        /// The assignment.
        assignment_id: u64,
        /// Its current status.
        status: AssignmentStatus,
    },
    /// The approver is the requester, or the user receiving the role.
    SelfApproval {
        /// The assignment.
        assignment_id: u64,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Denied(reason) => write!(f, "Denied: {reason}"),
            Self::AssignmentNotFound(id) => write!(f, "Role assignment {id} not found"),
            Self::DuplicateAssignment(id) => {
                write!(f, "Role assignment {id} appears more than once")
            }
            Self::InvalidAssignmentState {
                assignment_id,
                status,
            } => {
                write!(
                    f,
                    "Role assignment {assignment_id} is {status:?} and cannot be changed this way"
                )
            }
            Self::SelfApproval { assignment_id } => {
                write!(
                    f,
                    "Role assignment {assignment_id} must be approved by a second, distinct person"
                )
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<DenyReason> for CoreError {
    fn from(reason: DenyReason) -> Self {
        Self::Denied(reason)
    }
}
