// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::role::RoleId;
use crate::types::{Scope, UnitId, UnitStatus, UserId};
use serde::{Deserialize, Serialize};
use time::Date;

/// Lifecycle status of a role assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentStatus {
    /// In force.
    Active,
    /// Waiting for approval.
    Pending,
    /// Past its end date, superseded, or rejected.
    Expired,
    /// Withdrawn by an administrator.
    Revoked,
}

/// Approval state of a role assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApprovalStatus {
    /// No approval was needed.
    NotRequired,
    /// Waiting for an approver.
    Pending,
    /// Approved by a second person.
    Approved,
    /// Rejected by an approver.
    Rejected,
}

/// A role granted to a user within a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Sequential assignment identifier.
    pub assignment_id: u64,
    /// The user holding the role.
    pub user_id: UserId,
    /// The granted role.
    pub role_id: RoleId,
    /// The jurisdiction the role applies to.
    pub scope: Scope,
    /// Lifecycle status.
    pub status: AssignmentStatus,
    /// First day in force.
    pub effective_from: Date,
    /// Last day in force, if bounded.
    #[serde(default)]
    pub effective_to: Option<Date>,
    /// Whether the assignment had to be approved.
    pub approval_required: bool,
    /// Approval state.
    pub approval_status: ApprovalStatus,
    /// The user who requested the assignment.
    pub requested_by: UserId,
    /// The user who approved or rejected it, if any.
    #[serde(default)]
    pub approved_by: Option<UserId>,
}

impl RoleAssignment {
    /// Returns true if `date` lies within the effective range.
    #[must_use]
    pub fn is_effective_on(&self, date: Date) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| date <= to)
    }

    /// Returns true if the assignment is active and in effect on `date`.
    #[must_use]
    pub fn is_active_on(&self, date: Date) -> bool {
        self.status == AssignmentStatus::Active && self.is_effective_on(date)
    }
}

/// Returns the single active role assignment of `user_id` on `date`.
///
/// Only one active assignment per user is modeled. If several are found the
/// user's effective role is ambiguous and resolution fails rather than
/// picking one.
///
/// # Errors
///
/// Returns an error if the user has more than one active assignment.
pub fn active_assignment<'a>(
    assignments: &'a [RoleAssignment],
    user_id: &UserId,
    date: Date,
) -> Result<Option<&'a RoleAssignment>, DomainError> {
    let active: Vec<&RoleAssignment> = assignments
        .iter()
        .filter(|a| a.user_id == *user_id && a.is_active_on(date))
        .collect();

    match active.as_slice() {
        [] => Ok(None),
        [single] => Ok(Some(single)),
        many => Err(DomainError::MultipleActiveAssignments {
            user_id: user_id.to_string(),
            count: many.len(),
        }),
    }
}

/// The kind of responsibility an institution holds for a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitAssignmentType {
    /// Primarily responsible for the unit.
    Owner,
    /// Runs day-to-day operations in the unit.
    Operator,
    /// Oversees the unit without operating it.
    Oversight,
}

/// Designation of an institution or office for an administrative unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAssignment {
    /// The unit.
    pub unit_id: UnitId,
    /// The designated institution or office.
    pub institution: String,
    /// The kind of responsibility.
    pub assignment_type: UnitAssignmentType,
    /// Whether the designation is in force.
    pub status: UnitStatus,
}

impl UnitAssignment {
    /// Creates an active designation.
    #[must_use]
    pub fn new(unit_id: &str, institution: &str, assignment_type: UnitAssignmentType) -> Self {
        Self {
            unit_id: UnitId::new(unit_id),
            institution: institution.to_string(),
            assignment_type,
            status: UnitStatus::Active,
        }
    }
}
