// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;
use vigov_domain::{AdminUnit, InspectionCenter, RoleId, Scope, UnitAssignment, UserId};

/// A command represents user intent as data only.
///
/// Commands are the only way to request governance state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a new administrative unit.
    CreateUnit {
        /// The unit to add.
        unit: AdminUnit,
    },
    /// Replace an existing administrative unit (rename, re-parent, retire).
    UpdateUnit {
        /// The new version of the unit.
        unit: AdminUnit,
    },
    /// Add a new inspection center.
    CreateCenter {
        /// The center to add.
        center: InspectionCenter,
    },
    /// Request a role for a user within a scope.
    AssignRole {
        /// The user receiving the role.
        user_id: UserId,
        /// The role.
        role_id: RoleId,
        /// Where the role applies.
        scope: Scope,
        /// First day in force.
        effective_from: Date,
        /// Last day in force, if bounded.
        effective_to: Option<Date>,
    },
    /// Approve a pending role assignment.
    ApproveAssignment {
        /// The assignment.
        assignment_id: u64,
    },
    /// Reject a pending role assignment.
    RejectAssignment {
        /// The assignment.
        assignment_id: u64,
    },
    /// Withdraw an active or pending role assignment.
    RevokeAssignment {
        /// The assignment.
        assignment_id: u64,
    },
    /// Designate an institution for an administrative unit.
    AssignOwner {
        /// The designation. An active owner designation replaces any earlier
        /// active owner of the same unit.
        designation: UnitAssignment,
    },
}

impl Command {
    /// The action name recorded in audit events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateUnit { .. } => "CreateUnit",
            Self::UpdateUnit { .. } => "UpdateUnit",
            Self::CreateCenter { .. } => "CreateCenter",
            Self::AssignRole { .. } => "AssignRole",
            Self::ApproveAssignment { .. } => "ApproveAssignment",
            Self::RejectAssignment { .. } => "RejectAssignment",
            Self::RevokeAssignment { .. } => "RevokeAssignment",
            Self::AssignOwner { .. } => "AssignOwner",
        }
    }
}
