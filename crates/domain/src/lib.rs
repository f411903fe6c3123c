// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod assignment;
mod authorizer;
mod delegation;
mod error;
mod jurisdiction;
mod role;
mod types;
mod validation;
mod visibility;

#[cfg(test)]
mod tests;

pub use assignment::{
    ApprovalStatus, AssignmentStatus, RoleAssignment, UnitAssignment, UnitAssignmentType,
    active_assignment,
};
pub use authorizer::{
    ActorContext, AssignmentDecision, AssignmentOutcome, DenyReason, ScopeAuthorizer,
};
pub use delegation::{DelegationPolicy, DelegationPolicyStore};
pub use jurisdiction::{JurisdictionTree, PATH_SEPARATOR, TreeNode, units_without_owner};
pub use visibility::{RecordKind, RecordRef, RecordScopeFilter, ScopedRecord};

// Re-export public types
pub use error::DomainError;
pub use role::{Permission, RoleCatalog, RoleCategory, RoleDefinition, RoleId};
pub use types::{
    AdminUnit, CenterId, InspectionCenter, JurisdictionRef, Scope, ScopeType, UnitId, UnitStatus,
    UnitType, UserId,
};
pub use validation::{
    validate_center_fields, validate_effective_range, validate_scope_targets,
    validate_unit_fields,
};
