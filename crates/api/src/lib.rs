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

mod auth;
mod capabilities;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, authenticate};
pub use capabilities::{compute_actor_capabilities, compute_assignment_capabilities};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{
    ApiResult, approve_assignment, assign_owner, assign_role, audit_event, audit_log,
    authorize_assignment, capabilities, create_center, create_unit, jurisdiction_tree,
    list_assignments, list_units, reject_assignment, revoke_assignment, unit_path,
    units_without_owner, update_unit, visible_records,
};
pub use request_response::{
    ActorCapabilities, AssignOwnerRequest, AssignRoleRequest, AssignmentActionRequest,
    AssignmentCapabilities, AssignmentInfo, AuditLogResponse, AuthorizeAssignmentRequest,
    AuthorizeAssignmentResponse, Capability, CreateCenterRequest, ListAssignmentsResponse,
    ListUnitsResponse, TreeResponse, UnitInfo, UnitPathResponse, UnitRequest,
    UnitsWithoutOwnerResponse, VisibleRecordsResponse, WriteResponse,
};
