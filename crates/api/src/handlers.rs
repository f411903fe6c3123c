// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Read handlers work on a loaded [`GovernanceState`]. Write handlers load
//! the current revision from a [`GovernanceRepository`], check the caller's
//! permission, apply the command and commit the result.

use time::Date;
use tracing::{debug, info};
use vigov::{
    Command, GovernanceRepository, GovernanceState, Revisioned, TransitionResult, apply,
};
use vigov_audit::{AuditEvent, Cause};
use vigov_domain::{
    ActorContext, AdminUnit, AssignmentOutcome, CenterId, JurisdictionRef, JurisdictionTree,
    RecordKind, RecordRef, RoleAssignment, Scope, ScopeType, TreeNode, UnitId, UserId,
};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::capabilities::{compute_actor_capabilities, compute_assignment_capabilities};
use crate::error::ApiError;
use crate::request_response::{
    ActorCapabilities, AssignOwnerRequest, AssignRoleRequest, AssignmentActionRequest,
    AssignmentInfo, AuditLogResponse, AuthorizeAssignmentRequest, AuthorizeAssignmentResponse,
    CreateCenterRequest, ListAssignmentsResponse, ListUnitsResponse, TreeResponse, UnitInfo,
    UnitPathResponse, UnitRequest, UnitsWithoutOwnerResponse, VisibleRecordsResponse,
    WriteResponse,
};

/// The result of a committed API operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// The committed audit event, stamped with its event id.
    pub audit_event: AuditEvent,
}

/// Applies `command` against the repository's current revision and commits
/// the result.
fn execute<R: GovernanceRepository + ?Sized>(
    repository: &mut R,
    current: Revisioned,
    command: Command,
    actor: &AuthenticatedActor,
    cause: Cause,
    as_of: Date,
) -> Result<ApiResult<WriteResponse>, ApiError> {
    let result: TransitionResult = apply(
        &current.state,
        command,
        &actor.to_acting_user(),
        cause,
        as_of,
    )?;
    let audit_event: AuditEvent = repository.commit(current.revision, result)?;
    let event_id: u64 = audit_event.event_id.ok_or_else(|| ApiError::Internal {
        message: String::from("Committed audit event has no event id"),
    })?;

    info!(
        event_id,
        user_id = %actor.user_id,
        action = %audit_event.action.name,
        "Applied command"
    );

    Ok(ApiResult {
        response: WriteResponse {
            event_id,
            message: audit_event.action.details.clone().unwrap_or_default(),
        },
        audit_event,
    })
}

/// Decides whether an assignment of `target_role` at `target_scope` is
/// allowed.
///
/// The decision is evaluated for the request's `actor` when given, and for
/// the caller otherwise. Nothing is changed.
#[must_use]
pub fn authorize_assignment(
    state: &GovernanceState,
    request: &AuthorizeAssignmentRequest,
    actor: &AuthenticatedActor,
) -> AuthorizeAssignmentResponse {
    let context: ActorContext = request.actor.clone().unwrap_or_else(|| actor.context());
    let outcome: AssignmentOutcome =
        state
            .authorizer()
            .evaluate_assignment(&context, request.target_role, &request.target_scope);

    debug!(
        role = %context.role,
        target_role = %request.target_role,
        target_scope = %request.target_scope,
        decision = ?outcome.decision,
        "Evaluated assignment"
    );

    AuthorizeAssignmentResponse {
        allowed: outcome.decision.is_allowed(),
        reason: outcome.decision.reason(),
        message: outcome.decision.reason().map(|r| r.message().to_string()),
        requires_approval: outcome.requires_approval,
    }
}

/// Lists the records the caller may see.
///
/// Records of kinds the caller's role may not view are left out. With
/// `kind` given, only that kind is listed and a missing permission is an
/// error.
///
/// # Errors
///
/// Returns an error if `kind` is given and the role may not view it.
pub fn visible_records(
    state: &GovernanceState,
    actor: &AuthenticatedActor,
    kind: Option<RecordKind>,
) -> Result<VisibleRecordsResponse, ApiError> {
    if let Some(kind) = kind {
        AuthorizationService::authorize_view_records(state.catalog(), actor, kind)?;
    }

    let records: Vec<RecordRef> = state
        .record_filter()
        .filter_visible(state.records(), &actor.scope)
        .into_iter()
        .filter(|record| kind.is_none_or(|k| record.kind == k))
        .filter(|record| {
            state
                .catalog()
                .has_permission(actor.role, record.kind.required_permission())
        })
        .cloned()
        .collect();

    Ok(VisibleRecordsResponse {
        scope: actor.scope.clone(),
        records,
    })
}

/// Returns true if `unit` is inside `scope`.
///
/// A center scope sees the units that own its centers.
fn unit_in_scope(tree: &JurisdictionTree, scope: &Scope, unit: &AdminUnit) -> bool {
    if tree.scope_contains(scope, &JurisdictionRef::Unit(unit.id.clone())) {
        return true;
    }
    tree.centers().any(|center| {
        center.admin_unit_id == unit.id
            && tree.scope_contains(scope, &JurisdictionRef::Center(center.id.clone()))
    })
}

/// Lists the units inside the caller's scope with their paths.
///
/// # Errors
///
/// Returns an error if a unit's path cannot be derived.
pub fn list_units(
    state: &GovernanceState,
    actor: &AuthenticatedActor,
) -> Result<ListUnitsResponse, ApiError> {
    let tree: &JurisdictionTree = state.tree();
    let mut units: Vec<UnitInfo> = Vec::new();
    for unit in tree.units() {
        if unit_in_scope(tree, &actor.scope, unit) {
            units.push(UnitInfo {
                unit: unit.clone(),
                path: tree.path(&unit.id)?,
            });
        }
    }
    Ok(ListUnitsResponse { units })
}

/// Returns the jurisdiction path of a unit.
///
/// The structure is readable by any authenticated actor, whatever their scope.
///
/// # Errors
///
/// Returns an error if the unit does not exist.
pub fn unit_path(state: &GovernanceState, unit_id: &str) -> Result<UnitPathResponse, ApiError> {
    let unit_id: UnitId = UnitId::new(unit_id);
    let path: String = state.tree().path(&unit_id)?;
    Ok(UnitPathResponse { unit_id, path })
}

/// Returns the whole jurisdiction as a forest, unfiltered.
///
/// # Errors
///
/// Returns an error if the stored hierarchy is inconsistent.
pub fn jurisdiction_tree(state: &GovernanceState) -> Result<TreeResponse, ApiError> {
    let roots: Vec<TreeNode> = state.tree().build_forest()?;
    Ok(TreeResponse { roots })
}

/// Lists the units inside the caller's scope with no active owner.
#[must_use]
pub fn units_without_owner(
    state: &GovernanceState,
    actor: &AuthenticatedActor,
) -> UnitsWithoutOwnerResponse {
    let tree: &JurisdictionTree = state.tree();
    let units: Vec<AdminUnit> = state
        .units_without_owner()
        .into_iter()
        .filter(|unit| unit_in_scope(tree, &actor.scope, unit))
        .collect();
    UnitsWithoutOwnerResponse { units }
}

/// Returns the caller's capabilities.
#[must_use]
pub fn capabilities(state: &GovernanceState, actor: &AuthenticatedActor) -> ActorCapabilities {
    compute_actor_capabilities(state, actor)
}

/// Lists the assignments the caller can see, with what the caller may do
/// with each.
///
/// A user always sees assignments they hold or requested. Other
/// assignments are visible when their scope lies inside the caller's.
#[must_use]
pub fn list_assignments(
    state: &GovernanceState,
    actor: &AuthenticatedActor,
) -> ListAssignmentsResponse {
    let tree: &JurisdictionTree = state.tree();
    let mut visible: Vec<&RoleAssignment> = state
        .assignments()
        .iter()
        .filter(|assignment| {
            assignment.user_id == actor.user_id
                || assignment.requested_by == actor.user_id
                || scope_within(tree, &actor.scope, &assignment.scope)
        })
        .collect();
    visible.sort_by_key(|assignment| assignment.assignment_id);

    ListAssignmentsResponse {
        assignments: visible
            .into_iter()
            .map(|assignment| AssignmentInfo {
                assignment: assignment.clone(),
                capabilities: compute_assignment_capabilities(state, actor, assignment),
            })
            .collect(),
    }
}

/// Returns true if every target of `inner` lies inside `outer`.
fn scope_within(tree: &JurisdictionTree, outer: &Scope, inner: &Scope) -> bool {
    if outer.is_national() {
        return true;
    }
    if inner.is_national() {
        return false;
    }
    let center_scope: bool = inner.scope_type() == ScopeType::Center;
    inner.ids().iter().all(|id| {
        let location: JurisdictionRef = if center_scope {
            JurisdictionRef::Center(CenterId::new(id))
        } else {
            JurisdictionRef::Unit(UnitId::new(id))
        };
        tree.scope_contains(outer, &location)
    })
}

/// Returns the audit events the caller may read, oldest first.
///
/// National callers see every event. Others see events that touch at least
/// one place inside their scope.
///
/// # Errors
///
/// Returns an error if the role may not read the audit log.
pub fn audit_log<R: GovernanceRepository + ?Sized>(
    repository: &R,
    state: &GovernanceState,
    actor: &AuthenticatedActor,
) -> Result<AuditLogResponse, ApiError> {
    AuthorizationService::authorize_view_audit_log(state.catalog(), actor)?;

    let events: Vec<AuditEvent> = repository
        .audit_log()
        .into_iter()
        .filter(|event| event_visible(state.tree(), &actor.scope, event))
        .collect();
    Ok(AuditLogResponse { events })
}

/// Returns a single audit event.
///
/// # Errors
///
/// Returns an error if:
/// - the role may not read the audit log
/// - the event does not exist or lies outside the caller's scope
pub fn audit_event<R: GovernanceRepository + ?Sized>(
    repository: &R,
    state: &GovernanceState,
    actor: &AuthenticatedActor,
    event_id: u64,
) -> Result<AuditEvent, ApiError> {
    AuthorizationService::authorize_view_audit_log(state.catalog(), actor)?;

    let event: AuditEvent = repository.audit_event(event_id)?;
    if event_visible(state.tree(), &actor.scope, &event) {
        Ok(event)
    } else {
        Err(ApiError::ResourceNotFound {
            resource_type: String::from("Audit event"),
            message: format!("Audit event {event_id} does not exist"),
        })
    }
}

fn event_visible(tree: &JurisdictionTree, scope: &Scope, event: &AuditEvent) -> bool {
    scope.is_national()
        || event
            .jurisdiction
            .iter()
            .any(|location| tree.scope_contains(scope, location))
}

/// Creates an administrative unit.
///
/// # Errors
///
/// Returns an error if:
/// - the role lacks `ManageJurisdiction`
/// - the unit breaks a hierarchy or field rule
/// - the parent lies outside the caller's scope
/// - the repository moved on while the command was applied
pub fn create_unit<R: GovernanceRepository + ?Sized>(
    repository: &mut R,
    request: &UnitRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    as_of: Date,
) -> Result<ApiResult<WriteResponse>, ApiError> {
    let current: Revisioned = repository.load();
    AuthorizationService::authorize_manage_jurisdiction(
        current.state.catalog(),
        actor,
        "create_unit",
    )?;

    let command: Command = Command::CreateUnit {
        unit: request.to_unit(),
    };
    execute(repository, current, command, actor, cause, as_of)
}

/// Replaces an existing administrative unit.
///
/// # Errors
///
/// Returns an error if:
/// - the role lacks `ManageJurisdiction`
/// - the unit does not exist
/// - the new parent chain would be cyclic or out of depth order
/// - the unit or its new parent lies outside the caller's scope
pub fn update_unit<R: GovernanceRepository + ?Sized>(
    repository: &mut R,
    request: &UnitRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    as_of: Date,
) -> Result<ApiResult<WriteResponse>, ApiError> {
    let current: Revisioned = repository.load();
    AuthorizationService::authorize_manage_jurisdiction(
        current.state.catalog(),
        actor,
        "update_unit",
    )?;

    let command: Command = Command::UpdateUnit {
        unit: request.to_unit(),
    };
    execute(repository, current, command, actor, cause, as_of)
}

/// Creates an inspection center.
///
/// # Errors
///
/// Returns an error if:
/// - the role lacks `ManageCenters`
/// - the owning unit does not exist or lies outside the caller's scope
/// - the center already exists
pub fn create_center<R: GovernanceRepository + ?Sized>(
    repository: &mut R,
    request: &CreateCenterRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    as_of: Date,
) -> Result<ApiResult<WriteResponse>, ApiError> {
    let current: Revisioned = repository.load();
    AuthorizationService::authorize_manage_centers(current.state.catalog(), actor)?;

    let command: Command = Command::CreateCenter {
        center: request.to_center(),
    };
    execute(repository, current, command, actor, cause, as_of)
}

/// Requests a role assignment for a user.
///
/// The assignment is active at once unless the role or scope requires
/// approval, in which case it stays pending.
///
/// # Errors
///
/// Returns an error if:
/// - the role lacks `AssignRoles`
/// - the delegation policy denies the assignment
/// - the scope names unknown or mismatched targets
/// - the effective range ends before it starts
pub fn assign_role<R: GovernanceRepository + ?Sized>(
    repository: &mut R,
    request: &AssignRoleRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    as_of: Date,
) -> Result<ApiResult<WriteResponse>, ApiError> {
    let current: Revisioned = repository.load();
    AuthorizationService::authorize_assign_roles(current.state.catalog(), actor, "assign_role")?;

    if request.user_id.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("user_id"),
            message: String::from("User id cannot be empty"),
        });
    }

    let command: Command = Command::AssignRole {
        user_id: UserId::new(request.user_id.trim()),
        role_id: request.role_id,
        scope: request.scope.clone(),
        effective_from: request.effective_from,
        effective_to: request.effective_to,
    };
    execute(repository, current, command, actor, cause, as_of)
}

/// Approves a pending assignment.
///
/// # Errors
///
/// Returns an error if:
/// - the role lacks `ApproveAssignments`
/// - the assignment does not exist or is not pending
/// - the caller requested it, or holds a two-person role it grants
/// - the caller could not grant the assignment's role and scope
pub fn approve_assignment<R: GovernanceRepository + ?Sized>(
    repository: &mut R,
    request: AssignmentActionRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    as_of: Date,
) -> Result<ApiResult<WriteResponse>, ApiError> {
    let current: Revisioned = repository.load();
    AuthorizationService::authorize_approve_assignments(
        current.state.catalog(),
        actor,
        "approve_assignment",
    )?;

    let command: Command = Command::ApproveAssignment {
        assignment_id: request.assignment_id,
    };
    execute(repository, current, command, actor, cause, as_of)
}

/// Rejects a pending assignment, or withdraws the caller's own request.
///
/// # Errors
///
/// Returns an error if:
/// - the caller is not the requester and lacks `ApproveAssignments`
/// - the assignment does not exist or is not pending
/// - the caller could not grant the assignment's role and scope
pub fn reject_assignment<R: GovernanceRepository + ?Sized>(
    repository: &mut R,
    request: AssignmentActionRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    as_of: Date,
) -> Result<ApiResult<WriteResponse>, ApiError> {
    let current: Revisioned = repository.load();
    let own_request: bool = current
        .state
        .assignment(request.assignment_id)
        .is_some_and(|a| a.requested_by == actor.user_id);
    if !own_request {
        AuthorizationService::authorize_approve_assignments(
            current.state.catalog(),
            actor,
            "reject_assignment",
        )?;
    }

    let command: Command = Command::RejectAssignment {
        assignment_id: request.assignment_id,
    };
    execute(repository, current, command, actor, cause, as_of)
}

/// Revokes an active or pending assignment.
///
/// # Errors
///
/// Returns an error if:
/// - the role lacks `AssignRoles`
/// - the assignment does not exist or is already closed
/// - the caller could not grant the assignment's role and scope
pub fn revoke_assignment<R: GovernanceRepository + ?Sized>(
    repository: &mut R,
    request: AssignmentActionRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    as_of: Date,
) -> Result<ApiResult<WriteResponse>, ApiError> {
    let current: Revisioned = repository.load();
    AuthorizationService::authorize_assign_roles(
        current.state.catalog(),
        actor,
        "revoke_assignment",
    )?;

    let command: Command = Command::RevokeAssignment {
        assignment_id: request.assignment_id,
    };
    execute(repository, current, command, actor, cause, as_of)
}

/// Designates an institution for a unit.
///
/// # Errors
///
/// Returns an error if:
/// - the role lacks `ManageJurisdiction`
/// - the unit does not exist or lies outside the caller's scope
/// - the institution is blank
pub fn assign_owner<R: GovernanceRepository + ?Sized>(
    repository: &mut R,
    request: &AssignOwnerRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    as_of: Date,
) -> Result<ApiResult<WriteResponse>, ApiError> {
    let current: Revisioned = repository.load();
    AuthorizationService::authorize_manage_jurisdiction(
        current.state.catalog(),
        actor,
        "assign_owner",
    )?;

    let command: Command = Command::AssignOwner {
        designation: request.to_designation(),
    };
    execute(repository, current, command, actor, cause, as_of)
}
