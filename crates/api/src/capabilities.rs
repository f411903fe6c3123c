// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what actions a user is permitted to perform
//! without leaking domain internals. They are advisory only and do not
//! replace the checks made when a command is applied.

use vigov::GovernanceState;
use vigov_domain::{
    ActorContext, AssignmentStatus, Permission, RoleAssignment, RoleCatalog, ScopeAuthorizer,
};

use crate::auth::AuthenticatedActor;
use crate::request_response::{ActorCapabilities, AssignmentCapabilities, Capability};

fn permission(catalog: &RoleCatalog, actor: &AuthenticatedActor, permission: Permission) -> Capability {
    Capability::from_bool(catalog.has_permission(actor.role, permission))
}

/// Computes the capabilities of an authenticated user.
///
/// These depend only on the user's role and scope.
#[must_use]
pub fn compute_actor_capabilities(
    state: &GovernanceState,
    actor: &AuthenticatedActor,
) -> ActorCapabilities {
    let catalog: &RoleCatalog = state.catalog();

    ActorCapabilities {
        user_id: actor.user_id.clone(),
        role: actor.role,
        scope: actor.scope.clone(),
        assignable_roles: state.authorizer().assignable_roles(&actor.context()),
        can_manage_jurisdiction: permission(catalog, actor, Permission::ManageJurisdiction),
        can_manage_centers: permission(catalog, actor, Permission::ManageCenters),
        can_assign_roles: permission(catalog, actor, Permission::AssignRoles),
        can_approve_assignments: permission(catalog, actor, Permission::ApproveAssignments),
        can_view_inspections: permission(catalog, actor, Permission::ViewInspections),
        can_view_cases: permission(catalog, actor, Permission::ViewCases),
        can_view_financials: permission(catalog, actor, Permission::ViewFinancials),
        can_view_audit_log: permission(catalog, actor, Permission::ViewAuditLog),
    }
}

/// Computes what a user may do with a specific assignment.
///
/// Target-specific capabilities depend on:
/// - the assignment's status
/// - the user's permissions
/// - whether the user could grant the assignment's role and scope
/// - the two-person rule for approvals
#[must_use]
pub fn compute_assignment_capabilities(
    state: &GovernanceState,
    actor: &AuthenticatedActor,
    assignment: &RoleAssignment,
) -> AssignmentCapabilities {
    let catalog: &RoleCatalog = state.catalog();
    let authorizer: ScopeAuthorizer<'_> = state.authorizer();
    let context: ActorContext = actor.context();
    let may_grant: bool = authorizer
        .can_assign(&context, assignment.role_id, &assignment.scope)
        .is_allowed();

    let pending: bool = assignment.status == AssignmentStatus::Pending;
    let is_requester: bool = assignment.requested_by == actor.user_id;
    let is_assignee: bool = assignment.user_id == actor.user_id;
    let may_decide: bool =
        may_grant && catalog.has_permission(actor.role, Permission::ApproveAssignments);
    let second_person: bool = !is_requester
        && !(is_assignee && catalog.requires_two_person_approval(assignment.role_id));

    let revocable: bool = matches!(
        assignment.status,
        AssignmentStatus::Active | AssignmentStatus::Pending
    );

    AssignmentCapabilities {
        can_approve: Capability::from_bool(pending && may_decide && second_person),
        can_reject: Capability::from_bool(pending && (is_requester || may_decide)),
        can_revoke: Capability::from_bool(
            revocable && may_grant && catalog.has_permission(actor.role, Permission::AssignRoles),
        ),
    }
}
