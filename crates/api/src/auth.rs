// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use time::Date;
use vigov::{ActingUser, GovernanceState};
use vigov_audit::Actor;
use vigov_domain::{
    ActorContext, Permission, RecordKind, RoleAssignment, RoleCatalog, RoleId, Scope, UserId,
};

use crate::error::AuthError;

/// An authenticated actor resolved from their single active assignment.
///
/// A user acts with exactly one role and scope at a time. Users with no
/// active assignment, or with more than one, cannot authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The user acting.
    pub user_id: UserId,
    /// The assignment the role and scope were resolved from.
    pub assignment_id: u64,
    /// The role the user acts with.
    pub role: RoleId,
    /// The scope the user acts within.
    pub scope: Scope,
}

impl AuthenticatedActor {
    /// Creates an authenticated actor from a resolved assignment.
    #[must_use]
    pub fn from_assignment(assignment: &RoleAssignment) -> Self {
        Self {
            user_id: assignment.user_id.clone(),
            assignment_id: assignment.assignment_id,
            role: assignment.role_id,
            scope: assignment.scope.clone(),
        }
    }

    /// The actor as the core layer sees it.
    #[must_use]
    pub fn to_acting_user(&self) -> ActingUser {
        ActingUser::new(self.user_id.clone(), self.role, self.scope.clone())
    }

    /// The role and scope used for delegation decisions.
    #[must_use]
    pub fn context(&self) -> ActorContext {
        ActorContext::new(self.role, self.scope.clone())
    }

    /// Converts this actor into an audit actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        self.to_acting_user().to_audit_actor()
    }
}

/// Resolves a user id to an authenticated actor.
///
/// # Arguments
///
/// * `state` - The current governance state
/// * `user_id` - The identifier presented by the caller
/// * `as_of` - The date assignments are evaluated on
///
/// # Errors
///
/// Returns an error if:
/// - the user id is blank
/// - the user has no active assignment on `as_of`
/// - the user has more than one active assignment on `as_of`
pub fn authenticate(
    state: &GovernanceState,
    user_id: &str,
    as_of: Date,
) -> Result<AuthenticatedActor, AuthError> {
    let user_id: &str = user_id.trim();
    if user_id.is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("User id cannot be empty"),
        });
    }

    let user: UserId = UserId::new(user_id);
    let assignment: Option<&RoleAssignment> = state
        .active_assignment(&user, as_of)
        .map_err(|err| AuthError::AuthenticationFailed {
            reason: err.to_string(),
        })?;

    assignment
        .map(AuthenticatedActor::from_assignment)
        .ok_or_else(|| AuthError::AuthenticationFailed {
            reason: format!("User '{user_id}' has no active role assignment"),
        })
}

/// Authorization service for enforcing permission-based access control.
///
/// Permissions come from the role catalog. Scope checks happen later, in
/// the core layer, once the target of the action is known.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor's role carries `permission`.
    ///
    /// # Errors
    ///
    /// Returns an error if the role lacks the permission.
    pub fn require_permission(
        catalog: &RoleCatalog,
        actor: &AuthenticatedActor,
        permission: Permission,
        action: &str,
    ) -> Result<(), AuthError> {
        if catalog.has_permission(actor.role, permission) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_permission: permission,
            })
        }
    }

    /// Checks if an actor may create or edit administrative units and
    /// owner designations.
    ///
    /// # Errors
    ///
    /// Returns an error if the role lacks `ManageJurisdiction`.
    pub fn authorize_manage_jurisdiction(
        catalog: &RoleCatalog,
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        Self::require_permission(catalog, actor, Permission::ManageJurisdiction, action)
    }

    /// Checks if an actor may create inspection centers.
    ///
    /// # Errors
    ///
    /// Returns an error if the role lacks `ManageCenters`.
    pub fn authorize_manage_centers(
        catalog: &RoleCatalog,
        actor: &AuthenticatedActor,
    ) -> Result<(), AuthError> {
        Self::require_permission(catalog, actor, Permission::ManageCenters, "create_center")
    }

    /// Checks if an actor may request or revoke role assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the role lacks `AssignRoles`.
    pub fn authorize_assign_roles(
        catalog: &RoleCatalog,
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        Self::require_permission(catalog, actor, Permission::AssignRoles, action)
    }

    /// Checks if an actor may approve or reject pending assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the role lacks `ApproveAssignments`.
    pub fn authorize_approve_assignments(
        catalog: &RoleCatalog,
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        Self::require_permission(catalog, actor, Permission::ApproveAssignments, action)
    }

    /// Checks if an actor may see records of `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the role lacks the kind's view permission.
    pub fn authorize_view_records(
        catalog: &RoleCatalog,
        actor: &AuthenticatedActor,
        kind: RecordKind,
    ) -> Result<(), AuthError> {
        Self::require_permission(catalog, actor, kind.required_permission(), "view_records")
    }

    /// Checks if an actor may read the audit log.
    ///
    /// # Errors
    ///
    /// Returns an error if the role lacks `ViewAuditLog`.
    pub fn authorize_view_audit_log(
        catalog: &RoleCatalog,
        actor: &AuthenticatedActor,
    ) -> Result<(), AuthError> {
        Self::require_permission(catalog, actor, Permission::ViewAuditLog, "view_audit_log")
    }
}
