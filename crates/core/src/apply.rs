// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{ActingUser, GovernanceState, TransitionResult};
use time::Date;
use tracing::debug;
use vigov_audit::{Action, AuditEvent, Cause};
use vigov_domain::{
    AdminUnit, ApprovalStatus, AssignmentDecision, AssignmentOutcome, AssignmentStatus,
    CenterId, DenyReason, DomainError, InspectionCenter, JurisdictionRef, JurisdictionTree,
    RoleAssignment, RoleId, Scope, ScopeType, UnitAssignment, UnitAssignmentType, UnitId,
    UnitStatus, UnitType, UserId, validate_center_fields, validate_effective_range,
    validate_scope_targets, validate_unit_fields,
};

/// What a single command changed, for the audit trail.
struct Applied {
    details: String,
    jurisdiction: Vec<JurisdictionRef>,
}

/// Applies a command to the current state, producing a new state and audit
/// event.
///
/// The input state is never modified. Every check runs against the state
/// the command was applied to, so committing the result is only sound if
/// that state is still current (see [`crate::GovernanceRepository`]).
///
/// # Arguments
///
/// * `state` - The current state (immutable)
/// * `command` - The command to apply
/// * `actor` - The user the command is applied on behalf of
/// * `cause` - The cause or reason for this action
/// * `as_of` - The evaluation date
///
/// # Errors
///
/// Returns an error if:
/// - the command violates a domain rule (hierarchy, scope, field checks)
/// - the actor's role or scope does not permit the change
/// - an assignment is missing or not in a status the command applies to
/// - an approver is the requester of the assignment
pub fn apply(
    state: &GovernanceState,
    command: Command,
    actor: &ActingUser,
    cause: Cause,
    as_of: Date,
) -> Result<TransitionResult, CoreError> {
    let name: &'static str = command.name();
    let mut new_state: GovernanceState = state.clone();

    let applied: Applied = match command {
        Command::CreateUnit { unit } => create_unit(&mut new_state, actor, unit)?,
        Command::UpdateUnit { unit } => update_unit(&mut new_state, actor, unit)?,
        Command::CreateCenter { center } => create_center(&mut new_state, actor, center)?,
        Command::AssignRole {
            user_id,
            role_id,
            scope,
            effective_from,
            effective_to,
        } => assign_role(
            &mut new_state,
            actor,
            user_id,
            role_id,
            scope,
            (effective_from, effective_to),
            as_of,
        )?,
        Command::ApproveAssignment { assignment_id } => {
            approve_assignment(&mut new_state, actor, assignment_id, as_of)?
        }
        Command::RejectAssignment { assignment_id } => {
            reject_assignment(&mut new_state, actor, assignment_id)?
        }
        Command::RevokeAssignment { assignment_id } => {
            revoke_assignment(&mut new_state, actor, assignment_id)?
        }
        Command::AssignOwner { designation } => assign_owner(&mut new_state, actor, designation)?,
    };

    debug!(
        action = name,
        actor_id = %actor.user_id,
        details = %applied.details,
        "Applied command"
    );

    let audit_event: AuditEvent = AuditEvent::new(
        actor.to_audit_actor(),
        cause,
        Action::new(name.to_string(), Some(applied.details)),
        state.to_audit_snapshot(),
        new_state.to_audit_snapshot(),
        applied.jurisdiction,
    );

    Ok(TransitionResult {
        new_state,
        audit_event,
    })
}

/// Fails unless `location` lies inside the actor's scope.
///
/// The top-level role is not bound by its scope.
fn ensure_within(
    tree: &JurisdictionTree,
    actor: &ActingUser,
    location: &JurisdictionRef,
) -> Result<(), CoreError> {
    if actor.role.is_top_level() || tree.scope_contains(&actor.scope, location) {
        Ok(())
    } else {
        Err(CoreError::Denied(DenyReason::OutsideJurisdiction))
    }
}

/// Only national-scope actors may touch the national root.
fn ensure_parent_within(
    tree: &JurisdictionTree,
    actor: &ActingUser,
    unit: &AdminUnit,
) -> Result<(), CoreError> {
    match &unit.parent_id {
        Some(parent) => ensure_within(tree, actor, &JurisdictionRef::Unit(parent.clone())),
        None if actor.role.is_top_level() || actor.scope.is_national() => Ok(()),
        None => Err(CoreError::Denied(DenyReason::OutsideJurisdiction)),
    }
}

fn create_unit(
    state: &mut GovernanceState,
    actor: &ActingUser,
    unit: AdminUnit,
) -> Result<Applied, CoreError> {
    validate_unit_fields(&unit)?;
    if state.tree.unit(&unit.id).is_some() {
        return Err(DomainError::DuplicateUnit(unit.id.to_string()).into());
    }
    state.tree.validate_hierarchy(&unit)?;
    ensure_parent_within(&state.tree, actor, &unit)?;

    let id: UnitId = unit.id.clone();
    let unit_type: UnitType = unit.unit_type;
    state.tree = state.tree.with_unit(unit);
    let path: String = state.tree.path(&id)?;

    Ok(Applied {
        details: format!("Created {unit_type} '{id}' at {path}"),
        jurisdiction: vec![JurisdictionRef::Unit(id)],
    })
}

fn update_unit(
    state: &mut GovernanceState,
    actor: &ActingUser,
    unit: AdminUnit,
) -> Result<Applied, CoreError> {
    let existing: AdminUnit = state
        .tree
        .unit(&unit.id)
        .cloned()
        .ok_or_else(|| DomainError::UnitNotFound(unit.id.to_string()))?;

    validate_unit_fields(&unit)?;
    state.tree.validate_hierarchy(&unit)?;
    ensure_within(&state.tree, actor, &JurisdictionRef::Unit(existing.id.clone()))?;
    ensure_parent_within(&state.tree, actor, &unit)?;

    // A changed unit type can push existing children out of depth order.
    let tree: JurisdictionTree = state.tree.with_unit(unit);
    tree.validate()?;

    let id: UnitId = existing.id.clone();
    let before: String = state.tree.path(&id)?;
    state.tree = tree;
    let after: String = state.tree.path(&id)?;

    let details: String = if before == after {
        format!("Updated '{id}' at {after}")
    } else {
        format!("Updated '{id}': {before} -> {after}")
    };

    Ok(Applied {
        details,
        jurisdiction: vec![JurisdictionRef::Unit(id)],
    })
}

fn create_center(
    state: &mut GovernanceState,
    actor: &ActingUser,
    center: InspectionCenter,
) -> Result<Applied, CoreError> {
    validate_center_fields(&center)?;
    if state.tree.center(&center.id).is_some() {
        return Err(DomainError::DuplicateCenter(center.id.to_string()).into());
    }
    if state.tree.unit(&center.admin_unit_id).is_none() {
        return Err(DomainError::UnitNotFound(center.admin_unit_id.to_string()).into());
    }
    ensure_within(
        &state.tree,
        actor,
        &JurisdictionRef::Unit(center.admin_unit_id.clone()),
    )?;

    let id: CenterId = center.id.clone();
    let path: String = state.tree.path(&center.admin_unit_id)?;
    state.tree = state.tree.with_center(center);

    Ok(Applied {
        details: format!("Created center '{id}' under {path}"),
        jurisdiction: vec![JurisdictionRef::Center(id)],
    })
}

fn assign_role(
    state: &mut GovernanceState,
    actor: &ActingUser,
    user_id: UserId,
    role_id: RoleId,
    scope: Scope,
    (effective_from, effective_to): (Date, Option<Date>),
    as_of: Date,
) -> Result<Applied, CoreError> {
    validate_effective_range(effective_from, effective_to)?;
    validate_scope_targets(&state.tree, &scope)?;

    let outcome: AssignmentOutcome =
        state
            .authorizer()
            .evaluate_assignment(&actor.context(), role_id, &scope);
    if let AssignmentDecision::Deny(reason) = outcome.decision {
        return Err(reason.into());
    }

    let assignment_id: u64 = state.next_assignment_id;
    state.next_assignment_id += 1;

    let (status, approval_status) = if outcome.requires_approval {
        (AssignmentStatus::Pending, ApprovalStatus::Pending)
    } else {
        supersede_active(&mut state.assignments, &user_id, effective_from, as_of);
        (AssignmentStatus::Active, ApprovalStatus::NotRequired)
    };

    let details: String = format!(
        "Assigned {role_id} at {scope} to '{user_id}' as assignment {assignment_id} ({})",
        if outcome.requires_approval {
            "pending approval"
        } else {
            "active"
        }
    );
    let jurisdiction: Vec<JurisdictionRef> = scope_locations(&scope);

    state.assignments.push(RoleAssignment {
        assignment_id,
        user_id,
        role_id,
        scope,
        status,
        effective_from,
        effective_to,
        approval_required: outcome.requires_approval,
        approval_status,
        requested_by: actor.user_id.clone(),
        approved_by: None,
    });

    Ok(Applied {
        details,
        jurisdiction,
    })
}

fn approve_assignment(
    state: &mut GovernanceState,
    actor: &ActingUser,
    assignment_id: u64,
    as_of: Date,
) -> Result<Applied, CoreError> {
    let pending: RoleAssignment = find_assignment(state, assignment_id)?;
    if pending.status != AssignmentStatus::Pending {
        return Err(CoreError::InvalidAssignmentState {
            assignment_id,
            status: pending.status,
        });
    }
    if pending.requested_by == actor.user_id
        || (state.catalog.requires_two_person_approval(pending.role_id)
            && pending.user_id == actor.user_id)
    {
        return Err(CoreError::SelfApproval { assignment_id });
    }
    ensure_may_grant(state, actor, &pending)?;

    supersede_active(
        &mut state.assignments,
        &pending.user_id,
        pending.effective_from,
        as_of,
    );
    update_assignment(state, assignment_id, |a| {
        a.status = AssignmentStatus::Active;
        a.approval_status = ApprovalStatus::Approved;
        a.approved_by = Some(actor.user_id.clone());
    });

    Ok(Applied {
        details: format!(
            "Approved assignment {assignment_id}: {} at {} for '{}'",
            pending.role_id, pending.scope, pending.user_id
        ),
        jurisdiction: scope_locations(&pending.scope),
    })
}

fn reject_assignment(
    state: &mut GovernanceState,
    actor: &ActingUser,
    assignment_id: u64,
) -> Result<Applied, CoreError> {
    let pending: RoleAssignment = find_assignment(state, assignment_id)?;
    if pending.status != AssignmentStatus::Pending {
        return Err(CoreError::InvalidAssignmentState {
            assignment_id,
            status: pending.status,
        });
    }
    // The requester may always withdraw their own request.
    if pending.requested_by != actor.user_id {
        ensure_may_grant(state, actor, &pending)?;
    }

    update_assignment(state, assignment_id, |a| {
        a.status = AssignmentStatus::Expired;
        a.approval_status = ApprovalStatus::Rejected;
        a.approved_by = Some(actor.user_id.clone());
    });

    Ok(Applied {
        details: format!(
            "Rejected assignment {assignment_id}: {} at {} for '{}'",
            pending.role_id, pending.scope, pending.user_id
        ),
        jurisdiction: scope_locations(&pending.scope),
    })
}

fn revoke_assignment(
    state: &mut GovernanceState,
    actor: &ActingUser,
    assignment_id: u64,
) -> Result<Applied, CoreError> {
    let current: RoleAssignment = find_assignment(state, assignment_id)?;
    if !matches!(
        current.status,
        AssignmentStatus::Active | AssignmentStatus::Pending
    ) {
        return Err(CoreError::InvalidAssignmentState {
            assignment_id,
            status: current.status,
        });
    }
    ensure_may_grant(state, actor, &current)?;

    update_assignment(state, assignment_id, |a| {
        a.status = AssignmentStatus::Revoked;
    });

    Ok(Applied {
        details: format!(
            "Revoked assignment {assignment_id}: {} at {} for '{}'",
            current.role_id, current.scope, current.user_id
        ),
        jurisdiction: scope_locations(&current.scope),
    })
}

fn assign_owner(
    state: &mut GovernanceState,
    actor: &ActingUser,
    designation: UnitAssignment,
) -> Result<Applied, CoreError> {
    if state.tree.unit(&designation.unit_id).is_none() {
        return Err(DomainError::UnitNotFound(designation.unit_id.to_string()).into());
    }
    if designation.institution.trim().is_empty() {
        return Err(DomainError::InvalidUnit(String::from("Institution cannot be empty")).into());
    }
    ensure_within(
        &state.tree,
        actor,
        &JurisdictionRef::Unit(designation.unit_id.clone()),
    )?;

    if designation.assignment_type == UnitAssignmentType::Owner
        && designation.status == UnitStatus::Active
    {
        for previous in &mut state.unit_assignments {
            if previous.unit_id == designation.unit_id
                && previous.assignment_type == UnitAssignmentType::Owner
            {
                previous.status = UnitStatus::Inactive;
            }
        }
    }

    let details: String = format!(
        "Designated '{}' as {:?} of '{}'",
        designation.institution, designation.assignment_type, designation.unit_id
    );
    let jurisdiction: Vec<JurisdictionRef> =
        vec![JurisdictionRef::Unit(designation.unit_id.clone())];
    state.unit_assignments.push(designation);

    Ok(Applied {
        details,
        jurisdiction,
    })
}

/// The actor must be able to grant an assignment to approve, reject or
/// revoke it.
fn ensure_may_grant(
    state: &GovernanceState,
    actor: &ActingUser,
    assignment: &RoleAssignment,
) -> Result<(), CoreError> {
    match state
        .authorizer()
        .can_assign(&actor.context(), assignment.role_id, &assignment.scope)
    {
        AssignmentDecision::Allow => Ok(()),
        AssignmentDecision::Deny(reason) => Err(reason.into()),
    }
}

fn find_assignment(
    state: &GovernanceState,
    assignment_id: u64,
) -> Result<RoleAssignment, CoreError> {
    state
        .assignment(assignment_id)
        .cloned()
        .ok_or(CoreError::AssignmentNotFound(assignment_id))
}

fn update_assignment(
    state: &mut GovernanceState,
    assignment_id: u64,
    change: impl FnOnce(&mut RoleAssignment),
) {
    if let Some(assignment) = state
        .assignments
        .iter_mut()
        .find(|a| a.assignment_id == assignment_id)
    {
        change(assignment);
    }
}

/// Hands a user's active assignments over to one that starts on `starts`.
///
/// A new assignment starting on or before `as_of` expires the current ones
/// right away. A future-dated one leaves them in force until the day before
/// it starts, so the user keeps exactly one effective assignment on any day.
fn supersede_active(
    assignments: &mut [RoleAssignment],
    user_id: &UserId,
    starts: Date,
    as_of: Date,
) {
    let last_day: Option<Date> = if starts > as_of {
        starts.previous_day()
    } else {
        None
    };

    for assignment in assignments
        .iter_mut()
        .filter(|a| a.user_id == *user_id && a.status == AssignmentStatus::Active)
    {
        match last_day {
            Some(last_day) if assignment.effective_from <= last_day => {
                if assignment.effective_to.is_none_or(|to| to > last_day) {
                    assignment.effective_to = Some(last_day);
                }
            }
            _ => {
                assignment.status = AssignmentStatus::Expired;
                if assignment.effective_from <= as_of
                    && assignment.effective_to.is_none_or(|to| to > as_of)
                {
                    assignment.effective_to = Some(as_of);
                }
            }
        }
    }
}

/// Every place an assignment's scope covers, for the audit trail.
fn scope_locations(scope: &Scope) -> Vec<JurisdictionRef> {
    scope
        .ids()
        .iter()
        .map(|id| match scope.scope_type() {
            ScopeType::Center => JurisdictionRef::Center(CenterId::new(id)),
            _ => JurisdictionRef::Unit(UnitId::new(id)),
        })
        .collect()
}
