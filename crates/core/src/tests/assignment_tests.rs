// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    ADAMA_CENTER, AMHARA, GONDAR_CENTER, NATIONAL_ADMIN, OROMIA, OROMIA_ADMIN, ROOT, SECOND_ROOT,
    create_test_cause, create_test_state, national_admin, oromia_admin, root, scope, second_root,
    test_date,
};
use crate::{ActingUser, Command, CoreError, GovernanceState, TransitionResult, apply};
use time::macros::date;
use vigov_domain::{
    ApprovalStatus, AssignmentStatus, CenterId, DenyReason, DomainError, JurisdictionRef,
    RoleAssignment, RoleId, Scope, ScopeType, UserId,
};

fn assign(user: &str, role_id: RoleId, scope: Scope) -> Command {
    Command::AssignRole {
        user_id: UserId::new(user),
        role_id,
        scope,
        effective_from: date!(2026 - 01 - 01),
        effective_to: None,
    }
}

fn run(
    state: &GovernanceState,
    command: Command,
    actor: &ActingUser,
) -> Result<TransitionResult, CoreError> {
    apply(state, command, actor, create_test_cause(), test_date())
}

#[test]
fn test_regional_admin_assigns_center_manager_inside_region() {
    let state: GovernanceState = create_test_state();

    let result: TransitionResult = run(
        &state,
        assign(
            "manager-1",
            RoleId::CenterManager,
            scope(ScopeType::Center, &[ADAMA_CENTER]),
        ),
        &oromia_admin(),
    )
    .unwrap();

    let created: &RoleAssignment = result.new_state.assignment(5).unwrap();
    assert_eq!(created.status, AssignmentStatus::Active);
    assert_eq!(created.approval_status, ApprovalStatus::NotRequired);
    assert!(!created.approval_required);
    assert_eq!(created.requested_by, UserId::new(OROMIA_ADMIN));

    assert_eq!(result.audit_event.action.name, "AssignRole");
    assert_eq!(result.audit_event.actor.id, OROMIA_ADMIN);
    assert_eq!(result.audit_event.actor.actor_type, "regionalAdmin");
    assert_eq!(
        result.audit_event.jurisdiction,
        vec![JurisdictionRef::Center(CenterId::new(ADAMA_CENTER))]
    );
}

#[test]
fn test_audit_event_contains_before_and_after_state() {
    let state: GovernanceState = create_test_state();

    let result: TransitionResult = run(
        &state,
        assign(
            "manager-1",
            RoleId::CenterManager,
            scope(ScopeType::Center, &[ADAMA_CENTER]),
        ),
        &oromia_admin(),
    )
    .unwrap();

    assert_eq!(
        result.audit_event.before.data,
        "units=6,centers=2,assignments=4,active=4,pending=0,designations=0"
    );
    assert_eq!(
        result.audit_event.after.data,
        "units=6,centers=2,assignments=5,active=5,pending=0,designations=0"
    );
    assert_eq!(result.audit_event.event_id, None);
}

#[test]
fn test_assignment_outside_jurisdiction_is_denied() {
    let state: GovernanceState = create_test_state();

    let err: CoreError = run(
        &state,
        assign(
            "manager-1",
            RoleId::CenterManager,
            scope(ScopeType::Center, &[GONDAR_CENTER]),
        ),
        &oromia_admin(),
    )
    .unwrap_err();

    assert_eq!(err, CoreError::Denied(DenyReason::OutsideJurisdiction));
}

#[test]
fn test_failed_command_leaves_state_untouched() {
    let state: GovernanceState = create_test_state();
    let before: GovernanceState = state.clone();

    let _ = run(
        &state,
        assign("x", RoleId::SuperAdmin, Scope::national()),
        &oromia_admin(),
    );

    assert_eq!(state, before);
}

#[test]
fn test_assignment_to_unknown_center_is_rejected() {
    let state: GovernanceState = create_test_state();

    let err: CoreError = run(
        &state,
        assign(
            "manager-1",
            RoleId::CenterManager,
            scope(ScopeType::Center, &["CTR-404"]),
        ),
        &root(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::CenterNotFound(String::from("CTR-404")))
    );
}

#[test]
fn test_assignment_with_reversed_range_is_rejected() {
    let state: GovernanceState = create_test_state();
    let command: Command = Command::AssignRole {
        user_id: UserId::new("manager-1"),
        role_id: RoleId::CenterManager,
        scope: scope(ScopeType::Center, &[ADAMA_CENTER]),
        effective_from: date!(2026 - 02 - 01),
        effective_to: Some(date!(2026 - 01 - 01)),
    };

    let err: CoreError = run(&state, command, &oromia_admin()).unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::InvalidEffectiveRange { .. })
    ));
}

#[test]
fn test_sensitive_assignment_waits_for_approval() {
    let state: GovernanceState = create_test_state();

    let result: TransitionResult = run(
        &state,
        assign(
            "finance-1",
            RoleId::FinanceOfficer,
            scope(ScopeType::Region, &[AMHARA]),
        ),
        &national_admin(),
    )
    .unwrap();

    let created: &RoleAssignment = result.new_state.assignment(5).unwrap();
    assert_eq!(created.status, AssignmentStatus::Pending);
    assert_eq!(created.approval_status, ApprovalStatus::Pending);
    assert!(created.approval_required);
    assert!(
        result
            .new_state
            .active_assignment(&UserId::new("finance-1"), test_date())
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_national_scope_assignment_waits_for_approval() {
    let state: GovernanceState = create_test_state();

    let result: TransitionResult = run(
        &state,
        assign("regional-1", RoleId::RegionalAdmin, Scope::national()),
        &root(),
    )
    .unwrap();

    assert_eq!(
        result.new_state.assignment(5).unwrap().status,
        AssignmentStatus::Pending
    );
}

#[test]
fn test_requester_cannot_approve_own_request() {
    let state: GovernanceState = create_test_state();
    let requested: TransitionResult = run(
        &state,
        assign(
            "finance-1",
            RoleId::FinanceOfficer,
            scope(ScopeType::Region, &[AMHARA]),
        ),
        &national_admin(),
    )
    .unwrap();

    let err: CoreError = run(
        &requested.new_state,
        Command::ApproveAssignment { assignment_id: 5 },
        &national_admin(),
    )
    .unwrap_err();

    assert_eq!(err, CoreError::SelfApproval { assignment_id: 5 });
}

#[test]
fn test_second_person_approval_activates_assignment() {
    let state: GovernanceState = create_test_state();
    let requested: TransitionResult = run(
        &state,
        assign(
            "finance-1",
            RoleId::FinanceOfficer,
            scope(ScopeType::Region, &[OROMIA]),
        ),
        &root(),
    )
    .unwrap();

    let approved: TransitionResult = run(
        &requested.new_state,
        Command::ApproveAssignment { assignment_id: 5 },
        &national_admin(),
    )
    .unwrap();

    let assignment: &RoleAssignment = approved.new_state.assignment(5).unwrap();
    assert_eq!(assignment.status, AssignmentStatus::Active);
    assert_eq!(assignment.approval_status, ApprovalStatus::Approved);
    assert_eq!(assignment.approved_by, Some(UserId::new(NATIONAL_ADMIN)));
    assert_eq!(approved.audit_event.action.name, "ApproveAssignment");
}

#[test]
fn test_two_person_role_cannot_be_approved_by_its_recipient() {
    let state: GovernanceState = create_test_state();
    let requested: TransitionResult = run(
        &state,
        assign(SECOND_ROOT, RoleId::NationalAdmin, Scope::national()),
        &root(),
    )
    .unwrap();

    let err: CoreError = run(
        &requested.new_state,
        Command::ApproveAssignment { assignment_id: 5 },
        &second_root(),
    )
    .unwrap_err();

    assert_eq!(err, CoreError::SelfApproval { assignment_id: 5 });
}

#[test]
fn test_approver_must_be_able_to_grant_the_assignment() {
    let state: GovernanceState = create_test_state();
    let requested: TransitionResult = run(
        &state,
        assign("national-2", RoleId::NationalAdmin, Scope::national()),
        &root(),
    )
    .unwrap();

    let err: CoreError = run(
        &requested.new_state,
        Command::ApproveAssignment { assignment_id: 5 },
        &national_admin(),
    )
    .unwrap_err();

    assert_eq!(err, CoreError::Denied(DenyReason::RoleNotDelegable));
}

#[test]
fn test_approving_active_assignment_fails() {
    let state: GovernanceState = create_test_state();

    let err: CoreError = run(
        &state,
        Command::ApproveAssignment { assignment_id: 4 },
        &second_root(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        CoreError::InvalidAssignmentState {
            assignment_id: 4,
            status: AssignmentStatus::Active,
        }
    );
}

#[test]
fn test_unknown_assignment_is_reported() {
    let state: GovernanceState = create_test_state();

    let err: CoreError = run(
        &state,
        Command::RevokeAssignment { assignment_id: 99 },
        &root(),
    )
    .unwrap_err();

    assert_eq!(err, CoreError::AssignmentNotFound(99));
}

#[test]
fn test_activation_expires_previous_assignment() {
    let state: GovernanceState = create_test_state();
    let first: TransitionResult = run(
        &state,
        assign(
            "staff-1",
            RoleId::Inspector,
            scope(ScopeType::Center, &[ADAMA_CENTER]),
        ),
        &oromia_admin(),
    )
    .unwrap();

    let second: TransitionResult = run(
        &first.new_state,
        assign(
            "staff-1",
            RoleId::CenterManager,
            scope(ScopeType::Center, &[ADAMA_CENTER]),
        ),
        &oromia_admin(),
    )
    .unwrap();

    let previous: &RoleAssignment = second.new_state.assignment(5).unwrap();
    assert_eq!(previous.status, AssignmentStatus::Expired);
    assert_eq!(previous.effective_to, Some(test_date()));

    let current: &RoleAssignment = second
        .new_state
        .active_assignment(&UserId::new("staff-1"), test_date())
        .unwrap()
        .unwrap();
    assert_eq!(current.assignment_id, 6);
    assert_eq!(current.role_id, RoleId::CenterManager);
}

#[test]
fn test_pending_request_keeps_current_assignment_until_approved() {
    let state: GovernanceState = create_test_state();
    let requested: TransitionResult = run(
        &state,
        assign(
            OROMIA_ADMIN,
            RoleId::FinanceOfficer,
            scope(ScopeType::Region, &[OROMIA]),
        ),
        &root(),
    )
    .unwrap();

    assert_eq!(
        requested.new_state.assignment(4).unwrap().status,
        AssignmentStatus::Active
    );

    let approved: TransitionResult = run(
        &requested.new_state,
        Command::ApproveAssignment { assignment_id: 5 },
        &second_root(),
    )
    .unwrap();

    assert_eq!(
        approved.new_state.assignment(4).unwrap().status,
        AssignmentStatus::Expired
    );
    assert_eq!(
        approved
            .new_state
            .active_assignment(&UserId::new(OROMIA_ADMIN), test_date())
            .unwrap()
            .unwrap()
            .role_id,
        RoleId::FinanceOfficer
    );
}

#[test]
fn test_future_assignment_keeps_current_role_until_it_starts() {
    let state: GovernanceState = create_test_state();
    let first: TransitionResult = run(
        &state,
        assign(
            "staff-1",
            RoleId::Inspector,
            scope(ScopeType::Center, &[ADAMA_CENTER]),
        ),
        &oromia_admin(),
    )
    .unwrap();

    let scheduled: TransitionResult = run(
        &first.new_state,
        Command::AssignRole {
            user_id: UserId::new("staff-1"),
            role_id: RoleId::CenterManager,
            scope: scope(ScopeType::Center, &[ADAMA_CENTER]),
            effective_from: date!(2026 - 03 - 01),
            effective_to: None,
        },
        &oromia_admin(),
    )
    .unwrap();

    let current: &RoleAssignment = scheduled.new_state.assignment(5).unwrap();
    assert_eq!(current.status, AssignmentStatus::Active);
    assert_eq!(current.effective_to, Some(date!(2026 - 02 - 28)));

    let staff: UserId = UserId::new("staff-1");
    let today: &RoleAssignment = scheduled
        .new_state
        .active_assignment(&staff, test_date())
        .unwrap()
        .unwrap();
    assert_eq!(today.role_id, RoleId::Inspector);

    let after_start: &RoleAssignment = scheduled
        .new_state
        .active_assignment(&staff, date!(2026 - 03 - 01))
        .unwrap()
        .unwrap();
    assert_eq!(after_start.assignment_id, 6);
    assert_eq!(after_start.role_id, RoleId::CenterManager);

    let reloaded: GovernanceState =
        GovernanceState::from_snapshot(scheduled.new_state.to_snapshot()).unwrap();
    assert_eq!(reloaded.assignments().len(), 6);
}

#[test]
fn test_approving_future_assignment_keeps_current_role_until_it_starts() {
    let state: GovernanceState = create_test_state();
    let requested: TransitionResult = run(
        &state,
        Command::AssignRole {
            user_id: UserId::new(OROMIA_ADMIN),
            role_id: RoleId::FinanceOfficer,
            scope: scope(ScopeType::Region, &[OROMIA]),
            effective_from: date!(2026 - 06 - 01),
            effective_to: None,
        },
        &root(),
    )
    .unwrap();

    let approved: TransitionResult = run(
        &requested.new_state,
        Command::ApproveAssignment { assignment_id: 5 },
        &second_root(),
    )
    .unwrap();

    let current: &RoleAssignment = approved.new_state.assignment(4).unwrap();
    assert_eq!(current.status, AssignmentStatus::Active);
    assert_eq!(current.effective_to, Some(date!(2026 - 05 - 31)));

    let admin: UserId = UserId::new(OROMIA_ADMIN);
    assert_eq!(
        approved
            .new_state
            .active_assignment(&admin, test_date())
            .unwrap()
            .unwrap()
            .role_id,
        RoleId::RegionalAdmin
    );
    assert_eq!(
        approved
            .new_state
            .active_assignment(&admin, date!(2026 - 06 - 01))
            .unwrap()
            .unwrap()
            .role_id,
        RoleId::FinanceOfficer
    );
}

#[test]
fn test_rejection_closes_request() {
    let state: GovernanceState = create_test_state();
    let requested: TransitionResult = run(
        &state,
        assign(
            "finance-1",
            RoleId::FinanceOfficer,
            scope(ScopeType::Region, &[OROMIA]),
        ),
        &national_admin(),
    )
    .unwrap();

    let rejected: TransitionResult = run(
        &requested.new_state,
        Command::RejectAssignment { assignment_id: 5 },
        &root(),
    )
    .unwrap();

    let assignment: &RoleAssignment = rejected.new_state.assignment(5).unwrap();
    assert_eq!(assignment.status, AssignmentStatus::Expired);
    assert_eq!(assignment.approval_status, ApprovalStatus::Rejected);
    assert_eq!(assignment.approved_by, Some(UserId::new(ROOT)));
}

#[test]
fn test_requester_may_withdraw_request() {
    let state: GovernanceState = create_test_state();
    let requested: TransitionResult = run(
        &state,
        assign(
            "finance-1",
            RoleId::FinanceOfficer,
            scope(ScopeType::Region, &[OROMIA]),
        ),
        &national_admin(),
    )
    .unwrap();

    assert!(
        run(
            &requested.new_state,
            Command::RejectAssignment { assignment_id: 5 },
            &national_admin(),
        )
        .is_ok()
    );
}

#[test]
fn test_revoke_requires_authority_over_the_assignment() {
    let state: GovernanceState = create_test_state();

    let err: CoreError = run(
        &state,
        Command::RevokeAssignment { assignment_id: 3 },
        &oromia_admin(),
    )
    .unwrap_err();

    assert_eq!(err, CoreError::Denied(DenyReason::RoleNotDelegable));
}

#[test]
fn test_revoke_ends_assignment() {
    let state: GovernanceState = create_test_state();
    let granted: TransitionResult = run(
        &state,
        assign(
            "inspector-1",
            RoleId::Inspector,
            scope(ScopeType::Center, &[ADAMA_CENTER]),
        ),
        &oromia_admin(),
    )
    .unwrap();

    let revoked: TransitionResult = run(
        &granted.new_state,
        Command::RevokeAssignment { assignment_id: 5 },
        &oromia_admin(),
    )
    .unwrap();

    assert_eq!(
        revoked.new_state.assignment(5).unwrap().status,
        AssignmentStatus::Revoked
    );
    assert!(
        revoked
            .new_state
            .active_assignment(&UserId::new("inspector-1"), test_date())
            .unwrap()
            .is_none()
    );

    let err: CoreError = run(
        &revoked.new_state,
        Command::RevokeAssignment { assignment_id: 5 },
        &oromia_admin(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        CoreError::InvalidAssignmentState {
            assignment_id: 5,
            status: AssignmentStatus::Revoked,
        }
    );
}
