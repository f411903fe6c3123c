// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    ADAMA_CENTER, AMHARA, create_test_cause, create_test_state, oromia_admin, root, scope,
    test_date,
};
use crate::{
    Command, GovernanceRepository, InMemoryRepository, RepositoryError, Revisioned,
    TransitionResult, apply,
};
use time::{Date, macros::date};
use vigov_audit::AuditEvent;
use vigov_domain::{AdminUnit, RoleId, ScopeType, UnitId, UnitType, UserId};

fn assign_inspector(user: &str) -> Command {
    Command::AssignRole {
        user_id: UserId::new(user),
        role_id: RoleId::Inspector,
        scope: scope(ScopeType::Center, &[ADAMA_CENTER]),
        effective_from: date!(2026 - 01 - 01),
        effective_to: None,
    }
}

#[test]
fn test_commit_advances_revision_and_stamps_event() {
    let mut repository: InMemoryRepository = InMemoryRepository::new(create_test_state());
    let current: Revisioned = repository.load();
    assert_eq!(current.revision, 0);

    let result: TransitionResult = apply(
        &current.state,
        assign_inspector("inspector-1"),
        &oromia_admin(),
        create_test_cause(),
        test_date(),
    )
    .unwrap();
    let event: AuditEvent = repository.commit(current.revision, result).unwrap();

    assert_eq!(event.event_id, Some(1));
    assert_eq!(repository.revision(), 1);
    assert_eq!(repository.state().assignments().len(), 5);
    assert_eq!(repository.audit_log(), vec![event.clone()]);
    assert_eq!(repository.audit_event(1).unwrap(), event);
}

#[test]
fn test_stale_commit_is_rejected() {
    let mut repository: InMemoryRepository = InMemoryRepository::new(create_test_state());
    let first_read: Revisioned = repository.load();
    let second_read: Revisioned = repository.load();

    let first: TransitionResult = apply(
        &first_read.state,
        assign_inspector("inspector-1"),
        &oromia_admin(),
        create_test_cause(),
        test_date(),
    )
    .unwrap();
    let second: TransitionResult = apply(
        &second_read.state,
        assign_inspector("inspector-2"),
        &oromia_admin(),
        create_test_cause(),
        test_date(),
    )
    .unwrap();

    repository.commit(first_read.revision, first).unwrap();
    let err: RepositoryError = repository.commit(second_read.revision, second).unwrap_err();

    assert_eq!(
        err,
        RepositoryError::StaleRevision {
            expected: 0,
            actual: 1,
        }
    );
    assert_eq!(repository.audit_log().len(), 1);
    assert_eq!(repository.state().assignments().len(), 5);
}

#[test]
fn test_cycle_check_and_write_cannot_interleave() {
    let mut repository: InMemoryRepository = InMemoryRepository::new(create_test_state());
    let from: Date = date!(2026 - 01 - 01);
    let setup: TransitionResult = apply(
        &repository.load().state,
        Command::CreateUnit {
            unit: AdminUnit::new("AU-AM-Z2", UnitType::Zone, "Zone Two", Some(AMHARA), from),
        },
        &root(),
        create_test_cause(),
        test_date(),
    )
    .unwrap();
    repository.commit(0, setup).unwrap();

    let read: Revisioned = repository.load();
    let mut amhara: AdminUnit = read
        .state
        .tree()
        .unit(&UnitId::new(AMHARA))
        .cloned()
        .unwrap();
    amhara.parent_id = Some(UnitId::new("AU-AM-Z2"));
    amhara.unit_type = UnitType::SubCity;

    // Validated against the committed state this is a cycle.
    assert!(
        apply(
            &read.state,
            Command::UpdateUnit { unit: amhara },
            &root(),
            create_test_cause(),
            test_date(),
        )
        .is_err()
    );

    // A transition computed before the setup commit cannot land afterwards.
    let stale: TransitionResult = apply(
        &create_test_state(),
        assign_inspector("inspector-1"),
        &oromia_admin(),
        create_test_cause(),
        test_date(),
    )
    .unwrap();
    assert!(matches!(
        repository.commit(0, stale),
        Err(RepositoryError::StaleRevision { .. })
    ));
}

#[test]
fn test_missing_event_is_reported() {
    let repository: InMemoryRepository = InMemoryRepository::new(create_test_state());

    assert_eq!(
        repository.audit_event(3),
        Err(RepositoryError::EventNotFound(3))
    );
}
