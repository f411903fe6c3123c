// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use time::{Date, macros::date};
use vigov::{GovernanceSnapshot, GovernanceState, InMemoryRepository};
use vigov_audit::Cause;
use vigov_domain::{
    AdminUnit, ApprovalStatus, AssignmentStatus, CenterId, InspectionCenter, RecordKind,
    RecordRef, RoleAssignment, RoleId, Scope, ScopeType, UnitId, UnitType, UserId,
};

use crate::{AuthenticatedActor, authenticate};

pub const NATIONAL: &str = "AU-ET";
pub const OROMIA: &str = "AU-OROMIA";
pub const AMHARA: &str = "AU-AMHARA";
pub const EAST_SHEWA: &str = "AU-OR-ESHEWA";
pub const ADAMA: &str = "AU-OR-ADAMA";
pub const NORTH_GONDAR: &str = "AU-AM-NGONDAR";
pub const ADAMA_CENTER: &str = "CTR-999";
pub const GONDAR_CENTER: &str = "CTR-100";

pub const ROOT: &str = "root";
pub const SECOND_ROOT: &str = "root-2";
pub const NATIONAL_ADMIN: &str = "national-admin";
pub const OROMIA_ADMIN: &str = "oromia-admin";
pub const ADAMA_INSPECTOR: &str = "adama-inspector";
pub const AUDITOR: &str = "auditor";
pub const FUTURE_INSPECTOR: &str = "future-inspector";

pub fn test_date() -> Date {
    date!(2026 - 01 - 15)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn scope(scope_type: ScopeType, ids: &[&str]) -> Scope {
    Scope::new(scope_type, ids.iter().copied()).unwrap()
}

fn assignment(assignment_id: u64, user: &str, role_id: RoleId, scope: Scope) -> RoleAssignment {
    RoleAssignment {
        assignment_id,
        user_id: UserId::new(user),
        role_id,
        scope,
        status: AssignmentStatus::Active,
        effective_from: date!(2025 - 01 - 01),
        effective_to: None,
        approval_required: false,
        approval_status: ApprovalStatus::NotRequired,
        requested_by: UserId::new(ROOT),
        approved_by: None,
    }
}

fn record(id: &str, kind: RecordKind, unit: Option<&str>, center: Option<&str>) -> RecordRef {
    RecordRef {
        id: id.to_string(),
        kind,
        admin_unit_id: unit.map(UnitId::new),
        center_id: center.map(CenterId::new),
    }
}

pub fn create_test_snapshot() -> GovernanceSnapshot {
    let from: Date = date!(2020 - 01 - 01);
    let mut future: RoleAssignment = assignment(
        7,
        FUTURE_INSPECTOR,
        RoleId::Inspector,
        scope(ScopeType::Center, &[ADAMA_CENTER]),
    );
    future.effective_from = date!(2027 - 01 - 01);

    GovernanceSnapshot {
        units: vec![
            AdminUnit::new(NATIONAL, UnitType::National, "National", None, from),
            AdminUnit::new(OROMIA, UnitType::Region, "Oromia", Some(NATIONAL), from),
            AdminUnit::new(AMHARA, UnitType::Region, "Amhara", Some(NATIONAL), from),
            AdminUnit::new(
                EAST_SHEWA,
                UnitType::Zone,
                "East Shewa Zone",
                Some(OROMIA),
                from,
            ),
            AdminUnit::new(ADAMA, UnitType::SubCity, "Adama", Some(EAST_SHEWA), from),
            AdminUnit::new(
                NORTH_GONDAR,
                UnitType::Zone,
                "North Gondar Zone",
                Some(AMHARA),
                from,
            ),
        ],
        centers: vec![
            InspectionCenter::new(GONDAR_CENTER, "Gondar Inspection Center", NORTH_GONDAR),
            InspectionCenter::new(ADAMA_CENTER, "Adama Inspection Center", ADAMA),
        ],
        assignments: vec![
            assignment(1, ROOT, RoleId::SuperAdmin, Scope::national()),
            assignment(2, SECOND_ROOT, RoleId::SuperAdmin, Scope::national()),
            assignment(3, NATIONAL_ADMIN, RoleId::NationalAdmin, Scope::national()),
            assignment(
                4,
                OROMIA_ADMIN,
                RoleId::RegionalAdmin,
                scope(ScopeType::Region, &[OROMIA]),
            ),
            assignment(
                5,
                ADAMA_INSPECTOR,
                RoleId::Inspector,
                scope(ScopeType::Center, &[ADAMA_CENTER]),
            ),
            assignment(6, AUDITOR, RoleId::Auditor, Scope::national()),
            future,
        ],
        unit_assignments: Vec::new(),
        records: vec![
            record("INS-1", RecordKind::Inspection, None, Some(ADAMA_CENTER)),
            record("INS-2", RecordKind::Inspection, None, Some(GONDAR_CENTER)),
            record("CASE-1", RecordKind::Case, Some(EAST_SHEWA), None),
            record("PAY-1", RecordKind::Payment, Some(OROMIA), None),
            record("INS-3", RecordKind::Inspection, None, None),
        ],
    }
}

pub fn create_test_state() -> GovernanceState {
    GovernanceState::from_snapshot(create_test_snapshot()).unwrap()
}

pub fn create_test_repository() -> InMemoryRepository {
    InMemoryRepository::new(create_test_state())
}

pub fn actor(state: &GovernanceState, user: &str) -> AuthenticatedActor {
    authenticate(state, user, test_date()).unwrap()
}

pub fn record_ids(records: &[RecordRef]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}
