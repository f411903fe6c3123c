// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ActingUser, GovernanceSnapshot, GovernanceState};
use time::{Date, macros::date};
use vigov_audit::Cause;
use vigov_domain::{
    AdminUnit, ApprovalStatus, AssignmentStatus, InspectionCenter, RoleAssignment, RoleId, Scope,
    ScopeType, UnitType, UserId,
};

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

pub fn test_date() -> Date {
    date!(2026 - 01 - 15)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Governance request"))
}

pub fn scope(scope_type: ScopeType, ids: &[&str]) -> Scope {
    Scope::new(scope_type, ids.iter().copied()).unwrap()
}

pub fn create_test_units() -> Vec<AdminUnit> {
    let from: Date = date!(2020 - 01 - 01);
    vec![
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
    ]
}

pub fn create_test_assignment(
    assignment_id: u64,
    user: &str,
    role_id: RoleId,
    scope: Scope,
) -> RoleAssignment {
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

pub fn create_test_snapshot() -> GovernanceSnapshot {
    GovernanceSnapshot {
        units: create_test_units(),
        centers: vec![
            InspectionCenter::new(GONDAR_CENTER, "Gondar Inspection Center", NORTH_GONDAR),
            InspectionCenter::new(ADAMA_CENTER, "Adama Inspection Center", ADAMA),
        ],
        assignments: vec![
            create_test_assignment(1, ROOT, RoleId::SuperAdmin, Scope::national()),
            create_test_assignment(2, SECOND_ROOT, RoleId::SuperAdmin, Scope::national()),
            create_test_assignment(3, NATIONAL_ADMIN, RoleId::NationalAdmin, Scope::national()),
            create_test_assignment(
                4,
                OROMIA_ADMIN,
                RoleId::RegionalAdmin,
                scope(ScopeType::Region, &[OROMIA]),
            ),
        ],
        unit_assignments: Vec::new(),
        records: Vec::new(),
    }
}

pub fn create_test_state() -> GovernanceState {
    GovernanceState::from_snapshot(create_test_snapshot()).unwrap()
}

pub fn acting(user: &str, role: RoleId, scope: Scope) -> ActingUser {
    ActingUser::new(UserId::new(user), role, scope)
}

pub fn root() -> ActingUser {
    acting(ROOT, RoleId::SuperAdmin, Scope::national())
}

pub fn second_root() -> ActingUser {
    acting(SECOND_ROOT, RoleId::SuperAdmin, Scope::national())
}

pub fn national_admin() -> ActingUser {
    acting(NATIONAL_ADMIN, RoleId::NationalAdmin, Scope::national())
}

pub fn oromia_admin() -> ActingUser {
    acting(
        OROMIA_ADMIN,
        RoleId::RegionalAdmin,
        scope(ScopeType::Region, &[OROMIA]),
    )
}
