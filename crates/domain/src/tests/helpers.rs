// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AdminUnit, ApprovalStatus, AssignmentStatus, InspectionCenter, JurisdictionTree,
    RoleAssignment, RoleId, Scope, ScopeType, UnitType, UserId,
};
use time::{Date, macros::date};

pub const NATIONAL: &str = "AU-ET";
pub const OROMIA: &str = "AU-OROMIA";
pub const AMHARA: &str = "AU-AMHARA";
pub const EAST_SHEWA: &str = "AU-OR-ESHEWA";
pub const ADAMA: &str = "AU-OR-ADAMA";
pub const ADAMA_W01: &str = "AU-OR-ADAMA-W01";
pub const NORTH_GONDAR: &str = "AU-AM-NGONDAR";
pub const ADAMA_CENTER: &str = "CTR-999";
pub const GONDAR_CENTER: &str = "CTR-100";

pub fn test_date() -> Date {
    date!(2026 - 01 - 15)
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
            ADAMA_W01,
            UnitType::Woreda,
            "Adama Woreda 01",
            Some(ADAMA),
            from,
        ),
        AdminUnit::new(
            NORTH_GONDAR,
            UnitType::Zone,
            "North Gondar Zone",
            Some(AMHARA),
            from,
        ),
    ]
}

pub fn create_test_centers() -> Vec<InspectionCenter> {
    vec![
        InspectionCenter::new(ADAMA_CENTER, "Adama Inspection Center", ADAMA),
        InspectionCenter::new(GONDAR_CENTER, "Gondar Inspection Center", NORTH_GONDAR),
    ]
}

pub fn create_test_tree() -> JurisdictionTree {
    JurisdictionTree::new(create_test_units(), create_test_centers()).unwrap()
}

pub fn scope(scope_type: ScopeType, ids: &[&str]) -> Scope {
    Scope::new(scope_type, ids.iter().copied()).unwrap()
}

pub fn create_test_assignment(
    assignment_id: u64,
    user: &str,
    role_id: RoleId,
    scope: Scope,
    status: AssignmentStatus,
) -> RoleAssignment {
    RoleAssignment {
        assignment_id,
        user_id: UserId::new(user),
        role_id,
        scope,
        status,
        effective_from: date!(2025 - 01 - 01),
        effective_to: None,
        approval_required: false,
        approval_status: ApprovalStatus::NotRequired,
        requested_by: UserId::new("root"),
        approved_by: None,
    }
}
