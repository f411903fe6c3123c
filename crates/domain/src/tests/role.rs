// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, Permission, RoleCatalog, RoleCategory, RoleDefinition, RoleId, ScopeType,
};
use std::collections::BTreeSet;
use std::str::FromStr;

#[test]
fn test_standard_catalog_defines_every_role() {
    let catalog: RoleCatalog = RoleCatalog::standard();

    for role in RoleId::ALL {
        assert!(catalog.get(role).is_some(), "missing definition for {role}");
    }
}

#[test]
fn test_requires_approval_for_sensitive_role_at_any_scope() {
    let catalog: RoleCatalog = RoleCatalog::standard();

    assert!(catalog.requires_approval(RoleId::FinanceOfficer, ScopeType::Region));
    assert!(catalog.requires_approval(RoleId::FinanceOfficer, ScopeType::Center));
}

#[test]
fn test_requires_approval_for_non_sensitive_role_at_national_scope() {
    let catalog: RoleCatalog = RoleCatalog::standard();

    assert!(!catalog.get(RoleId::RegionalAdmin).unwrap().is_sensitive);
    assert!(catalog.requires_approval(RoleId::RegionalAdmin, ScopeType::National));
}

#[test]
fn test_no_approval_when_neither_condition_holds() {
    let catalog: RoleCatalog = RoleCatalog::standard();

    assert!(!catalog.requires_approval(RoleId::CenterManager, ScopeType::Center));
    assert!(!catalog.requires_approval(RoleId::RegionalAdmin, ScopeType::Region));
}

#[test]
fn test_requires_approval_is_or_of_sensitivity_and_national() {
    let catalog: RoleCatalog = RoleCatalog::standard();
    let scope_types: [ScopeType; 6] = [
        ScopeType::National,
        ScopeType::Region,
        ScopeType::Zone,
        ScopeType::SubCity,
        ScopeType::Woreda,
        ScopeType::Center,
    ];

    for role in RoleId::ALL {
        let sensitive: bool = catalog.get(role).unwrap().is_sensitive;
        for scope_type in scope_types {
            assert_eq!(
                catalog.requires_approval(role, scope_type),
                sensitive || scope_type == ScopeType::National,
                "{role} at {scope_type}"
            );
        }
    }
}

#[test]
fn test_missing_role_requires_approval() {
    let catalog: RoleCatalog = RoleCatalog::new(Vec::new()).unwrap();

    assert!(catalog.requires_approval(RoleId::Inspector, ScopeType::Center));
    assert!(catalog.requires_two_person_approval(RoleId::Inspector));
    assert!(!catalog.has_permission(RoleId::Inspector, Permission::ViewInspections));
}

#[test]
fn test_catalog_rejects_duplicate_definitions() {
    let definition: RoleDefinition = RoleDefinition {
        id: RoleId::Auditor,
        category: RoleCategory::Oversight,
        default_scope_type: ScopeType::National,
        permissions: BTreeSet::from([Permission::ViewAuditLog]),
        is_sensitive: true,
        requires_two_person_approval: false,
    };

    let err: DomainError = RoleCatalog::new(vec![definition.clone(), definition]).unwrap_err();

    assert_eq!(err, DomainError::DuplicateRoleDefinition(RoleId::Auditor));
}

#[test]
fn test_permissions() {
    let catalog: RoleCatalog = RoleCatalog::standard();

    assert!(catalog.has_permission(RoleId::SuperAdmin, Permission::ManageJurisdiction));
    assert!(catalog.has_permission(RoleId::FinanceOfficer, Permission::ViewFinancials));
    assert!(!catalog.has_permission(RoleId::Inspector, Permission::ViewFinancials));
    assert!(!catalog.has_permission(RoleId::RegionalAdmin, Permission::ManageJurisdiction));
}

#[test]
fn test_role_id_round_trips_through_str() {
    for role in RoleId::ALL {
        assert_eq!(RoleId::from_str(role.as_str()).unwrap(), role);
    }
    assert_eq!(RoleId::SuperAdmin.as_str(), "superAdmin");
    assert_eq!(RoleId::CenterManager.as_str(), "centerManager");
}

#[test]
fn test_role_id_rejects_unknown_name() {
    let err: DomainError = RoleId::from_str("superadmin").unwrap_err();

    assert_eq!(err, DomainError::InvalidRole(String::from("superadmin")));
}

#[test]
fn test_role_id_serializes_as_camel_case() {
    let json: String = serde_json::to_string(&RoleId::RegionalAdmin).unwrap();

    assert_eq!(json, "\"regionalAdmin\"");
}

#[test]
fn test_only_super_admin_is_top_level() {
    let top: Vec<RoleId> = RoleId::ALL.into_iter().filter(|r| r.is_top_level()).collect();

    assert_eq!(top, vec![RoleId::SuperAdmin]);
}
