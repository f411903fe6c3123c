// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The role catalog: the closed set of portal roles and their attributes.

use crate::error::DomainError;
use crate::types::ScopeType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Portal roles.
///
/// Roles are a closed set so that an unknown role name is rejected at the
/// boundary instead of silently matching nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleId {
    /// Top-level system administrator. Unconstrained by delegation policy.
    SuperAdmin,
    /// National-level administrator of the regulatory authority.
    NationalAdmin,
    /// Administrator of one or more regions.
    RegionalAdmin,
    /// Administrator of one or more zones.
    ZoneAdmin,
    /// Manager of one or more inspection centers.
    CenterManager,
    /// Vehicle inspector working at a center.
    Inspector,
    /// Officer handling complaint and enforcement cases.
    CaseOfficer,
    /// Officer handling fee collection and payments.
    FinanceOfficer,
    /// Read-only oversight auditor.
    Auditor,
}

impl RoleId {
    /// All roles, in catalog order.
    pub const ALL: [Self; 9] = [
        Self::SuperAdmin,
        Self::NationalAdmin,
        Self::RegionalAdmin,
        Self::ZoneAdmin,
        Self::CenterManager,
        Self::Inspector,
        Self::CaseOfficer,
        Self::FinanceOfficer,
        Self::Auditor,
    ];

    /// Returns true for the top-level role that bypasses delegation policy.
    #[must_use]
    pub const fn is_top_level(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "superAdmin",
            Self::NationalAdmin => "nationalAdmin",
            Self::RegionalAdmin => "regionalAdmin",
            Self::ZoneAdmin => "zoneAdmin",
            Self::CenterManager => "centerManager",
            Self::Inspector => "inspector",
            Self::CaseOfficer => "caseOfficer",
            Self::FinanceOfficer => "financeOfficer",
            Self::Auditor => "auditor",
        }
    }
}

impl FromStr for RoleId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DomainError::InvalidRole(s.to_string()))
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Broad grouping of roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleCategory {
    /// Governance and user administration.
    Administration,
    /// Day-to-day inspection operations.
    Operations,
    /// Fees and payments.
    Finance,
    /// Read-only oversight.
    Oversight,
}

/// Individual capabilities granted by a role's permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Create and edit administrative units and owner designations.
    ManageJurisdiction,
    /// Create and edit inspection centers.
    ManageCenters,
    /// Request role assignments for other users.
    AssignRoles,
    /// Approve or reject pending role assignments.
    ApproveAssignments,
    /// View inspection records.
    ViewInspections,
    /// Record inspection results.
    ConductInspections,
    /// View complaint and enforcement cases.
    ViewCases,
    /// Work complaint and enforcement cases.
    ManageCases,
    /// View fee and payment records.
    ViewFinancials,
    /// Edit fee schedules.
    ManageFees,
    /// Read the audit log.
    ViewAuditLog,
}

/// A role catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// The role this entry describes.
    pub id: RoleId,
    /// Broad grouping.
    pub category: RoleCategory,
    /// The scope level the role is normally granted at.
    pub default_scope_type: ScopeType,
    /// Capabilities granted by the role.
    pub permissions: BTreeSet<Permission>,
    /// Sensitive roles always require approval when assigned.
    pub is_sensitive: bool,
    /// Assignments of this role need a second, distinct approver.
    pub requires_two_person_approval: bool,
}

impl RoleDefinition {
    /// Returns true if the role grants `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Read-only registry of role definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCatalog {
    roles: BTreeMap<RoleId, RoleDefinition>,
}

impl RoleCatalog {
    /// Creates a catalog from explicit definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if a role is defined more than once.
    pub fn new(definitions: Vec<RoleDefinition>) -> Result<Self, DomainError> {
        let mut roles: BTreeMap<RoleId, RoleDefinition> = BTreeMap::new();
        for definition in definitions {
            let id: RoleId = definition.id;
            if roles.insert(id, definition).is_some() {
                return Err(DomainError::DuplicateRoleDefinition(id));
            }
        }
        Ok(Self { roles })
    }

    /// The standard catalog of the inspection portal.
    #[must_use]
    pub fn standard() -> Self {
        use Permission::{
            ApproveAssignments, AssignRoles, ConductInspections, ManageCases, ManageCenters,
            ManageFees, ManageJurisdiction, ViewAuditLog, ViewCases, ViewFinancials,
            ViewInspections,
        };

        let entry = |id: RoleId,
                     category: RoleCategory,
                     default_scope_type: ScopeType,
                     permissions: &[Permission],
                     is_sensitive: bool,
                     requires_two_person_approval: bool| {
            (
                id,
                RoleDefinition {
                    id,
                    category,
                    default_scope_type,
                    permissions: permissions.iter().copied().collect(),
                    is_sensitive,
                    requires_two_person_approval,
                },
            )
        };

        let roles: BTreeMap<RoleId, RoleDefinition> = [
            entry(
                RoleId::SuperAdmin,
                RoleCategory::Administration,
                ScopeType::National,
                &[
                    ManageJurisdiction,
                    ManageCenters,
                    AssignRoles,
                    ApproveAssignments,
                    ViewInspections,
                    ViewCases,
                    ViewFinancials,
                    ManageFees,
                    ViewAuditLog,
                ],
                true,
                true,
            ),
            entry(
                RoleId::NationalAdmin,
                RoleCategory::Administration,
                ScopeType::National,
                &[
                    ManageJurisdiction,
                    ManageCenters,
                    AssignRoles,
                    ApproveAssignments,
                    ViewInspections,
                    ViewCases,
                    ViewFinancials,
                    ViewAuditLog,
                ],
                true,
                true,
            ),
            entry(
                RoleId::RegionalAdmin,
                RoleCategory::Administration,
                ScopeType::Region,
                &[
                    ManageCenters,
                    AssignRoles,
                    ApproveAssignments,
                    ViewInspections,
                    ViewCases,
                    ViewFinancials,
                ],
                false,
                false,
            ),
            entry(
                RoleId::ZoneAdmin,
                RoleCategory::Administration,
                ScopeType::Zone,
                &[AssignRoles, ViewInspections, ViewCases],
                false,
                false,
            ),
            entry(
                RoleId::CenterManager,
                RoleCategory::Operations,
                ScopeType::Center,
                &[AssignRoles, ViewInspections, ConductInspections, ViewCases],
                false,
                false,
            ),
            entry(
                RoleId::Inspector,
                RoleCategory::Operations,
                ScopeType::Center,
                &[ViewInspections, ConductInspections],
                false,
                false,
            ),
            entry(
                RoleId::CaseOfficer,
                RoleCategory::Operations,
                ScopeType::Region,
                &[ViewInspections, ViewCases, ManageCases],
                false,
                false,
            ),
            entry(
                RoleId::FinanceOfficer,
                RoleCategory::Finance,
                ScopeType::Region,
                &[ViewFinancials, ManageFees],
                true,
                false,
            ),
            entry(
                RoleId::Auditor,
                RoleCategory::Oversight,
                ScopeType::National,
                &[ViewInspections, ViewCases, ViewFinancials, ViewAuditLog],
                true,
                false,
            ),
        ]
        .into_iter()
        .collect();

        Self { roles }
    }

    /// Looks up a role definition.
    #[must_use]
    pub fn get(&self, role: RoleId) -> Option<&RoleDefinition> {
        self.roles.get(&role)
    }

    /// Returns all definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &RoleDefinition> {
        self.roles.values()
    }

    /// Returns true if `role` grants `permission`. Unknown roles grant nothing.
    #[must_use]
    pub fn has_permission(&self, role: RoleId, permission: Permission) -> bool {
        self.get(role)
            .is_some_and(|definition| definition.has_permission(permission))
    }

    /// Decides whether assigning `role` at `scope_type` needs approval.
    ///
    /// Approval is required if the role is sensitive OR the scope is
    /// national. Either condition alone is sufficient. A role missing from
    /// the catalog always requires approval.
    #[must_use]
    pub fn requires_approval(&self, role: RoleId, scope_type: ScopeType) -> bool {
        let sensitive: bool = self.get(role).is_none_or(|definition| definition.is_sensitive);
        sensitive || scope_type == ScopeType::National
    }

    /// Returns true if assignments of `role` need a second, distinct approver.
    #[must_use]
    pub fn requires_two_person_approval(&self, role: RoleId) -> bool {
        self.get(role)
            .is_none_or(|definition| definition.requires_two_person_approval)
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
