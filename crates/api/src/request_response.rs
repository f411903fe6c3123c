// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use serde::{Deserialize, Serialize};
use time::Date;
use vigov_audit::AuditEvent;
use vigov_domain::{
    ActorContext, AdminUnit, DenyReason, InspectionCenter, RecordRef, RoleAssignment, RoleId,
    Scope, TreeNode, UnitAssignment, UnitAssignmentType, UnitId, UnitStatus, UnitType, UserId,
};

/// API request to evaluate whether a role may be assigned at a scope.
///
/// When `actor` is omitted the caller's own role and scope are evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeAssignmentRequest {
    /// The role and scope to evaluate instead of the caller's own.
    #[serde(default)]
    pub actor: Option<ActorContext>,
    /// The role to be assigned.
    pub target_role: RoleId,
    /// The scope the role would be assigned at.
    pub target_scope: Scope,
}

/// API response for an assignment decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeAssignmentResponse {
    /// Whether the assignment is allowed.
    pub allowed: bool,
    /// Why the assignment was denied.
    pub reason: Option<DenyReason>,
    /// A human-readable explanation of the denial.
    pub message: Option<String>,
    /// Whether an allowed assignment would need a second person's approval.
    pub requires_approval: bool,
}

/// API response listing the records visible to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleRecordsResponse {
    /// The scope the records were filtered by.
    pub scope: Scope,
    /// The visible records, in store order.
    pub records: Vec<RecordRef>,
}

/// API request to create or replace an administrative unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRequest {
    /// The unit identifier.
    pub id: String,
    /// The hierarchy level.
    pub unit_type: UnitType,
    /// English name.
    pub name_en: String,
    /// Amharic name.
    #[serde(default)]
    pub name_am: String,
    /// Short administrative code. Defaults to the id.
    #[serde(default)]
    pub code: Option<String>,
    /// The parent unit.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Service status.
    #[serde(default)]
    pub status: UnitStatus,
    /// First day the unit is in effect.
    pub effective_from: Date,
    /// Last day the unit is in effect, if bounded.
    #[serde(default)]
    pub effective_to: Option<Date>,
}

impl UnitRequest {
    /// Converts the request into a domain unit.
    #[must_use]
    pub fn to_unit(&self) -> AdminUnit {
        AdminUnit {
            id: UnitId::new(&self.id),
            unit_type: self.unit_type,
            name_en: self.name_en.clone(),
            name_am: self.name_am.clone(),
            code: self.code.clone().unwrap_or_else(|| self.id.clone()),
            parent_id: self.parent_id.as_deref().map(UnitId::new),
            status: self.status,
            effective_from: self.effective_from,
            effective_to: self.effective_to,
        }
    }
}

/// A unit together with its derived jurisdiction path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInfo {
    /// The unit.
    pub unit: AdminUnit,
    /// The path from the national root, derived from the live parent chain.
    pub path: String,
}

/// API response for a unit listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUnitsResponse {
    /// The visible units, in supply order.
    pub units: Vec<UnitInfo>,
}

/// API response for a jurisdiction path lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPathResponse {
    /// The unit.
    pub unit_id: UnitId,
    /// The path from the national root.
    pub path: String,
}

/// API response for the jurisdiction tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeResponse {
    /// One node per root unit.
    pub roots: Vec<TreeNode>,
}

/// API response listing units without an active owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitsWithoutOwnerResponse {
    /// The units, in supply order.
    pub units: Vec<AdminUnit>,
}

/// API request to create an inspection center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCenterRequest {
    /// The center identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The owning administrative unit.
    pub admin_unit_id: String,
}

impl CreateCenterRequest {
    /// Converts the request into a domain center.
    #[must_use]
    pub fn to_center(&self) -> InspectionCenter {
        InspectionCenter::new(&self.id, &self.name, &self.admin_unit_id)
    }
}

/// API request to assign a role to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRoleRequest {
    /// The user receiving the role.
    pub user_id: String,
    /// The role being granted.
    pub role_id: RoleId,
    /// The scope of the grant.
    pub scope: Scope,
    /// First day in force.
    pub effective_from: Date,
    /// Last day in force, if bounded.
    #[serde(default)]
    pub effective_to: Option<Date>,
}

/// API request acting on an existing assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentActionRequest {
    /// The assignment acted on.
    pub assignment_id: u64,
}

/// API request to designate an institution for a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignOwnerRequest {
    /// The unit.
    pub unit_id: String,
    /// The designated institution or office.
    pub institution: String,
    /// The kind of responsibility.
    pub assignment_type: UnitAssignmentType,
}

impl AssignOwnerRequest {
    /// Converts the request into an active designation.
    #[must_use]
    pub fn to_designation(&self) -> UnitAssignment {
        UnitAssignment::new(&self.unit_id, &self.institution, self.assignment_type)
    }
}

/// API response for a successful state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// The audit event recording the change.
    pub event_id: u64,
    /// A success message.
    pub message: String,
}

/// Represents whether a specific action is permitted.
///
/// Serializes to JSON as true/false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value: bool = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(value))
    }
}

/// What the caller may do, for UI gating.
///
/// Capabilities are advisory only. Every write is checked again when it
/// is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorCapabilities {
    /// The caller.
    pub user_id: UserId,
    /// The caller's role.
    pub role: RoleId,
    /// The caller's scope.
    pub scope: Scope,
    /// Roles the caller may assign somewhere.
    pub assignable_roles: Vec<RoleId>,
    /// Whether the caller can create and edit units and designations.
    pub can_manage_jurisdiction: Capability,
    /// Whether the caller can create inspection centers.
    pub can_manage_centers: Capability,
    /// Whether the caller can request role assignments.
    pub can_assign_roles: Capability,
    /// Whether the caller can approve or reject pending assignments.
    pub can_approve_assignments: Capability,
    /// Whether the caller can see inspection records.
    pub can_view_inspections: Capability,
    /// Whether the caller can see case records.
    pub can_view_cases: Capability,
    /// Whether the caller can see financial records.
    pub can_view_financials: Capability,
    /// Whether the caller can read the audit log.
    pub can_view_audit_log: Capability,
}

/// What the caller may do with one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentCapabilities {
    /// Whether the caller can approve the assignment.
    pub can_approve: Capability,
    /// Whether the caller can reject or withdraw the assignment.
    pub can_reject: Capability,
    /// Whether the caller can revoke the assignment.
    pub can_revoke: Capability,
}

/// An assignment with the caller's capabilities on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentInfo {
    /// The assignment.
    pub assignment: RoleAssignment,
    /// What the caller may do with it.
    pub capabilities: AssignmentCapabilities,
}

/// API response listing the assignments visible to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAssignmentsResponse {
    /// The assignments, ordered by id.
    pub assignments: Vec<AssignmentInfo>,
}

/// API response for the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogResponse {
    /// The visible events, oldest first.
    pub events: Vec<AuditEvent>,
}
