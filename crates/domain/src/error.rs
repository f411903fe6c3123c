// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::role::RoleId;
use crate::types::{ScopeType, UnitType};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Administrative unit does not exist.
    UnitNotFound(String),
    /// Inspection center does not exist.
    CenterNotFound(String),
    /// Administrative unit id is used more than once.
    DuplicateUnit(String),
    /// Inspection center id is used more than once.
    DuplicateCenter(String),
    /// Walking the parent chain revisited a unit.
    CycleDetected {
        /// The unit whose parent chain loops.
        unit_id: String,
        /// The chain walked before the revisit, starting at `unit_id`.
        chain: Vec<String>,
    },
    /// A unit references a parent that does not exist.
    OrphanedUnit {
        /// The unit with the dangling reference.
        unit_id: String,
        /// The missing parent id.
        missing_parent: String,
    },
    /// A non-national unit has no parent.
    MissingParent {
        /// The unit without a parent.
        unit_id: String,
        /// The unit's level.
        unit_type: UnitType,
    },
    /// A unit's parent is not strictly shallower than the unit.
    InvalidParentType {
        /// The child unit.
        unit_id: String,
        /// The child unit's level.
        unit_type: UnitType,
        /// The parent unit.
        parent_id: String,
        /// The parent unit's level.
        parent_type: UnitType,
    },
    /// Unit fields are empty or invalid.
    InvalidUnit(String),
    /// Center fields are empty or invalid.
    InvalidCenter(String),
    /// An effective date range ends before it starts.
    InvalidEffectiveRange {
        /// The start of the range.
        from: time::Date,
        /// The end of the range.
        to: time::Date,
    },
    /// A scope is malformed.
    InvalidScope(String),
    /// A scope id does not address an entity of the scope's level.
    ScopeTypeMismatch {
        /// The offending id.
        id: String,
        /// The scope type the id was listed under.
        expected: ScopeType,
    },
    /// Unknown role name.
    InvalidRole(String),
    /// Unknown scope type name.
    InvalidScopeType(String),
    /// Unknown unit type name.
    InvalidUnitType(String),
    /// A role appears more than once in the catalog.
    DuplicateRoleDefinition(RoleId),
    /// A delegator role has more than one delegation policy.
    DuplicatePolicy(RoleId),
    /// A policy waives approval for a role that is sensitive.
    InconsistentPolicy {
        /// The delegator role of the policy.
        delegator: RoleId,
        /// The sensitive role listed by the policy.
        role: RoleId,
    },
    /// A user holds more than one active role assignment.
    MultipleActiveAssignments {
        /// The user.
        user_id: String,
        /// How many active assignments were found.
        count: usize,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnitNotFound(id) => write!(f, "Administrative unit '{id}' not found"),
            Self::CenterNotFound(id) => write!(f, "Inspection center '{id}' not found"),
            Self::DuplicateUnit(id) => {
                write!(f, "Administrative unit '{id}' already exists")
            }
            Self::DuplicateCenter(id) => write!(f, "Inspection center '{id}' already exists"),
            Self::CycleDetected { unit_id, chain } => {
                write!(
                    f,
                    "Cycle detected in parent chain of '{unit_id}': {}",
                    chain.join(" -> ")
                )
            }
            Self::OrphanedUnit {
                unit_id,
                missing_parent,
            } => {
                write!(
                    f,
                    "Administrative unit '{unit_id}' references missing parent '{missing_parent}'"
                )
            }
            Self::MissingParent { unit_id, unit_type } => {
                write!(
                    f,
                    "Administrative unit '{unit_id}' of type {unit_type} must have a parent"
                )
            }
            Self::InvalidParentType {
                unit_id,
                unit_type,
                parent_id,
                parent_type,
            } => {
                write!(
                    f,
                    "{unit_type} '{unit_id}' cannot be placed under {parent_type} '{parent_id}'"
                )
            }
            Self::InvalidUnit(msg) => write!(f, "Invalid administrative unit: {msg}"),
            Self::InvalidCenter(msg) => write!(f, "Invalid inspection center: {msg}"),
            Self::InvalidEffectiveRange { from, to } => {
                write!(f, "Effective range ends ({to}) before it starts ({from})")
            }
            Self::InvalidScope(msg) => write!(f, "Invalid scope: {msg}"),
            Self::ScopeTypeMismatch { id, expected } => {
                write!(f, "'{id}' is not a valid {expected} scope target")
            }
            Self::InvalidRole(role) => write!(f, "Invalid role: '{role}'"),
            Self::InvalidScopeType(value) => write!(f, "Invalid scope type: '{value}'"),
            Self::InvalidUnitType(value) => write!(f, "Invalid unit type: '{value}'"),
            Self::DuplicateRoleDefinition(role) => {
                write!(f, "Role '{role}' is defined more than once")
            }
            Self::DuplicatePolicy(role) => {
                write!(f, "Role '{role}' has more than one delegation policy")
            }
            Self::InconsistentPolicy { delegator, role } => {
                write!(
                    f,
                    "Delegation policy for '{delegator}' waives approval for sensitive role '{role}'"
                )
            }
            Self::MultipleActiveAssignments { user_id, count } => {
                write!(
                    f,
                    "User '{user_id}' has {count} active role assignments; exactly one is allowed"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
