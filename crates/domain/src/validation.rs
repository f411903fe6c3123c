// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::jurisdiction::JurisdictionTree;
use crate::types::{AdminUnit, CenterId, InspectionCenter, Scope, ScopeType, UnitId};
use time::Date;

/// Validates that a unit's basic field constraints are met.
///
/// This function checks that required fields are not empty.
/// It does NOT check the hierarchy (that requires the tree).
///
/// # Errors
///
/// Returns an error if:
/// - the id, English name or code is empty
/// - the effective range ends before it starts
pub fn validate_unit_fields(unit: &AdminUnit) -> Result<(), DomainError> {
    if unit.id.as_str().trim().is_empty() {
        return Err(DomainError::InvalidUnit(String::from(
            "Unit id cannot be empty",
        )));
    }

    if unit.name_en.trim().is_empty() {
        return Err(DomainError::InvalidUnit(String::from(
            "English name cannot be empty",
        )));
    }

    if unit.code.trim().is_empty() {
        return Err(DomainError::InvalidUnit(String::from(
            "Code cannot be empty",
        )));
    }

    validate_effective_range(unit.effective_from, unit.effective_to)
}

/// Validates that a center's basic field constraints are met.
///
/// # Errors
///
/// Returns an error if the id or name is empty.
pub fn validate_center_fields(center: &InspectionCenter) -> Result<(), DomainError> {
    if center.id.as_str().trim().is_empty() {
        return Err(DomainError::InvalidCenter(String::from(
            "Center id cannot be empty",
        )));
    }

    if center.name.trim().is_empty() {
        return Err(DomainError::InvalidCenter(String::from(
            "Name cannot be empty",
        )));
    }

    Ok(())
}

/// Validates that an effective range does not end before it starts.
///
/// # Errors
///
/// Returns an error if `to` is earlier than `from`.
pub fn validate_effective_range(from: Date, to: Option<Date>) -> Result<(), DomainError> {
    match to {
        Some(to) if to < from => Err(DomainError::InvalidEffectiveRange { from, to }),
        _ => Ok(()),
    }
}

/// Validates that every id of a scope names an existing entity of the
/// scope's level.
///
/// # Errors
///
/// Returns an error if:
/// - a center id is unknown
/// - a unit id is unknown
/// - a unit is not of the level the scope type addresses
pub fn validate_scope_targets(tree: &JurisdictionTree, scope: &Scope) -> Result<(), DomainError> {
    match scope.scope_type() {
        ScopeType::National => Ok(()),
        ScopeType::Center => {
            for id in scope.ids() {
                if tree.center(&CenterId::new(id)).is_none() {
                    return Err(DomainError::CenterNotFound(id.clone()));
                }
            }
            Ok(())
        }
        expected => {
            for id in scope.ids() {
                let unit: &AdminUnit = tree
                    .unit(&UnitId::new(id))
                    .ok_or_else(|| DomainError::UnitNotFound(id.clone()))?;
                if unit.unit_type.scope_type() != Some(expected) {
                    return Err(DomainError::ScopeTypeMismatch {
                        id: id.clone(),
                        expected,
                    });
                }
            }
            Ok(())
        }
    }
}
