// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The jurisdiction tree: administrative units, their parent chain, and the
//! inspection centers hanging off them.
//!
//! Every walk up the parent chain keeps a visited set, so a corrupt snapshot
//! containing a cycle produces `CycleDetected` instead of looping.

use crate::assignment::{UnitAssignment, UnitAssignmentType};
use crate::error::DomainError;
use crate::types::{
    AdminUnit, CenterId, InspectionCenter, JurisdictionRef, Scope, ScopeType, UnitId, UnitStatus,
    UnitType,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Separator used when materializing jurisdiction paths.
pub const PATH_SEPARATOR: &str = " > ";

/// A node of the materialized jurisdiction forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    /// The unit at this node.
    pub unit: AdminUnit,
    /// Centers owned directly by this unit.
    pub centers: Vec<InspectionCenter>,
    /// Child units.
    pub children: Vec<TreeNode>,
}

/// Indexed view over administrative units and inspection centers.
///
/// Construction only indexes the data. Structural problems (orphans,
/// cycles, depth violations) are reported by [`JurisdictionTree::validate`]
/// and by the individual walks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JurisdictionTree {
    units: BTreeMap<UnitId, AdminUnit>,
    centers: BTreeMap<CenterId, InspectionCenter>,
    /// Unit ids in the order they were supplied.
    order: Vec<UnitId>,
}

impl JurisdictionTree {
    /// Indexes the given units and centers.
    ///
    /// # Errors
    ///
    /// Returns an error if a unit id or center id appears more than once.
    pub fn new(
        units: Vec<AdminUnit>,
        centers: Vec<InspectionCenter>,
    ) -> Result<Self, DomainError> {
        let mut tree: Self = Self::default();
        for unit in units {
            tree.insert_unit(unit)?;
        }
        for center in centers {
            tree.insert_center(center)?;
        }
        Ok(tree)
    }

    fn insert_unit(&mut self, unit: AdminUnit) -> Result<(), DomainError> {
        if self.units.contains_key(&unit.id) {
            return Err(DomainError::DuplicateUnit(unit.id.to_string()));
        }
        self.order.push(unit.id.clone());
        self.units.insert(unit.id.clone(), unit);
        Ok(())
    }

    fn insert_center(&mut self, center: InspectionCenter) -> Result<(), DomainError> {
        if self.centers.contains_key(&center.id) {
            return Err(DomainError::DuplicateCenter(center.id.to_string()));
        }
        self.centers.insert(center.id.clone(), center);
        Ok(())
    }

    /// Returns a copy of this tree with `unit` inserted or replaced.
    ///
    /// The caller is expected to have run [`Self::validate_hierarchy`] on
    /// `unit` first.
    #[must_use]
    pub fn with_unit(&self, unit: AdminUnit) -> Self {
        let mut tree: Self = self.clone();
        if !tree.units.contains_key(&unit.id) {
            tree.order.push(unit.id.clone());
        }
        tree.units.insert(unit.id.clone(), unit);
        tree
    }

    /// Returns a copy of this tree with `center` inserted or replaced.
    #[must_use]
    pub fn with_center(&self, center: InspectionCenter) -> Self {
        let mut tree: Self = self.clone();
        tree.centers.insert(center.id.clone(), center);
        tree
    }

    /// Looks up a unit.
    #[must_use]
    pub fn unit(&self, id: &UnitId) -> Option<&AdminUnit> {
        self.units.get(id)
    }

    /// Looks up a center.
    #[must_use]
    pub fn center(&self, id: &CenterId) -> Option<&InspectionCenter> {
        self.centers.get(id)
    }

    /// Returns all units in the order they were supplied.
    pub fn units(&self) -> impl Iterator<Item = &AdminUnit> {
        self.order.iter().filter_map(|id| self.units.get(id))
    }

    /// Returns all centers ordered by id.
    pub fn centers(&self) -> impl Iterator<Item = &InspectionCenter> {
        self.centers.values()
    }

    /// Returns the direct children of `parent`, in supply order.
    #[must_use]
    pub fn children(&self, parent: &UnitId) -> Vec<&AdminUnit> {
        self.units()
            .filter(|unit| unit.parent_id.as_ref() == Some(parent))
            .collect()
    }

    /// Returns the admin unit that owns a center.
    #[must_use]
    pub fn center_unit(&self, center: &CenterId) -> Option<&UnitId> {
        self.centers.get(center).map(|c| &c.admin_unit_id)
    }

    /// Returns the ancestors of `unit_id`, nearest first, excluding the unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit is unknown, a parent is missing, or the
    /// parent chain contains a cycle.
    pub fn ancestors(&self, unit_id: &UnitId) -> Result<Vec<&AdminUnit>, DomainError> {
        let chain: Vec<&AdminUnit> = self.chain(unit_id)?;
        Ok(chain.into_iter().skip(1).collect())
    }

    /// Walks from `unit_id` to its root, returning the unit first.
    fn chain(&self, unit_id: &UnitId) -> Result<Vec<&AdminUnit>, DomainError> {
        let start: &AdminUnit = self
            .units
            .get(unit_id)
            .ok_or_else(|| DomainError::UnitNotFound(unit_id.to_string()))?;

        let mut visited: BTreeSet<&UnitId> = BTreeSet::new();
        let mut chain: Vec<&AdminUnit> = Vec::new();
        let mut current: &AdminUnit = start;

        loop {
            if !visited.insert(&current.id) {
                return Err(DomainError::CycleDetected {
                    unit_id: unit_id.to_string(),
                    chain: chain.iter().map(|u| u.id.to_string()).collect(),
                });
            }
            chain.push(current);

            let Some(parent_id) = &current.parent_id else {
                return Ok(chain);
            };
            current = self
                .units
                .get(parent_id)
                .ok_or_else(|| DomainError::OrphanedUnit {
                    unit_id: current.id.to_string(),
                    missing_parent: parent_id.to_string(),
                })?;
        }
    }

    /// Materializes the jurisdiction path of a unit, e.g.
    /// `"National > Oromia > East Shewa Zone"`.
    ///
    /// The path is recomputed from the live parent chain on every call.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit is unknown, a parent is missing, or the
    /// parent chain contains a cycle.
    pub fn path(&self, unit_id: &UnitId) -> Result<String, DomainError> {
        let chain: Vec<&AdminUnit> = self.chain(unit_id)?;
        let names: Vec<&str> = chain.iter().rev().map(|u| u.name_en.as_str()).collect();
        Ok(names.join(PATH_SEPARATOR))
    }

    /// Returns true if `unit_id` is `ancestor` or lies in its subtree.
    ///
    /// Unknown units, dangling parents and cycles all answer `false`.
    #[must_use]
    pub fn is_descendant_of(&self, unit_id: &UnitId, ancestor: &UnitId) -> bool {
        let mut visited: BTreeSet<&UnitId> = BTreeSet::new();
        let mut current: Option<&UnitId> = self.units.get(unit_id).map(|u| &u.id);

        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if !visited.insert(id) {
                return false;
            }
            current = self
                .units
                .get(id)
                .and_then(|u| u.parent_id.as_ref())
                .and_then(|parent| self.units.get(parent))
                .map(|u| &u.id);
        }
        false
    }

    /// Resolves a jurisdiction reference to its owning admin unit.
    #[must_use]
    pub fn owning_unit<'a>(&'a self, location: &'a JurisdictionRef) -> Option<&'a UnitId> {
        match location {
            JurisdictionRef::Unit(id) => self.units.get(id).map(|u| &u.id),
            JurisdictionRef::Center(id) => self.center_unit(id),
        }
    }

    /// Decides whether `location` falls inside `scope`.
    ///
    /// - National scopes contain everything.
    /// - Center scopes contain exactly the listed centers.
    /// - Unit scopes contain every unit in the listed subtrees and every
    ///   center owned by such a unit.
    #[must_use]
    pub fn scope_contains(&self, scope: &Scope, location: &JurisdictionRef) -> bool {
        match scope.scope_type() {
            ScopeType::National => true,
            ScopeType::Center => match location {
                JurisdictionRef::Center(center) => {
                    self.centers.contains_key(center) && scope.ids().contains(center.as_str())
                }
                JurisdictionRef::Unit(_) => false,
            },
            _ => self.owning_unit(location).is_some_and(|unit_id| {
                scope
                    .ids()
                    .iter()
                    .any(|root| self.is_descendant_of(unit_id, &UnitId::new(root)))
            }),
        }
    }

    /// Validates that `candidate` may be written into this tree.
    ///
    /// The candidate replaces any existing unit with the same id for the
    /// purpose of the walk. The parent chain is walked with a visited set;
    /// revisiting a unit yields `CycleDetected`. Afterwards each edge of the
    /// chain must step to a strictly shallower level.
    ///
    /// This must run before any create or edit that changes a parent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the parent chain contains a cycle
    /// - a parent along the chain does not exist
    /// - a non-national unit has no parent, or a national unit has one
    /// - a parent is not strictly shallower than its child
    pub fn validate_hierarchy(&self, candidate: &AdminUnit) -> Result<(), DomainError> {
        let mut visited: BTreeSet<&UnitId> = BTreeSet::new();
        let mut chain: Vec<&AdminUnit> = Vec::new();
        let mut current: &AdminUnit = candidate;

        loop {
            if !visited.insert(&current.id) {
                return Err(DomainError::CycleDetected {
                    unit_id: candidate.id.to_string(),
                    chain: chain.iter().map(|u| u.id.to_string()).collect(),
                });
            }
            chain.push(current);

            let Some(parent_id) = &current.parent_id else {
                break;
            };
            current = self
                .lookup_with(candidate, parent_id)
                .ok_or_else(|| DomainError::OrphanedUnit {
                    unit_id: current.id.to_string(),
                    missing_parent: parent_id.to_string(),
                })?;
        }

        match (candidate.unit_type, &candidate.parent_id) {
            (UnitType::National, Some(parent_id)) => {
                let parent_type: UnitType = self
                    .lookup_with(candidate, parent_id)
                    .map_or(candidate.unit_type, |p| p.unit_type);
                return Err(DomainError::InvalidParentType {
                    unit_id: candidate.id.to_string(),
                    unit_type: candidate.unit_type,
                    parent_id: parent_id.to_string(),
                    parent_type,
                });
            }
            (unit_type, None) if unit_type != UnitType::National => {
                return Err(DomainError::MissingParent {
                    unit_id: candidate.id.to_string(),
                    unit_type,
                });
            }
            _ => {}
        }

        for pair in chain.windows(2) {
            let (child, parent) = (pair[0], pair[1]);
            if parent.unit_type.depth() >= child.unit_type.depth() {
                return Err(DomainError::InvalidParentType {
                    unit_id: child.id.to_string(),
                    unit_type: child.unit_type,
                    parent_id: parent.id.to_string(),
                    parent_type: parent.unit_type,
                });
            }
        }

        Ok(())
    }

    /// Looks up `id`, substituting `candidate` for the unit it replaces.
    fn lookup_with<'a>(&'a self, candidate: &'a AdminUnit, id: &UnitId) -> Option<&'a AdminUnit> {
        if *id == candidate.id {
            Some(candidate)
        } else {
            self.units.get(id)
        }
    }

    /// Validates every unit and center in the tree.
    ///
    /// # Errors
    ///
    /// Returns the first structural error found, in supply order.
    pub fn validate(&self) -> Result<(), DomainError> {
        for unit in self.units() {
            self.validate_hierarchy(unit)?;
        }
        for center in self.centers.values() {
            if !self.units.contains_key(&center.admin_unit_id) {
                return Err(DomainError::UnitNotFound(center.admin_unit_id.to_string()));
            }
        }
        Ok(())
    }

    /// Groups units by parent into a forest rooted at parentless units.
    ///
    /// A unit whose parent is missing is reported as `OrphanedUnit` rather
    /// than promoted to an extra root.
    ///
    /// # Errors
    ///
    /// Returns an error if a unit references a missing parent, or if some
    /// units are unreachable from any root (which only happens on a cycle).
    pub fn build_forest(&self) -> Result<Vec<TreeNode>, DomainError> {
        let orphan: Option<(&AdminUnit, &UnitId)> = self.units().find_map(|unit| {
            unit.parent_id
                .as_ref()
                .filter(|parent_id| !self.units.contains_key(*parent_id))
                .map(|parent_id| (unit, parent_id))
        });
        if let Some((unit, parent_id)) = orphan {
            return Err(DomainError::OrphanedUnit {
                unit_id: unit.id.to_string(),
                missing_parent: parent_id.to_string(),
            });
        }

        let mut placed: usize = 0;
        let forest: Vec<TreeNode> = self
            .units()
            .filter(|unit| unit.parent_id.is_none())
            .map(|root| self.build_node(root, &mut placed))
            .collect();

        // Units unreachable from a root sit on a parent cycle.
        if placed != self.units.len()
            && let Some(err) = self.units().find_map(|unit| self.chain(&unit.id).err())
        {
            return Err(err);
        }

        Ok(forest)
    }

    fn build_node(&self, unit: &AdminUnit, placed: &mut usize) -> TreeNode {
        *placed += 1;
        TreeNode {
            unit: unit.clone(),
            centers: self
                .centers
                .values()
                .filter(|center| center.admin_unit_id == unit.id)
                .cloned()
                .collect(),
            children: self
                .children(&unit.id)
                .into_iter()
                .map(|child| self.build_node(child, placed))
                .collect(),
        }
    }
}

/// Returns the units that have no active owner designation, in input order.
///
/// Used for governance completeness reporting.
#[must_use]
pub fn units_without_owner(units: &[AdminUnit], assignments: &[UnitAssignment]) -> Vec<AdminUnit> {
    let owned: BTreeSet<&UnitId> = assignments
        .iter()
        .filter(|a| a.assignment_type == UnitAssignmentType::Owner && a.status == UnitStatus::Active)
        .map(|a| &a.unit_id)
        .collect();

    units
        .iter()
        .filter(|unit| !owned.contains(&unit.id))
        .cloned()
        .collect()
}
