// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use time::Date;
use vigov_audit::{Actor, AuditEvent, StateSnapshot};
use vigov_domain::{
    ActorContext, AdminUnit, ApprovalStatus, AssignmentStatus, DelegationPolicyStore,
    DomainError, InspectionCenter, JurisdictionTree, RecordRef, RecordScopeFilter, RoleAssignment,
    RoleCatalog, RoleId, Scope, ScopeAuthorizer, UnitAssignment, UserId, active_assignment,
    units_without_owner, validate_effective_range, validate_scope_targets,
};

/// The user a command is applied on behalf of, with the role and scope of
/// their single active assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingUser {
    /// The user.
    pub user_id: UserId,
    /// The role the user currently holds.
    pub role: RoleId,
    /// The scope the role applies to.
    pub scope: Scope,
}

impl ActingUser {
    /// Creates a new acting user.
    #[must_use]
    pub const fn new(user_id: UserId, role: RoleId, scope: Scope) -> Self {
        Self {
            user_id,
            role,
            scope,
        }
    }

    /// Returns the role and scope used for authorization decisions.
    #[must_use]
    pub fn context(&self) -> ActorContext {
        ActorContext::new(self.role, self.scope.clone())
    }

    /// Converts this user into an audit actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.user_id.to_string(), self.role.as_str().to_string())
    }
}

/// Serializable form of the governance state.
///
/// The role catalog and delegation policies are built in and are not part
/// of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceSnapshot {
    /// Administrative units.
    #[serde(default)]
    pub units: Vec<AdminUnit>,
    /// Inspection centers.
    #[serde(default)]
    pub centers: Vec<InspectionCenter>,
    /// Role assignments.
    #[serde(default)]
    pub assignments: Vec<RoleAssignment>,
    /// Institution designations per unit.
    #[serde(default)]
    pub unit_assignments: Vec<UnitAssignment>,
    /// Scoped records (inspections, cases, payments).
    #[serde(default)]
    pub records: Vec<RecordRef>,
}

/// The complete governance state.
///
/// A `GovernanceState` is only obtainable in a validated form: an empty
/// state, a checked snapshot, or the result of a successful transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceState {
    pub(crate) tree: JurisdictionTree,
    pub(crate) catalog: RoleCatalog,
    pub(crate) policies: DelegationPolicyStore,
    pub(crate) assignments: Vec<RoleAssignment>,
    pub(crate) unit_assignments: Vec<UnitAssignment>,
    pub(crate) records: Vec<RecordRef>,
    pub(crate) next_assignment_id: u64,
}

impl GovernanceState {
    /// Creates an empty state with the standard role catalog and delegation
    /// policies.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policies(RoleCatalog::standard(), DelegationPolicyStore::standard())
    }

    /// Creates an empty state with the given catalog and policies.
    #[must_use]
    pub fn with_policies(catalog: RoleCatalog, policies: DelegationPolicyStore) -> Self {
        Self {
            tree: JurisdictionTree::default(),
            catalog,
            policies,
            assignments: Vec::new(),
            unit_assignments: Vec::new(),
            records: Vec::new(),
            next_assignment_id: 1,
        }
    }

    /// Loads a snapshot with the standard catalog and policies.
    ///
    /// # Errors
    ///
    /// See [`Self::from_snapshot_with`].
    pub fn from_snapshot(snapshot: GovernanceSnapshot) -> Result<Self, CoreError> {
        Self::from_snapshot_with(
            snapshot,
            RoleCatalog::standard(),
            DelegationPolicyStore::standard(),
        )
    }

    /// Loads and checks a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a unit or center id is duplicated
    /// - the hierarchy has a cycle, an orphan, or a depth violation
    /// - a center, assignment scope or designation names an unknown unit or center
    /// - an assignment id is duplicated or an effective range is reversed
    /// - a user holds active assignments whose effective windows overlap
    pub fn from_snapshot_with(
        snapshot: GovernanceSnapshot,
        catalog: RoleCatalog,
        policies: DelegationPolicyStore,
    ) -> Result<Self, CoreError> {
        let tree: JurisdictionTree = JurisdictionTree::new(snapshot.units, snapshot.centers)?;
        tree.validate()?;

        let mut seen: BTreeSet<u64> = BTreeSet::new();
        let mut active_per_user: BTreeMap<&UserId, Vec<&RoleAssignment>> = BTreeMap::new();
        for assignment in &snapshot.assignments {
            if !seen.insert(assignment.assignment_id) {
                return Err(CoreError::DuplicateAssignment(assignment.assignment_id));
            }
            validate_scope_targets(&tree, &assignment.scope)?;
            validate_effective_range(assignment.effective_from, assignment.effective_to)?;
            if assignment.status == AssignmentStatus::Active {
                active_per_user
                    .entry(&assignment.user_id)
                    .or_default()
                    .push(assignment);
            }
        }
        for (user_id, mut active) in active_per_user {
            active.sort_by_key(|a| a.effective_from);
            let overlapping: bool = active.windows(2).any(|pair| {
                pair[0]
                    .effective_to
                    .is_none_or(|to| to >= pair[1].effective_from)
            });
            if overlapping {
                return Err(DomainError::MultipleActiveAssignments {
                    user_id: user_id.to_string(),
                    count: active.len(),
                }
                .into());
            }
        }

        for designation in &snapshot.unit_assignments {
            if tree.unit(&designation.unit_id).is_none() {
                return Err(DomainError::UnitNotFound(designation.unit_id.to_string()).into());
            }
        }

        let next_assignment_id: u64 = seen.last().map_or(1, |max| max + 1);

        Ok(Self {
            tree,
            catalog,
            policies,
            assignments: snapshot.assignments,
            unit_assignments: snapshot.unit_assignments,
            records: snapshot.records,
            next_assignment_id,
        })
    }

    /// Converts the state back into its serializable form.
    #[must_use]
    pub fn to_snapshot(&self) -> GovernanceSnapshot {
        GovernanceSnapshot {
            units: self.tree.units().cloned().collect(),
            centers: self.tree.centers().cloned().collect(),
            assignments: self.assignments.clone(),
            unit_assignments: self.unit_assignments.clone(),
            records: self.records.clone(),
        }
    }

    /// Summarizes the state for audit purposes.
    #[must_use]
    pub fn to_audit_snapshot(&self) -> StateSnapshot {
        let active: usize = self
            .assignments
            .iter()
            .filter(|a| a.status == AssignmentStatus::Active)
            .count();
        let pending: usize = self
            .assignments
            .iter()
            .filter(|a| a.approval_status == ApprovalStatus::Pending)
            .count();
        StateSnapshot::new(format!(
            "units={},centers={},assignments={},active={},pending={},designations={}",
            self.tree.units().count(),
            self.tree.centers().count(),
            self.assignments.len(),
            active,
            pending,
            self.unit_assignments.len()
        ))
    }

    /// The jurisdiction tree.
    #[must_use]
    pub const fn tree(&self) -> &JurisdictionTree {
        &self.tree
    }

    /// The role catalog.
    #[must_use]
    pub const fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// The delegation policies.
    #[must_use]
    pub const fn policies(&self) -> &DelegationPolicyStore {
        &self.policies
    }

    /// All role assignments, in creation order.
    #[must_use]
    pub fn assignments(&self) -> &[RoleAssignment] {
        &self.assignments
    }

    /// Looks up a role assignment.
    #[must_use]
    pub fn assignment(&self, assignment_id: u64) -> Option<&RoleAssignment> {
        self.assignments
            .iter()
            .find(|a| a.assignment_id == assignment_id)
    }

    /// All institution designations.
    #[must_use]
    pub fn unit_assignments(&self) -> &[UnitAssignment] {
        &self.unit_assignments
    }

    /// All scoped records.
    #[must_use]
    pub fn records(&self) -> &[RecordRef] {
        &self.records
    }

    /// A scope authorizer over this state.
    #[must_use]
    pub const fn authorizer(&self) -> ScopeAuthorizer<'_> {
        ScopeAuthorizer::new(&self.tree, &self.catalog, &self.policies)
    }

    /// A record filter over this state.
    #[must_use]
    pub const fn record_filter(&self) -> RecordScopeFilter<'_> {
        RecordScopeFilter::new(&self.tree)
    }

    /// Resolves the single active assignment of `user_id` on `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the user has more than one active assignment.
    pub fn active_assignment(
        &self,
        user_id: &UserId,
        date: Date,
    ) -> Result<Option<&RoleAssignment>, DomainError> {
        active_assignment(&self.assignments, user_id, date)
    }

    /// Units with no active owner designation, in supply order.
    #[must_use]
    pub fn units_without_owner(&self) -> Vec<AdminUnit> {
        let units: Vec<AdminUnit> = self.tree.units().cloned().collect();
        units_without_owner(&units, &self.unit_assignments)
    }
}

impl Default for GovernanceState {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: GovernanceState,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
