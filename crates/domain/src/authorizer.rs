// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role assignment authorization.
//!
//! [`ScopeAuthorizer::can_assign`] is pure and total: every actor/target
//! pair yields a decision with a reason, and nothing here panics or errors.

use crate::delegation::{DelegationPolicy, DelegationPolicyStore};
use crate::jurisdiction::JurisdictionTree;
use crate::role::{RoleCatalog, RoleId};
use crate::types::{CenterId, JurisdictionRef, Scope, ScopeType, UnitId};
use serde::{Deserialize, Serialize};

/// The role and scope an actor currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// The actor's role.
    pub role: RoleId,
    /// The actor's jurisdiction.
    pub scope: Scope,
}

impl ActorContext {
    /// Creates an actor context.
    #[must_use]
    pub const fn new(role: RoleId, scope: Scope) -> Self {
        Self { role, scope }
    }
}

/// Why an assignment was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DenyReason {
    /// The actor's role has no delegation policy.
    NoDelegationPolicy,
    /// The actor's policy does not list the target role.
    RoleNotDelegable,
    /// National scope can only be granted by the top-level role.
    NationalScopeNotDelegable,
    /// The target scope is broader than the policy allows.
    ScopeLevelNotDelegable,
    /// A target scope id lies outside the actor's jurisdiction.
    OutsideJurisdiction,
}

impl DenyReason {
    /// A message suitable for showing to the actor.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoDelegationPolicy => "no delegation policy for your role",
            Self::RoleNotDelegable => "you cannot assign this role",
            Self::NationalScopeNotDelegable => "cannot assign national scope",
            Self::ScopeLevelNotDelegable => "scope level exceeds what your role may delegate",
            Self::OutsideJurisdiction => "scope outside your jurisdiction",
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// The outcome of [`ScopeAuthorizer::can_assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentDecision {
    /// The actor may make the assignment.
    Allow,
    /// The actor may not make the assignment.
    Deny(DenyReason),
}

impl AssignmentDecision {
    /// Returns true for `Allow`.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns the deny reason, if any.
    #[must_use]
    pub const fn reason(self) -> Option<DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(reason),
        }
    }
}

/// A decision together with its approval requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    /// Whether the actor may make the assignment.
    pub decision: AssignmentDecision,
    /// Whether the assignment must be approved before it takes effect.
    pub requires_approval: bool,
}

/// Decides who may assign which role within which scope.
#[derive(Debug, Clone, Copy)]
pub struct ScopeAuthorizer<'a> {
    tree: &'a JurisdictionTree,
    catalog: &'a RoleCatalog,
    policies: &'a DelegationPolicyStore,
}

impl<'a> ScopeAuthorizer<'a> {
    /// Creates an authorizer over the given jurisdiction, catalog and policies.
    #[must_use]
    pub const fn new(
        tree: &'a JurisdictionTree,
        catalog: &'a RoleCatalog,
        policies: &'a DelegationPolicyStore,
    ) -> Self {
        Self {
            tree,
            catalog,
            policies,
        }
    }

    /// Decides whether `actor` may assign `target_role` within `target_scope`.
    ///
    /// Rules are checked in order and the first match wins:
    /// 1. the top-level role is always allowed
    /// 2. no policy for the actor's role denies
    /// 3. a target role the policy does not list denies
    /// 4. a national target scope denies
    /// 5. a target scope broader than the policy's bound denies
    /// 6. a target id outside the actor's jurisdiction denies
    /// 7. otherwise the assignment is allowed
    #[must_use]
    pub fn can_assign(
        &self,
        actor: &ActorContext,
        target_role: RoleId,
        target_scope: &Scope,
    ) -> AssignmentDecision {
        if actor.role.is_top_level() {
            return AssignmentDecision::Allow;
        }

        let Some(policy) = self.policies.get(actor.role) else {
            return AssignmentDecision::Deny(DenyReason::NoDelegationPolicy);
        };

        if !policy.allows_role(target_role) {
            return AssignmentDecision::Deny(DenyReason::RoleNotDelegable);
        }

        if target_scope.is_national() {
            return AssignmentDecision::Deny(DenyReason::NationalScopeNotDelegable);
        }

        if !policy.allows_scope_level(target_scope.scope_type()) {
            return AssignmentDecision::Deny(DenyReason::ScopeLevelNotDelegable);
        }

        if !self.within_jurisdiction(&actor.scope, target_scope) {
            return AssignmentDecision::Deny(DenyReason::OutsideJurisdiction);
        }

        AssignmentDecision::Allow
    }

    /// Combines [`Self::can_assign`] with the catalog's approval rule.
    #[must_use]
    pub fn evaluate_assignment(
        &self,
        actor: &ActorContext,
        target_role: RoleId,
        target_scope: &Scope,
    ) -> AssignmentOutcome {
        AssignmentOutcome {
            decision: self.can_assign(actor, target_role, target_scope),
            requires_approval: self
                .catalog
                .requires_approval(target_role, target_scope.scope_type()),
        }
    }

    /// Returns the roles `actor` could assign somewhere, ignoring scope.
    #[must_use]
    pub fn assignable_roles(&self, actor: &ActorContext) -> Vec<RoleId> {
        if actor.role.is_top_level() {
            return RoleId::ALL.to_vec();
        }
        self.policies
            .get(actor.role)
            .map(|policy: &DelegationPolicy| policy.allowed_roles_to_assign.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Every target id must lie inside the actor's scope.
    fn within_jurisdiction(&self, actor_scope: &Scope, target_scope: &Scope) -> bool {
        if actor_scope.is_national() {
            return true;
        }

        target_scope.ids().iter().all(|id| {
            let location: JurisdictionRef = if target_scope.scope_type() == ScopeType::Center {
                JurisdictionRef::Center(CenterId::new(id))
            } else {
                JurisdictionRef::Unit(UnitId::new(id))
            };
            self.tree.scope_contains(actor_scope, &location)
        })
    }
}
