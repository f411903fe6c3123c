// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::role::{RoleCatalog, RoleId};
use crate::types::ScopeType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What a holder of `delegator_role` may grant to others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationPolicy {
    /// The role this policy applies to.
    pub delegator_role: RoleId,
    /// Roles the delegator may assign.
    pub allowed_roles_to_assign: BTreeSet<RoleId>,
    /// The broadest scope level the delegator may assign.
    pub max_scope_level_assignable: ScopeType,
    /// Sensitive assignments made under this policy need approval.
    pub requires_approval_for_sensitive_assignments: bool,
}

impl DelegationPolicy {
    /// Creates a policy.
    #[must_use]
    pub fn new(
        delegator_role: RoleId,
        allowed_roles_to_assign: &[RoleId],
        max_scope_level_assignable: ScopeType,
        requires_approval_for_sensitive_assignments: bool,
    ) -> Self {
        Self {
            delegator_role,
            allowed_roles_to_assign: allowed_roles_to_assign.iter().copied().collect(),
            max_scope_level_assignable,
            requires_approval_for_sensitive_assignments,
        }
    }

    /// Returns true if the policy lists `role`.
    #[must_use]
    pub fn allows_role(&self, role: RoleId) -> bool {
        self.allowed_roles_to_assign.contains(&role)
    }

    /// Returns true if `scope_type` is no broader than the policy's bound.
    #[must_use]
    pub const fn allows_scope_level(&self, scope_type: ScopeType) -> bool {
        !scope_type.is_broader_than(self.max_scope_level_assignable)
    }
}

/// Read-only store of delegation policies keyed by delegator role.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DelegationPolicyStore {
    policies: BTreeMap<RoleId, DelegationPolicy>,
}

impl DelegationPolicyStore {
    /// Creates a store, checking each policy against the role catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a delegator role has more than one policy
    /// - a policy waives approval for sensitive assignments while listing a
    ///   sensitive role
    pub fn new(
        policies: Vec<DelegationPolicy>,
        catalog: &RoleCatalog,
    ) -> Result<Self, DomainError> {
        let mut by_role: BTreeMap<RoleId, DelegationPolicy> = BTreeMap::new();
        for policy in policies {
            if !policy.requires_approval_for_sensitive_assignments
                && let Some(sensitive) = policy.allowed_roles_to_assign.iter().find(|role| {
                    catalog
                        .get(**role)
                        .is_none_or(|definition| definition.is_sensitive)
                })
            {
                return Err(DomainError::InconsistentPolicy {
                    delegator: policy.delegator_role,
                    role: *sensitive,
                });
            }

            let delegator: RoleId = policy.delegator_role;
            if by_role.insert(delegator, policy).is_some() {
                return Err(DomainError::DuplicatePolicy(delegator));
            }
        }
        Ok(Self { policies: by_role })
    }

    /// The standard delegation policies of the inspection portal.
    ///
    /// The top-level role has no policy; it is never constrained by one.
    #[must_use]
    pub fn standard() -> Self {
        let policies: BTreeMap<RoleId, DelegationPolicy> = [
            DelegationPolicy::new(
                RoleId::NationalAdmin,
                &[
                    RoleId::RegionalAdmin,
                    RoleId::ZoneAdmin,
                    RoleId::CenterManager,
                    RoleId::Inspector,
                    RoleId::CaseOfficer,
                    RoleId::FinanceOfficer,
                ],
                ScopeType::Region,
                true,
            ),
            DelegationPolicy::new(
                RoleId::RegionalAdmin,
                &[
                    RoleId::ZoneAdmin,
                    RoleId::CenterManager,
                    RoleId::Inspector,
                    RoleId::CaseOfficer,
                ],
                ScopeType::Region,
                true,
            ),
            DelegationPolicy::new(
                RoleId::ZoneAdmin,
                &[RoleId::CenterManager, RoleId::Inspector],
                ScopeType::SubCity,
                true,
            ),
            DelegationPolicy::new(
                RoleId::CenterManager,
                &[RoleId::Inspector],
                ScopeType::Center,
                false,
            ),
        ]
        .into_iter()
        .map(|policy| (policy.delegator_role, policy))
        .collect();

        Self { policies }
    }

    /// Looks up the policy of a delegator role.
    #[must_use]
    pub fn get(&self, delegator: RoleId) -> Option<&DelegationPolicy> {
        self.policies.get(&delegator)
    }

    /// Returns all policies ordered by delegator role.
    pub fn iter(&self) -> impl Iterator<Item = &DelegationPolicy> {
        self.policies.values()
    }
}
