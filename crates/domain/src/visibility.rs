// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Record visibility by jurisdiction.

use crate::jurisdiction::JurisdictionTree;
use crate::role::Permission;
use crate::types::{CenterId, JurisdictionRef, Scope, UnitId};
use serde::{Deserialize, Serialize};

/// The kinds of records gated by scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// A vehicle inspection.
    Inspection,
    /// A complaint or enforcement case.
    Case,
    /// A fee payment.
    Payment,
}

impl RecordKind {
    /// The permission a role needs to see records of this kind at all.
    #[must_use]
    pub const fn required_permission(self) -> Permission {
        match self {
            Self::Inspection => Permission::ViewInspections,
            Self::Case => Permission::ViewCases,
            Self::Payment => Permission::ViewFinancials,
        }
    }
}

/// A record that belongs to a place in the jurisdiction.
pub trait ScopedRecord {
    /// The kind of record.
    fn kind(&self) -> RecordKind;

    /// Where the record belongs, if known.
    fn jurisdiction(&self) -> Option<JurisdictionRef>;
}

/// A minimal scoped record reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    /// Record identifier.
    pub id: String,
    /// Record kind.
    pub kind: RecordKind,
    /// Owning admin unit, if recorded.
    #[serde(default)]
    pub admin_unit_id: Option<UnitId>,
    /// Owning center, if recorded. Takes precedence over the unit.
    #[serde(default)]
    pub center_id: Option<CenterId>,
}

impl ScopedRecord for RecordRef {
    fn kind(&self) -> RecordKind {
        self.kind
    }

    fn jurisdiction(&self) -> Option<JurisdictionRef> {
        self.center_id
            .clone()
            .map(JurisdictionRef::Center)
            .or_else(|| self.admin_unit_id.clone().map(JurisdictionRef::Unit))
    }
}

/// Decides which records a scope may see.
#[derive(Debug, Clone, Copy)]
pub struct RecordScopeFilter<'a> {
    tree: &'a JurisdictionTree,
}

impl<'a> RecordScopeFilter<'a> {
    /// Creates a filter over the given jurisdiction.
    #[must_use]
    pub const fn new(tree: &'a JurisdictionTree) -> Self {
        Self { tree }
    }

    /// Returns true if `record` is visible within `scope`.
    ///
    /// National scope sees everything. Otherwise the record's owning unit
    /// (or its center's owning unit) must lie inside the scope. A record
    /// without a known jurisdiction is only visible nationally.
    #[must_use]
    pub fn visible<R: ScopedRecord + ?Sized>(&self, record: &R, scope: &Scope) -> bool {
        if scope.is_national() {
            return true;
        }
        record
            .jurisdiction()
            .is_some_and(|location| self.tree.scope_contains(scope, &location))
    }

    /// Returns the visible records, preserving order.
    #[must_use]
    pub fn filter_visible<'r, R: ScopedRecord>(&self, records: &'r [R], scope: &Scope) -> Vec<&'r R> {
        records
            .iter()
            .filter(|record| self.visible(*record, scope))
            .collect()
    }
}
