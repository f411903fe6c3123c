// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::Date;

/// Identifier of an administrative unit (e.g., `AU-OROMIA`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    /// Creates a new `UnitId`.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an inspection center (e.g., `CTR-999`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CenterId(String);

impl CenterId {
    /// Creates a new `CenterId`.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CenterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a portal user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new `UserId`.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The level of an administrative unit in the jurisdiction hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitType {
    /// The single national root.
    National,
    /// A regional state or chartered city.
    Region,
    /// A zone within a region.
    Zone,
    /// A sub-city within a chartered city or zone.
    SubCity,
    /// A woreda (district).
    Woreda,
    /// A grouping of inspection centers.
    CenterCluster,
}

impl UnitType {
    /// Returns the hierarchy depth of this level. The national root is 0.
    ///
    /// A unit's parent must always have a strictly smaller depth.
    #[must_use]
    pub const fn depth(self) -> u8 {
        match self {
            Self::National => 0,
            Self::Region => 1,
            Self::Zone => 2,
            Self::SubCity => 3,
            Self::Woreda => 4,
            Self::CenterCluster => 5,
        }
    }

    /// Returns the scope type that addresses units of this level, if any.
    #[must_use]
    pub const fn scope_type(self) -> Option<ScopeType> {
        match self {
            Self::National => Some(ScopeType::National),
            Self::Region => Some(ScopeType::Region),
            Self::Zone => Some(ScopeType::Zone),
            Self::SubCity => Some(ScopeType::SubCity),
            Self::Woreda => Some(ScopeType::Woreda),
            Self::CenterCluster => None,
        }
    }

    /// Converts this unit type to its string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::National => "National",
            Self::Region => "Region",
            Self::Zone => "Zone",
            Self::SubCity => "SubCity",
            Self::Woreda => "Woreda",
            Self::CenterCluster => "CenterCluster",
        }
    }
}

impl FromStr for UnitType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "National" => Ok(Self::National),
            "Region" => Ok(Self::Region),
            "Zone" => Ok(Self::Zone),
            "SubCity" => Ok(Self::SubCity),
            "Woreda" => Ok(Self::Woreda),
            "CenterCluster" => Ok(Self::CenterCluster),
            _ => Err(DomainError::InvalidUnitType(s.to_string())),
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a unit or center is in service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitStatus {
    /// In service.
    #[default]
    Active,
    /// Retired or suspended.
    Inactive,
}

/// An administrative unit in the jurisdiction hierarchy.
///
/// The jurisdiction path of a unit is not stored here. It is always derived
/// from the live parent chain by [`crate::JurisdictionTree::path`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUnit {
    /// The unit identifier.
    pub id: UnitId,
    /// The hierarchy level.
    pub unit_type: UnitType,
    /// English name.
    pub name_en: String,
    /// Amharic name.
    pub name_am: String,
    /// Short administrative code.
    pub code: String,
    /// The parent unit. `None` only for the national root.
    pub parent_id: Option<UnitId>,
    /// Service status.
    #[serde(default)]
    pub status: UnitStatus,
    /// First day the unit is in effect.
    pub effective_from: Date,
    /// Last day the unit is in effect, if bounded.
    #[serde(default)]
    pub effective_to: Option<Date>,
}

impl AdminUnit {
    /// Creates a new active unit without an end date.
    ///
    /// # Arguments
    ///
    /// * `id` - The unit identifier
    /// * `unit_type` - The hierarchy level
    /// * `name_en` - English name
    /// * `parent_id` - The parent unit, `None` for the national root
    /// * `effective_from` - First day the unit is in effect
    #[must_use]
    pub fn new(
        id: &str,
        unit_type: UnitType,
        name_en: &str,
        parent_id: Option<&str>,
        effective_from: Date,
    ) -> Self {
        Self {
            id: UnitId::new(id),
            unit_type,
            name_en: name_en.to_string(),
            name_am: String::new(),
            code: id.to_string(),
            parent_id: parent_id.map(UnitId::new),
            status: UnitStatus::Active,
            effective_from,
            effective_to: None,
        }
    }
}

/// A vehicle inspection center. Centers are leaves of the jurisdiction tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionCenter {
    /// The center identifier.
    pub id: CenterId,
    /// Display name.
    pub name: String,
    /// The administrative unit that owns this center.
    pub admin_unit_id: UnitId,
    /// Service status.
    #[serde(default)]
    pub status: UnitStatus,
}

impl InspectionCenter {
    /// Creates a new active center.
    #[must_use]
    pub fn new(id: &str, name: &str, admin_unit_id: &str) -> Self {
        Self {
            id: CenterId::new(id),
            name: name.to_string(),
            admin_unit_id: UnitId::new(admin_unit_id),
            status: UnitStatus::Active,
        }
    }
}

/// The kind of jurisdiction a scope addresses.
///
/// Ordering follows depth: `National` is the shallowest, `Center` the deepest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScopeType {
    /// Unrestricted jurisdiction.
    National,
    /// One or more regions.
    Region,
    /// One or more zones.
    Zone,
    /// One or more sub-cities.
    SubCity,
    /// One or more woredas.
    Woreda,
    /// One or more inspection centers.
    Center,
}

impl ScopeType {
    /// Returns the hierarchy depth addressed by this scope type.
    #[must_use]
    pub const fn depth(self) -> u8 {
        match self {
            Self::National => 0,
            Self::Region => 1,
            Self::Zone => 2,
            Self::SubCity => 3,
            Self::Woreda => 4,
            Self::Center => 6,
        }
    }

    /// Returns true if this scope type addresses a shallower level than `other`.
    #[must_use]
    pub const fn is_broader_than(self, other: Self) -> bool {
        self.depth() < other.depth()
    }

    /// Converts this scope type to its string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::National => "National",
            Self::Region => "Region",
            Self::Zone => "Zone",
            Self::SubCity => "SubCity",
            Self::Woreda => "Woreda",
            Self::Center => "Center",
        }
    }
}

impl FromStr for ScopeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "National" => Ok(Self::National),
            "Region" => Ok(Self::Region),
            "Zone" => Ok(Self::Zone),
            "SubCity" => Ok(Self::SubCity),
            "Woreda" => Ok(Self::Woreda),
            "Center" => Ok(Self::Center),
            _ => Err(DomainError::InvalidScopeType(s.to_string())),
        }
    }
}

impl std::fmt::Display for ScopeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Wire form of a scope, validated into [`Scope`] on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScopeRepr {
    scope_type: ScopeType,
    #[serde(default)]
    ids: BTreeSet<String>,
}

/// A jurisdictional boundary: a scope type plus the concrete ids it covers.
///
/// A `National` scope always has an empty id set. Every other scope type
/// covers at least one id. Center scopes hold center ids; all other scopes
/// hold admin unit ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ScopeRepr", into = "ScopeRepr")]
pub struct Scope {
    scope_type: ScopeType,
    ids: BTreeSet<String>,
}

impl Scope {
    /// Creates the unrestricted national scope.
    #[must_use]
    pub const fn national() -> Self {
        Self {
            scope_type: ScopeType::National,
            ids: BTreeSet::new(),
        }
    }

    /// Creates a scope of the given type covering `ids`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the type is `National` and `ids` is non-empty
    /// - the type is not `National` and `ids` is empty
    /// - any id is blank
    pub fn new<I, S>(scope_type: ScopeType, ids: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: BTreeSet<String> = ids.into_iter().map(Into::into).collect();

        if ids.iter().any(|id| id.trim().is_empty()) {
            return Err(DomainError::InvalidScope(String::from(
                "Scope ids cannot be blank",
            )));
        }

        match scope_type {
            ScopeType::National if !ids.is_empty() => Err(DomainError::InvalidScope(
                String::from("National scope cannot list ids"),
            )),
            ScopeType::National => Ok(Self::national()),
            _ if ids.is_empty() => Err(DomainError::InvalidScope(format!(
                "{scope_type} scope requires at least one id"
            ))),
            _ => Ok(Self { scope_type, ids }),
        }
    }

    /// Returns the scope type.
    #[must_use]
    pub const fn scope_type(&self) -> ScopeType {
        self.scope_type
    }

    /// Returns the ids covered by this scope.
    #[must_use]
    pub const fn ids(&self) -> &BTreeSet<String> {
        &self.ids
    }

    /// Returns true if this is the unrestricted national scope.
    #[must_use]
    pub fn is_national(&self) -> bool {
        self.scope_type == ScopeType::National
    }
}

impl TryFrom<ScopeRepr> for Scope {
    type Error = DomainError;

    fn try_from(repr: ScopeRepr) -> Result<Self, Self::Error> {
        Self::new(repr.scope_type, repr.ids)
    }
}

impl From<Scope> for ScopeRepr {
    fn from(scope: Scope) -> Self {
        Self {
            scope_type: scope.scope_type,
            ids: scope.ids,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ids.is_empty() {
            write!(f, "{}", self.scope_type)
        } else {
            let ids: Vec<&str> = self.ids.iter().map(String::as_str).collect();
            write!(f, "{}[{}]", self.scope_type, ids.join(","))
        }
    }
}

/// A reference to a place in the jurisdiction: an admin unit or a center.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JurisdictionRef {
    /// An administrative unit.
    Unit(UnitId),
    /// An inspection center.
    Center(CenterId),
}

impl std::fmt::Display for JurisdictionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unit(id) => write!(f, "unit:{id}"),
            Self::Center(id) => write!(f, "center:{id}"),
        }
    }
}
