// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use vigov::{CoreError, RepositoryError};
use vigov_domain::{DenyReason, DomainError, Permission};

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller could not be resolved to a single active assignment.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller's role lacks a permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The permission required for this action.
        required_permission: Permission,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_permission,
            } => {
                write!(
                    f,
                    "Unauthorized: '{action}' requires the {required_permission:?} permission"
                )
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor's role lacks the permission for this action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The permission required for this action.
        required_permission: Permission,
    },
    /// The actor's role or scope does not allow this change.
    Denied {
        /// The policy reason.
        reason: DenyReason,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request conflicts with the current state.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_permission,
            } => {
                write!(
                    f,
                    "Unauthorized: '{action}' requires the {required_permission:?} permission"
                )
            }
            Self::Denied { reason } => write!(f, "Denied: {reason}"),
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_permission,
            } => Self::Unauthorized {
                action,
                required_permission,
            },
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::StaleRevision { .. } => Self::Conflict {
                message: err.to_string(),
            },
            RepositoryError::EventNotFound(id) => Self::ResourceNotFound {
                resource_type: String::from("Audit event"),
                message: format!("Audit event {id} does not exist"),
            },
        }
    }
}

fn rule(rule: &str, err: &DomainError) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: rule.to_string(),
        message: err.to_string(),
    }
}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::UnitNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Administrative unit"),
            message: format!("Administrative unit '{id}' does not exist"),
        },
        DomainError::CenterNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Inspection center"),
            message: format!("Inspection center '{id}' does not exist"),
        },
        DomainError::DuplicateUnit(_) | DomainError::DuplicateCenter(_) => ApiError::Conflict {
            message: err.to_string(),
        },
        DomainError::CycleDetected { .. } => rule("acyclic_hierarchy", &err),
        DomainError::OrphanedUnit { .. } | DomainError::MissingParent { .. } => {
            rule("parent_exists", &err)
        }
        DomainError::InvalidParentType { .. } => rule("depth_decreases_upward", &err),
        DomainError::MultipleActiveAssignments { .. } => rule("single_active_assignment", &err),
        DomainError::InvalidUnit(_) => invalid("unit", &err),
        DomainError::InvalidCenter(_) => invalid("center", &err),
        DomainError::InvalidEffectiveRange { .. } => invalid("effective_to", &err),
        DomainError::InvalidScope(_) | DomainError::ScopeTypeMismatch { .. } => {
            invalid("scope", &err)
        }
        DomainError::InvalidRole(_) => invalid("role", &err),
        DomainError::InvalidScopeType(_) => invalid("scope_type", &err),
        DomainError::InvalidUnitType(_) => invalid("unit_type", &err),
        DomainError::DuplicateRoleDefinition(_)
        | DomainError::DuplicatePolicy(_)
        | DomainError::InconsistentPolicy { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Denied(reason) => ApiError::Denied { reason },
        CoreError::AssignmentNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Role assignment"),
            message: format!("Role assignment {id} does not exist"),
        },
        CoreError::DuplicateAssignment(_) => ApiError::DomainRuleViolation {
            rule: String::from("unique_assignment_id"),
            message: err.to_string(),
        },
        CoreError::InvalidAssignmentState { .. } => ApiError::Conflict {
            message: err.to_string(),
        },
        CoreError::SelfApproval { .. } => ApiError::DomainRuleViolation {
            rule: String::from("two_person_approval"),
            message: err.to_string(),
        },
    }
}
