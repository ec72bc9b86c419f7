use crate::{model::PathError, options::ConfigError, query::PlanError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured error with a stable classification.
/// Every failure surfaced by the engine is a configuration problem of the
/// table or an extensibility gap; malformed client input never reaches here.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct Error {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl Error {
    /// Construct an error with no structured detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a store-origin internal error.
    pub fn store_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Store, message)
    }

    /// Construct a query-origin invariant violation.
    pub(crate) fn query_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Query, message)
    }

    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self.class, ErrorClass::Config)
    }

    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.class, ErrorClass::Unsupported)
    }

    /// Borrow the configuration detail, if this error carries one.
    #[must_use]
    pub const fn as_config(&self) -> Option<&ConfigError> {
        match &self.detail {
            Some(ErrorDetail::Config(err)) => Some(err),
            _ => None,
        }
    }

    /// Borrow the path-resolution detail, if this error carries one.
    #[must_use]
    pub const fn as_path(&self) -> Option<&PathError> {
        match &self.detail {
            Some(ErrorDetail::Path(err)) => Some(err),
            _ => None,
        }
    }

    /// Borrow the planner detail, if this error carries one.
    #[must_use]
    pub const fn as_plan(&self) -> Option<&PlanError> {
        match &self.detail {
            Some(ErrorDetail::Plan(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self {
            class: ErrorClass::Config,
            origin: ErrorOrigin::Options,
            message: err.to_string(),
            detail: Some(ErrorDetail::Config(err)),
        }
    }
}

impl From<PathError> for Error {
    fn from(err: PathError) -> Self {
        Self {
            class: ErrorClass::Config,
            origin: ErrorOrigin::Schema,
            message: err.to_string(),
            detail: Some(ErrorDetail::Path(err)),
        }
    }
}

impl From<PlanError> for Error {
    fn from(err: PlanError) -> Self {
        Self {
            class: ErrorClass::Unsupported,
            origin: ErrorOrigin::Query,
            message: err.to_string(),
            detail: Some(ErrorDetail::Plan(err)),
        }
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`Error`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Config(ConfigError),

    #[error("{0}")]
    Path(PathError),

    #[error("{0}")]
    Plan(PlanError),
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Config,
    Internal,
    InvariantViolation,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Internal => "internal",
            Self::InvariantViolation => "invariant_violation",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Options,
    Query,
    Schema,
    Store,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Options => "options",
            Self::Query => "query",
            Self::Schema => "schema",
            Self::Store => "store",
        };
        write!(f, "{label}")
    }
}
