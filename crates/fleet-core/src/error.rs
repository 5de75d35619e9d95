//! Core error type.
//!
//! Sub-crates define their own error enums; `CoreError` covers the value
//! types that live here (time parsing and package status transitions).

use thiserror::Error;

use crate::{PackageId, PackageStatus};

/// The error type for `fleet-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("cannot parse time of day {0:?}")]
    TimeParse(String),

    #[error("{package} cannot move from {from} to {to}")]
    InvalidTransition {
        package: PackageId,
        from:    PackageStatus,
        to:      PackageStatus,
    },
}

/// Shorthand result type for `fleet-core`.
pub type CoreResult<T> = Result<T, CoreError>;
