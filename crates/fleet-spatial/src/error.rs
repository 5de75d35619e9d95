//! Graph error type.
//!
//! Every variant except `Io`/`Csv` is a data-integrity error: the input
//! describes an impossible graph and loading must stop.

use thiserror::Error;

use fleet_core::NodeId;

/// Errors produced by `fleet-spatial`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("location {new:?} collides with existing location {existing:?}")]
    Collision { new: String, existing: String },

    #[error("lookup name={name:?} address={address:?} matches two different locations")]
    Ambiguous { name: String, address: String },

    #[error("no location matches {0:?}")]
    NotFound(String),

    #[error("{0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("edge from {0:?} to itself")]
    SelfLoop(String),

    #[error("invalid distance {weight} between {from:?} and {to:?}")]
    InvalidWeight { from: String, to: String, weight: f64 },

    #[error("distance matrix error: {0}")]
    Matrix(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
