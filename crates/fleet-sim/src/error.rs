use fleet_core::{CoreError, PackageId, TimeOfDay};
use fleet_dispatch::DispatchError;
use fleet_spatial::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("{package} is addressed to {address:?}, which is not in the distance graph")]
    UnknownAddress {
        package: PackageId,
        address: String,
    },

    #[error("hub address {0:?} is not in the distance graph")]
    NoHub(String),

    #[error("simulation window is empty: start {start} is not before end {end}")]
    InvalidWindow {
        start: TimeOfDay,
        end:   TimeOfDay,
    },

    #[error("fleet has no trucks")]
    EmptyFleet,

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
