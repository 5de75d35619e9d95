use fleet_core::{CoreError, PackageId, TruckId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0} is not in the package table")]
    UnknownPackage(PackageId),

    #[error("{0} appears twice in the manifest")]
    DuplicatePackage(PackageId),

    #[error("{truck} has no room for {package}")]
    TruckFull { truck: TruckId, package: PackageId },

    #[error("manifest parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
