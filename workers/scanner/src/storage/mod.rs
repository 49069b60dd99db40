//! The storages the scanner reads from and writes to, backed by the database.

#[cfg(test)]
mod test;

mod provenance;
mod scan_result;

pub use provenance::{OrtServerNestedProvenanceStorage, OrtServerPackageProvenanceStorage};
pub use scan_result::OrtServerScanResultStorage;

use ortserver_module_ingestor::graph;
use ortserver_ort_model::ScanStorageError;
use ortserver_worker_common::mapping::MappingError;
use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Graph(#[from] graph::Error),

    #[error(transparent)]
    Database(#[from] DbErr),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("{0}")]
    Invalid(String),
}

impl From<StorageError> for ScanStorageError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Invalid(message) => Self::Invalid(message),
            StorageError::Mapping(err) => Self::Invalid(err.to_string()),
            err => Self::Storage(err.to_string()),
        }
    }
}
