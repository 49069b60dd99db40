//! Storages backing the scanner of the analysis toolkit, and the worker running it.

pub mod hash;
pub mod storage;
pub mod worker;

pub use hash::{calculate_scan_summary_hash, compare_scan_summaries};
pub use storage::{
    OrtServerNestedProvenanceStorage, OrtServerPackageProvenanceStorage,
    OrtServerScanResultStorage, StorageError,
};
pub use worker::ScannerWorker;
