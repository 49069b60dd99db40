//! Generating reports for ORT runs.

pub mod config;
pub mod naming;
pub mod reporters;
pub mod runner;
pub mod storage;
pub mod worker;

pub use config::{ReportNameMapping, ReporterJobConfiguration};
pub use naming::ReportNameMapper;
pub use reporters::OrtResultReporter;
pub use runner::{ReporterRunner, ReporterRunnerResult};
pub use storage::{FileSystemReportStorage, ReportStorage, ReportStorageError};
pub use worker::ReporterWorker;
