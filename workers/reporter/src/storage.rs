//! Where generated reports end up.

use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum ReportStorageError {
    #[error("invalid report name '{0}'")]
    InvalidName(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Stores the report files of an ORT run under their final names.
#[async_trait]
pub trait ReportStorage: Send + Sync {
    async fn store_report_files(
        &self,
        ort_run_id: i64,
        files: &BTreeMap<String, PathBuf>,
    ) -> Result<(), ReportStorageError>;
}

/// Keeps reports in a directory per ORT run below a root directory.
#[derive(Debug, Clone)]
pub struct FileSystemReportStorage {
    root: PathBuf,
}

impl FileSystemReportStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn run_dir(&self, ort_run_id: i64) -> PathBuf {
        self.root.join(ort_run_id.to_string())
    }
}

#[async_trait]
impl ReportStorage for FileSystemReportStorage {
    #[instrument(skip(self, files), fields(files = files.len()), err)]
    async fn store_report_files(
        &self,
        ort_run_id: i64,
        files: &BTreeMap<String, PathBuf>,
    ) -> Result<(), ReportStorageError> {
        let dir = self.run_dir(ort_run_id);
        tokio::fs::create_dir_all(&dir).await?;

        for (name, file) in files {
            if !is_plain_file_name(name) {
                return Err(ReportStorageError::InvalidName(name.clone()));
            }

            tokio::fs::copy(file, dir.join(name)).await?;
            log::debug!("Stored report '{name}' of run {ort_run_id}");
        }

        Ok(())
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let path = Path::new(name);
    path.file_name().is_some_and(|file_name| file_name == name)
}
