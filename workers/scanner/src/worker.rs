//! Running the scanner for the packages found by the analyzer.

#[cfg(test)]
mod test;

use crate::storage::{
    OrtServerNestedProvenanceStorage, OrtServerPackageProvenanceStorage,
    OrtServerScanResultStorage,
};
use ortserver_model::{
    runs::{OrtIssue, Severity},
    JobKind, JobStatus,
};
use ortserver_module_ingestor::graph::{self, Graph};
use ortserver_ort_model::{self as ort, ScanContext, ScanEngine};
use ortserver_worker_common::mapping::{MapToModel, MapToOrt, MappingError};
use sea_orm::{DbErr, TransactionTrait};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use tracing::instrument;

/// The source of issues raised by the scanner worker itself.
pub const SCANNER_ISSUE_SOURCE: &str = "Scanner";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("job {0} not found")]
    JobNotFound(i64),

    #[error("job {0} is not a scanner job but a {1} job")]
    WrongJobKind(i64, JobKind),

    #[error("job {0} has already been processed")]
    JobFinished(i64),

    #[error("no analyzer results for ORT run {0}")]
    NoAnalyzerRun(i64),

    #[error("invalid scanner configuration: {0}")]
    Configuration(#[from] serde_json::Error),

    #[error(transparent)]
    Graph(#[from] graph::Error),

    #[error(transparent)]
    Database(#[from] DbErr),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

pub struct ScannerWorker {
    graph: Graph,
}

impl ScannerWorker {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    /// Scan the packages of the ORT run a scanner job belongs to.
    ///
    /// A failing scan engine fails the job and records an issue for the run, it is not an error of
    /// this function. Any other error after the job was started also fails the job and records an
    /// issue before it is returned. Returns the final state of the job.
    #[instrument(skip(self, engine), err)]
    pub async fn run(&self, job_id: i64, engine: &dyn ScanEngine) -> Result<JobStatus, Error> {
        let db = self.graph.db();

        let job = self
            .graph
            .get_job(job_id, db)
            .await?
            .ok_or(Error::JobNotFound(job_id))?;

        if job.kind != JobKind::Scanner {
            return Err(Error::WrongJobKind(job_id, job.kind));
        }
        if job.status.is_final() {
            return Err(Error::JobFinished(job_id));
        }

        let config: ort::ScannerConfiguration = serde_json::from_value(job.configuration)?;
        let run = self
            .graph
            .get_ort_run(job.ort_run_id, db)
            .await?
            .ok_or_else(|| graph::Error::NotFound(format!("ORT run {}", job.ort_run_id)))?;
        let packages = self.packages(run.id).await?;

        self.graph
            .update_job_status(job_id, JobStatus::Running, db)
            .await?;

        let status = match self
            .scan(job_id, run.id, run.labels, &packages, &config, engine)
            .await
        {
            Ok(status) => status,
            Err(err) => {
                log::error!("Scanner job {job_id} failed: {err}");
                self.fail(job_id, run.id, err.to_string()).await?;
                return Err(err);
            }
        };

        self.graph.update_job_status(job_id, status, db).await?;

        Ok(status)
    }

    async fn scan(
        &self,
        job_id: i64,
        ort_run_id: i64,
        labels: BTreeMap<String, String>,
        packages: &[ort::Package],
        config: &ort::ScannerConfiguration,
        engine: &dyn ScanEngine,
    ) -> Result<JobStatus, Error> {
        let db = self.graph.db();

        let scanner_run = match self.graph.get_scanner_run_for_job(job_id, db).await? {
            Some(scanner_run) => scanner_run,
            None => self.graph.create_scanner_run(job_id, db).await?,
        };

        let scan_storage = OrtServerScanResultStorage::new(self.graph.clone(), scanner_run.id);
        let package_provenance_storage = OrtServerPackageProvenanceStorage::new(self.graph.clone());
        let nested_provenance_storage = OrtServerNestedProvenanceStorage::new(self.graph.clone());

        let context = ScanContext {
            scan_storage: &scan_storage,
            package_provenance_storage: &package_provenance_storage,
            nested_provenance_storage: &nested_provenance_storage,
            labels,
        };

        log::info!(
            "Scanning {} packages of ORT run {ort_run_id} in job {job_id}",
            packages.len()
        );

        match engine.scan(packages, config, context).await {
            Ok(result) => {
                self.store(ort_run_id, scanner_run.id, &result, packages)
                    .await
            }
            Err(err) => {
                log::error!("Scanner job {job_id} failed: {err}");
                self.graph
                    .add_run_issues(ort_run_id, &[scanner_issue(err.to_string())], db)
                    .await?;
                Ok(JobStatus::Failed)
            }
        }
    }

    /// Mark a running job as failed and record the reason for its run.
    async fn fail(&self, job_id: i64, ort_run_id: i64, message: String) -> Result<(), Error> {
        let db = self.graph.db();

        self.graph
            .add_run_issues(ort_run_id, &[scanner_issue(message)], db)
            .await?;
        self.graph
            .update_job_status(job_id, JobStatus::Failed, db)
            .await?;

        Ok(())
    }

    async fn packages(&self, ort_run_id: i64) -> Result<Vec<ort::Package>, Error> {
        let db = self.graph.db();

        let job = self
            .graph
            .get_job_for_run(ort_run_id, JobKind::Analyzer, db)
            .await?
            .ok_or(Error::NoAnalyzerRun(ort_run_id))?;

        let analyzer_run = self
            .graph
            .get_analyzer_run_for_job(job.id, db)
            .await?
            .ok_or(Error::NoAnalyzerRun(ort_run_id))?;

        Ok(analyzer_run.packages.map_to_ort())
    }

    /// Complete the scanner run with what the engine reported.
    ///
    /// The scan results already arrived through the scan storage.
    async fn store(
        &self,
        ort_run_id: i64,
        scanner_run_id: i64,
        result: &ort::ScannerRun,
        packages: &[ort::Package],
    ) -> Result<JobStatus, Error> {
        let environment = result.environment.map_to_model()?;
        let config = result.config.map_to_model()?;
        let identifiers = packages
            .iter()
            .map(|package| package.id.map_to_model())
            .collect::<Result<Vec<_>, _>>()?;

        let mut issues = Vec::new();
        for provenance in &result.provenances {
            if let Some(issue) = &provenance.package_provenance_resolution_issue {
                issues.push(
                    issue
                        .map_to_model()?
                        .with_identifier(provenance.id.map_to_model()?)
                        .with_worker(JobKind::Scanner.to_string()),
                );
            }
        }

        let tx = self.graph.db().begin().await?;

        self.graph
            .update_scanner_run(
                scanner_run_id,
                result.start_time,
                result.end_time,
                &environment,
                &config,
                &tx,
            )
            .await?;
        self.graph
            .attach_package_provenances(scanner_run_id, &identifiers, &tx)
            .await?;
        self.graph.add_run_issues(ort_run_id, &issues, &tx).await?;

        tx.commit().await?;

        let has_issues = !issues.is_empty()
            || result
                .scan_results
                .iter()
                .any(|scan_result| !scan_result.summary.issues.is_empty());

        Ok(match has_issues {
            true => JobStatus::FinishedWithIssues,
            false => JobStatus::Finished,
        })
    }
}

fn scanner_issue(message: String) -> OrtIssue {
    OrtIssue::new(
        OffsetDateTime::now_utc(),
        SCANNER_ISSUE_SOURCE,
        message,
        Severity::Error,
    )
    .with_worker(JobKind::Scanner.to_string())
}
