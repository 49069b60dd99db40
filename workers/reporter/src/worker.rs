//! Running the reporter for an ORT run.


use crate::{config::ReporterJobConfiguration, runner::ReporterRunner};
use ortserver_model::{
    reporter::Report,
    runs::{OrtIssue, Severity},
    JobKind, JobStatus,
};
use ortserver_module_ingestor::graph::{self, Graph};
use ortserver_ort_model as ort;
use ortserver_worker_common::result::{self, load_ort_result};
use sea_orm::{DbErr, TransactionTrait};
use time::OffsetDateTime;
use tracing::instrument;

/// The source of issues raised by the reporter worker itself.
pub const REPORTER_ISSUE_SOURCE: &str = "Reporter";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("job {0} not found")]
    JobNotFound(i64),

    #[error("job {0} is not a reporter job but a {1} job")]
    WrongJobKind(i64, JobKind),

    #[error("job {0} has already been processed")]
    JobFinished(i64),

    #[error("invalid reporter configuration: {0}")]
    Configuration(#[from] serde_json::Error),

    #[error("failed to create a working directory: {0}")]
    WorkDir(#[from] std::io::Error),

    #[error(transparent)]
    Assembly(#[from] result::Error),

    #[error(transparent)]
    Graph(#[from] graph::Error),

    #[error(transparent)]
    Database(#[from] DbErr),
}

pub struct ReporterWorker {
    graph: Graph,
    runner: ReporterRunner,
}

impl ReporterWorker {
    pub fn new(graph: Graph, runner: ReporterRunner) -> Self {
        Self { graph, runner }
    }

    /// Create the reports of the ORT run a reporter job belongs to.
    ///
    /// Returns the final state of the job, which finished with issues if any issue of at least
    /// warning severity was raised. An error after the job was started fails the job and is
    /// recorded as an issue of the run before it is returned.
    #[instrument(skip(self), err)]
    pub async fn run(&self, job_id: i64) -> Result<JobStatus, Error> {
        let db = self.graph.db();

        let job = self
            .graph
            .get_job(job_id, db)
            .await?
            .ok_or(Error::JobNotFound(job_id))?;

        if job.kind != JobKind::Reporter {
            return Err(Error::WrongJobKind(job_id, job.kind));
        }
        if job.status.is_final() {
            return Err(Error::JobFinished(job_id));
        }

        let config: ReporterJobConfiguration = serde_json::from_value(job.configuration)?;

        let start_time = OffsetDateTime::now_utc();
        let ort_result = load_ort_result(&self.graph, job.ort_run_id, db).await?;

        self.graph
            .update_job_status(job_id, JobStatus::Running, db)
            .await?;

        let status = match self
            .report(job_id, job.ort_run_id, ort_result, &config, start_time)
            .await
        {
            Ok(status) => status,
            Err(err) => {
                log::error!("Reporter job {job_id} failed: {err}");
                self.fail(job_id, job.ort_run_id, err.to_string()).await?;
                return Err(err);
            }
        };

        self.graph.update_job_status(job_id, status, db).await?;

        Ok(status)
    }

    async fn report(
        &self,
        job_id: i64,
        ort_run_id: i64,
        ort_result: ort::OrtResult,
        config: &ReporterJobConfiguration,
        start_time: OffsetDateTime,
    ) -> Result<JobStatus, Error> {
        let (reports, issues) = if ort_result.repository.vcs_processed.url.is_empty() {
            log::warn!(
                "The repository of ORT run {ort_run_id} is not known, skipping the reports"
            );

            let issue = reporter_issue(
                start_time,
                "No reports were created because the repository of the run is not known.",
                Severity::Warning,
            );

            (vec![], vec![issue])
        } else {
            let work_dir = tempfile::tempdir()?;
            let result = self
                .runner
                .run(ort_run_id, ort_result, config, work_dir.path())
                .await;

            let reports = result
                .reports
                .into_iter()
                .map(|filename| Report { filename })
                .collect::<Vec<_>>();

            (reports, result.issues)
        };

        let tx = self.graph.db().begin().await?;
        self.graph
            .create_reporter_run(job_id, start_time, OffsetDateTime::now_utc(), &reports, &tx)
            .await?;
        self.graph.add_run_issues(ort_run_id, &issues, &tx).await?;
        tx.commit().await?;

        Ok(
            match issues
                .iter()
                .any(|issue| issue.severity >= Severity::Warning)
            {
                true => JobStatus::FinishedWithIssues,
                false => JobStatus::Finished,
            },
        )
    }

    /// Mark a running job as failed and record the reason for its run.
    async fn fail(&self, job_id: i64, ort_run_id: i64, message: String) -> Result<(), Error> {
        let db = self.graph.db();

        let issue = reporter_issue(OffsetDateTime::now_utc(), message, Severity::Error);
        self.graph.add_run_issues(ort_run_id, &[issue], db).await?;
        self.graph
            .update_job_status(job_id, JobStatus::Failed, db)
            .await?;

        Ok(())
    }
}

fn reporter_issue(
    timestamp: OffsetDateTime,
    message: impl Into<String>,
    severity: Severity,
) -> OrtIssue {
    OrtIssue::new(timestamp, REPORTER_ISSUE_SOURCE, message, severity)
        .with_worker(JobKind::Reporter.to_string())
}
