//! Assembly of the toolkit's result document from everything stored for an ORT run.

use crate::mapping::MapToOrt;
use ortserver_model::{runs::VcsInfo, JobKind};
use ortserver_module_ingestor::graph::{self, Graph};
use ortserver_ort_model as ort;
use sea_orm::ConnectionTrait;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ORT run {0} not found")]
    RunNotFound(i64),
    #[error(transparent)]
    Graph(#[from] graph::Error),
}

/// Load the results of all workers which finished for a run so far.
#[instrument(skip(graph, connection), err)]
pub async fn load_ort_result<C: ConnectionTrait>(
    graph: &Graph,
    ort_run_id: i64,
    connection: &C,
) -> Result<ort::OrtResult, Error> {
    let run = graph
        .get_ort_run(ort_run_id, connection)
        .await?
        .ok_or(Error::RunNotFound(ort_run_id))?;

    let vcs = match run.vcs_id {
        Some(id) => graph.load_vcs_info(id, connection).await?,
        None => VcsInfo::empty(),
    };
    let vcs_processed = match run.vcs_processed_id {
        Some(id) => graph.load_vcs_info(id, connection).await?,
        None => vcs.clone(),
    };

    let mut result = ort::OrtResult {
        repository: ort::Repository {
            vcs: vcs.map_to_ort(),
            vcs_processed: vcs_processed.map_to_ort(),
        },
        labels: run.labels.clone(),
        ..Default::default()
    };

    if let Some(job) = graph
        .get_job_for_run(run.id, JobKind::Analyzer, connection)
        .await?
    {
        result.analyzer = graph
            .get_analyzer_run_for_job(job.id, connection)
            .await?
            .map(|run| run.map_to_ort());
    }

    if let Some(job) = graph
        .get_job_for_run(run.id, JobKind::Advisor, connection)
        .await?
    {
        result.advisor = graph
            .get_advisor_run_for_job(job.id, connection)
            .await?
            .map(|run| run.map_to_ort());
    }

    if let Some(job) = graph
        .get_job_for_run(run.id, JobKind::Scanner, connection)
        .await?
    {
        result.scanner = graph
            .get_scanner_run_for_job(job.id, connection)
            .await?
            .map(|run| run.map_to_ort());
    }

    if let Some(job) = graph
        .get_job_for_run(run.id, JobKind::Evaluator, connection)
        .await?
    {
        result.evaluator = graph
            .get_evaluator_run_for_job(job.id, connection)
            .await?
            .map(|run| run.map_to_ort());
    }

    log::debug!(
        "assembled result of run {ort_run_id}: analyzer={}, advisor={}, scanner={}, evaluator={}",
        result.analyzer.is_some(),
        result.advisor.is_some(),
        result.scanner.is_some(),
        result.evaluator.is_some()
    );

    Ok(result)
}
