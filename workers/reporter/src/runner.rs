//! Generating all requested report formats of a run.

#[cfg(test)]
mod test;

use crate::{
    config::ReporterJobConfiguration, naming::ReportNameMapper, reporters::OrtResultReporter,
    storage::ReportStorage,
};
use futures::future::join_all;
use ortserver_model::{
    runs::{OrtIssue, Severity},
    JobKind,
};
use ortserver_ort_model::{self as ort, Reporter, ReporterInput};
use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
    sync::Arc,
};
use time::OffsetDateTime;
use tracing::instrument;

/// The outcome of generating reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReporterRunnerResult {
    /// The names of the stored reports.
    pub reports: BTreeSet<String>,
    pub issues: Vec<OrtIssue>,
}

/// Runs the reporters for the formats of a reporter job and stores what they produce.
pub struct ReporterRunner {
    reporters: BTreeMap<String, Arc<dyn Reporter>>,
    storage: Arc<dyn ReportStorage>,
}

impl ReporterRunner {
    pub fn new(storage: Arc<dyn ReportStorage>) -> Self {
        Self {
            reporters: Default::default(),
            storage,
        }
    }

    /// Register a reporter for its report type. Types are matched ignoring case.
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporters
            .insert(reporter.report_type().to_lowercase(), Arc::new(reporter));
        self
    }

    pub fn with_builtin_reporters(self) -> Self {
        self.with_reporter(OrtResultReporter)
    }

    /// Generate every format of `config` for the result of an ORT run.
    ///
    /// Formats are generated concurrently, each one into its own directory below `work_dir`. Formats
    /// differing only in case are generated once. A failure only affects its format and is reported
    /// as an issue of the result.
    #[instrument(skip(self, ort_result, config, work_dir), fields(formats = ?config.formats))]
    pub async fn run(
        &self,
        ort_run_id: i64,
        ort_result: ort::OrtResult,
        config: &ReporterJobConfiguration,
        work_dir: &Path,
    ) -> ReporterRunnerResult {
        let input = ReporterInput::new(ort_result);
        let mut seen = BTreeSet::new();
        let formats = config
            .formats
            .iter()
            .filter(|format| seen.insert(format.to_lowercase()))
            .collect::<Vec<_>>();

        let outcomes = join_all(
            formats
                .into_iter()
                .map(|format| self.generate(ort_run_id, &input, format, config, work_dir)),
        )
        .await;

        let mut result = ReporterRunnerResult::default();
        for (reports, issues) in outcomes {
            result.reports.extend(reports);
            result.issues.extend(issues);
        }

        log::info!(
            "Created {} reports for run {ort_run_id} with {} issues",
            result.reports.len(),
            result.issues.len()
        );

        result
    }

    async fn generate(
        &self,
        ort_run_id: i64,
        input: &ReporterInput,
        format: &str,
        config: &ReporterJobConfiguration,
        work_dir: &Path,
    ) -> (Vec<String>, Vec<OrtIssue>) {
        let Some(reporter) = self.reporters.get(&format.to_lowercase()) else {
            return (
                vec![],
                vec![reporter_issue(
                    format,
                    format!("No reporter found for the configured format '{format}'."),
                )],
            );
        };

        let output_dir = work_dir.join(format);
        if let Err(err) = tokio::fs::create_dir_all(&output_dir).await {
            return (
                vec![],
                vec![reporter_issue(
                    format,
                    format!("Could not create the output directory: {err}"),
                )],
            );
        }

        let results = match reporter
            .generate_report(input, &output_dir, &config.options_for(format))
            .await
        {
            Ok(results) => results,
            Err(err) => {
                return (
                    vec![],
                    vec![reporter_issue(
                        format,
                        format!("Could not create report for '{format}': {err}"),
                    )],
                )
            }
        };

        let mut issues = Vec::new();
        let mut files = Vec::new();
        for result in results {
            match result {
                Ok(file) => files.push(file),
                Err(err) => issues.push(reporter_issue(
                    format,
                    format!("Could not create report file for '{format}': {err}"),
                )),
            }
        }

        let named = ReportNameMapper::new(config.name_mappings.get(format).cloned())
            .map_report_names(&files);

        if let Err(err) = self.storage.store_report_files(ort_run_id, &named).await {
            issues.push(reporter_issue(
                format,
                format!("Could not store the reports for '{format}': {err}"),
            ));
            return (vec![], issues);
        }

        (named.into_keys().collect(), issues)
    }
}

fn reporter_issue(format: &str, message: String) -> OrtIssue {
    log::error!("{message}");

    OrtIssue::new(
        OffsetDateTime::now_utc(),
        format!("Reporter-{format}"),
        message,
        Severity::Error,
    )
    .with_worker(JobKind::Reporter.to_string())
}
