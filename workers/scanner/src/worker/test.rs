use super::*;
use async_trait::async_trait;
use ortserver_ort_model::{
    EngineError, PackageProvenanceStorage, ProvenanceBasedScanStorage,
};
use ortserver_test_context::{
    fixtures::{analyzer_run, package, scan_result},
    OrtServerContext,
};
use test_context::test_context;
use test_log::test;
use time::macros::datetime;

#[derive(Copy, Clone, PartialEq, Eq)]
enum Outcome {
    Success,
    ProvenanceIssue,
    Failure,
}

/// Resolves every package to its repository and "scans" it with a canned result.
struct FakeEngine(Outcome);

#[async_trait]
impl ScanEngine for FakeEngine {
    async fn scan(
        &self,
        packages: &[ort::Package],
        config: &ort::ScannerConfiguration,
        context: ScanContext<'_>,
    ) -> Result<ort::ScannerRun, EngineError> {
        if self.0 == Outcome::Failure {
            return Err(EngineError::Failed("scanner crashed".into()));
        }

        let mut provenances = Vec::new();
        let mut scan_results = Vec::new();
        for package in packages {
            let provenance = ort::RepositoryProvenance {
                vcs_info: package.vcs_processed.clone(),
                resolved_revision: "0a1b2c3d".into(),
            };
            context
                .package_provenance_storage
                .put_provenance_for_vcs(
                    &package.id,
                    &package.vcs_processed,
                    &ort::PackageProvenanceResolutionResult::ResolvedRepository {
                        provenance: provenance.clone(),
                        cloned_revision: package.vcs_processed.revision.clone(),
                        is_fixed_revision: true,
                    },
                )
                .await?;

            let mut result = scan_result().map_to_ort();
            result.provenance = ort::KnownProvenance::Repository(provenance.clone()).into();
            result.summary.issues.clear();
            context.scan_storage.write(&result).await?;
            scan_results.push(result);

            let issue = (self.0 == Outcome::ProvenanceIssue).then(|| ort::Issue {
                timestamp: datetime!(2024-03-02 08:00 UTC),
                source: "Downloader".into(),
                message: "Could not verify the revision".into(),
                severity: ort::Severity::Warning,
                affected_path: None,
            });

            provenances.push(ort::ProvenanceResolutionResult {
                id: package.id.clone(),
                package_provenance: Some(ort::KnownProvenance::Repository(provenance)),
                sub_repositories: Default::default(),
                package_provenance_resolution_issue: issue,
            });
        }

        Ok(ort::ScannerRun {
            start_time: datetime!(2024-03-02 08:00 UTC),
            end_time: datetime!(2024-03-02 08:30 UTC),
            environment: Default::default(),
            config: config.clone(),
            provenances,
            scan_results,
        })
    }
}

/// An analyzed run with a pending scanner job, returns the ids of the run and the job.
async fn analyzed_run(ctx: &OrtServerContext) -> Result<(i64, i64), anyhow::Error> {
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let run = ctx.create_run(hierarchy.repository.id, 1).await?;

    let job = ctx.create_job(run.id, JobKind::Analyzer).await?;
    ctx.graph
        .create_analyzer_run(&analyzer_run(job.id, vec![package("lib", "1.0")]), &ctx.db)
        .await?;

    let job = ctx.create_job(run.id, JobKind::Scanner).await?;

    Ok((run.id, job.id))
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn scan_packages(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let (_, job_id) = analyzed_run(ctx).await?;
    let worker = ScannerWorker::new(ctx.graph.clone());

    let status = worker.run(job_id, &FakeEngine(Outcome::Success)).await?;
    assert_eq!(JobStatus::Finished, status);

    let job = ctx.graph.get_job(job_id, &ctx.db).await?.expect("job exists");
    assert_eq!(JobStatus::Finished, job.status);
    assert!(job.finished_at.is_some());

    let scanner_run = ctx
        .graph
        .get_scanner_run_for_job(job_id, &ctx.db)
        .await?
        .expect("scanner run exists");
    assert_eq!(Some(datetime!(2024-03-02 08:00 UTC)), scanner_run.start_time);
    assert_eq!(1, scanner_run.scan_results.len());
    assert_eq!(1, scanner_run.provenances.len());
    assert_eq!(
        package("lib", "1.0").identifier,
        scanner_run.provenances[0].id
    );
    assert!(scanner_run.provenances[0].package_provenance.is_some());

    assert!(matches!(
        worker.run(job_id, &FakeEngine(Outcome::Success)).await,
        Err(Error::JobFinished(_))
    ));

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn provenance_issues_are_reported(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let (run_id, job_id) = analyzed_run(ctx).await?;

    let status = ScannerWorker::new(ctx.graph.clone())
        .run(job_id, &FakeEngine(Outcome::ProvenanceIssue))
        .await?;
    assert_eq!(JobStatus::FinishedWithIssues, status);

    let issues = ctx
        .graph
        .get_run_issues(run_id, Some("scanner"), &ctx.db)
        .await?;
    assert_eq!(1, issues.len());
    assert_eq!("Downloader", issues[0].source);
    assert_eq!(Some(package("lib", "1.0").identifier), issues[0].identifier);

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn engine_failure_fails_the_job(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let (run_id, job_id) = analyzed_run(ctx).await?;

    let status = ScannerWorker::new(ctx.graph.clone())
        .run(job_id, &FakeEngine(Outcome::Failure))
        .await?;
    assert_eq!(JobStatus::Failed, status);

    let job = ctx.graph.get_job(job_id, &ctx.db).await?.expect("job exists");
    assert_eq!(JobStatus::Failed, job.status);

    let issues = ctx
        .graph
        .get_run_issues(run_id, Some("scanner"), &ctx.db)
        .await?;
    assert_eq!(1, issues.len());
    assert_eq!(SCANNER_ISSUE_SOURCE, issues[0].source);
    assert_eq!(Severity::Error, issues[0].severity);
    assert!(issues[0].message.contains("scanner crashed"));

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn persistence_failure_fails_the_job(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let (run_id, job_id) = analyzed_run(ctx).await?;

    let scanner_run = ctx.graph.create_scanner_run(job_id, &ctx.db).await?;
    ctx.graph
        .update_scanner_run(
            scanner_run.id,
            datetime!(2024-03-01 08:00 UTC),
            datetime!(2024-03-01 08:30 UTC),
            &Default::default(),
            &Default::default(),
            &ctx.db,
        )
        .await?;

    let result = ScannerWorker::new(ctx.graph.clone())
        .run(job_id, &FakeEngine(Outcome::Success))
        .await;
    assert!(
        matches!(result, Err(Error::Graph(graph::Error::InvalidState(_)))),
        "{result:?}"
    );

    let job = ctx.graph.get_job(job_id, &ctx.db).await?.expect("job exists");
    assert_eq!(JobStatus::Failed, job.status);
    assert!(job.finished_at.is_some());

    let issues = ctx
        .graph
        .get_run_issues(run_id, Some("scanner"), &ctx.db)
        .await?;
    assert_eq!(1, issues.len());
    assert_eq!(SCANNER_ISSUE_SOURCE, issues[0].source);
    assert_eq!(Severity::Error, issues[0].severity);
    assert!(issues[0].message.contains("already been completed"));

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn reject_jobs_which_cannot_be_scanned(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let worker = ScannerWorker::new(ctx.graph.clone());
    let engine = FakeEngine(Outcome::Success);

    assert!(matches!(
        worker.run(4711, &engine).await,
        Err(Error::JobNotFound(4711))
    ));

    let hierarchy = ctx.create_hierarchy("acme").await?;
    let run = ctx.create_run(hierarchy.repository.id, 1).await?;

    let analyzer = ctx.create_job(run.id, JobKind::Analyzer).await?;
    assert!(matches!(
        worker.run(analyzer.id, &engine).await,
        Err(Error::WrongJobKind(_, JobKind::Analyzer))
    ));

    let scanner = ctx.create_job(run.id, JobKind::Scanner).await?;
    assert!(matches!(
        worker.run(scanner.id, &engine).await,
        Err(Error::NoAnalyzerRun(id)) if id == run.id
    ));

    let job = ctx.graph.get_job(scanner.id, &ctx.db).await?.expect("job exists");
    assert_eq!(JobStatus::Created, job.status);

    Ok(())
}
