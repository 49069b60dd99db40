use super::*;
use ortserver_model::JobKind;
use ortserver_test_context::{
    fixtures::{advisor_run, analyzer_run, issue, package, scan_result},
    OrtServerContext,
};
use test_context::test_context;
use test_log::test;

/// Two runs sharing the package `lib`, the first one also scanned.
///
/// Returns the id of the first run.
async fn two_runs(ctx: &OrtServerContext) -> Result<i64, anyhow::Error> {
    let hierarchy = ctx.create_hierarchy("acme").await?;

    let first = ctx.create_run(hierarchy.repository.id, 1).await?;
    let job = ctx.create_job(first.id, JobKind::Analyzer).await?;
    let mut result = analyzer_run(job.id, vec![package("lib", "1.0"), package("util", "2.1")]);
    result.issues = vec![issue("Could not resolve 'util'")
        .with_identifier(result.packages[1].identifier.clone())];
    ctx.graph.create_analyzer_run(&result, &ctx.db).await?;

    let job = ctx.create_job(first.id, JobKind::Scanner).await?;
    let scanner_run = ctx.graph.create_scanner_run(job.id, &ctx.db).await?;
    let stored = ctx
        .graph
        .insert_scan_result(&scan_result(), "hash", &ctx.db)
        .await?;
    ctx.graph
        .link_scan_result(scanner_run.id, stored.id, &ctx.db)
        .await?;

    let second = ctx.create_run(hierarchy.repository.id, 2).await?;
    let job = ctx.create_job(second.id, JobKind::Analyzer).await?;
    let mut result = analyzer_run(job.id, vec![package("lib", "1.0")]);
    result.projects.clear();
    ctx.graph.create_analyzer_run(&result, &ctx.db).await?;

    Ok(first.id)
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn nothing_to_remove_while_runs_exist(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    two_runs(ctx).await?;

    let counts = OrphanRemovalService::new(ctx.db.clone())
        .delete_runs_orphaned_entities(&OrphanRemoval::default())
        .await?;

    assert_eq!(OrphanCounts::default(), counts);

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn remove_what_a_deleted_run_left(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let first = two_runs(ctx).await?;
    ort_run::Entity::delete_by_id(first).exec(&ctx.db).await?;

    let service = OrphanRemovalService::new(ctx.db.clone());
    let counts = service
        .delete_runs_orphaned_entities(&OrphanRemoval::default())
        .await?;

    assert_eq!(
        OrphanCounts {
            packages: 1,
            projects: 1,
            authors: 0,
            declared_licenses: 0,
            identifiers: 2,
            snippet_associations: 1,
            snippet_findings: 1,
            snippets: 1,
            vcs_info: 2,
            remote_artifacts: 3,
        },
        counts
    );

    // the shared package is complete
    let remaining = ortserver_entity::package::Entity::find()
        .all(&ctx.db)
        .await?;
    assert_eq!(1, remaining.len());
    let remaining = ctx
        .graph
        .load_package(remaining[0].clone(), &ctx.db)
        .await?;
    assert_eq!(package("lib", "1.0"), remaining);

    assert_eq!(
        OrphanCounts::default(),
        service
            .delete_runs_orphaned_entities(&OrphanRemoval::default())
            .await?
    );

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn chunked_removal_is_limited(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let first = two_runs(ctx).await?;
    ort_run::Entity::delete_by_id(first).exec(&ctx.db).await?;

    let config = OrphanRemoval {
        vcs_info_limit: 1,
        vcs_info_chunk_size: 1,
        remote_artifacts_limit: 2,
        remote_artifacts_chunk_size: 1,
        ..Default::default()
    };
    let service = OrphanRemovalService::new(ctx.db.clone());

    let counts = service.delete_runs_orphaned_entities(&config).await?;
    assert_eq!((1, 2), (counts.vcs_info, counts.remote_artifacts));

    let counts = service.delete_runs_orphaned_entities(&config).await?;
    assert_eq!((1, 1), (counts.vcs_info, counts.remote_artifacts));
    assert_eq!(0, counts.packages);

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn advisor_results_keep_their_identifiers(
    ctx: &OrtServerContext,
) -> Result<(), anyhow::Error> {
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let run = ctx.create_run(hierarchy.repository.id, 1).await?;
    let job = ctx.create_job(run.id, JobKind::Advisor).await?;
    let mut result = advisor_run(job.id, package("log4j-core", "2.14.1").identifier);
    result.issues.clear();
    ctx.graph.create_advisor_run(&result, &ctx.db).await?;

    let service = OrphanRemovalService::new(ctx.db.clone());
    assert_eq!(
        OrphanCounts::default(),
        service
            .delete_runs_orphaned_entities(&OrphanRemoval::default())
            .await?
    );

    ort_run::Entity::delete_by_id(run.id).exec(&ctx.db).await?;
    let counts = service
        .delete_runs_orphaned_entities(&OrphanRemoval::default())
        .await?;
    assert_eq!(1, counts.identifiers);

    Ok(())
}
