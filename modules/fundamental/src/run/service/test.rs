use super::*;
use ortserver_common::model::OptionalValue;
use ortserver_entity::job;
use ortserver_model::{
    runs::{OrtIssue, Severity},
    JobKind,
};
use ortserver_test_context::OrtServerContext;
use sea_orm::PaginatorTrait;
use std::collections::BTreeMap;
use test_context::test_context;
use test_log::test;

fn create(revision: &str) -> CreateOrtRun {
    CreateOrtRun {
        revision: revision.to_string(),
        labels: BTreeMap::from([("trigger".to_string(), "push".to_string())]),
        ..Default::default()
    }
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn indices_per_repository(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = OrtRunService::new(ctx.db.clone());
    let first = ctx.create_hierarchy("first").await?;
    let second = ctx.create_hierarchy("second").await?;

    let one = service.create_ort_run(first.repository.id, create("main")).await?;
    let two = service.create_ort_run(first.repository.id, create("dev")).await?;
    let other = service.create_ort_run(second.repository.id, create("main")).await?;

    assert_eq!((1, 2, 1), (one.index, two.index, other.index));
    assert_eq!(OrtRunStatus::Created, one.status);
    assert_eq!(Some("push"), one.labels.get("trigger").map(String::as_str));

    assert_eq!(
        Some(two.clone()),
        service.get_ort_run_by_index(first.repository.id, 2).await?
    );
    assert_eq!(None, service.get_ort_run_by_index(first.repository.id, 3).await?);
    assert_eq!(Some(one.clone()), service.get_ort_run(one.id).await?);

    let missing = service
        .create_ort_run(second.repository.id + 100, create("main"))
        .await;
    assert!(matches!(missing, Err(Error::NotFound(_))), "{missing:?}");

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn list_with_status_filter(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = OrtRunService::new(ctx.db.clone());
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let repository_id = hierarchy.repository.id;

    for revision in ["a", "b", "c"] {
        service.create_ort_run(repository_id, create(revision)).await?;
    }
    let run = service
        .get_ort_run_by_index(repository_id, 2)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no run with index 2"))?;
    service
        .update_ort_run(
            run.id,
            UpdateOrtRun {
                status: OptionalValue::Present(OrtRunStatus::Failed),
                ..Default::default()
            },
        )
        .await?;

    let all = service
        .list_ort_runs(
            repository_id,
            ListQueryParameters::default().with_sort(OrderField::desc("index")),
            None,
        )
        .await?;
    assert_eq!(3, all.total_count);
    assert_eq!(
        vec![3, 2, 1],
        all.data.iter().map(|run| run.index).collect::<Vec<_>>()
    );

    let failed = service
        .list_ort_runs(
            repository_id,
            ListQueryParameters::default(),
            Some(FilterOperatorAndValue::new(
                ComparisonOperator::In,
                vec![OrtRunStatus::Failed],
            )),
        )
        .await?;
    assert_eq!(vec![run.id], failed.data.iter().map(|run| run.id).collect::<Vec<_>>());

    let others = service
        .list_ort_runs(
            repository_id,
            ListQueryParameters::default(),
            Some(FilterOperatorAndValue::new(
                ComparisonOperator::NotIn,
                vec![OrtRunStatus::Failed],
            )),
        )
        .await?;
    assert_eq!(
        vec![1, 3],
        others.data.iter().map(|run| run.index).collect::<Vec<_>>()
    );

    let invalid = service
        .list_ort_runs(
            repository_id,
            ListQueryParameters::default(),
            Some(FilterOperatorAndValue::new(
                ComparisonOperator::Greater,
                vec![OrtRunStatus::Failed],
            )),
        )
        .await;
    assert!(matches!(invalid, Err(Error::BadRequest(_))), "{invalid:?}");

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn finishing_records_time_and_issues(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = OrtRunService::new(ctx.db.clone());
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let run = service
        .create_ort_run(hierarchy.repository.id, create("main"))
        .await?;

    let active = service
        .update_ort_run(
            run.id,
            UpdateOrtRun {
                status: OptionalValue::Present(OrtRunStatus::Active),
                resolved_revision: OptionalValue::Present(Some("0123abc".into())),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(None, active.finished_at);
    assert_eq!(Some("0123abc".to_string()), active.resolved_revision);

    let issue = OrtIssue::new(
        OffsetDateTime::now_utc().replace_nanosecond(0)?,
        "Orchestrator",
        "Reporter job timed out",
        Severity::Error,
    );
    let finished = service
        .update_ort_run(
            run.id,
            UpdateOrtRun {
                status: OptionalValue::Present(OrtRunStatus::FinishedWithIssues),
                issues: vec![issue.clone()],
                ..Default::default()
            },
        )
        .await?;
    assert!(finished.finished_at.is_some());
    assert_eq!(active.resolved_revision, finished.resolved_revision);

    let issues = ctx.graph.get_run_issues(run.id, None, &ctx.db).await?;
    assert_eq!(vec![issue], issues);

    let missing = service
        .update_ort_run(run.id + 1, UpdateOrtRun::default())
        .await;
    assert!(matches!(missing, Err(Error::NotFound(_))), "{missing:?}");

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn delete_with_jobs(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = OrtRunService::new(ctx.db.clone());
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let run = service
        .create_ort_run(hierarchy.repository.id, create("main"))
        .await?;
    ctx.create_job(run.id, JobKind::Analyzer).await?;
    ctx.create_job(run.id, JobKind::Reporter).await?;

    let jobs = service.list_jobs(run.id).await?;
    assert_eq!(
        vec![JobKind::Analyzer, JobKind::Reporter],
        jobs.iter().map(|job| job.kind).collect::<Vec<_>>()
    );

    service.delete_ort_run(run.id).await?;

    assert_eq!(None, service.get_ort_run(run.id).await?);
    assert_eq!(
        0,
        job::Entity::find()
            .filter(job::Column::OrtRunId.eq(run.id))
            .count(&ctx.db)
            .await?
    );
    assert!(matches!(
        service.delete_ort_run(run.id).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        service.list_jobs(run.id).await,
        Err(Error::NotFound(_))
    ));

    Ok(())
}
