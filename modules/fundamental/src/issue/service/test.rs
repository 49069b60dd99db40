use super::*;
use ortserver_model::runs::Identifier;
use ortserver_test_context::OrtServerContext;
use test_context::test_context;
use test_log::test;
use time::macros::datetime;

fn issues() -> Vec<OrtIssue> {
    vec![
        OrtIssue::new(
            datetime!(2024-03-01 12:00 UTC),
            "Gradle",
            "Could not resolve 'util'",
            Severity::Error,
        )
        .with_identifier(Identifier::new("Maven", "org.example", "util", "2.1"))
        .with_worker("analyzer"),
        OrtIssue::new(
            datetime!(2024-03-01 12:10 UTC),
            "ScanCode",
            "Timeout",
            Severity::Warning,
        )
        .with_worker("scanner"),
        OrtIssue::new(
            datetime!(2024-03-01 12:20 UTC),
            "Orchestrator",
            "Evaluator skipped",
            Severity::Hint,
        ),
    ]
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn list_sorted(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = IssueService::new(ctx.db.clone());
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let run = ctx.create_run(hierarchy.repository.id, 1).await?;
    let other = ctx.create_run(hierarchy.repository.id, 2).await?;

    let issues = issues();
    ctx.graph.add_run_issues(run.id, &issues, &ctx.db).await?;
    ctx.graph.add_run_issues(other.id, &issues[..1], &ctx.db).await?;

    let result = service
        .list_for_run(run.id, ListQueryParameters::default())
        .await?;
    assert_eq!(3, result.total_count);
    assert_eq!(
        vec![issues[2].clone(), issues[1].clone(), issues[0].clone()],
        result.data
    );

    let result = service
        .list_for_run(
            run.id,
            ListQueryParameters::default()
                .with_sort(OrderField::desc("severity"))
                .with_limit(2),
        )
        .await?;
    assert_eq!(
        vec![Severity::Error, Severity::Warning],
        result.data.iter().map(|issue| issue.severity).collect::<Vec<_>>()
    );

    let result = service
        .list_for_run(
            run.id,
            ListQueryParameters::default()
                .with_sort(OrderField::asc("source"))
                .with_offset(2),
        )
        .await?;
    assert_eq!(vec![issues[1].clone()], result.data);

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn count_by_severity(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = IssueService::new(ctx.db.clone());
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let run = ctx.create_run(hierarchy.repository.id, 1).await?;

    let mut issues = issues();
    issues.truncate(2);
    issues.push(issues[0].clone().with_worker("evaluator"));
    ctx.graph.add_run_issues(run.id, &issues, &ctx.db).await?;

    assert_eq!(
        BTreeMap::from([
            (Severity::Hint, 0),
            (Severity::Warning, 1),
            (Severity::Error, 2),
        ]),
        service.count_by_severity(run.id).await?
    );

    assert!(matches!(
        service.count_by_severity(run.id + 1).await,
        Err(Error::NotFound(_))
    ));

    Ok(())
}
