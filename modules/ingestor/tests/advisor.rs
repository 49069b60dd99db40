use ortserver_model::{runs::Identifier, JobKind};
use ortserver_test_context::{fixtures::advisor_run, OrtServerContext};
use test_context::test_context;
use test_log::test;

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn advisor_run_round_trip(ctx: &OrtServerContext) -> anyhow::Result<()> {
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let run = ctx.create_run(hierarchy.repository.id, 1).await?;
    let job = ctx.create_job(run.id, JobKind::Advisor).await?;

    let identifier = Identifier::new("Maven", "org.apache.logging.log4j", "log4j-core", "2.14.1");
    let advisor_run = advisor_run(job.id, identifier.clone());
    let created = ctx.graph.create_advisor_run(&advisor_run, &ctx.db).await?;
    assert_eq!(Some("advisor"), created.issues[0].worker.as_deref());

    let loaded = ctx
        .graph
        .get_advisor_run_for_job(job.id, &ctx.db)
        .await?
        .expect("advisor run must exist");
    assert_eq!(created, loaded);
    assert_eq!(advisor_run.results, loaded.results);
    assert_eq!(
        Some(&loaded),
        ctx.graph
            .get_advisor_run(created.id, &ctx.db)
            .await?
            .as_ref()
    );

    let issues = ctx
        .graph
        .get_run_issues(run.id, Some("advisor"), &ctx.db)
        .await?;
    assert_eq!(1, issues.len());
    assert_eq!(Some(identifier), issues[0].identifier);

    assert!(ctx.graph.get_advisor_run_for_job(4711, &ctx.db).await?.is_none());

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn one_advisor_run_per_job(ctx: &OrtServerContext) -> anyhow::Result<()> {
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let run = ctx.create_run(hierarchy.repository.id, 1).await?;
    let job = ctx.create_job(run.id, JobKind::Advisor).await?;

    let advisor_run = advisor_run(job.id, Identifier::new("NPM", "", "left-pad", "1.3.0"));
    ctx.graph.create_advisor_run(&advisor_run, &ctx.db).await?;
    assert!(ctx
        .graph
        .create_advisor_run(&advisor_run, &ctx.db)
        .await
        .is_err());

    Ok(())
}
