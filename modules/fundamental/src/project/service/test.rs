use super::*;
use ortserver_model::JobKind;
use ortserver_test_context::{
    fixtures::{analyzer_run, project},
    OrtServerContext,
};
use test_context::test_context;
use test_log::test;

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn projects_of_run(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = ProjectService::new(ctx.db.clone());
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let run = ctx.create_run(hierarchy.repository.id, 1).await?;
    let job = ctx.create_job(run.id, JobKind::Analyzer).await?;

    let mut backend = project("backend");
    backend.definition_file_path = "backend/build.gradle.kts".into();
    let mut frontend = project("frontend");
    frontend.definition_file_path = "a/package.json".into();

    let mut result = analyzer_run(job.id, vec![]);
    result.projects = vec![frontend.clone(), backend.clone()];
    ctx.graph.create_analyzer_run(&result, &ctx.db).await?;

    let projects = service
        .list_for_run(run.id, ListQueryParameters::default())
        .await?;
    assert_eq!(2, projects.total_count);
    assert_eq!(vec![backend.clone(), frontend.clone()], projects.data);

    let projects = service
        .list_for_run(
            run.id,
            ListQueryParameters::default().with_sort(OrderField::asc("definitionFilePath")),
        )
        .await?;
    assert_eq!(vec![frontend, backend], projects.data);

    assert_eq!(2, service.count_for_run(run.id).await?);

    let invalid = service
        .list_for_run(
            run.id,
            ListQueryParameters::default().with_sort(OrderField::asc("purl")),
        )
        .await;
    assert!(matches!(invalid, Err(Error::Query(_))), "{invalid:?}");

    Ok(())
}
