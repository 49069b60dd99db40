use crate::test::caller;
use actix_web::test::TestRequest;
use ortserver_model::JobKind;
use ortserver_test_context::{
    call::CallService,
    fixtures::{analyzer_run, project},
    OrtServerContext,
};
use serde_json::{json, Value};
use test_context::test_context;
use test_log::test;

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn list_and_count(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let repository = ctx.create_hierarchy("acme").await?.repository.id;
    let run = ctx.create_run(repository, 1).await?;
    let job = ctx.create_job(run.id, JobKind::Analyzer).await?;

    let mut result = analyzer_run(job.id, vec![]);
    result.projects.push(project("backend"));
    ctx.graph.create_analyzer_run(&result, &ctx.db).await?;

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{}/projects?sort=identifier", run.id))
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!(2), response["total_count"]);
    assert_eq!(json!("app"), response["data"][0]["identifier"]["name"]);
    assert_eq!(json!("backend"), response["data"][1]["identifier"]["name"]);
    assert_eq!(
        json!("build.gradle.kts"),
        response["data"][0]["definition_file_path"]
    );

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{}/projects/count", run.id))
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!({"count": 2}), response);

    Ok(())
}
