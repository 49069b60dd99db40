use crate::test::caller;
use actix_http::StatusCode;
use actix_web::test::TestRequest;
use ortserver_model::runs::Severity;
use ortserver_test_context::{call::CallService, fixtures::issue, OrtServerContext};
use serde_json::{json, Value};
use test_context::test_context;
use test_log::test;

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn issues_of_run(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let repository = ctx.create_hierarchy("acme").await?.repository.id;
    let run = ctx.create_run(repository, 1).await?;

    let mut error = issue("Build failed");
    error.severity = Severity::Error;
    ctx.graph
        .add_run_issues(run.id, &[issue("Deprecated API"), error], &ctx.db)
        .await?;

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{}/issues?sort=-severity", run.id))
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!(2), response["total_count"]);
    assert_eq!(json!("Build failed"), response["data"][0]["message"]);

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{}/issues/severities", run.id))
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!({"HINT": 0, "WARNING": 1, "ERROR": 1}), response);

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{}/issues?sort=priority", run.id))
        .to_request();
    assert_eq!(StatusCode::BAD_REQUEST, app.call_service(request).await.status());

    Ok(())
}
