use crate::test::caller;
use actix_http::StatusCode;
use actix_web::test::TestRequest;
use ortserver_model::JobKind;
use ortserver_test_context::{call::CallService, OrtServerContext};
use serde_json::{json, Value};
use test_context::test_context;
use test_log::test;

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn lifecycle(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let repository = ctx.create_hierarchy("acme").await?.repository.id;

    let request = TestRequest::post()
        .uri(&format!("/api/v1/repositories/{repository}/runs"))
        .set_json(json!({"revision": "main", "labels": {"trigger": "manual"}}))
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(StatusCode::CREATED, response.status());
    let created: Value = actix_web::test::read_body_json(response).await;
    assert_eq!(json!(1), created["index"]);
    assert_eq!(json!("CREATED"), created["status"]);
    let id = created["id"].as_i64().unwrap_or_default();

    let request = TestRequest::patch()
        .uri(&format!("/api/v1/runs/{id}"))
        .set_json(json!({
            "status": "FINISHED_WITH_ISSUES",
            "resolved_revision": "0a1b2c3d",
            "issues": [{
                "timestamp": "2024-03-01T12:00:00Z",
                "source": "Orchestrator",
                "message": "Evaluator timed out",
                "severity": "ERROR",
            }],
        }))
        .to_request();
    let updated: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!("FINISHED_WITH_ISSUES"), updated["status"]);
    assert_eq!(json!("0a1b2c3d"), updated["resolved_revision"]);
    assert!(updated["finished_at"].is_string());

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{id}/issues"))
        .to_request();
    let issues: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!(1), issues["total_count"]);
    assert_eq!(json!("Orchestrator"), issues["data"][0]["source"]);

    let request = TestRequest::delete()
        .uri(&format!("/api/v1/runs/{id}"))
        .to_request();
    assert_eq!(StatusCode::NO_CONTENT, app.call_service(request).await.status());

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{id}"))
        .to_request();
    assert_eq!(StatusCode::NOT_FOUND, app.call_service(request).await.status());

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn jobs(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let repository = ctx.create_hierarchy("acme").await?.repository.id;
    let run = ctx.create_run(repository, 1).await?;
    ctx.create_job(run.id, JobKind::Analyzer).await?;
    ctx.create_job(run.id, JobKind::Reporter).await?;

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{}/jobs", run.id))
        .to_request();
    let jobs: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!("ANALYZER"), jobs[0]["kind"]);
    assert_eq!(json!("REPORTER"), jobs[1]["kind"]);

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{}/jobs", run.id + 1))
        .to_request();
    assert_eq!(StatusCode::NOT_FOUND, app.call_service(request).await.status());

    let request = TestRequest::post()
        .uri(&format!("/api/v1/repositories/{}/runs", repository + 1))
        .set_json(json!({"revision": "main"}))
        .to_request();
    assert_eq!(StatusCode::NOT_FOUND, app.call_service(request).await.status());

    Ok(())
}
