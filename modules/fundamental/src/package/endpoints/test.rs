use crate::test::caller;
use actix_http::StatusCode;
use actix_web::test::TestRequest;
use ortserver_model::{runs::Package, JobKind};
use ortserver_test_context::{
    call::CallService,
    fixtures::{analyzer_run, package},
    OrtServerContext,
};
use serde_json::{json, Value};
use test_context::test_context;
use test_log::test;

fn licensed(name: &str, license: Option<&str>) -> Package {
    let mut package = package(name, "1.0");
    package.processed_declared_license.spdx_expression = license.map(ToString::to_string);
    package
}

async fn analyzed_run(ctx: &OrtServerContext) -> Result<i64, anyhow::Error> {
    let repository = ctx.create_hierarchy("acme").await?.repository.id;
    let run = ctx.create_run(repository, 1).await?;
    let job = ctx.create_job(run.id, JobKind::Analyzer).await?;
    let packages = vec![
        licensed("zeta", Some("GPL-2.0-only")),
        licensed("util", Some("MIT")),
        licensed("lib", Some("MIT")),
        licensed("plain", None),
    ];
    ctx.graph
        .create_analyzer_run(&analyzer_run(job.id, packages), &ctx.db)
        .await?;
    Ok(run.id)
}

fn names(response: &Value) -> Vec<&str> {
    response["data"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|package| package["identifier"]["name"].as_str())
        .collect()
}

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn list(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let id = analyzed_run(ctx).await?;

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{id}/packages?sort=-identifier&limit=2"))
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!(4), response["total_count"]);
    assert_eq!(vec!["zeta", "util"], names(&response));

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{id}/packages?license=MIT"))
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(vec!["lib", "util"], names(&response));

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{id}/packages?excludeLicense=MIT&purl=E"))
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(vec!["plain", "zeta"], names(&response));

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{id}/packages?license=MIT&excludeLicense=MIT"))
        .to_request();
    assert_eq!(StatusCode::BAD_REQUEST, app.call_service(request).await.status());

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn counts(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let id = analyzed_run(ctx).await?;

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{id}/packages/count"))
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!({"count": 4}), response);

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{id}/packages/licenses"))
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(
        json!([
            {"license": "GPL-2.0-only", "count": 1},
            {"license": "MIT", "count": 2},
        ]),
        response
    );

    let request = TestRequest::get()
        .uri(&format!("/api/v1/runs/{}/packages", id + 1))
        .to_request();
    assert_eq!(StatusCode::NOT_FOUND, app.call_service(request).await.status());

    Ok(())
}
