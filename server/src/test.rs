use super::*;
use actix_web::{
    http::StatusCode,
    test::{call_service, init_service, read_body_json, TestRequest},
};
use ortserver_module_fundamental::authorization::NoopAuthorizationService;
use ortserver_test_context::OrtServerContext;
use serde_json::{json, Value};
use test_context::test_context;
use test_log::test;

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn api_and_info(ctx: &OrtServerContext) -> anyhow::Result<()> {
    ctx.create_hierarchy("acme").await?;

    let app = init_service(App::new().configure(|svc| {
        configure(svc, ctx.db.clone(), Arc::new(NoopAuthorizationService))
    }))
    .await;

    let response = call_service(
        &app,
        TestRequest::get().uri("/api/v1/organizations").to_request(),
    )
    .await;
    assert_eq!(StatusCode::OK, response.status());
    let body: Value = read_body_json(response).await;
    assert_eq!(json!(1), body["total_count"]);

    let response = call_service(
        &app,
        TestRequest::get().uri("/.well-known/ortserver").to_request(),
    )
    .await;
    let body: Value = read_body_json(response).await;
    assert_eq!(json!(env!("CARGO_PKG_VERSION")), body["version"]);

    let response = call_service(&app, TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(StatusCode::OK, response.status());

    let response = call_service(&app, TestRequest::get().uri("/v1/organizations").to_request()).await;
    assert_eq!(StatusCode::NOT_FOUND, response.status());

    Ok(())
}
