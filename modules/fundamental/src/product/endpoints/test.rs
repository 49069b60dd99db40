use crate::test::caller;
use actix_http::StatusCode;
use actix_web::test::TestRequest;
use ortserver_test_context::{call::CallService, OrtServerContext};
use serde_json::{json, Value};
use test_context::test_context;
use test_log::test;

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn repositories(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let id = hierarchy.product.id;

    let request = TestRequest::post()
        .uri(&format!("/api/v1/products/{id}/repositories"))
        .set_json(json!({"type": "SUBVERSION", "url": "https://example.org/svn/acme"}))
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(StatusCode::CREATED, response.status());
    let created: Value = actix_web::test::read_body_json(response).await;
    assert_eq!(json!(hierarchy.organization.id), created["organization_id"]);

    let request = TestRequest::get()
        .uri(&format!("/api/v1/products/{id}/repositories?sort=-url"))
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!(2), response["total_count"]);
    assert_eq!(created, response["data"][0]);

    let request = TestRequest::post()
        .uri(&format!("/api/v1/products/{id}/repositories"))
        .set_json(json!({"type": "UNKNOWN", "url": "https://example.org/unknown"}))
        .to_request();
    assert_eq!(StatusCode::BAD_REQUEST, app.call_service(request).await.status());

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn update_and_delete(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let id = hierarchy.product.id;

    let request = TestRequest::patch()
        .uri(&format!("/api/v1/products/{id}"))
        .set_json(json!({"name": "renamed"}))
        .to_request();
    let updated: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!("renamed"), updated["name"]);

    let request = TestRequest::delete()
        .uri(&format!("/api/v1/products/{id}"))
        .to_request();
    assert_eq!(StatusCode::NO_CONTENT, app.call_service(request).await.status());

    let request = TestRequest::get()
        .uri(&format!("/api/v1/repositories/{}", hierarchy.repository.id))
        .to_request();
    assert_eq!(StatusCode::NOT_FOUND, app.call_service(request).await.status());

    let request = TestRequest::delete()
        .uri(&format!("/api/v1/products/{id}"))
        .to_request();
    assert_eq!(StatusCode::NOT_FOUND, app.call_service(request).await.status());

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn groups(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let id = ctx.create_hierarchy("acme").await?.product.id;

    let request = TestRequest::put()
        .uri(&format!("/api/v1/products/{id}/groups/readers"))
        .set_json(json!({"username": "alice"}))
        .to_request();
    assert_eq!(StatusCode::NO_CONTENT, app.call_service(request).await.status());

    let request = TestRequest::delete()
        .uri(&format!("/api/v1/products/{id}/groups/owners"))
        .set_json(json!({"username": "alice"}))
        .to_request();
    assert_eq!(StatusCode::NOT_FOUND, app.call_service(request).await.status());

    Ok(())
}
