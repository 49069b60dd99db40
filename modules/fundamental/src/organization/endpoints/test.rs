use crate::test::caller;
use actix_http::StatusCode;
use actix_web::test::TestRequest;
use ortserver_test_context::{call::CallService, OrtServerContext};
use serde_json::{json, Value};
use test_context::test_context;
use test_log::test;

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn crud(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;

    let request = TestRequest::post()
        .uri("/api/v1/organizations")
        .set_json(json!({"name": "acme", "description": "The ACME corporation"}))
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(StatusCode::CREATED, response.status());
    let created: Value = actix_web::test::read_body_json(response).await;
    let id = created["id"].as_i64().unwrap_or_default();

    let request = TestRequest::patch()
        .uri(&format!("/api/v1/organizations/{id}"))
        .set_json(json!({"description": null}))
        .to_request();
    let updated: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!("acme"), updated["name"]);
    assert_eq!(Value::Null, updated["description"]);

    let request = TestRequest::get()
        .uri(&format!("/api/v1/organizations/{id}"))
        .to_request();
    let fetched: Value = app.call_and_read_body_json(request).await;
    assert_eq!(updated, fetched);

    let request = TestRequest::delete()
        .uri(&format!("/api/v1/organizations/{id}"))
        .to_request();
    assert_eq!(StatusCode::NO_CONTENT, app.call_service(request).await.status());

    let request = TestRequest::get()
        .uri(&format!("/api/v1/organizations/{id}"))
        .to_request();
    assert_eq!(StatusCode::NOT_FOUND, app.call_service(request).await.status());

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn list_filtered(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    for name in ["acme", "ACME labs", "globex"] {
        ctx.create_hierarchy(name).await?;
    }

    let request = TestRequest::get()
        .uri("/api/v1/organizations?filter=acme&sort=-name&limit=1")
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;

    assert_eq!(json!(2), response["total_count"]);
    assert_eq!(json!("acme"), response["data"][0]["name"]);
    assert_eq!(1, response["data"].as_array().map(Vec::len).unwrap_or_default());

    let request = TestRequest::get()
        .uri("/api/v1/organizations?sort=color")
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status());
    let error: Value = actix_web::test::read_body_json(response).await;
    assert_eq!(json!("Query error"), error["error"]);

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn products(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let id = hierarchy.organization.id;

    let request = TestRequest::post()
        .uri(&format!("/api/v1/organizations/{id}/products"))
        .set_json(json!({"name": "another"}))
        .to_request();
    assert_eq!(StatusCode::CREATED, app.call_service(request).await.status());

    let request = TestRequest::get()
        .uri(&format!("/api/v1/organizations/{id}/products?sort=-name"))
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!(2), response["total_count"]);
    assert_eq!(json!("another"), response["data"][0]["name"]);

    // products are left
    let request = TestRequest::delete()
        .uri(&format!("/api/v1/organizations/{id}"))
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(StatusCode::CONFLICT, response.status());
    let error: Value = actix_web::test::read_body_json(response).await;
    assert_eq!(json!("OrganizationNotEmpty"), error["error"]);

    let request = TestRequest::get()
        .uri(&format!("/api/v1/organizations/{}/products", id + 100))
        .to_request();
    assert_eq!(StatusCode::NOT_FOUND, app.call_service(request).await.status());

    Ok(())
}
