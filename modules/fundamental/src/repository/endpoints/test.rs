use crate::test::caller;
use actix_http::StatusCode;
use actix_web::test::TestRequest;
use ortserver_common::model::OptionalValue;
use ortserver_test_context::{call::CallService, OrtServerContext};
use serde_json::{json, Value};
use test_context::test_context;
use test_log::test;

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn get_update_delete(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let id = hierarchy.repository.id;

    let request = TestRequest::get()
        .uri(&format!("/api/v1/repositories/{id}"))
        .to_request();
    let fetched: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!("GIT"), fetched["type"]);
    assert_eq!(json!(hierarchy.product.id), fetched["product_id"]);

    let request = TestRequest::patch()
        .uri(&format!("/api/v1/repositories/{id}"))
        .set_json(json!({"type": "MERCURIAL", "description": "moved"}))
        .to_request();
    let updated: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!("MERCURIAL"), updated["type"]);
    assert_eq!(json!("moved"), updated["description"]);
    assert_eq!(fetched["url"], updated["url"]);

    ctx.create_run(id, 1).await?;

    let request = TestRequest::delete()
        .uri(&format!("/api/v1/repositories/{id}"))
        .to_request();
    assert_eq!(StatusCode::NO_CONTENT, app.call_service(request).await.status());

    let request = TestRequest::get()
        .uri(&format!("/api/v1/repositories/{id}/runs"))
        .to_request();
    assert_eq!(StatusCode::NOT_FOUND, app.call_service(request).await.status());

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(actix_web::test)]
async fn runs(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let id = ctx.create_hierarchy("acme").await?.repository.id;

    let runs = crate::run::service::OrtRunService::new(ctx.db.clone());
    for index in 1..=3 {
        ctx.create_run(id, index).await?;
    }
    let failed = runs
        .update_ort_run(
            ctx.create_run(id, 4).await?.id,
            crate::run::model::UpdateOrtRun {
                status: OptionalValue::Present(ortserver_model::OrtRunStatus::Failed),
                ..Default::default()
            },
        )
        .await?;

    let request = TestRequest::get()
        .uri(&format!("/api/v1/repositories/{id}/runs?sort=-index&limit=2"))
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!(4), response["total_count"]);
    assert_eq!(json!(4), response["data"][0]["index"]);
    assert_eq!(json!(3), response["data"][1]["index"]);

    let request = TestRequest::get()
        .uri(&format!("/api/v1/repositories/{id}/runs?status=FAILED,FINISHED"))
        .to_request();
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!(1), response["total_count"]);
    assert_eq!(json!(failed.id), response["data"][0]["id"]);

    let request = TestRequest::get()
        .uri(&format!("/api/v1/repositories/{id}/runs?status=BROKEN"))
        .to_request();
    assert_eq!(StatusCode::BAD_REQUEST, app.call_service(request).await.status());

    let request = TestRequest::get()
        .uri(&format!("/api/v1/repositories/{id}/runs/2"))
        .to_request();
    let run: Value = app.call_and_read_body_json(request).await;
    assert_eq!(json!(2), run["index"]);

    let request = TestRequest::get()
        .uri(&format!("/api/v1/repositories/{id}/runs/9"))
        .to_request();
    assert_eq!(StatusCode::NOT_FOUND, app.call_service(request).await.status());

    Ok(())
}
