#[cfg(test)]
mod test;

use crate::{endpoints::ListQuery, project::service::ProjectService};
use actix_web::{get, web, HttpResponse, Responder};
use ortserver_common::db::Database;
use serde_json::json;

pub fn configure(config: &mut web::ServiceConfig, db: Database) {
    let service = ProjectService::new(db);
    config
        .app_data(web::Data::new(service))
        .service(all)
        .service(count);
}

#[get("/v1/runs/{id}/projects")]
/// List the projects found by the analyzer of a run
pub async fn all(
    state: web::Data<ProjectService>,
    id: web::Path<i64>,
    web::Query(query): web::Query<ListQuery>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(state.list_for_run(*id, query.params()?).await?))
}

#[get("/v1/runs/{id}/projects/count")]
pub async fn count(
    state: web::Data<ProjectService>,
    id: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(json!({"count": state.count_for_run(*id).await?})))
}
