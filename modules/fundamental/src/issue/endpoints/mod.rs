#[cfg(test)]
mod test;

use crate::{endpoints::ListQuery, issue::service::IssueService};
use actix_web::{get, web, HttpResponse, Responder};
use ortserver_common::db::Database;

pub fn configure(config: &mut web::ServiceConfig, db: Database) {
    let service = IssueService::new(db);
    config
        .app_data(web::Data::new(service))
        .service(all)
        .service(severities);
}

#[get("/v1/runs/{id}/issues")]
/// List the issues of a run, newest first unless sorted otherwise
pub async fn all(
    state: web::Data<IssueService>,
    id: web::Path<i64>,
    web::Query(query): web::Query<ListQuery>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(state.list_for_run(*id, query.params()?).await?))
}

#[get("/v1/runs/{id}/issues/severities")]
/// The number of issues per severity, including severities without issues
pub async fn severities(
    state: web::Data<IssueService>,
    id: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(state.count_by_severity(*id).await?))
}
