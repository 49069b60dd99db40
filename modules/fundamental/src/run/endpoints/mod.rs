#[cfg(test)]
mod test;

use crate::run::{
    model::{CreateOrtRun, UpdateOrtRun},
    service::OrtRunService,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use ortserver_common::db::Database;

pub fn configure(config: &mut web::ServiceConfig, db: Database) {
    let service = OrtRunService::new(db);
    config
        .app_data(web::Data::new(service))
        .service(create)
        .service(get)
        .service(update)
        .service(remove)
        .service(jobs);
}

#[post("/v1/repositories/{id}/runs")]
/// Trigger a new run of a repository
pub async fn create(
    state: web::Data<OrtRunService>,
    id: web::Path<i64>,
    web::Json(request): web::Json<CreateOrtRun>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Created().json(state.create_ort_run(*id, request).await?))
}

#[get("/v1/runs/{id}")]
pub async fn get(
    state: web::Data<OrtRunService>,
    id: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    match state.get_ort_run(*id).await? {
        Some(run) => Ok(HttpResponse::Ok().json(run)),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}

#[patch("/v1/runs/{id}")]
/// Report the progress of a run
pub async fn update(
    state: web::Data<OrtRunService>,
    id: web::Path<i64>,
    web::Json(request): web::Json<UpdateOrtRun>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(state.update_ort_run(*id, request).await?))
}

#[delete("/v1/runs/{id}")]
pub async fn remove(
    state: web::Data<OrtRunService>,
    id: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    state.delete_ort_run(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/v1/runs/{id}/jobs")]
/// The jobs of a run, in the order they were created
pub async fn jobs(
    state: web::Data<OrtRunService>,
    id: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(state.list_jobs(*id).await?))
}
