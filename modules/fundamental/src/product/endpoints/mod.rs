#[cfg(test)]
mod test;

use crate::{
    authorization::AuthorizationService,
    endpoints::ListQuery,
    product::{model::UpdateProduct, service::ProductService},
    repository::model::CreateRepository,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use ortserver_common::db::Database;
use std::sync::Arc;

pub fn configure(
    config: &mut web::ServiceConfig,
    db: Database,
    authorization: Arc<dyn AuthorizationService>,
) {
    let service = ProductService::new(db, authorization);
    config
        .app_data(web::Data::new(service))
        .service(get)
        .service(update)
        .service(remove)
        .service(repositories)
        .service(create_repository)
        .service(add_to_group)
        .service(remove_from_group);
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Username {
    pub username: String,
}

#[get("/v1/products/{id}")]
/// Retrieve a product
pub async fn get(
    state: web::Data<ProductService>,
    id: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    match state.get_product(*id).await? {
        Some(product) => Ok(HttpResponse::Ok().json(product)),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}

#[patch("/v1/products/{id}")]
/// Update a product
pub async fn update(
    state: web::Data<ProductService>,
    id: web::Path<i64>,
    web::Json(request): web::Json<UpdateProduct>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(state.update_product(*id, request).await?))
}

#[delete("/v1/products/{id}")]
/// Delete a product with its repositories and their runs
pub async fn remove(
    state: web::Data<ProductService>,
    id: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    state.delete_product(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/v1/products/{id}/repositories")]
pub async fn repositories(
    state: web::Data<ProductService>,
    id: web::Path<i64>,
    web::Query(query): web::Query<ListQuery>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(state.list_repositories(*id, query.params()?).await?))
}

#[post("/v1/products/{id}/repositories")]
pub async fn create_repository(
    state: web::Data<ProductService>,
    id: web::Path<i64>,
    web::Json(request): web::Json<CreateRepository>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Created().json(state.create_repository(*id, request).await?))
}

#[put("/v1/products/{id}/groups/{group}")]
/// Add a user to one of the `readers`, `writers` or `admins` groups
pub async fn add_to_group(
    state: web::Data<ProductService>,
    path: web::Path<(i64, String)>,
    web::Json(user): web::Json<Username>,
) -> actix_web::Result<impl Responder> {
    let (id, group) = path.into_inner();
    state.add_user_to_group(&user.username, id, &group).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[delete("/v1/products/{id}/groups/{group}")]
pub async fn remove_from_group(
    state: web::Data<ProductService>,
    path: web::Path<(i64, String)>,
    web::Json(user): web::Json<Username>,
) -> actix_web::Result<impl Responder> {
    let (id, group) = path.into_inner();
    state
        .remove_user_from_group(&user.username, id, &group)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
