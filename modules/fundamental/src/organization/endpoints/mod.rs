#[cfg(test)]
mod test;

use crate::{
    authorization::AuthorizationService,
    endpoints::{ilike_filter, ListQuery},
    organization::{
        model::{CreateOrganization, UpdateOrganization},
        service::OrganizationService,
    },
    product::model::CreateProduct,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use ortserver_common::db::Database;
use std::sync::Arc;

pub fn configure(
    config: &mut web::ServiceConfig,
    db: Database,
    authorization: Arc<dyn AuthorizationService>,
) {
    let service = OrganizationService::new(db, authorization);
    config
        .app_data(web::Data::new(service))
        .service(all)
        .service(create)
        .service(get)
        .service(update)
        .service(remove)
        .service(products)
        .service(create_product);
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NameFilter {
    /// Part of the name, ignoring case
    #[serde(default)]
    pub filter: Option<String>,
}

#[get("/v1/organizations")]
/// List organizations
pub async fn all(
    state: web::Data<OrganizationService>,
    web::Query(query): web::Query<ListQuery>,
    web::Query(name): web::Query<NameFilter>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(
        state
            .list_organizations(query.params()?, ilike_filter(name.filter.as_deref()))
            .await?,
    ))
}

#[post("/v1/organizations")]
/// Create an organization
pub async fn create(
    state: web::Data<OrganizationService>,
    web::Json(request): web::Json<CreateOrganization>,
) -> actix_web::Result<impl Responder> {
    let organization = state
        .create_organization(&request.name, request.description.as_deref())
        .await?;
    Ok(HttpResponse::Created().json(organization))
}

#[get("/v1/organizations/{id}")]
/// Retrieve an organization
pub async fn get(
    state: web::Data<OrganizationService>,
    id: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    match state.get_organization(*id).await? {
        Some(organization) => Ok(HttpResponse::Ok().json(organization)),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}

#[patch("/v1/organizations/{id}")]
/// Update an organization, fields missing from the body are kept
pub async fn update(
    state: web::Data<OrganizationService>,
    id: web::Path<i64>,
    web::Json(request): web::Json<UpdateOrganization>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(state.update_organization(*id, request).await?))
}

#[delete("/v1/organizations/{id}")]
/// Delete an organization without products
pub async fn remove(
    state: web::Data<OrganizationService>,
    id: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    state.delete_organization(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/v1/organizations/{id}/products")]
/// List the products of an organization
pub async fn products(
    state: web::Data<OrganizationService>,
    id: web::Path<i64>,
    web::Query(query): web::Query<ListQuery>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(state.list_products(*id, query.params()?).await?))
}

#[post("/v1/organizations/{id}/products")]
/// Create a product in an organization
pub async fn create_product(
    state: web::Data<OrganizationService>,
    id: web::Path<i64>,
    web::Json(request): web::Json<CreateProduct>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Created().json(state.create_product(*id, request).await?))
}
