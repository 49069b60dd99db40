#[cfg(test)]
mod test;

use crate::{
    authorization::AuthorizationService,
    endpoints::{split_list, ListQuery},
    repository::{model::UpdateRepository, service::RepositoryService},
    Error,
};
use actix_web::{delete, get, patch, web, HttpResponse, Responder};
use ortserver_common::{
    db::Database,
    model::{ComparisonOperator, FilterOperatorAndValue},
};
use ortserver_model::OrtRunStatus;
use std::sync::Arc;

pub fn configure(
    config: &mut web::ServiceConfig,
    db: Database,
    authorization: Arc<dyn AuthorizationService>,
) {
    let service = RepositoryService::new(db, authorization);
    config
        .app_data(web::Data::new(service))
        .service(get)
        .service(update)
        .service(remove)
        .service(runs)
        .service(run_by_index);
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct StatusFilter {
    /// Comma separated run states, e.g. `FAILED,FINISHED_WITH_ISSUES`
    #[serde(default)]
    pub status: Option<String>,
}

impl StatusFilter {
    fn into_filter(self) -> Result<Option<FilterOperatorAndValue<Vec<OrtRunStatus>>>, Error> {
        let Some(status) = self.status else {
            return Ok(None);
        };

        let states = split_list(&status)
            .iter()
            .map(|state| state.parse::<OrtRunStatus>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(FilterOperatorAndValue::new(
            ComparisonOperator::In,
            states,
        )))
    }
}

#[get("/v1/repositories/{id}")]
/// Retrieve a repository
pub async fn get(
    state: web::Data<RepositoryService>,
    id: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    match state.get_repository(*id).await? {
        Some(repository) => Ok(HttpResponse::Ok().json(repository)),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}

#[patch("/v1/repositories/{id}")]
pub async fn update(
    state: web::Data<RepositoryService>,
    id: web::Path<i64>,
    web::Json(request): web::Json<UpdateRepository>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(state.update_repository(*id, request).await?))
}

#[delete("/v1/repositories/{id}")]
/// Delete a repository with all of its runs
pub async fn remove(
    state: web::Data<RepositoryService>,
    id: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    state.delete_repository(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/v1/repositories/{id}/runs")]
/// List the runs of a repository
pub async fn runs(
    state: web::Data<RepositoryService>,
    id: web::Path<i64>,
    web::Query(query): web::Query<ListQuery>,
    web::Query(status): web::Query<StatusFilter>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(
        state
            .list_ort_runs(*id, query.params()?, status.into_filter()?)
            .await?,
    ))
}

#[get("/v1/repositories/{id}/runs/{index}")]
/// Retrieve a run by its index within the repository
pub async fn run_by_index(
    state: web::Data<RepositoryService>,
    path: web::Path<(i64, i64)>,
) -> actix_web::Result<impl Responder> {
    let (id, index) = path.into_inner();
    match state.get_ort_run_by_index(id, index).await? {
        Some(run) => Ok(HttpResponse::Ok().json(run)),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}
