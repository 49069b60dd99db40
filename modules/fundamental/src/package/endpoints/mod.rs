#[cfg(test)]
mod test;

use crate::{
    endpoints::{ilike_filter, split_list, ListQuery},
    package::{model::PackageFilters, service::PackageService},
    Error,
};
use actix_web::{get, web, HttpResponse, Responder};
use ortserver_common::{
    db::Database,
    model::{ComparisonOperator, FilterOperatorAndValue},
};
use serde_json::json;

pub fn configure(config: &mut web::ServiceConfig, db: Database) {
    let service = PackageService::new(db);
    config
        .app_data(web::Data::new(service))
        .service(all)
        .service(count)
        .service(licenses);
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageQuery {
    /// Part of `type:namespace:name:version`, ignoring case
    #[serde(default)]
    pub identifier: Option<String>,
    /// Part of the purl, ignoring case
    #[serde(default)]
    pub purl: Option<String>,
    /// Comma separated processed licenses to include
    #[serde(default)]
    pub license: Option<String>,
    /// Comma separated processed licenses to exclude
    #[serde(default)]
    pub exclude_license: Option<String>,
}

impl TryFrom<PackageQuery> for PackageFilters {
    type Error = Error;

    fn try_from(value: PackageQuery) -> Result<Self, Self::Error> {
        let processed_declared_license = match (value.license, value.exclude_license) {
            (Some(_), Some(_)) => {
                return Err(Error::BadRequest(
                    "'license' and 'excludeLicense' cannot be combined".into(),
                ))
            }
            (Some(included), None) => Some(FilterOperatorAndValue::new(
                ComparisonOperator::In,
                split_list(&included),
            )),
            (None, Some(excluded)) => Some(FilterOperatorAndValue::new(
                ComparisonOperator::NotIn,
                split_list(&excluded),
            )),
            (None, None) => None,
        };

        Ok(Self {
            identifier: ilike_filter(value.identifier.as_deref()),
            purl: ilike_filter(value.purl.as_deref()),
            processed_declared_license,
        })
    }
}

#[get("/v1/runs/{id}/packages")]
/// List the packages found by the analyzer of a run
pub async fn all(
    state: web::Data<PackageService>,
    id: web::Path<i64>,
    web::Query(query): web::Query<ListQuery>,
    web::Query(filters): web::Query<PackageQuery>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(
        state
            .list_for_run(*id, query.params()?, filters.try_into()?)
            .await?,
    ))
}

#[get("/v1/runs/{id}/packages/count")]
pub async fn count(
    state: web::Data<PackageService>,
    id: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(json!({"count": state.count_for_run(*id).await?})))
}

#[get("/v1/runs/{id}/packages/licenses")]
/// The number of packages per processed declared license
pub async fn licenses(
    state: web::Data<PackageService>,
    id: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(state.count_by_license(*id).await?))
}
