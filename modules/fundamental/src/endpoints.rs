use crate::{authorization::AuthorizationService, Error};
use actix_web::web;
use ortserver_common::{
    db::Database,
    model::{ComparisonOperator, FilterOperatorAndValue, ListQueryParameters},
};
use std::sync::Arc;

pub fn configure(
    svc: &mut web::ServiceConfig,
    db: Database,
    authorization: Arc<dyn AuthorizationService>,
) {
    crate::organization::endpoints::configure(svc, db.clone(), authorization.clone());
    crate::product::endpoints::configure(svc, db.clone(), authorization.clone());
    crate::repository::endpoints::configure(svc, db.clone(), authorization);
    crate::run::endpoints::configure(svc, db.clone());
    crate::package::endpoints::configure(svc, db.clone());
    crate::project::endpoints::configure(svc, db.clone());
    crate::issue::endpoints::configure(svc, db);
}

/// Paging and sorting as given in the query string, e.g. `?sort=-index&limit=10`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl ListQuery {
    pub fn params(&self) -> Result<ListQueryParameters, Error> {
        Ok(ListQueryParameters::parse(
            self.sort.as_deref(),
            self.limit,
            self.offset,
        )?)
    }
}

/// A case-insensitive substring filter, if a non-empty value was given.
pub fn ilike_filter(value: Option<&str>) -> Option<FilterOperatorAndValue<String>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| FilterOperatorAndValue::new(ComparisonOperator::Ilike, value.to_string()))
}

/// Split a comma separated list of values, e.g. `FAILED,FINISHED`.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .collect()
}
