
use crate::{
    authorization::AuthorizationService,
    repository::model::UpdateRepository,
    run::service::OrtRunService,
    Error,
};
use ortserver_common::{
    db::Database,
    model::{FilterOperatorAndValue, ListQueryParameters, ListQueryResult},
};
use ortserver_entity::{organization, ort_run, product, repository};
use ortserver_model::{Hierarchy, OrtRun, OrtRunStatus, Repository};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;

pub struct RepositoryService {
    db: Database,
    runs: OrtRunService,
    authorization: Arc<dyn AuthorizationService>,
}

impl RepositoryService {
    pub fn new(db: Database, authorization: Arc<dyn AuthorizationService>) -> Self {
        Self {
            runs: OrtRunService::new(db.clone()),
            db,
            authorization,
        }
    }

    async fn organization_id<C: ConnectionTrait>(
        product_id: i64,
        connection: &C,
    ) -> Result<i64, Error> {
        Ok(product::Entity::find_by_id(product_id)
            .one(connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("product {product_id}")))?
            .organization_id)
    }

    pub async fn get_repository(&self, id: i64) -> Result<Option<Repository>, Error> {
        match repository::Entity::find_by_id(id).one(&self.db).await? {
            Some(repository) => {
                let organization_id = Self::organization_id(repository.product_id, &self.db).await?;
                Ok(Some(Repository::from_model(repository, organization_id)))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    pub async fn update_repository(
        &self,
        id: i64,
        update: UpdateRepository,
    ) -> Result<Repository, Error> {
        let current = repository::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| Error::NotFound(format!("repository {id}")))?;
        let organization_id = Self::organization_id(current.product_id, &self.db).await?;

        let mut model = current.clone().into_active_model();
        if let Some(r#type) = update.r#type.into_option() {
            model.r#type = Set(repository::RepositoryType::try_from(r#type)?);
        }
        update.url.if_present(|url| model.url = Set(url));
        update
            .description
            .if_present(|description| model.description = Set(description));

        let repository = match model.is_changed() {
            true => model.update(&self.db).await?,
            false => current,
        };

        Ok(Repository::from_model(repository, organization_id))
    }

    /// Delete a repository with all of its runs, then its roles.
    #[instrument(skip(self), err)]
    pub async fn delete_repository(&self, id: i64) -> Result<(), Error> {
        let tx = self.db.begin().await?;

        let runs = ort_run::Entity::delete_many()
            .filter(ort_run::Column::RepositoryId.eq(id))
            .exec(&tx)
            .await?;

        let result = repository::Entity::delete_by_id(id).exec(&tx).await?;
        if result.rows_affected == 0 {
            return Err(Error::NotFound(format!("repository {id}")));
        }

        tx.commit().await?;
        log::debug!("Deleted repository {id} with {} runs", runs.rows_affected);

        if let Err(err) = self.authorization.delete_repository_roles(id).await {
            log::error!("Error while deleting roles for repository '{id}': {err}");
        }

        Ok(())
    }

    pub async fn list_ort_runs(
        &self,
        repository_id: i64,
        params: ListQueryParameters,
        status: Option<FilterOperatorAndValue<Vec<OrtRunStatus>>>,
    ) -> Result<ListQueryResult<OrtRun>, Error> {
        if self.get_repository(repository_id).await?.is_none() {
            return Err(Error::NotFound(format!("repository {repository_id}")));
        }

        self.runs.list_ort_runs(repository_id, params, status).await
    }

    pub async fn get_ort_run_by_index(
        &self,
        repository_id: i64,
        index: i64,
    ) -> Result<Option<OrtRun>, Error> {
        self.runs.get_ort_run_by_index(repository_id, index).await
    }

    /// The product and organization a repository belongs to.
    pub async fn get_hierarchy(&self, repository_id: i64) -> Result<Hierarchy, Error> {
        let repository = repository::Entity::find_by_id(repository_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| Error::NotFound(format!("repository {repository_id}")))?;

        let product = product::Entity::find_by_id(repository.product_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| Error::NotFound(format!("product {}", repository.product_id)))?;

        let organization = organization::Entity::find_by_id(product.organization_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("organization {}", product.organization_id))
            })?;

        Ok(Hierarchy {
            repository: Repository::from_model(repository, organization.id),
            product: product.into(),
            organization: organization.into(),
        })
    }
}
