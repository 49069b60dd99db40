#[cfg(test)]
mod test;

use crate::{
    authorization::{AuthorizationService, Group},
    common::sorted,
    product::model::UpdateProduct,
    repository::model::CreateRepository,
    Error,
};
use ortserver_common::{
    db::{limiter::LimiterTrait, Database},
    model::{ListQueryParameters, ListQueryResult, OrderField},
};
use ortserver_entity::{ort_run, product, repository};
use ortserver_model::{Product, Repository};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, IntoSimpleExpr, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;

pub struct ProductService {
    db: Database,
    authorization: Arc<dyn AuthorizationService>,
}

impl ProductService {
    pub fn new(db: Database, authorization: Arc<dyn AuthorizationService>) -> Self {
        Self { db, authorization }
    }

    pub async fn get_product(&self, id: i64) -> Result<Option<Product>, Error> {
        Ok(product::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Into::into))
    }

    async fn require_product(&self, id: i64) -> Result<product::Model, Error> {
        product::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| Error::NotFound(format!("product {id}")))
    }

    #[instrument(skip(self), err)]
    pub async fn update_product(&self, id: i64, update: UpdateProduct) -> Result<Product, Error> {
        let current = self.require_product(id).await?;

        let mut model = current.clone().into_active_model();
        update.name.if_present(|name| model.name = Set(name));
        update
            .description
            .if_present(|description| model.description = Set(description));

        if !model.is_changed() {
            return Ok(current.into());
        }

        Ok(model.update(&self.db).await?.into())
    }

    /// Delete a product with all of its repositories and their runs.
    #[instrument(skip(self), err)]
    pub async fn delete_product(&self, id: i64) -> Result<(), Error> {
        let tx = self.db.begin().await?;

        let repository_ids = repository::Entity::find()
            .select_only()
            .column(repository::Column::Id)
            .filter(repository::Column::ProductId.eq(id))
            .into_tuple::<i64>()
            .all(&tx)
            .await?;

        let runs = ort_run::Entity::delete_many()
            .filter(ort_run::Column::RepositoryId.is_in(repository_ids.iter().copied()))
            .exec(&tx)
            .await?;
        log::debug!("Deleted {} runs of product {id}", runs.rows_affected);

        repository::Entity::delete_many()
            .filter(repository::Column::ProductId.eq(id))
            .exec(&tx)
            .await?;

        let result = product::Entity::delete_by_id(id).exec(&tx).await?;
        if result.rows_affected == 0 {
            return Err(Error::NotFound(format!("product {id}")));
        }

        tx.commit().await?;

        for repository_id in repository_ids {
            if let Err(err) = self
                .authorization
                .delete_repository_roles(repository_id)
                .await
            {
                log::error!("Error while deleting roles for repository '{repository_id}': {err}");
            }
        }

        if let Err(err) = self.authorization.delete_product_roles(id).await {
            log::error!("Error while deleting roles for product '{id}': {err}");
        }

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn create_repository(
        &self,
        product_id: i64,
        create: CreateRepository,
    ) -> Result<Repository, Error> {
        let product = self.require_product(product_id).await?;

        let repository = repository::ActiveModel {
            id: Default::default(),
            product_id: Set(product_id),
            r#type: Set(repository::RepositoryType::try_from(create.r#type)?),
            url: Set(create.url),
            description: Set(create.description),
        }
        .insert(&self.db)
        .await?;

        if let Err(err) = self
            .authorization
            .create_repository_roles(repository.id)
            .await
        {
            log::error!(
                "Error while creating roles for repository '{}': {err}",
                repository.id
            );
        }

        Ok(Repository::from_model(repository, product.organization_id))
    }

    pub async fn list_repositories(
        &self,
        product_id: i64,
        params: ListQueryParameters,
    ) -> Result<ListQueryResult<Repository>, Error> {
        let product = self.require_product(product_id).await?;

        let select = sorted(
            repository::Entity::find().filter(repository::Column::ProductId.eq(product_id)),
            &params,
            OrderField::asc("url"),
            vec![
                ("id", vec![repository::Column::Id.into_simple_expr()]),
                ("url", vec![repository::Column::Url.into_simple_expr()]),
                ("type", vec![repository::Column::Type.into_simple_expr()]),
            ],
        )?
        .order_by_asc(repository::Column::Id);

        Ok(select
            .limiting_params(&self.db, &params)
            .into_result(params)
            .await?
            .map(|repository| Repository::from_model(repository, product.organization_id)))
    }

    /// Add a user to one of the groups of a product, `group_id` being e.g. `readers`.
    #[instrument(skip(self), err)]
    pub async fn add_user_to_group(
        &self,
        username: &str,
        product_id: i64,
        group_id: &str,
    ) -> Result<(), Error> {
        let group = self.product_group(product_id, group_id).await?;
        Ok(self
            .authorization
            .add_user_to_group(username, &group)
            .await?)
    }

    #[instrument(skip(self), err)]
    pub async fn remove_user_from_group(
        &self,
        username: &str,
        product_id: i64,
        group_id: &str,
    ) -> Result<(), Error> {
        let group = self.product_group(product_id, group_id).await?;
        Ok(self
            .authorization
            .remove_user_from_group(username, &group)
            .await?)
    }

    async fn product_group(&self, product_id: i64, group_id: &str) -> Result<String, Error> {
        self.require_product(product_id).await?;

        let group = Group::parse(group_id)
            .ok_or_else(|| Error::NotFound(format!("group '{group_id}'")))?;

        Ok(group.product_group(product_id))
    }

    pub async fn get_repository_ids(&self, product_id: i64) -> Result<Vec<i64>, Error> {
        Ok(repository::Entity::find()
            .select_only()
            .column(repository::Column::Id)
            .filter(repository::Column::ProductId.eq(product_id))
            .order_by_asc(repository::Column::Id)
            .into_tuple::<i64>()
            .all(&self.db)
            .await?)
    }
}
