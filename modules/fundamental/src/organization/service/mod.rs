#[cfg(test)]
mod test;

use crate::{
    authorization::AuthorizationService,
    common::{sorted, text_condition},
    organization::model::UpdateOrganization,
    product::model::CreateProduct,
    Error,
};
use ortserver_common::{
    db::{limiter::LimiterTrait, Database},
    model::{FilterOperatorAndValue, ListQueryParameters, ListQueryResult, OrderField},
};
use ortserver_entity::{organization, product, repository};
use ortserver_model::{Organization, Product};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, IntoSimpleExpr, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set,
};
use std::sync::Arc;
use tracing::instrument;

pub struct OrganizationService {
    db: Database,
    authorization: Arc<dyn AuthorizationService>,
}

impl OrganizationService {
    pub fn new(db: Database, authorization: Arc<dyn AuthorizationService>) -> Self {
        Self { db, authorization }
    }

    /// Create an organization together with its roles.
    ///
    /// Failing to create the roles does not undo the organization, the roles can be synchronized later.
    #[instrument(skip(self), err)]
    pub async fn create_organization(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Organization, Error> {
        let organization = organization::ActiveModel {
            id: Default::default(),
            name: Set(name.to_string()),
            description: Set(description.map(ToString::to_string)),
        }
        .insert(&self.db)
        .await?;

        if let Err(err) = self
            .authorization
            .create_organization_roles(organization.id)
            .await
        {
            log::error!(
                "Error while creating roles for organization '{}': {err}",
                organization.id
            );
        }

        Ok(organization.into())
    }

    pub async fn get_organization(&self, id: i64) -> Result<Option<Organization>, Error> {
        Ok(organization::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Into::into))
    }

    #[instrument(skip(self), err)]
    pub async fn list_organizations(
        &self,
        params: ListQueryParameters,
        name: Option<FilterOperatorAndValue<String>>,
    ) -> Result<ListQueryResult<Organization>, Error> {
        self.list(params, name, None).await
    }

    /// List the organizations visible to a user.
    #[instrument(skip(self), err)]
    pub async fn list_organizations_for_user(
        &self,
        user_id: &str,
        params: ListQueryParameters,
        name: Option<FilterOperatorAndValue<String>>,
    ) -> Result<ListQueryResult<Organization>, Error> {
        let filter = self.authorization.filter_hierarchy_ids(user_id).await?;

        if filter.is_wildcard {
            return self.list(params, name, None).await;
        }

        // access to a product or repository implies seeing the organization it belongs to
        let mut visible = filter.organization_ids;
        visible.extend(
            product::Entity::find()
                .select_only()
                .column(product::Column::OrganizationId)
                .filter(
                    product::Column::Id.is_in(filter.product_ids.iter().copied()).or(
                        product::Column::Id.in_subquery(
                            repository::Entity::find()
                                .select_only()
                                .column(repository::Column::ProductId)
                                .filter(
                                    repository::Column::Id
                                        .is_in(filter.repository_ids.iter().copied()),
                                )
                                .into_query(),
                        ),
                    ),
                )
                .into_tuple::<i64>()
                .all(&self.db)
                .await?,
        );

        self.list(params, name, Some(visible.into_iter().collect()))
            .await
    }

    async fn list(
        &self,
        params: ListQueryParameters,
        name: Option<FilterOperatorAndValue<String>>,
        ids: Option<Vec<i64>>,
    ) -> Result<ListQueryResult<Organization>, Error> {
        let mut select = organization::Entity::find();

        if let Some(name) = &name {
            select = select.filter(text_condition(organization::Column::Name, name)?);
        }
        if let Some(ids) = ids {
            select = select.filter(organization::Column::Id.is_in(ids));
        }

        let select = sorted(
            select,
            &params,
            OrderField::asc("name"),
            vec![
                ("id", vec![organization::Column::Id.into_simple_expr()]),
                ("name", vec![organization::Column::Name.into_simple_expr()]),
            ],
        )?
        .order_by_asc(organization::Column::Id);

        Ok(select
            .limiting_params(&self.db, &params)
            .into_result(params)
            .await?
            .map(Into::into))
    }

    #[instrument(skip(self), err)]
    pub async fn update_organization(
        &self,
        id: i64,
        update: UpdateOrganization,
    ) -> Result<Organization, Error> {
        let current = organization::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| Error::NotFound(format!("organization {id}")))?;

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

    /// Delete an organization, which must not have any products left.
    #[instrument(skip(self), err)]
    pub async fn delete_organization(&self, id: i64) -> Result<(), Error> {
        let products = product::Entity::find()
            .filter(product::Column::OrganizationId.eq(id))
            .count(&self.db)
            .await?;

        if products > 0 {
            return Err(Error::OrganizationNotEmpty(id));
        }

        let result = organization::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(Error::NotFound(format!("organization {id}")));
        }

        if let Err(err) = self.authorization.delete_organization_roles(id).await {
            log::error!("Error while deleting roles for organization '{id}': {err}");
        }

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn create_product(
        &self,
        organization_id: i64,
        create: CreateProduct,
    ) -> Result<Product, Error> {
        if self.get_organization(organization_id).await?.is_none() {
            return Err(Error::NotFound(format!("organization {organization_id}")));
        }

        let product = product::ActiveModel {
            id: Default::default(),
            organization_id: Set(organization_id),
            name: Set(create.name),
            description: Set(create.description),
        }
        .insert(&self.db)
        .await?;

        if let Err(err) = self.authorization.create_product_roles(product.id).await {
            log::error!(
                "Error while creating roles for product '{}': {err}",
                product.id
            );
        }

        Ok(product.into())
    }

    pub async fn list_products(
        &self,
        organization_id: i64,
        params: ListQueryParameters,
    ) -> Result<ListQueryResult<Product>, Error> {
        if self.get_organization(organization_id).await?.is_none() {
            return Err(Error::NotFound(format!("organization {organization_id}")));
        }

        let select = sorted(
            product::Entity::find().filter(product::Column::OrganizationId.eq(organization_id)),
            &params,
            OrderField::asc("name"),
            vec![
                ("id", vec![product::Column::Id.into_simple_expr()]),
                ("name", vec![product::Column::Name.into_simple_expr()]),
            ],
        )?
        .order_by_asc(product::Column::Id);

        Ok(select
            .limiting_params(&self.db, &params)
            .into_result(params)
            .await?
            .map(Into::into))
    }

    /// The ids of all repositories in all products of an organization.
    pub async fn get_repository_ids(&self, organization_id: i64) -> Result<Vec<i64>, Error> {
        Ok(repository::Entity::find()
            .select_only()
            .column(repository::Column::Id)
            .filter(
                repository::Column::ProductId.in_subquery(
                    product::Entity::find()
                        .select_only()
                        .column(product::Column::Id)
                        .filter(product::Column::OrganizationId.eq(organization_id))
                        .into_query(),
                ),
            )
            .order_by_asc(repository::Column::Id)
            .into_tuple::<i64>()
            .all(&self.db)
            .await?)
    }
}
