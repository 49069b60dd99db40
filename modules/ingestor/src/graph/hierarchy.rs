use crate::graph::{Error, Graph};
use ortserver_entity::{organization, ort_run, product, repository};
use ortserver_model::{Hierarchy, Organization, OrtRun, Product, Repository};
use sea_orm::{ConnectionTrait, EntityTrait};

impl Graph {
    pub async fn get_ort_run<C: ConnectionTrait>(
        &self,
        id: i64,
        connection: &C,
    ) -> Result<Option<OrtRun>, Error> {
        Ok(ort_run::Entity::find_by_id(id)
            .one(connection)
            .await?
            .map(Into::into))
    }

    /// Resolve the repository, product and organization an ORT run belongs to.
    pub async fn get_hierarchy_for_run<C: ConnectionTrait>(
        &self,
        ort_run_id: i64,
        connection: &C,
    ) -> Result<Hierarchy, Error> {
        let run = ort_run::Entity::find_by_id(ort_run_id)
            .one(connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("ORT run {ort_run_id}")))?;

        let repository = repository::Entity::find_by_id(run.repository_id)
            .one(connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("repository {}", run.repository_id)))?;

        let product: Product = product::Entity::find_by_id(repository.product_id)
            .one(connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("product {}", repository.product_id)))?
            .into();

        let organization: Organization = organization::Entity::find_by_id(product.organization_id)
            .one(connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("organization {}", product.organization_id)))?
            .into();

        Ok(Hierarchy {
            repository: Repository::from_model(repository, organization.id),
            product,
            organization,
        })
    }
}
