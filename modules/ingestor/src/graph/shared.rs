//! Rows shared between runs, looked up by value and inserted when missing.

use crate::graph::{Error, Graph};
use ortserver_entity::{author, declared_license, identifier, remote_artifact, vcs_info};
use ortserver_model::runs::{Identifier, RemoteArtifact, VcsInfo};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::instrument;

impl Graph {
    pub async fn find_identifier<C: ConnectionTrait>(
        &self,
        identifier: &Identifier,
        connection: &C,
    ) -> Result<Option<identifier::Model>, Error> {
        Ok(identifier::Entity::find()
            .filter(identifier::Column::Type.eq(&identifier.r#type))
            .filter(identifier::Column::Namespace.eq(&identifier.namespace))
            .filter(identifier::Column::Name.eq(&identifier.name))
            .filter(identifier::Column::Version.eq(&identifier.version))
            .one(connection)
            .await?)
    }

    #[instrument(skip(self, connection), err(level=tracing::Level::INFO))]
    pub async fn get_or_put_identifier<C: ConnectionTrait>(
        &self,
        identifier: &Identifier,
        connection: &C,
    ) -> Result<identifier::Model, Error> {
        if let Some(found) = self.find_identifier(identifier, connection).await? {
            return Ok(found);
        }

        Ok(identifier::ActiveModel {
            id: Default::default(),
            r#type: Set(identifier.r#type.clone()),
            namespace: Set(identifier.namespace.clone()),
            name: Set(identifier.name.clone()),
            version: Set(identifier.version.clone()),
        }
        .insert(connection)
        .await?)
    }

    pub async fn find_vcs_info<C: ConnectionTrait>(
        &self,
        vcs: &VcsInfo,
        connection: &C,
    ) -> Result<Option<vcs_info::Model>, Error> {
        Ok(vcs_info::Entity::find()
            .filter(vcs_info::Column::Type.eq(vcs.r#type.as_str()))
            .filter(vcs_info::Column::Url.eq(&vcs.url))
            .filter(vcs_info::Column::Revision.eq(&vcs.revision))
            .filter(vcs_info::Column::Path.eq(&vcs.path))
            .one(connection)
            .await?)
    }

    #[instrument(skip(self, connection), err(level=tracing::Level::INFO))]
    pub async fn get_or_put_vcs_info<C: ConnectionTrait>(
        &self,
        vcs: &VcsInfo,
        connection: &C,
    ) -> Result<vcs_info::Model, Error> {
        if let Some(found) = self.find_vcs_info(vcs, connection).await? {
            return Ok(found);
        }

        Ok(vcs_info::ActiveModel {
            id: Default::default(),
            r#type: Set(vcs.r#type.as_str().to_string()),
            url: Set(vcs.url.clone()),
            revision: Set(vcs.revision.clone()),
            path: Set(vcs.path.clone()),
        }
        .insert(connection)
        .await?)
    }

    pub async fn find_remote_artifact<C: ConnectionTrait>(
        &self,
        artifact: &RemoteArtifact,
        connection: &C,
    ) -> Result<Option<remote_artifact::Model>, Error> {
        Ok(remote_artifact::Entity::find()
            .filter(remote_artifact::Column::Url.eq(&artifact.url))
            .filter(remote_artifact::Column::HashValue.eq(&artifact.hash_value))
            .filter(remote_artifact::Column::HashAlgorithm.eq(&artifact.hash_algorithm))
            .one(connection)
            .await?)
    }

    #[instrument(skip(self, connection), err(level=tracing::Level::INFO))]
    pub async fn get_or_put_remote_artifact<C: ConnectionTrait>(
        &self,
        artifact: &RemoteArtifact,
        connection: &C,
    ) -> Result<remote_artifact::Model, Error> {
        if let Some(found) = self.find_remote_artifact(artifact, connection).await? {
            return Ok(found);
        }

        Ok(remote_artifact::ActiveModel {
            id: Default::default(),
            url: Set(artifact.url.clone()),
            hash_value: Set(artifact.hash_value.clone()),
            hash_algorithm: Set(artifact.hash_algorithm.clone()),
        }
        .insert(connection)
        .await?)
    }

    pub async fn get_or_put_author<C: ConnectionTrait>(
        &self,
        name: &str,
        connection: &C,
    ) -> Result<author::Model, Error> {
        if let Some(found) = author::Entity::find()
            .filter(author::Column::Name.eq(name))
            .one(connection)
            .await?
        {
            return Ok(found);
        }

        Ok(author::ActiveModel {
            id: Default::default(),
            name: Set(name.to_string()),
        }
        .insert(connection)
        .await?)
    }

    pub async fn get_or_put_declared_license<C: ConnectionTrait>(
        &self,
        name: &str,
        connection: &C,
    ) -> Result<declared_license::Model, Error> {
        if let Some(found) = declared_license::Entity::find()
            .filter(declared_license::Column::Name.eq(name))
            .one(connection)
            .await?
        {
            return Ok(found);
        }

        Ok(declared_license::ActiveModel {
            id: Default::default(),
            name: Set(name.to_string()),
        }
        .insert(connection)
        .await?)
    }

    pub async fn load_identifier<C: ConnectionTrait>(
        &self,
        id: i64,
        connection: &C,
    ) -> Result<Identifier, Error> {
        identifier::Entity::find_by_id(id)
            .one(connection)
            .await?
            .map(Into::into)
            .ok_or_else(|| Error::NotFound(format!("identifier {id}")))
    }

    pub async fn load_vcs_info<C: ConnectionTrait>(
        &self,
        id: i64,
        connection: &C,
    ) -> Result<VcsInfo, Error> {
        let model = vcs_info::Entity::find_by_id(id)
            .one(connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("VCS info {id}")))?;

        Ok(model.try_into()?)
    }

    pub async fn load_remote_artifact<C: ConnectionTrait>(
        &self,
        id: i64,
        connection: &C,
    ) -> Result<RemoteArtifact, Error> {
        remote_artifact::Entity::find_by_id(id)
            .one(connection)
            .await?
            .map(Into::into)
            .ok_or_else(|| Error::NotFound(format!("remote artifact {id}")))
    }
}
