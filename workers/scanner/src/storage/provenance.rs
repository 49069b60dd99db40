use super::StorageError;
use async_trait::async_trait;
use ortserver_module_ingestor::graph::{scanner::ProvenanceSource, Graph};
use ortserver_ort_model::{
    self as ort, NestedProvenanceStorage, PackageProvenanceStorage, ScanStorageError,
};
use ortserver_worker_common::mapping::{MapToModel, MapToOrt};
use sea_orm::TransactionTrait;
use tracing::instrument;

/// The resolved provenances of packages, per source artifact or repository.
#[derive(Debug, Clone)]
pub struct OrtServerPackageProvenanceStorage {
    graph: Graph,
}

/// The source a provenance was resolved from, in the toolkit's model.
enum Source<'a> {
    Artifact(&'a ort::RemoteArtifact),
    Vcs(&'a ort::VcsInfo),
}

impl OrtServerPackageProvenanceStorage {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    async fn read_provenance(
        &self,
        id: &ort::Identifier,
        source: Source<'_>,
    ) -> Result<Option<ort::PackageProvenanceResolutionResult>, StorageError> {
        let identifier = id.map_to_model()?;

        let resolution = match source {
            Source::Artifact(artifact) => {
                let artifact = artifact.map_to_model()?;
                self.graph
                    .get_package_provenance(
                        &identifier,
                        ProvenanceSource::Artifact(&artifact),
                        self.graph.db(),
                    )
                    .await?
            }
            Source::Vcs(vcs) => {
                let vcs = vcs.map_to_model()?;
                self.graph
                    .get_package_provenance(&identifier, ProvenanceSource::Vcs(&vcs), self.graph.db())
                    .await?
            }
        };

        Ok(resolution.map(|resolution| resolution.map_to_ort()))
    }

    #[instrument(skip(self, source, result), err)]
    async fn put_provenance(
        &self,
        id: &ort::Identifier,
        source: Source<'_>,
        result: &ort::PackageProvenanceResolutionResult,
    ) -> Result<(), StorageError> {
        let identifier = id.map_to_model()?;
        let resolution = result.map_to_model()?;

        let tx = self.graph.db().begin().await?;
        match source {
            Source::Artifact(artifact) => {
                let artifact = artifact.map_to_model()?;
                self.graph
                    .put_package_provenance(
                        &identifier,
                        ProvenanceSource::Artifact(&artifact),
                        &resolution,
                        &tx,
                    )
                    .await?;
            }
            Source::Vcs(vcs) => {
                let vcs = vcs.map_to_model()?;
                self.graph
                    .put_package_provenance(
                        &identifier,
                        ProvenanceSource::Vcs(&vcs),
                        &resolution,
                        &tx,
                    )
                    .await?;
            }
        }
        tx.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl PackageProvenanceStorage for OrtServerPackageProvenanceStorage {
    async fn read_provenance_for_artifact(
        &self,
        id: &ort::Identifier,
        source_artifact: &ort::RemoteArtifact,
    ) -> Result<Option<ort::PackageProvenanceResolutionResult>, ScanStorageError> {
        Ok(self
            .read_provenance(id, Source::Artifact(source_artifact))
            .await?)
    }

    async fn read_provenance_for_vcs(
        &self,
        id: &ort::Identifier,
        vcs: &ort::VcsInfo,
    ) -> Result<Option<ort::PackageProvenanceResolutionResult>, ScanStorageError> {
        Ok(self.read_provenance(id, Source::Vcs(vcs)).await?)
    }

    async fn read_provenances(
        &self,
        id: &ort::Identifier,
    ) -> Result<Vec<ort::PackageProvenanceResolutionResult>, ScanStorageError> {
        let identifier = id.map_to_model().map_err(StorageError::from)?;

        Ok(self
            .graph
            .get_package_provenances(&identifier, self.graph.db())
            .await
            .map_err(StorageError::from)?
            .map_to_ort())
    }

    async fn put_provenance_for_artifact(
        &self,
        id: &ort::Identifier,
        source_artifact: &ort::RemoteArtifact,
        result: &ort::PackageProvenanceResolutionResult,
    ) -> Result<(), ScanStorageError> {
        Ok(self
            .put_provenance(id, Source::Artifact(source_artifact), result)
            .await?)
    }

    async fn put_provenance_for_vcs(
        &self,
        id: &ort::Identifier,
        vcs: &ort::VcsInfo,
        result: &ort::PackageProvenanceResolutionResult,
    ) -> Result<(), ScanStorageError> {
        Ok(self.put_provenance(id, Source::Vcs(vcs), result).await?)
    }
}

/// The repositories nested below a root repository.
#[derive(Debug, Clone)]
pub struct OrtServerNestedProvenanceStorage {
    graph: Graph,
}

impl OrtServerNestedProvenanceStorage {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    async fn read(
        &self,
        root: &ort::RepositoryProvenance,
    ) -> Result<Option<ort::NestedProvenanceResolutionResult>, StorageError> {
        Ok(self
            .graph
            .get_nested_provenance(&root.map_to_model()?, self.graph.db())
            .await?
            .map(|resolution| resolution.map_to_ort()))
    }

    #[instrument(skip(self, result), err)]
    async fn put(
        &self,
        root: &ort::RepositoryProvenance,
        result: &ort::NestedProvenanceResolutionResult,
    ) -> Result<(), StorageError> {
        let root = root.map_to_model()?;
        let resolution = result.map_to_model()?;

        let tx = self.graph.db().begin().await?;
        self.graph
            .put_nested_provenance(&root, &resolution, &tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl NestedProvenanceStorage for OrtServerNestedProvenanceStorage {
    async fn read_nested_provenance(
        &self,
        root: &ort::RepositoryProvenance,
    ) -> Result<Option<ort::NestedProvenanceResolutionResult>, ScanStorageError> {
        Ok(self.read(root).await?)
    }

    async fn put_nested_provenance(
        &self,
        root: &ort::RepositoryProvenance,
        result: &ort::NestedProvenanceResolutionResult,
    ) -> Result<(), ScanStorageError> {
        Ok(self.put(root, result).await?)
    }
}
