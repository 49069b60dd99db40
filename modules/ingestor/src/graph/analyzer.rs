//! Storage of analyzer runs, deduplicating packages and projects by their content.

use crate::graph::{insert_link, Error, Graph};
use ortserver_common::hashing::FieldHasher;
use ortserver_entity::{
    analyzer_run, author, declared_license, package, package_analyzer_run, package_author,
    package_declared_license, project, project_analyzer_run, project_author,
    project_declared_license,
};
use ortserver_model::{
    runs::{
        AnalyzerRun, Identifier, Package, ProcessedDeclaredLicense, Project, RemoteArtifact,
        VcsInfo,
    },
    JobKind,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use std::collections::BTreeSet;
use tracing::instrument;

fn hash_identifier(hasher: &mut FieldHasher, id: &Identifier) {
    hasher
        .field(&id.r#type)
        .field(&id.namespace)
        .field(&id.name)
        .field(&id.version);
}

fn hash_vcs(hasher: &mut FieldHasher, vcs: &VcsInfo) {
    hasher
        .field(vcs.r#type.as_str())
        .field(&vcs.url)
        .field(&vcs.revision)
        .field(&vcs.path);
}

fn hash_artifact(hasher: &mut FieldHasher, artifact: &RemoteArtifact) {
    hasher
        .field(&artifact.url)
        .field(&artifact.hash_value)
        .field(&artifact.hash_algorithm);
}

fn hash_set(hasher: &mut FieldHasher, values: &BTreeSet<String>) {
    hasher.field((values.len() as u64).to_be_bytes());
    for value in values {
        hasher.field(value);
    }
}

fn hash_license(hasher: &mut FieldHasher, license: &ProcessedDeclaredLicense) {
    hasher.optional(license.spdx_expression.as_ref());
    hasher.field((license.mapped_licenses.len() as u64).to_be_bytes());
    for (key, value) in &license.mapped_licenses {
        hasher.field(key).field(value);
    }
    hash_set(hasher, &license.unmapped_licenses);
}

/// A digest over all properties of a package, equal packages share a row.
pub fn package_hash(package: &Package) -> String {
    let mut hasher = FieldHasher::new();
    hash_identifier(&mut hasher, &package.identifier);
    hasher
        .field(&package.purl)
        .optional(package.cpe.as_ref())
        .field(&package.description)
        .field(&package.homepage_url);
    hash_set(&mut hasher, &package.authors);
    hash_set(&mut hasher, &package.declared_licenses);
    hash_license(&mut hasher, &package.processed_declared_license);
    hash_artifact(&mut hasher, &package.binary_artifact);
    hash_artifact(&mut hasher, &package.source_artifact);
    hash_vcs(&mut hasher, &package.vcs);
    hash_vcs(&mut hasher, &package.vcs_processed);
    hasher.field([
        package.is_metadata_only as u8,
        package.is_modified as u8,
    ]);
    hasher.finish()
}

/// A digest over all properties of a project.
pub fn project_hash(project: &Project) -> String {
    let mut hasher = FieldHasher::new();
    hash_identifier(&mut hasher, &project.identifier);
    hasher
        .optional(project.cpe.as_ref())
        .field(&project.definition_file_path)
        .field(&project.homepage_url);
    hash_set(&mut hasher, &project.authors);
    hash_set(&mut hasher, &project.declared_licenses);
    hash_license(&mut hasher, &project.processed_declared_license);
    hash_vcs(&mut hasher, &project.vcs);
    hash_vcs(&mut hasher, &project.vcs_processed);
    hash_set(&mut hasher, &project.scope_names);
    hasher.finish()
}

impl Graph {
    #[instrument(skip(self, package, connection), fields(id = %package.identifier), err)]
    pub async fn get_or_put_package<C: ConnectionTrait>(
        &self,
        package: &Package,
        connection: &C,
    ) -> Result<package::Model, Error> {
        let hash = package_hash(package);

        if let Some(found) = package::Entity::find()
            .filter(package::Column::ContentHash.eq(&hash))
            .one(connection)
            .await?
        {
            return Ok(found);
        }

        let identifier = self
            .get_or_put_identifier(&package.identifier, connection)
            .await?;
        let binary_artifact = self
            .get_or_put_remote_artifact(&package.binary_artifact, connection)
            .await?;
        let source_artifact = self
            .get_or_put_remote_artifact(&package.source_artifact, connection)
            .await?;
        let vcs = self.get_or_put_vcs_info(&package.vcs, connection).await?;
        let vcs_processed = self
            .get_or_put_vcs_info(&package.vcs_processed, connection)
            .await?;

        let license = &package.processed_declared_license;
        let model = package::ActiveModel {
            id: Default::default(),
            identifier_id: Set(identifier.id),
            purl: Set(package.purl.clone()),
            cpe: Set(package.cpe.clone()),
            description: Set(package.description.clone()),
            homepage_url: Set(package.homepage_url.clone()),
            binary_artifact_id: Set(binary_artifact.id),
            source_artifact_id: Set(source_artifact.id),
            vcs_id: Set(vcs.id),
            vcs_processed_id: Set(vcs_processed.id),
            is_metadata_only: Set(package.is_metadata_only),
            is_modified: Set(package.is_modified),
            spdx_expression: Set(license.spdx_expression.clone()),
            mapped_licenses: Set(serde_json::to_value(&license.mapped_licenses)?),
            unmapped_licenses: Set(serde_json::to_value(&license.unmapped_licenses)?),
            content_hash: Set(hash),
        }
        .insert(connection)
        .await?;

        for name in &package.authors {
            let author = self.get_or_put_author(name, connection).await?;
            insert_link::<package_author::Entity, _>(
                package_author::ActiveModel {
                    package_id: Set(model.id),
                    author_id: Set(author.id),
                },
                connection,
            )
            .await?;
        }

        for name in &package.declared_licenses {
            let license = self.get_or_put_declared_license(name, connection).await?;
            insert_link::<package_declared_license::Entity, _>(
                package_declared_license::ActiveModel {
                    package_id: Set(model.id),
                    declared_license_id: Set(license.id),
                },
                connection,
            )
            .await?;
        }

        Ok(model)
    }

    #[instrument(skip(self, project, connection), fields(id = %project.identifier), err)]
    pub async fn get_or_put_project<C: ConnectionTrait>(
        &self,
        project: &Project,
        connection: &C,
    ) -> Result<project::Model, Error> {
        let hash = project_hash(project);

        if let Some(found) = project::Entity::find()
            .filter(project::Column::ContentHash.eq(&hash))
            .one(connection)
            .await?
        {
            return Ok(found);
        }

        let identifier = self
            .get_or_put_identifier(&project.identifier, connection)
            .await?;
        let vcs = self.get_or_put_vcs_info(&project.vcs, connection).await?;
        let vcs_processed = self
            .get_or_put_vcs_info(&project.vcs_processed, connection)
            .await?;

        let license = &project.processed_declared_license;
        let model = project::ActiveModel {
            id: Default::default(),
            identifier_id: Set(identifier.id),
            cpe: Set(project.cpe.clone()),
            definition_file_path: Set(project.definition_file_path.clone()),
            homepage_url: Set(project.homepage_url.clone()),
            vcs_id: Set(vcs.id),
            vcs_processed_id: Set(vcs_processed.id),
            spdx_expression: Set(license.spdx_expression.clone()),
            mapped_licenses: Set(serde_json::to_value(&license.mapped_licenses)?),
            unmapped_licenses: Set(serde_json::to_value(&license.unmapped_licenses)?),
            scope_names: Set(serde_json::to_value(&project.scope_names)?),
            content_hash: Set(hash),
        }
        .insert(connection)
        .await?;

        for name in &project.authors {
            let author = self.get_or_put_author(name, connection).await?;
            insert_link::<project_author::Entity, _>(
                project_author::ActiveModel {
                    project_id: Set(model.id),
                    author_id: Set(author.id),
                },
                connection,
            )
            .await?;
        }

        for name in &project.declared_licenses {
            let license = self.get_or_put_declared_license(name, connection).await?;
            insert_link::<project_declared_license::Entity, _>(
                project_declared_license::ActiveModel {
                    project_id: Set(model.id),
                    declared_license_id: Set(license.id),
                },
                connection,
            )
            .await?;
        }

        Ok(model)
    }

    /// Store the result of an analyzer job.
    ///
    /// Packages and projects are shared with other runs if their content is equal. Issues are
    /// attached to the ORT run the job belongs to.
    #[instrument(skip(self, run, connection), fields(packages = run.packages.len(), projects = run.projects.len()), err)]
    pub async fn create_analyzer_run<C: ConnectionTrait>(
        &self,
        run: &AnalyzerRun,
        connection: &C,
    ) -> Result<AnalyzerRun, Error> {
        let job = self
            .get_job(run.analyzer_job_id, connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("job {}", run.analyzer_job_id)))?;

        let model = analyzer_run::ActiveModel {
            id: Default::default(),
            job_id: Set(job.id),
            start_time: Set(run.start_time),
            end_time: Set(run.end_time),
            environment: Set(serde_json::to_value(&run.environment)?),
            config: Set(serde_json::to_value(&run.config)?),
        }
        .insert(connection)
        .await?;

        for project in &run.projects {
            let project = self.get_or_put_project(project, connection).await?;
            insert_link::<project_analyzer_run::Entity, _>(
                project_analyzer_run::ActiveModel {
                    project_id: Set(project.id),
                    analyzer_run_id: Set(model.id),
                },
                connection,
            )
            .await?;
        }

        for package in &run.packages {
            let package = self.get_or_put_package(package, connection).await?;
            insert_link::<package_analyzer_run::Entity, _>(
                package_analyzer_run::ActiveModel {
                    package_id: Set(package.id),
                    analyzer_run_id: Set(model.id),
                },
                connection,
            )
            .await?;
        }

        let worker = JobKind::Analyzer.to_string();
        let issues = run
            .issues
            .iter()
            .cloned()
            .map(|issue| issue.with_worker(worker.clone()))
            .collect::<Vec<_>>();
        self.add_run_issues(job.ort_run_id, &issues, connection)
            .await?;

        Ok(AnalyzerRun {
            id: model.id,
            issues,
            ..run.clone()
        })
    }

    pub async fn get_analyzer_run<C: ConnectionTrait>(
        &self,
        id: i64,
        connection: &C,
    ) -> Result<Option<AnalyzerRun>, Error> {
        match analyzer_run::Entity::find_by_id(id).one(connection).await? {
            Some(model) => Ok(Some(self.load_analyzer_run(model, connection).await?)),
            None => Ok(None),
        }
    }

    pub async fn get_analyzer_run_for_job<C: ConnectionTrait>(
        &self,
        job_id: i64,
        connection: &C,
    ) -> Result<Option<AnalyzerRun>, Error> {
        match analyzer_run::Entity::find()
            .filter(analyzer_run::Column::JobId.eq(job_id))
            .one(connection)
            .await?
        {
            Some(model) => Ok(Some(self.load_analyzer_run(model, connection).await?)),
            None => Ok(None),
        }
    }

    async fn load_analyzer_run<C: ConnectionTrait>(
        &self,
        model: analyzer_run::Model,
        connection: &C,
    ) -> Result<AnalyzerRun, Error> {
        let job = self
            .get_job(model.job_id, connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("job {}", model.job_id)))?;

        let mut projects = Vec::new();
        for project in model
            .find_related(project::Entity)
            .order_by_asc(project::Column::Id)
            .all(connection)
            .await?
        {
            projects.push(self.load_project(project, connection).await?);
        }

        let mut packages = Vec::new();
        for package in model
            .find_related(package::Entity)
            .order_by_asc(package::Column::Id)
            .all(connection)
            .await?
        {
            packages.push(self.load_package(package, connection).await?);
        }

        let issues = self
            .get_run_issues(
                job.ort_run_id,
                Some(&JobKind::Analyzer.to_string()),
                connection,
            )
            .await?;

        Ok(AnalyzerRun {
            id: model.id,
            analyzer_job_id: model.job_id,
            start_time: model.start_time,
            end_time: model.end_time,
            environment: serde_json::from_value(model.environment)?,
            config: serde_json::from_value(model.config)?,
            projects,
            packages,
            issues,
        })
    }

    pub async fn load_package<C: ConnectionTrait>(
        &self,
        model: package::Model,
        connection: &C,
    ) -> Result<Package, Error> {
        let authors = model
            .find_related(author::Entity)
            .all(connection)
            .await?
            .into_iter()
            .map(|author| author.name)
            .collect();
        let declared_licenses = model
            .find_related(declared_license::Entity)
            .all(connection)
            .await?
            .into_iter()
            .map(|license| license.name)
            .collect();

        Ok(Package {
            identifier: self.load_identifier(model.identifier_id, connection).await?,
            purl: model.purl,
            cpe: model.cpe,
            authors,
            declared_licenses,
            processed_declared_license: ProcessedDeclaredLicense {
                spdx_expression: model.spdx_expression,
                mapped_licenses: serde_json::from_value(model.mapped_licenses)?,
                unmapped_licenses: serde_json::from_value(model.unmapped_licenses)?,
            },
            description: model.description,
            homepage_url: model.homepage_url,
            binary_artifact: self
                .load_remote_artifact(model.binary_artifact_id, connection)
                .await?,
            source_artifact: self
                .load_remote_artifact(model.source_artifact_id, connection)
                .await?,
            vcs: self.load_vcs_info(model.vcs_id, connection).await?,
            vcs_processed: self.load_vcs_info(model.vcs_processed_id, connection).await?,
            is_metadata_only: model.is_metadata_only,
            is_modified: model.is_modified,
        })
    }

    pub async fn load_project<C: ConnectionTrait>(
        &self,
        model: project::Model,
        connection: &C,
    ) -> Result<Project, Error> {
        let authors = model
            .find_related(author::Entity)
            .all(connection)
            .await?
            .into_iter()
            .map(|author| author.name)
            .collect();
        let declared_licenses = model
            .find_related(declared_license::Entity)
            .all(connection)
            .await?
            .into_iter()
            .map(|license| license.name)
            .collect();

        Ok(Project {
            identifier: self.load_identifier(model.identifier_id, connection).await?,
            cpe: model.cpe,
            definition_file_path: model.definition_file_path,
            authors,
            declared_licenses,
            processed_declared_license: ProcessedDeclaredLicense {
                spdx_expression: model.spdx_expression,
                mapped_licenses: serde_json::from_value(model.mapped_licenses)?,
                unmapped_licenses: serde_json::from_value(model.unmapped_licenses)?,
            },
            vcs: self.load_vcs_info(model.vcs_id, connection).await?,
            vcs_processed: self.load_vcs_info(model.vcs_processed_id, connection).await?,
            homepage_url: model.homepage_url,
            scope_names: serde_json::from_value(model.scope_names)?,
        })
    }
}
