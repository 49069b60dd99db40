//! Scanner runs, scan results and the provenance information the scanner relies on.

use crate::graph::{insert_link, Error, Graph};
use ortserver_entity::{
    copyright_finding, license_finding, nested_provenance, nested_provenance_sub_repository,
    package_provenance, scan_result, scan_summary, scan_summary_issue, scanner_run,
    scanner_run_package_provenance, scanner_run_scan_result, snippet, snippet_finding,
    snippet_finding_snippet,
};
use ortserver_model::{
    runs::{Environment, Identifier, OrtIssue, RemoteArtifact, Severity, VcsInfo},
    scanner::{
        ArtifactProvenance, CopyrightFinding, KnownProvenance, LicenseFinding, NestedProvenance,
        NestedProvenanceResolution, PackageProvenanceResolution, ProvenanceResolutionResult,
        RepositoryProvenance, ScanResult, ScanSummary, ScannerConfiguration, ScannerDetail,
        ScannerRun, Snippet, SnippetFinding, TextLocation,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use std::collections::{BTreeMap, BTreeSet};
use time::OffsetDateTime;
use tracing::instrument;

/// The source code location a package provenance was resolved for.
#[derive(Debug, Copy, Clone)]
pub enum ProvenanceSource<'a> {
    Artifact(&'a RemoteArtifact),
    Vcs(&'a VcsInfo),
}

/// The source of issues found while resolving package provenances.
pub const PROVENANCE_ISSUE_SOURCE: &str = "Scanner";

fn empty_scanner_run(model: &scanner_run::Model) -> ScannerRun {
    ScannerRun {
        id: model.id,
        scanner_job_id: model.job_id,
        start_time: model.start_time,
        end_time: model.end_time,
        environment: None,
        config: None,
        provenances: vec![],
        scan_results: vec![],
    }
}

impl Graph {
    #[instrument(skip(self, connection), err)]
    pub async fn create_scanner_run<C: ConnectionTrait>(
        &self,
        job_id: i64,
        connection: &C,
    ) -> Result<ScannerRun, Error> {
        let model = scanner_run::ActiveModel {
            id: Default::default(),
            job_id: Set(job_id),
            start_time: Set(None),
            end_time: Set(None),
            environment: Set(None),
            config: Set(None),
        }
        .insert(connection)
        .await?;

        Ok(empty_scanner_run(&model))
    }

    /// Fill in the details of a scanner run once the scan is complete.
    ///
    /// A scanner run can only be completed once.
    #[instrument(skip(self, environment, config, connection), err)]
    pub async fn update_scanner_run<C: ConnectionTrait>(
        &self,
        id: i64,
        start_time: OffsetDateTime,
        end_time: OffsetDateTime,
        environment: &Environment,
        config: &ScannerConfiguration,
        connection: &C,
    ) -> Result<(), Error> {
        let current = scanner_run::Entity::find_by_id(id)
            .one(connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("scanner run {id}")))?;

        if current.start_time.is_some() {
            return Err(Error::InvalidState(format!(
                "scanner run {id} has already been completed"
            )));
        }

        let mut model = current.into_active_model();
        model.start_time = Set(Some(start_time));
        model.end_time = Set(Some(end_time));
        model.environment = Set(Some(serde_json::to_value(environment)?));
        model.config = Set(Some(serde_json::to_value(config)?));
        model.update(connection).await?;

        Ok(())
    }

    pub async fn get_scanner_run<C: ConnectionTrait>(
        &self,
        id: i64,
        connection: &C,
    ) -> Result<Option<ScannerRun>, Error> {
        match scanner_run::Entity::find_by_id(id).one(connection).await? {
            Some(model) => Ok(Some(self.load_scanner_run(model, connection).await?)),
            None => Ok(None),
        }
    }

    pub async fn get_scanner_run_for_job<C: ConnectionTrait>(
        &self,
        job_id: i64,
        connection: &C,
    ) -> Result<Option<ScannerRun>, Error> {
        match scanner_run::Entity::find()
            .filter(scanner_run::Column::JobId.eq(job_id))
            .one(connection)
            .await?
        {
            Some(model) => Ok(Some(self.load_scanner_run(model, connection).await?)),
            None => Ok(None),
        }
    }

    async fn load_scanner_run<C: ConnectionTrait>(
        &self,
        model: scanner_run::Model,
        connection: &C,
    ) -> Result<ScannerRun, Error> {
        let mut run = empty_scanner_run(&model);

        run.environment = model
            .environment
            .clone()
            .map(serde_json::from_value)
            .transpose()?;
        run.config = model
            .config
            .clone()
            .map(serde_json::from_value)
            .transpose()?;

        let provenances = model
            .find_related(package_provenance::Entity)
            .order_by_asc(package_provenance::Column::Id)
            .all(connection)
            .await?;
        run.provenances = self
            .provenance_resolution_results(provenances, connection)
            .await?;

        for result in model
            .find_related(scan_result::Entity)
            .order_by_asc(scan_result::Column::Id)
            .all(connection)
            .await?
        {
            run.scan_results.push(self.load_scan_result(result, connection).await?);
        }

        Ok(run)
    }

    /// Group the package provenances of a run per package, a resolved provenance wins over a failure.
    async fn provenance_resolution_results<C: ConnectionTrait>(
        &self,
        provenances: Vec<package_provenance::Model>,
        connection: &C,
    ) -> Result<Vec<ProvenanceResolutionResult>, Error> {
        let mut per_identifier: BTreeMap<i64, package_provenance::Model> = BTreeMap::new();
        for provenance in provenances {
            let resolved = per_identifier
                .get(&provenance.identifier_id)
                .is_some_and(|existing| existing.error_message.is_none());
            if !resolved {
                per_identifier.insert(provenance.identifier_id, provenance);
            }
        }

        let mut result = Vec::new();
        for (identifier_id, provenance) in per_identifier {
            let id = self.load_identifier(identifier_id, connection).await?;

            let sub_repositories = match provenance.nested_provenance_id {
                Some(nested_id) => self.sub_repository_vcs(nested_id, connection).await?,
                None => BTreeMap::new(),
            };

            let issue = provenance.error_message.as_ref().map(|message| {
                OrtIssue::new(
                    OffsetDateTime::now_utc(),
                    PROVENANCE_ISSUE_SOURCE,
                    message.clone(),
                    Severity::Error,
                )
            });

            let package_provenance = match self.load_package_provenance(provenance, connection).await? {
                Some(PackageProvenanceResolution::Artifact { provenance }) => {
                    Some(KnownProvenance::Artifact(provenance))
                }
                Some(PackageProvenanceResolution::Repository { provenance, .. }) => {
                    Some(KnownProvenance::Repository(provenance))
                }
                _ => None,
            };

            result.push(ProvenanceResolutionResult {
                id,
                package_provenance,
                sub_repositories,
                package_provenance_resolution_issue: issue,
            });
        }

        Ok(result)
    }

    async fn sub_repository_vcs<C: ConnectionTrait>(
        &self,
        nested_provenance_id: i64,
        connection: &C,
    ) -> Result<BTreeMap<String, VcsInfo>, Error> {
        let mut result = BTreeMap::new();
        for sub in nested_provenance_sub_repository::Entity::find()
            .filter(
                nested_provenance_sub_repository::Column::NestedProvenanceId
                    .eq(nested_provenance_id),
            )
            .all(connection)
            .await?
        {
            let mut vcs = self.load_vcs_info(sub.vcs_id, connection).await?;
            vcs.revision = sub.resolved_revision;
            result.insert(sub.path, vcs);
        }

        Ok(result)
    }

    /// Link the stored package provenances of the given packages to a scanner run.
    #[instrument(skip(self, identifiers, connection), fields(packages = identifiers.len()), err)]
    pub async fn attach_package_provenances<C: ConnectionTrait>(
        &self,
        scanner_run_id: i64,
        identifiers: &[Identifier],
        connection: &C,
    ) -> Result<(), Error> {
        for identifier in identifiers {
            let Some(identifier) = self.find_identifier(identifier, connection).await? else {
                continue;
            };

            for provenance in package_provenance::Entity::find()
                .filter(package_provenance::Column::IdentifierId.eq(identifier.id))
                .all(connection)
                .await?
            {
                insert_link::<scanner_run_package_provenance::Entity, _>(
                    scanner_run_package_provenance::ActiveModel {
                        scanner_run_id: Set(scanner_run_id),
                        package_provenance_id: Set(provenance.id),
                    },
                    connection,
                )
                .await?;
            }
        }

        Ok(())
    }

    // scan summaries

    #[instrument(skip(self, snippet, connection), err)]
    pub async fn get_or_put_snippet<C: ConnectionTrait>(
        &self,
        snippet: &Snippet,
        connection: &C,
    ) -> Result<snippet::Model, Error> {
        let (artifact_id, vcs_id) = self
            .provenance_ids(&snippet.provenance, connection)
            .await?;
        let additional_data = serde_json::to_value(&snippet.additional_data)?;

        let mut select = snippet::Entity::find()
            .filter(snippet::Column::Purl.eq(&snippet.purl))
            .filter(snippet::Column::Path.eq(&snippet.location.path))
            .filter(snippet::Column::StartLine.eq(snippet.location.start_line))
            .filter(snippet::Column::EndLine.eq(snippet.location.end_line))
            .filter(snippet::Column::License.eq(&snippet.spdx_license));
        select = match artifact_id {
            Some(id) => select.filter(snippet::Column::ArtifactId.eq(id)),
            None => select.filter(snippet::Column::ArtifactId.is_null()),
        };
        select = match vcs_id {
            Some(id) => select.filter(snippet::Column::VcsId.eq(id)),
            None => select.filter(snippet::Column::VcsId.is_null()),
        };

        // floats and JSON are not compared reliably by every backend
        if let Some(found) = select
            .all(connection)
            .await?
            .into_iter()
            .find(|candidate| {
                candidate.score == snippet.score && candidate.additional_data == additional_data
            })
        {
            return Ok(found);
        }

        Ok(snippet::ActiveModel {
            id: Default::default(),
            purl: Set(snippet.purl.clone()),
            artifact_id: Set(artifact_id),
            vcs_id: Set(vcs_id),
            path: Set(snippet.location.path.clone()),
            start_line: Set(snippet.location.start_line),
            end_line: Set(snippet.location.end_line),
            license: Set(snippet.spdx_license.clone()),
            score: Set(snippet.score),
            additional_data: Set(additional_data),
        }
        .insert(connection)
        .await?)
    }

    /// The artifact or VCS row a known provenance refers to.
    async fn provenance_ids<C: ConnectionTrait>(
        &self,
        provenance: &KnownProvenance,
        connection: &C,
    ) -> Result<(Option<i64>, Option<i64>), Error> {
        Ok(match provenance {
            KnownProvenance::Artifact(artifact) => {
                let artifact = self
                    .get_or_put_remote_artifact(&artifact.source_artifact, connection)
                    .await?;
                (Some(artifact.id), None)
            }
            KnownProvenance::Repository(repository) => {
                let vcs = VcsInfo {
                    revision: repository.resolved_revision.clone(),
                    ..repository.vcs_info.clone()
                };
                (None, Some(self.get_or_put_vcs_info(&vcs, connection).await?.id))
            }
        })
    }

    /// Store a scan summary with all its findings.
    #[instrument(skip(self, summary, connection), err)]
    pub async fn insert_scan_summary<C: ConnectionTrait>(
        &self,
        summary: &ScanSummary,
        hash: &str,
        connection: &C,
    ) -> Result<scan_summary::Model, Error> {
        let model = scan_summary::ActiveModel {
            id: Default::default(),
            start_time: Set(summary.start_time),
            end_time: Set(summary.end_time),
            hash: Set(hash.to_string()),
        }
        .insert(connection)
        .await?;

        for issue in &summary.issues {
            let issue = self.get_or_put_issue(issue, connection).await?;
            insert_link::<scan_summary_issue::Entity, _>(
                scan_summary_issue::ActiveModel {
                    scan_summary_id: Set(model.id),
                    issue_id: Set(issue.id),
                },
                connection,
            )
            .await?;
        }

        for finding in &summary.license_findings {
            license_finding::ActiveModel {
                id: Default::default(),
                scan_summary_id: Set(model.id),
                license: Set(finding.spdx_license.clone()),
                path: Set(finding.location.path.clone()),
                start_line: Set(finding.location.start_line),
                end_line: Set(finding.location.end_line),
                score: Set(finding.score),
            }
            .insert(connection)
            .await?;
        }

        for finding in &summary.copyright_findings {
            copyright_finding::ActiveModel {
                id: Default::default(),
                scan_summary_id: Set(model.id),
                statement: Set(finding.statement.clone()),
                path: Set(finding.location.path.clone()),
                start_line: Set(finding.location.start_line),
                end_line: Set(finding.location.end_line),
            }
            .insert(connection)
            .await?;
        }

        for finding in &summary.snippet_findings {
            let stored = snippet_finding::ActiveModel {
                id: Default::default(),
                scan_summary_id: Set(model.id),
                path: Set(finding.location.path.clone()),
                start_line: Set(finding.location.start_line),
                end_line: Set(finding.location.end_line),
            }
            .insert(connection)
            .await?;

            for snippet in &finding.snippets {
                let snippet = self.get_or_put_snippet(snippet, connection).await?;
                insert_link::<snippet_finding_snippet::Entity, _>(
                    snippet_finding_snippet::ActiveModel {
                        snippet_finding_id: Set(stored.id),
                        snippet_id: Set(snippet.id),
                    },
                    connection,
                )
                .await?;
            }
        }

        Ok(model)
    }

    pub async fn load_scan_summary<C: ConnectionTrait>(
        &self,
        model: &scan_summary::Model,
        connection: &C,
    ) -> Result<ScanSummary, Error> {
        let license_findings = model
            .find_related(license_finding::Entity)
            .order_by_asc(license_finding::Column::Id)
            .all(connection)
            .await?
            .into_iter()
            .map(|finding| LicenseFinding {
                spdx_license: finding.license,
                location: TextLocation {
                    path: finding.path,
                    start_line: finding.start_line,
                    end_line: finding.end_line,
                },
                score: finding.score,
            })
            .collect();

        let copyright_findings = model
            .find_related(copyright_finding::Entity)
            .order_by_asc(copyright_finding::Column::Id)
            .all(connection)
            .await?
            .into_iter()
            .map(|finding| CopyrightFinding {
                statement: finding.statement,
                location: TextLocation {
                    path: finding.path,
                    start_line: finding.start_line,
                    end_line: finding.end_line,
                },
            })
            .collect();

        let mut snippet_findings = Vec::new();
        for finding in model
            .find_related(snippet_finding::Entity)
            .order_by_asc(snippet_finding::Column::Id)
            .all(connection)
            .await?
        {
            let mut snippets = Vec::new();
            for snippet in finding
                .find_related(snippet::Entity)
                .order_by_asc(snippet::Column::Id)
                .all(connection)
                .await?
            {
                snippets.push(self.load_snippet(snippet, connection).await?);
            }

            snippet_findings.push(SnippetFinding {
                location: TextLocation {
                    path: finding.path,
                    start_line: finding.start_line,
                    end_line: finding.end_line,
                },
                snippets,
            });
        }

        let mut issues = Vec::new();
        for issue in model
            .find_related(ortserver_entity::issue::Entity)
            .order_by_asc(ortserver_entity::issue::Column::Id)
            .all(connection)
            .await?
        {
            issues.push(OrtIssue::try_from(issue)?);
        }

        Ok(ScanSummary {
            start_time: model.start_time,
            end_time: model.end_time,
            license_findings,
            copyright_findings,
            snippet_findings,
            issues,
        })
    }

    async fn load_snippet<C: ConnectionTrait>(
        &self,
        model: snippet::Model,
        connection: &C,
    ) -> Result<Snippet, Error> {
        let provenance = match (model.artifact_id, model.vcs_id) {
            (Some(artifact_id), _) => KnownProvenance::Artifact(ArtifactProvenance {
                source_artifact: self.load_remote_artifact(artifact_id, connection).await?,
            }),
            (None, Some(vcs_id)) => {
                let vcs_info = self.load_vcs_info(vcs_id, connection).await?;
                KnownProvenance::Repository(RepositoryProvenance {
                    resolved_revision: vcs_info.revision.clone(),
                    vcs_info,
                })
            }
            (None, None) => {
                return Err(Error::InvalidState(format!(
                    "snippet {} has no provenance",
                    model.id
                )))
            }
        };

        Ok(Snippet {
            purl: model.purl,
            provenance,
            location: TextLocation {
                path: model.path,
                start_line: model.start_line,
                end_line: model.end_line,
            },
            score: model.score,
            spdx_license: model.license,
            additional_data: serde_json::from_value(model.additional_data)?,
        })
    }

    // scan results

    /// All scan results stored for a provenance, regardless of the scanner.
    ///
    /// Artifacts are matched by URL and hash, repositories by type, URL and resolved revision.
    pub async fn find_scan_results<C: ConnectionTrait>(
        &self,
        provenance: &KnownProvenance,
        connection: &C,
    ) -> Result<Vec<scan_result::Model>, Error> {
        let select = match provenance {
            KnownProvenance::Artifact(artifact) => scan_result::Entity::find()
                .filter(scan_result::Column::ArtifactUrl.eq(&artifact.source_artifact.url))
                .filter(
                    scan_result::Column::ArtifactHash.eq(&artifact.source_artifact.hash_value),
                ),
            KnownProvenance::Repository(repository) => scan_result::Entity::find()
                .filter(scan_result::Column::VcsType.eq(repository.vcs_info.r#type.as_str()))
                .filter(scan_result::Column::VcsUrl.eq(&repository.vcs_info.url))
                .filter(scan_result::Column::VcsRevision.eq(&repository.resolved_revision)),
        };

        Ok(select
            .order_by_asc(scan_result::Column::Id)
            .all(connection)
            .await?)
    }

    /// Stored scan results equal to `result` apart from the summary, which only has to match the
    /// summary hash.
    ///
    /// Equal results share provenance, scanner details and additional data.
    pub async fn find_equal_scan_results<C: ConnectionTrait>(
        &self,
        result: &ScanResult,
        summary_hash: &str,
        connection: &C,
    ) -> Result<Vec<(scan_result::Model, scan_summary::Model)>, Error> {
        let scanner = &result.scanner;
        let additional_data = serde_json::to_value(&result.additional_data)?;

        let mut equal = Vec::new();
        for candidate in self.find_scan_results(&result.provenance, connection).await? {
            if candidate.scanner_name != scanner.name
                || candidate.scanner_version != scanner.version
                || candidate.scanner_configuration != scanner.configuration
                || candidate.additional_data != additional_data
            {
                continue;
            }

            let summary = scan_summary::Entity::find_by_id(candidate.scan_summary_id)
                .one(connection)
                .await?;
            if let Some(summary) = summary.filter(|summary| summary.hash == summary_hash) {
                equal.push((candidate, summary));
            }
        }

        Ok(equal)
    }

    /// Store a new scan result including its summary.
    #[instrument(skip(self, result, connection), fields(scanner = %result.scanner.name), err)]
    pub async fn insert_scan_result<C: ConnectionTrait>(
        &self,
        result: &ScanResult,
        summary_hash: &str,
        connection: &C,
    ) -> Result<scan_result::Model, Error> {
        let summary = self
            .insert_scan_summary(&result.summary, summary_hash, connection)
            .await?;

        let mut model = scan_result::ActiveModel {
            id: Default::default(),
            artifact_url: Set(None),
            artifact_hash: Set(None),
            artifact_hash_algorithm: Set(None),
            vcs_type: Set(None),
            vcs_url: Set(None),
            vcs_revision: Set(None),
            scanner_name: Set(result.scanner.name.clone()),
            scanner_version: Set(result.scanner.version.clone()),
            scanner_configuration: Set(result.scanner.configuration.clone()),
            scan_summary_id: Set(summary.id),
            additional_data: Set(serde_json::to_value(&result.additional_data)?),
        };

        match &result.provenance {
            KnownProvenance::Artifact(artifact) => {
                let artifact = &artifact.source_artifact;
                model.artifact_url = Set(Some(artifact.url.clone()));
                model.artifact_hash = Set(Some(artifact.hash_value.clone()));
                model.artifact_hash_algorithm = Set(Some(artifact.hash_algorithm.clone()));
            }
            KnownProvenance::Repository(repository) => {
                model.vcs_type = Set(Some(repository.vcs_info.r#type.as_str().to_string()));
                model.vcs_url = Set(Some(repository.vcs_info.url.clone()));
                model.vcs_revision = Set(Some(repository.resolved_revision.clone()));
            }
        }

        Ok(model.insert(connection).await?)
    }

    pub async fn load_scan_result<C: ConnectionTrait>(
        &self,
        model: scan_result::Model,
        connection: &C,
    ) -> Result<ScanResult, Error> {
        let provenance = match (&model.artifact_url, &model.vcs_url) {
            (Some(url), _) => KnownProvenance::Artifact(ArtifactProvenance {
                source_artifact: RemoteArtifact {
                    url: url.clone(),
                    hash_value: model.artifact_hash.clone().unwrap_or_default(),
                    hash_algorithm: model.artifact_hash_algorithm.clone().unwrap_or_default(),
                },
            }),
            (None, Some(url)) => {
                let revision = model.vcs_revision.clone().unwrap_or_default();
                KnownProvenance::Repository(RepositoryProvenance {
                    vcs_info: VcsInfo {
                        r#type: model.vcs_type.as_deref().unwrap_or_default().parse()?,
                        url: url.clone(),
                        revision: revision.clone(),
                        path: String::new(),
                    },
                    resolved_revision: revision,
                })
            }
            (None, None) => {
                return Err(Error::InvalidState(format!(
                    "scan result {} has no provenance",
                    model.id
                )))
            }
        };

        let summary = scan_summary::Entity::find_by_id(model.scan_summary_id)
            .one(connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("scan summary {}", model.scan_summary_id)))?;

        Ok(ScanResult {
            provenance,
            scanner: ScannerDetail {
                name: model.scanner_name,
                version: model.scanner_version,
                configuration: model.scanner_configuration,
            },
            summary: self.load_scan_summary(&summary, connection).await?,
            additional_data: serde_json::from_value(model.additional_data)?,
        })
    }

    /// Associate a scan result with a scanner run, doing nothing if it already is.
    pub async fn link_scan_result<C: ConnectionTrait>(
        &self,
        scanner_run_id: i64,
        scan_result_id: i64,
        connection: &C,
    ) -> Result<(), Error> {
        insert_link::<scanner_run_scan_result::Entity, _>(
            scanner_run_scan_result::ActiveModel {
                scanner_run_id: Set(scanner_run_id),
                scan_result_id: Set(scan_result_id),
            },
            connection,
        )
        .await?;

        Ok(())
    }

    // package provenances

    /// Store the provenance resolution of a package, replacing an earlier one for the same source.
    #[instrument(skip(self, connection), err)]
    pub async fn put_package_provenance<C: ConnectionTrait>(
        &self,
        identifier: &Identifier,
        source: ProvenanceSource<'_>,
        resolution: &PackageProvenanceResolution,
        connection: &C,
    ) -> Result<package_provenance::Model, Error> {
        let identifier = self.get_or_put_identifier(identifier, connection).await?;

        let (artifact_id, vcs_id) = match source {
            ProvenanceSource::Artifact(artifact) => {
                let artifact = self.get_or_put_remote_artifact(artifact, connection).await?;
                (Some(artifact.id), None)
            }
            ProvenanceSource::Vcs(vcs) => {
                (None, Some(self.get_or_put_vcs_info(vcs, connection).await?.id))
            }
        };

        let mut delete = package_provenance::Entity::delete_many()
            .filter(package_provenance::Column::IdentifierId.eq(identifier.id));
        delete = match (artifact_id, vcs_id) {
            (Some(id), _) => delete.filter(package_provenance::Column::ArtifactId.eq(id)),
            (None, Some(id)) => delete.filter(package_provenance::Column::VcsId.eq(id)),
            (None, None) => delete,
        };
        delete.exec(connection).await?;

        let mut model = package_provenance::ActiveModel {
            id: Default::default(),
            identifier_id: Set(identifier.id),
            artifact_id: Set(artifact_id),
            vcs_id: Set(vcs_id),
            resolved_revision: Set(None),
            cloned_revision: Set(None),
            is_fixed_revision: Set(None),
            error_message: Set(None),
            nested_provenance_id: Set(None),
        };

        match resolution {
            PackageProvenanceResolution::Artifact { .. } => {}
            PackageProvenanceResolution::Repository {
                provenance,
                cloned_revision,
                is_fixed_revision,
            } => {
                model.resolved_revision = Set(Some(provenance.resolved_revision.clone()));
                model.cloned_revision = Set(Some(cloned_revision.clone()));
                model.is_fixed_revision = Set(Some(*is_fixed_revision));

                if let Some(nested) = self.find_nested_provenance(provenance, connection).await? {
                    model.nested_provenance_id = Set(Some(nested.id));
                }
            }
            PackageProvenanceResolution::Unresolved { message } => {
                model.error_message = Set(Some(message.clone()));
            }
        }

        Ok(model.insert(connection).await?)
    }

    pub async fn get_package_provenance<C: ConnectionTrait>(
        &self,
        identifier: &Identifier,
        source: ProvenanceSource<'_>,
        connection: &C,
    ) -> Result<Option<PackageProvenanceResolution>, Error> {
        let Some(identifier) = self.find_identifier(identifier, connection).await? else {
            return Ok(None);
        };

        let select = package_provenance::Entity::find()
            .filter(package_provenance::Column::IdentifierId.eq(identifier.id));

        let select = match source {
            ProvenanceSource::Artifact(artifact) => {
                match self.find_remote_artifact(artifact, connection).await? {
                    Some(artifact) => {
                        select.filter(package_provenance::Column::ArtifactId.eq(artifact.id))
                    }
                    None => return Ok(None),
                }
            }
            ProvenanceSource::Vcs(vcs) => match self.find_vcs_info(vcs, connection).await? {
                Some(vcs) => select.filter(package_provenance::Column::VcsId.eq(vcs.id)),
                None => return Ok(None),
            },
        };

        match select
            .order_by_desc(package_provenance::Column::Id)
            .one(connection)
            .await?
        {
            Some(model) => self.load_package_provenance(model, connection).await,
            None => Ok(None),
        }
    }

    pub async fn get_package_provenances<C: ConnectionTrait>(
        &self,
        identifier: &Identifier,
        connection: &C,
    ) -> Result<Vec<PackageProvenanceResolution>, Error> {
        let Some(identifier) = self.find_identifier(identifier, connection).await? else {
            return Ok(vec![]);
        };

        let mut result = Vec::new();
        for model in package_provenance::Entity::find()
            .filter(package_provenance::Column::IdentifierId.eq(identifier.id))
            .order_by_asc(package_provenance::Column::Id)
            .all(connection)
            .await?
        {
            if let Some(resolution) = self.load_package_provenance(model, connection).await? {
                result.push(resolution);
            }
        }

        Ok(result)
    }

    /// An error message takes precedence, then the artifact and finally the repository.
    async fn load_package_provenance<C: ConnectionTrait>(
        &self,
        model: package_provenance::Model,
        connection: &C,
    ) -> Result<Option<PackageProvenanceResolution>, Error> {
        if let Some(message) = model.error_message {
            return Ok(Some(PackageProvenanceResolution::Unresolved { message }));
        }

        if let Some(artifact_id) = model.artifact_id {
            return Ok(Some(PackageProvenanceResolution::Artifact {
                provenance: ArtifactProvenance {
                    source_artifact: self.load_remote_artifact(artifact_id, connection).await?,
                },
            }));
        }

        if let Some(vcs_id) = model.vcs_id {
            return Ok(Some(PackageProvenanceResolution::Repository {
                provenance: RepositoryProvenance {
                    vcs_info: self.load_vcs_info(vcs_id, connection).await?,
                    resolved_revision: model.resolved_revision.unwrap_or_default(),
                },
                cloned_revision: model.cloned_revision.unwrap_or_default(),
                is_fixed_revision: model.is_fixed_revision.unwrap_or(false),
            }));
        }

        Ok(None)
    }

    // nested provenances

    async fn find_nested_provenance<C: ConnectionTrait>(
        &self,
        root: &RepositoryProvenance,
        connection: &C,
    ) -> Result<Option<nested_provenance::Model>, Error> {
        let Some(vcs) = self.find_vcs_info(&root.vcs_info, connection).await? else {
            return Ok(None);
        };

        Ok(nested_provenance::Entity::find()
            .filter(nested_provenance::Column::RootVcsId.eq(vcs.id))
            .filter(nested_provenance::Column::RootResolvedRevision.eq(&root.resolved_revision))
            .order_by_desc(nested_provenance::Column::Id)
            .one(connection)
            .await?)
    }

    /// Store the sub-repositories found below a repository and attach them to its package provenances.
    #[instrument(skip(self, resolution, connection), err)]
    pub async fn put_nested_provenance<C: ConnectionTrait>(
        &self,
        root: &RepositoryProvenance,
        resolution: &NestedProvenanceResolution,
        connection: &C,
    ) -> Result<nested_provenance::Model, Error> {
        let root_vcs = self.get_or_put_vcs_info(&root.vcs_info, connection).await?;

        let model = nested_provenance::ActiveModel {
            id: Default::default(),
            root_vcs_id: Set(root_vcs.id),
            root_resolved_revision: Set(root.resolved_revision.clone()),
            has_only_fixed_revisions: Set(resolution.has_only_fixed_revisions),
        }
        .insert(connection)
        .await?;

        for (path, repository) in &resolution.nested_provenance.sub_repositories {
            let vcs = self
                .get_or_put_vcs_info(&repository.vcs_info, connection)
                .await?;
            nested_provenance_sub_repository::ActiveModel {
                id: Default::default(),
                nested_provenance_id: Set(model.id),
                vcs_id: Set(vcs.id),
                resolved_revision: Set(repository.resolved_revision.clone()),
                path: Set(path.clone()),
            }
            .insert(connection)
            .await?;
        }

        for provenance in package_provenance::Entity::find()
            .filter(package_provenance::Column::VcsId.eq(root_vcs.id))
            .filter(package_provenance::Column::ResolvedRevision.eq(&root.resolved_revision))
            .all(connection)
            .await?
        {
            let mut provenance = provenance.into_active_model();
            provenance.nested_provenance_id = Set(Some(model.id));
            provenance.update(connection).await?;
        }

        Ok(model)
    }

    pub async fn get_nested_provenance<C: ConnectionTrait>(
        &self,
        root: &RepositoryProvenance,
        connection: &C,
    ) -> Result<Option<NestedProvenanceResolution>, Error> {
        let Some(model) = self.find_nested_provenance(root, connection).await? else {
            return Ok(None);
        };

        let mut sub_repositories = BTreeMap::new();
        for sub in model
            .find_related(nested_provenance_sub_repository::Entity)
            .all(connection)
            .await?
        {
            sub_repositories.insert(
                sub.path,
                RepositoryProvenance {
                    vcs_info: self.load_vcs_info(sub.vcs_id, connection).await?,
                    resolved_revision: sub.resolved_revision,
                },
            );
        }

        Ok(Some(NestedProvenanceResolution {
            nested_provenance: NestedProvenance {
                root: KnownProvenance::Repository(root.clone()),
                sub_repositories,
            },
            has_only_fixed_revisions: model.has_only_fixed_revisions,
        }))
    }

    /// The identifiers of all packages found by the analyzer of an ORT run.
    pub async fn package_identifiers_for_run<C: ConnectionTrait>(
        &self,
        ort_run_id: i64,
        connection: &C,
    ) -> Result<BTreeSet<Identifier>, Error> {
        let Some(job) = self
            .get_job_for_run(ort_run_id, ortserver_model::JobKind::Analyzer, connection)
            .await?
        else {
            return Ok(BTreeSet::new());
        };

        Ok(self
            .get_analyzer_run_for_job(job.id, connection)
            .await?
            .map(|run| {
                run.packages
                    .into_iter()
                    .map(|package| package.identifier)
                    .collect()
            })
            .unwrap_or_default())
    }
}
