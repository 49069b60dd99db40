#[cfg(test)]
mod test;

use crate::Error;
use ortserver_common::{
    config::{ChunkedRemoval, OrphanRemoval},
    db::Database,
};
use ortserver_entity::{
    advisor_result, author, declared_license, identifier, nested_provenance,
    nested_provenance_sub_repository, ort_run, ort_run_issue, package, package_analyzer_run,
    package_author, package_declared_license, package_provenance, project, project_analyzer_run,
    project_author, project_declared_license, remote_artifact, rule_violation, scan_result,
    scanner_run_scan_result, snippet, snippet_finding, snippet_finding_snippet, vcs_info,
};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, QueryTrait,
};
use sea_query::SelectStatement;
use serde::Serialize;
use std::time::Instant;
use tracing::instrument;

/// The number of rows removed from each table by one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrphanCounts {
    pub packages: u64,
    pub projects: u64,
    pub authors: u64,
    pub declared_licenses: u64,
    pub identifiers: u64,
    pub snippet_associations: u64,
    pub snippet_findings: u64,
    pub snippets: u64,
    pub vcs_info: u64,
    pub remote_artifacts: u64,
}

/// The non-null values of a referencing column.
fn referenced<E: EntityTrait>(column: E::Column) -> SelectStatement {
    E::find()
        .select_only()
        .column(column)
        .filter(column.is_not_null())
        .into_query()
}

/// Rows whose id is not among any of the referencing values.
fn unreferenced<C: ColumnTrait>(id: C, references: Vec<SelectStatement>) -> Condition {
    references
        .into_iter()
        .fold(Condition::all(), |condition, reference| {
            condition.add(id.not_in_subquery(reference))
        })
}

/// Removes shared rows no run refers to any more.
///
/// Deleting runs only removes what belongs to them alone. Packages, projects and the rows they
/// share with other runs stay behind and are cleaned up here.
pub struct OrphanRemovalService {
    db: Database,
}

impl OrphanRemovalService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn delete_runs_orphaned_entities(
        &self,
        config: &OrphanRemoval,
    ) -> Result<OrphanCounts, Error> {
        let start = Instant::now();
        let mut counts = OrphanCounts::default();

        counts.packages = self
            .delete_direct::<package::Entity>(
                "packages",
                unreferenced(
                    package::Column::Id,
                    vec![referenced::<package_analyzer_run::Entity>(
                        package_analyzer_run::Column::PackageId,
                    )],
                ),
            )
            .await?;

        counts.projects = self
            .delete_direct::<project::Entity>(
                "projects",
                unreferenced(
                    project::Column::Id,
                    vec![referenced::<project_analyzer_run::Entity>(
                        project_analyzer_run::Column::ProjectId,
                    )],
                ),
            )
            .await?;

        counts.authors = self
            .delete_direct::<author::Entity>(
                "authors",
                unreferenced(
                    author::Column::Id,
                    vec![
                        referenced::<package_author::Entity>(package_author::Column::AuthorId),
                        referenced::<project_author::Entity>(project_author::Column::AuthorId),
                    ],
                ),
            )
            .await?;

        counts.declared_licenses = self
            .delete_direct::<declared_license::Entity>(
                "declared licenses",
                unreferenced(
                    declared_license::Column::Id,
                    vec![
                        referenced::<package_declared_license::Entity>(
                            package_declared_license::Column::DeclaredLicenseId,
                        ),
                        referenced::<project_declared_license::Entity>(
                            project_declared_license::Column::DeclaredLicenseId,
                        ),
                    ],
                ),
            )
            .await?;

        counts.identifiers = self
            .delete_direct::<identifier::Entity>(
                "identifiers",
                unreferenced(
                    identifier::Column::Id,
                    vec![
                        referenced::<package::Entity>(package::Column::IdentifierId),
                        referenced::<project::Entity>(project::Column::IdentifierId),
                        referenced::<ort_run_issue::Entity>(ort_run_issue::Column::IdentifierId),
                        referenced::<rule_violation::Entity>(rule_violation::Column::IdentifierId),
                        referenced::<advisor_result::Entity>(advisor_result::Column::IdentifierId),
                        referenced::<package_provenance::Entity>(
                            package_provenance::Column::IdentifierId,
                        ),
                    ],
                ),
            )
            .await?;

        counts.snippet_associations = self.delete_unlinked_snippet_associations().await?;

        counts.snippet_findings = self
            .delete_chunked::<snippet_finding::Entity>(
                "snippet findings",
                snippet_finding::Column::Id,
                unreferenced(
                    snippet_finding::Column::Id,
                    vec![referenced::<snippet_finding_snippet::Entity>(
                        snippet_finding_snippet::Column::SnippetFindingId,
                    )],
                ),
                config.snippet_findings(),
            )
            .await?;

        counts.snippets = self
            .delete_chunked::<snippet::Entity>(
                "snippets",
                snippet::Column::Id,
                unreferenced(
                    snippet::Column::Id,
                    vec![referenced::<snippet_finding_snippet::Entity>(
                        snippet_finding_snippet::Column::SnippetId,
                    )],
                ),
                config.snippets(),
            )
            .await?;

        counts.vcs_info = self
            .delete_chunked::<vcs_info::Entity>(
                "VCS info",
                vcs_info::Column::Id,
                unreferenced(
                    vcs_info::Column::Id,
                    vec![
                        referenced::<ort_run::Entity>(ort_run::Column::VcsId),
                        referenced::<ort_run::Entity>(ort_run::Column::VcsProcessedId),
                        referenced::<package::Entity>(package::Column::VcsId),
                        referenced::<package::Entity>(package::Column::VcsProcessedId),
                        referenced::<project::Entity>(project::Column::VcsId),
                        referenced::<project::Entity>(project::Column::VcsProcessedId),
                        referenced::<nested_provenance::Entity>(
                            nested_provenance::Column::RootVcsId,
                        ),
                        referenced::<nested_provenance_sub_repository::Entity>(
                            nested_provenance_sub_repository::Column::VcsId,
                        ),
                        referenced::<package_provenance::Entity>(package_provenance::Column::VcsId),
                        referenced::<snippet::Entity>(snippet::Column::VcsId),
                    ],
                ),
                config.vcs_info(),
            )
            .await?;

        counts.remote_artifacts = self
            .delete_chunked::<remote_artifact::Entity>(
                "remote artifacts",
                remote_artifact::Column::Id,
                unreferenced(
                    remote_artifact::Column::Id,
                    vec![
                        referenced::<package::Entity>(package::Column::BinaryArtifactId),
                        referenced::<package::Entity>(package::Column::SourceArtifactId),
                        referenced::<package_provenance::Entity>(
                            package_provenance::Column::ArtifactId,
                        ),
                        referenced::<snippet::Entity>(snippet::Column::ArtifactId),
                    ],
                ),
                config.remote_artifacts(),
            )
            .await?;

        log::info!(
            "Removed orphaned entities in {:?}: {counts:?}",
            start.elapsed()
        );

        Ok(counts)
    }

    async fn delete_direct<E: EntityTrait>(
        &self,
        table: &str,
        condition: Condition,
    ) -> Result<u64, Error> {
        let result = E::delete_many().filter(condition).exec(&self.db).await?;
        log::info!("Deleted {} orphaned {table}", result.rows_affected);
        Ok(result.rows_affected)
    }

    /// Detach snippets from the findings of scan summaries no scanner run links to any more.
    async fn delete_unlinked_snippet_associations(&self) -> Result<u64, Error> {
        let linked_summaries = scan_result::Entity::find()
            .select_only()
            .column(scan_result::Column::ScanSummaryId)
            .filter(
                scan_result::Column::Id.in_subquery(referenced::<scanner_run_scan_result::Entity>(
                    scanner_run_scan_result::Column::ScanResultId,
                )),
            )
            .into_query();

        let unlinked_findings = snippet_finding::Entity::find()
            .select_only()
            .column(snippet_finding::Column::Id)
            .filter(snippet_finding::Column::ScanSummaryId.not_in_subquery(linked_summaries))
            .into_query();

        self.delete_direct::<snippet_finding_snippet::Entity>(
            "snippet associations",
            Condition::all()
                .add(snippet_finding_snippet::Column::SnippetFindingId.in_subquery(unlinked_findings)),
        )
        .await
    }

    /// Delete up to `limit` orphans, `chunk_size` rows per statement. A failing chunk is skipped.
    async fn delete_chunked<E: EntityTrait>(
        &self,
        table: &str,
        id: E::Column,
        condition: Condition,
        config: ChunkedRemoval,
    ) -> Result<u64, Error> {
        let ids = E::find()
            .select_only()
            .column(id)
            .filter(condition)
            .limit(config.limit)
            .into_tuple::<i64>()
            .all(&self.db)
            .await?;

        log::debug!("Found {} orphaned {table} ({config})", ids.len());

        let mut deleted = 0;
        for chunk in ids.chunks(config.chunk_size.max(1)) {
            match E::delete_many()
                .filter(id.is_in(chunk.iter().copied()))
                .exec(&self.db)
                .await
            {
                Ok(result) => deleted += result.rows_affected,
                Err(err) => log::error!(
                    "Failed to delete a chunk of {} orphaned {table}: {err}",
                    chunk.len()
                ),
            }
        }

        log::info!("Deleted {deleted} orphaned {table}");
        Ok(deleted)
    }
}
