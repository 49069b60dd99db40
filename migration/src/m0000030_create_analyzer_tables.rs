use crate::m0000010_create_shared_tables::{
    Author, DeclaredLicense, Identifier, Issue, RemoteArtifact, VcsInfo,
};
use crate::m0000020_create_hierarchy::{Job, OrtRun};
use crate::id;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AnalyzerRun::Table)
                    .col(id(AnalyzerRun::Id))
                    .col(ColumnDef::new(AnalyzerRun::JobId).big_integer().not_null())
                    .col(
                        ColumnDef::new(AnalyzerRun::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AnalyzerRun::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AnalyzerRun::Environment).json().not_null())
                    .col(ColumnDef::new(AnalyzerRun::Config).json().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(AnalyzerRun::Table, AnalyzerRun::JobId)
                            .to(Job::Table, Job::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Package::Table)
                    .col(id(Package::Id))
                    .col(ColumnDef::new(Package::IdentifierId).big_integer().not_null())
                    .col(ColumnDef::new(Package::Purl).string().not_null())
                    .col(ColumnDef::new(Package::Cpe).string())
                    .col(ColumnDef::new(Package::Description).text().not_null())
                    .col(ColumnDef::new(Package::HomepageUrl).string().not_null())
                    .col(ColumnDef::new(Package::BinaryArtifactId).big_integer().not_null())
                    .col(ColumnDef::new(Package::SourceArtifactId).big_integer().not_null())
                    .col(ColumnDef::new(Package::VcsId).big_integer().not_null())
                    .col(ColumnDef::new(Package::VcsProcessedId).big_integer().not_null())
                    .col(ColumnDef::new(Package::IsMetadataOnly).boolean().not_null())
                    .col(ColumnDef::new(Package::IsModified).boolean().not_null())
                    .col(ColumnDef::new(Package::SpdxExpression).text())
                    .col(ColumnDef::new(Package::MappedLicenses).json().not_null())
                    .col(ColumnDef::new(Package::UnmappedLicenses).json().not_null())
                    .col(
                        ColumnDef::new(Package::ContentHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Package::Table, Package::IdentifierId)
                            .to(Identifier::Table, Identifier::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Package::Table, Package::BinaryArtifactId)
                            .to(RemoteArtifact::Table, RemoteArtifact::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Package::Table, Package::SourceArtifactId)
                            .to(RemoteArtifact::Table, RemoteArtifact::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Package::Table, Package::VcsId)
                            .to(VcsInfo::Table, VcsInfo::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Package::Table, Package::VcsProcessedId)
                            .to(VcsInfo::Table, VcsInfo::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .col(id(Project::Id))
                    .col(ColumnDef::new(Project::IdentifierId).big_integer().not_null())
                    .col(ColumnDef::new(Project::Cpe).string())
                    .col(ColumnDef::new(Project::DefinitionFilePath).string().not_null())
                    .col(ColumnDef::new(Project::HomepageUrl).string().not_null())
                    .col(ColumnDef::new(Project::VcsId).big_integer().not_null())
                    .col(ColumnDef::new(Project::VcsProcessedId).big_integer().not_null())
                    .col(ColumnDef::new(Project::SpdxExpression).text())
                    .col(ColumnDef::new(Project::MappedLicenses).json().not_null())
                    .col(ColumnDef::new(Project::UnmappedLicenses).json().not_null())
                    .col(ColumnDef::new(Project::ScopeNames).json().not_null())
                    .col(
                        ColumnDef::new(Project::ContentHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Project::Table, Project::IdentifierId)
                            .to(Identifier::Table, Identifier::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Project::Table, Project::VcsId)
                            .to(VcsInfo::Table, VcsInfo::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Project::Table, Project::VcsProcessedId)
                            .to(VcsInfo::Table, VcsInfo::Id),
                    )
                    .to_owned(),
            )
            .await?;

        join_table(
            manager,
            PackagesAuthors::Table,
            (PackagesAuthors::PackageId, Package::Table, Package::Id),
            (PackagesAuthors::AuthorId, Author::Table, Author::Id),
        )
        .await?;
        join_table(
            manager,
            PackagesDeclaredLicenses::Table,
            (
                PackagesDeclaredLicenses::PackageId,
                Package::Table,
                Package::Id,
            ),
            (
                PackagesDeclaredLicenses::DeclaredLicenseId,
                DeclaredLicense::Table,
                DeclaredLicense::Id,
            ),
        )
        .await?;
        join_table(
            manager,
            ProjectsAuthors::Table,
            (ProjectsAuthors::ProjectId, Project::Table, Project::Id),
            (ProjectsAuthors::AuthorId, Author::Table, Author::Id),
        )
        .await?;
        join_table(
            manager,
            ProjectsDeclaredLicenses::Table,
            (
                ProjectsDeclaredLicenses::ProjectId,
                Project::Table,
                Project::Id,
            ),
            (
                ProjectsDeclaredLicenses::DeclaredLicenseId,
                DeclaredLicense::Table,
                DeclaredLicense::Id,
            ),
        )
        .await?;
        join_table(
            manager,
            PackagesAnalyzerRuns::Table,
            (PackagesAnalyzerRuns::PackageId, Package::Table, Package::Id),
            (
                PackagesAnalyzerRuns::AnalyzerRunId,
                AnalyzerRun::Table,
                AnalyzerRun::Id,
            ),
        )
        .await?;
        join_table(
            manager,
            ProjectsAnalyzerRuns::Table,
            (ProjectsAnalyzerRuns::ProjectId, Project::Table, Project::Id),
            (
                ProjectsAnalyzerRuns::AnalyzerRunId,
                AnalyzerRun::Table,
                AnalyzerRun::Id,
            ),
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrtRunsIssues::Table)
                    .col(id(OrtRunsIssues::Id))
                    .col(ColumnDef::new(OrtRunsIssues::OrtRunId).big_integer().not_null())
                    .col(ColumnDef::new(OrtRunsIssues::IssueId).big_integer().not_null())
                    .col(ColumnDef::new(OrtRunsIssues::IdentifierId).big_integer())
                    .col(ColumnDef::new(OrtRunsIssues::Worker).string())
                    .foreign_key(
                        ForeignKey::create()
                            .from(OrtRunsIssues::Table, OrtRunsIssues::OrtRunId)
                            .to(OrtRun::Table, OrtRun::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(OrtRunsIssues::Table, OrtRunsIssues::IssueId)
                            .to(Issue::Table, Issue::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(OrtRunsIssues::Table, OrtRunsIssues::IdentifierId)
                            .to(Identifier::Table, Identifier::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            OrtRunsIssues::Table.into_iden(),
            ProjectsAnalyzerRuns::Table.into_iden(),
            PackagesAnalyzerRuns::Table.into_iden(),
            ProjectsDeclaredLicenses::Table.into_iden(),
            ProjectsAuthors::Table.into_iden(),
            PackagesDeclaredLicenses::Table.into_iden(),
            PackagesAuthors::Table.into_iden(),
            Project::Table.into_iden(),
            Package::Table.into_iden(),
            AnalyzerRun::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}

/// Create a many-to-many table keyed by both sides, cascading deletes from either.
///
/// Each side is given as `(column, referenced table, referenced column)`.
pub(crate) async fn join_table<T, LC, LT, LR, RC, RT, RR>(
    manager: &SchemaManager<'_>,
    table: T,
    (left, left_table, left_ref): (LC, LT, LR),
    (right, right_table, right_ref): (RC, RT, RR),
) -> Result<(), DbErr>
where
    T: IntoIden + Clone + 'static,
    LC: IntoIden + Clone + 'static,
    LT: IntoIden + 'static,
    LR: IntoIden + 'static,
    RC: IntoIden + Clone + 'static,
    RT: IntoIden + 'static,
    RR: IntoIden + 'static,
{
    manager
        .create_table(
            Table::create()
                .table(table.clone())
                .col(ColumnDef::new(left.clone()).big_integer().not_null())
                .col(ColumnDef::new(right.clone()).big_integer().not_null())
                .primary_key(Index::create().col(left.clone()).col(right.clone()))
                .foreign_key(
                    ForeignKey::create()
                        .from(table.clone(), left)
                        .to(left_table, left_ref)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .from(table, right)
                        .to(right_table, right_ref)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await
}

#[derive(DeriveIden)]
pub enum AnalyzerRun {
    Table,
    Id,
    JobId,
    StartTime,
    EndTime,
    Environment,
    Config,
}

#[derive(DeriveIden)]
pub enum Package {
    Table,
    Id,
    IdentifierId,
    Purl,
    Cpe,
    Description,
    HomepageUrl,
    BinaryArtifactId,
    SourceArtifactId,
    VcsId,
    VcsProcessedId,
    IsMetadataOnly,
    IsModified,
    SpdxExpression,
    MappedLicenses,
    UnmappedLicenses,
    ContentHash,
}

#[derive(DeriveIden)]
pub enum Project {
    Table,
    Id,
    IdentifierId,
    Cpe,
    DefinitionFilePath,
    HomepageUrl,
    VcsId,
    VcsProcessedId,
    SpdxExpression,
    MappedLicenses,
    UnmappedLicenses,
    ScopeNames,
    ContentHash,
}

#[derive(DeriveIden, Clone)]
pub enum PackagesAuthors {
    Table,
    PackageId,
    AuthorId,
}

#[derive(DeriveIden, Clone)]
pub enum PackagesDeclaredLicenses {
    Table,
    PackageId,
    DeclaredLicenseId,
}

#[derive(DeriveIden, Clone)]
pub enum ProjectsAuthors {
    Table,
    ProjectId,
    AuthorId,
}

#[derive(DeriveIden, Clone)]
pub enum ProjectsDeclaredLicenses {
    Table,
    ProjectId,
    DeclaredLicenseId,
}

#[derive(DeriveIden, Clone)]
pub enum PackagesAnalyzerRuns {
    Table,
    PackageId,
    AnalyzerRunId,
}

#[derive(DeriveIden, Clone)]
pub enum ProjectsAnalyzerRuns {
    Table,
    ProjectId,
    AnalyzerRunId,
}

#[derive(DeriveIden)]
pub enum OrtRunsIssues {
    Table,
    Id,
    OrtRunId,
    IssueId,
    IdentifierId,
    Worker,
}
