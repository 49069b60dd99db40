use crate::m0000010_create_shared_tables::{Identifier, Issue, RemoteArtifact, VcsInfo};
use crate::m0000020_create_hierarchy::Job;
use crate::m0000030_create_analyzer_tables::join_table;
use crate::{id, unique_index};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScannerRun::Table)
                    .col(id(ScannerRun::Id))
                    .col(ColumnDef::new(ScannerRun::JobId).big_integer().not_null())
                    .col(ColumnDef::new(ScannerRun::StartTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(ScannerRun::EndTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(ScannerRun::Environment).json())
                    .col(ColumnDef::new(ScannerRun::Config).json())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ScannerRun::Table, ScannerRun::JobId)
                            .to(Job::Table, Job::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ScanSummary::Table)
                    .col(id(ScanSummary::Id))
                    .col(
                        ColumnDef::new(ScanSummary::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScanSummary::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScanSummary::Hash).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("scan_summary_hash_idx")
                    .table(ScanSummary::Table)
                    .col(ScanSummary::Hash)
                    .to_owned(),
            )
            .await?;

        join_table(
            manager,
            ScanSummariesIssues::Table,
            (
                ScanSummariesIssues::ScanSummaryId,
                ScanSummary::Table,
                ScanSummary::Id,
            ),
            (ScanSummariesIssues::IssueId, Issue::Table, Issue::Id),
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(LicenseFinding::Table)
                    .col(id(LicenseFinding::Id))
                    .col(
                        ColumnDef::new(LicenseFinding::ScanSummaryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LicenseFinding::License).text().not_null())
                    .col(ColumnDef::new(LicenseFinding::Path).string().not_null())
                    .col(ColumnDef::new(LicenseFinding::StartLine).integer().not_null())
                    .col(ColumnDef::new(LicenseFinding::EndLine).integer().not_null())
                    .col(ColumnDef::new(LicenseFinding::Score).float())
                    .foreign_key(
                        ForeignKey::create()
                            .from(LicenseFinding::Table, LicenseFinding::ScanSummaryId)
                            .to(ScanSummary::Table, ScanSummary::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CopyrightFinding::Table)
                    .col(id(CopyrightFinding::Id))
                    .col(
                        ColumnDef::new(CopyrightFinding::ScanSummaryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CopyrightFinding::Statement).text().not_null())
                    .col(ColumnDef::new(CopyrightFinding::Path).string().not_null())
                    .col(
                        ColumnDef::new(CopyrightFinding::StartLine)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CopyrightFinding::EndLine).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(CopyrightFinding::Table, CopyrightFinding::ScanSummaryId)
                            .to(ScanSummary::Table, ScanSummary::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SnippetFinding::Table)
                    .col(id(SnippetFinding::Id))
                    .col(
                        ColumnDef::new(SnippetFinding::ScanSummaryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SnippetFinding::Path).string().not_null())
                    .col(ColumnDef::new(SnippetFinding::StartLine).integer().not_null())
                    .col(ColumnDef::new(SnippetFinding::EndLine).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(SnippetFinding::Table, SnippetFinding::ScanSummaryId)
                            .to(ScanSummary::Table, ScanSummary::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Snippet::Table)
                    .col(id(Snippet::Id))
                    .col(ColumnDef::new(Snippet::Purl).string().not_null())
                    .col(ColumnDef::new(Snippet::ArtifactId).big_integer())
                    .col(ColumnDef::new(Snippet::VcsId).big_integer())
                    .col(ColumnDef::new(Snippet::Path).string().not_null())
                    .col(ColumnDef::new(Snippet::StartLine).integer().not_null())
                    .col(ColumnDef::new(Snippet::EndLine).integer().not_null())
                    .col(ColumnDef::new(Snippet::License).text().not_null())
                    .col(ColumnDef::new(Snippet::Score).float().not_null())
                    .col(ColumnDef::new(Snippet::AdditionalData).json().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Snippet::Table, Snippet::ArtifactId)
                            .to(RemoteArtifact::Table, RemoteArtifact::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Snippet::Table, Snippet::VcsId)
                            .to(VcsInfo::Table, VcsInfo::Id),
                    )
                    .to_owned(),
            )
            .await?;

        join_table(
            manager,
            SnippetFindingsSnippets::Table,
            (
                SnippetFindingsSnippets::SnippetFindingId,
                SnippetFinding::Table,
                SnippetFinding::Id,
            ),
            (SnippetFindingsSnippets::SnippetId, Snippet::Table, Snippet::Id),
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(ScanResult::Table)
                    .col(id(ScanResult::Id))
                    .col(ColumnDef::new(ScanResult::ArtifactUrl).string())
                    .col(ColumnDef::new(ScanResult::ArtifactHash).string())
                    .col(ColumnDef::new(ScanResult::ArtifactHashAlgorithm).string())
                    .col(ColumnDef::new(ScanResult::VcsType).string())
                    .col(ColumnDef::new(ScanResult::VcsUrl).string())
                    .col(ColumnDef::new(ScanResult::VcsRevision).string())
                    .col(ColumnDef::new(ScanResult::ScannerName).string().not_null())
                    .col(ColumnDef::new(ScanResult::ScannerVersion).string().not_null())
                    .col(
                        ColumnDef::new(ScanResult::ScannerConfiguration)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScanResult::ScanSummaryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScanResult::AdditionalData).json().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ScanResult::Table, ScanResult::ScanSummaryId)
                            .to(ScanSummary::Table, ScanSummary::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        join_table(
            manager,
            ScannerRunsScanResults::Table,
            (
                ScannerRunsScanResults::ScannerRunId,
                ScannerRun::Table,
                ScannerRun::Id,
            ),
            (
                ScannerRunsScanResults::ScanResultId,
                ScanResult::Table,
                ScanResult::Id,
            ),
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(NestedProvenance::Table)
                    .col(id(NestedProvenance::Id))
                    .col(
                        ColumnDef::new(NestedProvenance::RootVcsId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NestedProvenance::RootResolvedRevision)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NestedProvenance::HasOnlyFixedRevisions)
                            .boolean()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(NestedProvenance::Table, NestedProvenance::RootVcsId)
                            .to(VcsInfo::Table, VcsInfo::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "nested_provenance_root_idx",
                NestedProvenance::Table,
                [
                    NestedProvenance::RootVcsId,
                    NestedProvenance::RootResolvedRevision,
                ],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NestedProvenanceSubRepository::Table)
                    .col(id(NestedProvenanceSubRepository::Id))
                    .col(
                        ColumnDef::new(NestedProvenanceSubRepository::NestedProvenanceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NestedProvenanceSubRepository::VcsId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NestedProvenanceSubRepository::ResolvedRevision)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NestedProvenanceSubRepository::Path)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                NestedProvenanceSubRepository::Table,
                                NestedProvenanceSubRepository::NestedProvenanceId,
                            )
                            .to(NestedProvenance::Table, NestedProvenance::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                NestedProvenanceSubRepository::Table,
                                NestedProvenanceSubRepository::VcsId,
                            )
                            .to(VcsInfo::Table, VcsInfo::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PackageProvenance::Table)
                    .col(id(PackageProvenance::Id))
                    .col(
                        ColumnDef::new(PackageProvenance::IdentifierId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PackageProvenance::ArtifactId).big_integer())
                    .col(ColumnDef::new(PackageProvenance::VcsId).big_integer())
                    .col(ColumnDef::new(PackageProvenance::ResolvedRevision).string())
                    .col(ColumnDef::new(PackageProvenance::ClonedRevision).string())
                    .col(ColumnDef::new(PackageProvenance::IsFixedRevision).boolean())
                    .col(ColumnDef::new(PackageProvenance::ErrorMessage).text())
                    .col(ColumnDef::new(PackageProvenance::NestedProvenanceId).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .from(PackageProvenance::Table, PackageProvenance::IdentifierId)
                            .to(Identifier::Table, Identifier::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PackageProvenance::Table, PackageProvenance::ArtifactId)
                            .to(RemoteArtifact::Table, RemoteArtifact::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PackageProvenance::Table, PackageProvenance::VcsId)
                            .to(VcsInfo::Table, VcsInfo::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                PackageProvenance::Table,
                                PackageProvenance::NestedProvenanceId,
                            )
                            .to(NestedProvenance::Table, NestedProvenance::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        join_table(
            manager,
            ScannerRunsPackageProvenances::Table,
            (
                ScannerRunsPackageProvenances::ScannerRunId,
                ScannerRun::Table,
                ScannerRun::Id,
            ),
            (
                ScannerRunsPackageProvenances::PackageProvenanceId,
                PackageProvenance::Table,
                PackageProvenance::Id,
            ),
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            ScannerRunsPackageProvenances::Table.into_iden(),
            PackageProvenance::Table.into_iden(),
            NestedProvenanceSubRepository::Table.into_iden(),
            NestedProvenance::Table.into_iden(),
            ScannerRunsScanResults::Table.into_iden(),
            ScanResult::Table.into_iden(),
            SnippetFindingsSnippets::Table.into_iden(),
            Snippet::Table.into_iden(),
            SnippetFinding::Table.into_iden(),
            CopyrightFinding::Table.into_iden(),
            LicenseFinding::Table.into_iden(),
            ScanSummariesIssues::Table.into_iden(),
            ScanSummary::Table.into_iden(),
            ScannerRun::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ScannerRun {
    Table,
    Id,
    JobId,
    StartTime,
    EndTime,
    Environment,
    Config,
}

#[derive(DeriveIden)]
pub enum ScanSummary {
    Table,
    Id,
    StartTime,
    EndTime,
    Hash,
}

#[derive(DeriveIden, Clone)]
pub enum ScanSummariesIssues {
    Table,
    ScanSummaryId,
    IssueId,
}

#[derive(DeriveIden)]
pub enum LicenseFinding {
    Table,
    Id,
    ScanSummaryId,
    License,
    Path,
    StartLine,
    EndLine,
    Score,
}

#[derive(DeriveIden)]
pub enum CopyrightFinding {
    Table,
    Id,
    ScanSummaryId,
    Statement,
    Path,
    StartLine,
    EndLine,
}

#[derive(DeriveIden)]
pub enum SnippetFinding {
    Table,
    Id,
    ScanSummaryId,
    Path,
    StartLine,
    EndLine,
}

#[derive(DeriveIden)]
pub enum Snippet {
    Table,
    Id,
    Purl,
    ArtifactId,
    VcsId,
    Path,
    StartLine,
    EndLine,
    License,
    Score,
    AdditionalData,
}

#[derive(DeriveIden, Clone)]
pub enum SnippetFindingsSnippets {
    Table,
    SnippetFindingId,
    SnippetId,
}

#[derive(DeriveIden)]
pub enum ScanResult {
    Table,
    Id,
    ArtifactUrl,
    ArtifactHash,
    ArtifactHashAlgorithm,
    VcsType,
    VcsUrl,
    VcsRevision,
    ScannerName,
    ScannerVersion,
    ScannerConfiguration,
    ScanSummaryId,
    AdditionalData,
}

#[derive(DeriveIden, Clone)]
pub enum ScannerRunsScanResults {
    Table,
    ScannerRunId,
    ScanResultId,
}

#[derive(DeriveIden)]
pub enum NestedProvenance {
    Table,
    Id,
    RootVcsId,
    RootResolvedRevision,
    HasOnlyFixedRevisions,
}

#[derive(DeriveIden)]
pub enum NestedProvenanceSubRepository {
    Table,
    Id,
    NestedProvenanceId,
    VcsId,
    ResolvedRevision,
    Path,
}

#[derive(DeriveIden)]
pub enum PackageProvenance {
    Table,
    Id,
    IdentifierId,
    ArtifactId,
    VcsId,
    ResolvedRevision,
    ClonedRevision,
    IsFixedRevision,
    ErrorMessage,
    NestedProvenanceId,
}

#[derive(DeriveIden, Clone)]
pub enum ScannerRunsPackageProvenances {
    Table,
    ScannerRunId,
    PackageProvenanceId,
}
