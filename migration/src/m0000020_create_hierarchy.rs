use crate::m0000010_create_shared_tables::VcsInfo;
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
                    .table(Organization::Table)
                    .col(id(Organization::Id))
                    .col(
                        ColumnDef::new(Organization::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Organization::Description).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .col(id(Product::Id))
                    .col(
                        ColumnDef::new(Product::OrganizationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Product::Name).string().not_null())
                    .col(ColumnDef::new(Product::Description).text())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Product::Table, Product::OrganizationId)
                            .to(Organization::Table, Organization::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "product_organization_name_idx",
                Product::Table,
                [Product::OrganizationId, Product::Name],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Repository::Table)
                    .col(id(Repository::Id))
                    .col(
                        ColumnDef::new(Repository::ProductId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Repository::Type).string().not_null())
                    .col(ColumnDef::new(Repository::Url).string().not_null())
                    .col(ColumnDef::new(Repository::Description).text())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Repository::Table, Repository::ProductId)
                            .to(Product::Table, Product::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "repository_product_url_idx",
                Repository::Table,
                [Repository::ProductId, Repository::Url],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrtRun::Table)
                    .col(id(OrtRun::Id))
                    .col(ColumnDef::new(OrtRun::Index).big_integer().not_null())
                    .col(ColumnDef::new(OrtRun::RepositoryId).big_integer().not_null())
                    .col(ColumnDef::new(OrtRun::Revision).string().not_null())
                    .col(ColumnDef::new(OrtRun::ResolvedRevision).string())
                    .col(ColumnDef::new(OrtRun::Path).string())
                    .col(
                        ColumnDef::new(OrtRun::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrtRun::FinishedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(OrtRun::Status).string().not_null())
                    .col(ColumnDef::new(OrtRun::Labels).json().not_null())
                    .col(ColumnDef::new(OrtRun::JobConfigContext).string())
                    .col(ColumnDef::new(OrtRun::ResolvedJobConfigContext).string())
                    .col(ColumnDef::new(OrtRun::EnvironmentConfigPath).string())
                    .col(ColumnDef::new(OrtRun::TraceId).string())
                    .col(ColumnDef::new(OrtRun::VcsId).big_integer())
                    .col(ColumnDef::new(OrtRun::VcsProcessedId).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .from(OrtRun::Table, OrtRun::RepositoryId)
                            .to(Repository::Table, Repository::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(OrtRun::Table, OrtRun::VcsId)
                            .to(VcsInfo::Table, VcsInfo::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(OrtRun::Table, OrtRun::VcsProcessedId)
                            .to(VcsInfo::Table, VcsInfo::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "ort_run_repository_index_idx",
                OrtRun::Table,
                [OrtRun::RepositoryId, OrtRun::Index],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Job::Table)
                    .col(id(Job::Id))
                    .col(ColumnDef::new(Job::OrtRunId).big_integer().not_null())
                    .col(ColumnDef::new(Job::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Job::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Job::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Job::FinishedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Job::Status).string().not_null())
                    .col(ColumnDef::new(Job::Configuration).json().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Job::Table, Job::OrtRunId)
                            .to(OrtRun::Table, OrtRun::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "job_run_kind_idx",
                Job::Table,
                [Job::OrtRunId, Job::Kind],
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Job::Table.into_iden(),
            OrtRun::Table.into_iden(),
            Repository::Table.into_iden(),
            Product::Table.into_iden(),
            Organization::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Organization {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
pub enum Product {
    Table,
    Id,
    OrganizationId,
    Name,
    Description,
}

#[derive(DeriveIden)]
pub enum Repository {
    Table,
    Id,
    ProductId,
    Type,
    Url,
    Description,
}

#[derive(DeriveIden)]
pub enum OrtRun {
    Table,
    Id,
    Index,
    RepositoryId,
    Revision,
    ResolvedRevision,
    Path,
    CreatedAt,
    FinishedAt,
    Status,
    Labels,
    JobConfigContext,
    ResolvedJobConfigContext,
    EnvironmentConfigPath,
    TraceId,
    VcsId,
    VcsProcessedId,
}

#[derive(DeriveIden)]
pub enum Job {
    Table,
    Id,
    OrtRunId,
    Kind,
    CreatedAt,
    StartedAt,
    FinishedAt,
    Status,
    Configuration,
}
