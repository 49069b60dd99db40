use crate::m0000010_create_shared_tables::Identifier;
use crate::m0000020_create_hierarchy::Job;
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
                    .table(AdvisorRun::Table)
                    .col(id(AdvisorRun::Id))
                    .col(ColumnDef::new(AdvisorRun::JobId).big_integer().not_null())
                    .col(
                        ColumnDef::new(AdvisorRun::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdvisorRun::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdvisorRun::Environment).json().not_null())
                    .col(ColumnDef::new(AdvisorRun::Config).json().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(AdvisorRun::Table, AdvisorRun::JobId)
                            .to(Job::Table, Job::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "advisor_run_job_idx",
                AdvisorRun::Table,
                [AdvisorRun::JobId],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdvisorResult::Table)
                    .col(id(AdvisorResult::Id))
                    .col(
                        ColumnDef::new(AdvisorResult::AdvisorRunId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdvisorResult::IdentifierId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdvisorResult::AdvisorName).string().not_null())
                    .col(ColumnDef::new(AdvisorResult::Capabilities).json().not_null())
                    .col(
                        ColumnDef::new(AdvisorResult::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdvisorResult::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AdvisorResult::Table, AdvisorResult::AdvisorRunId)
                            .to(AdvisorRun::Table, AdvisorRun::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AdvisorResult::Table, AdvisorResult::IdentifierId)
                            .to(Identifier::Table, Identifier::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vulnerability::Table)
                    .col(id(Vulnerability::Id))
                    .col(
                        ColumnDef::new(Vulnerability::AdvisorResultId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Vulnerability::ExternalId).string().not_null())
                    .col(ColumnDef::new(Vulnerability::Summary).text())
                    .col(ColumnDef::new(Vulnerability::Description).text())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Vulnerability::Table, Vulnerability::AdvisorResultId)
                            .to(AdvisorResult::Table, AdvisorResult::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VulnerabilityReference::Table)
                    .col(id(VulnerabilityReference::Id))
                    .col(
                        ColumnDef::new(VulnerabilityReference::VulnerabilityId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VulnerabilityReference::Url).text().not_null())
                    .col(ColumnDef::new(VulnerabilityReference::ScoringSystem).string())
                    .col(ColumnDef::new(VulnerabilityReference::Severity).string())
                    .col(ColumnDef::new(VulnerabilityReference::Score).float())
                    .col(ColumnDef::new(VulnerabilityReference::Vector).string())
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                VulnerabilityReference::Table,
                                VulnerabilityReference::VulnerabilityId,
                            )
                            .to(Vulnerability::Table, Vulnerability::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            VulnerabilityReference::Table.into_iden(),
            Vulnerability::Table.into_iden(),
            AdvisorResult::Table.into_iden(),
            AdvisorRun::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum AdvisorRun {
    Table,
    Id,
    JobId,
    StartTime,
    EndTime,
    Environment,
    Config,
}

#[derive(DeriveIden)]
pub enum AdvisorResult {
    Table,
    Id,
    AdvisorRunId,
    IdentifierId,
    AdvisorName,
    Capabilities,
    StartTime,
    EndTime,
}

#[derive(DeriveIden)]
pub enum Vulnerability {
    Table,
    Id,
    AdvisorResultId,
    ExternalId,
    Summary,
    Description,
}

#[derive(DeriveIden)]
pub enum VulnerabilityReference {
    Table,
    Id,
    VulnerabilityId,
    Url,
    ScoringSystem,
    Severity,
    Score,
    Vector,
}
