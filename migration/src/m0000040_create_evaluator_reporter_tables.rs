use crate::id;
use crate::m0000010_create_shared_tables::Identifier;
use crate::m0000020_create_hierarchy::Job;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EvaluatorRun::Table)
                    .col(id(EvaluatorRun::Id))
                    .col(ColumnDef::new(EvaluatorRun::JobId).big_integer().not_null())
                    .col(
                        ColumnDef::new(EvaluatorRun::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluatorRun::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluatorRun::Table, EvaluatorRun::JobId)
                            .to(Job::Table, Job::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RuleViolation::Table)
                    .col(id(RuleViolation::Id))
                    .col(
                        ColumnDef::new(RuleViolation::EvaluatorRunId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RuleViolation::Rule).string().not_null())
                    .col(ColumnDef::new(RuleViolation::IdentifierId).big_integer())
                    .col(ColumnDef::new(RuleViolation::License).string())
                    .col(ColumnDef::new(RuleViolation::LicenseSource).string())
                    .col(ColumnDef::new(RuleViolation::Severity).string().not_null())
                    .col(ColumnDef::new(RuleViolation::Message).text().not_null())
                    .col(ColumnDef::new(RuleViolation::HowToFix).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(RuleViolation::Table, RuleViolation::EvaluatorRunId)
                            .to(EvaluatorRun::Table, EvaluatorRun::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RuleViolation::Table, RuleViolation::IdentifierId)
                            .to(Identifier::Table, Identifier::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReporterRun::Table)
                    .col(id(ReporterRun::Id))
                    .col(ColumnDef::new(ReporterRun::JobId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ReporterRun::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReporterRun::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReporterRun::Table, ReporterRun::JobId)
                            .to(Job::Table, Job::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .col(id(Report::Id))
                    .col(ColumnDef::new(Report::ReporterRunId).big_integer().not_null())
                    .col(ColumnDef::new(Report::Filename).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Report::Table, Report::ReporterRunId)
                            .to(ReporterRun::Table, ReporterRun::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Report::Table.into_iden(),
            ReporterRun::Table.into_iden(),
            RuleViolation::Table.into_iden(),
            EvaluatorRun::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum EvaluatorRun {
    Table,
    Id,
    JobId,
    StartTime,
    EndTime,
}

#[derive(DeriveIden)]
pub enum RuleViolation {
    Table,
    Id,
    EvaluatorRunId,
    Rule,
    IdentifierId,
    License,
    LicenseSource,
    Severity,
    Message,
    HowToFix,
}

#[derive(DeriveIden)]
pub enum ReporterRun {
    Table,
    Id,
    JobId,
    StartTime,
    EndTime,
}

#[derive(DeriveIden)]
pub enum Report {
    Table,
    Id,
    ReporterRunId,
    Filename,
}
