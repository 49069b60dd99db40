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
                    .table(Identifier::Table)
                    .col(id(Identifier::Id))
                    .col(ColumnDef::new(Identifier::Type).string().not_null())
                    .col(ColumnDef::new(Identifier::Namespace).string().not_null())
                    .col(ColumnDef::new(Identifier::Name).string().not_null())
                    .col(ColumnDef::new(Identifier::Version).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "identifier_unique_idx",
                Identifier::Table,
                [
                    Identifier::Type,
                    Identifier::Namespace,
                    Identifier::Name,
                    Identifier::Version,
                ],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VcsInfo::Table)
                    .col(id(VcsInfo::Id))
                    .col(ColumnDef::new(VcsInfo::Type).string().not_null())
                    .col(ColumnDef::new(VcsInfo::Url).string().not_null())
                    .col(ColumnDef::new(VcsInfo::Revision).string().not_null())
                    .col(ColumnDef::new(VcsInfo::Path).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "vcs_info_unique_idx",
                VcsInfo::Table,
                [VcsInfo::Type, VcsInfo::Url, VcsInfo::Revision, VcsInfo::Path],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RemoteArtifact::Table)
                    .col(id(RemoteArtifact::Id))
                    .col(ColumnDef::new(RemoteArtifact::Url).string().not_null())
                    .col(ColumnDef::new(RemoteArtifact::HashValue).string().not_null())
                    .col(
                        ColumnDef::new(RemoteArtifact::HashAlgorithm)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "remote_artifact_unique_idx",
                RemoteArtifact::Table,
                [
                    RemoteArtifact::Url,
                    RemoteArtifact::HashValue,
                    RemoteArtifact::HashAlgorithm,
                ],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Author::Table)
                    .col(id(Author::Id))
                    .col(ColumnDef::new(Author::Name).text().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeclaredLicense::Table)
                    .col(id(DeclaredLicense::Id))
                    .col(
                        ColumnDef::new(DeclaredLicense::Name)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Issue::Table)
                    .col(id(Issue::Id))
                    .col(
                        ColumnDef::new(Issue::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Issue::Source).string().not_null())
                    .col(ColumnDef::new(Issue::Message).text().not_null())
                    .col(ColumnDef::new(Issue::Severity).string().not_null())
                    .col(ColumnDef::new(Issue::AffectedPath).string())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Issue::Table.into_iden(),
            DeclaredLicense::Table.into_iden(),
            Author::Table.into_iden(),
            RemoteArtifact::Table.into_iden(),
            VcsInfo::Table.into_iden(),
            Identifier::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Identifier {
    Table,
    Id,
    Type,
    Namespace,
    Name,
    Version,
}

#[derive(DeriveIden)]
pub enum VcsInfo {
    Table,
    Id,
    Type,
    Url,
    Revision,
    Path,
}

#[derive(DeriveIden)]
pub enum RemoteArtifact {
    Table,
    Id,
    Url,
    HashValue,
    HashAlgorithm,
}

#[derive(DeriveIden)]
pub enum Author {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum DeclaredLicense {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum Issue {
    Table,
    Id,
    Timestamp,
    Source,
    Message,
    Severity,
    AffectedPath,
}
