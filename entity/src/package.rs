use sea_orm::entity::prelude::*;

/// A package found by an analyzer run.
///
/// Packages are shared between runs, identical ones are stored once, keyed by `content_hash`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "package")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub identifier_id: i64,
    pub purl: String,
    pub cpe: Option<String>,
    pub description: String,
    pub homepage_url: String,
    pub binary_artifact_id: i64,
    pub source_artifact_id: i64,
    pub vcs_id: i64,
    pub vcs_processed_id: i64,
    pub is_metadata_only: bool,
    pub is_modified: bool,
    pub spdx_expression: Option<String>,
    pub mapped_licenses: serde_json::Value,
    pub unmapped_licenses: serde_json::Value,
    #[sea_orm(unique)]
    pub content_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::identifier::Entity"
        from = "Column::IdentifierId"
        to = "super::identifier::Column::Id")]
    Identifier,
    #[sea_orm(
        belongs_to = "super::remote_artifact::Entity"
        from = "Column::BinaryArtifactId"
        to = "super::remote_artifact::Column::Id")]
    BinaryArtifact,
    #[sea_orm(
        belongs_to = "super::remote_artifact::Entity"
        from = "Column::SourceArtifactId"
        to = "super::remote_artifact::Column::Id")]
    SourceArtifact,
    #[sea_orm(
        belongs_to = "super::vcs_info::Entity"
        from = "Column::VcsId"
        to = "super::vcs_info::Column::Id")]
    Vcs,
    #[sea_orm(
        belongs_to = "super::vcs_info::Entity"
        from = "Column::VcsProcessedId"
        to = "super::vcs_info::Column::Id")]
    VcsProcessed,
}

impl Related<super::identifier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Identifier.def()
    }
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        super::package_author::Relation::Author.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::package_author::Relation::Package.def().rev())
    }
}

impl Related<super::declared_license::Entity> for Entity {
    fn to() -> RelationDef {
        super::package_declared_license::Relation::DeclaredLicense.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::package_declared_license::Relation::Package.def().rev())
    }
}

impl Related<super::analyzer_run::Entity> for Entity {
    fn to() -> RelationDef {
        super::package_analyzer_run::Relation::AnalyzerRun.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::package_analyzer_run::Relation::Package.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
