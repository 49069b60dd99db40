use sea_orm::entity::prelude::*;

/// A project found by an analyzer run, shared between runs like packages.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub identifier_id: i64,
    pub cpe: Option<String>,
    pub definition_file_path: String,
    pub homepage_url: String,
    pub vcs_id: i64,
    pub vcs_processed_id: i64,
    pub spdx_expression: Option<String>,
    pub mapped_licenses: serde_json::Value,
    pub unmapped_licenses: serde_json::Value,
    pub scope_names: serde_json::Value,
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
        super::project_author::Relation::Author.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::project_author::Relation::Project.def().rev())
    }
}

impl Related<super::declared_license::Entity> for Entity {
    fn to() -> RelationDef {
        super::project_declared_license::Relation::DeclaredLicense.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::project_declared_license::Relation::Project.def().rev())
    }
}

impl Related<super::analyzer_run::Entity> for Entity {
    fn to() -> RelationDef {
        super::project_analyzer_run::Relation::AnalyzerRun.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::project_analyzer_run::Relation::Project.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
