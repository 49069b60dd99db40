use sea_orm::entity::prelude::*;

/// A snippet matched by a scanner, either located in a remote artifact or in a repository.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "snippet")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub purl: String,
    pub artifact_id: Option<i64>,
    pub vcs_id: Option<i64>,
    pub path: String,
    pub start_line: i32,
    pub end_line: i32,
    pub license: String,
    pub score: f32,
    pub additional_data: serde_json::Value,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::remote_artifact::Entity"
        from = "Column::ArtifactId"
        to = "super::remote_artifact::Column::Id")]
    Artifact,
    #[sea_orm(
        belongs_to = "super::vcs_info::Entity"
        from = "Column::VcsId"
        to = "super::vcs_info::Column::Id")]
    Vcs,
}

impl Related<super::snippet_finding::Entity> for Entity {
    fn to() -> RelationDef {
        super::snippet_finding_snippet::Relation::SnippetFinding.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::snippet_finding_snippet::Relation::Snippet.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
