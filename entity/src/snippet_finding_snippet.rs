use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "snippet_findings_snippets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub snippet_finding_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub snippet_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::snippet_finding::Entity"
        from = "Column::SnippetFindingId"
        to = "super::snippet_finding::Column::Id"
        on_delete = "Cascade")]
    SnippetFinding,
    #[sea_orm(
        belongs_to = "super::snippet::Entity"
        from = "Column::SnippetId"
        to = "super::snippet::Column::Id"
        on_delete = "Cascade")]
    Snippet,
}

impl Related<super::snippet_finding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SnippetFinding.def()
    }
}

impl Related<super::snippet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Snippet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
