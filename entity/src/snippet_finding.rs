use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "snippet_finding")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub scan_summary_id: i64,
    pub path: String,
    pub start_line: i32,
    pub end_line: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::scan_summary::Entity"
        from = "Column::ScanSummaryId"
        to = "super::scan_summary::Column::Id")]
    ScanSummary,
}

impl Related<super::scan_summary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScanSummary.def()
    }
}

impl Related<super::snippet::Entity> for Entity {
    fn to() -> RelationDef {
        super::snippet_finding_snippet::Relation::Snippet.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::snippet_finding_snippet::Relation::SnippetFinding.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
