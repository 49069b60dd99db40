use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scan_summaries_issues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub scan_summary_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub issue_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::scan_summary::Entity"
        from = "Column::ScanSummaryId"
        to = "super::scan_summary::Column::Id"
        on_delete = "Cascade")]
    ScanSummary,
    #[sea_orm(
        belongs_to = "super::issue::Entity"
        from = "Column::IssueId"
        to = "super::issue::Column::Id"
        on_delete = "Cascade")]
    Issue,
}

impl Related<super::scan_summary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScanSummary.def()
    }
}

impl Related<super::issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
