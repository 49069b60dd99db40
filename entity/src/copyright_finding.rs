use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "copyright_finding")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub scan_summary_id: i64,
    pub statement: String,
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

impl ActiveModelBehavior for ActiveModel {}
