use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scanner_runs_scan_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub scanner_run_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub scan_result_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::scanner_run::Entity"
        from = "Column::ScannerRunId"
        to = "super::scanner_run::Column::Id"
        on_delete = "Cascade")]
    ScannerRun,
    #[sea_orm(
        belongs_to = "super::scan_result::Entity"
        from = "Column::ScanResultId"
        to = "super::scan_result::Column::Id"
        on_delete = "Cascade")]
    ScanResult,
}

impl Related<super::scanner_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScannerRun.def()
    }
}

impl Related<super::scan_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScanResult.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
