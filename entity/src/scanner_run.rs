use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scanner_run")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub job_id: i64,
    pub start_time: Option<TimeDateTimeWithTimeZone>,
    pub end_time: Option<TimeDateTimeWithTimeZone>,
    pub environment: Option<serde_json::Value>,
    pub config: Option<serde_json::Value>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job::Entity"
        from = "Column::JobId"
        to = "super::job::Column::Id")]
    Job,
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::scan_result::Entity> for Entity {
    fn to() -> RelationDef {
        super::scanner_run_scan_result::Relation::ScanResult.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::scanner_run_scan_result::Relation::ScannerRun.def().rev())
    }
}

impl Related<super::package_provenance::Entity> for Entity {
    fn to() -> RelationDef {
        super::scanner_run_package_provenance::Relation::PackageProvenance.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::scanner_run_package_provenance::Relation::ScannerRun.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
