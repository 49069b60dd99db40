use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scanner_runs_package_provenances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub scanner_run_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub package_provenance_id: i64,
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
        belongs_to = "super::package_provenance::Entity"
        from = "Column::PackageProvenanceId"
        to = "super::package_provenance::Column::Id"
        on_delete = "Cascade")]
    PackageProvenance,
}

impl Related<super::scanner_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScannerRun.def()
    }
}

impl Related<super::package_provenance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PackageProvenance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
