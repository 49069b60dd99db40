use sea_orm::entity::prelude::*;

/// A scan result, either for an artifact or a repository provenance.
///
/// Exactly one set of the `artifact_*` or `vcs_*` columns is populated.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scan_result")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub artifact_url: Option<String>,
    pub artifact_hash: Option<String>,
    pub artifact_hash_algorithm: Option<String>,
    pub vcs_type: Option<String>,
    pub vcs_url: Option<String>,
    pub vcs_revision: Option<String>,
    pub scanner_name: String,
    pub scanner_version: String,
    pub scanner_configuration: String,
    pub scan_summary_id: i64,
    pub additional_data: serde_json::Value,
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

impl Related<super::scanner_run::Entity> for Entity {
    fn to() -> RelationDef {
        super::scanner_run_scan_result::Relation::ScannerRun.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::scanner_run_scan_result::Relation::ScanResult.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
