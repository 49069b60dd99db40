use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "job")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ort_run_id: i64,
    pub kind: JobKind,
    pub created_at: TimeDateTimeWithTimeZone,
    pub started_at: Option<TimeDateTimeWithTimeZone>,
    pub finished_at: Option<TimeDateTimeWithTimeZone>,
    pub status: JobStatus,
    pub configuration: serde_json::Value,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum JobKind {
    #[sea_orm(string_value = "ANALYZER")]
    Analyzer,
    #[sea_orm(string_value = "ADVISOR")]
    Advisor,
    #[sea_orm(string_value = "SCANNER")]
    Scanner,
    #[sea_orm(string_value = "EVALUATOR")]
    Evaluator,
    #[sea_orm(string_value = "REPORTER")]
    Reporter,
    #[sea_orm(string_value = "NOTIFIER")]
    Notifier,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum JobStatus {
    #[sea_orm(string_value = "CREATED")]
    Created,
    #[sea_orm(string_value = "SCHEDULED")]
    Scheduled,
    #[sea_orm(string_value = "RUNNING")]
    Running,
    #[sea_orm(string_value = "FAILED")]
    Failed,
    #[sea_orm(string_value = "FINISHED")]
    Finished,
    #[sea_orm(string_value = "FINISHED_WITH_ISSUES")]
    FinishedWithIssues,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ort_run::Entity"
        from = "Column::OrtRunId"
        to = "super::ort_run::Column::Id")]
    OrtRun,
    #[sea_orm(has_many = "super::analyzer_run::Entity")]
    AnalyzerRun,
    #[sea_orm(has_many = "super::evaluator_run::Entity")]
    EvaluatorRun,
    #[sea_orm(has_many = "super::scanner_run::Entity")]
    ScannerRun,
    #[sea_orm(has_many = "super::reporter_run::Entity")]
    ReporterRun,
}

impl Related<super::ort_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrtRun.def()
    }
}

impl Related<super::analyzer_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AnalyzerRun.def()
    }
}

impl Related<super::evaluator_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EvaluatorRun.def()
    }
}

impl Related<super::scanner_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScannerRun.def()
    }
}

impl Related<super::reporter_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReporterRun.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
