use crate::labels::Labels;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ort_run")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub index: i64,
    pub repository_id: i64,
    pub revision: String,
    pub resolved_revision: Option<String>,
    pub path: Option<String>,
    pub created_at: TimeDateTimeWithTimeZone,
    pub finished_at: Option<TimeDateTimeWithTimeZone>,
    pub status: OrtRunStatus,
    #[sea_orm(column_type = "Json")]
    pub labels: Labels,
    pub job_config_context: Option<String>,
    pub resolved_job_config_context: Option<String>,
    pub environment_config_path: Option<String>,
    pub trace_id: Option<String>,
    pub vcs_id: Option<i64>,
    pub vcs_processed_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum OrtRunStatus {
    #[sea_orm(string_value = "CREATED")]
    Created,
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "FINISHED")]
    Finished,
    #[sea_orm(string_value = "FAILED")]
    Failed,
    #[sea_orm(string_value = "FINISHED_WITH_ISSUES")]
    FinishedWithIssues,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repository::Entity"
        from = "Column::RepositoryId"
        to = "super::repository::Column::Id")]
    Repository,
    #[sea_orm(has_many = "super::job::Entity")]
    Job,
    #[sea_orm(has_many = "super::ort_run_issue::Entity")]
    OrtRunIssue,
    #[sea_orm(
        belongs_to = "super::vcs_info::Entity"
        from = "Column::VcsId"
        to = "super::vcs_info::Column::Id")]
    Vcs,
    #[sea_orm(
        belongs_to = "super::vcs_info::Entity"
        from = "Column::VcsProcessedId"
        to = "super::vcs_info::Column::Id")]
    VcsProcessed,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::ort_run_issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrtRunIssue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
