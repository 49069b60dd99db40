use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "analyzer_run")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub job_id: i64,
    pub start_time: TimeDateTimeWithTimeZone,
    pub end_time: TimeDateTimeWithTimeZone,
    pub environment: serde_json::Value,
    pub config: serde_json::Value,
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

impl Related<super::package::Entity> for Entity {
    fn to() -> RelationDef {
        super::package_analyzer_run::Relation::Package.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::package_analyzer_run::Relation::AnalyzerRun.def().rev())
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        super::project_analyzer_run::Relation::Project.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::project_analyzer_run::Relation::AnalyzerRun.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
