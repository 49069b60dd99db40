use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "projects_analyzer_runs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub project_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub analyzer_run_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity"
        from = "Column::ProjectId"
        to = "super::project::Column::Id"
        on_delete = "Cascade")]
    Project,
    #[sea_orm(
        belongs_to = "super::analyzer_run::Entity"
        from = "Column::AnalyzerRunId"
        to = "super::analyzer_run::Column::Id"
        on_delete = "Cascade")]
    AnalyzerRun,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::analyzer_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AnalyzerRun.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
