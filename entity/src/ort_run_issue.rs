use sea_orm::entity::prelude::*;

/// An issue recorded for a run, optionally bound to a package and the worker that found it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ort_runs_issues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ort_run_id: i64,
    pub issue_id: i64,
    pub identifier_id: Option<i64>,
    pub worker: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ort_run::Entity"
        from = "Column::OrtRunId"
        to = "super::ort_run::Column::Id")]
    OrtRun,
    #[sea_orm(
        belongs_to = "super::issue::Entity"
        from = "Column::IssueId"
        to = "super::issue::Column::Id")]
    Issue,
    #[sea_orm(
        belongs_to = "super::identifier::Entity"
        from = "Column::IdentifierId"
        to = "super::identifier::Column::Id")]
    Identifier,
}

impl Related<super::ort_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrtRun.def()
    }
}

impl Related<super::issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issue.def()
    }
}

impl Related<super::identifier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Identifier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
