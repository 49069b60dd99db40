use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub reporter_run_id: i64,
    pub filename: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reporter_run::Entity"
        from = "Column::ReporterRunId"
        to = "super::reporter_run::Column::Id")]
    ReporterRun,
}

impl Related<super::reporter_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReporterRun.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
