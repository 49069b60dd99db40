use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "advisor_run")]
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
    #[sea_orm(has_many = "super::advisor_result::Entity")]
    AdvisorResult,
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::advisor_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdvisorResult.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
