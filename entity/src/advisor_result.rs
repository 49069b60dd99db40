use sea_orm::entity::prelude::*;

/// The result of one advisor for one package of an advisor run.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "advisor_result")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub advisor_run_id: i64,
    pub identifier_id: i64,
    pub advisor_name: String,
    pub capabilities: serde_json::Value,
    pub start_time: TimeDateTimeWithTimeZone,
    pub end_time: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::advisor_run::Entity"
        from = "Column::AdvisorRunId"
        to = "super::advisor_run::Column::Id")]
    AdvisorRun,
    #[sea_orm(
        belongs_to = "super::identifier::Entity"
        from = "Column::IdentifierId"
        to = "super::identifier::Column::Id")]
    Identifier,
    #[sea_orm(has_many = "super::vulnerability::Entity")]
    Vulnerability,
}

impl Related<super::advisor_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdvisorRun.def()
    }
}

impl Related<super::identifier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Identifier.def()
    }
}

impl Related<super::vulnerability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vulnerability.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
