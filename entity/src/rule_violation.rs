use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rule_violation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub evaluator_run_id: i64,
    pub rule: String,
    pub identifier_id: Option<i64>,
    pub license: Option<String>,
    pub license_source: Option<String>,
    pub severity: String,
    pub message: String,
    pub how_to_fix: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::evaluator_run::Entity"
        from = "Column::EvaluatorRunId"
        to = "super::evaluator_run::Column::Id")]
    EvaluatorRun,
    #[sea_orm(
        belongs_to = "super::identifier::Entity"
        from = "Column::IdentifierId"
        to = "super::identifier::Column::Id")]
    Identifier,
}

impl Related<super::evaluator_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EvaluatorRun.def()
    }
}

impl Related<super::identifier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Identifier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
