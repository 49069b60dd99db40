use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vulnerability")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub advisor_result_id: i64,
    pub external_id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::advisor_result::Entity"
        from = "Column::AdvisorResultId"
        to = "super::advisor_result::Column::Id")]
    AdvisorResult,
    #[sea_orm(has_many = "super::vulnerability_reference::Entity")]
    VulnerabilityReference,
}

impl Related<super::advisor_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdvisorResult.def()
    }
}

impl Related<super::vulnerability_reference::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VulnerabilityReference.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
