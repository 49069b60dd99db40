use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vulnerability_reference")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub vulnerability_id: i64,
    pub url: String,
    pub scoring_system: Option<String>,
    pub severity: Option<String>,
    pub score: Option<f32>,
    pub vector: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vulnerability::Entity"
        from = "Column::VulnerabilityId"
        to = "super::vulnerability::Column::Id")]
    Vulnerability,
}

impl Related<super::vulnerability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vulnerability.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
