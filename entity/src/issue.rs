use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "issue")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: TimeDateTimeWithTimeZone,
    pub source: String,
    pub message: String,
    pub severity: String,
    pub affected_path: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ort_run_issue::Entity")]
    OrtRunIssue,
}

impl Related<super::ort_run_issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrtRunIssue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
