use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "repository")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: i64,
    pub r#type: RepositoryType,
    pub url: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum RepositoryType {
    #[sea_orm(string_value = "GIT")]
    Git,
    #[sea_orm(string_value = "GIT_REPO")]
    GitRepo,
    #[sea_orm(string_value = "MERCURIAL")]
    Mercurial,
    #[sea_orm(string_value = "SUBVERSION")]
    Subversion,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity"
        from = "Column::ProductId"
        to = "super::product::Column::Id")]
    Product,
    #[sea_orm(has_many = "super::ort_run::Entity")]
    OrtRun,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::ort_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrtRun.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
