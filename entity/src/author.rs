use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "author")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::package::Entity> for Entity {
    fn to() -> RelationDef {
        super::package_author::Relation::Package.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::package_author::Relation::Author.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
