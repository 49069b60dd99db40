use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "nested_provenance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub root_vcs_id: i64,
    pub root_resolved_revision: String,
    pub has_only_fixed_revisions: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vcs_info::Entity"
        from = "Column::RootVcsId"
        to = "super::vcs_info::Column::Id")]
    RootVcs,
    #[sea_orm(has_many = "super::nested_provenance_sub_repository::Entity")]
    SubRepository,
}

impl Related<super::nested_provenance_sub_repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubRepository.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
