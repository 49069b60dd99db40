use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "nested_provenance_sub_repository")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub nested_provenance_id: i64,
    pub vcs_id: i64,
    pub resolved_revision: String,
    pub path: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::nested_provenance::Entity"
        from = "Column::NestedProvenanceId"
        to = "super::nested_provenance::Column::Id")]
    NestedProvenance,
    #[sea_orm(
        belongs_to = "super::vcs_info::Entity"
        from = "Column::VcsId"
        to = "super::vcs_info::Column::Id")]
    Vcs,
}

impl Related<super::nested_provenance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NestedProvenance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
