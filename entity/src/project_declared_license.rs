use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "projects_declared_licenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub project_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub declared_license_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity"
        from = "Column::ProjectId"
        to = "super::project::Column::Id"
        on_delete = "Cascade")]
    Project,
    #[sea_orm(
        belongs_to = "super::declared_license::Entity"
        from = "Column::DeclaredLicenseId"
        to = "super::declared_license::Column::Id"
        on_delete = "Cascade")]
    DeclaredLicense,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::declared_license::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeclaredLicense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
