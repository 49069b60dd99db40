use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "packages_declared_licenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub package_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub declared_license_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::package::Entity"
        from = "Column::PackageId"
        to = "super::package::Column::Id"
        on_delete = "Cascade")]
    Package,
    #[sea_orm(
        belongs_to = "super::declared_license::Entity"
        from = "Column::DeclaredLicenseId"
        to = "super::declared_license::Column::Id"
        on_delete = "Cascade")]
    DeclaredLicense,
}

impl Related<super::package::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Package.def()
    }
}

impl Related<super::declared_license::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeclaredLicense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
