use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "packages_analyzer_runs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub package_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub analyzer_run_id: i64,
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
        belongs_to = "super::analyzer_run::Entity"
        from = "Column::AnalyzerRunId"
        to = "super::analyzer_run::Column::Id"
        on_delete = "Cascade")]
    AnalyzerRun,
}

impl Related<super::package::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Package.def()
    }
}

impl Related<super::analyzer_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AnalyzerRun.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
