use sea_orm::entity::prelude::*;

/// The result of resolving the provenance of a package.
///
/// Resolved either to an artifact (`artifact_id`), to a repository (`vcs_id` with revisions) or
/// unresolved with an `error_message`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "package_provenance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub identifier_id: i64,
    pub artifact_id: Option<i64>,
    pub vcs_id: Option<i64>,
    pub resolved_revision: Option<String>,
    pub cloned_revision: Option<String>,
    pub is_fixed_revision: Option<bool>,
    pub error_message: Option<String>,
    pub nested_provenance_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::identifier::Entity"
        from = "Column::IdentifierId"
        to = "super::identifier::Column::Id")]
    Identifier,
    #[sea_orm(
        belongs_to = "super::remote_artifact::Entity"
        from = "Column::ArtifactId"
        to = "super::remote_artifact::Column::Id")]
    Artifact,
    #[sea_orm(
        belongs_to = "super::vcs_info::Entity"
        from = "Column::VcsId"
        to = "super::vcs_info::Column::Id")]
    Vcs,
    #[sea_orm(
        belongs_to = "super::nested_provenance::Entity"
        from = "Column::NestedProvenanceId"
        to = "super::nested_provenance::Column::Id"
        on_delete = "SetNull")]
    NestedProvenance,
}

impl Related<super::identifier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Identifier.def()
    }
}

impl Related<super::nested_provenance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NestedProvenance.def()
    }
}

impl Related<super::scanner_run::Entity> for Entity {
    fn to() -> RelationDef {
        super::scanner_run_package_provenance::Relation::ScannerRun.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::scanner_run_package_provenance::Relation::PackageProvenance.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
