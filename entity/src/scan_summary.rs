use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scan_summary")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub start_time: TimeDateTimeWithTimeZone,
    pub end_time: TimeDateTimeWithTimeZone,
    #[sea_orm(indexed)]
    pub hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::license_finding::Entity")]
    LicenseFinding,
    #[sea_orm(has_many = "super::copyright_finding::Entity")]
    CopyrightFinding,
    #[sea_orm(has_many = "super::snippet_finding::Entity")]
    SnippetFinding,
    #[sea_orm(has_many = "super::scan_result::Entity")]
    ScanResult,
}

impl Related<super::license_finding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LicenseFinding.def()
    }
}

impl Related<super::copyright_finding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CopyrightFinding.def()
    }
}

impl Related<super::snippet_finding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SnippetFinding.def()
    }
}

impl Related<super::scan_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScanResult.def()
    }
}

impl Related<super::issue::Entity> for Entity {
    fn to() -> RelationDef {
        super::scan_summary_issue::Relation::Issue.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::scan_summary_issue::Relation::ScanSummary.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
