use crate::runs::{Environment, Identifier, OrtIssue, RemoteArtifact, VcsInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextLocation {
    pub path: String,
    pub start_line: i32,
    pub end_line: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LicenseFinding {
    pub spdx_license: String,
    pub location: TextLocation,
    pub score: Option<f32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CopyrightFinding {
    pub statement: String,
    pub location: TextLocation,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snippet {
    pub purl: String,
    pub provenance: KnownProvenance,
    pub location: TextLocation,
    pub score: f32,
    pub spdx_license: String,
    pub additional_data: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnippetFinding {
    pub location: TextLocation,
    pub snippets: Vec<Snippet>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScanSummary {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub license_findings: Vec<LicenseFinding>,
    pub copyright_findings: Vec<CopyrightFinding>,
    pub snippet_findings: Vec<SnippetFinding>,
    pub issues: Vec<OrtIssue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScannerDetail {
    pub name: String,
    pub version: String,
    pub configuration: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactProvenance {
    pub source_artifact: RemoteArtifact,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryProvenance {
    pub vcs_info: VcsInfo,
    pub resolved_revision: String,
}

/// A provenance which identifies where source code comes from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KnownProvenance {
    Artifact(ArtifactProvenance),
    Repository(RepositoryProvenance),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Known(KnownProvenance),
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub provenance: KnownProvenance,
    pub scanner: ScannerDetail,
    pub summary: ScanSummary,
    pub additional_data: BTreeMap<String, String>,
}

/// The outcome of resolving the provenance of a single package.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PackageProvenanceResolution {
    Artifact {
        provenance: ArtifactProvenance,
    },
    Repository {
        provenance: RepositoryProvenance,
        cloned_revision: String,
        is_fixed_revision: bool,
    },
    Unresolved {
        message: String,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NestedProvenance {
    pub root: KnownProvenance,
    pub sub_repositories: BTreeMap<String, RepositoryProvenance>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NestedProvenanceResolution {
    pub nested_provenance: NestedProvenance,
    pub has_only_fixed_revisions: bool,
}

/// The provenance of a package as used by a scanner run, including nested repositories.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceResolutionResult {
    pub id: Identifier,
    pub package_provenance: Option<KnownProvenance>,
    pub sub_repositories: BTreeMap<String, VcsInfo>,
    pub package_provenance_resolution_issue: Option<OrtIssue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ScannerConfiguration {
    pub skip_concluded: bool,
    pub skip_excluded: bool,
    pub create_missing_archives: bool,
    pub detected_license_mappings: BTreeMap<String, String>,
    pub ignore_patterns: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScannerRun {
    pub id: i64,
    pub scanner_job_id: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    pub environment: Option<Environment>,
    pub config: Option<ScannerConfiguration>,
    pub provenances: Vec<ProvenanceResolutionResult>,
    pub scan_results: Vec<ScanResult>,
}
