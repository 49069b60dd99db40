use crate::Identifier;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use time::OffsetDateTime;

/// The type of a version control system, kept as the name the toolkit uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VcsType(pub String);

impl VcsType {
    pub const GIT: &'static str = "Git";
    pub const GIT_REPO: &'static str = "GitRepo";
    pub const MERCURIAL: &'static str = "Mercurial";
    pub const SUBVERSION: &'static str = "Subversion";

    /// Alternative names per type, the first one is the canonical name.
    pub const ALIASES: &'static [&'static [&'static str]] = &[
        &["Git", "GitHub", "GitLab"],
        &["GitRepo", "git-repo", "repo"],
        &["Mercurial", "hg"],
        &["Subversion", "svn"],
    ];

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The type of unknown VCS information.
    pub fn unknown() -> Self {
        Self(String::new())
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }

    /// The canonical name of the type, if the name matches one of the known aliases.
    pub fn canonical_name(&self) -> Option<&'static str> {
        Self::ALIASES
            .iter()
            .find(|aliases| {
                aliases
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(&self.0))
            })
            .map(|aliases| aliases[0])
    }
}

impl Display for VcsType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VcsInfo {
    #[serde(rename = "type")]
    pub r#type: VcsType,
    pub url: String,
    pub revision: String,
    #[serde(default)]
    pub path: String,
}

impl VcsInfo {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hash {
    pub value: String,
    pub algorithm: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RemoteArtifact {
    pub url: String,
    pub hash: Hash,
}

impl RemoteArtifact {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Hint,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub source: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedDeclaredLicense {
    pub spdx_expression: Option<String>,
    #[serde(default)]
    pub mapped: BTreeMap<String, String>,
    #[serde(default)]
    pub unmapped: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: Identifier,
    #[serde(default)]
    pub purl: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpe: Option<String>,
    #[serde(default)]
    pub authors: BTreeSet<String>,
    #[serde(default)]
    pub declared_licenses: BTreeSet<String>,
    #[serde(default)]
    pub declared_licenses_processed: ProcessedDeclaredLicense,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub homepage_url: String,
    #[serde(default)]
    pub binary_artifact: RemoteArtifact,
    #[serde(default)]
    pub source_artifact: RemoteArtifact,
    #[serde(default)]
    pub vcs: VcsInfo,
    #[serde(default)]
    pub vcs_processed: VcsInfo,
    #[serde(default)]
    pub is_metadata_only: bool,
    #[serde(default)]
    pub is_modified: bool,
}

impl Package {
    /// A package with only an identifier, all other properties empty.
    pub fn new(id: Identifier) -> Self {
        Self {
            purl: String::new(),
            id,
            cpe: None,
            authors: BTreeSet::new(),
            declared_licenses: BTreeSet::new(),
            declared_licenses_processed: ProcessedDeclaredLicense::default(),
            description: String::new(),
            homepage_url: String::new(),
            binary_artifact: RemoteArtifact::empty(),
            source_artifact: RemoteArtifact::empty(),
            vcs: VcsInfo::empty(),
            vcs_processed: VcsInfo::empty(),
            is_metadata_only: false,
            is_modified: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpe: Option<String>,
    pub definition_file_path: String,
    #[serde(default)]
    pub authors: BTreeSet<String>,
    #[serde(default)]
    pub declared_licenses: BTreeSet<String>,
    #[serde(default)]
    pub declared_licenses_processed: ProcessedDeclaredLicense,
    #[serde(default)]
    pub vcs: VcsInfo,
    #[serde(default)]
    pub vcs_processed: VcsInfo,
    #[serde(default)]
    pub homepage_url: String,
    #[serde(default)]
    pub scope_names: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub ort_version: String,
    pub java_version: String,
    pub os: String,
    pub processors: i32,
    pub max_memory: i64,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub tool_versions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfiguration {
    #[serde(default)]
    pub allow_dynamic_versions: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_package_managers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_package_managers: Option<Vec<String>>,
    #[serde(default)]
    pub skip_excluded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerResult {
    pub projects: Vec<Project>,
    pub packages: Vec<Package>,
    /// Issues keyed by the string form of the identifier they belong to
    #[serde(default)]
    pub issues: BTreeMap<Identifier, Vec<Issue>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerRun {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub environment: Environment,
    pub config: AnalyzerConfiguration,
    pub result: AnalyzerResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkg: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_source: Option<String>,
    pub severity: Severity,
    pub message: String,
    pub how_to_fix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorRun {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub violations: Vec<RuleViolation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextLocation {
    pub path: String,
    pub start_line: i32,
    pub end_line: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseFinding {
    pub license: String,
    pub location: TextLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyrightFinding {
    pub statement: String,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub score: f32,
    pub location: TextLocation,
    pub provenance: KnownProvenance,
    pub purl: String,
    pub license: String,
    #[serde(default)]
    pub additional_data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnippetFinding {
    pub source_location: TextLocation,
    pub snippets: Vec<Snippet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    #[serde(default)]
    pub license_findings: Vec<LicenseFinding>,
    #[serde(default)]
    pub copyright_findings: Vec<CopyrightFinding>,
    #[serde(default)]
    pub snippet_findings: Vec<SnippetFinding>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl ScanSummary {
    pub fn empty(time: OffsetDateTime) -> Self {
        Self {
            start_time: time,
            end_time: time,
            license_findings: vec![],
            copyright_findings: vec![],
            snippet_findings: vec![],
            issues: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScannerDetails {
    pub name: String,
    pub version: String,
    pub configuration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactProvenance {
    pub source_artifact: RemoteArtifact,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryProvenance {
    pub vcs_info: VcsInfo,
    pub resolved_revision: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KnownProvenance {
    Artifact(ArtifactProvenance),
    Repository(RepositoryProvenance),
}

/// The provenance of a scan result, possibly unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Provenance {
    Known(KnownProvenance),
    Unknown {},
}

impl From<KnownProvenance> for Provenance {
    fn from(value: KnownProvenance) -> Self {
        Self::Known(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub provenance: Provenance,
    pub scanner: ScannerDetails,
    pub summary: ScanSummary,
    #[serde(default)]
    pub additional_data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PackageProvenanceResolutionResult {
    ResolvedArtifact {
        provenance: ArtifactProvenance,
    },
    ResolvedRepository {
        provenance: RepositoryProvenance,
        cloned_revision: String,
        is_fixed_revision: bool,
    },
    Unresolved {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedProvenance {
    pub root: KnownProvenance,
    pub sub_repositories: BTreeMap<String, RepositoryProvenance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedProvenanceResolutionResult {
    pub nested_provenance: NestedProvenance,
    pub has_only_fixed_revisions: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceResolutionResult {
    pub id: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_provenance: Option<KnownProvenance>,
    #[serde(default)]
    pub sub_repositories: BTreeMap<String, VcsInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_provenance_resolution_issue: Option<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfiguration {
    #[serde(default)]
    pub skip_concluded: bool,
    #[serde(default)]
    pub skip_excluded: bool,
    #[serde(default)]
    pub create_missing_archives: bool,
    #[serde(default)]
    pub detected_license_mapping: BTreeMap<String, String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerRun {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub environment: Environment,
    pub config: ScannerConfiguration,
    #[serde(default)]
    pub provenances: Vec<ProvenanceResolutionResult>,
    #[serde(default)]
    pub scan_results: Vec<ScanResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorDetails {
    pub name: String,
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorSummary {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// Where more information about a vulnerability is found, optionally with a rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityReference {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub references: Vec<VulnerabilityReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorResult {
    pub advisor: AdvisorDetails,
    pub summary: AdvisorSummary,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
}

/// The options per advisor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorConfiguration {
    #[serde(default)]
    pub config: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorRun {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub environment: Environment,
    #[serde(default)]
    pub config: AdvisorConfiguration,
    #[serde(default)]
    pub results: BTreeMap<Identifier, Vec<AdvisorResult>>,
}

/// The repository which was analyzed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub vcs: VcsInfo,
    pub vcs_processed: VcsInfo,
}

/// The aggregated results of an ORT run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrtResult {
    pub repository: Repository,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<AnalyzerRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisor: Option<AdvisorRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scanner: Option<ScannerRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluator: Option<EvaluatorRun>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vcs_type_aliases() {
        assert_eq!(Some("Git"), VcsType::new("github").canonical_name());
        assert_eq!(Some("GitRepo"), VcsType::new("repo").canonical_name());
        assert_eq!(Some("Subversion"), VcsType::new("SVN").canonical_name());
        assert_eq!(None, VcsType::new("cvs").canonical_name());
        assert!(VcsType::unknown().is_unknown());
    }

    #[test]
    fn provenance_untagged() {
        let provenance: Provenance = serde_json::from_value(serde_json::json!({
            "vcs_info": {"type": "Git", "url": "https://example.com/repo.git", "revision": "main", "path": ""},
            "resolved_revision": "abc"
        }))
        .unwrap();

        assert!(matches!(
            provenance,
            Provenance::Known(KnownProvenance::Repository(_))
        ));

        let unknown: Provenance = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(Provenance::Unknown {}, unknown);
    }

    #[test]
    fn analyzer_issues_keyed_by_identifier() {
        let mut result = AnalyzerResult::default();
        result.issues.insert(
            Identifier::new("NPM", "", "x", "1"),
            vec![Issue {
                timestamp: OffsetDateTime::UNIX_EPOCH,
                source: "NPM".into(),
                message: "failed".into(),
                severity: Severity::Error,
                affected_path: None,
            }],
        );

        let yaml = serde_yaml::to_string(&result).unwrap();
        assert!(yaml.contains("NPM::x:1"));
        assert_eq!(result, serde_yaml::from_str(&yaml).unwrap());
    }
}
