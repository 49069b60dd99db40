use crate::{Error, RepositoryType};
use ortserver_entity::{identifier, issue, remote_artifact, vcs_info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use time::OffsetDateTime;

/// The coordinates of a package or project.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub r#type: String,
    pub namespace: String,
    pub name: String,
    pub version: String,
}

impl Identifier {
    pub fn new(
        r#type: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            r#type: r#type.into(),
            namespace: namespace.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.r#type, self.namespace, self.name, self.version
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VcsInfo {
    #[serde(rename = "type")]
    pub r#type: RepositoryType,
    pub url: String,
    pub revision: String,
    pub path: String,
}

impl VcsInfo {
    /// The placeholder for "no VCS information".
    pub fn empty() -> Self {
        Self {
            r#type: RepositoryType::Unknown,
            url: String::new(),
            revision: String::new(),
            path: String::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RemoteArtifact {
    pub url: String,
    pub hash_value: String,
    pub hash_algorithm: String,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Hint,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hint => "HINT",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HINT" => Ok(Self::Hint),
            "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            other => Err(Error::UnknownSeverity(other.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OrtIssue {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub source: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_path: Option<String>,
    /// The package this issue refers to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
    /// The worker which reported the issue, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<String>,
}

impl OrtIssue {
    pub fn new(
        timestamp: OffsetDateTime,
        source: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            timestamp,
            source: source.into(),
            message: message.into(),
            severity,
            affected_path: None,
            identifier: None,
            worker: None,
        }
    }

    pub fn with_identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn with_worker(mut self, worker: impl Into<String>) -> Self {
        self.worker = Some(worker.into());
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessedDeclaredLicense {
    pub spdx_expression: Option<String>,
    pub mapped_licenses: BTreeMap<String, String>,
    pub unmapped_licenses: BTreeSet<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub identifier: Identifier,
    pub purl: String,
    pub cpe: Option<String>,
    pub authors: BTreeSet<String>,
    pub declared_licenses: BTreeSet<String>,
    pub processed_declared_license: ProcessedDeclaredLicense,
    pub description: String,
    pub homepage_url: String,
    pub binary_artifact: RemoteArtifact,
    pub source_artifact: RemoteArtifact,
    pub vcs: VcsInfo,
    pub vcs_processed: VcsInfo,
    pub is_metadata_only: bool,
    pub is_modified: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub identifier: Identifier,
    pub cpe: Option<String>,
    pub definition_file_path: String,
    pub authors: BTreeSet<String>,
    pub declared_licenses: BTreeSet<String>,
    pub processed_declared_license: ProcessedDeclaredLicense,
    pub vcs: VcsInfo,
    pub vcs_processed: VcsInfo,
    pub homepage_url: String,
    pub scope_names: BTreeSet<String>,
}

/// The environment a worker was running in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Environment {
    pub ort_version: String,
    pub java_version: String,
    pub os: String,
    pub processors: i32,
    pub max_memory: i64,
    pub variables: BTreeMap<String, String>,
    pub tool_versions: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalyzerConfiguration {
    pub allow_dynamic_versions: bool,
    pub enabled_package_managers: Option<Vec<String>>,
    pub disabled_package_managers: Option<Vec<String>>,
    pub skip_excluded: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerRun {
    pub id: i64,
    pub analyzer_job_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub environment: Environment,
    pub config: AnalyzerConfiguration,
    pub projects: Vec<Project>,
    pub packages: Vec<Package>,
    /// Issues found for single packages or projects, each carrying its identifier
    pub issues: Vec<OrtIssue>,
}

impl From<identifier::Model> for Identifier {
    fn from(value: identifier::Model) -> Self {
        Identifier::new(value.r#type, value.namespace, value.name, value.version)
    }
}

impl From<remote_artifact::Model> for RemoteArtifact {
    fn from(value: remote_artifact::Model) -> Self {
        Self {
            url: value.url,
            hash_value: value.hash_value,
            hash_algorithm: value.hash_algorithm,
        }
    }
}

impl TryFrom<vcs_info::Model> for VcsInfo {
    type Error = Error;

    fn try_from(value: vcs_info::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            r#type: value.r#type.parse()?,
            url: value.url,
            revision: value.revision,
            path: value.path,
        })
    }
}

impl TryFrom<issue::Model> for OrtIssue {
    type Error = Error;

    fn try_from(value: issue::Model) -> Result<Self, Self::Error> {
        let severity: Severity = value.severity.parse()?;
        let mut result = OrtIssue::new(value.timestamp, value.source, value.message, severity);
        result.affected_path = value.affected_path;
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn identifier_display() {
        assert_eq!(
            "Maven:org.example:lib:1.0",
            Identifier::new("Maven", "org.example", "lib", "1.0").to_string()
        );
        assert_eq!(":::", Identifier::default().to_string());
    }

    #[test]
    fn severity_order() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Hint);
        assert_eq!(Ok(Severity::Warning), "WARNING".parse());
        assert!("FATAL".parse::<Severity>().is_err());
    }
}
