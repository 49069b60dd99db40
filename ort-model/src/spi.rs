use crate::{
    Identifier, KnownProvenance, NestedProvenanceResolutionResult, OrtResult,
    Package, PackageProvenanceResolutionResult, RemoteArtifact, RepositoryProvenance, ScanResult,
    ScannerConfiguration, ScannerDetails, ScannerRun, VcsInfo,
};
use regex::Regex;
use semver::Version;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ScanStorageError {
    #[error("{0}")]
    Invalid(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Criteria for deciding whether stored scan results can be reused for a scanner.
#[derive(Debug, Clone)]
pub struct ScannerMatcher {
    /// Must match the whole scanner name
    pub name: Regex,
    /// Inclusive lower bound
    pub min_version: Version,
    /// Exclusive upper bound
    pub max_version: Version,
    pub configuration: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("invalid scanner name pattern: {0}")]
    Regex(#[from] regex::Error),
    #[error("invalid version {0}: {1}")]
    Version(String, String),
}

fn parse_version(version: &str) -> Result<Version, MatcherError> {
    lenient_semver::parse(version)
        .map_err(|err| MatcherError::Version(version.to_string(), err.to_string()))
}

impl ScannerMatcher {
    pub fn new(
        name: &str,
        min_version: &str,
        max_version: &str,
        configuration: Option<String>,
    ) -> Result<Self, MatcherError> {
        Ok(Self {
            name: Regex::new(&format!("^(?:{name})$"))?,
            min_version: parse_version(min_version)?,
            max_version: parse_version(max_version)?,
            configuration,
        })
    }

    /// A matcher accepting the given scanner and all later patch versions of it.
    pub fn for_details(details: &ScannerDetails) -> Result<Self, MatcherError> {
        let min_version = parse_version(&details.version)?;
        let max_version = Version::new(min_version.major, min_version.minor + 1, 0);

        Ok(Self {
            name: Regex::new(&format!("^{}$", regex::escape(&details.name)))?,
            min_version,
            max_version,
            configuration: Some(details.configuration.clone()),
        })
    }

    pub fn matches(&self, details: &ScannerDetails) -> bool {
        if !self.name.is_match(&details.name) {
            return false;
        }

        let Ok(version) = lenient_semver::parse(&details.version) else {
            return false;
        };

        if version < self.min_version || version >= self.max_version {
            return false;
        }

        match &self.configuration {
            Some(configuration) => *configuration == details.configuration,
            None => true,
        }
    }
}

/// Storage for scan results, keyed by the provenance which was scanned.
#[async_trait::async_trait]
pub trait ProvenanceBasedScanStorage: Send + Sync {
    async fn read(
        &self,
        provenance: &KnownProvenance,
        matcher: &ScannerMatcher,
    ) -> Result<Vec<ScanResult>, ScanStorageError>;

    async fn write(&self, result: &ScanResult) -> Result<(), ScanStorageError>;
}

#[async_trait::async_trait]
pub trait PackageProvenanceStorage: Send + Sync {
    async fn read_provenance_for_artifact(
        &self,
        id: &Identifier,
        source_artifact: &RemoteArtifact,
    ) -> Result<Option<PackageProvenanceResolutionResult>, ScanStorageError>;

    async fn read_provenance_for_vcs(
        &self,
        id: &Identifier,
        vcs: &VcsInfo,
    ) -> Result<Option<PackageProvenanceResolutionResult>, ScanStorageError>;

    async fn read_provenances(
        &self,
        id: &Identifier,
    ) -> Result<Vec<PackageProvenanceResolutionResult>, ScanStorageError>;

    async fn put_provenance_for_artifact(
        &self,
        id: &Identifier,
        source_artifact: &RemoteArtifact,
        result: &PackageProvenanceResolutionResult,
    ) -> Result<(), ScanStorageError>;

    async fn put_provenance_for_vcs(
        &self,
        id: &Identifier,
        vcs: &VcsInfo,
        result: &PackageProvenanceResolutionResult,
    ) -> Result<(), ScanStorageError>;
}

#[async_trait::async_trait]
pub trait NestedProvenanceStorage: Send + Sync {
    async fn read_nested_provenance(
        &self,
        root: &RepositoryProvenance,
    ) -> Result<Option<NestedProvenanceResolutionResult>, ScanStorageError>;

    async fn put_nested_provenance(
        &self,
        root: &RepositoryProvenance,
        result: &NestedProvenanceResolutionResult,
    ) -> Result<(), ScanStorageError>;
}

/// The storages a scan engine works against.
pub struct ScanContext<'a> {
    pub scan_storage: &'a dyn ProvenanceBasedScanStorage,
    pub package_provenance_storage: &'a dyn PackageProvenanceStorage,
    pub nested_provenance_storage: &'a dyn NestedProvenanceStorage,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] ScanStorageError),
    #[error("{0}")]
    Failed(String),
}

/// The external scanner, resolving provenances and scanning them.
#[async_trait::async_trait]
pub trait ScanEngine: Send + Sync {
    async fn scan(
        &self,
        packages: &[Package],
        config: &ScannerConfiguration,
        context: ScanContext<'_>,
    ) -> Result<ScannerRun, EngineError>;
}

/// Everything a reporter gets to see.
#[derive(Debug, Clone)]
pub struct ReporterInput {
    pub ort_result: OrtResult,
}

impl ReporterInput {
    pub fn new(ort_result: OrtResult) -> Self {
        Self { ort_result }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Failed(String),
}

/// A report format.
#[async_trait::async_trait]
pub trait Reporter: Send + Sync {
    /// The name of the format, used to select the reporter.
    fn report_type(&self) -> &str;

    /// Write the report files into `output_dir`.
    ///
    /// A reporter may produce several files, each of which can fail on its own.
    async fn generate_report(
        &self,
        input: &ReporterInput,
        output_dir: &Path,
        options: &BTreeMap<String, String>,
    ) -> Result<Vec<Result<PathBuf, ReporterError>>, ReporterError>;
}
