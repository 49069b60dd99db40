//! Translation between the server model and the toolkit's interchange model.
//!
//! Mapping to the server model is fallible, as the toolkit accepts VCS types and provenances the
//! server can't store. Mapping back is always possible.


use ortserver_model::{
    advisor::{
        AdvisorConfiguration, AdvisorResult, AdvisorRun, Vulnerability, VulnerabilityReference,
    },
    evaluator::{EvaluatorRun, RuleViolation},
    runs::{
        AnalyzerConfiguration, AnalyzerRun, Environment, Identifier, OrtIssue, Package,
        ProcessedDeclaredLicense, Project, RemoteArtifact, Severity, VcsInfo,
    },
    scanner::{
        ArtifactProvenance, CopyrightFinding, KnownProvenance, LicenseFinding, NestedProvenance,
        NestedProvenanceResolution, PackageProvenanceResolution, ProvenanceResolutionResult,
        RepositoryProvenance, ScanResult, ScanSummary, ScannerConfiguration, ScannerDetail,
        ScannerRun, Snippet, SnippetFinding, TextLocation,
    },
    JobKind, RepositoryType,
};
use ortserver_ort_model as ort;
use std::collections::BTreeMap;
use time::OffsetDateTime;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("unsupported VCS type '{0}'")]
    UnsupportedVcsType(String),
    #[error("scan result for '{0}' has an unknown provenance")]
    UnknownProvenance(String),
}

/// Conversion of a toolkit type into the server model.
pub trait MapToModel {
    type Model;

    fn map_to_model(&self) -> Result<Self::Model, MappingError>;
}

/// Conversion of a server model type into the toolkit's model.
pub trait MapToOrt {
    type Ort;

    fn map_to_ort(&self) -> Self::Ort;
}

impl<T: MapToModel> MapToModel for Vec<T> {
    type Model = Vec<T::Model>;

    fn map_to_model(&self) -> Result<Self::Model, MappingError> {
        self.iter().map(MapToModel::map_to_model).collect()
    }
}

impl<T: MapToOrt> MapToOrt for Vec<T> {
    type Ort = Vec<T::Ort>;

    fn map_to_ort(&self) -> Self::Ort {
        self.iter().map(MapToOrt::map_to_ort).collect()
    }
}

impl<T: MapToModel> MapToModel for Option<T> {
    type Model = Option<T::Model>;

    fn map_to_model(&self) -> Result<Self::Model, MappingError> {
        self.as_ref().map(MapToModel::map_to_model).transpose()
    }
}

impl<T: MapToOrt> MapToOrt for Option<T> {
    type Ort = Option<T::Ort>;

    fn map_to_ort(&self) -> Self::Ort {
        self.as_ref().map(MapToOrt::map_to_ort)
    }
}

impl<K: Ord + Clone, T: MapToModel> MapToModel for BTreeMap<K, T> {
    type Model = BTreeMap<K, T::Model>;

    fn map_to_model(&self) -> Result<Self::Model, MappingError> {
        self.iter()
            .map(|(k, v)| Ok((k.clone(), v.map_to_model()?)))
            .collect()
    }
}

impl<K: Ord + Clone, T: MapToOrt> MapToOrt for BTreeMap<K, T> {
    type Ort = BTreeMap<K, T::Ort>;

    fn map_to_ort(&self) -> Self::Ort {
        self.iter().map(|(k, v)| (k.clone(), v.map_to_ort())).collect()
    }
}

impl MapToModel for ort::Identifier {
    type Model = Identifier;

    fn map_to_model(&self) -> Result<Identifier, MappingError> {
        Ok(Identifier::new(
            &self.r#type,
            &self.namespace,
            &self.name,
            &self.version,
        ))
    }
}

impl MapToOrt for Identifier {
    type Ort = ort::Identifier;

    fn map_to_ort(&self) -> ort::Identifier {
        ort::Identifier::new(&self.r#type, &self.namespace, &self.name, &self.version)
    }
}

impl MapToModel for ort::VcsType {
    type Model = RepositoryType;

    fn map_to_model(&self) -> Result<RepositoryType, MappingError> {
        if self.is_unknown() {
            return Ok(RepositoryType::Unknown);
        }

        match self.canonical_name() {
            Some(ort::VcsType::GIT) => Ok(RepositoryType::Git),
            Some(ort::VcsType::GIT_REPO) => Ok(RepositoryType::GitRepo),
            Some(ort::VcsType::MERCURIAL) => Ok(RepositoryType::Mercurial),
            Some(ort::VcsType::SUBVERSION) => Ok(RepositoryType::Subversion),
            _ => Err(MappingError::UnsupportedVcsType(self.to_string())),
        }
    }
}

impl MapToOrt for RepositoryType {
    type Ort = ort::VcsType;

    fn map_to_ort(&self) -> ort::VcsType {
        match self {
            Self::Git => ort::VcsType::new(ort::VcsType::GIT),
            Self::GitRepo => ort::VcsType::new(ort::VcsType::GIT_REPO),
            Self::Mercurial => ort::VcsType::new(ort::VcsType::MERCURIAL),
            Self::Subversion => ort::VcsType::new(ort::VcsType::SUBVERSION),
            Self::Unknown => ort::VcsType::unknown(),
        }
    }
}

impl MapToModel for ort::VcsInfo {
    type Model = VcsInfo;

    fn map_to_model(&self) -> Result<VcsInfo, MappingError> {
        Ok(VcsInfo {
            r#type: self.r#type.map_to_model()?,
            url: self.url.clone(),
            revision: self.revision.clone(),
            path: self.path.clone(),
        })
    }
}

impl MapToOrt for VcsInfo {
    type Ort = ort::VcsInfo;

    fn map_to_ort(&self) -> ort::VcsInfo {
        ort::VcsInfo {
            r#type: self.r#type.map_to_ort(),
            url: self.url.clone(),
            revision: self.revision.clone(),
            path: self.path.clone(),
        }
    }
}

impl MapToModel for ort::RemoteArtifact {
    type Model = RemoteArtifact;

    fn map_to_model(&self) -> Result<RemoteArtifact, MappingError> {
        Ok(RemoteArtifact {
            url: self.url.clone(),
            hash_value: self.hash.value.clone(),
            hash_algorithm: self.hash.algorithm.clone(),
        })
    }
}

impl MapToOrt for RemoteArtifact {
    type Ort = ort::RemoteArtifact;

    fn map_to_ort(&self) -> ort::RemoteArtifact {
        ort::RemoteArtifact {
            url: self.url.clone(),
            hash: ort::Hash {
                value: self.hash_value.clone(),
                algorithm: self.hash_algorithm.clone(),
            },
        }
    }
}

fn severity_to_model(severity: ort::Severity) -> Severity {
    match severity {
        ort::Severity::Hint => Severity::Hint,
        ort::Severity::Warning => Severity::Warning,
        ort::Severity::Error => Severity::Error,
    }
}

fn severity_to_ort(severity: Severity) -> ort::Severity {
    match severity {
        Severity::Hint => ort::Severity::Hint,
        Severity::Warning => ort::Severity::Warning,
        Severity::Error => ort::Severity::Error,
    }
}

impl MapToModel for ort::Issue {
    type Model = OrtIssue;

    fn map_to_model(&self) -> Result<OrtIssue, MappingError> {
        Ok(OrtIssue {
            affected_path: self.affected_path.clone(),
            ..OrtIssue::new(
                self.timestamp,
                &self.source,
                &self.message,
                severity_to_model(self.severity),
            )
        })
    }
}

impl MapToOrt for OrtIssue {
    type Ort = ort::Issue;

    fn map_to_ort(&self) -> ort::Issue {
        ort::Issue {
            timestamp: self.timestamp,
            source: self.source.clone(),
            message: self.message.clone(),
            severity: severity_to_ort(self.severity),
            affected_path: self.affected_path.clone(),
        }
    }
}

impl MapToModel for ort::ProcessedDeclaredLicense {
    type Model = ProcessedDeclaredLicense;

    fn map_to_model(&self) -> Result<ProcessedDeclaredLicense, MappingError> {
        Ok(ProcessedDeclaredLicense {
            spdx_expression: self.spdx_expression.clone(),
            mapped_licenses: self.mapped.clone(),
            unmapped_licenses: self.unmapped.clone(),
        })
    }
}

impl MapToOrt for ProcessedDeclaredLicense {
    type Ort = ort::ProcessedDeclaredLicense;

    fn map_to_ort(&self) -> ort::ProcessedDeclaredLicense {
        ort::ProcessedDeclaredLicense {
            spdx_expression: self.spdx_expression.clone(),
            mapped: self.mapped_licenses.clone(),
            unmapped: self.unmapped_licenses.clone(),
        }
    }
}

impl MapToModel for ort::Package {
    type Model = Package;

    fn map_to_model(&self) -> Result<Package, MappingError> {
        Ok(Package {
            identifier: self.id.map_to_model()?,
            purl: self.purl.clone(),
            cpe: self.cpe.clone(),
            authors: self.authors.clone(),
            declared_licenses: self.declared_licenses.clone(),
            processed_declared_license: self.declared_licenses_processed.map_to_model()?,
            description: self.description.clone(),
            homepage_url: self.homepage_url.clone(),
            binary_artifact: self.binary_artifact.map_to_model()?,
            source_artifact: self.source_artifact.map_to_model()?,
            vcs: self.vcs.map_to_model()?,
            vcs_processed: self.vcs_processed.map_to_model()?,
            is_metadata_only: self.is_metadata_only,
            is_modified: self.is_modified,
        })
    }
}

impl MapToOrt for Package {
    type Ort = ort::Package;

    fn map_to_ort(&self) -> ort::Package {
        ort::Package {
            id: self.identifier.map_to_ort(),
            purl: self.purl.clone(),
            cpe: self.cpe.clone(),
            authors: self.authors.clone(),
            declared_licenses: self.declared_licenses.clone(),
            declared_licenses_processed: self.processed_declared_license.map_to_ort(),
            description: self.description.clone(),
            homepage_url: self.homepage_url.clone(),
            binary_artifact: self.binary_artifact.map_to_ort(),
            source_artifact: self.source_artifact.map_to_ort(),
            vcs: self.vcs.map_to_ort(),
            vcs_processed: self.vcs_processed.map_to_ort(),
            is_metadata_only: self.is_metadata_only,
            is_modified: self.is_modified,
        }
    }
}

impl MapToModel for ort::Project {
    type Model = Project;

    fn map_to_model(&self) -> Result<Project, MappingError> {
        Ok(Project {
            identifier: self.id.map_to_model()?,
            cpe: self.cpe.clone(),
            definition_file_path: self.definition_file_path.clone(),
            authors: self.authors.clone(),
            declared_licenses: self.declared_licenses.clone(),
            processed_declared_license: self.declared_licenses_processed.map_to_model()?,
            vcs: self.vcs.map_to_model()?,
            vcs_processed: self.vcs_processed.map_to_model()?,
            homepage_url: self.homepage_url.clone(),
            scope_names: self.scope_names.clone(),
        })
    }
}

impl MapToOrt for Project {
    type Ort = ort::Project;

    fn map_to_ort(&self) -> ort::Project {
        ort::Project {
            id: self.identifier.map_to_ort(),
            cpe: self.cpe.clone(),
            definition_file_path: self.definition_file_path.clone(),
            authors: self.authors.clone(),
            declared_licenses: self.declared_licenses.clone(),
            declared_licenses_processed: self.processed_declared_license.map_to_ort(),
            vcs: self.vcs.map_to_ort(),
            vcs_processed: self.vcs_processed.map_to_ort(),
            homepage_url: self.homepage_url.clone(),
            scope_names: self.scope_names.clone(),
        }
    }
}

impl MapToModel for ort::Environment {
    type Model = Environment;

    fn map_to_model(&self) -> Result<Environment, MappingError> {
        Ok(Environment {
            ort_version: self.ort_version.clone(),
            java_version: self.java_version.clone(),
            os: self.os.clone(),
            processors: self.processors,
            max_memory: self.max_memory,
            variables: self.variables.clone(),
            tool_versions: self.tool_versions.clone(),
        })
    }
}

impl MapToOrt for Environment {
    type Ort = ort::Environment;

    fn map_to_ort(&self) -> ort::Environment {
        ort::Environment {
            ort_version: self.ort_version.clone(),
            java_version: self.java_version.clone(),
            os: self.os.clone(),
            processors: self.processors,
            max_memory: self.max_memory,
            variables: self.variables.clone(),
            tool_versions: self.tool_versions.clone(),
        }
    }
}

impl MapToModel for ort::AnalyzerConfiguration {
    type Model = AnalyzerConfiguration;

    fn map_to_model(&self) -> Result<AnalyzerConfiguration, MappingError> {
        Ok(AnalyzerConfiguration {
            allow_dynamic_versions: self.allow_dynamic_versions,
            enabled_package_managers: self.enabled_package_managers.clone(),
            disabled_package_managers: self.disabled_package_managers.clone(),
            skip_excluded: self.skip_excluded,
        })
    }
}

impl MapToOrt for AnalyzerConfiguration {
    type Ort = ort::AnalyzerConfiguration;

    fn map_to_ort(&self) -> ort::AnalyzerConfiguration {
        ort::AnalyzerConfiguration {
            allow_dynamic_versions: self.allow_dynamic_versions,
            enabled_package_managers: self.enabled_package_managers.clone(),
            disabled_package_managers: self.disabled_package_managers.clone(),
            skip_excluded: self.skip_excluded,
        }
    }
}

/// Map an analyzer run, produced by the analyzer job with the given id.
pub fn analyzer_run_to_model(
    run: &ort::AnalyzerRun,
    analyzer_job_id: i64,
) -> Result<AnalyzerRun, MappingError> {
    let mut issues = Vec::new();
    for (id, package_issues) in &run.result.issues {
        let identifier = id.map_to_model()?;
        for issue in package_issues {
            issues.push(
                issue
                    .map_to_model()?
                    .with_identifier(identifier.clone())
                    .with_worker(JobKind::Analyzer.to_string()),
            );
        }
    }

    Ok(AnalyzerRun {
        id: -1,
        analyzer_job_id,
        start_time: run.start_time,
        end_time: run.end_time,
        environment: run.environment.map_to_model()?,
        config: run.config.map_to_model()?,
        projects: run.result.projects.map_to_model()?,
        packages: run.result.packages.map_to_model()?,
        issues,
    })
}

impl MapToOrt for AnalyzerRun {
    type Ort = ort::AnalyzerRun;

    fn map_to_ort(&self) -> ort::AnalyzerRun {
        let mut issues: BTreeMap<ort::Identifier, Vec<ort::Issue>> = BTreeMap::new();
        for issue in &self.issues {
            if let Some(identifier) = &issue.identifier {
                issues
                    .entry(identifier.map_to_ort())
                    .or_default()
                    .push(issue.map_to_ort());
            }
        }

        ort::AnalyzerRun {
            start_time: self.start_time,
            end_time: self.end_time,
            environment: self.environment.map_to_ort(),
            config: self.config.map_to_ort(),
            result: ort::AnalyzerResult {
                projects: self.projects.map_to_ort(),
                packages: self.packages.map_to_ort(),
                issues,
            },
        }
    }
}

impl MapToModel for ort::VulnerabilityReference {
    type Model = VulnerabilityReference;

    fn map_to_model(&self) -> Result<VulnerabilityReference, MappingError> {
        Ok(VulnerabilityReference {
            url: self.url.clone(),
            scoring_system: self.scoring_system.clone(),
            severity: self.severity.clone(),
            score: self.score,
            vector: self.vector.clone(),
        })
    }
}

impl MapToOrt for VulnerabilityReference {
    type Ort = ort::VulnerabilityReference;

    fn map_to_ort(&self) -> ort::VulnerabilityReference {
        ort::VulnerabilityReference {
            url: self.url.clone(),
            scoring_system: self.scoring_system.clone(),
            severity: self.severity.clone(),
            score: self.score,
            vector: self.vector.clone(),
        }
    }
}

impl MapToModel for ort::Vulnerability {
    type Model = Vulnerability;

    fn map_to_model(&self) -> Result<Vulnerability, MappingError> {
        Ok(Vulnerability {
            external_id: self.id.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            references: self.references.map_to_model()?,
        })
    }
}

impl MapToOrt for Vulnerability {
    type Ort = ort::Vulnerability;

    fn map_to_ort(&self) -> ort::Vulnerability {
        ort::Vulnerability {
            id: self.external_id.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            references: self.references.map_to_ort(),
        }
    }
}

impl MapToModel for ort::AdvisorConfiguration {
    type Model = AdvisorConfiguration;

    fn map_to_model(&self) -> Result<AdvisorConfiguration, MappingError> {
        Ok(AdvisorConfiguration {
            config: self.config.clone(),
        })
    }
}

impl MapToOrt for AdvisorConfiguration {
    type Ort = ort::AdvisorConfiguration;

    fn map_to_ort(&self) -> ort::AdvisorConfiguration {
        ort::AdvisorConfiguration {
            config: self.config.clone(),
        }
    }
}

/// Map an advisor run, produced by the advisor job with the given id.
///
/// The issues of all results end up in the issues of the run, tagged with their package.
pub fn advisor_run_to_model(
    run: &ort::AdvisorRun,
    advisor_job_id: i64,
) -> Result<AdvisorRun, MappingError> {
    let mut results = Vec::new();
    let mut issues = Vec::new();
    for (id, package_results) in &run.results {
        let identifier = id.map_to_model()?;
        for result in package_results {
            results.push(AdvisorResult {
                identifier: identifier.clone(),
                advisor_name: result.advisor.name.clone(),
                capabilities: result.advisor.capabilities.clone(),
                start_time: result.summary.start_time,
                end_time: result.summary.end_time,
                vulnerabilities: result.vulnerabilities.map_to_model()?,
            });
            for issue in &result.summary.issues {
                issues.push(
                    issue
                        .map_to_model()?
                        .with_identifier(identifier.clone())
                        .with_worker(JobKind::Advisor.to_string()),
                );
            }
        }
    }

    Ok(AdvisorRun {
        id: -1,
        advisor_job_id,
        start_time: run.start_time,
        end_time: run.end_time,
        environment: run.environment.map_to_model()?,
        config: run.config.map_to_model()?,
        results,
        issues,
    })
}

impl MapToOrt for AdvisorRun {
    type Ort = ort::AdvisorRun;

    /// An issue goes to the result of its package whose advisor raised it, or to the first result
    /// of its package if no advisor matches.
    fn map_to_ort(&self) -> ort::AdvisorRun {
        let mut results: BTreeMap<ort::Identifier, Vec<ort::AdvisorResult>> = BTreeMap::new();
        for result in &self.results {
            results
                .entry(result.identifier.map_to_ort())
                .or_default()
                .push(ort::AdvisorResult {
                    advisor: ort::AdvisorDetails {
                        name: result.advisor_name.clone(),
                        capabilities: result.capabilities.clone(),
                    },
                    summary: ort::AdvisorSummary {
                        start_time: result.start_time,
                        end_time: result.end_time,
                        issues: vec![],
                    },
                    vulnerabilities: result.vulnerabilities.map_to_ort(),
                });
        }

        for issue in &self.issues {
            let Some(package_results) = issue
                .identifier
                .as_ref()
                .and_then(|identifier| results.get_mut(&identifier.map_to_ort()))
            else {
                continue;
            };

            let index = package_results
                .iter()
                .position(|result| result.advisor.name == issue.source)
                .unwrap_or_default();
            if let Some(result) = package_results.get_mut(index) {
                result.summary.issues.push(issue.map_to_ort());
            }
        }

        ort::AdvisorRun {
            start_time: self.start_time,
            end_time: self.end_time,
            environment: self.environment.map_to_ort(),
            config: self.config.map_to_ort(),
            results,
        }
    }
}

impl MapToModel for ort::RuleViolation {
    type Model = RuleViolation;

    fn map_to_model(&self) -> Result<RuleViolation, MappingError> {
        Ok(RuleViolation {
            rule: self.rule.clone(),
            package: self.pkg.map_to_model()?,
            license: self.license.clone(),
            license_source: self.license_source.clone(),
            severity: severity_to_model(self.severity),
            message: self.message.clone(),
            how_to_fix: self.how_to_fix.clone(),
        })
    }
}

impl MapToOrt for RuleViolation {
    type Ort = ort::RuleViolation;

    fn map_to_ort(&self) -> ort::RuleViolation {
        ort::RuleViolation {
            rule: self.rule.clone(),
            pkg: self.package.map_to_ort(),
            license: self.license.clone(),
            license_source: self.license_source.clone(),
            severity: severity_to_ort(self.severity),
            message: self.message.clone(),
            how_to_fix: self.how_to_fix.clone(),
        }
    }
}

pub fn evaluator_run_to_model(
    run: &ort::EvaluatorRun,
    evaluator_job_id: i64,
) -> Result<EvaluatorRun, MappingError> {
    Ok(EvaluatorRun {
        id: -1,
        evaluator_job_id,
        start_time: run.start_time,
        end_time: run.end_time,
        violations: run.violations.map_to_model()?,
    })
}

impl MapToOrt for EvaluatorRun {
    type Ort = ort::EvaluatorRun;

    fn map_to_ort(&self) -> ort::EvaluatorRun {
        ort::EvaluatorRun {
            start_time: self.start_time,
            end_time: self.end_time,
            violations: self.violations.map_to_ort(),
        }
    }
}

impl MapToModel for ort::TextLocation {
    type Model = TextLocation;

    fn map_to_model(&self) -> Result<TextLocation, MappingError> {
        Ok(TextLocation {
            path: self.path.clone(),
            start_line: self.start_line,
            end_line: self.end_line,
        })
    }
}

impl MapToOrt for TextLocation {
    type Ort = ort::TextLocation;

    fn map_to_ort(&self) -> ort::TextLocation {
        ort::TextLocation {
            path: self.path.clone(),
            start_line: self.start_line,
            end_line: self.end_line,
        }
    }
}

impl MapToModel for ort::LicenseFinding {
    type Model = LicenseFinding;

    fn map_to_model(&self) -> Result<LicenseFinding, MappingError> {
        Ok(LicenseFinding {
            spdx_license: self.license.clone(),
            location: self.location.map_to_model()?,
            score: self.score,
        })
    }
}

impl MapToOrt for LicenseFinding {
    type Ort = ort::LicenseFinding;

    fn map_to_ort(&self) -> ort::LicenseFinding {
        ort::LicenseFinding {
            license: self.spdx_license.clone(),
            location: self.location.map_to_ort(),
            score: self.score,
        }
    }
}

impl MapToModel for ort::CopyrightFinding {
    type Model = CopyrightFinding;

    fn map_to_model(&self) -> Result<CopyrightFinding, MappingError> {
        Ok(CopyrightFinding {
            statement: self.statement.clone(),
            location: self.location.map_to_model()?,
        })
    }
}

impl MapToOrt for CopyrightFinding {
    type Ort = ort::CopyrightFinding;

    fn map_to_ort(&self) -> ort::CopyrightFinding {
        ort::CopyrightFinding {
            statement: self.statement.clone(),
            location: self.location.map_to_ort(),
        }
    }
}

impl MapToModel for ort::ArtifactProvenance {
    type Model = ArtifactProvenance;

    fn map_to_model(&self) -> Result<ArtifactProvenance, MappingError> {
        Ok(ArtifactProvenance {
            source_artifact: self.source_artifact.map_to_model()?,
        })
    }
}

impl MapToOrt for ArtifactProvenance {
    type Ort = ort::ArtifactProvenance;

    fn map_to_ort(&self) -> ort::ArtifactProvenance {
        ort::ArtifactProvenance {
            source_artifact: self.source_artifact.map_to_ort(),
        }
    }
}

impl MapToModel for ort::RepositoryProvenance {
    type Model = RepositoryProvenance;

    fn map_to_model(&self) -> Result<RepositoryProvenance, MappingError> {
        Ok(RepositoryProvenance {
            vcs_info: self.vcs_info.map_to_model()?,
            resolved_revision: self.resolved_revision.clone(),
        })
    }
}

impl MapToOrt for RepositoryProvenance {
    type Ort = ort::RepositoryProvenance;

    fn map_to_ort(&self) -> ort::RepositoryProvenance {
        ort::RepositoryProvenance {
            vcs_info: self.vcs_info.map_to_ort(),
            resolved_revision: self.resolved_revision.clone(),
        }
    }
}

impl MapToModel for ort::KnownProvenance {
    type Model = KnownProvenance;

    fn map_to_model(&self) -> Result<KnownProvenance, MappingError> {
        Ok(match self {
            Self::Artifact(artifact) => KnownProvenance::Artifact(artifact.map_to_model()?),
            Self::Repository(repository) => {
                KnownProvenance::Repository(repository.map_to_model()?)
            }
        })
    }
}

impl MapToOrt for KnownProvenance {
    type Ort = ort::KnownProvenance;

    fn map_to_ort(&self) -> ort::KnownProvenance {
        match self {
            Self::Artifact(artifact) => ort::KnownProvenance::Artifact(artifact.map_to_ort()),
            Self::Repository(repository) => {
                ort::KnownProvenance::Repository(repository.map_to_ort())
            }
        }
    }
}

impl MapToModel for ort::Snippet {
    type Model = Snippet;

    fn map_to_model(&self) -> Result<Snippet, MappingError> {
        Ok(Snippet {
            purl: self.purl.clone(),
            provenance: self.provenance.map_to_model()?,
            location: self.location.map_to_model()?,
            score: self.score,
            spdx_license: self.license.clone(),
            additional_data: self.additional_data.clone(),
        })
    }
}

impl MapToOrt for Snippet {
    type Ort = ort::Snippet;

    fn map_to_ort(&self) -> ort::Snippet {
        ort::Snippet {
            score: self.score,
            location: self.location.map_to_ort(),
            provenance: self.provenance.map_to_ort(),
            purl: self.purl.clone(),
            license: self.spdx_license.clone(),
            additional_data: self.additional_data.clone(),
        }
    }
}

impl MapToModel for ort::SnippetFinding {
    type Model = SnippetFinding;

    fn map_to_model(&self) -> Result<SnippetFinding, MappingError> {
        Ok(SnippetFinding {
            location: self.source_location.map_to_model()?,
            snippets: self.snippets.map_to_model()?,
        })
    }
}

impl MapToOrt for SnippetFinding {
    type Ort = ort::SnippetFinding;

    fn map_to_ort(&self) -> ort::SnippetFinding {
        ort::SnippetFinding {
            source_location: self.location.map_to_ort(),
            snippets: self.snippets.map_to_ort(),
        }
    }
}

impl MapToModel for ort::ScanSummary {
    type Model = ScanSummary;

    fn map_to_model(&self) -> Result<ScanSummary, MappingError> {
        Ok(ScanSummary {
            start_time: self.start_time,
            end_time: self.end_time,
            license_findings: self.license_findings.map_to_model()?,
            copyright_findings: self.copyright_findings.map_to_model()?,
            snippet_findings: self.snippet_findings.map_to_model()?,
            issues: self.issues.map_to_model()?,
        })
    }
}

impl MapToOrt for ScanSummary {
    type Ort = ort::ScanSummary;

    fn map_to_ort(&self) -> ort::ScanSummary {
        ort::ScanSummary {
            start_time: self.start_time,
            end_time: self.end_time,
            license_findings: self.license_findings.map_to_ort(),
            copyright_findings: self.copyright_findings.map_to_ort(),
            snippet_findings: self.snippet_findings.map_to_ort(),
            issues: self.issues.map_to_ort(),
        }
    }
}

impl MapToModel for ort::ScannerDetails {
    type Model = ScannerDetail;

    fn map_to_model(&self) -> Result<ScannerDetail, MappingError> {
        Ok(ScannerDetail {
            name: self.name.clone(),
            version: self.version.clone(),
            configuration: self.configuration.clone(),
        })
    }
}

impl MapToOrt for ScannerDetail {
    type Ort = ort::ScannerDetails;

    fn map_to_ort(&self) -> ort::ScannerDetails {
        ort::ScannerDetails {
            name: self.name.clone(),
            version: self.version.clone(),
            configuration: self.configuration.clone(),
        }
    }
}

impl MapToModel for ort::ScanResult {
    type Model = ScanResult;

    fn map_to_model(&self) -> Result<ScanResult, MappingError> {
        let ort::Provenance::Known(provenance) = &self.provenance else {
            return Err(MappingError::UnknownProvenance(self.scanner.name.clone()));
        };

        Ok(ScanResult {
            provenance: provenance.map_to_model()?,
            scanner: self.scanner.map_to_model()?,
            summary: self.summary.map_to_model()?,
            additional_data: self.additional_data.clone(),
        })
    }
}

impl MapToOrt for ScanResult {
    type Ort = ort::ScanResult;

    fn map_to_ort(&self) -> ort::ScanResult {
        ort::ScanResult {
            provenance: ort::Provenance::Known(self.provenance.map_to_ort()),
            scanner: self.scanner.map_to_ort(),
            summary: self.summary.map_to_ort(),
            additional_data: self.additional_data.clone(),
        }
    }
}

impl MapToModel for ort::PackageProvenanceResolutionResult {
    type Model = PackageProvenanceResolution;

    fn map_to_model(&self) -> Result<PackageProvenanceResolution, MappingError> {
        Ok(match self {
            Self::ResolvedArtifact { provenance } => PackageProvenanceResolution::Artifact {
                provenance: provenance.map_to_model()?,
            },
            Self::ResolvedRepository {
                provenance,
                cloned_revision,
                is_fixed_revision,
            } => PackageProvenanceResolution::Repository {
                provenance: provenance.map_to_model()?,
                cloned_revision: cloned_revision.clone(),
                is_fixed_revision: *is_fixed_revision,
            },
            Self::Unresolved { message } => PackageProvenanceResolution::Unresolved {
                message: message.clone(),
            },
        })
    }
}

impl MapToOrt for PackageProvenanceResolution {
    type Ort = ort::PackageProvenanceResolutionResult;

    fn map_to_ort(&self) -> ort::PackageProvenanceResolutionResult {
        match self {
            Self::Artifact { provenance } => {
                ort::PackageProvenanceResolutionResult::ResolvedArtifact {
                    provenance: provenance.map_to_ort(),
                }
            }
            Self::Repository {
                provenance,
                cloned_revision,
                is_fixed_revision,
            } => ort::PackageProvenanceResolutionResult::ResolvedRepository {
                provenance: provenance.map_to_ort(),
                cloned_revision: cloned_revision.clone(),
                is_fixed_revision: *is_fixed_revision,
            },
            Self::Unresolved { message } => ort::PackageProvenanceResolutionResult::Unresolved {
                message: message.clone(),
            },
        }
    }
}

impl MapToModel for ort::NestedProvenance {
    type Model = NestedProvenance;

    fn map_to_model(&self) -> Result<NestedProvenance, MappingError> {
        Ok(NestedProvenance {
            root: self.root.map_to_model()?,
            sub_repositories: self.sub_repositories.map_to_model()?,
        })
    }
}

impl MapToOrt for NestedProvenance {
    type Ort = ort::NestedProvenance;

    fn map_to_ort(&self) -> ort::NestedProvenance {
        ort::NestedProvenance {
            root: self.root.map_to_ort(),
            sub_repositories: self.sub_repositories.map_to_ort(),
        }
    }
}

impl MapToModel for ort::NestedProvenanceResolutionResult {
    type Model = NestedProvenanceResolution;

    fn map_to_model(&self) -> Result<NestedProvenanceResolution, MappingError> {
        Ok(NestedProvenanceResolution {
            nested_provenance: self.nested_provenance.map_to_model()?,
            has_only_fixed_revisions: self.has_only_fixed_revisions,
        })
    }
}

impl MapToOrt for NestedProvenanceResolution {
    type Ort = ort::NestedProvenanceResolutionResult;

    fn map_to_ort(&self) -> ort::NestedProvenanceResolutionResult {
        ort::NestedProvenanceResolutionResult {
            nested_provenance: self.nested_provenance.map_to_ort(),
            has_only_fixed_revisions: self.has_only_fixed_revisions,
        }
    }
}

impl MapToModel for ort::ProvenanceResolutionResult {
    type Model = ProvenanceResolutionResult;

    fn map_to_model(&self) -> Result<ProvenanceResolutionResult, MappingError> {
        Ok(ProvenanceResolutionResult {
            id: self.id.map_to_model()?,
            package_provenance: self.package_provenance.map_to_model()?,
            sub_repositories: self.sub_repositories.map_to_model()?,
            package_provenance_resolution_issue: self
                .package_provenance_resolution_issue
                .map_to_model()?,
        })
    }
}

impl MapToOrt for ProvenanceResolutionResult {
    type Ort = ort::ProvenanceResolutionResult;

    fn map_to_ort(&self) -> ort::ProvenanceResolutionResult {
        ort::ProvenanceResolutionResult {
            id: self.id.map_to_ort(),
            package_provenance: self.package_provenance.map_to_ort(),
            sub_repositories: self.sub_repositories.map_to_ort(),
            package_provenance_resolution_issue: self
                .package_provenance_resolution_issue
                .map_to_ort(),
        }
    }
}

impl MapToModel for ort::ScannerConfiguration {
    type Model = ScannerConfiguration;

    fn map_to_model(&self) -> Result<ScannerConfiguration, MappingError> {
        Ok(ScannerConfiguration {
            skip_concluded: self.skip_concluded,
            skip_excluded: self.skip_excluded,
            create_missing_archives: self.create_missing_archives,
            detected_license_mappings: self.detected_license_mapping.clone(),
            ignore_patterns: self.ignore_patterns.clone(),
        })
    }
}

impl MapToOrt for ScannerConfiguration {
    type Ort = ort::ScannerConfiguration;

    fn map_to_ort(&self) -> ort::ScannerConfiguration {
        ort::ScannerConfiguration {
            skip_concluded: self.skip_concluded,
            skip_excluded: self.skip_excluded,
            create_missing_archives: self.create_missing_archives,
            detected_license_mapping: self.detected_license_mappings.clone(),
            ignore_patterns: self.ignore_patterns.clone(),
        }
    }
}

pub fn scanner_run_to_model(
    run: &ort::ScannerRun,
    scanner_job_id: i64,
) -> Result<ScannerRun, MappingError> {
    Ok(ScannerRun {
        id: -1,
        scanner_job_id,
        start_time: Some(run.start_time),
        end_time: Some(run.end_time),
        environment: Some(run.environment.map_to_model()?),
        config: Some(run.config.map_to_model()?),
        provenances: run.provenances.map_to_model()?,
        scan_results: run.scan_results.map_to_model()?,
    })
}

impl MapToOrt for ScannerRun {
    type Ort = ort::ScannerRun;

    /// A run which has not been started yet gets epoch timestamps.
    fn map_to_ort(&self) -> ort::ScannerRun {
        ort::ScannerRun {
            start_time: self.start_time.unwrap_or(OffsetDateTime::UNIX_EPOCH),
            end_time: self.end_time.unwrap_or(OffsetDateTime::UNIX_EPOCH),
            environment: self.environment.map_to_ort().unwrap_or_default(),
            config: self.config.map_to_ort().unwrap_or_default(),
            provenances: self.provenances.map_to_ort(),
            scan_results: self.scan_results.map_to_ort(),
        }
    }
}
