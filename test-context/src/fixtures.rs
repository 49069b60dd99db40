//! Builders for run results used across the test suites.

use ortserver_model::{
    advisor::{
        AdvisorConfiguration, AdvisorResult, AdvisorRun, Vulnerability, VulnerabilityReference,
    },
    runs::{
        AnalyzerConfiguration, AnalyzerRun, Environment, Identifier, OrtIssue, Package,
        ProcessedDeclaredLicense, Project, RemoteArtifact, Severity, VcsInfo,
    },
    scanner::{
        ArtifactProvenance, CopyrightFinding, KnownProvenance, LicenseFinding,
        RepositoryProvenance, ScanResult, ScanSummary, ScannerDetail, Snippet, SnippetFinding,
        TextLocation,
    },
    RepositoryType,
};
use std::collections::{BTreeMap, BTreeSet};
use time::macros::datetime;

pub fn vcs(url: &str, revision: &str) -> VcsInfo {
    VcsInfo {
        r#type: RepositoryType::Git,
        url: url.into(),
        revision: revision.into(),
        path: String::new(),
    }
}

pub fn artifact(url: &str) -> RemoteArtifact {
    RemoteArtifact {
        url: url.into(),
        hash_value: "0123456789abcdef0123456789abcdef01234567".into(),
        hash_algorithm: "SHA-1".into(),
    }
}

pub fn package(name: &str, version: &str) -> Package {
    Package {
        identifier: Identifier::new("Maven", "org.example", name, version),
        purl: format!("pkg:maven/org.example/{name}@{version}"),
        cpe: None,
        authors: BTreeSet::from(["The Example Authors".to_string()]),
        declared_licenses: BTreeSet::from(["Apache-2.0".to_string(), "The MIT License".to_string()]),
        processed_declared_license: ProcessedDeclaredLicense {
            spdx_expression: Some("Apache-2.0 AND MIT".into()),
            mapped_licenses: BTreeMap::from([("The MIT License".into(), "MIT".into())]),
            unmapped_licenses: BTreeSet::new(),
        },
        description: format!("The {name} library"),
        homepage_url: format!("https://example.org/{name}"),
        binary_artifact: artifact(&format!("https://repo.example.org/{name}-{version}.jar")),
        source_artifact: artifact(&format!(
            "https://repo.example.org/{name}-{version}-sources.jar"
        )),
        vcs: vcs(&format!("https://github.com/example/{name}.git"), version),
        vcs_processed: vcs(&format!("https://github.com/example/{name}.git"), version),
        is_metadata_only: false,
        is_modified: false,
    }
}

pub fn project(name: &str) -> Project {
    Project {
        identifier: Identifier::new("Gradle", "org.example", name, "1.0.0"),
        cpe: None,
        definition_file_path: "build.gradle.kts".into(),
        authors: BTreeSet::new(),
        declared_licenses: BTreeSet::from(["Apache-2.0".to_string()]),
        processed_declared_license: ProcessedDeclaredLicense {
            spdx_expression: Some("Apache-2.0".into()),
            ..Default::default()
        },
        vcs: vcs("https://github.com/example/project.git", "main"),
        vcs_processed: vcs("https://github.com/example/project.git", "main"),
        homepage_url: String::new(),
        scope_names: BTreeSet::from(["compileClasspath".to_string(), "runtimeClasspath".into()]),
    }
}

pub fn issue(message: &str) -> OrtIssue {
    OrtIssue::new(
        datetime!(2024-03-01 12:00 UTC),
        "Gradle",
        message,
        Severity::Warning,
    )
}

pub fn analyzer_run(job_id: i64, packages: Vec<Package>) -> AnalyzerRun {
    AnalyzerRun {
        id: 0,
        analyzer_job_id: job_id,
        start_time: datetime!(2024-03-01 12:00 UTC),
        end_time: datetime!(2024-03-01 12:05 UTC),
        environment: Environment {
            ort_version: "25.0.0".into(),
            os: "Linux".into(),
            processors: 8,
            ..Default::default()
        },
        config: AnalyzerConfiguration::default(),
        projects: vec![project("app")],
        packages,
        issues: vec![],
    }
}

/// An OSV advisor run which found one vulnerability in the given package.
pub fn advisor_run(job_id: i64, identifier: Identifier) -> AdvisorRun {
    AdvisorRun {
        id: 0,
        advisor_job_id: job_id,
        start_time: datetime!(2024-03-01 12:10 UTC),
        end_time: datetime!(2024-03-01 12:12 UTC),
        environment: Environment {
            ort_version: "25.0.0".into(),
            ..Default::default()
        },
        config: AdvisorConfiguration {
            config: BTreeMap::from([(
                "OSV".to_string(),
                BTreeMap::from([("serverUrl".to_string(), "https://api.osv.dev".to_string())]),
            )]),
        },
        results: vec![AdvisorResult {
            identifier: identifier.clone(),
            advisor_name: "OSV".into(),
            capabilities: BTreeSet::from(["VULNERABILITIES".to_string()]),
            start_time: datetime!(2024-03-01 12:10 UTC),
            end_time: datetime!(2024-03-01 12:11 UTC),
            vulnerabilities: vec![Vulnerability {
                external_id: "CVE-2021-44228".into(),
                summary: Some("Remote code execution in message lookups".into()),
                description: None,
                references: vec![VulnerabilityReference {
                    url: "https://nvd.nist.gov/vuln/detail/CVE-2021-44228".into(),
                    scoring_system: Some("CVSS:3.1".into()),
                    severity: Some("CRITICAL".into()),
                    score: Some(10.0),
                    vector: Some("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:C/C:H/I:H/A:H".into()),
                }],
            }],
        }],
        issues: vec![OrtIssue::new(
            datetime!(2024-03-01 12:11 UTC),
            "OSV",
            "Rate limit reached",
            Severity::Warning,
        )
        .with_identifier(identifier)],
    }
}

pub fn location(path: &str, line: i32) -> TextLocation {
    TextLocation {
        path: path.into(),
        start_line: line,
        end_line: line + 2,
    }
}

pub fn repository_provenance() -> RepositoryProvenance {
    RepositoryProvenance {
        vcs_info: vcs("https://github.com/example/lib.git", "1.0"),
        resolved_revision: "0a1b2c3d".into(),
    }
}

/// A ScanCode result for a repository, with one finding of every kind.
pub fn scan_result() -> ScanResult {
    ScanResult {
        provenance: KnownProvenance::Repository(repository_provenance()),
        scanner: ScannerDetail {
            name: "ScanCode".into(),
            version: "32.0.8".into(),
            configuration: "--copyright --license".into(),
        },
        summary: ScanSummary {
            start_time: datetime!(2024-03-02 08:00 UTC),
            end_time: datetime!(2024-03-02 08:10 UTC),
            license_findings: vec![LicenseFinding {
                spdx_license: "Apache-2.0".into(),
                location: location("LICENSE", 1),
                score: Some(100.0),
            }],
            copyright_findings: vec![CopyrightFinding {
                statement: "Copyright 2024 Example".into(),
                location: location("src/Main.java", 1),
            }],
            snippet_findings: vec![SnippetFinding {
                location: location("src/Util.java", 10),
                snippets: vec![Snippet {
                    purl: "pkg:github/other/project@1.2".into(),
                    provenance: KnownProvenance::Artifact(ArtifactProvenance {
                        source_artifact: artifact("https://example.org/other-1.2.zip"),
                    }),
                    location: location("src/Other.java", 40),
                    score: 0.75,
                    spdx_license: "MIT".into(),
                    additional_data: BTreeMap::from([("matched".into(), "10%".into())]),
                }],
            }],
            issues: vec![issue("Timeout while scanning a file")],
        },
        additional_data: BTreeMap::new(),
    }
}
