use crate::runs::{Environment, Identifier, OrtIssue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use time::OffsetDateTime;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VulnerabilityReference {
    pub url: String,
    pub scoring_system: Option<String>,
    pub severity: Option<String>,
    pub score: Option<f32>,
    pub vector: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Vulnerability {
    pub external_id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub references: Vec<VulnerabilityReference>,
}

/// What one advisor found out about one package.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AdvisorResult {
    pub identifier: Identifier,
    pub advisor_name: String,
    pub capabilities: BTreeSet<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub vulnerabilities: Vec<Vulnerability>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AdvisorConfiguration {
    pub config: BTreeMap<String, BTreeMap<String, String>>,
}

/// The results of an advisor job.
///
/// Issues of the advisors are kept with the ORT run, each one carrying the identifier of the
/// package it was raised for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AdvisorRun {
    pub id: i64,
    pub advisor_job_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub environment: Environment,
    pub config: AdvisorConfiguration,
    pub results: Vec<AdvisorResult>,
    pub issues: Vec<OrtIssue>,
}
