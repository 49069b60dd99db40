use crate::runs::{Identifier, Severity};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub rule: String,
    pub package: Option<Identifier>,
    pub license: Option<String>,
    pub license_source: Option<String>,
    pub severity: Severity,
    pub message: String,
    pub how_to_fix: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorRun {
    pub id: i64,
    pub evaluator_job_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub violations: Vec<RuleViolation>,
}
