use ortserver_common::model::OptionalValue;
use ortserver_model::{runs::OrtIssue, OrtRunStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOrtRun {
    pub revision: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub job_config_context: Option<String>,
    #[serde(default)]
    pub environment_config_path: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// Progress reported for a run by the orchestrator.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOrtRun {
    #[serde(default)]
    pub status: OptionalValue<OrtRunStatus>,
    #[serde(default)]
    pub resolved_revision: OptionalValue<Option<String>>,
    #[serde(default)]
    pub resolved_job_config_context: OptionalValue<Option<String>>,
    /// Appended to the issues already recorded for the run
    #[serde(default)]
    pub issues: Vec<OrtIssue>,
}
