use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a reporter job should produce, as stored in the configuration of the job.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReporterJobConfiguration {
    /// The report formats to generate, by the type of the reporter.
    #[serde(default)]
    pub formats: Vec<String>,

    /// Options passed to the reporter of a format.
    #[serde(default)]
    pub options: BTreeMap<String, BTreeMap<String, String>>,

    /// How to name the files of a format. Files of formats without a mapping keep their names.
    #[serde(default)]
    pub name_mappings: BTreeMap<String, ReportNameMapping>,
}

impl ReporterJobConfiguration {
    pub fn options_for(&self, format: &str) -> BTreeMap<String, String> {
        self.options.get(format).cloned().unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportNameMapping {
    pub name_prefix: String,
    #[serde(default)]
    pub always_append_index: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_job_configuration() -> Result<(), serde_json::Error> {
        let config: ReporterJobConfiguration = serde_json::from_value(serde_json::json!({
            "formats": ["OrtResult", "WebApp"],
            "options": { "OrtResult": { "formats": "json,yaml" } },
            "nameMappings": { "WebApp": { "namePrefix": "scan-report" } },
        }))?;

        assert_eq!(vec!["OrtResult", "WebApp"], config.formats);
        assert_eq!(
            Some("json,yaml"),
            config.options_for("OrtResult").get("formats").map(String::as_str)
        );
        assert!(config.options_for("WebApp").is_empty());
        assert!(!config.name_mappings["WebApp"].always_append_index);

        assert_eq!(
            ReporterJobConfiguration::default(),
            serde_json::from_value(serde_json::json!({}))?
        );

        Ok(())
    }
}
