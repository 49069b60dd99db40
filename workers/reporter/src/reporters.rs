//! Reporters which come with the server.

use async_trait::async_trait;
use ortserver_ort_model::{Reporter, ReporterError, ReporterInput};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Writes the assembled ORT result itself, as JSON and/or YAML.
///
/// The `formats` option takes a comma separated list of `json` and `yaml` (or `yml`), defaulting
/// to `json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrtResultReporter;

impl OrtResultReporter {
    pub const REPORT_TYPE: &'static str = "OrtResult";
    const FILE_NAME: &'static str = "ort-result";

    async fn write(
        input: &ReporterInput,
        output_dir: &Path,
        format: &str,
    ) -> Result<PathBuf, ReporterError> {
        let (extension, content) = match format {
            "json" => (
                "json",
                serde_json::to_vec_pretty(&input.ort_result)
                    .map_err(|err| ReporterError::Failed(err.to_string()))?,
            ),
            "yaml" | "yml" => (
                "yml",
                serde_yaml::to_string(&input.ort_result)
                    .map_err(|err| ReporterError::Failed(err.to_string()))?
                    .into_bytes(),
            ),
            other => {
                return Err(ReporterError::Failed(format!(
                    "unsupported output format '{other}'"
                )))
            }
        };

        let file = output_dir.join(format!("{}.{extension}", Self::FILE_NAME));
        tokio::fs::write(&file, content).await?;

        Ok(file)
    }
}

#[async_trait]
impl Reporter for OrtResultReporter {
    fn report_type(&self) -> &str {
        Self::REPORT_TYPE
    }

    async fn generate_report(
        &self,
        input: &ReporterInput,
        output_dir: &Path,
        options: &BTreeMap<String, String>,
    ) -> Result<Vec<Result<PathBuf, ReporterError>>, ReporterError> {
        let formats = options
            .get("formats")
            .map(String::as_str)
            .unwrap_or("json")
            .split(',')
            .map(|format| format.trim().to_lowercase())
            .filter(|format| !format.is_empty())
            .collect::<Vec<_>>();

        if formats.is_empty() {
            return Err(ReporterError::Failed("no output formats given".into()));
        }

        let mut result = Vec::with_capacity(formats.len());
        for format in formats {
            result.push(Self::write(input, output_dir, &format).await);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ortserver_ort_model as ort;
    use test_log::test;

    fn input() -> ReporterInput {
        ReporterInput::new(ort::OrtResult {
            repository: ort::Repository {
                vcs: ort::VcsInfo {
                    r#type: ort::VcsType::new("Git"),
                    url: "https://github.com/example/app.git".into(),
                    revision: "main".into(),
                    path: String::new(),
                },
                ..Default::default()
            },
            labels: BTreeMap::from([("team".to_string(), "blue".to_string())]),
            ..Default::default()
        })
    }

    #[test(tokio::test)]
    async fn json_by_default() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;

        let files = OrtResultReporter
            .generate_report(&input(), dir.path(), &BTreeMap::new())
            .await?;
        assert_eq!(1, files.len());

        let file = files.into_iter().next().expect("one file")?;
        assert_eq!(dir.path().join("ort-result.json"), file);

        let read: ort::OrtResult = serde_json::from_slice(&tokio::fs::read(&file).await?)?;
        assert_eq!(input().ort_result, read);

        Ok(())
    }

    #[test(tokio::test)]
    async fn every_format_on_its_own() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let options = BTreeMap::from([("formats".to_string(), "YAML, xml".to_string())]);

        let files = OrtResultReporter
            .generate_report(&input(), dir.path(), &options)
            .await?;
        assert_eq!(2, files.len());

        let yaml = files[0].as_ref().map_err(|err| anyhow::anyhow!("{err}"))?;
        let read: ort::OrtResult = serde_yaml::from_str(&tokio::fs::read_to_string(yaml).await?)?;
        assert_eq!(input().ort_result, read);

        assert!(matches!(&files[1], Err(ReporterError::Failed(message)) if message.contains("xml")));

        Ok(())
    }
}
