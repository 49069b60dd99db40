use super::*;
use crate::{
    config::ReportNameMapping,
    storage::{FileSystemReportStorage, ReportStorageError},
};
use async_trait::async_trait;
use ortserver_ort_model::ReporterError;
use std::path::PathBuf;
use test_log::test;

/// Writes one file per configured name, a name starting with `!` fails.
struct FilesReporter;

#[async_trait]
impl Reporter for FilesReporter {
    fn report_type(&self) -> &str {
        "Files"
    }

    async fn generate_report(
        &self,
        _input: &ReporterInput,
        output_dir: &Path,
        options: &BTreeMap<String, String>,
    ) -> Result<Vec<Result<PathBuf, ReporterError>>, ReporterError> {
        let mut result = Vec::new();
        for name in options.get("files").map(String::as_str).unwrap_or_default().split(',') {
            if let Some(name) = name.strip_prefix('!') {
                result.push(Err(ReporterError::Failed(format!("cannot render {name}"))));
                continue;
            }
            let file = output_dir.join(name);
            tokio::fs::write(&file, name).await?;
            result.push(Ok(file));
        }
        Ok(result)
    }
}

struct BrokenReporter;

#[async_trait]
impl Reporter for BrokenReporter {
    fn report_type(&self) -> &str {
        "Broken"
    }

    async fn generate_report(
        &self,
        _input: &ReporterInput,
        _output_dir: &Path,
        _options: &BTreeMap<String, String>,
    ) -> Result<Vec<Result<PathBuf, ReporterError>>, ReporterError> {
        Err(ReporterError::Failed("template missing".into()))
    }
}

struct BrokenStorage;

#[async_trait]
impl ReportStorage for BrokenStorage {
    async fn store_report_files(
        &self,
        _ort_run_id: i64,
        _files: &BTreeMap<String, PathBuf>,
    ) -> Result<(), ReportStorageError> {
        Err(ReportStorageError::Io(std::io::Error::other("disk full")))
    }
}

fn config(formats: &[&str], files: &str) -> ReporterJobConfiguration {
    ReporterJobConfiguration {
        formats: formats.iter().map(|format| format.to_string()).collect(),
        options: BTreeMap::from([(
            "Files".to_string(),
            BTreeMap::from([("files".to_string(), files.to_string())]),
        )]),
        ..Default::default()
    }
}

fn runner(storage: Arc<dyn ReportStorage>) -> ReporterRunner {
    ReporterRunner::new(storage)
        .with_builtin_reporters()
        .with_reporter(FilesReporter)
        .with_reporter(BrokenReporter)
}

fn names(reports: &[&str]) -> BTreeSet<String> {
    reports.iter().map(|report| report.to_string()).collect()
}

#[test(tokio::test)]
async fn generate_and_store_all_formats() -> Result<(), anyhow::Error> {
    let work = tempfile::tempdir()?;
    let root = tempfile::tempdir()?;
    let storage = FileSystemReportStorage::new(root.path());

    let result = runner(Arc::new(storage.clone()))
        .run(
            3,
            ort::OrtResult::default(),
            &config(&["Files", "ortresult"], "a.txt,b.txt"),
            work.path(),
        )
        .await;

    assert!(result.issues.is_empty(), "{:?}", result.issues);
    assert_eq!(names(&["a.txt", "b.txt", "ort-result.json"]), result.reports);

    for report in &result.reports {
        assert!(storage.run_dir(3).join(report).is_file(), "{report}");
    }

    Ok(())
}

#[test(tokio::test)]
async fn failures_stay_with_their_format() -> Result<(), anyhow::Error> {
    let work = tempfile::tempdir()?;
    let root = tempfile::tempdir()?;

    let result = runner(Arc::new(FileSystemReportStorage::new(root.path())))
        .run(
            3,
            ort::OrtResult::default(),
            &config(&["Broken", "Files", "Unknown", "OrtResult"], "a.txt,!b.txt"),
            work.path(),
        )
        .await;

    assert_eq!(names(&["a.txt", "ort-result.json"]), result.reports);

    let sources = result
        .issues
        .iter()
        .map(|issue| issue.source.as_str())
        .collect::<BTreeSet<_>>();
    assert_eq!(
        BTreeSet::from(["Reporter-Broken", "Reporter-Files", "Reporter-Unknown"]),
        sources
    );
    assert!(result
        .issues
        .iter()
        .all(|issue| issue.severity == Severity::Error && issue.worker.as_deref() == Some("reporter")));
    assert!(result
        .issues
        .iter()
        .any(|issue| issue.message.contains("cannot render b.txt")));

    Ok(())
}

#[test(tokio::test)]
async fn reports_are_renamed() -> Result<(), anyhow::Error> {
    let work = tempfile::tempdir()?;
    let root = tempfile::tempdir()?;

    let mut config = config(&["Files"], "page.html");
    config.name_mappings.insert(
        "Files".into(),
        ReportNameMapping {
            name_prefix: "scan-report".into(),
            always_append_index: false,
        },
    );

    let result = runner(Arc::new(FileSystemReportStorage::new(root.path())))
        .run(5, ort::OrtResult::default(), &config, work.path())
        .await;

    assert_eq!(names(&["scan-report.html"]), result.reports);
    assert_eq!(
        "page.html",
        tokio::fs::read_to_string(root.path().join("5").join("scan-report.html")).await?
    );

    Ok(())
}

#[test(tokio::test)]
async fn storage_failures_become_issues() -> Result<(), anyhow::Error> {
    let work = tempfile::tempdir()?;

    let result = runner(Arc::new(BrokenStorage))
        .run(
            1,
            ort::OrtResult::default(),
            &config(&["OrtResult"], ""),
            work.path(),
        )
        .await;

    assert!(result.reports.is_empty());
    assert_eq!(1, result.issues.len());
    assert_eq!("Reporter-OrtResult", result.issues[0].source);
    assert!(result.issues[0].message.contains("disk full"));

    Ok(())
}

/// Remembers the names of every stored report.
#[derive(Default)]
struct RecordingStorage(std::sync::Mutex<Vec<String>>);

#[async_trait]
impl ReportStorage for RecordingStorage {
    async fn store_report_files(
        &self,
        _ort_run_id: i64,
        files: &BTreeMap<String, PathBuf>,
    ) -> Result<(), ReportStorageError> {
        self.0
            .lock()
            .map_err(|_| ReportStorageError::Io(std::io::Error::other("poisoned")))?
            .extend(files.keys().cloned());
        Ok(())
    }
}

#[test(tokio::test)]
async fn formats_differing_in_case_run_once() -> Result<(), anyhow::Error> {
    let work = tempfile::tempdir()?;
    let storage = Arc::new(RecordingStorage::default());

    let result = runner(storage.clone())
        .run(
            2,
            ort::OrtResult::default(),
            &config(&["OrtResult", "ortresult", "ORTRESULT"], ""),
            work.path(),
        )
        .await;

    assert!(result.issues.is_empty(), "{:?}", result.issues);
    assert_eq!(names(&["ort-result.json"]), result.reports);
    assert_eq!(
        vec!["ort-result.json".to_string()],
        *storage.0.lock().expect("not poisoned")
    );

    Ok(())
}
