//! Names under which report files are stored.

use crate::config::ReportNameMapping;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Maps the files a reporter produced to the names they are stored with.
///
/// Without a mapping the file names are kept. With one, every file is named after the prefix
/// plus the original extension. If there is more than a single file, or the mapping asks for it,
/// a running index is appended to the prefix, in the order of the original file names.
#[derive(Debug, Clone, Default)]
pub struct ReportNameMapper {
    mapping: Option<ReportNameMapping>,
}

impl ReportNameMapper {
    pub fn new(mapping: Option<ReportNameMapping>) -> Self {
        Self { mapping }
    }

    pub fn map_report_names(&self, files: &[PathBuf]) -> BTreeMap<String, PathBuf> {
        let mut files = files.to_vec();
        files.sort_by_key(|file| file_name(file));

        let Some(mapping) = &self.mapping else {
            return files
                .into_iter()
                .map(|file| (file_name(&file), file))
                .collect();
        };

        let append_index = mapping.always_append_index || files.len() > 1;

        files
            .into_iter()
            .enumerate()
            .map(|(index, file)| {
                let mut name = mapping.name_prefix.clone();
                if append_index {
                    name.push_str(&format!("-{}", index + 1));
                }
                if let Some(extension) = file.extension() {
                    name.push('.');
                    name.push_str(&extension.to_string_lossy());
                }
                (name, file)
            })
            .collect()
    }
}

fn file_name(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod test {
    use super::*;

    fn files(names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| PathBuf::from("/work/WebApp").join(name))
            .collect()
    }

    fn mapper(prefix: &str, always_append_index: bool) -> ReportNameMapper {
        ReportNameMapper::new(Some(ReportNameMapping {
            name_prefix: prefix.into(),
            always_append_index,
        }))
    }

    fn names(mapped: BTreeMap<String, PathBuf>) -> Vec<(String, String)> {
        mapped
            .into_iter()
            .map(|(name, file)| (name, file_name(&file)))
            .collect()
    }

    #[test]
    fn keep_names_without_mapping() {
        let mapped = ReportNameMapper::default().map_report_names(&files(&["b.html", "a.json"]));

        assert_eq!(
            vec![
                ("a.json".to_string(), "a.json".to_string()),
                ("b.html".to_string(), "b.html".to_string())
            ],
            names(mapped)
        );
    }

    #[test]
    fn single_file_gets_the_prefix() {
        let mapped = mapper("scan-report", false).map_report_names(&files(&["web-app.html"]));
        assert_eq!(
            vec![("scan-report.html".to_string(), "web-app.html".to_string())],
            names(mapped)
        );

        let mapped = mapper("scan-report", true).map_report_names(&files(&["web-app.html"]));
        assert_eq!(
            vec![("scan-report-1.html".to_string(), "web-app.html".to_string())],
            names(mapped)
        );
    }

    #[test]
    fn multiple_files_are_numbered() {
        let mapped =
            mapper("report", false).map_report_names(&files(&["y.pdf", "x.pdf", "NOTICE"]));

        assert_eq!(
            vec![
                ("report-1".to_string(), "NOTICE".to_string()),
                ("report-2.pdf".to_string(), "x.pdf".to_string()),
                ("report-3.pdf".to_string(), "y.pdf".to_string()),
            ],
            names(mapped)
        );
    }
}
