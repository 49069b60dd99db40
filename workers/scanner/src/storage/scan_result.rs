use super::StorageError;
use crate::hash::{calculate_scan_summary_hash, compare_scan_summaries};
use async_trait::async_trait;
use ortserver_module_ingestor::graph::Graph;
use ortserver_ort_model::{self as ort, ProvenanceBasedScanStorage, ScanStorageError, ScannerMatcher};
use ortserver_worker_common::mapping::{MapToModel, MapToOrt};
use sea_orm::TransactionTrait;
use tracing::instrument;

/// Scan results found by provenance.
///
/// Artifacts match by URL and hash, repositories by VCS type, URL and resolved revision. Every
/// result which is read or written gets associated with the scanner run of this storage.
#[derive(Debug, Clone)]
pub struct OrtServerScanResultStorage {
    graph: Graph,
    scanner_run_id: i64,
}

impl OrtServerScanResultStorage {
    pub fn new(graph: Graph, scanner_run_id: i64) -> Self {
        Self {
            graph,
            scanner_run_id,
        }
    }

    #[instrument(skip(self, matcher), err)]
    async fn read_results(
        &self,
        provenance: &ort::KnownProvenance,
        matcher: &ScannerMatcher,
    ) -> Result<Vec<ort::ScanResult>, StorageError> {
        let tx = self.graph.db().begin().await?;

        let mut result = Vec::new();
        for model in self
            .graph
            .find_scan_results(&provenance.map_to_model()?, &tx)
            .await?
        {
            let scanner = ort::ScannerDetails {
                name: model.scanner_name.clone(),
                version: model.scanner_version.clone(),
                configuration: model.scanner_configuration.clone(),
            };
            if !matcher.matches(&scanner) {
                continue;
            }

            let id = model.id;
            let stored = self.graph.load_scan_result(model, &tx).await?.map_to_ort();
            self.graph
                .link_scan_result(self.scanner_run_id, id, &tx)
                .await?;

            result.push(ort::ScanResult {
                provenance: provenance.clone().into(),
                ..stored
            });
        }

        tx.commit().await?;

        Ok(result)
    }

    #[instrument(skip(self, result), fields(scanner = %result.scanner.name), err)]
    async fn write_result(&self, result: &ort::ScanResult) -> Result<(), StorageError> {
        let ort::Provenance::Known(provenance) = &result.provenance else {
            return Err(StorageError::Invalid(format!(
                "Scan result of '{}' must have a known provenance",
                result.scanner.name
            )));
        };

        if let ort::KnownProvenance::Repository(repository) = provenance {
            if !repository.vcs_info.path.is_empty() {
                return Err(StorageError::Invalid(
                    "Repository provenances with a non-empty VCS path are not supported".into(),
                ));
            }
        }

        let model = result.map_to_model()?;
        let hash = calculate_scan_summary_hash(&result.summary);

        let tx = self.graph.db().begin().await?;

        let mut existing = None;
        for (candidate, summary) in self
            .graph
            .find_equal_scan_results(&model, &hash, &tx)
            .await?
        {
            let stored = self.graph.load_scan_summary(&summary, &tx).await?;
            if compare_scan_summaries(&result.summary, &stored) {
                existing = Some(candidate.id);
                break;
            }
        }

        let id = match existing {
            Some(id) => {
                log::debug!("Reusing stored scan result {id}");
                id
            }
            None => self.graph.insert_scan_result(&model, &hash, &tx).await?.id,
        };

        self.graph
            .link_scan_result(self.scanner_run_id, id, &tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl ProvenanceBasedScanStorage for OrtServerScanResultStorage {
    async fn read(
        &self,
        provenance: &ort::KnownProvenance,
        matcher: &ScannerMatcher,
    ) -> Result<Vec<ort::ScanResult>, ScanStorageError> {
        Ok(self.read_results(provenance, matcher).await?)
    }

    async fn write(&self, result: &ort::ScanResult) -> Result<(), ScanStorageError> {
        Ok(self.write_result(result).await?)
    }
}
