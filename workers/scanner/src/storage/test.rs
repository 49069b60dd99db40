use super::*;
use ortserver_model::JobKind;
use ortserver_ort_model::{
    self as ort, NestedProvenanceStorage, PackageProvenanceStorage, ProvenanceBasedScanStorage,
    ScanStorageError, ScannerMatcher,
};
use ortserver_test_context::{fixtures, OrtServerContext};
use ortserver_worker_common::mapping::{MapToModel, MapToOrt};
use std::collections::BTreeMap;
use test_context::test_context;
use test_log::test;

async fn scanner_run(ctx: &OrtServerContext, name: &str) -> Result<i64, anyhow::Error> {
    let hierarchy = ctx.create_hierarchy(name).await?;
    let run = ctx.create_run(hierarchy.repository.id, 1).await?;
    let job = ctx.create_job(run.id, JobKind::Scanner).await?;
    Ok(ctx.graph.create_scanner_run(job.id, &ctx.db).await?.id)
}

async fn linked_results(ctx: &OrtServerContext, scanner_run_id: i64) -> Result<usize, anyhow::Error> {
    Ok(ctx
        .graph
        .get_scanner_run(scanner_run_id, &ctx.db)
        .await?
        .map(|run| run.scan_results.len())
        .unwrap_or_default())
}

fn scan_result() -> ort::ScanResult {
    fixtures::scan_result().map_to_ort()
}

fn provenance() -> ort::KnownProvenance {
    ort::KnownProvenance::Repository(fixtures::repository_provenance().map_to_ort())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn write_and_read(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let writer = OrtServerScanResultStorage::new(ctx.graph.clone(), scanner_run(ctx, "a").await?);
    let reader_run = scanner_run(ctx, "b").await?;
    let reader = OrtServerScanResultStorage::new(ctx.graph.clone(), reader_run);

    let result = scan_result();
    writer.write(&result).await?;

    let matcher = ScannerMatcher::for_details(&result.scanner)?;
    let read = reader.read(&provenance(), &matcher).await?;

    assert_eq!(vec![result], read);
    assert_eq!(1, linked_results(ctx, reader_run).await?);

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn read_filters_by_scanner(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let run = scanner_run(ctx, "a").await?;
    let storage = OrtServerScanResultStorage::new(ctx.graph.clone(), run);
    storage.write(&scan_result()).await?;

    let other_run = scanner_run(ctx, "b").await?;
    let other = OrtServerScanResultStorage::new(ctx.graph.clone(), other_run);

    let matcher = ScannerMatcher::new("FossID", "1.0.0", "2.0.0", None)?;
    assert!(other.read(&provenance(), &matcher).await?.is_empty());

    let matcher = ScannerMatcher::new("ScanCode", "33.0.0", "34.0.0", None)?;
    assert!(other.read(&provenance(), &matcher).await?.is_empty());

    assert_eq!(0, linked_results(ctx, other_run).await?);

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn equal_results_are_stored_once(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let first_run = scanner_run(ctx, "a").await?;
    let second_run = scanner_run(ctx, "b").await?;
    let first = OrtServerScanResultStorage::new(ctx.graph.clone(), first_run);
    let second = OrtServerScanResultStorage::new(ctx.graph.clone(), second_run);

    first.write(&scan_result()).await?;
    first.write(&scan_result()).await?;

    let mut reordered = scan_result();
    reordered.summary.license_findings.push(ort::LicenseFinding {
        license: "MIT".into(),
        location: ort::TextLocation {
            path: "LICENSE-MIT".into(),
            start_line: 1,
            end_line: 21,
        },
        score: None,
    });
    second.write(&reordered).await?;
    reordered.summary.license_findings.reverse();
    second.write(&reordered).await?;
    second.write(&scan_result()).await?;

    let provenance = fixtures::scan_result().provenance;
    assert_eq!(2, ctx.graph.find_scan_results(&provenance, &ctx.db).await?.len());
    assert_eq!(1, linked_results(ctx, first_run).await?);
    assert_eq!(2, linked_results(ctx, second_run).await?);

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn different_results_are_stored_separately(
    ctx: &OrtServerContext,
) -> Result<(), anyhow::Error> {
    let run = scanner_run(ctx, "a").await?;
    let storage = OrtServerScanResultStorage::new(ctx.graph.clone(), run);
    storage.write(&scan_result()).await?;

    let mut other_version = scan_result();
    other_version.scanner.version = "33.1.0".into();

    let mut other_configuration = scan_result();
    other_configuration.scanner.configuration = "--copyright --license --info".into();

    let mut other_start_time = scan_result();
    other_start_time.summary.start_time -= time::Duration::minutes(5);

    let mut other_data = scan_result();
    other_data
        .additional_data
        .insert("engine".into(), "native".into());

    for result in [
        &other_version,
        &other_configuration,
        &other_start_time,
        &other_data,
    ] {
        storage.write(result).await?;
    }

    let provenance = fixtures::scan_result().provenance;
    assert_eq!(5, ctx.graph.find_scan_results(&provenance, &ctx.db).await?.len());

    storage.write(&scan_result()).await?;
    storage.write(&other_data).await?;
    assert_eq!(5, ctx.graph.find_scan_results(&provenance, &ctx.db).await?.len());
    assert_eq!(5, linked_results(ctx, run).await?);

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn reject_unsupported_provenances(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let storage = OrtServerScanResultStorage::new(ctx.graph.clone(), scanner_run(ctx, "a").await?);

    let mut unknown = scan_result();
    unknown.provenance = ort::Provenance::Unknown {};
    let result = storage.write(&unknown).await;
    assert!(matches!(result, Err(ScanStorageError::Invalid(_))), "{result:?}");

    let mut with_path = scan_result();
    let mut repository = fixtures::repository_provenance().map_to_ort();
    repository.vcs_info.path = "sub/dir".into();
    with_path.provenance = ort::KnownProvenance::Repository(repository).into();
    let result = storage.write(&with_path).await;
    assert!(matches!(result, Err(ScanStorageError::Invalid(_))), "{result:?}");

    let provenance = fixtures::scan_result().provenance;
    assert!(ctx.graph.find_scan_results(&provenance, &ctx.db).await?.is_empty());

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn package_provenances(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let storage = OrtServerPackageProvenanceStorage::new(ctx.graph.clone());
    let id = ort::Identifier::new("Maven", "org.example", "lib", "1.0");
    let artifact = fixtures::artifact("https://repo.example.org/lib-1.0-sources.jar").map_to_ort();
    let vcs = fixtures::vcs("https://github.com/example/lib.git", "1.0").map_to_ort();

    assert_eq!(None, storage.read_provenance_for_artifact(&id, &artifact).await?);
    assert!(storage.read_provenances(&id).await?.is_empty());

    let failed = ort::PackageProvenanceResolutionResult::Unresolved {
        message: "Download failed".into(),
    };
    storage
        .put_provenance_for_artifact(&id, &artifact, &failed)
        .await?;
    assert_eq!(
        Some(failed),
        storage.read_provenance_for_artifact(&id, &artifact).await?
    );

    let resolved = ort::PackageProvenanceResolutionResult::ResolvedArtifact {
        provenance: ort::ArtifactProvenance {
            source_artifact: artifact.clone(),
        },
    };
    storage
        .put_provenance_for_artifact(&id, &artifact, &resolved)
        .await?;

    let repository = ort::PackageProvenanceResolutionResult::ResolvedRepository {
        provenance: ort::RepositoryProvenance {
            vcs_info: vcs.clone(),
            resolved_revision: "0a1b2c3d".into(),
        },
        cloned_revision: "1.0".into(),
        is_fixed_revision: true,
    };
    storage.put_provenance_for_vcs(&id, &vcs, &repository).await?;

    assert_eq!(
        Some(resolved.clone()),
        storage.read_provenance_for_artifact(&id, &artifact).await?
    );
    assert_eq!(
        Some(repository.clone()),
        storage.read_provenance_for_vcs(&id, &vcs).await?
    );
    assert_eq!(vec![resolved, repository], storage.read_provenances(&id).await?);

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn nested_provenances(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let storage = OrtServerNestedProvenanceStorage::new(ctx.graph.clone());
    let root = fixtures::repository_provenance().map_to_ort();

    assert_eq!(None, storage.read_nested_provenance(&root).await?);

    let sub = ort::RepositoryProvenance {
        vcs_info: fixtures::vcs("https://github.com/example/sub.git", "main").map_to_ort(),
        resolved_revision: "4e5f6a7b".into(),
    };
    let result = ort::NestedProvenanceResolutionResult {
        nested_provenance: ort::NestedProvenance {
            root: ort::KnownProvenance::Repository(root.clone()),
            sub_repositories: BTreeMap::from([("modules/sub".to_string(), sub)]),
        },
        has_only_fixed_revisions: false,
    };
    storage.put_nested_provenance(&root, &result).await?;

    assert_eq!(Some(result), storage.read_nested_provenance(&root).await?);

    Ok(())
}

#[test]
fn storage_errors_keep_invalid_input_apart() {
    let invalid: ScanStorageError = StorageError::Invalid("bad".into()).into();
    assert!(matches!(invalid, ScanStorageError::Invalid(message) if message == "bad"));

    let mapping = ort::VcsType::new("Perforce").map_to_model().map_err(StorageError::from);
    let Err(err) = mapping else {
        panic!("Perforce is not a supported VCS type");
    };
    assert!(matches!(ScanStorageError::from(err), ScanStorageError::Invalid(_)));

    let database: ScanStorageError = StorageError::Database(sea_orm::DbErr::Custom("down".into())).into();
    assert!(matches!(database, ScanStorageError::Storage(_)));
}
