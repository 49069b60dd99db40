use ortserver_model::{
    runs::Environment,
    scanner::{
        KnownProvenance, NestedProvenance, NestedProvenanceResolution,
        PackageProvenanceResolution, RepositoryProvenance, ScannerConfiguration,
    },
    JobKind,
};
use ortserver_module_ingestor::graph::scanner::ProvenanceSource;
use ortserver_test_context::{
    fixtures::{artifact, package, scan_result, vcs},
    OrtServerContext,
};
use std::collections::BTreeMap;
use test_context::test_context;
use test_log::test;
use time::macros::datetime;

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn scan_results_are_linked_to_the_run(ctx: &OrtServerContext) -> anyhow::Result<()> {
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let run = ctx.create_run(hierarchy.repository.id, 1).await?;
    let job = ctx.create_job(run.id, JobKind::Scanner).await?;
    let scanner_run = ctx.graph.create_scanner_run(job.id, &ctx.db).await?;

    let result = scan_result();
    let stored = ctx
        .graph
        .insert_scan_result(&result, "hash", &ctx.db)
        .await?;
    ctx.graph
        .link_scan_result(scanner_run.id, stored.id, &ctx.db)
        .await?;
    // linking twice is fine
    ctx.graph
        .link_scan_result(scanner_run.id, stored.id, &ctx.db)
        .await?;

    let found = ctx
        .graph
        .find_scan_results(&result.provenance, &ctx.db)
        .await?;
    assert_eq!(1, found.len());

    let equal = ctx
        .graph
        .find_equal_scan_results(&result, "hash", &ctx.db)
        .await?;
    assert_eq!(1, equal.len());
    let other_hash = ctx
        .graph
        .find_equal_scan_results(&result, "other", &ctx.db)
        .await?;
    assert!(other_hash.is_empty());

    let mut other_data = result.clone();
    other_data
        .additional_data
        .insert("engine".into(), "native".into());
    let other_data = ctx
        .graph
        .find_equal_scan_results(&other_data, "hash", &ctx.db)
        .await?;
    assert!(other_data.is_empty());

    let loaded = ctx
        .graph
        .get_scanner_run(scanner_run.id, &ctx.db)
        .await?
        .expect("scanner run must exist");
    assert_eq!(1, loaded.scan_results.len());
    assert_eq!(result.summary, loaded.scan_results[0].summary);
    assert_eq!(result.scanner, loaded.scan_results[0].scanner);

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn scanner_run_is_completed_once(ctx: &OrtServerContext) -> anyhow::Result<()> {
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let run = ctx.create_run(hierarchy.repository.id, 1).await?;
    let job = ctx.create_job(run.id, JobKind::Scanner).await?;
    let scanner_run = ctx.graph.create_scanner_run(job.id, &ctx.db).await?;

    let start = datetime!(2024-03-02 08:00 UTC);
    let end = datetime!(2024-03-02 09:00 UTC);
    let config = ScannerConfiguration {
        skip_concluded: true,
        ..Default::default()
    };

    ctx.graph
        .update_scanner_run(
            scanner_run.id,
            start,
            end,
            &Environment::default(),
            &config,
            &ctx.db,
        )
        .await?;

    assert!(ctx
        .graph
        .update_scanner_run(
            scanner_run.id,
            start,
            end,
            &Environment::default(),
            &config,
            &ctx.db
        )
        .await
        .is_err());

    let loaded = ctx
        .graph
        .get_scanner_run_for_job(job.id, &ctx.db)
        .await?
        .expect("scanner run must exist");
    assert_eq!(Some(start), loaded.start_time);
    assert_eq!(Some(config), loaded.config);

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn package_provenance_is_replaced(ctx: &OrtServerContext) -> anyhow::Result<()> {
    let package = package("lib", "1.0");
    let source = ProvenanceSource::Vcs(&package.vcs_processed);

    ctx.graph
        .put_package_provenance(
            &package.identifier,
            source,
            &PackageProvenanceResolution::Unresolved {
                message: "Could not clone".into(),
            },
            &ctx.db,
        )
        .await?;

    let resolved = PackageProvenanceResolution::Repository {
        provenance: RepositoryProvenance {
            vcs_info: package.vcs_processed.clone(),
            resolved_revision: "0a1b2c3d".into(),
        },
        cloned_revision: "1.0".into(),
        is_fixed_revision: true,
    };
    ctx.graph
        .put_package_provenance(&package.identifier, source, &resolved, &ctx.db)
        .await?;

    assert_eq!(
        Some(resolved.clone()),
        ctx.graph
            .get_package_provenance(&package.identifier, source, &ctx.db)
            .await?
    );
    assert_eq!(
        vec![resolved],
        ctx.graph
            .get_package_provenances(&package.identifier, &ctx.db)
            .await?
    );

    let unknown = artifact("https://example.org/unknown.zip");
    assert_eq!(
        None,
        ctx.graph
            .get_package_provenance(
                &package.identifier,
                ProvenanceSource::Artifact(&unknown),
                &ctx.db
            )
            .await?
    );

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn nested_provenances_show_up_in_scanner_runs(ctx: &OrtServerContext) -> anyhow::Result<()> {
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let run = ctx.create_run(hierarchy.repository.id, 1).await?;
    let job = ctx.create_job(run.id, JobKind::Scanner).await?;
    let scanner_run = ctx.graph.create_scanner_run(job.id, &ctx.db).await?;

    let package = package("lib", "1.0");
    let root = RepositoryProvenance {
        vcs_info: package.vcs_processed.clone(),
        resolved_revision: "0a1b2c3d".into(),
    };

    ctx.graph
        .put_package_provenance(
            &package.identifier,
            ProvenanceSource::Vcs(&package.vcs_processed),
            &PackageProvenanceResolution::Repository {
                provenance: root.clone(),
                cloned_revision: "1.0".into(),
                is_fixed_revision: true,
            },
            &ctx.db,
        )
        .await?;

    let nested = NestedProvenanceResolution {
        nested_provenance: NestedProvenance {
            root: KnownProvenance::Repository(root.clone()),
            sub_repositories: BTreeMap::from([(
                "external/dep".to_string(),
                RepositoryProvenance {
                    vcs_info: vcs("https://github.com/example/dep.git", ""),
                    resolved_revision: "9f8e7d6c".into(),
                },
            )]),
        },
        has_only_fixed_revisions: true,
    };
    ctx.graph
        .put_nested_provenance(&root, &nested, &ctx.db)
        .await?;

    assert_eq!(
        Some(nested),
        ctx.graph.get_nested_provenance(&root, &ctx.db).await?
    );

    ctx.graph
        .attach_package_provenances(scanner_run.id, &[package.identifier.clone()], &ctx.db)
        .await?;

    let loaded = ctx
        .graph
        .get_scanner_run(scanner_run.id, &ctx.db)
        .await?
        .expect("scanner run must exist");

    assert_eq!(1, loaded.provenances.len());
    let provenance = &loaded.provenances[0];
    assert_eq!(package.identifier, provenance.id);
    assert_eq!(
        Some(KnownProvenance::Repository(root)),
        provenance.package_provenance
    );
    assert_eq!(
        Some("9f8e7d6c"),
        provenance
            .sub_repositories
            .get("external/dep")
            .map(|vcs| vcs.revision.as_str())
    );
    assert!(provenance.package_provenance_resolution_issue.is_none());

    Ok(())
}
