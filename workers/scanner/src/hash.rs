//! Identifying equal scan summaries, so that a result scanned twice is only stored once.

use ortserver_common::hashing::FieldHasher;
use ortserver_model::scanner::{ScanSummary, TextLocation};
use ortserver_ort_model as ort;
use ortserver_worker_common::mapping::MapToOrt;

/// Calculate a hash over the content of a scan summary.
///
/// The order of the findings and issues does not matter, every other difference does.
pub fn calculate_scan_summary_hash(summary: &ort::ScanSummary) -> String {
    let mut hasher = FieldHasher::new();
    hasher
        .field(summary.start_time.unix_timestamp_nanos().to_be_bytes())
        .field(summary.end_time.unix_timestamp_nanos().to_be_bytes());

    let categories = [
        ("license", digests(&summary.license_findings, license_finding)),
        ("copyright", digests(&summary.copyright_findings, copyright_finding)),
        ("snippet", digests(&summary.snippet_findings, snippet_finding)),
        ("issue", digests(&summary.issues, issue)),
    ];

    for (category, digests) in categories {
        hasher
            .field(category)
            .field((digests.len() as u64).to_be_bytes());
        for digest in digests {
            hasher.field(digest);
        }
    }

    hasher.finish()
}

/// The sorted digests of all items.
fn digests<T>(items: &[T], add: fn(&mut FieldHasher, &T)) -> Vec<String> {
    let mut result: Vec<_> = items
        .iter()
        .map(|item| {
            let mut hasher = FieldHasher::new();
            add(&mut hasher, item);
            hasher.finish()
        })
        .collect();
    result.sort_unstable();
    result
}

fn location(hasher: &mut FieldHasher, location: &ort::TextLocation) {
    hasher
        .field(&location.path)
        .field(location.start_line.to_be_bytes())
        .field(location.end_line.to_be_bytes());
}

fn license_finding(hasher: &mut FieldHasher, finding: &ort::LicenseFinding) {
    hasher
        .field(&finding.license)
        .optional(finding.score.map(|score| score.to_bits().to_be_bytes()));
    location(hasher, &finding.location);
}

fn copyright_finding(hasher: &mut FieldHasher, finding: &ort::CopyrightFinding) {
    hasher.field(&finding.statement);
    location(hasher, &finding.location);
}

fn snippet_finding(hasher: &mut FieldHasher, finding: &ort::SnippetFinding) {
    location(hasher, &finding.source_location);
    for digest in digests(&finding.snippets, snippet) {
        hasher.field(digest);
    }
}

fn snippet(hasher: &mut FieldHasher, snippet: &ort::Snippet) {
    hasher
        .field(&snippet.purl)
        .field(&snippet.license)
        .field(snippet.score.to_bits().to_be_bytes());
    location(hasher, &snippet.location);
    provenance(hasher, &snippet.provenance);

    for (key, value) in &snippet.additional_data {
        hasher.field(key).field(value);
    }
}

fn provenance(hasher: &mut FieldHasher, provenance: &ort::KnownProvenance) {
    match provenance {
        ort::KnownProvenance::Artifact(artifact) => {
            let artifact = &artifact.source_artifact;
            hasher
                .field("artifact")
                .field(&artifact.url)
                .field(&artifact.hash.value)
                .field(&artifact.hash.algorithm);
        }
        ort::KnownProvenance::Repository(repository) => {
            let vcs = &repository.vcs_info;
            hasher
                .field("repository")
                .field(&vcs.r#type.0)
                .field(&vcs.url)
                .field(&vcs.revision)
                .field(&vcs.path)
                .field(&repository.resolved_revision);
        }
    }
}

fn issue(hasher: &mut FieldHasher, issue: &ort::Issue) {
    hasher
        .field(issue.timestamp.unix_timestamp_nanos().to_be_bytes())
        .field(&issue.source)
        .field(&issue.message)
        .field(format!("{:?}", issue.severity))
        .optional(issue.affected_path.as_ref());
}

/// Check whether a summary produced by the scanner has the same findings as a stored one.
///
/// Used to confirm a match of the summary hashes.
pub fn compare_scan_summaries(scanned: &ort::ScanSummary, stored: &ScanSummary) -> bool {
    same_elements(&scanned.license_findings, &stored.license_findings, |a, b| {
        a.license == b.spdx_license && same_location(&a.location, &b.location)
    }) && same_elements(&scanned.copyright_findings, &stored.copyright_findings, |a, b| {
        a.statement == b.statement && same_location(&a.location, &b.location)
    }) && same_elements(&scanned.snippet_findings, &stored.snippet_findings, |a, b| {
        same_location(&a.source_location, &b.location)
            && same_elements(&a.snippets, &b.snippets, |a, b| {
                a.purl == b.purl
                    && a.license == b.spdx_license
                    && same_location(&a.location, &b.location)
            })
    }) && same_elements(&scanned.issues, &stored.issues, |a, b| {
        let b = b.map_to_ort();
        a.source == b.source && a.message == b.message && a.severity == b.severity
    })
}

fn same_location(scanned: &ort::TextLocation, stored: &TextLocation) -> bool {
    scanned.path == stored.path
        && scanned.start_line == stored.start_line
        && scanned.end_line == stored.end_line
}

/// Every item has exactly one equal counterpart, in any order.
fn same_elements<S, T>(scanned: &[S], stored: &[T], equal: impl Fn(&S, &T) -> bool) -> bool {
    if scanned.len() != stored.len() {
        return false;
    }

    let mut unmatched: Vec<&T> = stored.iter().collect();
    scanned.iter().all(|item| {
        match unmatched
            .iter()
            .position(|candidate| equal(item, *candidate))
        {
            Some(index) => {
                unmatched.swap_remove(index);
                true
            }
            None => false,
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use ortserver_model::scanner::LicenseFinding;
    use ortserver_test_context::fixtures;
    use time::Duration;

    fn summary() -> ort::ScanSummary {
        fixtures::scan_result().summary.map_to_ort()
    }

    #[test]
    fn equal_summaries_have_equal_hashes() {
        assert_eq!(
            calculate_scan_summary_hash(&summary()),
            calculate_scan_summary_hash(&summary())
        );
    }

    #[test]
    fn order_does_not_matter() {
        let mut first = summary();
        first.copyright_findings.push(ort::CopyrightFinding {
            statement: "(C) Other".into(),
            location: ort::TextLocation {
                path: "NOTICE".into(),
                start_line: 1,
                end_line: 1,
            },
        });
        let mut second = first.clone();
        second.copyright_findings.reverse();

        assert_eq!(
            calculate_scan_summary_hash(&first),
            calculate_scan_summary_hash(&second)
        );
    }

    #[test]
    fn every_field_counts() {
        let base = calculate_scan_summary_hash(&summary());

        let mut changed = summary();
        changed.start_time += Duration::nanoseconds(1);
        assert_ne!(base, calculate_scan_summary_hash(&changed));

        let mut changed = summary();
        changed.end_time += Duration::nanoseconds(1);
        assert_ne!(base, calculate_scan_summary_hash(&changed));

        let mut changed = summary();
        changed.license_findings[0].license = "LicenseRef-24".into();
        assert_ne!(base, calculate_scan_summary_hash(&changed));

        let mut changed = summary();
        changed.copyright_findings[0].location.end_line += 1;
        assert_ne!(base, calculate_scan_summary_hash(&changed));

        let mut changed = summary();
        changed.snippet_findings[0].snippets[0]
            .additional_data
            .insert("data".into(), "value".into());
        assert_ne!(base, calculate_scan_summary_hash(&changed));

        let mut changed = summary();
        changed.issues[0].source = "source2".into();
        assert_ne!(base, calculate_scan_summary_hash(&changed));

        let mut changed = summary();
        changed.issues.clear();
        assert_ne!(base, calculate_scan_summary_hash(&changed));
    }

    #[test]
    fn compare_with_stored_summary() {
        let stored = fixtures::scan_result().summary;

        assert!(compare_scan_summaries(&summary(), &stored));

        let mut other = summary();
        other.snippet_findings[0].snippets[0].purl = "pkg:github/other/project@1.3".into();
        assert!(!compare_scan_summaries(&other, &stored));

        let mut other = summary();
        other.issues[0].message = "Another message".into();
        assert!(!compare_scan_summaries(&other, &stored));

        let mut other = summary();
        other.license_findings.clear();
        assert!(!compare_scan_summaries(&other, &stored));
    }

    #[test]
    fn compare_ignores_order() {
        let mut stored = fixtures::scan_result().summary;
        stored.license_findings.push(LicenseFinding {
            spdx_license: "MIT".into(),
            location: fixtures::location("LICENSE-MIT", 1),
            score: None,
        });

        let mut scanned = stored.map_to_ort();
        scanned.license_findings.reverse();

        assert!(compare_scan_summaries(&scanned, &stored));
    }
}
