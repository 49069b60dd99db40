pub mod author;
pub mod declared_license;
pub mod identifier;
pub mod issue;
pub mod labels;
pub mod remote_artifact;
pub mod vcs_info;

pub mod job;
pub mod organization;
pub mod ort_run;
pub mod ort_run_issue;
pub mod product;
pub mod repository;

pub mod analyzer_run;
pub mod package;
pub mod package_analyzer_run;
pub mod package_author;
pub mod package_declared_license;
pub mod project;
pub mod project_analyzer_run;
pub mod project_author;
pub mod project_declared_license;

pub mod advisor_result;
pub mod advisor_run;
pub mod vulnerability;
pub mod vulnerability_reference;

pub mod evaluator_run;
pub mod report;
pub mod reporter_run;
pub mod rule_violation;

pub mod copyright_finding;
pub mod license_finding;
pub mod nested_provenance;
pub mod nested_provenance_sub_repository;
pub mod package_provenance;
pub mod scan_result;
pub mod scan_summary;
pub mod scan_summary_issue;
pub mod scanner_run;
pub mod scanner_run_package_provenance;
pub mod scanner_run_scan_result;
pub mod snippet;
pub mod snippet_finding;
pub mod snippet_finding_snippet;
