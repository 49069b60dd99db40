use crate::Error;
use ortserver_entity::{job, organization, ort_run, product, repository};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use time::OffsetDateTime;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub organization_id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<organization::Model> for Organization {
    fn from(value: organization::Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
        }
    }
}

impl From<product::Model> for Product {
    fn from(value: product::Model) -> Self {
        Self {
            id: value.id,
            organization_id: value.organization_id,
            name: value.name,
            description: value.description,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepositoryType {
    Git,
    GitRepo,
    Mercurial,
    Subversion,
    /// Only valid for VCS information without a known type, never for repositories
    Unknown,
}

impl RepositoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Git => "GIT",
            Self::GitRepo => "GIT_REPO",
            Self::Mercurial => "MERCURIAL",
            Self::Subversion => "SUBVERSION",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl Display for RepositoryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepositoryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GIT" => Ok(Self::Git),
            "GIT_REPO" => Ok(Self::GitRepo),
            "MERCURIAL" => Ok(Self::Mercurial),
            "SUBVERSION" => Ok(Self::Subversion),
            "UNKNOWN" => Ok(Self::Unknown),
            other => Err(Error::UnknownRepositoryType(other.to_string())),
        }
    }
}

impl From<repository::RepositoryType> for RepositoryType {
    fn from(value: repository::RepositoryType) -> Self {
        match value {
            repository::RepositoryType::Git => Self::Git,
            repository::RepositoryType::GitRepo => Self::GitRepo,
            repository::RepositoryType::Mercurial => Self::Mercurial,
            repository::RepositoryType::Subversion => Self::Subversion,
        }
    }
}

impl TryFrom<RepositoryType> for repository::RepositoryType {
    type Error = Error;

    fn try_from(value: RepositoryType) -> Result<Self, Self::Error> {
        match value {
            RepositoryType::Git => Ok(Self::Git),
            RepositoryType::GitRepo => Ok(Self::GitRepo),
            RepositoryType::Mercurial => Ok(Self::Mercurial),
            RepositoryType::Subversion => Ok(Self::Subversion),
            RepositoryType::Unknown => Err(Error::UnknownRepositoryType(value.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub id: i64,
    pub organization_id: i64,
    pub product_id: i64,
    #[serde(rename = "type")]
    pub r#type: RepositoryType,
    pub url: String,
    pub description: Option<String>,
}

impl Repository {
    /// Build a repository, its organization is only known via the product.
    pub fn from_model(value: repository::Model, organization_id: i64) -> Self {
        Self {
            id: value.id,
            organization_id,
            product_id: value.product_id,
            r#type: value.r#type.into(),
            url: value.url,
            description: value.description,
        }
    }
}

/// The ids of all hierarchy elements a repository belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Hierarchy {
    pub repository: Repository,
    pub product: Product,
    pub organization: Organization,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrtRunStatus {
    Created,
    Active,
    Finished,
    Failed,
    FinishedWithIssues,
}

impl OrtRunStatus {
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Self::Finished | Self::Failed | Self::FinishedWithIssues
        )
    }
}

impl FromStr for OrtRunStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(Self::Created),
            "ACTIVE" => Ok(Self::Active),
            "FINISHED" => Ok(Self::Finished),
            "FAILED" => Ok(Self::Failed),
            "FINISHED_WITH_ISSUES" => Ok(Self::FinishedWithIssues),
            other => Err(Error::UnknownRunStatus(other.to_string())),
        }
    }
}

impl From<ort_run::OrtRunStatus> for OrtRunStatus {
    fn from(value: ort_run::OrtRunStatus) -> Self {
        match value {
            ort_run::OrtRunStatus::Created => Self::Created,
            ort_run::OrtRunStatus::Active => Self::Active,
            ort_run::OrtRunStatus::Finished => Self::Finished,
            ort_run::OrtRunStatus::Failed => Self::Failed,
            ort_run::OrtRunStatus::FinishedWithIssues => Self::FinishedWithIssues,
        }
    }
}

impl From<OrtRunStatus> for ort_run::OrtRunStatus {
    fn from(value: OrtRunStatus) -> Self {
        match value {
            OrtRunStatus::Created => Self::Created,
            OrtRunStatus::Active => Self::Active,
            OrtRunStatus::Finished => Self::Finished,
            OrtRunStatus::Failed => Self::Failed,
            OrtRunStatus::FinishedWithIssues => Self::FinishedWithIssues,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OrtRun {
    pub id: i64,
    /// The index of the run, unique within its repository
    pub index: i64,
    pub repository_id: i64,
    pub revision: String,
    pub resolved_revision: Option<String>,
    pub path: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub finished_at: Option<OffsetDateTime>,
    pub status: OrtRunStatus,
    pub labels: BTreeMap<String, String>,
    pub job_config_context: Option<String>,
    pub resolved_job_config_context: Option<String>,
    pub environment_config_path: Option<String>,
    pub trace_id: Option<String>,
    pub vcs_id: Option<i64>,
    pub vcs_processed_id: Option<i64>,
}

impl From<ort_run::Model> for OrtRun {
    fn from(value: ort_run::Model) -> Self {
        Self {
            id: value.id,
            index: value.index,
            repository_id: value.repository_id,
            revision: value.revision,
            resolved_revision: value.resolved_revision,
            path: value.path,
            created_at: value.created_at,
            finished_at: value.finished_at,
            status: value.status.into(),
            labels: value.labels.0,
            job_config_context: value.job_config_context,
            resolved_job_config_context: value.resolved_job_config_context,
            environment_config_path: value.environment_config_path,
            trace_id: value.trace_id,
            vcs_id: value.vcs_id,
            vcs_processed_id: value.vcs_processed_id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobKind {
    Analyzer,
    Advisor,
    Scanner,
    Evaluator,
    Reporter,
    Notifier,
}

impl Display for JobKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Analyzer => "analyzer",
            Self::Advisor => "advisor",
            Self::Scanner => "scanner",
            Self::Evaluator => "evaluator",
            Self::Reporter => "reporter",
            Self::Notifier => "notifier",
        })
    }
}

impl From<job::JobKind> for JobKind {
    fn from(value: job::JobKind) -> Self {
        match value {
            job::JobKind::Analyzer => Self::Analyzer,
            job::JobKind::Advisor => Self::Advisor,
            job::JobKind::Scanner => Self::Scanner,
            job::JobKind::Evaluator => Self::Evaluator,
            job::JobKind::Reporter => Self::Reporter,
            job::JobKind::Notifier => Self::Notifier,
        }
    }
}

impl From<JobKind> for job::JobKind {
    fn from(value: JobKind) -> Self {
        match value {
            JobKind::Analyzer => Self::Analyzer,
            JobKind::Advisor => Self::Advisor,
            JobKind::Scanner => Self::Scanner,
            JobKind::Evaluator => Self::Evaluator,
            JobKind::Reporter => Self::Reporter,
            JobKind::Notifier => Self::Notifier,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Created,
    Scheduled,
    Running,
    Failed,
    Finished,
    FinishedWithIssues,
}

impl JobStatus {
    /// A job in a final state is not processed any more.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Self::Failed | Self::Finished | Self::FinishedWithIssues
        )
    }
}

impl From<job::JobStatus> for JobStatus {
    fn from(value: job::JobStatus) -> Self {
        match value {
            job::JobStatus::Created => Self::Created,
            job::JobStatus::Scheduled => Self::Scheduled,
            job::JobStatus::Running => Self::Running,
            job::JobStatus::Failed => Self::Failed,
            job::JobStatus::Finished => Self::Finished,
            job::JobStatus::FinishedWithIssues => Self::FinishedWithIssues,
        }
    }
}

impl From<JobStatus> for job::JobStatus {
    fn from(value: JobStatus) -> Self {
        match value {
            JobStatus::Created => Self::Created,
            JobStatus::Scheduled => Self::Scheduled,
            JobStatus::Running => Self::Running,
            JobStatus::Failed => Self::Failed,
            JobStatus::Finished => Self::Finished,
            JobStatus::FinishedWithIssues => Self::FinishedWithIssues,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: i64,
    pub ort_run_id: i64,
    pub kind: JobKind,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub finished_at: Option<OffsetDateTime>,
    pub status: JobStatus,
    pub configuration: serde_json::Value,
}

impl From<job::Model> for Job {
    fn from(value: job::Model) -> Self {
        Self {
            id: value.id,
            ort_run_id: value.ort_run_id,
            kind: value.kind.into(),
            created_at: value.created_at,
            started_at: value.started_at,
            finished_at: value.finished_at,
            status: value.status.into(),
            configuration: value.configuration,
        }
    }
}
