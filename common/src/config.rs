use std::fmt::{Display, Formatter};

#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Database")]
#[group(id = "database")]
pub struct Database {
    /// A full connection URL, takes precedence over the individual connection arguments
    #[arg(id = "db-url", long, env = "DB_URL")]
    pub url: Option<String>,
    #[arg(id = "db-user", long, env = "DB_USER", default_value = "ortserver")]
    pub username: String,
    #[arg(
        id = "db-password",
        long,
        env = "DB_PASSWORD",
        default_value = "ortserver"
    )]
    pub password: String,
    #[arg(id = "db-host", long, env = "DB_HOST", default_value = "localhost")]
    pub host: String,
    #[arg(id = "db-port", long, env = "DB_PORT", default_value_t = 5432)]
    pub port: u16,
    #[arg(id = "db-name", long, env = "DB_NAME", default_value = "ortserver")]
    pub name: String,
    #[arg(id = "db-max-conn", long, env = "DB_MAX_CONN", default_value_t = 75)]
    pub max_conn: u32,
    #[arg(id = "db-min-conn", long, env = "DB_MIN_CONN", default_value_t = 25)]
    pub min_conn: u32,
    /// Connect timeout, in seconds
    #[arg(
        id = "db-connect-timeout",
        long,
        env = "DB_CONNECT_TIMEOUT",
        default_value_t = 8
    )]
    pub connect_timeout: u64,
    /// Acquire timeout, in seconds
    #[arg(
        id = "db-acquire-timeout",
        long,
        env = "DB_ACQUIRE_TIMEOUT",
        default_value_t = 30
    )]
    pub acquire_timeout: u64,
    /// Maximum lifetime of a pooled connection, in seconds
    #[arg(
        id = "db-max-lifetime",
        long,
        env = "DB_MAX_LIFETIME",
        default_value_t = 300
    )]
    pub max_lifetime: u64,
    /// Idle timeout of a pooled connection, in seconds
    #[arg(
        id = "db-idle-timeout",
        long,
        env = "DB_IDLE_TIMEOUT",
        default_value_t = 30
    )]
    pub idle_timeout: u64,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: None,
            username: "ortserver".into(),
            password: "ortserver".into(),
            host: "localhost".into(),
            port: 5432,
            name: "ortserver".into(),
            max_conn: 75,
            min_conn: 25,
            connect_timeout: 8,
            acquire_timeout: 30,
            max_lifetime: 300,
            idle_timeout: 30,
        }
    }
}

impl Database {
    /// A configuration using a fixed connection URL.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn to_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.username, self.password, self.host, self.port, self.name
            ),
        }
    }

    /// Whether this configuration targets an SQLite database.
    pub fn is_sqlite(&self) -> bool {
        self.to_url().starts_with("sqlite:")
    }
}

/// Settings for a single orphan table handled in chunks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChunkedRemoval {
    /// The maximum number of orphans fetched in one sweep
    pub limit: u64,
    /// The number of orphans deleted per statement
    pub chunk_size: usize,
}

impl Display for ChunkedRemoval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "limit={}, chunk_size={}", self.limit, self.chunk_size)
    }
}

#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Orphan removal")]
#[group(id = "orphans")]
pub struct OrphanRemoval {
    #[arg(
        id = "orphans-vcs-info-limit",
        long,
        env = "ORPHANS_VCS_INFO_LIMIT",
        default_value_t = 4096
    )]
    pub vcs_info_limit: u64,
    #[arg(
        id = "orphans-vcs-info-chunk-size",
        long,
        env = "ORPHANS_VCS_INFO_CHUNK_SIZE",
        default_value_t = 512
    )]
    pub vcs_info_chunk_size: usize,
    #[arg(
        id = "orphans-remote-artifacts-limit",
        long,
        env = "ORPHANS_REMOTE_ARTIFACTS_LIMIT",
        default_value_t = 4096
    )]
    pub remote_artifacts_limit: u64,
    #[arg(
        id = "orphans-remote-artifacts-chunk-size",
        long,
        env = "ORPHANS_REMOTE_ARTIFACTS_CHUNK_SIZE",
        default_value_t = 512
    )]
    pub remote_artifacts_chunk_size: usize,
    #[arg(
        id = "orphans-snippets-limit",
        long,
        env = "ORPHANS_SNIPPETS_LIMIT",
        default_value_t = 4096
    )]
    pub snippets_limit: u64,
    #[arg(
        id = "orphans-snippets-chunk-size",
        long,
        env = "ORPHANS_SNIPPETS_CHUNK_SIZE",
        default_value_t = 512
    )]
    pub snippets_chunk_size: usize,
    #[arg(
        id = "orphans-snippet-findings-limit",
        long,
        env = "ORPHANS_SNIPPET_FINDINGS_LIMIT",
        default_value_t = 4096
    )]
    pub snippet_findings_limit: u64,
    #[arg(
        id = "orphans-snippet-findings-chunk-size",
        long,
        env = "ORPHANS_SNIPPET_FINDINGS_CHUNK_SIZE",
        default_value_t = 512
    )]
    pub snippet_findings_chunk_size: usize,
}

impl Default for OrphanRemoval {
    fn default() -> Self {
        Self {
            vcs_info_limit: 4096,
            vcs_info_chunk_size: 512,
            remote_artifacts_limit: 4096,
            remote_artifacts_chunk_size: 512,
            snippets_limit: 4096,
            snippets_chunk_size: 512,
            snippet_findings_limit: 4096,
            snippet_findings_chunk_size: 512,
        }
    }
}

impl OrphanRemoval {
    pub fn vcs_info(&self) -> ChunkedRemoval {
        ChunkedRemoval {
            limit: self.vcs_info_limit,
            chunk_size: self.vcs_info_chunk_size,
        }
    }

    pub fn remote_artifacts(&self) -> ChunkedRemoval {
        ChunkedRemoval {
            limit: self.remote_artifacts_limit,
            chunk_size: self.remote_artifacts_chunk_size,
        }
    }

    pub fn snippets(&self) -> ChunkedRemoval {
        ChunkedRemoval {
            limit: self.snippets_limit,
            chunk_size: self.snippets_chunk_size,
        }
    }

    pub fn snippet_findings(&self) -> ChunkedRemoval {
        ChunkedRemoval {
            limit: self.snippet_findings_limit,
            chunk_size: self.snippet_findings_chunk_size,
        }
    }
}
