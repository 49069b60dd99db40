//! Generation of the configuration files build tools need to access the infrastructure services of
//! a repository.

mod builder;
pub mod config;
mod gitconfig;
mod netrc;
mod npmrc;

pub use builder::*;
pub use gitconfig::*;
pub use netrc::*;
pub use npmrc::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unresolvable secrets: {}", .0.iter().cloned().collect::<Vec<_>>().join(", "))]
    UnresolvedSecrets(BTreeSet<String>),
    #[error("invalid environment configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("secret storage failure: {0}")]
    SecretStorage(String),
}

/// Which credential files a service takes part in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialsType {
    NetrcFile,
    GitCredentialsFile,
}

/// A service such as a source code or artifact repository, with references to the secrets holding
/// its credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfrastructureService {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub username_secret: String,
    pub password_secret: String,
    pub credentials_types: BTreeSet<CredentialsType>,
}

impl InfrastructureService {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        username_secret: impl Into<String>,
        password_secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            description: None,
            username_secret: username_secret.into(),
            password_secret: password_secret.into(),
            credentials_types: BTreeSet::from([CredentialsType::NetrcFile]),
        }
    }
}

/// Proxy settings taken over into generated files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySettings {
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub no_proxy: Option<String>,
}

impl ProxySettings {
    /// Read the settings from the usual environment variables, lower case taking precedence.
    pub fn from_env() -> Option<Self> {
        fn var(name: &str) -> Option<String> {
            std::env::var(name)
                .or_else(|_| std::env::var(name.to_uppercase()))
                .ok()
                .filter(|value| !value.is_empty())
        }

        let settings = Self {
            http_proxy: var("http_proxy"),
            https_proxy: var("https_proxy"),
            no_proxy: var("no_proxy"),
        };

        settings.is_defined().then_some(settings)
    }

    pub fn is_defined(&self) -> bool {
        self.http_proxy.is_some() || self.https_proxy.is_some() || self.no_proxy.is_some()
    }
}
