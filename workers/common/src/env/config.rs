//! Reading the environment configuration file of a repository.

use super::{CredentialsType, Error, InfrastructureService, NpmAuthMode, NpmDefinition};
use ortserver_model::Hierarchy;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// The location of the configuration file, relative to the repository root.
pub const CONFIG_FILE_PATH: &str = ".ort.env.yml";

/// Lookup of the secrets defined on the levels of the hierarchy.
#[async_trait::async_trait]
pub trait SecretRepository: Send + Sync {
    async fn list_for_repository(&self, id: i64) -> Result<Vec<String>, Error>;
    async fn list_for_product(&self, id: i64) -> Result<Vec<String>, Error>;
    async fn list_for_organization(&self, id: i64) -> Result<Vec<String>, Error>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
struct RepositoryEnvironmentConfig {
    #[serde(default = "default_strict")]
    strict: bool,
    #[serde(default, alias = "infrastructureServices")]
    infrastructure_services: Vec<ServiceDeclaration>,
    #[serde(default, alias = "environmentDefinitions")]
    environment_definitions: EnvironmentDefinitions,
    #[serde(default, alias = "environmentVariables")]
    environment_variables: Vec<VariableDeclaration>,
}

fn default_strict() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ServiceDeclaration {
    name: String,
    url: String,
    description: Option<String>,
    #[serde(alias = "usernameSecret")]
    username_secret: String,
    #[serde(alias = "passwordSecret")]
    password_secret: String,
    #[serde(default, alias = "credentialsTypes")]
    credentials_types: Option<BTreeSet<CredentialsType>>,
}

#[derive(Debug, Default, Deserialize)]
struct EnvironmentDefinitions {
    #[serde(default)]
    npm: Vec<NpmDeclaration>,
}

#[derive(Debug, Deserialize)]
struct NpmDeclaration {
    service: String,
    scope: Option<String>,
    email: Option<String>,
    #[serde(default, alias = "authMode")]
    auth_mode: NpmAuthMode,
    #[serde(default = "default_strict", alias = "alwaysAuth")]
    always_auth: bool,
}

#[derive(Debug, Deserialize)]
struct VariableDeclaration {
    name: String,
    #[serde(alias = "secretName")]
    secret_name: String,
}

/// The resolved content of an environment configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentConfig {
    pub infrastructure_services: Vec<InfrastructureService>,
    pub npm: Vec<NpmDefinition>,
    /// Variable name to the secret providing its value
    pub environment_variables: BTreeMap<String, String>,
}

pub struct EnvironmentConfigLoader<'a> {
    secrets: &'a dyn SecretRepository,
}

impl<'a> EnvironmentConfigLoader<'a> {
    pub fn new(secrets: &'a dyn SecretRepository) -> Self {
        Self { secrets }
    }

    /// Read the configuration of the repository checked out at `repository_folder`.
    ///
    /// A missing file results in an empty configuration. Syntax errors always fail, unresolvable
    /// references fail in strict mode and drop the declaration otherwise.
    ///
    /// `hierarchy_services` are the services declared on product and organization level, which
    /// environment definitions can refer to as well.
    pub async fn parse(
        &self,
        repository_folder: &Path,
        hierarchy: &Hierarchy,
        hierarchy_services: &[InfrastructureService],
    ) -> Result<EnvironmentConfig, Error> {
        let file = repository_folder.join(CONFIG_FILE_PATH);
        if !file.is_file() {
            return Ok(EnvironmentConfig::default());
        }

        log::info!("Parsing environment configuration file '{}'", file.display());

        let content = tokio::fs::read_to_string(&file).await?;
        let config: RepositoryEnvironmentConfig = serde_yaml::from_str(&content)?;

        self.resolve(config, hierarchy, hierarchy_services).await
    }

    async fn resolve(
        &self,
        config: RepositoryEnvironmentConfig,
        hierarchy: &Hierarchy,
        hierarchy_services: &[InfrastructureService],
    ) -> Result<EnvironmentConfig, Error> {
        let referenced: BTreeSet<String> = config
            .infrastructure_services
            .iter()
            .flat_map(|service| [service.username_secret.clone(), service.password_secret.clone()])
            .chain(
                config
                    .environment_variables
                    .iter()
                    .map(|variable| variable.secret_name.clone()),
            )
            .collect();

        let known = self.resolve_secrets(referenced.clone(), hierarchy).await?;
        let missing: BTreeSet<String> = referenced.difference(&known).cloned().collect();
        let strict = config.strict;

        let report = |message: String| -> Result<(), Error> {
            if strict {
                Err(Error::InvalidConfig(message))
            } else {
                log::warn!("{message}");
                Ok(())
            }
        };

        if !missing.is_empty() {
            report(Error::UnresolvedSecrets(missing.clone()).to_string())?;
        }

        let infrastructure_services: Vec<InfrastructureService> = config
            .infrastructure_services
            .into_iter()
            .filter(|service| {
                !missing.contains(&service.username_secret)
                    && !missing.contains(&service.password_secret)
            })
            .map(|service| InfrastructureService {
                name: service.name,
                url: service.url,
                description: service.description,
                username_secret: service.username_secret,
                password_secret: service.password_secret,
                credentials_types: service
                    .credentials_types
                    .unwrap_or_else(|| BTreeSet::from([CredentialsType::NetrcFile])),
            })
            .collect();

        let mut npm = Vec::new();
        for declaration in config.environment_definitions.npm {
            let service = infrastructure_services
                .iter()
                .chain(hierarchy_services)
                .find(|service| service.name == declaration.service);

            match service {
                Some(service) => npm.push(NpmDefinition {
                    service: service.clone(),
                    scope: declaration.scope,
                    email: declaration.email,
                    auth_mode: declaration.auth_mode,
                    always_auth: declaration.always_auth,
                }),
                None => report(format!(
                    "Unknown infrastructure service '{}' referenced by an NPM definition",
                    declaration.service
                ))?,
            }
        }

        let environment_variables = config
            .environment_variables
            .into_iter()
            .filter(|variable| !missing.contains(&variable.secret_name))
            .map(|variable| (variable.name, variable.secret_name))
            .collect();

        Ok(EnvironmentConfig {
            infrastructure_services,
            npm,
            environment_variables,
        })
    }

    /// Look up secrets level by level, stopping as soon as all are found.
    async fn resolve_secrets(
        &self,
        mut names: BTreeSet<String>,
        hierarchy: &Hierarchy,
    ) -> Result<BTreeSet<String>, Error> {
        let mut resolved = BTreeSet::new();

        for level in 0..3 {
            if names.is_empty() {
                break;
            }

            let secrets = match level {
                0 => self.secrets.list_for_repository(hierarchy.repository.id).await?,
                1 => self.secrets.list_for_product(hierarchy.product.id).await?,
                _ => {
                    self.secrets
                        .list_for_organization(hierarchy.organization.id)
                        .await?
                }
            };

            for secret in secrets {
                if names.remove(&secret) {
                    resolved.insert(secret);
                }
            }
        }

        Ok(resolved)
    }
}
