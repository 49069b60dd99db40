use super::{ConfigFileBuilder, Error, InfrastructureService, ProxySettings};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const NPMRC_FILE_NAME: &str = ".npmrc";

/// How credentials for an NPM registry are written.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NpmAuthMode {
    /// Username and plain password
    #[default]
    Password,
    /// Username and base64 encoded password
    PasswordBase64,
    /// The password as `_auth` value
    PasswordAuth,
    /// The password as `_authToken` value
    PasswordAuthToken,
    /// Base64 of `username:password` as `_auth` value
    UsernamePasswordAuth,
}

/// The use of a service as an NPM registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmDefinition {
    pub service: InfrastructureService,
    pub scope: Option<String>,
    pub email: Option<String>,
    pub auth_mode: NpmAuthMode,
    pub always_auth: bool,
}

impl NpmDefinition {
    pub fn new(service: InfrastructureService) -> Self {
        Self {
            service,
            scope: None,
            email: None,
            auth_mode: NpmAuthMode::default(),
            always_auth: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct NpmRcGenerator {
    pub proxy: Option<ProxySettings>,
}

impl NpmRcGenerator {
    pub fn new(proxy: Option<ProxySettings>) -> Self {
        Self { proxy }
    }

    pub async fn content(
        &self,
        builder: &mut ConfigFileBuilder<'_>,
        definitions: &[NpmDefinition],
    ) -> Result<String, Error> {
        let mut blocks = Vec::with_capacity(definitions.len());

        for definition in definitions {
            let mut url = definition.service.url.clone();
            if !url.ends_with('/') {
                url.push('/');
            }
            let fragment = url
                .split_once(':')
                .map(|(_, rest)| rest.to_string())
                .unwrap_or_else(|| url.clone());

            let mut lines = Vec::new();

            if let Some(scope) = &definition.scope {
                lines.push(format!("@{scope}:registry={url}"));
            }

            let service = &definition.service;
            match definition.auth_mode {
                NpmAuthMode::Password => {
                    lines.push(format!(
                        "{fragment}:username={}",
                        builder.secret_ref(&service.username_secret)
                    ));
                    lines.push(format!(
                        "{fragment}:_password={}",
                        builder.secret_ref(&service.password_secret)
                    ));
                }
                NpmAuthMode::PasswordBase64 => {
                    let password = builder.resolve_secret(&service.password_secret).await?;
                    lines.push(format!(
                        "{fragment}:username={}",
                        builder.secret_ref(&service.username_secret)
                    ));
                    lines.push(format!("{fragment}:_password={}", STANDARD.encode(password)));
                }
                NpmAuthMode::PasswordAuth => {
                    lines.push(format!(
                        "{fragment}:_auth={}",
                        builder.secret_ref(&service.password_secret)
                    ));
                }
                NpmAuthMode::PasswordAuthToken => {
                    lines.push(format!(
                        "{fragment}:_authToken={}",
                        builder.secret_ref(&service.password_secret)
                    ));
                }
                NpmAuthMode::UsernamePasswordAuth => {
                    let username = builder.resolve_secret(&service.username_secret).await?;
                    let password = builder.resolve_secret(&service.password_secret).await?;
                    lines.push(format!(
                        "{fragment}:_auth={}",
                        STANDARD.encode(format!("{username}:{password}"))
                    ));
                }
            }

            if let Some(email) = &definition.email {
                lines.push(format!("{fragment}:email={email}"));
            }

            if definition.always_auth {
                lines.push(format!("{fragment}:always-auth=true"));
            }

            blocks.push(lines.join("\n"));
        }

        if let Some(proxy) = self.proxy.as_ref().filter(|proxy| proxy.is_defined()) {
            let mut lines = Vec::new();
            if let Some(value) = &proxy.http_proxy {
                lines.push(format!("proxy={value}"));
            }
            if let Some(value) = &proxy.https_proxy {
                lines.push(format!("https-proxy={value}"));
            }
            if let Some(value) = &proxy.no_proxy {
                lines.push(format!("noproxy={value}"));
            }
            blocks.push(lines.join("\n"));
        }

        let mut content = blocks.join("\n\n");
        content.push('\n');
        Ok(content)
    }

    pub async fn generate(
        &self,
        builder: &mut ConfigFileBuilder<'_>,
        definitions: &[NpmDefinition],
    ) -> Result<Option<PathBuf>, Error> {
        if definitions.is_empty() {
            return Ok(None);
        }

        let content = self.content(builder, definitions).await?;
        Ok(Some(builder.build_in_home(NPMRC_FILE_NAME, &content).await?))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::env::StaticSecrets;
    use std::collections::BTreeMap;

    const REGISTRY: &str = "https://registry.example.org/_packaging/test/npm/registry/";
    const FRAGMENT: &str = "//registry.example.org/_packaging/test/npm/registry/";

    fn resolver() -> StaticSecrets {
        StaticSecrets(BTreeMap::from([
            ("user".to_string(), "scott".to_string()),
            ("pass".to_string(), "tiger".to_string()),
        ]))
    }

    fn definition(auth_mode: NpmAuthMode) -> NpmDefinition {
        NpmDefinition {
            auth_mode,
            ..NpmDefinition::new(InfrastructureService::new("npm", REGISTRY, "user", "pass"))
        }
    }

    async fn generate(
        generator: &NpmRcGenerator,
        definitions: &[NpmDefinition],
    ) -> anyhow::Result<String> {
        let dir = tempfile::tempdir()?;
        let resolver = resolver();
        let mut builder = ConfigFileBuilder::new(&resolver, dir.path());

        let file = generator
            .generate(&mut builder, definitions)
            .await?
            .expect("file must be generated");

        Ok(std::fs::read_to_string(file)?)
    }

    #[test_log::test(tokio::test)]
    async fn password() -> anyhow::Result<()> {
        let content = generate(&NpmRcGenerator::default(), &[definition(NpmAuthMode::Password)]).await?;

        assert_eq!(
            format!(
                "{FRAGMENT}:username=scott\n{FRAGMENT}:_password=tiger\n{FRAGMENT}:always-auth=true\n"
            ),
            content
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn encoded_modes() -> anyhow::Result<()> {
        let content = generate(
            &NpmRcGenerator::default(),
            &[definition(NpmAuthMode::PasswordBase64)],
        )
        .await?;
        assert!(content.contains(&format!("{FRAGMENT}:_password=dGlnZXI=")));

        let content = generate(
            &NpmRcGenerator::default(),
            &[definition(NpmAuthMode::UsernamePasswordAuth)],
        )
        .await?;
        assert!(content.starts_with(&format!("{FRAGMENT}:_auth=c2NvdHQ6dGlnZXI=\n")));

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn scope_email_and_missing_slash() -> anyhow::Result<()> {
        let mut definition = definition(NpmAuthMode::PasswordAuthToken);
        definition.service.url = REGISTRY.trim_end_matches('/').to_string();
        definition.scope = Some("foo".into());
        definition.email = Some("scott@example.org".into());
        definition.always_auth = false;

        let content = generate(&NpmRcGenerator::default(), &[definition]).await?;

        assert_eq!(
            format!(
                "@foo:registry={REGISTRY}\n{FRAGMENT}:_authToken=tiger\n{FRAGMENT}:email=scott@example.org\n"
            ),
            content
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn proxy_block() -> anyhow::Result<()> {
        let generator = NpmRcGenerator::new(Some(ProxySettings {
            http_proxy: Some("http://proxy.example.org:8080".into()),
            https_proxy: None,
            no_proxy: Some("localhost".into()),
        }));

        let content = generate(&generator, &[definition(NpmAuthMode::PasswordAuth)]).await?;

        assert!(content.ends_with(
            "always-auth=true\n\nproxy=http://proxy.example.org:8080\nnoproxy=localhost\n"
        ));

        Ok(())
    }
}
