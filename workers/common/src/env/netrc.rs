use super::{ConfigFileBuilder, CredentialsType, Error, InfrastructureService};
use std::collections::BTreeSet;
use std::path::PathBuf;

pub const NETRC_FILE_NAME: &str = ".netrc";

/// Generates a `.netrc` file with one line per host.
///
/// If multiple services point to the same host, the first one wins. Services with an invalid URL
/// are skipped.
pub struct NetRcGenerator;

impl NetRcGenerator {
    pub fn lines(
        builder: &mut ConfigFileBuilder<'_>,
        services: &[InfrastructureService],
    ) -> Vec<String> {
        let mut hosts = BTreeSet::new();
        let mut lines = Vec::new();

        for service in services
            .iter()
            .filter(|service| service.credentials_types.contains(&CredentialsType::NetrcFile))
        {
            let host = match url::Url::parse(&service.url) {
                Ok(url) => url.host_str().map(ToString::to_string),
                Err(err) => {
                    log::warn!(
                        "Ignoring service '{}' with invalid URL '{}': {err}",
                        service.name,
                        service.url
                    );
                    continue;
                }
            };

            let Some(host) = host else {
                continue;
            };

            if !hosts.insert(host.clone()) {
                continue;
            }

            lines.push(format!(
                "machine {host} login {} password {}",
                builder.secret_ref(&service.username_secret),
                builder.secret_ref(&service.password_secret)
            ));
        }

        lines
    }

    /// Write the file, unless there are no services to list.
    pub async fn generate(
        builder: &mut ConfigFileBuilder<'_>,
        services: &[InfrastructureService],
    ) -> Result<Option<PathBuf>, Error> {
        let lines = Self::lines(builder, services);
        if lines.is_empty() {
            return Ok(None);
        }

        let mut content = lines.join("\n");
        content.push('\n');

        Ok(Some(builder.build_in_home(NETRC_FILE_NAME, &content).await?))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::env::StaticSecrets;
    use std::collections::BTreeMap;

    fn resolver() -> StaticSecrets {
        StaticSecrets(BTreeMap::from([
            ("user1".to_string(), "scott".to_string()),
            ("pass1".to_string(), "tiger".to_string()),
            ("user2".to_string(), "harry".to_string()),
            ("pass2".to_string(), "Hirsch".to_string()),
        ]))
    }

    #[test_log::test(tokio::test)]
    async fn one_line_per_host() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let resolver = resolver();
        let mut builder = ConfigFileBuilder::new(&resolver, dir.path());

        let services = [
            InfrastructureService::new("r1", "https://repo.example.org/r1", "user1", "pass1"),
            InfrastructureService::new("r2", "https://repo.example.org/r2", "user2", "pass2"),
            InfrastructureService::new("other", "https://other.example.org", "user2", "pass2"),
            InfrastructureService::new("broken", "? invalid URL?!", "user2", "pass2"),
        ];

        let file = NetRcGenerator::generate(&mut builder, &services)
            .await?
            .expect("file must be generated");

        assert_eq!(dir.path().join(".netrc"), file);
        assert_eq!(
            "machine repo.example.org login scott password tiger\n\
             machine other.example.org login harry password Hirsch\n",
            std::fs::read_to_string(file)?
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn no_file_without_services() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let resolver = resolver();
        let mut builder = ConfigFileBuilder::new(&resolver, dir.path());

        let mut service = InfrastructureService::new("r1", "https://repo.example.org", "u", "p");
        service.credentials_types.clear();

        assert_eq!(None, NetRcGenerator::generate(&mut builder, &[service]).await?);

        Ok(())
    }
}
