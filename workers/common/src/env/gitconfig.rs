use super::{ConfigFileBuilder, CredentialsType, Error, InfrastructureService};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const GIT_CONFIG_FILE_NAME: &str = ".gitconfig";

/// Parse `base=insteadOf` pairs separated by commas, skipping malformed entries.
pub fn parse_url_instead_of(config: &str) -> BTreeMap<String, String> {
    config
        .split(',')
        .filter(|pair| !pair.trim().is_empty())
        .enumerate()
        .filter_map(|(index, pair)| match pair.split_once('=') {
            Some((base, instead_of)) => {
                Some((base.trim().to_string(), instead_of.trim().to_string()))
            }
            None => {
                log::warn!(
                    "Invalid format of base=insteadOf pair #{}: '{pair}'. Ignoring.",
                    index + 1
                );
                None
            }
        })
        .collect()
}

/// Generates a `.gitconfig` with a credential helper section and URL rewrites.
#[derive(Debug, Default)]
pub struct GitConfigGenerator {
    pub url_instead_of: BTreeMap<String, String>,
}

impl GitConfigGenerator {
    pub fn new(url_instead_of: BTreeMap<String, String>) -> Self {
        Self { url_instead_of }
    }

    pub fn content(&self, services: &[InfrastructureService]) -> Option<String> {
        let has_credentials = services.iter().any(|service| {
            service
                .credentials_types
                .contains(&CredentialsType::GitCredentialsFile)
        });

        if !has_credentials && self.url_instead_of.is_empty() {
            return None;
        }

        let mut content = String::new();
        if has_credentials {
            content.push_str("[credential]\n\thelper = store\n");
        }
        for (base, instead_of) in &self.url_instead_of {
            content.push_str(&format!("[url \"{base}\"]\n\tinsteadOf = \"{instead_of}\"\n"));
        }

        Some(content)
    }

    pub async fn generate(
        &self,
        builder: &ConfigFileBuilder<'_>,
        services: &[InfrastructureService],
    ) -> Result<Option<PathBuf>, Error> {
        match self.content(services) {
            Some(content) => Ok(Some(
                builder.build_in_home(GIT_CONFIG_FILE_NAME, &content).await?,
            )),
            None => {
                log::debug!("Not generating .gitconfig file");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_pairs() {
        let pairs = parse_url_instead_of(
            "https://github.com=ssh://git@github.com, broken ,https://github.com/=git@github.com:",
        );

        assert_eq!(
            BTreeMap::from([
                (
                    "https://github.com".to_string(),
                    "ssh://git@github.com".to_string()
                ),
                ("https://github.com/".to_string(), "git@github.com:".to_string()),
            ]),
            pairs
        );
    }

    #[test]
    fn content() {
        let mut service = InfrastructureService::new("git", "https://git.example.org", "u", "p");
        service
            .credentials_types
            .insert(CredentialsType::GitCredentialsFile);

        let generator = GitConfigGenerator::new(parse_url_instead_of(
            "https://github.com=ssh://git@github.com",
        ));

        assert_eq!(
            Some(
                "[credential]\n\thelper = store\n[url \"https://github.com\"]\n\tinsteadOf = \"ssh://git@github.com\"\n"
                    .to_string()
            ),
            generator.content(&[service])
        );

        assert_eq!(None, GitConfigGenerator::default().content(&[]));
    }
}
