use super::Error;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Access to the values of secrets.
#[async_trait::async_trait]
pub trait SecretResolver: Send + Sync {
    /// Resolve the given secrets, failing if any of them is unknown.
    async fn resolve(&self, names: &BTreeSet<String>) -> Result<BTreeMap<String, String>, Error>;
}

/// A resolver over a fixed set of secrets.
#[derive(Debug, Clone, Default)]
pub struct StaticSecrets(pub BTreeMap<String, String>);

#[async_trait::async_trait]
impl SecretResolver for StaticSecrets {
    async fn resolve(&self, names: &BTreeSet<String>) -> Result<BTreeMap<String, String>, Error> {
        let missing: BTreeSet<_> = names
            .iter()
            .filter(|name| !self.0.contains_key(*name))
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(Error::UnresolvedSecrets(missing));
        }

        Ok(names
            .iter()
            .filter_map(|name| self.0.get(name).map(|value| (name.clone(), value.clone())))
            .collect())
    }
}

/// Collects the content of generated files.
///
/// Secrets are written as placeholders obtained from [`ConfigFileBuilder::secret_ref`], and only
/// resolved when a file gets written. This way all secrets of a file are fetched in one go.
pub struct ConfigFileBuilder<'a> {
    resolver: &'a dyn SecretResolver,
    home: PathBuf,
    placeholders: BTreeMap<String, String>,
}

impl<'a> ConfigFileBuilder<'a> {
    pub fn new(resolver: &'a dyn SecretResolver, home: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            home: home.into(),
            placeholders: BTreeMap::new(),
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// A placeholder for the value of the given secret.
    pub fn secret_ref(&mut self, secret: &str) -> String {
        let next = self.placeholders.len();
        self.placeholders
            .entry(secret.to_string())
            .or_insert_with(|| format!("#{{secret-{next}}}"))
            .clone()
    }

    /// Resolve a single secret right away.
    ///
    /// Needed when the value gets transformed before it ends up in a file.
    pub async fn resolve_secret(&self, secret: &str) -> Result<String, Error> {
        let mut values = self
            .resolver
            .resolve(&BTreeSet::from([secret.to_string()]))
            .await?;

        values
            .remove(secret)
            .ok_or_else(|| Error::UnresolvedSecrets(BTreeSet::from([secret.to_string()])))
    }

    /// Replace all placeholders in `content` with the values of their secrets.
    pub async fn resolve_content(&self, content: &str) -> Result<String, Error> {
        let used: BTreeSet<String> = self
            .placeholders
            .iter()
            .filter(|(_, placeholder)| content.contains(placeholder.as_str()))
            .map(|(secret, _)| secret.clone())
            .collect();

        if used.is_empty() {
            return Ok(content.to_string());
        }

        let values = self.resolver.resolve(&used).await?;

        let mut result = content.to_string();
        for secret in &used {
            if let (Some(placeholder), Some(value)) =
                (self.placeholders.get(secret), values.get(secret))
            {
                result = result.replace(placeholder.as_str(), value);
            }
        }

        Ok(result)
    }

    /// Write a file with the given content, resolving secret placeholders.
    pub async fn build(&self, file: &Path, content: &str) -> Result<(), Error> {
        let content = self.resolve_content(content).await?;

        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(file, content).await?;

        log::debug!("Generated {}", file.display());

        Ok(())
    }

    /// Write a file into the home directory.
    pub async fn build_in_home(&self, name: &str, content: &str) -> Result<PathBuf, Error> {
        let file = self.home.join(name);
        self.build(&file, content).await?;
        Ok(file)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn secrets() -> StaticSecrets {
        StaticSecrets(BTreeMap::from([
            ("s1".to_string(), "value1".to_string()),
            ("s2".to_string(), "value2".to_string()),
        ]))
    }

    #[test_log::test(tokio::test)]
    async fn placeholders_are_resolved() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let resolver = secrets();
        let mut builder = ConfigFileBuilder::new(&resolver, dir.path());

        let content = format!(
            "secret1 = {},\nsecret2 = {}.\nagain = {}\n",
            builder.secret_ref("s1"),
            builder.secret_ref("s2"),
            builder.secret_ref("s1"),
        );

        let file = builder.build_in_home("test.conf", &content).await?;

        assert_eq!(
            "secret1 = value1,\nsecret2 = value2.\nagain = value1\n",
            std::fs::read_to_string(file)?
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn unknown_secret_fails() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let resolver = secrets();
        let mut builder = ConfigFileBuilder::new(&resolver, dir.path());

        let content = format!("x = {}", builder.secret_ref("unknown"));
        let result = builder.build_in_home("test.conf", &content).await;

        assert!(matches!(result, Err(Error::UnresolvedSecrets(names)) if names.contains("unknown")));
        assert!(!dir.path().join("test.conf").exists());

        Ok(())
    }
}
