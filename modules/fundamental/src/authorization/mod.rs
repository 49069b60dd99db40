//! Access to the identity provider which manages the roles and groups of the hierarchy.
//!
//! Roles exist per organization, product and repository. They are created and deleted together
//! with the element they protect. The provider itself stays outside of this crate.

#[cfg(test)]
mod test;

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

#[derive(Debug, thiserror::Error)]
pub enum AuthorizationError {
    #[error("identity provider request failed: {0}")]
    Provider(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

/// A group of users sharing a role on a hierarchy element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Group {
    Readers,
    Writers,
    Admins,
}

impl Group {
    /// Parse a group as it is addressed in requests, for example `readers` or `WRITER`.
    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim().to_uppercase();
        match id.strip_suffix('S').unwrap_or(&id) {
            "READER" => Some(Self::Readers),
            "WRITER" => Some(Self::Writers),
            "ADMIN" => Some(Self::Admins),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Readers => "READERS",
            Self::Writers => "WRITERS",
            Self::Admins => "ADMINS",
        }
    }

    /// The name of the group in the identity provider.
    pub fn organization_group(&self, organization_id: i64) -> String {
        format!("ORGANIZATION_{organization_id}_{self}")
    }

    pub fn product_group(&self, product_id: i64) -> String {
        format!("PRODUCT_{product_id}_{self}")
    }

    pub fn repository_group(&self, repository_id: i64) -> String {
        format!("REPOSITORY_{repository_id}_{self}")
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The hierarchy elements a user may see.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HierarchyFilter {
    pub organization_ids: BTreeSet<i64>,
    pub product_ids: BTreeSet<i64>,
    pub repository_ids: BTreeSet<i64>,
    /// Access to everything, no filtering required
    pub is_wildcard: bool,
}

impl HierarchyFilter {
    pub fn wildcard() -> Self {
        Self {
            is_wildcard: true,
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait AuthorizationService: Send + Sync {
    async fn create_organization_roles(&self, organization_id: i64)
        -> Result<(), AuthorizationError>;

    async fn delete_organization_roles(&self, organization_id: i64)
        -> Result<(), AuthorizationError>;

    async fn create_product_roles(&self, product_id: i64) -> Result<(), AuthorizationError>;

    async fn delete_product_roles(&self, product_id: i64) -> Result<(), AuthorizationError>;

    async fn create_repository_roles(&self, repository_id: i64) -> Result<(), AuthorizationError>;

    async fn delete_repository_roles(&self, repository_id: i64) -> Result<(), AuthorizationError>;

    async fn add_user_to_group(
        &self,
        username: &str,
        group_name: &str,
    ) -> Result<(), AuthorizationError>;

    async fn remove_user_from_group(
        &self,
        username: &str,
        group_name: &str,
    ) -> Result<(), AuthorizationError>;

    /// The organizations, products and repositories the user has access to.
    async fn filter_hierarchy_ids(&self, user_id: &str)
        -> Result<HierarchyFilter, AuthorizationError>;
}

/// Used when no identity provider is configured, everybody sees everything.
#[derive(Clone, Debug, Default)]
pub struct NoopAuthorizationService;

#[async_trait]
impl AuthorizationService for NoopAuthorizationService {
    async fn create_organization_roles(&self, _: i64) -> Result<(), AuthorizationError> {
        Ok(())
    }

    async fn delete_organization_roles(&self, _: i64) -> Result<(), AuthorizationError> {
        Ok(())
    }

    async fn create_product_roles(&self, _: i64) -> Result<(), AuthorizationError> {
        Ok(())
    }

    async fn delete_product_roles(&self, _: i64) -> Result<(), AuthorizationError> {
        Ok(())
    }

    async fn create_repository_roles(&self, _: i64) -> Result<(), AuthorizationError> {
        Ok(())
    }

    async fn delete_repository_roles(&self, _: i64) -> Result<(), AuthorizationError> {
        Ok(())
    }

    async fn add_user_to_group(&self, username: &str, group_name: &str) -> Result<(), AuthorizationError> {
        log::debug!("Ignoring membership of '{username}' in '{group_name}'");
        Ok(())
    }

    async fn remove_user_from_group(
        &self,
        username: &str,
        group_name: &str,
    ) -> Result<(), AuthorizationError> {
        log::debug!("Ignoring removal of '{username}' from '{group_name}'");
        Ok(())
    }

    async fn filter_hierarchy_ids(&self, _: &str) -> Result<HierarchyFilter, AuthorizationError> {
        Ok(HierarchyFilter::wildcard())
    }
}
