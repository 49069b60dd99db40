#![allow(clippy::expect_used)]

pub mod call;
pub mod fixtures;

use ortserver_common::{config, db::Database};
use ortserver_entity::{labels::Labels, organization, ort_run, product, repository};
use ortserver_model::{Hierarchy, Job, JobKind, OrtRun, Repository};
use ortserver_module_ingestor::graph::Graph;
use sea_orm::{ActiveModelTrait, Set};
use std::env;
use test_context::AsyncTestContext;
use time::OffsetDateTime;
use tracing::instrument;

/// A migrated database, fresh for every test.
pub struct OrtServerContext {
    pub db: Database,
    pub graph: Graph,
}

impl OrtServerContext {
    async fn new(db: Database) -> Self {
        let graph = Graph::new(db.clone());
        Self { db, graph }
    }

    /// Create an organization, a product and a Git repository.
    pub async fn create_hierarchy(&self, name: &str) -> Result<Hierarchy, anyhow::Error> {
        let organization = organization::ActiveModel {
            id: Default::default(),
            name: Set(name.to_string()),
            description: Set(Some(format!("The {name} organization"))),
        }
        .insert(&self.db)
        .await?;

        let product = product::ActiveModel {
            id: Default::default(),
            organization_id: Set(organization.id),
            name: Set(format!("{name}-product")),
            description: Set(None),
        }
        .insert(&self.db)
        .await?;

        let repository = repository::ActiveModel {
            id: Default::default(),
            product_id: Set(product.id),
            r#type: Set(repository::RepositoryType::Git),
            url: Set(format!("https://example.org/{name}.git")),
            description: Set(None),
        }
        .insert(&self.db)
        .await?;

        Ok(Hierarchy {
            repository: Repository::from_model(repository, organization.id),
            product: product.into(),
            organization: organization.into(),
        })
    }

    /// Create the next ORT run of a repository.
    pub async fn create_run(
        &self,
        repository_id: i64,
        index: i64,
    ) -> Result<OrtRun, anyhow::Error> {
        let run = ort_run::ActiveModel {
            id: Default::default(),
            index: Set(index),
            repository_id: Set(repository_id),
            revision: Set("main".to_string()),
            resolved_revision: Set(None),
            path: Set(None),
            created_at: Set(OffsetDateTime::now_utc()),
            finished_at: Set(None),
            status: Set(ort_run::OrtRunStatus::Created),
            labels: Set(Labels::new().add("source", "test")),
            job_config_context: Set(None),
            resolved_job_config_context: Set(None),
            environment_config_path: Set(None),
            trace_id: Set(None),
            vcs_id: Set(None),
            vcs_processed_id: Set(None),
        }
        .insert(&self.db)
        .await?;

        Ok(run.into())
    }

    pub async fn create_job(&self, ort_run_id: i64, kind: JobKind) -> Result<Job, anyhow::Error> {
        Ok(self
            .graph
            .create_job(ort_run_id, kind, serde_json::json!({}), &self.db)
            .await?)
    }
}

impl AsyncTestContext for OrtServerContext {
    #[instrument]
    async fn setup() -> OrtServerContext {
        let config = match env::var("EXTERNAL_TEST_DB") {
            Ok(url) => {
                log::warn!("Using external database for tests");
                config::Database::for_url(url)
            }
            Err(_) => config::Database::for_url("sqlite::memory:"),
        };

        let db = Database::new(&config)
            .await
            .expect("Configuring the database");
        db.migrate().await.expect("Migrating the database");

        OrtServerContext::new(db).await
    }

    async fn teardown(self) {
        if let Err(err) = self.db.close().await {
            log::warn!("Failed to close the test database: {err}");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_context::test_context;
    use test_log::test;

    #[test_context(OrtServerContext)]
    #[test(tokio::test)]
    async fn hierarchy_fixture(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
        let hierarchy = ctx.create_hierarchy("acme").await?;
        let run = ctx.create_run(hierarchy.repository.id, 1).await?;

        let loaded = ctx.graph.get_hierarchy_for_run(run.id, &ctx.db).await?;
        assert_eq!(hierarchy, loaded);
        assert_eq!(Some("test"), run.labels.get("source").map(String::as_str));

        Ok(())
    }
}
