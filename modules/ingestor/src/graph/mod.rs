pub mod advisor;
pub mod analyzer;
pub mod error;
pub mod evaluator;
pub mod hierarchy;
pub mod issue;
pub mod job;
pub mod reporter;
pub mod scanner;
pub mod shared;


use ortserver_common::db::Database;
use sea_orm::{
    sea_query::OnConflict, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel, Iterable, PrimaryKeyToColumn,
};

pub use error::Error;

/// Persistent access to the results of ORT runs.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) db: Database,
}

impl Graph {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub async fn close(self) -> anyhow::Result<()> {
        self.db.close().await
    }

    /// Ping the database.
    ///
    /// Intended to be used for health checks.
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.db.ping().await
    }
}

/// Insert a row of a join table, unless it already exists.
pub async fn insert_link<E, C>(model: E::ActiveModel, connection: &C) -> Result<(), DbErr>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: ConnectionTrait,
{
    E::insert(model)
        .on_conflict(
            OnConflict::columns(E::PrimaryKey::iter().map(|key| key.into_column()))
                .do_nothing()
                .to_owned(),
        )
        .do_nothing()
        .exec_without_returning(connection)
        .await?;

    Ok(())
}
