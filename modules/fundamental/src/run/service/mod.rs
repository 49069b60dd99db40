#[cfg(test)]
mod test;

use crate::{
    common::sorted,
    run::model::{CreateOrtRun, UpdateOrtRun},
    Error,
};
use ortserver_common::{
    db::{limiter::LimiterTrait, Database},
    model::{
        ComparisonOperator, FilterOperatorAndValue, ListQueryParameters, ListQueryResult,
        OrderField,
    },
};
use ortserver_entity::{labels::Labels, ort_run, repository};
use ortserver_model::{Job, OrtRun, OrtRunStatus};
use ortserver_module_ingestor::graph::Graph;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, IntoSimpleExpr, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use time::OffsetDateTime;
use tracing::instrument;

pub struct OrtRunService {
    db: Database,
    graph: Graph,
}

impl OrtRunService {
    pub fn new(db: Database) -> Self {
        Self {
            graph: Graph::new(db.clone()),
            db,
        }
    }

    /// Create the next run of a repository, its index is one above the highest index so far.
    #[instrument(skip(self, create), err)]
    pub async fn create_ort_run(
        &self,
        repository_id: i64,
        create: CreateOrtRun,
    ) -> Result<OrtRun, Error> {
        let tx = self.db.begin().await?;

        if repository::Entity::find_by_id(repository_id)
            .one(&tx)
            .await?
            .is_none()
        {
            return Err(Error::NotFound(format!("repository {repository_id}")));
        }

        let last = ort_run::Entity::find()
            .select_only()
            .column_as(ort_run::Column::Index.max(), "index")
            .filter(ort_run::Column::RepositoryId.eq(repository_id))
            .into_tuple::<Option<i64>>()
            .one(&tx)
            .await?
            .flatten()
            .unwrap_or_default();

        let run = ort_run::ActiveModel {
            id: Default::default(),
            index: Set(last + 1),
            repository_id: Set(repository_id),
            revision: Set(create.revision),
            resolved_revision: Set(None),
            path: Set(create.path),
            created_at: Set(OffsetDateTime::now_utc()),
            finished_at: Set(None),
            status: Set(ort_run::OrtRunStatus::Created),
            labels: Set(Labels::from(create.labels)),
            job_config_context: Set(create.job_config_context),
            resolved_job_config_context: Set(None),
            environment_config_path: Set(create.environment_config_path),
            trace_id: Set(None),
            vcs_id: Set(None),
            vcs_processed_id: Set(None),
        }
        .insert(&tx)
        .await?;

        tx.commit().await?;

        log::info!(
            "Created ORT run {} with index {} for repository {repository_id}",
            run.id,
            run.index
        );

        Ok(run.into())
    }

    pub async fn get_ort_run(&self, id: i64) -> Result<Option<OrtRun>, Error> {
        Ok(self.graph.get_ort_run(id, &self.db).await?)
    }

    pub async fn get_ort_run_by_index(
        &self,
        repository_id: i64,
        index: i64,
    ) -> Result<Option<OrtRun>, Error> {
        Ok(ort_run::Entity::find()
            .filter(ort_run::Column::RepositoryId.eq(repository_id))
            .filter(ort_run::Column::Index.eq(index))
            .one(&self.db)
            .await?
            .map(Into::into))
    }

    #[instrument(skip(self), err)]
    pub async fn list_ort_runs(
        &self,
        repository_id: i64,
        params: ListQueryParameters,
        status: Option<FilterOperatorAndValue<Vec<OrtRunStatus>>>,
    ) -> Result<ListQueryResult<OrtRun>, Error> {
        let mut select =
            ort_run::Entity::find().filter(ort_run::Column::RepositoryId.eq(repository_id));

        if let Some(status) = status {
            let values = status
                .value
                .into_iter()
                .map(ort_run::OrtRunStatus::from)
                .collect::<Vec<_>>();
            select = match status.operator {
                ComparisonOperator::In => select.filter(ort_run::Column::Status.is_in(values)),
                ComparisonOperator::NotIn => {
                    select.filter(ort_run::Column::Status.is_not_in(values))
                }
                other => {
                    return Err(Error::BadRequest(format!(
                        "unsupported operator for the run status: {other:?}"
                    )))
                }
            };
        }

        let select = sorted(
            select,
            &params,
            OrderField::asc("index"),
            vec![
                ("index", vec![ort_run::Column::Index.into_simple_expr()]),
                ("createdAt", vec![ort_run::Column::CreatedAt.into_simple_expr()]),
                ("finishedAt", vec![ort_run::Column::FinishedAt.into_simple_expr()]),
                ("revision", vec![ort_run::Column::Revision.into_simple_expr()]),
            ],
        )?
        .order_by_asc(ort_run::Column::Id);

        Ok(select
            .limiting_params(&self.db, &params)
            .into_result(params)
            .await?
            .map(Into::into))
    }

    /// Apply progress to a run. Moving into a final state records the finish time.
    #[instrument(skip(self, update), err)]
    pub async fn update_ort_run(&self, id: i64, update: UpdateOrtRun) -> Result<OrtRun, Error> {
        let tx = self.db.begin().await?;

        let current = ort_run::Entity::find_by_id(id)
            .one(&tx)
            .await?
            .ok_or_else(|| Error::NotFound(format!("ORT run {id}")))?;

        let mut model = current.clone().into_active_model();
        update.status.if_present(|status| {
            if status.is_final() && current.finished_at.is_none() {
                model.finished_at = Set(Some(OffsetDateTime::now_utc()));
            }
            model.status = Set(status.into());
        });
        update
            .resolved_revision
            .if_present(|revision| model.resolved_revision = Set(revision));
        update
            .resolved_job_config_context
            .if_present(|context| model.resolved_job_config_context = Set(context));

        if !update.issues.is_empty() {
            self.graph.add_run_issues(id, &update.issues, &tx).await?;
        }

        let run = match model.is_changed() {
            true => model.update(&tx).await?,
            false => current,
        };

        tx.commit().await?;

        Ok(run.into())
    }

    /// Delete a run, its jobs and their results go with it.
    #[instrument(skip(self), err)]
    pub async fn delete_ort_run(&self, id: i64) -> Result<(), Error> {
        let result = ort_run::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(Error::NotFound(format!("ORT run {id}")));
        }

        Ok(())
    }

    pub async fn list_jobs(&self, ort_run_id: i64) -> Result<Vec<Job>, Error> {
        if self.get_ort_run(ort_run_id).await?.is_none() {
            return Err(Error::NotFound(format!("ORT run {ort_run_id}")));
        }

        Ok(self.graph.jobs_for_run(ort_run_id, &self.db).await?)
    }
}
