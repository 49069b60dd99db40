use crate::graph::{Error, Graph};
use ortserver_entity::job;
use ortserver_model::{Job, JobKind, JobStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use time::OffsetDateTime;
use tracing::instrument;

impl Graph {
    #[instrument(skip(self, connection), err)]
    pub async fn create_job<C: ConnectionTrait>(
        &self,
        ort_run_id: i64,
        kind: JobKind,
        configuration: serde_json::Value,
        connection: &C,
    ) -> Result<Job, Error> {
        let model = job::ActiveModel {
            id: Default::default(),
            ort_run_id: Set(ort_run_id),
            kind: Set(kind.into()),
            created_at: Set(OffsetDateTime::now_utc()),
            started_at: Set(None),
            finished_at: Set(None),
            status: Set(job::JobStatus::Created),
            configuration: Set(configuration),
        };

        Ok(model.insert(connection).await?.into())
    }

    pub async fn get_job<C: ConnectionTrait>(
        &self,
        id: i64,
        connection: &C,
    ) -> Result<Option<Job>, Error> {
        Ok(job::Entity::find_by_id(id)
            .one(connection)
            .await?
            .map(Into::into))
    }

    pub async fn jobs_for_run<C: ConnectionTrait>(
        &self,
        ort_run_id: i64,
        connection: &C,
    ) -> Result<Vec<Job>, Error> {
        Ok(job::Entity::find()
            .filter(job::Column::OrtRunId.eq(ort_run_id))
            .order_by_asc(job::Column::Id)
            .all(connection)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// The most recent job of the given kind for a run.
    pub async fn get_job_for_run<C: ConnectionTrait>(
        &self,
        ort_run_id: i64,
        kind: JobKind,
        connection: &C,
    ) -> Result<Option<Job>, Error> {
        Ok(job::Entity::find()
            .filter(job::Column::OrtRunId.eq(ort_run_id))
            .filter(job::Column::Kind.eq(job::JobKind::from(kind)))
            .order_by_desc(job::Column::Id)
            .one(connection)
            .await?
            .map(Into::into))
    }

    /// Move a job into a new state, tracking when it started and finished.
    #[instrument(skip(self, connection), err)]
    pub async fn update_job_status<C: ConnectionTrait>(
        &self,
        id: i64,
        status: JobStatus,
        connection: &C,
    ) -> Result<Job, Error> {
        let current = job::Entity::find_by_id(id)
            .one(connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("job {id}")))?;

        let previous: JobStatus = current.status.into();
        if previous.is_final() {
            return Err(Error::InvalidState(format!(
                "job {id} is already in final state {previous:?}"
            )));
        }

        let started_at = current.started_at;
        let mut model = current.into_active_model();
        let now = OffsetDateTime::now_utc();

        if status == JobStatus::Running && started_at.is_none() {
            model.started_at = Set(Some(now));
        }
        if status.is_final() {
            model.finished_at = Set(Some(now));
        }
        model.status = Set(status.into());

        Ok(model.update(connection).await?.into())
    }
}
