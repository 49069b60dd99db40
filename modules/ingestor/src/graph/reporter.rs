use crate::graph::{Error, Graph};
use ortserver_entity::{report, reporter_run};
use ortserver_model::reporter::{Report, ReporterRun};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use tracing::instrument;

impl Graph {
    /// Record the reports produced by a reporter job.
    ///
    /// A job has at most one reporter run.
    #[instrument(skip(self, reports, connection), fields(reports = reports.len()), err)]
    pub async fn create_reporter_run<C: ConnectionTrait>(
        &self,
        job_id: i64,
        start_time: OffsetDateTime,
        end_time: OffsetDateTime,
        reports: &[Report],
        connection: &C,
    ) -> Result<ReporterRun, Error> {
        let existing = reporter_run::Entity::find()
            .filter(reporter_run::Column::JobId.eq(job_id))
            .count(connection)
            .await?;
        if existing > 0 {
            return Err(Error::InvalidState(format!(
                "job {job_id} already has a reporter run"
            )));
        }

        let model = reporter_run::ActiveModel {
            id: Default::default(),
            job_id: Set(job_id),
            start_time: Set(start_time),
            end_time: Set(end_time),
        }
        .insert(connection)
        .await?;

        for report in reports {
            report::ActiveModel {
                id: Default::default(),
                reporter_run_id: Set(model.id),
                filename: Set(report.filename.clone()),
            }
            .insert(connection)
            .await?;
        }

        Ok(ReporterRun {
            id: model.id,
            reporter_job_id: job_id,
            start_time,
            end_time,
            reports: reports.to_vec(),
        })
    }

    pub async fn get_reporter_run_for_job<C: ConnectionTrait>(
        &self,
        job_id: i64,
        connection: &C,
    ) -> Result<Option<ReporterRun>, Error> {
        let Some(model) = reporter_run::Entity::find()
            .filter(reporter_run::Column::JobId.eq(job_id))
            .one(connection)
            .await?
        else {
            return Ok(None);
        };

        let reports = model
            .find_related(report::Entity)
            .order_by_asc(report::Column::Id)
            .all(connection)
            .await?
            .into_iter()
            .map(|report| Report {
                filename: report.filename,
            })
            .collect();

        Ok(Some(ReporterRun {
            id: model.id,
            reporter_job_id: model.job_id,
            start_time: model.start_time,
            end_time: model.end_time,
            reports,
        }))
    }
}
