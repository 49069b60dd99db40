use crate::graph::{Error, Graph};
use ortserver_entity::{advisor_result, advisor_run, vulnerability, vulnerability_reference};
use ortserver_model::{
    advisor::{AdvisorResult, AdvisorRun, Vulnerability, VulnerabilityReference},
    JobKind,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::instrument;

impl Graph {
    /// Store the results of an advisor job.
    ///
    /// The issues of the run are attached to the ORT run the job belongs to.
    #[instrument(skip(self, run, connection), fields(results = run.results.len()), err)]
    pub async fn create_advisor_run<C: ConnectionTrait>(
        &self,
        run: &AdvisorRun,
        connection: &C,
    ) -> Result<AdvisorRun, Error> {
        let job = self
            .get_job(run.advisor_job_id, connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("job {}", run.advisor_job_id)))?;

        let model = advisor_run::ActiveModel {
            id: Default::default(),
            job_id: Set(job.id),
            start_time: Set(run.start_time),
            end_time: Set(run.end_time),
            environment: Set(serde_json::to_value(&run.environment)?),
            config: Set(serde_json::to_value(&run.config)?),
        }
        .insert(connection)
        .await?;

        for result in &run.results {
            self.insert_advisor_result(model.id, result, connection)
                .await?;
        }

        let worker = JobKind::Advisor.to_string();
        let issues = run
            .issues
            .iter()
            .cloned()
            .map(|issue| issue.with_worker(worker.clone()))
            .collect::<Vec<_>>();
        self.add_run_issues(job.ort_run_id, &issues, connection)
            .await?;

        Ok(AdvisorRun {
            id: model.id,
            issues,
            ..run.clone()
        })
    }

    async fn insert_advisor_result<C: ConnectionTrait>(
        &self,
        advisor_run_id: i64,
        result: &AdvisorResult,
        connection: &C,
    ) -> Result<(), Error> {
        let identifier = self
            .get_or_put_identifier(&result.identifier, connection)
            .await?;

        let model = advisor_result::ActiveModel {
            id: Default::default(),
            advisor_run_id: Set(advisor_run_id),
            identifier_id: Set(identifier.id),
            advisor_name: Set(result.advisor_name.clone()),
            capabilities: Set(serde_json::to_value(&result.capabilities)?),
            start_time: Set(result.start_time),
            end_time: Set(result.end_time),
        }
        .insert(connection)
        .await?;

        for vulnerability in &result.vulnerabilities {
            let stored = vulnerability::ActiveModel {
                id: Default::default(),
                advisor_result_id: Set(model.id),
                external_id: Set(vulnerability.external_id.clone()),
                summary: Set(vulnerability.summary.clone()),
                description: Set(vulnerability.description.clone()),
            }
            .insert(connection)
            .await?;

            for reference in &vulnerability.references {
                vulnerability_reference::ActiveModel {
                    id: Default::default(),
                    vulnerability_id: Set(stored.id),
                    url: Set(reference.url.clone()),
                    scoring_system: Set(reference.scoring_system.clone()),
                    severity: Set(reference.severity.clone()),
                    score: Set(reference.score),
                    vector: Set(reference.vector.clone()),
                }
                .insert(connection)
                .await?;
            }
        }

        Ok(())
    }

    pub async fn get_advisor_run<C: ConnectionTrait>(
        &self,
        id: i64,
        connection: &C,
    ) -> Result<Option<AdvisorRun>, Error> {
        match advisor_run::Entity::find_by_id(id).one(connection).await? {
            Some(model) => Ok(Some(self.load_advisor_run(model, connection).await?)),
            None => Ok(None),
        }
    }

    pub async fn get_advisor_run_for_job<C: ConnectionTrait>(
        &self,
        job_id: i64,
        connection: &C,
    ) -> Result<Option<AdvisorRun>, Error> {
        match advisor_run::Entity::find()
            .filter(advisor_run::Column::JobId.eq(job_id))
            .one(connection)
            .await?
        {
            Some(model) => Ok(Some(self.load_advisor_run(model, connection).await?)),
            None => Ok(None),
        }
    }

    async fn load_advisor_run<C: ConnectionTrait>(
        &self,
        model: advisor_run::Model,
        connection: &C,
    ) -> Result<AdvisorRun, Error> {
        let job = self
            .get_job(model.job_id, connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("job {}", model.job_id)))?;

        let mut results = Vec::new();
        for result in model
            .find_related(advisor_result::Entity)
            .order_by_asc(advisor_result::Column::Id)
            .all(connection)
            .await?
        {
            results.push(self.load_advisor_result(result, connection).await?);
        }

        let issues = self
            .get_run_issues(
                job.ort_run_id,
                Some(&JobKind::Advisor.to_string()),
                connection,
            )
            .await?;

        Ok(AdvisorRun {
            id: model.id,
            advisor_job_id: model.job_id,
            start_time: model.start_time,
            end_time: model.end_time,
            environment: serde_json::from_value(model.environment)?,
            config: serde_json::from_value(model.config)?,
            results,
            issues,
        })
    }

    async fn load_advisor_result<C: ConnectionTrait>(
        &self,
        model: advisor_result::Model,
        connection: &C,
    ) -> Result<AdvisorResult, Error> {
        let mut vulnerabilities = Vec::new();
        for vulnerability in model
            .find_related(vulnerability::Entity)
            .order_by_asc(vulnerability::Column::Id)
            .all(connection)
            .await?
        {
            let references = vulnerability
                .find_related(vulnerability_reference::Entity)
                .order_by_asc(vulnerability_reference::Column::Id)
                .all(connection)
                .await?
                .into_iter()
                .map(|reference| VulnerabilityReference {
                    url: reference.url,
                    scoring_system: reference.scoring_system,
                    severity: reference.severity,
                    score: reference.score,
                    vector: reference.vector,
                })
                .collect();

            vulnerabilities.push(Vulnerability {
                external_id: vulnerability.external_id,
                summary: vulnerability.summary,
                description: vulnerability.description,
                references,
            });
        }

        Ok(AdvisorResult {
            identifier: self.load_identifier(model.identifier_id, connection).await?,
            advisor_name: model.advisor_name,
            capabilities: serde_json::from_value(model.capabilities)?,
            start_time: model.start_time,
            end_time: model.end_time,
            vulnerabilities,
        })
    }
}
