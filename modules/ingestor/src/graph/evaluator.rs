use crate::graph::{Error, Graph};
use ortserver_entity::{evaluator_run, rule_violation};
use ortserver_model::evaluator::{EvaluatorRun, RuleViolation};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::instrument;

impl Graph {
    #[instrument(skip(self, run, connection), fields(violations = run.violations.len()), err)]
    pub async fn create_evaluator_run<C: ConnectionTrait>(
        &self,
        run: &EvaluatorRun,
        connection: &C,
    ) -> Result<EvaluatorRun, Error> {
        let model = evaluator_run::ActiveModel {
            id: Default::default(),
            job_id: Set(run.evaluator_job_id),
            start_time: Set(run.start_time),
            end_time: Set(run.end_time),
        }
        .insert(connection)
        .await?;

        for violation in &run.violations {
            let identifier_id = match &violation.package {
                Some(package) => Some(self.get_or_put_identifier(package, connection).await?.id),
                None => None,
            };

            rule_violation::ActiveModel {
                id: Default::default(),
                evaluator_run_id: Set(model.id),
                rule: Set(violation.rule.clone()),
                identifier_id: Set(identifier_id),
                license: Set(violation.license.clone()),
                license_source: Set(violation.license_source.clone()),
                severity: Set(violation.severity.as_str().to_string()),
                message: Set(violation.message.clone()),
                how_to_fix: Set(violation.how_to_fix.clone()),
            }
            .insert(connection)
            .await?;
        }

        Ok(EvaluatorRun {
            id: model.id,
            ..run.clone()
        })
    }

    pub async fn get_evaluator_run_for_job<C: ConnectionTrait>(
        &self,
        job_id: i64,
        connection: &C,
    ) -> Result<Option<EvaluatorRun>, Error> {
        let Some(model) = evaluator_run::Entity::find()
            .filter(evaluator_run::Column::JobId.eq(job_id))
            .one(connection)
            .await?
        else {
            return Ok(None);
        };

        let mut violations = Vec::new();
        for violation in model
            .find_related(rule_violation::Entity)
            .order_by_asc(rule_violation::Column::Id)
            .all(connection)
            .await?
        {
            let package = match violation.identifier_id {
                Some(id) => Some(self.load_identifier(id, connection).await?),
                None => None,
            };

            violations.push(RuleViolation {
                rule: violation.rule,
                package,
                license: violation.license,
                license_source: violation.license_source,
                severity: violation.severity.parse()?,
                message: violation.message,
                how_to_fix: violation.how_to_fix,
            });
        }

        Ok(Some(EvaluatorRun {
            id: model.id,
            evaluator_job_id: model.job_id,
            start_time: model.start_time,
            end_time: model.end_time,
            violations,
        }))
    }
}
