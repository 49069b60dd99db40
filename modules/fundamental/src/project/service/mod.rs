#[cfg(test)]
mod test;

use crate::{
    common::{analyzer_run_ids, identifier_columns, require_run, sorted},
    Error,
};
use ortserver_common::{
    db::{limiter::LimiterTrait, Database},
    model::{ListQueryParameters, ListQueryResult, OrderField},
};
use ortserver_entity::{project, project_analyzer_run};
use ortserver_model::runs::Project;
use ortserver_module_ingestor::graph::Graph;
use sea_orm::{
    ColumnTrait, EntityTrait, IntoSimpleExpr, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, RelationTrait, Select,
};
use tracing::instrument;

pub struct ProjectService {
    db: Database,
    graph: Graph,
}

impl ProjectService {
    pub fn new(db: Database) -> Self {
        Self {
            graph: Graph::new(db.clone()),
            db,
        }
    }

    fn projects_of_run(ort_run_id: i64) -> Select<project::Entity> {
        project::Entity::find().filter(
            project::Column::Id.in_subquery(
                project_analyzer_run::Entity::find()
                    .select_only()
                    .column(project_analyzer_run::Column::ProjectId)
                    .filter(
                        project_analyzer_run::Column::AnalyzerRunId
                            .in_subquery(analyzer_run_ids(ort_run_id)),
                    )
                    .into_query(),
            ),
        )
    }

    #[instrument(skip(self), err)]
    pub async fn list_for_run(
        &self,
        ort_run_id: i64,
        params: ListQueryParameters,
    ) -> Result<ListQueryResult<Project>, Error> {
        require_run(ort_run_id, &self.db).await?;

        let select = sorted(
            Self::projects_of_run(ort_run_id)
                .join(JoinType::InnerJoin, project::Relation::Identifier.def()),
            &params,
            OrderField::asc("identifier"),
            vec![
                ("identifier", identifier_columns()),
                (
                    "definitionFilePath",
                    vec![project::Column::DefinitionFilePath.into_simple_expr()],
                ),
            ],
        )?
        .order_by_asc(project::Column::Id);

        let result = select
            .limiting_params(&self.db, &params)
            .into_result(params)
            .await?;

        let mut data = Vec::with_capacity(result.data.len());
        for model in result.data {
            data.push(self.graph.load_project(model, &self.db).await?);
        }

        Ok(ListQueryResult {
            data,
            params: result.params,
            total_count: result.total_count,
        })
    }

    pub async fn count_for_run(&self, ort_run_id: i64) -> Result<u64, Error> {
        Ok(Self::projects_of_run(ort_run_id).count(&self.db).await?)
    }
}
