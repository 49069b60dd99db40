#[cfg(test)]
mod test;

use crate::{
    common::{require_run, sorted},
    Error,
};
use ortserver_common::{
    db::{limiter::LimiterTrait, Database},
    model::{ListQueryParameters, ListQueryResult, OrderField},
};
use ortserver_entity::{issue, ort_run_issue};
use ortserver_model::runs::{OrtIssue, Severity};
use ortserver_module_ingestor::graph::Graph;
use sea_orm::{
    ColumnTrait, EntityTrait, IntoSimpleExpr, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use sea_query::{Expr, SimpleExpr};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::instrument;

/// Severities stored as text, ranked from least to most severe.
fn severity_rank() -> SimpleExpr {
    Expr::case(issue::Column::Severity.eq(Severity::Hint.as_str()), 0)
        .case(issue::Column::Severity.eq(Severity::Warning.as_str()), 1)
        .finally(2)
        .into()
}

pub struct IssueService {
    db: Database,
    graph: Graph,
}

impl IssueService {
    pub fn new(db: Database) -> Self {
        Self {
            graph: Graph::new(db.clone()),
            db,
        }
    }

    /// All issues of a run, reported by the run itself or by one of its workers.
    #[instrument(skip(self), err)]
    pub async fn list_for_run(
        &self,
        ort_run_id: i64,
        params: ListQueryParameters,
    ) -> Result<ListQueryResult<OrtIssue>, Error> {
        require_run(ort_run_id, &self.db).await?;

        let select = sorted(
            ort_run_issue::Entity::find()
                .join(JoinType::InnerJoin, ort_run_issue::Relation::Issue.def())
                .filter(ort_run_issue::Column::OrtRunId.eq(ort_run_id)),
            &params,
            OrderField::desc("timestamp"),
            vec![
                ("timestamp", vec![issue::Column::Timestamp.into_simple_expr()]),
                ("severity", vec![severity_rank()]),
                ("source", vec![issue::Column::Source.into_simple_expr()]),
            ],
        )?
        .order_by_asc(ort_run_issue::Column::Id);

        let result = select
            .limiting_params(&self.db, &params)
            .into_result(params)
            .await?;

        let mut data = Vec::with_capacity(result.data.len());
        for link in result.data {
            data.push(self.graph.load_run_issue(link, &self.db).await?);
        }

        Ok(ListQueryResult {
            data,
            params: result.params,
            total_count: result.total_count,
        })
    }

    /// The number of issues of a run per severity, including severities without issues.
    pub async fn count_by_severity(&self, ort_run_id: i64) -> Result<BTreeMap<Severity, u64>, Error> {
        require_run(ort_run_id, &self.db).await?;

        let mut counts = BTreeMap::from([
            (Severity::Hint, 0),
            (Severity::Warning, 0),
            (Severity::Error, 0),
        ]);

        for (severity, count) in ort_run_issue::Entity::find()
            .select_only()
            .column(issue::Column::Severity)
            .column_as(ort_run_issue::Column::Id.count(), "count")
            .join(JoinType::InnerJoin, ort_run_issue::Relation::Issue.def())
            .filter(ort_run_issue::Column::OrtRunId.eq(ort_run_id))
            .group_by(issue::Column::Severity)
            .into_tuple::<(String, i64)>()
            .all(&self.db)
            .await?
        {
            counts.insert(Severity::from_str(&severity)?, count.max(0) as u64);
        }

        Ok(counts)
    }
}
