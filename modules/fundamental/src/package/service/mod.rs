
use crate::{
    common::{analyzer_run_ids, identifier_columns, identifier_text, require_run, sorted, text_condition},
    package::model::{LicenseCount, PackageFilters},
    Error,
};
use ortserver_common::{
    db::{limiter::LimiterTrait, Database},
    model::{ComparisonOperator, ListQueryParameters, ListQueryResult, OrderField},
};
use ortserver_entity::{package, package_analyzer_run};
use ortserver_model::runs::Package;
use ortserver_module_ingestor::graph::Graph;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, IntoSimpleExpr, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, RelationTrait, Select,
};
use sea_query::SelectStatement;
use tracing::instrument;

/// The ids of all packages found by the analyzer of a run.
fn package_ids(ort_run_id: i64) -> SelectStatement {
    package_analyzer_run::Entity::find()
        .select_only()
        .column(package_analyzer_run::Column::PackageId)
        .filter(package_analyzer_run::Column::AnalyzerRunId.in_subquery(analyzer_run_ids(ort_run_id)))
        .into_query()
}

pub struct PackageService {
    db: Database,
    graph: Graph,
}

impl PackageService {
    pub fn new(db: Database) -> Self {
        Self {
            graph: Graph::new(db.clone()),
            db,
        }
    }

    fn packages_of_run(ort_run_id: i64) -> Select<package::Entity> {
        package::Entity::find().filter(package::Column::Id.in_subquery(package_ids(ort_run_id)))
    }

    #[instrument(skip(self), err)]
    pub async fn list_for_run(
        &self,
        ort_run_id: i64,
        params: ListQueryParameters,
        filters: PackageFilters,
    ) -> Result<ListQueryResult<Package>, Error> {
        require_run(ort_run_id, &self.db).await?;

        let mut select = Self::packages_of_run(ort_run_id).join(
            JoinType::InnerJoin,
            package::Relation::Identifier.def(),
        );

        if let Some(identifier) = &filters.identifier {
            select = select.filter(text_condition(identifier_text(), identifier)?);
        }
        if let Some(purl) = &filters.purl {
            select = select.filter(text_condition(package::Column::Purl, purl)?);
        }
        if let Some(license) = filters.processed_declared_license {
            let column = package::Column::SpdxExpression;
            select = match license.operator {
                ComparisonOperator::In => select.filter(column.is_in(license.value)),
                // packages without a processed license are not in any set of licenses
                ComparisonOperator::NotIn => select.filter(
                    Condition::any()
                        .add(column.is_null())
                        .add(column.is_not_in(license.value)),
                ),
                other => {
                    return Err(Error::BadRequest(format!(
                        "unsupported operator for the processed license: {other:?}"
                    )))
                }
            };
        }

        let select = sorted(
            select,
            &params,
            OrderField::asc("identifier"),
            vec![
                ("identifier", identifier_columns()),
                ("purl", vec![package::Column::Purl.into_simple_expr()]),
                (
                    "processedDeclaredLicense",
                    vec![package::Column::SpdxExpression.into_simple_expr()],
                ),
            ],
        )?
        .order_by_asc(package::Column::Id);

        let result = select
            .limiting_params(&self.db, &params)
            .into_result(params)
            .await?;

        let mut data = Vec::with_capacity(result.data.len());
        for model in result.data {
            data.push(self.graph.load_package(model, &self.db).await?);
        }

        Ok(ListQueryResult {
            data,
            params: result.params,
            total_count: result.total_count,
        })
    }

    pub async fn count_for_run(&self, ort_run_id: i64) -> Result<u64, Error> {
        Ok(Self::packages_of_run(ort_run_id).count(&self.db).await?)
    }

    /// The number of packages per processed declared license, packages without one are left out.
    pub async fn count_by_license(&self, ort_run_id: i64) -> Result<Vec<LicenseCount>, Error> {
        require_run(ort_run_id, &self.db).await?;

        let counts = Self::packages_of_run(ort_run_id)
            .select_only()
            .column(package::Column::SpdxExpression)
            .column_as(package::Column::Id.count(), "count")
            .filter(package::Column::SpdxExpression.is_not_null())
            .group_by(package::Column::SpdxExpression)
            .order_by_asc(package::Column::SpdxExpression)
            .into_tuple::<(String, i64)>()
            .all(&self.db)
            .await?;

        Ok(counts
            .into_iter()
            .map(|(license, count)| LicenseCount {
                license,
                count: count.max(0) as u64,
            })
            .collect())
    }
}
