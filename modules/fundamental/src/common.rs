use crate::Error;
use ortserver_common::model::{
    ComparisonOperator, FilterOperatorAndValue, ListQueryParameters, OrderDirection, OrderField,
};
use ortserver_entity::{analyzer_run, identifier, job, ort_run};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, IntoSimpleExpr, Order, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Select,
};
use sea_query::{BinOper, Expr, Func, SelectStatement, SimpleExpr};

/// The columns a sort field orders by.
pub type SortColumns = Vec<(&'static str, Vec<SimpleExpr>)>;

/// Validate the list parameters and apply the requested order, falling back to `default`.
pub fn sorted<E: EntityTrait>(
    mut select: Select<E>,
    params: &ListQueryParameters,
    default: OrderField,
    columns: SortColumns,
) -> Result<Select<E>, Error> {
    let names = columns.iter().map(|(name, _)| *name).collect::<Vec<_>>();
    params.validate(&names)?;

    for field in params.sort_or(default) {
        let order = match field.direction {
            OrderDirection::Ascending => Order::Asc,
            OrderDirection::Descending => Order::Desc,
        };

        // validated above
        if let Some((_, exprs)) = columns.iter().find(|(name, _)| *name == field.name) {
            for expr in exprs {
                select = select.order_by(expr.clone(), order.clone());
            }
        }
    }

    Ok(select)
}

/// A condition on a text column, supporting exact and case-insensitive substring matches.
pub fn text_condition(
    column: impl IntoSimpleExpr,
    filter: &FilterOperatorAndValue<String>,
) -> Result<SimpleExpr, Error> {
    let column = column.into_simple_expr();
    match filter.operator {
        ComparisonOperator::Equals => Ok(Expr::expr(column).eq(filter.value.clone())),
        ComparisonOperator::NotEquals => Ok(Expr::expr(column).ne(filter.value.clone())),
        ComparisonOperator::Ilike => Ok(ilike(column, &filter.value)),
        other => Err(Error::BadRequest(format!(
            "unsupported operator for a text filter: {other:?}"
        ))),
    }
}

/// Case-insensitive substring match, portable between PostgreSQL and SQLite.
pub fn ilike(expr: SimpleExpr, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(expr)).like(format!("%{}%", value.to_lowercase()))
}

/// The columns of an identifier, in the order they are sorted by.
pub fn identifier_columns() -> Vec<SimpleExpr> {
    vec![
        identifier::Column::Type.into_simple_expr(),
        identifier::Column::Namespace.into_simple_expr(),
        identifier::Column::Name.into_simple_expr(),
        identifier::Column::Version.into_simple_expr(),
    ]
}

/// An identifier rendered as `type:namespace:name:version`.
pub fn identifier_text() -> SimpleExpr {
    let concat = |left: SimpleExpr, right: SimpleExpr| {
        SimpleExpr::Binary(Box::new(left), BinOper::Custom("||"), Box::new(right))
    };

    let mut columns = identifier_columns().into_iter();
    let first = columns.next().unwrap_or_else(|| Expr::val("").into());
    columns.fold(first, |text, column| {
        concat(concat(text, Expr::val(":").into()), column)
    })
}

/// The ids of the analyzer runs which belong to an ORT run.
pub fn analyzer_run_ids(ort_run_id: i64) -> SelectStatement {
    analyzer_run::Entity::find()
        .select_only()
        .column(analyzer_run::Column::Id)
        .filter(
            analyzer_run::Column::JobId.in_subquery(
                job::Entity::find()
                    .select_only()
                    .column(job::Column::Id)
                    .filter(job::Column::OrtRunId.eq(ort_run_id))
                    .into_query(),
            ),
        )
        .into_query()
}

pub async fn require_run<C: ConnectionTrait>(ort_run_id: i64, connection: &C) -> Result<(), Error> {
    match ort_run::Entity::find_by_id(ort_run_id).one(connection).await? {
        Some(_) => Ok(()),
        None => Err(Error::NotFound(format!("ORT run {ort_run_id}"))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sea_orm::DbBackend;

    #[test]
    fn identifier_text_renders_columns_on_every_backend() {
        for backend in [DbBackend::Sqlite, DbBackend::Postgres] {
            let sql = identifier::Entity::find()
                .filter(ilike(identifier_text(), "org.example:util"))
                .build(backend)
                .to_string();

            for column in ["\"type\"", "\"namespace\"", "\"name\"", "\"version\""] {
                assert!(sql.contains(column), "{backend:?}: {sql}");
            }
            assert!(!sql.contains("$1 ||"), "{backend:?}: {sql}");
        }
    }
}
