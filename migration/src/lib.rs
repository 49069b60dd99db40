pub use sea_orm_migration::prelude::*;

mod m0000010_create_shared_tables;
mod m0000020_create_hierarchy;
mod m0000030_create_analyzer_tables;
mod m0000040_create_evaluator_reporter_tables;
mod m0000050_create_scanner_tables;
mod m0000060_create_advisor_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m0000010_create_shared_tables::Migration),
            Box::new(m0000020_create_hierarchy::Migration),
            Box::new(m0000030_create_analyzer_tables::Migration),
            Box::new(m0000040_create_evaluator_reporter_tables::Migration),
            Box::new(m0000050_create_scanner_tables::Migration),
            Box::new(m0000060_create_advisor_tables::Migration),
        ]
    }
}

/// A surrogate `BIGINT` primary key.
pub(crate) fn id<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

/// A unique index over the given columns.
pub(crate) fn unique_index<T, C>(
    name: &str,
    table: T,
    columns: impl IntoIterator<Item = C>,
) -> IndexCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden,
{
    let mut index = Index::create();
    index.name(name).table(table).unique();
    for column in columns {
        index.col(column);
    }
    index.to_owned()
}
