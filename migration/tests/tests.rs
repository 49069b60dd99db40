use ortserver_migration::{Migrator, MigratorTrait};
use ortserver_test_context::OrtServerContext;
use test_context::test_context;
use test_log::test;

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn migrate_down_and_up(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    Migrator::down(&*ctx.db, None).await?;
    assert!(Migrator::get_applied_migrations(&*ctx.db).await?.is_empty());

    Migrator::up(&*ctx.db, None).await?;
    assert_eq!(
        Migrator::migrations().len(),
        Migrator::get_applied_migrations(&*ctx.db).await?.len()
    );

    Ok(())
}
