use super::*;
use crate::test::RecordingAuthorizationService;
use ortserver_common::model::OptionalValue;
use ortserver_entity::job;
use ortserver_model::{JobKind, RepositoryType};
use ortserver_test_context::OrtServerContext;
use sea_orm::PaginatorTrait;
use test_context::test_context;
use test_log::test;

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn delete_cascades_to_runs(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let authorization = Arc::new(RecordingAuthorizationService::default());
    let service = ProductService::new(ctx.db.clone(), authorization.clone());

    let hierarchy = ctx.create_hierarchy("acme").await?;
    let other = ctx.create_hierarchy("other").await?;
    let run = ctx.create_run(hierarchy.repository.id, 1).await?;
    ctx.create_job(run.id, JobKind::Analyzer).await?;
    let kept = ctx.create_run(other.repository.id, 1).await?;

    service.delete_product(hierarchy.product.id).await?;

    assert!(service.get_product(hierarchy.product.id).await?.is_none());
    assert!(ort_run::Entity::find_by_id(run.id).one(&ctx.db).await?.is_none());
    assert!(repository::Entity::find_by_id(hierarchy.repository.id)
        .one(&ctx.db)
        .await?
        .is_none());
    assert_eq!(0, job::Entity::find().filter(job::Column::OrtRunId.eq(run.id)).count(&ctx.db).await?);

    assert!(ort_run::Entity::find_by_id(kept.id).one(&ctx.db).await?.is_some());
    assert!(service.get_product(other.product.id).await?.is_some());

    assert_eq!(
        vec![
            format!("delete repository {}", hierarchy.repository.id),
            format!("delete product {}", hierarchy.product.id),
        ],
        authorization.calls()
    );

    assert!(matches!(
        service.delete_product(hierarchy.product.id).await,
        Err(Error::NotFound(_))
    ));

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn failing_role_deletion_is_ignored(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = ProductService::new(
        ctx.db.clone(),
        Arc::new(RecordingAuthorizationService::failing()),
    );
    let hierarchy = ctx.create_hierarchy("acme").await?;

    service.delete_product(hierarchy.product.id).await?;
    assert!(service.get_product(hierarchy.product.id).await?.is_none());

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn repositories(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let authorization = Arc::new(RecordingAuthorizationService::default());
    let service = ProductService::new(ctx.db.clone(), authorization.clone());
    let hierarchy = ctx.create_hierarchy("acme").await?;

    let created = service
        .create_repository(
            hierarchy.product.id,
            CreateRepository {
                r#type: RepositoryType::Subversion,
                url: "https://example.org/svn/acme".into(),
                description: Some("legacy".into()),
            },
        )
        .await?;
    assert_eq!(hierarchy.organization.id, created.organization_id);
    assert_eq!(
        vec![format!("create repository {}", created.id)],
        authorization.calls()
    );

    let repositories = service
        .list_repositories(
            hierarchy.product.id,
            ListQueryParameters::default().with_sort(OrderField::desc("url")),
        )
        .await?;
    assert_eq!(2, repositories.total_count);
    assert_eq!(vec![created.clone(), hierarchy.repository.clone()], repositories.data);

    assert_eq!(
        vec![hierarchy.repository.id, created.id],
        service.get_repository_ids(hierarchy.product.id).await?
    );

    let unknown = service
        .create_repository(
            hierarchy.product.id,
            CreateRepository {
                r#type: RepositoryType::Unknown,
                url: "https://example.org/unknown".into(),
                description: None,
            },
        )
        .await;
    assert!(matches!(unknown, Err(Error::Model(_))), "{unknown:?}");

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn update(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = ProductService::new(
        ctx.db.clone(),
        Arc::new(RecordingAuthorizationService::default()),
    );
    let hierarchy = ctx.create_hierarchy("acme").await?;

    let updated = service
        .update_product(
            hierarchy.product.id,
            UpdateProduct {
                description: OptionalValue::Present(Some("new".into())),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(hierarchy.product.name, updated.name);
    assert_eq!(Some("new".to_string()), updated.description);

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn group_membership(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let authorization = Arc::new(RecordingAuthorizationService::default());
    let service = ProductService::new(ctx.db.clone(), authorization.clone());
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let id = hierarchy.product.id;

    service.add_user_to_group("alice", id, "readers").await?;
    service.add_user_to_group("bob", id, "WRITER").await?;
    service.remove_user_from_group("alice", id, "Readers").await?;

    assert_eq!(
        vec![
            format!("add alice to PRODUCT_{id}_READERS"),
            format!("add bob to PRODUCT_{id}_WRITERS"),
            format!("remove alice from PRODUCT_{id}_READERS"),
        ],
        authorization.calls()
    );

    assert!(matches!(
        service.add_user_to_group("alice", id, "owners").await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        service.add_user_to_group("alice", id + 1, "readers").await,
        Err(Error::NotFound(_))
    ));
    assert_eq!(3, authorization.calls().len());

    Ok(())
}
