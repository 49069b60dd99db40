use super::*;
use crate::authorization::{HierarchyFilter, NoopAuthorizationService};
use crate::test::RecordingAuthorizationService;
use ortserver_common::model::{ComparisonOperator, OptionalValue};
use ortserver_test_context::OrtServerContext;
use test_context::test_context;
use test_log::test;

fn service(ctx: &OrtServerContext) -> OrganizationService {
    OrganizationService::new(ctx.db.clone(), Arc::new(NoopAuthorizationService))
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn create_and_get(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let authorization = Arc::new(RecordingAuthorizationService::default());
    let service = OrganizationService::new(ctx.db.clone(), authorization.clone());

    let created = service
        .create_organization("acme", Some("The ACME corporation"))
        .await?;

    assert_eq!(Some(created.clone()), service.get_organization(created.id).await?);
    assert_eq!(None, service.get_organization(created.id + 1).await?);
    assert_eq!(
        vec![format!("create organization {}", created.id)],
        authorization.calls()
    );

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn failing_roles_do_not_fail_creation(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = OrganizationService::new(
        ctx.db.clone(),
        Arc::new(RecordingAuthorizationService::failing()),
    );

    let created = service.create_organization("acme", None).await?;
    assert!(service.get_organization(created.id).await?.is_some());

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn duplicate_names_conflict(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = service(ctx);

    service.create_organization("acme", None).await?;
    let result = service.create_organization("acme", None).await;

    assert!(matches!(result, Err(Error::Conflict(_))), "{result:?}");

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn list_sorted_and_paged(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = service(ctx);
    for name in ["charlie", "alpha", "bravo"] {
        service.create_organization(name, None).await?;
    }

    let result = service
        .list_organizations(
            ListQueryParameters::default()
                .with_sort(OrderField::desc("name"))
                .with_limit(2),
            None,
        )
        .await?;

    assert_eq!(3, result.total_count);
    assert_eq!(
        vec!["charlie", "bravo"],
        result.data.iter().map(|o| o.name.as_str()).collect::<Vec<_>>()
    );

    let result = service
        .list_organizations(
            ListQueryParameters::default().with_offset(2),
            Some(FilterOperatorAndValue::new(
                ComparisonOperator::Ilike,
                "A".to_string(),
            )),
        )
        .await?;

    // all three contain an "a", sorted by name the third one is "charlie"
    assert_eq!(3, result.total_count);
    assert_eq!(
        vec!["charlie"],
        result.data.iter().map(|o| o.name.as_str()).collect::<Vec<_>>()
    );

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn reject_unknown_sort_field(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let result = service(ctx)
        .list_organizations(
            ListQueryParameters::default().with_sort(OrderField::asc("color")),
            None,
        )
        .await;

    assert!(matches!(result, Err(Error::Query(_))), "{result:?}");

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn list_for_user(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let visible = ctx.create_hierarchy("visible").await?;
    let via_repository = ctx.create_hierarchy("via-repository").await?;
    ctx.create_hierarchy("hidden").await?;

    let service = OrganizationService::new(
        ctx.db.clone(),
        Arc::new(RecordingAuthorizationService::with_filter(HierarchyFilter {
            organization_ids: [visible.organization.id].into(),
            repository_ids: [via_repository.repository.id].into(),
            ..Default::default()
        })),
    );

    let result = service
        .list_organizations_for_user("user", ListQueryParameters::default(), None)
        .await?;

    assert_eq!(2, result.total_count);
    assert_eq!(
        vec!["via-repository", "visible"],
        result.data.iter().map(|o| o.name.as_str()).collect::<Vec<_>>()
    );

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn update_keeps_absent_fields(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = service(ctx);
    let created = service.create_organization("acme", Some("old")).await?;

    let updated = service
        .update_organization(
            created.id,
            UpdateOrganization {
                name: OptionalValue::Present("ACME".into()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!("ACME", updated.name);
    assert_eq!(Some("old".to_string()), updated.description);

    let updated = service
        .update_organization(
            created.id,
            UpdateOrganization {
                description: OptionalValue::Present(None),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!("ACME", updated.name);
    assert_eq!(None, updated.description);

    let unchanged = service
        .update_organization(created.id, UpdateOrganization::default())
        .await?;
    assert_eq!(updated, unchanged);

    assert!(matches!(
        service
            .update_organization(created.id + 1, UpdateOrganization::default())
            .await,
        Err(Error::NotFound(_))
    ));

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn delete_requires_empty_organization(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let service = service(ctx);
    let hierarchy = ctx.create_hierarchy("acme").await?;
    let empty = service.create_organization("empty", None).await?;

    let result = service
        .delete_organization(hierarchy.organization.id)
        .await;
    assert!(
        matches!(result, Err(Error::OrganizationNotEmpty(id)) if id == hierarchy.organization.id),
        "{result:?}"
    );

    service.delete_organization(empty.id).await?;
    assert!(service.get_organization(empty.id).await?.is_none());
    assert!(matches!(
        service.delete_organization(empty.id).await,
        Err(Error::NotFound(_))
    ));

    Ok(())
}

#[test_context(OrtServerContext)]
#[test(tokio::test)]
async fn products_and_repository_ids(ctx: &OrtServerContext) -> Result<(), anyhow::Error> {
    let authorization = Arc::new(RecordingAuthorizationService::default());
    let service = OrganizationService::new(ctx.db.clone(), authorization.clone());
    let hierarchy = ctx.create_hierarchy("acme").await?;

    let product = service
        .create_product(
            hierarchy.organization.id,
            CreateProduct {
                name: "another".into(),
                description: None,
            },
        )
        .await?;
    assert_eq!(
        vec![format!("create product {}", product.id)],
        authorization.calls()
    );

    let products = service
        .list_products(hierarchy.organization.id, ListQueryParameters::default())
        .await?;
    assert_eq!(2, products.total_count);
    assert_eq!(
        vec!["acme-product", "another"],
        products.data.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
    );

    assert_eq!(
        vec![hierarchy.repository.id],
        service.get_repository_ids(hierarchy.organization.id).await?
    );

    assert!(matches!(
        service
            .create_product(
                hierarchy.organization.id + 100,
                CreateProduct {
                    name: "orphan".into(),
                    description: None,
                },
            )
            .await,
        Err(Error::NotFound(_))
    ));

    Ok(())
}
