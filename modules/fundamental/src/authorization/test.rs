use super::*;

#[test]
fn parse_groups() {
    assert_eq!(Some(Group::Readers), Group::parse("readers"));
    assert_eq!(Some(Group::Writers), Group::parse("WRITER"));
    assert_eq!(Some(Group::Admins), Group::parse("Admins"));
    assert_eq!(None, Group::parse("owners"));
    assert_eq!(None, Group::parse(""));
}

#[test]
fn group_names() {
    assert_eq!("PRODUCT_7_WRITERS", Group::Writers.product_group(7));
    assert_eq!("ORGANIZATION_1_ADMINS", Group::Admins.organization_group(1));
    assert_eq!("REPOSITORY_3_READERS", Group::Readers.repository_group(3));
}

#[test_log::test(tokio::test)]
async fn noop_sees_everything() -> Result<(), anyhow::Error> {
    let filter = NoopAuthorizationService
        .filter_hierarchy_ids("someone")
        .await?;

    assert!(filter.is_wildcard);
    assert!(filter.organization_ids.is_empty());

    Ok(())
}
