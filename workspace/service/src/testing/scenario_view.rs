//! Account detail and list queries.

use super::helpers::*;
use crate::error::AdminError;
use crate::search::AccountSearch;

#[tokio::test]
async fn view_exposes_bindings_and_cards() -> Result<()> {
    let db = setup_db().await?;
    new_products(&db, &["P1", "P2", "P3"]).await?;
    new_account(&db, "stb-1", "1002").await?;
    new_account(&db, "stb-2", "1002").await?;
    bind(&db, "stb-1", "P2").await?;
    bind(&db, "stb-1", "P1").await?;
    activate(&db, "stb-1", "P1").await?;
    bind(&db, "stb-2", "P3").await?;
    new_product_card(&db, "C-100", "P3", Some("stb-1")).await?;
    new_product_card(&db, "C-200", "P3", None).await?;
    let (service, audit) = new_service(&db);

    let detail = service.view("stb-1").await.expect("view failed");

    assert_eq!(detail.account.account_id, "stb-1");
    let bound: Vec<&str> = detail
        .bound_products
        .iter()
        .map(|p| p.product_id.as_str())
        .collect();
    assert_eq!(bound, vec!["P1", "P2"]);

    assert_eq!(detail.account_products.len(), 2);
    let p1 = &detail.account_products[0];
    assert_eq!(p1.product_id, "P1");
    assert_eq!(p1.product_name, "Product P1");
    assert!(p1.is_active);
    assert_eq!(p1.bind_day, 30);

    assert_eq!(detail.product_cards.len(), 1);
    assert_eq!(detail.product_cards[0].card_number, "C-100");

    // reads are not audited
    assert!(audit.entries().is_empty());
    Ok(())
}

#[tokio::test]
async fn view_unknown_account_is_not_found() -> Result<()> {
    let db = setup_db().await?;
    let (service, _) = new_service(&db);

    match service.view("ghost").await {
        Err(AdminError::NotFound { entity, id }) => {
            assert_eq!(entity, "account");
            assert_eq!(id, "ghost");
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn list_filters_sorts_and_pages() -> Result<()> {
    let db = setup_db().await?;
    new_account(&db, "box-a", "1002").await?;
    new_account(&db, "box-b", "1001").await?;
    new_account(&db, "box-c", "1002").await?;
    new_account(&db, "tv-1", "1002").await?;
    let (service, _) = new_service(&db);

    let all = service.list(&AccountSearch::default()).await.expect("list failed");
    assert_eq!(all.total, 4);
    assert_eq!(all.page, 1);
    assert_eq!(all.items[0].account_id, "box-a");

    let filtered = service
        .list(&AccountSearch {
            account_id: Some("box".into()),
            state: Some("1002".into()),
            sort: Some("-account_id".into()),
            ..Default::default()
        })
        .await
        .expect("list failed");
    let ids: Vec<&str> = filtered.items.iter().map(|a| a.account_id.as_str()).collect();
    assert_eq!(ids, vec!["box-c", "box-a"]);

    let second = service
        .list(&AccountSearch {
            page: Some(2),
            page_size: Some(3),
            ..Default::default()
        })
        .await
        .expect("list failed");
    assert_eq!(second.page_count, 2);
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].account_id, "tv-1");
    Ok(())
}

#[tokio::test]
async fn blank_filters_are_ignored() -> Result<()> {
    let db = setup_db().await?;
    new_account(&db, "box-a", "1002").await?;
    new_account(&db, "box-b", "1003").await?;
    let (service, _) = new_service(&db);

    let page = service
        .list(&AccountSearch {
            account_id: Some("  ".into()),
            state: Some(String::new()),
            ..Default::default()
        })
        .await
        .expect("list failed");
    assert_eq!(page.total, 2);
    Ok(())
}

#[tokio::test]
async fn account_id_filter_matches_wildcards_literally() -> Result<()> {
    let db = setup_db().await?;
    for account_id in ["stb_1", "stbX1", "a%b", "azzb"] {
        new_account(&db, account_id, "1002").await?;
    }
    let (service, _) = new_service(&db);

    for (fragment, expected) in [("stb_1", "stb_1"), ("a%b", "a%b")] {
        let page = service
            .list(&AccountSearch {
                account_id: Some(fragment.into()),
                ..Default::default()
            })
            .await
            .expect("list failed");
        let ids: Vec<&str> = page.items.iter().map(|a| a.account_id.as_str()).collect();
        assert_eq!(ids, vec![expected]);
    }
    Ok(())
}
