//! Account updates and binding reconciliation.

use model::entities::stb_bind::DEFAULT_BIND_DAY;

use super::helpers::*;
use crate::error::{AdminError, LockedAction};
use crate::forms::UpdateAccountForm;
use crate::outcome::{FormErrorCause, Outcome, Redirect};

fn form(state: &str, products: &[&str]) -> UpdateAccountForm {
    UpdateAccountForm {
        state: state.to_string(),
        enable: None,
        products: products.iter().map(|p| p.to_string()).collect(),
    }
}

#[tokio::test]
async fn reconciles_bindings_to_submitted_set() -> Result<()> {
    let db = setup_db().await?;
    new_products(&db, &["P1", "P2", "P3"]).await?;
    new_account(&db, "stb-1", "1002").await?;
    bind(&db, "stb-1", "P1").await?;
    bind(&db, "stb-1", "P2").await?;
    // an untouched binding must keep its mutated fields
    activate(&db, "stb-1", "P2").await?;
    let (service, audit) = new_service(&db);

    let outcome = service
        .update("stb-1", form("1002", &["P2", "P3"]))
        .await
        .expect("update failed");

    assert_eq!(outcome, Outcome::Redirect(Redirect::to_view("stb-1")));
    assert_eq!(bound_ids(&db, "stb-1").await?, ids(&["P2", "P3"]));

    let bindings = bindings_of(&db, "stb-1").await?;
    let p2 = bindings.iter().find(|b| b.product_id == "P2").unwrap();
    assert!(p2.is_active);
    assert_eq!(p2.bind_day, 30);
    let p3 = bindings.iter().find(|b| b.product_id == "P3").unwrap();
    assert!(!p3.is_active);
    assert_eq!(p3.bind_day, DEFAULT_BIND_DAY);

    assert_eq!(audit.entries(), vec!["update stb account stb-1".to_string()]);
    Ok(())
}

#[tokio::test]
async fn empty_submission_removes_all_bindings() -> Result<()> {
    let db = setup_db().await?;
    new_products(&db, &["P1"]).await?;
    new_account(&db, "stb-2", "1002").await?;
    bind(&db, "stb-2", "P1").await?;
    let (service, _) = new_service(&db);

    service
        .update("stb-2", form("1002", &[]))
        .await
        .expect("update failed");

    assert!(bindings_of(&db, "stb-2").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn unchanged_products_only_save_the_account() -> Result<()> {
    let db = setup_db().await?;
    new_products(&db, &["P1"]).await?;
    new_account(&db, "stb-3", "1002").await?;
    bind(&db, "stb-3", "P1").await?;
    activate(&db, "stb-3", "P1").await?;
    let (service, audit) = new_service(&db);

    let mut payload = form("1003", &["P1"]);
    payload.enable = Some(false);
    service.update("stb-3", payload).await.expect("update failed");

    let account = find_account(&db, "stb-3").await?.unwrap();
    assert_eq!(account.state, "1003");
    assert!(!account.enable);
    let bindings = bindings_of(&db, "stb-3").await?;
    assert_eq!(bindings.len(), 1);
    assert!(bindings[0].is_active);
    assert_eq!(audit.entries().len(), 1);
    Ok(())
}

#[tokio::test]
async fn locked_accounts_cannot_be_updated() -> Result<()> {
    for state in ["1001", "1004"] {
        let db = setup_db().await?;
        new_products(&db, &["P1", "P2"]).await?;
        new_account(&db, "stb-locked", state).await?;
        bind(&db, "stb-locked", "P1").await?;
        let (service, audit) = new_service(&db);

        let result = service.update("stb-locked", form("1002", &["P2"])).await;

        match result {
            Err(AdminError::LockedState { action, account_ids }) => {
                assert_eq!(action, LockedAction::Update);
                assert_eq!(account_ids, vec!["stb-locked".to_string()]);
            }
            other => panic!("expected LockedState, got {:?}", other),
        }
        let account = find_account(&db, "stb-locked").await?.unwrap();
        assert_eq!(account.state, state);
        assert_eq!(bound_ids(&db, "stb-locked").await?, ids(&["P1"]));
        assert!(audit.entries().is_empty());

        assert!(matches!(
            service.update_form("stb-locked").await,
            Err(AdminError::LockedState { .. })
        ));
    }
    Ok(())
}

#[tokio::test]
async fn unknown_account_is_not_found() -> Result<()> {
    let db = setup_db().await?;
    let (service, _) = new_service(&db);

    let result = service.update("ghost", form("1002", &[])).await;
    assert!(matches!(result, Err(AdminError::NotFound { entity: "account", .. })));
    Ok(())
}

#[tokio::test]
async fn invalid_state_rerenders_form() -> Result<()> {
    let db = setup_db().await?;
    new_products(&db, &["P1"]).await?;
    new_account(&db, "stb-4", "1002").await?;
    bind(&db, "stb-4", "P1").await?;
    let (service, audit) = new_service(&db);

    let outcome = service
        .update("stb-4", form("abc", &[]))
        .await
        .expect("update failed");

    let form_state = outcome.form_error().expect("expected a form error");
    assert_eq!(form_state.cause, FormErrorCause::Validation);
    assert_eq!(form_state.draft.account_id, "stb-4");
    assert!(form_state.errors.get("state").is_some());

    assert_eq!(bound_ids(&db, "stb-4").await?, ids(&["P1"]));
    assert_eq!(find_account(&db, "stb-4").await?.unwrap().state, "1002");
    assert!(audit.entries().is_empty());
    Ok(())
}

#[tokio::test]
async fn adding_unknown_product_is_not_found() -> Result<()> {
    let db = setup_db().await?;
    new_products(&db, &["P1"]).await?;
    new_account(&db, "stb-5", "1002").await?;
    bind(&db, "stb-5", "P1").await?;
    let (service, _) = new_service(&db);

    let result = service.update("stb-5", form("1005", &["P1", "P7"])).await;

    assert!(matches!(result, Err(AdminError::NotFound { entity: "product", .. })));
    assert_eq!(find_account(&db, "stb-5").await?.unwrap().state, "1002");
    assert_eq!(bound_ids(&db, "stb-5").await?, ids(&["P1"]));
    Ok(())
}

#[tokio::test]
async fn update_form_lists_current_products() -> Result<()> {
    let db = setup_db().await?;
    new_products(&db, &["P1", "P2"]).await?;
    new_account(&db, "stb-6", "1002").await?;
    bind(&db, "stb-6", "P2").await?;
    let (service, _) = new_service(&db);

    let view = service.update_form("stb-6").await.expect("form failed");

    assert_eq!(view.draft.account_id, "stb-6");
    assert_eq!(view.draft.products, vec!["P2".to_string()]);
    assert_eq!(view.products.len(), 2);
    Ok(())
}
