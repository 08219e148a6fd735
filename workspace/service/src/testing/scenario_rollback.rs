//! Transactional writes leave no partial state behind.

use model::entities::account;
use sea_orm::ConnectionTrait;

use super::helpers::*;
use crate::bindings::BindingChange;
use crate::forms::{AccountForm, UpdateAccountForm};
use crate::outcome::FormErrorCause;
use crate::repository::{AccountRepository, SeaOrmAccountRepository};

/// Makes every binding insert fail while reads keep working.
async fn freeze_bindings(db: &sea_orm::DatabaseConnection) -> Result<()> {
    db.execute_unprepared(
        "CREATE TRIGGER freeze_bindings BEFORE INSERT ON stbbind \
         BEGIN SELECT RAISE(ABORT, 'bindings are frozen'); END;",
    )
    .await?;
    Ok(())
}

fn model(account_id: &str, state: &str) -> account::Model {
    account::Model {
        account_id: account_id.to_string(),
        state: state.to_string(),
        enable: true,
    }
}

#[tokio::test]
async fn failed_binding_insert_discards_the_account() -> Result<()> {
    let db = setup_db().await?;
    new_products(&db, &["P1"]).await?;
    let repository = SeaOrmAccountRepository::new(db.clone());

    let result = repository
        .insert_with_bindings(&model("stb-1", "1002"), &["P1".into(), "P404".into()])
        .await;

    assert!(result.is_err());
    assert!(find_account(&db, "stb-1").await?.is_none());
    assert!(bindings_of(&db, "stb-1").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_binding_update_keeps_previous_state() -> Result<()> {
    let db = setup_db().await?;
    new_products(&db, &["P1", "P2"]).await?;
    new_account(&db, "stb-2", "1002").await?;
    bind(&db, "stb-2", "P1").await?;
    let repository = SeaOrmAccountRepository::new(db.clone());

    let change = BindingChange::between(&ids(&["P1"]), &ids(&["P2", "P404"]));
    let result = repository
        .save_with_bindings(&model("stb-2", "1005"), &change)
        .await;

    assert!(result.is_err());
    assert_eq!(find_account(&db, "stb-2").await?.unwrap().state, "1002");
    assert_eq!(bound_ids(&db, "stb-2").await?, ids(&["P1"]));
    Ok(())
}

#[tokio::test]
async fn duplicate_insert_fails() -> Result<()> {
    let db = setup_db().await?;
    new_account(&db, "stb-3", "1002").await?;
    let repository = SeaOrmAccountRepository::new(db.clone());

    assert!(repository.insert(&model("stb-3", "1003")).await.is_err());
    assert_eq!(find_account(&db, "stb-3").await?.unwrap().state, "1002");
    Ok(())
}

#[tokio::test]
async fn store_failure_becomes_persistence_form_error() -> Result<()> {
    let db = setup_db().await?;
    new_products(&db, &["P1"]).await?;
    let (service, audit) = new_service(&db);
    // without the binding table the insert fails after the account row is written
    db.execute_unprepared("PRAGMA foreign_keys = OFF;").await?;
    db.execute_unprepared("DROP TABLE stbbind;").await?;
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

    let outcome = service
        .create(AccountForm {
            account_id: "stb-4".into(),
            state: "1002".into(),
            enable: None,
            products: vec!["P1".into()],
        })
        .await
        .expect("create failed");

    let form_state = outcome.form_error().expect("expected a form error");
    assert_eq!(form_state.cause, FormErrorCause::Persistence);
    assert_eq!(
        form_state.errors.get("account_id"),
        Some(&["add account stb-4 failed! please try again.".to_string()][..])
    );
    assert!(find_account(&db, "stb-4").await?.is_none());
    assert!(audit.entries().is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_write_reports_its_own_cause() -> Result<()> {
    let db = setup_db().await?;
    new_products(&db, &["P1"]).await?;
    freeze_bindings(&db).await?;
    let repository = SeaOrmAccountRepository::new(db.clone());

    let err = repository
        .insert_with_bindings(&model("stb-6", "1002"), &["P1".into()])
        .await
        .expect_err("insert should fail");

    assert!(err.to_string().contains("bindings are frozen"), "{}", err);
    Ok(())
}

#[tokio::test]
async fn failed_update_becomes_persistence_form_error() -> Result<()> {
    let db = setup_db().await?;
    new_products(&db, &["P1", "P2"]).await?;
    new_account(&db, "stb-5", "1002").await?;
    bind(&db, "stb-5", "P1").await?;
    freeze_bindings(&db).await?;
    let (service, audit) = new_service(&db);

    let outcome = service
        .update(
            "stb-5",
            UpdateAccountForm {
                state: "1005".into(),
                enable: None,
                products: vec!["P2".into()],
            },
        )
        .await
        .expect("update failed");

    let form_state = outcome.form_error().expect("expected a form error");
    assert_eq!(form_state.cause, FormErrorCause::Persistence);
    assert_eq!(
        form_state.errors.get("account_id"),
        Some(&["update account stb-5 failed! please try again.".to_string()][..])
    );
    assert_eq!(form_state.draft.state, "1005");

    assert_eq!(find_account(&db, "stb-5").await?.unwrap().state, "1002");
    assert_eq!(bound_ids(&db, "stb-5").await?, ids(&["P1"]));
    assert!(audit.entries().is_empty());
    Ok(())
}
