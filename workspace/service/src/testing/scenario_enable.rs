//! Enable and disable only touch the `enable` flag.

use super::helpers::*;
use crate::error::AdminError;
use crate::outcome::{Outcome, Redirect};

#[tokio::test]
async fn disable_then_enable_keeps_state_and_bindings() -> Result<()> {
    let db = setup_db().await?;
    new_products(&db, &["P1"]).await?;
    // locked states do not block enable / disable
    new_account(&db, "stb-1", "1001").await?;
    bind(&db, "stb-1", "P1").await?;
    let (service, audit) = new_service(&db);

    let outcome = service.disable("stb-1").await.expect("disable failed");
    assert_eq!(outcome, Outcome::Redirect(Redirect::to_list()));
    let account = find_account(&db, "stb-1").await?.unwrap();
    assert!(!account.enable);
    assert_eq!(account.state, "1001");

    service.enable("stb-1").await.expect("enable failed");
    let account = find_account(&db, "stb-1").await?.unwrap();
    assert!(account.enable);
    assert_eq!(account.state, "1001");
    assert_eq!(bound_ids(&db, "stb-1").await?, ids(&["P1"]));

    assert_eq!(
        audit.entries(),
        vec![
            "disabled stb account stb-1".to_string(),
            "enabled stb account stb-1".to_string(),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn enable_unknown_account_is_not_found() -> Result<()> {
    let db = setup_db().await?;
    let (service, audit) = new_service(&db);

    assert!(matches!(
        service.enable("ghost").await,
        Err(AdminError::NotFound { .. })
    ));
    assert!(audit.entries().is_empty());
    Ok(())
}
