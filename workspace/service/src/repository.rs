//! Persistence for accounts and their product bindings.

use std::collections::BTreeSet;

use async_trait::async_trait;
use common::AccountPage;
use model::entities::{account, product, product_card, stb_bind};
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ItemsAndPagesNumber, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Select, Set,
    TransactionTrait, Unchanged,
};
use tracing::{debug, error, instrument, trace, warn};

use crate::bindings::BindingChange;
use crate::search::{AccountSearch, SortField};

/// Store operations needed by the account administration service.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn search(&self, search: &AccountSearch) -> Result<AccountPage, DbErr>;

    async fn find_by_id(&self, account_id: &str) -> Result<Option<account::Model>, DbErr>;

    async fn find_by_ids(&self, account_ids: &[String]) -> Result<Vec<account::Model>, DbErr>;

    async fn bound_product_ids(&self, account_id: &str) -> Result<BTreeSet<String>, DbErr>;

    async fn bound_products(&self, account: &account::Model)
        -> Result<Vec<product::Model>, DbErr>;

    /// Binding rows with the product they point to.
    async fn account_products(
        &self,
        account_id: &str,
    ) -> Result<Vec<(stb_bind::Model, Option<product::Model>)>, DbErr>;

    async fn product_cards(&self, account_id: &str) -> Result<Vec<product_card::Model>, DbErr>;

    /// All products, for form select options.
    async fn products(&self) -> Result<Vec<product::Model>, DbErr>;

    /// The ids in `product_ids` that have no product row.
    async fn missing_products(&self, product_ids: &[String]) -> Result<Vec<String>, DbErr>;

    async fn insert(&self, account: &account::Model) -> Result<(), DbErr>;

    /// Inserts the account and one default binding per product in one transaction.
    async fn insert_with_bindings(
        &self,
        account: &account::Model,
        product_ids: &[String],
    ) -> Result<(), DbErr>;

    async fn save(&self, account: &account::Model) -> Result<(), DbErr>;

    /// Saves the account and applies `change` in one transaction.
    async fn save_with_bindings(
        &self,
        account: &account::Model,
        change: &BindingChange,
    ) -> Result<(), DbErr>;

    async fn set_enable(&self, account_id: &str, enable: bool) -> Result<u64, DbErr>;

    async fn delete(&self, account_id: &str) -> Result<u64, DbErr>;

    async fn delete_many(&self, account_ids: &[String]) -> Result<u64, DbErr>;
}

/// Inserts a default binding (`bind_day = 356`, inactive) per product id.
pub async fn batch_insert_bindings<C: ConnectionTrait>(
    conn: &C,
    account_id: &str,
    product_ids: &[String],
) -> Result<u64, DbErr> {
    if product_ids.is_empty() {
        return Ok(0);
    }
    let rows = product_ids
        .iter()
        .map(|product_id| stb_bind::ActiveModel::with_defaults(account_id, product_id));
    stb_bind::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await
}

/// Deletes the bindings of `account_id` to the given products.
pub async fn delete_bindings<C: ConnectionTrait>(
    conn: &C,
    account_id: &str,
    product_ids: &[String],
) -> Result<u64, DbErr> {
    if product_ids.is_empty() {
        return Ok(0);
    }
    let result = stb_bind::Entity::delete_many()
        .filter(stb_bind::Column::AccountId.eq(account_id))
        .filter(stb_bind::Column::ProductId.is_in(product_ids.iter().cloned()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

fn active_account(account: &account::Model) -> account::ActiveModel {
    account::ActiveModel {
        account_id: Set(account.account_id.clone()),
        state: Set(account.state.clone()),
        enable: Set(account.enable),
    }
}

async fn update_account<C: ConnectionTrait>(
    conn: &C,
    account: &account::Model,
) -> Result<(), DbErr> {
    let active = account::ActiveModel {
        account_id: Unchanged(account.account_id.clone()),
        state: Set(account.state.clone()),
        enable: Set(account.enable),
    };
    active.update(conn).await?;
    Ok(())
}

const LIKE_ESCAPE: char = '!';

/// `%fragment%` with the LIKE wildcards in `fragment` matched literally.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// SeaORM-backed store
#[derive(Clone, Debug)]
pub struct SeaOrmAccountRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn filtered(search: &AccountSearch) -> Select<account::Entity> {
        let mut query = account::Entity::find();

        if let Some(fragment) = search.account_id_filter() {
            query = query.filter(
                Expr::col(account::Column::AccountId)
                    .like(LikeExpr::new(contains_pattern(fragment)).escape(LIKE_ESCAPE)),
            );
        }
        if let Some(state) = search.state_filter() {
            query = query.filter(account::Column::State.eq(state));
        }
        if let Some(enable) = search.enable {
            query = query.filter(account::Column::Enable.eq(enable));
        }

        let order = search.sort_order();
        let column = match order.field {
            SortField::AccountId => account::Column::AccountId,
            SortField::State => account::Column::State,
            SortField::Enable => account::Column::Enable,
        };
        query = if order.descending {
            query.order_by_desc(column)
        } else {
            query.order_by_asc(column)
        };
        // stable paging when sorting on a non-unique column
        if order.field != SortField::AccountId {
            query = query.order_by_asc(account::Column::AccountId);
        }
        query
    }
}

#[async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    #[instrument(skip(self))]
    async fn search(&self, search: &AccountSearch) -> Result<AccountPage, DbErr> {
        let page = search.page();
        let page_size = search.page_size();

        let paginator = Self::filtered(search).paginate(&self.db, page_size);
        let ItemsAndPagesNumber {
            number_of_items,
            number_of_pages,
        } = paginator.num_items_and_pages().await?;
        let accounts = paginator.fetch_page(page - 1).await?;
        debug!(
            "Fetched {} of {} accounts for page {}",
            accounts.len(),
            number_of_items,
            page
        );

        Ok(AccountPage {
            items: accounts.into_iter().map(Into::into).collect(),
            total: number_of_items,
            page,
            page_size,
            page_count: number_of_pages,
        })
    }

    async fn find_by_id(&self, account_id: &str) -> Result<Option<account::Model>, DbErr> {
        account::Entity::find_by_id(account_id.to_owned())
            .one(&self.db)
            .await
    }

    async fn find_by_ids(&self, account_ids: &[String]) -> Result<Vec<account::Model>, DbErr> {
        account::Entity::find()
            .filter(account::Column::AccountId.is_in(account_ids.iter().cloned()))
            .all(&self.db)
            .await
    }

    async fn bound_product_ids(&self, account_id: &str) -> Result<BTreeSet<String>, DbErr> {
        let bindings = stb_bind::Entity::find()
            .filter(stb_bind::Column::AccountId.eq(account_id))
            .all(&self.db)
            .await?;
        Ok(bindings.into_iter().map(|b| b.product_id).collect())
    }

    async fn bound_products(
        &self,
        account: &account::Model,
    ) -> Result<Vec<product::Model>, DbErr> {
        account
            .find_related(product::Entity)
            .order_by_asc(product::Column::ProductId)
            .all(&self.db)
            .await
    }

    async fn account_products(
        &self,
        account_id: &str,
    ) -> Result<Vec<(stb_bind::Model, Option<product::Model>)>, DbErr> {
        stb_bind::Entity::find()
            .filter(stb_bind::Column::AccountId.eq(account_id))
            .order_by_asc(stb_bind::Column::ProductId)
            .find_also_related(product::Entity)
            .all(&self.db)
            .await
    }

    async fn product_cards(&self, account_id: &str) -> Result<Vec<product_card::Model>, DbErr> {
        product_card::Entity::find()
            .filter(product_card::Column::AccountId.eq(account_id))
            .order_by_asc(product_card::Column::CardNumber)
            .all(&self.db)
            .await
    }

    async fn products(&self) -> Result<Vec<product::Model>, DbErr> {
        product::Entity::find()
            .order_by_asc(product::Column::ProductId)
            .all(&self.db)
            .await
    }

    async fn missing_products(&self, product_ids: &[String]) -> Result<Vec<String>, DbErr> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let found: BTreeSet<String> = product::Entity::find()
            .filter(product::Column::ProductId.is_in(product_ids.iter().cloned()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| p.product_id)
            .collect();
        Ok(product_ids
            .iter()
            .filter(|id| !found.contains(*id))
            .cloned()
            .collect())
    }

    async fn insert(&self, account: &account::Model) -> Result<(), DbErr> {
        active_account(account).insert(&self.db).await?;
        Ok(())
    }

    #[instrument(skip(self, account), fields(account_id = %account.account_id))]
    async fn insert_with_bindings(
        &self,
        account: &account::Model,
        product_ids: &[String],
    ) -> Result<(), DbErr> {
        trace!("Beginning transaction");
        let txn = self.db.begin().await?;

        let written = async {
            active_account(account).insert(&txn).await?;
            batch_insert_bindings(&txn, &account.account_id, product_ids).await
        }
        .await;

        match written {
            Ok(inserted) => {
                txn.commit().await?;
                debug!("Committed account with {} bindings", inserted);
                Ok(())
            }
            Err(e) => {
                warn!("Rolling back account insert: {}", e);
                if let Err(rollback_err) = txn.rollback().await {
                    error!("Rollback of account insert failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn save(&self, account: &account::Model) -> Result<(), DbErr> {
        update_account(&self.db, account).await
    }

    #[instrument(skip(self, account), fields(account_id = %account.account_id))]
    async fn save_with_bindings(
        &self,
        account: &account::Model,
        change: &BindingChange,
    ) -> Result<(), DbErr> {
        trace!("Beginning transaction");
        let txn = self.db.begin().await?;

        let written = async {
            update_account(&txn, account).await?;
            let inserted =
                batch_insert_bindings(&txn, &account.account_id, &change.added_ids()).await?;
            let deleted =
                delete_bindings(&txn, &account.account_id, &change.removed_ids()).await?;
            Ok::<_, DbErr>((inserted, deleted))
        }
        .await;

        match written {
            Ok((inserted, deleted)) => {
                txn.commit().await?;
                debug!(
                    "Committed account update, {} bindings added, {} removed",
                    inserted, deleted
                );
                Ok(())
            }
            Err(e) => {
                warn!("Rolling back account update: {}", e);
                if let Err(rollback_err) = txn.rollback().await {
                    error!("Rollback of account update failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn set_enable(&self, account_id: &str, enable: bool) -> Result<u64, DbErr> {
        let result = account::Entity::update_many()
            .col_expr(account::Column::Enable, Expr::value(enable))
            .filter(account::Column::AccountId.eq(account_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete(&self, account_id: &str) -> Result<u64, DbErr> {
        let result = account::Entity::delete_by_id(account_id.to_owned())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_many(&self, account_ids: &[String]) -> Result<u64, DbErr> {
        let result = account::Entity::delete_many()
            .filter(account::Column::AccountId.is_in(account_ids.iter().cloned()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
