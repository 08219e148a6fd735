//! Account administration operations.

use std::sync::Arc;

use common::{
    AccountDetail, AccountDraft, AccountFormView, AccountPage, AccountProductDto, ProductDto,
};
use model::entities::account;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::audit::AuditLog;
use crate::bindings::{BindingChange, product_set};
use crate::error::{AdminError, LockedAction, Result};
use crate::forms::{AccountForm, UpdateAccountForm};
use crate::outcome::{FieldErrors, FormErrorCause, FormState, Outcome, Redirect};
use crate::repository::AccountRepository;
use crate::search::AccountSearch;

/// CRUD façade over accounts and their product bindings.
///
/// Every successful mutation writes exactly one audit entry; failed ones write none.
#[derive(Clone)]
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
    audit: Arc<dyn AuditLog>,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepository>, audit: Arc<dyn AuditLog>) -> Self {
        Self { repository, audit }
    }

    /// Paged, filtered account summaries.
    #[instrument(skip(self))]
    pub async fn list(&self, search: &AccountSearch) -> Result<AccountPage> {
        trace!("Entering list");
        let page = self.repository.search(search).await?;
        debug!("Listed {} of {} accounts", page.items.len(), page.total);
        Ok(page)
    }

    /// The account with its bound products, binding details and product cards.
    #[instrument(skip(self))]
    pub async fn view(&self, account_id: &str) -> Result<AccountDetail> {
        let account = self.load(account_id).await?;

        let bound_products = self
            .repository
            .bound_products(&account)
            .await?
            .into_iter()
            .map(ProductDto::from)
            .collect();
        let account_products = self
            .repository
            .account_products(account_id)
            .await?
            .into_iter()
            .map(|(binding, product)| AccountProductDto {
                product_id: binding.product_id,
                product_name: product.map(|p| p.product_name).unwrap_or_default(),
                bind_day: binding.bind_day,
                is_active: binding.is_active,
            })
            .collect();
        let product_cards = self
            .repository
            .product_cards(account_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(AccountDetail {
            account: account.into(),
            bound_products,
            account_products,
            product_cards,
        })
    }

    /// Empty create form; new accounts start enabled.
    pub async fn create_form(&self) -> Result<AccountFormView> {
        Ok(AccountFormView {
            draft: AccountDraft {
                enable: true,
                ..AccountDraft::default()
            },
            products: self.product_options().await?,
        })
    }

    #[instrument(skip(self, form), fields(account_id = %form.account_id, state = %form.state))]
    pub async fn create(&self, form: AccountForm) -> Result<Outcome<()>> {
        trace!("Entering create");

        if let Err(errors) = form.check() {
            debug!("Create payload rejected: {}", errors);
            return self
                .form_error(form.draft(), errors, FormErrorCause::Validation)
                .await;
        }
        if self.repository.find_by_id(&form.account_id).await?.is_some() {
            let errors = FieldErrors::single(
                "account_id",
                format!("Account ID \"{}\" has already been taken.", form.account_id),
            );
            return self
                .form_error(form.draft(), errors, FormErrorCause::Validation)
                .await;
        }

        let model = account::Model {
            account_id: form.account_id.clone(),
            state: form.state.clone(),
            enable: form.enable.unwrap_or(true),
        };

        let written = if account::skips_binding(&model.state) {
            debug!("State {} skips product binding", model.state);
            self.repository.insert(&model).await
        } else {
            let product_ids: Vec<String> = product_set(form.products.iter().cloned())
                .into_iter()
                .collect();
            self.ensure_products_exist(&product_ids).await?;
            self.repository
                .insert_with_bindings(&model, &product_ids)
                .await
        };

        if let Err(source) = written {
            let failure = AdminError::Persistence {
                account_id: model.account_id.clone(),
                source,
            };
            error!("Failed to create account: {}", failure);
            return self
                .persistence_error(form.draft(), &model.account_id, "add")
                .await;
        }

        self.audit
            .record(&format!("create stb account {}", model.account_id));
        info!("Account {} created", model.account_id);
        Ok(Outcome::Redirect(Redirect::to_view(&model.account_id)))
    }

    /// Current values of an account for the update form.
    #[instrument(skip(self))]
    pub async fn update_form(&self, account_id: &str) -> Result<AccountFormView> {
        let account = self.load_unlocked(account_id, LockedAction::Update).await?;
        let products = self.repository.bound_product_ids(account_id).await?;
        Ok(AccountFormView {
            draft: AccountDraft {
                account_id: account.account_id,
                state: account.state,
                enable: account.enable,
                products: products.into_iter().collect(),
            },
            products: self.product_options().await?,
        })
    }

    #[instrument(skip(self, form), fields(state = %form.state))]
    pub async fn update(&self, account_id: &str, form: UpdateAccountForm) -> Result<Outcome<()>> {
        trace!("Entering update");
        let mut account = self.load_unlocked(account_id, LockedAction::Update).await?;
        let old_products = self.repository.bound_product_ids(account_id).await?;

        let draft = form.draft(account_id, account.enable);
        if let Err(errors) = form.check() {
            debug!("Update payload rejected: {}", errors);
            return self
                .form_error(draft, errors, FormErrorCause::Validation)
                .await;
        }

        account.state = form.state.clone();
        if let Some(enable) = form.enable {
            account.enable = enable;
        }

        let new_products = product_set(form.products.iter().cloned());
        let change = BindingChange::between(&old_products, &new_products);
        debug!(
            "Binding change for {}: +{:?} -{:?}",
            account_id, change.added, change.removed
        );

        let written = if change.is_empty() {
            self.repository.save(&account).await
        } else {
            self.ensure_products_exist(&change.added_ids()).await?;
            self.repository.save_with_bindings(&account, &change).await
        };

        if let Err(source) = written {
            let failure = AdminError::Persistence {
                account_id: account_id.to_owned(),
                source,
            };
            error!("Failed to update account: {}", failure);
            return self.persistence_error(draft, account_id, "update").await;
        }

        self.audit
            .record(&format!("update stb account {}", account_id));
        info!("Account {} updated", account_id);
        Ok(Outcome::Redirect(Redirect::to_view(account_id)))
    }

    /// Deletes one account; its bindings go with it at the store level.
    #[instrument(skip(self))]
    pub async fn delete(&self, account_id: &str) -> Result<Outcome<()>> {
        self.load_unlocked(account_id, LockedAction::Delete).await?;

        let deleted = self.repository.delete(account_id).await?;
        debug!("Deleted {} account rows", deleted);

        self.audit
            .record(&format!("delete stb account {}", account_id));
        info!("Account {} deleted", account_id);
        Ok(Outcome::Redirect(Redirect::to_list()))
    }

    /// Deletes every account named in the comma-separated `keys`.
    ///
    /// The whole batch is refused if any account is missing or locked.
    #[instrument(skip(self))]
    pub async fn delete_all(&self, keys: &str) -> Result<Outcome<()>> {
        let account_ids = parse_keys(keys);
        if account_ids.is_empty() {
            return Err(AdminError::Validation(FieldErrors::single(
                "keys",
                "Select at least one account.",
            )));
        }

        let accounts = self.repository.find_by_ids(&account_ids).await?;
        if let Some(missing) = account_ids
            .iter()
            .find(|id| !accounts.iter().any(|a| &a.account_id == *id))
        {
            warn!("Bulk delete references unknown account {}", missing);
            return Err(AdminError::account_not_found(missing));
        }

        let locked: Vec<String> = accounts
            .iter()
            .filter(|a| a.is_locked())
            .map(|a| a.account_id.clone())
            .collect();
        if !locked.is_empty() {
            warn!("Bulk delete refused, locked accounts: {:?}", locked);
            return Err(AdminError::locked(LockedAction::DeleteAll, locked));
        }

        let deleted = self.repository.delete_many(&account_ids).await?;
        debug!("Bulk delete removed {} rows", deleted);

        self.audit.record(&format!(
            "delete selected {} stb accounts, they are {}",
            account_ids.len(),
            keys
        ));
        info!("Deleted {} accounts", account_ids.len());
        Ok(Outcome::Redirect(Redirect::to_list()))
    }

    pub async fn enable(&self, account_id: &str) -> Result<Outcome<()>> {
        self.set_enable(account_id, true).await
    }

    pub async fn disable(&self, account_id: &str) -> Result<Outcome<()>> {
        self.set_enable(account_id, false).await
    }

    #[instrument(skip(self))]
    async fn set_enable(&self, account_id: &str, enable: bool) -> Result<Outcome<()>> {
        self.load(account_id).await?;

        if self.repository.set_enable(account_id, enable).await? == 0 {
            return Err(AdminError::account_not_found(account_id));
        }

        let verb = if enable { "enabled" } else { "disabled" };
        self.audit
            .record(&format!("{} stb account {}", verb, account_id));
        info!("Account {} {}", account_id, verb);
        Ok(Outcome::Redirect(Redirect::to_list()))
    }

    async fn load(&self, account_id: &str) -> Result<account::Model> {
        match self.repository.find_by_id(account_id).await? {
            Some(account) => Ok(account),
            None => {
                warn!("Account {} not found", account_id);
                Err(AdminError::account_not_found(account_id))
            }
        }
    }

    async fn load_unlocked(
        &self,
        account_id: &str,
        action: LockedAction,
    ) -> Result<account::Model> {
        let account = self.load(account_id).await?;
        if account.is_locked() {
            warn!(
                "Refusing to {} account {} in state {}",
                action, account_id, account.state
            );
            return Err(AdminError::locked(action, vec![account.account_id]));
        }
        Ok(account)
    }

    async fn ensure_products_exist(&self, product_ids: &[String]) -> Result<()> {
        let missing = self.repository.missing_products(product_ids).await?;
        if missing.is_empty() {
            Ok(())
        } else {
            warn!("Unknown products submitted: {:?}", missing);
            Err(AdminError::product_not_found(&missing))
        }
    }

    async fn product_options(&self) -> Result<Vec<ProductDto>> {
        Ok(self
            .repository
            .products()
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn form_error<T>(
        &self,
        draft: AccountDraft,
        errors: FieldErrors,
        cause: FormErrorCause,
    ) -> Result<Outcome<T>> {
        Ok(Outcome::FormError(FormState {
            draft,
            errors,
            products: self.product_options().await?,
            cause,
        }))
    }

    /// Form error on `account_id` after a rolled back write. The store error
    /// itself is only logged.
    async fn persistence_error<T>(
        &self,
        draft: AccountDraft,
        account_id: &str,
        verb: &str,
    ) -> Result<Outcome<T>> {
        let errors = FieldErrors::single(
            "account_id",
            format!("{} account {} failed! please try again.", verb, account_id),
        );
        self.form_error(draft, errors, FormErrorCause::Persistence)
            .await
    }
}

/// Splits a comma-joined id list, dropping blanks.
pub fn parse_keys(keys: &str) -> Vec<String> {
    keys.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_owned)
        .collect()
}
