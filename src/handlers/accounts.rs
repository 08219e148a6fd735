use crate::handlers::responses::{self, api_error, ApiError};
use crate::schemas::{AppState, DeleteAllQuery};
use axum::{
    extract::{Path, Query, State},
    response::{Json, Response},
};
use axum_valid::Valid;
use common::{AccountDetail, AccountFormView, AccountPage};
use service::{AccountForm, AccountSearch, UpdateAccountForm};
use tracing::{debug, info, instrument, trace};

/// List accounts with optional filtering, sorting and paging
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    tag = "accounts",
    params(AccountSearch),
    responses(
        (status = 200, description = "Accounts retrieved successfully", body = ApiResponse<AccountPage>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn list_accounts(
    Valid(Query(search)): Valid<Query<AccountSearch>>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    trace!("Entering list_accounts function");

    let page = state.accounts.list(&search).await.map_err(api_error)?;
    info!("Retrieved {} of {} accounts", page.items.len(), page.total);
    Ok(responses::ok(page, "Accounts retrieved successfully"))
}

/// Data for an empty create form
#[utoipa::path(
    get,
    path = "/api/v1/forms/accounts",
    tag = "accounts",
    responses(
        (status = 200, description = "Create form data", body = ApiResponse<AccountFormView>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_form(State(state): State<AppState>) -> Result<Response, ApiError> {
    let form = state.accounts.create_form().await.map_err(api_error)?;
    Ok(responses::ok(form, "Create form retrieved successfully"))
}

/// Create an account and bind its products
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "accounts",
    request_body = AccountForm,
    responses(
        (status = 303, description = "Account created, redirect to its view", body = ApiResponse<RedirectTarget>),
        (status = 404, description = "Unknown product", body = ErrorResponse),
        (status = 422, description = "Form rejected", body = FormErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_account(
    State(state): State<AppState>,
    Json(form): Json<AccountForm>,
) -> Result<Response, ApiError> {
    trace!("Entering create_account function");
    debug!("Creating account {} in state {}", form.account_id, form.state);

    let outcome = state.accounts.create(form).await.map_err(api_error)?;
    Ok(responses::outcome(outcome, "Account created successfully"))
}

/// Delete every account listed in `keys`
#[utoipa::path(
    delete,
    path = "/api/v1/accounts",
    tag = "accounts",
    params(DeleteAllQuery),
    responses(
        (status = 303, description = "Accounts deleted, redirect to the list", body = ApiResponse<RedirectTarget>),
        (status = 400, description = "No account selected", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 409, description = "An account is locked", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_accounts(
    Query(query): Query<DeleteAllQuery>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    trace!("Entering delete_accounts function");

    let outcome = state.accounts.delete_all(&query.keys).await.map_err(api_error)?;
    Ok(responses::outcome(outcome, "Accounts deleted successfully"))
}

/// Account detail with bound products and product cards
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = String, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account retrieved successfully", body = ApiResponse<AccountDetail>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn view_account(
    Path(account_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    trace!("Entering view_account function");

    let detail = state.accounts.view(&account_id).await.map_err(api_error)?;
    debug!(
        "Account {} has {} bound products",
        account_id,
        detail.bound_products.len()
    );
    Ok(responses::ok(detail, "Account retrieved successfully"))
}

/// Current values of an account for the update form
#[utoipa::path(
    get,
    path = "/api/v1/forms/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = String, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Update form data", body = ApiResponse<AccountFormView>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 409, description = "Account is locked", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_form(
    Path(account_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let form = state.accounts.update_form(&account_id).await.map_err(api_error)?;
    Ok(responses::ok(form, "Update form retrieved successfully"))
}

/// Update state, enable flag and the bound product set
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = String, Path, description = "Account ID"),
    ),
    request_body = UpdateAccountForm,
    responses(
        (status = 303, description = "Account updated, redirect to its view", body = ApiResponse<RedirectTarget>),
        (status = 404, description = "Account or product not found", body = ErrorResponse),
        (status = 409, description = "Account is locked", body = ErrorResponse),
        (status = 422, description = "Form rejected", body = FormErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_account(
    Path(account_id): Path<String>,
    State(state): State<AppState>,
    Json(form): Json<UpdateAccountForm>,
) -> Result<Response, ApiError> {
    trace!("Entering update_account function");

    let outcome = state
        .accounts
        .update(&account_id, form)
        .await
        .map_err(api_error)?;
    Ok(responses::outcome(outcome, "Account updated successfully"))
}

/// Delete a single account
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = String, Path, description = "Account ID"),
    ),
    responses(
        (status = 303, description = "Account deleted, redirect to the list", body = ApiResponse<RedirectTarget>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 409, description = "Account is locked", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_account(
    Path(account_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    trace!("Entering delete_account function");

    let outcome = state.accounts.delete(&account_id).await.map_err(api_error)?;
    Ok(responses::outcome(outcome, "Account deleted successfully"))
}

#[utoipa::path(
    post,
    path = "/api/v1/accounts/{account_id}/enable",
    tag = "accounts",
    params(
        ("account_id" = String, Path, description = "Account ID"),
    ),
    responses(
        (status = 303, description = "Account enabled, redirect to the list", body = ApiResponse<RedirectTarget>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn enable_account(
    Path(account_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let outcome = state.accounts.enable(&account_id).await.map_err(api_error)?;
    Ok(responses::outcome(outcome, "Account enabled successfully"))
}

#[utoipa::path(
    post,
    path = "/api/v1/accounts/{account_id}/disable",
    tag = "accounts",
    params(
        ("account_id" = String, Path, description = "Account ID"),
    ),
    responses(
        (status = 303, description = "Account disabled, redirect to the list", body = ApiResponse<RedirectTarget>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn disable_account(
    Path(account_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let outcome = state.accounts.disable(&account_id).await.map_err(api_error)?;
    Ok(responses::outcome(outcome, "Account disabled successfully"))
}
