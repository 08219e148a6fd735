use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use common::{
    AccountDetail, AccountDraft, AccountDto, AccountFormView, AccountPage, AccountProductDto,
    ProductCardDto, ProductDto, RedirectTarget,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use service::{AccountForm, AccountSearch, AccountService, UpdateAccountForm};
use utoipa::{IntoParams, OpenApi, ToSchema};

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Account administration operations
    pub accounts: Arc<AccountService>,
    /// Upper bound for a single request
    pub request_timeout: Duration,
}

/// Query parameters for bulk deletion
#[derive(Debug, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteAllQuery {
    /// Comma-separated account ids
    pub keys: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Rejected form submission with everything needed to show the form again
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FormErrorResponse {
    /// Error message
    pub error: String,
    /// `VALIDATION_FAILED` or `PERSISTENCE_FAILED`
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
    /// Messages keyed by field name
    pub errors: BTreeMap<String, Vec<String>>,
    /// Submitted values
    pub draft: AccountDraft,
    /// Selectable products
    pub products: Vec<ProductDto>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::accounts::list_accounts,
        crate::handlers::accounts::create_form,
        crate::handlers::accounts::create_account,
        crate::handlers::accounts::delete_accounts,
        crate::handlers::accounts::view_account,
        crate::handlers::accounts::update_form,
        crate::handlers::accounts::update_account,
        crate::handlers::accounts::delete_account,
        crate::handlers::accounts::enable_account,
        crate::handlers::accounts::disable_account,
    ),
    components(
        schemas(
            ApiResponse<AccountPage>,
            ApiResponse<AccountDetail>,
            ApiResponse<AccountFormView>,
            ApiResponse<RedirectTarget>,
            ErrorResponse,
            FormErrorResponse,
            HealthResponse,
            AccountSearch,
            DeleteAllQuery,
            AccountForm,
            UpdateAccountForm,
            AccountDto,
            AccountPage,
            AccountDetail,
            AccountDraft,
            AccountFormView,
            AccountProductDto,
            ProductDto,
            ProductCardDto,
            RedirectTarget,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Set-top-box account administration"),
    ),
    info(
        title = "STB Admin API",
        description = "Administration of set-top-box subscriber accounts and their product bindings",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
