//! Common transport-layer types shared between the service layer, the
//! HTTP handlers and the OpenAPI document.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

// ===================== Accounts =====================

/// Account summary row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AccountDto {
    pub account_id: String,
    pub state: String,
    pub enable: bool,
}

/// One page of the filtered account list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AccountPage {
    pub items: Vec<AccountDto>,
    /// Number of accounts matching the filter
    pub total: u64,
    /// 1-based page index
    pub page: u64,
    pub page_size: u64,
    pub page_count: u64,
}

/// Account detail with its derived, read-only collections.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AccountDetail {
    pub account: AccountDto,
    /// Products currently bound to the account
    pub bound_products: Vec<ProductDto>,
    /// Binding rows joined with product details
    pub account_products: Vec<AccountProductDto>,
    /// Product cards redeemed by the account
    pub product_cards: Vec<ProductCardDto>,
}

// ===================== Products =====================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProductDto {
    pub product_id: String,
    pub product_name: String,
}

/// A binding between the account and a product.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AccountProductDto {
    pub product_id: String,
    /// Empty when the product row no longer exists
    pub product_name: String,
    pub bind_day: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProductCardDto {
    pub card_number: String,
    pub product_id: String,
    pub card_day: i32,
    pub is_used: bool,
    pub used_at: Option<NaiveDateTime>,
}

// ===================== Forms =====================

/// Values shown in the account form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Default)]
pub struct AccountDraft {
    pub account_id: String,
    pub state: String,
    pub enable: bool,
    pub products: Vec<String>,
}

/// Data needed to render the create or update form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AccountFormView {
    pub draft: AccountDraft,
    /// Selectable products
    pub products: Vec<ProductDto>,
}

/// Where the client should go after a successful mutation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RedirectTarget {
    /// Route name, `list` or `view`
    pub route: String,
    /// Route parameters
    pub account_id: Option<String>,
    /// Resolved location
    pub location: String,
}
