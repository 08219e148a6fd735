//! Account payloads submitted by the administrator.

use common::AccountDraft;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::outcome::FieldErrors;

/// Payload for creating an account
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct AccountForm {
    /// Caller-assigned account identifier
    #[validate(custom(function = "validate_account_id"))]
    pub account_id: String,
    /// Four digit state code
    #[validate(custom(function = "validate_state"))]
    pub state: String,
    /// Defaults to enabled
    pub enable: Option<bool>,
    /// Products to bind; ignored for state 1003
    #[serde(default)]
    #[validate(custom(function = "validate_products"))]
    pub products: Vec<String>,
}

/// Payload for updating an account
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateAccountForm {
    /// Four digit state code
    #[validate(custom(function = "validate_state"))]
    pub state: String,
    /// Keeps the current value when absent
    pub enable: Option<bool>,
    /// The complete product set; an empty list unbinds everything
    #[serde(default)]
    #[validate(custom(function = "validate_products"))]
    pub products: Vec<String>,
}

impl AccountForm {
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }

    pub fn draft(&self) -> AccountDraft {
        AccountDraft {
            account_id: self.account_id.clone(),
            state: self.state.clone(),
            enable: self.enable.unwrap_or(true),
            products: self.products.clone(),
        }
    }
}

impl UpdateAccountForm {
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }

    pub fn draft(&self, account_id: &str, current_enable: bool) -> AccountDraft {
        AccountDraft {
            account_id: account_id.to_owned(),
            state: self.state.clone(),
            enable: self.enable.unwrap_or(current_enable),
            products: self.products.clone(),
        }
    }
}

const MAX_ID_LEN: usize = 32;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn validate_account_id(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(invalid("required", "Account ID cannot be blank."));
    }
    if value.len() > MAX_ID_LEN {
        return Err(invalid(
            "length",
            "Account ID should contain at most 32 characters.",
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid(
            "charset",
            "Account ID may only contain letters, digits, '-' and '_'.",
        ));
    }
    Ok(())
}

fn validate_state(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(invalid("required", "State cannot be blank."));
    }
    if value.len() != 4 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("format", "State must be a four digit code."));
    }
    Ok(())
}

fn validate_products(values: &[String]) -> Result<(), ValidationError> {
    for value in values {
        if value.trim().is_empty() {
            return Err(invalid("blank", "Product ID cannot be blank."));
        }
        if value.len() > MAX_ID_LEN {
            return Err(invalid(
                "length",
                "Product ID should contain at most 32 characters.",
            ));
        }
    }
    Ok(())
}
