//! Filtering, sorting and paging of the account list.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Query parameters for listing accounts
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct AccountSearch {
    /// Substring of the account id
    pub account_id: Option<String>,
    /// Exact state code
    pub state: Option<String>,
    /// Enabled flag
    pub enable: Option<bool>,
    /// Sort column (`account_id`, `state`, `enable`), prefix with `-` for descending
    #[validate(custom(function = "validate_sort"))]
    pub sort: Option<String>,
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 20)
    #[validate(range(min = 1, max = 1000))]
    pub page_size: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    AccountId,
    State,
    Enable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let field = match name {
            "account_id" => SortField::AccountId,
            "state" => SortField::State,
            "enable" => SortField::Enable,
            _ => return None,
        };
        Some(Self { field, descending })
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            field: SortField::AccountId,
            descending: false,
        }
    }
}

impl AccountSearch {
    /// 1-based page
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or_default()
    }

    /// Substring filter, ignoring a blank value.
    pub fn account_id_filter(&self) -> Option<&str> {
        self.account_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn state_filter(&self) -> Option<&str> {
        self.state
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn validate_sort(value: &str) -> Result<(), ValidationError> {
    match SortOrder::parse(value) {
        Some(_) => Ok(()),
        None => {
            let mut error = ValidationError::new("sort");
            error.message = Some("sort must be one of account_id, state, enable".into());
            Err(error)
        }
    }
}
