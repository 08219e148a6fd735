//! Result of a service operation: a rendered view, a redirect, or a form to
//! show again with errors.

use std::collections::BTreeMap;
use std::fmt;

use common::{AccountDraft, ProductDto};
use serde::Serialize;
use validator::ValidationErrors;

/// Field name -> messages, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join("; ")))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                out.add(&field, message);
            }
        }
        out
    }
}

/// Where a successful mutation sends the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    View { account_id: String },
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::List => "list",
            Route::View { .. } => "view",
        }
    }

    pub fn account_id(&self) -> Option<&str> {
        match self {
            Route::List => None,
            Route::View { account_id } => Some(account_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub route: Route,
}

impl Redirect {
    pub fn to_list() -> Self {
        Self { route: Route::List }
    }

    pub fn to_view(account_id: &str) -> Self {
        Self {
            route: Route::View {
                account_id: account_id.to_owned(),
            },
        }
    }
}

/// Why a form is shown again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormErrorCause {
    Validation,
    Persistence,
}

/// Everything needed to render the form again.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub draft: AccountDraft,
    pub errors: FieldErrors,
    pub products: Vec<ProductDto>,
    pub cause: FormErrorCause,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Rendered(T),
    Redirect(Redirect),
    FormError(FormState),
}

impl<T> Outcome<T> {
    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            Outcome::Redirect(redirect) => Some(redirect),
            _ => None,
        }
    }

    pub fn form_error(&self) -> Option<&FormState> {
        match self {
            Outcome::FormError(form) => Some(form),
            _ => None,
        }
    }
}
