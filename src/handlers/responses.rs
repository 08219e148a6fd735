//! Mapping of service results onto HTTP responses.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use common::RedirectTarget;
use serde::Serialize;
use service::{AdminError, FormErrorCause, FormState, Outcome, Redirect, Route};
use tracing::{debug, error, warn};

use crate::schemas::{ApiResponse, ErrorResponse, FormErrorResponse};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub const ACCOUNTS_PATH: &str = "/api/v1/accounts";

/// Resolved path of a redirect route
pub fn location(route: &Route) -> String {
    match route {
        Route::List => ACCOUNTS_PATH.to_string(),
        Route::View { account_id } => {
            format!("{}/{}", ACCOUNTS_PATH, urlencoding::encode(account_id))
        }
    }
}

pub fn ok<T: Serialize>(data: T, message: &str) -> Response {
    Json(ApiResponse {
        data,
        message: message.to_string(),
        success: true,
    })
    .into_response()
}

pub fn redirect(target: Redirect, message: &str) -> Response {
    let location = location(&target.route);
    debug!("Redirecting to {}", location);
    let body = ApiResponse {
        data: RedirectTarget {
            route: target.route.name().to_string(),
            account_id: target.route.account_id().map(str::to_owned),
            location: location.clone(),
        },
        message: message.to_string(),
        success: true,
    };
    (StatusCode::SEE_OTHER, [(header::LOCATION, location)], Json(body)).into_response()
}

pub fn form_error(form: FormState) -> Response {
    let (error, code) = match form.cause {
        FormErrorCause::Validation => ("Submitted account is invalid", "VALIDATION_FAILED"),
        FormErrorCause::Persistence => ("Saving the account failed", "PERSISTENCE_FAILED"),
    };
    debug!("Form rejected with {}: {}", code, form.errors);
    let body = FormErrorResponse {
        error: error.to_string(),
        code: code.to_string(),
        success: false,
        errors: form.errors.into_map(),
        draft: form.draft,
        products: form.products,
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

/// Turns a mutation outcome into a 200, 303 or 422 response.
pub fn outcome<T: Serialize>(outcome: Outcome<T>, message: &str) -> Response {
    match outcome {
        Outcome::Rendered(data) => ok(data, message),
        Outcome::Redirect(target) => redirect(target, message),
        Outcome::FormError(form) => form_error(form),
    }
}

pub fn api_error(err: AdminError) -> ApiError {
    let (status, code, message) = match &err {
        AdminError::NotFound { .. } => {
            warn!("{}", err);
            (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
        }
        AdminError::LockedState { .. } => {
            warn!("{}", err);
            (StatusCode::CONFLICT, "ACCOUNT_LOCKED", err.to_string())
        }
        AdminError::Validation(errors) => {
            warn!("Request rejected: {}", errors);
            (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", errors.to_string())
        }
        AdminError::Persistence { .. } => {
            error!("{}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_FAILED",
                "Saving the account failed".to_string(),
            )
        }
        AdminError::Database(e) => {
            error!("Database error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Internal server error".to_string(),
            )
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        }),
    )
}
