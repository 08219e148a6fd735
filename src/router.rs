use crate::handlers::{
    accounts::{
        create_account, create_form, delete_account, delete_accounts, disable_account,
        enable_account, list_accounts, update_account, update_form, view_account,
    },
    health::health_check,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;

    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Account administration
        .route(
            "/api/v1/accounts",
            get(list_accounts).post(create_account).delete(delete_accounts),
        )
        .route(
            "/api/v1/accounts/:account_id",
            get(view_account).put(update_account).delete(delete_account),
        )
        .route("/api/v1/accounts/:account_id/enable", post(enable_account))
        .route("/api/v1/accounts/:account_id/disable", post(disable_account))
        // Form data
        .route("/api/v1/forms/accounts", get(create_form))
        .route("/api/v1/forms/accounts/:account_id", get(update_form))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // The recorder is process global, so tests run without it
    #[cfg(not(test))]
    let router = {
        let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();
        router
            .route("/metrics", get(move || async move { metric_handle.render() }))
            .layer(prometheus_layer)
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
