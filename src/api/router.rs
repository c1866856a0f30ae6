//! Route table for the records service.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Application routes are nested under `/api/`; the landing page sits at
//! the root and unknown paths land on the error page.

use axum::routing::{get, post, put};
use axum::Router;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the full router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/auth/register", post(endpoints::auth::register))
        .route("/auth/login", post(endpoints::auth::login))
        .route("/auth/logout", post(endpoints::auth::logout))
        .route("/auth/verify-code", post(endpoints::auth::verify_code))
        .route("/auth/forgot-password", post(endpoints::auth::forgot_password))
        .route("/auth/verify-reset-code", post(endpoints::auth::verify_reset_code))
        .route("/auth/reset-password", post(endpoints::auth::reset_password))
        .route("/auth/profile", put(endpoints::auth::update_profile))
        .route("/home", get(endpoints::home::dashboard))
        .route("/predict", post(endpoints::prediction::predict))
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route(
            "/patients/:id",
            get(endpoints::patients::detail).delete(endpoints::patients::delete),
        )
        .route("/patients/:id/visits", post(endpoints::visits::create))
        .route("/patients/:id/analyses", post(endpoints::analyses::create))
        .route("/patients/:id/history", get(endpoints::visits::history))
        .route("/resources", get(endpoints::catalog::resources))
        .route("/news", get(endpoints::catalog::news))
        .with_state(ctx);

    Router::new()
        .route("/", get(endpoints::home::welcome))
        .nest("/api", api)
        .fallback(endpoints::home::not_found)
}
