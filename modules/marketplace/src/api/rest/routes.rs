//! Router assembly: every endpoint, the authentication middleware and the
//! tower-http layers.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::rest::auth::{authn_middleware, AuthState};
use crate::api::rest::{handlers, AppState};
use crate::config::ServerConfig;

pub fn build_router(state: AppState, auth_state: AuthState, cfg: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_origin(Any)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/healthz", get(handlers::health))
        .route("/api-docs/openapi.json", get(handlers::openapi_json))
        // Vendors
        .route("/vendors/register", post(handlers::vendors::register_vendor))
        .route("/vendors/me", get(handlers::vendors::my_vendor))
        .route("/vendors", get(handlers::vendors::list_vendors))
        .route(
            "/vendors/{vendor_id}/approve",
            put(handlers::vendors::set_vendor_status),
        )
        // Branches
        .route(
            "/vendors/{vendor_id}/branches",
            post(handlers::branches::create_branch).get(handlers::branches::list_branches),
        )
        .route(
            "/vendors/{vendor_id}/branches/{branch_id}",
            put(handlers::branches::update_branch).delete(handlers::branches::delete_branch),
        )
        // Menu items
        .route(
            "/vendors/{vendor_id}/branches/{branch_id}/menu",
            post(handlers::catalog::create_menu_item),
        )
        .route(
            "/vendors/{vendor_id}/branches/{branch_id}/menu/{item_id}",
            put(handlers::catalog::update_menu_item).delete(handlers::catalog::delete_menu_item),
        )
        // Offers
        .route(
            "/vendors/{vendor_id}/branches/{branch_id}/offers",
            post(handlers::catalog::create_offer),
        )
        .route(
            "/vendors/{vendor_id}/branches/{branch_id}/offers/{offer_id}",
            put(handlers::catalog::update_offer).delete(handlers::catalog::delete_offer),
        )
        // Public catalog
        .route("/branches/{branch_id}/menu", get(handlers::catalog::list_menu))
        .route(
            "/branches/{branch_id}/offers",
            get(handlers::catalog::list_offers),
        )
        // Favorites
        .route(
            "/favorites",
            post(handlers::favorites::create_favorite).get(handlers::favorites::list_favorites),
        )
        .route(
            "/favorites/{id}",
            delete(handlers::favorites::delete_favorite),
        )
        // Reviews
        .route(
            "/reviews",
            post(handlers::reviews::create_review).get(handlers::reviews::list_reviews),
        )
        .route(
            "/reviews/{id}",
            put(handlers::reviews::update_review).delete(handlers::reviews::delete_review),
        )
        .route(
            "/reviews/{id}/replies",
            post(handlers::reviews::create_reply).get(handlers::reviews::list_replies),
        )
        .route("/replies/{id}", delete(handlers::reviews::delete_reply))
        .route("/reviews/{id}/like", post(handlers::reviews::like_review))
        .layer(middleware::from_fn_with_state(auth_state, authn_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            cfg.request_timeout_secs,
        )))
        .layer(RequestBodyLimitLayer::new(
            cfg.body_limit_mb * 1024 * 1024,
        ))
        .with_state(state)
}
