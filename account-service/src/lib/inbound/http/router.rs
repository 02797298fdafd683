use std::sync::Arc;
use std::time::Duration;

use auth::TokenService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::cookies::CookieSettings;
use super::handlers::delete_me::delete_me;
use super::handlers::delete_user::delete_user;
use super::handlers::get_me::get_me;
use super::handlers::get_user::get_user;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::signup::signup;
use super::handlers::update_me::update_me;
use super::handlers::update_password::update_password;
use super::handlers::update_user::update_user;
use super::middleware::protect;
use super::middleware::restrict_to;
use super::middleware::AccessPolicy;
use crate::domain::user::models::Role;
use crate::domain::user::ports::AccountServicePort;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub token_service: Arc<TokenService>,
    pub cookies: CookieSettings,
}

pub fn create_router(
    account_service: Arc<dyn AccountServicePort>,
    token_service: Arc<TokenService>,
    cookies: CookieSettings,
) -> Router {
    let state = AppState {
        account_service,
        token_service,
        cookies,
    };

    let public_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", get(logout));

    let protected_routes = Router::new()
        .route("/updatePassword", patch(update_password))
        .route("/me", get(get_me))
        .route("/updateMe", patch(update_me))
        .route("/deleteMe", delete(delete_me))
        .route_layer(middleware::from_fn_with_state(state.clone(), protect));

    // Layers run outermost-last: `protect` resolves the caller before the role gate.
    let admin_routes = Router::new()
        .route("/:id", get(get_user).patch(update_user).delete(delete_user))
        .route_layer(middleware::from_fn_with_state(
            AccessPolicy::new([Role::Admin]),
            restrict_to,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), protect));

    let user_routes = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .nest("/api/users", user_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
