use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    extract::{Request, State},
    http::{
        header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
        Method, StatusCode,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::SmartIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::Claims;
use crate::error::AppError;
use crate::gql::AppSchema;
use crate::middleware::jwt::jwt_middleware;
use crate::routes::token;
use crate::state::AppState;

/// Build the Axum router: health probe, session endpoints and GraphQL.
pub fn build_router(state: AppState, schema: AppSchema) -> anyhow::Result<Router> {
    // Rate limiting: ~10 requests per minute per client IP on session endpoints
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(6)
        .burst_size(10)
        .finish()
        .context("invalid rate limit configuration")?;

    let session_routes = Router::new()
        .route("/auth/refresh", post(token::refresh_handler))
        .route("/auth/logout", post(token::logout_handler))
        .layer(GovernorLayer::new(Arc::new(governor_conf)));

    // Bearer tokens only matter to GraphQL. The session routes must keep
    // working with an expired access token.
    let graphql_routes = Router::new()
        .route(
            "/graphql",
            post(move |state, req| graphql_handler(state, req, schema)),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_middleware));

    let router = Router::new()
        .route("/health", get(health))
        .merge(session_routes)
        .merge(graphql_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer());

    Ok(router)
}

fn cors_layer() -> CorsLayer {
    let allowed_origins = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:3001".to_string());

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|o| o.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}

/// GraphQL handler that forwards the session claims (set by the JWT
/// middleware) into the resolver context and copies resolver-set headers
/// such as `Set-Cookie` onto the HTTP response.
async fn graphql_handler(
    State(state): State<AppState>,
    req: Request,
    schema: AppSchema,
) -> Result<Response, AppError> {
    let claims = req.extensions().get::<Claims>().cloned();

    let (_parts, body) = req.into_parts();
    let body_bytes = axum::body::to_bytes(body, 2 * 1024 * 1024)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read request body: {}", e)))?;

    let gql_request: async_graphql::Request = serde_json::from_slice(&body_bytes)
        .map_err(|e| AppError::BadRequest(format!("Invalid GraphQL request: {}", e)))?;

    let mut gql_request = gql_request.data(state);
    if let Some(claims) = claims {
        gql_request = gql_request.data(claims);
    }

    let mut gql_response = schema.execute(gql_request).await;
    let headers = std::mem::take(&mut gql_response.http_headers);

    let mut response = Json(gql_response).into_response();
    for (name, value) in headers.iter() {
        response.headers_mut().append(name.clone(), value.clone());
    }

    Ok(response)
}

/// Liveness + quick DB probe.
async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    infra::db::ping(&state.db).await?;
    Ok("ok")
}
