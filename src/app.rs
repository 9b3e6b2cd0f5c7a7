use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::database::{Menu, MenuOption, Resource};
use crate::handlers::{menu_options, menus, resource};
use crate::middleware::{handle_validation_error, jwt_auth_middleware, validate_input_middleware, InputRules};
use crate::state::AppState;

/// The complete HTTP surface, ready to serve.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(resource_routes::<Menu>("/api/menus", menus::update_rules(), &state))
        .merge(resource_routes::<MenuOption>("/api/menu-options", menu_options::update_rules(), &state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST {base}/get`, `GET {base}/:id` and the protected `PUT {base}/:id`.
fn resource_routes<R: Resource>(base: &str, rules: InputRules, state: &AppState) -> Router<AppState> {
    // Outermost layer runs first: authenticate, validate, then reject.
    let update = put(resource::update::<R>)
        .layer(middleware::from_fn(handle_validation_error))
        .layer(middleware::from_fn_with_state(rules, validate_input_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route(&format!("{}/get", base), post(resource::list::<R>))
        .route(&format!("{}/:id", base), get(resource::show::<R>).merge(update))
}

pub fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Menu API",
            "version": version,
            "description": "Menus and menu options with allow-listed querying",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "menus": "POST /api/menus/get, GET /api/menus/:id (public), PUT /api/menus/:id (protected)",
                "menu_options": "POST /api/menu-options/get, GET /api/menu-options/:id (public), PUT /api/menu-options/:id (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match tokio::try_join!(state.menus.ping(), state.menu_options.ping()) {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": true,
                    "message": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
