use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::handlers::{self, protected, public};
use crate::state::AppState;

pub fn app(config: &AppConfig, state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(session_routes())
        .merge(food_routes())
        .merge(order_routes())
        .merge(community_routes())
        // Global middleware
        .layer(cors_layer(&config.security.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/jwt", post(public::session::issue))
        .route("/logout", post(public::session::logout))
}

fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/food", get(public::foods::top))
        .route("/foods", get(public::foods::list).post(public::foods::create))
        .route(
            "/foods/:id",
            get(public::foods::get).patch(public::foods::update_stock),
        )
        .route("/updateFood/:id", patch(public::foods::update))
        .route("/searchFoods", get(public::foods::search))
        .route("/foodsCount", get(public::foods::count))
        // Owner-scoped
        .route("/myFoods", get(protected::foods::mine))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        // GET is owner-scoped, POST is open
        .route("/orders", get(protected::orders::mine).post(public::orders::create))
        .route("/orders/:id", delete(public::orders::delete))
}

fn community_routes() -> Router<AppState> {
    Router::new()
        .route("/feedbacks", get(public::feedbacks::list).post(public::feedbacks::create))
        .route("/user", get(public::users::list).post(public::users::create))
}

/// Credentialed CORS restricted to the configured frontend origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
