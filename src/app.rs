use std::any::Any;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::{self, SecurityConfig};
use crate::database::SharedStore;
use crate::error::ApiError;
use crate::handlers;
use crate::middleware::{require_admin, require_session};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

/// Full HTTP surface with global layers applied
pub fn app(state: AppState) -> Router {
    let config = config::config();

    let router = Router::new()
        // Public
        .merge(health_routes())
        .merge(auth_public_routes())
        .merge(catalog_routes())
        // Session required
        .merge(auth_routes(&state))
        .merge(user_routes(&state))
        .merge(lms_routes(&state))
        // Admin role required
        .merge(admin_routes(&state))
        .fallback(route_not_found)
        .with_state(state);

    let router = router.layer(
        // ServiceBuilder layers are called top to bottom
        ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(cors_layer(&config.security))
            .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes)),
    );

    if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn health_routes() -> Router<AppState> {
    use handlers::public::health;

    Router::new()
        .route("/health", get(health::health))
        .route("/api/health", get(health::health))
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
}

fn catalog_routes() -> Router<AppState> {
    use handlers::public::courses;

    Router::new()
        .route("/api/courses", get(courses::list_courses))
        .route("/api/courses/:slug", get(courses::get_course))
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::auth;

    Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
}

fn user_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::users;

    Router::new()
        .route("/api/users/me", get(users::get_profile).put(users::update_profile))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
}

fn lms_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::lms;

    Router::new()
        .route("/api/lms/enroll", post(lms::enroll))
        .route("/api/lms/enroll/:course_id", delete(lms::unenroll))
        .route("/api/enroll/:course_id", post(lms::enroll_by_path))
        .route("/api/lms/my-courses", get(lms::my_courses))
        .route("/api/lms/course/:course_id/modules", get(lms::course_modules))
        .route("/api/lms/module/:module_id/lessons", get(lms::module_lessons))
        .route("/api/lms/module/:module_id/assignments", get(lms::module_assignments))
        .route("/api/lms/module/:module_id/notes", get(lms::module_notes))
        .route("/api/lms/progress", post(lms::post_progress))
        .route("/api/lms/progress/:course_id", get(lms::course_progress))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    use handlers::elevated::admin::{courses, curriculum};

    Router::new()
        // Catalog
        .route("/api/admin/courses", get(courses::list_courses).post(courses::create_course))
        .route(
            "/api/admin/courses/:id",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
        // Curriculum: POST creates, GET /:parentId lists
        .route("/api/admin/modules", post(curriculum::create_module))
        .route("/api/admin/modules/:course_id", get(curriculum::list_modules))
        .route("/api/admin/lessons", post(curriculum::create_lesson))
        .route("/api/admin/lessons/:module_id", get(curriculum::list_lessons))
        .route("/api/admin/assignments", post(curriculum::create_assignment))
        .route("/api/admin/assignments/:module_id", get(curriculum::list_assignments))
        .route("/api/admin/notes", post(curriculum::create_note))
        .route("/api/admin/notes/:module_id", get(curriculum::list_notes))
        // Router layers run bottom to top: session first, then the role check
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
}

/// Credentialed CORS for the configured frontend origins
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::AUTHORIZATION, header::ORIGIN])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);
    ApiError::internal_server_error("Server error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_skips_invalid_origins() {
        let mut security = config::config().security.clone();
        security.cors_origins = vec!["http://localhost:5173".into(), "bad\norigin".into()];
        // builds without panicking even with credentials enabled
        let _layer = cors_layer(&security);
    }
}
