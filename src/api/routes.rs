use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use super::courses::{course_routes, CourseAppState};
use super::health::health_check;

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn security_headers_layer() -> SetResponseHeaderLayer<axum::http::HeaderValue> {
    SetResponseHeaderLayer::overriding(
        axum::http::header::X_CONTENT_TYPE_OPTIONS,
        axum::http::HeaderValue::from_static("nosniff"),
    )
}

pub fn create_routes(state: CourseAppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/courses", course_routes(state))
        .layer(security_headers_layer())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
