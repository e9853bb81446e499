use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use rehab_course_composer::api::courses::CourseAppState;
use rehab_course_composer::api::routes::create_routes;
use rehab_course_composer::config::demo_catalog;
use rehab_course_composer::config::seeding::{KNEE, LOWER_BACK};
use rehab_course_composer::services::CourseComposerService;

#[cfg(test)]
mod api_integration_tests {
    use super::*;

    /// Router over the demo catalog without a database
    fn create_test_app() -> Router {
        let composer = CourseComposerService::new(Arc::new(demo_catalog()));
        create_routes(CourseAppState::new(composer, None))
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn compose_body() -> Value {
        json!({
            "bodyParts": [
                { "bodyPartId": LOWER_BACK, "bodyPartName": "허리", "painLevel": 3 },
                { "bodyPartId": KNEE, "bodyPartName": "무릎", "painLevel": 2 }
            ],
            "painLevel": 3,
            "equipmentAvailable": ["매트"],
            "experienceLevel": "weekly_1_2",
            "totalDurationMinutes": 60
        })
    }

    #[tokio::test]
    async fn test_health_check_endpoint() {
        let app = create_test_app();

        let request = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );

        let json_response = read_json(response).await;
        assert_eq!(json_response["status"], "healthy");
        assert_eq!(json_response["service"], "rehab-course-composer");
    }

    #[tokio::test]
    async fn test_compose_endpoint() {
        println!("🧪 Testing course composition endpoint...");
        let app = create_test_app();

        let response = app
            .oneshot(json_request(Method::POST, "/api/courses/compose", compose_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let course = read_json(response).await;
        let exercises = course["exercises"].as_array().unwrap();
        assert!(!exercises.is_empty());
        assert!(course["totalDurationMinutes"].as_u64().unwrap() <= 60);
        assert_eq!(course["difficulty"]["targetLevel"], "adaptation");
        assert_eq!(course["sections"]["main"]["budgetMinutes"], 40);
        assert!(course["warnings"].is_array());

        let first = &exercises[0];
        assert_eq!(first["section"], "warmup");
        assert_eq!(first["orderInSection"], 1);
        assert!(first.get("cooldownTagged").is_none());

        println!("✅ Compose endpoint test passed!");
    }

    #[tokio::test]
    async fn test_compose_rejects_invalid_requests() {
        let app = create_test_app();

        let no_body_parts = json!({ "bodyParts": [], "painLevel": 3 });
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/courses/compose", no_body_parts))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = read_json(response).await;
        assert_eq!(error["error"], "Invalid course request");

        let mut bad_duration = compose_body();
        bad_duration["totalDurationMinutes"] = json!(45);
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/courses/compose", bad_duration))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut bad_pain = compose_body();
        bad_pain["bodyParts"][0]["painLevel"] = json!(9);
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/courses/compose", bad_pain))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let missing_pain = json!({ "bodyParts": [] });
        let response = app
            .oneshot(json_request(Method::POST, "/api/courses/compose", missing_pain))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_difficulty_preview_endpoint() {
        let app = create_test_app();

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/courses/difficulty?experienceLevel=advanced&painLevel=4")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let preview = read_json(response).await;
        assert_eq!(preview["targetLevel"], "adaptation");
        assert_eq!(preview["allowedRange"]["max"], 7);
        assert_eq!(preview["ratio"]["principle"], 50);

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/courses/difficulty?painLevel=0")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_save_without_database_is_unavailable() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/courses/compose", compose_body()))
            .await
            .unwrap();
        let course = read_json(response).await;

        let save = json!({
            "userId": uuid::Uuid::new_v4(),
            "totalDurationMinutes": 60,
            "painLevel": 3,
            "bodyParts": ["허리", "무릎"],
            "equipmentAvailable": ["매트"],
            "exercises": course["exercises"].clone()
        });
        let response = app
            .oneshot(json_request(Method::POST, "/api/courses/save", save))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let error = read_json(response).await;
        assert_eq!(error["error"], "Persistence unavailable");
    }
}
