use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::Json;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::comparison::router::{comparison_router, score_handler, ScoreRequest};

fn json_request(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&payload).expect("payload serializes"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn score_handler_reports_breakdown_and_tier() {
    let request = ScoreRequest {
        tool: curated_tool(
            "atlas",
            &[("reporting", "Reporting", 5), ("security", "Security", 2)],
        ),
        criteria: vec![
            criterion("reporting", "Reporting", 4),
            criterion("security", "Security", 4),
        ],
    };

    let response = score_handler(State(Arc::new(engine())), Json(request)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["tool_id"], "atlas");
    assert_eq!(payload["score"], 6.0);
    assert_eq!(payload["tier"], "middle");
    assert_eq!(payload["breakdown"]["contributions"][1]["source"], "criterion_id");
}

#[tokio::test]
async fn filter_route_accepts_frontend_payloads() {
    let router = comparison_router(Arc::new(engine()));
    let payload = json!({
        "tools": [
            { "id": "atlas", "name": "Atlas", "tags": [
                { "id": "1", "name": "Agile", "tag_type": { "name": "Methodology" } }
            ] },
            { "id": "beacon", "name": "Beacon", "methodologies": ["Waterfall"] }
        ],
        "conditions": [
            { "id": "c1", "type": "Methodology", "value": "Agile" },
            { "id": "c2", "type": "Criteria", "value": "security" }
        ],
        "mode": "AND"
    });

    let response = router
        .oneshot(json_request("/api/v1/comparison/filter", payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["tools"][0]["id"], "atlas");
}

#[tokio::test]
async fn rank_route_defaults_criteria_and_orders_results() {
    let router = comparison_router(Arc::new(engine()));
    let payload = json!({
        "tools": [
            { "id": "weak", "name": "Weak", "ratings": { "scalability": 1 } },
            { "id": "strong", "name": "Strong", "ratings": {
                "scalability": 5, "integrations": 4, "Ease of Use": 4, "flexibility": 3,
                "ppm_features": 5, "Reporting": 4, "security": 3
            } }
        ]
    });

    let response = router
        .oneshot(json_request("/api/v1/comparison/rank", payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["evaluated"], 2);
    assert_eq!(body["results"][0]["tool_id"], "strong");
    assert_eq!(body["results"][0]["score"], 10.0);
    assert_eq!(body["results"][0]["tier"], "best");
    assert_eq!(body["results"][1]["tool_id"], "weak");
    assert!(body["generated_at"].is_string());
}

#[tokio::test]
async fn default_criteria_route_lists_wizard_defaults() {
    let router = comparison_router(Arc::new(engine()));

    let response = router
        .oneshot(
            Request::get("/api/v1/comparison/criteria/defaults")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let criteria = body.as_array().expect("array body");
    assert_eq!(criteria.len(), 7);
    assert_eq!(criteria[2]["id"], "easeOfUse");
    assert_eq!(criteria[2]["userRating"], 3);
}

#[tokio::test]
async fn malformed_payloads_are_rejected_by_the_extractor() {
    let router = comparison_router(Arc::new(engine()));

    let response = router
        .oneshot(json_request("/api/v1/comparison/score", json!({ "tool": 42 })))
        .await
        .expect("route executes");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn rank_route_scores_tools_with_misshapen_ratings_as_unrated() {
    let router = comparison_router(Arc::new(engine()));
    let payload = json!({
        "tools": [
            { "id": "good", "name": "Good", "ratings": { "security": 5 } },
            { "id": "bad", "name": "Bad", "ratings": [5], "criteria": { "security": 5 } }
        ],
        "criteria": [
            { "id": "security", "name": "Security", "userRating": 4 }
        ]
    });

    let response = router
        .oneshot(json_request("/api/v1/comparison/rank", payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["evaluated"], 2);
    assert_eq!(body["results"][0]["tool_id"], "good");
    assert_eq!(body["results"][0]["score"], 10.0);
    assert_eq!(body["results"][1]["tool_id"], "bad");
    assert_eq!(body["results"][1]["score"], 0.0);
}
