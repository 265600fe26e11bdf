//! HTTP router configuration

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api::{assays, studies, system};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the application router
///
/// Resource routes answer with and without a trailing slash.
pub fn create_router(state: Arc<AppState>) -> Router {
    let study_list = get(studies::list_studies).post(studies::create_study);
    let study_detail = get(studies::get_study)
        .put(studies::replace_study)
        .patch(studies::update_study)
        .delete(studies::delete_study);
    let assay_list = get(assays::list_assays).post(assays::create_assay);
    let assay_detail = get(assays::get_assay)
        .put(assays::replace_assay)
        .patch(assays::update_assay)
        .delete(assays::delete_assay);

    Router::new()
        // System endpoints
        .route("/health", get(system::health))
        // Studies
        .route("/studies", study_list.clone())
        .route("/studies/", study_list)
        .route("/studies/{id}", study_detail.clone())
        .route("/studies/{id}/", study_detail)
        // Assays
        .route("/assays", assay_list.clone())
        .route("/assays/", assay_list)
        .route("/assays/{id}", assay_detail.clone())
        .route("/assays/{id}/", assay_detail)
        // API docs
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use studyhub_core::{NewAssay, NewStudy, Store};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    async fn test_app(config: &Config) -> (Router, Store) {
        let store = Store::in_memory().await.unwrap();
        store.migrate().await.unwrap();
        let state = Arc::new(AppState::new(store.clone(), config));
        (create_router(state), store)
    }

    async fn seed_studies(store: &Store, count: usize) {
        for i in 1..=count {
            store
                .create_study(NewStudy {
                    title: format!("Study {i}"),
                    description: format!("Description {i}"),
                })
                .await
                .unwrap();
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_page_of_studies() {
        let (app, store) = test_app(&Config::default()).await;
        seed_studies(&store, 150).await;

        let (status, body) = send(app, get_request("/studies/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 100);
        assert_eq!(body["data"][0]["title"], "Study 1");
        assert_eq!(body["paging"]["page"], 1);
        assert_eq!(body["paging"]["items"], 100);
        assert_eq!(body["paging"]["total_items"], 150);
        assert_eq!(body["paging"]["total_pages"], 2);
        assert_eq!(
            body["paging"]["links"]["next"],
            "http://localhost/studies/?page=2"
        );
        assert!(body["paging"]["links"]["previous"].is_null());
        assert!(body["paging"]["links"]["first"].is_null());
        assert!(body["paging"]["links"]["last"].is_null());
        assert!(body.get("errors").is_none());
        assert!(body.get("object").is_none());
    }

    #[tokio::test]
    async fn test_last_page_links_back_without_page_param() {
        let (app, store) = test_app(&Config::default()).await;
        seed_studies(&store, 150).await;

        let request = Request::builder()
            .uri("/studies/?page=last")
            .header(header::HOST, "studyhub.test")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 50);
        assert_eq!(body["paging"]["page"], 2);
        assert_eq!(body["paging"]["items"], 50);
        assert!(body["paging"]["links"]["next"].is_null());
        assert_eq!(
            body["paging"]["links"]["previous"],
            "http://studyhub.test/studies/"
        );
    }

    #[tokio::test]
    async fn test_page_size_is_clamped_and_kept_in_links() {
        let (app, store) = test_app(&Config::default()).await;
        seed_studies(&store, 5).await;

        let (status, body) = send(app, get_request("/studies/?page_size=2&page=2")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["title"], "Study 3");
        assert_eq!(body["paging"]["total_pages"], 3);
        assert_eq!(
            body["paging"]["links"]["next"],
            "http://localhost/studies/?page=3&page_size=2"
        );
        assert_eq!(
            body["paging"]["links"]["previous"],
            "http://localhost/studies/?page_size=2"
        );
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_not_found() {
        let (app, store) = test_app(&Config::default()).await;
        seed_studies(&store, 3).await;

        let (status, body) = send(app, get_request("/studies/?page=9")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["message"], "Invalid page.");
        assert_eq!(body["errors"][0]["num_code"], 404);
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_repeated_page_param_uses_last_value() {
        let (app, store) = test_app(&Config::default()).await;
        seed_studies(&store, 3).await;

        let (status, body) = send(app, get_request("/studies/?page_size=1&page=1&page=2")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["paging"]["page"], 2);
        assert_eq!(body["data"][0]["title"], "Study 2");
        assert_eq!(
            body["paging"]["links"]["next"],
            "http://localhost/studies/?page=3&page_size=1"
        );
    }

    #[tokio::test]
    async fn test_empty_page_param_is_invalid() {
        let (app, store) = test_app(&Config::default()).await;
        seed_studies(&store, 3).await;

        let (status, body) = send(app, get_request("/studies/?page=")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["message"], "Invalid page.");
    }

    #[tokio::test]
    async fn test_links_follow_forwarded_proto() {
        let (app, store) = test_app(&Config::default()).await;
        seed_studies(&store, 150).await;

        let request = Request::builder()
            .uri("/studies/")
            .header(header::HOST, "studyhub.test")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["paging"]["links"]["next"],
            "https://studyhub.test/studies/?page=2"
        );
    }

    #[tokio::test]
    async fn test_empty_collection_is_one_page() {
        let (app, _store) = test_app(&Config::default()).await;

        let (status, body) = send(app, get_request("/assays/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["paging"]["total_pages"], 1);
        assert_eq!(body["paging"]["total_items"], 0);
        assert_eq!(body["paging"]["items"], 0);
    }

    #[tokio::test]
    async fn test_retrieve_study_nests_assays() {
        let (app, store) = test_app(&Config::default()).await;
        let study = store
            .create_study(NewStudy {
                title: "Sleep".to_string(),
                description: "Overnight".to_string(),
            })
            .await
            .unwrap();
        for kind in ["EEG", "ECG"] {
            store
                .create_assay(NewAssay {
                    measurement_type: kind.to_string(),
                    study_id: study.study.id,
                })
                .await
                .unwrap();
        }

        let (status, body) = send(app, get_request("/studies/1/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["object"]["id"], 1);
        assert_eq!(body["object"]["title"], "Sleep");
        let assays = body["object"]["assays"].as_array().unwrap();
        assert_eq!(assays.len(), 2);
        assert_eq!(assays[0]["measurement_type"], "EEG");
        assert_eq!(assays[0]["study"], 1);
        assert!(body.get("paging").is_none());
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let (app, _store) = test_app(&Config::default()).await;

        let (status, body) = send(app.clone(), get_request("/studies/42/")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], "not_found");

        let (status, _) = send(app, get_request("/assays/abc/")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_and_validate_assay() {
        let (app, _store) = test_app(&Config::default()).await;

        let (status, body) = send(
            app.clone(),
            json_request(
                "POST",
                "/studies/",
                &json!({"title": "Diet", "description": "Two weeks"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
        assert_eq!(body["assays"], json!([]));

        let (status, body) = send(
            app.clone(),
            json_request(
                "POST",
                "/assays/",
                &json!({"measurement_type": "glucose", "study": 99}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "invalid");

        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/assays/",
                &json!({"measurement_type": "glucose", "study": 1}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"id": 1, "measurement_type": "glucose", "study": 1}));
    }

    #[tokio::test]
    async fn test_missing_and_null_fields_are_reported_per_field() {
        let (app, store) = test_app(&Config::default()).await;
        seed_studies(&store, 1).await;

        let (status, body) = send(
            app.clone(),
            json_request("POST", "/studies/", &json!({"description": null})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["message"], "title: This field is required.");
        assert_eq!(
            body["errors"][1]["message"],
            "description: This field may not be null."
        );
        assert_eq!(body["errors"][1]["code"], "invalid");

        let (status, body) = send(
            app.clone(),
            json_request("PATCH", "/studies/1/", &json!({"title": null})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["message"], "title: This field may not be null.");

        let (status, _) = send(app, json_request("PUT", "/studies/9/", &json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let (app, _store) = test_app(&Config::default()).await;

        let request = Request::builder()
            .method("POST")
            .uri("/studies/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "parse_error");
    }

    #[tokio::test]
    async fn test_patch_then_delete_study() {
        let (app, store) = test_app(&Config::default()).await;
        seed_studies(&store, 1).await;

        let (status, body) = send(
            app.clone(),
            json_request("PATCH", "/studies/1/", &json!({"title": "Renamed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Renamed");
        assert_eq!(body["description"], "Description 1");

        let request = Request::builder()
            .method("DELETE")
            .uri("/studies/1/")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (status, _) = send(app, get_request("/studies/1/")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_disabled_pagination_returns_everything() {
        let mut config = Config::default();
        config.pagination.enabled = false;
        let (app, store) = test_app(&config).await;
        seed_studies(&store, 120).await;

        let (status, body) = send(app, get_request("/studies")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 120);
        assert!(body.get("paging").is_none());
    }

    #[tokio::test]
    async fn test_health_and_openapi() {
        let (app, _store) = test_app(&Config::default()).await;

        let (status, body) = send(app.clone(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(app, get_request("/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/studies/").is_some());
        assert!(body["paths"].get("/assays/{id}/").is_some());
    }
}
