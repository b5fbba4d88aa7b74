//! REST adapters against mock Google endpoints.

mod common;

use std::sync::Arc;

use vision_fanout::adapters::google::{VertexClient, VisionClient};
use vision_fanout::cli::commands::analyze::{self, AnalyzeArgs};
use vision_fanout::domain::models::{Feature, GoogleConfig, PredictionParams};
use vision_fanout::services::find_endpoint;
use vision_fanout::{
    AnalysisDispatcher, AnalysisError, AnalysisRequest, Analyzers, AnnotationService, Config,
    DomainError, PredictionService, SlotState,
};
use wiremock::matchers::{body_partial_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINTS_PATH: &str = "/v1/projects/test-project/locations/us-central1/endpoints";

#[tokio::test]
async fn test_annotate_sends_feature_and_parses_labels() {
    let mock_server = MockServer::start().await;

    let response_json = serde_json::json!({
        "responses": [{
            "labelAnnotations": [
                {"mid": "/m/0k4j", "description": "Car", "score": 0.98},
                {"mid": "/m/0h9mv", "description": "Tire", "score": 0.93}
            ]
        }]
    });

    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .and(query_param("key", "test-api-key"))
        .and(body_partial_json(serde_json::json!({
            "requests": [{
                "image": {"content": "AQID"},
                "features": [{"type": "LABEL_DETECTION"}]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response_json))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = VisionClient::new(&common::google_config(&mock_server.uri())).unwrap();
    let annotation = client
        .annotate(&[1, 2, 3], Feature::LabelDetection)
        .await
        .unwrap();

    assert_eq!(annotation.label_annotations.len(), 2);
    assert_eq!(annotation.label_annotations[1].description, "Tire");
}

#[tokio::test]
async fn test_annotate_keeps_embedded_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "responses": [{"error": {"code": 3, "message": "Bad image data."}}]
        })))
        .mount(&mock_server)
        .await;

    let client = VisionClient::new(&common::google_config(&mock_server.uri())).unwrap();
    let annotation = client
        .annotate(b"img", Feature::WebDetection)
        .await
        .unwrap();

    let error = annotation.error.unwrap();
    assert_eq!(error.code, 3);
    assert_eq!(error.message, "Bad image data.");
}

#[tokio::test]
async fn test_status_codes_map_to_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
        .mount(&mock_server)
        .await;

    let client = VisionClient::new(&common::google_config(&mock_server.uri())).unwrap();

    let first = client.annotate(b"img", Feature::TextDetection).await.unwrap_err();
    assert_eq!(first, AnalysisError::RateLimited("quota exceeded".into()));
    assert!(first.is_transient());

    let second = client.annotate(b"img", Feature::TextDetection).await.unwrap_err();
    assert!(matches!(second, AnalysisError::Unauthorized { status: 403, .. }));
    assert!(!second.is_transient());
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = VisionClient::new(&common::google_config(&mock_server.uri())).unwrap();
    let err = client
        .annotate(b"img", Feature::LabelDetection)
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_missing_credentials_fail_the_call() {
    temp_env::async_with_vars(
        [
            ("GOOGLE_API_KEY", None::<&str>),
            ("GOOGLE_OAUTH_ACCESS_TOKEN", None),
        ],
        async {
            let config = GoogleConfig {
                api_key: None,
                vision_base_url: "http://127.0.0.1:9".to_string(),
                ..Default::default()
            };
            let client = VisionClient::new(&config).unwrap();
            let err = client
                .annotate(b"img", Feature::LabelDetection)
                .await
                .unwrap_err();
            assert!(matches!(err, AnalysisError::MissingCredentials(_)));
        },
    )
    .await;
}

#[tokio::test]
async fn test_predict_posts_instance_and_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{ENDPOINTS_PATH}/987654:predict")))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(serde_json::json!({
            "instances": [{"content": "aGVsbG8="}],
            "parameters": {"confidenceThreshold": 0.0, "maxPredictions": 5}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "predictions": [{
                "displayNames": ["front_bumper", "hood"],
                "confidences": [0.91, 0.06],
                "ids": ["1", "2"]
            }],
            "deployedModelId": "42"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = GoogleConfig {
        api_key: None,
        access_token: Some("test-token".to_string()),
        ..common::google_config(&mock_server.uri())
    };
    let client = VertexClient::new(&config).unwrap();
    let predictions = client
        .predict("987654", "aGVsbG8=", &PredictionParams::default())
        .await
        .unwrap();

    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0].display_names, ["front_bumper", "hood"]);
}

#[tokio::test]
async fn test_predict_unknown_endpoint_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{ENDPOINTS_PATH}/404:predict")))
        .respond_with(ResponseTemplate::new(404).set_body_string("Endpoint not found"))
        .mount(&mock_server)
        .await;

    let client = VertexClient::new(&common::google_config(&mock_server.uri())).unwrap();
    let err = client
        .predict("404", "AA==", &PredictionParams::default())
        .await
        .unwrap_err();
    assert_eq!(err, AnalysisError::NotFound("Endpoint not found".into()));
}

#[tokio::test]
async fn test_endpoint_lookup_follows_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINTS_PATH))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "endpoints": [{
                "name": "projects/123/locations/us-central1/endpoints/555",
                "displayName": "car-images-damage-detection-endpoint"
            }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(ENDPOINTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "endpoints": [{
                "name": "projects/123/locations/us-central1/endpoints/111",
                "displayName": "something-else"
            }],
            "nextPageToken": "page-2"
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    let client = VertexClient::new(&common::google_config(&mock_server.uri())).unwrap();
    let endpoint = find_endpoint(&client, "car-images-damage-detection-endpoint")
        .await
        .unwrap();

    assert_eq!(endpoint.id(), "555");
    assert_eq!(endpoint.region(), Some("us-central1"));
}

#[tokio::test]
async fn test_endpoint_lookup_without_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let client = VertexClient::new(&common::google_config(&mock_server.uri())).unwrap();
    let err = find_endpoint(&client, "car-images-damage-detection-endpoint")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::EndpointNotFound(_)));
}

fn mock_backed_config(base_url: &str) -> Config {
    Config {
        google: common::google_config(base_url),
        classification: common::classification_config(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_unmatched_endpoint_fails_only_classification() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "endpoints": [{
                "name": "projects/123/locations/us-central1/endpoints/111",
                "displayName": "something-else"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"responses": [{}]})),
        )
        .expect(4)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(":predict$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = mock_backed_config(&mock_server.uri());
    let vision = Arc::new(VisionClient::new(&config.google).unwrap());
    let vertex = Arc::new(VertexClient::new(&config.google).unwrap());

    let endpoint_id = analyze::resolve_endpoint_id(&config, &vertex).await;
    assert!(endpoint_id.is_empty());

    let (_dir, image) = common::png_file(32, 24);
    let analyzers = Analyzers::standard(vision, vertex, endpoint_id, &config.classification);
    let outcome = AnalysisDispatcher::new(analyzers, &config.dispatch)
        .dispatch(AnalysisRequest::from_path(&image))
        .await
        .unwrap();

    assert!(matches!(
        outcome.classification,
        SlotState::Failed(AnalysisError::InvalidRequest(_))
    ));
    assert!(outcome.labels.is_value());
    assert!(outcome.landmarks.is_value());
    assert_eq!(outcome.text, SlotState::Value("None found".to_string()));
    assert_eq!(outcome.similar_images, SlotState::Value(Vec::new()));
    assert!(outcome.web_description.is_value());
    assert_eq!(outcome.succeeded(), 5);
}

#[tokio::test]
async fn test_analyze_rejects_missing_image_before_endpoint_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let args = AnalyzeArgs {
        image: dir.path().join("missing.png"),
        endpoint_id: None,
    };

    let err = analyze::execute(args, &mock_backed_config(&mock_server.uri()), true)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::ImageUnresolvable(_))
    ));
}
