use pretty_assertions::assert_eq;
use pulse_engine::{
    build_client, verify_alignment, HttpSentimentClient, PipelineConfig, PipelineError,
    RawComment, ScoredText, Sentiment, SentimentPrediction, SentimentScorer,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn comment(text: &str, timestamp: &str) -> RawComment {
    RawComment {
        text: text.to_string(),
        timestamp: timestamp.to_string(),
        author_id: "author".to_string(),
    }
}

fn client_for(server: &MockServer) -> HttpSentimentClient {
    let config = PipelineConfig {
        api_base_url: server.uri(),
        ..PipelineConfig::default()
    };
    HttpSentimentClient::new(build_client(&config).unwrap(), &config)
}

#[tokio::test]
async fn predictions_keep_request_order() {
    pulse_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict_with_timestamps"))
        .and(body_json(json!({
            "comments": [
                { "text": "love it", "timestamp": "t1", "authorId": "author" },
                { "text": "meh", "timestamp": "t2", "authorId": "author" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "comment": "love it", "sentiment": "1", "timestamp": "t1" },
            { "comment": "meh", "sentiment": "0", "timestamp": "t2" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let comments = vec![comment("love it", "t1"), comment("meh", "t2")];
    let predictions = client_for(&server)
        .predict_with_timestamps(&comments)
        .await
        .unwrap();

    assert_eq!(
        predictions,
        vec![
            SentimentPrediction {
                comment: "love it".to_string(),
                sentiment: Sentiment::Positive,
                timestamp: "t1".to_string(),
            },
            SentimentPrediction {
                comment: "meh".to_string(),
                sentiment: Sentiment::Neutral,
                timestamp: "t2".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn service_detail_becomes_the_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict_with_timestamps"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "detail": "Prediction failed: model offline" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .predict_with_timestamps(&[comment("x", "t")])
        .await
        .unwrap_err();

    assert_eq!(
        err,
        PipelineError::ScoringService {
            message: "Prediction failed: model offline".to_string(),
        }
    );
}

#[tokio::test]
async fn missing_detail_uses_fallback_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .predict_with_timestamps(&[comment("x", "t")])
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Backend sentiment analysis failed");
}

#[tokio::test]
async fn short_response_is_a_scoring_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "comment": "a", "sentiment": "1", "timestamp": "t" }
        ])))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .predict_with_timestamps(&[comment("a", "t"), comment("b", "t")])
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ScoringService { .. }));
}

#[tokio::test]
async fn unknown_label_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "comment": "a", "sentiment": "2", "timestamp": "t" }
        ])))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .predict_with_timestamps(&[comment("a", "t")])
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ScoringService { .. }));
}

#[tokio::test]
async fn plain_predict_accepts_integer_labels() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({ "comments": ["great", "awful"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "comment": "great", "sentiment": 1 },
            { "comment": "awful", "sentiment": -1 }
        ])))
        .mount(&server)
        .await;

    let scored = client_for(&server)
        .predict(&["great".to_string(), "awful".to_string()])
        .await
        .unwrap();

    assert_eq!(
        scored,
        vec![
            ScoredText {
                comment: "great".to_string(),
                sentiment: Sentiment::Positive,
            },
            ScoredText {
                comment: "awful".to_string(),
                sentiment: Sentiment::Negative,
            },
        ]
    );
}

#[tokio::test]
async fn health_returns_welcome_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Welcome to the sentiment API" })),
        )
        .mount(&server)
        .await;

    let message = client_for(&server).health().await.unwrap();
    assert_eq!(message, "Welcome to the sentiment API");
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    let config = PipelineConfig {
        api_base_url: "http://127.0.0.1:9".to_string(),
        ..PipelineConfig::default()
    };
    let client = HttpSentimentClient::new(build_client(&config).unwrap(), &config);

    let err = client
        .predict_with_timestamps(&[comment("a", "t")])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Network { .. } | PipelineError::Timeout { .. }
    ));
}

#[test]
fn alignment_checks_echoed_text() {
    let comments = vec![comment("a", "t"), comment("b", "t")];
    let swapped = vec![
        SentimentPrediction {
            comment: "b".to_string(),
            sentiment: Sentiment::Positive,
            timestamp: "t".to_string(),
        },
        SentimentPrediction {
            comment: "a".to_string(),
            sentiment: Sentiment::Negative,
            timestamp: "t".to_string(),
        },
    ];

    assert!(verify_alignment(&comments, &swapped).is_err());
    assert!(verify_alignment(&comments, &swapped[..1]).is_err());
}

#[test]
fn wire_labels_serialize_as_strings() {
    assert_eq!(
        serde_json::to_value(Sentiment::Negative).unwrap(),
        json!("-1")
    );
}
