use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use quotesearch_core::{ErrorBody, Fulfillment};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct WebhookState {
    fulfillment: Fulfillment,
}

pub fn router(fulfillment: Fulfillment, webhook_path: &str) -> Router {
    Router::new().route(webhook_path, post(fulfill)).with_state(WebhookState { fulfillment })
}

/// Takes the raw body so an empty or non-JSON payload reaches the same
/// `{status, message}` error shape as every other validation failure.
pub async fn fulfill(
    State(state): State<WebhookState>,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<ErrorBody>)> {
    let correlation_id = Uuid::new_v4().to_string();

    match state.fulfillment.handle(&body) {
        Ok(fulfilled) => {
            info!(
                event_name = "webhook.request.fulfilled",
                correlation_id = %correlation_id,
                action = %fulfilled.request.params.action,
                dialect = ?fulfilled.request.dialect,
                found = fulfilled.found(),
                "webhook request fulfilled"
            );
            Ok(Json(fulfilled.body()))
        }
        Err(error) => {
            warn!(
                event_name = "webhook.request.rejected",
                correlation_id = %correlation_id,
                message = error.message(),
                "webhook request rejected"
            );
            let status =
                StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
            Err((status, Json(error.into_body())))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use quotesearch_core::{Fulfillment, QuoteDataset};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::router;

    const CSV: &str = r#"quote,author,year_born,year_died,bio,date_spoken,source,topics,comments
"The most dangerous phrase in the language is, 'We've always done it this way.'",Grace Hopper,1906,1992,"Grace Hopper was an American computer scientist and United States Navy rear admiral.",1976,Computerworld,"innovation, change",
"One accurate measurement is worth a thousand expert opinions.",Grace Hopper,1906,1992,,,Lecture,"mathematics, measurement",
"The Analytical Engine weaves algebraical patterns just as the Jacquard loom weaves flowers and leaves.",Ada Lovelace,1815,1852,"Ada Lovelace was an English mathematician.",1843,Notes,"mathematics,poetry",
"#;

    fn app() -> Router {
        let dataset = QuoteDataset::from_reader(CSV.as_bytes()).expect("fixture loads");
        router(Fulfillment::new(Arc::new(dataset)), "/quotesearch")
    }

    async fn post(body: Body) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/quotesearch")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .expect("request builds");
        let response = app().oneshot(request).await.expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body reads");
        let payload = serde_json::from_slice(&bytes).expect("response is json");
        (status, payload)
    }

    async fn post_json(body: Value) -> (StatusCode, Value) {
        post(Body::from(body.to_string())).await
    }

    async fn assert_bad_request(body: Body, expected: &str) {
        let (status, payload) = post(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload, json!({ "status": 400, "message": expected }));
    }

    #[tokio::test]
    async fn empty_body_is_a_bad_request() {
        assert_bad_request(Body::empty(), "No json body was provided in the request.").await;
    }

    #[tokio::test]
    async fn invalid_json_is_a_bad_request() {
        assert_bad_request(Body::from("{not json"), "Request body is not valid JSON.").await;
    }

    #[tokio::test]
    async fn missing_wrapper_is_a_bad_request() {
        assert_bad_request(
            Body::from(json!({ "irrelevant": "doesnt matter" }).to_string()),
            "Neither \"result\" nor \"queryResult\" was provided in the request body.",
        )
        .await;
    }

    #[tokio::test]
    async fn missing_and_unknown_actions_are_bad_requests() {
        assert_bad_request(
            Body::from(json!({ "result": {} }).to_string()),
            "No \"action\" was provided in the request.",
        )
        .await;
        assert_bad_request(
            Body::from(json!({ "result": { "action": "make_some_tea" } }).to_string()),
            "Request action unrecognized: \"make_some_tea\"",
        )
        .await;
    }

    #[tokio::test]
    async fn unrecognized_parameter_is_a_bad_request() {
        assert_bad_request(
            Body::from(
                json!({
                    "result": {
                        "action": "get_quote_response",
                        "parameters": { "author": "Grace Hopper", "diameter": 4 }
                    }
                })
                .to_string(),
            ),
            "Unrecognized parameter in request: diameter",
        )
        .await;
    }

    #[tokio::test]
    async fn bio_without_author_is_a_bad_request() {
        assert_bad_request(
            Body::from(json!({ "queryResult": { "action": "get_bio_response" } }).to_string()),
            "No author parameter provided in request for bio.",
        )
        .await;
    }

    #[tokio::test]
    async fn quote_response_in_dialect_one() {
        let (status, payload) = post_json(json!({
            "result": {
                "action": "get_quote_response",
                "parameters": { "auThOr": "grace hOpPer", "tOPIc": "mAthEmatIcs" }
            }
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            payload["speech"],
            "Here is a quote by Grace Hopper: One accurate measurement is worth a thousand expert opinions."
        );
        assert_eq!(payload["displayText"], payload["speech"]);
    }

    #[tokio::test]
    async fn quote_response_in_dialect_two() {
        let (status, payload) = post_json(json!({
            "queryResult": { "action": "get_quote_response", "parameters": { "topic": "poetry" } }
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        let text = payload["fulfillmentText"].as_str().expect("fulfillmentText");
        assert!(text.starts_with("Here is a quote by Ada Lovelace: "));
        assert!(payload.get("speech").is_none());
    }

    #[tokio::test]
    async fn quote_event_membership_by_topic() {
        let (status, payload) = post_json(json!({
            "result": { "action": "get_quote_event", "parameters": { "topic": "mathematics" } }
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        let event = &payload["followupEvent"];
        assert_eq!(event["name"], "respond_with_quote");
        let author = event["data"]["author"].as_str().expect("author");
        assert!(["Grace Hopper", "Ada Lovelace"].contains(&author));
    }

    #[tokio::test]
    async fn quote_event_without_match() {
        let (status, payload) = post_json(json!({
            "result": { "action": "get_quote_event", "parameters": { "author": "asdfjkjhd" } }
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload, json!({ "followupEvent": { "name": "quote_not_found", "data": {} } }));
    }

    #[tokio::test]
    async fn bio_event_in_dialect_two() {
        let (status, payload) = post_json(json!({
            "queryResult": { "action": "get_bio_event", "parameters": { "Author": "Ada Lovelace" } }
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            payload,
            json!({
                "followupEventInput": {
                    "name": "respond_with_bio",
                    "parameters": { "bio": "Ada Lovelace was an English mathematician." }
                }
            })
        );
    }

    #[tokio::test]
    async fn bio_response_without_match() {
        let (status, payload) = post_json(json!({
            "result": { "action": "get_bio_response", "parameters": { "author": "asdkfjasdf" } }
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["speech"], "I have no matching bio.");
    }
}
