//! Partner application endpoint.

use crate::{
    error::AppError,
    models::partner::{PartnerRequest, PartnerResponse},
    state::AppState,
};
use axum::{Json, extract::State};
use validator::Validate;

/// File a partner application in Notion.
///
/// # Endpoint
///
/// `POST /api/partner`
///
/// # Response
///
/// - **Success (200 OK)**: `{"success": true, "message": "Partner application received"}`
/// - **Error (400)**: empty name or company, invalid e-mail
/// - **Error (500)**: Notion is not configured or rejected the page
pub async fn create_partner(
    State(state): State<AppState>,
    Json(request): Json<PartnerRequest>,
) -> Result<Json<PartnerResponse>, AppError> {
    request.validate()?;

    let notion = state
        .notion
        .as_ref()
        .ok_or(AppError::NotConfigured("Notion API key not configured"))?;

    notion.create_partner_page(&request).await.map_err(|e| {
        tracing::error!("Notion error: {}", e);
        AppError::Upstream("Failed to save to Notion")
    })?;

    tracing::info!(company = %request.company, "Partner application received");
    Ok(Json(PartnerResponse::received()))
}

#[cfg(test)]
mod tests {
    use crate::services::notion::NotionClient;
    use crate::test_support::{self, serve};
    use axum::{
        Json, Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::post,
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn application() -> Value {
        json!({
            "name": "Erika Mustermann",
            "company": "Muster Digital GmbH",
            "email": "erika@muster.de",
            "phone": "+49 30 1234567",
            "website": "https://muster.de"
        })
    }

    async fn submit(app: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::post("/api/partner")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn notion(status: StatusCode) -> NotionClient {
        let upstream = Router::new().route(
            "/pages",
            post(move || async move { (status, Json(json!({ "object": "page" }))) }),
        );
        NotionClient::new("secret", serve(upstream).await, "db").unwrap()
    }

    #[tokio::test]
    async fn accepted_application() {
        let (state, _dir) = test_support::app_state(Some(notion(StatusCode::OK).await));

        let (status, body) = submit(crate::router(state), application()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "message": "Partner application received" }));
    }

    #[tokio::test]
    async fn missing_notion_key() {
        let (state, _dir) = test_support::app_state(None);

        let (status, body) = submit(crate::router(state), application()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Notion API key not configured");
    }

    #[tokio::test]
    async fn notion_rejection() {
        let (state, _dir) = test_support::app_state(Some(notion(StatusCode::BAD_REQUEST).await));

        let (status, body) = submit(crate::router(state), application()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Failed to save to Notion");
    }

    #[tokio::test]
    async fn invalid_email() {
        let (state, _dir) = test_support::app_state(Some(notion(StatusCode::OK).await));
        let mut body = application();
        body["email"] = json!("not-an-email");

        let (status, body) = submit(crate::router(state), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_request");
    }
}
