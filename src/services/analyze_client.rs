use anyhow::Result;
use base64::{engine::general_purpose, Engine};
use std::fs;
use std::path::Path;

use crate::models::{AnalyzeRequest, NutritionEstimate};

pub const DEFAULT_ERROR_MESSAGE: &str = "Failed to analyze image";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Non-success status from the analysis endpoint.
    #[error("{0}")]
    Server(String),
}

/// HTTP client for a NutriSnap analysis endpoint.
pub struct AnalyzeClient {
    base_url: String,
    client: reqwest::Client,
}

impl AnalyzeClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Send one image for analysis.
    ///
    /// Every failure carries the `Failed to analyze image` context; the
    /// root cause is the server's `error` message when one was returned.
    pub async fn analyze_image(&self, image_data: &str) -> Result<NutritionEstimate> {
        self.request_analysis(image_data).await.map_err(|e| {
            log::error!("❌ Analysis error: {:#}", e);
            e.context(DEFAULT_ERROR_MESSAGE)
        })
    }

    async fn request_analysis(&self, image_data: &str) -> Result<NutritionEstimate> {
        let url = format!("{}/api/analyze", self.base_url);
        log::info!("📤 Posting image to {} ({} bytes)", url, image_data.len());

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest {
                image: image_data.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        log::debug!("📥 Analysis response status: {}", status);

        let body: serde_json::Value = response.json().await?;

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or(DEFAULT_ERROR_MESSAGE);
            return Err(ClientError::Server(message.to_string()).into());
        }

        Ok(serde_json::from_value(body)?)
    }
}

/// Read an image file into a `data:<mime>;base64,` URL, the same shape a
/// browser file reader produces.
pub fn encode_image_file(path: &Path) -> Result<String> {
    let image_data = fs::read(path)?;
    let base64_image = general_purpose::STANDARD.encode(&image_data);

    log::debug!("📊 Image file size: {} bytes", image_data.len());
    log::debug!("🔄 Base64 encoded size: {} bytes", base64_image.len());

    Ok(format!("data:{};base64,{}", mime_type_for(path), base64_image))
}

fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg", // jpg, jpeg and anything unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_analyze_image_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/analyze"))
            .and(body_json(serde_json::json!({ "image": "data:image/png;base64,AAAA" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Menemen", "calories": 410, "protein": 18, "carbs": 12, "fat": 31
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnalyzeClient::new(server.uri());
        let estimate = client.analyze_image("data:image/png;base64,AAAA").await.unwrap();

        assert_eq!(estimate.name, "Menemen");
        assert_eq!(estimate.calories, 410.0);
        assert_eq!(estimate.fat, 31.0);
    }

    #[tokio::test]
    async fn test_server_error_message_is_root_cause() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/analyze"))
            .respond_with(ResponseTemplate::new(500).set_body_json(
                serde_json::json!({ "error": "Invalid response format from AI" }),
            ))
            .mount(&server)
            .await;

        let client = AnalyzeClient::new(format!("{}/", server.uri()));
        let err = client.analyze_image("AAAA").await.unwrap_err();

        assert_eq!(err.root_cause().to_string(), "Invalid response format from AI");
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::Server(_))
        ));
        assert_eq!(
            format!("{:#}", err),
            "Failed to analyze image: Invalid response format from AI"
        );
    }

    #[tokio::test]
    async fn test_server_error_without_message_uses_default() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/analyze"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = AnalyzeClient::new(server.uri());
        let err = client.analyze_image("AAAA").await.unwrap_err();

        assert_eq!(err.root_cause().to_string(), DEFAULT_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_wrapped() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/analyze"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let client = AnalyzeClient::new(server.uri());
        let err = client.analyze_image("AAAA").await.unwrap_err();

        assert_eq!(err.to_string(), DEFAULT_ERROR_MESSAGE);
        assert!(format!("{:#}", err).starts_with("Failed to analyze image: "));
        assert!(err.downcast_ref::<ClientError>().is_none());
    }

    #[test]
    fn test_encode_image_file_uses_extension_mime() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("lunch.PNG");
        fs::write(&png, [0x89, b'P', b'N', b'G']).unwrap();

        let data_url = encode_image_file(&png).unwrap();

        assert_eq!(data_url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_mime_defaults_to_jpeg() {
        assert_eq!(mime_type_for(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("photo.heic")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("photo")), "image/jpeg");
    }
}
