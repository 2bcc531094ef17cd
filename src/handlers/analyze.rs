use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};

use crate::models::{AnalyzeRequest, NutritionEstimate};
use crate::services::VisionModel;

pub const ANALYSIS_PROMPT: &str = "Analyze this image and provide nutritional information. \
Format your response strictly as a JSON object with the following structure: \
{\"name\": string, \"calories\": number, \"protein\": number, \"carbs\": number, \"fat\": number}. \
Only respond with the JSON object, no other text.";

pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response format from AI";

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The inbound body was not `{ "image": string }`.
    #[error("{0}")]
    InvalidRequest(String),

    /// The model answered, but not with the five-field JSON object.
    #[error("Invalid response format from AI")]
    InvalidResponse { raw: String },

    /// Transport, auth or API failure talking to the model.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// Estimate accepted from the model.
///
/// `body` is the model's own JSON object and is what goes back on the
/// wire; `estimate` is the same data after strict validation.
#[derive(Debug, Clone)]
pub struct AnalysisReply {
    pub estimate: NutritionEstimate,
    pub body: serde_json::Value,
}

pub struct AnalyzeHandler {
    model: Arc<dyn VisionModel>,
}

impl AnalyzeHandler {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self { model }
    }

    /// Handle a raw `POST /api/analyze` body.
    pub async fn handle_body(&self, body: &[u8]) -> Result<AnalysisReply, AnalysisError> {
        let request: AnalyzeRequest = serde_json::from_slice(body)
            .map_err(|e| AnalysisError::InvalidRequest(format!("Invalid request body: {}", e)))?;

        self.analyze_image(&request.image).await
    }

    pub async fn analyze_image(&self, image: &str) -> Result<AnalysisReply, AnalysisError> {
        let base64_image = strip_data_url_prefix(image);
        log::debug!("📊 Base64 payload size: {} bytes", base64_image.len());

        // Always tagged as JPEG, whatever the upload was.
        let data_url = format!("data:image/jpeg;base64,{}", base64_image);

        let content = self.model.describe_image(ANALYSIS_PROMPT, &data_url).await?;

        match parse_estimate(&content) {
            Ok(reply) => {
                log::info!(
                    "✅ Estimate: {} ({} kcal, P {} / C {} / F {})",
                    reply.estimate.name,
                    reply.estimate.calories,
                    reply.estimate.protein,
                    reply.estimate.carbs,
                    reply.estimate.fat
                );
                Ok(reply)
            }
            Err(e) => {
                log::error!("❌ JSON parsing error: {}", content);
                Err(e)
            }
        }
    }
}

fn data_url_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(r"^data:image/[A-Za-z0-9.+-]+;base64,").expect("data URL pattern is valid")
    })
}

fn code_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```json\n?|\n?```").expect("code fence pattern is valid"))
}

/// Drop a leading `data:image/<subtype>;base64,` tag if present.
pub fn strip_data_url_prefix(image: &str) -> &str {
    match data_url_prefix().find(image) {
        Some(m) => &image[m.end()..],
        None => image,
    }
}

/// Remove markdown code-fence markers around a model reply.
pub fn strip_code_fences(content: &str) -> String {
    code_fence().replace_all(content.trim(), "").trim().to_string()
}

/// Parse a model reply into a validated estimate.
pub fn parse_estimate(content: &str) -> Result<AnalysisReply, AnalysisError> {
    let invalid = || AnalysisError::InvalidResponse {
        raw: content.to_string(),
    };

    let cleaned = strip_code_fences(content);
    let body: serde_json::Value = serde_json::from_str(&cleaned).map_err(|_| invalid())?;
    let estimate = NutritionEstimate::deserialize(&body).map_err(|_| invalid())?;

    Ok(AnalysisReply { estimate, body })
}
