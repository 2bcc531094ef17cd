use anyhow::Result;

/// Trait for multimodal chat models (OpenAI, OpenRouter, etc.)
///
/// Implementations send one prompt plus one image and hand back the
/// model's raw text reply. Interpreting that text is the caller's job.
#[async_trait::async_trait]
pub trait VisionModel: Send + Sync {
    async fn describe_image(&self, prompt: &str, image_url: &str) -> Result<String>;
}
