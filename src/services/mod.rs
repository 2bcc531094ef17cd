pub mod ai_service;
pub mod analyze_client; // client side of /api/analyze
pub mod history;
pub mod openai; // OpenAI-compatible vision model

pub use ai_service::VisionModel;
pub use analyze_client::{encode_image_file, AnalyzeClient};
pub use history::FoodHistory;
pub use openai::OpenAIService;
