pub mod analyze;

pub use analyze::{AnalysisError, AnalyzeHandler};
