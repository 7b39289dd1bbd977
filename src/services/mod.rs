pub mod ai_service;
pub mod analysis; // image -> AnalysisResult
pub mod gemini; // Gemini generateContent transport
pub mod prompt;

pub use analysis::AnalysisClient;
