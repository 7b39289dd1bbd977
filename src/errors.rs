use std::path::PathBuf;
use thiserror::Error;

/// Operator-facing help shown when no API key could be resolved.
pub const MISSING_CREDENTIAL_HELP: &str = "API Key가 설정되지 않았습니다.\n\n\
     해결 방법:\n\
     1. 프로젝트 루트의 .env 파일 또는 셸 환경 변수를 엽니다\n\
     2. 'VITE_API_KEY'(또는 기존 이름인 'API_KEY')에 Gemini API 키를 입력합니다\n\
     3. 프로그램을 다시 실행합니다";

/// Failure reported by the model transport before any classification.
///
/// `http_status` and `service_status` are filled whenever the endpoint
/// answered; `message` is always present and carries the raw text.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub http_status: Option<u16>,
    pub service_status: Option<String>,
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            http_status: None,
            service_status: None,
            message: message.into(),
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_service_status(mut self, status: impl Into<String>) -> Self {
        self.service_status = Some(status.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    MissingCredential(&'static str),

    #[error("No response text from Gemini")]
    NoResponseText,

    #[error("Invalid response from Gemini: {0}")]
    InvalidResponse(String),

    #[error("QUOTA_EXCEEDED: {0}")]
    QuotaExceeded(String),

    #[error("Gemini analysis failed: {0}")]
    AnalysisFailed(String),
}

impl AnalysisError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, AnalysisError::QuotaExceeded(_))
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Please upload an image file. (got '{content_type}')")]
    InvalidInputType { content_type: String },

    #[error("Failed to read image {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
