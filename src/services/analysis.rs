use std::sync::Arc;

use super::ai_service::GenerativeModel;
use super::gemini::{
    Content, GeminiClient, GenerateContentRequest, GenerationConfig, InlineData, Part,
};
use super::prompt;
use crate::config::Config;
use crate::errors::{AnalysisError, ServiceError, MISSING_CREDENTIAL_HELP};
use crate::models::{AnalysisResult, SchemaVariant};

/// Used when the encoded image carries no `data:` header.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

pub const QUOTA_HTTP_STATUS: u16 = 429;
pub const QUOTA_SERVICE_STATUS: &str = "RESOURCE_EXHAUSTED";
/// Last resort when the transport gives no structured status.
pub const QUOTA_MESSAGE_MARKERS: [&str; 2] = ["429", "Resource has been exhausted"];

/// Turns one encoded image into one validated [`AnalysisResult`].
///
/// Every call makes at most one request; there is no retry and no timeout
/// beyond what the transport applies.
pub struct AnalysisClient {
    model: Arc<dyn GenerativeModel>,
    api_key: Option<String>,
    model_id: String,
    schema: SchemaVariant,
}

impl AnalysisClient {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        api_key: Option<String>,
        model_id: impl Into<String>,
        schema: SchemaVariant,
    ) -> Self {
        Self {
            model,
            api_key,
            model_id: model_id.into(),
            schema,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(GeminiClient::new(config.base_url.clone())),
            config.api_key.clone(),
            config.model.clone(),
            config.schema,
        )
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn schema(&self) -> SchemaVariant {
        self.schema
    }

    pub fn build_request(&self, encoded_image: &str) -> GenerateContentRequest {
        let (mime_type, data) = split_data_url(encoded_image);

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.unwrap_or(DEFAULT_IMAGE_MIME).to_string(),
                            data: data.to_string(),
                        },
                    },
                    Part::Text {
                        text: prompt::instruction(self.schema),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: prompt::response_schema(self.schema),
            },
        }
    }

    pub async fn analyze(&self, encoded_image: &str) -> Result<AnalysisResult, AnalysisError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            log::error!("❌ API key missing. Checked VITE_API_KEY and API_KEY.");
            AnalysisError::MissingCredential(MISSING_CREDENTIAL_HELP)
        })?;

        let request = self.build_request(encoded_image);
        log::debug!("🔄 Base64 payload size: {} bytes", split_data_url(encoded_image).1.len());

        let response = self
            .model
            .generate_content(api_key, &self.model_id, &request)
            .await
            .map_err(|e| {
                log::error!("❌ Gemini API Error: {}", e);
                classify_failure(e)
            })?;

        let text = response.text().ok_or_else(|| {
            let block_reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref());
            let finish_reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref());
            log::warn!(
                "⚠️ Gemini returned no text (block reason: {:?}, finish reason: {:?})",
                block_reason,
                finish_reason
            );
            AnalysisError::NoResponseText
        })?;

        log::debug!("💬 Gemini response content: {}", text);

        let result = AnalysisResult::parse(&text, self.schema)?;
        log::info!(
            "✅ Analysis parsed: {} ({} kcal, isFood={})",
            result.food_name,
            result.total_calories,
            result.is_food
        );
        Ok(result)
    }
}

/// Split `data:<mime>;base64,<payload>` into its MIME type and raw payload.
///
/// Strings without a `data:` header are returned unchanged as the payload.
pub fn split_data_url(encoded: &str) -> (Option<&str>, &str) {
    let Some(rest) = encoded.strip_prefix("data:") else {
        return (None, encoded);
    };
    let Some((header, payload)) = rest.split_once(',') else {
        return (None, encoded);
    };

    let mime = header.split(';').next().filter(|m| !m.is_empty());
    (mime, payload)
}

/// Quota failures become [`AnalysisError::QuotaExceeded`], everything else
/// [`AnalysisError::AnalysisFailed`].
pub fn classify_failure(err: ServiceError) -> AnalysisError {
    let structured = err.http_status == Some(QUOTA_HTTP_STATUS)
        || err.service_status.as_deref() == Some(QUOTA_SERVICE_STATUS);
    let textual = QUOTA_MESSAGE_MARKERS
        .iter()
        .any(|marker| err.message.contains(marker));

    if structured || textual {
        AnalysisError::QuotaExceeded(err.message)
    } else {
        AnalysisError::AnalysisFailed(err.message)
    }
}
