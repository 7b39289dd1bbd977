use super::gemini::{GenerateContentRequest, GenerateContentResponse};
use crate::errors::ServiceError;

/// Transport seam for hosted multimodal models (Gemini, test doubles).
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ServiceError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays one canned reply and records every call it receives.
    pub struct MockModel {
        reply: Result<GenerateContentResponse, ServiceError>,
        calls: AtomicUsize,
        api_keys: Mutex<Vec<String>>,
        last_request: Mutex<Option<Value>>,
    }

    impl MockModel {
        pub fn replying_text(text: &str) -> Self {
            let response = serde_json::from_value(json!({
                "candidates": [{ "content": { "parts": [{ "text": text }] } }]
            }))
            .unwrap();
            Self::with_reply(Ok(response))
        }

        pub fn replying_empty() -> Self {
            let response = serde_json::from_value(json!({ "candidates": [] })).unwrap();
            Self::with_reply(Ok(response))
        }

        pub fn failing(err: ServiceError) -> Self {
            Self::with_reply(Err(err))
        }

        fn with_reply(reply: Result<GenerateContentResponse, ServiceError>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                api_keys: Mutex::new(Vec::new()),
                last_request: Mutex::new(None),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn api_keys(&self) -> Vec<String> {
            self.api_keys.lock().unwrap().clone()
        }

        pub fn last_request(&self) -> Option<Value> {
            self.last_request.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl GenerativeModel for MockModel {
        async fn generate_content(
            &self,
            api_key: &str,
            _model: &str,
            request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.api_keys.lock().unwrap().push(api_key.to_string());
            *self.last_request.lock().unwrap() = serde_json::to_value(request).ok();
            self.reply.clone()
        }
    }
}
