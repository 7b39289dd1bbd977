use crate::errors::{AnalysisError, CaptureError};
use crate::models::AnalysisResult;

pub const NOT_FOOD_MESSAGE: &str =
    "AI가 이 이미지에서 음식을 인식하지 못했습니다. 음식 사진을 업로드해 주세요.";
pub const QUOTA_MESSAGE: &str =
    "현재 이용자가 많아 AI 분석량이 한도를 초과했습니다. 잠시 후(약 1분 뒤) 다시 시도해 주세요.";
pub const GENERIC_ERROR_MESSAGE: &str =
    "이미지를 분석하는 중 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DomainRejected,
    QuotaExceeded,
    Generic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDescriptor {
    pub message: String,
    pub kind: ErrorKind,
}

impl ErrorDescriptor {
    fn new(message: &str, kind: ErrorKind) -> Self {
        Self {
            message: message.to_string(),
            kind,
        }
    }

    pub fn is_quota_exceeded(&self) -> bool {
        self.kind == ErrorKind::QuotaExceeded
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Loading,
    Success(AnalysisResult),
    Error(ErrorDescriptor),
}

/// Generation stamp handed out with every analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Single-page session: one image, at most one of loading/result/error.
///
/// Selecting a new image or resetting bumps the generation, so results of
/// requests issued earlier are dropped when they arrive.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    image: Option<String>,
    phase: Phase,
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            image: None,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn selected_image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorDescriptor> {
        match &self.phase {
            Phase::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Enter `Loading` for `image`, superseding any request still in flight.
    pub fn select_image(&mut self, image: String) -> Ticket {
        self.generation += 1;
        self.image = Some(image);
        self.phase = Phase::Loading;
        Ticket(self.generation)
    }

    /// Apply the outcome of the request behind `ticket`.
    ///
    /// Returns `false` when the ticket is stale and the outcome was dropped.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> bool {
        if ticket.0 != self.generation || !self.is_loading() {
            log::warn!(
                "⏭️ Dropping stale analysis result (ticket {}, current {})",
                ticket.0,
                self.generation
            );
            return false;
        }

        self.phase = match outcome {
            Ok(result) if !result.is_food => {
                log::info!("🍽️ No food detected in image");
                Phase::Error(ErrorDescriptor::new(NOT_FOOD_MESSAGE, ErrorKind::DomainRejected))
            }
            Ok(result) => Phase::Success(result),
            Err(err) if err.is_quota_exceeded() => {
                log::warn!("⏳ Quota exceeded: {}", err);
                Phase::Error(ErrorDescriptor::new(QUOTA_MESSAGE, ErrorKind::QuotaExceeded))
            }
            Err(err) => {
                log::error!("❌ Analysis failed: {}", err);
                Phase::Error(ErrorDescriptor::new(GENERIC_ERROR_MESSAGE, ErrorKind::Generic))
            }
        };
        true
    }

    /// Reading the selected file failed; shown like any other analysis failure.
    pub fn capture_failed(&mut self, err: &CaptureError) {
        log::error!("❌ {}", err);
        self.generation += 1;
        self.image = None;
        self.phase = Phase::Error(ErrorDescriptor::new(GENERIC_ERROR_MESSAGE, ErrorKind::Generic));
    }

    pub fn reset(&mut self) {
        if self.image.is_none() && self.phase == Phase::Idle {
            return;
        }
        self.generation += 1;
        self.image = None;
        self.phase = Phase::Idle;
    }
}
