//! Analysis session state.
//!
//! A session moves `Idle -> Analyzing -> {Success, Error}` and can be reset
//! from any state. All transitions go through [`Session::reduce`], which
//! consumes the old state and returns the new one.

pub mod model;

use chrono::Utc;
use tracing::debug;

use crate::analysis::model::AnalysisRequest;
use crate::analysis::sanitize::sanitize;

pub use model::{AnalysisStatus, Session, SessionEvent};

impl Session {
    /// Apply one event.
    ///
    /// `AnalyzeRequested` is ignored without an image or while a request is
    /// already outstanding. Outcomes are ignored unless they answer the
    /// attempt currently in flight, so late responses cannot overwrite a
    /// newer state.
    pub fn reduce(self, event: SessionEvent) -> Session {
        match event {
            SessionEvent::ImageSelected(image) => Session {
                image: Some(image),
                attempt: self.attempt,
                ..Session::default()
            },
            SessionEvent::AnalyzeRequested => {
                if !self.can_analyze() {
                    debug!(status = %self.status, has_image = self.image.is_some(), "Analyze request ignored");
                    return self;
                }
                Session {
                    status: AnalysisStatus::Analyzing,
                    result: None,
                    error: None,
                    attempt: self.attempt + 1,
                    analyzed_at: None,
                    ..self
                }
            }
            SessionEvent::AnalysisSucceeded { attempt, result } => {
                if !self.is_awaiting(attempt) {
                    debug!(attempt, current = self.attempt, "Stale analysis result ignored");
                    return self;
                }
                Session {
                    status: AnalysisStatus::Success,
                    result: Some(sanitize(result)),
                    error: None,
                    analyzed_at: Some(Utc::now()),
                    ..self
                }
            }
            SessionEvent::AnalysisFailed { attempt, message } => {
                if !self.is_awaiting(attempt) {
                    debug!(attempt, current = self.attempt, "Stale analysis failure ignored");
                    return self;
                }
                Session {
                    status: AnalysisStatus::Error,
                    result: None,
                    error: Some(message),
                    ..self
                }
            }
            SessionEvent::Reset => Session {
                attempt: self.attempt,
                ..Session::default()
            },
        }
    }

    /// Whether an `AnalyzeRequested` event would be accepted.
    pub fn can_analyze(&self) -> bool {
        self.image.is_some() && self.status != AnalysisStatus::Analyzing
    }

    /// The request to send while the session is analyzing.
    pub fn pending_request(&self) -> Option<(u64, AnalysisRequest)> {
        if self.status != AnalysisStatus::Analyzing {
            return None;
        }
        self.image
            .as_ref()
            .map(|image| (self.attempt, image.to_request()))
    }

    fn is_awaiting(&self, attempt: u64) -> bool {
        self.status == AnalysisStatus::Analyzing && self.attempt == attempt
    }
}
