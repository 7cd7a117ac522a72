//! Drawing session lifecycle: capture, transcription and the single
//! outstanding submission.

use crate::bound::{bound_strokes, truncate_transcription};
use crate::capture::CaptureSession;
use crate::sanitize::sanitize_strokes;
use crate::{SubmissionLimits, SubmissionPayload, SubmitError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReport {
    pub input_strokes: usize,
    pub kept_strokes: usize,
    pub dropped_points: usize,
    pub original_bytes: usize,
    pub final_bytes: usize,
    pub stride: Option<usize>,
    pub transcription_truncated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSubmission {
    pub payload: SubmissionPayload,
    pub report: SubmissionReport,
}

#[derive(Default)]
pub struct DrawingSession {
    pub capture: CaptureSession,
    pub transcription: String,
    pending: bool,
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Validates and packs the committed strokes. On success the session is
    /// pending until [`DrawingSession::finish_submit`].
    pub fn begin_submit(
        &mut self,
        limits: &SubmissionLimits,
        now_ms: i64,
    ) -> Result<PreparedSubmission, SubmitError> {
        if self.pending {
            return Err(SubmitError::InFlight);
        }
        if self.transcription.trim().is_empty() {
            return Err(SubmitError::EmptyTranscription);
        }
        let strokes = self.capture.strokes();
        if strokes.is_empty() {
            return Err(SubmitError::NoStrokes);
        }

        let sanitized = sanitize_strokes(strokes, now_ms)?;
        log::debug!(
            "Sanitized {} strokes to {} valid strokes",
            strokes.len(),
            sanitized.strokes.len()
        );
        let kept_strokes = sanitized.strokes.len();
        let bounded = bound_strokes(sanitized.strokes, limits);
        let transcription =
            truncate_transcription(&self.transcription, limits.max_transcription_chars);

        let report = SubmissionReport {
            input_strokes: strokes.len(),
            kept_strokes,
            dropped_points: sanitized.dropped_points,
            original_bytes: bounded.original_bytes,
            final_bytes: bounded.final_bytes,
            stride: bounded.stride,
            transcription_truncated: transcription.len() < self.transcription.len(),
        };
        self.pending = true;
        Ok(PreparedSubmission {
            payload: SubmissionPayload {
                strokes: bounded.strokes,
                transcription,
            },
            report,
        })
    }

    /// Settles the outstanding submission. A failure keeps everything so the
    /// user can retry without redrawing.
    pub fn finish_submit(&mut self, succeeded: bool) {
        self.pending = false;
        if succeeded {
            self.reset();
        }
    }

    pub fn clear(&mut self) -> Result<(), SubmitError> {
        if self.pending {
            return Err(SubmitError::InFlight);
        }
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.capture.clear();
        self.transcription.clear();
    }
}
