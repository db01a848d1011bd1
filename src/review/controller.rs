//! Reconciliation of extraction results and operator edits into one
//! authoritative [`KycRecord`].
//!
//! The controller is a synchronous state machine over explicit inputs; the
//! asynchronous part of the workflow (actually calling the collaborator)
//! lives in [`crate::review::service`]. Each in-flight extraction carries a
//! generation-tagged [`ExtractionToken`]; a completion or failure whose token
//! no longer matches the current generation is discarded, so a late response
//! for a superseded image can never overwrite the record of a newer
//! selection. Last selected image wins.

use chrono::NaiveDate;

use crate::extraction::KycExtraction;
use crate::review::domain::{KycField, KycRecord, SessionContext};
use crate::review::rows;

/// Where the current review document stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
    /// Defaults seeded, nothing in flight.
    Empty,
    /// An extraction call is pending for the current image.
    Loading,
    /// The latest extraction merged successfully.
    Ready,
    /// The latest extraction failed; defaults stay visible.
    Failed,
}

impl ReviewPhase {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewPhase::Empty => "empty",
            ReviewPhase::Loading => "loading",
            ReviewPhase::Ready => "ready",
            ReviewPhase::Failed => "failed",
        }
    }
}

/// Identity of one in-flight extraction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionToken {
    generation: u64,
}

pub struct ReviewController {
    phase: ReviewPhase,
    record: KycRecord,
    session: SessionContext,
    generation: u64,
    error: Option<String>,
}

impl ReviewController {
    pub fn new(session: SessionContext, today: NaiveDate) -> Self {
        let record = KycRecord::seeded(&session, today);
        Self {
            phase: ReviewPhase::Empty,
            record,
            session,
            generation: 0,
            error: None,
        }
    }

    pub fn phase(&self) -> ReviewPhase {
        self.phase
    }

    pub fn record(&self) -> &KycRecord {
        &self.record
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A new image was selected. The record drops back to defaults right away
    /// so stale data from a previous image is never shown while the new call
    /// is pending, and any previously issued token is superseded.
    pub fn begin_extraction(&mut self, today: NaiveDate) -> ExtractionToken {
        self.generation += 1;
        self.record = KycRecord::seeded(&self.session, today);
        self.error = None;
        self.phase = ReviewPhase::Loading;
        ExtractionToken {
            generation: self.generation,
        }
    }

    /// Merge a successful extraction over fresh defaults. Returns `false`
    /// without touching anything when the token has been superseded.
    pub fn complete_extraction(
        &mut self,
        token: ExtractionToken,
        extraction: KycExtraction,
        today: NaiveDate,
    ) -> bool {
        if !self.accepts(token) {
            return false;
        }

        // Merge over a fresh default record, never over the previous one, so
        // stale fields from a prior image cannot leak forward.
        let mut record = KycRecord::seeded(&self.session, today);

        if let Some(date) = non_empty(extraction.date) {
            record.date = Some(date);
        }
        if let Some(auditor) = non_empty(extraction.auditor) {
            record.auditor = Some(auditor);
        }
        if let Some(member_id) = extraction.member_id {
            record.member_id = Some(member_id);
        }
        if let Some(name) = extraction.name {
            record.name = Some(name);
        }
        if let Some(remark_raw) = extraction.remark_raw {
            record.remark_raw = remark_raw;
        }
        if let Some(remark) = non_empty(extraction.remark_normalized) {
            record.remark_normalized = remark;
        }
        if let Some(status) = non_empty(extraction.kyc_status) {
            record.kyc_status = status;
        }
        if let Some(confidence) = extraction.confidence {
            record.confidence = confidence;
        }
        if let Some(fields_confidence) = extraction.fields_confidence {
            record.fields_confidence = fields_confidence;
        }
        if let Some(notes) = extraction.notes {
            record.notes = notes;
        }
        // extraction.csv_row is deliberately ignored; rows are derived here.
        rows::resync(&mut record);

        self.record = record;
        self.error = None;
        self.phase = ReviewPhase::Ready;
        true
    }

    /// Record an extraction failure. The defaulted record stays visible.
    /// Returns `false` when the token has been superseded.
    pub fn fail_extraction(&mut self, token: ExtractionToken, message: impl Into<String>) -> bool {
        if !self.accepts(token) {
            return false;
        }
        self.error = Some(message.into());
        self.phase = ReviewPhase::Failed;
        true
    }

    /// Apply one operator edit and resynchronize the derived rows. Returns
    /// whether any derived row actually changed, so callers can skip
    /// redundant update notifications.
    pub fn edit_field(&mut self, field: KycField, value: &str) -> bool {
        match field {
            KycField::Date => self.record.date = optional(value),
            KycField::Auditor => {
                self.record.auditor = optional(value);
                if !value.trim().is_empty() {
                    self.session.last_auditor = value.trim().to_string();
                }
            }
            KycField::MemberId => self.record.member_id = optional(value),
            KycField::Name => self.record.name = optional(value),
            KycField::RemarkRaw => self.record.remark_raw = value.to_string(),
            KycField::RemarkNormalized => self.record.remark_normalized = value.to_string(),
            KycField::KycStatus => self.record.kyc_status = value.to_string(),
            KycField::Notes => self.record.notes = value.to_string(),
        }
        rows::resync(&mut self.record)
    }

    /// Back to defaults, seeded with the last-used auditor. Supersedes any
    /// in-flight extraction.
    pub fn reset(&mut self, today: NaiveDate) {
        self.generation += 1;
        self.record = KycRecord::seeded(&self.session, today);
        self.error = None;
        self.phase = ReviewPhase::Empty;
    }

    fn accepts(&self, token: ExtractionToken) -> bool {
        self.phase == ReviewPhase::Loading && token.generation == self.generation
    }
}

fn optional(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}
