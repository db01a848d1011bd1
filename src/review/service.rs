use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use crate::extraction::{EncodedImage, ExtractionError, IdCardExtractor, KycExtractor};
use crate::review::controller::ReviewController;
use crate::review::domain::{IdCardRecord, KycField, KycRecord, SessionContext};
use crate::review::ticket::TicketDraft;
use crate::review::verify;

/// Serializable view of the controller state for API responses and CLI
/// output.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSnapshot {
    pub phase: &'static str,
    pub record: KycRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Composes the reconciliation controller with the extraction collaborators
/// and the ID-scanner state. Domain logic stays single-threaded behind the
/// mutexes; the extraction call itself runs outside any lock so a new image
/// can supersede a pending one.
pub struct ReviewService<E> {
    extractor: Arc<E>,
    controller: Mutex<ReviewController>,
    id_card: Mutex<Option<IdCardRecord>>,
}

impl<E> ReviewService<E>
where
    E: KycExtractor + IdCardExtractor,
{
    pub fn new(extractor: Arc<E>, session: SessionContext) -> Self {
        let controller = ReviewController::new(session, Self::today());
        Self {
            extractor,
            controller: Mutex::new(controller),
            id_card: Mutex::new(None),
        }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ReviewController> {
        // Domain logic never panics while holding the lock; recover the
        // guard rather than poisoning every later request.
        self.controller
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run one KYC review image through the collaborator and reconcile the
    /// result. Extraction failures never escape; they end up as the
    /// snapshot's error message with the defaulted record still visible.
    pub fn process_kyc_image(&self, image: &EncodedImage) -> ReviewSnapshot {
        let today = Self::today();
        let token = self.lock().begin_extraction(today);

        match self.extractor.extract_kyc(image) {
            Ok(extraction) => {
                let mut controller = self.lock();
                if controller.complete_extraction(token, extraction, today) {
                    info!(phase = "ready", "kyc extraction merged");
                } else {
                    info!("discarded extraction result for superseded image");
                }
            }
            Err(err) => {
                let mut controller = self.lock();
                if controller.fail_extraction(token, err.to_string()) {
                    warn!(error = %err, "kyc extraction failed");
                }
            }
        }

        self.snapshot()
    }

    pub fn edit_field(&self, field: KycField, value: &str) -> ReviewSnapshot {
        let mut controller = self.lock();
        controller.edit_field(field, value);
        snapshot_of(&controller)
    }

    pub fn reset(&self) -> ReviewSnapshot {
        let mut controller = self.lock();
        controller.reset(Self::today());
        snapshot_of(&controller)
    }

    pub fn snapshot(&self) -> ReviewSnapshot {
        snapshot_of(&self.lock())
    }

    /// Ticket draft pre-filled from the current record, the way the ticket
    /// form seeds itself from the review form.
    pub fn ticket_seed(&self) -> TicketDraft {
        TicketDraft::from_record(self.lock().record())
    }

    /// Run an ID card photo through the collaborator. The previous record is
    /// discarded before the attempt; on success the verification flags are
    /// evaluated once and stored with the record.
    pub fn process_id_card(&self, image: &EncodedImage) -> Result<IdCardRecord, ExtractionError> {
        {
            let mut slot = self.id_card_slot();
            *slot = None;
        }

        let extraction = self.extractor.extract_id_card(image).inspect_err(|err| {
            warn!(error = %err, "id card extraction failed");
        })?;

        let mut record = IdCardRecord {
            name: extraction.name,
            date_of_birth: extraction.date_of_birth,
            id_number: extraction.id_number,
            date_of_expiry: extraction.date_of_expiry,
            is_underage: None,
            is_expired: None,
        };
        verify::evaluate_once(&mut record, Self::today());

        let mut slot = self.id_card_slot();
        *slot = Some(record.clone());
        Ok(record)
    }

    pub fn id_card(&self) -> Option<IdCardRecord> {
        self.id_card_slot().clone()
    }

    /// Opt-in recomputation of the one-shot verification flags, for callers
    /// that edited the dates after extraction.
    pub fn reverify_id_card(&self) -> Option<IdCardRecord> {
        let mut slot = self.id_card_slot();
        let record = slot.as_mut()?;
        verify::reevaluate(record, Self::today());
        Some(record.clone())
    }

    fn id_card_slot(&self) -> std::sync::MutexGuard<'_, Option<IdCardRecord>> {
        self.id_card
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn snapshot_of(controller: &ReviewController) -> ReviewSnapshot {
    ReviewSnapshot {
        phase: controller.phase().label(),
        record: controller.record().clone(),
        error: controller.error().map(str::to_string),
    }
}
