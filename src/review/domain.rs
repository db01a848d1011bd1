use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::review::rows;
use crate::taxonomy;

/// Per-field extraction confidence reported by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldsConfidence {
    pub member_id: f32,
    pub remark_raw: f32,
}

/// Authoritative extraction result for one KYC review image.
///
/// The three `*_row` fields are a derived cache: at rest they always equal
/// what [`crate::review::rows`] produces from the other fields. They are
/// overwritten on every mutation and never read back as input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycRecord {
    pub date: Option<String>,
    pub auditor: Option<String>,
    pub member_id: Option<String>,
    pub name: Option<String>,
    pub remark_raw: String,
    pub remark_normalized: String,
    pub kyc_status: String,
    pub confidence: f32,
    pub fields_confidence: FieldsConfidence,
    pub notes: String,
    pub failed_kyc_row: String,
    pub account_status_row: String,
    pub manual_freeze_row: String,
}

impl KycRecord {
    /// Fresh record seeded from the session context, dated `today`.
    pub fn seeded(session: &SessionContext, today: NaiveDate) -> Self {
        let mut record = Self {
            date: Some(display_date(today)),
            auditor: Some(session.last_auditor.clone()),
            member_id: None,
            name: None,
            remark_raw: String::new(),
            remark_normalized: taxonomy::default_remark().to_string(),
            kyc_status: "Failed".to_string(),
            confidence: 0.0,
            fields_confidence: FieldsConfidence::default(),
            notes: "Awaiting image processing.".to_string(),
            failed_kyc_row: String::new(),
            account_status_row: String::new(),
            manual_freeze_row: String::new(),
        };
        rows::resync(&mut record);
        record
    }
}

/// Editable fields of a [`KycRecord`]. The derived row cache is deliberately
/// not addressable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycField {
    Date,
    Auditor,
    MemberId,
    Name,
    RemarkRaw,
    RemarkNormalized,
    KycStatus,
    Notes,
}

/// Authoritative extraction result for one ID card image.
///
/// `is_underage` / `is_expired` are evaluated once, the first time both are
/// unset; later edits to the date fields do not recompute them unless a
/// caller explicitly asks via [`crate::review::verify::reevaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdCardRecord {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub id_number: Option<String>,
    pub date_of_expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_underage: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_expired: Option<bool>,
}

/// Explicit session state: the operator's last auditor choice survives
/// resets and new images within a session, so fresh records default to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub last_auditor: String,
}

impl SessionContext {
    pub fn new(auditor: impl Into<String>) -> Self {
        Self {
            last_auditor: auditor.into(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(taxonomy::default_auditor())
    }
}

/// Display form of a calendar date, "MM-DD-YY" by team convention.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%m-%d-%y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
    }

    #[test]
    fn seeded_record_uses_session_auditor_and_taxonomy_default_remark() {
        let session = SessionContext::new("RCJOSEPH");
        let record = KycRecord::seeded(&session, today());

        assert_eq!(record.date.as_deref(), Some("06-01-24"));
        assert_eq!(record.auditor.as_deref(), Some("RCJOSEPH"));
        assert_eq!(record.member_id, None);
        assert_eq!(record.remark_raw, "");
        assert_eq!(record.remark_normalized, "EXPIRED VALID ID");
        assert_eq!(record.kyc_status, "Failed");
        assert_eq!(record.confidence, 0.0);
        assert_eq!(record.notes, "Awaiting image processing.");
    }

    #[test]
    fn seeded_record_has_rows_already_in_sync() {
        let record = KycRecord::seeded(&SessionContext::new("RCJOSEPH"), today());
        assert_eq!(
            record.failed_kyc_row,
            "06-01-24\tRCJOSEPH\t\tEXPIRED VALID ID\tFailed"
        );
        assert_eq!(record.account_status_row, "06-01-24\tRCJOSEPH\t\tNormal");
        assert_eq!(
            record.manual_freeze_row,
            "06-01-24\tRCJOSEPH\t\tEXPIRED VALID ID\tNormal\tAll Restriction"
        );
    }

    #[test]
    fn display_date_pads_month_and_day() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 9).expect("valid date");
        assert_eq!(display_date(date), "01-09-26");
    }

    #[test]
    fn session_context_defaults_to_first_auditor() {
        assert_eq!(SessionContext::default().last_auditor, "RCNORBERTO");
    }
}
