//! Pure formatting of a [`KycRecord`] into the three tab-separated sheet
//! rows. Each field is trimmed independently, absent values become empty
//! strings, and columns are joined with single tabs. Embedded tabs or
//! newlines in a value are passed through verbatim and will corrupt column
//! alignment; that matches the sheets these rows are pasted into and is a
//! known limitation, not something to escape away here.

use crate::review::domain::KycRecord;

pub(crate) const FAILED_STATUS: &str = "Failed";
pub(crate) const NORMAL_STATUS: &str = "Normal";
pub(crate) const ALL_RESTRICTION: &str = "All Restriction";

fn column(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Columns of the "KYC Failed" sheet row. The status column is always the
/// literal `Failed`, independent of the record's own `kyc_status` field.
pub(crate) fn failed_kyc_columns(record: &KycRecord) -> Vec<String> {
    vec![
        column(record.date.as_deref()),
        column(record.auditor.as_deref()),
        column(record.member_id.as_deref()),
        column(Some(&record.remark_normalized)),
        FAILED_STATUS.to_string(),
    ]
}

/// Columns of the underage/NDRP account-status sheet row. Only ever produced
/// when an account is being marked Normal after remediation, so the status
/// column carries no branching.
pub(crate) fn account_status_columns(record: &KycRecord) -> Vec<String> {
    vec![
        column(record.date.as_deref()),
        column(record.auditor.as_deref()),
        column(record.member_id.as_deref()),
        NORMAL_STATUS.to_string(),
    ]
}

/// Columns of the manual-freeze sheet row.
pub(crate) fn manual_freeze_columns(record: &KycRecord) -> Vec<String> {
    vec![
        column(record.date.as_deref()),
        column(record.auditor.as_deref()),
        column(record.member_id.as_deref()),
        column(Some(&record.remark_normalized)),
        NORMAL_STATUS.to_string(),
        ALL_RESTRICTION.to_string(),
    ]
}

fn join(columns: Vec<String>) -> String {
    columns.join("\t")
}

pub fn failed_kyc_row(record: &KycRecord) -> String {
    join(failed_kyc_columns(record))
}

pub fn account_status_row(record: &KycRecord) -> String {
    join(account_status_columns(record))
}

pub fn manual_freeze_row(record: &KycRecord) -> String {
    join(manual_freeze_columns(record))
}

/// Recompute the derived row cache from the record's source fields.
///
/// The cache is only overwritten when at least one derived value differs, so
/// callers can use the return value to skip redundant update notifications.
pub fn resync(record: &mut KycRecord) -> bool {
    let failed = failed_kyc_row(record);
    let account_status = account_status_row(record);
    let manual_freeze = manual_freeze_row(record);

    let changed = record.failed_kyc_row != failed
        || record.account_status_row != account_status
        || record.manual_freeze_row != manual_freeze;

    if changed {
        record.failed_kyc_row = failed;
        record.account_status_row = account_status;
        record.manual_freeze_row = manual_freeze;
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::domain::{KycRecord, SessionContext};
    use chrono::NaiveDate;

    fn record() -> KycRecord {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
        let mut record = KycRecord::seeded(&SessionContext::new("RCJOSEPH"), today);
        record.remark_normalized = "EXPIRED VALID ID".to_string();
        record
    }

    #[test]
    fn failed_kyc_row_matches_reference_scenario() {
        assert_eq!(
            failed_kyc_row(&record()),
            "06-01-24\tRCJOSEPH\t\tEXPIRED VALID ID\tFailed"
        );
    }

    #[test]
    fn failed_kyc_row_ignores_the_records_own_status() {
        let mut record = record();
        record.kyc_status = "Verification Approved".to_string();
        let row = failed_kyc_row(&record);
        assert!(row.ends_with("\tFailed"));
    }

    #[test]
    fn rows_have_exactly_n_minus_one_tabs_and_no_edge_tabs() {
        let record = record();
        for (row, columns) in [
            (failed_kyc_row(&record), 5),
            (account_status_row(&record), 4),
            (manual_freeze_row(&record), 6),
        ] {
            assert_eq!(row.matches('\t').count(), columns - 1, "row: {row:?}");
            assert!(!row.starts_with('\t'));
            assert!(!row.ends_with('\t'));
        }
    }

    #[test]
    fn fields_are_trimmed_independently() {
        let mut record = record();
        record.member_id = Some("  123456  ".to_string());
        record.auditor = Some(" RCJOSEPH ".to_string());
        assert_eq!(
            account_status_row(&record),
            "06-01-24\tRCJOSEPH\t123456\tNormal"
        );
    }

    #[test]
    fn embedded_tabs_pass_through_unescaped() {
        let mut record = record();
        record.member_id = Some("12\t34".to_string());
        let row = failed_kyc_row(&record);
        assert_eq!(row.matches('\t').count(), 5);
    }

    #[test]
    fn formatting_is_idempotent() {
        let record = record();
        assert_eq!(failed_kyc_row(&record), failed_kyc_row(&record));
        assert_eq!(manual_freeze_row(&record), manual_freeze_row(&record));
    }

    #[test]
    fn resync_reports_whether_the_cache_moved() {
        let mut record = record();
        assert!(!resync(&mut record), "seeded record is already in sync");

        record.member_id = Some("88021".to_string());
        assert!(resync(&mut record));
        assert_eq!(
            record.failed_kyc_row,
            "06-01-24\tRCJOSEPH\t88021\tEXPIRED VALID ID\tFailed"
        );

        // Notes feed no row, so the cache must not report a change.
        record.notes = "Manually reviewed.".to_string();
        assert!(!resync(&mut record));
    }
}
