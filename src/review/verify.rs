//! Age and expiry checks over the raw date strings of an [`IdCardRecord`].
//!
//! Both checks are total functions: an absent or unparseable date yields
//! `false`, treated as "cannot disprove majority/validity" rather than a
//! warning state. `now` is an explicit calendar day so tests never depend on
//! the wall clock; production call sites pass `Local::now().date_naive()`,
//! which is where time-of-day gets discarded.

use chrono::{Datelike, NaiveDate};

use crate::review::domain::IdCardRecord;

/// Minimum age for participation; holders younger than this are flagged.
pub const MINIMUM_AGE_YEARS: i32 = 21;

fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Whole-years age as of `now`, counting a birthday that falls on `now` as
/// already attained.
fn age_in_years(date_of_birth: NaiveDate, now: NaiveDate) -> i32 {
    let mut age = now.year() - date_of_birth.year();
    if (now.month(), now.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// True iff the holder is provably younger than [`MINIMUM_AGE_YEARS`].
pub fn is_underage(date_of_birth: Option<&str>, now: NaiveDate) -> bool {
    match date_of_birth.and_then(parse_day) {
        Some(dob) => age_in_years(dob, now) < MINIMUM_AGE_YEARS,
        None => false,
    }
}

/// True iff the expiry day is strictly before `now`; expiring today is not
/// expired.
pub fn is_expired(date_of_expiry: Option<&str>, now: NaiveDate) -> bool {
    match date_of_expiry.and_then(parse_day) {
        Some(expiry) => expiry < now,
        None => false,
    }
}

/// One-shot evaluation: populates both flags the first time neither is set.
/// A record that already carries both flags is left untouched even if its
/// date fields were edited since; opt into recomputation with
/// [`reevaluate`].
pub fn evaluate_once(record: &mut IdCardRecord, now: NaiveDate) {
    if record.is_underage.is_some() && record.is_expired.is_some() {
        return;
    }
    reevaluate(record, now);
}

/// Unconditional recomputation of both flags from the current date fields.
pub fn reevaluate(record: &mut IdCardRecord, now: NaiveDate) {
    record.is_underage = Some(is_underage(record.date_of_birth.as_deref(), now));
    record.is_expired = Some(is_expired(record.date_of_expiry.as_deref(), now));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn missing_or_garbled_birth_date_fails_open() {
        assert!(!is_underage(None, day(2021, 1, 1)));
        assert!(!is_underage(Some("not-a-date"), day(2021, 1, 1)));
        assert!(!is_underage(Some("12/21/1971"), day(2021, 1, 1)));
    }

    #[test]
    fn underage_respects_whether_the_birthday_happened_yet() {
        // Turns 21 on 2021-06-15.
        assert!(is_underage(Some("2000-06-15"), day(2021, 6, 14)));
        assert!(!is_underage(Some("2000-06-15"), day(2021, 6, 15)));
        assert!(!is_underage(Some("2000-06-15"), day(2021, 6, 16)));
    }

    #[test]
    fn birthday_on_the_reference_day_counts_as_attained() {
        assert!(!is_underage(Some("2000-01-01"), day(2021, 1, 1)));
        assert!(!is_underage(Some("2000-01-01"), day(2021, 6, 1)));
    }

    #[test]
    fn clearly_minor_holder_is_flagged() {
        assert!(is_underage(Some("2010-03-02"), day(2024, 6, 1)));
    }

    #[test]
    fn missing_or_garbled_expiry_fails_open() {
        assert!(!is_expired(None, day(2021, 1, 1)));
        assert!(!is_expired(Some("soon"), day(2021, 1, 1)));
    }

    #[test]
    fn expiry_is_strictly_before_today() {
        assert!(is_expired(Some("2020-01-01"), day(2021, 1, 1)));
        assert!(!is_expired(Some("2099-01-01"), day(2021, 1, 1)));
        assert!(!is_expired(Some("2021-06-01"), day(2021, 6, 1)));
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        assert!(is_expired(Some(" 2020-01-01 "), day(2021, 1, 1)));
    }

    #[test]
    fn evaluate_once_is_one_shot() {
        let mut record = IdCardRecord {
            date_of_birth: Some("2010-01-01".to_string()),
            date_of_expiry: Some("2020-01-01".to_string()),
            ..IdCardRecord::default()
        };

        evaluate_once(&mut record, day(2024, 6, 1));
        assert_eq!(record.is_underage, Some(true));
        assert_eq!(record.is_expired, Some(true));

        // Editing the dates does not refresh the flags.
        record.date_of_birth = Some("1971-12-21".to_string());
        record.date_of_expiry = Some("2099-01-01".to_string());
        evaluate_once(&mut record, day(2024, 6, 1));
        assert_eq!(record.is_underage, Some(true));
        assert_eq!(record.is_expired, Some(true));

        // An explicit re-evaluation does.
        reevaluate(&mut record, day(2024, 6, 1));
        assert_eq!(record.is_underage, Some(false));
        assert_eq!(record.is_expired, Some(false));
    }
}
