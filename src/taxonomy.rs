//! Static enumerations shared across the review workflow: canonical remark
//! labels, accepted auditor identifiers, and recognized reviewer handles.
//!
//! These tables are fixed at build time and never mutated. Two remark
//! orderings exist on purpose: [`NORMALIZED_REMARKS`] is the display/default
//! order (its first entry seeds a fresh record), while [`REMARK_PRIORITY`]
//! governs disambiguation when a source image matches several remark
//! patterns. The extraction collaborator applies the priority; this crate
//! only preserves and exposes both orderings unchanged.

/// Canonical remark labels in display order. The first entry is the default
/// selection for a fresh record.
pub const NORMALIZED_REMARKS: [&str; 14] = [
    "EXPIRED VALID ID",
    "MODIFIED ID",
    "PAG-IBIG ID",
    "DIGITAL ID",
    "ID ALREADY USED",
    "UNDERAGE",
    "BLURRED ID",
    "BLURRED PHOTO (SELFIE)",
    "ID DOES NOT BELONG TO THE USER",
    "LATEST VALID ID REQUIRED",
    "FACIAL RECOGNITION ERROR",
    "PHOTOGRAPH INCLUDES A MINOR",
    "NDRP",
    "DAMAGED ID",
];

/// Canonical remark labels in tie-break priority order, most severe first.
pub const REMARK_PRIORITY: [&str; 14] = [
    "ID ALREADY USED",
    "EXPIRED VALID ID",
    "MODIFIED ID",
    "UNDERAGE",
    "ID DOES NOT BELONG TO THE USER",
    "BLURRED ID",
    "BLURRED PHOTO (SELFIE)",
    "PAG-IBIG ID",
    "DIGITAL ID",
    "LATEST VALID ID REQUIRED",
    "FACIAL RECOGNITION ERROR",
    "PHOTOGRAPH INCLUDES A MINOR",
    "DAMAGED ID",
    "NDRP",
];

/// Accepted auditor identifiers. Case sensitive; surfaces offer these as a
/// selection while the record model itself accepts any string.
pub const AUDITORS: [&str; 27] = [
    "RCNORBERTO",
    "RCEMMANUEL",
    "RCLADIECYN",
    "RCCHARMAINE",
    "RCALEJANDRO",
    "RCPERLY",
    "RCLOVELY",
    "RCJOSEPH",
    "RCHANNAH",
    "RCANGELU",
    "RCCALVIN",
    "RCSAYLEEN",
    "RCCAREEN",
    "RCJOSEPHB",
    "RCMICAH",
    "RCRHEYMART",
    "RCMARK",
    "RCDIVINE",
    "RCANGELES",
    "RCBERNIE",
    "RCLEALYN",
    "RCPANDAY",
    "RCRUEGIE",
    "RCMANANSALA",
    "RCMIRANDA",
    "RCMATIONG",
    "RCZYRONE",
];

/// Telegram handles a support ticket can tag.
pub const REVIEWER_HANDLES: [&str; 5] = [
    "@AdaRiskcontrol",
    "@risk_control_po_opo",
    "@RC_xiaofeng",
    "@RC_JayJay",
    "@Csr_Ryan",
];

/// Default remark for a freshly seeded record.
pub fn default_remark() -> &'static str {
    NORMALIZED_REMARKS[0]
}

/// Default auditor for a brand-new session.
pub fn default_auditor() -> &'static str {
    AUDITORS[0]
}

pub fn is_canonical_remark(label: &str) -> bool {
    NORMALIZED_REMARKS.contains(&label)
}

pub fn is_known_auditor(identifier: &str) -> bool {
    AUDITORS.contains(&identifier)
}

/// Position of a label in the priority order; lower wins when a source image
/// matches several remark patterns.
pub fn remark_priority(label: &str) -> Option<usize> {
    REMARK_PRIORITY.iter().position(|entry| *entry == label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn display_and_priority_orders_cover_the_same_labels() {
        let display: HashSet<&str> = NORMALIZED_REMARKS.into_iter().collect();
        let priority: HashSet<&str> = REMARK_PRIORITY.into_iter().collect();
        assert_eq!(display.len(), 14);
        assert_eq!(display, priority);
    }

    #[test]
    fn defaults_come_from_the_head_of_each_table() {
        assert_eq!(default_remark(), "EXPIRED VALID ID");
        assert_eq!(default_auditor(), "RCNORBERTO");
    }

    #[test]
    fn id_already_used_outranks_every_other_remark() {
        assert_eq!(remark_priority("ID ALREADY USED"), Some(0));
        assert!(remark_priority("EXPIRED VALID ID") < remark_priority("NDRP"));
        assert_eq!(remark_priority("UNRELATED"), None);
    }

    #[test]
    fn auditor_lookup_is_case_sensitive() {
        assert!(is_known_auditor("RCJOSEPH"));
        assert!(!is_known_auditor("rcjoseph"));
        assert_eq!(AUDITORS.len(), 27);
    }

    #[test]
    fn canonical_remark_check_rejects_near_misses() {
        assert!(is_canonical_remark("BLURRED PHOTO (SELFIE)"));
        assert!(!is_canonical_remark("BLURRED SELFIE"));
    }
}
