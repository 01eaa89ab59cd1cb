// [libs/domain/gamification/src/badge.rs]
use serde::Serialize;
use typeshare::typeshare;

/// One entry in the fixed badge catalog, as surfaced by `GET /badges`
///  so a dashboard can render locked badges too.
///
/// Serialize-only: this type is never parsed back from the wire, only ever
/// constructed as a `const` literal here and handed to a response body.
#[typeshare]
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BadgeCatalogEntry {
    pub identifier: &'static str,
    pub i18n_label_key: &'static str,
    pub family: &'static str,
    pub threshold: u32,
}

/// The fixed, ordered badge catalog. Award is monotonic set-union —
/// this table is the only source of truth for which identifiers exist and
/// at which threshold they unlock.
pub const BADGE_CATALOG: &[BadgeCatalogEntry] = &[
    BadgeCatalogEntry { identifier: "first_report", i18n_label_key: "badge.first_report", family: "reports", threshold: 1 },
    BadgeCatalogEntry { identifier: "reports_10", i18n_label_key: "badge.reports_10", family: "reports", threshold: 10 },
    BadgeCatalogEntry { identifier: "reports_50", i18n_label_key: "badge.reports_50", family: "reports", threshold: 50 },
    BadgeCatalogEntry { identifier: "reports_100", i18n_label_key: "badge.reports_100", family: "reports", threshold: 100 },
    BadgeCatalogEntry { identifier: "first_verified", i18n_label_key: "badge.first_verified", family: "verified", threshold: 1 },
    BadgeCatalogEntry { identifier: "verified_10", i18n_label_key: "badge.verified_10", family: "verified", threshold: 10 },
    BadgeCatalogEntry { identifier: "verified_50", i18n_label_key: "badge.verified_50", family: "verified", threshold: 50 },
    BadgeCatalogEntry { identifier: "reputation_50", i18n_label_key: "badge.reputation_50", family: "reputation", threshold: 50 },
    BadgeCatalogEntry { identifier: "reputation_100", i18n_label_key: "badge.reputation_100", family: "reputation", threshold: 100 },
    BadgeCatalogEntry { identifier: "reputation_250", i18n_label_key: "badge.reputation_250", family: "reputation", threshold: 250 },
    // One-shot marker, awarded directly rather than via a threshold family.
    BadgeCatalogEntry { identifier: "emergency_responder", i18n_label_key: "badge.emergency_responder", family: "one_shot", threshold: 0 },
];

/// Returns every badge in `family` whose threshold is `<= value`, ascending.
pub(crate) fn thresholds_met(family: &str, value: u32) -> impl Iterator<Item = &'static str> {
    BADGE_CATALOG
        .iter()
        .filter(move |entry| entry.family == family && entry.threshold <= value)
        .map(|entry| entry.identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_family_is_ordered_ascending_by_threshold() {
        let reports: Vec<_> = BADGE_CATALOG.iter().filter(|e| e.family == "reports").collect();
        let thresholds: Vec<u32> = reports.iter().map(|e| e.threshold).collect();
        let mut sorted = thresholds.clone();
        sorted.sort_unstable();
        assert_eq!(thresholds, sorted);
    }

    #[test]
    fn thresholds_met_excludes_higher_tiers() {
        let met: Vec<_> = thresholds_met("reports", 5).collect();
        assert_eq!(met, vec!["first_report"]);
    }
}
