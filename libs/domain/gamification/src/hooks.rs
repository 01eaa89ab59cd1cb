// [libs/domain/gamification/src/hooks.rs]
use crate::badge::thresholds_met;
use attention_domain_models::{Severity, UserProfile};

/// +10 reputation on a normal verification; see [`on_verification`].
const VERIFICATION_REPUTATION_BONUS: i64 = 10;
/// Additional bonus applied when the verified event's severity was Critical.
const CRITICAL_VERIFICATION_BONUS: i64 = 25;
/// Reputation penalty applied on a `false_alarm` rejection.
const REJECTION_REPUTATION_PENALTY: i64 = 5;

/// Fired on submission (reporter non-null).
///
/// This hook does **not** increment `reports_submitted` itself — the upload handler
/// already did so exactly once at the upload edge. This function only
/// evaluates the "reports" badge family against the already-updated counter
/// and returns the identifiers newly awarded (empty if none are new).
pub fn on_submission(profile: &mut UserProfile) -> Vec<String> {
    award_new(profile, "reports", profile.reports_submitted)
}

/// Fired when an event transitions into `verified`.
///
/// Increments `reports_verified`, applies the reputation bonus (larger when
/// the event's severity was Critical), awards the one-shot
/// "emergency_responder" marker on that same condition, and evaluates the
/// "verified" and "reputation" badge families.
pub fn on_verification(profile: &mut UserProfile, event_severity: Severity) -> Vec<String> {
    profile.reports_verified += 1;

    let mut bonus = VERIFICATION_REPUTATION_BONUS;
    let mut newly_awarded = Vec::new();

    if event_severity == Severity::Critical {
        bonus += CRITICAL_VERIFICATION_BONUS;
        if profile.badges.insert("emergency_responder".to_string()) {
            newly_awarded.push("emergency_responder".to_string());
        }
    }

    profile.reputation_score += bonus;

    newly_awarded.extend(award_new(profile, "verified", profile.reports_verified));
    newly_awarded.extend(award_new_signed(profile, "reputation", profile.reputation_score));

    newly_awarded
}

/// Fired when an event transitions into `false_alarm`. Never revokes
/// badges already awarded.
pub fn on_rejection(profile: &mut UserProfile) {
    profile.reputation_score -= REJECTION_REPUTATION_PENALTY;
}

fn award_new(profile: &mut UserProfile, family: &str, value: u32) -> Vec<String> {
    award_new_signed(profile, family, value as i64)
}

fn award_new_signed(profile: &mut UserProfile, family: &str, value: i64) -> Vec<String> {
    if value <= 0 {
        return Vec::new();
    }
    thresholds_met(family, value as u32)
        .filter(|identifier| profile.badges.insert(identifier.to_string()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_hook_awards_first_report_without_incrementing() {
        let mut profile = UserProfile::new(1);
        profile.reports_submitted = 1; // caller already incremented
        let awarded = on_submission(&mut profile);
        assert_eq!(awarded, vec!["first_report".to_string()]);
        assert_eq!(profile.reports_submitted, 1);
    }

    #[test]
    fn submission_hook_is_idempotent_once_badge_is_owned() {
        let mut profile = UserProfile::new(1);
        profile.reports_submitted = 1;
        on_submission(&mut profile);
        let second_pass = on_submission(&mut profile);
        assert!(second_pass.is_empty());
    }

    #[test]
    fn verification_of_critical_event_awards_emergency_responder_and_35_points() {
        let mut profile = UserProfile::new(1);
        let awarded = on_verification(&mut profile, Severity::Critical);
        assert_eq!(profile.reputation_score, 35);
        assert_eq!(profile.reports_verified, 1);
        assert!(awarded.contains(&"emergency_responder".to_string()));
        assert!(awarded.contains(&"first_verified".to_string()));
    }

    #[test]
    fn verification_of_low_severity_event_awards_ten_points_only() {
        let mut profile = UserProfile::new(1);
        on_verification(&mut profile, Severity::Low);
        assert_eq!(profile.reputation_score, 10);
        assert!(!profile.badges.contains("emergency_responder"));
    }

    #[test]
    fn rejection_never_revokes_badges() {
        let mut profile = UserProfile::new(1);
        profile.badges.insert("first_report".to_string());
        on_rejection(&mut profile);
        assert_eq!(profile.reputation_score, -5);
        assert!(profile.badges.contains("first_report"));
    }
}
