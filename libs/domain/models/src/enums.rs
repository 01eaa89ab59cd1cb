// [libs/domain/models/src/enums.rs]
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

/// Coarse incident taxonomy returned by the classifier.
#[typeshare]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Emergency,
    Security,
    Traffic,
    Protest,
    Infrastructure,
    Environmental,
    Informational,
    /// Sentinel held by a freshly submitted event before the classify stage
    /// runs. Distinct from `Informational`, which is a genuine (AI-assigned
    /// or sentinel-on-failure) classification outcome -- summary stats
    /// exclude this one from the category breakdown while still counting it
    /// in totals/status/severity.
    Unclassified,
}

impl Category {
    /// Case-insensitive coercion with a safe fallback: an unrecognized
    /// classifier string degrades to `Informational` rather than rejecting
    /// the classification outright.
    pub fn coerce(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "emergency" => Category::Emergency,
            "security" => Category::Security,
            "traffic" => Category::Traffic,
            "protest" => Category::Protest,
            "infrastructure" => Category::Infrastructure,
            "environmental" => Category::Environmental,
            "unclassified" => Category::Unclassified,
            _ => Category::Informational,
        }
    }

    /// The wire-stable string for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Emergency => "emergency",
            Category::Security => "security",
            Category::Traffic => "traffic",
            Category::Protest => "protest",
            Category::Infrastructure => "infrastructure",
            Category::Environmental => "environmental",
            Category::Informational => "informational",
            Category::Unclassified => "unclassified",
        }
    }
}

/// Ordinal incident priority, `1` (Low) through `4` (Critical).
#[typeshare]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Severity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl Severity {
    /// Clamps an arbitrary integer into the nearest valid severity.
    pub fn clamp(raw: i64) -> Self {
        match raw {
            i64::MIN..=1 => Severity::Low,
            2 => Severity::Medium,
            3 => Severity::High,
            _ => Severity::Critical,
        }
    }
}

impl From<Severity> for u8 {
    fn from(value: Severity) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Severity::Low),
            2 => Ok(Severity::Medium),
            3 => Ok(Severity::High),
            4 => Ok(Severity::Critical),
            other => Err(format!("severity {other} out of range [1,4]")),
        }
    }
}

/// Triage state of an event through the operator workflow.
#[typeshare]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    New,
    Reviewing,
    Verified,
    Resolved,
    FalseAlarm,
}

impl Status {
    /// Parses the wire-stable string form, used by the `/events` listing
    /// filter, where `new` is a legitimate filter value.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "new" => Some(Status::New),
            "reviewing" => Some(Status::Reviewing),
            "verified" => Some(Status::Verified),
            "resolved" => Some(Status::Resolved),
            "false_alarm" => Some(Status::FalseAlarm),
            _ => None,
        }
    }

    /// Parses a status as a valid operator PATCH target (`PATCH
    /// /events/{id}/status` accepts only `reviewing | verified | resolved |
    /// false_alarm`). `new` is excluded -- it is the pipeline-assigned
    /// initial state, never an operator-chosen triage target, and accepting
    /// it would let a PATCH stamp `reviewed_by`/`reviewed_at` against
    /// an event no operator has actually looked at yet.
    pub fn parse_operator_target(raw: &str) -> Option<Self> {
        match Self::parse(raw)? {
            Status::New => None,
            other => Some(other),
        }
    }

    /// The wire-stable string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Reviewing => "reviewing",
            Status::Verified => "verified",
            Status::Resolved => "resolved",
            Status::FalseAlarm => "false_alarm",
        }
    }
}

/// Coarse media family; drives which pipeline stages apply.
#[typeshare]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classifies a MIME content-type string into `image`/`video`, rejecting
    /// anything else (the upload validator's content-type gate).
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        if content_type.starts_with("image/") {
            Some(MediaKind::Image)
        } else if content_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// The wire-stable string for this media kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_coerces_unknown_to_informational() {
        assert_eq!(Category::coerce("EMERGENCY"), Category::Emergency);
        assert_eq!(Category::coerce("not-a-real-category"), Category::Informational);
    }

    #[test]
    fn category_round_trips_unclassified() {
        assert_eq!(Category::coerce("unclassified"), Category::Unclassified);
        assert_eq!(Category::Unclassified.as_str(), "unclassified");
    }

    #[test]
    fn severity_clamps_out_of_range_values() {
        assert_eq!(Severity::clamp(0), Severity::Low);
        assert_eq!(Severity::clamp(99), Severity::Critical);
        assert_eq!(Severity::clamp(3), Severity::High);
    }

    #[test]
    fn media_kind_rejects_non_media_content_type() {
        assert_eq!(MediaKind::from_content_type("image/png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_content_type("video/mp4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_content_type("application/pdf"), None);
    }
}
