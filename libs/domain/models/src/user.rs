// [libs/domain/models/src/user.rs]
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use typeshare::typeshare;

/// An authenticated account. Password digests never leave this crate's
/// owning repository layer — they are intentionally absent from any wire DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_digest: String,
    pub is_staff: bool,
}

/// Per-user gamification ledger, 1-to-1 with a [`User`].
///
/// `reports_submitted` and `reports_verified` are monotonically
/// non-decreasing; `badges` is a set union, never revoked by automated
/// paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub reports_submitted: u32,
    pub reports_verified: u32,
    pub reputation_score: i64,
    pub badges: BTreeSet<String>,
}

impl UserProfile {
    /// A freshly created profile, as materialized lazily on first
    /// registration or first report (Lifecycles).
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            reports_submitted: 0,
            reports_verified: 0,
            reputation_score: 0,
            badges: BTreeSet::new(),
        }
    }

    /// Projects this profile to its wire representation.
    pub fn to_wire(&self, username: String) -> UserProfileOut {
        UserProfileOut {
            user_id: self.user_id,
            username,
            reports_submitted: self.reports_submitted,
            reports_verified: self.reports_verified,
            reputation_score: self.reputation_score,
            badges: self.badges.iter().cloned().collect(),
        }
    }
}

/// Wire shape of a UserProfile, folded into `/auth/me` and the leaderboard.
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileOut {
    pub user_id: i64,
    pub username: String,
    #[typeshare(serialized_as = "number")]
    pub reports_submitted: u32,
    #[typeshare(serialized_as = "number")]
    pub reports_verified: u32,
    #[typeshare(serialized_as = "number")]
    pub reputation_score: i64,
    pub badges: Vec<String>,
}
