// [libs/infra/db/src/repositories/users.rs]
use crate::errors::DbError;
use attention_domain_models::{User, UserProfile};
use chrono::Utc;
use libsql::{params, Connection, Row};
use std::collections::BTreeSet;

/// Persistence for [`User`] accounts and their [`UserProfile`] ledgers.
#[derive(Clone)]
pub struct UserRepository {
    conn: Connection,
}

impl UserRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Registers a new account plus its freshly materialized profile, in a
    /// single transaction. A profile always exists once a user does, never
    /// created lazily on first report.
    pub async fn create(&self, username: &str, email: &str, password_digest: &str) -> Result<User, DbError> {
        let tx = self.conn.transaction().await.map_err(|e| DbError::Transaction(e.to_string()))?;

        tx.execute(
            "INSERT INTO users (username, email, password_digest, is_staff, created_at) VALUES (?,?,?,0,?)",
            params![username, email, password_digest, Utc::now().to_rfc3339()],
        )
        .await?;

        let id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO user_profiles (user_id, reports_submitted, reports_verified, reputation_score, badges) VALUES (?,0,0,0,'[]')",
            params![id],
        )
        .await?;

        tx.commit().await.map_err(|e| DbError::Transaction(e.to_string()))?;

        Ok(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_digest: password_digest.to_string(),
            is_staff: false,
        })
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let mut rows = self
            .conn
            .query("SELECT id, username, email, password_digest, is_staff FROM users WHERE username = ?", params![username])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let mut rows = self
            .conn
            .query("SELECT id, username, email, password_digest, is_staff FROM users WHERE id = ?", params![id])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Renames an account, used by `PATCH /auth/me`.
    pub async fn update_username(&self, user_id: i64, username: &str) -> Result<(), DbError> {
        self.conn.execute("UPDATE users SET username = ? WHERE id = ?", params![username, user_id]).await?;
        Ok(())
    }

    pub async fn get_profile(&self, user_id: i64) -> Result<Option<UserProfile>, DbError> {
        let mut rows = self
            .conn
            .query(
                "SELECT user_id, reports_submitted, reports_verified, reputation_score, badges FROM user_profiles WHERE user_id = ?",
                params![user_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_profile(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn save_profile(&self, profile: &UserProfile) -> Result<(), DbError> {
        let badges = serde_json::to_string(&profile.badges).map_err(|e| DbError::Mapping(e.to_string()))?;
        self.conn
            .execute(
                r#"UPDATE user_profiles SET
                reports_submitted = ?, reports_verified = ?, reputation_score = ?, badges = ?
                WHERE user_id = ?"#,
                params![
                    profile.reports_submitted as i64,
                    profile.reports_verified as i64,
                    profile.reputation_score,
                    badges,
                    profile.user_id,
                ],
            )
            .await?;
        Ok(())
    }

    /// Leaderboard ordering: reputation descending, then reports verified
    /// descending, then reports submitted descending.
    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<(UserProfile, String)>, DbError> {
        let mut rows = self
            .conn
            .query(
                r#"SELECT p.user_id, p.reports_submitted, p.reports_verified, p.reputation_score, p.badges, u.username
                FROM user_profiles p JOIN users u ON u.id = p.user_id
                ORDER BY p.reputation_score DESC, p.reports_verified DESC, p.reports_submitted DESC
                LIMIT ?"#,
                params![limit as i64],
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            let profile = row_to_profile(&row)?;
            let username: String = row.get(5)?;
            entries.push((profile, username));
        }
        Ok(entries)
    }
}

fn row_to_user(row: &Row) -> Result<User, DbError> {
    let id: i64 = row.get(0)?;
    let username: String = row.get(1)?;
    let email: String = row.get(2)?;
    let password_digest: String = row.get(3)?;
    let is_staff: i64 = row.get(4)?;
    Ok(User { id, username, email, password_digest, is_staff: is_staff != 0 })
}

fn row_to_profile(row: &Row) -> Result<UserProfile, DbError> {
    let user_id: i64 = row.get(0)?;
    let reports_submitted: i64 = row.get(1)?;
    let reports_verified: i64 = row.get(2)?;
    let reputation_score: i64 = row.get(3)?;
    let badges_json: String = row.get(4)?;
    let badges: BTreeSet<String> = serde_json::from_str(&badges_json).map_err(|e| DbError::Mapping(e.to_string()))?;

    Ok(UserProfile {
        user_id,
        reports_submitted: reports_submitted as u32,
        reports_verified: reports_verified as u32,
        reputation_score,
        badges,
    })
}
