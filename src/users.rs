//! Default user bootstrap.
//!
//! Two fixed demo accounts, upserted on `username`. The SHA-256 digest here
//! is bootstrap plumbing so the column is never stored in clear text; the
//! application's real authentication layer owns password policy.

use anyhow::Result;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

const DEFAULT_USERS: &[(&str, &str, &str)] = &[
    ("admin", "admin123", "admin"),
    ("student", "student123", "student"),
];

/// Upsert the fixed default accounts. Returns the number of rows written.
pub async fn seed_default_users(pool: &SqlitePool) -> Result<u64> {
    let now = chrono::Utc::now().timestamp();
    let mut written = 0u64;

    for (username, password, role) in DEFAULT_USERS {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        let password_hash = format!("{:x}", hasher.finalize());

        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, role, created_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(username) DO UPDATE SET role = excluded.role",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(now)
        .execute(pool)
        .await?;
        written += result.rows_affected();
    }

    Ok(written)
}
