//! Idempotent secondary index provisioning.
//!
//! `CREATE INDEX IF NOT EXISTS` would be enough for SQLite, but the declared
//! list is probed against the system catalog first so that an index renamed
//! or hand-dropped by an operator is recreated under exactly the declared
//! name. The check-then-act pair is not race-free under concurrent callers;
//! this runs in the single-process bootstrap path only.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// `(table, index_name, columns)` — the full set of secondary indexes.
pub const INDEXES: &[(&str, &str, &str)] = &[
    ("subjects", "idx_subjects_grade_id", "grade_id"),
    ("units", "idx_units_subject_id", "subject_id"),
    ("topics", "idx_topics_unit_id", "unit_id"),
    ("questions", "idx_questions_topic_id", "topic_id"),
    (
        "question_options",
        "idx_question_options_question_id",
        "question_id",
    ),
    ("quiz_sessions", "idx_quiz_sessions_user_id", "user_id"),
    (
        "quiz_session_questions",
        "idx_quiz_session_questions_session_id",
        "session_id",
    ),
    ("chat_messages", "idx_chat_messages_session_id", "session_id"),
];

/// Create every declared index that is not already present in the catalog.
pub async fn ensure_indexes(pool: &SqlitePool) -> Result<()> {
    for (table, name, columns) in INDEXES {
        let exists: bool = sqlx::query_scalar(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'index' AND name = ? AND tbl_name = ?",
        )
        .bind(name)
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            let ddl = format!("CREATE INDEX {} ON {} ({})", name, table, columns);
            sqlx::query(&ddl)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to create index '{}'", name))?;
        }
    }
    Ok(())
}
