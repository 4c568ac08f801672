//! Table creation and teardown.
//!
//! The full schema is declared as one DDL statement per table, listed in
//! foreign-key dependency order (parents first). `ensure_tables` walks the
//! list forwards, `drop_all_tables` walks it in reverse. Every statement is
//! itself idempotent (`IF NOT EXISTS` / `IF EXISTS`), so a failed run can be
//! retried without cleanup: tables created before the failure stay in place
//! and are skipped on the next attempt.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// `(table_name, create_statement)` in creation order.
///
/// Natural-key uniqueness is enforced here, not in application code — the
/// upsert conflict targets in [`crate::upsert`] depend on these constraints
/// existing.
pub const TABLES: &[(&str, &str)] = &[
    (
        "grades",
        "CREATE TABLE IF NOT EXISTS grades (
            grade_id    INTEGER PRIMARY KEY AUTOINCREMENT,
            grade_name  TEXT NOT NULL UNIQUE,
            description TEXT,
            is_active   INTEGER NOT NULL DEFAULT 1
        )",
    ),
    (
        "subjects",
        "CREATE TABLE IF NOT EXISTS subjects (
            subject_id   INTEGER PRIMARY KEY AUTOINCREMENT,
            grade_id     INTEGER NOT NULL REFERENCES grades(grade_id),
            subject_name TEXT NOT NULL,
            description  TEXT,
            is_active    INTEGER NOT NULL DEFAULT 1,
            UNIQUE(grade_id, subject_name)
        )",
    ),
    (
        "units",
        "CREATE TABLE IF NOT EXISTS units (
            unit_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id  INTEGER NOT NULL REFERENCES subjects(subject_id),
            unit_name   TEXT NOT NULL,
            description TEXT,
            is_active   INTEGER NOT NULL DEFAULT 1,
            UNIQUE(subject_id, unit_name)
        )",
    ),
    (
        "topics",
        "CREATE TABLE IF NOT EXISTS topics (
            topic_id    INTEGER PRIMARY KEY AUTOINCREMENT,
            unit_id     INTEGER NOT NULL REFERENCES units(unit_id),
            topic_name  TEXT NOT NULL,
            description TEXT,
            is_active   INTEGER NOT NULL DEFAULT 1,
            UNIQUE(unit_id, topic_name)
        )",
    ),
    (
        "questions",
        "CREATE TABLE IF NOT EXISTS questions (
            question_id      INTEGER PRIMARY KEY AUTOINCREMENT,
            topic_id         INTEGER NOT NULL REFERENCES topics(topic_id),
            question_text    TEXT NOT NULL,
            difficulty_level TEXT NOT NULL DEFAULT 'medium',
            question_type    TEXT NOT NULL DEFAULT 'multiple_choice',
            points           INTEGER NOT NULL DEFAULT 10,
            description      TEXT,
            created_at       INTEGER NOT NULL
        )",
    ),
    (
        "question_options",
        "CREATE TABLE IF NOT EXISTS question_options (
            option_id   INTEGER PRIMARY KEY AUTOINCREMENT,
            question_id INTEGER NOT NULL REFERENCES questions(question_id),
            option_text TEXT NOT NULL,
            is_correct  INTEGER NOT NULL DEFAULT 0,
            description TEXT
        )",
    ),
    (
        "users",
        "CREATE TABLE IF NOT EXISTS users (
            user_id       INTEGER PRIMARY KEY AUTOINCREMENT,
            username      TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role          TEXT NOT NULL DEFAULT 'student',
            created_at    INTEGER NOT NULL
        )",
    ),
    (
        "quiz_sessions",
        "CREATE TABLE IF NOT EXISTS quiz_sessions (
            session_id  INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER NOT NULL REFERENCES users(user_id),
            topic_id    INTEGER REFERENCES topics(topic_id),
            started_at  INTEGER NOT NULL,
            finished_at INTEGER,
            score       INTEGER
        )",
    ),
    (
        "quiz_session_questions",
        "CREATE TABLE IF NOT EXISTS quiz_session_questions (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id         INTEGER NOT NULL REFERENCES quiz_sessions(session_id),
            question_id        INTEGER NOT NULL REFERENCES questions(question_id),
            selected_option_id INTEGER REFERENCES question_options(option_id),
            is_correct         INTEGER
        )",
    ),
    (
        "chat_sessions",
        "CREATE TABLE IF NOT EXISTS chat_sessions (
            session_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id    INTEGER NOT NULL REFERENCES users(user_id),
            title      TEXT,
            started_at INTEGER NOT NULL
        )",
    ),
    (
        "chat_messages",
        "CREATE TABLE IF NOT EXISTS chat_messages (
            message_id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id INTEGER NOT NULL REFERENCES chat_sessions(session_id),
            role       TEXT NOT NULL,
            content    TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )",
    ),
];

/// Create every table that does not already exist, parents before children.
///
/// Each statement commits on its own; the first failure aborts the rest of
/// the sequence but leaves already-created tables in place.
pub async fn ensure_tables(pool: &SqlitePool) -> Result<()> {
    for (name, ddl) in TABLES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create table '{}'", name))?;
    }
    Ok(())
}

/// Drop every table, children before parents.
pub async fn drop_all_tables(pool: &SqlitePool) -> Result<()> {
    for (name, _) in TABLES.iter().rev() {
        let ddl = format!("DROP TABLE IF EXISTS {}", name);
        sqlx::query(&ddl)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to drop table '{}'", name))?;
    }
    Ok(())
}

/// Drop and recreate the full schema.
pub async fn force_recreate(pool: &SqlitePool) -> Result<()> {
    drop_all_tables(pool).await?;
    ensure_tables(pool).await
}
