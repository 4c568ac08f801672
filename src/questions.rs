//! Question-bank ingestion.
//!
//! One JSON file = one topic's worth of questions:
//!
//! ```json
//! {
//!   "metadata": { "grade": 5, "subject": "Matematik",
//!                 "unit": "Doğal Sayılar", "topic": "Kesirler" },
//!   "questions": [
//!     { "question_text": "...", "points": 10,
//!       "options": [ { "option_text": "...", "is_correct": true } ] }
//!   ]
//! }
//! ```
//!
//! The owning topic is resolved by the four-way name join before anything is
//! inserted; an unresolvable topic or incomplete metadata yields a
//! `(0, total)` report for the file with no rows written. Within a file, one
//! question's failure never aborts the rest.

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::models::{grade_display_name, FileReport, QuestionDoc, QuestionFile, SeedFailure};
use crate::resolve;

/// Seed every question file under the configured quiz-bank directory.
pub async fn seed_all(pool: &SqlitePool, config: &Config) -> Result<Vec<FileReport>> {
    seed_directory(pool, &config.quiz_bank.dir).await
}

/// Recursively discover `*.json` files under `dir` and seed each one.
/// A missing directory yields an empty report list.
pub async fn seed_directory(pool: &SqlitePool, dir: &Path) -> Result<Vec<FileReport>> {
    let mut reports = Vec::new();
    if !dir.is_dir() {
        return Ok(reports);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().and_then(|ext| ext.to_str()) == Some("json")
        })
        .map(|entry| entry.into_path())
        .collect();

    // Sort for deterministic ordering
    files.sort();

    for file in files {
        reports.push(seed_file(pool, &file).await?);
    }
    Ok(reports)
}

/// Seed a single question file.
///
/// File-level problems (unreadable, malformed JSON, incomplete metadata,
/// unresolvable topic) are reported, not raised; only a database-connection
/// failure propagates.
pub async fn seed_file(pool: &SqlitePool, path: &Path) -> Result<FileReport> {
    let mut report = FileReport::new(path.display().to_string());

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            report
                .failures
                .push(SeedFailure::new(&report.file, format!("unreadable: {}", err)));
            return Ok(report);
        }
    };

    let file: QuestionFile = match serde_json::from_str(&text) {
        Ok(file) => file,
        Err(err) => {
            report
                .failures
                .push(SeedFailure::new(&report.file, format!("malformed JSON: {}", err)));
            return Ok(report);
        }
    };
    report.total = file.questions.len();

    let Some(meta) = file.metadata else {
        report
            .failures
            .push(SeedFailure::new(&report.file, "missing metadata block"));
        return Ok(report);
    };
    let (Some(grade), Some(subject), Some(unit), Some(topic)) =
        (meta.grade, &meta.subject, &meta.unit, &meta.topic)
    else {
        report.failures.push(SeedFailure::new(
            &report.file,
            "metadata must name grade, subject, unit, and topic",
        ));
        return Ok(report);
    };

    let grade_name = grade_display_name(grade);
    let Some(topic_id) = resolve::topic_id(pool, &grade_name, subject, unit, topic).await? else {
        report.failures.push(SeedFailure::new(
            &report.file,
            format!(
                "topic not found: {} / {} / {} / {}",
                grade_name, subject, unit, topic
            ),
        ));
        return Ok(report);
    };

    for (index, question) in file.questions.iter().enumerate() {
        let record = format!("{}#{}", report.file, index);
        let Some(question_text) = question.question_text.as_deref() else {
            report
                .failures
                .push(SeedFailure::new(record, "question_text missing"));
            continue;
        };

        match insert_question(pool, topic_id, question, question_text).await {
            Ok(option_failures) => {
                report.succeeded += 1;
                report.failures.extend(option_failures);
            }
            Err(err) => {
                report
                    .failures
                    .push(SeedFailure::new(record, err.to_string()));
            }
        }
    }

    Ok(report)
}

/// Insert one question and its options inside a single transaction.
///
/// A failed option insert is recorded but does not fail the question — the
/// question row still commits and counts as succeeded. Only a failure of the
/// question insert itself (or the commit) is an error.
async fn insert_question(
    pool: &SqlitePool,
    topic_id: i64,
    question: &QuestionDoc,
    question_text: &str,
) -> Result<Vec<SeedFailure>> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO questions
            (topic_id, question_text, difficulty_level, question_type, points, description, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(topic_id)
    .bind(question_text)
    .bind(&question.difficulty_level)
    .bind(&question.question_type)
    .bind(question.points)
    .bind(&question.description)
    .bind(chrono::Utc::now().timestamp())
    .execute(&mut *tx)
    .await?;
    let question_id = result.last_insert_rowid();

    let mut option_failures = Vec::new();
    for option in &question.options {
        let Some(option_text) = option.option_text.as_deref() else {
            option_failures.push(SeedFailure::new(
                format!("question {}", question_id),
                "option_text missing",
            ));
            continue;
        };
        let inserted = sqlx::query(
            "INSERT INTO question_options (question_id, option_text, is_correct, description)
             VALUES (?, ?, ?, ?)",
        )
        .bind(question_id)
        .bind(option_text)
        .bind(option.is_correct)
        .bind(&option.description)
        .execute(&mut *tx)
        .await;
        if let Err(err) = inserted {
            option_failures.push(SeedFailure::new(
                format!("question {}", question_id),
                format!("option insert failed: {}", err),
            ));
        }
    }

    tx.commit().await?;
    Ok(option_failures)
}
