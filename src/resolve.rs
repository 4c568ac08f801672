//! Natural-key → surrogate-id resolution.
//!
//! Every function here goes back to the live database; nothing is cached
//! across phases or runs. That is deliberate: the database is the single
//! source of truth, so a re-run after a partial failure resolves against
//! whatever actually got committed, and converges instead of duplicating.
//!
//! Resolution failures are never errors — a key absent from the returned map
//! means "skip this record", and its children fall out of the pipeline the
//! same way.

use anyhow::Result;
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::models::{grade_display_name, SubjectRow, UnitRow};

/// Map each grade level to its persisted `grade_id`, looked up by display
/// name. Levels with no matching row are excluded.
pub async fn grade_ids(
    pool: &SqlitePool,
    levels: impl IntoIterator<Item = i64>,
) -> Result<HashMap<i64, i64>> {
    let mut map = HashMap::new();
    for level in levels {
        let id: Option<i64> = sqlx::query_scalar("SELECT grade_id FROM grades WHERE grade_name = ?")
            .bind(grade_display_name(level))
            .fetch_optional(pool)
            .await?;
        if let Some(id) = id {
            map.insert(level, id);
        }
    }
    Ok(map)
}

/// Map `(grade_level, subject_code)` to `subject_id` for every extracted
/// subject, joining on subject name + parent grade name.
pub async fn subject_ids(
    pool: &SqlitePool,
    subjects: &[SubjectRow],
) -> Result<HashMap<(i64, String), i64>> {
    let mut map = HashMap::new();
    for row in subjects {
        let id: Option<i64> = sqlx::query_scalar(
            "SELECT s.subject_id
             FROM subjects s
             JOIN grades g ON g.grade_id = s.grade_id
             WHERE g.grade_name = ? AND s.subject_name = ?",
        )
        .bind(grade_display_name(row.grade_level))
        .bind(&row.subject_name)
        .fetch_optional(pool)
        .await?;
        if let Some(id) = id {
            map.insert((row.grade_level, row.subject_code.clone()), id);
        }
    }
    Ok(map)
}

/// Map `(grade_level, subject_code, unit_code)` to `unit_id` for every
/// extracted unit.
///
/// The join needs the subject *name*, which only the extracted subject
/// tuples know; units whose subject never appeared in the extraction are
/// dropped here.
pub async fn unit_ids(
    pool: &SqlitePool,
    units: &[UnitRow],
    subjects: &[SubjectRow],
) -> Result<HashMap<(i64, String, String), i64>> {
    let subject_names: HashMap<(i64, &str), &str> = subjects
        .iter()
        .map(|s| {
            (
                (s.grade_level, s.subject_code.as_str()),
                s.subject_name.as_str(),
            )
        })
        .collect();

    let mut map = HashMap::new();
    for row in units {
        let Some(subject_name) = subject_names.get(&(row.grade_level, row.subject_code.as_str()))
        else {
            continue;
        };
        let id: Option<i64> = sqlx::query_scalar(
            "SELECT u.unit_id
             FROM units u
             JOIN subjects s ON s.subject_id = u.subject_id
             JOIN grades g ON g.grade_id = s.grade_id
             WHERE g.grade_name = ? AND s.subject_name = ? AND u.unit_name = ?",
        )
        .bind(grade_display_name(row.grade_level))
        .bind(subject_name)
        .bind(&row.unit_name)
        .fetch_optional(pool)
        .await?;
        if let Some(id) = id {
            map.insert(
                (
                    row.grade_level,
                    row.subject_code.clone(),
                    row.unit_code.clone(),
                ),
                id,
            );
        }
    }
    Ok(map)
}

/// Resolve the topic owning a question file via the four-way name join.
pub async fn topic_id(
    pool: &SqlitePool,
    grade_name: &str,
    subject_name: &str,
    unit_name: &str,
    topic_name: &str,
) -> Result<Option<i64>> {
    let id: Option<i64> = sqlx::query_scalar(
        "SELECT t.topic_id
         FROM topics t
         JOIN units u ON u.unit_id = t.unit_id
         JOIN subjects s ON s.subject_id = u.subject_id
         JOIN grades g ON g.grade_id = s.grade_id
         WHERE g.grade_name = ? AND s.subject_name = ? AND u.unit_name = ? AND t.topic_name = ?",
    )
    .bind(grade_name)
    .bind(subject_name)
    .bind(unit_name)
    .bind(topic_name)
    .fetch_optional(pool)
    .await?;
    Ok(id)
}
