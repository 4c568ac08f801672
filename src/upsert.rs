//! Batched upserts, one statement per hierarchy level.
//!
//! Statements are built with [`sqlx::QueryBuilder`] and bound parameters —
//! values are never spliced into SQL text. Conflict targets are the
//! natural-key unique constraints declared in [`crate::schema`]; the update
//! arm touches only descriptive fields, so a surrogate id, once assigned,
//! never changes and a re-run can only refresh names and descriptions.
//!
//! Rows whose parent id is missing from the resolution map are dropped and
//! reported, and a level with nothing left to insert issues no statement at
//! all.

use anyhow::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::{BTreeMap, HashMap};

use crate::models::{
    grade_display_name, GradeDocument, SeedFailure, SubjectRow, TopicRow, UnitRow,
};

/// Result of one level's batch: rows written plus records dropped for a
/// missing parent key.
#[derive(Debug, Default)]
pub struct LevelOutcome {
    pub written: u64,
    pub dropped: Vec<SeedFailure>,
}

/// Upsert one grade row per loaded document, keyed on `grade_name`.
pub async fn grades(pool: &SqlitePool, docs: &BTreeMap<i64, GradeDocument>) -> Result<u64> {
    if docs.is_empty() {
        return Ok(0);
    }

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO grades (grade_name, description, is_active) ");
    qb.push_values(docs.iter(), |mut b, (level, doc)| {
        let name = doc
            .grade_name
            .clone()
            .unwrap_or_else(|| grade_display_name(*level));
        b.push_bind(name)
            .push_bind(doc.description.clone().unwrap_or_default())
            .push_bind(1i64);
    });
    qb.push(" ON CONFLICT(grade_name) DO UPDATE SET description = excluded.description");

    let result = qb.build().execute(pool).await?;
    Ok(result.rows_affected())
}

/// Upsert subjects, keyed on `(grade_id, subject_name)`.
pub async fn subjects(
    pool: &SqlitePool,
    rows: &[SubjectRow],
    grade_ids: &HashMap<i64, i64>,
) -> Result<LevelOutcome> {
    let mut outcome = LevelOutcome::default();

    let mut resolved: Vec<(i64, &SubjectRow)> = Vec::new();
    for row in rows {
        match grade_ids.get(&row.grade_level) {
            Some(id) => resolved.push((*id, row)),
            None => outcome.dropped.push(SeedFailure::new(
                format!("subject {}/{}", row.grade_level, row.subject_code),
                format!("grade {} not resolved", row.grade_level),
            )),
        }
    }
    if resolved.is_empty() {
        return Ok(outcome);
    }

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO subjects (grade_id, subject_name, description, is_active) ");
    qb.push_values(resolved, |mut b, (grade_id, row)| {
        b.push_bind(grade_id)
            .push_bind(row.subject_name.clone())
            .push_bind(row.description.clone())
            .push_bind(1i64);
    });
    qb.push(
        " ON CONFLICT(grade_id, subject_name) DO UPDATE SET description = excluded.description",
    );

    outcome.written = qb.build().execute(pool).await?.rows_affected();
    Ok(outcome)
}

/// Upsert units, keyed on `(subject_id, unit_name)`.
pub async fn units(
    pool: &SqlitePool,
    rows: &[UnitRow],
    subject_ids: &HashMap<(i64, String), i64>,
) -> Result<LevelOutcome> {
    let mut outcome = LevelOutcome::default();

    let mut resolved: Vec<(i64, &UnitRow)> = Vec::new();
    for row in rows {
        match subject_ids.get(&(row.grade_level, row.subject_code.clone())) {
            Some(id) => resolved.push((*id, row)),
            None => outcome.dropped.push(SeedFailure::new(
                format!(
                    "unit {}/{}/{}",
                    row.grade_level, row.subject_code, row.unit_code
                ),
                format!("subject {} not resolved", row.subject_code),
            )),
        }
    }
    if resolved.is_empty() {
        return Ok(outcome);
    }

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO units (subject_id, unit_name, description, is_active) ");
    qb.push_values(resolved, |mut b, (subject_id, row)| {
        b.push_bind(subject_id)
            .push_bind(row.unit_name.clone())
            .push_bind(row.description.clone())
            .push_bind(1i64);
    });
    qb.push(" ON CONFLICT(subject_id, unit_name) DO UPDATE SET description = excluded.description");

    outcome.written = qb.build().execute(pool).await?.rows_affected();
    Ok(outcome)
}

/// Upsert topics, keyed on `(unit_id, topic_name)`.
pub async fn topics(
    pool: &SqlitePool,
    rows: &[TopicRow],
    unit_ids: &HashMap<(i64, String, String), i64>,
) -> Result<LevelOutcome> {
    let mut outcome = LevelOutcome::default();

    let mut resolved: Vec<(i64, &TopicRow)> = Vec::new();
    for row in rows {
        let key = (
            row.grade_level,
            row.subject_code.clone(),
            row.unit_code.clone(),
        );
        match unit_ids.get(&key) {
            Some(id) => resolved.push((*id, row)),
            None => outcome.dropped.push(SeedFailure::new(
                format!(
                    "topic {}/{}/{}/{}",
                    row.grade_level, row.subject_code, row.unit_code, row.topic_code
                ),
                format!("unit {} not resolved", row.unit_code),
            )),
        }
    }
    if resolved.is_empty() {
        return Ok(outcome);
    }

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO topics (unit_id, topic_name, description, is_active) ");
    qb.push_values(resolved, |mut b, (unit_id, row)| {
        b.push_bind(unit_id)
            .push_bind(row.topic_name.clone())
            .push_bind(row.description.clone())
            .push_bind(1i64);
    });
    qb.push(" ON CONFLICT(unit_id, topic_name) DO UPDATE SET description = excluded.description");

    outcome.written = qb.build().execute(pool).await?.rows_affected();
    Ok(outcome)
}
