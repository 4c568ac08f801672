//! Curriculum seeding orchestration.
//!
//! `seed_curriculum` runs one full round-trip per hierarchy level, strictly
//! in parent-before-child order:
//!
//! ```text
//! load → upsert grades   → commit
//!      → resolve grade ids (fresh query)
//!      → upsert subjects  → commit
//!      → resolve subject ids
//!      → upsert units     → commit
//!      → resolve unit ids
//!      → upsert topics    → commit
//! ```
//!
//! Each level's statement executes and commits before the next level's
//! statement is even generated, and every parent-id map is resolved from the
//! database after the parent commit — never accumulated mid-loop. That
//! ordering is what guarantees a unit can only ever reference a subject row
//! that already exists.

use anyhow::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::config::Config;
use crate::loader;
use crate::models::{grade_display_name, SeedReport};
use crate::resolve;
use crate::upsert;

/// Insert the canonical 1..12 grade ladder, but only when the grades table
/// is completely empty. Returns the number of rows inserted.
pub async fn seed_grades_if_empty(pool: &SqlitePool) -> Result<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM grades")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(0);
    }

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO grades (grade_name, description, is_active) ");
    qb.push_values(1i64..=12, |mut b, level| {
        b.push_bind(grade_display_name(level))
            .push_bind(format!("{}. sınıf müfredatı", level))
            .push_bind(1i64);
    });
    qb.push(" ON CONFLICT(grade_name) DO NOTHING");

    Ok(qb.build().execute(pool).await?.rows_affected())
}

/// Seed the full grade → subject → unit → topic hierarchy from the
/// configured curriculum directory.
///
/// An empty or missing directory is a successful no-op. Records whose parent
/// key did not resolve are dropped and listed in the report's failures; they
/// never abort the run.
pub async fn seed_curriculum(pool: &SqlitePool, config: &Config) -> Result<SeedReport> {
    let docs = loader::load_all(&config.curriculum.dir, &config.curriculum.grade_file_glob)?;

    let mut report = SeedReport::success(0);
    if docs.is_empty() {
        return Ok(report);
    }

    report.written += upsert::grades(pool, &docs).await?;

    let grade_ids = resolve::grade_ids(pool, docs.keys().copied()).await?;

    let subjects = loader::extract_subjects(&docs);
    let outcome = upsert::subjects(pool, &subjects, &grade_ids).await?;
    report.written += outcome.written;
    report.failures.extend(outcome.dropped);

    let subject_ids = resolve::subject_ids(pool, &subjects).await?;

    let units = loader::extract_units(&docs);
    let outcome = upsert::units(pool, &units, &subject_ids).await?;
    report.written += outcome.written;
    report.failures.extend(outcome.dropped);

    let unit_ids = resolve::unit_ids(pool, &units, &subjects).await?;

    let topics = loader::extract_topics(&docs);
    let outcome = upsert::topics(pool, &topics, &unit_ids).await?;
    report.written += outcome.written;
    report.failures.extend(outcome.dropped);

    Ok(report)
}
