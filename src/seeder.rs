//! The seeding façade.
//!
//! [`SeedManager`] aggregates every migration and seeding operation behind
//! one surface for external callers (the CLI, application bootstrap). Its
//! contract: nothing raises. Every method catches internal errors and folds
//! them into the returned report, so a transient seeding failure can never
//! block application startup. Callers that need diagnostics read
//! `report.failures` instead of a stack trace.

use std::path::Path;

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::curriculum;
use crate::db;
use crate::indexes;
use crate::models::{FileReport, SeedFailure, SeedReport};
use crate::questions;
use crate::schema;
use crate::users;

pub struct SeedManager {
    pool: SqlitePool,
    config: Config,
}

impl SeedManager {
    /// Connect to the configured database. This is the only constructor
    /// path that can fail; everything after it reports instead of raising.
    pub async fn connect(config: Config) -> Result<Self> {
        let pool = db::connect(&config).await?;
        Ok(Self { pool, config })
    }

    /// Wrap an existing pool (tests, embedding callers).
    pub fn with_pool(pool: SqlitePool, config: Config) -> Self {
        Self { pool, config }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ensure_tables(&self) -> SeedReport {
        unit_report(schema::ensure_tables(&self.pool).await)
    }

    pub async fn drop_all_tables(&self) -> SeedReport {
        unit_report(schema::drop_all_tables(&self.pool).await)
    }

    pub async fn force_recreate(&self) -> SeedReport {
        unit_report(schema::force_recreate(&self.pool).await)
    }

    pub async fn ensure_indexes(&self) -> SeedReport {
        unit_report(indexes::ensure_indexes(&self.pool).await)
    }

    pub async fn seed_grades_if_empty(&self) -> SeedReport {
        count_report(curriculum::seed_grades_if_empty(&self.pool).await)
    }

    pub async fn seed_curriculum(&self) -> SeedReport {
        match curriculum::seed_curriculum(&self.pool, &self.config).await {
            Ok(report) => report,
            Err(err) => SeedReport::failed(err.to_string()),
        }
    }

    pub async fn seed_default_users(&self) -> SeedReport {
        count_report(users::seed_default_users(&self.pool).await)
    }

    pub async fn seed_all_questions(&self) -> Vec<FileReport> {
        file_reports(
            questions::seed_all(&self.pool, &self.config).await,
            &self.config.quiz_bank.dir,
        )
    }

    pub async fn seed_questions_from_directory(&self, dir: &Path) -> Vec<FileReport> {
        file_reports(questions::seed_directory(&self.pool, dir).await, dir)
    }

    pub async fn seed_questions_from_file(&self, path: &Path) -> FileReport {
        match questions::seed_file(&self.pool, path).await {
            Ok(report) => report,
            Err(err) => {
                let mut report = FileReport::new(path.display().to_string());
                report
                    .failures
                    .push(SeedFailure::new(path.display().to_string(), err.to_string()));
                report
            }
        }
    }
}

fn unit_report(result: Result<()>) -> SeedReport {
    match result {
        Ok(()) => SeedReport::success(0),
        Err(err) => SeedReport::failed(err.to_string()),
    }
}

fn count_report(result: Result<u64>) -> SeedReport {
    match result {
        Ok(written) => SeedReport::success(written),
        Err(err) => SeedReport::failed(err.to_string()),
    }
}

fn file_reports(result: Result<Vec<FileReport>>, scope: &Path) -> Vec<FileReport> {
    match result {
        Ok(reports) => reports,
        Err(err) => {
            let mut report = FileReport::new(scope.display().to_string());
            report
                .failures
                .push(SeedFailure::new(scope.display().to_string(), err.to_string()));
            vec![report]
        }
    }
}
