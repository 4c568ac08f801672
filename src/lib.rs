//! # Curriculum Seed
//!
//! Idempotent schema migration and hierarchical curriculum seeding for SQLite.
//!
//! The engine ingests one JSON document per grade (grade → subjects → units →
//! topics) plus question-bank files (question → options), resolving the
//! natural keys used across documents into the surrogate ids the database
//! assigns, without ever producing duplicate rows on repeated runs.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌─────────────────────────┐   ┌──────────┐
//! │ JSON files   │──▶│ load → extract → resolve │──▶│  SQLite   │
//! │ grades/quiz  │   │   → batched upserts      │   │ (sqlx)    │
//! └──────────────┘   └─────────────────────────┘   └────┬─────┘
//!                                                       │
//!                                                  ┌────▼─────┐
//!                                                  │ seedctl  │
//!                                                  └──────────┘
//! ```
//!
//! Each hierarchy level is committed before the next level's statements are
//! generated, so a unit insert can never reference a subject that is not
//! already persisted. Parent ids are re-resolved from the database at every
//! level rather than cached, which is what makes a re-run after a partial
//! failure converge instead of duplicating rows.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`schema`] | Table creation/drop in dependency order |
//! | [`indexes`] | Idempotent secondary index provisioning |
//! | [`models`] | Document, row, and report types |
//! | [`loader`] | Grade-file discovery, parsing, and extraction |
//! | [`resolve`] | Natural-key → surrogate-id resolution |
//! | [`upsert`] | Batched parameterized upserts per level |
//! | [`curriculum`] | Level-by-level curriculum seeding |
//! | [`questions`] | Per-file question + option ingestion |
//! | [`users`] | Default user bootstrap |
//! | [`seeder`] | Façade aggregating every operation |
//! | [`status`] | Row-count overview |

pub mod config;
pub mod curriculum;
pub mod db;
pub mod indexes;
pub mod loader;
pub mod models;
pub mod questions;
pub mod resolve;
pub mod schema;
pub mod seeder;
pub mod status;
pub mod upsert;
pub mod users;
