//! # Curriculum Seed CLI (`seedctl`)
//!
//! `seedctl` is the operational interface to the migration and seeding
//! engine. It creates the schema, provisions indexes, and ingests the
//! curriculum and question-bank JSON trees into SQLite.
//!
//! ## Usage
//!
//! ```bash
//! seedctl --config ./config/seed.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `seedctl init` | Create all tables and indexes (idempotent) |
//! | `seedctl drop --yes` | Drop every table, children first |
//! | `seedctl recreate --yes` | Drop and recreate the schema |
//! | `seedctl seed grades` | Insert the 1..12 grade ladder if empty |
//! | `seedctl seed curriculum` | Seed grades → subjects → units → topics |
//! | `seedctl seed questions` | Seed the configured quiz-bank tree |
//! | `seedctl seed users` | Upsert the default accounts |
//! | `seedctl seed all` | Everything above, in order |
//! | `seedctl status` | Row counts per table |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use curriculum_seed::config;
use curriculum_seed::models::{FileReport, SeedReport};
use curriculum_seed::seeder::SeedManager;
use curriculum_seed::status;

/// Curriculum Seed — idempotent schema migration and hierarchical seeding
/// for SQLite.
#[derive(Parser)]
#[command(
    name = "seedctl",
    about = "Idempotent schema migration and hierarchical curriculum seeding for SQLite",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/seed.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema and indexes.
    ///
    /// Creates the SQLite database file, all eleven tables in dependency
    /// order, and the declared secondary indexes. Safe to re-run.
    Init,

    /// Drop every table, in reverse dependency order.
    Drop {
        /// Required confirmation; without it nothing is dropped.
        #[arg(long)]
        yes: bool,
    },

    /// Drop and recreate the full schema, then re-provision indexes.
    Recreate {
        /// Required confirmation; without it nothing is dropped.
        #[arg(long)]
        yes: bool,
    },

    /// Seed data into the schema.
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },

    /// Show row counts per table.
    Status,
}

/// Seeding targets.
#[derive(Subcommand)]
enum SeedTarget {
    /// Insert the canonical 1..12 grade ladder if the grades table is empty.
    Grades,

    /// Seed the full curriculum hierarchy from the configured directory.
    ///
    /// One JSON document per grade; each hierarchy level is committed before
    /// the next begins, and re-runs update descriptions without duplicating
    /// rows.
    Curriculum,

    /// Seed question files into the question bank.
    ///
    /// With no flags, ingests the configured quiz-bank directory
    /// recursively. `--file` seeds a single file, `--dir` a different tree.
    Questions {
        /// Seed a single question file.
        #[arg(long, conflicts_with = "dir")]
        file: Option<PathBuf>,

        /// Seed all question files under this directory.
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Upsert the default user accounts.
    Users,

    /// Run every seeding step: grades, curriculum, questions, users.
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    let manager = SeedManager::connect(cfg.clone()).await?;

    match cli.command {
        Commands::Init => {
            print_report("ensure tables", &manager.ensure_tables().await);
            print_report("ensure indexes", &manager.ensure_indexes().await);
        }
        Commands::Drop { yes } => {
            if !yes {
                println!("refusing to drop tables without --yes");
                return Ok(());
            }
            print_report("drop tables", &manager.drop_all_tables().await);
        }
        Commands::Recreate { yes } => {
            if !yes {
                println!("refusing to recreate schema without --yes");
                return Ok(());
            }
            print_report("recreate schema", &manager.force_recreate().await);
            print_report("ensure indexes", &manager.ensure_indexes().await);
        }
        Commands::Seed { target } => match target {
            SeedTarget::Grades => {
                print_report("seed grades", &manager.seed_grades_if_empty().await);
            }
            SeedTarget::Curriculum => {
                print_report("seed curriculum", &manager.seed_curriculum().await);
            }
            SeedTarget::Questions { file, dir } => {
                let reports = match (file, dir) {
                    (Some(file), _) => vec![manager.seed_questions_from_file(&file).await],
                    (None, Some(dir)) => manager.seed_questions_from_directory(&dir).await,
                    (None, None) => manager.seed_all_questions().await,
                };
                print_file_reports(&reports);
            }
            SeedTarget::Users => {
                print_report("seed users", &manager.seed_default_users().await);
            }
            SeedTarget::All => {
                print_report("seed grades", &manager.seed_grades_if_empty().await);
                print_report("seed curriculum", &manager.seed_curriculum().await);
                print_file_reports(&manager.seed_all_questions().await);
                print_report("seed users", &manager.seed_default_users().await);
            }
        },
        Commands::Status => {
            status::run_status(manager.pool(), &cfg).await?;
        }
    }

    Ok(())
}

fn print_report(label: &str, report: &SeedReport) {
    println!("{}", label);
    println!("  rows written: {}", report.written);
    if !report.failures.is_empty() {
        println!("  dropped records: {}", report.failures.len());
        for failure in &report.failures {
            println!("    {} — {}", failure.record, failure.reason);
        }
    }
    println!("{}", if report.ok { "ok" } else { "FAILED" });
}

fn print_file_reports(reports: &[FileReport]) {
    println!("seed questions");
    if reports.is_empty() {
        println!("  no question files found");
    }
    for report in reports {
        println!(
            "  {}: {}/{} questions",
            report.file, report.succeeded, report.total
        );
        for failure in &report.failures {
            println!("    {} — {}", failure.record, failure.reason);
        }
    }
    println!("ok");
}
