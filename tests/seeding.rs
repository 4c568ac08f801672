//! End-to-end tests for schema migration and curriculum seeding.

use serde_json::json;
use sqlx::SqlitePool;
use std::fs;
use tempfile::TempDir;

use curriculum_seed::config::{Config, CurriculumConfig, DbConfig, QuizBankConfig};
use curriculum_seed::{curriculum, db, indexes, schema, users};

async fn setup() -> (TempDir, Config, SqlitePool) {
    let tmp = TempDir::new().unwrap();
    let config = Config {
        db: DbConfig {
            path: tmp.path().join("data/seed.sqlite"),
        },
        curriculum: CurriculumConfig {
            dir: tmp.path().join("curriculum"),
            grade_file_glob: "grade_*.json".to_string(),
        },
        quiz_bank: QuizBankConfig {
            dir: tmp.path().join("quiz_bank"),
        },
    };
    fs::create_dir_all(&config.curriculum.dir).unwrap();
    let pool = db::connect(&config).await.unwrap();
    schema::ensure_tables(&pool).await.unwrap();
    (tmp, config, pool)
}

fn grade_doc(level: i64, subject_description: &str) -> String {
    json!([{
        "gradeLevel": level,
        "gradeName": format!("{}. Sınıf", level),
        "description": format!("{}. sınıf müfredatı", level),
        "subjects": [{
            "subjectId": "matematik",
            "subjectName": "Matematik",
            "description": subject_description,
            "units": [{
                "unitId": "unit_1",
                "unitName": "Doğal Sayılar",
                "description": "Sayılar",
                "topics": [
                    {"topicId": "kesirler", "topicName": "Kesirler"},
                    "Üçgenler"
                ]
            }]
        }]
    }])
    .to_string()
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    let query = format!("SELECT COUNT(*) FROM {}", table);
    sqlx::query_scalar(&query).fetch_one(pool).await.unwrap()
}

#[tokio::test]
async fn ensure_tables_is_idempotent() {
    let (_tmp, _config, pool) = setup().await;
    schema::ensure_tables(&pool).await.unwrap();
    schema::ensure_tables(&pool).await.unwrap();

    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(tables as usize, schema::TABLES.len());
}

#[tokio::test]
async fn drop_all_tables_removes_the_schema() {
    let (_tmp, _config, pool) = setup().await;
    schema::drop_all_tables(&pool).await.unwrap();

    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(tables, 0);

    // And the schema comes back on recreate.
    schema::force_recreate(&pool).await.unwrap();
    assert_eq!(count(&pool, "grades").await, 0);
}

#[tokio::test]
async fn ensure_indexes_is_idempotent() {
    let (_tmp, _config, pool) = setup().await;
    indexes::ensure_indexes(&pool).await.unwrap();
    indexes::ensure_indexes(&pool).await.unwrap();

    for (_, name, _) in indexes::INDEXES {
        let found: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = ?")
                .bind(name)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(found, 1, "expected exactly one index named {}", name);
    }
}

#[tokio::test]
async fn seed_curriculum_is_idempotent() {
    let (_tmp, config, pool) = setup().await;
    fs::write(config.curriculum.dir.join("grade_5.json"), grade_doc(5, "a")).unwrap();
    fs::write(config.curriculum.dir.join("grade_6.json"), grade_doc(6, "b")).unwrap();

    let first = curriculum::seed_curriculum(&pool, &config).await.unwrap();
    assert!(first.ok);
    let counts_after_first = (
        count(&pool, "grades").await,
        count(&pool, "subjects").await,
        count(&pool, "units").await,
        count(&pool, "topics").await,
    );
    assert_eq!(counts_after_first, (2, 2, 2, 4));

    let second = curriculum::seed_curriculum(&pool, &config).await.unwrap();
    assert!(second.ok);
    let counts_after_second = (
        count(&pool, "grades").await,
        count(&pool, "subjects").await,
        count(&pool, "units").await,
        count(&pool, "topics").await,
    );
    assert_eq!(counts_after_first, counts_after_second);
}

#[tokio::test]
async fn reseed_updates_description_and_keeps_surrogate_id() {
    let (_tmp, config, pool) = setup().await;
    let file = config.curriculum.dir.join("grade_5.json");
    fs::write(&file, grade_doc(5, "Sayılar ve işlemler")).unwrap();
    curriculum::seed_curriculum(&pool, &config).await.unwrap();

    let (id_before, desc_before): (i64, String) =
        sqlx::query_as("SELECT subject_id, description FROM subjects WHERE subject_name = 'Matematik'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(desc_before, "Sayılar ve işlemler");

    fs::write(&file, grade_doc(5, "Geometri ve ölçme")).unwrap();
    curriculum::seed_curriculum(&pool, &config).await.unwrap();

    assert_eq!(count(&pool, "subjects").await, 1);
    let (id_after, desc_after): (i64, String) =
        sqlx::query_as("SELECT subject_id, description FROM subjects WHERE subject_name = 'Matematik'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(id_before, id_after);
    assert_eq!(desc_after, "Geometri ve ölçme");
}

#[tokio::test]
async fn malformed_grade_file_does_not_abort_the_batch() {
    let (_tmp, config, pool) = setup().await;
    fs::write(config.curriculum.dir.join("grade_5.json"), grade_doc(5, "a")).unwrap();
    fs::write(config.curriculum.dir.join("grade_6.json"), "{ not json at all").unwrap();

    let report = curriculum::seed_curriculum(&pool, &config).await.unwrap();
    assert!(report.ok);

    let name: Option<String> =
        sqlx::query_scalar("SELECT grade_name FROM grades WHERE grade_name = '5. Sınıf'")
            .fetch_optional(&pool)
            .await
            .unwrap();
    assert_eq!(name.as_deref(), Some("5. Sınıf"));
    assert_eq!(count(&pool, "grades").await, 1);
}

#[tokio::test]
async fn empty_curriculum_directory_is_a_noop() {
    let (_tmp, config, pool) = setup().await;
    let report = curriculum::seed_curriculum(&pool, &config).await.unwrap();
    assert!(report.ok);
    assert_eq!(report.written, 0);
    assert_eq!(count(&pool, "grades").await, 0);
}

#[tokio::test]
async fn missing_curriculum_directory_is_a_noop() {
    let (_tmp, mut config, pool) = setup().await;
    config.curriculum.dir = config.curriculum.dir.join("does-not-exist");
    let report = curriculum::seed_curriculum(&pool, &config).await.unwrap();
    assert!(report.ok);
    assert_eq!(report.written, 0);
}

#[tokio::test]
async fn grade_ladder_only_seeds_when_empty() {
    let (_tmp, _config, pool) = setup().await;
    let first = curriculum::seed_grades_if_empty(&pool).await.unwrap();
    assert_eq!(first, 12);
    let second = curriculum::seed_grades_if_empty(&pool).await.unwrap();
    assert_eq!(second, 0);
    assert_eq!(count(&pool, "grades").await, 12);

    let name: String = sqlx::query_scalar("SELECT grade_name FROM grades WHERE grade_id = 1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(name, "1. Sınıf");
}

#[tokio::test]
async fn unit_with_unresolvable_subject_is_dropped_not_fatal() {
    let (_tmp, config, pool) = setup().await;
    // Subject has an id but no name, so it is never inserted; its units and
    // topics must fall out of the pipeline without failing the run.
    let doc = json!([{
        "gradeLevel": 5,
        "gradeName": "5. Sınıf",
        "subjects": [{
            "subjectId": "fen",
            "units": [{
                "unitId": "u1",
                "unitName": "Canlılar",
                "topics": ["Hücre"]
            }]
        }]
    }])
    .to_string();
    fs::write(config.curriculum.dir.join("grade_5.json"), doc).unwrap();

    let report = curriculum::seed_curriculum(&pool, &config).await.unwrap();
    assert!(report.ok);
    assert_eq!(count(&pool, "grades").await, 1);
    assert_eq!(count(&pool, "subjects").await, 0);
    assert_eq!(count(&pool, "units").await, 0);
    assert_eq!(count(&pool, "topics").await, 0);
    assert!(report
        .failures
        .iter()
        .any(|f| f.record.starts_with("unit 5/fen/")));
}

#[tokio::test]
async fn bare_string_topic_produces_named_row() {
    let (_tmp, config, pool) = setup().await;
    fs::write(config.curriculum.dir.join("grade_5.json"), grade_doc(5, "a")).unwrap();
    curriculum::seed_curriculum(&pool, &config).await.unwrap();

    let found: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM topics WHERE topic_name = 'Üçgenler'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(found, 1);

    // Re-seeding resolves the same bare string to the same row.
    curriculum::seed_curriculum(&pool, &config).await.unwrap();
    let found: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM topics WHERE topic_name = 'Üçgenler'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(found, 1);
}

#[tokio::test]
async fn default_users_upsert_is_idempotent() {
    let (_tmp, _config, pool) = setup().await;
    users::seed_default_users(&pool).await.unwrap();
    users::seed_default_users(&pool).await.unwrap();
    assert_eq!(count(&pool, "users").await, 2);

    let role: String = sqlx::query_scalar("SELECT role FROM users WHERE username = 'admin'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(role, "admin");
}
