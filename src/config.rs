use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub curriculum: CurriculumConfig,
    #[serde(default)]
    pub quiz_bank: QuizBankConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CurriculumConfig {
    /// Directory holding one JSON document per grade.
    #[serde(default = "default_curriculum_dir")]
    pub dir: PathBuf,
    /// Filename pattern for grade documents within `dir`.
    #[serde(default = "default_grade_file_glob")]
    pub grade_file_glob: String,
}

impl Default for CurriculumConfig {
    fn default() -> Self {
        Self {
            dir: default_curriculum_dir(),
            grade_file_glob: default_grade_file_glob(),
        }
    }
}

fn default_curriculum_dir() -> PathBuf {
    PathBuf::from("./data/curriculum")
}

fn default_grade_file_glob() -> String {
    "grade_*.json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuizBankConfig {
    /// Root of the question-bank tree; discovered recursively.
    #[serde(default = "default_quiz_bank_dir")]
    pub dir: PathBuf,
}

impl Default for QuizBankConfig {
    fn default() -> Self {
        Self {
            dir: default_quiz_bank_dir(),
        }
    }
}

fn default_quiz_bank_dir() -> PathBuf {
    PathBuf::from("./data/quiz_bank")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.curriculum.grade_file_glob.is_empty() {
        anyhow::bail!("curriculum.grade_file_glob must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config: Config = toml::from_str(
            r#"
            [db]
            path = "./data/seed.sqlite"
            "#,
        )
        .unwrap();
        assert_eq!(config.curriculum.grade_file_glob, "grade_*.json");
        assert_eq!(config.quiz_bank.dir, PathBuf::from("./data/quiz_bank"));
    }

    #[test]
    fn test_explicit_sections() {
        let config: Config = toml::from_str(
            r#"
            [db]
            path = "/tmp/x.sqlite"

            [curriculum]
            dir = "/srv/curriculum"
            grade_file_glob = "sinif_*.json"

            [quiz_bank]
            dir = "/srv/quiz"
            "#,
        )
        .unwrap();
        assert_eq!(config.curriculum.dir, PathBuf::from("/srv/curriculum"));
        assert_eq!(config.curriculum.grade_file_glob, "sinif_*.json");
        assert_eq!(config.quiz_bank.dir, PathBuf::from("/srv/quiz"));
    }
}
