//! Data types flowing through the seeding pipeline.
//!
//! The `*Document` types mirror the JSON curriculum files; they live only for
//! the duration of one seeding pass and are never persisted as-is. The `*Row`
//! types are the flat tuples extracted from the document forest, still keyed
//! by natural keys — surrogate ids are attached later by [`crate::resolve`].

use serde::Deserialize;

/// One grade-level JSON document: the root of a grade → subject → unit →
/// topic forest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeDocument {
    pub grade_level: i64,
    #[serde(default)]
    pub grade_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subjects: Vec<SubjectDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDoc {
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub subject_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub units: Vec<UnitDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDoc {
    #[serde(default)]
    pub unit_id: Option<String>,
    #[serde(default)]
    pub unit_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<TopicEntry>,
}

/// A topic entry is either a structured object or a bare name string.
///
/// The bare form synthesizes its code from the name (see
/// [`crate::loader::synthetic_topic_code`]); the code is only ever used
/// inside a (grade, subject, unit)-scoped key, never globally.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TopicEntry {
    Structured {
        #[serde(rename = "topicId", default)]
        topic_id: Option<String>,
        #[serde(rename = "topicName", default)]
        topic_name: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    Name(String),
}

/// Flattened subject tuple: `(grade_level, subject_code, subject_name, description)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRow {
    pub grade_level: i64,
    pub subject_code: String,
    pub subject_name: String,
    pub description: String,
}

/// Flattened unit tuple, scoped by grade and subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRow {
    pub grade_level: i64,
    pub subject_code: String,
    pub unit_code: String,
    pub unit_name: String,
    pub description: String,
}

/// Flattened topic tuple, scoped by grade, subject, and unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRow {
    pub grade_level: i64,
    pub subject_code: String,
    pub unit_code: String,
    pub topic_code: String,
    pub topic_name: String,
    pub description: String,
}

/// A question-bank file: `{metadata, questions}`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionFile {
    #[serde(default)]
    pub metadata: Option<QuestionMetadata>,
    #[serde(default)]
    pub questions: Vec<QuestionDoc>,
}

/// The four natural-key identifiers locating the owning topic.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionMetadata {
    #[serde(default)]
    pub grade: Option<i64>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDoc {
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty_level: String,
    #[serde(default = "default_question_type")]
    pub question_type: String,
    #[serde(default = "default_points")]
    pub points: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionDoc {
    #[serde(default)]
    pub option_text: Option<String>,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_difficulty() -> String {
    "medium".to_string()
}
fn default_question_type() -> String {
    "multiple_choice".to_string()
}
fn default_points() -> i64 {
    10
}

/// Optional validation: exactly one option flagged correct.
///
/// The seeder itself never enforces this — question files with zero or
/// several correct options are inserted as-is. Callers that want the
/// single-answer shape can check before (or after) seeding.
pub fn single_correct_option(options: &[OptionDoc]) -> bool {
    options.iter().filter(|o| o.is_correct).count() == 1
}

/// Display name for a grade level, e.g. `5` → `"5. Sınıf"`.
///
/// Used everywhere a grade level meets a grade_name: the ladder bootstrap,
/// grade upserts, id resolution, and question metadata lookups all have to
/// agree on this format.
pub fn grade_display_name(level: i64) -> String {
    format!("{}. Sınıf", level)
}

/// One dropped or failed record, with the natural key that identifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFailure {
    pub record: String,
    pub reason: String,
}

impl SeedFailure {
    pub fn new(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of one seeding or migration operation.
///
/// `ok` means the operation ran to completion; individual records may still
/// have been dropped, in which case `failures` says which and why. Nothing
/// behind the façade raises — an internal error becomes `ok == false` with a
/// single failure entry.
#[derive(Debug, Default)]
pub struct SeedReport {
    pub ok: bool,
    /// Rows written (inserted or updated) across all levels.
    pub written: u64,
    pub failures: Vec<SeedFailure>,
}

impl SeedReport {
    pub fn success(written: u64) -> Self {
        Self {
            ok: true,
            written,
            failures: Vec::new(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            written: 0,
            failures: vec![SeedFailure::new("-", reason)],
        }
    }
}

/// Per-file question seeding outcome: `succeeded` of `total` questions.
#[derive(Debug, Default)]
pub struct FileReport {
    pub file: String,
    pub succeeded: usize,
    pub total: usize,
    pub failures: Vec<SeedFailure>,
}

impl FileReport {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(correct: bool) -> OptionDoc {
        OptionDoc {
            option_text: Some("x".to_string()),
            is_correct: correct,
            description: None,
        }
    }

    #[test]
    fn test_grade_display_name() {
        assert_eq!(grade_display_name(1), "1. Sınıf");
        assert_eq!(grade_display_name(12), "12. Sınıf");
    }

    #[test]
    fn test_single_correct_option() {
        assert!(single_correct_option(&[option(true), option(false)]));
        assert!(!single_correct_option(&[option(false), option(false)]));
        assert!(!single_correct_option(&[option(true), option(true)]));
        assert!(!single_correct_option(&[]));
    }

    #[test]
    fn test_topic_entry_forms_deserialize() {
        let structured: TopicEntry =
            serde_json::from_str(r#"{"topicId": "kesirler", "topicName": "Kesirler"}"#).unwrap();
        match structured {
            TopicEntry::Structured {
                topic_id,
                topic_name,
                ..
            } => {
                assert_eq!(topic_id.as_deref(), Some("kesirler"));
                assert_eq!(topic_name.as_deref(), Some("Kesirler"));
            }
            TopicEntry::Name(_) => panic!("expected structured form"),
        }

        let bare: TopicEntry = serde_json::from_str(r#""Üçgenler""#).unwrap();
        match bare {
            TopicEntry::Name(name) => assert_eq!(name, "Üçgenler"),
            TopicEntry::Structured { .. } => panic!("expected bare form"),
        }
    }
}
