//! Grade-file discovery, parsing, and extraction.
//!
//! `load_all` turns a directory of per-grade JSON documents into an in-memory
//! forest keyed by grade level. A missing directory or an empty match set is
//! a no-op, not an error, and one malformed file never aborts the batch: the
//! file is skipped and the rest of the directory still loads.
//!
//! The `extract_*` functions are pure projections over the loaded map; they
//! can be called in any order and any number of times.

use anyhow::Result;
use globset::Glob;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::{GradeDocument, SubjectRow, TopicEntry, TopicRow, UnitRow};

/// Load every grade document under `dir` whose filename matches `pattern`.
///
/// Files that are unreadable, malformed, or missing `gradeLevel` are skipped
/// individually.
pub fn load_all(dir: &Path, pattern: &str) -> Result<BTreeMap<i64, GradeDocument>> {
    let mut docs = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(docs);
    }

    let matcher = Glob::new(pattern)?.compile_matcher();

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .map(|name| matcher.is_match(name))
                    .unwrap_or(false)
        })
        .collect();

    // Sort for deterministic ordering
    paths.sort();

    for path in paths {
        if let Some(doc) = load_grade_file(&path) {
            docs.insert(doc.grade_level, doc);
        }
    }

    Ok(docs)
}

/// Parse one grade file: a non-empty top-level array whose first element is
/// the grade object. Returns `None` for anything that doesn't fit.
fn load_grade_file(path: &Path) -> Option<GradeDocument> {
    let text = std::fs::read_to_string(path).ok()?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&text).ok()?;
    let first = values.into_iter().next()?;
    serde_json::from_value(first).ok()
}

/// Synthetic code for a bare-string topic: lower-cased, spaces replaced by
/// underscores. Deterministic, so the same string in two files resolves to
/// the same code. Only meaningful inside a (grade, subject, unit) scope.
pub fn synthetic_topic_code(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Flatten every subject under every loaded grade.
///
/// Subjects missing their id or name are skipped.
pub fn extract_subjects(docs: &BTreeMap<i64, GradeDocument>) -> Vec<SubjectRow> {
    let mut rows = Vec::new();
    for (level, doc) in docs {
        for subject in &doc.subjects {
            let (Some(code), Some(name)) =
                (subject.subject_id.as_deref(), subject.subject_name.as_deref())
            else {
                continue;
            };
            rows.push(SubjectRow {
                grade_level: *level,
                subject_code: code.to_string(),
                subject_name: name.to_string(),
                description: subject.description.clone().unwrap_or_default(),
            });
        }
    }
    rows
}

/// Flatten every unit, carrying its grade and subject scope.
pub fn extract_units(docs: &BTreeMap<i64, GradeDocument>) -> Vec<UnitRow> {
    let mut rows = Vec::new();
    for (level, doc) in docs {
        for subject in &doc.subjects {
            let Some(subject_code) = subject.subject_id.as_deref() else {
                continue;
            };
            for unit in &subject.units {
                let (Some(code), Some(name)) = (unit.unit_id.as_deref(), unit.unit_name.as_deref())
                else {
                    continue;
                };
                rows.push(UnitRow {
                    grade_level: *level,
                    subject_code: subject_code.to_string(),
                    unit_code: code.to_string(),
                    unit_name: name.to_string(),
                    description: unit.description.clone().unwrap_or_default(),
                });
            }
        }
    }
    rows
}

/// Flatten every topic, accepting both the structured and the bare-string
/// entry forms.
pub fn extract_topics(docs: &BTreeMap<i64, GradeDocument>) -> Vec<TopicRow> {
    let mut rows = Vec::new();
    for (level, doc) in docs {
        for subject in &doc.subjects {
            let Some(subject_code) = subject.subject_id.as_deref() else {
                continue;
            };
            for unit in &subject.units {
                let Some(unit_code) = unit.unit_id.as_deref() else {
                    continue;
                };
                for topic in &unit.topics {
                    let (code, name, description) = match topic {
                        TopicEntry::Structured {
                            topic_id,
                            topic_name,
                            description,
                        } => {
                            let Some(name) = topic_name.as_deref() else {
                                continue;
                            };
                            let code = topic_id
                                .clone()
                                .unwrap_or_else(|| synthetic_topic_code(name));
                            (code, name.to_string(), description.clone().unwrap_or_default())
                        }
                        TopicEntry::Name(name) => {
                            if name.trim().is_empty() {
                                continue;
                            }
                            (synthetic_topic_code(name), name.clone(), String::new())
                        }
                    };
                    rows.push(TopicRow {
                        grade_level: *level,
                        subject_code: subject_code.to_string(),
                        unit_code: unit_code.to_string(),
                        topic_code: code,
                        topic_name: name,
                        description,
                    });
                }
            }
        }
    }
    rows
}
