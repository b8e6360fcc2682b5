//! JSON catalogue files.
//!
//! Loads and saves catalogues as JSON text, scans directories of catalogue
//! files, and lints catalogues for authoring mistakes.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::catalogue::{catalogue_from_dict, Catalogue};
use crate::question::Question;

/// Serialize a catalogue to JSON text.
pub fn catalogue_to_string(catalogue: &Catalogue, pretty: bool) -> Result<String> {
    let value = catalogue
        .dict_dump()
        .with_context(|| format!("failed to dump catalogue '{}'", catalogue.id))?;
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

/// Write a catalogue to a JSON file, creating parent directories.
pub fn save_catalogue(catalogue: &Catalogue, path: &Path, pretty: bool) -> Result<()> {
    let text = catalogue_to_string(catalogue, pretty)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, text)
        .with_context(|| format!("failed to write catalogue file: {}", path.display()))
}

/// Parse a single JSON file into a `Catalogue`.
pub fn load_catalogue(path: &Path) -> Result<Catalogue> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalogue file: {}", path.display()))?;

    parse_catalogue_str(&content, path)
}

/// Parse JSON text into a `Catalogue` (useful for testing).
pub fn parse_catalogue_str(content: &str, source_path: &Path) -> Result<Catalogue> {
    let value: Value = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    catalogue_from_dict(&value)
        .with_context(|| format!("invalid catalogue: {}", source_path.display()))
}

/// Recursively load all `.json` catalogue files from a directory.
pub fn load_catalogue_directory(dir: &Path) -> Result<Vec<Catalogue>> {
    let mut catalogues = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            catalogues.extend(load_catalogue_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match load_catalogue(&path) {
                Ok(catalogue) => catalogues.push(catalogue),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(catalogues)
}

/// A warning from catalogue validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The section ID (if applicable).
    pub section_id: Option<String>,
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn for_question(section_id: &str, question: &Question, message: impl Into<String>) -> Self {
        Self {
            section_id: Some(section_id.to_string()),
            question_id: Some(question.id().to_string()),
            message: message.into(),
        }
    }
}

/// Lint a catalogue for content that is valid but probably a mistake.
pub fn validate_catalogue(catalogue: &Catalogue) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if catalogue.section_count() == 0 {
        warnings.push(ValidationWarning {
            section_id: None,
            question_id: None,
            message: "catalogue has no sections".into(),
        });
    }

    for section in catalogue.get_all_sections() {
        if section.question_count() == 0 {
            warnings.push(ValidationWarning {
                section_id: Some(section.id.clone()),
                question_id: None,
                message: "section has no questions".into(),
            });
        }

        for question in section.get_all_questions() {
            let mut warn = |message: String| {
                warnings.push(ValidationWarning::for_question(
                    &section.id,
                    question,
                    message,
                ));
            };

            if question.points() == 0.0 {
                warn("question is worth zero points".into());
            }

            match question {
                Question::Regex(q) => {
                    if !q.is_match(&q.answer) {
                        warn(format!(
                            "canonical answer '{}' does not match answer_regex '{}'",
                            q.answer,
                            q.answer_regex()
                        ));
                    }
                }
                Question::AudioDictate(q) => {
                    if !q.is_match(&q.right_answer) {
                        warn(format!(
                            "right_answer '{}' does not match answer_regex '{}'",
                            q.right_answer,
                            q.answer_regex()
                        ));
                    }
                    if q.countdown == 0 {
                        warn("countdown is zero".into());
                    }
                }
                Question::MultipleChoice(q) => {
                    if q.wrong_answers.is_empty() {
                        warn("no wrong answers to choose from".into());
                    }
                    if q.wrong_answers.contains(&q.right_answer) {
                        warn(format!(
                            "right_answer '{}' is also listed as wrong",
                            q.right_answer
                        ));
                    }
                    let mut seen = HashSet::new();
                    for wrong in &q.wrong_answers {
                        if !seen.insert(wrong) {
                            warn(format!("duplicate wrong answer: {wrong}"));
                        }
                    }
                }
                Question::Estimation(_) => {}
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::question::{MultipleChoiceQuestion, QuestionKind, RegexQuestion};
    use crate::section::Section;

    const VALID_JSON: &str = r#"{
  "name": "Katalog 1",
  "id": "test0",
  "description": "Ein Fragenkatalog blah blah.",
  "buildtime": 1700000000,
  "supported_modes": ["quiz"],
  "sections": {
    "sec0": {
      "id": "sec0",
      "name": "Sektion 1",
      "questions": {
        "qa0": {
          "type": "multiplechoice",
          "id": "qa0",
          "name": "Question 1",
          "question": "What??",
          "question_attachments": [],
          "points": 1.0,
          "right_answer": "Foobar",
          "wrong_answers": ["no", "nope"],
          "explanation": null,
          "explanation_attachments": []
        },
        "qc0": {
          "type": "estimation",
          "id": "qc0",
          "name": "Question 3",
          "question": "1 km in feet",
          "question_attachments": [],
          "points": 1.0,
          "right_answer": 3280.84,
          "expected_deviation": 700.0
        }
      }
    }
  }
}"#;

    #[test]
    fn parse_valid_json() {
        let c = parse_catalogue_str(VALID_JSON, &PathBuf::from("test.json")).unwrap();
        assert_eq!(c.id, "test0");
        assert_eq!(c.section_count(), 1);
        assert_eq!(c.question_count(), 2);
        let q = c.get_question("sec0", "qc0").unwrap().unwrap();
        assert_eq!(q.section_id(), Some("sec0"));
    }

    #[test]
    fn parse_malformed_json() {
        let result = parse_catalogue_str("{ not json", &PathBuf::from("bad.json"));
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));
    }

    #[test]
    fn parse_unknown_question_type_reports_tag() {
        let bad = VALID_JSON.replace("\"estimation\"", "\"essay\"");
        let err = parse_catalogue_str(&bad, &PathBuf::from("bad.json")).unwrap_err();
        assert!(format!("{err:#}").contains("unknown question type: essay"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("catalogue.json");
        let c = parse_catalogue_str(VALID_JSON, &PathBuf::from("test.json")).unwrap();

        save_catalogue(&c, &path, true).unwrap();
        let restored = load_catalogue(&path).unwrap();
        assert_eq!(restored, c);
    }

    #[test]
    fn compact_and_pretty_parse_the_same() {
        let c = parse_catalogue_str(VALID_JSON, &PathBuf::from("test.json")).unwrap();
        let compact = catalogue_to_string(&c, false).unwrap();
        let pretty = catalogue_to_string(&c, true).unwrap();
        assert!(!compact.contains('\n'));
        assert_eq!(
            serde_json::from_str::<Value>(&compact).unwrap(),
            serde_json::from_str::<Value>(&pretty).unwrap()
        );
    }

    #[test]
    fn load_directory_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.json"), VALID_JSON).unwrap();
        std::fs::write(dir.path().join("broken.json"), "[]").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("again.json"), VALID_JSON).unwrap();

        let catalogues = load_catalogue_directory(dir.path()).unwrap();
        assert_eq!(catalogues.len(), 2);
    }

    #[test]
    fn load_directory_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("c.json");
        std::fs::write(&file, VALID_JSON).unwrap();
        assert!(load_catalogue_directory(&file).is_err());
    }

    #[test]
    fn validate_clean_catalogue() {
        let c = parse_catalogue_str(VALID_JSON, &PathBuf::from("test.json")).unwrap();
        assert!(validate_catalogue(&c).is_empty());
    }

    #[test]
    fn validate_flags_authoring_mistakes() {
        let mut c = Catalogue::new("c", "C", None);
        let mut s = Section::new("s", "S");
        s.append_question(
            RegexQuestion::new("r", "Regex", "Word starting with a?", "z.B. Affe", "[aA].*").unwrap(),
        );
        s.append_question(
            MultipleChoiceQuestion::new("m", "MC", "Pick", "yes", vec!["no".into(), "yes".into(), "no".into()])
                .with_points(0.0),
        );
        c.append_section(s);
        c.append_section(Section::new("empty", "Empty"));

        let warnings = validate_catalogue(&c);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("does not match answer_regex")));
        assert!(messages.iter().any(|m| m.contains("also listed as wrong")));
        assert!(messages.iter().any(|m| m.contains("duplicate wrong answer")));
        assert!(messages.iter().any(|m| m.contains("zero points")));
        assert!(warnings
            .iter()
            .any(|w| w.section_id.as_deref() == Some("empty") && w.question_id.is_none()));
    }
}
