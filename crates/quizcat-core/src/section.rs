//! Sections: keyed collections of questions.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{CatalogueError, Result};
use crate::question::{question_from_dict, Question};

/// A named grouping of questions, keyed by question id.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Identifier, unique within the catalogue.
    pub id: String,
    pub name: String,
    questions: BTreeMap<String, Question>,
}

impl Section {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            questions: BTreeMap::new(),
        }
    }

    /// Insert a question under its id. A question with the same id is replaced.
    pub fn append_question(&mut self, question: impl Into<Question>) {
        let question = question.into();
        self.questions.insert(question.id().to_string(), question);
    }

    /// Look a question up by exact id, or else by name fragment.
    ///
    /// When `question_id` is given only the id is consulted. Otherwise the
    /// first question whose name contains `question_name` (ignoring case) is
    /// returned.
    pub fn get_question(
        &self,
        question_id: Option<&str>,
        question_name: Option<&str>,
    ) -> Option<&Question> {
        if let Some(id) = question_id {
            return self.questions.get(id);
        }
        let fragment = question_name.filter(|n| !n.is_empty())?.to_lowercase();
        self.questions
            .values()
            .find(|q| q.name().to_lowercase().contains(&fragment))
    }

    /// Every question, in ascending id order.
    pub fn get_all_questions(&self) -> Vec<&Question> {
        self.questions.values().collect()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub(crate) fn questions_mut(&mut self) -> impl Iterator<Item = &mut Question> {
        self.questions.values_mut()
    }

    /// Validated mapping form, with questions keyed by their id.
    pub fn dict_dump(&self) -> Result<Value> {
        if self.id.is_empty() {
            return Err(CatalogueError::InvalidField {
                entity: "section",
                id: self.id.clone(),
                field: "id",
                reason: "must not be empty".into(),
            });
        }

        let mut questions = Map::new();
        for (id, question) in &self.questions {
            questions.insert(id.clone(), question.dict_dump()?);
        }

        Ok(json!({
            "id": self.id,
            "name": self.name,
            "questions": questions
        }))
    }
}

#[derive(Debug, Deserialize)]
struct RawSectionHeader {
    id: String,
    name: String,
}

/// Look up a nested object field, distinguishing absent from mis-shaped.
pub(crate) fn object_field<'a>(
    value: &'a Value,
    entity: &'static str,
    id: &str,
    field: &'static str,
) -> Result<&'a Map<String, Value>> {
    match value.get(field) {
        None => Err(CatalogueError::MissingField { entity, field }),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(CatalogueError::InvalidField {
            entity,
            id: id.to_string(),
            field,
            reason: format!("expected an object, got {other}"),
        }),
    }
}

/// Reconstruct a section and all of its questions from the mapping form.
pub fn section_from_dict(value: &Value) -> Result<Section> {
    let header = RawSectionHeader::deserialize(value)?;
    let mut section = Section::new(header.id, header.name);

    for record in object_field(value, "section", &section.id, "questions")?.values() {
        section.append_question(question_from_dict(record)?);
    }

    tracing::debug!(
        section = %section.id,
        questions = section.question_count(),
        "restored section"
    );
    Ok(section)
}
