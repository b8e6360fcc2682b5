//! Catalogues: the top-level container of sections.
//!
//! A catalogue is built either directly by an authoring tool or restored
//! with [`catalogue_from_dict`]. Restoring runs [`Catalogue::generate_index`]
//! so every question knows its owning section.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{CatalogueError, Result};
use crate::media;
use crate::question::Question;
use crate::section::{object_field, section_from_dict, Section};

/// Media directory used when a catalogue does not name one.
pub const DEFAULT_MEDIA_DIR: &str = "media";

/// A question catalogue with its metadata and sections.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Build time as seconds since the Unix epoch.
    pub buildtime: i64,
    pub supported_modes: Vec<String>,
    /// Where attachments live on disk. Not serialized.
    pub mediadir: Option<PathBuf>,
    sections: BTreeMap<String, Section>,
}

impl Catalogue {
    /// Create an empty catalogue stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description,
            buildtime: chrono::Utc::now().timestamp(),
            supported_modes: Vec::new(),
            mediadir: None,
            sections: BTreeMap::new(),
        }
    }

    pub fn with_buildtime(mut self, buildtime: i64) -> Self {
        self.buildtime = buildtime;
        self
    }

    pub fn with_supported_modes(mut self, modes: Vec<String>) -> Self {
        self.supported_modes = modes;
        self
    }

    pub fn with_mediadir(mut self, mediadir: impl Into<PathBuf>) -> Self {
        self.mediadir = Some(mediadir.into());
        self
    }

    /// Insert a section under its id. A section with the same id is replaced.
    pub fn append_section(&mut self, section: Section) {
        self.sections.insert(section.id.clone(), section);
    }

    /// Look a section up by exact id, or else by a case-insensitive title
    /// fragment. The id wins when both are given.
    pub fn get_section(
        &self,
        section_id: Option<&str>,
        section_title: Option<&str>,
    ) -> Option<&Section> {
        if let Some(id) = section_id {
            return self.sections.get(id);
        }
        let fragment = section_title.filter(|t| !t.is_empty())?.to_lowercase();
        self.sections
            .values()
            .find(|s| s.name.to_lowercase().contains(&fragment))
    }

    /// Look up a question by id within the named section.
    ///
    /// An unknown section is an error; an unknown question is `Ok(None)`.
    pub fn get_question(&self, section_id: &str, question_id: &str) -> Result<Option<&Question>> {
        let section = self
            .sections
            .get(section_id)
            .ok_or_else(|| CatalogueError::SectionNotFound(section_id.to_string()))?;
        Ok(section.get_question(Some(question_id), None))
    }

    /// Questions of one section, or of every section in section order.
    pub fn get_all_questions(&self, section_id: Option<&str>) -> Result<Vec<&Question>> {
        match section_id {
            Some(id) => self
                .sections
                .get(id)
                .map(Section::get_all_questions)
                .ok_or_else(|| CatalogueError::SectionNotFound(id.to_string())),
            None => Ok(self
                .sections
                .values()
                .flat_map(Section::get_all_questions)
                .collect()),
        }
    }

    /// Every section, in ascending id order.
    pub fn get_all_sections(&self) -> Vec<&Section> {
        self.sections.values().collect()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn question_count(&self) -> usize {
        self.sections.values().map(Section::question_count).sum()
    }

    /// Point every question at the section that owns it.
    pub fn generate_index(&mut self) {
        for section in self.sections.values_mut() {
            let section_id = section.id.clone();
            for question in section.questions_mut() {
                question.base_mut().set_section_id(&section_id);
            }
        }
        tracing::debug!(catalogue = %self.id, questions = self.question_count(), "indexed catalogue");
    }

    /// The media directory attachments are copied into.
    pub fn media_dir(&self) -> &Path {
        self.mediadir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_MEDIA_DIR))
    }

    /// Copy a file into the catalogue's media directory and return the
    /// content-addressed name to reference it by.
    pub fn import_media(&self, path: &Path) -> anyhow::Result<String> {
        media::copy_to_mediadir(path, self.media_dir())
    }

    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> CatalogueError {
        CatalogueError::InvalidField {
            entity: "catalogue",
            id: self.id.clone(),
            field,
            reason: reason.into(),
        }
    }

    /// Validated mapping form of the whole tree.
    pub fn dict_dump(&self) -> Result<Value> {
        if self.id.is_empty() {
            return Err(self.invalid("id", "must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(self.invalid("name", "must be non-empty text"));
        }
        if self.buildtime < 0 {
            return Err(self.invalid("buildtime", "must be a non-negative timestamp"));
        }
        if self.supported_modes.iter().any(|m| m.trim().is_empty()) {
            return Err(self.invalid("supported_modes", "must not contain empty modes"));
        }

        let mut sections = Map::new();
        for (id, section) in &self.sections {
            sections.insert(id.clone(), section.dict_dump()?);
        }

        Ok(json!({
            "name": self.name,
            "id": self.id,
            "description": self.description,
            "buildtime": self.buildtime,
            "supported_modes": self.supported_modes,
            "sections": sections
        }))
    }
}

#[derive(Debug, Deserialize)]
struct RawCatalogueHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    buildtime: Option<i64>,
    #[serde(default)]
    supported_modes: Vec<String>,
}

/// Reconstruct a catalogue from its mapping form and index it.
pub fn catalogue_from_dict(value: &Value) -> Result<Catalogue> {
    let header = RawCatalogueHeader::deserialize(value)?;
    let mut catalogue = Catalogue::new(header.id, header.name, header.description)
        .with_supported_modes(header.supported_modes);
    if let Some(buildtime) = header.buildtime.filter(|t| *t != 0) {
        catalogue.buildtime = buildtime;
    }

    for record in object_field(value, "catalogue", &catalogue.id, "sections")?.values() {
        catalogue.append_section(section_from_dict(record)?);
    }

    catalogue.generate_index();
    Ok(catalogue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{AudioDictate, EstimationQuestion, MultipleChoiceQuestion, RegexQuestion};

    fn populated() -> Catalogue {
        let mut c = Catalogue::new("test0", "Katalog 1", Some("Ein Fragenkatalog.".into()))
            .with_buildtime(1_700_000_000)
            .with_supported_modes(vec!["quiz".into(), "exam".into()]);

        for (sec_id, title) in [("sec1", "Zoology"), ("sec0", "Units and Measures")] {
            let mut s = Section::new(sec_id, title);
            s.append_question(MultipleChoiceQuestion::new(
                "qa0",
                "Question 1",
                "What??",
                "Foobar",
                vec!["no".into(), "no".into()],
            ));
            s.append_question(
                RegexQuestion::new("qb0", "Question 2", "Word starting with a?", "z.B. Affe", "[aA].*")
                    .unwrap(),
            );
            s.append_question(
                EstimationQuestion::new("qc0", "Question 3", "1 km in feet", 3280.84, Some(700.0))
                    .unwrap(),
            );
            s.append_question(
                AudioDictate::new("qd0", "Question 4", "Write what you hear", "Affe", "[Aa]ffe")
                    .unwrap(),
            );
            c.append_section(s);
        }
        c
    }

    #[test]
    fn new_stamps_current_time() {
        let before = chrono::Utc::now().timestamp();
        let c = Catalogue::new("c", "C", None);
        assert!(c.buildtime >= before);
        assert!(c.supported_modes.is_empty());
    }

    #[test]
    fn get_section_by_id_and_title() {
        let c = populated();
        assert_eq!(c.get_section(Some("sec1"), None).unwrap().name, "Zoology");
        assert!(c.get_section(Some("SEC1"), None).is_none());
        assert_eq!(c.get_section(None, Some("measures")).unwrap().id, "sec0");
        assert_eq!(c.get_section(Some("sec1"), Some("measures")).unwrap().id, "sec1");
        assert!(c.get_section(None, Some("botany")).is_none());
        assert!(c.get_section(None, None).is_none());
    }

    #[test]
    fn get_question_delegates_to_section() {
        let c = populated();
        let q = c.get_question("sec0", "qc0").unwrap().unwrap();
        assert_eq!(q.name(), "Question 3");
        assert!(c.get_question("sec0", "qz9").unwrap().is_none());
        assert!(matches!(
            c.get_question("sec9", "qc0"),
            Err(CatalogueError::SectionNotFound(ref id)) if id == "sec9"
        ));
    }

    #[test]
    fn get_all_questions_flattens_in_section_order() {
        let c = populated();
        let all = c.get_all_questions(None).unwrap();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0].id(), "qa0");
        assert_eq!(all[3].id(), "qd0");
        assert_eq!(all[4].id(), "qa0");

        let one = c.get_all_questions(Some("sec1")).unwrap();
        assert_eq!(one.len(), 4);
        assert!(c.get_all_questions(Some("nope")).is_err());
    }

    #[test]
    fn get_all_sections_sorted_by_id() {
        let c = populated();
        let ids: Vec<&str> = c.get_all_sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["sec0", "sec1"]);
    }

    #[test]
    fn direct_construction_leaves_back_references_unset() {
        let c = populated();
        assert!(c
            .get_all_questions(None)
            .unwrap()
            .iter()
            .all(|q| q.section_id().is_none()));
    }

    #[test]
    fn generate_index_links_questions_to_sections() {
        let mut c = populated();
        c.generate_index();
        for section in c.get_all_sections() {
            for q in section.get_all_questions() {
                assert_eq!(q.section_id(), Some(section.id.as_str()));
            }
        }
    }

    #[test]
    fn roundtrip_preserves_dump_and_indexes() {
        let c = populated();
        let dumped = c.dict_dump().unwrap();
        let restored = catalogue_from_dict(&dumped).unwrap();

        assert_eq!(restored.dict_dump().unwrap(), dumped);
        assert_eq!(restored.buildtime, 1_700_000_000);
        assert_eq!(restored.supported_modes, vec!["quiz", "exam"]);
        for section in restored.get_all_sections() {
            for q in section.get_all_questions() {
                assert_eq!(q.section_id(), Some(section.id.as_str()));
            }
        }
    }

    #[test]
    fn roundtrip_through_json_text() {
        let c = populated();
        let text = serde_json::to_string(&c.dict_dump().unwrap()).unwrap();
        let restored = catalogue_from_dict(&serde_json::from_str(&text).unwrap()).unwrap();
        assert_eq!(restored.question_count(), c.question_count());
        assert_eq!(restored.dict_dump().unwrap(), c.dict_dump().unwrap());
    }

    #[test]
    fn from_dict_defaults_missing_buildtime() {
        let before = chrono::Utc::now().timestamp();
        let c = catalogue_from_dict(&json!({
            "id": "c1",
            "name": "Legacy",
            "description": null,
            "sections": {}
        }))
        .unwrap();
        assert!(c.buildtime >= before);
        assert!(c.description.is_none());
        assert_eq!(c.section_count(), 0);
    }

    #[test]
    fn dump_validates_metadata() {
        let c = Catalogue::new("c", "   ", None);
        assert!(matches!(
            c.dict_dump().unwrap_err(),
            CatalogueError::InvalidField { field: "name", .. }
        ));

        let c = Catalogue::new("c", "Name", None).with_buildtime(-5);
        assert!(matches!(
            c.dict_dump().unwrap_err(),
            CatalogueError::InvalidField { field: "buildtime", .. }
        ));
    }

    #[test]
    fn from_dict_requires_sections() {
        let err = catalogue_from_dict(&json!({"id": "c", "name": "n"})).unwrap_err();
        assert!(matches!(err, CatalogueError::MissingField { field: "sections", .. }));
    }

    #[test]
    fn import_media_uses_catalogue_dir() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("picture.png");
        std::fs::write(&src, b"not really a png").unwrap();

        let c = Catalogue::new("c", "C", None).with_mediadir(dir.path().join("media"));
        let name = c.import_media(&src).unwrap();
        assert!(name.ends_with(".png"));
        assert!(dir.path().join("media").join(&name).is_file());
    }
}
