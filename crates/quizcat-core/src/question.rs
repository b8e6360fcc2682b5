//! Question variants, scoring, and the type-tag factory.
//!
//! A [`Question`] is one of four closed variants sharing a [`QuestionBase`].
//! Each variant implements [`QuestionKind`], which produces the validated
//! mapping form (`dict_dump`). [`question_from_dict`] is the reverse
//! direction and dispatches on the mapping's `type` tag.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{CatalogueError, Result};

/// Default score weight of a question.
pub const DEFAULT_POINTS: f64 = 1.0;

/// Default audio dictation countdown in seconds.
pub const DEFAULT_COUNTDOWN: u32 = 3;

/// The closed set of question kinds, as written in the `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    Regex,
    MultipleChoice,
    Estimation,
    AudioDictate,
}

impl QuestionType {
    /// The tag used in serialized mappings.
    pub fn tag(self) -> &'static str {
        match self {
            QuestionType::Regex => "regex",
            QuestionType::MultipleChoice => "multiplechoice",
            QuestionType::Estimation => "estimation",
            QuestionType::AudioDictate => "audiodictate",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for QuestionType {
    type Err = CatalogueError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "regex" => Ok(QuestionType::Regex),
            "multiplechoice" => Ok(QuestionType::MultipleChoice),
            "estimation" => Ok(QuestionType::Estimation),
            "audiodictate" => Ok(QuestionType::AudioDictate),
            other => Err(CatalogueError::UnknownQuestionType(other.to_string())),
        }
    }
}

/// Fields shared by every question variant.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionBase {
    /// Identifier, unique within the owning section.
    pub id: String,
    /// Human-readable label.
    pub name: String,
    /// Prompt text.
    pub question: String,
    /// Media references shown with the prompt, in display order.
    pub question_attachments: Vec<String>,
    /// Non-negative score weight.
    pub points: f64,
    /// Owning section, set by the catalogue's indexing pass. Never serialized.
    section_id: Option<String>,
}

impl QuestionBase {
    pub fn new(id: impl Into<String>, name: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            question: question.into(),
            question_attachments: Vec::new(),
            points: DEFAULT_POINTS,
            section_id: None,
        }
    }

    /// Back-reference to the owning section, if the catalogue has indexed it.
    pub fn section_id(&self) -> Option<&str> {
        self.section_id.as_deref()
    }

    pub(crate) fn set_section_id(&mut self, section_id: &str) {
        self.section_id = Some(section_id.to_string());
    }

    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> CatalogueError {
        CatalogueError::InvalidField {
            entity: "question",
            id: self.id.clone(),
            field,
            reason: reason.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(self.invalid("id", "must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(self.invalid("name", "must be non-empty text"));
        }
        if self.question.trim().is_empty() {
            return Err(self.invalid("question", "must be non-empty text"));
        }
        if !self.points.is_finite() || self.points < 0.0 {
            return Err(self.invalid(
                "points",
                format!("must be a finite non-negative number, got {}", self.points),
            ));
        }
        check_references(&self.question_attachments)
            .map_err(|reason| self.invalid("question_attachments", reason))
    }
}

/// Attachment lists hold opaque, non-empty media references.
fn check_references(refs: &[String]) -> std::result::Result<(), String> {
    match refs.iter().position(|r| r.trim().is_empty()) {
        Some(idx) => Err(format!("entry {idx} is an empty reference")),
        None => Ok(()),
    }
}

/// Compile an answer pattern so that it must match the entire answer.
///
/// The bare pattern is compiled first: an unbalanced one such as `a)|(b`
/// would otherwise close the anchoring group and still compile.
fn compile_anchored(id: &str, pattern: &str) -> Result<Regex> {
    let invalid = |source| CatalogueError::InvalidPattern {
        id: id.to_string(),
        source,
    };
    Regex::new(pattern).map_err(invalid)?;
    Regex::new(&format!("^(?:{pattern})$")).map_err(invalid)
}

/// The contract every question variant fulfils.
pub trait QuestionKind {
    /// The variant's serialized type tag.
    const TYPE: QuestionType;

    fn base(&self) -> &QuestionBase;

    fn base_mut(&mut self) -> &mut QuestionBase;

    /// Validate and emit the variant-specific fields of the mapping form.
    fn dump_type_specific(&self) -> Result<Map<String, Value>>;

    /// Produce the full, validated mapping form of this question.
    fn dict_dump(&self) -> Result<Value> {
        let base = self.base();
        base.validate()?;

        let mut res = Map::new();
        res.insert("type".into(), json!(Self::TYPE.tag()));
        res.insert("id".into(), json!(base.id));
        res.insert("name".into(), json!(base.name));
        res.insert("question".into(), json!(base.question));
        res.insert(
            "question_attachments".into(),
            json!(base.question_attachments),
        );
        res.insert("points".into(), json!(base.points));
        res.extend(self.dump_type_specific()?);
        Ok(Value::Object(res))
    }

    fn with_points(mut self, points: f64) -> Self
    where
        Self: Sized,
    {
        self.base_mut().points = points;
        self
    }

    fn with_attachments(mut self, attachments: Vec<String>) -> Self
    where
        Self: Sized,
    {
        self.base_mut().question_attachments = attachments;
        self
    }
}

// ---------------------------------------------------------------------------
// Regex-matched free text
// ---------------------------------------------------------------------------

/// Free-text question graded by a regular expression over the whole answer.
#[derive(Debug, Clone)]
pub struct RegexQuestion {
    pub base: QuestionBase,
    /// Canonical answer shown to the author.
    pub answer: String,
    answer_regex: String,
    pub explanation: Option<String>,
    pub explanation_attachments: Vec<String>,
    pattern: Regex,
}

impl RegexQuestion {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
        answer_regex: impl Into<String>,
    ) -> Result<Self> {
        let base = QuestionBase::new(id, name, question);
        let answer_regex = answer_regex.into();
        let pattern = compile_anchored(&base.id, &answer_regex)?;
        Ok(Self {
            base,
            answer: answer.into(),
            answer_regex,
            explanation: None,
            explanation_attachments: Vec::new(),
            pattern,
        })
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_explanation_attachments(mut self, attachments: Vec<String>) -> Self {
        self.explanation_attachments = attachments;
        self
    }

    /// The stored, unanchored pattern.
    pub fn answer_regex(&self) -> &str {
        &self.answer_regex
    }

    /// True iff the whole answer satisfies the pattern.
    pub fn is_match(&self, answer: &str) -> bool {
        self.pattern.is_match(answer)
    }
}

impl PartialEq for RegexQuestion {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
            && self.answer == other.answer
            && self.answer_regex == other.answer_regex
            && self.explanation == other.explanation
            && self.explanation_attachments == other.explanation_attachments
    }
}

impl QuestionKind for RegexQuestion {
    const TYPE: QuestionType = QuestionType::Regex;

    fn base(&self) -> &QuestionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut QuestionBase {
        &mut self.base
    }

    fn dump_type_specific(&self) -> Result<Map<String, Value>> {
        check_references(&self.explanation_attachments)
            .map_err(|reason| self.base.invalid("explanation_attachments", reason))?;

        let mut res = Map::new();
        res.insert("answer".into(), json!(self.answer));
        res.insert("answer_regex".into(), json!(self.answer_regex));
        res.insert("explanation".into(), json!(self.explanation));
        res.insert(
            "explanation_attachments".into(),
            json!(self.explanation_attachments),
        );
        Ok(res)
    }
}

// ---------------------------------------------------------------------------
// Multiple choice
// ---------------------------------------------------------------------------

/// One right answer offered among a list of wrong ones.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipleChoiceQuestion {
    pub base: QuestionBase,
    pub right_answer: String,
    pub wrong_answers: Vec<String>,
    pub explanation: Option<String>,
    pub explanation_attachments: Vec<String>,
}

impl MultipleChoiceQuestion {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        question: impl Into<String>,
        right_answer: impl Into<String>,
        wrong_answers: Vec<String>,
    ) -> Self {
        Self {
            base: QuestionBase::new(id, name, question),
            right_answer: right_answer.into(),
            wrong_answers,
            explanation: None,
            explanation_attachments: Vec::new(),
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_explanation_attachments(mut self, attachments: Vec<String>) -> Self {
        self.explanation_attachments = attachments;
        self
    }

    pub fn correct_answer(&self) -> &str {
        &self.right_answer
    }

    /// Exact, case-sensitive comparison against the right answer.
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.right_answer
    }
}

impl QuestionKind for MultipleChoiceQuestion {
    const TYPE: QuestionType = QuestionType::MultipleChoice;

    fn base(&self) -> &QuestionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut QuestionBase {
        &mut self.base
    }

    fn dump_type_specific(&self) -> Result<Map<String, Value>> {
        check_references(&self.explanation_attachments)
            .map_err(|reason| self.base.invalid("explanation_attachments", reason))?;

        let mut res = Map::new();
        res.insert("right_answer".into(), json!(self.right_answer));
        res.insert("wrong_answers".into(), json!(self.wrong_answers));
        res.insert("explanation".into(), json!(self.explanation));
        res.insert(
            "explanation_attachments".into(),
            json!(self.explanation_attachments),
        );
        Ok(res)
    }
}

// ---------------------------------------------------------------------------
// Numeric estimation
// ---------------------------------------------------------------------------

/// Numeric question scored by a Gaussian kernel around the right answer.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationQuestion {
    pub base: QuestionBase,
    right_answer: f64,
    expected_deviation: f64,
}

impl EstimationQuestion {
    /// Build an estimation question.
    ///
    /// A missing or zero `expected_deviation` falls back to a third of the
    /// right answer. A deviation that still resolves to zero (right answer 0)
    /// or to a non-finite value is rejected with
    /// [`CatalogueError::DegenerateDeviation`].
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        question: impl Into<String>,
        right_answer: f64,
        expected_deviation: Option<f64>,
    ) -> Result<Self> {
        let base = QuestionBase::new(id, name, question);
        let expected_deviation = match expected_deviation {
            Some(d) if d != 0.0 => d,
            _ => right_answer / 3.0,
        };
        if expected_deviation == 0.0 || !expected_deviation.is_finite() {
            return Err(CatalogueError::DegenerateDeviation { id: base.id });
        }
        Ok(Self {
            base,
            right_answer,
            expected_deviation,
        })
    }

    pub fn right_answer(&self) -> f64 {
        self.right_answer
    }

    pub fn expected_deviation(&self) -> f64 {
        self.expected_deviation
    }

    /// Gaussian score in (0, 1]; exactly 1.0 when the answer is right.
    pub fn evaluate_score(&self, answer: f64) -> f64 {
        let distance = answer - self.right_answer;
        (-(distance * distance) / (2.0 * self.expected_deviation * self.expected_deviation)).exp()
    }
}

impl QuestionKind for EstimationQuestion {
    const TYPE: QuestionType = QuestionType::Estimation;

    fn base(&self) -> &QuestionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut QuestionBase {
        &mut self.base
    }

    fn dump_type_specific(&self) -> Result<Map<String, Value>> {
        if !self.right_answer.is_finite() {
            return Err(self.base.invalid("right_answer", "must be a finite number"));
        }

        let mut res = Map::new();
        res.insert("right_answer".into(), json!(self.right_answer));
        res.insert("expected_deviation".into(), json!(self.expected_deviation));
        Ok(res)
    }
}

// ---------------------------------------------------------------------------
// Audio dictation
// ---------------------------------------------------------------------------

/// Transcribe played audio; graded like [`RegexQuestion`].
#[derive(Debug, Clone)]
pub struct AudioDictate {
    pub base: QuestionBase,
    pub right_answer: String,
    answer_regex: String,
    /// Seconds to count down before playback.
    pub countdown: u32,
    pattern: Regex,
}

impl AudioDictate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        question: impl Into<String>,
        right_answer: impl Into<String>,
        answer_regex: impl Into<String>,
    ) -> Result<Self> {
        let base = QuestionBase::new(id, name, question);
        let answer_regex = answer_regex.into();
        let pattern = compile_anchored(&base.id, &answer_regex)?;
        Ok(Self {
            base,
            right_answer: right_answer.into(),
            answer_regex,
            countdown: DEFAULT_COUNTDOWN,
            pattern,
        })
    }

    pub fn with_countdown(mut self, countdown: u32) -> Self {
        self.countdown = countdown;
        self
    }

    pub fn answer_regex(&self) -> &str {
        &self.answer_regex
    }

    /// True iff the whole transcription satisfies the pattern.
    pub fn is_match(&self, answer: &str) -> bool {
        self.pattern.is_match(answer)
    }
}

impl PartialEq for AudioDictate {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
            && self.right_answer == other.right_answer
            && self.answer_regex == other.answer_regex
            && self.countdown == other.countdown
    }
}

impl QuestionKind for AudioDictate {
    const TYPE: QuestionType = QuestionType::AudioDictate;

    fn base(&self) -> &QuestionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut QuestionBase {
        &mut self.base
    }

    fn dump_type_specific(&self) -> Result<Map<String, Value>> {
        let mut res = Map::new();
        res.insert("right_answer".into(), json!(self.right_answer));
        res.insert("answer_regex".into(), json!(self.answer_regex));
        res.insert("countdown".into(), json!(self.countdown));
        Ok(res)
    }
}

// ---------------------------------------------------------------------------
// The closed question type
// ---------------------------------------------------------------------------

/// A single gradeable item.
#[derive(Debug, Clone, PartialEq)]
pub enum Question {
    Regex(RegexQuestion),
    MultipleChoice(MultipleChoiceQuestion),
    Estimation(EstimationQuestion),
    AudioDictate(AudioDictate),
}

/// A participant's answer, as handed to [`Question::grade`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Answer<'a> {
    Text(&'a str),
    Number(f64),
}

impl Question {
    pub fn base(&self) -> &QuestionBase {
        match self {
            Question::Regex(q) => &q.base,
            Question::MultipleChoice(q) => &q.base,
            Question::Estimation(q) => &q.base,
            Question::AudioDictate(q) => &q.base,
        }
    }

    pub(crate) fn base_mut(&mut self) -> &mut QuestionBase {
        match self {
            Question::Regex(q) => &mut q.base,
            Question::MultipleChoice(q) => &mut q.base,
            Question::Estimation(q) => &mut q.base,
            Question::AudioDictate(q) => &mut q.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn points(&self) -> f64 {
        self.base().points
    }

    pub fn section_id(&self) -> Option<&str> {
        self.base().section_id()
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            Question::Regex(_) => QuestionType::Regex,
            Question::MultipleChoice(_) => QuestionType::MultipleChoice,
            Question::Estimation(_) => QuestionType::Estimation,
            Question::AudioDictate(_) => QuestionType::AudioDictate,
        }
    }

    /// Validated mapping form, tagged with the variant's `type`.
    pub fn dict_dump(&self) -> Result<Value> {
        match self {
            Question::Regex(q) => q.dict_dump(),
            Question::MultipleChoice(q) => q.dict_dump(),
            Question::Estimation(q) => q.dict_dump(),
            Question::AudioDictate(q) => q.dict_dump(),
        }
    }

    /// Fraction of the question's points earned by `answer`.
    ///
    /// Binary variants yield 0.0 or 1.0, estimation yields its Gaussian
    /// score. Returns `None` when the answer kind does not fit the variant.
    pub fn grade(&self, answer: &Answer<'_>) -> Option<f64> {
        let binary = |hit: bool| if hit { 1.0 } else { 0.0 };
        match (self, answer) {
            (Question::Regex(q), Answer::Text(a)) => Some(binary(q.is_match(a))),
            (Question::AudioDictate(q), Answer::Text(a)) => Some(binary(q.is_match(a))),
            (Question::MultipleChoice(q), Answer::Text(a)) => Some(binary(q.is_correct(a))),
            (Question::Estimation(q), Answer::Number(n)) => Some(q.evaluate_score(*n)),
            _ => None,
        }
    }
}

impl From<RegexQuestion> for Question {
    fn from(q: RegexQuestion) -> Self {
        Question::Regex(q)
    }
}

impl From<MultipleChoiceQuestion> for Question {
    fn from(q: MultipleChoiceQuestion) -> Self {
        Question::MultipleChoice(q)
    }
}

impl From<EstimationQuestion> for Question {
    fn from(q: EstimationQuestion) -> Self {
        Question::Estimation(q)
    }
}

impl From<AudioDictate> for Question {
    fn from(q: AudioDictate) -> Self {
        Question::AudioDictate(q)
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Intermediate structures for reading question mappings.
#[derive(Debug, Deserialize)]
struct RawBase {
    id: String,
    name: String,
    question: String,
    #[serde(default)]
    question_attachments: Vec<String>,
    #[serde(default = "default_points")]
    points: f64,
}

fn default_points() -> f64 {
    DEFAULT_POINTS
}

fn default_countdown() -> u32 {
    DEFAULT_COUNTDOWN
}

impl RawBase {
    fn apply<Q: QuestionKind>(self, question: Q) -> Q {
        question
            .with_points(self.points)
            .with_attachments(self.question_attachments)
    }
}

#[derive(Debug, Deserialize)]
struct RawRegexQuestion {
    #[serde(flatten)]
    base: RawBase,
    answer: String,
    answer_regex: String,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    explanation_attachments: Vec<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawMultipleChoiceQuestion {
    #[serde(flatten)]
    base: RawBase,
    right_answer: String,
    wrong_answers: Vec<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    explanation_attachments: Vec<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawEstimationQuestion {
    #[serde(flatten)]
    base: RawBase,
    right_answer: f64,
    #[serde(default)]
    expected_deviation: Option<f64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawAudioDictate {
    #[serde(flatten)]
    base: RawBase,
    right_answer: String,
    answer_regex: String,
    #[serde(default = "default_countdown")]
    countdown: u32,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Keys of a question mapping that no variant field consumed, minus the
/// `type` tag. They are logged and otherwise ignored.
fn unknown_keys<'a>(id: &str, extra: &'a Map<String, Value>) -> Vec<&'a str> {
    let keys: Vec<&str> = extra
        .keys()
        .map(String::as_str)
        .filter(|key| *key != "type")
        .collect();
    if !keys.is_empty() {
        tracing::warn!(question = %id, keys = ?keys, "ignoring unknown question fields");
    }
    keys
}

/// Reconstruct the right question variant from its mapping form.
///
/// Dispatches on the `type` tag; an unrecognized tag fails with
/// [`CatalogueError::UnknownQuestionType`].
pub fn question_from_dict(value: &Value) -> Result<Question> {
    let tag = value.get("type").ok_or(CatalogueError::MissingField {
        entity: "question",
        field: "type",
    })?;
    let question_type: QuestionType = match tag.as_str() {
        Some(tag) => tag.parse()?,
        None => return Err(CatalogueError::UnknownQuestionType(tag.to_string())),
    };

    let question: Question = match question_type {
        QuestionType::Regex => {
            let raw = RawRegexQuestion::deserialize(value)?;
            unknown_keys(&raw.base.id, &raw.extra);
            let mut q = RegexQuestion::new(
                raw.base.id.clone(),
                raw.base.name.clone(),
                raw.base.question.clone(),
                raw.answer,
                raw.answer_regex,
            )?
            .with_explanation_attachments(raw.explanation_attachments);
            q.explanation = raw.explanation;
            raw.base.apply(q).into()
        }
        QuestionType::MultipleChoice => {
            let raw = RawMultipleChoiceQuestion::deserialize(value)?;
            unknown_keys(&raw.base.id, &raw.extra);
            let mut q = MultipleChoiceQuestion::new(
                raw.base.id.clone(),
                raw.base.name.clone(),
                raw.base.question.clone(),
                raw.right_answer,
                raw.wrong_answers,
            )
            .with_explanation_attachments(raw.explanation_attachments);
            q.explanation = raw.explanation;
            raw.base.apply(q).into()
        }
        QuestionType::Estimation => {
            let raw = RawEstimationQuestion::deserialize(value)?;
            unknown_keys(&raw.base.id, &raw.extra);
            let q = EstimationQuestion::new(
                raw.base.id.clone(),
                raw.base.name.clone(),
                raw.base.question.clone(),
                raw.right_answer,
                raw.expected_deviation,
            )?;
            raw.base.apply(q).into()
        }
        QuestionType::AudioDictate => {
            let raw = RawAudioDictate::deserialize(value)?;
            unknown_keys(&raw.base.id, &raw.extra);
            let q = AudioDictate::new(
                raw.base.id.clone(),
                raw.base.name.clone(),
                raw.base.question.clone(),
                raw.right_answer,
                raw.answer_regex,
            )?
            .with_countdown(raw.countdown);
            raw.base.apply(q).into()
        }
    };

    Ok(question)
}
