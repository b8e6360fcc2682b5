//! quizcat-core — question catalogue model, scoring, and serialization.
//!
//! Catalogues contain sections, sections contain questions. Every level can
//! dump itself to a nested JSON mapping and be restored from one; the
//! [`question::question_from_dict`] factory picks the question variant from
//! the mapping's `type` tag.

pub mod catalogue;
pub mod config;
pub mod error;
pub mod media;
pub mod parser;
pub mod question;
pub mod section;

pub use catalogue::{catalogue_from_dict, Catalogue};
pub use error::CatalogueError;
pub use media::copy_to_mediadir;
pub use question::{
    question_from_dict, Answer, AudioDictate, EstimationQuestion, MultipleChoiceQuestion,
    Question, QuestionKind, QuestionType, RegexQuestion,
};
pub use section::{section_from_dict, Section};
