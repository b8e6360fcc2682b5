//! The `quizcat smoke` command.
//!
//! Builds a synthetic catalogue, pushes every question through a dump and
//! restore of its own, then times the catalogue-level dump, restore, and a
//! lookup of the last question.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use quizcat_core::{
    catalogue_from_dict, question_from_dict, Catalogue, EstimationQuestion,
    MultipleChoiceQuestion, Question, QuestionKind, RegexQuestion, Section,
};

pub fn execute(
    sections: usize,
    questions: usize,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let catalogue = build(sections, questions)?;
    println!(
        "Built {} sections with {} questions",
        catalogue.section_count(),
        catalogue.question_count()
    );

    let start = Instant::now();
    let dump_string = serde_json::to_string(&catalogue.dict_dump()?)?;
    println!("Storing duration: {:?}", start.elapsed());

    let start = Instant::now();
    let restored = catalogue_from_dict(&serde_json::from_str(&dump_string)?)?;
    println!("Restoring duration: {:?}", start.elapsed());

    if let (Some(last_section), Some(last_question)) = (
        sections.checked_sub(1),
        questions.checked_sub(1),
    ) {
        let section_id = format!("sec{last_section}");
        let question_id = format!("qc{last_question}");
        let start = Instant::now();
        let found = restored
            .get_section(Some(section_id.as_str()), None)
            .and_then(|s| s.get_question(Some(question_id.as_str()), None))
            .with_context(|| format!("restored catalogue lost {section_id}/{question_id}"))?;
        println!("Get last question duration: {:?}", start.elapsed());
        tracing::debug!(question = found.id(), section = ?found.section_id(), "found last question");
    }

    if restored.dict_dump()? != catalogue.dict_dump()? {
        anyhow::bail!("restored catalogue differs from the original");
    }
    println!("Round trip OK");

    if let Some(path) = output {
        let pretty = quizcat_core::config::load_config_from(config.as_deref())?.pretty;
        quizcat_core::parser::save_catalogue(&catalogue, &path, pretty)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// Every question is rebuilt from its own dump before insertion, so the
/// factory runs once per question as well.
fn build(sections: usize, questions: usize) -> Result<Catalogue> {
    let mut catalogue = Catalogue::new(
        "smoke0",
        "Katalog 1",
        Some("Ein Fragenkatalog blah blah.".to_string()),
    )
    .with_supported_modes(vec!["quiz".to_string()]);

    for s in 0..sections {
        let mut section = Section::new(format!("sec{s}"), format!("Sektion {}", s + 1));

        for i in 0..questions {
            let generated: [Question; 3] = [
                MultipleChoiceQuestion::new(
                    format!("qa{i}"),
                    "Question 1",
                    "What??",
                    "Foobar",
                    vec!["no".to_string(), "nope".to_string()],
                )
                .into(),
                RegexQuestion::new(
                    format!("qb{i}"),
                    "Question 2",
                    "Word starting with a?",
                    "Affe",
                    "[aA].*",
                )?
                .into(),
                EstimationQuestion::new(
                    format!("qc{i}"),
                    "Question 3",
                    "1 km in feet",
                    3280.84,
                    Some(700.0),
                )?
                .with_points(2.0)
                .into(),
            ];
            for question in generated {
                section.append_question(question_from_dict(&question.dict_dump()?)?);
            }
        }

        catalogue.append_section(section);
    }

    Ok(catalogue)
}
