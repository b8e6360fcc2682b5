//! The `quizcat grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizcat_core::parser::load_catalogue;
use quizcat_core::{Answer, Question};

pub fn execute(
    catalogue_path: PathBuf,
    section_id: String,
    question_id: String,
    answer: String,
) -> Result<()> {
    let catalogue = load_catalogue(&catalogue_path)?;
    let question = catalogue
        .get_question(&section_id, &question_id)?
        .with_context(|| format!("no question '{question_id}' in section '{section_id}'"))?;

    let parsed = match question {
        Question::Estimation(_) => Answer::Number(
            answer
                .trim()
                .parse::<f64>()
                .with_context(|| format!("estimation answers must be numbers, got '{answer}'"))?,
        ),
        _ => Answer::Text(&answer),
    };

    let fraction = question
        .grade(&parsed)
        .with_context(|| format!("answer does not fit a {} question", question.question_type()))?;

    println!(
        "{}: score {:.3} ({:.2} of {:.2} points)",
        question.name(),
        fraction,
        fraction * question.points(),
        question.points()
    );

    match question {
        Question::Regex(q) => println!("Expected answer: {}", q.answer),
        Question::MultipleChoice(q) => println!("Correct answer: {}", q.correct_answer()),
        Question::Estimation(q) => println!("Right answer: {}", q.right_answer()),
        Question::AudioDictate(q) => println!("Right answer: {}", q.right_answer),
    }

    Ok(())
}
