//! The `quizcat show` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::Table;

use quizcat_core::parser::load_catalogue;

pub fn execute(catalogue_path: PathBuf, section_id: Option<String>) -> Result<()> {
    let catalogue = load_catalogue(&catalogue_path)?;

    let mut table = Table::new();
    match section_id {
        None => {
            println!(
                "{} ({}){}",
                catalogue.name,
                catalogue.id,
                catalogue
                    .description
                    .as_deref()
                    .map(|d| format!(" — {d}"))
                    .unwrap_or_default()
            );
            table.set_header(vec!["Section", "Name", "Questions"]);
            for section in catalogue.get_all_sections() {
                table.add_row(vec![
                    section.id.clone(),
                    section.name.clone(),
                    section.question_count().to_string(),
                ]);
            }
        }
        Some(id) => {
            let section = catalogue
                .get_section(Some(id.as_str()), None)
                .with_context(|| format!("no section '{id}' in {}", catalogue_path.display()))?;
            println!("{} ({})", section.name, section.id);
            table.set_header(vec!["Question", "Type", "Name", "Points"]);
            for question in section.get_all_questions() {
                table.add_row(vec![
                    question.id().to_string(),
                    question.question_type().to_string(),
                    question.name().to_string(),
                    format!("{:.1}", question.points()),
                ]);
            }
        }
    }

    println!("{table}");
    Ok(())
}
