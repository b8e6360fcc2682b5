//! The `quizcat validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(catalogue_path: PathBuf) -> Result<()> {
    let catalogues = if catalogue_path.is_dir() {
        quizcat_core::parser::load_catalogue_directory(&catalogue_path)?
    } else {
        vec![quizcat_core::parser::load_catalogue(&catalogue_path)?]
    };

    let mut total_warnings = 0;

    for catalogue in &catalogues {
        println!(
            "Catalogue: {} ({} sections, {} questions)",
            catalogue.name,
            catalogue.section_count(),
            catalogue.question_count()
        );

        let warnings = quizcat_core::parser::validate_catalogue(catalogue);
        for w in &warnings {
            let prefix = match (&w.section_id, &w.question_id) {
                (Some(s), Some(q)) => format!("  [{s}/{q}]"),
                (Some(s), None) => format!("  [{s}]"),
                _ => "  ".to_string(),
            };
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All catalogues valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
