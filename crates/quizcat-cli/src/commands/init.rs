//! The `quizcat init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizcat.toml
    if std::path::Path::new("quizcat.toml").exists() {
        println!("quizcat.toml already exists, skipping.");
    } else {
        std::fs::write("quizcat.toml", SAMPLE_CONFIG)?;
        println!("Created quizcat.toml");
    }

    // Create example catalogue
    std::fs::create_dir_all("catalogues")?;
    let example_path = std::path::Path::new("catalogues/example.json");
    if example_path.exists() {
        println!("catalogues/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_CATALOGUE)?;
        println!("Created catalogues/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizcat validate --catalogue catalogues/example.json");
    println!("  2. Run: quizcat show --catalogue catalogues/example.json --section basics");
    println!(
        "  3. Run: quizcat grade --catalogue catalogues/example.json --section basics --question km-feet --answer 3000"
    );

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizcat configuration

# Directory attachments are copied into (QUIZCAT_MEDIA_DIR overrides it)
media_dir = "media"

# Pretty-print catalogue files written by quizcat
pretty = true
"#;

const EXAMPLE_CATALOGUE: &str = r#"{
  "name": "Example Catalogue",
  "id": "example",
  "description": "A small catalogue to get started",
  "buildtime": 1700000000,
  "supported_modes": ["quiz"],
  "sections": {
    "basics": {
      "id": "basics",
      "name": "Basics",
      "questions": {
        "capital": {
          "type": "multiplechoice",
          "id": "capital",
          "name": "Capital of France",
          "question": "What is the capital of France?",
          "question_attachments": [],
          "points": 1.0,
          "right_answer": "Paris",
          "wrong_answers": ["Lyon", "Marseille", "Nice"],
          "explanation": "Paris has been the capital since 987.",
          "explanation_attachments": []
        },
        "a-word": {
          "type": "regex",
          "id": "a-word",
          "name": "Word starting with a",
          "question": "Name an animal starting with the letter a.",
          "question_attachments": [],
          "points": 1.0,
          "answer": "Aardvark",
          "answer_regex": "[aA].*",
          "explanation": null,
          "explanation_attachments": []
        },
        "km-feet": {
          "type": "estimation",
          "id": "km-feet",
          "name": "Kilometre in feet",
          "question": "How many feet are in one kilometre?",
          "question_attachments": [],
          "points": 2.0,
          "right_answer": 3280.84,
          "expected_deviation": 700.0
        },
        "dictation": {
          "type": "audiodictate",
          "id": "dictation",
          "name": "Greeting dictation",
          "question": "Write down the greeting you hear.",
          "question_attachments": [],
          "points": 1.0,
          "right_answer": "Guten Tag",
          "answer_regex": "[Gg]uten [Tt]ag",
          "countdown": 3
        }
      }
    }
  }
}
"#;
