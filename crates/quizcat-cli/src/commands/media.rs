//! The `quizcat media` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(file: PathBuf, media_dir: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let media_dir = match media_dir {
        Some(dir) => dir,
        None => quizcat_core::config::load_config_from(config.as_deref())?.media_dir,
    };

    let name = quizcat_core::copy_to_mediadir(&file, &media_dir)?;
    println!("{name}");
    Ok(())
}
