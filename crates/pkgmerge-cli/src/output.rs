//! Output
//!
//! Writes the rendered package to STDOUT or into the output directory.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;

use crate::config::MergeConfig;

/// Emit `rendered`; returns the written file path when not writing to STDOUT.
pub fn emit(rendered: &str, config: &MergeConfig) -> anyhow::Result<Option<PathBuf>> {
    let Some(dir) = &config.output else {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(rendered.as_bytes())?;
        lock.flush()?;
        return Ok(None);
    };

    let path = dir.join(&config.file_name);
    fs::write(&path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(Some(path))
}
