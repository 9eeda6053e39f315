//! Run Configuration
//!
//! Turns raw command-line paths into validated absolute directories.

use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    pub source: PathBuf,
    /// `None` means STDOUT
    pub output: Option<PathBuf>,
    pub file_name: String,
}

impl MergeConfig {
    pub fn resolve(source: &Path, output: Option<&Path>, file_name: &str) -> anyhow::Result<Self> {
        let home = dirs::home_dir();

        let source = absolute(&expand_tilde(source, home.as_deref()))?;
        if !source.is_dir() {
            bail!("SOURCE not a valid directory: {}", source.display());
        }

        let output = match output {
            Some(path) => {
                let path = absolute(&expand_tilde(path, home.as_deref()))?;
                if !path.is_dir() {
                    bail!("OUTPUT is not a valid directory: {}", path.display());
                }
                Some(path)
            }
            None => None,
        };

        let mut components = Path::new(file_name).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            bail!("file name must be a plain file name: {:?}", file_name);
        }

        Ok(Self {
            source,
            output,
            file_name: file_name.to_string(),
        })
    }
}

/// Replace a leading `~` with the home directory, when known.
pub fn expand_tilde(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_expand_tilde() {
        let home = Path::new("/home/dev");
        assert_eq!(expand_tilde(Path::new("~/src"), Some(home)), PathBuf::from("/home/dev/src"));
        assert_eq!(expand_tilde(Path::new("~"), Some(home)), PathBuf::from("/home/dev"));
        assert_eq!(expand_tilde(Path::new("src/~"), Some(home)), PathBuf::from("src/~"));
        assert_eq!(expand_tilde(Path::new("~/src"), None), PathBuf::from("~/src"));
    }

    #[test]
    fn test_resolve_valid_dirs() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let config = MergeConfig::resolve(src.path(), Some(out.path()), "package.xml").unwrap();
        assert_eq!(config.source, src.path());
        assert_eq!(config.output.as_deref(), Some(out.path()));
        assert_eq!(config.file_name, "package.xml");
    }

    #[test]
    fn test_resolve_rejects_missing_source() {
        let tmp = TempDir::new().unwrap();
        let err = MergeConfig::resolve(&tmp.path().join("missing"), None, "package.xml").unwrap_err();
        assert!(err.to_string().starts_with("SOURCE not a valid directory"));
    }

    #[test]
    fn test_resolve_rejects_file_as_source() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("package.xml");
        std::fs::write(&file, "<Package/>").unwrap();
        assert!(MergeConfig::resolve(&file, None, "package.xml").is_err());
    }

    #[test]
    fn test_resolve_rejects_bad_output() {
        let src = TempDir::new().unwrap();
        let file = src.path().join("out.txt");
        std::fs::write(&file, "").unwrap();

        let err = MergeConfig::resolve(src.path(), Some(&file), "package.xml").unwrap_err();
        assert!(err.to_string().starts_with("OUTPUT is not a valid directory"));
        assert!(MergeConfig::resolve(src.path(), Some(&src.path().join("nope")), "package.xml").is_err());
    }

    #[test]
    fn test_resolve_rejects_file_name_with_path() {
        let src = TempDir::new().unwrap();
        for bad in ["", "a/package.xml", "..", "/package.xml"] {
            assert!(MergeConfig::resolve(src.path(), None, bad).is_err(), "accepted {:?}", bad);
        }
    }
}
