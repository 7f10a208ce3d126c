//! Project layout discovery.
//!
//! A project keeps its templates in `liquid/` and its sample data in
//! `src/sample-data/`; rendered pages go to `html/` unless overridden.

use crate::error::PreviewError;
use std::path::{Path, PathBuf};

pub const TEMPLATES_DIR_NAME: &str = "liquid";
pub const SAMPLE_DATA_DIR: [&str; 2] = ["src", "sample-data"];
pub const OUTPUT_DIR_NAME: &str = "html";
pub const MENUS_FILE_NAME: &str = "menus.json";
const REPOSITORY_MARKER: &str = ".git";

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewConfig {
    pub project_root: PathBuf,
    pub templates_dir: PathBuf,
    pub sample_data_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl PreviewConfig {
    /// Locate the project root above `working_dir` and derive the default
    /// directories from it. A relative `output` is taken from `working_dir`.
    pub fn discover(working_dir: impl AsRef<Path>, output: Option<PathBuf>) -> Self {
        let working_dir = working_dir.as_ref();
        let project_root = find_project_root(working_dir);
        let sample_data_dir = SAMPLE_DATA_DIR
            .iter()
            .fold(project_root.clone(), |dir, segment| dir.join(segment));
        let output_dir = match output {
            Some(output) => working_dir.join(output),
            None => project_root.join(OUTPUT_DIR_NAME),
        };
        tracing::debug!("Project root: {}", project_root.display());

        Self {
            templates_dir: project_root.join(TEMPLATES_DIR_NAME),
            sample_data_dir,
            output_dir,
            project_root,
        }
    }

    pub fn validate(&self) -> Result<(), PreviewError> {
        if !self.templates_dir.is_dir() {
            return Err(PreviewError::Configuration(format!(
                "Liquid templates directory not found: {}",
                self.templates_dir.display()
            )));
        }
        Ok(())
    }
}

/// Walk upward from `start` to the first directory holding a `liquid`
/// folder or a repository marker. Falls back to `start`.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(TEMPLATES_DIR_NAME).is_dir() || dir.join(REPOSITORY_MARKER).is_dir())
        .unwrap_or(start)
        .to_path_buf()
}

/// List the sample data files rendered by a batch run: every `*.json` file in
/// `dir` except `menus.json`, sorted by path.
pub fn discover_sample_files(dir: &Path) -> Result<Vec<PathBuf>, PreviewError> {
    if !dir.is_dir() {
        return Err(PreviewError::Configuration(format!(
            "Sample data directory not found: {}",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let is_menus = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.eq_ignore_ascii_case(MENUS_FILE_NAME));
        if path.is_file() && is_json && !is_menus {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(PreviewError::Configuration(format!(
            "No sample data files found in {} (excluding {})",
            dir.display(),
            MENUS_FILE_NAME
        )));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_project_root_walks_up() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("liquid")).unwrap();
        let nested = root.path().join("src").join("sample-data");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), root.path());
    }

    #[test]
    fn test_find_project_root_stops_at_repository_marker() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join(".git")).unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), root.path());
    }

    #[test]
    fn test_discover_layout() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("liquid")).unwrap();

        let config = PreviewConfig::discover(root.path(), None);
        assert_eq!(config.templates_dir, root.path().join("liquid"));
        assert_eq!(
            config.sample_data_dir,
            root.path().join("src").join("sample-data")
        );
        assert_eq!(config.output_dir, root.path().join("html"));
        assert!(config.validate().is_ok());

        let custom = PreviewConfig::discover(root.path(), Some(PathBuf::from("out")));
        assert_eq!(custom.output_dir, root.path().join("out"));
    }

    #[test]
    fn test_validate_missing_templates_dir() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join(".git")).unwrap();

        let config = PreviewConfig::discover(root.path(), None);
        assert!(matches!(
            config.validate(),
            Err(PreviewError::Configuration(_))
        ));
    }

    #[test]
    fn test_discover_sample_files_skips_menus() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["posts.json", "MENUS.json", "about.json", "notes.txt"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        let files = discover_sample_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("about.json"), dir.path().join("posts.json")]
        );
    }

    #[test]
    fn test_discover_sample_files_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("menus.json"), "{}").unwrap();

        assert!(discover_sample_files(dir.path()).is_err());
        assert!(discover_sample_files(&dir.path().join("missing")).is_err());
    }
}
