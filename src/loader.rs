use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::types::Issue;

/// Reads the exported record set once and hands out the normalized issues.
///
/// The first call to [`DataLoader::issues`] parses the file; later calls
/// return the cached collection without touching the filesystem.
#[derive(Debug)]
pub struct DataLoader {
    path: PathBuf,
    issues: OnceCell<Vec<Issue>>,
}

impl DataLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            issues: OnceCell::new(),
        }
    }

    /// A loader whose cache is already populated.
    pub fn with_issues(issues: Vec<Issue>) -> Self {
        Self {
            path: PathBuf::new(),
            issues: OnceCell::from(issues),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.issues.get().is_some()
    }

    pub fn issues(&self) -> Result<&[Issue]> {
        if let Some(issues) = self.issues.get() {
            return Ok(issues);
        }
        let loaded = load_issues(&self.path)?;
        Ok(self.issues.get_or_init(|| loaded))
    }
}

/// Read and normalize a JSON array of raw issue records.
pub fn load_issues(path: &Path) -> Result<Vec<Issue>> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let raw: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parsing JSON from {}", path.display()))?;
    let Value::Array(records) = raw else {
        bail!("{} must contain a JSON array of issues", path.display());
    };
    let issues: Vec<Issue> = records.iter().map(Issue::from_raw).collect();
    tracing::info!(count = issues.len(), path = %path.display(), "loaded issues");
    Ok(issues)
}
