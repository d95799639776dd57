use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use super::resolver::Source;

/// File name searched for from the current directory upwards.
pub const CONFIG_FILE_NAME: &str = "issue-lens.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ISSUE_LENS_CONFIG";

/// Discover and load the config file layer.
///
/// Priority:
/// 1. `--config` flag (explicit path)
/// 2. `$ISSUE_LENS_CONFIG`
/// 3. `issue-lens.toml` in the current directory or any ancestor
///
/// No file found yields an empty layer. A file that exists but cannot be read
/// or parsed is an error.
pub fn load_file_source(explicit_path: Option<&Path>) -> Result<Source> {
    let path = match explicit_path {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(),
    };
    let Some(path) = path else {
        tracing::debug!("no config file found");
        return Ok(Source::File(Map::new()));
    };
    tracing::debug!(path = %path.display(), "loading config file");
    Ok(Source::File(parse_config_file(&path)?))
}

/// Parse a TOML config file into JSON-shaped values.
pub fn parse_config_file(path: &Path) -> Result<Map<String, Value>> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let table: toml::Table = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML from {}", path.display()))?;
    match serde_json::to_value(table)
        .with_context(|| format!("converting values from {}", path.display()))?
    {
        Value::Object(map) => Ok(map),
        _ => bail!("{} does not contain a table", path.display()),
    }
}

fn find_config() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        let p = PathBuf::from(&path);
        if p.is_file() {
            return Some(p);
        }
    }
    let cwd = std::env::current_dir().ok()?;
    find_in_ancestors(&cwd)
}

/// Walk up from `start` to the filesystem root looking for
/// [`CONFIG_FILE_NAME`].
pub fn find_in_ancestors(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    PathBuf::from(path)
}
