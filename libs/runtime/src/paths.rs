use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

/// Resolve the application home directory.
///
/// - `Some(path)`: a leading `~` is expanded to the user's home; relative paths
///   are made absolute against the current directory.
/// - `None`: `<user home>/<default_subdir>`.
///
/// With `create = true` the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match configured {
        Some(raw) => expand_tilde(&raw)?,
        None => user_home()?.join(default_subdir),
    };

    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("Failed to read current directory")?
            .join(path)
    };

    if create {
        std::fs::create_dir_all(&absolute)
            .with_context(|| format!("Failed to create home dir {}", absolute.display()))?;
    }
    Ok(absolute)
}

fn user_home() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine the user home directory"))
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return user_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(user_home()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}
