//! `.env` loading.
//!
//! Lines are `KEY=VALUE`, `export KEY=VALUE`, blank, or `# comment`. Values may
//! be wrapped in single or double quotes; an unquoted value ends at ` #`.
//! Loaded entries override variables already present in the environment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{XtaskError, XtaskResult};

/// Default env file, relative to the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Parse env file contents into ordered `(key, value)` pairs.
///
/// Errors carry the 1-based line number and a message.
pub fn parse(contents: &str) -> Result<Vec<(String, String)>, (usize, String)> {
    let mut entries = Vec::new();

    for (idx, raw) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line
            .strip_prefix("export ")
            .map(str::trim_start)
            .unwrap_or(line);

        let Some((key, value)) = line.split_once('=') else {
            return Err((line_no, "expected KEY=VALUE".to_string()));
        };

        let key = key.trim();
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err((line_no, format!("invalid key `{key}`")));
        }

        let value = parse_value(value.trim()).map_err(|message| (line_no, message))?;
        entries.push((key.to_string(), value));
    }

    Ok(entries)
}

fn parse_value(value: &str) -> Result<String, String> {
    for quote in ['"', '\''] {
        if let Some(rest) = value.strip_prefix(quote) {
            let Some(end) = rest.find(quote) else {
                return Err(format!("unterminated {quote} quote"));
            };
            return Ok(rest[..end].to_string());
        }
    }

    let value = match value.find(" #") {
        Some(comment) => &value[..comment],
        None => value,
    };
    Ok(value.trim_end().to_string())
}

/// Read and parse `path`. A missing file yields no entries.
pub fn load(path: &Path) -> XtaskResult<Vec<(String, String)>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no env file");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };

    parse(&contents).map_err(|(line, message)| XtaskError::EnvFile {
        path: path.to_path_buf(),
        line,
        message,
    })
}

/// Load `path` and export its entries into this process's environment.
///
/// An empty value unsets the variable, as Make treats `VAR=` as undefined
/// for `ifdef`. Returns the number of entries applied.
pub fn apply(path: &Path) -> XtaskResult<usize> {
    let entries = load(path)?;
    for (key, value) in &entries {
        if value.is_empty() {
            std::env::remove_var(key);
        } else {
            std::env::set_var(key, value);
        }
    }
    if !entries.is_empty() {
        debug!(path = %path.display(), count = entries.len(), "env file loaded");
    }
    Ok(entries.len())
}

/// Find `--env-file` in raw arguments, before clap has parsed them.
pub fn path_from_args<I>(args: I) -> PathBuf
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let Some(arg) = arg.to_str() else { continue };
        if arg == "--" {
            break;
        }
        if arg == "--env-file" {
            if let Some(path) = args.next() {
                return PathBuf::from(path);
            }
        } else if let Some(path) = arg.strip_prefix("--env-file=") {
            return PathBuf::from(path);
        }
    }
    PathBuf::from(DEFAULT_ENV_FILE)
}
