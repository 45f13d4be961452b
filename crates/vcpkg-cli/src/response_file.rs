//! `@file` response file expansion
//!
//! A token `@path` is replaced by the lines of `path`. Lines are trimmed and
//! blank lines skipped. Tokens read from a response file are taken as-is,
//! so an `@` line inside one is not expanded again.

use std::fs;
use std::path::PathBuf;

use crate::error::{CliError, Result};

/// Expand every `@path` token in `tokens`.
pub fn expand<I>(tokens: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Vec::new();

    for token in tokens {
        let Some(path) = token.strip_prefix('@').filter(|p| !p.is_empty()) else {
            out.push(token);
            continue;
        };

        let path = PathBuf::from(path);
        let content = fs::read_to_string(&path).map_err(|source| CliError::ResponseFile {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "expanding response file");

        out.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    Ok(out)
}
