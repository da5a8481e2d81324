use std::{fs, ops::Range, path::Path};

use anyhow::Context;
use clap::ValueEnum;
use lawlist_core::Settings;
use lawlist_markdown::IndentStrategy;

use crate::error;

/// How list items report their indentation
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum Indent {
    /// Count enclosing lists
    #[default]
    Tree,
    /// Count leading tabs and spaces
    Text,
}

impl From<Indent> for IndentStrategy {
    fn from(indent: Indent) -> Self {
        match indent {
            Indent::Tree => IndentStrategy::Tree,
            Indent::Text => IndentStrategy::Text,
        }
    }
}

/// Load settings from `path`, or the defaults when there is none.
pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let source = fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    let settings =
        Settings::from_json(&source).map_err(|e| error::settings_error(e, path, &source))?;
    // Surface level limit errors with the same context before any work starts.
    settings
        .pattern_table()
        .map_err(|e| error::settings_error(e, path, &source))?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Parse `START..END` into a byte range.
pub(crate) fn parse_range(value: &str) -> Result<Range<usize>, String> {
    let (start, end) = value
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got `{value}`"))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|e| format!("invalid range start `{start}`: {e}"))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|e| format!("invalid range end `{end}`: {e}"))?;
    if end < start {
        return Err(format!("range end {end} is before its start {start}"));
    }
    Ok(start..end)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("3..7"), Ok(3..7));
        assert_eq!(parse_range("5..5"), Ok(5..5));
        assert!(parse_range("7..3").is_err());
        assert!(parse_range("3").is_err());
        assert!(parse_range("a..3").is_err());
    }

    #[test]
    fn test_load_without_path() -> anyhow::Result<()> {
        assert_eq!(load(None)?, Settings::default());
        Ok(())
    }
}
