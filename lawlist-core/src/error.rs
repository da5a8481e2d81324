#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("broken ancestry: reached a parentless node that is not the document root")]
    BrokenAncestry,

    #[error("ancestry deeper than {0} nodes, giving up")]
    AncestryTooDeep(usize),

    #[error("malformed indentation: unexpected {found:?} at offset {offset}")]
    MalformedIndent { found: char, offset: usize },

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("too many levels: {requested} requested, at most {max} supported")]
    LevelLimit { requested: usize, max: usize },
}

impl Error {
    /// Line and column (both 1-based) of a settings error, when known.
    ///
    /// Errors at the very start of a line (end of input after a newline) are
    /// reported at column 1.
    #[must_use]
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Self::Settings(e) if e.line() > 0 => Some((e.line(), e.column().max(1))),
            Self::Settings(_)
            | Self::BrokenAncestry
            | Self::AncestryTooDeep(_)
            | Self::MalformedIndent { .. }
            | Self::LevelLimit { .. } => None,
        }
    }

    /// Get advice for this error if available.
    /// Returns helpful information for resolving the error.
    #[must_use]
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            Self::MalformedIndent { .. } => Some(
                "List indentation may only contain spaces and tabs before the marker",
            ),
            Self::Settings(_) => Some(
                "Settings are a JSON object such as {\"ol_input\": [\"1. \", \"(a) \"], \"ul_input\": [], \"loop\": false}",
            ),
            Self::LevelLimit { .. } => {
                Some("Lower `max_levels`; patterns are configured for at most 30 levels")
            }
            Self::BrokenAncestry | Self::AncestryTooDeep(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_indent_display() {
        let error = Error::MalformedIndent {
            found: 'x',
            offset: 2,
        };
        assert_eq!(
            format!("{error}"),
            "malformed indentation: unexpected 'x' at offset 2"
        );
        assert!(error.advice().is_some());
        assert_eq!(error.location(), None);
    }

    #[test]
    fn test_settings_error_location() {
        let location = crate::Settings::from_json("{\n  \"loop\": \"yes\"\n}")
            .err()
            .and_then(|error| error.location());
        assert_eq!(location, Some((2, 15)));
    }

    #[test]
    fn test_settings_error_at_line_start_has_column_one() {
        let location = serde_json::from_str::<serde_json::Value>("{\n  \"loop\": tru\n}")
            .map_err(Error::from)
            .err()
            .and_then(|error| error.location());
        assert_eq!(location, Some((3, 1)));
    }

    #[test]
    fn test_level_limit_display() {
        let error = Error::LevelLimit {
            requested: 40,
            max: 30,
        };
        assert_eq!(
            format!("{error}"),
            "too many levels: 40 requested, at most 30 supported"
        );
    }
}
