use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};

/// Rich error wrapper for miette display with the offending settings source
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic()]
pub(crate) struct RichError {
    message: String,

    #[help]
    advice: String,

    #[source_code]
    src: NamedSource<String>,

    #[label("{position_advice}")]
    span: SourceSpan,
    position_advice: String,
}

/// Byte offset of a 1-based `line` and `column` in `source`, clamped to a
/// character boundary.
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Turn a settings error into a diagnostic pointing into `source` when the
/// error carries a location.
pub(crate) fn settings_error(error: lawlist_core::Error, path: &Path, source: &str) -> anyhow::Error {
    let Some((line, column)) = error.location() else {
        return anyhow::Error::new(error).context(format!("invalid settings in {}", path.display()));
    };
    let offset = offset_of(source, line, column);
    let length = usize::from(offset < source.len());
    anyhow::Error::new(RichError {
        message: error.to_string(),
        advice: error.advice().unwrap_or_default().to_string(),
        src: NamedSource::new(path.display().to_string(), source.to_string()),
        span: SourceSpan::new(offset.into(), length),
        position_advice: format!("error occurred here (line {line}, column {column})"),
    })
}

pub(crate) fn display(e: anyhow::Error) {
    match e.downcast::<RichError>() {
        Ok(rich_error) => eprint!("{:?}", miette::Report::new(rich_error)),
        Err(e) => {
            eprintln!("  × {e:#}");
            if let Some(advice) = e
                .chain()
                .find_map(|cause| cause.downcast_ref::<lawlist_core::Error>())
                .and_then(lawlist_core::Error::advice)
            {
                eprintln!("  help: {advice}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("abc", 1, 1, 0)]
    #[case("abc\ndef", 2, 2, 5)]
    #[case("abc\ndef", 9, 9, 7)]
    #[case("é", 1, 2, 0)]
    fn test_offset_of(
        #[case] source: &str,
        #[case] line: usize,
        #[case] column: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(offset_of(source, line, column), expected);
    }

    #[test]
    fn test_settings_error_with_location_is_rich() {
        let source = "{\"loop\": 3}";
        let Err(error) = lawlist_core::Settings::from_json(source) else {
            return;
        };
        let report = settings_error(error, Path::new("settings.json"), source);
        assert!(report.downcast_ref::<RichError>().is_some());
    }

    #[test]
    fn test_settings_error_without_location() {
        let error = lawlist_core::Error::LevelLimit {
            requested: 40,
            max: 30,
        };
        let report = settings_error(error, Path::new("settings.json"), "{}");
        assert!(report.downcast_ref::<RichError>().is_none());
        assert!(
            report
                .chain()
                .any(|cause| cause.downcast_ref::<lawlist_core::Error>().is_some())
        );
    }
}
