//! Level to pattern mapping.
//!
//! A [`PatternTable`] holds the configured patterns of one document for both
//! list kinds. Blank entries mean "not configured". Ordered lists fall back to
//! [`FALLBACK_PATTERN`]; unordered lists have no fallback and keep their source
//! marker.
//!
//! With looping enabled, levels past the configured entries cycle through them
//! (trailing blank entries removed first), so `["1. ", "(a) "]` styles levels
//! `0, 2, 4, …` with `1. ` and `1, 3, 5, …` with `(a) `.

use crate::{Error, level::ListKind, pattern::CompiledPattern};

/// Number of levels configured when nothing else is asked for.
pub const DEFAULT_LEVELS: usize = 10;

/// Upper bound for [`PatternTable::max_levels`].
pub const MAX_LEVELS: usize = 30;

/// Pattern for ordered levels without configuration.
pub const FALLBACK_PATTERN: &str = "1. ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTable {
    ordered: Vec<Option<CompiledPattern>>,
    unordered: Vec<Option<CompiledPattern>>,
    looping: bool,
    max_levels: usize,
    fallback: CompiledPattern,
}

impl Default for PatternTable {
    fn default() -> Self {
        Self {
            ordered: Vec::new(),
            unordered: Vec::new(),
            looping: false,
            max_levels: DEFAULT_LEVELS,
            fallback: CompiledPattern::new(FALLBACK_PATTERN),
        }
    }
}

impl PatternTable {
    /// Build a table from raw pattern strings.
    ///
    /// Empty strings are blank entries. Entries at or beyond `max_levels` are
    /// ignored.
    ///
    /// # Errors
    ///
    /// [`Error::LevelLimit`] when `max_levels` exceeds [`MAX_LEVELS`].
    #[tracing::instrument(skip(ordered, unordered))]
    pub fn new<S: AsRef<str>>(
        ordered: &[S],
        unordered: &[S],
        looping: bool,
        max_levels: usize,
    ) -> Result<Self, Error> {
        if max_levels > MAX_LEVELS {
            return Err(Error::LevelLimit {
                requested: max_levels,
                max: MAX_LEVELS,
            });
        }
        let ordered = compile_entries(ordered, max_levels);
        let unordered = compile_entries(unordered, max_levels);
        tracing::debug!(
            ordered = ordered.len(),
            unordered = unordered.len(),
            "built pattern table"
        );
        Ok(Self {
            ordered,
            unordered,
            looping,
            max_levels,
            fallback: CompiledPattern::new(FALLBACK_PATTERN),
        })
    }

    #[must_use]
    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    #[must_use]
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// The pattern used for ordered levels without configuration.
    #[must_use]
    pub fn fallback(&self) -> &CompiledPattern {
        &self.fallback
    }

    /// The configured entries of `kind`, trailing blanks removed.
    #[must_use]
    pub fn entries(&self, kind: ListKind) -> &[Option<CompiledPattern>] {
        match kind {
            ListKind::Ordered => &self.ordered,
            ListKind::Unordered => &self.unordered,
        }
    }

    /// The configured pattern for `level`, applying the loop policy but not the
    /// fallback.
    #[must_use]
    pub fn pattern(&self, kind: ListKind, level: usize) -> Option<&CompiledPattern> {
        if level >= self.max_levels {
            return None;
        }
        let entries = self.entries(kind);
        let index = if level < entries.len() {
            level
        } else if self.looping && !entries.is_empty() {
            level % entries.len()
        } else {
            return None;
        };
        entries.get(index).and_then(Option::as_ref)
    }

    /// The pattern that styles `level`: the configured one, else the fallback
    /// for ordered lists. `None` means the source marker stays.
    #[must_use]
    pub fn resolve(&self, kind: ListKind, level: usize) -> Option<&CompiledPattern> {
        match (self.pattern(kind, level), kind) {
            (Some(pattern), _) => Some(pattern),
            (None, ListKind::Ordered) => Some(&self.fallback),
            (None, ListKind::Unordered) => None,
        }
    }
}

fn compile_entries<S: AsRef<str>>(raw: &[S], max_levels: usize) -> Vec<Option<CompiledPattern>> {
    let mut entries: Vec<Option<CompiledPattern>> = raw
        .iter()
        .take(max_levels)
        .map(|pattern| {
            let pattern = pattern.as_ref();
            (!pattern.is_empty()).then(|| CompiledPattern::new(pattern))
        })
        .collect();
    while entries.last().is_some_and(Option::is_none) {
        entries.pop();
    }
    entries
}
