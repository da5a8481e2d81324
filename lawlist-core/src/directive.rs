//! Per-item `{pattern}` and `{!}` directives.
//!
//! A directive sits at the very start of an item's content, right after the
//! marker: `1. {a) }text` shows the item as `a) text`, `1. {!}text` keeps the
//! typed `1. ` untouched.

use std::fmt;

/// Directive content that keeps the source marker.
pub const ESCAPE: &str = "!";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// `{!}`
    Escape,
    /// `{pattern}`
    Pattern(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// Bytes of item content taken by the directive, braces included.
    pub consumed: usize,
}

impl Directive {
    /// Extract the directive opening `content`, if any.
    ///
    /// The directive ends at the first `}` and must close on the first line.
    /// Empty braces are not a directive.
    ///
    /// ```
    /// use lawlist_core::{Directive, DirectiveKind};
    ///
    /// let directive = Directive::extract("{(a) }Text {with} braces");
    /// assert_eq!(
    ///     directive,
    ///     Some(Directive { kind: DirectiveKind::Pattern("(a) ".to_string()), consumed: 6 })
    /// );
    /// assert_eq!(Directive::extract("{}Text"), None);
    /// ```
    #[must_use]
    pub fn extract(content: &str) -> Option<Self> {
        let rest = content.strip_prefix('{')?;
        let line = rest.split('\n').next().unwrap_or_default();
        let inner = line.get(..line.find('}')?)?;
        if inner.is_empty() {
            return None;
        }
        let kind = if inner == ESCAPE {
            DirectiveKind::Escape
        } else {
            DirectiveKind::Pattern(inner.to_string())
        };
        Some(Self {
            kind,
            consumed: inner.len() + 2,
        })
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        matches!(self.kind, DirectiveKind::Escape)
    }

    /// The override pattern, `None` for escapes.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        match &self.kind {
            DirectiveKind::Escape => None,
            DirectiveKind::Pattern(pattern) => Some(pattern),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DirectiveKind::Escape => write!(f, "{{{ESCAPE}}}"),
            DirectiveKind::Pattern(pattern) => write!(f, "{{{pattern}}}"),
        }
    }
}
