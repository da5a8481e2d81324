//! Pattern compiler.
//!
//! A pattern is the first enumerator as the user would type it, such as `1. `,
//! `(a) `, `i) ` or `§ A.`. It holds at most one number placeholder; everything
//! before the placeholder is the prefix, everything after it the suffix.
//!
//! The placeholder is found by scanning left to right and taking the first
//! position at which any catalog token matches. At a given position the longest
//! token wins, so `AA` is double-alphabetic rather than alphabetic followed by a
//! literal `A`. A pattern without any placeholder is a cyclic literal.
//!
//! [`render`] and [`CompiledPattern::render`] share the token scan and always
//! agree.

use std::fmt;

use crate::{
    counter_style::CounterStyle,
    numbering::{NumberingSystem, SymbolTable},
};

/// A number placeholder token and the numbering system it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Placeholder {
    /// `1`
    Decimal,
    /// `I`
    UpperRoman,
    /// `i`
    LowerRoman,
    /// `A`
    UpperAlpha,
    /// `a`
    LowerAlpha,
    /// `AA`
    DoubleUpperAlpha,
    /// `aa`
    DoubleLowerAlpha,
    /// `①`
    CircledDigit,
    /// `あ`
    Hiragana,
    /// `ア`
    Katakana,
    /// `甲`
    HeavenlyStem,
    /// `一`
    CjkNumeral,
}

impl Placeholder {
    /// The token catalog in match priority order: two-character tokens first.
    pub const CATALOG: [Placeholder; 12] = [
        Placeholder::DoubleUpperAlpha,
        Placeholder::DoubleLowerAlpha,
        Placeholder::Decimal,
        Placeholder::UpperRoman,
        Placeholder::LowerRoman,
        Placeholder::UpperAlpha,
        Placeholder::LowerAlpha,
        Placeholder::CircledDigit,
        Placeholder::Hiragana,
        Placeholder::Katakana,
        Placeholder::HeavenlyStem,
        Placeholder::CjkNumeral,
    ];

    /// The literal text of the token.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Decimal => "1",
            Self::UpperRoman => "I",
            Self::LowerRoman => "i",
            Self::UpperAlpha => "A",
            Self::LowerAlpha => "a",
            Self::DoubleUpperAlpha => "AA",
            Self::DoubleLowerAlpha => "aa",
            Self::CircledDigit => "①",
            Self::Hiragana => "あ",
            Self::Katakana => "ア",
            Self::HeavenlyStem => "甲",
            Self::CjkNumeral => "一",
        }
    }

    /// The numbering system the token stands for.
    #[must_use]
    pub fn system(self) -> NumberingSystem {
        match self {
            Self::Decimal => NumberingSystem::Decimal,
            Self::UpperRoman => NumberingSystem::UpperRoman,
            Self::LowerRoman => NumberingSystem::LowerRoman,
            Self::UpperAlpha => NumberingSystem::UpperAlpha,
            Self::LowerAlpha => NumberingSystem::LowerAlpha,
            Self::DoubleUpperAlpha => NumberingSystem::DoubleUpperAlpha,
            Self::DoubleLowerAlpha => NumberingSystem::DoubleLowerAlpha,
            Self::CircledDigit => NumberingSystem::Table(SymbolTable::CircledDigits),
            Self::Hiragana => NumberingSystem::Table(SymbolTable::Hiragana),
            Self::Katakana => NumberingSystem::Table(SymbolTable::Katakana),
            Self::HeavenlyStem => NumberingSystem::Table(SymbolTable::HeavenlyStems),
            Self::CjkNumeral => NumberingSystem::Table(SymbolTable::CjkNumerals),
        }
    }
}

/// Where a placeholder was found in a pattern (byte offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderMatch {
    pub placeholder: Placeholder,
    pub start: usize,
    pub end: usize,
}

/// Find the placeholder of `pattern`: leftmost position first, longest token
/// at that position.
#[must_use]
pub fn find_placeholder(pattern: &str) -> Option<PlaceholderMatch> {
    pattern.char_indices().find_map(|(start, _)| {
        let rest = pattern.get(start..)?;
        Placeholder::CATALOG
            .iter()
            .find(|placeholder| rest.starts_with(placeholder.token()))
            .map(|&placeholder| PlaceholderMatch {
                placeholder,
                start,
                end: start + placeholder.token().len(),
            })
    })
}

/// Render `pattern` for `ordinal` without compiling it first.
///
/// ```
/// assert_eq!(lawlist_core::render("(a) ", 3), "(c) ");
/// assert_eq!(lawlist_core::render("§ I.", 4), "§ IV.");
/// ```
#[must_use]
pub fn render(pattern: &str, ordinal: u64) -> String {
    let Some(found) = find_placeholder(pattern) else {
        return pattern.to_string();
    };
    let number = found.placeholder.system().render(ordinal);
    let prefix = pattern.get(..found.start).unwrap_or_default();
    let suffix = pattern.get(found.end..).unwrap_or_default();
    let mut label = String::with_capacity(prefix.len() + number.len() + suffix.len());
    label.push_str(prefix);
    label.push_str(&number);
    label.push_str(suffix);
    label
}

/// Compile `pattern` into its system, prefix and suffix.
#[must_use]
pub fn compile(pattern: &str) -> CompiledPattern {
    CompiledPattern::new(pattern)
}

/// A pattern split into prefix, numbering system and suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompiledPattern {
    source: String,
    system: NumberingSystem,
    prefix: String,
    suffix: String,
}

impl CompiledPattern {
    /// Compile `pattern`. See [`compile`].
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        match find_placeholder(pattern) {
            Some(found) => Self {
                source: pattern.to_string(),
                system: found.placeholder.system(),
                prefix: pattern.get(..found.start).unwrap_or_default().to_string(),
                suffix: pattern.get(found.end..).unwrap_or_default().to_string(),
            },
            None => Self {
                source: pattern.to_string(),
                system: NumberingSystem::Literal(pattern.to_string()),
                prefix: String::new(),
                suffix: String::new(),
            },
        }
    }

    /// The pattern this was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn system(&self) -> &NumberingSystem {
        &self.system
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Render the enumerator label for `ordinal`.
    #[must_use]
    pub fn render(&self, ordinal: u64) -> String {
        format!("{}{}{}", self.prefix, self.system.render(ordinal), self.suffix)
    }

    /// Derive the declarative counter style equivalent to this pattern.
    #[must_use]
    pub fn counter_style(&self, name: &str) -> CounterStyle {
        CounterStyle::from_pattern(name, self)
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for CompiledPattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}
