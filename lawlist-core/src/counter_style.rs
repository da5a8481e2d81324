//! Declarative counter styles.
//!
//! A [`CounterStyle`] describes a compiled pattern the way a CSS
//! `@counter-style` rule does, so a style sink can number list items without
//! calling back into the pattern compiler. The record is derived from the same
//! [`CompiledPattern`] that renders edit-mode labels and [`CounterStyle::label`]
//! evaluates it with CSS semantics; both produce the same text for the same
//! ordinal, except double-alphabetic patterns past [`DOUBLE_ALPHA_SYMBOLS`].
//!
//! Out-of-range ordinals use a companion fallback style (see
//! [`CounterStyle::fallback_style`]) that keeps the prefix and suffix and
//! renders the number in decimal, because a plain CSS `decimal` fallback would
//! drop them.

use std::fmt;

use serde::Serialize;

use crate::{
    numbering::{NumberingSystem, to_upper_alpha},
    pattern::CompiledPattern,
};

/// Number of precomputed symbols for double-alphabetic styles: every ordinal
/// whose alphabetic value has one or two letters (`A` to `ZZ`).
///
/// Past this ordinal the style falls back to decimal, so [`CounterStyle::label`]
/// gives `703.` where [`CompiledPattern::render`] keeps doubling (`AAAAAA.`).
/// This is the one place where read mode and edit mode disagree.
pub const DOUBLE_ALPHA_SYMBOLS: u64 = 702;

/// Predefined CSS counter styles with the exact algorithms of
/// [`NumberingSystem`]: same ranges, decimal outside of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinStyle {
    Decimal,
    UpperRoman,
    LowerRoman,
    UpperAlpha,
    LowerAlpha,
}

impl BuiltinStyle {
    /// The CSS name of the style.
    #[must_use]
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Decimal => "decimal",
            Self::UpperRoman => "upper-roman",
            Self::LowerRoman => "lower-roman",
            Self::UpperAlpha => "upper-alpha",
            Self::LowerAlpha => "lower-alpha",
        }
    }

    fn numbering(self) -> NumberingSystem {
        match self {
            Self::Decimal => NumberingSystem::Decimal,
            Self::UpperRoman => NumberingSystem::UpperRoman,
            Self::LowerRoman => NumberingSystem::LowerRoman,
            Self::UpperAlpha => NumberingSystem::UpperAlpha,
            Self::LowerAlpha => NumberingSystem::LowerAlpha,
        }
    }
}

/// The `system` descriptor of a counter style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "base", rename_all = "kebab-case")]
pub enum CounterSystem {
    /// `extends <builtin>`
    Extends(BuiltinStyle),
    /// `fixed`: symbol `n` is used for ordinal `n`, fallback afterwards.
    Fixed,
    /// `cyclic`: the symbols repeat forever.
    Cyclic,
}

/// A declarative description of a pattern for style sinks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CounterStyle {
    pub name: String,
    pub system: CounterSystem,
    pub prefix: String,
    pub suffix: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub symbols: Vec<String>,
    /// Name of the style used for ordinals outside this style's range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl CounterStyle {
    /// Describe `pattern` as a counter style called `name`.
    #[must_use]
    pub fn from_pattern(name: &str, pattern: &CompiledPattern) -> Self {
        let (system, symbols) = match pattern.system() {
            NumberingSystem::Decimal => (CounterSystem::Extends(BuiltinStyle::Decimal), vec![]),
            NumberingSystem::UpperRoman => {
                (CounterSystem::Extends(BuiltinStyle::UpperRoman), vec![])
            }
            NumberingSystem::LowerRoman => {
                (CounterSystem::Extends(BuiltinStyle::LowerRoman), vec![])
            }
            NumberingSystem::UpperAlpha => {
                (CounterSystem::Extends(BuiltinStyle::UpperAlpha), vec![])
            }
            NumberingSystem::LowerAlpha => {
                (CounterSystem::Extends(BuiltinStyle::LowerAlpha), vec![])
            }
            NumberingSystem::DoubleUpperAlpha => (
                CounterSystem::Fixed,
                (1..=DOUBLE_ALPHA_SYMBOLS)
                    .map(|n| to_upper_alpha(n).repeat(2))
                    .collect(),
            ),
            NumberingSystem::DoubleLowerAlpha => (
                CounterSystem::Fixed,
                (1..=DOUBLE_ALPHA_SYMBOLS)
                    .map(|n| to_upper_alpha(n).to_lowercase().repeat(2))
                    .collect(),
            ),
            NumberingSystem::Table(table) => (
                CounterSystem::Fixed,
                table.symbols().iter().map(ToString::to_string).collect(),
            ),
            NumberingSystem::Literal(literal) => (CounterSystem::Cyclic, vec![literal.clone()]),
        };
        let fallback = match system {
            CounterSystem::Extends(BuiltinStyle::Decimal) | CounterSystem::Cyclic => None,
            CounterSystem::Extends(_) | CounterSystem::Fixed => Some(format!("{name}-fallback")),
        };
        Self {
            name: name.to_string(),
            system,
            prefix: pattern.prefix().to_string(),
            suffix: pattern.suffix().to_string(),
            symbols,
            fallback,
        }
    }

    /// The companion style named by [`CounterStyle::fallback`]: decimal with
    /// the same prefix and suffix.
    #[must_use]
    pub fn fallback_style(&self) -> Option<CounterStyle> {
        self.fallback.as_ref().map(|name| CounterStyle {
            name: name.clone(),
            system: CounterSystem::Extends(BuiltinStyle::Decimal),
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            symbols: Vec::new(),
            fallback: None,
        })
    }

    /// Evaluate the style for `ordinal` the way a CSS engine would.
    #[must_use]
    pub fn label(&self, ordinal: u64) -> String {
        let number = match self.system {
            CounterSystem::Extends(builtin) => builtin.numbering().render(ordinal),
            CounterSystem::Fixed => usize::try_from(ordinal)
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|index| self.symbols.get(index))
                .cloned()
                .unwrap_or_else(|| ordinal.to_string()),
            CounterSystem::Cyclic => self.cyclic_symbol(ordinal),
        };
        format!("{}{number}{}", self.prefix, self.suffix)
    }

    fn cyclic_symbol(&self, ordinal: u64) -> String {
        let len = u64::try_from(self.symbols.len()).unwrap_or(u64::MAX);
        if len == 0 {
            return String::new();
        }
        let index = usize::try_from(ordinal.saturating_sub(1) % len).unwrap_or_default();
        self.symbols.get(index).cloned().unwrap_or_default()
    }
}

/// Quote `value` as a CSS string. Control characters become hex escapes
/// (`\A ` for a newline).
fn css_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            c if c.is_control() => quoted.push_str(&format!("\\{:X} ", u32::from(c))),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

impl fmt::Display for CounterStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@counter-style {} {{ system: ", self.name)?;
        match self.system {
            CounterSystem::Extends(builtin) => write!(f, "extends {}", builtin.css_name())?,
            CounterSystem::Fixed => write!(f, "fixed")?,
            CounterSystem::Cyclic => write!(f, "cyclic")?,
        }
        write!(f, "; ")?;
        if !self.symbols.is_empty() {
            let symbols: Vec<String> = self.symbols.iter().map(|s| css_string(s)).collect();
            write!(f, "symbols: {}; ", symbols.join(" "))?;
        }
        // The CSS default suffix is ". ", so both are always spelled out.
        write!(
            f,
            "prefix: {}; suffix: {}; ",
            css_string(&self.prefix),
            css_string(&self.suffix)
        )?;
        if let Some(fallback) = &self.fallback {
            write!(f, "fallback: {fallback}; ")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::pattern::compile;

    #[rstest]
    #[case("1. ", CounterSystem::Extends(BuiltinStyle::Decimal))]
    #[case("I.", CounterSystem::Extends(BuiltinStyle::UpperRoman))]
    #[case("(i)", CounterSystem::Extends(BuiltinStyle::LowerRoman))]
    #[case("A)", CounterSystem::Extends(BuiltinStyle::UpperAlpha))]
    #[case("(a) ", CounterSystem::Extends(BuiltinStyle::LowerAlpha))]
    #[case("aa.", CounterSystem::Fixed)]
    #[case("①", CounterSystem::Fixed)]
    #[case("•", CounterSystem::Cyclic)]
    fn test_system_mapping(#[case] pattern: &str, #[case] expected: CounterSystem) {
        assert_eq!(compile(pattern).counter_style("s").system, expected);
    }

    #[test]
    fn test_css_rule() {
        let style = compile("(a) ").counter_style("lawlist-ol-1");
        assert_eq!(
            style.to_string(),
            "@counter-style lawlist-ol-1 { system: extends lower-alpha; prefix: \"(\"; \
             suffix: \") \"; fallback: lawlist-ol-1-fallback; }"
        );
        let fallback = style.fallback_style().map(|s| s.to_string());
        assert_eq!(
            fallback.as_deref(),
            Some(
                "@counter-style lawlist-ol-1-fallback { system: extends decimal; prefix: \"(\"; \
                 suffix: \") \"; }"
            )
        );
    }

    #[test]
    fn test_css_rule_cyclic_and_escaping() {
        let style = compile("\"§\\").counter_style("quoted");
        assert_eq!(
            style.to_string(),
            "@counter-style quoted { system: cyclic; symbols: \"\\\"§\\\\\"; prefix: \"\"; \
             suffix: \"\"; }"
        );
        assert!(style.fallback_style().is_none());
    }

    #[test]
    fn test_fixed_symbols_come_from_the_table() {
        let style = compile("(あ)").counter_style("kana");
        assert_eq!(style.symbols.len(), 46);
        assert_eq!(style.symbols.first().map(String::as_str), Some("あ"));
        assert_eq!(style.label(2), "(い)");
        assert_eq!(style.label(47), "(47)");
    }

    #[test]
    fn test_double_alpha_symbols_cover_two_letters() {
        let style = compile("AA.").counter_style("double");
        assert_eq!(style.symbols.len(), 702);
        assert_eq!(style.label(27), "AAAA.");
        assert_eq!(style.symbols.last().map(String::as_str), Some("ZZZZ"));
    }

    #[test]
    fn test_serialize() -> Result<(), serde_json::Error> {
        let style = compile("i) ").counter_style("roman");
        let json = serde_json::to_value(&style)?;
        assert_eq!(
            json,
            serde_json::json!({
                "name": "roman",
                "system": { "type": "extends", "base": "lower-roman" },
                "prefix": "",
                "suffix": ") ",
                "fallback": "roman-fallback",
            })
        );
        Ok(())
    }

    proptest! {
        /// Read mode (counter styles) and edit mode (rendered labels) never
        /// diverge inside the double-alphabetic symbol span.
        #[test]
        fn counter_style_matches_render(
            pattern in "[ -~①あア甲一]{0,6}",
            ordinal in 0..=DOUBLE_ALPHA_SYMBOLS,
        ) {
            let compiled = compile(&pattern);
            let style = compiled.counter_style("p");
            prop_assert_eq!(style.label(ordinal), compiled.render(ordinal));
        }
    }

    #[test]
    fn test_control_characters_are_escaped() {
        let style = compile("\r1.\t").counter_style("ctl");
        let css = style.to_string();
        assert!(css.contains("prefix: \"\\D \";"), "{css}");
        assert!(css.contains("suffix: \".\\9 \";"), "{css}");
        assert_eq!(css_string("a\nb"), "\"a\\A b\"");
    }

    #[test]
    fn test_double_alpha_falls_back_past_two_letters() {
        let pattern = compile("aa.");
        let style = pattern.counter_style("double");
        assert_eq!(style.label(702), pattern.render(702));
        assert_eq!(style.label(703), "703.");
        assert_eq!(pattern.render(703), "aaaaaa.");
    }
}
