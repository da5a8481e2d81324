//! Read-mode stylesheets.
//!
//! A [`Stylesheet`] renders a [`PatternTable`] as CSS: one `@counter-style` per
//! configured level and kind, and one rule per level selecting the lists at
//! that depth. Depth is expressed with descendant selectors mirroring the
//! [`LevelMode`]: `li li ol` is an ordered list at level 2 when every
//! enclosing list counts, `ol ol ol` when only ordered lists do. Deeper rules
//! are more specific, so each level overrides the ones above it.
//!
//! ```
//! use lawlist_converters_css::{Stylesheet, StylesheetOptions};
//! use lawlist_core::PatternTable;
//!
//! let table = PatternTable::new(&["(a) "], &[], false, 1)?;
//! let css = Stylesheet::from_table(&table, &StylesheetOptions::default()).to_string();
//! assert!(css.contains("ol { list-style-type: lawlist-ol-0; }"));
//! # Ok::<(), lawlist_core::Error>(())
//! ```

use std::{fmt, io::Write};

use lawlist_core::{CounterStyle, LevelMode, ListKind, PatternTable};
use serde::Serialize;

mod error;

pub use error::Error;

/// Resets a list to the browser's default marker.
const REVERT: &str = "revert";

/// Options for [`Stylesheet::from_table`].
///
/// Use [`StylesheetOptions::builder()`] to construct an instance.
#[derive(Debug, Clone)]
pub struct StylesheetOptions {
    level_mode: LevelMode,
    name_prefix: String,
    scope: Option<String>,
}

impl Default for StylesheetOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl StylesheetOptions {
    /// Create a new builder with default values.
    #[must_use]
    pub fn builder() -> StylesheetOptionsBuilder {
        StylesheetOptionsBuilder::default()
    }

    #[must_use]
    pub fn level_mode(&self) -> LevelMode {
        self.level_mode
    }

    #[must_use]
    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

/// Builder for [`StylesheetOptions`].
#[derive(Debug, Clone, Default)]
pub struct StylesheetOptionsBuilder {
    level_mode: LevelMode,
    name_prefix: Option<String>,
    scope: Option<String>,
}

impl StylesheetOptionsBuilder {
    /// Set which enclosing lists count towards a level.
    #[must_use]
    pub fn level_mode(mut self, mode: LevelMode) -> Self {
        self.level_mode = mode;
        self
    }

    /// Set the prefix of generated counter style names (default `lawlist`).
    #[must_use]
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    /// Restrict every rule to descendants of `selector`.
    #[must_use]
    pub fn scope(mut self, selector: impl Into<String>) -> Self {
        self.scope = Some(selector.into());
        self
    }

    #[must_use]
    pub fn build(self) -> StylesheetOptions {
        StylesheetOptions {
            level_mode: self.level_mode,
            name_prefix: self.name_prefix.unwrap_or_else(|| "lawlist".to_string()),
            scope: self.scope,
        }
    }
}

/// A rule applying a list style to the lists matched by `selector`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub selector: String,
    pub list_style: String,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {{ list-style-type: {}; }}",
            self.selector, self.list_style
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stylesheet {
    pub counter_styles: Vec<CounterStyle>,
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// Build the stylesheet for `table`.
    #[tracing::instrument(skip_all)]
    #[must_use]
    pub fn from_table(table: &PatternTable, options: &StylesheetOptions) -> Self {
        let mut sheet = Self {
            counter_styles: Vec::new(),
            rules: Vec::new(),
        };
        let prefix = options.name_prefix();
        let max_levels = table.max_levels();

        // Ordered levels always get a style, configured or fallback.
        let fallback_name = format!("{prefix}-ol-fallback");
        sheet.add_style(table.fallback().counter_style(&fallback_name));
        for level in 0..max_levels {
            let style = match table.pattern(ListKind::Ordered, level) {
                Some(pattern) => {
                    let name = format!("{prefix}-ol-{level}");
                    sheet.add_style(pattern.counter_style(&name));
                    name
                }
                None => fallback_name.clone(),
            };
            sheet.add_rule(options, ListKind::Ordered, level, style);
        }
        sheet.add_rule(options, ListKind::Ordered, max_levels, fallback_name);

        // Unordered levels keep the browser bullet unless configured.
        let mut styled_above = false;
        for level in 0..max_levels {
            match table.pattern(ListKind::Unordered, level) {
                Some(pattern) => {
                    let name = format!("{prefix}-ul-{level}");
                    sheet.add_style(pattern.counter_style(&name));
                    sheet.add_rule(options, ListKind::Unordered, level, name);
                    styled_above = true;
                }
                None if styled_above => {
                    sheet.add_rule(options, ListKind::Unordered, level, REVERT.to_string());
                }
                None => {}
            }
        }
        if styled_above {
            sheet.add_rule(
                options,
                ListKind::Unordered,
                max_levels,
                REVERT.to_string(),
            );
        }

        tracing::debug!(
            counter_styles = sheet.counter_styles.len(),
            rules = sheet.rules.len(),
            "built stylesheet"
        );
        sheet
    }

    fn add_style(&mut self, style: CounterStyle) {
        if let Some(fallback) = style.fallback_style() {
            self.counter_styles.push(style);
            self.counter_styles.push(fallback);
        } else {
            self.counter_styles.push(style);
        }
    }

    fn add_rule(
        &mut self,
        options: &StylesheetOptions,
        kind: ListKind,
        level: usize,
        list_style: String,
    ) {
        self.rules.push(Rule {
            selector: selector(options, kind, level),
            list_style,
        });
    }

    /// Write the CSS text to `writer`.
    ///
    /// # Errors
    ///
    /// Any I/O error from `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        write!(writer, "{self}")?;
        writer.flush()?;
        Ok(())
    }

    /// The stylesheet as JSON, for sinks that build their own rules.
    ///
    /// # Errors
    ///
    /// If serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for style in &self.counter_styles {
            writeln!(f, "{style}")?;
        }
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}

/// The selector matching lists of `kind` at `level`.
fn selector(options: &StylesheetOptions, kind: ListKind, level: usize) -> String {
    let ancestor = match options.level_mode() {
        LevelMode::AnyList => "li ",
        LevelMode::OrderedOnly => "ol ",
    };
    let mut selector = String::new();
    if let Some(scope) = options.scope() {
        selector.push_str(scope);
        selector.push(' ');
    }
    selector.push_str(&ancestor.repeat(level));
    selector.push_str(kind.tag());
    selector
}
