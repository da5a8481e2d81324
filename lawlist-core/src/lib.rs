//! Pattern-driven list enumerators.
//!
//! `lawlist-core` turns short user patterns such as `1. `, `(a) `, `i) ` or
//! `(甲)` into the visible enumerators of nested markdown lists.
//!
//! The pieces, leaves first:
//!
//! - [`numbering`]: ordinal to text for every supported numbering system.
//! - [`pattern`]: splitting a pattern into prefix, placeholder and suffix, and
//!   rendering it.
//! - [`counter_style`]: the same pattern as a declarative `@counter-style`.
//! - [`level`]: the indentation level of an item, from a node tree or from raw
//!   leading whitespace.
//! - [`table`] and [`settings`]: which pattern applies at which level.
//! - [`directive`]: the per-item `{pattern}` and `{!}` overrides.
//! - [`decoration`]: the render pass producing replace and hide decorations.
//!
//! # Example
//!
//! ```
//! use lawlist_core::{ListKind, Settings};
//!
//! let settings = Settings::from_json(r#"{"ol_input": ["(a) ", "i) "]}"#)?;
//! let table = settings.pattern_table()?;
//! let label = table.resolve(ListKind::Ordered, 1).map(|p| p.render(4));
//! assert_eq!(label.as_deref(), Some("iv) "));
//! # Ok::<(), lawlist_core::Error>(())
//! ```

pub mod counter_style;
pub mod decoration;
pub mod directive;
mod error;
pub mod level;
pub mod numbering;
pub mod pattern;
pub mod settings;
pub mod table;

pub use counter_style::{BuiltinStyle, CounterStyle, CounterSystem};
pub use decoration::{Decoration, ListItemRef, RenderPass, VisibleItem};
pub use directive::{Directive, DirectiveKind};
pub use error::Error;
pub use level::{
    ContainerNode, EnclosingLists, Indentation, LevelMode, LevelResolver, LevelResolverBuilder,
    ListKind, trace_enclosing,
};
pub use numbering::{NumberingSystem, SymbolTable};
pub use pattern::{CompiledPattern, Placeholder, compile, render};
pub use settings::Settings;
pub use table::{DEFAULT_LEVELS, FALLBACK_PATTERN, MAX_LEVELS, PatternTable};
