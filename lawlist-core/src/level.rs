//! Indentation level resolution.
//!
//! The level of a list item is the number of list containers enclosing the
//! item's own list. Hosts either walk their node tree ([`trace_enclosing`] over
//! a [`ContainerNode`]) and hand over the counts, or pass the raw leading
//! whitespace of the item's line. [`LevelResolver`] turns either into a
//! 0-based level according to its [`LevelMode`].

use serde::{Deserialize, Serialize};

use crate::Error;

/// Ancestor chains longer than this are treated as cyclic.
pub const MAX_ANCESTRY: usize = 4096;

/// Default number of spaces per indentation unit in text mode.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    /// The HTML element of lists of this kind.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ordered => "ol",
            Self::Unordered => "ul",
        }
    }
}

/// Counts of list containers strictly enclosing an item's own list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EnclosingLists {
    pub ordered: usize,
    pub unordered: usize,
}

impl EnclosingLists {
    fn count(&mut self, kind: ListKind) {
        match kind {
            ListKind::Ordered => self.ordered += 1,
            ListKind::Unordered => self.unordered += 1,
        }
    }
}

/// What a host knows about where an item sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indentation<'a> {
    /// Counts obtained from the host's node tree.
    Tree(EnclosingLists),
    /// Leading whitespace of the item's line.
    Text(&'a str),
}

/// Which enclosing lists contribute to an item's level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LevelMode {
    /// Every enclosing list counts, ordered or not.
    #[default]
    AnyList,
    /// Only enclosing ordered lists count.
    OrderedOnly,
}

/// A node of a host's document tree, as seen by the level resolver.
pub trait ContainerNode: Sized {
    fn parent(&self) -> Option<Self>;

    /// `Some` when this node is a list container.
    fn list_kind(&self) -> Option<ListKind>;

    fn is_root(&self) -> bool;
}

/// Walk from `node` up to the document root and count the enclosing lists.
///
/// The first list container met is the item's own list and is not counted.
///
/// # Errors
///
/// [`Error::BrokenAncestry`] when the walk ends on a node without parent that
/// is not the root, [`Error::AncestryTooDeep`] when it does not end within
/// [`MAX_ANCESTRY`] steps.
pub fn trace_enclosing<N: ContainerNode>(node: N) -> Result<EnclosingLists, Error> {
    let mut enclosing = EnclosingLists::default();
    let mut own_list_seen = false;
    let mut current = node;
    for _ in 0..MAX_ANCESTRY {
        if let Some(kind) = current.list_kind() {
            if own_list_seen {
                enclosing.count(kind);
            } else {
                own_list_seen = true;
            }
        }
        if current.is_root() {
            return Ok(enclosing);
        }
        current = current.parent().ok_or(Error::BrokenAncestry)?;
    }
    Err(Error::AncestryTooDeep(MAX_ANCESTRY))
}

/// Turns an [`Indentation`] into a 0-based level.
///
/// Use [`LevelResolver::builder()`] to configure one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelResolver {
    mode: LevelMode,
    indent_width: usize,
}

impl Default for LevelResolver {
    fn default() -> Self {
        Self {
            mode: LevelMode::default(),
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

impl LevelResolver {
    /// Create a new builder with default values.
    #[must_use]
    pub fn builder() -> LevelResolverBuilder {
        LevelResolverBuilder::default()
    }

    #[must_use]
    pub fn mode(&self) -> LevelMode {
        self.mode
    }

    #[must_use]
    pub fn indent_width(&self) -> usize {
        self.indent_width
    }

    /// Compute the level described by `indentation`.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedIndent`] when text indentation holds anything but
    /// spaces and tabs.
    pub fn resolve(&self, indentation: &Indentation<'_>) -> Result<usize, Error> {
        match indentation {
            Indentation::Tree(enclosing) => Ok(match self.mode {
                LevelMode::AnyList => enclosing.ordered + enclosing.unordered,
                LevelMode::OrderedOnly => enclosing.ordered,
            }),
            Indentation::Text(whitespace) => self.resolve_text(whitespace),
        }
    }

    fn resolve_text(&self, whitespace: &str) -> Result<usize, Error> {
        let mut tabs = 0;
        let mut spaces = 0;
        for (offset, c) in whitespace.char_indices() {
            match c {
                '\t' => tabs += 1,
                ' ' => spaces += 1,
                found => return Err(Error::MalformedIndent { found, offset }),
            }
        }
        Ok(tabs + spaces / self.indent_width)
    }
}

/// Builder for [`LevelResolver`].
#[derive(Debug, Clone, Default)]
pub struct LevelResolverBuilder {
    mode: LevelMode,
    indent_width: Option<usize>,
}

impl LevelResolverBuilder {
    /// Set which enclosing lists count.
    #[must_use]
    pub fn mode(mut self, mode: LevelMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the number of spaces per level in text mode (at least 1).
    #[must_use]
    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = Some(width.max(1));
        self
    }

    #[must_use]
    pub fn build(self) -> LevelResolver {
        LevelResolver {
            mode: self.mode,
            indent_width: self.indent_width.unwrap_or(DEFAULT_INDENT_WIDTH),
        }
    }
}
