//! CommonMark list host driving `lawlist-core`.
//!
//! [`Document::parse`] reads the source with `comrak` and keeps only its list
//! structure: lists, items, and their marker byte spans. Items are handed to a
//! [`lawlist_core::RenderPass`] through [`ItemView`], and [`apply`] splices the
//! resulting decorations back into the source.
//!
//! Lists inside block quotes are found like any other. Code blocks, HTML
//! blocks and paragraph lines that merely start with a number are left alone.
//!
//! ```
//! use lawlist_core::Settings;
//! use lawlist_markdown::{Document, apply};
//!
//! let settings = Settings::from_json(r#"{"ol_input": ["(a) ", "i. "]}"#)?;
//! let table = settings.pattern_table()?;
//! let resolver = settings.level_resolver();
//! let pass = lawlist_core::RenderPass::new(&table, &resolver);
//!
//! let source = "1. Scope\n2. Terms\n   1. Buyer\n";
//! let document = Document::parse(source);
//! let preview = apply(source, &document.decorate(&pass, &[]));
//! assert_eq!(preview, "(a) Scope\n(b) Terms\n   i. Buyer\n");
//! # Ok::<(), lawlist_core::Error>(())
//! ```

mod apply;
mod document;

pub use apply::apply;
pub use document::{
    Document, IndentStrategy, Item, ItemView, Node, NodeId, NodeKind, NodeRef, ROOT,
};
