//! The render pass.
//!
//! For every visible item the pass resolves the level, reads the item's
//! directive, picks the effective pattern (directive, then table, then
//! fallback) and emits a [`Decoration`] for the edit-mode sink. Items touched
//! by a selection are left alone so the user can edit the raw marker. An item
//! that fails to resolve is logged and skipped; it never aborts the pass.

use std::{borrow::Cow, ops::Range};

use serde::Serialize;

use crate::{
    Error,
    directive::{Directive, DirectiveKind},
    level::{Indentation, LevelResolver, ListKind},
    pattern::CompiledPattern,
    table::PatternTable,
};

/// An instruction for the edit-mode sink, over source byte ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Decoration {
    /// Show `label` in place of `range`.
    Replace {
        range: Range<usize>,
        label: String,
        level: usize,
    },
    /// Hide `range`.
    Hide { range: Range<usize> },
}

impl Decoration {
    #[must_use]
    pub fn range(&self) -> &Range<usize> {
        match self {
            Self::Replace { range, .. } | Self::Hide { range } => range,
        }
    }
}

/// A list item as provided by the host for one pass.
pub trait VisibleItem {
    fn kind(&self) -> ListKind;

    /// The number the item is rendered with.
    fn ordinal(&self) -> u64;

    /// Source range of the marker, including the whitespace that separates it
    /// from the content.
    fn marker(&self) -> Range<usize>;

    /// The item's content, starting right after the marker.
    fn content(&self) -> &str;

    /// Where the item sits, for level resolution.
    ///
    /// # Errors
    ///
    /// Whatever prevents the host from locating the item, typically
    /// [`Error::BrokenAncestry`].
    fn indentation(&self) -> Result<Indentation<'_>, Error>;
}

/// Everything the pass knows about one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItemRef {
    pub ordinal: u64,
    pub level: usize,
    pub kind: ListKind,
    /// Marker plus directive.
    pub source_range: Range<usize>,
    #[serde(skip)]
    pub directive: Option<Directive>,
}

impl ListItemRef {
    /// End of the marker, start of the directive if there is one.
    ///
    /// Never before `source_range.start`, even for a directive longer than the
    /// range.
    #[must_use]
    pub fn marker_end(&self) -> usize {
        self.source_range
            .end
            .saturating_sub(self.directive.as_ref().map_or(0, |d| d.consumed))
            .max(self.source_range.start)
    }
}

#[derive(Debug, Clone)]
pub struct RenderPass<'a> {
    table: &'a PatternTable,
    resolver: &'a LevelResolver,
    selections: &'a [Range<usize>],
}

impl<'a> RenderPass<'a> {
    #[must_use]
    pub fn new(table: &'a PatternTable, resolver: &'a LevelResolver) -> Self {
        Self {
            table,
            resolver,
            selections: &[],
        }
    }

    /// Set the cursor positions and selections; an empty range is a cursor.
    #[must_use]
    pub fn selections(mut self, selections: &'a [Range<usize>]) -> Self {
        self.selections = selections;
        self
    }

    /// Resolve level and directive of `item`.
    ///
    /// # Errors
    ///
    /// Any error from locating the item or resolving its indentation.
    pub fn item_ref<I: VisibleItem>(&self, item: &I) -> Result<ListItemRef, Error> {
        let level = self.resolver.resolve(&item.indentation()?)?;
        let directive = Directive::extract(item.content());
        let marker = item.marker();
        let end = marker.end + directive.as_ref().map_or(0, |d| d.consumed);
        Ok(ListItemRef {
            ordinal: item.ordinal(),
            level,
            kind: item.kind(),
            source_range: marker.start..end,
            directive,
        })
    }

    /// The pattern `item` is shown with, `None` when the source marker stays.
    #[must_use]
    pub fn effective_pattern(&self, item: &ListItemRef) -> Option<Cow<'a, CompiledPattern>> {
        match item.directive.as_ref().map(|d| &d.kind) {
            Some(DirectiveKind::Escape) => None,
            Some(DirectiveKind::Pattern(pattern)) => {
                Some(Cow::Owned(CompiledPattern::new(pattern)))
            }
            None => self.table.resolve(item.kind, item.level).map(Cow::Borrowed),
        }
    }

    /// Whether a selection touches `range`. A cursor right before the marker
    /// counts as touching.
    #[must_use]
    pub fn is_suppressed(&self, range: &Range<usize>) -> bool {
        self.selections
            .iter()
            .any(|selection| selection.start < range.end && selection.end >= range.start)
    }

    /// The decoration for `item`, if it gets one.
    #[must_use]
    pub fn decorate(&self, item: &ListItemRef) -> Option<Decoration> {
        if self.is_suppressed(&item.source_range) {
            return None;
        }
        let marker_end = item.marker_end();
        match item.directive.as_ref().map(|d| &d.kind) {
            Some(DirectiveKind::Escape) => Some(Decoration::Hide {
                range: marker_end..item.source_range.end,
            }),
            Some(DirectiveKind::Pattern(_)) => {
                let pattern = self.effective_pattern(item)?;
                Some(Decoration::Replace {
                    range: item.source_range.clone(),
                    label: pattern.render(item.ordinal),
                    level: item.level,
                })
            }
            None => {
                let pattern = self.effective_pattern(item)?;
                Some(Decoration::Replace {
                    range: item.source_range.start..marker_end,
                    label: pattern.render(item.ordinal),
                    level: item.level,
                })
            }
        }
    }

    /// Decorate `items`.
    ///
    /// The result is sorted by range start and free of overlaps.
    #[tracing::instrument(skip_all)]
    pub fn run<I, It>(&self, items: It) -> Vec<Decoration>
    where
        I: VisibleItem,
        It: IntoIterator<Item = I>,
    {
        let mut decorations: Vec<Decoration> = items
            .into_iter()
            .filter_map(|item| match self.item_ref(&item) {
                Ok(item_ref) => self.decorate(&item_ref),
                Err(error) => {
                    tracing::warn!(%error, marker = ?item.marker(), "skipping list item");
                    None
                }
            })
            .collect();
        decorations.sort_by_key(|decoration| decoration.range().start);

        let mut last_end = 0;
        decorations.retain(|decoration| {
            let range = decoration.range();
            if range.start < last_end {
                tracing::warn!(?range, "dropping overlapping decoration");
                return false;
            }
            last_end = range.end;
            true
        });
        tracing::debug!(count = decorations.len(), "render pass finished");
        decorations
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tracing_test::traced_test;

    use super::*;
    use crate::level::{EnclosingLists, LevelMode};

    struct Item {
        kind: ListKind,
        ordinal: u64,
        marker: Range<usize>,
        content: &'static str,
        enclosing: Option<EnclosingLists>,
    }

    impl Item {
        /// An ordered item whose marker is `len` bytes at `start`.
        fn ordered(start: usize, len: usize, ordinal: u64, content: &'static str) -> Self {
            Self {
                kind: ListKind::Ordered,
                ordinal,
                marker: start..start + len,
                content,
                enclosing: Some(EnclosingLists::default()),
            }
        }

        fn nested(mut self, ordered: usize, unordered: usize) -> Self {
            self.enclosing = Some(EnclosingLists { ordered, unordered });
            self
        }

        fn unordered(mut self) -> Self {
            self.kind = ListKind::Unordered;
            self
        }

        fn broken(mut self) -> Self {
            self.enclosing = None;
            self
        }
    }

    impl VisibleItem for Item {
        fn kind(&self) -> ListKind {
            self.kind
        }

        fn ordinal(&self) -> u64 {
            self.ordinal
        }

        fn marker(&self) -> Range<usize> {
            self.marker.clone()
        }

        fn content(&self) -> &str {
            self.content
        }

        fn indentation(&self) -> Result<Indentation<'_>, Error> {
            self.enclosing
                .map(Indentation::Tree)
                .ok_or(Error::BrokenAncestry)
        }
    }

    fn table() -> PatternTable {
        PatternTable::new(&["(a) ", "i) "], &["– "], false, 10).unwrap_or_default()
    }

    fn replace(range: Range<usize>, label: &str, level: usize) -> Decoration {
        Decoration::Replace {
            range,
            label: label.to_string(),
            level,
        }
    }

    #[test]
    fn test_table_patterns_replace_markers() {
        let table = table();
        let resolver = LevelResolver::default();
        let pass = RenderPass::new(&table, &resolver);
        let decorations = pass.run([
            Item::ordered(0, 3, 1, "First"),
            Item::ordered(9, 3, 2, "Second"),
            Item::ordered(22, 3, 1, "Nested").nested(1, 0),
            Item::ordered(35, 3, 1, "Deep").nested(2, 0),
        ]);
        assert_eq!(
            decorations,
            vec![
                replace(0..3, "(a) ", 0),
                replace(9..12, "(b) ", 0),
                replace(22..25, "i) ", 1),
                replace(35..38, "1. ", 2),
            ]
        );
    }

    #[test]
    fn test_pattern_directive_replaces_marker_and_directive() {
        let table = table();
        let resolver = LevelResolver::default();
        let pass = RenderPass::new(&table, &resolver);
        let decorations = pass.run([Item::ordered(0, 3, 3, "{§ I. }Text")]);
        // "§" is two bytes, so the directive takes 8.
        assert_eq!(decorations, vec![replace(0..11, "§ III. ", 0)]);
    }

    #[test]
    fn test_escape_hides_only_the_directive() {
        let table = table();
        let resolver = LevelResolver::default();
        let pass = RenderPass::new(&table, &resolver);
        let decorations = pass.run([Item::ordered(4, 3, 1, "{!}Raw")]);
        assert_eq!(decorations, vec![Decoration::Hide { range: 7..10 }]);
    }

    #[test]
    fn test_unordered_items() {
        let table = PatternTable::new(&["1. "], &["", "• "], false, 10).unwrap_or_default();
        let resolver = LevelResolver::default();
        let pass = RenderPass::new(&table, &resolver);
        let decorations = pass.run([
            Item::ordered(0, 2, 1, "no pattern at level 0").unordered(),
            Item::ordered(30, 2, 1, "bullet").unordered().nested(0, 1),
            Item::ordered(50, 2, 2, "{(a) }override").unordered(),
        ]);
        assert_eq!(
            decorations,
            vec![replace(30..32, "• ", 1), replace(50..58, "(b) ", 0)]
        );
    }

    #[rstest]
    #[case(0..0, false)]
    #[case(1..1, true)]
    #[case(3..3, true)]
    #[case(5..5, false)]
    #[case(4..4, false)]
    #[case(1..2, true)]
    #[case(0..20, true)]
    #[case(10..20, false)]
    fn test_selection_suppression(#[case] selection: Range<usize>, #[case] suppressed: bool) {
        let table = table();
        let resolver = LevelResolver::default();
        let selections = [selection];
        let pass = RenderPass::new(&table, &resolver).selections(&selections);
        // Marker "1. " spans 1..4.
        let decorations = pass.run([Item::ordered(1, 3, 1, "Text")]);
        assert_eq!(decorations.is_empty(), suppressed);
    }

    #[test]
    fn test_selection_on_directive_suppresses() {
        let table = table();
        let resolver = LevelResolver::default();
        let selections = [6..6];
        let pass = RenderPass::new(&table, &resolver).selections(&selections);
        assert!(pass.run([Item::ordered(0, 3, 1, "{a. }Text")]).is_empty());
    }

    #[test]
    fn test_level_mode_changes_pattern() {
        let table = table();
        let any = LevelResolver::default();
        let ordered_only = LevelResolver::builder()
            .mode(LevelMode::OrderedOnly)
            .build();
        let item = || Item::ordered(0, 3, 2, "x").nested(0, 1);
        assert_eq!(
            RenderPass::new(&table, &any).run([item()]),
            vec![replace(0..3, "ii) ", 1)]
        );
        assert_eq!(
            RenderPass::new(&table, &ordered_only).run([item()]),
            vec![replace(0..3, "(b) ", 0)]
        );
    }

    #[test]
    #[traced_test]
    fn test_failing_item_is_skipped() {
        let table = table();
        let resolver = LevelResolver::default();
        let pass = RenderPass::new(&table, &resolver);
        let decorations = pass.run([
            Item::ordered(0, 3, 1, "ok"),
            Item::ordered(10, 3, 2, "lost").broken(),
            Item::ordered(20, 3, 3, "ok"),
        ]);
        assert_eq!(
            decorations,
            vec![replace(0..3, "(a) ", 0), replace(20..23, "(c) ", 0)]
        );
        assert!(logs_contain("skipping list item"));
    }

    #[test]
    fn test_output_is_sorted_without_overlaps() {
        let table = table();
        let resolver = LevelResolver::default();
        let pass = RenderPass::new(&table, &resolver);
        let decorations = pass.run([
            Item::ordered(20, 3, 2, "b"),
            Item::ordered(0, 3, 1, "a"),
            Item::ordered(21, 3, 9, "overlapping"),
        ]);
        let starts: Vec<usize> = decorations.iter().map(|d| d.range().start).collect();
        assert_eq!(starts, vec![0, 20]);
    }

    #[test]
    fn test_item_ref_and_effective_pattern() -> Result<(), Error> {
        let table = table();
        let resolver = LevelResolver::default();
        let pass = RenderPass::new(&table, &resolver);
        let item = pass.item_ref(&Item::ordered(2, 3, 4, "{I) }x").nested(1, 1))?;
        assert_eq!(item.level, 2);
        assert_eq!(item.source_range, 2..10);
        assert_eq!(item.marker_end(), 5);
        let label = pass.effective_pattern(&item).map(|p| p.render(item.ordinal));
        assert_eq!(label.as_deref(), Some("IV) "));
        Ok(())
    }

    #[test]
    fn test_marker_end_stays_inside_a_short_range() {
        let item = ListItemRef {
            ordinal: 1,
            level: 0,
            kind: ListKind::Ordered,
            source_range: 2..4,
            directive: Directive::extract("{!}"),
        };
        assert_eq!(item.marker_end(), 2);
        let table = table();
        let resolver = LevelResolver::default();
        let pass = RenderPass::new(&table, &resolver);
        assert_eq!(
            pass.decorate(&item),
            Some(Decoration::Hide { range: 2..4 })
        );
    }
}
