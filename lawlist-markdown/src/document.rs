use std::{collections::HashMap, ops::Range};

use comrak::{
    Arena, Options,
    nodes::{AstNode, LineColumn, ListType, NodeValue},
    parse_document,
};
use lawlist_core::{
    ContainerNode, Decoration, Error, Indentation, ListKind, RenderPass, VisibleItem,
    trace_enclosing,
};

/// Index of a node in a [`Document`]'s arena.
pub type NodeId = usize;

/// The root node is always the first one in the arena.
pub const ROOT: NodeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    List(ListKind),
    Item,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

/// Which [`Indentation`] items report to the level resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndentStrategy {
    /// Enclosing lists counted in the node tree.
    #[default]
    Tree,
    /// Whitespace right before the marker.
    Text,
}

/// A list item found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub node: NodeId,
    pub kind: ListKind,
    pub ordinal: u64,
    /// The marker and the single space or tab following it.
    pub marker: Range<usize>,
    /// Spaces and tabs right before the marker.
    pub indent: Range<usize>,
    /// 0-based line number.
    pub line: usize,
}

/// A node seen through the [`ContainerNode`] interface.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'d> {
    nodes: &'d [Node],
    id: NodeId,
}

impl NodeRef<'_> {
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn node(&self) -> Option<&Node> {
        self.nodes.get(self.id)
    }
}

impl ContainerNode for NodeRef<'_> {
    fn parent(&self) -> Option<Self> {
        let parent = self.node()?.parent?;
        Some(Self {
            nodes: self.nodes,
            id: parent,
        })
    }

    fn list_kind(&self) -> Option<ListKind> {
        match self.node()?.kind {
            NodeKind::List(kind) => Some(kind),
            NodeKind::Root | NodeKind::Item => None,
        }
    }

    fn is_root(&self) -> bool {
        self.node().is_some_and(|node| node.kind == NodeKind::Root)
    }
}

/// An item handed to the render pass.
#[derive(Debug, Clone, Copy)]
pub struct ItemView<'d> {
    source: &'d str,
    nodes: &'d [Node],
    item: &'d Item,
    strategy: IndentStrategy,
}

impl<'d> ItemView<'d> {
    #[must_use]
    pub fn item(&self) -> &'d Item {
        self.item
    }

    /// The marker as written in the source.
    #[must_use]
    pub fn marker_text(&self) -> &'d str {
        self.source.get(self.item.marker.clone()).unwrap_or_default()
    }

    /// The rest of the item's first line.
    #[must_use]
    pub fn text(&self) -> &'d str {
        let content = self.source.get(self.item.marker.end..).unwrap_or_default();
        content
            .split('\n')
            .next()
            .unwrap_or_default()
            .trim_end_matches('\r')
    }
}

impl VisibleItem for ItemView<'_> {
    fn kind(&self) -> ListKind {
        self.item.kind
    }

    fn ordinal(&self) -> u64 {
        self.item.ordinal
    }

    fn marker(&self) -> Range<usize> {
        self.item.marker.clone()
    }

    fn content(&self) -> &str {
        self.source.get(self.item.marker.end..).unwrap_or_default()
    }

    fn indentation(&self) -> Result<Indentation<'_>, Error> {
        match self.strategy {
            IndentStrategy::Tree => trace_enclosing(NodeRef {
                nodes: self.nodes,
                id: self.item.node,
            })
            .map(Indentation::Tree),
            IndentStrategy::Text => Ok(Indentation::Text(
                self.source.get(self.item.indent.clone()).unwrap_or_default(),
            )),
        }
    }
}

/// Byte offsets of line starts, for turning comrak's 1-based line and byte
/// column into source offsets.
#[derive(Debug)]
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line.checked_sub(1)?).copied()
    }

    fn offset(&self, position: LineColumn) -> Option<usize> {
        Some(self.line_start(position.line)? + position.column.checked_sub(1)?)
    }
}

fn list_kind(list_type: ListType) -> ListKind {
    match list_type {
        ListType::Ordered => ListKind::Ordered,
        ListType::Bullet => ListKind::Unordered,
    }
}

/// The marker of `kind` starting at `start`, plus one following space or tab.
///
/// `None` when the bytes at `start` are not such a marker, which happens when
/// the parser's position does not map back onto the source.
fn marker_span(source: &str, start: usize, kind: ListKind) -> Option<Range<usize>> {
    let rest = source.get(start..)?.as_bytes();
    let len = match kind {
        ListKind::Unordered => usize::from(matches!(rest.first(), Some(b'-' | b'+' | b'*'))),
        ListKind::Ordered => {
            let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 0 && matches!(rest.get(digits), Some(b'.' | b')')) {
                digits + 1
            } else {
                0
            }
        }
    };
    if len == 0 {
        return None;
    }
    let spacing = usize::from(matches!(rest.get(len), Some(b' ' | b'\t')));
    Some(start..start + len + spacing)
}

/// The list structure of a markdown document.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    source: &'a str,
    nodes: Vec<Node>,
    items: Vec<Item>,
    strategy: IndentStrategy,
}

/// State carried through the syntax tree walk.
struct Builder<'a> {
    document: Document<'a>,
    lines: LineIndex,
    next_ordinal: HashMap<NodeId, u64>,
}

impl Builder<'_> {
    /// Record `node` under `parent`; returns the arena node its children
    /// belong to.
    fn visit<'c>(&mut self, node: &'c AstNode<'c>, parent: NodeId) -> NodeId {
        let ast = node.data.borrow();
        if let NodeValue::List(list) = &ast.value {
            let kind = list_kind(list.list_type);
            let id = self.document.push(parent, NodeKind::List(kind));
            let start = match kind {
                ListKind::Ordered => u64::try_from(list.start).unwrap_or(u64::MAX),
                ListKind::Unordered => 1,
            };
            self.next_ordinal.insert(id, start);
            return id;
        }
        if let NodeValue::Item(list) = &ast.value {
            let id = self.document.push(parent, NodeKind::Item);
            let ordinal = self.next_ordinal.get_mut(&parent).map_or(1, |next| {
                let ordinal = *next;
                *next = next.saturating_add(1);
                ordinal
            });
            self.add_item(id, list_kind(list.list_type), ordinal, ast.sourcepos.start);
            return id;
        }
        parent
    }

    fn add_item(&mut self, node: NodeId, kind: ListKind, ordinal: u64, position: LineColumn) {
        let source = self.document.source;
        let located = self
            .lines
            .offset(position)
            .and_then(|start| Some((start, marker_span(source, start, kind)?)));
        let Some((start, marker)) = located else {
            tracing::warn!(
                line = position.line,
                column = position.column,
                "list marker not found at its source position, leaving the item alone"
            );
            return;
        };
        let line_start = self.lines.line_start(position.line).unwrap_or(start);
        let before = source.get(line_start..start).unwrap_or_default();
        let indent = before.len() - before.trim_end_matches([' ', '\t']).len();
        self.document.items.push(Item {
            node,
            kind,
            ordinal,
            marker,
            indent: start - indent..start,
            line: position.line.saturating_sub(1),
        });
    }
}

impl<'a> Document<'a> {
    /// Parse `source` as CommonMark and collect its lists.
    ///
    /// Never fails: text the parser does not read as a list item (code blocks,
    /// HTML blocks, paragraph lines) yields no item.
    #[tracing::instrument(skip_all, fields(len = source.len()))]
    #[must_use]
    pub fn parse(source: &'a str) -> Self {
        let arena = Arena::new();
        let root = parse_document(&arena, source, &Options::default());

        let mut builder = Builder {
            document: Self {
                source,
                nodes: vec![Node {
                    parent: None,
                    kind: NodeKind::Root,
                }],
                items: Vec::new(),
                strategy: IndentStrategy::default(),
            },
            lines: LineIndex::new(source),
            next_ordinal: HashMap::new(),
        };

        // Pre-order walk, so items come out in source order. Block quotes and
        // other containers are transparent: their lists hang off the nearest
        // recorded ancestor.
        let mut stack: Vec<(&AstNode<'_>, NodeId)> = root.children().map(|c| (c, ROOT)).collect();
        stack.reverse();
        while let Some((node, parent)) = stack.pop() {
            let id = builder.visit(node, parent);
            let children: Vec<_> = node.children().collect();
            stack.extend(children.into_iter().rev().map(|child| (child, id)));
        }

        let document = builder.document;
        tracing::debug!(
            items = document.items.len(),
            nodes = document.nodes.len(),
            "collected lists"
        );
        document
    }

    /// Choose which indentation items report.
    #[must_use]
    pub fn with_indent_strategy(mut self, strategy: IndentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        self.nodes.push(Node {
            parent: Some(parent),
            kind,
        });
        self.nodes.len() - 1
    }

    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id < self.nodes.len()).then_some(NodeRef {
            nodes: &self.nodes,
            id,
        })
    }

    /// Every item, in source order.
    pub fn items(&self) -> impl Iterator<Item = ItemView<'_>> {
        self.items.iter().map(|item| self.view(item))
    }

    /// The items whose marker overlaps one of `ranges`; all items when
    /// `ranges` is empty.
    #[must_use]
    pub fn visible_items(&self, ranges: &[Range<usize>]) -> Vec<ItemView<'_>> {
        self.items
            .iter()
            .filter(|item| {
                ranges.is_empty()
                    || ranges
                        .iter()
                        .any(|r| r.start < item.marker.end && item.marker.start < r.end)
            })
            .map(|item| self.view(item))
            .collect()
    }

    /// Run `pass` over the items visible in `ranges`.
    #[must_use]
    pub fn decorate(&self, pass: &RenderPass<'_>, ranges: &[Range<usize>]) -> Vec<Decoration> {
        pass.run(self.visible_items(ranges))
    }

    fn view<'d>(&'d self, item: &'d Item) -> ItemView<'d> {
        ItemView {
            source: self.source,
            nodes: &self.nodes,
            item,
            strategy: self.strategy,
        }
    }
}

#[cfg(test)]
mod tests {
    use lawlist_core::{EnclosingLists, LevelResolver, PatternTable};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn summary(document: &Document<'_>) -> Vec<(usize, u64, String)> {
        document
            .items()
            .map(|view| {
                let level = view
                    .indentation()
                    .ok()
                    .and_then(|i| LevelResolver::default().resolve(&i).ok())
                    .unwrap_or(usize::MAX);
                (level, view.ordinal(), view.text().to_string())
            })
            .collect()
    }

    fn ordinals(source: &str) -> Vec<u64> {
        Document::parse(source)
            .items()
            .map(|view| view.ordinal())
            .collect()
    }

    #[test]
    fn test_nested_lists() {
        let source = "1. one\n   - bullet\n      1. deep\n2. two\n";
        let document = Document::parse(source);
        assert_eq!(
            summary(&document),
            vec![
                (0, 1, "one".to_string()),
                (1, 1, "bullet".to_string()),
                (2, 1, "deep".to_string()),
                (0, 2, "two".to_string()),
            ]
        );
    }

    #[test]
    fn test_enclosing_counts_by_kind() {
        let source = "1. one\n   - bullet\n      1. deep\n";
        let document = Document::parse(source);
        let deep = document.items().last();
        assert_eq!(
            deep.as_ref().and_then(|view| view.indentation().ok()),
            Some(Indentation::Tree(EnclosingLists {
                ordered: 1,
                unordered: 1
            }))
        );
    }

    #[test]
    fn test_ordinals_follow_start_number() {
        assert_eq!(ordinals("3. c\n4. d\n9. e\n"), vec![3, 4, 5]);
    }

    #[test]
    fn test_delimiter_change_starts_a_new_list() {
        let document = Document::parse("1. a\n2. b\n1) c\n- d\n* e\n");
        let ordinals: Vec<u64> = document.items().map(|view| view.ordinal()).collect();
        assert_eq!(ordinals, vec![1, 2, 1, 1, 1]);
        let lists = document
            .nodes()
            .iter()
            .filter(|node| matches!(node.kind, NodeKind::List(_)))
            .count();
        assert_eq!(lists, 4);
    }

    #[test]
    fn test_blank_lines_keep_lists_open() {
        assert_eq!(
            ordinals("1. a\n\n2. b\n\n   continued\n3. c\n"),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_paragraph_closes_lists() {
        assert_eq!(ordinals("1. a\n\nParagraph\n\n1. b\n"), vec![1, 1]);
    }

    #[test]
    fn test_lazy_continuation_keeps_the_list() {
        assert_eq!(ordinals("1. a\nstill a\n2. b\n"), vec![1, 2]);
    }

    #[rstest]
    #[case::fenced_code("```\n1. not a list\n```\n~~~~\n- nor this\n~~~~\n")]
    #[case::indented_code("Intro\n\n    1. not a list\n")]
    #[case::paragraph_line("In the year\n1984. Orwell wrote\n")]
    #[case::html_block("<div>\n1. raw html\n</div>\n")]
    #[case::thematic_break("* * *\n")]
    fn test_non_list_text_has_no_items(#[case] source: &str) {
        assert_eq!(Document::parse(source).items().count(), 0);
    }

    #[test]
    fn test_lists_inside_block_quotes() {
        let source = "> 1. quoted\n> 2. item\n";
        let document = Document::parse(source);
        let markers: Vec<Range<usize>> = document.items().map(|view| view.marker()).collect();
        assert_eq!(markers, vec![2..5, 14..17]);
        assert_eq!(summary(&document).first().map(|(level, ..)| *level), Some(0));
    }

    #[test]
    fn test_marker_span_and_directive_content() {
        let source = "1.  {a) }x\n";
        let document = Document::parse(source);
        let view = document.items().next();
        assert_eq!(view.as_ref().map(VisibleItem::marker), Some(0..3));
        assert_eq!(view.as_ref().map(VisibleItem::content), Some(" {a) }x\n"));
    }

    #[rstest]
    #[case("- a", ListKind::Unordered, Some(0..2))]
    #[case("-", ListKind::Unordered, Some(0..1))]
    #[case("12) b", ListKind::Ordered, Some(0..4))]
    #[case("3.\tc", ListKind::Ordered, Some(0..3))]
    #[case("x. d", ListKind::Ordered, None)]
    #[case("1. e", ListKind::Unordered, None)]
    fn test_marker_span(
        #[case] source: &str,
        #[case] kind: ListKind,
        #[case] expected: Option<Range<usize>>,
    ) {
        assert_eq!(marker_span(source, 0, kind), expected);
    }

    #[test]
    fn test_text_strategy_reports_whitespace() {
        let document =
            Document::parse("- a\n\t- b\n\t\t- c\n").with_indent_strategy(IndentStrategy::Text);
        assert_eq!(
            summary(&document)
                .into_iter()
                .map(|(level, ..)| level)
                .collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_visible_items_filter() {
        let source = "1. a\n2. b\n3. c\n";
        let document = Document::parse(source);
        let visible: Vec<&str> = document
            .visible_items(&[5..9])
            .iter()
            .map(ItemView::text)
            .collect();
        assert_eq!(visible, vec!["b"]);
        assert_eq!(document.visible_items(&[]).len(), 3);
    }

    #[test]
    fn test_decorate() -> Result<(), Error> {
        let document = Document::parse("1. a\n   1. b\n");
        let table = PatternTable::new(&["I. ", "(a) "], &[], false, 10)?;
        let resolver = LevelResolver::default();
        let pass = RenderPass::new(&table, &resolver);
        let decorations = document.decorate(&pass, &[]);
        assert_eq!(
            decorations,
            vec![
                Decoration::Replace {
                    range: 0..3,
                    label: "I. ".to_string(),
                    level: 0
                },
                Decoration::Replace {
                    range: 8..11,
                    label: "(a) ".to_string(),
                    level: 1
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_node_refs_walk_to_root() {
        let document = Document::parse("- a\n  - b\n");
        let item = document.items().last().map(|view| view.item().node);
        let list = item
            .and_then(|id| document.node(id))
            .and_then(|node| node.parent());
        assert_eq!(
            list.and_then(|node| node.list_kind()),
            Some(ListKind::Unordered)
        );
        assert!(document.node(ROOT).is_some_and(|root| root.is_root()));
        assert!(document.node(999).is_none());
    }
}
