// Selection Resolver
// Turns raw (node, offset) anchors into an ordered range of linear positions

use super::structured_document::{ContentNode, ContentTree, NodePath, content_len};
use tracing::debug;

/// A boundary point in the tree.
///
/// If `path` names a text run, `offset` counts characters inside it.
/// Otherwise `offset` is a child index of the node at `path` (the root path
/// addresses the top-level nodes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub path: NodePath,
    pub offset: usize,
}

impl Anchor {
    pub fn new(path: NodePath, offset: usize) -> Self {
        Anchor { path, offset }
    }

    pub fn root(offset: usize) -> Self {
        Anchor::new(NodePath::root(), offset)
    }
}

/// The user's selection as reported by the editing surface: where the drag
/// started and where it ended, in either direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Anchor,
    pub focus: Anchor,
}

impl Selection {
    pub fn new(anchor: Anchor, focus: Anchor) -> Self {
        Selection { anchor, focus }
    }

    pub fn caret(at: Anchor) -> Self {
        Selection {
            anchor: at.clone(),
            focus: at,
        }
    }
}

/// Normalized selection: `start` precedes `end` in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: Anchor,
    pub end: Anchor,
    pub start_pos: usize,
    pub end_pos: usize,
}

impl SelectionRange {
    pub fn is_collapsed(&self) -> bool {
        self.start_pos == self.end_pos
    }

    pub fn len(&self) -> usize {
        self.end_pos - self.start_pos
    }
}

/// Which neighbour a position binds to when it sits between two runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    /// The run that starts at the position
    Forward,
    /// The run that ends at the position
    Backward,
}

/// Linear position of an anchor, or `None` if it no longer fits the tree
pub fn position_of(tree: &ContentTree, anchor: &Anchor) -> Option<usize> {
    let start = tree.start_of(&anchor.path)?;
    match tree.node_at(&anchor.path) {
        Some(ContentNode::Text(text)) => {
            (anchor.offset <= text.chars().count()).then_some(start + anchor.offset)
        }
        Some(ContentNode::LineBreak) => (anchor.offset <= 1).then_some(start + anchor.offset),
        _ => {
            // container boundary: the offset counts children
            let children = tree.children_at(&anchor.path)?;
            (anchor.offset <= children.len()).then(|| {
                start + content_len(&children[..anchor.offset])
            })
        }
    }
}

/// Resolve the current selection into an ordered range.
///
/// Returns `None` when there is no selection, when an anchor is stale (the
/// selection was lost), or when `require_non_collapsed` is set and the range
/// covers no content.
pub fn resolve(
    tree: &ContentTree,
    selection: Option<&Selection>,
    require_non_collapsed: bool,
) -> Option<SelectionRange> {
    let Some(selection) = selection else {
        debug!("no active selection");
        return None;
    };
    let (Some(anchor_pos), Some(focus_pos)) = (
        position_of(tree, &selection.anchor),
        position_of(tree, &selection.focus),
    ) else {
        debug!(?selection, "selection anchors no longer fit the tree");
        return None;
    };

    let range = if anchor_pos <= focus_pos {
        SelectionRange {
            start: selection.anchor.clone(),
            end: selection.focus.clone(),
            start_pos: anchor_pos,
            end_pos: focus_pos,
        }
    } else {
        SelectionRange {
            start: selection.focus.clone(),
            end: selection.anchor.clone(),
            start_pos: focus_pos,
            end_pos: anchor_pos,
        }
    };

    if require_non_collapsed && range.is_collapsed() {
        debug!(pos = range.start_pos, "selection is collapsed");
        return None;
    }
    Some(range)
}

/// The innermost style wrapper containing the anchor's node (the node itself
/// included), stopping below the root
pub fn nearest_style_wrapper(tree: &ContentTree, anchor: &Anchor) -> Option<NodePath> {
    (1..=anchor.path.depth()).rev().find_map(|depth| {
        let path = anchor.path.truncated(depth);
        match tree.node_at(&path)? {
            ContentNode::Styled { .. } => Some(path),
            _ => None,
        }
    })
}

/// Build an anchor for a linear position.
///
/// Text runs are preferred so the anchor carries its styling context; a
/// position that touches no text falls back to a container boundary.
pub fn anchor_at(tree: &ContentTree, pos: usize, affinity: Affinity) -> Anchor {
    let runs = tree.text_runs();
    let preferred = runs.iter().find(|(_, start, len)| match affinity {
        Affinity::Forward => *start <= pos && pos < start + len,
        Affinity::Backward => *start < pos && pos <= start + len,
    });
    let touching = || {
        runs.iter()
            .find(|(_, start, len)| *start <= pos && pos <= start + len)
    };
    if let Some((path, start, _)) = preferred.or_else(touching) {
        return Anchor::new(path.clone(), pos - start);
    }
    boundary_anchor(tree.nodes(), NodePath::root(), pos)
}

fn boundary_anchor(nodes: &[ContentNode], path: NodePath, pos: usize) -> Anchor {
    let mut acc = 0usize;
    for (i, node) in nodes.iter().enumerate() {
        let len = node.content_len();
        if pos < acc + len {
            if pos == acc {
                return Anchor::new(path, i);
            }
            return match node {
                ContentNode::Text(_) => Anchor::new(path.child(i), pos - acc),
                ContentNode::LineBreak => Anchor::new(path, i),
                _ => boundary_anchor(
                    node.children().unwrap_or_default(),
                    path.child(i),
                    pos - acc,
                ),
            };
        }
        acc += len;
    }
    Anchor::new(path, nodes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::unicode_styles::StyleDimension;

    fn sample() -> ContentTree {
        // "ab" | bold("cd" italic("ef")) | LineBreak | "g"
        ContentTree::from_nodes(vec![ContentNode::block(vec![
            ContentNode::text("ab"),
            ContentNode::wrap(
                StyleDimension::Bold,
                vec![
                    ContentNode::text("cd"),
                    ContentNode::wrap(StyleDimension::Italic, vec![ContentNode::text("ef")]),
                ],
            ),
            ContentNode::LineBreak,
            ContentNode::text("g"),
        ])])
    }

    fn at(indices: &[usize], offset: usize) -> Anchor {
        Anchor::new(NodePath::new(indices.to_vec()), offset)
    }

    #[test]
    fn test_position_of_text_and_containers() {
        let tree = sample();
        assert_eq!(position_of(&tree, &at(&[0, 0], 1)), Some(1));
        assert_eq!(position_of(&tree, &at(&[0, 1, 1, 0], 2)), Some(6));
        assert_eq!(position_of(&tree, &at(&[0], 3)), Some(7));
        assert_eq!(position_of(&tree, &at(&[], 1)), Some(8));
        assert_eq!(position_of(&tree, &at(&[0, 0], 3)), None);
        assert_eq!(position_of(&tree, &at(&[4], 0)), None);
    }

    #[test]
    fn test_resolve_orders_backwards_drag() {
        let tree = sample();
        let selection = Selection::new(at(&[0, 3], 1), at(&[0, 0], 1));
        let range = resolve(&tree, Some(&selection), true).unwrap();
        assert_eq!(range.start, at(&[0, 0], 1));
        assert_eq!((range.start_pos, range.end_pos), (1, 8));
        assert_eq!(range.len(), 7);
    }

    #[test]
    fn test_resolve_rejects_missing_and_collapsed() {
        let tree = sample();
        assert_eq!(resolve(&tree, None, false), None);

        let caret = Selection::caret(at(&[0, 0], 1));
        assert_eq!(resolve(&tree, Some(&caret), true), None);
        assert!(resolve(&tree, Some(&caret), false).unwrap().is_collapsed());

        // end of "ab" and start of the bold run are the same position
        let touching = Selection::new(at(&[0, 0], 2), at(&[0, 1, 0], 0));
        assert_eq!(resolve(&tree, Some(&touching), true), None);
    }

    #[test]
    fn test_resolve_rejects_stale_anchor() {
        let tree = sample();
        let stale = Selection::new(at(&[0, 0], 0), at(&[0, 9], 0));
        assert_eq!(resolve(&tree, Some(&stale), false), None);
    }

    #[test]
    fn test_nearest_style_wrapper() {
        let tree = sample();
        assert_eq!(
            nearest_style_wrapper(&tree, &at(&[0, 1, 1, 0], 1)),
            Some(NodePath::new(vec![0, 1, 1]))
        );
        assert_eq!(
            nearest_style_wrapper(&tree, &at(&[0, 1, 0], 1)),
            Some(NodePath::new(vec![0, 1]))
        );
        assert_eq!(
            nearest_style_wrapper(&tree, &at(&[0, 1], 1)),
            Some(NodePath::new(vec![0, 1]))
        );
        assert_eq!(nearest_style_wrapper(&tree, &at(&[0, 0], 1)), None);
        assert_eq!(nearest_style_wrapper(&tree, &at(&[], 0)), None);
    }

    #[test]
    fn test_anchor_at_affinity() {
        let tree = sample();
        assert_eq!(anchor_at(&tree, 2, Affinity::Forward), at(&[0, 1, 0], 0));
        assert_eq!(anchor_at(&tree, 2, Affinity::Backward), at(&[0, 0], 2));
        assert_eq!(anchor_at(&tree, 0, Affinity::Backward), at(&[0, 0], 0));
        assert_eq!(anchor_at(&tree, 8, Affinity::Forward), at(&[0, 3], 1));
        // between the line break and "g"
        assert_eq!(anchor_at(&tree, 7, Affinity::Backward), at(&[0, 3], 0));
    }

    #[test]
    fn test_anchor_at_without_text() {
        let empty = ContentTree::new();
        assert_eq!(anchor_at(&empty, 0, Affinity::Forward), at(&[], 0));

        let blocks = ContentTree::from_nodes(vec![
            ContentNode::block(vec![ContentNode::LineBreak]),
            ContentNode::block(vec![]),
        ]);
        assert_eq!(anchor_at(&blocks, 0, Affinity::Forward), at(&[], 0));
        assert_eq!(anchor_at(&blocks, 1, Affinity::Forward), at(&[], 2));
        assert_eq!(position_of(&blocks, &at(&[], 2)), Some(1));
    }
}
