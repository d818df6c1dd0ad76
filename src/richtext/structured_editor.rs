// Structured Editor
// Selection-scoped formatting on a ContentTree. Every mutation works on an
// owned copy of the affected nodes and swaps the result in as one step, then
// republishes the compiled output.

use super::output_sync::{OutputSync, StyledOutput};
use super::selection::{self, Affinity, Anchor, Selection, SelectionRange};
use super::structured_document::*;
use super::styled_text::{CompileOptions, plain_text_with};
use super::unicode_styles::StyleDimension;
use crate::clipboard::{Clipboard, ClipboardError};
use crate::config::Config;
use crate::icons::{DEFAULT_SEPARATOR, needs_bullet};
use crate::paste::sanitize_paste;
use tracing::{debug, warn};

/// Editor settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub compile: CompileOptions,
    pub separator: String,
    pub sanitize_paste: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        EditorOptions {
            compile: CompileOptions::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
            sanitize_paste: true,
        }
    }
}

impl From<&Config> for EditorOptions {
    fn from(config: &Config) -> Self {
        EditorOptions {
            compile: config.compile_options(),
            separator: config.separator.clone(),
            sanitize_paste: config.sanitize_paste,
        }
    }
}

/// How a range rewrite treats the nodes it meets
#[derive(Debug, Clone, Copy)]
struct RewritePolicy {
    /// Work inside a style wrapper that holds the whole range instead of splitting it
    descend_wrappers: bool,
    /// Drop block-level nodes that lie completely inside the range
    remove_covered_blocks: bool,
}

const WRAP: RewritePolicy = RewritePolicy {
    descend_wrappers: true,
    remove_covered_blocks: false,
};

const FLATTEN: RewritePolicy = RewritePolicy {
    descend_wrappers: false,
    remove_covered_blocks: false,
};

const DELETE: RewritePolicy = RewritePolicy {
    descend_wrappers: true,
    remove_covered_blocks: true,
};

/// A line of the document as the compiler lays it out
#[derive(Debug, Clone, PartialEq)]
struct Line {
    start: usize,
    text: String,
    /// First line of a list item; the compiler already puts a bullet there
    list_item: bool,
}

impl Line {
    fn starting_at(start: usize) -> Self {
        Line {
            start,
            text: String::new(),
            list_item: false,
        }
    }

    fn end(&self) -> usize {
        self.start + self.text.chars().count()
    }
}

/// The editing surface: a content tree, the user's selection, and the
/// published output that follows every change
pub struct StyleEditor {
    tree: ContentTree,
    selection: Option<Selection>,
    sync: OutputSync,
    separator: String,
    sanitize_paste: bool,
}

impl StyleEditor {
    /// Create an editor with an empty document
    pub fn new() -> Self {
        Self::with_tree(ContentTree::new())
    }

    /// Create an editor for an existing document
    pub fn with_tree(tree: ContentTree) -> Self {
        Self::with_options(tree, EditorOptions::default())
    }

    pub fn with_options(tree: ContentTree, options: EditorOptions) -> Self {
        let mut editor = StyleEditor {
            tree,
            selection: None,
            sync: OutputSync::new(options.compile),
            separator: options.separator,
            sanitize_paste: options.sanitize_paste,
        };
        editor.publish();
        editor
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    /// Replace the whole document, e.g. after the surface was edited directly
    pub fn set_tree(&mut self, tree: ContentTree) {
        self.tree = tree;
        self.selection = None;
        self.publish();
    }

    /// The last published output
    pub fn output(&self) -> &StyledOutput {
        self.sync.latest()
    }

    /// Run `subscriber` after every change to the document
    pub fn subscribe(&mut self, subscriber: impl FnMut(&StyledOutput) + 'static) {
        self.sync.subscribe(subscriber);
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// The selection normalized against the current tree
    pub fn selection_range(&self) -> Option<SelectionRange> {
        selection::resolve(&self.tree, self.selection.as_ref(), false)
    }

    pub fn set_selection(&mut self, anchor: Anchor, focus: Anchor) {
        self.selection = Some(Selection::new(anchor, focus));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Select the content between two linear positions
    pub fn select_range(&mut self, start: usize, end: usize) {
        if start == end {
            self.set_cursor(start);
            return;
        }
        let (lo, hi) = (start.min(end), start.max(end));
        let lo_anchor = selection::anchor_at(&self.tree, lo, Affinity::Forward);
        let hi_anchor = selection::anchor_at(&self.tree, hi, Affinity::Backward);
        self.selection = Some(if start <= end {
            Selection::new(lo_anchor, hi_anchor)
        } else {
            Selection::new(hi_anchor, lo_anchor)
        });
    }

    /// Select all content in the document
    pub fn select_all(&mut self) {
        self.select_range(0, self.tree.content_len());
    }

    /// Collapse the selection to a caret at `pos`
    pub fn set_cursor(&mut self, pos: usize) {
        let pos = pos.min(self.tree.content_len());
        let anchor = selection::anchor_at(&self.tree, pos, Affinity::Backward);
        self.selection = Some(Selection::caret(anchor));
    }

    /// Wrap the selected content in a new `dimension` wrapper.
    /// Does nothing without a non-empty selection.
    pub fn apply_style(&mut self, dimension: StyleDimension) {
        let Some(range) = selection::resolve(&self.tree, self.selection.as_ref(), true) else {
            debug!(%dimension, "nothing selected to style");
            return;
        };

        let tag = WrapperTag::for_dimension(dimension);
        let nodes = self.tree.take_nodes();
        let nodes = rewrite_range(nodes, range.start_pos, range.end_pos, WRAP, &mut |segment| {
            vec![ContentNode::styled(tag, segment)]
        });
        self.tree.set_nodes(normalize(nodes));
        debug!(
            %dimension,
            start = range.start_pos,
            end = range.end_pos,
            "applied style"
        );

        self.select_range(range.start_pos, range.end_pos);
        self.publish();
    }

    /// Clear formatting.
    ///
    /// Without a selection (or with a caret) every style in the document is
    /// dropped. With both ends of the selection inside the same wrapper, only
    /// the selected part loses that wrapper. Any other selection is replaced
    /// by its plain text, losing every style inside it.
    pub fn remove_style(&mut self) {
        let Some(range) = selection::resolve(&self.tree, self.selection.as_ref(), true) else {
            self.reset_document();
            return;
        };

        let start_wrapper = selection::nearest_style_wrapper(&self.tree, &range.start);
        let end_wrapper = selection::nearest_style_wrapper(&self.tree, &range.end);
        match (start_wrapper, end_wrapper) {
            (Some(start), Some(end)) if start == end => self.unwrap_within(&start, &range),
            _ => self.flatten_range(&range),
        }

        self.select_range(range.start_pos, range.end_pos);
        self.publish();
    }

    /// Remove the selected content
    pub fn delete_selection(&mut self) {
        let Some(range) = selection::resolve(&self.tree, self.selection.as_ref(), true) else {
            return;
        };
        self.delete_range(range.start_pos, range.end_pos);
        self.set_cursor(range.start_pos);
        self.publish();
    }

    /// Insert literal text at the cursor, replacing any selection.
    /// Newlines become line breaks. Without a selection the text is appended.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let pos = self.take_insertion_point();
        let pieces = text_to_nodes(text);
        let inserted = content_len(&pieces);

        let mut nodes = self.tree.take_nodes();
        insert_at(&mut nodes, pos, pieces, Affinity::Backward);
        self.tree.set_nodes(normalize(nodes));

        self.set_cursor(pos + inserted);
        self.publish();
    }

    /// Insert clipboard text as unstyled content
    pub fn paste(&mut self, text: &str) {
        if self.sanitize_paste {
            self.insert_text(&sanitize_paste(text));
        } else {
            self.insert_text(text);
        }
    }

    /// Insert the configured separator line at the cursor
    pub fn insert_separator(&mut self) {
        let separator = self.separator.clone();
        self.insert_text(&separator);
    }

    /// Insert a palette icon at the cursor, followed by a space
    pub fn insert_icon(&mut self, icon: &str) {
        self.insert_text(&format!("{icon} "));
    }

    /// Put `"{prefix} "` in front of every non-blank line of the selection
    /// (or of the whole document), skipping lines that already have a bullet.
    /// List items count as bulleted since the compiler adds their bullet.
    pub fn bulletize(&mut self, prefix: &str) {
        let range = selection::resolve(&self.tree, self.selection.as_ref(), true);
        let (scope_start, scope_end) = range
            .as_ref()
            .map(|r| (r.start_pos, r.end_pos))
            .unwrap_or((0, self.tree.content_len()));

        let targets: Vec<usize> = document_lines(self.tree.nodes())
            .into_iter()
            .filter_map(|line| {
                let seg_start = line.start.max(scope_start);
                let seg_end = line.end().min(scope_end);
                if line.list_item || seg_start >= seg_end {
                    return None;
                }
                let segment: String = line
                    .text
                    .chars()
                    .skip(seg_start - line.start)
                    .take(seg_end - seg_start)
                    .collect();
                needs_bullet(&segment).then_some(seg_start)
            })
            .collect();
        if targets.is_empty() {
            debug!("no lines need a bullet");
            return;
        }

        let marker = format!("{prefix} ");
        let mut nodes = self.tree.take_nodes();
        for &pos in targets.iter().rev() {
            insert_at(
                &mut nodes,
                pos,
                vec![ContentNode::text(marker.clone())],
                Affinity::Forward,
            );
        }
        self.tree.set_nodes(normalize(nodes));

        let added = targets.len() * marker.chars().count();
        match range {
            Some(range) => self.select_range(range.start_pos, range.end_pos + added),
            None => self.set_cursor(self.tree.content_len()),
        }
        self.publish();
    }

    /// Empty the document
    pub fn clear(&mut self) {
        self.tree = ContentTree::new();
        self.selection = None;
        self.publish();
    }

    /// Write the published output to `clipboard`
    pub fn copy_output(&self, clipboard: &mut dyn Clipboard) -> Result<(), ClipboardError> {
        clipboard
            .write_text(&self.output().text)
            .inspect_err(|err| {
                warn!(%err, hint = err.user_message(), "copy to clipboard failed")
            })
    }

    fn publish(&mut self) {
        self.sync.publish(&self.tree);
    }

    /// Whole-document reset: one unstyled run holding the plain-text walk
    fn reset_document(&mut self) {
        let text = plain_text_with(self.tree.nodes(), self.sync.options());
        if text.is_empty() {
            self.tree.set_nodes(Vec::new());
            self.selection = Some(Selection::caret(Anchor::root(0)));
        } else {
            let len = text.chars().count();
            self.tree.set_nodes(vec![ContentNode::Text(text)]);
            self.selection = Some(Selection::caret(Anchor::new(NodePath::new(vec![0]), len)));
        }
        debug!("cleared formatting of the whole document");
        self.publish();
    }

    /// Precision case: split the wrapper at `path` around the selection and
    /// leave the selected part unwrapped
    fn unwrap_within(&mut self, path: &NodePath, range: &SelectionRange) {
        let (Some(wrapper_start), Some(ContentNode::Styled { tag, children })) =
            (self.tree.start_of(path), self.tree.node_at(path).cloned())
        else {
            self.flatten_range(range);
            return;
        };

        let local_start = range.start_pos.saturating_sub(wrapper_start);
        let local_end = range.end_pos.saturating_sub(wrapper_start);
        let (before, rest) = split_children(children, local_start);
        let (selected, after) = split_children(rest, local_end - local_start);

        let mut replacement = Vec::with_capacity(selected.len() + 2);
        if content_len(&before) > 0 {
            replacement.push(ContentNode::styled(tag, before));
        }
        replacement.extend(selected);
        if content_len(&after) > 0 {
            replacement.push(ContentNode::styled(tag, after));
        }

        self.tree.splice(path, replacement);
        let nodes = self.tree.take_nodes();
        self.tree.set_nodes(normalize(nodes));
        debug!(%path, %tag, "removed style from part of a wrapper");
    }

    /// General case: every style inside the range is replaced by plain text
    fn flatten_range(&mut self, range: &SelectionRange) {
        let options = self.sync.options().clone();
        let nodes = self.tree.take_nodes();
        let nodes = rewrite_range(nodes, range.start_pos, range.end_pos, FLATTEN, &mut |segment| {
            let text = plain_text_with(&segment, &options);
            if text.is_empty() {
                Vec::new()
            } else {
                vec![ContentNode::Text(text)]
            }
        });
        self.tree.set_nodes(normalize(nodes));
        debug!(
            start = range.start_pos,
            end = range.end_pos,
            "flattened styles across the selection"
        );
    }

    fn delete_range(&mut self, start: usize, end: usize) {
        let nodes = self.tree.take_nodes();
        let nodes = rewrite_range(nodes, start, end, DELETE, &mut |_| Vec::new());
        self.tree.set_nodes(normalize(nodes));
    }

    /// Where inserted text goes: the start of the selection (after deleting
    /// the selected content), or the end of the document without a selection
    fn take_insertion_point(&mut self) -> usize {
        match selection::resolve(&self.tree, self.selection.as_ref(), false) {
            Some(range) => {
                if !range.is_collapsed() {
                    self.delete_range(range.start_pos, range.end_pos);
                }
                range.start_pos
            }
            None => self.tree.content_len(),
        }
    }
}

impl Default for StyleEditor {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuild `nodes` so that every inline segment inside `[start, end)` is
/// replaced by `rewrite(segment)`.
///
/// Inline nodes straddling a range edge are split and only their covered part
/// joins the segment. Block-level nodes are never handed to `rewrite`; the
/// walk descends into them instead, so a range spanning blocks produces one
/// segment per block.
fn rewrite_range<F>(
    nodes: Vec<ContentNode>,
    start: usize,
    end: usize,
    policy: RewritePolicy,
    rewrite: &mut F,
) -> Vec<ContentNode>
where
    F: FnMut(Vec<ContentNode>) -> Vec<ContentNode>,
{
    let mut out = Vec::with_capacity(nodes.len());
    let mut pending: Vec<ContentNode> = Vec::new();
    let mut pos = 0usize;

    for node in nodes {
        let len = node.content_len();
        let (node_start, node_end) = (pos, pos + len);
        pos = node_end;

        if node.is_block_level() {
            flush_segment(&mut pending, &mut out, rewrite);
            let covered = start <= node_start
                && node_end <= end
                && (len > 0 || (start < node_start && node_end < end));
            if policy.remove_covered_blocks && covered {
                continue;
            }
            if node_end > start && node_start < end {
                out.push(rewrite_inside(node, start, end, node_start, policy, rewrite));
            } else {
                out.push(node);
            }
            continue;
        }

        let holds_range = node.children().is_some()
            && len > 0
            && node_start <= start
            && end <= node_end;
        if policy.descend_wrappers && holds_range {
            flush_segment(&mut pending, &mut out, rewrite);
            out.push(rewrite_inside(node, start, end, node_start, policy, rewrite));
            continue;
        }

        if node_end <= start {
            out.push(node);
            continue;
        }
        if node_start >= end {
            flush_segment(&mut pending, &mut out, rewrite);
            out.push(node);
            continue;
        }

        let (left, rest) = node.split_at(start.saturating_sub(node_start));
        out.extend(left);
        let Some(rest) = rest else {
            continue;
        };
        let rest_start = node_start.max(start);
        let (middle, right) = rest.split_at(end - rest_start);
        pending.extend(middle);
        if let Some(right) = right {
            flush_segment(&mut pending, &mut out, rewrite);
            out.push(right);
        }
    }

    flush_segment(&mut pending, &mut out, rewrite);
    out
}

fn rewrite_inside<F>(
    mut node: ContentNode,
    start: usize,
    end: usize,
    node_start: usize,
    policy: RewritePolicy,
    rewrite: &mut F,
) -> ContentNode
where
    F: FnMut(Vec<ContentNode>) -> Vec<ContentNode>,
{
    let len = node.content_len();
    if let Some(children) = node.children_mut() {
        let inner = std::mem::take(children);
        let local_start = start.saturating_sub(node_start);
        let local_end = end.saturating_sub(node_start).min(len);
        *children = rewrite_range(inner, local_start, local_end, policy, rewrite);
    }
    node
}

fn flush_segment<F>(pending: &mut Vec<ContentNode>, out: &mut Vec<ContentNode>, rewrite: &mut F)
where
    F: FnMut(Vec<ContentNode>) -> Vec<ContentNode>,
{
    if pending.is_empty() {
        return;
    }
    let segment = std::mem::take(pending);
    if content_len(&segment) == 0 {
        out.extend(segment);
    } else {
        out.extend(rewrite(segment));
    }
}

/// Insert `pieces` at linear position `pos`.
///
/// A position strictly inside a node goes into that node, so typing inside a
/// wrapper inherits its style. On a boundary between inline siblings the
/// pieces land between them. On a block boundary, `Affinity::Backward` picks
/// the end of the earlier block and `Affinity::Forward` the start of the later.
fn insert_at(
    nodes: &mut Vec<ContentNode>,
    pos: usize,
    pieces: Vec<ContentNode>,
    affinity: Affinity,
) {
    let mut acc = 0usize;
    let last = nodes.len().saturating_sub(1);
    for i in 0..nodes.len() {
        let len = nodes[i].content_len();
        let end = acc + len;
        let block = nodes[i].is_block_level();
        let enters = pos < end
            || (block && pos == end && (affinity == Affinity::Backward || i == last));
        if !enters {
            acc = end;
            continue;
        }

        if pos == acc && !block {
            nodes.splice(i..i, pieces);
            return;
        }
        let local = pos - acc;
        if let ContentNode::Text(text) = &mut nodes[i] {
            let byte = byte_offset(text, local);
            let right = text.split_off(byte);
            let mut tail = pieces;
            tail.push(ContentNode::Text(right));
            nodes.splice(i + 1..i + 1, tail);
            return;
        }
        match nodes[i].children_mut() {
            Some(children) => insert_at(children, local, pieces, affinity),
            None => {
                nodes.splice(i..i, pieces);
            }
        }
        return;
    }
    nodes.extend(pieces);
}

/// Lines as the compiler lays them out, with their start positions
fn document_lines(nodes: &[ContentNode]) -> Vec<Line> {
    fn finish(current: &mut Line, out: &mut Vec<Line>, next_start: usize) {
        let done = std::mem::replace(current, Line::starting_at(next_start));
        out.push(done);
    }

    fn walk(nodes: &[ContentNode], pos: &mut usize, current: &mut Line, out: &mut Vec<Line>) {
        for node in nodes {
            match node {
                ContentNode::Text(text) => {
                    for ch in text.chars() {
                        if ch == '\n' {
                            finish(current, out, *pos + 1);
                        } else {
                            current.text.push(ch);
                        }
                        *pos += 1;
                    }
                }
                ContentNode::LineBreak => {
                    *pos += 1;
                    finish(current, out, *pos);
                }
                ContentNode::Styled { children, .. } => walk(children, pos, current, out),
                ContentNode::Block(children) | ContentNode::List(children) => {
                    walk(children, pos, current, out);
                    finish(current, out, *pos);
                }
                ContentNode::ListItem(children) => {
                    current.list_item = true;
                    walk(children, pos, current, out);
                    finish(current, out, *pos);
                }
            }
        }
    }

    let mut out = Vec::new();
    let mut current = Line::starting_at(0);
    let mut pos = 0usize;
    walk(nodes, &mut pos, &mut current, &mut out);
    out.push(current);
    out
}
