// Structured Document Model
// The formatted-content tree the editor mutates and the compiler reads.
// Positions are measured in content units: one per character of text, one per
// line break, zero for container boundaries.

use super::unicode_styles::StyleDimension;
use std::fmt;

/// Host representation of a style wrapper.
///
/// Several tags can stand for the same dimension (`b` and `strong` are both
/// bold); the compiler only ever looks at [`WrapperTag::dimension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperTag {
    B,
    Strong,
    I,
    Em,
    Code,
    Tt,
    Pre,
    Samp,
    Script,
}

impl WrapperTag {
    pub fn dimension(self) -> StyleDimension {
        match self {
            WrapperTag::B | WrapperTag::Strong => StyleDimension::Bold,
            WrapperTag::I | WrapperTag::Em => StyleDimension::Italic,
            WrapperTag::Code | WrapperTag::Tt | WrapperTag::Pre | WrapperTag::Samp => {
                StyleDimension::Mono
            }
            WrapperTag::Script => StyleDimension::Script,
        }
    }

    /// Tag used when the editor creates a wrapper for `dimension`
    pub fn for_dimension(dimension: StyleDimension) -> Self {
        match dimension {
            StyleDimension::Bold => WrapperTag::B,
            StyleDimension::Italic => WrapperTag::I,
            StyleDimension::Mono => WrapperTag::Code,
            StyleDimension::Script => WrapperTag::Script,
        }
    }

    /// Recognize an HTML element name (case-insensitive)
    pub fn from_html_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "b" => Some(WrapperTag::B),
            "strong" => Some(WrapperTag::Strong),
            "i" => Some(WrapperTag::I),
            "em" => Some(WrapperTag::Em),
            "code" => Some(WrapperTag::Code),
            "tt" => Some(WrapperTag::Tt),
            "pre" => Some(WrapperTag::Pre),
            "samp" => Some(WrapperTag::Samp),
            "script-font" => Some(WrapperTag::Script),
            _ => None,
        }
    }

    /// Tag name as written in HTML input
    pub fn html_name(self) -> &'static str {
        match self {
            WrapperTag::B => "b",
            WrapperTag::Strong => "strong",
            WrapperTag::I => "i",
            WrapperTag::Em => "em",
            WrapperTag::Code => "code",
            WrapperTag::Tt => "tt",
            WrapperTag::Pre => "pre",
            WrapperTag::Samp => "samp",
            WrapperTag::Script => "script-font",
        }
    }
}

impl fmt::Display for WrapperTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.html_name())
    }
}

/// A node of the formatted-content tree
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    Text(String),
    LineBreak,
    Block(Vec<ContentNode>),
    Styled {
        tag: WrapperTag,
        children: Vec<ContentNode>,
    },
    List(Vec<ContentNode>),
    ListItem(Vec<ContentNode>),
}

impl ContentNode {
    pub fn text(text: impl Into<String>) -> Self {
        ContentNode::Text(text.into())
    }

    pub fn block(children: Vec<ContentNode>) -> Self {
        ContentNode::Block(children)
    }

    pub fn styled(tag: WrapperTag, children: Vec<ContentNode>) -> Self {
        ContentNode::Styled { tag, children }
    }

    /// Wrapper for `dimension` using the editor's own tag
    pub fn wrap(dimension: StyleDimension, children: Vec<ContentNode>) -> Self {
        Self::styled(WrapperTag::for_dimension(dimension), children)
    }

    pub fn list(items: Vec<ContentNode>) -> Self {
        ContentNode::List(items)
    }

    pub fn list_item(children: Vec<ContentNode>) -> Self {
        ContentNode::ListItem(children)
    }

    pub fn children(&self) -> Option<&[ContentNode]> {
        match self {
            ContentNode::Text(_) | ContentNode::LineBreak => None,
            ContentNode::Block(children)
            | ContentNode::List(children)
            | ContentNode::ListItem(children)
            | ContentNode::Styled { children, .. } => Some(children),
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<ContentNode>> {
        match self {
            ContentNode::Text(_) | ContentNode::LineBreak => None,
            ContentNode::Block(children)
            | ContentNode::List(children)
            | ContentNode::ListItem(children)
            | ContentNode::Styled { children, .. } => Some(children),
        }
    }

    /// Same kind of container (same tag) holding `children`.
    /// Leaves are returned unchanged.
    pub fn with_children(&self, children: Vec<ContentNode>) -> ContentNode {
        match self {
            ContentNode::Text(_) | ContentNode::LineBreak => self.clone(),
            ContentNode::Block(_) => ContentNode::Block(children),
            ContentNode::List(_) => ContentNode::List(children),
            ContentNode::ListItem(_) => ContentNode::ListItem(children),
            ContentNode::Styled { tag, .. } => ContentNode::Styled {
                tag: *tag,
                children,
            },
        }
    }

    /// Blocks, lists and list items; these are never placed inside a style wrapper
    pub fn is_block_level(&self) -> bool {
        matches!(
            self,
            ContentNode::Block(_) | ContentNode::List(_) | ContentNode::ListItem(_)
        )
    }

    pub fn style_dimension(&self) -> Option<StyleDimension> {
        match self {
            ContentNode::Styled { tag, .. } => Some(tag.dimension()),
            _ => None,
        }
    }

    /// Length in content units
    pub fn content_len(&self) -> usize {
        match self {
            ContentNode::Text(text) => text.chars().count(),
            ContentNode::LineBreak => 1,
            _ => content_len(self.children().unwrap_or_default()),
        }
    }

    /// Split this node at a content offset.
    ///
    /// Containers are cloned on both sides of the cut. A side that would hold
    /// no content is `None`, except that splitting at either end hands back the
    /// untouched node on the other side.
    pub fn split_at(self, offset: usize) -> (Option<ContentNode>, Option<ContentNode>) {
        let len = self.content_len();
        if offset == 0 {
            return (None, Some(self));
        }
        if offset >= len {
            return (Some(self), None);
        }
        match self {
            ContentNode::Text(text) => {
                let byte = byte_offset(&text, offset);
                let (left, right) = text.split_at(byte);
                (
                    Some(ContentNode::Text(left.to_string())),
                    Some(ContentNode::Text(right.to_string())),
                )
            }
            ContentNode::LineBreak => (Some(ContentNode::LineBreak), None),
            mut container => {
                let children = container
                    .children_mut()
                    .map(std::mem::take)
                    .unwrap_or_default();
                let (left, right) = split_children(children, offset);
                (
                    Some(container.with_children(left)),
                    Some(container.with_children(right)),
                )
            }
        }
    }
}

/// Total content length of a run of siblings
pub fn content_len(nodes: &[ContentNode]) -> usize {
    nodes.iter().map(ContentNode::content_len).sum()
}

/// Byte index of the `chars`-th scalar value (or the end of the string)
pub fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Split a run of siblings at a content offset into (before, after).
/// Zero-length nodes sitting exactly on the cut stay on the left.
pub fn split_children(
    nodes: Vec<ContentNode>,
    offset: usize,
) -> (Vec<ContentNode>, Vec<ContentNode>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut pos = 0usize;

    for node in nodes {
        let len = node.content_len();
        if pos + len <= offset {
            left.push(node);
        } else if pos >= offset {
            right.push(node);
        } else {
            let (l, r) = node.split_at(offset - pos);
            left.extend(l);
            right.extend(r);
        }
        pos += len;
    }

    (left, right)
}

/// Convert literal text into text runs separated by line breaks
pub fn text_to_nodes(text: &str) -> Vec<ContentNode> {
    let mut nodes = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            nodes.push(ContentNode::LineBreak);
        }
        if !line.is_empty() {
            nodes.push(ContentNode::text(line));
        }
    }
    nodes
}

/// Tidy a run of siblings after an edit: empty text runs and emptied style
/// wrappers are removed, and adjacent text runs are merged.
/// Empty blocks and list items are kept since they still mean a line.
pub fn normalize(nodes: Vec<ContentNode>) -> Vec<ContentNode> {
    let mut out: Vec<ContentNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let node = match node {
            ContentNode::Text(text) if text.is_empty() => continue,
            ContentNode::Text(text) => {
                if let Some(ContentNode::Text(prev)) = out.last_mut() {
                    prev.push_str(&text);
                    continue;
                }
                ContentNode::Text(text)
            }
            ContentNode::LineBreak => ContentNode::LineBreak,
            ContentNode::Styled { tag, children } => {
                let children = normalize(children);
                if children.is_empty() {
                    continue;
                }
                ContentNode::Styled { tag, children }
            }
            ContentNode::Block(children) => ContentNode::Block(normalize(children)),
            ContentNode::List(children) => ContentNode::List(normalize(children)),
            ContentNode::ListItem(children) => ContentNode::ListItem(normalize(children)),
        };
        out.push(node);
    }
    out
}

/// Address of a node: child indices starting at the root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        NodePath(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        NodePath(indices)
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        NodePath(indices)
    }

    pub fn parent(&self) -> Option<NodePath> {
        let (_, rest) = self.0.split_last()?;
        Some(NodePath(rest.to_vec()))
    }

    pub fn last_index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// This path cut down to its first `depth` indices
    pub fn truncated(&self, depth: usize) -> NodePath {
        NodePath(self.0[..depth.min(self.0.len())].to_vec())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("/"))
    }
}

/// The whole document: the children of the editing surface.
/// The root is not a block and contributes no output of its own.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentTree {
    nodes: Vec<ContentNode>,
}

impl ContentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<ContentNode>) -> Self {
        ContentTree { nodes }
    }

    pub fn nodes(&self) -> &[ContentNode] {
        &self.nodes
    }

    /// Move the nodes out, leaving an empty tree
    pub fn take_nodes(&mut self) -> Vec<ContentNode> {
        std::mem::take(&mut self.nodes)
    }

    pub fn set_nodes(&mut self, nodes: Vec<ContentNode>) {
        self.nodes = nodes;
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn content_len(&self) -> usize {
        content_len(&self.nodes)
    }

    /// The node at `path`; the root path addresses no node
    pub fn node_at(&self, path: &NodePath) -> Option<&ContentNode> {
        let (&first, rest) = path.indices().split_first()?;
        let mut node = self.nodes.get(first)?;
        for &idx in rest {
            node = node.children()?.get(idx)?;
        }
        Some(node)
    }

    /// Children of the node at `path` (the top-level nodes for the root)
    pub fn children_at(&self, path: &NodePath) -> Option<&[ContentNode]> {
        if path.is_root() {
            return Some(&self.nodes);
        }
        self.node_at(path)?.children()
    }

    fn children_at_mut(&mut self, path: &NodePath) -> Option<&mut Vec<ContentNode>> {
        let mut children = &mut self.nodes;
        for &idx in path.indices() {
            children = children.get_mut(idx)?.children_mut()?;
        }
        Some(children)
    }

    /// Linear position where the node at `path` starts
    pub fn start_of(&self, path: &NodePath) -> Option<usize> {
        let mut pos = 0usize;
        let mut siblings: &[ContentNode] = &self.nodes;
        for &idx in path.indices() {
            let node = siblings.get(idx)?;
            pos += content_len(&siblings[..idx]);
            siblings = node.children().unwrap_or_default();
        }
        Some(pos)
    }

    /// Replace the node at `path` with any number of nodes, in place.
    /// Returns false when the path does not address a node.
    pub fn splice(&mut self, path: &NodePath, replacement: Vec<ContentNode>) -> bool {
        let (Some(parent), Some(idx)) = (path.parent(), path.last_index()) else {
            return false;
        };
        match self.children_at_mut(&parent) {
            Some(children) if idx < children.len() => {
                children.splice(idx..=idx, replacement);
                true
            }
            _ => false,
        }
    }

    /// Paths of all text runs in document order, with their start positions
    pub fn text_runs(&self) -> Vec<(NodePath, usize, usize)> {
        fn walk(
            nodes: &[ContentNode],
            path: &NodePath,
            pos: &mut usize,
            out: &mut Vec<(NodePath, usize, usize)>,
        ) {
            for (i, node) in nodes.iter().enumerate() {
                match node {
                    ContentNode::Text(text) => {
                        let len = text.chars().count();
                        out.push((path.child(i), *pos, len));
                        *pos += len;
                    }
                    ContentNode::LineBreak => *pos += 1,
                    _ => walk(node.children().unwrap_or_default(), &path.child(i), pos, out),
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, &NodePath::root(), &mut 0, &mut out);
        out
    }
}

impl From<Vec<ContentNode>> for ContentTree {
    fn from(nodes: Vec<ContentNode>) -> Self {
        ContentTree::from_nodes(nodes)
    }
}
