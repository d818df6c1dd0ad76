// Styled Text Compiler
// Flattens a ContentTree into plain text where every style is carried by the
// code points themselves

use super::structured_document::{ContentNode, ContentTree};
use super::unicode_styles::{StyleSet, style_str};
use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_BULLET: &str = "•";

/// Longest run of newlines kept in the output (three blank lines)
pub const MAX_NEWLINE_RUN: usize = 4;

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{5,}").expect("static pattern"));

/// Knobs for the compiler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Glyph written in front of every non-empty list item
    pub bullet: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            bullet: DEFAULT_BULLET.to_string(),
        }
    }
}

/// Compile a tree with the default options
pub fn compile(tree: &ContentTree) -> String {
    compile_with(tree, &CompileOptions::default())
}

pub fn compile_with(tree: &ContentTree, options: &CompileOptions) -> String {
    let walker = Walker {
        options,
        apply_styles: true,
    };
    let mut out = String::new();
    walker.walk(tree.nodes(), StyleSet::plain(), &mut out);
    post_process(&out)
}

/// The structural plain-text walk: the compiler's traversal with styling
/// switched off and no post-processing
pub fn plain_text(nodes: &[ContentNode]) -> String {
    plain_text_with(nodes, &CompileOptions::default())
}

pub fn plain_text_with(nodes: &[ContentNode], options: &CompileOptions) -> String {
    let walker = Walker {
        options,
        apply_styles: false,
    };
    let mut out = String::new();
    walker.walk(nodes, StyleSet::plain(), &mut out);
    out
}

struct Walker<'a> {
    options: &'a CompileOptions,
    apply_styles: bool,
}

impl Walker<'_> {
    fn walk(&self, nodes: &[ContentNode], style: StyleSet, out: &mut String) {
        for node in nodes {
            self.walk_node(node, style, out);
        }
    }

    fn walk_node(&self, node: &ContentNode, style: StyleSet, out: &mut String) {
        match node {
            ContentNode::Text(text) => {
                if self.apply_styles {
                    out.push_str(&style_str(text, style));
                } else {
                    out.push_str(text);
                }
            }
            ContentNode::LineBreak => out.push('\n'),
            ContentNode::Block(children) | ContentNode::List(children) => {
                self.walk(children, style, out);
                out.push('\n');
            }
            ContentNode::ListItem(children) => {
                let mut item = String::new();
                self.walk(children, style, &mut item);
                let item = item.trim();
                if !item.is_empty() {
                    out.push_str(&self.options.bullet);
                    out.push(' ');
                    out.push_str(item);
                    out.push('\n');
                }
            }
            ContentNode::Styled { tag, children } => {
                self.walk(children, style.with(tag.dimension()), out);
            }
        }
    }
}

/// Whole-string cleanup: non-breaking spaces become spaces, long newline runs
/// are capped, and trailing whitespace at the very end is removed
fn post_process(raw: &str) -> String {
    let spaced = raw.replace('\u{00A0}', " ");
    let capped = EXCESS_NEWLINES.replace_all(&spaced, "\n".repeat(MAX_NEWLINE_RUN));
    capped.trim_end().to_string()
}
