// Markdown Converter
// Builds a ContentTree from Markdown text. Markdown is only an input format
// here; the tree is what gets styled and compiled.

use super::structured_document::*;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// Text standing in for a thematic break
pub const RULE_TEXT: &str = "────────────";

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)[^>]*?(/?)>").expect("static pattern")
});

/// Convert markdown text to a content tree
pub fn markdown_to_tree(markdown: &str) -> ContentTree {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);

    let mut builder = TreeBuilder::new();
    for event in parser {
        match event {
            Event::Start(tag) => builder.start(tag),
            Event::End(tag_end) => builder.end(tag_end),
            Event::Text(text) => builder.append_text(&text),
            Event::Code(code) => builder.append(ContentNode::styled(
                WrapperTag::Code,
                text_to_nodes(&code),
            )),
            Event::SoftBreak | Event::HardBreak => builder.append(ContentNode::LineBreak),
            Event::Rule => {
                builder.open_block_in_item();
                builder.append(ContentNode::block(vec![ContentNode::text(RULE_TEXT)]));
            }
            Event::Html(html) | Event::InlineHtml(html) => builder.html(&html),
            Event::InlineMath(math) | Event::DisplayMath(math) => builder.append_text(&math),
            _ => {
                // Footnotes and task markers carry nothing to style
            }
        }
    }
    ContentTree::from_nodes(builder.finish())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Root,
    Block,
    List,
    Item,
    Styled(WrapperTag),
    /// Opened by an inline HTML tag; closed by its end tag or by the
    /// markdown element around it
    Html(WrapperTag),
    CodeBlock,
    HtmlBlock,
    /// Produces no node; children go to the parent
    Transparent,
}

struct Frame {
    kind: FrameKind,
    children: Vec<ContentNode>,
}

struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        TreeBuilder {
            stack: vec![Frame {
                kind: FrameKind::Root,
                children: Vec::new(),
            }],
        }
    }

    fn push(&mut self, kind: FrameKind) {
        self.stack.push(Frame {
            kind,
            children: Vec::new(),
        });
    }

    fn top(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn in_item(&self) -> bool {
        self.stack
            .last()
            .is_some_and(|frame| frame.kind == FrameKind::Item)
    }

    fn append(&mut self, node: ContentNode) {
        self.top().children.push(node);
    }

    fn append_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.top().children.extend(text_to_nodes(text));
        }
    }

    /// A second paragraph or a nested block inside a list item starts on its
    /// own line
    fn open_block_in_item(&mut self) {
        if self.in_item() && !self.top().children.is_empty() {
            self.append(ContentNode::LineBreak);
        }
    }

    fn start(&mut self, tag: Tag) {
        let kind = match tag {
            Tag::Paragraph | Tag::Heading { .. } => {
                if self.in_item() {
                    self.open_block_in_item();
                    FrameKind::Transparent
                } else {
                    FrameKind::Block
                }
            }
            Tag::CodeBlock(_) => {
                self.open_block_in_item();
                FrameKind::CodeBlock
            }
            Tag::HtmlBlock => {
                self.open_block_in_item();
                FrameKind::HtmlBlock
            }
            Tag::List(_) => {
                self.open_block_in_item();
                FrameKind::List
            }
            Tag::Item => FrameKind::Item,
            Tag::Emphasis => FrameKind::Styled(WrapperTag::Em),
            Tag::Strong => FrameKind::Styled(WrapperTag::Strong),
            _ => FrameKind::Transparent,
        };
        self.push(kind);
    }

    /// Close the frame of a markdown element, along with any HTML wrappers
    /// left open inside it
    fn end(&mut self, tag_end: TagEnd) {
        while self.stack.len() > 1 {
            let dangling = matches!(self.top().kind, FrameKind::Html(_));
            if dangling {
                trace!(?tag_end, "closing unterminated inline HTML");
            }
            self.close_top();
            if !dangling {
                break;
            }
        }
    }

    /// Inline HTML: style tags open and close wrappers, `<br>` breaks the
    /// line, everything else stays as literal text
    fn html(&mut self, fragment: &str) {
        let mut last = 0;
        for caps in HTML_TAG.captures_iter(fragment) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            self.append_text(&fragment[last..whole.start()]);
            last = whole.end();

            let closing = !caps[1].is_empty();
            let self_closing = !caps[3].is_empty();
            let name = caps[2].to_ascii_lowercase();
            match WrapperTag::from_html_name(&name) {
                Some(tag) if closing => self.close_html(tag),
                Some(tag) if !self_closing => self.push(FrameKind::Html(tag)),
                Some(_) => {}
                None if name == "br" && !closing => self.append(ContentNode::LineBreak),
                None => self.append_text(whole.as_str()),
            }
        }
        self.append_text(&fragment[last..]);
    }

    /// Close the innermost open HTML wrapper with this tag. A stray end tag
    /// is ignored.
    fn close_html(&mut self, tag: WrapperTag) {
        let open = self
            .stack
            .iter()
            .rev()
            .take_while(|frame| matches!(frame.kind, FrameKind::Html(_)))
            .position(|frame| frame.kind == FrameKind::Html(tag));
        if let Some(depth) = open {
            for _ in 0..=depth {
                self.close_top();
            }
        }
    }

    fn close_top(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let children = frame.children;
        let node = match frame.kind {
            FrameKind::Root => {
                self.stack.push(Frame {
                    kind: FrameKind::Root,
                    children,
                });
                return;
            }
            FrameKind::Transparent => {
                self.top().children.extend(children);
                return;
            }
            FrameKind::Block => ContentNode::block(children),
            FrameKind::List => ContentNode::list(children),
            FrameKind::Item => ContentNode::list_item(children),
            FrameKind::Styled(tag) | FrameKind::Html(tag) => ContentNode::styled(tag, children),
            FrameKind::CodeBlock => ContentNode::block(vec![ContentNode::styled(
                WrapperTag::Pre,
                trim_trailing_breaks(children),
            )]),
            FrameKind::HtmlBlock => ContentNode::block(trim_trailing_breaks(children)),
        };
        self.append(node);
    }

    fn finish(mut self) -> Vec<ContentNode> {
        while self.stack.len() > 1 {
            self.close_top();
        }
        let root = self.stack.pop().map(|frame| frame.children).unwrap_or_default();
        normalize(root)
    }
}

fn trim_trailing_breaks(mut nodes: Vec<ContentNode>) -> Vec<ContentNode> {
    while matches!(nodes.last(), Some(ContentNode::LineBreak)) {
        nodes.pop();
    }
    nodes
}
