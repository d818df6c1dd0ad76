// Output Sync
// Recompiles the tree after every mutation and hands the result to whoever
// is watching (the output pane, a character counter, ...)

use super::structured_document::ContentTree;
use super::styled_text::{CompileOptions, compile_with};
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

/// The published result of a compile
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledOutput {
    pub text: String,
    /// Unicode scalar values, the unit platforms count against their limits
    pub char_count: usize,
    /// User-perceived characters (an emoji with a variation selector is one)
    pub grapheme_count: usize,
}

impl StyledOutput {
    pub fn from_text(text: String) -> Self {
        let char_count = text.chars().count();
        let grapheme_count = text.graphemes(true).count();
        StyledOutput {
            text,
            char_count,
            grapheme_count,
        }
    }
}

type Subscriber = Box<dyn FnMut(&StyledOutput)>;

/// Holds the latest output and republishes it synchronously on demand
pub struct OutputSync {
    options: CompileOptions,
    latest: StyledOutput,
    subscribers: Vec<Subscriber>,
}

impl OutputSync {
    pub fn new(options: CompileOptions) -> Self {
        OutputSync {
            options,
            latest: StyledOutput::default(),
            subscribers: Vec::new(),
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Register a callback run after every publish
    pub fn subscribe(&mut self, subscriber: impl FnMut(&StyledOutput) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Compile `tree`, store the result and notify every subscriber before returning
    pub fn publish(&mut self, tree: &ContentTree) -> &StyledOutput {
        self.latest = StyledOutput::from_text(compile_with(tree, &self.options));
        trace!(
            chars = self.latest.char_count,
            subscribers = self.subscribers.len(),
            "publishing styled output"
        );
        for subscriber in &mut self.subscribers {
            subscriber(&self.latest);
        }
        &self.latest
    }

    pub fn latest(&self) -> &StyledOutput {
        &self.latest
    }
}

impl Default for OutputSync {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::structured_document::ContentNode;
    use crate::richtext::unicode_styles::StyleDimension;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_counts_scalars_and_graphemes() {
        let out = StyledOutput::from_text("𝐇𝐢 ✔️".to_string());
        assert_eq!(out.char_count, 5);
        assert_eq!(out.grapheme_count, 4);
    }

    #[test]
    fn test_publish_notifies_subscribers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut sync = OutputSync::default();
        let sink = Rc::clone(&seen);
        sync.subscribe(move |out| sink.borrow_mut().push(out.text.clone()));

        let tree = ContentTree::from_nodes(vec![ContentNode::wrap(
            StyleDimension::Bold,
            vec![ContentNode::text("Hi")],
        )]);
        let published = sync.publish(&tree).clone();

        assert_eq!(published.text, "𝐇𝐢");
        assert_eq!(published.char_count, 2);
        assert_eq!(sync.latest(), &published);
        assert_eq!(*seen.borrow(), vec!["𝐇𝐢".to_string()]);
    }
}
