// Rich text: the content tree, the selection model, the editing engine and
// the compiler that turns styled content into Unicode text

pub mod markdown_converter;
pub mod output_sync;
pub mod selection;
pub mod structured_document;
pub mod structured_editor;
pub mod styled_text;
pub mod unicode_styles;

pub use markdown_converter::markdown_to_tree;
pub use output_sync::{OutputSync, StyledOutput};
pub use selection::{Affinity, Anchor, Selection, SelectionRange};
pub use structured_document::{ContentNode, ContentTree, NodePath, WrapperTag};
pub use structured_editor::{EditorOptions, StyleEditor};
pub use styled_text::{CompileOptions, compile, compile_with, plain_text};
pub use unicode_styles::{StyleDimension, StyleSet, style_str, unstyle_str};
