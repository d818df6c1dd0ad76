// Library exports for unistyle

pub mod clipboard;
pub mod config;
pub mod error;
pub mod icons;
pub mod paste;
pub mod richtext;

pub use config::Config;
pub use error::{Error, Result};

use richtext::{CompileOptions, StyledOutput, compile_with, markdown_to_tree};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Parse markdown and compile it straight to styled output
pub fn compile_markdown(markdown: &str, options: &CompileOptions) -> StyledOutput {
    let tree = markdown_to_tree(markdown);
    StyledOutput::from_text(compile_with(&tree, options))
}

/// Read a whole file, or standard input when no path is given
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(Error::Stdin)?;
            Ok(input)
        }
    }
}
