// Plain-text paste cleanup

use regex::Regex;
use std::sync::LazyLock;

static LINE_ENDINGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n?").expect("static pattern"));

/// Normalize pasted text before it is inserted: every line ending becomes
/// `\n`, typographic quotes become ASCII quotes and em/en dashes become `-`
pub fn sanitize_paste(text: &str) -> String {
    LINE_ENDINGS
        .replace_all(text, "\n")
        .chars()
        .map(|ch| match ch {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .collect()
}
