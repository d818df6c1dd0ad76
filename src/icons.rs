// Icon palette, separators and line bullets

use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_SEPARATOR: &str = "\n────────────\n";

/// Icons offered for insertion at the cursor, grouped for display
pub const ICON_GROUPS: &[(&str, &[&str])] = &[
    (
        "Checks & Crosses",
        &[
            "✅", "☑️", "✔️", "🟩", "🟩✔️", "🟩✅", "❌", "✖️", "❎", "🟥", "🟥❌", "🟥✖️", "🟢",
            "🔴", "🟡",
        ],
    ),
    (
        "Priority & Attention",
        &["⚠️", "🚨", "🔥", "⚡", "❗", "❓", "‼️", "⁉️", "🔺", "🔻", "🛑"],
    ),
    (
        "Action & Work",
        &[
            "🛠️", "🔧", "⚙️", "📌", "🎯", "🚀", "📍", "🔁", "➡️", "↗️", "↘️", "🔄",
        ],
    ),
    (
        "Ideas & Thinking",
        &["💡", "🧠", "📐", "📏", "🧩", "🔍", "🧪", "🧭"],
    ),
    (
        "Documents & Data",
        &["📝", "📄", "📚", "📑", "🧾", "📊", "📈", "📉", "🔎", "📋"],
    ),
    (
        "Communication & People",
        &["👥", "🤝", "🙋", "💬", "📣", "📞", "✉️", "🔔", "🗣️"],
    ),
    (
        "Time & Process",
        &["⏱️", "⌛", "🕒", "🗓️", "🔂", "🔁", "✅", "➡️"],
    ),
    (
        "Bullets & Separators",
        &[
            "•", "◦", "▪️", "▫️", "🔹", "🔸", "➜", "→", "—", "–", "│", "┃", "⋯",
        ],
    ),
];

static EXISTING_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(•|✅|🔹|🔸|▪️|▫️|-|→|➜)\s+").expect("static pattern")
});

/// Whether a line should get a bullet: it has content and is not bulleted yet
pub fn needs_bullet(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !EXISTING_BULLET.is_match(trimmed)
}

/// Prefix every non-blank line of `text` with `"{prefix} "`.
/// Blank lines and lines that already start with a bullet are left alone.
pub fn bulletize_lines(text: &str, prefix: &str) -> String {
    text.split('\n')
        .map(|line| {
            if needs_bullet(line) {
                format!("{prefix} {line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
