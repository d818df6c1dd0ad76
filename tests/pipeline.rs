// End-to-end tests: markdown in, styled text out, with editing in between

use unistyle::clipboard::MemoryClipboard;
use unistyle::richtext::{
    CompileOptions, StyleDimension, StyleEditor, compile, markdown_to_tree, unstyle_str,
};
use unistyle::{Config, compile_markdown};

fn example() -> String {
    std::fs::read_to_string("./tests/data/example.md").unwrap()
}

fn editor_for(md: &str) -> StyleEditor {
    StyleEditor::with_tree(markdown_to_tree(md))
}

#[test]
fn test_inline_styles() {
    let output = compile_markdown(
        "**Launch** day: *finally* shipping `v2`.",
        &CompileOptions::default(),
    );
    insta::assert_snapshot!(output.text, @"𝐋𝐚𝐮𝐧𝐜𝐡 day: 𝑓𝑖𝑛𝑎𝑙𝑙𝑦 shipping 𝚟𝟸.");
    assert_eq!(output.char_count, 32);
}

#[test]
fn test_complex_document() {
    let output = compile_markdown(&example(), &CompileOptions::default());
    insta::assert_snapshot!(output.text, @r"
    Release notes
    𝐋𝐚𝐮𝐧𝐜𝐡 day: 𝑓𝑖𝑛𝑎𝑙𝑙𝑦 shipping 𝚟𝟸.
    • faster sync
    • 𝒃𝒐𝒍𝒅 𝒊𝒕𝒂𝒍𝒊𝒄 badge

    𝒯𝒽𝒶𝓃𝓀𝓈, team!
    ");
}

#[test]
fn test_styles_reverse_to_plain_text() {
    let output = compile_markdown(&example(), &CompileOptions::default());
    assert_eq!(
        unstyle_str(&output.text),
        "Release notes\nLaunch day: finally shipping v2.\n• faster sync\n• bold italic badge\n\nThanks, team!"
    );
}

#[test]
fn test_configured_bullet() {
    let config: Config = toml::from_str("bullet = \"🔹\"").unwrap();
    let output = compile_markdown("- one\n- two", &config.compile_options());
    assert_eq!(output.text, "🔹 one\n🔹 two");
}

#[test]
fn test_mono_wins_over_bold() {
    let output = compile_markdown("`cargo` **run 2** <b><code>x</code></b>", &CompileOptions::default());
    insta::assert_snapshot!(output.text, @"𝚌𝚊𝚛𝚐𝚘 𝐫𝐮𝐧 𝟐 𝚡");
}

#[test]
fn test_style_words_in_editor() {
    let mut editor = editor_for("Hello world");
    editor.select_range(0, 5);
    editor.apply_style(StyleDimension::Bold);
    editor.select_range(6, 11);
    editor.apply_style(StyleDimension::Italic);
    insta::assert_snapshot!(editor.output().text, @"𝐇𝐞𝐥𝐥𝐨 𝑤𝑜𝑟𝑙𝑑");
}

#[test]
fn test_script_then_clear_formatting() {
    let mut editor = editor_for("Ship it today");
    editor.select_range(8, 13);
    editor.apply_style(StyleDimension::Script);
    insta::assert_snapshot!(editor.output().text, @"Ship it 𝓉ℴ𝒹𝒶𝓎");

    editor.remove_style();
    assert_eq!(editor.output().text, "Ship it today");
}

#[test]
fn test_clear_formatting_of_whole_document() {
    let mut editor = editor_for(&example());
    editor.clear_selection();
    editor.remove_style();
    assert_eq!(editor.tree().nodes().len(), 1);
    assert_eq!(
        editor.output().text,
        "Release notes\nLaunch day: finally shipping v2.\n• faster sync\n• bold italic badge\n\nThanks, team!"
    );
}

#[test]
fn test_paste_then_bold_everything() {
    let mut editor = StyleEditor::new();
    editor.paste("\u{201C}Quote\u{201D} \u{2014} done\r\nnext");
    editor.select_all();
    editor.apply_style(StyleDimension::Bold);

    insta::assert_snapshot!(editor.output().text, @r#"
    "𝐐𝐮𝐨𝐭𝐞" - 𝐝𝐨𝐧𝐞
    𝐧𝐞𝐱𝐭
    "#);
    assert_eq!(editor.output().char_count, 19);
    assert_eq!(editor.output().text, compile(editor.tree()));
}

#[test]
fn test_bulletize_and_copy() {
    let mut editor = editor_for("first\n\nsecond\n\n✅ third");
    editor.bulletize("🔸");
    assert_eq!(editor.output().text, "🔸 first\n🔸 second\n✅ third");

    let mut clipboard = MemoryClipboard::new();
    editor.copy_output(&mut clipboard).unwrap();
    assert_eq!(clipboard.contents(), Some("🔸 first\n🔸 second\n✅ third"));
}
