// Unicode Styles
// Maps ASCII letters and digits onto the Mathematical Alphanumeric Symbols block
// so that styling survives in plain text

use std::fmt;
use std::str::FromStr;

/// A single style dimension that a wrapper can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleDimension {
    Bold,
    Italic,
    Mono,
    Script,
}

impl StyleDimension {
    pub const ALL: [StyleDimension; 4] = [
        StyleDimension::Bold,
        StyleDimension::Italic,
        StyleDimension::Mono,
        StyleDimension::Script,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StyleDimension::Bold => "bold",
            StyleDimension::Italic => "italic",
            StyleDimension::Mono => "mono",
            StyleDimension::Script => "script",
        }
    }
}

impl fmt::Display for StyleDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown style {0:?} (expected bold, italic, mono or script)")]
pub struct ParseStyleError(String);

impl FromStr for StyleDimension {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bold" | "b" => Ok(StyleDimension::Bold),
            "italic" | "i" => Ok(StyleDimension::Italic),
            "mono" | "monospace" | "code" => Ok(StyleDimension::Mono),
            "script" | "cursive" => Ok(StyleDimension::Script),
            _ => Err(ParseStyleError(s.to_string())),
        }
    }
}

/// The set of style dimensions active at a point in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleSet {
    pub bold: bool,
    pub italic: bool,
    pub mono: bool,
    pub script: bool,
}

impl StyleSet {
    pub fn plain() -> Self {
        Self::default()
    }

    /// This set with one more dimension switched on
    pub fn with(self, dimension: StyleDimension) -> Self {
        let mut next = self;
        match dimension {
            StyleDimension::Bold => next.bold = true,
            StyleDimension::Italic => next.italic = true,
            StyleDimension::Mono => next.mono = true,
            StyleDimension::Script => next.script = true,
        }
        next
    }

    /// Resolve the flags to the one alphabet used for output.
    ///
    /// Precedence: mono > script > bold+italic > bold > italic > plain.
    pub fn alphabet(self) -> Alphabet {
        if self.mono {
            Alphabet::Monospace
        } else if self.script {
            Alphabet::Script
        } else if self.bold && self.italic {
            Alphabet::BoldItalic
        } else if self.bold {
            Alphabet::Bold
        } else if self.italic {
            Alphabet::Italic
        } else {
            Alphabet::Plain
        }
    }
}

impl From<StyleDimension> for StyleSet {
    fn from(dimension: StyleDimension) -> Self {
        StyleSet::plain().with(dimension)
    }
}

/// Output alphabets, exactly one of which applies to any character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
    Plain,
    Italic,
    Bold,
    BoldItalic,
    Script,
    Monospace,
}

const BOLD_UPPER: u32 = 0x1D400;
const BOLD_LOWER: u32 = 0x1D41A;
const BOLD_DIGIT: u32 = 0x1D7CE;
const ITALIC_UPPER: u32 = 0x1D434;
const ITALIC_LOWER: u32 = 0x1D44E;
const BOLD_ITALIC_UPPER: u32 = 0x1D468;
const BOLD_ITALIC_LOWER: u32 = 0x1D482;
const MONO_UPPER: u32 = 0x1D670;
const MONO_LOWER: u32 = 0x1D68A;
const MONO_DIGIT: u32 = 0x1D7F6;

/// Mathematical script capitals A-Z. The block has holes for letters that were
/// already encoded as letterlike symbols, so this cannot be an offset.
pub const SCRIPT_UPPER: [char; 26] = [
    '\u{1D49C}', // A
    '\u{212C}',  // B
    '\u{1D49E}', // C
    '\u{1D49F}', // D
    '\u{2130}',  // E
    '\u{2131}',  // F
    '\u{1D4A2}', // G
    '\u{210B}',  // H
    '\u{2110}',  // I
    '\u{1D4A5}', // J
    '\u{1D4A6}', // K
    '\u{2112}',  // L
    '\u{2133}',  // M
    '\u{1D4A9}', // N
    '\u{1D4AA}', // O
    '\u{1D4AB}', // P
    '\u{1D4AC}', // Q
    '\u{211B}',  // R
    '\u{1D4AE}', // S
    '\u{1D4AF}', // T
    '\u{1D4B0}', // U
    '\u{1D4B1}', // V
    '\u{1D4B2}', // W
    '\u{1D4B3}', // X
    '\u{1D4B4}', // Y
    '\u{1D4B5}', // Z
];

/// Mathematical script small a-z
pub const SCRIPT_LOWER: [char; 26] = [
    '\u{1D4B6}', // a
    '\u{1D4B7}', // b
    '\u{1D4B8}', // c
    '\u{1D4B9}', // d
    '\u{212F}',  // e
    '\u{1D4BB}', // f
    '\u{210A}',  // g
    '\u{1D4BD}', // h
    '\u{1D4BE}', // i
    '\u{1D4BF}', // j
    '\u{1D4C0}', // k
    '\u{1D4C1}', // l
    '\u{1D4C2}', // m
    '\u{1D4C3}', // n
    '\u{2134}',  // o
    '\u{1D4C5}', // p
    '\u{1D4C6}', // q
    '\u{1D4C7}', // r
    '\u{1D4C8}', // s
    '\u{1D4C9}', // t
    '\u{1D4CA}', // u
    '\u{1D4CB}', // v
    '\u{1D4CC}', // w
    '\u{1D4CD}', // x
    '\u{1D4CE}', // y
    '\u{1D4CF}', // z
];

/// Alphabets whose letters sit at a fixed offset: (alphabet, upper base, lower base, digit base)
const OFFSET_ALPHABETS: [(Alphabet, u32, u32, Option<u32>); 4] = [
    (Alphabet::Bold, BOLD_UPPER, BOLD_LOWER, Some(BOLD_DIGIT)),
    (Alphabet::Italic, ITALIC_UPPER, ITALIC_LOWER, None),
    (Alphabet::BoldItalic, BOLD_ITALIC_UPPER, BOLD_ITALIC_LOWER, None),
    (Alphabet::Monospace, MONO_UPPER, MONO_LOWER, Some(MONO_DIGIT)),
];

impl Alphabet {
    /// Map a single scalar value into this alphabet; unmappable input passes through
    pub fn map(self, ch: char) -> char {
        match self {
            Alphabet::Plain => ch,
            Alphabet::Script => match ch {
                'A'..='Z' => SCRIPT_UPPER[(ch as u32 - 'A' as u32) as usize],
                'a'..='z' => SCRIPT_LOWER[(ch as u32 - 'a' as u32) as usize],
                _ => ch,
            },
            _ => {
                let Some((_, upper, lower, digit)) =
                    OFFSET_ALPHABETS.iter().find(|(a, ..)| *a == self).copied()
                else {
                    return ch;
                };
                let target = match ch {
                    'A'..='Z' => Some(upper + (ch as u32 - 'A' as u32)),
                    'a'..='z' => Some(lower + (ch as u32 - 'a' as u32)),
                    '0'..='9' => digit.map(|base| base + (ch as u32 - '0' as u32)),
                    _ => None,
                };
                target.and_then(char::from_u32).unwrap_or(ch)
            }
        }
    }
}

/// Map `ch` through the alphabet selected by `style`
pub fn map_char(ch: char, style: StyleSet) -> char {
    style.alphabet().map(ch)
}

/// Map every scalar value of `text`
pub fn style_str(text: &str, style: StyleSet) -> String {
    let alphabet = style.alphabet();
    text.chars().map(|ch| alphabet.map(ch)).collect()
}

/// Inverse of [`map_char`]: recover the ASCII letter or digit behind a styled code point
pub fn plain_char(ch: char) -> char {
    let cp = ch as u32;
    for (_, upper, lower, digit) in OFFSET_ALPHABETS {
        if (upper..upper + 26).contains(&cp) {
            return char::from(b'A' + (cp - upper) as u8);
        }
        if (lower..lower + 26).contains(&cp) {
            return char::from(b'a' + (cp - lower) as u8);
        }
        if let Some(base) = digit
            && (base..base + 10).contains(&cp)
        {
            return char::from(b'0' + (cp - base) as u8);
        }
    }
    if let Some(idx) = SCRIPT_UPPER.iter().position(|&c| c == ch) {
        return char::from(b'A' + idx as u8);
    }
    if let Some(idx) = SCRIPT_LOWER.iter().position(|&c| c == ch) {
        return char::from(b'a' + idx as u8);
    }
    ch
}

/// Strip code-point styling from a whole string
pub fn unstyle_str(text: &str) -> String {
    text.chars().map(plain_char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_sets() -> Vec<StyleSet> {
        (0u8..16)
            .map(|bits| StyleSet {
                bold: bits & 1 != 0,
                italic: bits & 2 != 0,
                mono: bits & 4 != 0,
                script: bits & 8 != 0,
            })
            .collect()
    }

    fn alnum() -> impl Iterator<Item = char> {
        ('A'..='Z').chain('a'..='z').chain('0'..='9')
    }

    #[test]
    fn test_bold_mapping() {
        let bold = StyleSet::from(StyleDimension::Bold);
        assert_eq!(map_char('A', bold), '\u{1D400}');
        assert_eq!(map_char('z', bold), '\u{1D433}');
        assert_eq!(map_char('7', bold), '\u{1D7D5}');
        assert_eq!(style_str("Hi", bold), "𝐇𝐢");
    }

    #[test]
    fn test_italic_has_no_digits() {
        let italic = StyleSet::from(StyleDimension::Italic);
        assert_eq!(map_char('a', italic), '\u{1D44E}');
        assert_eq!(map_char('3', italic), '3');
    }

    #[test]
    fn test_bold_italic_letters_only() {
        let style = StyleSet::plain()
            .with(StyleDimension::Bold)
            .with(StyleDimension::Italic);
        assert_eq!(style.alphabet(), Alphabet::BoldItalic);
        assert_eq!(map_char('A', style), '\u{1D468}');
        assert_eq!(map_char('b', style), '\u{1D483}');
        assert_eq!(map_char('1', style), '1');
    }

    #[test]
    fn test_mono_mapping() {
        let mono = StyleSet::from(StyleDimension::Mono);
        assert_eq!(map_char('A', mono), '\u{1D670}');
        assert_eq!(map_char('a', mono), '\u{1D68A}');
        assert_eq!(map_char('0', mono), '\u{1D7F6}');
        assert_eq!(map_char('9', mono), '\u{1D7FF}');
    }

    #[test]
    fn test_script_uses_letterlike_exceptions() {
        let script = StyleSet::from(StyleDimension::Script);
        assert_eq!(style_str("BEFHILMR", script), "ℬℰℱℋℐℒℳℛ");
        assert_eq!(style_str("ego", script), "ℯℊℴ");
        assert_eq!(map_char('A', script), '\u{1D49C}');
        assert_eq!(map_char('z', script), '\u{1D4CF}');
        assert_eq!(map_char('5', script), '5');
    }

    #[test]
    fn test_script_table_is_injective() {
        let mut all: Vec<char> = SCRIPT_UPPER.iter().chain(SCRIPT_LOWER.iter()).copied().collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 52);
        for ch in all {
            assert!(!ch.is_ascii());
        }
    }

    #[test]
    fn test_mono_wins_over_everything() {
        for set in all_sets().into_iter().filter(|s| s.mono) {
            assert_eq!(set.alphabet(), Alphabet::Monospace);
            assert_eq!(map_char('q', set), '\u{1D69A}');
        }
        let style = StyleSet {
            bold: true,
            mono: true,
            ..StyleSet::default()
        };
        assert_eq!(map_char('A', style), '\u{1D670}');
    }

    #[test]
    fn test_script_wins_over_bold_and_italic() {
        let style = StyleSet {
            bold: true,
            italic: true,
            script: true,
            mono: false,
        };
        assert_eq!(style.alphabet(), Alphabet::Script);
    }

    #[test]
    fn test_round_trip_for_every_style() {
        for set in all_sets() {
            for ch in alnum() {
                let styled = map_char(ch, set);
                assert_eq!(plain_char(styled), ch, "{ch:?} under {set:?}");
            }
        }
    }

    #[test]
    fn test_non_alnum_are_fixed_points() {
        let others = (0u8..128)
            .map(char::from)
            .filter(|c| !c.is_ascii_alphanumeric())
            .chain(['é', 'ß', 'Ω', '•', '😀', '\u{00A0}', 'ℯ']);
        for set in all_sets() {
            for ch in others.clone() {
                assert_eq!(map_char(ch, set), ch);
            }
        }
    }

    #[test]
    fn test_unstyle_str() {
        let mixed = format!(
            "{} {}!",
            style_str("Hello", StyleSet::from(StyleDimension::Bold)),
            style_str("World 42", StyleSet::from(StyleDimension::Mono))
        );
        assert_eq!(unstyle_str(&mixed), "Hello World 42!");
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!("Bold".parse::<StyleDimension>(), Ok(StyleDimension::Bold));
        assert_eq!("code".parse::<StyleDimension>(), Ok(StyleDimension::Mono));
        assert!("underline".parse::<StyleDimension>().is_err());
    }
}
