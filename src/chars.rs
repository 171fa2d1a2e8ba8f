//! Named code-point sets used as building blocks for every grammar.
//!
//! Each set is a list of inclusive ranges. [`CodePointSet::class_body`]
//! renders a set as the inside of a regex character class so the same
//! ranges drive both pattern construction and direct membership tests.

use std::fmt::Write as _;

/// An immutable, named set of Unicode code-point ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePointSet {
    name: &'static str,
    ranges: &'static [(char, char)],
}

impl CodePointSet {
    const fn new(name: &'static str, ranges: &'static [(char, char)]) -> Self {
        Self { name, ranges }
    }

    /// Returns the set's name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the inclusive ranges making up the set.
    #[must_use]
    pub const fn ranges(&self) -> &'static [(char, char)] {
        self.ranges
    }

    /// Returns true if `c` is a member of the set.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi)
    }

    /// Renders the set as a character-class body, e.g. `\x{0009}-\x{000d}\x{0020}`.
    ///
    /// The result carries no surrounding brackets so it can be combined with
    /// other sets inside one class.
    #[must_use]
    pub fn class_body(&self) -> String {
        let mut out = String::with_capacity(self.ranges.len() * 18);
        for &(lo, hi) in self.ranges {
            push_escaped(&mut out, lo);
            if lo != hi {
                out.push('-');
                push_escaped(&mut out, hi);
            }
        }
        out
    }
}

fn push_escaped(out: &mut String, c: char) {
    // Writing to a String cannot fail.
    let _ = write!(out, "\\x{{{:04x}}}", u32::from(c));
}

/// Unicode whitespace, including the line and paragraph separators.
pub const WHITESPACE: CodePointSet = CodePointSet::new(
    "whitespace",
    &[
        ('\u{0009}', '\u{000d}'),
        ('\u{0020}', '\u{0020}'),
        ('\u{0085}', '\u{0085}'),
        ('\u{00a0}', '\u{00a0}'),
        ('\u{1680}', '\u{1680}'),
        ('\u{180e}', '\u{180e}'),
        ('\u{2000}', '\u{200a}'),
        ('\u{2028}', '\u{2029}'),
        ('\u{202f}', '\u{202f}'),
        ('\u{205f}', '\u{205f}'),
        ('\u{3000}', '\u{3000}'),
    ],
);

/// Latin letters with diacritics and combining diacritical marks.
///
/// The multiplication and division signs (U+00D7, U+00F7) are excluded.
pub const LATIN_ACCENTS: CodePointSet = CodePointSet::new(
    "latin accents",
    &[
        ('\u{00c0}', '\u{00d6}'),
        ('\u{00d8}', '\u{00f6}'),
        ('\u{00f8}', '\u{00ff}'),
        ('\u{0100}', '\u{024f}'),
        ('\u{0253}', '\u{0254}'),
        ('\u{0256}', '\u{0257}'),
        ('\u{0259}', '\u{0259}'),
        ('\u{025b}', '\u{025b}'),
        ('\u{0263}', '\u{0263}'),
        ('\u{0268}', '\u{0268}'),
        ('\u{026f}', '\u{026f}'),
        ('\u{0272}', '\u{0272}'),
        ('\u{0289}', '\u{0289}'),
        ('\u{028b}', '\u{028b}'),
        ('\u{02bb}', '\u{02bb}'),
        ('\u{0300}', '\u{036f}'),
        ('\u{1e00}', '\u{1eff}'),
    ],
);

/// Directional overrides, byte order marks and non-characters.
pub const INVALID_CHARACTERS: CodePointSet = CodePointSet::new(
    "invalid characters",
    &[
        ('\u{202a}', '\u{202e}'),
        ('\u{feff}', '\u{feff}'),
        ('\u{fffe}', '\u{ffff}'),
    ],
);

/// Hebrew and Arabic script blocks.
pub const RTL_CHARACTERS: CodePointSet = CodePointSet::new(
    "right-to-left characters",
    &[
        ('\u{0590}', '\u{05ff}'),
        ('\u{0600}', '\u{06ff}'),
        ('\u{0750}', '\u{077f}'),
        ('\u{08a0}', '\u{08ff}'),
        ('\u{fb50}', '\u{fdff}'),
        ('\u{fe70}', '\u{feff}'),
    ],
);

/// Non-letter code points allowed inside a hashtag body.
pub const HASHTAG_SPECIAL: CodePointSet = CodePointSet::new(
    "hashtag special characters",
    &[
        ('_', '_'),
        ('\u{00b7}', '\u{00b7}'),
        ('\u{05be}', '\u{05be}'),
        ('\u{05f3}', '\u{05f4}'),
        ('\u{0f0b}', '\u{0f0c}'),
        ('\u{200c}', '\u{200d}'),
        ('\u{3003}', '\u{3003}'),
        ('\u{301c}', '\u{301c}'),
        ('\u{309b}', '\u{309c}'),
        ('\u{30a0}', '\u{30a0}'),
        ('\u{30fb}', '\u{30fb}'),
        ('\u{a67e}', '\u{a67e}'),
        ('\u{ff5e}', '\u{ff5e}'),
    ],
);

/// At signs: ASCII and fullwidth.
pub const AT_SIGNS: &str = "@\u{ff20}";

/// Hash signs: ASCII and fullwidth.
pub const HASH_SIGNS: &str = "#\u{ff03}";

/// The cashtag sign.
pub const CASH_SIGN: char = '$';

/// Text-presentation variation selector; may precede a hashtag sign.
pub const VARIATION_SELECTOR_TEXT: char = '\u{fe0e}';

/// Emoji-presentation variation selector; may precede a hashtag sign but
/// never follow one.
pub const VARIATION_SELECTOR_EMOJI: char = '\u{fe0f}';

/// Combining enclosing keycap; never follows a hashtag sign.
pub const COMBINING_KEYCAP: char = '\u{20e3}';

/// Returns true if `text` contains any directional override, BOM or non-character.
#[must_use]
pub fn has_invalid_characters(text: &str) -> bool {
    text.chars().any(|c| INVALID_CHARACTERS.contains(c))
}

/// Returns true if `text` contains any Hebrew or Arabic code point.
#[must_use]
pub fn contains_rtl(text: &str) -> bool {
    text.chars().any(|c| RTL_CHARACTERS.contains(c))
}

/// Returns true if `c` is one of [`AT_SIGNS`].
#[must_use]
pub fn is_at_sign(c: char) -> bool {
    AT_SIGNS.contains(c)
}

/// Returns true if `c` is one of [`HASH_SIGNS`].
#[must_use]
pub fn is_hash_sign(c: char) -> bool {
    HASH_SIGNS.contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_membership() {
        assert!(WHITESPACE.contains(' '));
        assert!(WHITESPACE.contains('\n'));
        assert!(WHITESPACE.contains('\u{3000}'));
        assert!(!WHITESPACE.contains('a'));
        assert!(!WHITESPACE.contains('\u{200b}'));
    }

    #[test]
    fn latin_accents_skip_math_signs() {
        assert!(LATIN_ACCENTS.contains('é'));
        assert!(LATIN_ACCENTS.contains('ß'));
        assert!(!LATIN_ACCENTS.contains('×'));
        assert!(!LATIN_ACCENTS.contains('÷'));
    }

    #[test]
    fn class_body_renders_ranges() {
        assert_eq!(
            INVALID_CHARACTERS.class_body(),
            "\\x{202a}-\\x{202e}\\x{feff}\\x{fffe}-\\x{ffff}"
        );
    }

    #[test]
    fn class_body_compiles_into_regex() {
        let re = regex::Regex::new(&format!("^[{}]+$", WHITESPACE.class_body())).unwrap();
        assert!(re.is_match(" \t\u{00a0}\u{2028}"));
        assert!(!re.is_match(" x "));
    }

    #[test]
    fn detects_invalid_characters() {
        assert!(has_invalid_characters("abc\u{202e}def"));
        assert!(has_invalid_characters("\u{feff}"));
        assert!(!has_invalid_characters("plain text"));
    }

    #[test]
    fn detects_rtl() {
        assert!(contains_rtl("hello שלום"));
        assert!(contains_rtl("مرحبا"));
        assert!(!contains_rtl("hello"));
    }

    #[test]
    fn sign_predicates() {
        assert!(is_at_sign('@'));
        assert!(is_at_sign('＠'));
        assert!(!is_at_sign('#'));
        assert!(is_hash_sign('＃'));
        assert!(!is_hash_sign('$'));
    }
}
