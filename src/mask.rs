//! Text masking transforms.
//!
//! Each transform replaces characters with [`MASK_GLYPH`]. Lengths are
//! counted in `char`s, so multi-byte text keeps its visible length.
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::Error;

/// The character used to obscure text.
pub const MASK_GLYPH: char = '*';

/// How the text of a matched element is obscured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum MaskingKind {
    /// Keep the last four characters, if there are at least five.
    ShowLastFour,
    /// Keep the middle, masking a prefix and suffix of equal width.
    ShowMiddle,
    /// Keep the first character of each word.
    ShowWordStart,
    /// Mask everything.
    ShowNone,
}

impl MaskingKind {
    /// All kinds, in declaration order.
    pub const ALL: [MaskingKind; 4] = [
        MaskingKind::ShowLastFour,
        MaskingKind::ShowMiddle,
        MaskingKind::ShowWordStart,
        MaskingKind::ShowNone,
    ];

    /// The name used in configuration, e.g. `show-last-four`.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskingKind::ShowLastFour => "show-last-four",
            MaskingKind::ShowMiddle => "show-middle",
            MaskingKind::ShowWordStart => "show-word-start",
            MaskingKind::ShowNone => "show-none",
        }
    }

    /// Apply this transform to `text`.
    ///
    /// ```rust
    /// use xmlmask::MaskingKind;
    ///
    /// assert_eq!(MaskingKind::ShowLastFour.apply("11000179512199001"), "*************9001");
    /// assert_eq!(MaskingKind::ShowWordStart.apply("John  Doe"), "J*** D**");
    /// ```
    pub fn apply(&self, text: &str) -> String {
        match self {
            MaskingKind::ShowLastFour => show_last_four(text),
            MaskingKind::ShowMiddle => show_middle(text),
            MaskingKind::ShowWordStart => show_word_start(text),
            MaskingKind::ShowNone => show_none(text),
        }
    }
}

impl Display for MaskingKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaskingKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaskingKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownMaskingKind(s.to_string()))
    }
}

fn glyphs(count: usize) -> impl Iterator<Item = char> {
    std::iter::repeat(MASK_GLYPH).take(count)
}

/// Replace every character with the mask glyph.
pub fn show_none(text: &str) -> String {
    glyphs(text.chars().count()).collect()
}

/// Mask all but the last four characters. Texts shorter than five
/// characters are masked completely.
pub fn show_last_four(text: &str) -> String {
    let len = text.chars().count();
    if len < 5 {
        return show_none(text);
    }
    glyphs(len - 4).chain(text.chars().skip(len - 4)).collect()
}

/// Mask a prefix and a suffix of `len / 4 + 1` characters each, keeping the
/// middle. Four character texts keep their middle two.
pub fn show_middle(text: &str) -> String {
    let len = text.chars().count();
    if len < 2 {
        return show_none(text);
    }
    let width = if len == 4 { 1 } else { len / 4 + 1 };
    glyphs(width)
        .chain(text.chars().skip(width).take(len - 2 * width))
        .chain(glyphs(width))
        .collect()
}

/// Keep the first character of every whitespace separated word and mask the
/// rest. Words are re-joined with single spaces.
pub fn show_word_start(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first);
            out.extend(glyphs(chars.count()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case(" ", "*")]
    #[case("  ", "**")]
    #[case("123", "***")]
    #[case("1234", "****")]
    #[case("12345", "*2345")]
    #[case("123456", "**3456")]
    #[case("Adam Shannon", "********nnon")]
    #[case("ßüöä€x", "**öä€x")]
    fn last_four(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(show_last_four(input), expected);
    }

    #[rstest]
    #[case("", "")]
    #[case(" ", "*")]
    #[case("  ", "**")]
    #[case("123", "*2*")]
    #[case("1234", "*23*")]
    #[case("12345", "**3**")]
    #[case("123456", "**34**")]
    #[case("Jane Doe", "***e ***")]
    #[case("Adam Shannon", "**** Sha****")]
    fn middle(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(show_middle(input), expected);
    }

    #[rstest]
    #[case("", "")]
    #[case(" ", "")]
    #[case("  ", "")]
    #[case("123", "1**")]
    #[case("1 2 3", "1 2 3")]
    #[case("12 34 56", "1* 3* 5*")]
    #[case("123 456", "1** 4**")]
    #[case("Adam Shannon", "A*** S******")]
    #[case("  123 Any\tSt\n", "1** A** S*")]
    fn word_start(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(show_word_start(input), expected);
    }

    #[rstest]
    #[case("", "")]
    #[case(" ", "*")]
    #[case("1 2 3", "*****")]
    #[case("Adam Shannon", "************")]
    #[case("é", "*")]
    fn none(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(show_none(input), expected);
    }

    #[test]
    fn parse_kind() {
        for kind in MaskingKind::ALL {
            assert_eq!(kind.as_str().parse::<MaskingKind>().unwrap(), kind);
        }
        assert_eq!(
            "SHOW-NONE".parse::<MaskingKind>().unwrap(),
            MaskingKind::ShowNone
        );
        let err = "show-first".parse::<MaskingKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownMaskingKind(name) if name == "show-first"));
    }

    #[test]
    fn display_kind() {
        assert_eq!(MaskingKind::ShowWordStart.to_string(), "show-word-start");
    }
}
