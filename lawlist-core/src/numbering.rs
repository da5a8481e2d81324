//! Numbering systems.
//!
//! Every system turns an ordinal into the text that replaces the placeholder of
//! a pattern. Algorithmic systems (decimal, roman, alphabetic) are unbounded or
//! have a documented range; fixed symbol tables are bounded. Whenever an
//! ordinal falls outside what a system can express (ordinal `0`, roman numbers
//! above [`ROMAN_MAX`], exhausted tables) the ordinal is rendered in decimal.

use std::fmt;

use serde::Serialize;

/// Largest ordinal rendered with roman numerals, larger ones fall back to decimal.
pub const ROMAN_MAX: u64 = 3999;

const CIRCLED_DIGITS: [&str; 50] = [
    "①", "②", "③", "④", "⑤", "⑥", "⑦", "⑧", "⑨", "⑩", "⑪", "⑫", "⑬", "⑭", "⑮", "⑯", "⑰",
    "⑱", "⑲", "⑳", "㉑", "㉒", "㉓", "㉔", "㉕", "㉖", "㉗", "㉘", "㉙", "㉚", "㉛", "㉜", "㉝", "㉞",
    "㉟", "㊱", "㊲", "㊳", "㊴", "㊵", "㊶", "㊷", "㊸", "㊹", "㊺", "㊻", "㊼", "㊽", "㊾", "㊿",
];

const HIRAGANA: [&str; 46] = [
    "あ", "い", "う", "え", "お", "か", "き", "く", "け", "こ", "さ", "し", "す", "せ", "そ", "た",
    "ち", "つ", "て", "と", "な", "に", "ぬ", "ね", "の", "は", "ひ", "ふ", "へ", "ほ", "ま", "み",
    "む", "め", "も", "や", "ゆ", "よ", "ら", "り", "る", "れ", "ろ", "わ", "を", "ん",
];

const KATAKANA: [&str; 46] = [
    "ア", "イ", "ウ", "エ", "オ", "カ", "キ", "ク", "ケ", "コ", "サ", "シ", "ス", "セ", "ソ", "タ",
    "チ", "ツ", "テ", "ト", "ナ", "ニ", "ヌ", "ネ", "ノ", "ハ", "ヒ", "フ", "ヘ", "ホ", "マ", "ミ",
    "ム", "メ", "モ", "ヤ", "ユ", "ヨ", "ラ", "リ", "ル", "レ", "ロ", "ワ", "ヲ", "ン",
];

const HEAVENLY_STEMS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

const CJK_NUMERALS: [&str; 10] = ["一", "二", "三", "四", "五", "六", "七", "八", "九", "十"];

/// A bounded, non-algorithmic sequence of glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum SymbolTable {
    /// `①` to `㊿`.
    CircledDigits,
    /// Hiragana in gojūon order, `あ` to `ん`.
    Hiragana,
    /// Katakana in gojūon order, `ア` to `ン`.
    Katakana,
    /// The ten heavenly stems `甲乙丙丁…`, common in Chinese legal texts.
    HeavenlyStems,
    /// CJK numerals `一` to `十`.
    CjkNumerals,
}

impl SymbolTable {
    /// Every table, in catalog order.
    pub const ALL: [SymbolTable; 5] = [
        SymbolTable::CircledDigits,
        SymbolTable::Hiragana,
        SymbolTable::Katakana,
        SymbolTable::HeavenlyStems,
        SymbolTable::CjkNumerals,
    ];

    /// The glyphs of this table, index 0 holds ordinal 1.
    #[must_use]
    pub fn symbols(self) -> &'static [&'static str] {
        match self {
            Self::CircledDigits => &CIRCLED_DIGITS,
            Self::Hiragana => &HIRAGANA,
            Self::Katakana => &KATAKANA,
            Self::HeavenlyStems => &HEAVENLY_STEMS,
            Self::CjkNumerals => &CJK_NUMERALS,
        }
    }

    /// Stable, kebab-case name of the table.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CircledDigits => "circled-digits",
            Self::Hiragana => "hiragana",
            Self::Katakana => "katakana",
            Self::HeavenlyStems => "heavenly-stems",
            Self::CjkNumerals => "cjk-numerals",
        }
    }

    /// Look up the glyph for `ordinal`, `None` once the table is exhausted.
    #[must_use]
    pub fn lookup(self, ordinal: u64) -> Option<&'static str> {
        let index = usize::try_from(ordinal.checked_sub(1)?).ok()?;
        self.symbols().get(index).copied()
    }
}

/// How an ordinal is spelled out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NumberingSystem {
    /// `1, 2, 3, …`
    Decimal,
    /// `I, II, III, …` up to [`ROMAN_MAX`].
    UpperRoman,
    /// `i, ii, iii, …` up to [`ROMAN_MAX`].
    LowerRoman,
    /// Bijective base 26: `A … Z, AA, AB, …`
    UpperAlpha,
    /// Bijective base 26: `a … z, aa, ab, …`
    LowerAlpha,
    /// The upper alphabetic value written twice: `AA, BB, … ZZ, AAAA, ABAB, …`
    DoubleUpperAlpha,
    /// The lower alphabetic value written twice: `aa, bb, … zz, aaaa, abab, …`
    DoubleLowerAlpha,
    /// A fixed symbol table.
    Table(SymbolTable),
    /// Always the same literal, whatever the ordinal.
    Literal(String),
}

impl NumberingSystem {
    /// Spell out `ordinal` in this system.
    ///
    /// Never fails: anything the system cannot express is rendered in decimal.
    #[must_use]
    pub fn render(&self, ordinal: u64) -> String {
        let rendered = match self {
            Self::Decimal => None,
            Self::UpperRoman => roman_in_range(ordinal).then(|| to_upper_roman(ordinal)),
            Self::LowerRoman => {
                roman_in_range(ordinal).then(|| to_upper_roman(ordinal).to_lowercase())
            }
            Self::UpperAlpha => (ordinal > 0).then(|| to_upper_alpha(ordinal)),
            Self::LowerAlpha => (ordinal > 0).then(|| to_upper_alpha(ordinal).to_lowercase()),
            // The alphabetic value repeated as a whole string, not letter by letter:
            // 28 is "ABAB", never "AABB".
            Self::DoubleUpperAlpha => (ordinal > 0).then(|| to_upper_alpha(ordinal).repeat(2)),
            Self::DoubleLowerAlpha => {
                (ordinal > 0).then(|| to_upper_alpha(ordinal).to_lowercase().repeat(2))
            }
            Self::Table(table) => table.lookup(ordinal).map(String::from),
            Self::Literal(literal) => Some(literal.clone()),
        };
        rendered.unwrap_or_else(|| ordinal.to_string())
    }

    /// The glyphs of a fixed symbol table system.
    #[must_use]
    pub fn symbols(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Table(table) => Some(table.symbols()),
            Self::Decimal
            | Self::UpperRoman
            | Self::LowerRoman
            | Self::UpperAlpha
            | Self::LowerAlpha
            | Self::DoubleUpperAlpha
            | Self::DoubleLowerAlpha
            | Self::Literal(_) => None,
        }
    }

    /// Whether this is a cyclic literal, rendering the same text for every ordinal.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl fmt::Display for NumberingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal => write!(f, "decimal"),
            Self::UpperRoman => write!(f, "upper-roman"),
            Self::LowerRoman => write!(f, "lower-roman"),
            Self::UpperAlpha => write!(f, "upper-alpha"),
            Self::LowerAlpha => write!(f, "lower-alpha"),
            Self::DoubleUpperAlpha => write!(f, "double-upper-alpha"),
            Self::DoubleLowerAlpha => write!(f, "double-lower-alpha"),
            Self::Table(table) => write!(f, "table({})", table.name()),
            Self::Literal(literal) => write!(f, "literal({literal:?})"),
        }
    }
}

fn roman_in_range(ordinal: u64) -> bool {
    (1..=ROMAN_MAX).contains(&ordinal)
}

/// Convert a number to uppercase Roman numerals using subtractive notation.
///
/// Returns an empty string for `0`. Callers bound the input, the greedy loop
/// emits one `M` per thousand.
#[must_use]
pub fn to_upper_roman(mut n: u64) -> String {
    const TABLE: &[(u64, &str)] = &[
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut result = String::new();
    for &(value, numeral) in TABLE {
        while n >= value {
            result.push_str(numeral);
            n -= value;
        }
    }
    result
}

/// Convert a number to bijective base-26 letters (`1` is `A`, `27` is `AA`).
///
/// Returns an empty string for `0`.
#[must_use]
pub fn to_upper_alpha(mut n: u64) -> String {
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        let digit = u8::try_from(n % 26).unwrap_or_default();
        letters.push(char::from(b'A' + digit));
        n /= 26;
    }
    letters.iter().rev().collect()
}
