//! ローマ字表記らしさの判定
//!
//! NFKD正規化後の各文字を一般カテゴリと用字で分類し、ラテン文字を主体とする
//! 記述だけをローマ字表記とみなします。
use std::sync::LazyLock;

use regex::Regex;

/// ローマ字表記の中に現れてもよい記号。
const OK_PUNCTUATION: &[char] = &[
    '-', ',', ':', '/', '"', '\'', '.', ';', '!', '‘', '’', '“', '”', '?', '…', '⁉', '？', '！',
    '⁻', 'ʔ', 'ʼ', 'ʾ', 'ʹ',
];

static CASED_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\p{Ll}\p{Lu}]$").unwrap());
static LATIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\p{Script=Latin}$").unwrap());
static GREEK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\p{Script=Greek}$").unwrap());
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\p{Nd}$").unwrap());
static OTHER_ALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{Lt}\p{Lm}\p{Mn}\p{Mc}\p{Zs}]$").unwrap());

/// ローマ字表記に現れてはならない用字と、数学用の二重線文字。
static REJECTED_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    const SCRIPTS: &[&str] = &[
        "Adlam", "Arabic", "Armenian", "Balinese", "Bengali", "Brahmi", "Braille",
        "Canadian_Aboriginal", "Chakma", "Cham", "Cherokee", "Han", "Coptic", "Cuneiform",
        "Cyrillic", "Devanagari", "Egyptian_Hieroglyphs", "Ethiopic", "Georgian", "Glagolitic",
        "Gothic", "Gujarati", "Gurmukhi", "Hangul", "Hanifi_Rohingya", "Hebrew", "Hiragana",
        "Javanese", "Kannada", "Katakana", "Kayah_Li", "Khmer", "Khudawadi", "Lao", "Lepcha",
        "Limbu", "Malayalam", "Meetei_Mayek", "Myanmar", "New_Tai_Lue", "Nko", "Ol_Chiki",
        "Old_Persian", "Old_South_Arabian", "Oriya", "Osmanya", "Phoenician", "Saurashtra",
        "Sharada", "Sinhala", "Sundanese", "Syloti_Nagri", "Tai_Tham", "Takri", "Tamil",
        "Telugu", "Thaana", "Thai", "Tibetan", "Tifinagh", "Tirhuta", "Ugaritic", "Warang_Citi",
        "Yi",
    ];
    let classes: String = SCRIPTS
        .iter()
        .map(|script| format!(r"\p{{Script={script}}}"))
        .collect();
    Regex::new(&format!("^[{classes}ℂℍℕℙℚℝℤⅅⅆⅇⅈⅉ]$")).unwrap()
});

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Ok,
    Letter,
    Digit,
    Allowed,
    Rejected,
}

/// NFKD正規化済みの記述がローマ字表記らしいかどうかを判定します。
pub(crate) fn is_romanization(normalized: &str) -> bool {
    let mut num_latin = 0;
    let mut num_greek = 0;
    let mut num_ok = 0;
    let mut num_digit = 0;
    let mut num_chars = 0;

    for (i, ch) in normalized.char_indices() {
        let s = &normalized[i..i + ch.len_utf8()];
        let class = if OK_PUNCTUATION.contains(&ch) {
            CharClass::Ok
        } else if CASED_LETTER.is_match(s) {
            if LATIN.is_match(s) {
                num_latin += 1;
                CharClass::Letter
            } else if GREEK.is_match(s) {
                num_greek += 1;
                CharClass::Letter
            } else if REJECTED_SCRIPT.is_match(s) {
                CharClass::Rejected
            } else {
                CharClass::Letter
            }
        } else if DIGIT.is_match(s) {
            CharClass::Digit
        } else if OTHER_ALLOWED.is_match(s) {
            CharClass::Allowed
        } else {
            CharClass::Rejected
        };

        match class {
            CharClass::Rejected => return false,
            CharClass::Ok => num_ok += 1,
            CharClass::Digit => num_digit += 1,
            CharClass::Letter | CharClass::Allowed => {}
        }
        num_chars += 1;
    }

    (num_latin >= num_greek + 2 || num_greek == 0) && num_ok < num_chars && num_digit < num_chars
}
