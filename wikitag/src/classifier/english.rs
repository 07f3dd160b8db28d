//! 英語らしさの判定
//!
//! 記述をトークンに分割し、英単語リストと接尾辞の規則でトークンを認識します。
use std::sync::LazyLock;

use regex::Regex;

use crate::classifier::Category;
use crate::vocabulary::lexicon::Lexicon;

static ENGLISH_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ -~―—“”…'‘’ʹ€]+$").unwrap());

static TIME_FIXUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(a\.m\.|p\.m\.)").unwrap());

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        [^\W\d_](?:[^\W\d_]|['\-_])+[^\W\d_]   # words with apostrophes or dashes
        | [+\-]?\d+[,/.:\-]\d+[+\-]?           # numbers, fractions, times
        | [\w_]+                               # plain words
        | \.(?:\s*\.)+                         # ellipsis
        | \S",
    )
    .unwrap()
});

/// 英語らしい記述かどうかを判定します。
///
/// 判定できた場合は分類を返し、後続の判定に委ねる場合は`None`を返します。
pub(crate) fn check(lexicon: &Lexicon, desc: &str, normalized: &str) -> Option<Category> {
    if !ENGLISH_CHARS.is_match(normalized) || desc.chars().count() <= 1 {
        return None;
    }
    if lexicon.is_english(desc) && desc.chars().next().is_some_and(char::is_alphabetic) {
        return Some(Category::English);
    }

    let fixed = TIME_FIXUP.replace_all(desc, |caps: &regex::Captures| {
        if &caps[1] == "a.m." { "AM" } else { "PM" }
    });
    let tokens: Vec<&str> = TOKEN.find_iter(&fixed).map(|m| m.as_str()).collect();
    if tokens.is_empty() {
        return Some(Category::Other);
    }

    let recognized: Vec<bool> = tokens.iter().map(|t| is_recognized(lexicon, t)).collect();
    let n = tokens.len();
    let cnt = recognized.iter().filter(|&&r| r).count();
    let pairs = || tokens.iter().zip(&recognized);

    let has_word = pairs().any(|(t, &r)| {
        r && t.chars().next().is_some_and(char::is_alphabetic) && t.chars().count() > 1
    });
    if !has_word
        || desc.starts_with('-')
        || desc.ends_with('-')
        || !desc.chars().any(|c| c.is_alphanumeric() || c == '_')
    {
        return None;
    }

    let is_english = cnt == n
        || (pairs().any(|(t, &r)| r && t.chars().count() > 3) && cnt + 1 >= n)
        || cnt * 5 >= n * 4
        || (pairs()
            .filter(|&(_, &r)| !r)
            .all(|(t, _)| lexicon.is_potentially_english(t))
            && cnt * 2 >= n);
    is_english.then_some(Category::English)
}

/// トークンが英単語として認識できるかどうか。
fn is_recognized(lexicon: &Lexicon, token: &str) -> bool {
    if lexicon.is_not_english(token) {
        return false;
    }
    lexicon.is_english(token)
        || lexicon.is_english(&token.to_lowercase())
        || lexicon.is_known_first(token)
        || token.chars().next().is_some_and(char::is_numeric)
        || is_inflected(lexicon, token)
        || is_compound(lexicon, token)
}

/// 複数形、活用形、所有格、英米綴りの違いのいずれかで英単語になるかどうか。
fn is_inflected(lexicon: &Lexicon, token: &str) -> bool {
    let len = token.chars().count();
    let with = |stem: &str, suffix: &str| lexicon.is_english(&format!("{stem}{suffix}"));

    if len >= 4 && token.strip_suffix('s').is_some_and(|s| lexicon.is_english(s)) {
        return true;
    }
    if len >= 5 && token.strip_suffix("ies").is_some_and(|s| with(s, "y")) {
        return true;
    }
    if len >= 5
        && token
            .strip_suffix("ing")
            .is_some_and(|s| lexicon.is_english(s) || with(s, "e"))
    {
        return true;
    }
    if len >= 5
        && token
            .strip_suffix("ed")
            .is_some_and(|s| lexicon.is_english(s) || with(s, "e"))
    {
        return true;
    }
    if ["'s", "s'"]
        .iter()
        .any(|suffix| token.strip_suffix(suffix).is_some_and(|s| lexicon.is_english(s)))
    {
        return true;
    }
    [("ise", "ize", 5), ("ised", "ized", 6), ("ising", "izing", 7)]
        .iter()
        .any(|&(british, american, min_len)| {
            len >= min_len
                && token
                    .strip_suffix(british)
                    .is_some_and(|s| with(s, american))
        })
}

/// `-`または`/`で区切られた各部分が英単語（または空）かどうか。
fn is_compound(lexicon: &Lexicon, token: &str) -> bool {
    token.contains(['-', '/'])
        && token
            .split(['-', '/'])
            .all(|part| part.is_empty() || (part.chars().count() > 2 && lexicon.is_english(part)))
}
