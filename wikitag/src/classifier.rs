//! 記述の分類器
//!
//! 自由記述の句が、タグの列、英語の説明、ローマ字表記、学名、その他のいずれであるかを
//! 語彙と単語リストに基づくヒューリスティックで判定します。判定は常に成功します。
pub(crate) mod english;
pub(crate) mod script;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::common::UNKNOWN_TAG;
use crate::decoder::DecodeOptions;
use crate::decoder::worker::Worker;
use crate::errors::WikitagError;
use crate::vocabulary::lexicon::Lexicon;

static HYBRID_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^×([A-Z])").unwrap());
static HYBRID_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*×.*").unwrap());

/// 学名の2語目以降に現れてもよい大文字の語。
const TAXONOMIC_EXCEPTIONS: &[&str] = &["A", "B", "C", "D", "E", "F", "I", "II", "III", "IV", "V"];

/// 記述の分類
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// タグと話題の列
    Tags,
    /// 英語の説明
    English,
    /// ローマ字表記や発音表記
    Romanization,
    /// 生物の学名
    Taxonomic,
    /// 上記以外
    Other,
}

impl Category {
    /// 分類の名前
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::English => "english",
            Self::Romanization => "romanization",
            Self::Taxonomic => "taxonomic",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = WikitagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tags" => Ok(Self::Tags),
            "english" => Ok(Self::English),
            "romanization" => Ok(Self::Romanization),
            "taxonomic" => Ok(Self::Taxonomic),
            "other" => Ok(Self::Other),
            _ => Err(WikitagError::invalid_argument(
                "s",
                format!("unknown category: {s}"),
            )),
        }
    }
}

/// 分類のオプション。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClassifyOptions {
    /// 開始語の例外で残った生のテキストだけからなるタグ集合もタグとして扱います。
    pub allow_unknown_tags: bool,
    /// 未知スパンの開始語による例外を無効にします。
    pub no_unknown_starts: bool,
}

impl ClassifyOptions {
    /// すべてのオプションが無効な設定を作成します。
    pub const fn new() -> Self {
        Self {
            allow_unknown_tags: false,
            no_unknown_starts: false,
        }
    }

    /// 生のテキストだけからなるタグ集合をタグとして扱うかどうかを設定します。
    pub const fn allow_unknown_tags(mut self, yes: bool) -> Self {
        self.allow_unknown_tags = yes;
        self
    }

    /// 未知スパンの開始語による例外を無効にするかどうかを設定します。
    pub const fn no_unknown_starts(mut self, yes: bool) -> Self {
        self.no_unknown_starts = yes;
        self
    }

    #[inline(always)]
    pub(crate) const fn slot(self) -> usize {
        (self.allow_unknown_tags as usize) | ((self.no_unknown_starts as usize) << 1)
    }
}

/// 記述を分類します。
///
/// タグ判定には、ワーカーのキャッシュ付きデコードを使用します。
pub(crate) fn classify(worker: &mut Worker, desc: &str, options: ClassifyOptions) -> Category {
    let desc = desc.trim();
    if desc.is_empty() {
        return Category::Other;
    }
    let normalized: String = desc.nfkd().collect();

    let decoded = worker.decode_tags(
        desc,
        DecodeOptions::new().no_unknown_starts(options.no_unknown_starts),
    );
    let is_tags = decoded.tag_sets().iter().any(|set| {
        !set.iter().any(|t| t == UNKNOWN_TAG)
            && (!decoded.topics().is_empty()
                || options.allow_unknown_tags
                || set.iter().any(|t| !t.contains(' ')))
    });
    if is_tags {
        return Category::Tags;
    }

    let lexicon = worker.decoder().vocabulary().lexicon();
    if is_taxonomic(lexicon, desc) {
        return Category::Taxonomic;
    }
    if let Some(category) = english::check(lexicon, desc, &normalized) {
        return category;
    }
    if desc.starts_with('/') && desc.ends_with('/') {
        return Category::Romanization;
    }
    if script::is_romanization(&normalized) {
        return Category::Romanization;
    }
    Category::Other
}

/// 記述が生物の学名らしいかどうかを判定します。
fn is_taxonomic(lexicon: &Lexicon, desc: &str) -> bool {
    if lexicon.is_known_species(desc) {
        return true;
    }
    let desc = HYBRID_PREFIX.replace(desc, "$1");
    let desc = HYBRID_SUFFIX.replace(&desc, "");
    let words: Vec<&str> = desc.split_whitespace().collect();
    if !(2..=5).contains(&words.len()) || !lexicon.is_known_first(words[0]) {
        return false;
    }
    let mut non_english = usize::from(!lexicon.is_english(&words[0].to_lowercase()));
    for word in &words[1..] {
        if TAXONOMIC_EXCEPTIONS.contains(word) {
            continue;
        }
        if word.chars().next().is_some_and(char::is_uppercase) {
            return false;
        }
        if !lexicon.is_english(word) {
            non_english += 1;
        }
    }
    non_english >= words.len() - 1 && non_english > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_lexicon() -> Lexicon {
        Lexicon::from_texts(
            "lynx\nrun\n",
            "",
            "",
            "Homo sapiens\nLynx lynx\n",
            "Lynx\nEudyptes\nMonetaria\nHomo\n",
        )
    }

    #[test]
    fn test_taxonomic() {
        let lexicon = test_lexicon();
        assert!(is_taxonomic(&lexicon, "Homo sapiens"));
        assert!(is_taxonomic(&lexicon, "Lynx lynx"));
        assert!(is_taxonomic(&lexicon, "Eudyptes unknowniensis"));
        assert!(is_taxonomic(&lexicon, "×Eudyptes unknowniensis × moseleyi"));
        assert!(is_taxonomic(&lexicon, "Eudyptes unknowniensis II"));
        assert!(!is_taxonomic(&lexicon, "Monetaria Unknowniensis"));
        assert!(!is_taxonomic(&lexicon, "Eudyptes"));
        assert!(is_taxonomic(&lexicon, "Eudyptes run"));
        assert!(!is_taxonomic(&lexicon, "Lynx run"));
        assert!(!is_taxonomic(&lexicon, "Felis catus"));
    }

    #[test]
    fn test_category_names() {
        for category in [
            Category::Tags,
            Category::English,
            Category::Romanization,
            Category::Taxonomic,
            Category::Other,
        ] {
            assert_eq!(category, category.to_string().parse().unwrap());
        }
        assert!("tag".parse::<Category>().is_err());
    }

    #[test]
    fn test_options_slot() {
        assert_eq!(0, ClassifyOptions::default().slot());
        assert_eq!(1, ClassifyOptions::new().allow_unknown_tags(true).slot());
        assert_eq!(2, ClassifyOptions::new().no_unknown_starts(true).slot());
    }
}
