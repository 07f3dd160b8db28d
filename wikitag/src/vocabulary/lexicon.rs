//! 記述分類器が参照する単語リスト
//!
//! 英単語、英語ではない単語、英語の文中に現れてもよい記号や単語、
//! 既知の学名と学名の先頭語を保持します。

use std::collections::HashSet;

use rkyv::{Archive, Deserialize, Serialize};

use crate::utils::table_lines;

/// 分類器用の単語リスト
#[derive(Default, Debug, Archive, Serialize, Deserialize)]
pub struct Lexicon {
    english: HashSet<String>,
    not_english: HashSet<String>,
    potentially_english: HashSet<String>,
    known_species: HashSet<String>,
    known_firsts: HashSet<String>,
}

fn collect_lines(text: &str) -> HashSet<String> {
    table_lines(text).map(str::to_string).collect()
}

impl Lexicon {
    /// 1行1語のテキストから単語リストを作成します。
    ///
    /// # 引数
    ///
    /// * `english` - 英単語
    /// * `not_english` - 英単語に見えても英語として扱わない語
    /// * `potentially_english` - 英語の文中に現れても英語判定を妨げない語
    /// * `known_species` - 完全な学名
    /// * `known_firsts` - 学名の先頭語（属名など）
    pub fn from_texts(
        english: &str,
        not_english: &str,
        potentially_english: &str,
        known_species: &str,
        known_firsts: &str,
    ) -> Self {
        Self {
            english: collect_lines(english),
            not_english: collect_lines(not_english),
            potentially_english: collect_lines(potentially_english),
            known_species: collect_lines(known_species),
            known_firsts: collect_lines(known_firsts),
        }
    }

    #[inline(always)]
    pub fn is_english(&self, word: &str) -> bool {
        self.english.contains(word)
    }

    #[inline(always)]
    pub fn is_not_english(&self, word: &str) -> bool {
        self.not_english.contains(word)
    }

    #[inline(always)]
    pub fn is_potentially_english(&self, word: &str) -> bool {
        self.potentially_english.contains(word)
    }

    #[inline(always)]
    pub fn is_known_species(&self, name: &str) -> bool {
        self.known_species.contains(name)
    }

    #[inline(always)]
    pub fn is_known_first(&self, word: &str) -> bool {
        self.known_firsts.contains(word)
    }

    /// 英単語の数
    pub fn num_english_words(&self) -> usize {
        self.english.len()
    }
}
