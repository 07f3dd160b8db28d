//! デコード結果

use crate::common::{ERROR_PREFIX, EXPONENTIAL_TAG, UNKNOWN_TAG};

/// デコード結果。
///
/// タグ集合の列と話題の列からなります。各タグ集合は重複がなく辞書順に整列され、
/// タグ集合の列自体も重複がなく辞書順に整列されています。話題も同様です。
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DecodeResult {
    tag_sets: Vec<Vec<String>>,
    topics: Vec<String>,
}

impl DecodeResult {
    /// タグ集合と話題から結果を作成します。
    ///
    /// 入力は整列され、重複が取り除かれます。
    pub fn new(tag_sets: Vec<Vec<String>>, topics: Vec<String>) -> Self {
        let mut tag_sets: Vec<Vec<String>> = tag_sets
            .into_iter()
            .map(|mut tags| {
                tags.sort_unstable();
                tags.dedup();
                tags
            })
            .collect();
        tag_sets.sort_unstable();
        tag_sets.dedup();
        let mut topics = topics;
        topics.sort_unstable();
        topics.dedup();
        Self { tag_sets, topics }
    }

    pub(crate) fn from_sorted(tag_sets: Vec<Vec<String>>, topics: Vec<String>) -> Self {
        debug_assert!(tag_sets.windows(2).all(|w| w[0] < w[1]));
        Self { tag_sets, topics }
    }

    /// タグ集合が爆発的に増えた場合の結果。
    pub fn exponential() -> Self {
        Self {
            tag_sets: vec![vec![EXPONENTIAL_TAG.to_string(), UNKNOWN_TAG.to_string()]],
            topics: vec![],
        }
    }

    /// タグ集合の列
    #[inline(always)]
    pub fn tag_sets(&self) -> &[Vec<String>] {
        &self.tag_sets
    }

    /// 話題の列
    #[inline(always)]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// タグ集合と話題に分解します。
    pub fn into_parts(self) -> (Vec<Vec<String>>, Vec<String>) {
        (self.tag_sets, self.topics)
    }

    /// タグ集合が1つもないかどうか。
    ///
    /// 空文字列や接続詞だけの入力のデコード結果は空のタグ集合を1つ持つため、
    /// これには該当しません。
    pub fn is_empty(&self) -> bool {
        self.tag_sets.is_empty()
    }

    fn errors(&self) -> impl Iterator<Item = &String> {
        self.tag_sets
            .iter()
            .flatten()
            .chain(&self.topics)
            .filter(|s| s.starts_with(ERROR_PREFIX))
    }

    /// `error-`で始まるタグまたは話題を含むかどうか。
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// `error-`で始まるタグと話題の総数
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes() {
        let result = DecodeResult::new(
            vec![
                vec!["rare".to_string(), "archaic".to_string(), "rare".to_string()],
                vec!["archaic".to_string(), "rare".to_string()],
                vec![],
            ],
            vec!["biology".to_string(), "anatomy".to_string(), "biology".to_string()],
        );
        assert_eq!(
            &[vec![], vec!["archaic".to_string(), "rare".to_string()]],
            result.tag_sets()
        );
        assert_eq!(&["anatomy".to_string(), "biology".to_string()], result.topics());
        assert!(!result.has_errors());
    }

    #[test]
    fn test_error_count() {
        let result = DecodeResult::exponential();
        assert!(result.has_errors());
        assert_eq!(2, result.error_count());
        assert!(!DecodeResult::default().has_errors());
        assert!(DecodeResult::default().is_empty());
    }
}
