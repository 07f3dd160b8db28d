//! デコード処理のためのルーチンを提供するモジュール。
//!
//! ワーカーは格子とキャッシュを保持し、再利用することで不要なメモリアロケーションと
//! 同じ入力の再計算を避けます。
use hashbrown::HashMap;

use crate::classifier::{self, Category, ClassifyOptions};
use crate::decoder::assembler;
use crate::decoder::lattice::PathLattice;
use crate::decoder::{DecodeOptions, Decoder};
use crate::result::DecodeResult;

/// オプションの組ごとのキャッシュ。
struct Memo<V> {
    slots: [HashMap<Box<str>, V>; 4],
    capacity: Option<usize>,
}

impl<V: Clone> Memo<V> {
    fn new(capacity: Option<usize>) -> Self {
        Self {
            slots: Default::default(),
            capacity,
        }
    }

    fn get(&self, slot: usize, key: &str) -> Option<V> {
        self.slots[slot].get(key).cloned()
    }

    fn insert(&mut self, slot: usize, key: &str, value: V) {
        let map = &mut self.slots[slot];
        match self.capacity {
            Some(0) => return,
            Some(capacity) if map.len() >= capacity => map.clear(),
            _ => {}
        }
        map.insert(key.into(), value);
    }

    fn len(&self) -> usize {
        self.slots.iter().map(HashMap::len).sum()
    }

    fn clear(&mut self) {
        self.slots.iter_mut().for_each(HashMap::clear);
    }
}

/// デコードと分類を行うワーカー。
///
/// [`Decoder::new_worker`] で作成します。ワーカーはスレッド間で共有できません。
pub struct Worker {
    pub(crate) decoder: Decoder,
    pub(crate) lattice: PathLattice,
    tag_cache: Memo<DecodeResult>,
    category_cache: Memo<Category>,
}

impl Worker {
    pub(crate) fn new(decoder: Decoder) -> Self {
        let capacity = decoder.capacity();
        Self {
            decoder,
            lattice: PathLattice::default(),
            tag_cache: Memo::new(capacity),
            category_cache: Memo::new(capacity),
        }
    }

    /// ワーカーが使用するデコーダー
    #[inline(always)]
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// 修飾句をタグ集合と話題にデコードします。
    ///
    /// 結果にエラータグが含まれ、句に`/`が含まれる場合は、登録済みキーの外側にある`/`を
    /// 空白に置き換えて再試行し、エラータグの数が増えなければ再試行の結果を採用します。
    /// 結果はオプションの組ごとにキャッシュされます。
    ///
    /// # 引数
    ///
    /// * `text` - デコードする句
    /// * `options` - デコードのオプション
    ///
    /// # 例
    ///
    /// ```
    /// use wikitag::{DecodeOptions, Decoder, Vocabulary};
    ///
    /// let mut worker = Decoder::new(Vocabulary::bundled()?).new_worker();
    ///
    /// let result = worker.decode_tags("archaic/obsolete", DecodeOptions::default());
    /// assert_eq!(result.tag_sets(), &[vec!["archaic".to_string(), "obsolete".to_string()]]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn decode_tags(&mut self, text: &str, options: DecodeOptions) -> DecodeResult {
        let slot = options.slot();
        if let Some(result) = self.tag_cache.get(slot, text) {
            return result;
        }

        let mut result = self.decode_tags_once(text, options);
        if result.has_errors() && text.contains('/') {
            let rewritten = self.decoder.vocabulary().rewrite_slashes(text);
            let retry = self.decode_tags_once(&rewritten, options);
            log::debug!(
                "[wikitag] retried {text:?} as {rewritten:?}: {} -> {} errors",
                result.error_count(),
                retry.error_count(),
            );
            if retry.error_count() <= result.error_count() {
                result = retry;
            }
        }

        self.tag_cache.insert(slot, text, result.clone());
        result
    }

    /// 再試行とキャッシュなしで、修飾句を1回だけデコードします。
    pub fn decode_tags_once(&mut self, text: &str, options: DecodeOptions) -> DecodeResult {
        self.decoder.build_lattice(text, options, &mut self.lattice);
        let trie = self.decoder.vocabulary().trie();
        match self.lattice.best_path(trie) {
            Some(path) => assembler::assemble(&self.lattice, path, trie),
            None => DecodeResult::default(),
        }
    }

    /// 記述がタグ、英語、ローマ字表記、学名、その他のいずれであるかを判定します。
    ///
    /// 結果はオプションの組ごとにキャッシュされます。
    ///
    /// # 例
    ///
    /// ```
    /// use wikitag::{Category, ClassifyOptions, Decoder, Vocabulary};
    ///
    /// let mut worker = Decoder::new(Vocabulary::bundled()?).new_worker();
    /// let options = ClassifyOptions::default();
    ///
    /// assert_eq!(worker.classify_desc("archaic", options), Category::Tags);
    /// assert_eq!(worker.classify_desc("running quickly", options), Category::English);
    /// assert_eq!(worker.classify_desc("/kæt/", options), Category::Romanization);
    /// assert_eq!(worker.classify_desc("", options), Category::Other);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn classify_desc(&mut self, text: &str, options: ClassifyOptions) -> Category {
        let slot = options.slot();
        if let Some(category) = self.category_cache.get(slot, text) {
            return category;
        }
        let category = classifier::classify(self, text, options);
        self.category_cache.insert(slot, text, category);
        category
    }

    /// キャッシュされているエントリの総数
    pub fn num_cached(&self) -> usize {
        self.tag_cache.len() + self.category_cache.len()
    }

    /// キャッシュを消去します。
    pub fn clear_cache(&mut self) {
        self.tag_cache.clear();
        self.category_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_clears_when_full() {
        let mut memo = Memo::new(Some(2));
        memo.insert(0, "a", 1);
        memo.insert(0, "b", 2);
        memo.insert(1, "c", 3);
        assert_eq!(3, memo.len());
        memo.insert(0, "d", 4);
        assert_eq!(2, memo.len());
        assert_eq!(None, memo.get(0, "a"));
        assert_eq!(Some(4), memo.get(0, "d"));
        assert_eq!(Some(3), memo.get(1, "c"));
    }

    #[test]
    fn test_memo_disabled() {
        let mut memo = Memo::new(Some(0));
        memo.insert(0, "a", 1);
        assert_eq!(0, memo.len());
        assert_eq!(None, memo.get(0, "a"));
    }

    #[test]
    fn test_memo_unbounded() {
        let mut memo = Memo::new(None);
        for i in 0..100 {
            memo.insert(2, &i.to_string(), i);
        }
        assert_eq!(100, memo.len());
        memo.clear();
        assert_eq!(0, memo.len());
    }
}
