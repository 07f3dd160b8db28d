//! タグと話題の語彙モジュール
//!
//! このモジュールは、デコーダーと分類器が参照する読み取り専用の語彙を提供します。
//! 語彙は次の要素から構成されます:
//!
//! - 複数語のキーから候補となるタグ・話題への対応を表すトライ
//! - タグのカテゴリと表示優先度
//! - 話題とその一般化の対応
//! - 分類器が参照する単語リスト
//! - `/`を含む登録済みキー
//!
//! # 語彙の読み込み方法
//!
//! - [`Vocabulary::bundled`]: ライブラリに同梱された表から構築する
//! - [`Vocabulary::read`]: [`Vocabulary::write`]で書き出したコンパイル済みの語彙を読み込む
//! - [`VocabularyBuilder`]: 任意の表から構築する
pub mod builder;
pub mod lexicon;
pub mod tags;
pub mod topics;
pub mod trie;

use std::io::{Read, Write};
use std::ops::Deref;

use regex::Regex;
use rkyv::rancor::Error;
use rkyv::util::AlignedVec;
use rkyv::{
    Archive, Deserialize, Serialize, api::serialize_using, ser::Serializer,
    ser::allocator::Arena, ser::sharing::Share, ser::writer::IoWriter, util::with_arena,
};

use crate::errors::{Result, WikitagError};
use crate::vocabulary::lexicon::Lexicon;
use crate::vocabulary::tags::TagTable;
use crate::vocabulary::topics::TopicTable;
use crate::vocabulary::trie::SequenceTrie;

pub use crate::vocabulary::builder::{VocabularyBuilder, VocabularySources};

/// コンパイル済み語彙ファイルを識別するマジックバイト。
///
/// "0.1"はファイルフォーマットのバージョンであり、クレートのバージョンとは独立しています。
pub const VOCABULARY_MAGIC: &[u8] = b"WikitagVocabularyRkyv 0.1\n";

const VOCABULARY_MAGIC_LEN: usize = VOCABULARY_MAGIC.len();
const RKYV_ALIGNMENT: usize = 16;
const PADDING_LEN: usize =
    (RKYV_ALIGNMENT - (VOCABULARY_MAGIC_LEN % RKYV_ALIGNMENT)) % RKYV_ALIGNMENT;

/// [`Vocabulary`]の内部データ。
///
/// シリアライズの対象となるのはこの構造体です。
#[derive(Debug, Archive, Serialize, Deserialize)]
pub struct VocabularyInner {
    pub(crate) trie: SequenceTrie,
    pub(crate) tags: TagTable,
    pub(crate) topics: TopicTable,
    pub(crate) lexicon: Lexicon,
    pub(crate) slash_keys: Vec<String>,
}

impl VocabularyInner {
    /// 複数語キーのトライ
    #[inline(always)]
    pub fn trie(&self) -> &SequenceTrie {
        &self.trie
    }

    /// タグの語彙とカテゴリ
    #[inline(always)]
    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    /// 話題の語彙と一般化の対応
    #[inline(always)]
    pub fn topics(&self) -> &TopicTable {
        &self.topics
    }

    /// 分類器用の単語リスト
    #[inline(always)]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// `/`を含む登録済みキー（辞書順）
    #[inline(always)]
    pub fn slash_keys(&self) -> &[String] {
        &self.slash_keys
    }

    /// 語彙データを`rkyv`フォーマットでライターにシリアライズします。
    ///
    /// # エラー
    ///
    /// 書き込みまたはシリアライズに失敗した場合にエラーを返します。
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        wtr.write_all(VOCABULARY_MAGIC)?;

        let padding_bytes = vec![0xFF; PADDING_LEN];
        wtr.write_all(&padding_bytes)?;

        with_arena(|arena: &mut Arena| {
            let writer = IoWriter::new(&mut wtr);
            let mut serializer = Serializer::new(writer, arena.acquire(), Share::new());
            serialize_using::<_, Error>(self, &mut serializer)
        })?;

        Ok(())
    }
}

/// デコーダーと分類器が参照する読み取り専用の語彙。
///
/// [`VocabularyInner`]に加えて、`/`を含む登録済みキーを保護するための正規表現を保持します。
pub struct Vocabulary {
    inner: VocabularyInner,
    slash_re: Option<Regex>,
}

impl Deref for Vocabulary {
    type Target = VocabularyInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Vocabulary {
    /// 構築済みの内部データから語彙を作成します。
    pub fn from_inner(inner: VocabularyInner) -> Self {
        let slash_re = build_slash_regex(&inner.slash_keys);
        Self { inner, slash_re }
    }

    /// ライブラリに同梱された表から語彙を構築します。
    ///
    /// # エラー
    ///
    /// 同梱された表の形式が不正な場合にエラーを返します。
    pub fn bundled() -> Result<Self> {
        VocabularyBuilder::from_readers(VocabularySources::bundled()).map(Self::from_inner)
    }

    /// コンパイル済みの語彙をリーダーから読み込みます。
    ///
    /// # 引数
    ///
    /// * `rdr` - [`Vocabulary::write`]で書き出されたデータのリーダー
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - マジックバイトが一致しない場合。
    /// - データを読み込めない場合。
    /// - データの検証に失敗した場合。
    ///
    /// # 例
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use wikitag::Vocabulary;
    ///
    /// let vocab = Vocabulary::bundled()?;
    /// let mut buf = vec![];
    /// vocab.write(&mut buf)?;
    ///
    /// let loaded = Vocabulary::read(buf.as_slice())?;
    /// assert_eq!(vocab.trie().num_nodes(), loaded.trie().num_nodes());
    /// assert!(Vocabulary::read(&b"NotAVocabulary"[..]).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn read<R: Read>(mut rdr: R) -> Result<Self> {
        let mut magic = [0; VOCABULARY_MAGIC_LEN];
        rdr.read_exact(&mut magic).map_err(|_| {
            WikitagError::invalid_argument("rdr", "The input is too short to be a vocabulary.")
        })?;
        if magic != VOCABULARY_MAGIC {
            return Err(WikitagError::invalid_argument(
                "rdr",
                "The magic number of the input vocabulary mismatches.",
            ));
        }

        let mut padding_buf = vec![0; PADDING_LEN];
        rdr.read_exact(&mut padding_buf)?;

        let mut buffer = Vec::new();
        rdr.read_to_end(&mut buffer)?;

        let mut aligned_bytes = AlignedVec::<RKYV_ALIGNMENT>::with_capacity(buffer.len());
        aligned_bytes.extend_from_slice(&buffer);

        let inner = rkyv::from_bytes::<VocabularyInner, Error>(&aligned_bytes).map_err(|e| {
            WikitagError::invalid_state(
                "rkyv validation failed. The vocabulary file may be corrupted or incompatible."
                    .to_string(),
                e.to_string(),
            )
        })?;

        Ok(Self::from_inner(inner))
    }

    /// タグのカテゴリを取得します。
    pub fn tag_category(&self, tag: &str) -> Option<&str> {
        self.tags.category(tag)
    }

    /// タグ列を表示順に並べ替えます。
    ///
    /// 詳細は [`TagTable::sort_tags`] を参照してください。
    pub fn sort_tags<S>(&self, tags: &[S]) -> Vec<String>
    where
        S: AsRef<str>,
    {
        self.tags.sort_tags(tags)
    }

    /// 話題をより広い話題へ推移的に一般化します。
    pub fn generalize_topic(&self, topic: &str) -> Vec<&str> {
        self.topics.generalize(topic)
    }

    /// 登録済みキーに含まれない`/`を空白に置き換えます。
    ///
    /// # 例
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use wikitag::Vocabulary;
    ///
    /// let vocab = Vocabulary::bundled()?;
    /// assert_eq!(vocab.rewrite_slashes("m/f archaic/obsolete"), "m/f archaic obsolete");
    /// # Ok(())
    /// # }
    /// ```
    pub fn rewrite_slashes(&self, text: &str) -> String {
        let Some(re) = &self.slash_re else {
            return text.replace('/', " ");
        };
        let mut result = String::with_capacity(text.len());
        let mut last = 0;
        for m in re.find_iter(text) {
            result.push_str(&text[last..m.start()].replace('/', " "));
            result.push_str(m.as_str());
            last = m.end();
        }
        result.push_str(&text[last..].replace('/', " "));
        result
    }
}

fn build_slash_regex(keys: &[String]) -> Option<Regex> {
    if keys.is_empty() {
        return None;
    }
    let mut keys: Vec<&str> = keys.iter().map(String::as_str).collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let pattern = keys
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("[wikitag] failed to compile slash key pattern: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slash_vocabulary() -> Vocabulary {
        let mut builder = VocabularyBuilder::new();
        builder.add_tag("masculine", "gender").unwrap();
        builder.add_tag("feminine", "gender").unwrap();
        builder.add_tag_alias("m/f", "masculine feminine");
        builder.add_tag_alias("m/f/n", "masculine feminine");
        Vocabulary::from_inner(builder.build().unwrap())
    }

    #[test]
    fn test_rewrite_slashes() {
        let vocab = slash_vocabulary();
        assert_eq!("m/f/n", vocab.rewrite_slashes("m/f/n"));
        assert_eq!("a b m/f", vocab.rewrite_slashes("a/b m/f"));
        assert_eq!("no slash", vocab.rewrite_slashes("no slash"));
    }

    #[test]
    fn test_rewrite_slashes_without_keys() {
        let vocab = Vocabulary::from_inner(VocabularyBuilder::new().build().unwrap());
        assert_eq!("a b c", vocab.rewrite_slashes("a/b/c"));
    }

    #[test]
    fn test_write_read() {
        let vocab = slash_vocabulary();
        let mut buf = vec![];
        vocab.write(&mut buf).unwrap();
        assert!(buf.starts_with(VOCABULARY_MAGIC));
        assert_eq!(0, (VOCABULARY_MAGIC_LEN + PADDING_LEN) % RKYV_ALIGNMENT);

        let loaded = Vocabulary::read(buf.as_slice()).unwrap();
        assert_eq!(vocab.trie().num_nodes(), loaded.trie().num_nodes());
        assert_eq!(vocab.slash_keys(), loaded.slash_keys());
        assert_eq!(Some("gender"), loaded.tag_category("masculine"));
        assert_eq!("a b m/f", loaded.rewrite_slashes("a/b m/f"));
    }

    #[test]
    fn test_read_wrong_magic() {
        let mut buf = b"WikitagVocabularyRkyv 9.9\n".to_vec();
        buf.extend_from_slice(&[0; 64]);
        let err = Vocabulary::read(buf.as_slice()).err().unwrap();
        assert!(matches!(err, WikitagError::InvalidArgument(_)));
    }

    /// 先頭の`remaining`バイトだけを受け付けるライター
    struct ShortWriter {
        remaining: usize,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if buf.len() > self.remaining {
                return Err(std::io::ErrorKind::WriteZero.into());
            }
            self.remaining -= buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_serialization_failure() {
        let vocab = slash_vocabulary();
        let wtr = ShortWriter {
            remaining: VOCABULARY_MAGIC_LEN + PADDING_LEN,
        };
        let err = vocab.write(wtr).err().unwrap();
        assert!(matches!(err, WikitagError::RkyvError(_)));
    }

    #[test]
    fn test_read_corrupted() {
        let mut buf = VOCABULARY_MAGIC.to_vec();
        buf.extend_from_slice(&[0xFF; PADDING_LEN]);
        buf.extend_from_slice(&[0xAB; 4]);
        let err = Vocabulary::read(buf.as_slice()).err().unwrap();
        assert!(matches!(err, WikitagError::InvalidState(_)));
    }
}
