//! 語彙構築のためのビルダー
//!
//! このモジュールは、タグ・話題の語彙表と別名表から [`VocabularyInner`] を構築するための
//! ビルダーを提供します。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use hashbrown::{HashMap, HashSet};

use crate::common::DIALECT_CATEGORY;
use crate::errors::{Result, WikitagError};
use crate::utils::{parse_csv_row, table_lines};
use crate::vocabulary::lexicon::Lexicon;
use crate::vocabulary::tags::TagTable;
use crate::vocabulary::topics::TopicTable;
use crate::vocabulary::trie::SequenceTrie;
use crate::vocabulary::VocabularyInner;

/// タグカテゴリ表のファイル名
pub const TAG_CATEGORIES_FILE: &str = "tag_categories.csv";
/// タグ表のファイル名
pub const TAGS_FILE: &str = "tags.csv";
/// 大文字タグ表のファイル名
pub const UPPERCASE_TAGS_FILE: &str = "uppercase_tags.txt";
/// タグ別名表のファイル名
pub const TAG_ALIASES_FILE: &str = "tag_aliases.csv";
/// 話題表のファイル名
pub const TOPICS_FILE: &str = "topics.txt";
/// 話題一般化表のファイル名
pub const TOPIC_GENERALIZATIONS_FILE: &str = "topic_generalize.csv";
/// 英単語表のファイル名
pub const ENGLISH_WORDS_FILE: &str = "english_words.txt";
/// 非英単語表のファイル名
pub const NOT_ENGLISH_WORDS_FILE: &str = "not_english_words.txt";
/// 英語の可能性がある語の表のファイル名
pub const POTENTIALLY_ENGLISH_WORDS_FILE: &str = "potentially_english_words.txt";
/// 既知の学名表のファイル名
pub const KNOWN_SPECIES_FILE: &str = "known_species.txt";
/// 学名の先頭語表のファイル名
pub const KNOWN_FIRSTS_FILE: &str = "known_firsts.txt";

/// 語彙の構築に必要なすべての表
///
/// 各フィールドは対応する表のリーダーです。
pub struct VocabularySources<R> {
    /// `category,priority`形式のCSV
    pub tag_categories: R,
    /// `tag,category`形式のCSV
    pub tags: R,
    /// 1行1タグの大文字タグ（地域・方言名）
    pub uppercase_tags: R,
    /// `phrase,tags`形式のCSV。同じ句の行が複数ある場合は別解釈として扱われます。
    pub tag_aliases: R,
    /// 1行1話題の話題表
    pub topics: R,
    /// `topic,broader topics`形式のCSV
    pub topic_generalizations: R,
    /// 1行1語の英単語表
    pub english_words: R,
    /// 1行1語の非英単語表
    pub not_english_words: R,
    /// 1行1語の英語の可能性がある語の表
    pub potentially_english_words: R,
    /// 1行1つの学名表
    pub known_species: R,
    /// 1行1語の学名の先頭語表
    pub known_firsts: R,
}

impl VocabularySources<&'static [u8]> {
    /// ライブラリに同梱された表を返します。
    pub fn bundled() -> Self {
        Self {
            tag_categories: include_bytes!("../../resources/tag_categories.csv"),
            tags: include_bytes!("../../resources/tags.csv"),
            uppercase_tags: include_bytes!("../../resources/uppercase_tags.txt"),
            tag_aliases: include_bytes!("../../resources/tag_aliases.csv"),
            topics: include_bytes!("../../resources/topics.txt"),
            topic_generalizations: include_bytes!("../../resources/topic_generalize.csv"),
            english_words: include_bytes!("../../resources/english_words.txt"),
            not_english_words: include_bytes!("../../resources/not_english_words.txt"),
            potentially_english_words: include_bytes!(
                "../../resources/potentially_english_words.txt"
            ),
            known_species: include_bytes!("../../resources/known_species.txt"),
            known_firsts: include_bytes!("../../resources/known_firsts.txt"),
        }
    }
}

impl VocabularySources<File> {
    /// ディレクトリから標準のファイル名で表を開きます。
    ///
    /// # エラー
    ///
    /// いずれかのファイルを開けない場合にエラーを返します。
    pub fn from_dir<P>(dir: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        let open = |name: &str| File::open(dir.join(name));
        Ok(Self {
            tag_categories: open(TAG_CATEGORIES_FILE)?,
            tags: open(TAGS_FILE)?,
            uppercase_tags: open(UPPERCASE_TAGS_FILE)?,
            tag_aliases: open(TAG_ALIASES_FILE)?,
            topics: open(TOPICS_FILE)?,
            topic_generalizations: open(TOPIC_GENERALIZATIONS_FILE)?,
            english_words: open(ENGLISH_WORDS_FILE)?,
            not_english_words: open(NOT_ENGLISH_WORDS_FILE)?,
            potentially_english_words: open(POTENTIALLY_ENGLISH_WORDS_FILE)?,
            known_species: open(KNOWN_SPECIES_FILE)?,
            known_firsts: open(KNOWN_FIRSTS_FILE)?,
        })
    }
}

fn read_text<R>(mut rdr: R) -> Result<String>
where
    R: Read,
{
    let mut buf = vec![];
    rdr.read_to_end(&mut buf)?;
    Ok(String::from_utf8(buf).map_err(|e| e.utf8_error())?)
}

/// 句から複数の候補への対応表。挿入順を保持します。
#[derive(Default)]
struct AliasTable {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl AliasTable {
    fn push(&mut self, key: &str, value: &str) {
        let idx = *self.index.entry(key.to_string()).or_insert_with(|| {
            self.entries.push((key.to_string(), vec![]));
            self.entries.len() - 1
        });
        if !value.is_empty() {
            self.entries[idx].1.push(value.to_string());
        }
    }

    fn get(&self, key: &str) -> Option<&[String]> {
        self.index.get(key).map(|&i| self.entries[i].1.as_slice())
    }

    fn parse(&mut self, text: &str, name: &'static str) -> Result<()> {
        for line in table_lines(text) {
            let fields = parse_csv_row(line)?;
            match fields.as_slice() {
                [key] => self.push(key.trim(), ""),
                [key, value] => self.push(key.trim(), value.trim()),
                _ => {
                    return Err(WikitagError::invalid_format(
                        name,
                        format!("expected 1 or 2 fields: {line}"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// 構築中の語彙
struct Draft {
    trie: SequenceTrie,
    tags: TagTable,
    topics: TopicTable,
    slash_keys: HashSet<String>,
}

impl Draft {
    /// `key`の単語列をトライに登録し、`value`をタグと話題に振り分けて候補として追加します。
    ///
    /// タグにも話題にも含まれない値は警告を出した上でタグとして登録されます。
    fn insert(&mut self, key: &str, value: &str) -> Result<()> {
        if key.split_whitespace().next().is_none() {
            log::warn!("[wikitag] ignoring empty sequence key mapped to {value:?}");
            return Ok(());
        }
        let idx = self.trie.insert_path(key.split_whitespace())?;
        if value.is_empty() {
            return Ok(());
        }
        let mut tags = vec![];
        let mut topics = vec![];
        for v in value.split_whitespace() {
            if self.tags.contains(v) {
                tags.push(v);
            } else if self.topics.contains(v) {
                topics.push(v);
            } else {
                log::warn!("[wikitag] {key:?} maps to unknown tag or topic {v:?}");
                tags.push(v);
            }
        }
        self.trie
            .push_alternatives(idx, tags.join(" "), topics.join(" "));
        Ok(())
    }

    /// 別名表を登録します。
    ///
    /// `recurse`が真の場合、値に含まれる語がさらに別名表のキーであれば、
    /// その値も同じキーに推移的に追加します。
    fn insert_aliases(&mut self, aliases: &AliasTable, recurse: bool) -> Result<()> {
        for (key, values) in &aliases.entries {
            let mut queue = self.insert_alternatives(key, values)?;
            if !recurse {
                continue;
            }
            let mut visited = HashSet::new();
            while let Some(v) = queue.pop() {
                if !visited.insert(v.clone()) {
                    continue;
                }
                let Some(next) = aliases.get(&v) else {
                    continue;
                };
                queue.extend(self.insert_alternatives(key, next)?);
            }
        }
        Ok(())
    }

    fn insert_alternatives(&mut self, key: &str, values: &[String]) -> Result<Vec<String>> {
        if values.is_empty() {
            self.insert(key, "")?;
            return Ok(vec![]);
        }
        let mut words = vec![];
        for value in values {
            self.insert(key, value)?;
            words.extend(value.split_whitespace().map(str::to_string));
        }
        Ok(words)
    }

    fn register_slash_key(&mut self, key: &str) {
        if key.contains('/') {
            self.slash_keys.insert(key.to_string());
        }
    }
}

fn hyphenate(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("-")
}

/// タグと話題の表から [`VocabularyInner`] を構築するビルダー
///
/// # 例
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use wikitag::{Decoder, DecodeOptions, Vocabulary, VocabularyBuilder};
///
/// let mut builder = VocabularyBuilder::new();
/// builder.add_tag("archaic", "register")?;
/// builder.add_tag("singular", "number")?;
/// builder.add_tag_alias("sg", "singular");
/// builder.add_topic("biology");
///
/// let vocab = Vocabulary::from_inner(builder.build()?);
/// let mut worker = Decoder::new(vocab).new_worker();
/// let result = worker.decode_tags("archaic sg", DecodeOptions::default());
/// assert_eq!(result.tag_sets(), &[vec!["archaic".to_string(), "singular".to_string()]]);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct VocabularyBuilder {
    tags: TagTable,
    uppercase_tags: Vec<String>,
    tag_aliases: AliasTable,
    topics: Vec<String>,
    topic_generalizations: AliasTable,
    lexicon: Lexicon,
}

impl VocabularyBuilder {
    /// 空のビルダーを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての表を読み込んで新しい [`VocabularyInner`] を作成します。
    ///
    /// # 引数
    ///
    /// * `sources` - 各表のリーダー
    ///
    /// # エラー
    ///
    /// 入力フォーマットが不正な場合に [`WikitagError`] を返します。
    pub fn from_readers<R>(sources: VocabularySources<R>) -> Result<VocabularyInner>
    where
        R: Read,
    {
        let mut builder = Self::new();
        builder
            .tags
            .parse_categories(&read_text(sources.tag_categories)?)?;
        builder.tags.parse_tags(&read_text(sources.tags)?)?;
        builder.uppercase_tags = table_lines(&read_text(sources.uppercase_tags)?)
            .map(str::to_string)
            .collect();
        builder
            .tag_aliases
            .parse(&read_text(sources.tag_aliases)?, TAG_ALIASES_FILE)?;
        builder.topics = table_lines(&read_text(sources.topics)?)
            .map(str::to_string)
            .collect();
        builder.topic_generalizations.parse(
            &read_text(sources.topic_generalizations)?,
            TOPIC_GENERALIZATIONS_FILE,
        )?;
        builder.lexicon = Lexicon::from_texts(
            &read_text(sources.english_words)?,
            &read_text(sources.not_english_words)?,
            &read_text(sources.potentially_english_words)?,
            &read_text(sources.known_species)?,
            &read_text(sources.known_firsts)?,
        );
        builder.build()
    }

    /// タグを登録します。
    ///
    /// # エラー
    ///
    /// カテゴリ表が登録済みで、`category`がそこに含まれない場合にエラーを返します。
    pub fn add_tag(&mut self, tag: &str, category: &str) -> Result<&mut Self> {
        self.tags.insert(tag, category)?;
        Ok(self)
    }

    /// 大文字で始まる地域・方言名のタグを登録します。
    pub fn add_uppercase_tag(&mut self, name: &str) -> &mut Self {
        self.uppercase_tags.push(name.to_string());
        self
    }

    /// 句をタグの列（空白区切り）に対応付けます。
    ///
    /// 同じ句を複数回登録すると、それぞれが別の解釈として扱われます。
    pub fn add_tag_alias(&mut self, phrase: &str, tags: &str) -> &mut Self {
        self.tag_aliases.push(phrase, tags);
        self
    }

    /// 話題を登録します。
    pub fn add_topic(&mut self, topic: &str) -> &mut Self {
        self.topics.push(topic.to_string());
        self
    }

    /// 話題（または話題を表す句）をより広い話題の列に対応付けます。
    pub fn add_topic_generalization(&mut self, topic: &str, broader: &str) -> &mut Self {
        self.topic_generalizations.push(topic, broader);
        self
    }

    /// 分類器用の単語リストを設定します。
    pub fn lexicon(&mut self, lexicon: Lexicon) -> &mut Self {
        self.lexicon = lexicon;
        self
    }

    /// 語彙を構築します。
    ///
    /// 登録の順序は次のとおりです。後の段階で追加される候補は、同じキーの既存の候補に
    /// 追記されます。
    ///
    /// 1. 各タグを自分自身に対応付ける
    /// 2. 大文字タグのハイフン区切り形をタグに加え、元の名前とハイフン区切り形を対応付ける
    /// 3. タグの別名（推移的な展開なし）
    /// 4. 各話題を自分自身に対応付ける
    /// 5. 一般化表のキーをハイフン区切り形の話題に対応付ける
    /// 6. 話題の一般化（推移的に展開）
    ///
    /// # エラー
    ///
    /// ノード数が上限を超えた場合や、大文字タグのカテゴリが未定義の場合にエラーを返します。
    pub fn build(self) -> Result<VocabularyInner> {
        let Self {
            tags,
            uppercase_tags,
            tag_aliases,
            topics,
            topic_generalizations,
            lexicon,
        } = self;

        let mut draft = Draft {
            trie: SequenceTrie::new(),
            tags,
            topics: TopicTable::default(),
            slash_keys: HashSet::new(),
        };
        for topic in &topics {
            draft.topics.insert(topic);
        }

        let mut canonical: Vec<String> = draft.tags.tags().map(str::to_string).collect();
        canonical.sort_unstable();
        for tag in &canonical {
            draft.register_slash_key(tag);
            draft.insert(tag, tag)?;
        }

        for name in &uppercase_tags {
            let hyphenated = hyphenate(name);
            if draft.tags.contains(&hyphenated) {
                log::warn!("[wikitag] duplicate tag {hyphenated:?} from uppercase tag {name:?}");
            }
            draft.tags.insert(&hyphenated, DIALECT_CATEGORY)?;
            draft.insert(&hyphenated, &hyphenated)?;
        }
        for name in &uppercase_tags {
            draft.register_slash_key(name);
            draft.insert(name, &hyphenate(name))?;
        }

        draft.insert_aliases(&tag_aliases, false)?;
        for (key, _) in &tag_aliases.entries {
            draft.register_slash_key(key);
        }

        for topic in &topics {
            draft.register_slash_key(topic);
            draft.insert(topic, topic)?;
        }
        for (key, broader) in &topic_generalizations.entries {
            let hyphenated = key.replace(' ', "-");
            draft.topics.insert(&hyphenated);
            draft.topics.insert_broader(&hyphenated, broader);
            draft.register_slash_key(key);
            draft.insert(key, &hyphenated)?;
        }
        draft.insert_aliases(&topic_generalizations, true)?;

        let mut slash_keys: Vec<String> = draft.slash_keys.into_iter().collect();
        slash_keys.sort_unstable();

        log::debug!(
            "[wikitag] built vocabulary: {} tags, {} topics, {} trie nodes, {} slash keys",
            draft.tags.len(),
            draft.topics.len(),
            draft.trie.num_nodes(),
            slash_keys.len(),
        );

        Ok(VocabularyInner {
            trie: draft.trie,
            tags: draft.tags,
            topics: draft.topics,
            slash_keys,
            lexicon,
        })
    }
}
