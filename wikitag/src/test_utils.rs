//! テスト用ユーティリティ
//!
//! テストコードで使用する便利なマクロや関数を提供します。

use crate::decoder::Decoder;
use crate::vocabulary::lexicon::Lexicon;
use crate::vocabulary::{Vocabulary, VocabularyBuilder};

macro_rules! hashset {
    ( $($v:expr,)* ) => {
        {
            #[allow(unused_mut)]
            let mut h = hashbrown::HashSet::new();
            $(
                h.insert($v);
            )*
            h
        }
    };
    ( $($v:expr),* ) => {
        hashset![$( $v, )*]
    };
}

pub(crate) use hashset;

/// 小さな語彙で使う正規タグとカテゴリ。
pub(crate) const TEST_TAGS: &[(&str, &str)] = &[
    ("masculine", "gender"),
    ("feminine", "gender"),
    ("neuter", "gender"),
    ("archaic", "dialect"),
    ("obsolete", "dialect"),
    ("rare", "misc"),
    ("past", "tense"),
    ("participle", "non-finite"),
    ("plural", "number"),
    ("singular", "number"),
    ("symbol", "misc"),
];

/// 小さな語彙で使う正規の話題。
pub(crate) const TEST_TOPICS: &[&str] = &["biology", "zoology", "sailing"];

/// テスト用の小さな語彙を構築します。
#[track_caller]
pub(crate) fn build_test_vocabulary() -> Vocabulary {
    let mut builder = VocabularyBuilder::new();
    for &(tag, category) in TEST_TAGS {
        builder.add_tag(tag, category).unwrap();
    }
    builder
        .add_tag_alias("m/f", "masculine feminine")
        .add_tag_alias("sg", "singular")
        .add_tag_alias("pl", "plural")
        .add_tag_alias("very rare", "rare")
        .add_tag_alias("simple past and past participle", "past")
        .add_tag_alias("simple past and past participle", "past participle")
        .add_uppercase_tag("New Zealand");
    for &topic in TEST_TOPICS {
        builder.add_topic(topic);
    }
    builder
        .add_topic_generalization("zoology", "biology")
        .lexicon(Lexicon::from_texts(
            "running\nquickly\nwinter\nfor\nboron\nsymbol\n",
            "de\n",
            "!\n\"\n'\n",
            "Lynx lynx\n",
            "Lynx\nEudyptes\n",
        ));
    Vocabulary::from_inner(builder.build().unwrap())
}

/// テスト用の小さな語彙を使うデコーダーを作成します。
#[track_caller]
pub(crate) fn build_test_decoder() -> Decoder {
    Decoder::new(build_test_vocabulary())
}

/// 同梱語彙を使うデコーダーを作成します。
#[track_caller]
pub(crate) fn build_bundled_decoder() -> Decoder {
    Decoder::new(Vocabulary::bundled().unwrap())
}

/// 文字列スライスのタグ集合を`String`に変換します。
pub(crate) fn tag_sets(sets: &[&[&str]]) -> Vec<Vec<String>> {
    sets.iter()
        .map(|set| set.iter().map(|t| t.to_string()).collect())
        .collect()
}
