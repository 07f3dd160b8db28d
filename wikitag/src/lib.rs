//! # wikitag
//!
//! wikitagは、辞書項目に付けられた自由記述の修飾句（"archaic"、"colloquial"、"biology"など）を、
//! 統制語彙のタグと話題に分解するデコーダーの実装です。
//!
//! ## 概要
//!
//! 修飾句は区切り記号で部分に分けられ、各部分の単語列が複数語キーのトライ上で照合されます。
//! 照合はビーム幅を制限した最良パス探索で行われ、語彙に一致しないスパンがあっても
//! 失敗することはありません。一致しなかったスパンは、エラータグまたは生のテキストとして
//! 結果に残ります。
//!
//! ## 主な機能
//!
//! - **タグデコード**: 修飾句を重複のないタグ集合の列と話題の列に変換
//! - **記述の分類**: 句がタグ、英語、ローマ字表記、学名、その他のいずれかを判定
//! - **語彙の構築**: CSVとテキストの表からトライを構築し、rkyv形式で保存・読み込み
//! - **同梱語彙**: 標準の語彙表をライブラリに同梱
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use wikitag::{Category, ClassifyOptions, DecodeOptions, Decoder, VocabularyBuilder, Vocabulary};
//!
//! let mut builder = VocabularyBuilder::new();
//! builder.add_tag("masculine", "gender")?;
//! builder.add_tag("feminine", "gender")?;
//! builder.add_tag("archaic", "register")?;
//! builder.add_tag_alias("m/f", "masculine feminine");
//! builder.add_topic("biology");
//!
//! let decoder = Decoder::new(Vocabulary::from_inner(builder.build()?));
//! let mut worker = decoder.new_worker();
//! let options = DecodeOptions::default();
//!
//! let result = worker.decode_tags("archaic, m/f", options);
//! assert_eq!(
//!     result.tag_sets(),
//!     &[vec!["archaic".to_string(), "feminine".to_string(), "masculine".to_string()]]
//! );
//!
//! let result = worker.decode_tags("biology", options);
//! assert_eq!(result.tag_sets(), &[Vec::<String>::new()]);
//! assert_eq!(result.topics(), &["biology".to_string()]);
//!
//! let result = worker.decode_tags("frobnicate", options);
//! assert_eq!(result.tag_sets(), &[vec!["error-unknown-tag".to_string()]]);
//!
//! assert_eq!(worker.classify_desc("archaic", ClassifyOptions::default()), Category::Tags);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

/// 記述の分類器
pub mod classifier;

/// 共通の定数定義
pub mod common;

/// タグデコーダーの実装
pub mod decoder;

/// エラー型の定義
pub mod errors;

/// デコード結果
pub mod result;

/// 内部ユーティリティ関数
pub mod utils;

/// 語彙データ構造とビルダー
pub mod vocabulary;

#[cfg(test)]
mod test_utils;

// Re-exports
pub use classifier::{Category, ClassifyOptions};
pub use decoder::worker::Worker;
pub use decoder::{DecodeOptions, Decoder};
pub use result::DecodeResult;
pub use vocabulary::{Vocabulary, VocabularyBuilder, VocabularyInner, VocabularySources};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
