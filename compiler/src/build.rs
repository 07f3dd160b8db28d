//! コンパイル済み語彙のビルドモジュール
//!
//! 語彙表のディレクトリ（tags.csv、tag_aliases.csv、topics.txt等）から
//! rkyv形式のコンパイル済み語彙ファイルを構築します。

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use wikitag::errors::WikitagError;
use wikitag::{Vocabulary, VocabularyBuilder, VocabularySources};

use clap::Parser;

/// ビルドコマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "build", about = "A program to compile the tag vocabulary.")]
pub struct Args {
    /// Directory containing the vocabulary tables (tags.csv, tag_aliases.csv, topics.txt, ...).
    #[clap(short = 'r', long)]
    resources_dir: PathBuf,

    /// File to which the compiled vocabulary is output.
    #[clap(short = 'o', long)]
    output: PathBuf,
}

/// ビルド処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 語彙構築エラー
    #[error("Vocabulary building failed: {0}")]
    Wikitag(#[from] WikitagError),
}

/// ビルドコマンドを実行する
///
/// # エラー
///
/// 語彙表の読み込みや語彙ファイルの書き出しに失敗した場合、`BuildError`を返します。
pub fn run(args: Args) -> Result<(), BuildError> {
    eprintln!("Reading tables from {}...", args.resources_dir.display());
    let sources = VocabularySources::from_dir(&args.resources_dir)?;

    eprintln!("Compiling the vocabulary...");
    let vocab = Vocabulary::from_inner(VocabularyBuilder::from_readers(sources)?);
    eprintln!(
        "{} tags, {} topics, {} trie nodes, {} English words",
        vocab.tags().len(),
        vocab.topics().len(),
        vocab.trie().num_nodes(),
        vocab.lexicon().num_english_words(),
    );

    eprintln!("Writing the vocabulary...");
    let mut wtr = BufWriter::new(File::create(&args.output)?);
    vocab.write(&mut wtr)?;
    wtr.flush()?;

    eprintln!("Successfully built the vocabulary to {}", args.output.display());
    Ok(())
}
