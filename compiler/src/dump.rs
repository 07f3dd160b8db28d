//! コンパイル済み語彙の内容を出力するモジュール
//!
//! 登録されたすべての複数語キーを、タグと話題の候補とともにTSV形式で出力します。
//! 同じキーに複数の候補がある場合は` | `で連結します。

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use wikitag::Vocabulary;
use wikitag::errors::WikitagError;

use clap::Parser;

/// ダンプコマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "dump", about = "A program to print the keys of a compiled vocabulary.")]
pub struct Args {
    /// Compiled vocabulary file.
    #[clap(short = 'v', long)]
    vocab: PathBuf,
}

/// ダンプ処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 語彙読み込みエラー
    #[error("Vocabulary loading failed: {0}")]
    Wikitag(#[from] WikitagError),
}

/// ダンプコマンドを実行する
///
/// 出力の各行は`キー<TAB>タグの候補<TAB>話題の候補`の形式です。
///
/// # エラー
///
/// 語彙ファイルの読み込みや出力に失敗した場合、`DumpError`を返します。
pub fn run(args: Args) -> Result<(), DumpError> {
    eprintln!("Loading the vocabulary...");
    let vocab = Vocabulary::read(BufReader::new(File::open(&args.vocab)?))?;

    let out = io::stdout();
    let mut out = BufWriter::new(out.lock());
    for (key, node) in vocab.trie().keys() {
        writeln!(
            out,
            "{key}\t{}\t{}",
            node.tag_alternatives().join(" | "),
            node.topic_alternatives().join(" | "),
        )?;
    }
    out.flush()?;

    Ok(())
}
