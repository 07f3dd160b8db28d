//! デコーダーの精度を評価するユーティリティ
//!
//! このバイナリは、修飾句と正解タグの組からなるCSVファイルに対してデコーダーを実行し、
//! 最初のタグ集合に含まれるタグについて適合率（Precision）、再現率（Recall）、
//! F1スコアをマイクロ平均で計算します。

use std::collections::HashSet;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use wikitag::utils::parse_csv_row;
use wikitag::{DecodeOptions, Decoder, Vocabulary};

use clap::Parser;

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "evaluate", about = "Evaluate the decoder accuracy")]
struct Args {
    /// Gold file. Each row is `qualifier,space-separated tags`.
    #[clap(short = 'g', long)]
    gold: PathBuf,

    /// Compiled vocabulary. The bundled vocabulary is used if not specified.
    #[clap(short = 'v', long)]
    vocab: Option<PathBuf>,

    /// Keeps every unknown span as raw text instead of an error tag.
    #[clap(long)]
    allow_any: bool,

    /// Prints every qualifier whose first tag-set differs from the gold tags.
    #[clap(long)]
    show_errors: bool,
}

/// 正解ファイルの読み込み中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
enum EvaluateError {
    /// 列数が不正な行
    #[error("Invalid gold row at line {line}: expected 2 fields")]
    InvalidRow {
        /// 1始まりの行番号
        line: usize,
    },
}

/// 適合率、再現率、F1スコアを計算する
///
/// 分母が0になる値は0とします。
fn scores(num_cor: usize, num_sys: usize, num_ref: usize) -> (f64, f64, f64) {
    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
    let precision = ratio(num_cor, num_sys);
    let recall = ratio(num_cor, num_ref);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    (precision, recall, f1)
}

/// メイン関数
///
/// 正解ファイルの各行をデコードし、正解タグと比較して
/// 適合率、再現率、F1スコアを計算します。
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    eprintln!("Loading the vocabulary...");
    let vocab = match &args.vocab {
        Some(path) => Vocabulary::read(BufReader::new(File::open(path)?))?,
        None => Vocabulary::bundled()?,
    };
    let mut worker = Decoder::new(vocab).new_worker();
    let options = DecodeOptions::new().allow_any(args.allow_any);

    eprintln!("Decoding...");

    let rdr = BufReader::new(File::open(&args.gold)?);
    let mut num_ref = 0;
    let mut num_sys = 0;
    let mut num_cor = 0;
    let mut num_rows = 0;
    for (i, line) in rdr.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let fields = parse_csv_row(&line)?;
        let [qualifier, gold] = fields.as_slice() else {
            return Err(EvaluateError::InvalidRow { line: i + 1 }.into());
        };

        let refs: HashSet<&str> = gold.split_whitespace().collect();
        let result = worker.decode_tags(qualifier, options);
        let syss: HashSet<&str> = result
            .tag_sets()
            .first()
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default();

        if args.show_errors && refs != syss {
            let mut expected: Vec<_> = refs.iter().copied().collect();
            let mut actual: Vec<_> = syss.iter().copied().collect();
            expected.sort_unstable();
            actual.sort_unstable();
            println!(
                "{qualifier}\texpected={}\tactual={}",
                expected.join(" "),
                actual.join(" ")
            );
        }

        num_ref += refs.len();
        num_sys += syss.len();
        num_cor += refs.intersection(&syss).count();
        num_rows += 1;
    }

    let (precision, recall, f1) = scores(num_cor, num_sys, num_ref);
    println!("Rows = {num_rows}");
    println!("Precision = {precision}");
    println!("Recall = {recall}");
    println!("F1 = {f1}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores() {
        assert_eq!((0.5, 1.0, 2.0 / 3.0), scores(2, 4, 2));
    }

    #[test]
    fn test_scores_without_counts() {
        assert_eq!((0.0, 0.0, 0.0), scores(0, 0, 0));
        assert_eq!((0.0, 0.0, 0.0), scores(0, 0, 3));
        assert_eq!((0.0, 0.0, 0.0), scores(0, 2, 3));
    }
}
