//! 修飾句をデコードするユーティリティ
//!
//! このバイナリは、標準入力から1行ずつ読み込んだ修飾句をタグ集合と話題にデコード、
//! または記述の種類に分類し、1行に1つの結果を出力します。

use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use wikitag::{ClassifyOptions, DecodeOptions, DecodeResult, Decoder, Vocabulary};

use clap::Parser;

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Tags,
    Classify,
    Both,
}

/// `OutputMode` の `FromStr` 実装
impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "tags" => Ok(Self::Tags),
            "classify" => Ok(Self::Classify),
            "both" => Ok(Self::Both),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "decode", about = "Decodes qualifiers into tags and topics")]
struct Args {
    /// Compiled vocabulary. The bundled vocabulary is used if not specified.
    #[clap(short = 'v', long)]
    vocab: Option<PathBuf>,

    /// Output mode. Choices are tags, classify, and both.
    #[clap(short = 'O', long, default_value = "tags")]
    mode: OutputMode,

    /// Keeps every unknown span as raw text instead of an error tag.
    #[clap(long)]
    allow_any: bool,

    /// Disables the exception for unknown spans starting with words such as "for" or "with".
    #[clap(long)]
    no_unknown_starts: bool,

    /// Treats tag-sets consisting of raw text only as tags when classifying.
    #[clap(long)]
    allow_unknown_tags: bool,

    /// Orders tags by category priority instead of alphabetically.
    #[clap(short = 'S', long)]
    sort_by_category: bool,
}

/// デコード結果を`タグ集合1|タグ集合2<TAB>話題`の形式で書き出す
fn write_result<W>(
    out: &mut W,
    vocab: &Vocabulary,
    result: &DecodeResult,
    sort_by_category: bool,
) -> std::io::Result<()>
where
    W: Write,
{
    for (i, set) in result.tag_sets().iter().enumerate() {
        if i != 0 {
            out.write_all(b"|")?;
        }
        let tags = if sort_by_category {
            vocab.sort_tags(set)
        } else {
            set.clone()
        };
        out.write_all(tags.join(" ").as_bytes())?;
    }
    out.write_all(b"\t")?;
    out.write_all(result.topics().join(" ").as_bytes())?;
    Ok(())
}

/// メイン関数
///
/// 語彙をロードし、標準入力から読み込んだ修飾句をデコードして、
/// 指定された形式で結果を標準出力に出力します。
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    eprintln!("Loading the vocabulary...");
    let vocab = match &args.vocab {
        Some(path) => Vocabulary::read(BufReader::new(File::open(path)?))?,
        None => Vocabulary::bundled()?,
    };
    let decoder = Decoder::new(vocab);
    let mut worker = decoder.new_worker();

    let decode_options = DecodeOptions::new()
        .allow_any(args.allow_any)
        .no_unknown_starts(args.no_unknown_starts);
    let classify_options = ClassifyOptions::new()
        .allow_unknown_tags(args.allow_unknown_tags)
        .no_unknown_starts(args.no_unknown_starts);

    eprintln!("Ready to decode");

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let lines = std::io::stdin().lock().lines();
    for line in lines {
        let line = line?;
        match args.mode {
            OutputMode::Tags => {
                let result = worker.decode_tags(&line, decode_options);
                write_result(&mut out, decoder.vocabulary(), &result, args.sort_by_category)?;
            }
            OutputMode::Classify => {
                let category = worker.classify_desc(&line, classify_options);
                out.write_all(category.as_str().as_bytes())?;
            }
            OutputMode::Both => {
                let category = worker.classify_desc(&line, classify_options);
                out.write_all(category.as_str().as_bytes())?;
                out.write_all(b"\t")?;
                let result = worker.decode_tags(&line, decode_options);
                write_result(&mut out, decoder.vocabulary(), &result, args.sort_by_category)?;
            }
        }
        out.write_all(b"\n")?;
        if is_tty {
            out.flush()?;
        }
    }
    out.flush()?;

    Ok(())
}
