//! wikitag 語彙コンパイラのメインエントリーポイント
//!
//! このモジュールは、タグと話題の語彙表からコンパイル済み語彙ファイルを作成し、
//! その内容を確認するためのサブコマンドを提供します。

mod build;
mod dump;

use clap::Parser;
use thiserror::Error;

use crate::{build::BuildError, dump::DumpError};

/// コマンドライン引数の構造体
///
/// `clap`を使用してコマンドライン引数をパースします。
#[derive(Parser, Debug)]
#[clap(name = "compiler", version)]
struct Cli {
    /// 実行するサブコマンド
    #[clap(subcommand)]
    command: Command,
}

/// 利用可能なサブコマンド
#[derive(Parser, Debug)]
enum Command {
    /// 語彙表のディレクトリからコンパイル済み語彙を構築します
    Build(build::Args),

    /// コンパイル済み語彙のキーと候補をTSV形式で出力します
    Dump(dump::Args),
}

/// コンパイラの実行中に発生する可能性のあるエラー
///
/// 各サブコマンドで発生したエラーをラップします。
#[derive(Debug, Error)]
pub enum CompileError {
    /// 語彙構築中のエラー
    #[error(transparent)]
    BuildError(#[from] BuildError),
    /// 語彙出力中のエラー
    #[error(transparent)]
    DumpError(#[from] DumpError),
}

/// メイン関数
///
/// コマンドライン引数をパースし、指定されたサブコマンドを実行します。
///
/// # エラー
///
/// 各サブコマンドの実行中にエラーが発生した場合、そのエラーが返されます。
fn main() -> Result<(), CompileError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Build(args) => Ok(build::run(args)?),
        Command::Dump(args) => Ok(dump::run(args)?),
    }
}
