//! ユーティリティ関数と型変換トレイトを提供するモジュール
//!
//! このモジュールには、語彙表の読み込みと入力文の前処理に使うヘルパーが含まれています。
//!
//! - `FromU32`: u32からの型変換トレイト
//! - CSV行の解析と語彙表の行の列挙
//! - 区切り記号での文の分割

use csv_core::ReadFieldResult;

use crate::common::HARD_SEPARATORS;
use crate::errors::{Result, WikitagError};

/// u32から他の型への変換を提供するトレイト
pub trait FromU32 {
    /// u32値から実装型を生成する
    fn from_u32(src: u32) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl FromU32 for usize {
    #[inline(always)]
    fn from_u32(src: u32) -> Self {
        // Since the pointer width is guaranteed to be 32 or 64,
        // the following process always succeeds.
        unsafe { Self::try_from(src).unwrap_unchecked() }
    }
}

/// CSV形式の行を解析してフィールドのベクターに分割する
///
/// ダブルクォートで囲まれたフィールドや、フィールド内のカンマも正しく処理します。
///
/// # 引数
///
/// * `row` - 解析するCSV形式の文字列
///
/// # 戻り値
///
/// 解析されたフィールドを格納する文字列のベクター
///
/// # エラー
///
/// フィールドが内部バッファに収まらない場合に[`WikitagError`]を返します。
///
/// # 例
///
/// ```
/// # use wikitag::utils::parse_csv_row;
/// let fields = parse_csv_row("sg,singular").unwrap();
/// assert_eq!(fields, vec!["sg", "singular"]);
///
/// let fields_with_quote = parse_csv_row("\"m, f\",masculine feminine").unwrap();
/// assert_eq!(fields_with_quote, vec!["m, f", "masculine feminine"]);
/// ```
pub fn parse_csv_row(row: &str) -> Result<Vec<String>> {
    let mut fields = vec![];
    let mut rdr = csv_core::Reader::new();
    let mut bytes = row.as_bytes();
    let mut output = [0; 4096];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        let end = match result {
            ReadFieldResult::InputEmpty => true,
            ReadFieldResult::Field { record_end } => record_end,
            // 末尾の空フィールドは直前の`Field`で返されている
            ReadFieldResult::End => break,
            ReadFieldResult::OutputFull => {
                return Err(WikitagError::invalid_format("csv", "Field too large"));
            }
        };
        fields.push(std::str::from_utf8(&output[..nout])?.to_string());
        if end {
            break;
        }
        bytes = &bytes[nin..];
    }
    Ok(fields)
}

/// 語彙表の有効な行を列挙します。
///
/// 前後の空白を取り除き、空行と`#`で始まるコメント行を読み飛ばします。
pub(crate) fn table_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// 括弧の外側にある区切り記号で文を分割します。
///
/// `()`と`[]`の内側にある区切り記号では分割しません。分割後の各部分は前後の空白が
/// 取り除かれ、空の部分は返されません。ただし、入力全体が区切り記号1文字だけの
/// 場合は、その文字をそのまま1つの部分として返します。
///
/// # 例
///
/// ```
/// # use wikitag::utils::split_at_separators;
/// assert_eq!(split_at_separators("archaic, dialectal"), vec!["archaic", "dialectal"]);
/// assert_eq!(split_at_separators("a (b, c); d"), vec!["a (b, c)", "d"]);
/// assert_eq!(split_at_separators(","), vec![","]);
/// ```
pub fn split_at_separators(text: &str) -> Vec<&str> {
    let mut parts = vec![];
    let mut depth: isize = 0;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            _ if HARD_SEPARATORS.contains(&ch) => {
                if i == 0 && ch.len_utf8() == text.len() {
                    return vec![text];
                }
                if depth <= 0 {
                    let part = text[start..i].trim();
                    if !part.is_empty() {
                        parts.push(part);
                    }
                    start = i + ch.len_utf8();
                }
            }
            _ => {}
        }
    }
    let part = text[start..].trim();
    if !part.is_empty() {
        parts.push(part);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_row() {
        assert_eq!(
            &["archaic", "obsolete"],
            parse_csv_row("archaic,obsolete").unwrap().as_slice()
        );
    }

    #[test]
    fn test_parse_csv_row_with_quote() {
        assert_eq!(
            &["m, f", "masculine feminine"],
            parse_csv_row("\"m, f\",masculine feminine").unwrap().as_slice()
        );
    }

    #[test]
    fn test_parse_csv_row_with_empty_field() {
        assert_eq!(&["Audio", ""], parse_csv_row("Audio,").unwrap().as_slice());
        assert_eq!(&["", "rare"], parse_csv_row(",rare").unwrap().as_slice());
        assert_eq!(&["see below", ""], parse_csv_row("\"see below\",").unwrap().as_slice());
    }

    #[test]
    fn test_table_lines() {
        let text = "# comment\n archaic \n\nobsolete\n";
        assert_eq!(vec!["archaic", "obsolete"], table_lines(text).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_at_separators() {
        assert_eq!(vec!["a", "b", "c", "d"], split_at_separators("a, b; c: d"));
        assert_eq!(vec!["x", "y"], split_at_separators("x，y"));
        assert_eq!(vec!["only"], split_at_separators(",, only ,"));
    }

    #[test]
    fn test_split_at_separators_brackets() {
        assert_eq!(vec!["a (b, c)", "d [e; f]"], split_at_separators("a (b, c), d [e; f]"));
        // a stray closing paren does not suppress later splits
        assert_eq!(vec!["a)", "b"], split_at_separators("a), b"));
    }

    #[test]
    fn test_split_at_separators_lone_separator() {
        assert_eq!(vec![";"], split_at_separators(";"));
        assert!(split_at_separators("").is_empty());
        assert!(split_at_separators(" , ").is_empty());
    }
}
