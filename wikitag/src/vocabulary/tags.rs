//! タグとカテゴリの表
//!
//! 各タグはちょうど1つのカテゴリに属し、カテゴリは表示順を決める優先度を持ちます。

use std::collections::HashMap;

use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::{Result, WikitagError};
use crate::utils::{parse_csv_row, table_lines};

/// 未登録のタグに使われるカテゴリ名。
const UNKNOWN_CATEGORY: &str = "unknown";

/// タグの語彙とカテゴリの優先度
#[derive(Default, Debug, Archive, Serialize, Deserialize)]
pub struct TagTable {
    priorities: HashMap<String, i32>,
    categories: HashMap<String, String>,
}

impl TagTable {
    /// `category,priority`形式のCSVからカテゴリ表を読み込みます。
    ///
    /// # エラー
    ///
    /// 列数が足りない行や、優先度が整数でない行がある場合にエラーを返します。
    pub(crate) fn parse_categories(&mut self, text: &str) -> Result<()> {
        for line in table_lines(text) {
            let fields = parse_csv_row(line)?;
            let [category, priority] = fields.as_slice() else {
                return Err(WikitagError::invalid_format(
                    "tag_categories.csv",
                    format!("expected 2 fields: {line}"),
                ));
            };
            let priority = priority.trim().parse().map_err(|_| {
                WikitagError::invalid_format(
                    "tag_categories.csv",
                    format!("invalid priority: {line}"),
                )
            })?;
            self.priorities.insert(category.trim().to_string(), priority);
        }
        Ok(())
    }

    /// `tag,category`形式のCSVからタグを読み込みます。
    ///
    /// # エラー
    ///
    /// 列数が足りない行や、未定義のカテゴリを参照する行がある場合にエラーを返します。
    pub(crate) fn parse_tags(&mut self, text: &str) -> Result<()> {
        for line in table_lines(text) {
            let fields = parse_csv_row(line)?;
            let [tag, category] = fields.as_slice() else {
                return Err(WikitagError::invalid_format(
                    "tags.csv",
                    format!("expected 2 fields: {line}"),
                ));
            };
            self.insert(tag.trim(), category.trim())?;
        }
        Ok(())
    }

    /// タグを登録します。
    ///
    /// # エラー
    ///
    /// カテゴリ表が空でなく、`category`がそこに含まれない場合にエラーを返します。
    pub(crate) fn insert(&mut self, tag: &str, category: &str) -> Result<()> {
        if !self.priorities.is_empty() && !self.priorities.contains_key(category) {
            return Err(WikitagError::invalid_argument(
                "category",
                format!("tag {tag:?} refers to undefined category {category:?}"),
            ));
        }
        self.categories.insert(tag.to_string(), category.to_string());
        Ok(())
    }

    /// タグが語彙に含まれるかを判定します。
    #[inline(always)]
    pub fn contains(&self, tag: &str) -> bool {
        self.categories.contains_key(tag)
    }

    /// タグのカテゴリを取得します。
    pub fn category(&self, tag: &str) -> Option<&str> {
        self.categories.get(tag).map(String::as_str)
    }

    /// タグの表示優先度を取得します。
    ///
    /// 未登録のタグは`unknown`カテゴリとして扱われ、カテゴリ表にない場合は0になります。
    pub fn priority(&self, tag: &str) -> i32 {
        let category = self.category(tag).unwrap_or(UNKNOWN_CATEGORY);
        self.priorities.get(category).copied().unwrap_or(0)
    }

    /// 登録されているタグの数
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// タグが1つも登録されていないかどうか
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// 登録されているタグを列挙します。順序は不定です。
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// タグ列を表示順に並べ替え、重複を取り除きます。
    ///
    /// 優先度の高いカテゴリのタグが先に来ます。同じ優先度では短いタグが先になり、
    /// 長さも同じ場合は辞書順です。
    pub fn sort_tags<S>(&self, tags: &[S]) -> Vec<String>
    where
        S: AsRef<str>,
    {
        let mut sorted: Vec<String> = tags.iter().map(|t| t.as_ref().to_string()).collect();
        sorted.sort_by(|a, b| {
            self.sort_key(b)
                .cmp(&self.sort_key(a))
                .then_with(|| a.cmp(b))
        });
        sorted.dedup();
        sorted
    }

    fn sort_key(&self, tag: &str) -> i64 {
        i64::from(self.priority(tag)) * 1000 - tag.chars().count() as i64
    }
}
