//! 話題の語彙と一般化の表

use std::collections::{HashMap, HashSet, VecDeque};

use rkyv::{Archive, Deserialize, Serialize};

/// 話題の語彙と、特定の話題からより広い話題への対応
#[derive(Default, Debug, Archive, Serialize, Deserialize)]
pub struct TopicTable {
    topics: HashSet<String>,
    broader: HashMap<String, Vec<String>>,
}

impl TopicTable {
    pub(crate) fn insert(&mut self, topic: &str) {
        self.topics.insert(topic.to_string());
    }

    pub(crate) fn insert_broader(&mut self, topic: &str, broader: &[String]) {
        self.broader
            .entry(topic.to_string())
            .or_default()
            .extend(broader.iter().cloned());
    }

    /// 話題が語彙に含まれるかを判定します。
    #[inline(always)]
    pub fn contains(&self, topic: &str) -> bool {
        self.topics.contains(topic)
    }

    /// 登録されている話題の数
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// 話題が1つも登録されていないかどうか
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// 登録されている話題を列挙します。順序は不定です。
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(String::as_str)
    }

    /// 話題を推移的に一般化した話題を幅優先順で返します。
    ///
    /// 結果に`topic`自身は含まれません。循環する対応があっても停止します。
    ///
    /// # 例
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use wikitag::Vocabulary;
    ///
    /// let vocab = Vocabulary::bundled()?;
    /// let chain = vocab.topics().generalize("sailing");
    /// assert_eq!(chain, vec!["nautical", "transport"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn generalize(&self, topic: &str) -> Vec<&str> {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(topic);
        let mut result = vec![];
        let mut queue: VecDeque<&str> = VecDeque::from([topic]);
        while let Some(cur) = queue.pop_front() {
            let Some(broader) = self.broader.get(cur) else {
                continue;
            };
            for b in broader.iter().flat_map(|b| b.split_whitespace()) {
                if visited.insert(b) {
                    result.push(b);
                    queue.push_back(b);
                }
            }
        }
        result
    }
}
