//! 複数語キーのトライ
//!
//! 空白で区切られた単語列をキーとするトライを、ノードのアリーナと
//! 単語から子ノード番号へのマップで表現します。

use std::collections::HashMap;

use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::Result;
use crate::utils::FromU32;

/// トライノードの番号
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(u32);

impl NodeIdx {
    /// ルートノード
    pub const ROOT: Self = Self(0);

    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        usize::from_u32(self.0)
    }
}

/// トライのノード
///
/// 終端ノードはキーの終わりを表し、そのキーに対応するタグと話題の
/// 候補を保持します。候補はそれぞれ空白区切りの1つの文字列です。
#[derive(Default, Debug, Archive, Serialize, Deserialize)]
pub struct TrieNode {
    terminal: bool,
    tags: Vec<String>,
    topics: Vec<String>,
    children: HashMap<String, u32>,
}

impl TrieNode {
    /// このノードでキーが終わるかどうか。
    #[inline(always)]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// タグの候補。各候補は空白区切りのタグ列です。
    #[inline(always)]
    pub fn tag_alternatives(&self) -> &[String] {
        &self.tags
    }

    /// 話題の候補。各候補は空白区切りの話題列です。
    #[inline(always)]
    pub fn topic_alternatives(&self) -> &[String] {
        &self.topics
    }
}

/// 複数語キーのトライ
#[derive(Debug, Archive, Serialize, Deserialize)]
pub struct SequenceTrie {
    nodes: Vec<TrieNode>,
}

impl Default for SequenceTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceTrie {
    /// ルートノードのみを持つトライを作成します。
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    /// 単語列をたどり、存在しないノードを作成して終端ノードの番号を返します。
    ///
    /// 返されるノードは終端としてマークされます。
    pub(crate) fn insert_path<'a, I>(&mut self, words: I) -> Result<NodeIdx>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut cur = NodeIdx::ROOT;
        for word in words {
            cur = match self.child(cur, word) {
                Some(next) => next,
                None => {
                    let next = u32::try_from(self.nodes.len())?;
                    self.nodes.push(TrieNode::default());
                    self.nodes[cur.index()]
                        .children
                        .insert(word.to_string(), next);
                    NodeIdx(next)
                }
            };
        }
        self.nodes[cur.index()].terminal = true;
        Ok(cur)
    }

    /// 終端ノードにタグと話題の候補を追加します。
    ///
    /// 空の候補は追加されません。
    pub(crate) fn push_alternatives(&mut self, idx: NodeIdx, tags: String, topics: String) {
        let node = &mut self.nodes[idx.index()];
        if !tags.is_empty() {
            node.tags.push(tags);
        }
        if !topics.is_empty() {
            node.topics.push(topics);
        }
    }

    /// ノードを取得します。
    #[inline(always)]
    pub fn node(&self, idx: NodeIdx) -> &TrieNode {
        &self.nodes[idx.index()]
    }

    /// `word`に対応する子ノードを取得します。
    #[inline(always)]
    pub fn child(&self, idx: NodeIdx, word: &str) -> Option<NodeIdx> {
        self.nodes[idx.index()].children.get(word).map(|&i| NodeIdx(i))
    }

    /// 空白区切りのキー全体をたどり、終端ノードを返します。
    pub fn lookup(&self, key: &str) -> Option<&TrieNode> {
        let mut cur = NodeIdx::ROOT;
        for word in key.split_whitespace() {
            cur = self.child(cur, word)?;
        }
        let node = self.node(cur);
        (cur != NodeIdx::ROOT && node.is_terminal()).then_some(node)
    }

    /// ノード数を取得します。
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// 登録されたすべてのキーを辞書順に列挙します。
    pub fn keys(&self) -> Vec<(String, &TrieNode)> {
        let mut keys = vec![];
        let mut stack = vec![(String::new(), NodeIdx::ROOT)];
        while let Some((prefix, idx)) = stack.pop() {
            let node = self.node(idx);
            if idx != NodeIdx::ROOT && node.is_terminal() {
                keys.push((prefix.clone(), node));
            }
            for (word, &child) in &node.children {
                let key = if prefix.is_empty() {
                    word.clone()
                } else {
                    format!("{prefix} {word}")
                };
                stack.push((key, NodeIdx(child)));
            }
        }
        keys.sort_by(|a, b| a.0.cmp(&b.0));
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut trie = SequenceTrie::new();
        let idx = trie.insert_path("simple past".split(' ')).unwrap();
        trie.push_alternatives(idx, "past".to_string(), String::new());

        assert!(trie.lookup("simple").is_none());
        let node = trie.lookup("simple past").unwrap();
        assert!(node.is_terminal());
        assert_eq!(&["past".to_string()], node.tag_alternatives());
        assert!(node.topic_alternatives().is_empty());
        assert_eq!(3, trie.num_nodes());
    }

    #[test]
    fn test_insert_shares_prefix() {
        let mut trie = SequenceTrie::new();
        trie.insert_path("past participle".split(' ')).unwrap();
        trie.insert_path("past tense".split(' ')).unwrap();
        trie.insert_path(["past"]).unwrap();
        assert_eq!(4, trie.num_nodes());

        let past = trie.child(NodeIdx::ROOT, "past").unwrap();
        assert!(trie.node(past).is_terminal());
        assert!(trie.child(past, "participle").is_some());
        assert!(trie.child(past, "tense").is_some());
        assert!(trie.child(past, "past").is_none());
    }

    #[test]
    fn test_alternatives_accumulate() {
        let mut trie = SequenceTrie::new();
        let idx = trie.insert_path(["m"]).unwrap();
        trie.push_alternatives(idx, "masculine".to_string(), String::new());
        let again = trie.insert_path(["m"]).unwrap();
        trie.push_alternatives(again, "meter".to_string(), "units".to_string());
        assert_eq!(idx, again);

        let node = trie.node(idx);
        assert_eq!(&["masculine".to_string(), "meter".to_string()], node.tag_alternatives());
        assert_eq!(&["units".to_string()], node.topic_alternatives());
    }

    #[test]
    fn test_keys_sorted() {
        let mut trie = SequenceTrie::new();
        trie.insert_path("b a".split(' ')).unwrap();
        trie.insert_path(["a"]).unwrap();
        trie.insert_path(["b"]).unwrap();
        let keys: Vec<_> = trie.keys().into_iter().map(|(k, _)| k).collect();
        assert_eq!(vec!["a", "b", "b a"], keys);
    }
}
