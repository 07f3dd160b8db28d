//! ビーム探索に基づくタグデコーダー。
//!
//! このモジュールは、自由記述の修飾句を語彙のタグと話題に分割するデコーダーを提供します。
//! 句は区切り記号で部分に分けられ、各部分の単語列がトライ上で照合されます。
//! 各位置では最大 [`BEAM_WIDTH`](crate::common::BEAM_WIDTH) 本の候補パスが保持され、
//! 語彙に一致しないスパンは未知スパンとしてパスに残ります。
//!
//! # 主要な構造体
//!
//! - [`Decoder`]: 語彙を共有するデコーダー
//! - [`Worker`]: 格子とキャッシュを保持し、実際のデコードを行うワーカー
//!
//! # 例
//!
//! ```
//! use wikitag::{DecodeOptions, Decoder, Vocabulary};
//!
//! let decoder = Decoder::new(Vocabulary::bundled()?);
//! let mut worker = decoder.new_worker();
//!
//! let result = worker.decode_tags("archaic, dialectal", DecodeOptions::default());
//! assert_eq!(result.tag_sets(), &[vec!["archaic".to_string(), "dialectal".to_string()]]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub(crate) mod assembler;
pub mod lattice;
pub mod worker;

use std::sync::Arc;

use crate::common::{IGNORED_CONJUNCTIONS, IGNORED_UNKNOWN_PREFIXES, is_allowed_unknown_start};
use crate::decoder::lattice::{PathIdx, PathLattice, Step, UnknownSpan};
use crate::decoder::worker::Worker;
use crate::utils::split_at_separators;
use crate::vocabulary::Vocabulary;
use crate::vocabulary::trie::{NodeIdx, SequenceTrie};

/// 既定のキャッシュ容量（オプションの組ごと）。
pub const DEFAULT_CACHE_CAPACITY: usize = 65536;

/// デコードのオプション。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DecodeOptions {
    /// 未知スパンをすべて生のテキストとして残します。
    pub allow_any: bool,
    /// 未知スパンの開始語による例外を無効にします。
    pub no_unknown_starts: bool,
}

impl DecodeOptions {
    /// すべてのオプションが無効な設定を作成します。
    pub const fn new() -> Self {
        Self {
            allow_any: false,
            no_unknown_starts: false,
        }
    }

    /// 未知スパンをすべて生のテキストとして残すかどうかを設定します。
    pub const fn allow_any(mut self, yes: bool) -> Self {
        self.allow_any = yes;
        self
    }

    /// 未知スパンの開始語による例外を無効にするかどうかを設定します。
    pub const fn no_unknown_starts(mut self, yes: bool) -> Self {
        self.no_unknown_starts = yes;
        self
    }

    #[inline(always)]
    pub(crate) const fn slot(self) -> usize {
        (self.allow_any as usize) | ((self.no_unknown_starts as usize) << 1)
    }
}

/// タグデコーダー。
///
/// 語彙を`Arc`で共有するため、複製は安価です。スレッドごとに複製して
/// [`Decoder::new_worker`] でワーカーを作成してください。
#[derive(Clone)]
pub struct Decoder {
    vocab: Arc<Vocabulary>,
    cache_capacity: Option<usize>,
}

impl Decoder {
    /// 新しいデコーダーを作成します。
    ///
    /// # 引数
    ///
    /// * `vocab` - 使用する語彙
    pub fn new(vocab: Vocabulary) -> Self {
        Self::from_shared_vocabulary(Arc::new(vocab))
    }

    /// 共有された語彙からデコーダーを作成します。
    pub fn from_shared_vocabulary(vocab: Arc<Vocabulary>) -> Self {
        Self {
            vocab,
            cache_capacity: Some(DEFAULT_CACHE_CAPACITY),
        }
    }

    /// ワーカーごとのキャッシュ容量を設定します。
    ///
    /// 容量に達したキャッシュは消去されてから再び使われます。
    ///
    /// # 引数
    ///
    /// * `capacity` - オプションの組ごとの最大エントリ数。`None`の場合は無制限、
    ///   `Some(0)`の場合はキャッシュしません。
    pub fn cache_capacity(mut self, capacity: Option<usize>) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// 語彙への参照を取得します。
    #[inline(always)]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> Option<usize> {
        self.cache_capacity
    }

    /// 新しいワーカーを作成します。
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }

    /// `text`の候補パスの格子を構築します。
    ///
    /// 構築後、格子の最終位置には入力全体を覆う候補パスが置かれます。
    pub(crate) fn build_lattice(&self, text: &str, options: DecodeOptions, lattice: &mut PathLattice) {
        lattice.reset();
        let mut search = Search {
            trie: self.vocab.trie(),
            options,
            lattice,
            words: vec![],
            cursors: vec![],
            next: vec![],
            candidates: vec![],
            max_last: 0,
        };
        for part in split_at_separators(text) {
            search.add_part(part);
        }
    }
}

/// トライ上で照合中の位置。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cursor {
    node: NodeIdx,
    /// 照合中のキーが始まった単語位置
    start: usize,
    /// 直前の一致が終わった単語位置
    last: usize,
}

struct Search<'a> {
    trie: &'a SequenceTrie,
    options: DecodeOptions,
    lattice: &'a mut PathLattice,
    words: Vec<&'a str>,
    cursors: Vec<Cursor>,
    next: Vec<Cursor>,
    candidates: Vec<PathIdx>,
    max_last: usize,
}

impl<'a> Search<'a> {
    fn add_part(&mut self, part: &'a str) {
        self.max_last = self.words.len();
        let start = self.words.len();
        self.words.extend(part.split_whitespace());
        if self.words.len() == start {
            return;
        }
        self.cursors.clear();
        for i in start..self.words.len() {
            self.advance(i);
        }
        self.close_part();
    }

    /// 未知スパンの途中で新たな照合を始めてよいかどうか。
    fn may_restart(&self, i: usize, last: usize) -> bool {
        i == last
            || self.options.no_unknown_starts
            || !is_allowed_unknown_start(self.words[last])
    }

    fn advance(&mut self, i: usize) {
        let w = self.words[i];
        let root_child = self.trie.child(NodeIdx::ROOT, w);
        self.next.clear();
        self.candidates.clear();

        let cursors = std::mem::take(&mut self.cursors);
        for c in &cursors {
            let child = self.trie.child(c.node, w);
            let terminal = self.trie.node(c.node).is_terminal();
            if let Some(child) = child {
                self.max_last = self.add_new(child, i, c.start, c.last);
            }
            if terminal && let Some(root) = root_child {
                self.max_last = self.add_new(root, i, i, i);
            }
            if child.is_none()
                && !terminal
                && self.may_restart(i, c.last)
                && let Some(root) = root_child
            {
                self.max_last = self.add_new(root, i, i, c.last);
            }
        }
        if self.next.is_empty()
            && self.may_restart(i, self.max_last)
            && let Some(root) = root_child
        {
            self.max_last = self.add_new(root, i, i, self.max_last);
        }
        self.cursors = cursors;
        std::mem::swap(&mut self.cursors, &mut self.next);

        let mut candidates = std::mem::take(&mut self.candidates);
        self.lattice.prune(&mut candidates, self.trie);
        let pos = self.lattice.open_position();
        self.lattice.set_paths(pos, &candidates);
        self.candidates = candidates;
    }

    /// 照合位置を記録し、終端ノードであれば新しい候補パスを作ります。
    ///
    /// 新しい最終一致位置を返します。
    fn add_new(&mut self, node: NodeIdx, i: usize, start: usize, last: usize) -> usize {
        let cursor = Cursor { node, start, last };
        if !self.next.contains(&cursor) {
            self.next.push(cursor);
        }
        if !self.trie.node(node).is_terminal() {
            return last;
        }
        let unknown = self.check_unknown(last, start);
        for k in 0..self.lattice.paths(last).len() {
            let mut path = self.lattice.paths(last)[k];
            if let Some(step) = &unknown {
                path = self.lattice.extend(path, step.clone());
            }
            path = self.lattice.extend(
                path,
                Step::Matched {
                    pos: last as u32,
                    node,
                },
            );
            self.candidates.push(path);
        }
        i + 1
    }

    /// 部分の終わりで、照合中の位置を閉じます。
    fn close_part(&mut self) {
        let end = self.lattice.num_positions() - 1;
        let len = self.words.len();
        if self.cursors.is_empty() {
            let from = self.max_last;
            // 末尾が単独の接続詞であれば、それまでのパスをそのまま引き継ぐ
            let unknown = self.check_unknown(from, len);
            let mut paths = self.lattice.paths(from).to_vec();
            if paths.is_empty() {
                paths.push(PathIdx::EMPTY);
            }
            for prev in paths {
                let path = match &unknown {
                    Some(step) => self.lattice.extend(prev, step.clone()),
                    None => prev,
                };
                self.lattice.push_path(end, path);
            }
            return;
        }

        let cursors = std::mem::take(&mut self.cursors);
        for c in &cursors {
            if self.trie.node(c.node).is_terminal() {
                for k in 0..self.lattice.paths(c.start).len() {
                    let prev = self.lattice.paths(c.start)[k];
                    let path = self.lattice.extend(
                        prev,
                        Step::Matched {
                            pos: c.last as u32,
                            node: c.node,
                        },
                    );
                    self.lattice.push_path(end, path);
                }
                continue;
            }
            let unknown = self.check_unknown(c.last, len);
            let num_paths = self.lattice.paths(c.start).len();
            if num_paths == 0 {
                let path = match unknown {
                    Some(step) => self.lattice.extend(PathIdx::EMPTY, step),
                    None => PathIdx::EMPTY,
                };
                self.lattice.push_path(end, path);
                continue;
            }
            for k in 0..num_paths {
                let mut path = self.lattice.paths(c.start)[k];
                if let Some(step) = &unknown {
                    path = self.lattice.extend(path, step.clone());
                }
                self.lattice.push_path(end, path);
            }
        }
        self.cursors = cursors;
    }

    /// 単語位置`from..to`の未知スパンを分類します。
    ///
    /// 空のスパンと、単独の接続詞は`None`になります。
    fn check_unknown(&self, from: usize, to: usize) -> Option<Step> {
        if from >= to {
            return None;
        }
        let words = &self.words[from..to];
        let text = words.join(" ");
        let pos = from as u32;
        let ignored = IGNORED_UNKNOWN_PREFIXES.iter().any(|prefix| {
            text.strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with(' '))
        });
        if ignored {
            return Some(Step::Unknown {
                pos,
                span: UnknownSpan::Ignored,
            });
        }
        if IGNORED_CONJUNCTIONS.contains(&text.as_str()) {
            return None;
        }
        let first = words[0];
        let is_error = !self.options.allow_any
            && !first.starts_with('~')
            && (self.options.no_unknown_starts
                || !is_allowed_unknown_start(first)
                || words.len() <= 1);
        let span = if is_error {
            UnknownSpan::Error
        } else {
            UnknownSpan::Raw(text.into_boxed_str())
        };
        Some(Step::Unknown { pos, span })
    }
}
