//! 候補パスの格子
//!
//! 各位置`i`について、単語列`W[0..i]`を覆う候補パスを保持します。
//! パスは新しいステップを先頭とする永続的な連結リストとしてアリーナに格納され、
//! 共通の末尾は候補間で共有されます。
use std::cmp::Ordering;
use std::iter;

use crate::common::{BEAM_WIDTH, UNKNOWN_PENALTY, UNKNOWN_STEP_TAG, UNKNOWN_TAG};
use crate::vocabulary::trie::{NodeIdx, SequenceTrie};

const NO_PATH: u32 = u32::MAX;

/// 未知スパンの種類。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnknownSpan {
    /// 読み飛ばされるスパン。結果には何も残りません。
    Ignored,
    /// 認識できなかったスパン。
    Error,
    /// 独立した記述として生のテキストのまま残るスパン。
    Raw(Box<str>),
}

/// パスの1ステップ。
#[derive(Clone, Debug)]
pub enum Step {
    /// 語彙のキーに一致したスパン。
    Matched { pos: u32, node: NodeIdx },
    /// 語彙に一致しなかったスパン。
    Unknown { pos: u32, span: UnknownSpan },
}

impl Step {
    #[inline(always)]
    pub fn pos(&self) -> u32 {
        match self {
            Self::Matched { pos, .. } | Self::Unknown { pos, .. } => *pos,
        }
    }

    #[inline(always)]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }

    /// ステップのタグ指定。未知スパンは`UNKNOWN`のみを持ちます。
    pub(crate) fn tag_spec<'a>(&'a self, trie: &'a SequenceTrie) -> StrSeq<'a> {
        match self {
            Self::Matched { node, .. } => StrSeq::Slice(trie.node(*node).tag_alternatives()),
            Self::Unknown { .. } => StrSeq::One(UNKNOWN_STEP_TAG),
        }
    }

    /// ステップの話題指定。未知スパンでは、その種類に応じた値になります。
    pub(crate) fn topic_spec<'a>(&'a self, trie: &'a SequenceTrie) -> StrSeq<'a> {
        match self {
            Self::Matched { node, .. } => StrSeq::Slice(trie.node(*node).topic_alternatives()),
            Self::Unknown { span, .. } => match span {
                UnknownSpan::Ignored => StrSeq::Empty,
                UnknownSpan::Error => StrSeq::One(UNKNOWN_TAG),
                UnknownSpan::Raw(text) => StrSeq::One(text),
            },
        }
    }

    fn cmp_with(&self, other: &Self, trie: &SequenceTrie) -> Ordering {
        self.pos()
            .cmp(&other.pos())
            .then_with(|| self.tag_spec(trie).iter().cmp(other.tag_spec(trie).iter()))
            .then_with(|| {
                self.topic_spec(trie)
                    .iter()
                    .cmp(other.topic_spec(trie).iter())
            })
    }
}

/// 文字列の列。トライの候補か、単一の文字列か、空です。
#[derive(Clone, Copy)]
pub(crate) enum StrSeq<'a> {
    Slice(&'a [String]),
    One(&'a str),
    Empty,
}

impl<'a> StrSeq<'a> {
    pub(crate) fn iter(self) -> impl Iterator<Item = &'a str> {
        let (slice, one): (&'a [String], _) = match self {
            Self::Slice(s) => (s, None),
            Self::One(s) => (&[], Some(s)),
            Self::Empty => (&[], None),
        };
        slice.iter().map(String::as_str).chain(one)
    }
}

/// パスへの参照。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathIdx(u32);

impl PathIdx {
    /// ステップを持たない空のパス
    pub const EMPTY: Self = Self(NO_PATH);
}

struct PathNode {
    step: Step,
    prev: PathIdx,
    len: u32,
    has_unknown: bool,
}

/// 候補パスの格子。
///
/// ワーカーが所有し、入力ごとに [`PathLattice::reset`] で再利用されます。
pub struct PathLattice {
    arena: Vec<PathNode>,
    ends: Vec<Vec<PathIdx>>,
    len: usize, // live positions; `ends` keeps its buffers past this
}

impl Default for PathLattice {
    fn default() -> Self {
        let mut lattice = Self {
            arena: vec![],
            ends: vec![],
            len: 0,
        };
        lattice.reset();
        lattice
    }
}

impl PathLattice {
    /// 格子を初期状態に戻します。位置0には空のパスのみが置かれます。
    pub fn reset(&mut self) {
        self.arena.clear();
        for paths in &mut self.ends[..self.len] {
            paths.clear();
        }
        self.len = 0;
        self.open_position();
        self.ends[0].push(PathIdx::EMPTY);
    }

    /// 位置を1つ追加し、その番号を返します。
    pub fn open_position(&mut self) -> usize {
        if self.ends.len() <= self.len {
            self.ends.push(vec![]);
        }
        self.len += 1;
        self.len - 1
    }

    /// 位置の数。単語数より1つ多くなります。
    #[inline(always)]
    pub fn num_positions(&self) -> usize {
        self.len
    }

    /// 位置`pos`で終わる候補パス
    #[inline(always)]
    pub fn paths(&self, pos: usize) -> &[PathIdx] {
        &self.ends[pos]
    }

    /// 位置`pos`に候補パスを追加します。
    #[inline(always)]
    pub fn push_path(&mut self, pos: usize, path: PathIdx) {
        self.ends[pos].push(path);
    }

    /// 位置`pos`の候補パスを置き換えます。
    pub fn set_paths(&mut self, pos: usize, paths: &[PathIdx]) {
        let slot = &mut self.ends[pos];
        slot.clear();
        slot.extend_from_slice(paths);
    }

    /// `prev`の先頭に`step`を追加したパスを作成します。
    pub fn extend(&mut self, prev: PathIdx, step: Step) -> PathIdx {
        let (len, has_unknown) = match self.node(prev) {
            Some(node) => (node.len + 1, node.has_unknown || step.is_unknown()),
            None => (1, step.is_unknown()),
        };
        let idx = PathIdx(self.arena.len() as u32);
        self.arena.push(PathNode {
            step,
            prev,
            len,
            has_unknown,
        });
        idx
    }

    #[inline(always)]
    fn node(&self, path: PathIdx) -> Option<&PathNode> {
        if path == PathIdx::EMPTY {
            None
        } else {
            Some(&self.arena[path.0 as usize])
        }
    }

    /// パスのステップ数
    pub fn path_len(&self, path: PathIdx) -> usize {
        self.node(path).map_or(0, |node| node.len as usize)
    }

    /// パスの重み。ステップ数に、未知スパンを含む場合のペナルティを加えたものです。
    pub fn weight(&self, path: PathIdx) -> usize {
        match self.node(path) {
            Some(node) if node.has_unknown => node.len as usize + UNKNOWN_PENALTY,
            Some(node) => node.len as usize,
            None => 0,
        }
    }

    /// パスのステップを新しいものから順に列挙します。
    pub fn steps(&self, path: PathIdx) -> impl Iterator<Item = &Step> {
        iter::successors(self.node(path), |node| self.node(node.prev)).map(|node| &node.step)
    }

    /// 2つのパスを先頭のステップから辞書式に比較します。短いパスが先になります。
    pub fn cmp_paths(&self, a: PathIdx, b: PathIdx, trie: &SequenceTrie) -> Ordering {
        let (mut a, mut b) = (a, b);
        loop {
            if a == b {
                return Ordering::Equal;
            }
            match (self.node(a), self.node(b)) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(x), Some(y)) => match x.step.cmp_with(&y.step, trie) {
                    Ordering::Equal => {
                        a = x.prev;
                        b = y.prev;
                    }
                    ord => return ord,
                },
            }
        }
    }

    fn cmp_ranked(&self, a: PathIdx, b: PathIdx, trie: &SequenceTrie) -> Ordering {
        self.weight(a)
            .cmp(&self.weight(b))
            .then_with(|| self.cmp_paths(a, b, trie))
    }

    /// 候補を重みと内容の順に並べ、上位 [`BEAM_WIDTH`] 件に絞り込みます。
    pub fn prune(&self, candidates: &mut Vec<PathIdx>, trie: &SequenceTrie) {
        candidates.sort_by(|&a, &b| self.cmp_ranked(a, b, trie));
        candidates.truncate(BEAM_WIDTH);
    }

    /// 最終位置の候補から最良のパスを選びます。候補がなければ`None`を返します。
    pub fn best_path(&self, trie: &SequenceTrie) -> Option<PathIdx> {
        self.paths(self.len - 1)
            .iter()
            .copied()
            .min_by(|&a, &b| self.cmp_ranked(a, b, trie))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_trie() -> (SequenceTrie, NodeIdx, NodeIdx) {
        let mut trie = SequenceTrie::new();
        let archaic = trie.insert_path(["archaic"]).unwrap();
        trie.push_alternatives(archaic, "archaic".to_string(), String::new());
        let rare = trie.insert_path(["rare"]).unwrap();
        trie.push_alternatives(rare, "rare".to_string(), String::new());
        (trie, archaic, rare)
    }

    #[test]
    fn test_reset() {
        let mut lattice = PathLattice::default();
        assert_eq!(1, lattice.num_positions());
        assert_eq!(&[PathIdx::EMPTY], lattice.paths(0));

        let pos = lattice.open_position();
        lattice.push_path(pos, PathIdx::EMPTY);
        lattice.reset();
        assert_eq!(1, lattice.num_positions());
        assert_eq!(&[PathIdx::EMPTY], lattice.paths(0));
    }

    #[test]
    fn test_weight_and_steps() {
        let (_, archaic, _) = test_trie();
        let mut lattice = PathLattice::default();
        let p1 = lattice.extend(PathIdx::EMPTY, Step::Matched { pos: 0, node: archaic });
        let p2 = lattice.extend(
            p1,
            Step::Unknown {
                pos: 1,
                span: UnknownSpan::Error,
            },
        );
        assert_eq!(0, lattice.weight(PathIdx::EMPTY));
        assert_eq!(1, lattice.weight(p1));
        assert_eq!(102, lattice.weight(p2));
        assert_eq!(2, lattice.path_len(p2));

        let positions: Vec<u32> = lattice.steps(p2).map(Step::pos).collect();
        assert_eq!(vec![1, 0], positions);
    }

    #[test]
    fn test_prune_orders_by_weight_then_content() {
        let (trie, archaic, rare) = test_trie();
        let mut lattice = PathLattice::default();
        let unknown = lattice.extend(
            PathIdx::EMPTY,
            Step::Unknown {
                pos: 0,
                span: UnknownSpan::Raw("for boron".into()),
            },
        );
        let rare_path = lattice.extend(PathIdx::EMPTY, Step::Matched { pos: 0, node: rare });
        let archaic_path =
            lattice.extend(PathIdx::EMPTY, Step::Matched { pos: 0, node: archaic });

        let mut candidates = vec![unknown, rare_path, archaic_path];
        lattice.prune(&mut candidates, &trie);
        assert_eq!(vec![archaic_path, rare_path, unknown], candidates);
    }

    #[test]
    fn test_prune_truncates() {
        let (trie, archaic, _) = test_trie();
        let mut lattice = PathLattice::default();
        let mut candidates = vec![];
        for pos in 0..15 {
            candidates.push(lattice.extend(PathIdx::EMPTY, Step::Matched { pos, node: archaic }));
        }
        let first = candidates[0];
        candidates.reverse();
        lattice.prune(&mut candidates, &trie);
        assert_eq!(BEAM_WIDTH, candidates.len());
        assert_eq!(first, candidates[0]);
    }

    #[test]
    fn test_shorter_path_is_less() {
        let (trie, archaic, _) = test_trie();
        let mut lattice = PathLattice::default();
        let short = lattice.extend(PathIdx::EMPTY, Step::Matched { pos: 0, node: archaic });
        let long = lattice.extend(
            short,
            Step::Matched { pos: 0, node: archaic },
        );
        assert_eq!(Ordering::Less, lattice.cmp_paths(PathIdx::EMPTY, short, &trie));
        assert_eq!(Ordering::Less, lattice.cmp_paths(short, long, &trie));
        assert_eq!(Ordering::Equal, lattice.cmp_paths(long, long, &trie));
    }
}
