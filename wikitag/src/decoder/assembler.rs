//! 最良パスからデコード結果を組み立てる
//!
//! タグの候補の直積を取ってタグ集合を展開し、話題は和集合として集めます。
use crate::common::{MAX_TAG_SETS, UNKNOWN_TAG};
use crate::decoder::lattice::{PathIdx, PathLattice, Step, UnknownSpan};
use crate::result::DecodeResult;
use crate::vocabulary::trie::SequenceTrie;

/// 整列済みで重複のないタグ集合に`tag`を加えます。
fn insert_sorted<'a>(set: &mut Vec<&'a str>, tag: &'a str) {
    if let Err(i) = set.binary_search(&tag) {
        set.insert(i, tag);
    }
}

/// パスのステップを新しいものから順に適用して結果を組み立てます。
///
/// いずれかのステップの適用前にタグ集合が [`MAX_TAG_SETS`] 個を超えていた場合は、
/// [`DecodeResult::exponential`] を返します。
pub(crate) fn assemble(lattice: &PathLattice, path: PathIdx, trie: &SequenceTrie) -> DecodeResult {
    let mut tag_sets: Vec<Vec<&str>> = vec![vec![]];
    let mut topics: Vec<&str> = vec![];

    for step in lattice.steps(path) {
        if tag_sets.len() > MAX_TAG_SETS {
            return DecodeResult::exponential();
        }
        match step {
            Step::Unknown { span, .. } => {
                let tag = match span {
                    UnknownSpan::Ignored => continue,
                    UnknownSpan::Error => UNKNOWN_TAG,
                    UnknownSpan::Raw(text) => &**text,
                };
                for set in &mut tag_sets {
                    insert_sorted(set, tag);
                }
            }
            Step::Matched { node, .. } => {
                let node = trie.node(*node);
                let alternatives = node.tag_alternatives();
                if !alternatives.is_empty() {
                    let mut expanded = Vec::with_capacity(tag_sets.len() * alternatives.len());
                    for set in &tag_sets {
                        for alt in alternatives {
                            let mut new_set = set.clone();
                            for tag in alt.split_whitespace() {
                                insert_sorted(&mut new_set, tag);
                            }
                            expanded.push(new_set);
                        }
                    }
                    expanded.sort_unstable();
                    expanded.dedup();
                    tag_sets = expanded;
                }
                for alt in node.topic_alternatives() {
                    topics.extend(alt.split_whitespace());
                }
            }
        }
    }

    tag_sets.sort_unstable();
    tag_sets.dedup();
    topics.sort_unstable();
    topics.dedup();
    DecodeResult::from_sorted(
        tag_sets
            .into_iter()
            .map(|set| set.into_iter().map(str::to_string).collect())
            .collect(),
        topics.into_iter().map(str::to_string).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::trie::NodeIdx;

    fn insert(trie: &mut SequenceTrie, key: &str, tags: &[&str], topics: &[&str]) -> NodeIdx {
        let idx = trie.insert_path(key.split_whitespace()).unwrap();
        for t in tags {
            trie.push_alternatives(idx, t.to_string(), String::new());
        }
        for t in topics {
            trie.push_alternatives(idx, String::new(), t.to_string());
        }
        idx
    }

    #[test]
    fn test_empty_path() {
        let trie = SequenceTrie::new();
        let lattice = PathLattice::default();
        let result = assemble(&lattice, PathIdx::EMPTY, &trie);
        assert_eq!(&[Vec::<String>::new()], result.tag_sets());
        assert!(result.topics().is_empty());
    }

    #[test]
    fn test_cartesian_product() {
        let mut trie = SequenceTrie::new();
        let m = insert(&mut trie, "m", &["masculine", "meter"], &[]);
        let pl = insert(&mut trie, "pl", &["plural"], &["grammar"]);
        let mut lattice = PathLattice::default();
        let path = lattice.extend(PathIdx::EMPTY, Step::Matched { pos: 0, node: m });
        let path = lattice.extend(path, Step::Matched { pos: 1, node: pl });

        let result = assemble(&lattice, path, &trie);
        assert_eq!(
            &[
                vec!["masculine".to_string(), "plural".to_string()],
                vec!["meter".to_string(), "plural".to_string()],
            ],
            result.tag_sets()
        );
        assert_eq!(&["grammar".to_string()], result.topics());
    }

    #[test]
    fn test_unknown_spans() {
        let mut trie = SequenceTrie::new();
        let rare = insert(&mut trie, "rare", &["rare"], &[]);
        let mut lattice = PathLattice::default();
        let path = lattice.extend(
            PathIdx::EMPTY,
            Step::Unknown {
                pos: 0,
                span: UnknownSpan::Ignored,
            },
        );
        let path = lattice.extend(path, Step::Matched { pos: 2, node: rare });
        let path = lattice.extend(
            path,
            Step::Unknown {
                pos: 3,
                span: UnknownSpan::Raw("used in plural".into()),
            },
        );
        let result = assemble(&lattice, path, &trie);
        assert_eq!(
            &[vec!["rare".to_string(), "used in plural".to_string()]],
            result.tag_sets()
        );

        let path = lattice.extend(
            path,
            Step::Unknown {
                pos: 6,
                span: UnknownSpan::Error,
            },
        );
        let result = assemble(&lattice, path, &trie);
        assert_eq!(1, result.error_count());
    }

    #[test]
    fn test_exponential_tag_sets() {
        let mut trie = SequenceTrie::new();
        let mut lattice = PathLattice::default();
        let mut path = PathIdx::EMPTY;
        for (i, key) in ["a", "b", "c", "d", "e"].into_iter().enumerate() {
            let x = format!("{key}1");
            let y = format!("{key}2");
            let node = insert(&mut trie, key, &[&x, &y], &[]);
            path = lattice.extend(path, Step::Matched { pos: i as u32, node });
        }
        // 2^4 = 16 sets are still accepted before the last step.
        let result = assemble(&lattice, path, &trie);
        assert_eq!(32, result.tag_sets().len());

        let node = insert(&mut trie, "f", &["f1", "f2"], &[]);
        let path = lattice.extend(path, Step::Matched { pos: 5, node });
        assert_eq!(DecodeResult::exponential(), assemble(&lattice, path, &trie));
    }
}
