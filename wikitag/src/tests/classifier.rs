use crate::classifier::{Category, ClassifyOptions};
use crate::test_utils::*;

#[test]
fn test_classify_scenarios() {
    let mut worker = build_test_decoder().new_worker();
    let options = ClassifyOptions::default();

    assert_eq!(Category::Tags, worker.classify_desc("archaic", options));
    assert_eq!(Category::Tags, worker.classify_desc("masculine, feminine", options));
    assert_eq!(Category::Tags, worker.classify_desc("biology", options));
    assert_eq!(Category::English, worker.classify_desc("running quickly", options));
    assert_eq!(Category::Romanization, worker.classify_desc("/kæt/", options));
    assert_eq!(Category::Taxonomic, worker.classify_desc("Lynx lynx", options));
    assert_eq!(Category::Other, worker.classify_desc("", options));
    assert_eq!(Category::Other, worker.classify_desc("  ", options));
}

#[test]
fn test_classify_unknown_start() {
    let mut worker = build_test_decoder().new_worker();

    let options = ClassifyOptions::default();
    assert_eq!(Category::Tags, worker.classify_desc("symbol, for boron", options));
    // a raw span alone is not enough without allow_unknown_tags
    assert_eq!(Category::English, worker.classify_desc("for boron", options));

    let options = ClassifyOptions::new().allow_unknown_tags(true);
    assert_eq!(Category::Tags, worker.classify_desc("for boron", options));

    let options = ClassifyOptions::new().no_unknown_starts(true);
    assert_eq!(Category::English, worker.classify_desc("symbol, for boron", options));
}

#[test]
fn test_classify_total() {
    let mut worker = build_test_decoder().new_worker();
    let options = ClassifyOptions::default();
    let categories = hashset![
        Category::Tags,
        Category::English,
        Category::Romanization,
        Category::Taxonomic,
        Category::Other,
    ];
    for text in [
        "", "-", "/", "//", "×", "1", "()", "((", "a, , b", "m/f/", "…", "Кина", "中国",
        "\u{200b}", "e.g. and or",
    ] {
        assert!(categories.contains(&worker.classify_desc(text, options)), "{text:?}");
    }
}

#[test]
fn test_classify_cached() {
    let mut worker = build_test_decoder().new_worker();
    let options = ClassifyOptions::default();
    assert_eq!(Category::Tags, worker.classify_desc("archaic", options));
    let cached = worker.num_cached();
    assert_eq!(Category::Tags, worker.classify_desc("archaic", options));
    assert_eq!(cached, worker.num_cached());
}
