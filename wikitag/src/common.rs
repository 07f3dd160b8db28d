//! 共通の定数定義
//!
//! デコーダーの探索パラメータと、結果に現れるセンチネル文字列を定義します。
//! 探索パラメータの値は既存の抽出結果と互換性を保つために固定されています。

/// 各位置で保持する候補パスの最大数（ビーム幅）。
pub const BEAM_WIDTH: usize = 10;

/// 未知スパンを含むパスに加算されるペナルティ。
pub const UNKNOWN_PENALTY: usize = 100;

/// 組み立て中に許容されるタグ集合の最大数。
///
/// これを超えた場合、結果は[`EXPONENTIAL_TAG`]を含む単一のタグ集合に置き換えられます。
pub const MAX_TAG_SETS: usize = 16;

/// 未知スパンのステップに付与されるタグ。
pub const UNKNOWN_STEP_TAG: &str = "UNKNOWN";

/// 認識できなかったスパンを表すエラータグ。
pub const UNKNOWN_TAG: &str = "error-unknown-tag";

/// タグ集合が爆発的に増えた場合のエラータグ。
pub const EXPONENTIAL_TAG: &str = "error-exponential-tagsets";

/// エラータグの接頭辞。
pub const ERROR_PREFIX: &str = "error-";

/// 大文字で始まる方言タグに割り当てられるカテゴリ。
pub const DIALECT_CATEGORY: &str = "dialect";

/// 未知スパンの先頭に置かれても独立した記述として扱われる単語。
///
/// これらの語で始まる複数語のスパンは、エラーではなく生のテキストとして結果に残ります。
pub const ALLOWED_UNKNOWN_STARTS: &[&str] = &[
    "Relating",
    "accompanied",
    "added",
    "after",
    "answering",
    "as",
    "based",
    "before",
    "conjugated",
    "conjunction",
    "construed",
    "especially",
    "expression:",
    "figurative:",
    "followed",
    "for",
    "forms",
    "from",
    "governs",
    "in",
    "indicating",
    "modifying",
    "normally",
    "not",
    "of",
    "preceding",
    "prefixed",
    "referring",
    "relating",
    "revived",
    "said",
    "since",
    "takes",
    "used",
    "with",
    "With",
    "without",
    // ignorable spans below
    "originally",
    "e.g.",
    "c.f.",
    "supplanted by",
    "supplied by",
];

/// 結果に何も残さずに読み飛ばされる未知スパンの接頭辞。
pub const IGNORED_UNKNOWN_PREFIXES: &[&str] = &[
    "originally",
    "e.g.",
    "c.f.",
    "supplanted by",
    "supplied by",
];

/// 単独で現れた場合に読み飛ばされる接続詞。
pub const IGNORED_CONJUNCTIONS: &[&str] = &["and", "or"];

/// 文を区切る記号。
///
/// 複数語のキーがこれらの記号をまたいで照合されることはありません。
pub const HARD_SEPARATORS: &[char] = &[',', ';', '，', '،', ':'];

/// `word`が未知スパンの開始語として許可されているかを判定します。
#[inline(always)]
pub fn is_allowed_unknown_start(word: &str) -> bool {
    ALLOWED_UNKNOWN_STARTS.contains(&word)
}
