//! Query-type classification: identifier patterns, then keyword rules in a
//! fixed order. First match wins.

use std::sync::LazyLock;

use regex::Regex;

use lethe_core::QueryType;

use crate::text::tokenize;

/// A 22-character IFC GUID delimited by non-GUID characters.
static RE_IFC_GUID: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9A-Za-z_$])[0-9A-Za-z_$]{22}(?:$|[^0-9A-Za-z_$])").ok()
});

static RE_UUID: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"\b[0-9A-Za-z]{8}-[0-9A-Za-z]{4}-[0-9A-Za-z]{4}-[0-9A-Za-z]{4}-[0-9A-Za-z]{12}\b",
    )
    .ok()
});

/// Keyword rules in evaluation order. ASCII entries match whole tokens
/// (multi-word entries as a phrase); non-ASCII entries match as substrings.
const QUERY_TYPE_KEYWORDS: &[(QueryType, &[&str])] = &[
    (
        QueryType::Temporal,
        &[
            "recent",
            "recently",
            "ago",
            "created",
            "date",
            "last week",
            "last month",
            "최근",
            "이전",
            "날짜",
            "생성",
        ],
    ),
    (
        QueryType::Author,
        &["author", "authored", "written by", "작성자", "작성"],
    ),
    (
        QueryType::Relationship,
        &[
            "related", "relation", "issue", "issues", "problem", "problems", "관련",
        ],
    ),
    (
        QueryType::Complex,
        &[
            "and", "or", "but", "with", "without", "그리고", "또는", "하지만",
        ],
    ),
];

/// Author handles look like `engineer_kim`, `architect_lee`, `user_choi`.
const AUTHOR_PREFIXES: &[&str] = &["engineer_", "architect_", "user_"];

/// Classify a raw query.
pub fn classify(query: &str) -> QueryType {
    if is_identifier_query(query) {
        return QueryType::Identifier;
    }

    let tokens = tokenize(query);
    let lowered = query.to_lowercase();

    for &(query_type, keywords) in QUERY_TYPE_KEYWORDS {
        if query_type == QueryType::Author && has_author_handle(&tokens) {
            return QueryType::Author;
        }
        if keywords
            .iter()
            .any(|kw| keyword_matches(kw, &tokens, &lowered))
        {
            return query_type;
        }
    }

    QueryType::Keyword
}

/// Whether the query carries an IFC GUID or a UUID.
pub fn is_identifier_query(query: &str) -> bool {
    [&RE_IFC_GUID, &RE_UUID]
        .into_iter()
        .filter_map(|re| re.as_ref())
        .any(|re| re.is_match(query))
}

/// IFC GUIDs, then UUIDs, in order of appearance and without duplicates.
pub fn extract_identifiers(query: &str) -> Vec<String> {
    let guids = query
        .split(|c: char| !is_guid_char(c))
        .filter(|run| run.len() == 22);
    let uuids = RE_UUID
        .as_ref()
        .into_iter()
        .flat_map(|re| re.find_iter(query).map(|m| m.as_str()));

    let mut found: Vec<String> = Vec::new();
    for id in guids.chain(uuids) {
        if !found.iter().any(|f| f == id) {
            found.push(id.to_string());
        }
    }
    found
}

/// Author handles such as `engineer_kim`, lowercased, in order of appearance.
pub fn extract_author_handles(query: &str) -> Vec<String> {
    let mut handles: Vec<String> = Vec::new();
    for token in tokenize(query) {
        if is_author_handle(&token) && !handles.contains(&token) {
            handles.push(token);
        }
    }
    handles
}

fn is_guid_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_author_handle(token: &str) -> bool {
    AUTHOR_PREFIXES
        .iter()
        .any(|p| token.len() > p.len() && token.starts_with(p))
}

fn has_author_handle(tokens: &[String]) -> bool {
    tokens.iter().any(|t| is_author_handle(t))
}

fn keyword_matches(keyword: &str, tokens: &[String], lowered: &str) -> bool {
    if !keyword.is_ascii() {
        return lowered.contains(keyword);
    }
    let phrase: Vec<&str> = keyword.split_whitespace().collect();
    match phrase.len() {
        0 => false,
        1 => tokens.iter().any(|t| t == phrase[0]),
        n => tokens
            .windows(n)
            .any(|w| w.iter().zip(&phrase).all(|(t, p)| t == p)),
    }
}
