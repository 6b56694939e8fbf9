//! Tokenisation and the text representations engines index.

use lethe_core::Issue;
use lethe_graph::GraphStore;

/// Lowercased tokens. `_`, `$` and inner `-` stay part of a token so GUIDs,
/// author handles (`engineer_kim`) and element tags (`W-101`) survive intact.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '$' | '-')))
        .map(|t| t.trim_matches('-'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Title, description, then the name and category of every referenced entity
/// still present in the graph.
pub fn issue_representation(graph: &GraphStore, issue: &Issue) -> String {
    let mut out = issue.text();
    for entity in issue.references.iter().filter_map(|id| graph.entity(id)) {
        out.push(' ');
        out.push_str(&entity.name);
        out.push(' ');
        out.push_str(&entity.category);
    }
    out
}

/// Everything the lexical index searches: the representation plus id,
/// author, status and referenced entity ids.
pub fn lexical_document(graph: &GraphStore, issue: &Issue) -> String {
    let mut out = issue_representation(graph, issue);
    for field in [issue.id.as_str(), issue.author.as_str(), issue.status.as_str()] {
        out.push(' ');
        out.push_str(field);
    }
    for id in &issue.references {
        out.push(' ');
        out.push_str(id);
    }
    out
}
