//! Edismax-mode query construction.
//!
//! When a request selects the `edismax` parser and names its query fields
//! (`qf`), the whole `q` value becomes a single best-fields multi-match
//! across those fields. The structured parser is not consulted.

use crate::node::QueryNode;

/// Build a multi-field clause for `query` over whitespace-delimited `qf`.
///
/// `*:*` and `*` still mean "everything".
pub fn build_edismax(query: &str, qf: &str, mm: Option<&str>) -> QueryNode {
    let query = query.trim();
    if query == "*:*" || query == "*" {
        return QueryNode::MatchAll;
    }

    QueryNode::MultiMatch {
        query: query.to_string(),
        fields: qf.split_whitespace().map(str::to_string).collect(),
        minimum_should_match: mm.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_all_short_circuit() {
        assert_eq!(build_edismax("*:*", "title body", None), QueryNode::MatchAll);
        assert_eq!(build_edismax(" * ", "title", Some("2")), QueryNode::MatchAll);
    }

    #[test]
    fn test_multi_match_across_fields() {
        let node = build_edismax("quick fox", "title^2  body", Some("75%"));
        assert_eq!(
            node.to_json(),
            json!({
                "multi_match": {
                    "query": "quick fox",
                    "fields": ["title^2", "body"],
                    "type": "best_fields",
                    "minimum_should_match": "75%"
                }
            })
        );
    }

    #[test]
    fn test_query_syntax_is_not_interpreted() {
        let node = build_edismax("title:foo AND bar", "body", None);
        assert!(matches!(
            node,
            QueryNode::MultiMatch { ref query, .. } if query == "title:foo AND bar"
        ));
    }
}
