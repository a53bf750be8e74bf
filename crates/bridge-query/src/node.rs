//! Target query tree.
//!
//! `QueryNode` is the structured form of one clause in the target engine's
//! query DSL. It renders to the engine's JSON shape through [`QueryNode::to_json`]
//! (and `Serialize`, which delegates to it).

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// One side of a range clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeBound {
    pub value: String,
    pub inclusive: bool,
}

impl RangeBound {
    pub fn new(value: impl Into<String>, inclusive: bool) -> Self {
        Self {
            value: value.into(),
            inclusive,
        }
    }
}

/// Boolean composition of child clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoolQuery {
    pub must: Vec<QueryNode>,
    pub should: Vec<QueryNode>,
    pub must_not: Vec<QueryNode>,
    pub filter: Vec<QueryNode>,
    pub minimum_should_match: Option<u32>,
}

/// A clause of the target structured query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    MatchAll,
    Term {
        field: String,
        value: String,
    },
    MatchPhrase {
        field: String,
        query: String,
        slop: Option<u32>,
    },
    Range {
        field: String,
        lower: Option<RangeBound>,
        upper: Option<RangeBound>,
    },
    Wildcard {
        field: String,
        pattern: String,
    },
    Fuzzy {
        field: String,
        value: String,
        fuzziness: String,
    },
    Exists {
        field: String,
    },
    MultiMatch {
        query: String,
        fields: Vec<String>,
        minimum_should_match: Option<String>,
    },
    QueryString {
        query: String,
        default_field: String,
    },
    Bool(BoolQuery),
}

impl QueryNode {
    /// Fold clauses as a conjunction. One clause is returned as-is.
    pub fn must(mut clauses: Vec<QueryNode>) -> QueryNode {
        match clauses.len() {
            0 => QueryNode::MatchAll,
            1 => clauses.remove(0),
            _ => QueryNode::Bool(BoolQuery {
                must: clauses,
                ..Default::default()
            }),
        }
    }

    /// Fold clauses as a disjunction requiring at least one match.
    /// One clause is returned as-is.
    pub fn should(mut clauses: Vec<QueryNode>) -> QueryNode {
        match clauses.len() {
            0 => QueryNode::MatchAll,
            1 => clauses.remove(0),
            _ => QueryNode::Bool(BoolQuery {
                should: clauses,
                minimum_should_match: Some(1),
                ..Default::default()
            }),
        }
    }

    /// Wrap a single clause as a prohibition.
    pub fn must_not(clause: QueryNode) -> QueryNode {
        QueryNode::Bool(BoolQuery {
            must_not: vec![clause],
            ..Default::default()
        })
    }

    /// Render to the target engine's JSON query DSL.
    pub fn to_json(&self) -> Value {
        match self {
            QueryNode::MatchAll => json!({ "match_all": {} }),
            QueryNode::Term { field, value } => json!({ "term": { field: value } }),
            QueryNode::MatchPhrase { field, query, slop } => match slop {
                Some(slop) => json!({ "match_phrase": { field: { "query": query, "slop": slop } } }),
                None => json!({ "match_phrase": { field: query } }),
            },
            QueryNode::Range {
                field,
                lower,
                upper,
            } => {
                let mut bounds = Map::new();
                if let Some(lower) = lower {
                    let op = if lower.inclusive { "gte" } else { "gt" };
                    bounds.insert(op.to_string(), bound_value(&lower.value));
                }
                if let Some(upper) = upper {
                    let op = if upper.inclusive { "lte" } else { "lt" };
                    bounds.insert(op.to_string(), bound_value(&upper.value));
                }
                json!({ "range": { field: bounds } })
            }
            QueryNode::Wildcard { field, pattern } => json!({ "wildcard": { field: pattern } }),
            QueryNode::Fuzzy {
                field,
                value,
                fuzziness,
            } => json!({ "fuzzy": { field: { "value": value, "fuzziness": fuzziness } } }),
            QueryNode::Exists { field } => json!({ "exists": { "field": field } }),
            QueryNode::MultiMatch {
                query,
                fields,
                minimum_should_match,
            } => {
                let mut body = json!({
                    "query": query,
                    "fields": fields,
                    "type": "best_fields",
                });
                if let Some(mm) = minimum_should_match {
                    body["minimum_should_match"] = json!(mm);
                }
                json!({ "multi_match": body })
            }
            QueryNode::QueryString {
                query,
                default_field,
            } => json!({
                "query_string": { "query": query, "default_field": default_field }
            }),
            QueryNode::Bool(b) => {
                let mut body = Map::new();
                for (key, clauses) in [
                    ("must", &b.must),
                    ("should", &b.should),
                    ("must_not", &b.must_not),
                    ("filter", &b.filter),
                ] {
                    if !clauses.is_empty() {
                        let rendered = clauses.iter().map(QueryNode::to_json).collect();
                        body.insert(key.to_string(), Value::Array(rendered));
                    }
                }
                if let Some(msm) = b.minimum_should_match {
                    body.insert("minimum_should_match".to_string(), json!(msm));
                }
                json!({ "bool": body })
            }
        }
    }
}

impl Serialize for QueryNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Numeric-looking bounds go out as JSON numbers, everything else as strings.
fn bound_value(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        Value::Number(n.into())
    } else if let Some(n) = raw
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(serde_json::Number::from_f64)
    {
        Value::Number(n)
    } else {
        Value::String(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(v: &str) -> QueryNode {
        QueryNode::Term {
            field: "f".into(),
            value: v.into(),
        }
    }

    #[test]
    fn test_fold_identity() {
        assert_eq!(QueryNode::must(vec![term("a")]), term("a"));
        assert_eq!(QueryNode::should(vec![term("a")]), term("a"));
    }

    #[test]
    fn test_fold_empty_is_match_all() {
        assert_eq!(QueryNode::must(Vec::new()), QueryNode::MatchAll);
    }

    #[test]
    fn test_should_renders_minimum_match() {
        let node = QueryNode::should(vec![term("a"), term("b")]);
        assert_eq!(
            node.to_json(),
            json!({
                "bool": {
                    "should": [{ "term": { "f": "a" } }, { "term": { "f": "b" } }],
                    "minimum_should_match": 1
                }
            })
        );
    }

    #[test]
    fn test_range_omits_open_side() {
        let node = QueryNode::Range {
            field: "price".into(),
            lower: Some(RangeBound::new("10", false)),
            upper: None,
        };
        assert_eq!(node.to_json(), json!({ "range": { "price": { "gt": 10 } } }));
    }

    #[test]
    fn test_range_keeps_non_numeric_bounds_as_strings() {
        let node = QueryNode::Range {
            field: "date".into(),
            lower: Some(RangeBound::new("NOW-1DAY", true)),
            upper: Some(RangeBound::new("1.5", true)),
        };
        assert_eq!(
            node.to_json(),
            json!({ "range": { "date": { "gte": "NOW-1DAY", "lte": 1.5 } } })
        );
    }

    #[test]
    fn test_phrase_with_slop() {
        let node = QueryNode::MatchPhrase {
            field: "title".into(),
            query: "a b".into(),
            slop: Some(3),
        };
        assert_eq!(
            node.to_json(),
            json!({ "match_phrase": { "title": { "query": "a b", "slop": 3 } } })
        );
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let node = QueryNode::must_not(QueryNode::Exists {
            field: "x".into(),
        });
        assert_eq!(serde_json::to_value(&node).unwrap(), node.to_json());
    }
}
