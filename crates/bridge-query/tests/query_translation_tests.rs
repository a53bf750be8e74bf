//! End-to-end checks of query string to JSON DSL translation.

use bridge_query::{parse, parse_with, ParserOptions, QueryNode};
use serde_json::json;
use test_case::test_case;

#[test]
fn test_match_all_and_exists() {
    assert_eq!(parse("*:*").to_json(), json!({ "match_all": {} }));
    assert_eq!(
        parse("field:*").to_json(),
        json!({ "exists": { "field": "field" } })
    );
}

#[test]
fn test_fielded_term() {
    assert_eq!(
        parse("title:foo").to_json(),
        json!({ "term": { "title": "foo" } })
    );
}

#[test]
fn test_fielded_phrase() {
    assert_eq!(
        parse(r#"title:"hello world""#).to_json(),
        json!({ "match_phrase": { "title": "hello world" } })
    );
}

#[test]
fn test_phrase_proximity() {
    assert_eq!(
        parse(r#"title:"hello world"~3"#).to_json(),
        json!({ "match_phrase": { "title": { "query": "hello world", "slop": 3 } } })
    );
}

#[test_case("price:[10 TO 20]", json!({ "range": { "price": { "gte": 10, "lte": 20 } } }) ; "inclusive")]
#[test_case("price:{10 TO *}", json!({ "range": { "price": { "gt": 10 } } }) ; "exclusive open upper")]
#[test_case("price:[* TO 5}", json!({ "range": { "price": { "lt": 5 } } }) ; "open lower exclusive upper")]
#[test_case("day:[2020-01-01 TO NOW]", json!({ "range": { "day": { "gte": "2020-01-01", "lte": "NOW" } } }) ; "string bounds")]
fn test_ranges(query: &str, expected: serde_json::Value) {
    assert_eq!(parse(query).to_json(), expected);
}

#[test]
fn test_open_upper_bound_key_is_absent() {
    let json = parse("price:{10 TO *}").to_json();
    let bounds = json["range"]["price"].as_object().unwrap();
    assert_eq!(bounds.len(), 1);
    assert!(!bounds.contains_key("lt"));
    assert!(!bounds.contains_key("lte"));
}

#[test]
fn test_explicit_and_implicit_conjunction_are_identical() {
    let explicit = parse("foo AND bar");
    let implicit = parse("foo bar");
    assert_eq!(explicit, implicit);

    let json = explicit.to_json();
    assert_eq!(json["bool"]["must"].as_array().unwrap().len(), 2);
    assert!(json["bool"].get("should").is_none());
}

#[test]
fn test_disjunction_requires_one_match() {
    let json = parse("foo OR bar").to_json();
    assert_eq!(json["bool"]["should"].as_array().unwrap().len(), 2);
    assert_eq!(json["bool"]["minimum_should_match"], 1);
}

#[test]
fn test_single_clause_is_not_wrapped() {
    let json = parse("foo").to_json();
    assert!(json.get("bool").is_none());
    assert_eq!(
        json,
        json!({ "query_string": { "query": "foo", "default_field": "*" } })
    );
}

#[test]
fn test_prohibition_wraps_exactly_one_leaf() {
    assert_eq!(
        parse("-foo").to_json(),
        json!({
            "bool": {
                "must_not": [{ "query_string": { "query": "foo", "default_field": "*" } }]
            }
        })
    );
}

#[test_case("name:val~2", "2" ; "numeric fuzziness")]
#[test_case("name:val~", "AUTO" ; "auto fuzziness")]
fn test_fuzzy(query: &str, fuzziness: &str) {
    assert_eq!(
        parse(query).to_json(),
        json!({ "fuzzy": { "name": { "value": "val", "fuzziness": fuzziness } } })
    );
}

#[test]
fn test_wildcard_on_field() {
    assert_eq!(
        parse("name:jo*n").to_json(),
        json!({ "wildcard": { "name": "jo*n" } })
    );
}

#[test]
fn test_default_field_applies_to_fieldless_leaves() {
    let options = ParserOptions::with_default_field("body");
    assert_eq!(
        parse_with(r#""exact words""#, &options).to_json(),
        json!({ "match_phrase": { "body": "exact words" } })
    );
    assert_eq!(
        parse_with("ca*", &options).to_json(),
        json!({ "wildcard": { "body": "ca*" } })
    );
}

#[test]
fn test_nested_composition() {
    let json = parse(r#"(title:rust OR title:"systems programming") AND -status:draft year:[2020 TO *]"#)
        .to_json();

    assert_eq!(
        json,
        json!({
            "bool": {
                "must": [
                    {
                        "bool": {
                            "should": [
                                { "term": { "title": "rust" } },
                                { "match_phrase": { "title": "systems programming" } }
                            ],
                            "minimum_should_match": 1
                        }
                    },
                    { "bool": { "must_not": [{ "term": { "status": "draft" } }] } },
                    { "range": { "year": { "gte": 2020 } } }
                ]
            }
        })
    );
}

#[test]
fn test_garbage_never_panics() {
    for input in [
        "((((",
        "))))",
        "AND OR NOT",
        "\"unterminated",
        "[1 TO",
        "field:(a OR",
        ":::",
        "\\",
        "+ - ! && ||",
    ] {
        let node = parse(input);
        // Every input still renders to some clause
        assert!(node.to_json().is_object(), "input {:?}", input);
    }
}

#[test]
fn test_garbage_degrades_to_match_all() {
    assert_eq!(parse("AND OR NOT"), QueryNode::MatchAll);
    assert_eq!(parse("(((("), QueryNode::MatchAll);
}

#[test]
fn test_deep_nesting_is_bounded() {
    let opened = format!("{}foo", "(".repeat(100_000));
    let negated = "-(".repeat(100_000);
    let field_groups = "a:(".repeat(100_000);

    for input in [&opened, &negated, &field_groups] {
        let json = parse(input).to_json();
        assert!(json.is_object());
    }

    // The leaf past the cap still survives
    assert!(parse(&opened).to_json().to_string().contains("foo"));
}

#[test_case(r"title:foo\*", json!({ "term": { "title": "foo*" } }) ; "escaped star")]
#[test_case(r"foo\?", json!({ "query_string": { "query": r"foo\?", "default_field": "*" } }) ; "escaped question mark")]
#[test_case(r"title:roam\~1", json!({ "term": { "title": "roam~1" } }) ; "escaped tilde")]
#[test_case(r"title:foo*", json!({ "wildcard": { "title": "foo*" } }) ; "unescaped star")]
fn test_escaped_operators_are_literal(query: &str, expected: serde_json::Value) {
    assert_eq!(parse(query).to_json(), expected);
}
