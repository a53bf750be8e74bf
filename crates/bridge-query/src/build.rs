//! Leaf clause construction.
//!
//! Shared by the parser and by callers that translate single values (filter
//! queries, facet queries) with the same rules as a full `q` parse.

use crate::node::{QueryNode, RangeBound};
use crate::token::unescape;
use once_cell::sync::Lazy;
use regex::Regex;

/// Field name meaning "every field".
pub const ALL_FIELDS: &str = "*";

/// Fuzzy suffix on a bare value: `text~` or `text~N`
static FUZZY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+)~(\d*)$").unwrap());

/// Proximity suffix appended to phrase text by the tokenizer
static SLOP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^(.*)~(\d+)$").unwrap());

/// Characters with meaning inside a target `query_string`.
const QUERY_STRING_RESERVED: &[char] = &[
    '\\', '+', '-', '=', '&', '|', '>', '<', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~',
    '*', '?', ':', '/',
];

/// Per-invocation parser settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Field used by fieldless leaves
    pub default_field: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            default_field: ALL_FIELDS.to_string(),
        }
    }
}

impl ParserOptions {
    pub fn with_default_field(field: impl Into<String>) -> Self {
        Self {
            default_field: field.into(),
        }
    }
}

/// Build a clause from a bare value, optionally scoped to a field.
///
/// `value` is the raw word with backslash escapes intact: an escaped `*`,
/// `?` or `~` is literal and does not make the clause a wildcard or fuzzy
/// match. Escapes are resolved in the clause that is finally built.
pub fn build_term(field: Option<&str>, value: &str, options: &ParserOptions) -> QueryNode {
    if value == "*" {
        return match field {
            None | Some(ALL_FIELDS) => QueryNode::MatchAll,
            Some(field) => QueryNode::Exists {
                field: field.to_string(),
            },
        };
    }

    let target = field.unwrap_or(&options.default_field).to_string();

    // Wildcard syntax understands the same backslash escapes, so the raw
    // pattern is passed on as is
    if has_unescaped(value, &['*', '?']) {
        return QueryNode::Wildcard {
            field: target,
            pattern: value.to_string(),
        };
    }

    if let Some(caps) = FUZZY_RE.captures(value) {
        if !ends_with_escape(&caps[1]) {
            let digits = &caps[2];
            return QueryNode::Fuzzy {
                field: target,
                value: unescape(&caps[1]),
                fuzziness: if digits.is_empty() {
                    "AUTO".to_string()
                } else {
                    digits.to_string()
                },
            };
        }
    }

    let literal = unescape(value);
    match field {
        Some(field) => QueryNode::Term {
            field: field.to_string(),
            value: literal,
        },
        None => QueryNode::QueryString {
            query: escape_query_string(&literal),
            default_field: target,
        },
    }
}

/// Whether any of `targets` appears in `raw` outside a backslash escape.
fn has_unescaped(raw: &str, targets: &[char]) -> bool {
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if targets.contains(&c) {
            return true;
        }
    }
    false
}

/// Whether the character following `prefix` would be escaped.
fn ends_with_escape(prefix: &str) -> bool {
    prefix.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Build a phrase clause; a trailing `~N` becomes the slop.
pub fn build_phrase(field: Option<&str>, text: &str, options: &ParserOptions) -> QueryNode {
    let field = field.unwrap_or(&options.default_field).to_string();

    if let Some(caps) = SLOP_RE.captures(text) {
        if let Ok(slop) = caps[2].parse::<u32>() {
            return QueryNode::MatchPhrase {
                field,
                query: caps[1].to_string(),
                slop: Some(slop),
            };
        }
    }

    QueryNode::MatchPhrase {
        field,
        query: text.to_string(),
        slop: None,
    }
}

/// Build a range clause. `*` on either side leaves that side open.
pub fn build_range(
    field: &str,
    lo: &str,
    hi: &str,
    lo_inclusive: bool,
    hi_inclusive: bool,
) -> QueryNode {
    let bound = |value: &str, inclusive: bool| {
        (value != "*").then(|| RangeBound::new(value, inclusive))
    };

    QueryNode::Range {
        field: field.to_string(),
        lower: bound(lo, lo_inclusive),
        upper: bound(hi, hi_inclusive),
    }
}

/// Backslash-escape characters the target `query_string` parser reserves.
pub fn escape_query_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if QUERY_STRING_RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn opts() -> ParserOptions {
        ParserOptions::default()
    }

    #[test_case(None ; "fieldless")]
    #[test_case(Some("*") ; "star field")]
    fn test_star_is_match_all(field: Option<&str>) {
        assert_eq!(build_term(field, "*", &opts()), QueryNode::MatchAll);
    }

    #[test]
    fn test_fielded_star_is_exists() {
        assert_eq!(
            build_term(Some("title"), "*", &opts()),
            QueryNode::Exists {
                field: "title".into()
            }
        );
    }

    #[test]
    fn test_wildcard_fieldless_uses_default_field() {
        assert_eq!(
            build_term(None, "te?t*", &opts()),
            QueryNode::Wildcard {
                field: "*".into(),
                pattern: "te?t*".into()
            }
        );
    }

    #[test_case("val~2", "2" ; "explicit distance")]
    #[test_case("val~", "AUTO" ; "auto distance")]
    fn test_fuzzy(value: &str, fuzziness: &str) {
        assert_eq!(
            build_term(Some("name"), value, &opts()),
            QueryNode::Fuzzy {
                field: "name".into(),
                value: "val".into(),
                fuzziness: fuzziness.into(),
            }
        );
    }

    #[test]
    fn test_fieldless_term_is_escaped_query_string() {
        assert_eq!(
            build_term(None, "a:b/c", &ParserOptions::with_default_field("body")),
            QueryNode::QueryString {
                query: r"a\:b\/c".into(),
                default_field: "body".into(),
            }
        );
    }

    // =========================================================================
    // Escapes
    // =========================================================================

    #[test]
    fn test_escaped_star_is_literal_term() {
        assert_eq!(
            build_term(Some("title"), r"foo\*", &opts()),
            QueryNode::Term {
                field: "title".into(),
                value: "foo*".into()
            }
        );
    }

    #[test]
    fn test_escaped_question_mark_is_not_wildcard() {
        assert_eq!(
            build_term(None, r"foo\?", &opts()),
            QueryNode::QueryString {
                query: r"foo\?".into(),
                default_field: "*".into()
            }
        );
    }

    #[test]
    fn test_escaped_tilde_is_not_fuzzy() {
        assert_eq!(
            build_term(Some("title"), r"roam\~1", &opts()),
            QueryNode::Term {
                field: "title".into(),
                value: "roam~1".into()
            }
        );
    }

    #[test]
    fn test_escaped_backslash_before_tilde_stays_fuzzy() {
        assert_eq!(
            build_term(Some("path"), r"a\\~1", &opts()),
            QueryNode::Fuzzy {
                field: "path".into(),
                value: "a\\".into(),
                fuzziness: "1".into()
            }
        );
    }

    #[test]
    fn test_wildcard_keeps_escapes_in_pattern() {
        assert_eq!(
            build_term(Some("sku"), r"ab\*c*", &opts()),
            QueryNode::Wildcard {
                field: "sku".into(),
                pattern: r"ab\*c*".into()
            }
        );
    }

    #[test]
    fn test_phrase_without_slop() {
        assert_eq!(
            build_phrase(Some("t"), "a b", &opts()),
            QueryNode::MatchPhrase {
                field: "t".into(),
                query: "a b".into(),
                slop: None
            }
        );
    }

    #[test]
    fn test_phrase_with_slop() {
        assert_eq!(
            build_phrase(Some("t"), "a b~4", &opts()),
            QueryNode::MatchPhrase {
                field: "t".into(),
                query: "a b".into(),
                slop: Some(4)
            }
        );
    }

    #[test]
    fn test_fully_open_range() {
        assert_eq!(
            build_range("n", "*", "*", true, true),
            QueryNode::Range {
                field: "n".into(),
                lower: None,
                upper: None
            }
        );
    }
}
