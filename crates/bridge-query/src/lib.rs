//! Legacy query syntax translation.
//!
//! Converts Solr/Lucene-style query strings into the target engine's
//! structured query tree.
//!
//! ## Components
//!
//! - **`token`**: single-pass tokenizer producing a flat [`Token`] stream
//! - **`parser`**: recursive-descent parser from tokens to a [`QueryNode`]
//! - **`build`**: leaf construction rules (terms, phrases, ranges, wildcards,
//!   fuzzy matches) shared with filter-query translation
//! - **`edismax`**: multi-field alternative used when a request selects edismax
//! - **`node`**: the [`QueryNode`] tree and its JSON rendering
//!
//! Parsing never fails. Input that cannot be interpreted is replaced with
//! `match_all` so a live request is never rejected over query syntax.
//!
//! ## Usage
//!
//! ```rust
//! use bridge_query::{parse, QueryNode};
//!
//! assert_eq!(parse("*:*"), QueryNode::MatchAll);
//! let json = parse("price:[10 TO 20]").to_json();
//! assert_eq!(json["range"]["price"]["gte"], 10);
//! ```

pub mod build;
pub mod edismax;
pub mod node;
pub mod parser;
pub mod token;

pub use build::{build_phrase, build_range, build_term, ParserOptions, ALL_FIELDS};
pub use edismax::build_edismax;
pub use node::{BoolQuery, QueryNode, RangeBound};
pub use parser::{parse, parse_with, QueryParser};
pub use token::{tokenize, unescape, Token, Tokenizer};
