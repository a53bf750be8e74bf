//! Query translation: `q` (plus `defType`/`qf`/`mm`) into the body's `query`.
//!
//! Runs only once the envelope targets the search API, i.e. after URI
//! rewrite. With `defType=edismax` and a `qf` list the edismax builder is
//! used; otherwise the structured parser.

use crate::context::RequestContext;
use crate::registry::RequestTransform;
use bridge_query::{build_edismax, parse_with};

/// Solr's default when `q` is missing
const DEFAULT_QUERY: &str = "*:*";

pub fn request() -> RequestTransform {
    RequestTransform::guarded("query", RequestContext::targets_search, translate)
}

fn translate(ctx: &mut RequestContext) {
    let q = ctx
        .params
        .get("q")
        .filter(|q| !q.trim().is_empty())
        .unwrap_or(DEFAULT_QUERY);

    let edismax = ctx
        .params
        .get("defType")
        .is_some_and(|d| d.eq_ignore_ascii_case("edismax"));

    let node = match ctx.params.get("qf").filter(|qf| !qf.trim().is_empty()) {
        Some(qf) if edismax => build_edismax(q, qf, ctx.params.get("mm")),
        _ => parse_with(q, &ctx.parser_options()),
    };

    ctx.body.insert("query".to_string(), node.to_json());
}
