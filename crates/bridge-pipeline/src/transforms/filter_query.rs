//! Filter queries: every `fq` joins the main query as a non-scoring filter.

use crate::context::RequestContext;
use crate::registry::RequestTransform;
use bridge_query::parse_with;
use serde_json::{json, Value};

pub fn request() -> RequestTransform {
    RequestTransform::guarded("filter-query", has_filters, apply_filters)
}

fn has_filters(ctx: &RequestContext) -> bool {
    ctx.params.get_all("fq").any(|fq| !fq.trim().is_empty())
}

fn apply_filters(ctx: &mut RequestContext) {
    let options = ctx.parser_options();
    let filters: Vec<Value> = ctx
        .params
        .get_all("fq")
        .filter(|fq| !fq.trim().is_empty())
        .map(|fq| parse_with(fq, &options).to_json())
        .collect();

    let main = ctx
        .body
        .remove("query")
        .unwrap_or_else(|| json!({ "match_all": {} }));

    ctx.body.insert(
        "query".to_string(),
        json!({ "bool": { "must": [main], "filter": filters } }),
    );
}
