//! Sort: `field dir, field dir` into an ordered list of sort clauses.

use crate::context::RequestContext;
use crate::registry::RequestTransform;
use serde_json::{json, Value};

/// Built-in relevance field of the target engine
const SCORE_FIELD: &str = "_score";

pub fn request() -> RequestTransform {
    RequestTransform::guarded("sort", has_sort, translate)
}

fn has_sort(ctx: &RequestContext) -> bool {
    ctx.params.get("sort").is_some_and(|s| !s.trim().is_empty())
}

fn translate(ctx: &mut RequestContext) {
    let Some(sort) = ctx.params.get("sort") else {
        return;
    };

    let clauses: Vec<Value> = sort
        .split(',')
        .filter_map(|clause| {
            let mut parts = clause.split_whitespace();
            let field = parts.next()?;
            let order = match parts.next().map(str::to_ascii_lowercase).as_deref() {
                Some("desc") => "desc",
                _ => "asc",
            };
            let field = if field == "score" { SCORE_FIELD } else { field };
            Some(json!({ field: { "order": order } }))
        })
        .collect();

    if !clauses.is_empty() {
        ctx.body.insert("sort".to_string(), Value::Array(clauses));
    }
}
