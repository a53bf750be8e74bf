//! Field list: `fl` into `_source` on the way in, document pruning on the way out.

use crate::context::{RequestContext, ResponseContext};
use crate::registry::{RequestTransform, ResponseTransform};
use crate::params::QueryParams;
use serde_json::Value;

/// Pseudo-field for relevance; not a stored field
pub(crate) const SCORE: &str = "score";

pub fn request() -> RequestTransform {
    RequestTransform::guarded("field-list", request_has_fields, restrict)
}

pub fn response() -> ResponseTransform {
    ResponseTransform::guarded("field-list", response_has_fields, prune)
}

fn request_has_fields(ctx: &RequestContext) -> bool {
    explicit(&ctx.params)
}

fn response_has_fields(ctx: &ResponseContext) -> bool {
    explicit(&ctx.params)
}

/// Fields named by `fl`, split on commas and whitespace.
pub(crate) fn requested(params: &QueryParams) -> Vec<&str> {
    params
        .get("fl")
        .map(|fl| {
            fl.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|f| !f.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Whether `score` appears in `fl`.
pub(crate) fn wants_score(params: &QueryParams) -> bool {
    requested(params).contains(&SCORE)
}

/// `fl` is present and names concrete fields only.
fn explicit(params: &QueryParams) -> bool {
    let fields = requested(params);
    !fields.is_empty() && !fields.iter().any(|f| f.contains('*'))
}

fn restrict(ctx: &mut RequestContext) {
    let source: Vec<Value> = requested(&ctx.params)
        .into_iter()
        .filter(|f| *f != SCORE)
        .map(|f| Value::String(f.to_string()))
        .collect();

    // `fl=score` alone still returns every stored field
    if !source.is_empty() {
        ctx.body.insert("_source".to_string(), Value::Array(source));
    }
}

fn prune(ctx: &mut ResponseContext) {
    let keep: Vec<String> = requested(&ctx.params)
        .into_iter()
        .map(str::to_string)
        .collect();

    let Some(docs) = ctx
        .body
        .get_mut("response")
        .and_then(|r| r.get_mut("docs"))
        .and_then(Value::as_array_mut)
    else {
        return;
    };

    for doc in docs.iter_mut().filter_map(Value::as_object_mut) {
        doc.retain(|key, _| keep.iter().any(|k| k == key));
    }
}
