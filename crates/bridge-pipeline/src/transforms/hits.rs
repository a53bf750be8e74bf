//! Hits to docs: native hit list into Solr's `response` block.
//!
//! Every stored field except the identifier and the version attribute comes
//! back as an array. The version is synthesized when missing and `numFound`
//! is recomputed from the native total. `took` is left for response-header
//! synthesis.

use crate::context::ResponseContext;
use crate::registry::ResponseTransform;
use crate::transforms::field_list::{self, SCORE};
use serde_json::{json, Map, Value};

/// Native keys with no counterpart in the legacy shape
const OBSOLETE_KEYS: [&str; 3] = ["hits", "_shards", "timed_out"];

pub fn response() -> ResponseTransform {
    ResponseTransform::guarded("hits-to-docs", has_hits, hits_to_docs)
}

fn has_hits(ctx: &ResponseContext) -> bool {
    ctx.body.contains_key("hits")
}

/// Wrap a scalar into a one-element array; arrays pass through and nulls
/// are dropped.
pub(crate) fn multi_valued(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(_) => Some(value),
        scalar => Some(Value::Array(vec![scalar])),
    }
}

fn hits_to_docs(ctx: &mut ResponseContext) {
    let hits = ctx.body.get("hits").cloned().unwrap_or(Value::Null);
    let with_score = field_list::wants_score(&ctx.params);
    let id_field = ctx.config.id_field.as_str();
    let version_field = ctx.config.version_field.as_str();

    let docs: Vec<Value> = hits
        .get("hits")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .map(|hit| to_doc(hit, id_field, version_field, with_score))
                .collect()
        })
        .unwrap_or_default();

    let total = hits.get("total");
    let num_found = total
        .and_then(|t| t.get("value").or(Some(t)))
        .and_then(Value::as_u64)
        .unwrap_or(docs.len() as u64);
    let exact = total
        .and_then(|t| t.get("relation"))
        .and_then(Value::as_str)
        .map_or(true, |relation| relation == "eq");

    let mut result = json!({
        "numFound": num_found,
        "start": 0,
        "numFoundExact": exact,
        "docs": docs,
    });
    if with_score {
        result["maxScore"] = hits.get("max_score").cloned().unwrap_or(Value::Null);
    }

    for key in OBSOLETE_KEYS {
        ctx.body.remove(key);
    }
    ctx.body.insert("response".to_string(), result);
}

fn to_doc(hit: &Value, id_field: &str, version_field: &str, with_score: bool) -> Value {
    let mut doc = Map::new();

    if let Some(source) = hit.get("_source").and_then(Value::as_object) {
        for (key, value) in source {
            // Single-valued by nature; kept as stored
            if key == id_field || key == version_field {
                if !value.is_null() {
                    doc.insert(key.clone(), value.clone());
                }
            } else if let Some(wrapped) = multi_valued(value.clone()) {
                doc.insert(key.clone(), wrapped);
            }
        }
    }

    if !doc.contains_key(id_field) {
        if let Some(id) = hit.get("_id").filter(|id| !id.is_null()) {
            doc.insert(id_field.to_string(), id.clone());
        }
    }

    let version = hit.get("_version").cloned().unwrap_or(json!(0));
    doc.entry(version_field.to_string()).or_insert(version);

    if with_score {
        if let Some(score) = hit.get("_score").filter(|s| !s.is_null()) {
            doc.insert(SCORE.to_string(), score.clone());
        }
    }

    Value::Object(doc)
}
