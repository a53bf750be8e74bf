//! Second multi-valued pass: any string field left scalar is wrapped,
//! except the identifier and version attributes.

use crate::context::ResponseContext;
use crate::registry::ResponseTransform;
use serde_json::Value;

pub fn response() -> ResponseTransform {
    ResponseTransform::guarded("multi-valued", has_docs, wrap_strings)
}

fn has_docs(ctx: &ResponseContext) -> bool {
    ctx.body
        .get("response")
        .and_then(|r| r.get("docs"))
        .is_some_and(Value::is_array)
}

fn wrap_strings(ctx: &mut ResponseContext) {
    let config = std::sync::Arc::clone(&ctx.config);
    let Some(docs) = ctx
        .body
        .get_mut("response")
        .and_then(|r| r.get_mut("docs"))
        .and_then(Value::as_array_mut)
    else {
        return;
    };

    for doc in docs.iter_mut().filter_map(Value::as_object_mut) {
        for (key, value) in doc.iter_mut() {
            let single = *key == config.id_field || *key == config.version_field;
            if !single && value.is_string() {
                let scalar = value.take();
                *value = Value::Array(vec![scalar]);
            }
        }
    }
}
