//! Pagination: `start`/`rows` to `from`/`size`, and `start` echoed back.

use crate::context::{RequestContext, ResponseContext};
use crate::registry::{RequestTransform, ResponseTransform};
use serde_json::{json, Value};

pub fn request() -> RequestTransform {
    RequestTransform::new("pagination", paginate)
}

pub fn response() -> ResponseTransform {
    ResponseTransform::guarded("pagination", has_result, echo_start)
}

fn paginate(ctx: &mut RequestContext) {
    for (param, key) in [("start", "from"), ("rows", "size")] {
        if let Some(n) = ctx.params.get(param).and_then(|v| v.trim().parse::<u64>().ok()) {
            ctx.body.insert(key.to_string(), json!(n));
        }
    }
}

fn has_result(ctx: &ResponseContext) -> bool {
    ctx.body.get("response").is_some_and(Value::is_object)
}

fn echo_start(ctx: &mut ResponseContext) {
    let start = ctx
        .params
        .get("start")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0);

    if let Some(result) = ctx.body.get_mut("response").and_then(Value::as_object_mut) {
        result.insert("start".to_string(), json!(start));
    }
}
