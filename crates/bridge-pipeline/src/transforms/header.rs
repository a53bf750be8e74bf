//! Response header synthesis: `responseHeader` with status, QTime and the
//! echoed request parameters.

use crate::context::ResponseContext;
use crate::registry::ResponseTransform;
use serde_json::{json, Value};

pub fn response() -> ResponseTransform {
    ResponseTransform::new("response-header", synthesize)
}

fn synthesize(ctx: &mut ResponseContext) {
    // Solr reports 0 for success
    let status = match ctx.status() {
        Some(code) if !(200..300).contains(&code) => code,
        _ => 0,
    };
    let qtime = ctx
        .body
        .remove("took")
        .and_then(|took| took.as_u64())
        .unwrap_or(0);

    ctx.body.insert(
        "responseHeader".to_string(),
        json!({
            "status": status,
            "QTime": qtime,
            "params": ctx.params.to_echo_json(),
        }),
    );
}
