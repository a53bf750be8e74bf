//! URI rewrite: `/solr/<collection>/select?...` becomes `POST /<collection>/_search`.
//!
//! Legacy parameters have already been captured in the context, so the
//! rewritten URI carries no query string; later transforms move those
//! parameters into the JSON body instead.

use crate::context::RequestContext;
use crate::message;
use crate::registry::RequestTransform;
use serde_json::Value;

pub fn request() -> RequestTransform {
    RequestTransform::guarded("uri-rewrite", has_collection, rewrite)
}

fn has_collection(ctx: &RequestContext) -> bool {
    ctx.collection.is_some()
}

fn rewrite(ctx: &mut RequestContext) {
    let Some(collection) = &ctx.collection else {
        return;
    };

    ctx.message.insert(
        message::URI_KEY.to_string(),
        Value::String(format!("/{collection}/_search")),
    );
    ctx.message.insert(
        message::METHOD_KEY.to_string(),
        Value::String("POST".to_string()),
    );
    message::set_header(&mut ctx.message, "Content-Type", "application/json");
}
