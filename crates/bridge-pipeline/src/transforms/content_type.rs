//! Response content type for any response that carries a body.

use crate::context::ResponseContext;
use crate::message;
use crate::registry::ResponseTransform;

pub fn response() -> ResponseTransform {
    ResponseTransform::guarded("content-type", ResponseContext::has_body, set_content_type)
}

fn set_content_type(ctx: &mut ResponseContext) {
    message::set_header(
        &mut ctx.response,
        "Content-Type",
        &ctx.config.response_content_type,
    );
}
