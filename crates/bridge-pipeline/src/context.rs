//! Per-message translation contexts.
//!
//! A context is built once per message, handed through the pipeline, and
//! then turned back into the host message. The body is detached from the
//! message while the pipeline runs so transforms can edit both the message
//! envelope (URI, method, headers) and the body without aliasing.

use crate::config::TranslatorConfig;
use crate::endpoint::{self, Endpoint};
use crate::message;
use crate::params::QueryParams;
use bridge_query::ParserOptions;
use serde_json::{Map, Value};
use std::sync::Arc;

/// What the pipeline runner needs from a context.
pub trait PipelineContext {
    fn endpoint(&self) -> Endpoint;
}

/// Classification shared by request and response contexts, always derived
/// from the request.
#[derive(Debug, Clone)]
struct Classified {
    endpoint: Endpoint,
    collection: Option<String>,
    params: QueryParams,
}

impl Classified {
    fn from_request(request: &Map<String, Value>) -> Self {
        let (path, query) = message::split_uri(message::uri(request));
        Self {
            endpoint: Endpoint::classify(path),
            collection: endpoint::collection(path),
            params: query.map(QueryParams::parse).unwrap_or_default(),
        }
    }
}

/// Context for translating one inbound request.
#[derive(Debug)]
pub struct RequestContext {
    /// The request envelope; its body lives in `body` until the pipeline ends
    pub message: Map<String, Value>,
    pub endpoint: Endpoint,
    pub collection: Option<String>,
    pub params: QueryParams,
    /// Mutable request body
    pub body: Map<String, Value>,
    pub config: Arc<TranslatorConfig>,
    had_body: bool,
}

impl RequestContext {
    /// Classify a request and detach its body.
    pub fn build(mut message: Map<String, Value>, config: Arc<TranslatorConfig>) -> Self {
        let classified = Classified::from_request(&message);
        let (body, had_body) = message::take_body(&mut message);

        Self {
            message,
            endpoint: classified.endpoint,
            collection: classified.collection,
            params: classified.params,
            body,
            config,
            had_body,
        }
    }

    /// Reattach the body and return the request.
    pub fn into_message(self) -> Map<String, Value> {
        let mut message = self.message;
        if self.had_body || !self.body.is_empty() {
            message::put_body(&mut message, self.body);
        }
        message
    }

    /// Whether the envelope already addresses the target search API.
    pub fn targets_search(&self) -> bool {
        message::method(&self.message).eq_ignore_ascii_case("POST")
            && message::path(&self.message).ends_with("/_search")
    }

    /// Parser settings for this request; `df` overrides the configured default.
    pub fn parser_options(&self) -> ParserOptions {
        parser_options(&self.params, &self.config)
    }
}

impl PipelineContext for RequestContext {
    fn endpoint(&self) -> Endpoint {
        self.endpoint
    }
}

/// Context for translating one response, paired with its request.
#[derive(Debug)]
pub struct ResponseContext {
    request: Map<String, Value>,
    /// The response envelope; its body lives in `body` until the pipeline ends
    pub response: Map<String, Value>,
    pub endpoint: Endpoint,
    pub collection: Option<String>,
    /// Parameters of the original request
    pub params: QueryParams,
    /// Mutable response body
    pub body: Map<String, Value>,
    pub config: Arc<TranslatorConfig>,
    had_body: bool,
}

impl ResponseContext {
    /// Classify from the request and detach the response body.
    pub fn build(
        request: Map<String, Value>,
        mut response: Map<String, Value>,
        config: Arc<TranslatorConfig>,
    ) -> Self {
        let classified = Classified::from_request(&request);
        let (body, had_body) = message::take_body(&mut response);

        Self {
            request,
            response,
            endpoint: classified.endpoint,
            collection: classified.collection,
            params: classified.params,
            body,
            config,
            had_body,
        }
    }

    /// The original request. Read-only.
    pub fn request(&self) -> &Map<String, Value> {
        &self.request
    }

    /// Whether the response carried a body or the pipeline produced one.
    pub fn has_body(&self) -> bool {
        self.had_body || !self.body.is_empty()
    }

    /// HTTP status of the response, when present.
    pub fn status(&self) -> Option<u64> {
        self.response.get(message::STATUS_KEY).and_then(Value::as_u64)
    }

    pub fn parser_options(&self) -> ParserOptions {
        parser_options(&self.params, &self.config)
    }

    /// Reattach the body and return `(request, response)`.
    pub fn into_parts(self) -> (Map<String, Value>, Map<String, Value>) {
        let mut response = self.response;
        if self.had_body || !self.body.is_empty() {
            message::put_body(&mut response, self.body);
        }
        (self.request, response)
    }
}

impl PipelineContext for ResponseContext {
    fn endpoint(&self) -> Endpoint {
        self.endpoint
    }
}

fn parser_options(params: &QueryParams, config: &TranslatorConfig) -> ParserOptions {
    ParserOptions::with_default_field(params.get("df").unwrap_or(&config.default_field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn config() -> Arc<TranslatorConfig> {
        Arc::new(TranslatorConfig::default())
    }

    #[test]
    fn test_build_request_context() {
        let ctx = RequestContext::build(
            object(json!({
                "method": "GET",
                "URI": "/solr/books/select?q=title:x&fq=a:1&fq=b:2",
                "payload": { "inlinedJsonBody": { "k": "v" } }
            })),
            config(),
        );

        assert_eq!(ctx.endpoint, Endpoint::Select);
        assert_eq!(ctx.collection.as_deref(), Some("books"));
        assert_eq!(ctx.params.get_all("fq").count(), 2);
        assert_eq!(ctx.body.get("k"), Some(&json!("v")));
        assert!(!ctx.targets_search());
    }

    #[test]
    fn test_missing_body_becomes_empty_map() {
        let ctx = RequestContext::build(
            object(json!({ "method": "GET", "URI": "/solr/books/select" })),
            config(),
        );
        assert!(ctx.body.is_empty());
        assert!(ctx.params.is_empty());

        // Nothing written back when nothing was there and nothing was added
        let message = ctx.into_message();
        assert!(!message.contains_key("payload"));
    }

    #[test]
    fn test_into_message_writes_body_back() {
        let mut ctx = RequestContext::build(
            object(json!({ "method": "GET", "URI": "/solr/books/select" })),
            config(),
        );
        ctx.body.insert("size".into(), json!(3));

        let message = ctx.into_message();
        assert_eq!(message["payload"]["inlinedJsonBody"], json!({ "size": 3 }));
    }

    #[test]
    fn test_targets_search_after_rewrite() {
        let ctx = RequestContext::build(
            object(json!({ "method": "post", "URI": "/books/_search" })),
            config(),
        );
        assert!(ctx.targets_search());
        assert_eq!(ctx.endpoint, Endpoint::Unknown);
    }

    #[test]
    fn test_response_context_uses_request_classification() {
        let ctx = ResponseContext::build(
            object(json!({ "URI": "/solr/books/select?start=20&df=body" })),
            object(json!({
                "statusCode": 200,
                "payload": { "inlinedJsonBody": { "hits": {} } }
            })),
            config(),
        );

        assert_eq!(ctx.endpoint, Endpoint::Select);
        assert_eq!(ctx.params.get("start"), Some("20"));
        assert_eq!(ctx.status(), Some(200));
        assert!(ctx.body.contains_key("hits"));
        assert_eq!(ctx.parser_options().default_field, "body");
    }

    #[test]
    fn test_parser_options_default_from_config() {
        let ctx = RequestContext::build(
            object(json!({ "URI": "/solr/books/select" })),
            Arc::new(TranslatorConfig {
                default_field: "text".into(),
                ..Default::default()
            }),
        );
        assert_eq!(ctx.parser_options().default_field, "text");
    }
}
