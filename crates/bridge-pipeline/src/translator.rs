//! Entry points for the hosting layer.
//!
//! A [`Translator`] owns the config and both registries. It is `Send + Sync`
//! and meant to be built once and shared; every call builds its own context.

use crate::config::TranslatorConfig;
use crate::context::{RequestContext, ResponseContext};
use crate::endpoint::Endpoint;
use crate::message;
use crate::registry::{run_pipeline, TransformRegistry};
use crate::transforms;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub struct Translator {
    config: Arc<TranslatorConfig>,
    requests: TransformRegistry<RequestContext>,
    responses: TransformRegistry<ResponseContext>,
}

impl Translator {
    /// Translator with the shipped transform tables.
    pub fn new(config: TranslatorConfig) -> Self {
        Self::with_registries(
            config,
            transforms::default_request_registry(),
            transforms::default_response_registry(),
        )
    }

    /// Translator with caller-assembled tables.
    pub fn with_registries(
        config: TranslatorConfig,
        requests: TransformRegistry<RequestContext>,
        responses: TransformRegistry<ResponseContext>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            requests,
            responses,
        }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate a legacy request message.
    ///
    /// Non-object input and requests to unrecognized endpoints are returned
    /// unchanged.
    pub fn transform_request(&self, request: Value) -> Value {
        let Value::Object(map) = request else {
            return request;
        };

        let endpoint = Endpoint::classify(message::path(&map));
        if endpoint == Endpoint::Unknown {
            debug!(uri = message::uri(&map), "unknown endpoint, passing request through");
            return Value::Object(map);
        }

        let mut ctx = RequestContext::build(map, Arc::clone(&self.config));
        let applied = run_pipeline(&self.requests, &mut ctx);
        debug!(%endpoint, applied, "request translated");

        Value::Object(ctx.into_message())
    }

    /// Translate a `{ request, response }` pair. Only the response body is
    /// rewritten; the request is context.
    ///
    /// Pairs missing either side, and responses to unrecognized endpoints,
    /// are returned unchanged.
    pub fn transform_response(&self, pair: Value) -> Value {
        let Value::Object(mut pair) = pair else {
            return pair;
        };

        let request = message::take_object(&mut pair, message::REQUEST_KEY);
        let response = message::take_object(&mut pair, message::RESPONSE_KEY);
        let (request, response) = match (request, response) {
            (Some(request), Some(response)) => (request, response),
            (request, response) => {
                if let Some(request) = request {
                    pair.insert(message::REQUEST_KEY.to_string(), Value::Object(request));
                }
                if let Some(response) = response {
                    pair.insert(message::RESPONSE_KEY.to_string(), Value::Object(response));
                }
                debug!("response pair incomplete, passing through");
                return Value::Object(pair);
            }
        };

        let mut ctx = ResponseContext::build(request, response, Arc::clone(&self.config));
        if ctx.endpoint == Endpoint::Unknown {
            debug!("unknown endpoint, passing response through");
        } else {
            let applied = run_pipeline(&self.responses, &mut ctx);
            debug!(endpoint = %ctx.endpoint, applied, "response translated");
        }

        let (request, response) = ctx.into_parts();
        pair.insert(message::REQUEST_KEY.to_string(), Value::Object(request));
        pair.insert(message::RESPONSE_KEY.to_string(), Value::Object(response));
        Value::Object(pair)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(TranslatorConfig::default())
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("config", &self.config)
            .field("requests", &self.requests)
            .field("responses", &self.responses)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_translator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Translator>();
    }

    #[test]
    fn test_non_object_passes_through() {
        let translator = Translator::default();
        assert_eq!(translator.transform_request(json!("x")), json!("x"));
        assert_eq!(translator.transform_response(json!([1])), json!([1]));
    }

    #[test]
    fn test_incomplete_pair_passes_through() {
        let translator = Translator::default();
        let pair = json!({ "request": { "URI": "/solr/c/select" }, "response": "oops" });
        assert_eq!(translator.transform_response(pair.clone()), pair);
    }

    #[test]
    fn test_unknown_endpoint_response_untouched() {
        let translator = Translator::default();
        let pair = json!({
            "request": { "URI": "/other/path" },
            "response": { "statusCode": 200, "payload": { "inlinedJsonBody": { "hits": {} } } }
        });
        assert_eq!(translator.transform_response(pair.clone()), pair);
    }
}
