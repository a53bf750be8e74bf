//! Request/response translation between a legacy Solr-style search API and
//! the target engine's JSON search API.
//!
//! ## Architecture
//!
//! ```text
//! host message → RequestContext ─┐
//!                                ├─ run_pipeline(registry) → host message
//! {request, response} → ResponseContext ─┘
//! ```
//!
//! - **`context`**: per-message contexts (endpoint, collection, ordered
//!   parameters, detached body)
//! - **`registry`**: ordered transform tables and the pipeline runner
//! - **`transforms`**: the shipped micro-transforms and default tables
//! - **`translator`**: [`Translator`], the entry point for the host
//!
//! Query syntax itself lives in `bridge_query`.
//!
//! ## Usage
//!
//! ```rust
//! use bridge_pipeline::{Translator, TranslatorConfig};
//! use serde_json::json;
//!
//! let translator = Translator::new(TranslatorConfig::default());
//! let out = translator.transform_request(json!({
//!     "method": "GET",
//!     "URI": "/solr/books/select?q=title:dune&rows=5",
//! }));
//!
//! assert_eq!(out["URI"], "/books/_search");
//! assert_eq!(out["payload"]["inlinedJsonBody"]["size"], 5);
//! ```

pub mod config;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod message;
pub mod params;
pub mod registry;
pub mod transforms;
pub mod translator;

pub use config::TranslatorConfig;
pub use context::{PipelineContext, RequestContext, ResponseContext};
pub use endpoint::Endpoint;
pub use error::{BridgeError, BridgeResult};
pub use params::QueryParams;
pub use registry::{
    run_pipeline, MicroTransform, RequestTransform, ResponseTransform, TransformRegistry,
    TransformRegistryBuilder,
};
pub use transforms::{
    default_request_builder, default_request_registry, default_response_builder,
    default_response_registry,
};
pub use translator::Translator;
