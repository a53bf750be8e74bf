//! Shipped micro-transforms and the default registries.
//!
//! Each module exposes `request()` and/or `response()` returning the
//! transform record for its direction. Registration order below is the
//! execution order.

pub mod content_type;
pub mod facets;
pub mod field_list;
pub mod filter_query;
pub mod header;
pub mod hits;
pub mod multi_valued;
pub mod pagination;
pub mod query;
pub mod sort;
pub mod uri;

use crate::context::{RequestContext, ResponseContext};
use crate::endpoint::Endpoint;
use crate::registry::{TransformRegistry, TransformRegistryBuilder};

/// Request table, open for extension.
pub fn default_request_builder() -> TransformRegistryBuilder<RequestContext> {
    TransformRegistry::builder().endpoint_all(
        Endpoint::Select,
        [
            uri::request(),
            query::request(),
            pagination::request(),
            sort::request(),
            field_list::request(),
            filter_query::request(),
            facets::request(),
        ],
    )
}

/// Response table, open for extension.
pub fn default_response_builder() -> TransformRegistryBuilder<ResponseContext> {
    TransformRegistry::builder()
        .global(content_type::response())
        .endpoint_all(
            Endpoint::Select,
            [
                hits::response(),
                pagination::response(),
                field_list::response(),
                multi_valued::response(),
                facets::response(),
                header::response(),
            ],
        )
}

pub fn default_request_registry() -> TransformRegistry<RequestContext> {
    default_request_builder().build()
}

pub fn default_response_registry() -> TransformRegistry<ResponseContext> {
    default_response_builder().build()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_table_order() {
        let registry = default_request_registry();
        assert_eq!(
            registry.names_for(Endpoint::Select),
            vec![
                "uri-rewrite",
                "query",
                "pagination",
                "sort",
                "field-list",
                "filter-query",
                "facets"
            ]
        );
        assert!(registry.global().is_empty());
        assert!(registry.for_endpoint(Endpoint::Update).is_empty());
    }

    #[test]
    fn test_response_table_order() {
        assert_eq!(
            default_response_registry().names_for(Endpoint::Select),
            vec![
                "content-type",
                "hits-to-docs",
                "pagination",
                "field-list",
                "multi-valued",
                "facets",
                "response-header"
            ]
        );
    }

    #[test]
    fn test_non_select_responses_get_content_type_only() {
        assert_eq!(
            default_response_registry().names_for(Endpoint::Admin),
            vec!["content-type"]
        );
    }
}
