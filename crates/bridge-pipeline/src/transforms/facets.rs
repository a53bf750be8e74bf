//! Faceting: `facet.field`/`facet.query` into aggregations and back into
//! `facet_counts`.
//!
//! Field facets become `terms` aggregations keyed by field name. Query facets
//! become `filter` aggregations named `facet_query_<n>`, where `n` is the
//! position of the `facet.query` parameter; the response side maps the name
//! back to the original query text through the same parameter order.

use crate::context::{RequestContext, ResponseContext};
use crate::registry::{RequestTransform, ResponseTransform};
use bridge_query::parse_with;
use serde_json::{json, Map, Value};

const AGGREGATIONS: &str = "aggregations";
const QUERY_AGG_PREFIX: &str = "facet_query_";

/// Stand-in for Solr's "no limit"
const UNLIMITED: u64 = 65536;

pub fn request() -> RequestTransform {
    RequestTransform::guarded("facets", faceting_enabled, build_aggregations)
}

pub fn response() -> ResponseTransform {
    ResponseTransform::guarded("facets", has_aggregations, build_facet_counts)
}

fn faceting_enabled(ctx: &RequestContext) -> bool {
    ctx.params.flag("facet")
}

fn query_agg_name(index: usize) -> String {
    format!("{QUERY_AGG_PREFIX}{index}")
}

fn build_aggregations(ctx: &mut RequestContext) {
    let mut aggs = Map::new();

    for field in ctx.params.get_all("facet.field").filter(|f| !f.is_empty()) {
        let limit = match ctx.params.field_param(field, "facet.limit") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(n) if n < 0 => UNLIMITED,
                Ok(n) => n as u64,
                Err(_) => u64::from(ctx.config.default_facet_limit),
            },
            None => u64::from(ctx.config.default_facet_limit),
        };

        let mut terms = json!({ "field": field, "size": limit });
        if let Some(mincount) = ctx
            .params
            .field_param(field, "facet.mincount")
            .and_then(|m| m.trim().parse::<u64>().ok())
        {
            terms["min_doc_count"] = json!(mincount);
        }
        if ctx.params.field_param(field, "facet.sort") == Some("index") {
            terms["order"] = json!({ "_key": "asc" });
        }

        aggs.insert(field.to_string(), json!({ "terms": terms }));
    }

    let options = ctx.parser_options();
    for (index, query) in ctx.params.get_all("facet.query").enumerate() {
        aggs.insert(
            query_agg_name(index),
            json!({ "filter": parse_with(query, &options).to_json() }),
        );
    }

    if !aggs.is_empty() {
        ctx.body.insert("aggs".to_string(), Value::Object(aggs));
    }
}

fn has_aggregations(ctx: &ResponseContext) -> bool {
    ctx.body.contains_key(AGGREGATIONS)
}

fn build_facet_counts(ctx: &mut ResponseContext) {
    let Some(Value::Object(aggregations)) = ctx.body.remove(AGGREGATIONS) else {
        return;
    };

    let mut facet_queries = Map::new();
    for (index, query) in ctx.params.get_all("facet.query").enumerate() {
        let count = aggregations
            .get(&query_agg_name(index))
            .and_then(|agg| agg.get("doc_count"))
            .cloned()
            .unwrap_or(json!(0));
        facet_queries.insert(query.to_string(), count);
    }

    let mut facet_fields = Map::new();
    for field in ctx.params.get_all("facet.field") {
        let Some(buckets) = aggregations
            .get(field)
            .and_then(|agg| agg.get("buckets"))
            .and_then(Value::as_array)
        else {
            continue;
        };

        // Solr's flat form: key, count, key, count, ...
        let flat: Vec<Value> = buckets
            .iter()
            .flat_map(|bucket| {
                let key = bucket
                    .get("key_as_string")
                    .or_else(|| bucket.get("key"))
                    .cloned()
                    .unwrap_or(Value::Null);
                let count = bucket.get("doc_count").cloned().unwrap_or(json!(0));
                [key, count]
            })
            .collect();
        facet_fields.insert(field.to_string(), Value::Array(flat));
    }

    ctx.body.insert(
        "facet_counts".to_string(),
        json!({
            "facet_queries": facet_queries,
            "facet_fields": facet_fields,
            "facet_ranges": {},
            "facet_intervals": {},
            "facet_heatmaps": {}
        }),
    );
}
