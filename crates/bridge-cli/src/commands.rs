//! Subcommand implementations. Each returns the JSON to print.

use anyhow::{Context, Result};
use bridge_pipeline::{message, Translator, TranslatorConfig};
use bridge_query::{build_edismax, parse_with, ParserOptions};
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Load the translator config, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<TranslatorConfig> {
    match path {
        Some(path) => TranslatorConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(TranslatorConfig::default()),
    }
}

pub fn parse(
    config: &TranslatorConfig,
    query: &str,
    df: Option<&str>,
    qf: Option<&str>,
    mm: Option<&str>,
) -> Value {
    let node = match qf {
        Some(qf) => build_edismax(query, qf, mm),
        None => {
            let options =
                ParserOptions::with_default_field(df.unwrap_or(&config.default_field));
            parse_with(query, &options)
        }
    };
    debug!(?node, "parsed query");
    node.to_json()
}

pub fn request(translator: &Translator, input: &Path) -> Result<Value> {
    let message = read_message(input)?;
    Ok(translator.transform_request(message))
}

pub fn response(translator: &Translator, input: &Path) -> Result<Value> {
    let pair = read_message(input)?;
    Ok(translator.transform_response(pair))
}

/// Read one JSON object from a file, or from stdin when `input` is `-`.
fn read_message(input: &Path) -> Result<Value> {
    let text = if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        text
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?
    };

    message::decode(&text).with_context(|| format!("invalid message in {}", input.display()))
}
