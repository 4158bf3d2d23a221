//! Summary Markdown inspector
//!
//! Runs the core parsers over a Markdown file and prints the derived views as
//! JSON. Handy for checking how a generated summary will render before it
//! reaches the app.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin summanote-inspect -- summary.md sections
//! cargo run --bin summanote-inspect -- summary.md all
//! ```
//!
//! Views: `sections`, `toc`, `quotes`, `actions`, `terms`, `blocks`, `all`
//! (default).
//!
//! # Configuration
//!
//! Extraction limits are read from the JSON file named by `SUMMANOTE_CONFIG`,
//! falling back to `summanote.json` in the working directory. Logging honours
//! `RUST_LOG`.

use anyhow::{bail, Context};
use serde_json::{json, Value};
use summanote_core::config::CoreConfig;
use summanote_core::parsing::extract::{
    extract_action_items_with, extract_quotes_with, extract_terms_with, extract_toc_with,
};
use summanote_core::parsing::{markdown_to_blocks, parse_sections, SummaryExtraction};
use tracing_subscriber::EnvFilter;

const CONFIG_ENV_VAR: &str = "SUMMANOTE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "summanote.json";

fn usage() -> String {
    "usage: summanote-inspect <file.md> [sections|toc|quotes|actions|terms|blocks|all]".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("summanote_inspect=info,summanote_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!(usage());
    };
    let view = args.next().unwrap_or_else(|| "all".to_string());

    let config_path =
        std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = CoreConfig::load(&config_path)
        .await
        .with_context(|| format!("Failed to load config from {}", config_path))?
        .with_env_overrides();
    let limits = &config.extraction;

    let markdown = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path))?;
    tracing::info!("Inspecting {} ({} bytes) as '{}'", path, markdown.len(), view);

    let output: Value = match view.as_str() {
        "sections" => serde_json::to_value(parse_sections(&markdown))?,
        "toc" => serde_json::to_value(extract_toc_with(&markdown, limits))?,
        "quotes" => serde_json::to_value(extract_quotes_with(&markdown, limits))?,
        "actions" => serde_json::to_value(extract_action_items_with(&markdown, limits))?,
        "terms" => serde_json::to_value(extract_terms_with(&markdown, limits))?,
        "blocks" => serde_json::to_value(markdown_to_blocks(&markdown))?,
        "all" => json!({
            "sections": parse_sections(&markdown),
            "extraction": SummaryExtraction::from_markdown(&markdown, limits),
            "blocks": markdown_to_blocks(&markdown),
        }),
        other => bail!("Unknown view '{}'\n{}", other, usage()),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
