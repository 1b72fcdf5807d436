use anyhow::{Context, Result};
use serde_json::json;
use tracing::warn;

use super::tool_registry;
use crate::config::Config;
use crate::tools::ToolResponse;

const SEARCH_TOOL: &str = "search_symbol";

/// Run a symbol lookup through the configured tool registry and print it.
pub async fn run(config: &Config, name: &str, kind: Option<&str>, as_json: bool) -> Result<()> {
    let tools = tool_registry(config);
    if !tools.has(SEARCH_TOOL) {
        warn!("Tool '{}' is not bound in the configuration", SEARCH_TOOL);
    }

    let response = tools
        .call(SEARCH_TOOL, json!({ "symbol_name": name, "kind": kind }))
        .await;

    if as_json {
        let text = serde_json::to_string_pretty(&response)
            .context("Failed to serialize tool response")?;
        println!("{}", text);
    } else {
        print_response(&response);
    }

    Ok(())
}

fn print_response(response: &ToolResponse) {
    match &response.output {
        Some(output) if response.is_success() => println!("{}", output),
        _ => eprintln!("{}", response.summary),
    }
}
