use anyhow::{Context, Result};

use super::tool_registry;
use crate::config::Config;

/// List the registered tools with their JSON parameter schemas.
pub async fn run(config: &Config) -> Result<()> {
    let tools = tool_registry(config);

    if tools.is_empty() {
        println!("No tools registered.");
        return Ok(());
    }

    let schemas = tools.schemas();
    let text = serde_json::to_string_pretty(&schemas).context("Failed to serialize tool schemas")?;
    println!("{}", text);

    Ok(())
}
