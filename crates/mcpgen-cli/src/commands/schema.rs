use std::fs;
use std::path::Path;

use mcpgen_core::{generate_tool_schema, parse_tools, validate_tool_name, GeneratorError, Schema};

/// Print the call schemas for a tools file as JSON.
pub fn run(tools_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let tools = parse_tools(&fs::read_to_string(tools_path)?)?;
    if let Some(bad) = tools.iter().find(|t| !validate_tool_name(&t.name)) {
        return Err(GeneratorError::InvalidToolName(bad.name.clone()).into());
    }
    let schemas: Vec<Schema> = tools.iter().map(generate_tool_schema).collect();
    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(())
}
