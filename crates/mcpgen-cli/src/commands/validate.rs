use colored::Colorize;
use mcpgen_core::{validate_project_name, validate_tool_name};

pub fn run(name: &str, tools: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut failures = 0;

    failures += report("project name", name, validate_project_name(name));
    for tool in tools {
        failures += report("tool name", tool, validate_tool_name(tool));
    }

    if failures > 0 {
        return Err(format!("{} invalid name(s)", failures).into());
    }
    Ok(())
}

fn report(what: &str, value: &str, valid: bool) -> usize {
    if valid {
        println!("{} {} '{}' is valid", "✓".green().bold(), what, value);
        0
    } else {
        println!("{} {} '{}' is invalid", "✗".red().bold(), what, value);
        1
    }
}
