use colored::Colorize;
use mcpgen_core::{search_tools, tool_info, DetailLevel, ToolView};

pub fn search(query: &str, detail: DetailLevel, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let result = search_tools(query, detail);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    if result.matches.is_empty() {
        println!("No catalog entries match '{}'", query);
        return Ok(());
    }
    for view in &result.matches {
        print!("{}", format_view(view));
    }
    println!("{} match(es) for '{}'", result.count, query);
    Ok(())
}

pub fn info(name: &str, detail: DetailLevel, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let view = tool_info(name, detail)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", format_view(&view));
    }
    Ok(())
}

fn format_view(view: &ToolView) -> String {
    match view {
        ToolView::Name(name) => format!("{}\n", name),
        ToolView::Summary {
            name,
            description,
            category,
        } => format!("{} {}\n  {}\n", name.bold(), format!("[{}]", category).dimmed(), description),
        ToolView::Full(entry) => {
            let mut out = format!(
                "{} {}\n  {}\n",
                entry.name.bold(),
                format!("[{}]", entry.category).dimmed(),
                entry.description
            );
            for case in entry.use_cases {
                out.push_str(&format!("    - {}\n", case));
            }
            out.push('\n');
            for line in entry.full_description.lines() {
                out.push_str(&format!("  {}\n", line));
            }
            out.push('\n');
            out
        }
    }
}
