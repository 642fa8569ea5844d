use std::fmt::Write;

use colored::Colorize;
use mcpgen_core::{guide_overview, guide_step, practice, GuideStep, Practice, GUIDE_STEPS, PRACTICES};

/// `mcpgen practices [topic]`: one topic, or all of them.
pub fn practices(topic: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let selected: Vec<&Practice> = match topic {
        Some(topic) => vec![practice(topic)?],
        None => PRACTICES.iter().collect(),
    };
    if json {
        match topic {
            Some(topic) => println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({"topic": topic, "practice": selected[0]}))?
            ),
            None => println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({"best_practices": selected, "count": selected.len()}))?
            ),
        }
        return Ok(());
    }
    for p in selected {
        print!("{}", format_practice(p));
    }
    Ok(())
}

/// `mcpgen guide [step]`: no step (or `overview`) shows the overview; without
/// a step every step follows it.
pub fn guide(step: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let steps: Vec<&GuideStep> = match step {
        None => GUIDE_STEPS.iter().collect(),
        Some("overview") => Vec::new(),
        Some(step) => vec![guide_step(step)?],
    };
    let show_overview = matches!(step, None | Some("overview"));

    if json {
        let value = match step {
            Some("overview") => serde_json::json!({"step": "overview", "guide": guide_overview()}),
            Some(step) => serde_json::json!({"step": step, "guide": steps[0]}),
            None => serde_json::json!({"overview": guide_overview(), "steps": steps}),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if show_overview {
        let overview = guide_overview();
        println!("{}", overview.title.bold());
        println!("{}", overview.description);
        for (i, name) in overview.steps.iter().enumerate() {
            println!("  {}. {}", i + 1, name);
        }
        println!();
    }
    for s in steps {
        print!("{}", format_step(s));
    }
    Ok(())
}

fn bullets(out: &mut String, heading: &str, items: &[&str]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {}", heading.underline());
    for item in items {
        let _ = writeln!(out, "    - {}", item);
    }
}

fn format_practice(p: &Practice) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", p.title.bold(), format!("({})", p.topic).dimmed());
    let _ = writeln!(out, "  {}", p.summary);
    bullets(&mut out, "Principles", p.principles);
    bullets(&mut out, "Benefits", p.benefits);
    if let Some(example) = p.example {
        let _ = writeln!(out, "  Example: {}", example);
    }
    out.push('\n');
    out
}

fn format_step(s: &GuideStep) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", s.title.bold(), format!("({})", s.step).dimmed());
    let _ = writeln!(out, "  {}", s.description);
    for (i, item) in s.steps.iter().enumerate() {
        let _ = writeln!(out, "    {}. {}", i + 1, item);
    }
    bullets(&mut out, "Files created", s.files_created);
    bullets(&mut out, "Best practices", s.best_practices);
    bullets(&mut out, "Commands", s.commands);
    bullets(&mut out, "Requirements", s.requirements);
    if let Some(example) = &s.config_example {
        let _ = writeln!(out, "  Client config:");
        if let Ok(config) = serde_json::to_string_pretty(example) {
            for line in config.lines() {
                let _ = writeln!(out, "    {}", line);
            }
        }
    }
    out.push('\n');
    out
}
