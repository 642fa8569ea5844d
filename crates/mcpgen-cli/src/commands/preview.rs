use colored::Colorize;
use mcpgen_core::merge::FileWrite;
use mcpgen_core::{FilePlan, Generator};

use super::generate::{glyph, RequestArgs};
use crate::config::CliConfig;

/// Show what `generate` would do, with diffs for files that already exist.
pub fn run(args: RequestArgs, config: CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let request = args.into_request(config)?;
    let plan = Generator::from_env()?.plan(&request)?;

    println!(
        "{} {} -> {}{}",
        "Preview".bold(),
        plan.package_name,
        plan.project_path.display(),
        if plan.in_place { " (in place)" } else { "" }
    );
    println!();

    let mut writes = 0;
    for file in &plan.files {
        println!("  {} {}  {}", glyph(&file.outcome), file.path, file.outcome.to_string().dimmed());
        if file.write.is_some() {
            writes += 1;
        }
        print_diff(file);
    }

    println!();
    println!(
        "{} {} of {} file(s) would be written; nothing was changed",
        "✓".green().bold(),
        writes,
        plan.files.len()
    );
    Ok(())
}

fn print_diff(file: &FilePlan) {
    let (Some(existing), Some(FileWrite::Append(_))) = (&file.existing, &file.write) else {
        return;
    };
    let Some(proposed) = file.proposed() else {
        return;
    };
    let patch = diffy::create_patch(existing, &proposed);
    for line in patch.to_string().lines() {
        let styled = if line.starts_with("+++") || line.starts_with("---") {
            line.bold()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else if line.starts_with("@@") {
            line.cyan()
        } else {
            line.normal()
        };
        println!("      {}", styled);
    }
}
