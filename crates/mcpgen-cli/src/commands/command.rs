use std::path::PathBuf;

use colored::Colorize;
use mcpgen_core::{generate_command_file, CommandKind, CommandRequest};

pub fn run(
    name: &str,
    kind: CommandKind,
    description: Option<String>,
    prompt: Option<String>,
    output_dir: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut request = CommandRequest::new(name, kind);
    request.description = description;
    request.custom_prompt = prompt;
    if let Some(dir) = output_dir {
        request.output_dir = dir;
    }

    let result = generate_command_file(&request);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    match (&result.file_path, &result.error) {
        (Some(path), None) => {
            if !json {
                println!(
                    "{} Wrote {} (use it as {})",
                    "✓".green().bold(),
                    path.display(),
                    format!("/{}", result.command_name).bold()
                );
            }
            Ok(())
        }
        (_, Some(error)) => Err(error.clone().into()),
        (None, None) => Err("command file was not written".into()),
    }
}
