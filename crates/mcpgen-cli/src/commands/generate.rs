use std::fs;
use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use mcpgen_core::{parse_tools, GenerationRequest, Generator, MergeOutcome, PrefixPolicy, ToolDefinition};

use crate::config::CliConfig;

/// Request fields shared by `generate` and `preview`.
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Project name (lowercase letters, digits, `-` and `_`)
    pub name: String,
    /// One-line project description
    #[arg(short, long)]
    pub description: String,
    /// Author name [env: MCPGEN_AUTHOR]
    #[arg(long)]
    pub author: Option<String>,
    /// Author email [env: MCPGEN_AUTHOR_EMAIL]
    #[arg(long)]
    pub email: Option<String>,
    /// JSON file with an array of tool definitions
    #[arg(long)]
    pub tools: Option<PathBuf>,
    /// Tool as `name:description` (repeatable)
    #[arg(long = "tool", value_name = "NAME:DESCRIPTION")]
    pub tool: Vec<String>,
    /// Parent directory for the project; `.` generates in place
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Minimum Python version, floored at 3.10 [env: MCPGEN_PYTHON_VERSION]
    #[arg(long)]
    pub python_version: Option<String>,
    /// Package prefix: AUTO, NONE or a literal [env: MCPGEN_PREFIX]
    #[arg(long)]
    pub prefix: Option<String>,
}

impl RequestArgs {
    /// Merge flags over config and build the request.
    pub fn into_request(self, config: CliConfig) -> Result<GenerationRequest, Box<dyn std::error::Error>> {
        let mut tools: Vec<ToolDefinition> = match &self.tools {
            Some(path) => parse_tools(&fs::read_to_string(path)?)?,
            None => Vec::new(),
        };
        tools.extend(self.tool.iter().map(|flag| parse_tool_flag(flag)));

        let author = self
            .author
            .or(config.author)
            .ok_or("no author given: pass --author or set MCPGEN_AUTHOR")?;
        let email = self
            .email
            .or(config.author_email)
            .ok_or("no author email given: pass --email or set MCPGEN_AUTHOR_EMAIL")?;

        let mut request = GenerationRequest::new(&self.name, &self.description, &author, &email, tools);
        if let Some(dir) = self.output_dir.or(config.output_dir) {
            request = request.with_output_dir(dir);
        }
        if let Some(version) = self.python_version.or(config.python_version) {
            request = request.with_python_version(&version);
        }
        if let Some(prefix) = self.prefix.or(config.prefix) {
            let policy: PrefixPolicy = match prefix.parse() {
                Ok(policy) => policy,
                Err(never) => match never {},
            };
            request = request.with_prefix(policy);
        }
        Ok(request)
    }
}

/// `name:description`; the description may be omitted.
fn parse_tool_flag(flag: &str) -> ToolDefinition {
    match flag.split_once(':') {
        Some((name, description)) => ToolDefinition::new(name.trim(), description.trim()),
        None => ToolDefinition::new(flag.trim(), ""),
    }
}

pub fn run(args: RequestArgs, config: CliConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let request = args.into_request(config)?;
    let result = Generator::from_env()?.generate(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for report in &result.reports {
            println!("  {} {}  {}", glyph(&report.outcome), report.path, report.outcome.to_string().dimmed());
        }
        println!();
    }

    if let Some(error) = &result.error {
        return Err(format!("{} (after {} file(s))", error.message, result.reports.len()).into());
    }
    if !json {
        println!(
            "{} Generated {} at {} ({})",
            "✓".green().bold(),
            result.package_name.bold(),
            result.project_path.display(),
            result
        );
    }
    Ok(())
}

pub fn glyph(outcome: &MergeOutcome) -> String {
    match outcome {
        MergeOutcome::Created => format!("{}", "+".green().bold()),
        MergeOutcome::Merged { .. } => format!("{}", "~".yellow().bold()),
        MergeOutcome::Appended { .. } => format!("{}", ">".cyan().bold()),
        MergeOutcome::Skipped { .. } => format!("{}", "-".dimmed()),
        MergeOutcome::Conflict => format!("{}", "✗".red().bold()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> RequestArgs {
        RequestArgs {
            name: "demo".into(),
            description: "Demo".into(),
            author: None,
            email: Some("flag@example.com".into()),
            tools: None,
            tool: vec!["ping:Ping a host".into(), "noop".into()],
            output_dir: None,
            python_version: None,
            prefix: None,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let config = CliConfig {
            author: Some("Config Author".into()),
            author_email: Some("config@example.com".into()),
            prefix: Some("NONE".into()),
            ..Default::default()
        };
        let request = args().into_request(config).unwrap();
        assert_eq!(request.author, "Config Author");
        assert_eq!(request.author_email, "flag@example.com");
        assert_eq!(request.prefix, PrefixPolicy::None);
        assert_eq!(request.tools.len(), 2);
        assert_eq!(request.tools[0].description, "Ping a host");
        assert_eq!(request.tools[1].name, "noop");
    }

    #[test]
    fn test_missing_author_is_an_error() {
        let err = args().into_request(CliConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--author"));
    }
}
