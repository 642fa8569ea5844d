mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mcpgen_core::{CommandKind, DetailLevel};

use crate::commands::generate::RequestArgs;
use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "mcpgen", version, about = "Scaffold MCP server projects that merge safely into existing repos")]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ./mcpgen.toml, then ~/.config/mcpgen/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a project, merging into existing files where safe
    Generate {
        #[command(flatten)]
        request: RequestArgs,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show what generate would write, without writing
    Preview {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Check a project name and optional tool names
    Validate {
        name: String,
        /// Tool name to check (repeatable)
        #[arg(long = "tool")]
        tools: Vec<String>,
    },
    /// Print call schemas for a JSON tools file
    Schema { tools: PathBuf },
    /// Write a slash-command prompt file
    Command {
        /// Command name (`[a-z0-9_-]+`)
        name: String,
        /// generator, best-practices, implementation-helper or custom
        #[arg(long, default_value = "generator")]
        kind: CommandKind,
        #[arg(long)]
        description: Option<String>,
        /// Prompt body, required for the custom kind
        #[arg(long)]
        prompt: Option<String>,
        /// Directory for the file (default: .claude/commands)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Show MCP server development practices
    Practices {
        /// progressive_disclosure, tool_design, control_flow, security,
        /// state_management or testing (default: all)
        topic: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show the implementation guide for a generated project
    Guide {
        /// overview, setup, implementation, testing, deployment or integration
        /// (default: overview followed by every step)
        step: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Discover mcpgen's operations at a chosen detail level
    Tools {
        #[command(subcommand)]
        command: ToolsCommands,
    },
}

#[derive(Subcommand)]
enum ToolsCommands {
    /// Search names, descriptions, categories and use cases
    Search {
        query: String,
        /// name, summary or full
        #[arg(long, default_value = "summary")]
        detail: DetailLevel,
        #[arg(long)]
        json: bool,
    },
    /// Describe one operation by name
    Info {
        name: String,
        /// name, summary or full
        #[arg(long, default_value = "summary")]
        detail: DetailLevel,
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let result = match cli.command {
        Commands::Generate { request, json } => {
            CliConfig::from_process(cli.config.as_deref())
                .and_then(|config| commands::generate::run(request, config, json))
        }
        Commands::Preview { request } => {
            CliConfig::from_process(cli.config.as_deref())
                .and_then(|config| commands::preview::run(request, config))
        }
        Commands::Validate { ref name, ref tools } => commands::validate::run(name, tools),
        Commands::Schema { ref tools } => commands::schema::run(tools),
        Commands::Command {
            name,
            kind,
            description,
            prompt,
            output_dir,
            json,
        } => commands::command::run(&name, kind, description, prompt, output_dir, json),
        Commands::Practices { ref topic, json } => commands::guide::practices(topic.as_deref(), json),
        Commands::Guide { ref step, json } => commands::guide::guide(step.as_deref(), json),
        Commands::Tools { command } => match command {
            ToolsCommands::Search { ref query, detail, json } => commands::tools::search(query, detail, json),
            ToolsCommands::Info { ref name, detail, json } => commands::tools::info(name, detail, json),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
