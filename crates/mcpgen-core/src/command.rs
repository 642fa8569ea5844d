//! Slash-command prompt files that walk an assistant through using `mcpgen`.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use log::{info, warn};
use serde::Serialize;

use crate::validate::validate_command_name;

pub const DEFAULT_COMMAND_DIR: &str = ".claude/commands";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    Generator,
    BestPractices,
    ImplementationHelper,
    Custom,
}

impl FromStr for CommandKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('_', "-").as_str() {
            "generator" | "mcp-generator" => Ok(CommandKind::Generator),
            "best-practices" => Ok(CommandKind::BestPractices),
            "implementation-helper" => Ok(CommandKind::ImplementationHelper),
            "custom" => Ok(CommandKind::Custom),
            _ => Err(format!(
                "unknown command kind '{}' (expected generator, best-practices, implementation-helper or custom)",
                s
            )),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandKind::Generator => "generator",
            CommandKind::BestPractices => "best-practices",
            CommandKind::ImplementationHelper => "implementation-helper",
            CommandKind::Custom => "custom",
        };
        f.write_str(name)
    }
}

impl CommandKind {
    fn default_description(self) -> &'static str {
        match self {
            CommandKind::Generator => "Generate a new MCP server with a guided workflow",
            CommandKind::BestPractices => "MCP server design and implementation best practices",
            CommandKind::ImplementationHelper => "Help implement the tools of a generated MCP server",
            CommandKind::Custom => "Custom command",
        }
    }

    fn prompt(self) -> Option<&'static str> {
        match self {
            CommandKind::Generator => Some(GENERATOR_PROMPT),
            CommandKind::BestPractices => Some(BEST_PRACTICES_PROMPT),
            CommandKind::ImplementationHelper => Some(IMPLEMENTATION_HELPER_PROMPT),
            CommandKind::Custom => None,
        }
    }
}

const GENERATOR_PROMPT: &str = r#"You are helping the user scaffold a new MCP (Model Context Protocol) server with `mcpgen`.

1. **Understand the goal**
   - Ask what the server should do and who will call it.
   - Agree on a project name: lowercase letters, digits, `-` and `_`.

2. **Design the tools**
   - One tool per distinct action; names must be valid Python identifiers.
   - For each parameter pick a type (string, number, boolean) and decide whether it is required.
   - Write the tools to a `tools.json` file and check them with `mcpgen schema tools.json`.

3. **Generate**
   - Run `mcpgen preview` first when generating into an existing directory.
   - Then `mcpgen generate <name> --description "..." --tools tools.json`.

4. **Next steps**
   - Implement each function in `<package>/generator.py`.
   - Run `pip install -e ".[dev]"` and `pytest`.
"#;

const BEST_PRACTICES_PROMPT: &str = r#"Act as a reviewer for an MCP (Model Context Protocol) server generated by `mcpgen`.

Check the project against these practices:

- Tools do one thing and have descriptions written for the model that will call them.
- Parameters are typed, required only when there is no sensible default, and validated on entry.
- Tool results are compact JSON: filter and summarize data before returning it.
- Errors come back as structured results, not tracebacks.
- Secrets come from the environment, never from tool arguments or source files.
- Every tool has a test in `<package>/tests/`, and CI runs them on each push.

Point out concrete changes, file by file.
"#;

const IMPLEMENTATION_HELPER_PROMPT: &str = r#"You are helping the user implement an MCP (Model Context Protocol) server scaffolded by `mcpgen`.

1. **Read the scaffold**
   - `<package>/server.py` registers the tools and delegates to `<package>/generator.py`.
   - `<package>/cli.py` exposes the same functions on the command line.

2. **Implement**
   - Replace each stub in `generator.py` with real logic, returning JSON strings.
   - Keep the function signatures in step with the tool parameters.

3. **Test**
   - Extend `<package>/tests/test_generator.py` with real expectations.
   - Run `pytest --cov` and explain any failure before fixing it.

4. **Ship**
   - Tag a release; the generated release workflow builds and publishes the package.
"#;

#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub name: String,
    pub kind: CommandKind,
    pub description: Option<String>,
    /// Body for [`CommandKind::Custom`].
    pub custom_prompt: Option<String>,
    pub output_dir: PathBuf,
}

impl CommandRequest {
    pub fn new(name: &str, kind: CommandKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            description: None,
            custom_prompt: None,
            output_dir: PathBuf::from(DEFAULT_COMMAND_DIR),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandResult {
    pub success: bool,
    pub command_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResult {
    fn failed(name: &str, error: String) -> Self {
        warn!("command file '{}' not written: {}", name, error);
        CommandResult {
            success: false,
            command_name: name.to_string(),
            file_path: None,
            usage: None,
            description: None,
            error: Some(error),
        }
    }
}

/// Write `<output_dir>/<name>.md`. Failures are returned in the result.
pub fn generate_command_file(request: &CommandRequest) -> CommandResult {
    if !validate_command_name(&request.name) {
        return CommandResult::failed(
            &request.name,
            format!("Invalid command name: '{}'", request.name),
        );
    }

    let prompt = match (request.kind.prompt(), request.custom_prompt.as_deref()) {
        (Some(builtin), _) => builtin,
        (None, Some(custom)) if !custom.trim().is_empty() => custom,
        (None, _) => {
            return CommandResult::failed(
                &request.name,
                "custom_prompt is required when command kind is 'custom'".to_string(),
            )
        }
    };

    let description = match &request.description {
        Some(text) if !text.trim().is_empty() => single_line(text),
        _ if request.kind == CommandKind::Custom => format!("Custom command: {}", request.name),
        _ => request.kind.default_description().to_string(),
    };

    let file_path = request.output_dir.join(format!("{}.md", request.name));
    let content = format!(
        "---\ndescription: {}\n---\n\n{}{}",
        description,
        prompt,
        if prompt.ends_with('\n') { "" } else { "\n" }
    );

    let written = fs::create_dir_all(&request.output_dir).and_then(|_| fs::write(&file_path, content));
    match written {
        Ok(()) => {
            info!("wrote command file {}", file_path.display());
            CommandResult {
                success: true,
                command_name: request.name.clone(),
                file_path: Some(file_path),
                usage: Some(format!("/{}", request.name)),
                description: Some(description),
                error: None,
            }
        }
        Err(err) => CommandResult::failed(
            &request.name,
            format!("Failed to create command file {}: {}", file_path.display(), err),
        ),
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
