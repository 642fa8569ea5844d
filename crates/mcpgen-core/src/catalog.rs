//! Catalog of mcpgen's own operations, searchable at three detail levels so
//! a caller can discover them without reading every description.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{GeneratorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub use_cases: &'static [&'static str],
    pub full_description: &'static str,
}

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "tools-search",
        category: "discovery",
        description: "Search the catalog by query at a chosen detail level",
        use_cases: &[
            "Finding an operation without reading every description",
            "Keeping discovery output small",
            "Searching by keyword, category or use case",
        ],
        full_description: "Case-insensitive substring search over names, descriptions, \
categories and use cases.\n\nDetail levels:\n- name: names only\n- summary: name, description and category\n\
- full: the whole entry, including use cases and this long description",
    },
    CatalogEntry {
        name: "tools-info",
        category: "discovery",
        description: "Describe one catalog entry at a chosen detail level",
        use_cases: &[
            "Learning what a single operation does",
            "Fetching more detail only when needed",
            "Checking capabilities before running a command",
        ],
        full_description: "Looks up one entry by exact name.\n\nDetail levels:\n\
- summary: name, description and category\n- full: the whole entry\n\n\
An unknown name is an error that lists every entry name.",
    },
    CatalogEntry {
        name: "generate",
        category: "generation",
        description: "Generate a complete MCP server project with MCP and CLI entry points",
        use_cases: &[
            "Starting a new MCP server from scratch",
            "Adding an MCP server to an existing repository",
            "Scaffolding a package ready for PyPI",
        ],
        full_description: "Writes a Python package with:\n- a FastMCP server registering every tool\n\
- an argparse CLI with one subcommand per tool\n- business logic stubs\n- pytest tests\n\
- README.md and MCP-USAGE.md\n- GitHub Actions workflows for tests and publishing\n\
- setup.py, pyproject.toml, requirements.txt and MANIFEST.in\n\n\
Run in place (output `.`), existing .gitignore and MANIFEST.in gain only missing lines and \
README.md and MCP-USAGE.md gain a delimited section once.",
    },
    CatalogEntry {
        name: "preview",
        category: "generation",
        description: "Show what generate would write, with diffs, without writing",
        use_cases: &[
            "Checking a merge into an existing repository",
            "Reviewing generated files before committing to them",
        ],
        full_description: "Plans the same files as generate and prints, per file, whether it \
would be created, merged, appended or skipped. Files that would change get a unified diff.",
    },
    CatalogEntry {
        name: "validate",
        category: "validation",
        description: "Check a project name and tool names for Python packaging",
        use_cases: &[
            "Checking a name before generating",
            "Avoiding Python keyword clashes",
            "Keeping names PyPI compatible",
        ],
        full_description: "Project names use lowercase letters, digits, `-` and `_`, do not \
start with a digit or `-`, and are not Python keywords. Tool names must be Python identifiers \
that are not keywords.",
    },
    CatalogEntry {
        name: "schema",
        category: "validation",
        description: "Print the input schema synthesized for each tool in a tools file",
        use_cases: &[
            "Checking parameter types before generating",
            "Documenting a tool's call shape",
        ],
        full_description: "Reads a JSON array of tool definitions and prints, per tool, the \
object schema with typed properties and the list of required parameters.",
    },
    CatalogEntry {
        name: "command",
        category: "generation",
        description: "Write slash-command prompt files (.claude/commands/*.md) for MCP development",
        use_cases: &[
            "Adding slash commands to an assistant workspace",
            "Sharing a project-specific development workflow",
            "Guiding implementation of generated stubs",
        ],
        full_description: "Writes one markdown prompt per command. Kinds:\n\
- generator: walks through generating a server\n- best-practices: reviews design choices\n\
- implementation-helper: helps replace generated stubs\n- custom: uses the given prompt text",
    },
    CatalogEntry {
        name: "practices",
        category: "guidance",
        description: "Show MCP server development practices",
        use_cases: &[
            "Learning MCP design practices",
            "Understanding progressive disclosure",
            "Designing context-efficient tools",
        ],
        full_description: "Topics:\n- progressive_disclosure\n- tool_design\n- control_flow\n\
- security\n- state_management\n- testing\n\nAn unknown topic is an error that lists every topic.",
    },
    CatalogEntry {
        name: "guide",
        category: "guidance",
        description: "Show the step-by-step guide for finishing a generated server",
        use_cases: &[
            "Planning the work after generation",
            "Getting started with a generated project",
            "Publishing and connecting a server",
        ],
        full_description: "Steps: setup, implementation, testing, deployment and integration. \
Without a step the overview is shown first.",
    },
];

/// How much of a catalog entry to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Name,
    #[default]
    Summary,
    Full,
}

impl FromStr for DetailLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "name" => Ok(DetailLevel::Name),
            "summary" => Ok(DetailLevel::Summary),
            "full" => Ok(DetailLevel::Full),
            other => Err(format!("unknown detail level '{other}' (expected name, summary or full)")),
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DetailLevel::Name => write!(f, "name"),
            DetailLevel::Summary => write!(f, "summary"),
            DetailLevel::Full => write!(f, "full"),
        }
    }
}

/// A catalog entry cut down to a detail level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToolView {
    Name(&'static str),
    Summary {
        name: &'static str,
        description: &'static str,
        category: &'static str,
    },
    Full(&'static CatalogEntry),
}

impl ToolView {
    pub fn new(entry: &'static CatalogEntry, level: DetailLevel) -> Self {
        match level {
            DetailLevel::Name => ToolView::Name(entry.name),
            DetailLevel::Summary => ToolView::Summary {
                name: entry.name,
                description: entry.description,
                category: entry.category,
            },
            DetailLevel::Full => ToolView::Full(entry),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolView::Name(name) | ToolView::Summary { name, .. } => *name,
            ToolView::Full(entry) => entry.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub detail_level: DetailLevel,
    pub matches: Vec<ToolView>,
    pub count: usize,
}

impl CatalogEntry {
    fn matches(&self, needle: &str) -> bool {
        [self.name, self.description, self.category]
            .into_iter()
            .chain(self.use_cases.iter().copied())
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Entries whose name, description, category or a use case contain `query`,
/// ignoring case, in catalog order. An empty query matches everything.
pub fn search_tools(query: &str, level: DetailLevel) -> SearchResult {
    let needle = query.to_lowercase();
    let matches: Vec<ToolView> = CATALOG
        .iter()
        .filter(|entry| entry.matches(&needle))
        .map(|entry| ToolView::new(entry, level))
        .collect();
    log::debug!("catalog search '{}' matched {}", query, matches.len());
    SearchResult {
        query: query.to_string(),
        detail_level: level,
        count: matches.len(),
        matches,
    }
}

/// One entry by exact name.
pub fn tool_info(name: &str, level: DetailLevel) -> Result<ToolView> {
    CATALOG
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| ToolView::new(entry, level))
        .ok_or_else(|| GeneratorError::NotFound {
            what: "Tool",
            key: name.to_string(),
            available: CATALOG.iter().map(|entry| entry.name.to_string()).collect(),
        })
}
