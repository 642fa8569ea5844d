//! Built-in guidance: development practices for MCP servers and the
//! step-by-step guide for finishing a generated project.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::{GeneratorError, Result};

fn is_empty(items: &[&str]) -> bool {
    items.is_empty()
}

/// One development practice, keyed by `topic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Practice {
    pub topic: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub principles: &'static [&'static str],
    #[serde(skip_serializing_if = "is_empty")]
    pub benefits: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<&'static str>,
}

pub const PRACTICES: &[Practice] = &[
    Practice {
        topic: "progressive_disclosure",
        title: "Progressive Disclosure",
        summary: "Make tools discoverable instead of loading every definition up front",
        principles: &[
            "Offer a search capability that finds tools by query",
            "Accept a detail level: name only, name with description, or the full entry",
            "Let the agent read a definition when it needs one",
            "Lay tools out like a browsable tree; models navigate those well",
        ],
        benefits: &[
            "Smaller initial context",
            "Scales to hundreds of tools",
            "Faster tool discovery",
        ],
        example: None,
    },
    Practice {
        topic: "tool_design",
        title: "Context-Efficient Tool Design",
        summary: "Filter and shape data before it reaches the model",
        principles: &[
            "Do the processing inside the tool, not in the conversation",
            "Aggregate, join and filter before returning",
            "Return only what the caller asked about",
            "Never stream a large dataset through the context window",
        ],
        benefits: &[],
        example: Some("Scan a 10,000-row spreadsheet inside the tool and return the 5 matching rows"),
    },
    Practice {
        topic: "control_flow",
        title: "Control Flow in Code",
        summary: "Put loops and branching in the tool rather than in chains of tool calls",
        principles: &[
            "Handle loops, conditionals and retries in the implementation",
            "Keep repetitive work out of the call-and-reason cycle",
            "Report one result for one logical operation",
        ],
        benefits: &["Fewer round trips", "Lower latency", "Fewer tokens spent"],
        example: None,
    },
    Practice {
        topic: "security",
        title: "Privacy and Security",
        summary: "Sensitive data stays in the execution environment unless returned on purpose",
        principles: &[
            "Only explicit return values and logs reach the model",
            "Tokenize personal data before it leaves the tool",
            "Write down deterministic rules for where data may flow",
            "Sandbox any code the server executes",
        ],
        benefits: &[],
        example: None,
    },
    Practice {
        topic: "state_management",
        title: "State and Reusable Skills",
        summary: "Support resumable work and capabilities that outlive one session",
        principles: &[
            "Let agents persist intermediate results to files",
            "Allow reusable functions to be saved as skills",
            "Ship a SKILL.md next to each saved skill",
            "Grow the toolbox with higher-level capabilities over time",
        ],
        benefits: &[],
        example: None,
    },
    Practice {
        topic: "testing",
        title: "Testing and Validation",
        summary: "Cover both the protocol surface and the business logic",
        principles: &[
            "Test protocol registration as well as each tool's behavior",
            "Exercise the async entry points",
            "Check schemas and parameter handling",
            "Test error paths and edge cases",
        ],
        benefits: &[],
        example: None,
    },
];

/// Look up a practice by topic.
pub fn practice(topic: &str) -> Result<&'static Practice> {
    PRACTICES
        .iter()
        .find(|p| p.topic == topic)
        .ok_or_else(|| GeneratorError::NotFound {
            what: "Topic",
            key: topic.to_string(),
            available: PRACTICES.iter().map(|p| p.topic.to_string()).collect(),
        })
}

/// Client launch entry, serialized as `{"mcpServers": {server: {command, args}}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchExample {
    pub server: &'static str,
    pub command: &'static str,
    pub args: &'static [&'static str],
}

impl Serialize for LaunchExample {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Launch<'a> {
            command: &'a str,
            args: &'a [&'a str],
        }
        struct Servers<'a>(&'a LaunchExample);
        impl Serialize for Servers<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(
                    self.0.server,
                    &Launch {
                        command: self.0.command,
                        args: self.0.args,
                    },
                )?;
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("mcpServers", &Servers(self))?;
        map.end()
    }
}

/// One stage of the implementation guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuideStep {
    pub step: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub steps: &'static [&'static str],
    #[serde(skip_serializing_if = "is_empty")]
    pub files_created: &'static [&'static str],
    #[serde(skip_serializing_if = "is_empty")]
    pub best_practices: &'static [&'static str],
    #[serde(skip_serializing_if = "is_empty")]
    pub commands: &'static [&'static str],
    #[serde(skip_serializing_if = "is_empty")]
    pub requirements: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_example: Option<LaunchExample>,
}

const NO_EXTRAS: GuideStep = GuideStep {
    step: "",
    title: "",
    description: "",
    steps: &[],
    files_created: &[],
    best_practices: &[],
    commands: &[],
    requirements: &[],
    config_example: None,
};

pub const GUIDE_STEPS: &[GuideStep] = &[
    GuideStep {
        step: "setup",
        title: "Project Setup",
        description: "Create the project and install it for development",
        steps: &[
            "Run `mcpgen generate <name> --description ... --tool name:description`",
            "Read the generated README.md and MCP-USAGE.md",
            "Install in editable mode: pip install -e .",
            "Check pyproject.toml and setup.py metadata",
        ],
        files_created: &[
            "server.py (MCP tool registrations)",
            "cli.py (argparse front end)",
            "generator.py (business logic stubs marked TODO)",
            "tests/ (server and generator tests)",
            "README.md and MCP-USAGE.md",
            ".github/workflows/ (test and publish pipelines)",
        ],
        ..NO_EXTRAS
    },
    GuideStep {
        step: "implementation",
        title: "Tool Implementation",
        description: "Replace the generated stubs with real behavior",
        steps: &[
            "Find the TODO stubs in generator.py",
            "Implement each tool's business logic",
            "Use async I/O where the tool waits on the network or disk",
            "Validate inputs and return clear errors",
            "Update docstrings to describe the real behavior",
        ],
        best_practices: &[
            "One focused purpose per tool",
            "Filter data before returning it",
            "Keep control flow in code, not in tool chains",
            "Log enough to debug a failing call",
        ],
        ..NO_EXTRAS
    },
    GuideStep {
        step: "testing",
        title: "Testing",
        description: "Confirm the server works before publishing",
        steps: &[
            "Run the suite: pytest",
            "Check coverage: pytest --cov",
            "Confirm every tool is registered with the server",
            "Cover business logic and edge cases",
            "Try the server from an MCP client",
        ],
        commands: &[
            "pytest (all tests)",
            "pytest -v (verbose)",
            "pytest --cov=<package> --cov-report=term-missing",
        ],
        ..NO_EXTRAS
    },
    GuideStep {
        step: "deployment",
        title: "Publishing",
        description: "Release the package to PyPI",
        steps: &[
            "Make sure all tests pass",
            "Bump the version in setup.py and pyproject.toml",
            "Tag a GitHub release",
            "Let the publish workflow upload to PyPI",
            "Check the release page on PyPI",
        ],
        requirements: &[
            "A GitHub repository for the code",
            "A PyPI account with an API token",
            "The PYPI_API_TOKEN repository secret",
        ],
        ..NO_EXTRAS
    },
    GuideStep {
        step: "integration",
        title: "Client Integration",
        description: "Register the published server with an MCP client",
        steps: &[
            "Run it with uvx: uvx <package-name>",
            "Or install it with pipx: pipx install <package-name>",
            "Add an entry to the client's mcpServers config",
            "Restart the client",
            "Call a tool from a chat to confirm",
        ],
        config_example: Some(LaunchExample {
            server: "your-server",
            command: "uvx",
            args: &["your-package-name"],
        }),
        ..NO_EXTRAS
    },
];

/// Entry point of the guide: the step names in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideOverview {
    pub title: &'static str,
    pub description: &'static str,
    pub steps: Vec<&'static str>,
}

pub fn guide_overview() -> GuideOverview {
    GuideOverview {
        title: "MCP Server Implementation Overview",
        description: "From a generated project to a published, connected server",
        steps: GUIDE_STEPS.iter().map(|s| s.step).collect(),
    }
}

/// Look up a guide step by name. `overview` is not a step; use
/// [`guide_overview`] for it.
pub fn guide_step(step: &str) -> Result<&'static GuideStep> {
    GUIDE_STEPS
        .iter()
        .find(|s| s.step == step)
        .ok_or_else(|| GeneratorError::NotFound {
            what: "Step",
            key: step.to_string(),
            available: GUIDE_STEPS.iter().map(|s| s.step.to_string()).collect(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_practice_topics_in_order() {
        let topics: Vec<&str> = PRACTICES.iter().map(|p| p.topic).collect();
        assert_eq!(
            topics,
            [
                "progressive_disclosure",
                "tool_design",
                "control_flow",
                "security",
                "state_management",
                "testing"
            ]
        );
        assert_eq!(practice("security").unwrap().title, "Privacy and Security");
    }

    #[test]
    fn test_unknown_topic_lists_available() {
        let err = practice("caching").unwrap_err();
        assert_eq!(err.kind(), "NotFound");
        let message = err.to_string();
        assert!(message.starts_with("Topic 'caching' not found"), "{message}");
        for p in PRACTICES {
            assert!(message.contains(p.topic), "{message}");
        }
    }

    #[test]
    fn test_practice_json_skips_empty_extras() {
        let value = serde_json::to_value(practice("tool_design").unwrap()).unwrap();
        assert!(value.get("benefits").is_none());
        assert!(value["example"].as_str().unwrap().contains("10,000-row"));

        let value = serde_json::to_value(practice("control_flow").unwrap()).unwrap();
        assert_eq!(value["benefits"].as_array().unwrap().len(), 3);
        assert!(value.get("example").is_none());
    }

    #[test]
    fn test_overview_lists_steps() {
        assert_eq!(
            guide_overview().steps,
            ["setup", "implementation", "testing", "deployment", "integration"]
        );
    }

    #[test]
    fn test_unknown_step_excludes_overview() {
        let err = guide_step("overview").unwrap_err();
        match err {
            GeneratorError::NotFound { what, key, available } => {
                assert_eq!(what, "Step");
                assert_eq!(key, "overview");
                assert_eq!(available, guide_overview().steps);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_step_json_carries_only_its_extras() {
        let setup = serde_json::to_value(guide_step("setup").unwrap()).unwrap();
        assert_eq!(setup["files_created"].as_array().unwrap().len(), 6);
        assert!(setup.get("commands").is_none());
        assert!(setup.get("config_example").is_none());

        let testing = serde_json::to_value(guide_step("testing").unwrap()).unwrap();
        assert!(testing.get("files_created").is_none());
        assert_eq!(testing["commands"][0], "pytest (all tests)");
    }

    #[test]
    fn test_integration_config_example_shape() {
        let integration = serde_json::to_value(guide_step("integration").unwrap()).unwrap();
        assert_eq!(
            integration["config_example"],
            json!({"mcpServers": {"your-server": {"command": "uvx", "args": ["your-package-name"]}}})
        );
    }
}
