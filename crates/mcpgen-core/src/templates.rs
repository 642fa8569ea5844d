//! Project templates and the renderer inputs built from a validated request.

use crate::error::RenderError;
use crate::merge::RenderedFile;
use crate::render::{render, Vars};
use crate::request::ValidatedRequest;
use crate::sanitize::escape_quoted;
use crate::schema::{Schema, ToolDefinition, ToolParameter};

const PYPROJECT_TOML: &str = r#"[build-system]
requires = ["setuptools>=64", "setuptools-scm>=8", "wheel"]
build-backend = "setuptools.build_meta"

[project]
name = "{package_name}"
dynamic = ["version"]
description = "{description_quoted}"
readme = "README.md"
requires-python = ">={python_version}"
license = {{ text = "MIT" }}
authors = [
    {{ name = "{author_quoted}", email = "{author_email_quoted}" }},
]
classifiers = [
    "Programming Language :: Python :: 3",
    "License :: OSI Approved :: MIT License",
]
dependencies = [
    "mcp>=1.0.0,<2.0.0",
]

[project.optional-dependencies]
dev = [
    "pytest>=7.0.0",
    "pytest-asyncio>=0.21.0",
    "pytest-cov>=4.0.0",
]

[project.scripts]
{package_name} = "{import_name}.server:main"
{package_name}-cli = "{import_name}.cli:main"

[project.urls]
Homepage = "https://github.com/{author_slug}/{project_name}"
Repository = "https://github.com/{author_slug}/{project_name}"
Issues = "https://github.com/{author_slug}/{project_name}/issues"

[tool.setuptools.packages.find]
include = ["{import_name}*"]

[tool.setuptools_scm]

[tool.pytest.ini_options]
asyncio_mode = "auto"
testpaths = ["{import_name}/tests"]
"#;

const SETUP_PY: &str = r#""""Version scheme hook for setuptools_scm; metadata lives in pyproject.toml."""

import os

from setuptools import setup


def local_scheme(version):
    if os.environ.get("IS_PULL_REQUEST"):
        return ".dev" + os.environ.get("GITHUB_RUN_ID", "local")
    return ""


setup(use_scm_version={{"local_scheme": local_scheme}})
"#;

const README_MD: &str = r#"# {project_name}

{description}

## Installation

```bash
pip install {package_name}
```

Or run without installing:

```bash
uvx {package_name}
```

## Tools

{tool_list}

See [MCP-USAGE.md](MCP-USAGE.md) for parameters and client configuration.

## Development

```bash
pip install -e ".[dev]"
pytest
```

## License

MIT
"#;

const MCP_USAGE_MD: &str = r#"# {project_name} MCP Usage

## Client configuration

```json
{{
  "mcpServers": {{
    "{project_name}": {{
      "command": "uvx",
      "args": ["{package_name}"]
    }}
  }}
}}
```

## Tools

{usage_sections}
"#;

const GITIGNORE: &str = r#"# Byte-compiled files
__pycache__/
*.py[cod]
*.pyc

# Packaging
build/
dist/
*.egg-info/
.eggs/

# Virtual environments
.venv/
venv/
env/

# Test and coverage
.pytest_cache/
.coverage
htmlcov/

# Editors
.idea/
.vscode/
.DS_Store
"#;

const MANIFEST_IN: &str = r#"include README.md
include MCP-USAGE.md
include LICENSE
include pyproject.toml
recursive-include {import_name} *.py
prune specs
prune docs
prune examples
prune scripts
global-exclude *.py[cod]
global-exclude __pycache__
"#;

const LICENSE: &str = r#"MIT License

Copyright (c) {author}

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
"#;

const INIT_PY: &str = r#""""{project_name}: {description_doc}"""

__all__ = ["generator", "server"]
"#;

const SERVER_PY: &str = r#""""MCP server for {project_name}."""

from typing import Optional as _Optional

from mcp.server.fastmcp import FastMCP as _FastMCP

from . import generator as _generator

_mcp = _FastMCP("{project_name}")

{server_tools}

def main():
    """Run the MCP server over stdio."""
    _mcp.run()


if __name__ == "__main__":
    main()
"#;

const GENERATOR_PY: &str = r#""""Business logic for {project_name}.

Each function backs one MCP tool and one CLI subcommand.
"""

import json as _json
from typing import Optional as _Optional

{generator_functions}"#;

const CLI_PY: &str = r#""""Command-line interface for {project_name}."""

import argparse
import sys

from . import generator


def build_parser():
    parser = argparse.ArgumentParser(prog="{package_name}-cli")
    commands = parser.add_subparsers(dest="_command", required=True)
{cli_commands}
    return parser


def main(argv=None):
    args = vars(build_parser().parse_args(argv))
    handler = getattr(generator, args.pop("_command"))
    print(handler(**args))
    return 0


if __name__ == "__main__":
    sys.exit(main())
"#;

const TESTS_INIT_PY: &str = "";

const TEST_SERVER_PY: &str = r#""""Tests for the {project_name} MCP server."""

import pytest

from {import_name} import server


@pytest.mark.asyncio
async def test_tools_registered():
    tools = await server._mcp.list_tools()
    names = [tool.name for tool in tools]
{server_asserts}
"#;

const TEST_GENERATOR_PY: &str = r#""""Tests for {project_name} business logic."""

import json

from {import_name} import generator

{generator_tests}"#;

const TEST_WORKFLOW: &str = r#"name: Test

on:
  push:
    branches: [main]
  pull_request:

jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
        with:
          fetch-depth: 0
      - uses: actions/setup-python@v5
        with:
          python-version: '{python_version}'
      - run: pip install -e ".[dev]"
      - run: pytest --cov={import_name} --cov-report=term-missing
"#;

const RELEASE_WORKFLOW: &str = r#"name: Release

on:
  release:
    types: [published]

env:
  python_version: '{python_version}'

jobs:
  publish:
    runs-on: ubuntu-latest
    permissions:
      id-token: write
    steps:
      - uses: actions/checkout@v4
        with:
          fetch-depth: 0
      - uses: actions/setup-python@v5
        with:
          python-version: ${{{{ env.python_version }}}}
      - run: pip install build
      - run: python -m build
      - uses: pypa/gh-action-pypi-publish@release/v1
        with:
          password: ${{{{ secrets.PYPI_API_TOKEN }}}}
"#;

/// Render every file of a generated project.
pub fn render_project(req: &ValidatedRequest) -> Result<Vec<RenderedFile>, RenderError> {
    let vars = project_vars(req);
    let pkg = &req.import_name;

    let sources: Vec<(String, &str)> = vec![
        ("pyproject.toml".into(), PYPROJECT_TOML),
        ("setup.py".into(), SETUP_PY),
        ("README.md".into(), README_MD),
        ("MCP-USAGE.md".into(), MCP_USAGE_MD),
        ("LICENSE".into(), LICENSE),
        (".gitignore".into(), GITIGNORE),
        ("MANIFEST.in".into(), MANIFEST_IN),
        (format!("{pkg}/__init__.py"), INIT_PY),
        (format!("{pkg}/server.py"), SERVER_PY),
        (format!("{pkg}/generator.py"), GENERATOR_PY),
        (format!("{pkg}/cli.py"), CLI_PY),
        (format!("{pkg}/tests/__init__.py"), TESTS_INIT_PY),
        (format!("{pkg}/tests/test_server.py"), TEST_SERVER_PY),
        (format!("{pkg}/tests/test_generator.py"), TEST_GENERATOR_PY),
        (".github/workflows/test.yml".into(), TEST_WORKFLOW),
        (".github/workflows/release.yml".into(), RELEASE_WORKFLOW),
    ];

    sources
        .into_iter()
        .map(|(path, template)| Ok(RenderedFile::new(path, render(template, &vars)?)))
        .collect()
}

fn project_vars(req: &ValidatedRequest) -> Vars {
    let mut vars = Vars::new();
    vars.text("project_name", &req.project_name)
        .text("package_name", &req.package_name)
        .text("import_name", &req.import_name)
        .text("author_slug", &req.author_slug)
        .text("python_version", req.python_version.to_string())
        .fragment("description", &req.description)
        .fragment("description_doc", docstring_text(&req.description))
        .fragment("description_quoted", escape_quoted(&req.description))
        .fragment("author", &req.author)
        .fragment("author_quoted", escape_quoted(&req.author))
        .fragment("author_email_quoted", escape_quoted(&req.author_email))
        .fragment("tool_list", tool_list(&req.tools))
        .fragment("usage_sections", usage_sections(&req.schemas))
        .fragment("server_tools", join_blocks(&req.tools, server_tool))
        .fragment("generator_functions", join_blocks(&req.tools, generator_function))
        .fragment("cli_commands", req.tools.iter().map(cli_command).collect::<String>())
        .fragment("server_asserts", server_asserts(&req.tools))
        .fragment("generator_tests", join_blocks(&req.tools, generator_test));
    vars
}

// ── Per-tool fragments ──
//
// Fragment source is template text, so literal braces are doubled here. Module
// level names in the generated Python are underscore aliases: tool and
// parameter names must not be able to shadow them.

fn join_blocks(tools: &[ToolDefinition], block: fn(&ToolDefinition) -> String) -> String {
    tools.iter().map(block).collect::<Vec<_>>().join("\n\n")
}

fn py_type(param: &ToolParameter) -> &'static str {
    match param.schema_type() {
        "number" => "float",
        "boolean" => "bool",
        _ => "str",
    }
}

/// Required parameters first, so defaults never precede non-defaults.
fn ordered_params(tool: &ToolDefinition) -> impl Iterator<Item = &ToolParameter> {
    tool.parameters
        .iter()
        .filter(|p| p.required)
        .chain(tool.parameters.iter().filter(|p| !p.required))
}

fn signature(tool: &ToolDefinition) -> String {
    ordered_params(tool)
        .map(|p| {
            if p.required {
                format!("{}: {}", p.name, py_type(p))
            } else {
                format!("{}: _Optional[{}] = None", p.name, py_type(p))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape for a triple-quoted literal: every quote, so none can merge with the
/// closing delimiter.
fn docstring_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn docstring(tool: &ToolDefinition) -> String {
    let mut doc = format!("    \"\"\"{}", docstring_text(&tool.description));
    if !tool.parameters.is_empty() {
        doc.push_str("\n\n    Args:\n");
        for p in &tool.parameters {
            doc.push_str(&format!("        {}: {}\n", p.name, docstring_text(&p.description)));
        }
        doc.push_str("    ");
    }
    doc.push_str("\"\"\"\n");
    doc
}

fn server_tool(tool: &ToolDefinition) -> String {
    let call_args = ordered_params(tool)
        .map(|p| format!("{0}={0}", p.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "@_mcp.tool()\ndef {name}({sig}) -> str:\n{doc}    return _generator.{name}({call_args})\n",
        name = tool.name,
        sig = signature(tool),
        doc = docstring(tool),
    )
}

fn generator_function(tool: &ToolDefinition) -> String {
    format!(
        "def {name}({sig}) -> str:\n{doc}    # TODO: implement {name}\n    return _json.dumps({{{{\"tool\": \"{name}\", \"status\": \"not_implemented\"}}}})\n",
        name = tool.name,
        sig = signature(tool),
        doc = docstring(tool),
    )
}

fn help_text(text: &str) -> String {
    escape_quoted(text).replace('%', "%%")
}

fn cli_command(tool: &ToolDefinition) -> String {
    let mut block = format!(
        "    cmd = commands.add_parser(\"{}\", help=\"{}\")\n",
        tool.name,
        help_text(&tool.description)
    );
    for p in &tool.parameters {
        let flag = p.name.replace('_', "-");
        let line = match py_type(p) {
            "bool" => format!(
                "    cmd.add_argument(\"--{}\", dest=\"{}\", action=\"store_true\", help=\"{}\")\n",
                flag,
                p.name,
                help_text(&p.description)
            ),
            ty => format!(
                "    cmd.add_argument(\"--{}\", dest=\"{}\", type={}, required={}, help=\"{}\")\n",
                flag,
                p.name,
                ty,
                if p.required { "True" } else { "False" },
                help_text(&p.description)
            ),
        };
        block.push_str(&line);
    }
    block
}

fn server_asserts(tools: &[ToolDefinition]) -> String {
    tools
        .iter()
        .map(|t| format!("    assert \"{}\" in names\n", t.name))
        .collect()
}

fn sample_value(param: &ToolParameter) -> &'static str {
    match py_type(param) {
        "float" => "1",
        "bool" => "True",
        _ => "\"sample\"",
    }
}

fn generator_test(tool: &ToolDefinition) -> String {
    let args = tool
        .parameters
        .iter()
        .filter(|p| p.required)
        .map(|p| format!("{}={}", p.name, sample_value(p)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "def test_{name}_returns_json():\n    result = generator.{name}({args})\n    assert isinstance(json.loads(result), dict)\n",
        name = tool.name,
    )
}

fn tool_list(tools: &[ToolDefinition]) -> String {
    tools
        .iter()
        .map(|t| format!("- **{}**: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn usage_sections(schemas: &[Schema]) -> String {
    schemas
        .iter()
        .map(|schema| {
            let mut section = format!("### `{}`\n\n{}\n\n", schema.name, schema.description);
            let input = &schema.input_schema;
            if input.properties.is_empty() {
                section.push_str("_No parameters._\n");
            } else {
                section.push_str("| Parameter | Type | Required | Description |\n");
                section.push_str("|---|---|---|---|\n");
                for (name, property) in &input.properties {
                    section.push_str(&format!(
                        "| `{}` | {} | {} | {} |\n",
                        name,
                        property.schema_type,
                        if input.required.contains(name) { "yes" } else { "no" },
                        property.description.replace('|', "\\|"),
                    ));
                }
            }
            section
        })
        .collect::<Vec<_>>()
        .join("\n")
}
