use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use log::warn;

use crate::error::{GeneratorError, Result};
use crate::identity::IdentityLookup;
use crate::sanitize::{sanitize_description, slugify};
use crate::schema::{generate_tool_schema, Schema, ToolDefinition, ToolParameter};
use crate::validate::{validate_project_name, validate_tool_name};

/// Lowest runtime version a generated project may declare.
pub const MIN_RUNTIME_VERSION: RuntimeVersion = RuntimeVersion { major: 3, minor: 10 };

/// `MAJOR.MINOR` runtime version. A patch component is accepted and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RuntimeVersion {
    pub major: u32,
    pub minor: u32,
}

impl RuntimeVersion {
    /// Raise to [`MIN_RUNTIME_VERSION`] when below it.
    pub fn with_floor(self) -> Self {
        self.max(MIN_RUNTIME_VERSION)
    }
}

impl FromStr for RuntimeVersion {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || GeneratorError::InvalidRuntimeVersion(s.to_string());
        let mut parts = s.trim().split('.');
        let major = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let minor = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        match parts.next() {
            None => {}
            Some(patch) if patch.parse::<u32>().is_ok() && parts.next().is_none() => {}
            Some(_) => return Err(invalid()),
        }
        Ok(RuntimeVersion { major, minor })
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// How the distribution name is prefixed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PrefixPolicy {
    /// Use the local version-control user name.
    #[default]
    Auto,
    /// No prefix.
    None,
    /// Use this literal.
    Custom(String),
}

impl FromStr for PrefixPolicy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "AUTO" => PrefixPolicy::Auto,
            "NONE" => PrefixPolicy::None,
            other => PrefixPolicy::Custom(other.to_string()),
        })
    }
}

impl fmt::Display for PrefixPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixPolicy::Auto => write!(f, "AUTO"),
            PrefixPolicy::None => write!(f, "NONE"),
            PrefixPolicy::Custom(prefix) => write!(f, "{}", prefix),
        }
    }
}

impl PrefixPolicy {
    /// Resolve to a normalized prefix slug, if any.
    pub fn resolve(&self, identity: &dyn IdentityLookup) -> Option<String> {
        let raw = match self {
            PrefixPolicy::None => return None,
            PrefixPolicy::Custom(prefix) => prefix.clone(),
            PrefixPolicy::Auto => match identity.user_name() {
                Some(name) => name,
                None => {
                    warn!("prefix AUTO: no version-control user name found, generating without prefix");
                    return None;
                }
            },
        };
        let slug = slugify(&raw);
        if slug.is_empty() {
            None
        } else {
            Some(slug)
        }
    }
}

/// Everything one generation run needs. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub project_name: String,
    pub description: String,
    pub author: String,
    pub author_email: String,
    pub tools: Vec<ToolDefinition>,
    /// `None` means the working directory; `.` means generate in place.
    pub output_dir: Option<PathBuf>,
    pub python_version: String,
    pub prefix: PrefixPolicy,
}

impl GenerationRequest {
    pub fn new(
        project_name: &str,
        description: &str,
        author: &str,
        author_email: &str,
        tools: Vec<ToolDefinition>,
    ) -> Self {
        Self {
            project_name: project_name.to_string(),
            description: description.to_string(),
            author: author.to_string(),
            author_email: author_email.to_string(),
            tools,
            output_dir: None,
            python_version: MIN_RUNTIME_VERSION.to_string(),
            prefix: PrefixPolicy::default(),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_python_version(mut self, version: &str) -> Self {
        self.python_version = version.to_string();
        self
    }

    pub fn with_prefix(mut self, prefix: PrefixPolicy) -> Self {
        self.prefix = prefix;
        self
    }

    /// Validate every field and sanitize free text. Touches no files.
    pub fn validate(&self, identity: &dyn IdentityLookup) -> Result<ValidatedRequest> {
        if !validate_project_name(&self.project_name) {
            return Err(GeneratorError::InvalidProjectName(self.project_name.clone()));
        }
        if self.tools.is_empty() {
            return Err(GeneratorError::NoToolsProvided);
        }

        let mut names = HashSet::new();
        for tool in &self.tools {
            if !validate_tool_name(&tool.name) {
                return Err(GeneratorError::InvalidToolName(tool.name.clone()));
            }
            if !names.insert(tool.name.as_str()) {
                return Err(GeneratorError::DuplicateToolName(tool.name.clone()));
            }
            let mut params = HashSet::new();
            for param in &tool.parameters {
                if !validate_tool_name(&param.name) || !params.insert(param.name.as_str()) {
                    return Err(GeneratorError::InvalidParameterName {
                        tool: tool.name.clone(),
                        name: param.name.clone(),
                    });
                }
            }
        }

        let python_version = self.python_version.parse::<RuntimeVersion>()?.with_floor();

        let tools: Vec<ToolDefinition> = self.tools.iter().map(sanitize_tool).collect();
        let schemas = tools.iter().map(generate_tool_schema).collect();

        let package_name = match self.prefix.resolve(identity) {
            Some(prefix) => format!("{}-{}", prefix, self.project_name),
            None => self.project_name.clone(),
        };
        let import_name = package_name.replace('-', "_");

        Ok(ValidatedRequest {
            project_name: self.project_name.clone(),
            description: sanitize_description(&self.description),
            author: sanitize_description(&self.author),
            author_email: sanitize_description(&self.author_email),
            author_slug: slugify(&self.author),
            tools,
            schemas,
            python_version,
            package_name,
            import_name,
            output_dir: self.output_dir.clone(),
        })
    }
}

fn sanitize_tool(tool: &ToolDefinition) -> ToolDefinition {
    ToolDefinition {
        name: tool.name.clone(),
        description: sanitize_description(&tool.description),
        parameters: tool
            .parameters
            .iter()
            .map(|p| ToolParameter {
                name: p.name.clone(),
                param_type: p.param_type.clone(),
                description: sanitize_description(&p.description),
                required: p.required,
            })
            .collect(),
    }
}

/// A request that passed validation. Free-text fields are already escaped
/// for the template renderer; identifiers are safe to splice anywhere.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub project_name: String,
    pub description: String,
    pub author: String,
    pub author_email: String,
    /// URL-safe form of the author name.
    pub author_slug: String,
    pub tools: Vec<ToolDefinition>,
    pub schemas: Vec<Schema>,
    pub python_version: RuntimeVersion,
    /// Distribution name, prefix applied.
    pub package_name: String,
    pub import_name: String,
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_identity() -> Option<String> {
        None
    }

    fn request(tools: Vec<ToolDefinition>) -> GenerationRequest {
        GenerationRequest::new("test-server", "Test", "Test Author", "t@example.com", tools)
            .with_prefix(PrefixPolicy::None)
    }

    #[test]
    fn test_runtime_version_parse_and_floor() {
        let v: RuntimeVersion = "3.9".parse().unwrap();
        assert_eq!(v.with_floor().to_string(), "3.10");
        let v: RuntimeVersion = "3.12".parse().unwrap();
        assert_eq!(v.with_floor().to_string(), "3.12");
        let v: RuntimeVersion = "3.11.4".parse().unwrap();
        assert_eq!(v.to_string(), "3.11");
        assert!("3".parse::<RuntimeVersion>().is_err());
        assert!("three.ten".parse::<RuntimeVersion>().is_err());
        assert!("3.10.1.2".parse::<RuntimeVersion>().is_err());
    }

    #[test]
    fn test_prefix_policy_parse() {
        assert_eq!("AUTO".parse::<PrefixPolicy>().unwrap(), PrefixPolicy::Auto);
        assert_eq!("NONE".parse::<PrefixPolicy>().unwrap(), PrefixPolicy::None);
        assert_eq!(
            "acme".parse::<PrefixPolicy>().unwrap(),
            PrefixPolicy::Custom("acme".into())
        );
    }

    #[test]
    fn test_prefix_resolution() {
        let octo = || Some("Octo Cat".to_string());
        assert_eq!(PrefixPolicy::Auto.resolve(&octo), Some("octo-cat".to_string()));
        assert_eq!(PrefixPolicy::Auto.resolve(&no_identity), None);
        assert_eq!(PrefixPolicy::None.resolve(&octo), None);
        assert_eq!(
            PrefixPolicy::Custom("Acme Corp".into()).resolve(&octo),
            Some("acme-corp".to_string())
        );
    }

    #[test]
    fn test_validate_derives_names() {
        let validated = request(vec![ToolDefinition::new("ping", "Ping")])
            .with_prefix(PrefixPolicy::Custom("acme".into()))
            .validate(&no_identity)
            .unwrap();
        assert_eq!(validated.package_name, "acme-test-server");
        assert_eq!(validated.import_name, "acme_test_server");
        assert_eq!(validated.author_slug, "test-author");
        assert_eq!(validated.schemas.len(), 1);
    }

    #[test]
    fn test_validate_sanitizes_free_text_once() {
        let tool = ToolDefinition::new("ping", "Ping {host}")
            .with_parameter(ToolParameter::new("host", "string", "Host {name}", true));
        let mut req = request(vec![tool]);
        req.description = "Server {x}".into();
        let validated = req.validate(&no_identity).unwrap();
        assert_eq!(validated.description, "Server {{x}}");
        assert_eq!(validated.tools[0].description, "Ping {{host}}");
        assert_eq!(validated.tools[0].parameters[0].description, "Host {{name}}");
        assert_eq!(validated.schemas[0].description, "Ping {{host}}");
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let err = request(vec![]).validate(&no_identity).unwrap_err();
        assert!(matches!(err, GeneratorError::NoToolsProvided));

        let err = request(vec![ToolDefinition::new("my-tool", "")])
            .validate(&no_identity)
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidToolName(ref n) if n == "my-tool"));

        let err = request(vec![ToolDefinition::new("a", ""), ToolDefinition::new("a", "")])
            .validate(&no_identity)
            .unwrap_err();
        assert!(matches!(err, GeneratorError::DuplicateToolName(_)));

        let bad_param = ToolDefinition::new("a", "")
            .with_parameter(ToolParameter::new("class", "string", "", true));
        let err = request(vec![bad_param]).validate(&no_identity).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidParameterName { .. }));

        let mut req = request(vec![ToolDefinition::new("a", "")]);
        req.project_name = "class".into();
        assert!(matches!(
            req.validate(&no_identity).unwrap_err(),
            GeneratorError::InvalidProjectName(_)
        ));

        let req = request(vec![ToolDefinition::new("a", "")]).with_python_version("latest");
        assert!(matches!(
            req.validate(&no_identity).unwrap_err(),
            GeneratorError::InvalidRuntimeVersion(_)
        ));
    }
}
