use std::collections::BTreeSet;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One typed argument of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type", default = "default_param_type")]
    pub param_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

fn default_param_type() -> String {
    "string".to_string()
}

impl ToolParameter {
    pub fn new(name: &str, param_type: &str, description: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            param_type: param_type.to_string(),
            description: description.to_string(),
            required,
        }
    }

    /// The JSON-Schema primitive this parameter's declared type maps to.
    pub fn schema_type(&self) -> &'static str {
        schema_type(&self.param_type)
    }
}

/// A tool the generated server will expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: &'static str,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: &'static str,
    /// Declaration order is kept for properties.
    #[serde(serialize_with = "ordered_properties")]
    pub properties: Vec<(String, PropertySchema)>,
    pub required: BTreeSet<String>,
}

impl InputSchema {
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }
}

/// Call schema derived from a [`ToolDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: InputSchema,
}

fn ordered_properties<S: Serializer>(
    properties: &[(String, PropertySchema)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(properties.len()))?;
    for (name, property) in properties {
        map.serialize_entry(name, property)?;
    }
    map.end()
}

/// Parse a JSON array of tool definitions.
pub fn parse_tools(json: &str) -> crate::error::Result<Vec<ToolDefinition>> {
    Ok(serde_json::from_str(json)?)
}

/// Map a declared parameter type onto a schema primitive. Unknown types are
/// treated as strings.
pub fn schema_type(declared: &str) -> &'static str {
    match declared.trim().to_ascii_lowercase().as_str() {
        "string" | "str" => "string",
        "int" | "integer" | "number" => "number",
        "bool" | "boolean" => "boolean",
        _ => "string",
    }
}

pub fn generate_tool_schema(tool: &ToolDefinition) -> Schema {
    let properties = tool
        .parameters
        .iter()
        .map(|p| {
            (
                p.name.clone(),
                PropertySchema {
                    schema_type: p.schema_type(),
                    description: p.description.clone(),
                },
            )
        })
        .collect();
    let required = tool
        .parameters
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name.clone())
        .collect();

    Schema {
        name: tool.name.clone(),
        description: tool.description.clone(),
        input_schema: InputSchema {
            schema_type: "object",
            properties,
            required,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_tool_schema_basic() {
        let tool = ToolDefinition::new("test_tool", "Test tool")
            .with_parameter(ToolParameter::new("param1", "string", "First param", true));

        let schema = generate_tool_schema(&tool);
        assert_eq!(schema.name, "test_tool");
        assert_eq!(schema.description, "Test tool");
        assert_eq!(schema.input_schema.property("param1").unwrap().schema_type, "string");
        assert!(schema.input_schema.required.contains("param1"));
    }

    #[test]
    fn test_type_mapping() {
        let tool = ToolDefinition::new("test", "Test")
            .with_parameter(ToolParameter::new("str_param", "str", "", false))
            .with_parameter(ToolParameter::new("int_param", "int", "", false))
            .with_parameter(ToolParameter::new("bool_param", "bool", "", false))
            .with_parameter(ToolParameter::new("num_param", "number", "", false))
            .with_parameter(ToolParameter::new("odd_param", "datetime", "", false));

        let schema = generate_tool_schema(&tool);
        let ty = |n: &str| schema.input_schema.property(n).unwrap().schema_type;
        assert_eq!(ty("str_param"), "string");
        assert_eq!(ty("int_param"), "number");
        assert_eq!(ty("bool_param"), "boolean");
        assert_eq!(ty("num_param"), "number");
        assert_eq!(ty("odd_param"), "string");
        assert!(schema.input_schema.required.is_empty());
    }

    #[test]
    fn test_required_set_matches_flags() {
        let tool = ToolDefinition::new("t", "")
            .with_parameter(ToolParameter::new("b", "string", "", true))
            .with_parameter(ToolParameter::new("a", "string", "", false))
            .with_parameter(ToolParameter::new("c", "int", "", true));

        let schema = generate_tool_schema(&tool);
        let required: Vec<&str> = schema.input_schema.required.iter().map(String::as_str).collect();
        assert_eq!(required, vec!["b", "c"]);
    }

    #[test]
    fn test_serialized_shape_keeps_declaration_order() {
        let tool = ToolDefinition::new("t", "d")
            .with_parameter(ToolParameter::new("zeta", "int", "z", true))
            .with_parameter(ToolParameter::new("alpha", "bool", "a", false));

        let json = serde_json::to_string(&generate_tool_schema(&tool)).unwrap();
        assert!(json.contains("\"inputSchema\""));
        let zeta = json.find("\"zeta\"").unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        assert!(zeta < alpha, "properties should keep declaration order: {json}");
    }

    #[test]
    fn test_deserialize_defaults() {
        let tool: ToolDefinition =
            serde_json::from_str(r#"{"name": "ping", "parameters": [{"name": "host"}]}"#).unwrap();
        assert_eq!(tool.description, "");
        assert_eq!(tool.parameters[0].param_type, "string");
        assert!(!tool.parameters[0].required);
    }

    #[test]
    fn test_parse_tools_list() {
        let tools = parse_tools(r#"[{"name": "a"}, {"name": "b", "description": "B"}]"#).unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[1].description, "B");

        let err = parse_tools(r#"{"name": "a"}"#).unwrap_err();
        assert_eq!(err.kind(), "SerdeError");
    }
}
