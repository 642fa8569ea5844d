//! Format-style template renderer.
//!
//! `{name}` is replaced by a variable, `{{` and `}}` produce literal braces.
//! Variables are either plain text, inserted as-is, or fragments, which are
//! themselves rendered with the same variables. Free text from a request is
//! always passed as a fragment after sanitizing, so the single render pass
//! un-escapes it and it can never reach a variable.

use std::collections::HashMap;

use crate::error::RenderError;

const MAX_DEPTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Text(String),
    Fragment(String),
}

#[derive(Debug, Clone, Default)]
pub struct Vars {
    values: HashMap<String, Value>,
}

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value verbatim.
    pub fn text(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.to_string(), Value::Text(value.into()));
        self
    }

    /// Insert template source, rendered where it is referenced.
    pub fn fragment(&mut self, name: &str, source: impl Into<String>) -> &mut Self {
        self.values
            .insert(name.to_string(), Value::Fragment(source.into()));
        self
    }
}

pub fn render(template: &str, vars: &Vars) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    render_into(&mut out, template, vars, 0)?;
    Ok(out)
}

fn render_into(out: &mut String, template: &str, vars: &Vars, depth: usize) -> Result<(), RenderError> {
    if depth > MAX_DEPTH {
        return Err(RenderError::TooDeep(MAX_DEPTH));
    }

    let bytes = template.as_bytes();
    let mut i = 0;
    let mut literal_start = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                out.push_str(&template[literal_start..i]);
                out.push('{');
                i += 2;
                literal_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                out.push_str(&template[literal_start..i]);
                out.push('}');
                i += 2;
                literal_start = i;
            }
            b'{' => {
                out.push_str(&template[literal_start..i]);
                let close = template[i + 1..]
                    .find('}')
                    .map(|rel| i + 1 + rel)
                    .ok_or(RenderError::UnmatchedBrace { brace: '{', offset: i })?;
                let name = &template[i + 1..close];
                if !is_variable_name(name) {
                    return Err(RenderError::UnmatchedBrace { brace: '{', offset: i });
                }
                match vars.values.get(name) {
                    Some(Value::Text(value)) => out.push_str(value),
                    Some(Value::Fragment(source)) => render_into(out, source, vars, depth + 1)?,
                    None => {
                        return Err(RenderError::UnknownVariable {
                            name: name.to_string(),
                            offset: i,
                        })
                    }
                }
                i = close + 1;
                literal_start = i;
            }
            b'}' => return Err(RenderError::UnmatchedBrace { brace: '}', offset: i }),
            _ => i += 1,
        }
    }
    out.push_str(&template[literal_start..]);
    Ok(())
}

fn is_variable_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
