//! Identifier rules for project names and tool/parameter names.
//!
//! Generated projects are Python packages, so both validators reject the
//! Python hard keywords. Neither function ever errors; callers turn a `false`
//! into the matching [`GeneratorError`](crate::GeneratorError).

/// Python hard keywords (`keyword.kwlist`).
pub const RESERVED_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(&name)
}

/// Check a project name: lowercase ASCII letters, digits, `-` and `_`, not
/// starting with a digit or `-`, and not a keyword once hyphens become
/// underscores (the form it takes as an import name).
pub fn validate_project_name(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    if first.is_ascii_digit() || first == '-' {
        return false;
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return false;
    }
    !is_reserved(name) && !is_reserved(&name.replace('-', "_"))
}

/// Check a tool or parameter name: a bare identifier `[A-Za-z_][A-Za-z0-9_]*`
/// that is not a keyword. Hyphens are rejected since these names become
/// Python function and argument names.
pub fn validate_tool_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return false;
    }
    !is_reserved(name)
}

/// Command-file names: `[a-z0-9_-]+`.
pub fn validate_command_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_project_names() {
        assert!(validate_project_name("my-mcp-server"));
        assert!(validate_project_name("my_mcp_server"));
        assert!(validate_project_name("mcp123"));
        assert!(validate_project_name("abc"));
        assert!(validate_project_name("_private"));
    }

    #[test]
    fn test_invalid_project_names() {
        assert!(!validate_project_name(""));
        assert!(!validate_project_name("123-invalid"));
        assert!(!validate_project_name("my server"));
        assert!(!validate_project_name("my.server"));
        assert!(!validate_project_name("My-Server"));
        assert!(!validate_project_name("-leading"));
    }

    #[test]
    fn test_keywords_rejected_by_both_validators() {
        for kw in RESERVED_KEYWORDS {
            assert!(!validate_tool_name(kw), "tool name {kw} should be rejected");
            assert!(!validate_project_name(kw), "project name {kw} should be rejected");
        }
    }

    #[test]
    fn test_valid_tool_names() {
        assert!(validate_tool_name("my_function"));
        assert!(validate_tool_name("test"));
        assert!(validate_tool_name("func123"));
        assert!(validate_tool_name("_private"));
        assert!(validate_tool_name("CamelCase"));
    }

    #[test]
    fn test_invalid_tool_names() {
        assert!(!validate_tool_name(""));
        assert!(!validate_tool_name("class"));
        assert!(!validate_tool_name("my-function"));
        assert!(!validate_tool_name("123func"));
        assert!(!validate_tool_name("my func"));
        assert!(!validate_tool_name("my.func"));
    }

    #[test]
    fn test_command_names() {
        assert!(validate_command_name("mcp-generate"));
        assert!(validate_command_name("help_2"));
        assert!(!validate_command_name(""));
        assert!(!validate_command_name("../escape"));
        assert!(!validate_command_name("Upper"));
    }
}
