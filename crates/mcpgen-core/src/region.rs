/// Which generator-owned region a document carries. Each kind has its own
/// marker tag so regions in different documents never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// Primary document (`README.md`).
    Content,
    /// Secondary document (`MCP-USAGE.md`).
    Usage,
}

impl RegionKind {
    fn tag(self) -> &'static str {
        match self {
            RegionKind::Content => "CONTENT",
            RegionKind::Usage => "USAGE",
        }
    }

    /// Bare start token, e.g. `MCP-GENERATOR-CONTENT-START:my-server`.
    pub fn start_token(self, project: &str) -> String {
        format!("MCP-GENERATOR-{}-START:{}", self.tag(), project)
    }

    pub fn end_token(self, project: &str) -> String {
        format!("MCP-GENERATOR-{}-END:{}", self.tag(), project)
    }

    /// Start marker line as written into markdown (an HTML comment).
    pub fn start_marker(self, project: &str) -> String {
        format!("<!-- {} -->", self.start_token(project))
    }

    pub fn end_marker(self, project: &str) -> String {
        format!("<!-- {} -->", self.end_token(project))
    }
}

/// Whether `content` already carries this project's region of `kind`.
///
/// The whole marker comment is matched so that project `foo` does not see the
/// region of project `foo-bar`.
pub fn contains_region(content: &str, kind: RegionKind, project: &str) -> bool {
    content.contains(&kind.start_marker(project))
}

/// Wrap `body` in start/end markers.
pub fn wrap_region(kind: RegionKind, project: &str, body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 128);
    out.push_str(&kind.start_marker(project));
    out.push('\n');
    out.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&kind.end_marker(project));
    out.push('\n');
    out
}

/// A region block to append to an existing document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionAppend {
    /// Text to append: a separating newline, then the wrapped region.
    pub block: String,
    /// 1-based line where the inserted block begins (prior line count + 1).
    pub line_number: usize,
}

/// Plan appending a delimited region at end of `existing`, or `None` if the
/// region is already present. Prior content is never rewritten, only extended.
pub fn append_region(
    existing: &str,
    kind: RegionKind,
    project: &str,
    body: &str,
) -> Option<RegionAppend> {
    if contains_region(existing, kind, project) {
        return None;
    }
    let mut block = String::from("\n");
    block.push_str(&wrap_region(kind, project, body));
    Some(RegionAppend {
        block,
        line_number: existing.lines().count() + 1,
    })
}
