use std::process::Command;

/// Source of the local version-control user name, consulted only by the
/// `AUTO` prefix policy.
pub trait IdentityLookup {
    fn user_name(&self) -> Option<String>;
}

/// Reads `git config user.name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitIdentity;

impl IdentityLookup for GitIdentity {
    fn user_name(&self) -> Option<String> {
        let output = Command::new("git")
            .args(["config", "user.name"])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

impl<F> IdentityLookup for F
where
    F: Fn() -> Option<String>,
{
    fn user_name(&self) -> Option<String> {
        self()
    }
}
