use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const CONFIG_FILE: &str = "mcpgen.toml";

/// Defaults for request fields, read from `mcpgen.toml` and the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub prefix: Option<String>,
    pub python_version: Option<String>,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Per-user config file under `home`.
pub fn home_config(home: &Path) -> PathBuf {
    home.join(".config").join("mcpgen").join("config.toml")
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find the config file: `explicit`, then `<cwd>/mcpgen.toml`, then
    /// `<home>/.config/mcpgen/config.toml`. No file at all yields defaults;
    /// an explicit path that cannot be read is an error.
    pub fn discover(explicit: Option<&Path>, cwd: &Path, home: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidates = std::iter::once(cwd.join(CONFIG_FILE)).chain(home.map(home_config));
        for candidate in candidates {
            if candidate.is_file() {
                log::debug!("using config {}", candidate.display());
                return Self::load(&candidate);
            }
        }
        Ok(Self::default())
    }

    /// Overlay `MCPGEN_*` variables.
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        let overlay = |slot: &mut Option<String>, key: &str| {
            if let Some(value) = var(key).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        };
        overlay(&mut self.author, "MCPGEN_AUTHOR");
        overlay(&mut self.author_email, "MCPGEN_AUTHOR_EMAIL");
        overlay(&mut self.prefix, "MCPGEN_PREFIX");
        overlay(&mut self.python_version, "MCPGEN_PYTHON_VERSION");
        self
    }

    /// Config for this process: file lookup from the working directory and
    /// the platform home directory, then the environment.
    pub fn from_process(explicit: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let cwd = std::env::current_dir()?;
        let home = dirs::home_dir();
        let config = Self::discover(explicit, &cwd, home.as_deref())?;
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_files_yield_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = CliConfig::discover(None, tmp.path(), Some(tmp.path())).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_working_directory_file_wins_over_home() {
        let cwd = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(cwd.path().join(CONFIG_FILE), "author = \"Local\"\n").unwrap();
        fs::create_dir_all(home.path().join(".config/mcpgen")).unwrap();
        fs::write(home.path().join(".config/mcpgen/config.toml"), "author = \"Home\"\n").unwrap();

        let config = CliConfig::discover(None, cwd.path(), Some(home.path())).unwrap();
        assert_eq!(config.author.as_deref(), Some("Local"));
    }

    #[test]
    fn test_home_file_is_fallback() {
        let cwd = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join(".config/mcpgen")).unwrap();
        fs::write(
            home.path().join(".config/mcpgen/config.toml"),
            "author_email = \"me@example.com\"\nprefix = \"NONE\"\n",
        )
        .unwrap();

        let config = CliConfig::discover(None, cwd.path(), Some(home.path())).unwrap();
        assert_eq!(config.author_email.as_deref(), Some("me@example.com"));
        assert_eq!(config.prefix.as_deref(), Some("NONE"));
    }

    #[test]
    fn test_malformed_and_explicit_missing_are_errors() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "author = [").unwrap();
        assert!(matches!(
            CliConfig::discover(None, tmp.path(), None),
            Err(ConfigError::Parse { .. })
        ));

        let missing = tmp.path().join("nope.toml");
        assert!(matches!(
            CliConfig::discover(Some(&missing), tmp.path(), None),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_home_config_location() {
        assert_eq!(
            home_config(Path::new("/home/me")),
            Path::new("/home/me").join(".config").join("mcpgen").join("config.toml")
        );
    }

    #[test]
    fn test_from_process_reads_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "output_dir = \"projects\"\n").unwrap();

        let config = CliConfig::from_process(Some(&path)).unwrap();
        assert_eq!(config.output_dir, Some(PathBuf::from("projects")));

        assert!(CliConfig::from_process(Some(&tmp.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let config = CliConfig {
            author: Some("File".into()),
            python_version: Some("3.11".into()),
            ..Default::default()
        }
        .with_env(|key| match key {
            "MCPGEN_AUTHOR" => Some("Env".into()),
            "MCPGEN_PYTHON_VERSION" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.author.as_deref(), Some("Env"));
        assert_eq!(config.python_version.as_deref(), Some("3.11"));
    }
}
