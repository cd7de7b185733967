use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Environment variable holding an optional personal token
    pub token_env: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token_env: "GITHUB_TOKEN".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub days: u32,
    pub sample_repos: usize,
    pub display_repos: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            days: 7,
            sample_repos: 20,
            display_repos: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookmarksConfig {
    pub database: PathBuf,
}

impl Default for BookmarksConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("database.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    pub script: PathBuf,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            script: PathBuf::from("./health_check.sh"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Pull requests / commits requested per fetch
    pub list_limit: u8,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { list_limit: 10 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GitHubConfig,
    pub discovery: DiscoveryConfig,
    pub bookmarks: BookmarksConfig,
    pub health_check: HealthCheckConfig,
    pub ui: UiConfig,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("hotrepos").join("config.toml"))
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        Self::parse(&content)
    }

    /// Parse TOML, falling back to defaults when it is invalid
    pub fn parse(content: &str) -> Self {
        match toml::from_str::<Config>(content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "invalid config file, using defaults");
                Config::default()
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        std::env::var(&self.github.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[github]
token_env = "MY_TOKEN"

[discovery]
days = 3
sample_repos = 5
display_repos = 4

[bookmarks]
database = "/tmp/bookmarks.json"

[health_check]
script = "/opt/check.sh"

[ui]
list_limit = 25
"#;
        let config = Config::parse(toml_str);
        assert_eq!(config.github.token_env, "MY_TOKEN");
        assert_eq!(config.discovery.days, 3);
        assert_eq!(config.discovery.sample_repos, 5);
        assert_eq!(config.discovery.display_repos, 4);
        assert_eq!(config.bookmarks.database, PathBuf::from("/tmp/bookmarks.json"));
        assert_eq!(config.health_check.script, PathBuf::from("/opt/check.sh"));
        assert_eq!(config.ui.list_limit, 25);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = Config::parse("[discovery]\ndays = 14\n");
        assert_eq!(config.discovery.days, 14);
        assert_eq!(config.discovery.display_repos, 15);
        assert_eq!(config.bookmarks.database, PathBuf::from("database.json"));
        assert_eq!(config.ui.list_limit, 10);
    }

    #[test]
    fn invalid_config_uses_defaults() {
        let config = Config::parse("this is = = not toml");
        assert_eq!(config.discovery.days, 7);
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
        assert_eq!(config.health_check.script, PathBuf::from("./health_check.sh"));
    }
}
