use std::env;
use std::fs as stdfs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

const ENV_FILES: [&str; 2] = [".env", "config/local.env"];

/// Read `.env` and `config/local.env` into the process environment.
/// Variables that are already set are left alone.
pub fn load_local_env_overrides() {
    for file in ENV_FILES {
        let path = Path::new(file);
        if !path.exists() {
            continue;
        }
        match stdfs::read_to_string(path) {
            Ok(contents) => {
                for (key, value) in parse_env_file(&contents) {
                    if env::var(&key).is_err() {
                        env::set_var(key, value);
                    }
                }
                info!(path = %path.display(), "Loaded environment overrides");
            }
            Err(err) => {
                warn!(path = %path.display(), ?err, "failed to read env file");
            }
        }
    }
}

/// `KEY=VALUE` pairs of an env file; comments, blanks and malformed lines are skipped.
pub fn parse_env_file(contents: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (idx, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            warn!(line = idx + 1, "invalid env entry; skipping");
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        pairs.push((key.to_string(), unescape_value(value.trim())));
    }
    pairs
}

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
}

fn default_config_path() -> Result<PathBuf> {
    // Priority: ./config/config.yaml > ~/.config/webpilot/config.yaml
    let local_config = PathBuf::from("config/config.yaml");
    if local_config.exists() {
        return Ok(local_config);
    }
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("webpilot");
    path.push("config.yaml");
    Ok(path)
}

/// Load the YAML config (defaults when the file is absent). Environment
/// overrides are applied by the caller.
pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .await
            .context("Failed to read config file")?;

        let config: AppConfig =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded configuration from: {}", config_path.display());
        Ok(LoadedConfig {
            config,
            path: config_path,
        })
    } else {
        warn!(
            "Config file not found, using defaults: {}",
            config_path.display()
        );
        Ok(LoadedConfig {
            config: AppConfig::default(),
            path: config_path,
        })
    }
}

fn unescape_value(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let inner = &value[1..value.len() - 1];
        inner
            .replace("\\\"", "\"")
            .replace("\\n", "\n")
            .replace("\\r", "\r")
            .replace("\\t", "\t")
    } else if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_file_entries() {
        let pairs = parse_env_file(
            "# comment\nOPENAI_API_KEY=\"sk-test\"\n\nexport SERPAPI_KEY='abc'\nbroken line\nDEFAULT_START_URL=https://www.naver.com\n",
        );
        assert_eq!(
            pairs,
            vec![
                ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
                ("SERPAPI_KEY".to_string(), "abc".to_string()),
                (
                    "DEFAULT_START_URL".to_string(),
                    "https://www.naver.com".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let loaded = load_config(Some(&path)).await.unwrap();
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.config.server.port, 7860);
    }

    #[tokio::test]
    async fn file_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "cua:\n  max_steps: 7\nserver:\n  port: 9000\n").unwrap();
        let loaded = load_config(Some(&path)).await.unwrap();
        assert_eq!(loaded.config.cua.max_steps, 7);
        assert_eq!(loaded.config.server.port, 9000);
        assert_eq!(loaded.config.server.queue_limit, 20);
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "cua: [unclosed").unwrap();
        assert!(load_config(Some(&path)).await.is_err());
    }
}
