use anyhow::{Context, Result, bail};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/watchtube-env";
pub const DEFAULT_WATCH_PORT: u16 = 3000;
pub const DEFAULT_WATCH_HOST: &str = "127.0.0.1";
pub const DEFAULT_BASE_PATH: &str = "/watch";

/// Values as they appear in the config file; every key is optional.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub watch_port: Option<u16>,
    pub watch_host: Option<String>,
    pub base_path: Option<String>,
    pub seed_file: Option<PathBuf>,
    pub auth_token: Option<String>,
}

/// Fully resolved settings the server starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub port: u16,
    pub host: String,
    pub base_path: String,
    pub seed_file: Option<PathBuf>,
    pub auth_token: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_WATCH_PORT,
            host: DEFAULT_WATCH_HOST.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            seed_file: None,
            auth_token: None,
        }
    }
}

pub fn read_env_config(path: &Path) -> Result<Option<EnvConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let mut cfg = EnvConfig::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value_raw)) = trimmed.split_once('=') {
            let value = value_raw.trim().trim_matches('"');
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                "WATCH_PORT" => {
                    let port: u16 = value
                        .parse()
                        .with_context(|| format!("Parsing WATCH_PORT from {}", path.display()))?;
                    cfg.watch_port = Some(port);
                }
                "WATCH_HOST" => cfg.watch_host = Some(value.to_string()),
                "WATCH_BASE_PATH" => cfg.base_path = Some(value.to_string()),
                "SEED_FILE" => cfg.seed_file = Some(PathBuf::from(value)),
                "AUTH_TOKEN" => cfg.auth_token = Some(value.to_string()),
                _ => {}
            }
        }
    }
    Ok(Some(cfg))
}

/// Resolves settings from `path`, falling back to defaults when the file or
/// any key is missing.
pub fn load_runtime_config_from(path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let defaults = RuntimeConfig::default();
    let Some(cfg) = read_env_config(path.as_ref())? else {
        return Ok(defaults);
    };
    let runtime = RuntimeConfig {
        port: cfg.watch_port.unwrap_or(defaults.port),
        host: cfg.watch_host.unwrap_or(defaults.host),
        base_path: cfg.base_path.unwrap_or(defaults.base_path),
        seed_file: cfg.seed_file,
        auth_token: cfg.auth_token,
    };
    validate_base_path(&runtime.base_path)?;
    Ok(runtime)
}

/// The watch routes live under their own prefix; `/` is reserved for the
/// profile route.
pub fn validate_base_path(base_path: &str) -> Result<()> {
    if !base_path.starts_with('/') {
        bail!("base path {base_path:?} must start with '/'");
    }
    if base_path == "/" {
        bail!("base path must not be '/', it is taken by the profile route");
    }
    Ok(())
}
