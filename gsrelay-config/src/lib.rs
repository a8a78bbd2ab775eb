use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: Option<ServerSection>,
    #[serde(default)]
    pub files: Option<FilesSection>,
    #[serde(default)]
    pub sender: Option<SenderSection>,
    #[serde(default)]
    pub service: Option<ServiceSection>,
    #[serde(default)]
    pub logging: Option<LoggingSection>,
    #[serde(default)]
    pub queue: Option<QueueSection>,
    #[serde(default)]
    pub shutdown: Option<ShutdownSection>,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilesSection {
    #[serde(default)]
    pub directory: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SenderSection {
    #[serde(default)]
    pub readonly: Option<bool>,
    #[serde(default)]
    pub disposal: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceSection {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub json: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct QueueSection {
    #[serde(default)]
    pub capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ShutdownSection {
    #[serde(default)]
    pub drain_conversions: Option<bool>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

type ParseFn = fn(&str) -> Result<RawConfigFile, String>;

#[cfg(feature = "toml")]
fn parse_toml(text: &str) -> Result<RawConfigFile, String> {
    toml::from_str(text).map_err(|e| e.to_string())
}

#[cfg(feature = "json")]
fn parse_json(text: &str) -> Result<RawConfigFile, String> {
    serde_json::from_str(text).map_err(|e| e.to_string())
}

#[cfg(feature = "yaml")]
fn parse_yaml(text: &str) -> Result<RawConfigFile, String> {
    serde_yaml::from_str(text).map_err(|e| e.to_string())
}

/// Parser selected by file extension, when the matching format is enabled.
fn parser_for(ext: &str) -> Option<ParseFn> {
    match ext {
        #[cfg(feature = "toml")]
        "toml" => Some(parse_toml as ParseFn),
        #[cfg(feature = "json")]
        "json" => Some(parse_json as ParseFn),
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Some(parse_yaml as ParseFn),
        _ => None,
    }
}

/// Every enabled parser, in probe order.
fn enabled_parsers() -> Vec<(&'static str, ParseFn)> {
    let mut parsers: Vec<(&'static str, ParseFn)> = Vec::new();
    #[cfg(feature = "toml")]
    parsers.push(("toml", parse_toml as ParseFn));
    #[cfg(feature = "json")]
    parsers.push(("json", parse_json as ParseFn));
    #[cfg(feature = "yaml")]
    parsers.push(("yaml", parse_yaml as ParseFn));
    parsers
}

/// Load a RawConfigFile from a path. A recognized extension (.toml, .json,
/// .yaml/.yml) picks its parser directly; any other name is probed against
/// every enabled format.
pub fn load_raw_from_file<P: AsRef<Path>>(path: P) -> Result<RawConfigFile, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if let Some(parse) = ext.as_deref().and_then(parser_for) {
        return parse(&text).map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())));
    }

    let mut failures = Vec::new();
    for (format, parse) in enabled_parsers() {
        match parse(&text) {
            Ok(raw) => return Ok(raw),
            Err(e) => failures.push(format!("{format}: {e}")),
        }
    }
    Err(ConfigError::Parse(if failures.is_empty() {
        format!("{}: no configuration format enabled", path.display())
    } else {
        format!(
            "{}: not readable as any enabled format ({})",
            path.display(),
            failures.join("; ")
        )
    }))
}

/// Concrete application configuration with defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
    pub sender: SenderConfig,
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
    pub queue: QueueConfig,
    pub shutdown: ShutdownConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    /// HTTP listen endpoint as `host:port`.
    pub address: String,
}

impl ServerConfig {
    /// Parse the configured listen endpoint.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.address
            .parse()
            .map_err(|_| ConfigError::Validation(format!("invalid server.address: {}", self.address)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilesConfig {
    /// Workspace directory for uploaded inputs and converted outputs.
    pub directory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SenderConfig {
    /// When true, skip the actual TCP send and only log what would happen.
    pub readonly: bool,
    /// When true, delete input and output files after a fully successful send.
    pub disposal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShutdownConfig {
    /// Let queued conversions finish before the converter exits.
    pub drain_conversions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                address: "0.0.0.0:9980".to_string(),
            },
            files: FilesConfig {
                directory: String::new(),
            },
            sender: SenderConfig {
                readonly: true,
                disposal: false,
            },
            service: ServiceConfig {
                name: "GS".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
            queue: QueueConfig { capacity: 1024 },
            shutdown: ShutdownConfig {
                drain_conversions: true,
            },
        }
    }
}

const TRUTHY: &[&str] = &["1", "true", "yes", "y", "on"];
const FALSY: &[&str] = &["0", "false", "no", "n", "off"];

/// Interpret a human-entered boolean; `None` when it matches neither list.
fn parse_bool(s: &str) -> Option<bool> {
    let v = s.trim().to_ascii_lowercase();
    if TRUTHY.contains(&v.as_str()) {
        Some(true)
    } else if FALSY.contains(&v.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Overwrite `slot` when the raw file supplied a value.
fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Load concrete `Config` from zero or more files and environment variables.
///
/// Files are applied in order, later files overriding earlier ones, matching
/// the repeatable `--config-file` flag. Environment variables take precedence
/// over every file.
pub fn load_config<P: AsRef<Path>>(paths: &[P]) -> Result<Config, ConfigError> {
    let mut cfg = Config::default();

    for p in paths {
        let raw = load_raw_from_file(p)?;
        apply_raw(&mut cfg, raw);
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

fn apply_raw(cfg: &mut Config, raw: RawConfigFile) {
    if let Some(server) = raw.server {
        merge(&mut cfg.server.address, server.address);
    }
    if let Some(files) = raw.files {
        merge(&mut cfg.files.directory, files.directory);
    }
    if let Some(sender) = raw.sender {
        merge(&mut cfg.sender.readonly, sender.readonly);
        merge(&mut cfg.sender.disposal, sender.disposal);
    }
    if let Some(service) = raw.service {
        merge(&mut cfg.service.name, service.name);
    }
    if let Some(logging) = raw.logging {
        merge(&mut cfg.logging.level, logging.level);
        merge(&mut cfg.logging.json, logging.json);
    }
    if let Some(queue) = raw.queue {
        merge(&mut cfg.queue.capacity, queue.capacity);
    }
    if let Some(shutdown) = raw.shutdown {
        merge(&mut cfg.shutdown.drain_conversions, shutdown.drain_conversions);
    }
}

/// Replace `slot` with the value of `key` when the variable is set, parsed
/// via `FromStr`. Unset variables leave the slot alone.
fn override_from_env<T: std::str::FromStr>(key: &str, slot: &mut T) -> Result<(), ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(());
    };
    match raw.parse() {
        Ok(v) => {
            *slot = v;
            Ok(())
        }
        Err(_) => Err(ConfigError::Parse(format!("{key}={raw} is not valid"))),
    }
}

/// Boolean flavor of [`override_from_env`], accepting the usual truthy and
/// falsy spellings.
fn override_bool_from_env(key: &str, slot: &mut bool) -> Result<(), ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(());
    };
    match parse_bool(&raw) {
        Some(v) => {
            *slot = v;
            Ok(())
        }
        None => Err(ConfigError::Parse(format!("{key}={raw} is not a boolean"))),
    }
}

/// Apply all `GSRELAY_*` environment overrides to the config.
fn apply_env_overrides(cfg: &mut Config) -> Result<(), ConfigError> {
    override_from_env("GSRELAY_SERVER_ADDRESS", &mut cfg.server.address)?;
    override_from_env("GSRELAY_FILES_DIRECTORY", &mut cfg.files.directory)?;
    override_bool_from_env("GSRELAY_READONLY", &mut cfg.sender.readonly)?;
    override_bool_from_env("GSRELAY_DISPOSAL", &mut cfg.sender.disposal)?;
    override_from_env("GSRELAY_SERVICE_NAME", &mut cfg.service.name)?;
    override_from_env("GSRELAY_LOG_LEVEL", &mut cfg.logging.level)?;
    override_bool_from_env("GSRELAY_LOG_JSON", &mut cfg.logging.json)?;
    override_from_env("GSRELAY_QUEUE_CAPACITY", &mut cfg.queue.capacity)?;
    override_bool_from_env("GSRELAY_DRAIN_CONVERSIONS", &mut cfg.shutdown.drain_conversions)?;
    Ok(())
}

/// Validate higher-level constraints on the resolved configuration.
pub fn validate_config(cfg: &Config) -> Result<(), ConfigError> {
    cfg.server.socket_addr()?;

    if cfg.files.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "files.directory must be set".into(),
        ));
    }

    if cfg.queue.capacity == 0 {
        return Err(ConfigError::Validation("queue.capacity must be > 0".into()));
    }

    Ok(())
}
