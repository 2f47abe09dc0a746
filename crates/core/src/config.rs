use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BOT_NAME: &str = "NorrisBot";
pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";
pub const DEFAULT_DB_FILE: &str = "norrisbot.db";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub slack: SlackConfig,
    pub database: DatabaseConfig,
    pub bot: BotConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct SlackConfig {
    pub api_token: SecretString,
    pub api_base: String,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct BotConfig {
    pub name: String,
    pub reply_policy: ReplyPolicy,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Whose messages the bot answers.
///
/// `Others` answers everyone except the bot itself. `SelfOnly` answers only
/// messages authored by the bot's own user (`BOT_REPLY_TO=self`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyPolicy {
    #[default]
    Others,
    #[serde(rename = "self")]
    SelfOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_token: Option<String>,
    pub api_base: Option<String>,
    pub database_path: Option<PathBuf>,
    pub bot_name: Option<String>,
    pub reply_policy: Option<ReplyPolicy>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            slack: SlackConfig {
                api_token: String::new().into(),
                api_base: DEFAULT_SLACK_API_BASE.to_string(),
            },
            database: DatabaseConfig {
                path: default_database_path(),
                max_connections: 1,
                timeout_secs: 30,
            },
            bot: BotConfig {
                name: DEFAULT_BOT_NAME.to_string(),
                reply_policy: ReplyPolicy::default(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

/// `<cwd>/data/norrisbot.db`, or the relative path when the working
/// directory cannot be resolved.
pub fn default_database_path() -> PathBuf {
    let relative = Path::new("data").join(DEFAULT_DB_FILE);
    match env::current_dir() {
        Ok(cwd) => cwd.join(relative),
        Err(_) => relative,
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for ReplyPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "others" => Ok(Self::Others),
            "self" => Ok(Self::SelfOnly),
            other => Err(ConfigError::Validation(format!(
                "unsupported reply policy `{other}` (expected others|self)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("norrisbot.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(slack) = patch.slack {
            if let Some(api_token_value) = slack.api_token {
                self.slack.api_token = secret_value(api_token_value);
            }
            if let Some(api_base) = slack.api_base {
                self.slack.api_base = api_base;
            }
        }

        if let Some(database) = patch.database {
            if let Some(path) = database.path {
                self.database.path = path;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(bot) = patch.bot {
            if let Some(name) = bot.name {
                self.bot.name = name;
            }
            if let Some(reply_policy) = bot.reply_policy {
                self.bot.reply_policy = reply_policy;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("BOT_API_KEY") {
            self.slack.api_token = secret_value(value);
        }
        if let Some(value) = read_env("BOT_SLACK_API_BASE") {
            self.slack.api_base = value;
        }

        if let Some(value) = read_env("BOT_DB_PATH") {
            self.database.path = PathBuf::from(value);
        }
        if let Some(value) = read_env("BOT_DB_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("BOT_DB_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("BOT_DB_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("BOT_DB_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("BOT_NAME") {
            self.bot.name = value;
        }
        if let Some(value) = read_env("BOT_REPLY_TO") {
            self.bot.reply_policy = value.parse()?;
        }

        if let Some(value) = read_env("BOT_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("BOT_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(api_token) = overrides.api_token {
            self.slack.api_token = secret_value(api_token);
        }
        if let Some(api_base) = overrides.api_base {
            self.slack.api_base = api_base;
        }
        if let Some(database_path) = overrides.database_path {
            self.database.path = database_path;
        }
        if let Some(bot_name) = overrides.bot_name {
            self.bot.name = bot_name;
        }
        if let Some(reply_policy) = overrides.reply_policy {
            self.bot.reply_policy = reply_policy;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    /// The API token is not checked here: a bad token is only
    /// reported by the platform when the bot connects.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_slack(&self.slack)?;
        validate_database(&self.database)?;
        validate_bot(&self.bot)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("norrisbot.toml"), PathBuf::from("config/norrisbot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_slack(slack: &SlackConfig) -> Result<(), ConfigError> {
    let base = slack.api_base.trim();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        return Err(ConfigError::Validation(
            "slack.api_base must start with http:// or https://".to_string(),
        ));
    }
    Ok(())
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    if database.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("database.path must not be empty".to_string()));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_bot(bot: &BotConfig) -> Result<(), ConfigError> {
    if bot.name.trim().is_empty() {
        return Err(ConfigError::Validation("bot.name must not be empty".to_string()));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    slack: Option<SlackPatch>,
    database: Option<DatabasePatch>,
    bot: Option<BotPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct SlackPatch {
    api_token: Option<String>,
    api_base: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    path: Option<PathBuf>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct BotPatch {
    name: Option<String>,
    reply_policy: Option<ReplyPolicy>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
