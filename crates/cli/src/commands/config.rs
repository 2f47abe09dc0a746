use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use norrisbot_core::config::{AppConfig, LoadOptions, LogFormat, ReplyPolicy};
use secrecy::ExposeSecret;
use toml::Value;

use crate::commands::CommandResult;

struct ConfigField {
    key: &'static str,
    env_key: &'static str,
    value: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(fields(&config).into_iter().map(|field| {
        let source = field_source(
            field.key,
            field.env_key,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        render_line(field.key, &field.value, source)
    }));

    CommandResult::success("config", lines.join("\n"))
}

fn fields(config: &AppConfig) -> Vec<ConfigField> {
    let field = |key, env_key, value: String| ConfigField { key, env_key, value };
    vec![
        field(
            "slack.api_token",
            "BOT_API_KEY",
            redact_token(config.slack.api_token.expose_secret()),
        ),
        field("slack.api_base", "BOT_SLACK_API_BASE", config.slack.api_base.clone()),
        field("database.path", "BOT_DB_PATH", config.database.path.display().to_string()),
        field(
            "database.max_connections",
            "BOT_DB_MAX_CONNECTIONS",
            config.database.max_connections.to_string(),
        ),
        field(
            "database.timeout_secs",
            "BOT_DB_TIMEOUT_SECS",
            config.database.timeout_secs.to_string(),
        ),
        field("bot.name", "BOT_NAME", config.bot.name.clone()),
        field("bot.reply_policy", "BOT_REPLY_TO", reply_policy_name(config.bot.reply_policy)),
        field("logging.level", "BOT_LOG_LEVEL", config.logging.level.clone()),
        field("logging.format", "BOT_LOG_FORMAT", log_format_name(config.logging.format)),
    ]
}

fn reply_policy_name(policy: ReplyPolicy) -> String {
    match policy {
        ReplyPolicy::Others => "others".to_string(),
        ReplyPolicy::SelfOnly => "self".to_string(),
    }
}

fn log_format_name(format: LogFormat) -> String {
    match format {
        LogFormat::Compact => "compact".to_string(),
        LogFormat::Pretty => "pretty".to_string(),
        LogFormat::Json => "json".to_string(),
    }
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("norrisbot.toml"), PathBuf::from("config/norrisbot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var(env_key).is_ok_and(|value| !value.trim().is_empty()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
