use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub slack: SlackConfig,
    pub sheets: SheetsConfig,
    pub providers: ProvidersConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct SlackConfig {
    pub signing_secret: SecretString,
    pub bot_token: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct SheetsConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// API keys for the fallback chain. A provider participates only when its
/// key is present and non-blank; leaving all four unset is valid and turns
/// every generation into the sentinel failure reply.
#[derive(Clone, Debug)]
pub struct ProvidersConfig {
    pub openai_api_key: Option<SecretString>,
    pub groq_api_key: Option<SecretString>,
    pub anthropic_api_key: Option<SecretString>,
    pub gemini_api_key: Option<SecretString>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
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
    pub signing_secret: Option<String>,
    pub bot_token: Option<String>,
    pub sheets_base_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub port: Option<u16>,
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
            slack: SlackConfig { signing_secret: String::new().into(), bot_token: None },
            sheets: SheetsConfig { base_url: String::new(), timeout_secs: 30 },
            providers: ProvidersConfig {
                openai_api_key: None,
                groq_api_key: None,
                anthropic_api_key: None,
                gemini_api_key: None,
                timeout_secs: 30,
            },
            server: ServerConfig { bind_address: "0.0.0.0".to_string(), port: 3000 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
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
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("phrasey.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(slack) = patch.slack {
            if let Some(signing_secret_value) = slack.signing_secret {
                self.slack.signing_secret = secret_value(signing_secret_value);
            }
            if let Some(bot_token_value) = slack.bot_token {
                self.slack.bot_token = Some(secret_value(bot_token_value));
            }
        }

        if let Some(sheets) = patch.sheets {
            if let Some(base_url) = sheets.base_url {
                self.sheets.base_url = base_url;
            }
            if let Some(timeout_secs) = sheets.timeout_secs {
                self.sheets.timeout_secs = timeout_secs;
            }
        }

        if let Some(providers) = patch.providers {
            if let Some(openai_api_key_value) = providers.openai_api_key {
                self.providers.openai_api_key = Some(secret_value(openai_api_key_value));
            }
            if let Some(groq_api_key_value) = providers.groq_api_key {
                self.providers.groq_api_key = Some(secret_value(groq_api_key_value));
            }
            if let Some(anthropic_api_key_value) = providers.anthropic_api_key {
                self.providers.anthropic_api_key = Some(secret_value(anthropic_api_key_value));
            }
            if let Some(gemini_api_key_value) = providers.gemini_api_key {
                self.providers.gemini_api_key = Some(secret_value(gemini_api_key_value));
            }
            if let Some(timeout_secs) = providers.timeout_secs {
                self.providers.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
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
        if let Some(value) = read_env("PHRASEY_SLACK_SIGNING_SECRET") {
            self.slack.signing_secret = secret_value(value);
        }
        if let Some(value) = read_env("PHRASEY_SLACK_BOT_TOKEN") {
            self.slack.bot_token = Some(secret_value(value));
        }

        if let Some(value) = read_env("PHRASEY_SHEETS_BASE_URL") {
            self.sheets.base_url = value;
        }
        if let Some(value) = read_env("PHRASEY_SHEETS_TIMEOUT_SECS") {
            self.sheets.timeout_secs = parse_u64("PHRASEY_SHEETS_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("PHRASEY_OPENAI_API_KEY") {
            self.providers.openai_api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("PHRASEY_GROQ_API_KEY") {
            self.providers.groq_api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("PHRASEY_ANTHROPIC_API_KEY") {
            self.providers.anthropic_api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("PHRASEY_GEMINI_API_KEY") {
            self.providers.gemini_api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("PHRASEY_PROVIDERS_TIMEOUT_SECS") {
            self.providers.timeout_secs = parse_u64("PHRASEY_PROVIDERS_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("PHRASEY_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        let port = read_env("PHRASEY_SERVER_PORT").map(|value| ("PHRASEY_SERVER_PORT", value));
        let port = port.or_else(|| read_env("PHRASEY_PORT").map(|value| ("PHRASEY_PORT", value)));
        if let Some((key, value)) = port {
            self.server.port = parse_u16(key, &value)?;
        }

        let log_level =
            read_env("PHRASEY_LOGGING_LEVEL").or_else(|| read_env("PHRASEY_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PHRASEY_LOGGING_FORMAT").or_else(|| read_env("PHRASEY_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(signing_secret) = overrides.signing_secret {
            self.slack.signing_secret = secret_value(signing_secret);
        }
        if let Some(bot_token) = overrides.bot_token {
            self.slack.bot_token = Some(secret_value(bot_token));
        }
        if let Some(sheets_base_url) = overrides.sheets_base_url {
            self.sheets.base_url = sheets_base_url;
        }
        if let Some(openai_api_key) = overrides.openai_api_key {
            self.providers.openai_api_key = Some(secret_value(openai_api_key));
        }
        if let Some(groq_api_key) = overrides.groq_api_key {
            self.providers.groq_api_key = Some(secret_value(groq_api_key));
        }
        if let Some(anthropic_api_key) = overrides.anthropic_api_key {
            self.providers.anthropic_api_key = Some(secret_value(anthropic_api_key));
        }
        if let Some(gemini_api_key) = overrides.gemini_api_key {
            self.providers.gemini_api_key = Some(secret_value(gemini_api_key));
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_slack(&self.slack)?;
        validate_sheets(&self.sheets)?;
        validate_providers(&self.providers)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("phrasey.toml"), PathBuf::from("config/phrasey.toml")]
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
    if slack.signing_secret.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "slack.signing_secret is required. Get it from https://api.slack.com/apps > Your App > Basic Information > App Credentials".to_string()
        ));
    }

    if let Some(bot_token) = &slack.bot_token {
        let bot_token = bot_token.expose_secret();
        if !bot_token.starts_with("xoxb-") {
            let hint = if bot_token.starts_with("xapp-") {
                " (hint: you may have used the app-level token instead of the bot token)"
            } else {
                ""
            };
            return Err(ConfigError::Validation(format!(
                "slack.bot_token must start with `xoxb-`{hint}. Get it from https://api.slack.com/apps"
            )));
        }
    }

    Ok(())
}

fn validate_sheets(sheets: &SheetsConfig) -> Result<(), ConfigError> {
    let base_url = sheets.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::Validation(
            "sheets.base_url is required (the deployed spreadsheet web-app endpoint)".to_string(),
        ));
    }
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "sheets.base_url must start with http:// or https://".to_string(),
        ));
    }

    if sheets.timeout_secs == 0 || sheets.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "sheets.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_providers(providers: &ProvidersConfig) -> Result<(), ConfigError> {
    if providers.timeout_secs == 0 || providers.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "providers.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation(
            "server.bind_address must not be empty".to_string(),
        ));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation(
            "server.port must be greater than zero".to_string(),
        ));
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

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    slack: Option<SlackPatch>,
    sheets: Option<SheetsPatch>,
    providers: Option<ProvidersPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct SlackPatch {
    signing_secret: Option<String>,
    bot_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SheetsPatch {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ProvidersPatch {
    openai_api_key: Option<String>,
    groq_api_key: Option<String>,
    anthropic_api_key: Option<String>,
    gemini_api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
