pub mod config;
pub mod phrase;

pub use config::{
    AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig,
    ProvidersConfig, ServerConfig, SheetsConfig, SlackConfig,
};
pub use phrase::{PhraseRecord, PhraseRow};
