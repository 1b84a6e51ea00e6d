use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use phrasey_ai::{GenerateError, TextGenerator};
use phrasey_core::PhraseRecord;
use phrasey_sheets::{PhraseStore, StoreError};

use crate::reply::{self, Reply};

/// Form fields Slack posts for a slash command. Slack sends more keys
/// than these; unknown ones are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SlashCommandPayload {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub channel_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Search,
    Add,
    Feedback,
    Suggest,
}

impl Command {
    pub fn error_label(self) -> &'static str {
        match self {
            Command::Search => "검색 오류",
            Command::Add => "등록 오류",
            Command::Feedback => "피드백 오류",
            Command::Suggest => "추천 오류",
        }
    }
}

/// Every registered slash command name and the handler it maps to. Each
/// handler is reachable under an ASCII name and a Korean name.
pub const COMMAND_ALIASES: [(&str, Command); 8] = [
    ("/usimgle", Command::Search),
    ("/유심글", Command::Search),
    ("/usimgle_add", Command::Add),
    ("/유심글등록", Command::Add),
    ("/usimgle_feedback", Command::Feedback),
    ("/유심글피드백", Command::Feedback),
    ("/usimgle_suggest", Command::Suggest),
    ("/유심글추천", Command::Suggest),
];

/// Exact, case-sensitive lookup. `/USIMGLE` or a trailing space does not
/// resolve; Slack sends command names verbatim as registered.
pub fn resolve_alias(command: &str) -> Option<Command> {
    COMMAND_ALIASES.iter().find(|(alias, _)| *alias == command).map(|(_, command)| *command)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command: Command,
    pub text: String,
    pub user_id: String,
    pub channel_id: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unsupported slash command: {0}")]
    UnsupportedCommand(String),
}

pub fn resolve_invocation(
    payload: SlashCommandPayload,
) -> Result<CommandInvocation, CommandParseError> {
    let command = match resolve_alias(&payload.command) {
        Some(command) => command,
        None => return Err(CommandParseError::UnsupportedCommand(payload.command)),
    };

    Ok(CommandInvocation {
        command,
        text: payload.text,
        user_id: payload.user_id,
        channel_id: payload.channel_id,
    })
}

/// Splits `카테고리|문구|톤|비고` into a record. Category and text are
/// required; tone and notes default to empty. Segments past the fourth
/// are ignored.
pub fn parse_add_args(args: &str) -> Option<PhraseRecord> {
    let mut segments = args.split('|').map(str::trim);
    let category = segments.next().unwrap_or_default();
    let text = segments.next().unwrap_or_default();
    let tone = segments.next().unwrap_or_default();
    let notes = segments.next().unwrap_or_default();

    if category.is_empty() || text.is_empty() {
        return None;
    }

    Some(PhraseRecord {
        category: category.to_owned(),
        text: text.to_owned(),
        tone: tone.to_owned(),
        notes: notes.to_owned(),
    })
}

pub fn feedback_prompt(text: &str) -> String {
    format!("아래 문구의 UX 톤·명확성·개선 포인트를 친근한 한국어로 설명해줘:\n\"{text}\"")
}

pub fn suggest_prompt(text: &str) -> String {
    format!("상황: \"{text}\"\n→ 적합한 UX 문구 2개와 이유를 알려줘.")
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Dispatches one invocation to its handler. Handler failures never
/// escape: every path folds into a `Reply`, so each invocation produces
/// exactly one response.
pub struct CommandRouter {
    store: Arc<dyn PhraseStore>,
    generator: Arc<dyn TextGenerator>,
}

impl CommandRouter {
    pub fn new(store: Arc<dyn PhraseStore>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { store, generator }
    }

    pub async fn route(&self, invocation: &CommandInvocation) -> Reply {
        let outcome = match invocation.command {
            Command::Search => self.search(&invocation.text).await,
            Command::Add => self.add(&invocation.text).await,
            Command::Feedback => self.feedback(&invocation.text).await,
            Command::Suggest => self.suggest(&invocation.text).await,
        };

        match outcome {
            Ok(reply) => reply,
            Err(err) => {
                warn!(command = ?invocation.command, error = %err, "command handler failed");
                reply::error_message(invocation.command.error_label(), &err.to_string())
            }
        }
    }

    async fn search(&self, text: &str) -> Result<Reply, HandlerError> {
        let rows = self.store.query(text).await?;
        if rows.is_empty() {
            Ok(reply::no_results_message())
        } else {
            Ok(reply::search_results_message(&rows))
        }
    }

    async fn add(&self, args: &str) -> Result<Reply, HandlerError> {
        let record = match parse_add_args(args) {
            Some(record) => record,
            None => return Ok(reply::add_usage_message()),
        };

        self.store.append(&record).await?;
        Ok(reply::added_message())
    }

    async fn feedback(&self, text: &str) -> Result<Reply, HandlerError> {
        let generated = self.generator.generate(&feedback_prompt(text)).await?;
        Ok(Reply::in_channel(generated))
    }

    async fn suggest(&self, text: &str) -> Result<Reply, HandlerError> {
        let generated = self.generator.generate(&suggest_prompt(text)).await?;
        Ok(Reply::in_channel(generated))
    }
}
