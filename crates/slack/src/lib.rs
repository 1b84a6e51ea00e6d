//! Slack Integration - slash command surface for phrasey
//!
//! This crate turns verified slash command payloads into replies:
//! - **Slash Commands** (`commands`) - alias table, argument parsing, routing
//! - **Replies** (`reply`) - the `response_type`/`text` envelope Slack renders
//!
//! # Getting Started
//!
//! 1. Create a Slack app at https://api.slack.com/apps
//! 2. Add the slash commands `/usimgle`, `/usimgle_add`, `/usimgle_feedback`,
//!    `/usimgle_suggest` plus their Korean aliases, all pointing at the same
//!    dispatcher endpoint
//! 3. Set `PHRASEY_SLACK_SIGNING_SECRET` so the server can verify requests
//!
//! # Architecture
//!
//! ```text
//! Slack POST → signature check → alias table → CommandRouter → handler
//!                                                   ↓
//!                                   Reply JSON ← sheet store / AI chain
//! ```
//!
//! # Key Types
//!
//! - `SlashCommandPayload` - the form fields Slack posts
//! - `CommandRouter` - dispatches an invocation and folds every failure
//!   into a reply, so each invocation produces exactly one response
//! - `Reply` - ephemeral or in-channel response body

pub mod commands;
pub mod reply;
