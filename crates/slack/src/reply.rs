use serde::Serialize;

use phrasey_core::PhraseRow;

pub const NO_RESULTS_TEXT: &str = "🔍 관련 UX 문구가 없습니다.";
pub const ADD_USAGE_TEXT: &str = "예: 오류|결제 실패|정중|팝업";
pub const ADDED_TEXT: &str = "✅ 등록되었습니다!";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Ephemeral,
    InChannel,
}

/// Response body Slack renders for a slash command. `ephemeral` is shown
/// only to the invoking user, `in_channel` to everyone in the channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub response_type: ResponseType,
    pub text: String,
}

impl Reply {
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self { response_type: ResponseType::Ephemeral, text: text.into() }
    }

    pub fn in_channel(text: impl Into<String>) -> Self {
        Self { response_type: ResponseType::InChannel, text: text.into() }
    }
}

pub fn no_results_message() -> Reply {
    Reply::ephemeral(NO_RESULTS_TEXT)
}

pub fn search_results_message(rows: &[PhraseRow]) -> Reply {
    let lines = rows
        .iter()
        .map(|row| format!("• {} ({})", row.phrase_text(), row.tone_label()))
        .collect::<Vec<_>>()
        .join("\n");
    Reply::in_channel(lines)
}

pub fn add_usage_message() -> Reply {
    Reply::ephemeral(ADD_USAGE_TEXT)
}

pub fn added_message() -> Reply {
    Reply::in_channel(ADDED_TEXT)
}

pub fn error_message(label: &str, detail: &str) -> Reply {
    Reply::ephemeral(format!("{label}: {detail}"))
}

#[cfg(test)]
mod tests {
    use super::{
        add_usage_message, added_message, error_message, no_results_message,
        search_results_message, Reply, ResponseType,
    };
    use phrasey_core::PhraseRow;

    #[test]
    fn serializes_to_the_slack_response_shape() {
        let value = serde_json::to_value(Reply::ephemeral("🔍 관련 UX 문구가 없습니다."))
            .expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "response_type": "ephemeral",
                "text": "🔍 관련 UX 문구가 없습니다."
            })
        );

        let value = serde_json::to_value(Reply::in_channel("✅ 등록되었습니다!")).expect("serialize");
        assert_eq!(value["response_type"], "in_channel");
    }

    #[test]
    fn fixed_replies_use_their_canonical_text() {
        assert_eq!(no_results_message(), Reply::ephemeral("🔍 관련 UX 문구가 없습니다."));
        assert_eq!(add_usage_message(), Reply::ephemeral("예: 오류|결제 실패|정중|팝업"));
        assert_eq!(added_message(), Reply::in_channel("✅ 등록되었습니다!"));
    }

    #[test]
    fn search_lines_join_text_and_tone() {
        let rows = vec![
            PhraseRow::new(vec![
                "오류".to_owned(),
                "정중".to_owned(),
                "결제가 실패했습니다".to_owned(),
            ]),
            PhraseRow::new(vec!["안내".to_owned()]),
        ];

        let reply = search_results_message(&rows);
        assert_eq!(reply.response_type, ResponseType::InChannel);
        assert_eq!(reply.text, "• 결제가 실패했습니다 (정중)\n•  ()");
    }

    #[test]
    fn error_lines_prefix_the_label() {
        let reply = error_message("검색 오류", "sheet request failed: timeout");
        assert_eq!(reply, Reply::ephemeral("검색 오류: sheet request failed: timeout"));
    }
}
