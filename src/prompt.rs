//! Prompt construction for generation and refinement
//!
//! Both builders are pure: given the same inputs they produce the same
//! ordered (system, user) message pair, with no side effects.

use serde::{Deserialize, Serialize};

use crate::api::Itinerary;

/// Message role on the chat-completions wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One chat message as sent to the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// System instruction fixing the output document shape. The model must
/// answer with exactly this JSON object and nothing else.
const GENERATION_SYSTEM_PROMPT: &str = r#"你是一名专业旅行规划助手。根据用户的需求生成详细且可执行的行程。
输出必须是 JSON，对象结构如下：
{
  "destination": string,
  "days": [
    { "date": string, "activities": [ { "name": string, "address": string, "time": string, "notes": string, "lat": number, "lng": number } ], "hotel": string }
  ],
  "summary": string,
  "start": { "address": string, "lat": number, "lng": number },
  "budget": { "currency": string, "total": number, "breakdown": { "transportation": number, "lodging": number, "food": number, "tickets": number, "shopping": number, "misc": number }, "notes": string }
}
不要返回任何多余的文本。"#;

const BUDGET_DIRECTIVE: &str =
    "请同时在 budget 字段中给出预算分析，按 transportation/lodging/food/tickets/shopping/misc 细分。";

const REFINEMENT_SYSTEM_PROMPT: &str = r#"你是一名专业旅行规划助手。用户会提供一份完整的现有行程（JSON）以及修改意见。
请根据修改意见输出修改后的完整行程，结构与现有行程相同（同样的 JSON 对象结构），而不是差异。
不要返回任何多余的文本。"#;

/// Build the (system, user) pair for fresh generation from a free-text trip
/// description.
pub fn generation_messages(description: &str) -> [ChatMessage; 2] {
    [
        ChatMessage::system(GENERATION_SYSTEM_PROMPT),
        ChatMessage::user(format!("{description}\n{BUDGET_DIRECTIVE}")),
    ]
}

/// Build the (system, user) pair for refinement: the full previous itinerary
/// serialized as JSON plus the feedback text.
pub fn refinement_messages(previous: &Itinerary, feedback: &str) -> [ChatMessage; 2] {
    let serialized = serde_json::to_string(previous).unwrap_or_default();
    [
        ChatMessage::system(REFINEMENT_SYSTEM_PROMPT),
        ChatMessage::user(format!("现有行程：\n{serialized}\n\n修改意见：{feedback}")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ItineraryDay;

    #[test]
    fn generation_pair_is_system_then_user() {
        let messages = generation_messages("南京到上海，3天，预算2000");
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[0].content.contains("\"destination\""));
        assert!(messages[0].content.contains("不要返回任何多余的文本"));
        assert!(messages[1].content.starts_with("南京到上海"));
        assert!(messages[1].content.contains("预算分析"));
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generation_messages("东京5日游"), generation_messages("东京5日游"));
    }

    #[test]
    fn refinement_embeds_previous_itinerary_and_feedback() {
        let previous = Itinerary {
            destination: "东京".to_owned(),
            days: vec![ItineraryDay { date: "2025-12-01".to_owned(), ..Default::default() }],
            ..Default::default()
        };
        let messages = refinement_messages(&previous, "改成北京");
        let serialized = serde_json::to_string(&previous).unwrap();

        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("完整"));
        assert!(messages[1].content.contains(&serialized));
        assert!(messages[1].content.contains("改成北京"));
    }

    #[test]
    fn refinement_does_not_mutate_previous() {
        let previous = Itinerary { destination: "东京".to_owned(), ..Default::default() };
        let before = previous.clone();
        let _ = refinement_messages(&previous, "加一天");
        assert_eq!(previous, before);
    }

    #[test]
    fn messages_serialize_to_wire_shape() {
        let json = serde_json::to_string(&ChatMessage::user("你好")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"你好"}"#);
    }
}
