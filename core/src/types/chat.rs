use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One exchange with the platform's AI assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub message: String,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request payload for sending a message to the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPrompt {
    pub message: String,
}
