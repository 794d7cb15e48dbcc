// ABOUTME: Community pages' records: the prayer wall and the moderated chat log.
// ABOUTME: Both are appended to by members at runtime rather than edited in the admin panel.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrayerRequest {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub request: String,
    pub timestamp: i64,
    /// Times someone has prayed for this request.
    pub likes: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_role: String,
    pub text: String,
    pub timestamp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
