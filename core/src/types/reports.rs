use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Headline counters shown on the dashboard home page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_entities: u64,
    #[serde(default)]
    pub total_tenders: u64,
    #[serde(default)]
    pub total_payments: u64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A server-side error captured by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemError {
    pub id: i64,
    pub message: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub exception: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Spring actuator health document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorHealth {
    pub status: String,
    #[serde(default)]
    pub components: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActuatorHealth {
    pub fn is_up(&self) -> bool {
        self.status.eq_ignore_ascii_case("UP")
    }

    /// Status of a named component such as `db` or `diskSpace`.
    pub fn component_status(&self, name: &str) -> Option<&str> {
        self.components.get(name)?.get("status")?.as_str()
    }
}
