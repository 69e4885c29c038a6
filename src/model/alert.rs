use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Resource;

/// Alerting rule rendered into the Prometheus rules file
///
/// Every field defaults when absent from a request body, so a partial
/// payload still decodes.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Alert {
    /// Store-assigned ObjectId (24 hex chars)
    #[serde(deserialize_with = "super::lenient")]
    pub id: String,

    pub name: String,

    #[serde(deserialize_with = "super::lenient")]
    pub created: DateTime<Utc>,

    /// PromQL expression that fires the alert
    pub expression: String,

    /// How long the expression must hold before firing (e.g. "5m")
    pub duration: String,

    /// Free-form labels attached to the rule
    pub label: BTreeMap<String, String>,

    #[serde(deserialize_with = "super::lenient")]
    pub last_updated: DateTime<Utc>,

    pub summary: String,

    pub description: String,

    /// Runbook URL or inline text
    pub runbook: String,
}

impl Resource for Alert {
    const COLLECTION: &'static str = "alerts";
    const KIND: &'static str = "alert";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn set_created(&mut self, at: DateTime<Utc>) {
        self.created = at;
    }

    fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    fn set_last_updated(&mut self, at: DateTime<Utc>) {
        self.last_updated = at;
    }
}
