use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Resource;

/// Notification receiver rendered into the Alertmanager config
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Receiver {
    #[serde(deserialize_with = "super::lenient")]
    pub id: String,

    #[serde(deserialize_with = "super::lenient")]
    pub created: DateTime<Utc>,

    /// Address notifications are mailed to
    pub email: String,

    /// Labels an alert must carry to be routed to this receiver
    pub label: BTreeMap<String, String>,

    #[serde(deserialize_with = "super::lenient")]
    pub last_updated: DateTime<Utc>,
}

impl Resource for Receiver {
    const COLLECTION: &'static str = "receivers";
    const KIND: &'static str = "receiver";

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
