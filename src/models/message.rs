use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::infrastructure::DocId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContent {
    pub msg: String,
    #[serde(default = "Utc::now")]
    pub sent_on: DateTime<Utc>,
}

impl MessageContent {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            sent_on: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub send: DocId,
    pub receive: DocId,
    #[serde(flatten)]
    pub content: MessageContent,
}
