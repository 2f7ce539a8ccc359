use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::infrastructure::DocId;
use crate::models::{Ref, User};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub replies: u64,
    #[serde(default)]
    pub retuits: u64,
    #[serde(default)]
    pub likes: u64,
}

/// The author-independent part of a tuit, as sent by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuitContent {
    pub tuit: String,
    #[serde(default = "Utc::now")]
    pub posted_on: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_overlay: Option<String>,
    #[serde(default)]
    pub stats: Stats,
}

impl TuitContent {
    pub fn new(tuit: impl Into<String>) -> Self {
        Self {
            tuit: tuit.into(),
            posted_on: Utc::now(),
            image: None,
            youtube: None,
            avatar_logo: None,
            image_overlay: None,
            stats: Stats::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tuit {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub posted_by: Ref<User>,
    #[serde(flatten)]
    pub content: TuitContent,
}

/// Body of `POST /api/tuits`, where the author comes from the body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthoredTuit {
    pub posted_by: DocId,
    #[serde(flatten)]
    pub content: TuitContent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuitPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_overlay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
}
