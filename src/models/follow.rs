use serde::{Deserialize, Serialize};

use crate::infrastructure::DocId;
use crate::models::{Ref, User};

/// Directed edge: `follower` follows `following`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Follow {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub follower: Ref<User>,
    pub following: Ref<User>,
}
