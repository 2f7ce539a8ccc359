use serde::{Deserialize, Serialize};

use crate::infrastructure::DocId;
use crate::models::{Ref, Tuit, User};

/// Edge recording that `liked_by` likes `tuit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub tuit: Ref<Tuit>,
    pub liked_by: Ref<User>,
}
