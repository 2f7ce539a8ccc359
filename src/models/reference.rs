use serde::{Deserialize, Serialize};

use crate::infrastructure::DocId;

/// A reference to another document.
///
/// Stored as the referenced id; queries that expand references replace it with
/// the full document, or with `null` when the target no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(DocId),
    Populated(Box<T>),
    Dangling,
}

impl<T> Ref<T> {
    pub fn id(&self) -> Option<DocId> {
        match self {
            Ref::Id(id) => Some(*id),
            _ => None,
        }
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            Ref::Populated(doc) => Some(doc.as_ref()),
            _ => None,
        }
    }

    pub fn is_dangling(&self) -> bool {
        matches!(self, Ref::Dangling)
    }
}

impl<T> From<DocId> for Ref<T> {
    fn from(id: DocId) -> Self {
        Ref::Id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Target {
        name: String,
    }

    #[test]
    fn deserializes_every_shape() {
        let id: Ref<Target> = serde_json::from_value(json!("12345")).unwrap();
        assert_eq!(id.id(), Some(DocId::from_raw(12345)));

        let doc: Ref<Target> = serde_json::from_value(json!({"name": "alice"})).unwrap();
        assert_eq!(doc.populated().unwrap().name, "alice");

        let gone: Ref<Target> = serde_json::from_value(json!(null)).unwrap();
        assert!(gone.is_dangling());
    }
}
