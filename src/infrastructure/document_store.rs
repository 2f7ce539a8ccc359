// Document Store Interface - collections of JSON documents addressed by `_id`
// Both backends share the filter and update semantics defined here.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::infrastructure::id_generator::DocId;

pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Tuits,
    Likes,
    Follows,
    Messages,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Tuits => "tuits",
            Collection::Likes => "likes",
            Collection::Follows => "follows",
            Collection::Messages => "messages",
        }
    }
}

/// Conjunction of top-level field equalities. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: DocId) -> Self {
        Self::all().eq(ID_FIELD, id)
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, expected)| doc.get(field).unwrap_or(&Value::Null) == expected)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// `$set`: overwrite the given top-level fields, leave the rest alone.
    Set(Document),
    /// `$push`: append to an array field, creating it when absent.
    Push { field: String, value: Value },
    /// `$pull`: remove every element equal to `value`.
    Pull { field: String, value: Value },
}

impl Update {
    pub fn set<T: Serialize>(fields: &T) -> AppResult<Self> {
        Ok(Update::Set(to_document(fields)?))
    }

    pub fn push(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Update::Push {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn pull(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Update::Pull {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Applies `update` to `doc` in place, returning whether anything changed.
pub fn apply_update(doc: &mut Document, update: &Update) -> AppResult<bool> {
    match update {
        Update::Set(fields) => {
            let mut modified = false;
            for (field, value) in fields {
                if field == ID_FIELD {
                    continue;
                }
                if doc.get(field) != Some(value) {
                    doc.insert(field.clone(), value.clone());
                    modified = true;
                }
            }
            Ok(modified)
        }
        Update::Push { field, value } => {
            let slot = doc.entry(field.clone()).or_insert(Value::Null);
            if slot.is_null() {
                *slot = Value::Array(Vec::new());
            }
            match slot {
                Value::Array(items) => {
                    items.push(value.clone());
                    Ok(true)
                }
                _ => Err(AppError::BadRequest(format!(
                    "Cannot push to non-array field '{}'",
                    field
                ))),
            }
        }
        Update::Pull { field, value } => match doc.get_mut(field) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Array(items)) => {
                let before = items.len();
                items.retain(|item| item != value);
                Ok(items.len() != before)
            }
            Some(_) => Err(AppError::BadRequest(format!(
                "Cannot pull from non-array field '{}'",
                field
            ))),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateResult {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Document store interface trait.
/// Implementations assign `_id` on insert and keep documents in insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_one(&self, collection: Collection, doc: Document) -> AppResult<Document>;
    async fn find(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Document>>;
    async fn find_by_id(&self, collection: Collection, id: DocId) -> AppResult<Option<Document>>;
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> AppResult<UpdateResult>;
    async fn delete_one(&self, collection: Collection, filter: &Filter) -> AppResult<DeleteResult>;
    async fn delete_many(&self, collection: Collection, filter: &Filter)
        -> AppResult<DeleteResult>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> AppResult<Option<Document>> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }
}

pub fn to_document<T: Serialize>(value: &T) -> AppResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(doc) => Ok(doc),
        other => Err(AppError::SerializationError(format!(
            "Expected a JSON object, got {}",
            other
        ))),
    }
}

pub fn from_document<T: DeserializeOwned>(doc: Document) -> AppResult<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Replaces the reference ids stored in `field` with the referenced documents.
///
/// A single reference to a missing document becomes `null`; missing ids inside
/// an array of references are dropped.
pub async fn populate(
    store: &dyn DocumentStore,
    docs: &mut [Document],
    field: &str,
    target: Collection,
) -> AppResult<()> {
    let mut ids: Vec<DocId> = Vec::new();
    for doc in docs.iter() {
        match doc.get(field) {
            Some(Value::String(raw)) => ids.extend(raw.parse::<DocId>().ok()),
            Some(Value::Array(items)) => ids.extend(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(|raw| raw.parse::<DocId>().ok()),
            ),
            _ => {}
        }
    }
    ids.sort_unstable();
    ids.dedup();

    let fetched = futures::future::try_join_all(
        ids.iter().map(|id| store.find_by_id(target, *id)),
    )
    .await?;
    let resolved: HashMap<String, Document> = ids
        .iter()
        .zip(fetched)
        .filter_map(|(id, doc)| doc.map(|doc| (id.to_string(), doc)))
        .collect();

    for doc in docs.iter_mut() {
        let Some(slot) = doc.get_mut(field) else {
            continue;
        };
        let expanded = match &*slot {
            Value::String(raw) => resolved
                .get(raw.as_str())
                .cloned()
                .map(Value::Object)
                .unwrap_or(Value::Null),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(|raw| resolved.get(raw).cloned().map(Value::Object))
                    .collect(),
            ),
            _ => continue,
        };
        *slot = expanded;
    }

    Ok(())
}
