use async_trait::async_trait;
use serde_json::Value;
use sqlx::{
    sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    QueryBuilder, Row,
};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::infrastructure::document_store::{
    apply_update, Collection, DeleteResult, Document, DocumentStore, Filter, Update,
    UpdateResult, ID_FIELD,
};
use crate::infrastructure::id_generator::{DocId, IdGenerator};

/// SQLite implementation of the document store.
///
/// Every collection shares one `documents` table; the document body is kept as
/// JSON text and filtered with `json_extract`.
pub struct SqliteDocumentStore {
    pool: SqlitePool,
    ids: Arc<IdGenerator>,
    // Held by every write. A deferred transaction that reads and then writes
    // fails with SQLITE_BUSY if another pooled connection commits in between.
    write_lock: Mutex<()>,
}

impl SqliteDocumentStore {
    pub async fn connect(database_url: &str, ids: Arc<IdGenerator>) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::ConfigurationError(format!(
                    "Invalid SQLite URL {}: {}",
                    database_url, e
                ))
            })?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to connect to {}: {}", database_url, e))
        })?;

        let store = Self::with_pool(pool, ids);
        store.initialize().await?;
        Ok(store)
    }

    /// A private in-memory database. The pool holds a single connection since
    /// every SQLite `:memory:` connection is a separate database.
    pub async fn new_in_memory(ids: Arc<IdGenerator>) -> AppResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to connect to in-memory SQLite: {}", e))
            })?;

        let store = Self::with_pool(pool, ids);
        store.initialize().await?;
        Ok(store)
    }

    fn with_pool(pool: SqlitePool, ids: Arc<IdGenerator>) -> Self {
        Self {
            pool,
            ids,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                id INTEGER NOT NULL,
                data TEXT NOT NULL,
                time_created INTEGER NOT NULL,
                time_updated INTEGER NOT NULL,
                UNIQUE (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create documents table: {}", e)))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, seq)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to create documents collection index: {}", e))
        })?;

        Ok(())
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, collection: Collection, filter: &Filter) {
    qb.push(" WHERE collection = ");
    qb.push_bind(collection.as_str());

    for (field, value) in filter.clauses() {
        qb.push(" AND json_extract(data, ");
        qb.push_bind(format!("$.\"{}\"", field.replace('"', "")));
        qb.push(")");
        match value {
            Value::Null => {
                qb.push(" IS NULL");
            }
            Value::Bool(flag) => {
                qb.push(" = ");
                qb.push_bind(*flag as i64);
            }
            Value::Number(number) => {
                qb.push(" = ");
                match number.as_i64() {
                    Some(int) => qb.push_bind(int),
                    None => qb.push_bind(number.as_f64().unwrap_or_default()),
                };
            }
            Value::String(text) => {
                qb.push(" = ");
                qb.push_bind(text.clone());
            }
            Value::Array(_) | Value::Object(_) => {
                qb.push(" = json(");
                qb.push_bind(value.to_string());
                qb.push(")");
            }
        }
    }
}

fn parse_document(data: &str) -> AppResult<Document> {
    match serde_json::from_str(data)? {
        Value::Object(doc) => Ok(doc),
        _ => Err(AppError::SerializationError(
            "Stored document is not a JSON object".to_string(),
        )),
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn insert_one(&self, collection: Collection, mut doc: Document) -> AppResult<Document> {
        let id = self.ids.next_id();
        doc.insert(ID_FIELD.to_string(), id.into());
        let now = chrono::Utc::now().timestamp_millis();

        let _guard = self.write_lock.lock().await;
        sqlx::query(
            "INSERT INTO documents (collection, id, data, time_created, time_updated)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(collection.as_str())
        .bind(id.as_i64())
        .bind(serde_json::to_string(&doc)?)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!(
                "Failed to insert into {} with ID {}: {}",
                collection.as_str(),
                id,
                e
            ))
        })?;

        Ok(doc)
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Document>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT data FROM documents");
        push_filter(&mut qb, collection, filter);
        qb.push(" ORDER BY seq");

        let rows = qb.build().fetch_all(&self.pool).await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to query {}: {}", collection.as_str(), e))
        })?;

        rows.iter()
            .map(|row| parse_document(row.get::<&str, _>("data")))
            .collect()
    }

    async fn find_by_id(&self, collection: Collection, id: DocId) -> AppResult<Option<Document>> {
        let row = sqlx::query("SELECT data FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to get {} {}: {}",
                    collection.as_str(),
                    id,
                    e
                ))
            })?;

        row.map(|row| parse_document(row.get::<&str, _>("data")))
            .transpose()
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> AppResult<UpdateResult> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to begin transaction: {}", e))
        })?;

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT seq, data FROM documents");
        push_filter(&mut qb, collection, filter);
        qb.push(" ORDER BY seq LIMIT 1");

        let row = qb.build().fetch_optional(&mut *tx).await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to query {}: {}", collection.as_str(), e))
        })?;
        let Some(row) = row else {
            return Ok(UpdateResult::new(0, 0));
        };

        let seq: i64 = row.get("seq");
        let mut doc = parse_document(row.get::<&str, _>("data"))?;
        if !apply_update(&mut doc, update)? {
            return Ok(UpdateResult::new(1, 0));
        }

        sqlx::query("UPDATE documents SET data = ?, time_updated = ? WHERE seq = ?")
            .bind(serde_json::to_string(&doc)?)
            .bind(chrono::Utc::now().timestamp_millis())
            .bind(seq)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to update {} document: {}",
                    collection.as_str(),
                    e
                ))
            })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(UpdateResult::new(1, 1))
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> AppResult<DeleteResult> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "DELETE FROM documents WHERE seq = (SELECT seq FROM documents",
        );
        push_filter(&mut qb, collection, filter);
        qb.push(" ORDER BY seq LIMIT 1)");

        let _guard = self.write_lock.lock().await;
        let result = qb.build().execute(&self.pool).await.map_err(|e| {
            AppError::DatabaseError(format!(
                "Failed to delete from {}: {}",
                collection.as_str(),
                e
            ))
        })?;
        Ok(DeleteResult::new(result.rows_affected()))
    }

    async fn delete_many(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> AppResult<DeleteResult> {
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM documents");
        push_filter(&mut qb, collection, filter);

        let _guard = self.write_lock.lock().await;
        let result = qb.build().execute(&self.pool).await.map_err(|e| {
            AppError::DatabaseError(format!(
                "Failed to delete from {}: {}",
                collection.as_str(),
                e
            ))
        })?;
        Ok(DeleteResult::new(result.rows_affected()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::document_store::to_document;
    use serde_json::json;

    fn ids() -> Arc<IdGenerator> {
        Arc::new(IdGenerator::new(1).unwrap())
    }

    async fn insert(store: &SqliteDocumentStore, collection: Collection, value: Value) -> Document {
        store
            .insert_one(collection, to_document(&value).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn filters_on_json_fields() {
        let store = SqliteDocumentStore::new_in_memory(ids()).await.unwrap();
        insert(&store, Collection::Users, json!({"username": "alice", "password": "pw"})).await;
        insert(&store, Collection::Users, json!({"username": "bob", "password": "pw"})).await;
        insert(&store, Collection::Tuits, json!({"tuit": "hi", "stats": {"likes": 3}})).await;

        let by_name = store
            .find(Collection::Users, &Filter::all().eq("username", "bob"))
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0]["username"], "bob");

        let both = store
            .find(Collection::Users, &Filter::all().eq("password", "pw"))
            .await
            .unwrap();
        let names: Vec<_> = both.iter().map(|doc| doc["username"].clone()).collect();
        assert_eq!(names, vec![json!("alice"), json!("bob")]);

        let nothing = store
            .find(
                Collection::Users,
                &Filter::all().eq("username", "alice").eq("password", "nope"),
            )
            .await
            .unwrap();
        assert!(nothing.is_empty());

        let missing_field = store
            .find(Collection::Users, &Filter::all().eq("email", Value::Null))
            .await
            .unwrap();
        assert_eq!(missing_field.len(), 2);
    }

    #[tokio::test]
    async fn updates_push_and_pull() {
        let store = SqliteDocumentStore::new_in_memory(ids()).await.unwrap();
        let user = insert(
            &store,
            Collection::Users,
            json!({"username": "alice", "bookmarks": []}),
        )
        .await;
        let id: DocId = user[ID_FIELD].as_str().unwrap().parse().unwrap();
        let filter = Filter::by_id(id);

        let pushed = store
            .update_one(Collection::Users, &filter, &Update::push("bookmarks", "9"))
            .await
            .unwrap();
        assert_eq!(pushed, UpdateResult::new(1, 1));

        let set = Update::Set(to_document(&json!({"email": "alice@x.io"})).unwrap());
        store.update_one(Collection::Users, &filter, &set).await.unwrap();
        let unchanged = store.update_one(Collection::Users, &filter, &set).await.unwrap();
        assert_eq!(unchanged, UpdateResult::new(1, 0));

        let stored = store.find_by_id(Collection::Users, id).await.unwrap().unwrap();
        assert_eq!(stored["bookmarks"], json!(["9"]));
        assert_eq!(stored["email"], "alice@x.io");
        assert_eq!(stored["username"], "alice");

        store
            .update_one(Collection::Users, &filter, &Update::pull("bookmarks", "9"))
            .await
            .unwrap();
        let stored = store.find_by_id(Collection::Users, id).await.unwrap().unwrap();
        assert_eq!(stored["bookmarks"], json!([]));
    }

    #[tokio::test]
    async fn deletes_by_filter() {
        let store = SqliteDocumentStore::new_in_memory(ids()).await.unwrap();
        for _ in 0..3 {
            insert(&store, Collection::Likes, json!({"tuit": "1", "likedBy": "2"})).await;
        }
        insert(&store, Collection::Likes, json!({"tuit": "5", "likedBy": "2"})).await;

        let pair = Filter::all().eq("tuit", "1").eq("likedBy", "2");
        assert_eq!(store.delete_one(Collection::Likes, &pair).await.unwrap().deleted_count, 1);
        assert_eq!(
            store
                .delete_many(Collection::Likes, &Filter::all().eq("tuit", "1"))
                .await
                .unwrap()
                .deleted_count,
            2
        );
        assert_eq!(store.find(Collection::Likes, &Filter::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn persists_across_reconnects() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("tuiter.db").display());

        let id = {
            let store = SqliteDocumentStore::connect(&url, ids()).await.unwrap();
            let doc = insert(&store, Collection::Messages, json!({"msg": "hello"})).await;
            doc[ID_FIELD].as_str().unwrap().parse::<DocId>().unwrap()
        };

        let store = SqliteDocumentStore::connect(&url, ids()).await.unwrap();
        let found = store.find_by_id(Collection::Messages, id).await.unwrap().unwrap();
        assert_eq!(found["msg"], "hello");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_pushes_and_inserts_all_land() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("tuiter.db").display());
        let store = Arc::new(SqliteDocumentStore::connect(&url, ids()).await.unwrap());

        let user = insert(
            &store,
            Collection::Users,
            json!({"username": "alice", "bookmarks": []}),
        )
        .await;
        let id: DocId = user[ID_FIELD].as_str().unwrap().parse().unwrap();

        let mut tasks = Vec::new();
        for i in 0..100 {
            let pusher = store.clone();
            tasks.push(tokio::spawn(async move {
                pusher
                    .update_one(
                        Collection::Users,
                        &Filter::by_id(id),
                        &Update::push("bookmarks", i.to_string()),
                    )
                    .await
                    .map(|_| ())
            }));

            let inserter = store.clone();
            tasks.push(tokio::spawn(async move {
                let like = to_document(&json!({"tuit": i.to_string(), "likedBy": "1"})).unwrap();
                inserter.insert_one(Collection::Likes, like).await.map(|_| ())
            }));
        }
        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }

        let stored = store.find_by_id(Collection::Users, id).await.unwrap().unwrap();
        let mut bookmarks: Vec<u32> = stored["bookmarks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|value| value.as_str().unwrap().parse().unwrap())
            .collect();
        bookmarks.sort_unstable();
        assert_eq!(bookmarks, (0..100).collect::<Vec<u32>>());

        let likes = store.find(Collection::Likes, &Filter::all()).await.unwrap();
        assert_eq!(likes.len(), 100);
    }
}
